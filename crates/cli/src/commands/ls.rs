//! ls command - List objects under a storage URI
//!
//! Pages are fetched lazily and printed as they arrive, so listings of any
//! size stream in constant memory. With --project, each page is filtered
//! through the projection expression and the selected values are printed
//! instead of full entries.

use clap::Args;
use futures::StreamExt;
use serde::Serialize;
use serde_json::Value;

use dk_core::{parse_storage_path, ListRequest, ObjectPage, Projection};
use dk_s3::S3Store;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// List objects under a storage URI
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Storage URI (s3://container[/prefix])
    pub path: String,

    /// Group keys by a delimiter instead of listing the full subtree
    #[arg(short, long)]
    pub delimiter: Option<String>,

    /// Keys per page requested from the backend
    #[arg(long)]
    pub page_size: Option<i32>,

    /// Projection applied to each page, e.g. "entries[].key"
    #[arg(long)]
    pub project: Option<String>,

    /// Print totals after the listing
    #[arg(long)]
    pub summarize: bool,
}

#[derive(Debug, Serialize)]
struct Summary {
    total_objects: usize,
    total_size_bytes: i64,
    total_size_human: String,
}

/// Execute the ls command
pub async fn execute(args: LsArgs, role: Option<String>, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let parsed = match parse_storage_path(&args.path) {
        Ok(parsed) => parsed,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::UsageError;
        }
    };

    let projection = match args.project.as_deref().map(Projection::parse).transpose() {
        Ok(projection) => projection,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::UsageError;
        }
    };

    let mut request = ListRequest::container(&parsed.container);
    if !parsed.key.is_empty() {
        request = request.with_prefix(&parsed.key);
    }
    if let Some(delimiter) = &args.delimiter {
        request = request.with_delimiter(delimiter);
    }
    if let Some(page_size) = args.page_size {
        request = request.with_page_size(page_size);
    }

    let store = S3Store::connect(role.as_deref()).await;

    match projection {
        Some(projection) => stream_values(&store, request, projection, &formatter).await,
        None => stream_pages(&store, request, &args, &formatter).await,
    }
}

/// Print listing pages as they arrive
async fn stream_pages(
    store: &S3Store,
    request: ListRequest,
    args: &LsArgs,
    formatter: &Formatter,
) -> ExitCode {
    let mut total_objects = 0usize;
    let mut total_size = 0i64;

    let mut stream = std::pin::pin!(dk_core::pages(store, request));
    while let Some(page) = stream.next().await {
        match page {
            Ok(page) => {
                print_page(&page, formatter);
                total_objects += page.entries.len();
                total_size += page.entries.iter().filter_map(|e| e.size_bytes).sum::<i64>();
            }
            Err(e) => {
                formatter.error(&format!("Failed to list objects: {e}"));
                return ExitCode::from_error(&e);
            }
        }
    }

    if args.summarize {
        if formatter.is_json() {
            formatter.json(&Summary {
                total_objects,
                total_size_bytes: total_size,
                total_size_human: humansize::format_size(total_size as u64, humansize::BINARY),
            });
        } else {
            formatter.println(&format!(
                "\nTotal: {} objects, {}",
                total_objects,
                humansize::format_size(total_size as u64, humansize::BINARY)
            ));
        }
    }

    ExitCode::Success
}

fn print_page(page: &ObjectPage, formatter: &Formatter) {
    if formatter.is_json() {
        // One JSON document per page
        formatter.json(page);
        return;
    }

    for prefix in &page.common_prefixes {
        formatter.println(&format!("[{:19}]     0B {prefix}", ""));
    }

    for entry in &page.entries {
        let date = entry
            .last_modified
            .map(|d| d.strftime("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| " ".repeat(19));
        let size = entry.size_human.clone().unwrap_or_else(|| "0 B".to_string());
        formatter.println(&format!("[{date}] {size:>9} {}", entry.key));
    }
}

/// Print projected values as they arrive
async fn stream_values(
    store: &S3Store,
    request: ListRequest,
    projection: Projection,
    formatter: &Formatter,
) -> ExitCode {
    let mut stream = std::pin::pin!(dk_core::search(store, request, projection));
    while let Some(value) = stream.next().await {
        match value {
            Ok(Value::String(s)) if !formatter.is_json() => formatter.println(&s),
            Ok(value) => formatter.println(&value.to_string()),
            Err(e) => {
                formatter.error(&format!("Failed to list objects: {e}"));
                return ExitCode::from_error(&e);
            }
        }
    }

    ExitCode::Success
}
