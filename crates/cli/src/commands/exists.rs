//! exists command - Check whether an object exists
//!
//! Exit code 0 when the object is present, 5 when the backend reports
//! not-found; any other backend failure keeps its own exit code and is
//! never collapsed into "absent".

use clap::Args;
use serde::Serialize;

use dk_s3::S3Store;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Check whether an object exists
#[derive(Args, Debug)]
pub struct ExistsArgs {
    /// Object URI (s3://container/key)
    pub path: String,
}

#[derive(Debug, Serialize)]
struct ExistsOutput<'a> {
    path: &'a str,
    exists: bool,
}

/// Execute the exists command
pub async fn execute(
    args: ExistsArgs,
    role: Option<String>,
    output_config: OutputConfig,
) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let store = S3Store::connect(role.as_deref()).await;

    match dk_core::exists(&store, &args.path).await {
        Ok(true) => {
            if formatter.is_json() {
                formatter.json(&ExistsOutput {
                    path: &args.path,
                    exists: true,
                });
            } else {
                formatter.success(&format!("{} exists", args.path));
            }
            ExitCode::Success
        }
        Ok(false) => {
            if formatter.is_json() {
                formatter.json(&ExistsOutput {
                    path: &args.path,
                    exists: false,
                });
            } else {
                formatter.println(&format!("{} does not exist", args.path));
            }
            ExitCode::NotFound
        }
        Err(e) => {
            formatter.error(&format!("Failed to check existence: {e}"));
            ExitCode::from_error(&e)
        }
    }
}
