//! path command - Print the batch storage path of a dataset
//!
//! Accepts the dataset parameter as raw JSON text, resolves it through the
//! dataset registry, and prints where the batch path convention places it.
//! No network access is involved.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use dk_core::{batch_dataset_path, DatasetRegistry, DatasetValue, ExecutorContext};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Print the batch storage path of a dataset
#[derive(Args, Debug)]
pub struct PathArgs {
    /// Dataset parameter as a JSON object, e.g. '{"name": "RentScores"}'
    pub dataset: String,

    /// Root of the batch datastore
    #[arg(long, env = "DK_DATASTORE_PATH")]
    pub datastore: PathBuf,

    /// Name of the running program
    #[arg(long, env = "DK_PROGRAM_NAME")]
    pub program: String,
}

#[derive(Debug, Serialize)]
struct PathOutput {
    dataset: String,
    path: PathBuf,
}

/// Execute the path command
pub fn execute(args: PathArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let registry = DatasetRegistry::new();
    let dataset = match DatasetValue::Text(args.dataset).resolve(&registry) {
        Ok(dataset) => dataset,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    let ctx = ExecutorContext::new(args.datastore, args.program);
    let path = batch_dataset_path(&ctx, &dataset);

    if formatter.is_json() {
        formatter.json(&PathOutput {
            dataset: dataset.name,
            path,
        });
    } else {
        formatter.println(&path.display().to_string());
    }

    ExitCode::Success
}
