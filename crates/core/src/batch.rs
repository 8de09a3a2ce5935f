//! Batch dataset path convention
//!
//! Batch datasets live under
//! `<datastore_path>/datastore/[<service>/]<program>/<snake_case_name>`,
//! where the service segment comes from the `ZODIAC_SERVICE` environment
//! variable when the deployment sets one.

use std::path::PathBuf;

use crate::case::pascal_to_snake_case;
use crate::dataset::{Dataset, ExecutorContext};

/// Environment variable selecting the deployment-specific path segment
pub const ZODIAC_SERVICE_ENV: &str = "ZODIAC_SERVICE";

/// Resolve the storage path of a batch dataset
///
/// Reads `ZODIAC_SERVICE` from the process environment.
pub fn batch_dataset_path(ctx: &ExecutorContext, dataset: &Dataset) -> PathBuf {
    let service = std::env::var(ZODIAC_SERVICE_ENV)
        .ok()
        .filter(|s| !s.is_empty());
    batch_dataset_path_with(ctx, dataset, service.as_deref())
}

/// Resolve the storage path with an explicit service segment
pub fn batch_dataset_path_with(
    ctx: &ExecutorContext,
    dataset: &Dataset,
    service: Option<&str>,
) -> PathBuf {
    let mut path = ctx.datastore_path.join("datastore");

    if let Some(service) = service {
        path.push(service);
    }

    let program = dataset
        .program_name
        .as_deref()
        .unwrap_or(&ctx.current_program_name);

    path.push(program);
    path.push(pascal_to_snake_case(&dataset.name));
    path
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::dataset::DatasetRegistry;

    fn dataset(value: serde_json::Value) -> Dataset {
        let serde_json::Value::Object(keys) = value else {
            panic!("expected object");
        };
        DatasetRegistry::new().from_keys(&keys).unwrap()
    }

    fn ctx() -> ExecutorContext {
        ExecutorContext::new("/data/lake", "rent_zestimate")
    }

    #[test]
    fn test_path_without_service() {
        let ds = dataset(json!({"name": "RentScores"}));
        let path = batch_dataset_path_with(&ctx(), &ds, None);
        assert_eq!(
            path,
            PathBuf::from("/data/lake/datastore/rent_zestimate/rent_scores")
        );
    }

    #[test]
    fn test_path_with_service_segment() {
        let ds = dataset(json!({"name": "RentScores"}));
        let path = batch_dataset_path_with(&ctx(), &ds, Some("zodiac-rent"));
        assert_eq!(
            path,
            PathBuf::from("/data/lake/datastore/zodiac-rent/rent_zestimate/rent_scores")
        );
    }

    #[test]
    fn test_explicit_program_name_wins() {
        let ds = dataset(json!({"name": "RentScores", "program_name": "backfill"}));
        let path = batch_dataset_path_with(&ctx(), &ds, None);
        assert_eq!(
            path,
            PathBuf::from("/data/lake/datastore/backfill/rent_scores")
        );
    }
}
