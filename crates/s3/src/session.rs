//! Session and credential acquisition
//!
//! Builds an SDK configuration from either the ambient credential chain or
//! an assumed role. Assumed-role credentials are fetched lazily by the SDK
//! on first use and refreshed transparently before expiry; a rejected role
//! therefore surfaces on the first request, not here.

use aws_config::sts::AssumeRoleProvider;
use aws_config::{BehaviorVersion, Region, SdkConfig};

/// All datakit storage lives in one region
pub const REGION: &str = "us-west-2";

/// Session name reported to the backend for assumed-role sessions
const SESSION_NAME: &str = "datakit";

/// Build an SDK configuration bound to the fixed region
///
/// With a role, the ambient chain authenticates the role assumption and the
/// returned configuration carries the auto-refreshing role credentials.
pub async fn sdk_config(role_arn: Option<&str>) -> SdkConfig {
    let loader = aws_config::defaults(BehaviorVersion::latest()).region(Region::new(REGION));

    match role_arn {
        None => loader.load().await,
        Some(role_arn) => {
            let provider = AssumeRoleProvider::builder(role_arn)
                .region(Region::new(REGION))
                .session_name(SESSION_NAME)
                .build()
                .await;

            loader.credentials_provider(provider).load().await
        }
    }
}

/// Build an S3 client, optionally through an assumed role
pub async fn s3_client(role_arn: Option<&str>) -> aws_sdk_s3::Client {
    aws_sdk_s3::Client::new(&sdk_config(role_arn).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_is_fixed() {
        assert_eq!(REGION, "us-west-2");
    }
}
