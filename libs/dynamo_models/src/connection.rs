use aws_config::{BehaviorVersion, Region};
use tracing::{info, instrument};

pub type Client = aws_sdk_dynamodb::Client;

#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub region: String,
    /// Overrides the regional endpoint, e.g. `http://localhost:8000` for
    /// DynamoDB Local.
    pub endpoint_url: Option<String>,
}

/// Builds the process-wide DynamoDB client. Credentials come from the
/// default AWS provider chain.
#[instrument(skip_all, fields(region = %settings.region))]
pub async fn establish_connection(settings: &ConnectionSettings) -> Client {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(settings.region.clone()));

    if let Some(endpoint_url) = &settings.endpoint_url {
        info!("Using DynamoDB endpoint override: {endpoint_url}");
        loader = loader.endpoint_url(endpoint_url);
    }

    let sdk_config = loader.load().await;
    Client::new(&sdk_config)
}
