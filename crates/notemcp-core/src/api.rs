use crate::config::ServerConfig;
use crate::error::BootstrapError;
use backon::{ExponentialBuilder, Retryable};
use std::time::Duration;
use tracing::{debug, info};

/// Thin client for the notes application's REST API.
///
/// The bootstrap layer only ever calls `ping`; real note operations
/// belong to the tool layer, which builds its own client from the same
/// `ServerConfig`.
pub struct NoteApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl NoteApiClient {
    pub fn new(config: &ServerConfig) -> Result<Self, BootstrapError> {
        let mut builder = reqwest::Client::builder().timeout(Duration::from_secs(config.timeout));
        if !config.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let http = builder
            .build()
            .map_err(|e| BootstrapError::StartupFailed(format!("cannot build API client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.api_base_url(),
            token: config.token.clone(),
        })
    }

    fn ping_url(&self) -> String {
        match &self.token {
            Some(token) => format!("{}/ping?token={token}", self.base_url),
            None => format!("{}/ping", self.base_url),
        }
    }

    /// Startup health check against the notes application. Retried on a
    /// short exponential schedule so an application that is still coming
    /// up gets a moment before the launch is declared failed.
    pub async fn ping(&self) -> Result<(), BootstrapError> {
        let url = self.ping_url();
        debug!(url = %url, "pinging notes API");

        let attempt = || async {
            let response = self.http.get(&url).send().await?;
            response.error_for_status()?;
            Ok::<(), reqwest::Error>(())
        };

        attempt
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(Duration::from_millis(200))
                    .with_max_delay(Duration::from_secs(2))
                    .with_max_times(3),
            )
            .notify(|err, delay| debug!(error = %err, ?delay, "notes API not reachable yet"))
            .await
            .map_err(|e| {
                BootstrapError::StartupFailed(format!("notes API health check failed: {e}"))
            })?;

        info!("notes API reachable");
        Ok(())
    }
}
