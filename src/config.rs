//! Gateway connection settings.

use std::time::Duration;

use crate::domain::{ApiKey, BaseUrl, ValidationError};

#[derive(Debug, Clone)]
/// Where the gateway lives and how to authenticate against it.
pub struct GatewayConfig {
    pub base_url: BaseUrl,
    pub api_key: ApiKey,
    /// Per-request timeout; `None` leaves the HTTP client default in place.
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

impl GatewayConfig {
    /// Validate raw settings, typically read from flags or the environment.
    ///
    /// A zero timeout is treated as "no timeout".
    pub fn from_raw(
        base_url: Option<&str>,
        api_key: Option<&str>,
        timeout_secs: Option<u64>,
    ) -> Result<Self, ValidationError> {
        let base_url = BaseUrl::new(base_url.unwrap_or_default())?;
        let api_key = ApiKey::new(api_key.unwrap_or_default())?;
        Ok(Self {
            base_url,
            api_key,
            timeout: timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            user_agent: Some(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            )),
        })
    }
}
