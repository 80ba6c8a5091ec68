use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://distributions.crowdin.net";

/// Settings for the HTTP distribution client.
#[derive(Clone, Debug)]
pub struct DistributionConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("distmap/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl DistributionConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
