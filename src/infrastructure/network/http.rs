// HTTP client utilities
use crate::domain::error::FyError;
use reqwest::Client;

pub const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/104.0.0.0 Safari/537.36";

/// Create the shared HTTP client. Web-scraping providers need a browser
/// user agent or they get served a degraded page.
pub fn create_client(proxy: Option<&str>) -> Result<Client, FyError> {
    let mut builder = Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(std::time::Duration::from_secs(30))
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(USER_AGENT);

    if let Some(proxy) = proxy {
        builder = builder.proxy(reqwest::Proxy::all(proxy)?);
    }

    Ok(builder.build()?)
}
