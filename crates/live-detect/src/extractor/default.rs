use std::sync::OnceLock;
use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use tracing::{debug, warn};

pub(crate) const DEFAULT_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// Default per-request deadline for page fetches.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

pub fn install_rustls_provider() {
    static PROVIDER_INSTALLED: OnceLock<()> = OnceLock::new();
    PROVIDER_INSTALLED.get_or_init(|| {
        if let Err(e) = rustls::crypto::aws_lc_rs::default_provider().install_default() {
            // Safe to ignore: can happen if another crate installed it first.
            debug!(existing_provider = ?e, "rustls CryptoProvider already installed");
        }
    });
}

/// Client builder preconfigured with the browser user agent.
///
/// A zero `timeout` leaves the client without a global deadline; fetches
/// still carry their own per-request timeout.
pub fn create_client_builder(timeout: Option<Duration>) -> ClientBuilder {
    install_rustls_provider();

    let mut builder = Client::builder().user_agent(DEFAULT_UA);
    if let Some(timeout) = timeout.filter(|t| !t.is_zero()) {
        builder = builder.timeout(timeout);
    }
    builder
}

pub fn default_client() -> Client {
    create_client_builder(None).build().unwrap_or_else(|error| {
        warn!(error = %error, "Failed to create HTTP client; falling back to reqwest defaults");
        Client::new()
    })
}
