//! Shared HTTP client construction policy.
//!
//! Both the API client and the file saver build their `reqwest::Client` here so
//! user-agent, compression, and connect timeouts stay consistent. Proxies come
//! from the standard `HTTP(S)_PROXY` environment variables, which reqwest reads
//! by default.

use std::time::Duration;

use reqwest::Client;

use crate::user_agent;

/// Connect timeout for outbound requests.
pub(crate) const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Builds a client with the crate's defaults.
///
/// `read_timeout` bounds the whole request when set. The API client leaves it
/// unset because its deadline belongs to the controller.
pub(crate) fn build_client(read_timeout: Option<Duration>) -> Result<Client, reqwest::Error> {
    let builder = Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .gzip(true)
        .user_agent(user_agent::default_user_agent());
    match read_timeout {
        Some(timeout) => builder.timeout(timeout).build(),
        None => builder.build(),
    }
}
