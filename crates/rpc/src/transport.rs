//! Utils for creating the JSON-RPC transports

use crate::error::ClientError;
use ethers::{
    providers::{Http, Provider},
    types::Chain,
};
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use std::time::Duration;
use url::Url;

/// Parses an endpoint URL, only `http` and `https` are accepted
pub fn parse_url(url: &str) -> Result<Url, ClientError> {
    let parsed = Url::parse(url)
        .map_err(|err| ClientError::InvalidUrl { url: url.into(), inner: err.to_string() })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(ClientError::InvalidUrl {
            url: url.into(),
            inner: format!("unsupported scheme {scheme}"),
        }),
    }
}

/// Creates ethers provider with HTTP connection
///
/// Nothing is sent until the first request.
pub fn create_http_provider(url: &str, chain_id: u64) -> Result<Provider<Http>, ClientError> {
    let provider = Provider::new(Http::new(parse_url(url)?));

    Ok(provider.interval(if chain_id == u64::from(Chain::Dev) {
        Duration::from_millis(5u64)
    } else {
        Duration::from_millis(500u64)
    }))
}

/// Creates jsonrpsee HTTP client
pub fn create_http_client(url: &str) -> Result<HttpClient, ClientError> {
    let parsed = parse_url(url)?;
    HttpClientBuilder::default()
        .build(parsed.as_str())
        .map_err(|err| ClientError::InvalidUrl { url: url.into(), inner: err.to_string() })
}
