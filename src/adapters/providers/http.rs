//! Shared request handling for HTTP providers

use crate::domain::{ProviderError, Result};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

/// Send a request and decode a JSON body, mapping every failure to a
/// [`ProviderError`] tagged with the provider name
pub(crate) async fn fetch_json<T>(provider: &str, request: RequestBuilder) -> Result<T>
where
    T: DeserializeOwned,
{
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::from_transport(provider, &e))?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        let error = if status.is_server_error() {
            ProviderError::ServerError {
                provider: provider.to_string(),
                status: status.as_u16(),
                message,
            }
        } else {
            ProviderError::ClientError {
                provider: provider.to_string(),
                status: status.as_u16(),
                message,
            }
        };
        return Err(error.into());
    }

    response.json::<T>().await.map_err(|e| {
        ProviderError::InvalidResponse {
            provider: provider.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}
