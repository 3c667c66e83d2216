//! ArcGIS World Geocoding Service provider
//!
//! Uses the `findAddressCandidates` operation of the GeocodeServer with a
//! single-line address and keeps the best candidate. Anonymous access works;
//! an API key is appended as `token` when configured.

use super::http::fetch_json;
use super::{GeocodingProvider, Session};
use crate::config::{ArcGisConfig, SecretString};
use crate::domain::{Coordinates, Lookup, ProviderError, Result};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;

/// Provider name recorded in checkpoint rows
pub const ARCGIS: &str = "arcgis";

/// ArcGIS geocoding provider
pub struct ArcGisProvider {
    base_url: String,
    api_key: Option<SecretString>,
}

impl ArcGisProvider {
    pub fn new(config: &ArcGisConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn candidates_url(&self) -> String {
        format!("{}/findAddressCandidates", self.base_url)
    }
}

#[derive(Debug, Deserialize)]
struct FindCandidatesResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<ServiceError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    x: f64,
    y: f64,
}

// ArcGIS reports some failures (bad token, invalid parameters) as a 200
// response with an error object.
#[derive(Debug, Deserialize)]
struct ServiceError {
    code: i64,
    #[serde(default)]
    message: String,
}

#[async_trait]
impl GeocodingProvider for ArcGisProvider {
    fn name(&self) -> &str {
        ARCGIS
    }

    async fn lookup(&self, address: &str, session: &Session) -> Result<Lookup> {
        let mut query: Vec<(&str, &str)> = vec![
            ("SingleLine", address),
            ("f", "json"),
            ("maxLocations", "1"),
        ];
        if let Some(api_key) = &self.api_key {
            query.push(("token", api_key.expose_secret().as_ref()));
        }

        tracing::debug!(provider = ARCGIS, address = %address, "Looking up address");

        let request = session.client().get(self.candidates_url()).query(&query);
        let response: FindCandidatesResponse = fetch_json(ARCGIS, request).await?;

        if let Some(error) = response.error {
            return Err(ProviderError::ClientError {
                provider: ARCGIS.to_string(),
                status: u16::try_from(error.code).unwrap_or(400),
                message: error.message,
            }
            .into());
        }

        Ok(match response.candidates.first() {
            Some(candidate) => Lookup::Found(Coordinates::new(
                candidate.location.y,
                candidate.location.x,
            )),
            None => Lookup::NotFound,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{secret_string, HttpConfig};
    use crate::domain::GeobatchError;
    use mockito::Matcher;

    fn provider_for(server: &mockito::ServerGuard) -> ArcGisProvider {
        ArcGisProvider::new(&ArcGisConfig {
            base_url: format!("{}/", server.url()),
            api_key: None,
        })
    }

    fn session() -> Session {
        Session::new(&HttpConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_lookup_found_uses_first_candidate() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Regex(r"^/findAddressCandidates".to_string()))
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("SingleLine".into(), "380 New York St, 92373, CA".into()),
                Matcher::UrlEncoded("f".into(), "json".into()),
                Matcher::UrlEncoded("maxLocations".into(), "1".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"spatialReference":{"wkid":4326},"candidates":[
                    {"address":"380 New York St, Redlands, California, 92373","location":{"x":-117.1956,"y":34.0564},"score":100},
                    {"address":"380 New York St","location":{"x":-1.0,"y":1.0},"score":80}
                ]}"#,
            )
            .create_async()
            .await;

        let lookup = provider_for(&server)
            .lookup("380 New York St, 92373, CA", &session())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(lookup, Lookup::Found(Coordinates::new(34.0564, -117.1956)));
    }

    #[tokio::test]
    async fn test_lookup_without_candidates_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", Matcher::Regex(r"^/findAddressCandidates".to_string()))
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let lookup = provider_for(&server)
            .lookup("nowhere at all", &session())
            .await
            .unwrap();

        assert_eq!(lookup, Lookup::NotFound);
    }

    #[tokio::test]
    async fn test_lookup_sends_token_when_configured() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Regex(r"^/findAddressCandidates".to_string()))
            .match_query(Matcher::UrlEncoded("token".into(), "secret-token".into()))
            .with_status(200)
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let provider = ArcGisProvider::new(&ArcGisConfig {
            base_url: server.url(),
            api_key: Some(secret_string("secret-token".to_string())),
        });
        provider.lookup("1 Main St", &session()).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_service_error_body_is_client_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", Matcher::Regex(r"^/findAddressCandidates".to_string()))
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"error":{"code":498,"message":"Invalid Token","details":[]}}"#)
            .create_async()
            .await;

        let err = provider_for(&server)
            .lookup("1 Main St", &session())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GeobatchError::Provider(ProviderError::ClientError { status: 498, .. })
        ));
    }

    #[tokio::test]
    async fn test_server_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", Matcher::Regex(r"^/findAddressCandidates".to_string()))
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("Service Unavailable")
            .create_async()
            .await;

        let err = provider_for(&server)
            .lookup("1 Main St", &session())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GeobatchError::Provider(ProviderError::ServerError { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_unreadable_body_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", Matcher::Regex(r"^/findAddressCandidates".to_string()))
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let err = provider_for(&server)
            .lookup("1 Main St", &session())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GeobatchError::Provider(ProviderError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn test_provider_name() {
        let provider = ArcGisProvider::new(&ArcGisConfig::default());
        assert_eq!(provider.name(), "arcgis");
        assert!(provider.candidates_url().ends_with("/GeocodeServer/findAddressCandidates"));
    }
}
