use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{entities::Coordinates, error::Error};

pub const NO_LOCATION_MESSAGE: &str = "Could not find location for the specified address.";
pub const UPSTREAM_MESSAGE: &str = "Could not reach the geocoding service, please try again.";

/// Resolves postal addresses to coordinates.
#[async_trait]
pub trait Geocoder {
    async fn resolve_address(&self, address: &str) -> Result<Coordinates, Error>;
}

pub type DynGeocoder = std::sync::Arc<dyn Geocoder + Send + Sync>;

/// LocationIQ forward-geocoding client.
///
/// One outbound request per call, no retries.
#[derive(Clone)]
pub struct LocationIq {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl LocationIq {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct SearchResult {
    status: Option<String>,
    lat: Option<Degrees>,
    lon: Option<Degrees>,
}

/// LocationIQ reports degrees as strings; accept plain numbers too.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Degrees {
    Number(f64),
    Text(String),
}

impl Degrees {
    fn value(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

fn no_location_error() -> Error {
    Error::unprocessable(NO_LOCATION_MESSAGE)
}

fn upstream_error() -> Error {
    Error::internal(UPSTREAM_MESSAGE)
}

#[async_trait]
impl Geocoder for LocationIq {
    #[tracing::instrument(skip(self))]
    async fn resolve_address(&self, address: &str) -> Result<Coordinates, Error> {
        let url = format!("{}/v1/search.php", self.base_url.trim_end_matches('/'));

        let res = self
            .client
            .get(url)
            .query(&[("key", self.api_key.as_str())])
            .query(&[("q", address)])
            .query(&[("format", "json")])
            .send()
            .await
            .map_err(|err| {
                tracing::error!(?err, "geocoding request failed");
                upstream_error()
            })?;

        let status_code = res.status().as_u16();

        if status_code == 404 {
            tracing::info!("no geocoding result");
            return Err(no_location_error());
        } else if status_code != 200 {
            tracing::error!(status_code, "geocoding provider returned an error");
            return Err(upstream_error());
        }

        let data: Vec<SearchResult> = res.json().await.map_err(|err| {
            tracing::error!(?err, "undecodable geocoding response");
            upstream_error()
        })?;

        let first = match data.into_iter().next() {
            Some(result) if result.status.as_deref() != Some("ZERO_RESULTS") => result,
            _ => return Err(no_location_error()),
        };

        let lat = first.lat.as_ref().and_then(Degrees::value);
        let lng = first.lon.as_ref().and_then(Degrees::value);

        match (lat, lng) {
            (Some(lat), Some(lng)) => Ok(Coordinates { lat, lng }),
            _ => {
                tracing::error!(?first, "geocoding result without usable coordinates");
                Err(upstream_error())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> LocationIq {
        LocationIq::new(server.uri(), "pk.test")
    }

    #[tokio::test]
    async fn resolves_first_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search.php"))
            .and(query_param("key", "pk.test"))
            .and(query_param("q", "1600 Amphitheatre Parkway"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "place_id": "1", "lat": "37.4", "lon": "-122.08" },
                { "place_id": "2", "lat": "0", "lon": "0" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let coordinates = client_for(&server)
            .await
            .resolve_address("1600 Amphitheatre Parkway")
            .await
            .unwrap();

        assert_eq!(
            coordinates,
            Coordinates {
                lat: 37.4,
                lng: -122.08
            }
        );
    }

    #[tokio::test]
    async fn accepts_numeric_degrees() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search.php"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{ "lat": 51.5, "lon": -0.12 }])),
            )
            .mount(&server)
            .await;

        let coordinates = client_for(&server).await.resolve_address("London").await.unwrap();

        assert_eq!(coordinates, Coordinates { lat: 51.5, lng: -0.12 });
    }

    #[tokio::test]
    async fn empty_result_is_unprocessable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search.php"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let err = client_for(&server).await.resolve_address("nowhere").await.unwrap_err();

        assert_eq!(err.code, 422);
        assert_eq!(err.message, NO_LOCATION_MESSAGE);
    }

    #[tokio::test]
    async fn zero_results_status_is_unprocessable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search.php"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{ "status": "ZERO_RESULTS" }])),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).await.resolve_address("nowhere").await.unwrap_err();

        assert_eq!(err.code, 422);
    }

    #[tokio::test]
    async fn not_found_is_unprocessable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search.php"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "error": "Unable to geocode" })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).await.resolve_address("nowhere").await.unwrap_err();

        assert_eq!(err.code, 422);
        assert_eq!(err.message, NO_LOCATION_MESSAGE);
    }

    #[tokio::test]
    async fn provider_failure_is_internal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search.php"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid key" })))
            .mount(&server)
            .await;

        let err = client_for(&server).await.resolve_address("anywhere").await.unwrap_err();

        assert_eq!(err.code, 500);
        assert_eq!(err.message, UPSTREAM_MESSAGE);
    }

    #[tokio::test]
    async fn garbage_body_is_internal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search.php"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.resolve_address("anywhere").await.unwrap_err();

        assert_eq!(err.code, 500);
    }

    #[tokio::test]
    async fn unreachable_provider_is_internal() {
        let err = LocationIq::new("http://127.0.0.1:1", "pk.test")
            .resolve_address("anywhere")
            .await
            .unwrap_err();

        assert_eq!(err.code, 500);
    }
}
