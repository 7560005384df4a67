use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};

use crate::{
    config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS},
    error::{HttpErrorKind, WeatherError},
    model::{Coordinates, WeatherSnapshot},
    units::UnitSystem,
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

#[derive(Debug)]
pub struct OpenWeatherBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl OpenWeatherBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<OpenWeatherProvider, WeatherError> {
        let http = Client::builder().timeout(self.timeout).build()?;

        Ok(OpenWeatherProvider {
            api_key: self.api_key,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }
}

impl OpenWeatherProvider {
    pub fn builder(api_key: impl Into<String>) -> OpenWeatherBuilder {
        OpenWeatherBuilder {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/weather", self.base_url)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_current(
        &self,
        coordinates: Coordinates,
        units: UnitSystem,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let url = self.endpoint();
        debug!(%url, lat = coordinates.latitude, lon = coordinates.longitude, %units, "requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", coordinates.latitude.to_string()),
                ("lon", coordinates.longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", units.as_str().to_string()),
            ])
            .send()
            .await
            .inspect_err(|e| error!(error = %e, "OpenWeather request failed"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .inspect_err(|e| error!(error = %e, "Failed to read OpenWeather response body"))?;

        if !status.is_success() {
            let kind = HttpErrorKind::from_status(status.as_u16());
            error!(status = status.as_u16(), %kind, body = %truncate_body(&body), "OpenWeather returned an error");
            return Err(WeatherError::Http { status: status.as_u16(), kind });
        }

        WeatherSnapshot::from_json(&body)
            .inspect_err(|e| error!(error = %e, "Failed to parse OpenWeather current JSON"))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn london_json() -> serde_json::Value {
        serde_json::json!({
            "coord": {"lon": -0.12, "lat": 51.5},
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "main": {"temp": 15.0, "pressure": 1012, "humidity": 72, "temp_min": 13.0, "temp_max": 16.0},
            "wind": {"speed": 4.1, "deg": 250},
            "clouds": {"all": 0},
            "dt": 1700010000,
            "sys": {"country": "GB", "sunrise": 1700000000, "sunset": 1700030000},
            "id": 2643743,
            "name": "London",
            "cod": 200
        })
    }

    fn provider(server: &MockServer) -> OpenWeatherProvider {
        OpenWeatherProvider::builder("TEST_KEY")
            .base_url(server.uri())
            .build()
            .expect("client builds")
    }

    #[tokio::test]
    async fn sends_query_and_parses_snapshot() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("lat", "51.5"))
            .and(query_param("lon", "-0.12"))
            .and(query_param("appid", "TEST_KEY"))
            .and(query_param("units", "imperial"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london_json()))
            .expect(1)
            .mount(&server)
            .await;

        let snapshot = provider(&server)
            .fetch_current(Coordinates::new(51.5, -0.12), UnitSystem::Imperial)
            .await
            .expect("fetch succeeds");

        assert_eq!(snapshot.location_name, "London");
        assert_eq!(snapshot.system.country, "GB");
        assert_eq!(snapshot.conditions[0].icon, "01d");
    }

    #[tokio::test]
    async fn classifies_bad_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(400).set_body_string("{\"cod\":\"400\"}"))
            .mount(&server)
            .await;

        let err = provider(&server)
            .fetch_current(Coordinates::new(0.0, 0.0), UnitSystem::Metric)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WeatherError::Http { status: 400, kind: HttpErrorKind::BadRequest }
        ));
    }

    #[tokio::test]
    async fn classifies_not_found_and_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("units", "imperial"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let p = provider(&server);
        let here = Coordinates::new(1.0, 2.0);

        let not_found = p.fetch_current(here, UnitSystem::Metric).await.unwrap_err();
        assert!(matches!(not_found, WeatherError::Http { status: 404, .. }));

        let server_err = p.fetch_current(here, UnitSystem::Imperial).await.unwrap_err();
        assert!(matches!(
            server_err,
            WeatherError::Http { status: 502, kind: HttpErrorKind::Server }
        ));
    }

    #[tokio::test]
    async fn malformed_body_is_deserialization_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"name": "London"})),
            )
            .mount(&server)
            .await;

        let err = provider(&server)
            .fetch_current(Coordinates::new(51.5, -0.12), UnitSystem::Metric)
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::Deserialization(_)));
    }

    #[tokio::test]
    async fn timeout_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(london_json())
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let p = OpenWeatherProvider::builder("TEST_KEY")
            .base_url(server.uri())
            .timeout(Duration::from_millis(100))
            .build()
            .expect("client builds");

        let err = p
            .fetch_current(Coordinates::new(51.5, -0.12), UnitSystem::Metric)
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::Transport(_)));
    }

    #[test]
    fn truncates_long_bodies() {
        let long = "x".repeat(300);
        let t = truncate_body(&long);
        assert_eq!(t.len(), 203);
        assert!(t.ends_with("..."));
        assert_eq!(truncate_body("short"), "short");
    }
}
