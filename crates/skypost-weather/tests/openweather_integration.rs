//! Integration tests for OpenWeatherProvider using wiremock.

use skypost_weather::{observe, ObservationProvider, OpenWeatherProvider, WeatherError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to create a current weather body
fn weather_body(temp: f64, humidity: u8, description: &str) -> serde_json::Value {
    serde_json::json!({
        "coord": {"lon": 79.0882, "lat": 21.1458},
        "weather": [{"id": 721, "main": "Haze", "description": description, "icon": "50d"}],
        "main": {"temp": temp, "feels_like": temp + 2.0, "humidity": humidity, "pressure": 1009},
        "sys": {"country": "IN", "sunrise": 1760835000, "sunset": 1760877600},
        "timezone": 19800,
        "name": "Nagpur",
        "cod": 200
    })
}

/// Helper to create an air pollution body
fn pollution_body(pm25: Option<f64>) -> serde_json::Value {
    let mut components = serde_json::json!({"co": 290.4, "no2": 10.2, "pm10": 61.0});
    if let Some(pm25) = pm25 {
        components["pm2_5"] = serde_json::json!(pm25);
    }
    serde_json::json!({
        "coord": {"lon": 79.0882, "lat": 21.1458},
        "list": [{"main": {"aqi": 2}, "components": components, "dt": 1760850000}]
    })
}

fn provider(server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::with_base_url(&server.uri(), "test-key", "Nagpur", "IN").unwrap()
}

#[tokio::test]
async fn test_current_weather_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Nagpur,IN"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body(31.0, 45, "haze")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let reading = provider(&mock_server).current_weather().await.unwrap();

    assert_eq!(reading.temperature, 31.0);
    assert_eq!(reading.feels_like, Some(33.0));
    assert_eq!(reading.humidity, 45);
    assert_eq!(reading.condition, "haze");
    assert_eq!(reading.location.as_deref(), Some("Nagpur"));
}

#[tokio::test]
async fn test_current_weather_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key."
        })))
        .mount(&mock_server)
        .await;

    let result = provider(&mock_server).current_weather().await;

    match result {
        Err(WeatherError::Status { status, body }) => {
            assert_eq!(status, 401);
            assert!(body.contains("Invalid API key"), "body: {}", body);
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_current_weather_unparseable_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&mock_server)
        .await;

    let result = provider(&mock_server).current_weather().await;
    assert!(matches!(result, Err(WeatherError::Parse(_))));
}

#[tokio::test]
async fn test_current_weather_missing_field() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "coord": {"lon": 79.0, "lat": 21.0},
            "weather": [{"description": "haze"}],
            "main": {"temp": 30.0},
            "name": "Nagpur"
        })))
        .mount(&mock_server)
        .await;

    let result = provider(&mock_server).current_weather().await;
    assert!(matches!(
        result,
        Err(WeatherError::MissingField("main.humidity"))
    ));
}

#[tokio::test]
async fn test_observe_reuses_weather_coordinates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body(29.5, 60, "mist")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/air_pollution"))
        .and(query_param("lat", "21.1458"))
        .and(query_param("lon", "79.0882"))
        .and(query_param("appid", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pollution_body(Some(35.4))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let snapshot = observe(&provider(&mock_server), true).await.unwrap();

    assert_eq!(snapshot.temperature, 29.5);
    assert_eq!(snapshot.humidity, 60);
    assert_eq!(snapshot.pm25, Some(35.4));
    assert!(snapshot.provider_aqi.is_some());
}

#[tokio::test]
async fn test_observe_without_pollution_makes_one_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body(29.5, 60, "mist")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/air_pollution"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pollution_body(Some(10.0))))
        .expect(0)
        .mount(&mock_server)
        .await;

    let snapshot = observe(&provider(&mock_server), false).await.unwrap();
    assert!(snapshot.pm25.is_none());
}

#[tokio::test]
async fn test_observe_missing_pm25_degrades() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body(25.0, 50, "clear sky")))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/air_pollution"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pollution_body(None)))
        .mount(&mock_server)
        .await;

    let snapshot = observe(&provider(&mock_server), true).await.unwrap();
    assert!(snapshot.pm25.is_none());
    assert!(snapshot.provider_aqi.is_some());
}

#[tokio::test]
async fn test_observe_pollution_failure_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body(25.0, 50, "clear sky")))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/air_pollution"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let result = observe(&provider(&mock_server), true).await;
    assert!(matches!(result, Err(WeatherError::Status { status: 503, .. })));
}
