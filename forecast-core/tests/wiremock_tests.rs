//! Integration tests for the Google and Dark Sky clients using WireMock.
//!
//! The provider HTTP APIs are mocked so the full pipeline can run without
//! network access or real API keys.

use chrono::{TimeZone, Utc};
use forecast_core::{
    Coordinates, ForecastError, ForecastService, Geocoder, TemperatureUnit, WeatherSource,
    provider::{darksky::DarkSkyProvider, google::GoogleGeocoder},
};
use std::sync::Arc;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

// =============================================================================
// Test Helpers
// =============================================================================

const GEOCODE_PATH: &str = "/maps/api/geocode/json";
const JAN_1_2024: i64 = 1_704_067_200;

fn geocoder_for(server: &MockServer) -> GoogleGeocoder {
    GoogleGeocoder::with_base_url("GKEY".into(), format!("{}{GEOCODE_PATH}", server.uri()))
}

fn weather_for(server: &MockServer) -> DarkSkyProvider {
    DarkSkyProvider::with_base_url("DKEY".into(), format!("{}/forecast", server.uri()))
}

fn springfield() -> Coordinates {
    Coordinates {
        latitude: 39.78,
        longitude: -89.65,
        display_name: "Springfield, IL, USA".into(),
    }
}

fn geocode_response(address: &str) -> serde_json::Value {
    serde_json::json!({
        "results": [{
            "formatted_address": address,
            "geometry": { "location": { "lat": 39.78, "lng": -89.65 } }
        }],
        "status": "OK"
    })
}

fn forecast_response(days: usize) -> serde_json::Value {
    let data: Vec<_> = (0..days)
        .map(|i| {
            serde_json::json!({
                "time": JAN_1_2024 + i as i64 * 86_400,
                "summary": format!("Summary {i}"),
                "icon": "rain",
                "temperatureHigh": 12.5,
                "temperatureLow": 3.2,
                "apparentTemperatureHigh": 11.4,
                "precipProbability": 0.567,
                "humidity": 0.004
            })
        })
        .collect();

    serde_json::json!({
        "currently": {
            "temperature": 9.6,
            "apparentTemperature": 7.5,
            "precipProbability": 0.3,
            "humidity": 0.91,
            "windSpeed": 4.4,
            "icon": "rain"
        },
        "daily": { "summary": "Rain throughout the week.", "data": data }
    })
}

// =============================================================================
// Geocoder
// =============================================================================

mod geocoder_tests {
    use super::*;

    #[tokio::test]
    async fn resolves_first_result_and_strips_zip() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(GEOCODE_PATH))
            .and(query_param("address", "Springfield IL"))
            .and(query_param("key", "GKEY"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(geocode_response("Springfield, IL 62701, USA")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let coords = geocoder_for(&server).resolve("Springfield IL").await.unwrap();

        assert_eq!(coords.latitude, 39.78);
        assert_eq!(coords.longitude, -89.65);
        assert_eq!(coords.display_name, "Springfield, IL, USA");
    }

    #[tokio::test]
    async fn empty_results_is_location_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(GEOCODE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [],
                "status": "ZERO_RESULTS"
            })))
            .mount(&server)
            .await;

        let err = geocoder_for(&server).resolve("nowhere at all").await.unwrap_err();
        assert_eq!(err, ForecastError::LocationNotFound);
        assert_eq!(err.to_string(), "That location could not be found.");
    }

    #[tokio::test]
    async fn server_error_is_location_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(GEOCODE_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let err = geocoder_for(&server).resolve("Paris").await.unwrap_err();
        assert_eq!(err, ForecastError::LocationNotFound);
    }

    #[tokio::test]
    async fn garbage_body_is_location_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(GEOCODE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = geocoder_for(&server).resolve("Paris").await.unwrap_err();
        assert_eq!(err, ForecastError::LocationNotFound);
    }
}

// =============================================================================
// Weather source
// =============================================================================

mod weather_tests {
    use super::*;

    #[tokio::test]
    async fn celsius_requests_si_units() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast/DKEY/39.78,-89.65"))
            .and(query_param("units", "si"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_response(8)))
            .expect(1)
            .mount(&server)
            .await;

        let fields = weather_for(&server)
            .fetch(&springfield(), TemperatureUnit::Celsius)
            .await
            .unwrap();

        assert_eq!(fields.temp_unit.label(), "C");
        assert_eq!(fields.today.temperature, 10);
        assert_eq!(fields.today.apparent_temperature, 8);
        assert_eq!(fields.today.humidity, 91);
        assert_eq!(fields.today.precip_probability, 30);
        assert_eq!(fields.today.high, 13);
        assert_eq!(fields.today.low, 3);
        assert_eq!(fields.week_summary, "Rain throughout the week.");

        assert_eq!(fields.days.len(), 5);
        assert_eq!(fields.days[0].summary, "Summary 1");
        assert_eq!(fields.days[4].summary, "Summary 5");
        assert_eq!(fields.days[0].precip_probability, 57);
        assert_eq!(fields.days[0].humidity, 0);
    }

    #[tokio::test]
    async fn fahrenheit_uses_default_units() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast/DKEY/39.78,-89.65"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_response(6)))
            .mount(&server)
            .await;

        let fields = weather_for(&server)
            .fetch(&springfield(), TemperatureUnit::Fahrenheit)
            .await
            .unwrap();

        assert_eq!(fields.temp_unit.label(), "F");

        let requests = server.received_requests().await.expect("recording enabled");
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url.query(), None);
    }

    #[tokio::test]
    async fn short_daily_list_is_forecast_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast/DKEY/39.78,-89.65"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_response(5)))
            .mount(&server)
            .await;

        let err = weather_for(&server)
            .fetch(&springfield(), TemperatureUnit::Celsius)
            .await
            .unwrap_err();

        assert_eq!(err, ForecastError::ForecastUnavailable);
        assert_eq!(err.to_string(), "The forecast was unable to be retrieved.");
    }

    #[tokio::test]
    async fn forbidden_is_forecast_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("daily usage limit exceeded"))
            .mount(&server)
            .await;

        let err = weather_for(&server)
            .fetch(&springfield(), TemperatureUnit::Celsius)
            .await
            .unwrap_err();

        assert_eq!(err, ForecastError::ForecastUnavailable);
    }
}

// =============================================================================
// Full pipeline
// =============================================================================

mod pipeline_tests {
    use super::*;

    fn service_for(server: &MockServer) -> ForecastService {
        ForecastService::new(Arc::new(geocoder_for(server)), Arc::new(weather_for(server)))
    }

    #[tokio::test]
    async fn builds_complete_forecast() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(GEOCODE_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(geocode_response("Springfield, IL 62701, USA")),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast/DKEY/39.78,-89.65"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_response(8)))
            .mount(&server)
            .await;

        let now = Utc.with_ymd_and_hms(2024, 1, 1, 13, 5, 0).unwrap();
        let result = service_for(&server)
            .forecast_at("Springfield IL", TemperatureUnit::Celsius, now)
            .await
            .unwrap();

        assert_eq!(result.place_name, "Springfield, IL, USA");
        assert_eq!(result.temp_unit, "C");
        assert_eq!(result.today.current_time, "1:05 PM");
        assert_eq!(result.today.current_date, "MON JAN 01 2024");
        assert_eq!(result.days[0].day_of_week, "Tue");
        assert_eq!(result.days[0].date, "Jan 02");
        assert_eq!(result.days[4].date, "Jan 06");

        let json = serde_json::to_value(&result).unwrap();
        assert!(json["days"][0].get("time").is_none());
        assert_eq!(json["today"]["temperature"], 10);
    }

    #[tokio::test]
    async fn geocoder_failure_never_calls_weather_provider() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(GEOCODE_PATH))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast/DKEY/39.78,-89.65"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_response(8)))
            .expect(0)
            .mount(&server)
            .await;

        let err = service_for(&server)
            .forecast("Springfield IL", TemperatureUnit::Celsius)
            .await
            .unwrap_err();

        assert_eq!(err, ForecastError::LocationNotFound);
    }

    #[tokio::test]
    async fn repeated_runs_are_identical() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(GEOCODE_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(geocode_response("1 Yonge St, Toronto, ON M5E 1E5, Canada")),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast/DKEY/39.78,-89.65"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_response(7)))
            .expect(2)
            .mount(&server)
            .await;

        let service = service_for(&server);
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let first = service
            .forecast_at("Toronto", TemperatureUnit::Fahrenheit, now)
            .await
            .unwrap();
        let second = service
            .forecast_at("Toronto", TemperatureUnit::Fahrenheit, now)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first.place_name, "1 Yonge St, Toronto, ON, Canada");
        assert_eq!(first.today.current_time, "0:00 AM");
    }
}
