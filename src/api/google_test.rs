use crate::api::GoogleApiClient;
use crate::error::AppError;
use crate::models::{AqiIndexInfo, Concentration, CurrentConditionsResponse, PollutantInfo};
use chrono::{TimeZone, Utc};
use mockito::Matcher;
use serde_json::json;

const API_KEY: &str = "test_key";
const LAT: f64 = 52.37;
const LON: f64 = 4.89;

/// Client whose air quality calls hit the mock server; the pollen base URL
/// points nowhere because these tests never use it (and vice versa).
fn air_client(server: &mockito::Server) -> GoogleApiClient {
    GoogleApiClient::with_base_urls(API_KEY.to_string(), &server.url(), "http://127.0.0.1:1")
        .expect("client should build")
}

fn pollen_client(server: &mockito::Server) -> GoogleApiClient {
    GoogleApiClient::with_base_urls(API_KEY.to_string(), "http://127.0.0.1:1", &server.url())
        .expect("client should build")
}

#[tokio::test]
async fn current_conditions_success() {
    let mut server = mockito::Server::new_async().await;
    let client = air_client(&server);

    let body = CurrentConditionsResponse {
        date_time: Some("2024-05-01T12:00:00Z".to_string()),
        region_code: Some("nl".to_string()),
        indexes: Some(vec![AqiIndexInfo {
            code: "uaqi".to_string(),
            aqi: Some(71),
            category: Some("Good air quality".to_string()),
            dominant_pollutant: Some("o3".to_string()),
            ..Default::default()
        }]),
        pollutants: Some(vec![PollutantInfo {
            code: "pm25".to_string(),
            concentration: Some(Concentration {
                value: Some(12.3),
                units: Some("MICROGRAMS_PER_CUBIC_METER".to_string()),
            }),
            ..Default::default()
        }]),
    };

    let mock = server
        .mock("POST", "/v1/currentConditions:lookup")
        .match_query(Matcher::UrlEncoded("key".into(), API_KEY.into()))
        .match_body(Matcher::PartialJson(json!({
            "location": {"latitude": LAT, "longitude": LON}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(serde_json::to_string(&body).unwrap())
        .create_async()
        .await;

    let resp = client
        .current_conditions(LAT, LON)
        .await
        .expect("call should succeed");

    mock.assert_async().await;
    assert_eq!(resp.region_code.as_deref(), Some("nl"));
    let pollutants = resp.pollutants.unwrap();
    assert_eq!(pollutants[0].code, "pm25");
    assert_eq!(
        pollutants[0].concentration.as_ref().unwrap().value,
        Some(12.3)
    );
}

#[tokio::test]
async fn current_conditions_http_error_is_typed() {
    let mut server = mockito::Server::new_async().await;
    let client = air_client(&server);

    let _mock = server
        .mock("POST", "/v1/currentConditions:lookup")
        .match_query(Matcher::UrlEncoded("key".into(), API_KEY.into()))
        .with_status(403)
        .with_body(r#"{"error": {"message": "API key invalid"}}"#)
        .create_async()
        .await;

    let err = client.current_conditions(LAT, LON).await.unwrap_err();
    match err {
        AppError::UpstreamStatus { status, body } => {
            assert_eq!(status, 403);
            assert!(body.contains("API key invalid"));
        },
        other => panic!("Expected UpstreamStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn connection_failure_is_transport_error() {
    // Nothing listens on port 1.
    let client =
        GoogleApiClient::with_base_urls(API_KEY.to_string(), "http://127.0.0.1:1", "http://127.0.0.1:1")
            .expect("client should build");

    let err = client.current_conditions(LAT, LON).await.unwrap_err();
    assert!(matches!(err, AppError::Transport(_)));
}

#[tokio::test]
async fn air_forecast_window_starts_at_next_full_hour() {
    let mut server = mockito::Server::new_async().await;
    let client = air_client(&server);
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 17, 23).unwrap();

    let mock = server
        .mock("POST", "/v1/forecast:lookup")
        .match_query(Matcher::UrlEncoded("key".into(), API_KEY.into()))
        .match_body(Matcher::PartialJson(json!({
            "universalAqi": "true",
            "period": {
                "startTime": "2024-05-01T11:00:00Z",
                "endTime": "2024-05-02T11:00:00Z"
            },
            "languageCode": "en",
            "uaqiColorPalette": "RED_GREEN"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "hourlyForecasts": [
                    {
                        "dateTime": "2024-05-01T11:00:00Z",
                        "indexes": [{"code": "uaqi", "aqi": 64, "dominantPollutant": "pm25"}]
                    }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let resp = client
        .air_forecast(LAT, LON, now, 24)
        .await
        .expect("call should succeed");

    mock.assert_async().await;
    let hours = resp.hourly_forecasts.unwrap();
    assert_eq!(hours.len(), 1);
    assert_eq!(hours[0].indexes.as_ref().unwrap()[0].aqi, Some(64));
}

#[tokio::test]
async fn pollen_forecast_sends_fixed_five_day_window() {
    let mut server = mockito::Server::new_async().await;
    let client = pollen_client(&server);

    let mock = server
        .mock("GET", "/v1/forecast:lookup")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("key".into(), API_KEY.into()),
            Matcher::UrlEncoded("location.latitude".into(), LAT.to_string()),
            Matcher::UrlEncoded("location.longitude".into(), LON.to_string()),
            Matcher::UrlEncoded("days".into(), "5".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "dailyInfo": [
                    {
                        "date": {"year": 2024, "month": 5, "day": 1},
                        "pollenTypeInfo": [
                            {"code": "GRASS", "indexInfo": {"value": 2.0}},
                            {"code": "TREE", "indexInfo": {"value": 4.0}}
                        ]
                    }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let resp = client
        .pollen_forecast(LAT, LON)
        .await
        .expect("call should succeed");

    mock.assert_async().await;
    let days = resp.daily_info.unwrap();
    assert_eq!(days.len(), 1);
    let info = days[0].pollen_type_info.as_ref().unwrap();
    assert_eq!(info[0].code, "GRASS");
    assert_eq!(info[0].index_info.as_ref().unwrap().value, Some(2.0));
}

#[tokio::test]
async fn pollen_forecast_http_error_is_typed() {
    let mut server = mockito::Server::new_async().await;
    let client = pollen_client(&server);

    let _mock = server
        .mock("GET", "/v1/forecast:lookup")
        .match_query(Matcher::UrlEncoded("key".into(), API_KEY.into()))
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let err = client.pollen_forecast(LAT, LON).await.unwrap_err();
    assert!(matches!(err, AppError::UpstreamStatus { status: 500, .. }));
}
