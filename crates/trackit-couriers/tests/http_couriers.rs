//! End-to-end tests for the HTTP couriers through `HttpFetcher`.
//!
//! Each test points one provider's configured endpoint at a local `wiremock`
//! server serving a saved page, so no real provider is contacted.

use trackit_core::{Provider, ShipmentStatus, TrackerConfig, TrackingNumber, TrackingReport};
use trackit_couriers::{FetchError, HttpFetcher, NoRenderEngine, TrackError, TrackingClient};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BLUEDART_DELIVERED: &str = include_str!("fixtures/bluedart_delivered.html");
const SKYNET_DELIVERED: &str = include_str!("fixtures/skynet_delivered.html");
const SKYNET_INVALID: &str = include_str!("fixtures/skynet_invalid.html");
const OVERNITE_DELIVERED: &str = include_str!("fixtures/overnite_delivered.html");
const ECOMM_DELIVERED: &str = include_str!("fixtures/ecomm_delivered.html");
const GATI_DELIVERED: &str = include_str!("fixtures/gati_delivered.xml");
const GATI_FAILED: &str = include_str!("fixtures/gati_failed.xml");

/// Client with a 5-second timeout and no render engine.
fn test_client(config: TrackerConfig) -> TrackingClient<HttpFetcher, NoRenderEngine> {
    let fetcher =
        HttpFetcher::new(5, "trackit-test/0.1", false).expect("failed to build test HttpFetcher");
    TrackingClient::new(config, fetcher, NoRenderEngine)
}

fn number(raw: &str) -> TrackingNumber {
    TrackingNumber::new(raw).unwrap()
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(body)
}

fn assert_sorted(report: &TrackingReport) {
    assert!(
        report
            .history()
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp),
        "history is not sorted: {:?}",
        report.history()
    );
}

// ---------------------------------------------------------------------------
// Blue Dart
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bluedart_posts_tracking_form_and_extracts_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/servlet/RoutingServlet"))
        .and(body_string_contains("numbers=50312345678"))
        .and(body_string_contains("action=awbquery"))
        .respond_with(html(BLUEDART_DELIVERED))
        .expect(1)
        .mount(&server)
        .await;

    let config = TrackerConfig {
        bluedart_url: format!("{}/servlet/RoutingServlet", server.uri()),
        ..TrackerConfig::default()
    };
    let report = test_client(config)
        .track(Provider::Bluedart, number("50312345678"))
        .await
        .unwrap();

    assert_eq!(report.status(), ShipmentStatus::Completed);
    assert_eq!(report.history().len(), 4);
    assert_sorted(&report);
}

#[tokio::test]
async fn page_with_returned_and_delivered_markers_is_returned_to_origin() {
    let server = MockServer::start().await;
    let returned = BLUEDART_DELIVERED.replace(
        "SHIPMENT OUT FOR DELIVERY",
        "Returned To Origin - SHIPMENT OUT FOR DELIVERY",
    );
    Mock::given(method("POST"))
        .and(path("/servlet/RoutingServlet"))
        .respond_with(html(&returned))
        .mount(&server)
        .await;

    let config = TrackerConfig {
        bluedart_url: format!("{}/servlet/RoutingServlet", server.uri()),
        ..TrackerConfig::default()
    };
    let report = test_client(config)
        .track(Provider::Bluedart, number("50312345678"))
        .await
        .unwrap();

    assert_eq!(report.status(), ShipmentStatus::ReturnedToOrigin);
}

// ---------------------------------------------------------------------------
// Skynet
// ---------------------------------------------------------------------------

#[tokio::test]
async fn skynet_sends_query_and_session_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ShipmentTrackSingle.aspx"))
        .and(query_param("textfield", "SB12345678"))
        .and(query_param("radiobutton", "SB"))
        .and(header("cookie", "ASP.NET_SessionId=test-session"))
        .respond_with(html(SKYNET_DELIVERED))
        .expect(1)
        .mount(&server)
        .await;

    let config = TrackerConfig {
        skynet_url: format!("{}/ShipmentTrackSingle.aspx", server.uri()),
        skynet_session_cookie: Some("ASP.NET_SessionId=test-session".to_string()),
        ..TrackerConfig::default()
    };
    let report = test_client(config)
        .track(Provider::Skynet, number("SB12345678"))
        .await
        .unwrap();

    assert_eq!(report.status(), ShipmentStatus::Completed);
    assert_eq!(report.history().len(), 4);
    assert_sorted(&report);
}

#[tokio::test]
async fn skynet_error_label_is_invalid_tracking_number() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ShipmentTrackSingle.aspx"))
        .respond_with(html(SKYNET_INVALID))
        .mount(&server)
        .await;

    let config = TrackerConfig {
        skynet_url: format!("{}/ShipmentTrackSingle.aspx", server.uri()),
        ..TrackerConfig::default()
    };
    let err = test_client(config)
        .track(Provider::Skynet, number("XX"))
        .await
        .unwrap_err();

    assert!(
        matches!(
            err,
            TrackError::InvalidTrackingNumber {
                provider: Provider::Skynet,
                ..
            }
        ),
        "expected InvalidTrackingNumber, got: {err:?}"
    );
}

// ---------------------------------------------------------------------------
// Overnite
// ---------------------------------------------------------------------------

#[tokio::test]
async fn overnite_posts_postback_with_referer_and_skips_holidays() {
    let server = MockServer::start().await;
    let url = format!("{}/Web-Track.aspx", server.uri());
    Mock::given(method("POST"))
        .and(path("/Web-Track.aspx"))
        .and(header("referer", url.as_str()))
        .and(body_string_contains("ctl00%24Content%24txtAWB=7301234567"))
        .and(body_string_contains("__VIEWSTATE=test-viewstate"))
        .respond_with(html(OVERNITE_DELIVERED))
        .expect(1)
        .mount(&server)
        .await;

    let config = TrackerConfig {
        overnite_url: url.clone(),
        overnite_viewstate: "test-viewstate".to_string(),
        ..TrackerConfig::default()
    };
    let report = test_client(config)
        .track(Provider::Overnite, number("7301234567"))
        .await
        .unwrap();

    assert_eq!(report.status(), ShipmentStatus::Completed);
    assert_eq!(report.history().len(), 2);
    assert_sorted(&report);
}

// ---------------------------------------------------------------------------
// Ecom Express
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ecomm_gets_results_page_by_awb() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/track_me/multipleawb_open/"))
        .and(query_param("awb", "701234567"))
        .and(query_param("news_go", "track now"))
        .respond_with(html(ECOMM_DELIVERED))
        .expect(1)
        .mount(&server)
        .await;

    let config = TrackerConfig {
        ecomm_url: format!("{}/track_me/multipleawb_open/", server.uri()),
        ..TrackerConfig::default()
    };
    let report = test_client(config)
        .track(Provider::Ecomm, number("701234567"))
        .await
        .unwrap();

    assert_eq!(report.status(), ShipmentStatus::Completed);
    assert_eq!(report.history().len(), 3);
    assert_sorted(&report);
}

// ---------------------------------------------------------------------------
// Gati
// ---------------------------------------------------------------------------

#[tokio::test]
async fn gati_reads_docket_xml() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/webservices/gatiicedkttrack.jsp"))
        .and(query_param("dktno", "300123456"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/xml")
                .set_body_string(GATI_DELIVERED),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = TrackerConfig {
        gati_url: format!("{}/webservices/gatiicedkttrack.jsp", server.uri()),
        ..TrackerConfig::default()
    };
    let report = test_client(config)
        .track(Provider::Gati, number("300123456"))
        .await
        .unwrap();

    assert_eq!(report.status(), ShipmentStatus::Completed);
    assert_eq!(report.history().len(), 4);
    assert_sorted(&report);
}

#[tokio::test]
async fn gati_failed_result_is_invalid_tracking_number() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/webservices/gatiicedkttrack.jsp"))
        .respond_with(ResponseTemplate::new(200).set_body_string(GATI_FAILED))
        .mount(&server)
        .await;

    let config = TrackerConfig {
        gati_url: format!("{}/webservices/gatiicedkttrack.jsp", server.uri()),
        ..TrackerConfig::default()
    };
    let err = test_client(config)
        .track(Provider::Gati, number("300000000"))
        .await
        .unwrap_err();

    assert!(
        matches!(err, TrackError::InvalidTrackingNumber { .. }),
        "expected InvalidTrackingNumber, got: {err:?}"
    );
}

// ---------------------------------------------------------------------------
// Transport failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn server_error_is_a_fetch_error_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = TrackerConfig {
        gati_url: format!("{}/webservices/gatiicedkttrack.jsp", server.uri()),
        ..TrackerConfig::default()
    };
    let err = test_client(config)
        .track(Provider::Gati, number("300123456"))
        .await
        .unwrap_err();

    assert!(
        matches!(
            err,
            TrackError::Fetch {
                provider: Provider::Gati,
                source: FetchError::UnexpectedStatus { status: 503, .. },
            }
        ),
        "expected Fetch(UnexpectedStatus), got: {err:?}"
    );
}

#[tokio::test]
async fn fetched_page_can_be_extracted_repeatedly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/webservices/gatiicedkttrack.jsp"))
        .respond_with(ResponseTemplate::new(200).set_body_string(GATI_DELIVERED))
        .expect(1)
        .mount(&server)
        .await;

    let config = TrackerConfig {
        gati_url: format!("{}/webservices/gatiicedkttrack.jsp", server.uri()),
        ..TrackerConfig::default()
    };
    let client = test_client(config);
    let mut tracker = client.tracker(Provider::Gati, number("300123456"));
    tracker.fetch_page().await.unwrap();

    let first = tracker.extract_checkpoints().unwrap();
    let second = tracker.extract_checkpoints().unwrap();
    assert_eq!(first, second);
}
