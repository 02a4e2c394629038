use httpmock::prelude::*;
use serde_json::{json, Value};
use std::time::Duration;
use tempfile::TempDir;
use wahis_etl::{Fetcher, HttpEventSource, LocalStorage};

fn event(id: u32) -> Value {
    json!({
        "event": {"eventId": id, "country": {"name": "Kenya", "isoCode": "KEN"}},
        "outbreaks": [{"adminDivision": "Nakuru"}]
    })
}

#[tokio::test]
async fn test_fetch_range_classifies_and_keeps_only_successes() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();

    let ok_1 = server.mock(|when, then| {
        when.method(GET)
            .path("/api/event/1/all-information")
            .query_param("language", "en");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(event(1));
    });
    let invalid_2 = server.mock(|when, then| {
        when.method(GET).path("/api/event/2/all-information");
        then.status(400);
    });
    let failing_3 = server.mock(|when, then| {
        when.method(GET).path("/api/event/3/all-information");
        then.status(500);
    });
    let slow_4 = server.mock(|when, then| {
        when.method(GET).path("/api/event/4/all-information");
        then.status(200)
            .delay(Duration::from_millis(1500))
            .json_body(event(4));
    });
    let ok_5 = server.mock(|when, then| {
        when.method(GET).path("/api/event/5/all-information");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(event(5));
    });

    let source =
        HttpEventSource::new(server.url("/api/event"), Duration::from_millis(500)).unwrap();
    let fetcher = Fetcher::new(
        source,
        LocalStorage::new(temp_dir.path()),
        "src/func/data.json",
    );

    let report = fetcher.run(1..=5, Duration::ZERO).await.unwrap();

    ok_1.assert_hits(1);
    invalid_2.assert_hits(1);
    failing_3.assert_hits(1);
    slow_4.assert_hits(1);
    ok_5.assert_hits(1);

    assert_eq!(report.attempted, 5);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.errors, 1);
    assert_eq!(report.network_errors, 1);

    let written =
        std::fs::read_to_string(temp_dir.path().join("src/func/data.json")).unwrap();
    let dataset: Vec<Value> = serde_json::from_str(&written).unwrap();
    assert_eq!(dataset, vec![event(1), event(5)]);
    assert_eq!(written, serde_json::to_string_pretty(&dataset).unwrap());
}

#[tokio::test]
async fn test_fetch_overwrites_previous_output() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("data.json");
    std::fs::write(&output, "[{\"stale\": true}]").unwrap();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/1/all-information");
        then.status(404);
    });

    let source = HttpEventSource::new(server.base_url(), Duration::from_secs(5)).unwrap();
    let fetcher = Fetcher::new(source, LocalStorage::new(temp_dir.path()), "data.json");

    let report = fetcher.run(1..=1, Duration::ZERO).await.unwrap();

    assert_eq!(report.errors, 1);
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "[]");
}
