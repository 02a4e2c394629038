use crate::domain::model::FetchOutcome;
use crate::domain::ports::EventSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// WAHIS `all-information` endpoint, one request per event id.
pub struct HttpEventSource {
    client: Client,
    base_url: String,
}

impl HttpEventSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn event_url(&self, id: u32) -> String {
        format!(
            "{}/{}/all-information",
            self.base_url.trim_end_matches('/'),
            id
        )
    }
}

#[async_trait]
impl EventSource for HttpEventSource {
    async fn fetch(&self, id: u32) -> FetchOutcome {
        let url = self.event_url(id);
        tracing::debug!("Making API request to: {}", url);

        let response = match self
            .client
            .get(&url)
            .query(&[("language", "en")])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return FetchOutcome::NetworkError {
                    message: e.to_string(),
                }
            }
        };

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if status == StatusCode::BAD_REQUEST {
            return FetchOutcome::Skipped;
        }
        if !status.is_success() {
            return FetchOutcome::Error {
                status: status.as_u16(),
            };
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                return FetchOutcome::NetworkError {
                    message: e.to_string(),
                }
            }
        };

        FetchOutcome::Success(parse_body(&body))
    }
}

/// Empty bodies become `null`; bodies that are not JSON are kept as text.
fn parse_body(body: &[u8]) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn source(server: &MockServer) -> HttpEventSource {
        HttpEventSource::new(server.url("/pi/event/"), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_event_url_ignores_trailing_slash() {
        let source =
            HttpEventSource::new("https://wahis.example.org/event/", Duration::from_secs(1))
                .unwrap();
        assert_eq!(
            source.event_url(42),
            "https://wahis.example.org/event/42/all-information"
        );
    }

    #[tokio::test]
    async fn test_success_returns_payload() {
        let server = MockServer::start();
        let payload = json!({"event": {"eventId": 7}});
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/pi/event/7/all-information")
                .query_param("language", "en");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(payload.clone());
        });

        let outcome = source(&server).fetch(7).await;

        api_mock.assert();
        assert_eq!(outcome, FetchOutcome::Success(payload));
    }

    #[tokio::test]
    async fn test_bad_request_is_skipped() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/pi/event/3/all-information");
            then.status(400);
        });

        assert_eq!(source(&server).fetch(3).await, FetchOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_other_status_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/pi/event/4/all-information");
            then.status(503);
        });

        assert_eq!(
            source(&server).fetch(4).await,
            FetchOutcome::Error { status: 503 }
        );
    }

    #[tokio::test]
    async fn test_null_body_is_empty_success() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/pi/event/5/all-information");
            then.status(200)
                .header("Content-Type", "application/json")
                .body("null");
        });

        let outcome = source(&server).fetch(5).await;
        assert_eq!(outcome, FetchOutcome::Success(Value::Null));
        assert_eq!(outcome.into_payload(), None);
    }

    #[tokio::test]
    async fn test_empty_body_is_empty_success() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/pi/event/6/all-information");
            then.status(200);
        });

        let outcome = source(&server).fetch(6).await;
        assert_eq!(outcome, FetchOutcome::Success(Value::Null));
        assert_eq!(outcome.into_payload(), None);
    }

    #[tokio::test]
    async fn test_non_json_body_is_kept_as_text() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/pi/event/8/all-information");
            then.status(200)
                .header("Content-Type", "text/html")
                .body("<html>maintenance</html>");
        });

        let outcome = source(&server).fetch(8).await;
        assert_eq!(
            outcome,
            FetchOutcome::Success(json!("<html>maintenance</html>"))
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let source = HttpEventSource::new(
            format!("http://127.0.0.1:{}", port),
            Duration::from_millis(500),
        )
        .unwrap();

        let outcome = source.fetch(1).await;
        assert!(matches!(outcome, FetchOutcome::NetworkError { .. }));
    }
}
