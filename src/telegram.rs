use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Where notifications go: bot credential plus destination chat.
#[derive(Debug)]
pub struct TelegramTarget {
    pub api_base: String,
    pub token: Secret<String>,
    pub chat_id: String,
}

impl TelegramTarget {
    fn send_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            self.token.expose_secret()
        )
    }
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("telegram request failed")]
    Transport(#[source] reqwest::Error),
    #[error("telegram API responded with HTTP {status}: {description}")]
    Status {
        status: StatusCode,
        description: String,
    },
}

/// Error envelope returned by the Bot API on failure.
#[derive(Deserialize)]
struct ApiError {
    description: Option<String>,
}

pub struct DeliverySummary {
    pub sent: usize,
    pub failed: usize,
}

/// Post one message. Anything other than HTTP 200 is a failure.
pub async fn send(
    client: &Client,
    target: &TelegramTarget,
    message: &str,
) -> Result<(), DeliveryError> {
    // Strip the URL from transport errors, it carries the bot token.
    let res = client
        .post(target.send_url())
        .form(&[("chat_id", target.chat_id.as_str()), ("text", message)])
        .send()
        .await
        .map_err(|e| DeliveryError::Transport(e.without_url()))?;

    let status = res.status();
    if status == StatusCode::OK {
        return Ok(());
    }

    let body = res.text().await.unwrap_or_default();
    let description = serde_json::from_str::<ApiError>(&body)
        .ok()
        .and_then(|e| e.description)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("no description").to_string());

    Err(DeliveryError::Status {
        status,
        description,
    })
}

/// Send every message in order; a failed send is logged and the rest
/// are still attempted.
pub async fn deliver_all<'a>(
    client: &Client,
    target: &TelegramTarget,
    messages: impl IntoIterator<Item = &'a str>,
) -> DeliverySummary {
    let mut summary = DeliverySummary { sent: 0, failed: 0 };

    for message in messages {
        match send(client, target, message).await {
            Ok(()) => {
                summary.sent += 1;
                info!("Sent Telegram notification:\n{}", message);
            }
            Err(e) => {
                summary.failed += 1;
                warn!("Failed to send Telegram notification: {:#}", anyhow::Error::from(e));
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn target(server: &MockServer) -> TelegramTarget {
        TelegramTarget {
            api_base: server.base_url(),
            token: Secret::new("test-token".to_string()),
            chat_id: "42".to_string(),
        }
    }

    #[test]
    fn token_is_not_in_debug_output() {
        let t = TelegramTarget {
            api_base: DEFAULT_API_BASE.to_string(),
            token: Secret::new("super-secret".to_string()),
            chat_id: "1".to_string(),
        };
        assert!(!format!("{:?}", t).contains("super-secret"));
        assert_eq!(
            t.send_url(),
            "https://api.telegram.org/botsuper-secret/sendMessage"
        );
    }

    #[tokio::test]
    async fn posts_form_to_bot_endpoint() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/bottest-token/sendMessage")
                    .header("content-type", "application/x-www-form-urlencoded")
                    .body_contains("chat_id=42")
                    .body_contains("text=hello");
                then.status(200).body(r#"{"ok":true}"#);
            })
            .await;

        send(&Client::new(), &target(&server), "hello").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_200_carries_status_and_description() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/bottest-token/sendMessage");
                then.status(400).body(
                    r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#,
                );
            })
            .await;

        let err = send(&Client::new(), &target(&server), "hello")
            .await
            .unwrap_err();
        match err {
            DeliveryError::Status {
                status,
                description,
            } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(description, "Bad Request: chat not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn one_failure_does_not_stop_the_rest() {
        let server = MockServer::start_async().await;
        let failing = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/bottest-token/sendMessage")
                    .body_contains("text=first");
                then.status(500);
            })
            .await;
        let ok = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/bottest-token/sendMessage")
                    .body_contains("text=second");
                then.status(200);
            })
            .await;

        let summary = deliver_all(&Client::new(), &target(&server), ["first", "second"]).await;

        failing.assert_async().await;
        ok.assert_async().await;
        assert_eq!(summary.sent, 1);
        assert_eq!(summary.failed, 1);
    }
}
