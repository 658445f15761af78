use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use url::Url;

use crate::configuration::SubscriptionConfig;
use crate::domain::{SubscriptionRequest, SubscriptionResult};

/// A client for the email-marketing service that owns our mailing list.
pub struct SubscriptionClient {
    http_client: Client,
    base_url: Url,
}

/// Ways forwarding a subscription can fail.
#[derive(thiserror::Error, Debug)]
pub enum SubscribeError {
    #[error("Failed to encode the subscription request")]
    Encode(#[source] serde_json::Error),
    #[error("Failed to reach the subscription service")]
    Transport(#[source] reqwest::Error),
    #[error("Failed to subscribe {}: {status}", display_email(.email))]
    Rejected {
        email: Option<serde_json::Value>,
        status: StatusCode,
    },
    #[error("Failed to read the subscription service's response")]
    ResponseBody(#[source] reqwest::Error),
    #[error("The subscription service returned a body that is not JSON")]
    InvalidResponse(#[source] serde_json::Error),
}

fn display_email(email: &Option<serde_json::Value>) -> String {
    match email {
        Some(serde_json::Value::String(email)) => email.clone(),
        Some(other) => other.to_string(),
        None => "<no email>".into(),
    }
}

impl SubscriptionClient {
    /// Creates a client. `base_url` is the root of the service's API; form
    /// subscriptions are posted below it.
    pub fn new(base_url: Url) -> Self {
        Self {
            http_client: Client::new(),
            base_url,
        }
    }

    /// The endpoint that adds a subscriber to the form identified by `form_id`.
    fn subscribe_url(&self, form_id: &str) -> String {
        format!(
            "{}/forms/{}/subscribe",
            self.base_url.as_str().trim_end_matches('/'),
            form_id
        )
    }

    /// Asks the service to add `request`'s email to the configured form.
    ///
    /// Returns the service's JSON response, byte for byte, when it answers with a 2xx
    /// status. Any other status is an `Err`, as is failing to talk to the service at
    /// all. No timeout or retry is applied.
    pub async fn subscribe(
        &self,
        config: &SubscriptionConfig,
        request: &SubscriptionRequest,
    ) -> Result<SubscriptionResult, SubscribeError> {
        let body = SubscribeRequest {
            api_key: config.api_key.expose_secret(),
            email: request.email(),
        };
        let body = serde_json::to_vec(&body).map_err(SubscribeError::Encode)?;

        let response = self
            .http_client
            .post(self.subscribe_url(&config.form_id))
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(SubscribeError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubscribeError::Rejected {
                email: request.email().cloned(),
                status,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(SubscribeError::ResponseBody)?;

        SubscriptionResult::parse(body.to_vec()).map_err(SubscribeError::InvalidResponse)
    }
}

/// The body of a form subscription request. `email` is left out entirely when the
/// caller did not provide one, and is otherwise sent as received, `null` included.
#[derive(Serialize)]
struct SubscribeRequest<'a> {
    api_key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a serde_json::Value>,
}
