use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{post, web, HttpResponse, ResponseError};
use serde::Serialize;

use crate::configuration::CredentialSource;
use crate::domain::{SubscriptionRequest, SubscriptionResult};
use crate::subscription_client::{SubscribeError, SubscriptionClient};

/// The only message callers ever see when a subscription fails.
pub const FAILURE_MESSAGE: &str = "Failed to subscribe user";

/// Anything that stops an email from being captured. Callers get the same
/// generic response for all of them; the detail only goes to the logs.
#[derive(thiserror::Error)]
pub enum EmailCaptureError {
    #[error("Failed to read the request body: {0}")]
    UnreadableBody(String),
    #[error("The request body is not a JSON object")]
    MalformedRequest(#[source] serde_json::Error),
    #[error(transparent)]
    Subscribe(#[from] SubscribeError),
}

impl std::fmt::Debug for EmailCaptureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(Serialize)]
struct FailureBody {
    message: &'static str,
}

impl ResponseError for EmailCaptureError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(FailureBody {
            message: FAILURE_MESSAGE,
        })
    }
}

/// Forwards the email in the request body to the subscription service.
///
/// Responds with the service's JSON body, unchanged, when it accepts the
/// subscription, and a generic 500 otherwise. A body actix could not read (e.g. one
/// over the payload size limit) also gets the 500.
#[tracing::instrument(
    name = "Capturing an email subscription",
    skip(body, client, credentials),
    fields(subscriber_email = tracing::field::Empty)
)]
#[post("/api/emailCapture")]
pub async fn email_capture(
    body: Result<web::Bytes, actix_web::Error>,
    client: web::Data<SubscriptionClient>,
    credentials: web::Data<CredentialSource>,
) -> Result<HttpResponse, EmailCaptureError> {
    let outcome = match body {
        Ok(body) => forward_subscription(&body, &client, &credentials).await,
        Err(err) => Err(EmailCaptureError::UnreadableBody(err.to_string())),
    };

    outcome
        .map(|data| {
            HttpResponse::Ok()
                .content_type(ContentType::json())
                .body(data.into_bytes())
        })
        .map_err(|err| {
            tracing::error!(
                error.cause_chain = ?err,
                error.message = %err,
                "Failed to subscribe user"
            );
            err
        })
}

async fn forward_subscription(
    body: &[u8],
    client: &SubscriptionClient,
    credentials: &CredentialSource,
) -> Result<SubscriptionResult, EmailCaptureError> {
    let request =
        SubscriptionRequest::from_body(body).map_err(EmailCaptureError::MalformedRequest)?;
    if let Some(email) = request.email().and_then(|email| email.as_str()) {
        tracing::Span::current().record("subscriber_email", tracing::field::display(email));
    }

    let config = credentials.load();
    let data = client.subscribe(&config, &request).await?;

    Ok(data)
}

/// Writes an error followed by each of its causes.
fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
