use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// The data submitted from the email capture form.
///
/// The email is carried verbatim, whatever its JSON type. Nothing here checks that it
/// is a string or that it looks like an address; the subscription service decides
/// whether it accepts it. A key that is present with a `null` value is kept apart
/// from a missing key, so both can be forwarded as they came in.
///
/// # Examples
/// ```
/// use email_capture::domain::SubscriptionRequest;
///
/// let request = SubscriptionRequest::from_body(br#"{"email": "a@example.com"}"#).unwrap();
/// assert_eq!(Some("a@example.com"), request.email().and_then(|e| e.as_str()));
/// ```
#[derive(Deserialize, Debug, Default, PartialEq)]
pub struct SubscriptionRequest {
    #[serde(default, deserialize_with = "present")]
    email: Option<Value>,
}

/// Wraps whatever value is under the key, `null` included. Only a missing key ends up
/// as `None`, through `#[serde(default)]`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl SubscriptionRequest {
    pub fn new(email: Option<Value>) -> Self {
        Self { email }
    }

    /// Parses a raw request body. An empty body is a request without an email.
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
    }

    pub fn email(&self) -> Option<&Value> {
        self.email.as_ref()
    }
}

/// A JSON document returned by the subscription service, kept as the exact bytes it
/// was received as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionResult(Vec<u8>);

impl SubscriptionResult {
    /// Returns `Ok` if `body` holds a single well-formed JSON value. The bytes are
    /// kept untouched, so key order and formatting survive.
    pub fn parse(body: Vec<u8>) -> Result<Self, serde_json::Error> {
        serde_json::from_slice::<serde::de::IgnoredAny>(&body)?;
        Ok(Self(body))
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for SubscriptionResult {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
