use secrecy::Secret;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

/// Environment variable holding the id of the form new subscribers are added to.
pub const FORM_ID_VAR: &str = "FORM_ID";
/// Environment variable holding the public API key for the subscription service.
pub const API_KEY_VAR: &str = "API_KEY_PUBLIC";

/// App-wide configuration
#[derive(Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub subscription_service: SubscriptionServiceSettings,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

/// Where subscription requests get forwarded to.
#[derive(Deserialize, Clone)]
pub struct SubscriptionServiceSettings {
    /// Root of the service's API, e.g. `https://api.convertkit.com/v3`
    pub base_url: String,
    /// Fixed credentials. When absent, credentials are read from the process
    /// environment on every request.
    #[serde(default)]
    pub credentials: Option<SubscriptionConfig>,
}

impl SubscriptionServiceSettings {
    pub fn credential_source(&self) -> CredentialSource {
        match &self.credentials {
            Some(config) => CredentialSource::Fixed(config.clone()),
            None => CredentialSource::Environment,
        }
    }
}

/// Credentials identifying which form to subscribe to, and authorizing the call.
#[derive(Deserialize, Clone, Debug)]
pub struct SubscriptionConfig {
    pub form_id: String,
    pub api_key: Secret<String>,
}

impl SubscriptionConfig {
    /// Reads `FORM_ID` and `API_KEY_PUBLIC` from the environment.
    ///
    /// Missing variables are not an error here. They become empty values, and the
    /// subscription service's rejection of the call is what the caller sees.
    pub fn from_env() -> Self {
        let form_id = std::env::var(FORM_ID_VAR).unwrap_or_default();
        let api_key = std::env::var(API_KEY_VAR).unwrap_or_default();

        Self {
            form_id,
            api_key: Secret::new(api_key),
        }
    }
}

/// Supplies the credentials used for each subscription request.
#[derive(Clone, Debug)]
pub enum CredentialSource {
    /// Re-read the process environment on every call
    Environment,
    Fixed(SubscriptionConfig),
}

impl CredentialSource {
    pub fn load(&self) -> SubscriptionConfig {
        match self {
            CredentialSource::Environment => SubscriptionConfig::from_env(),
            CredentialSource::Fixed(config) => config.clone(),
        }
    }
}

/// Reads app configuration from the default file location, then applies any
/// overrides from `APP_`-prefixed environment variables, e.g.
/// `APP_APPLICATION__PORT=5001` sets `Settings.application.port`.
///
/// Returns an error if parsing the config file into a `Settings` struct fails. This
/// could be a problem reading from the file or a malformed file.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    config::Config::builder()
        .add_source(config::File::with_name("configuration"))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}
