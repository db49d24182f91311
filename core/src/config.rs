//! Client configuration: base URL, API key, fixed headers and switches.

use std::env;
use std::sync::LazyLock;

use url::Url;

use crate::error::ApiError;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://api.klout.com/v2/";

/// Value of the `User-Agent` header sent with every request.
pub const USER_AGENT: &str = concat!("klout-rest-", env!("CARGO_PKG_VERSION"));

/// Body returned for every request while disable mode is on.
pub const DISABLED_BODY: &str = r#"{"Disabled":true}"#;

// `DEFAULT_BASE_URL` is a constant absolute URL, so parsing cannot fail.
static DEFAULT_URL: LazyLock<Url> =
    LazyLock::new(|| Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is a valid URL"));

/// Everything a `KloutClient` needs to address the API.
///
/// The header set is fixed at construction. Base URL and API key change only
/// through the explicit setters.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: Url,
    api_key: String,
    headers: Vec<(String, String)>,
    disabled: bool,
    accept_invalid_certs: bool,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_URL.clone(),
            api_key: api_key.into(),
            headers: default_headers(),
            disabled: false,
            accept_invalid_certs: false,
        }
    }

    /// Read `KLOUT_API_KEY`, `KLOUT_BASE_URL`, `KLOUT_DISABLED` and
    /// `KLOUT_INSECURE_TLS`. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let mut config = Self::new(lookup("KLOUT_API_KEY").unwrap_or_default());
        if let Some(base_url) = lookup("KLOUT_BASE_URL") {
            config.set_base_url(&base_url)?;
        }
        config.disabled = flag(lookup("KLOUT_DISABLED"));
        config.accept_invalid_certs = flag(lookup("KLOUT_INSECURE_TLS"));
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ApiError> {
        self.set_base_url(base_url)?;
        Ok(self)
    }

    /// Skip TLS certificate verification in the transport. Off by default.
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Turn on disable mode: every request answers `{"Disabled":true}`
    /// without reaching the network.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Replace the base URL. A missing trailing slash is added so relative
    /// paths resolve beneath the last segment instead of replacing it.
    pub fn set_base_url(&mut self, base_url: &str) -> Result<(), ApiError> {
        let mut url = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                url: base_url.to_string(),
                reason: "cannot be used as a base URL".to_string(),
            });
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        self.base_url = url;
        Ok(())
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Replace the API key. `None` leaves the current key in place.
    /// Returns the key in effect afterwards.
    pub fn set_api_key(&mut self, api_key: Option<&str>) -> &str {
        if let Some(key) = api_key {
            self.api_key = key.to_string();
        }
        &self.api_key
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn disable(&mut self) {
        self.disabled = true;
    }

    pub fn accepts_invalid_certs(&self) -> bool {
        self.accept_invalid_certs
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("")
    }
}

fn default_headers() -> Vec<(String, String)> {
    [
        ("User-Agent", USER_AGENT),
        ("Content-Type", "application/json; charset=utf-8"),
        ("Accept-Encoding", "gzip, deflate"),
        ("Accept", "application/json"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn flag(value: Option<String>) -> bool {
    value.is_some_and(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
}
