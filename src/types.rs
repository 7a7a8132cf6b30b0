//! Type definitions for authentication and configuration

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Parse a server timestamp.
///
/// RFC 3339 is expected. A timestamp without an offset is read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

/// Bearer token together with its expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub access_token: String,
    /// `None` when the expiry was never recorded or could not be parsed
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    pub fn new(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: Some(expires_at),
        }
    }

    /// A token without a known expiry counts as expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now >= expires_at,
            None => true,
        }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

/// Body of `POST /dev-login`; both fields are optional and omitted when unset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevLoginRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
}

impl DevLoginRequest {
    pub fn with_roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subject: None,
            roles: Some(roles.into_iter().map(Into::into).collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevLoginResponse {
    pub access_token: String,
    pub token_type: String,
    /// Raw expiry as sent; see [`DevLoginResponse::expires_at_utc`]
    pub expires_at: String,
    pub subject: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl DevLoginResponse {
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.expires_at)
    }

    /// An expiry that cannot be parsed leaves the token without one, so it
    /// counts as expired.
    pub fn to_access_token(&self) -> AccessToken {
        AccessToken {
            access_token: self.access_token.clone(),
            expires_at: self.expires_at_utc(),
        }
    }
}

/// Decoded claims of the caller's token, as echoed by `/api/config`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claims: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Response of `GET /api/config`. Entries are passed through untyped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigResponse {
    #[serde(default)]
    pub config_items: Vec<serde_json::Value>,
    #[serde(default)]
    pub versions: Vec<serde_json::Value>,
    #[serde(default)]
    pub enumerators: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_token_expiry() {
        let now = Utc::now();
        let token = AccessToken::new("abc", now + Duration::minutes(5));
        assert!(!token.is_expired(now));
        assert!(token.is_expired(now + Duration::minutes(5)));
        assert_eq!(token.bearer(), "Bearer abc");

        let unknown = AccessToken { access_token: "abc".to_string(), expires_at: None };
        assert!(unknown.is_expired(now));
    }

    #[test]
    fn test_parse_timestamp() {
        let expected = DateTime::parse_from_rfc3339("2024-01-01T12:30:00Z").unwrap().with_timezone(&Utc);
        assert_eq!(parse_timestamp("2024-01-01T12:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T14:30:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T12:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01 12:30:00.000"), Some(expected));
        assert_eq!(parse_timestamp("tomorrow"), None);
    }

    #[test]
    fn test_dev_login_response_with_naive_expiry() {
        let response: DevLoginResponse = serde_json::from_str(
            r#"{"access_token":"t","token_type":"bearer","expires_at":"2099-01-01T00:00:00","subject":"dev"}"#,
        )
        .unwrap();
        assert!(response.roles.is_empty());

        let token = response.to_access_token();
        assert_eq!(token.expires_at, response.expires_at_utc());
        assert!(!token.is_expired(Utc::now()));

        let garbled = DevLoginResponse { expires_at: "soon".to_string(), ..response };
        assert!(garbled.to_access_token().is_expired(Utc::now()));
    }

    #[test]
    fn test_dev_login_request_omits_unset_fields() {
        let body = serde_json::to_string(&DevLoginRequest::default()).unwrap();
        assert_eq!(body, "{}");

        let body = serde_json::to_string(&DevLoginRequest::with_roles(["admin"])).unwrap();
        assert_eq!(body, r#"{"roles":["admin"]}"#);
    }

    #[test]
    fn test_config_response_tolerates_missing_sections() {
        let config: ConfigResponse = serde_json::from_str(r#"{"versions":[{"api":"1.0"}]}"#).unwrap();
        assert_eq!(config.versions.len(), 1);
        assert!(config.config_items.is_empty());
        assert!(config.token.is_none());
    }
}
