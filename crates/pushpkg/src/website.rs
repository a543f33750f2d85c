//! The `website.json` descriptor.
//!
//! The browser reads this file to learn which site it is registering with,
//! which origins may ask for permission, where notification clicks land, and
//! which web service to call back with the user's authentication token.

use crate::config::PushPackageConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Prefix prepended to authentication tokens shorter than [`MIN_AUTH_TOKEN_LEN`].
pub const AUTH_TOKEN_PREFIX: &str = "authenticationToken_";

/// Minimum token length, in characters, accepted by the platform.
pub const MIN_AUTH_TOKEN_LEN: usize = 16;

/// Contents of `website.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteDescriptor {
    pub website_name: String,
    #[serde(rename = "websitePushID")]
    pub website_push_id: String,
    pub allowed_domains: Vec<String>,
    pub url_format_string: String,
    pub authentication_token: String,
    #[serde(rename = "webServiceURL")]
    pub web_service_url: String,
}

impl WebsiteDescriptor {
    /// Build the descriptor for one user from the shared configuration.
    ///
    /// The token is padded with [`pad_authentication_token`].
    pub fn new(config: &PushPackageConfig, authentication_token: &str) -> Result<Self> {
        Ok(Self {
            website_name: config.website_name().to_string(),
            website_push_id: config.website_push_id().to_string(),
            allowed_domains: config.allowed_domains().to_vec(),
            url_format_string: config.url_format_string().to_string(),
            authentication_token: pad_authentication_token(authentication_token)?,
            web_service_url: config.web_service_url().to_string(),
        })
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_json(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    /// The token the caller supplied, with any padding removed.
    pub fn original_token(&self) -> &str {
        unpad_authentication_token(&self.authentication_token)
    }
}

/// Apply the minimum-length policy to a user authentication token.
///
/// Tokens of at least 16 characters are returned unchanged. Shorter tokens get
/// [`AUTH_TOKEN_PREFIX`] prepended once; since the prefix alone is longer than
/// the minimum, the result always satisfies it.
///
/// # Errors
///
/// Returns [`Error::EmptyAuthenticationToken`] for an empty token.
///
/// # Examples
///
/// ```
/// use pushpkg::website::pad_authentication_token;
///
/// assert_eq!(pad_authentication_token("abcd")?, "authenticationToken_abcd");
/// assert_eq!(pad_authentication_token("0123456789abcdef")?, "0123456789abcdef");
/// # Ok::<(), pushpkg::Error>(())
/// ```
pub fn pad_authentication_token(token: &str) -> Result<String> {
    if token.is_empty() {
        return Err(Error::EmptyAuthenticationToken);
    }

    if token.chars().count() >= MIN_AUTH_TOKEN_LEN {
        Ok(token.to_string())
    } else {
        Ok(format!("{AUTH_TOKEN_PREFIX}{token}"))
    }
}

/// Inverse of [`pad_authentication_token`].
///
/// A padded token is recognised by carrying the prefix while being shorter
/// than the prefix plus the minimum length.
pub fn unpad_authentication_token(token: &str) -> &str {
    match token.strip_prefix(AUTH_TOKEN_PREFIX) {
        Some(original) if !original.is_empty() && original.chars().count() < MIN_AUTH_TOKEN_LEN => {
            original
        }
        _ => token,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IconSet;

    fn config() -> PushPackageConfig {
        PushPackageConfig::builder()
            .website_name("Bay Airlines")
            .website_push_id("web.com.example.test")
            .allowed_domains(["https://example.com", "https://www.example.com"])
            .url_format_string("https://example.com/a?id=%@")
            .web_service_url("https://push.example.com/")
            .icons(IconSet::from_dir("/icons"))
            .certificate("/certs/push.p12")
            .build()
            .unwrap()
    }

    #[test]
    fn test_short_token_is_prefixed() {
        let padded = pad_authentication_token("abcd").unwrap();
        assert_eq!(padded, "authenticationToken_abcd");
        assert!(padded.len() >= MIN_AUTH_TOKEN_LEN);
        assert_eq!(unpad_authentication_token(&padded), "abcd");
    }

    #[test]
    fn test_long_token_passes_through() {
        let token = "0123456789abcdef0123";
        assert_eq!(pad_authentication_token(token).unwrap(), token);
        assert_eq!(unpad_authentication_token(token), token);
    }

    #[test]
    fn test_fifteen_char_token_is_padded() {
        let padded = pad_authentication_token("0123456789abcde").unwrap();
        assert!(padded.starts_with(AUTH_TOKEN_PREFIX));
    }

    #[test]
    fn test_empty_token_rejected() {
        assert!(matches!(
            pad_authentication_token(""),
            Err(Error::EmptyAuthenticationToken)
        ));
    }

    #[test]
    fn test_descriptor_json_field_names() {
        let descriptor = WebsiteDescriptor::new(&config(), "abcd").unwrap();
        let json: serde_json::Value = serde_json::from_slice(&descriptor.to_json().unwrap()).unwrap();

        assert_eq!(json["websiteName"], "Bay Airlines");
        assert_eq!(json["websitePushID"], "web.com.example.test");
        assert_eq!(json["allowedDomains"][1], "https://www.example.com");
        assert_eq!(json["urlFormatString"], "https://example.com/a?id=%@");
        assert_eq!(json["authenticationToken"], "authenticationToken_abcd");
        assert_eq!(json["webServiceURL"], "https://push.example.com");
        assert_eq!(json.as_object().unwrap().len(), 6);
    }

    #[test]
    fn test_descriptor_round_trips() {
        let descriptor = WebsiteDescriptor::new(&config(), "abcd").unwrap();
        let parsed = WebsiteDescriptor::from_json(&descriptor.to_json().unwrap()).unwrap();
        assert_eq!(parsed, descriptor);
        assert_eq!(parsed.original_token(), "abcd");
    }
}
