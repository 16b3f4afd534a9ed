use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Evolution API key sent in the `apikey` header.
///
/// Invariant: non-empty after trimming.
pub struct ApiKey(String);

impl ApiKey {
    /// Header name used by the Evolution API (`apikey`).
    pub const FIELD: &'static str = "apikey";

    /// Create a validated [`ApiKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Base URL of an Evolution API deployment, e.g. `http://localhost:8080`.
///
/// Invariant: parses as an absolute `http`/`https` URL. Trailing slashes are stripped so
/// request paths can be appended directly.
pub struct BaseUrl(String);

impl BaseUrl {
    /// Configuration key for the base URL.
    pub const FIELD: &'static str = "base_url";

    /// Create a validated [`BaseUrl`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = url::Url::parse(trimmed).map_err(|err| ValidationError::InvalidUrl {
            input: trimmed.to_owned(),
            reason: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ValidationError::InvalidUrl {
                input: trimmed.to_owned(),
                reason: format!("unsupported scheme `{}`", parsed.scheme()),
            });
        }

        Ok(Self(trimmed.trim_end_matches('/').to_owned()))
    }

    /// Borrow the base URL without a trailing slash.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join an API path onto the base URL, inserting a leading `/` if missing.
    pub fn join(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.0)
        } else {
            format!("{}/{path}", self.0)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Name of a gateway instance (one connected WhatsApp session).
///
/// Invariant: non-empty after trimming and free of characters that would break the
/// request path (`/`, `?`, `#`, whitespace).
pub struct InstanceName(String);

impl InstanceName {
    /// JSON field name used by the Evolution API (`instanceName`).
    pub const FIELD: &'static str = "instanceName";

    /// Create a validated [`InstanceName`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if trimmed
            .chars()
            .any(|c| matches!(c, '/' | '?' | '#') || c.is_whitespace())
        {
            return Err(ValidationError::InvalidInstanceName {
                input: trimmed.to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated instance name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Recipient as sent to the gateway (`number`): a phone number or a JID.
///
/// Invariant: non-empty after trimming. No normalization is applied; two recipients are
/// equal only when their trimmed text is identical.
pub struct RecipientId(String);

impl RecipientId {
    /// JSON field name used by the Evolution API (`number`).
    pub const FIELD: &'static str = "number";

    /// Create a validated (non-empty) recipient.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Raw (trimmed) value as sent to the gateway.
    pub fn raw(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecipientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Text message body (`text`).
///
/// Invariant: non-empty after trimming. The original value (including whitespace) is preserved.
pub struct MessageText(String);

impl MessageText {
    /// JSON field name used by the Evolution API (`text`).
    pub const FIELD: &'static str = "text";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// Presence advertised by an instance.
pub enum Presence {
    #[default]
    Available,
    Unavailable,
}

impl Presence {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Unavailable => "unavailable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// Backend used by a newly created instance.
pub enum Integration {
    #[default]
    WhatsappBaileys,
    WhatsappBusiness,
    Evolution,
}

impl Integration {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WhatsappBaileys => "WHATSAPP-BAILEYS",
            Self::WhatsappBusiness => "WHATSAPP-BUSINESS",
            Self::Evolution => "EVOLUTION",
        }
    }
}

pub(crate) fn non_empty(
    field: &'static str,
    value: impl Into<String>,
) -> Result<String, ValidationError> {
    let value = value.into();
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_newtypes_trim_or_validate() {
        let key = ApiKey::new("  key ").unwrap();
        assert_eq!(key.as_str(), "key");
        assert!(ApiKey::new("  ").is_err());

        let instance = InstanceName::new(" my-business ").unwrap();
        assert_eq!(instance.as_str(), "my-business");
        assert!(InstanceName::new("").is_err());

        let recipient = RecipientId::new(" 55999999999 ").unwrap();
        assert_eq!(recipient.raw(), "55999999999");
        assert_eq!(recipient.to_string(), "55999999999");
        assert!(RecipientId::new("\n").is_err());

        let msg = MessageText::new(" hi ").unwrap();
        assert_eq!(msg.as_str(), " hi ");
        assert!(MessageText::new("  ").is_err());
    }

    #[test]
    fn instance_name_rejects_path_breaking_characters() {
        for input in ["a/b", "a?b", "a#b", "my business"] {
            assert!(
                matches!(
                    InstanceName::new(input),
                    Err(ValidationError::InvalidInstanceName { .. })
                ),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn base_url_strips_trailing_slash_and_joins_paths() {
        let base = BaseUrl::new(" http://localhost:8080/ ").unwrap();
        assert_eq!(base.as_str(), "http://localhost:8080");
        assert_eq!(
            base.join("/message/sendText/x"),
            "http://localhost:8080/message/sendText/x"
        );
        assert_eq!(
            base.join("instance/fetchInstances"),
            "http://localhost:8080/instance/fetchInstances"
        );

        let prefixed = BaseUrl::new("https://gw.example.com/api//").unwrap();
        assert_eq!(
            prefixed.join("/chat/whatsappNumbers/x"),
            "https://gw.example.com/api/chat/whatsappNumbers/x"
        );
    }

    #[test]
    fn base_url_rejects_garbage_and_foreign_schemes() {
        assert!(matches!(
            BaseUrl::new(""),
            Err(ValidationError::Empty { field: BaseUrl::FIELD })
        ));
        assert!(matches!(
            BaseUrl::new("localhost:8080"),
            Err(ValidationError::InvalidUrl { .. })
        ));
        assert!(matches!(
            BaseUrl::new("not a url"),
            Err(ValidationError::InvalidUrl { .. })
        ));
        assert!(matches!(
            BaseUrl::new("ftp://example.com"),
            Err(ValidationError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn enums_map_to_wire_values() {
        assert_eq!(Presence::default().as_str(), "available");
        assert_eq!(Presence::Unavailable.as_str(), "unavailable");
        assert_eq!(Integration::default().as_str(), "WHATSAPP-BAILEYS");
        assert_eq!(Integration::WhatsappBusiness.as_str(), "WHATSAPP-BUSINESS");
        assert_eq!(Integration::Evolution.as_str(), "EVOLUTION");
    }
}
