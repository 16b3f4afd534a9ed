use crate::domain::validation::ValidationError;
use crate::domain::value::{InstanceName, Integration, MessageText, RecipientId, non_empty};

#[derive(Debug, Clone)]
pub struct CreateInstance {
    instance_name: InstanceName,
    qrcode: bool,
    integration: Integration,
}

impl CreateInstance {
    /// New instance request with a QR code requested and the default integration.
    pub fn new(instance_name: InstanceName) -> Self {
        Self {
            instance_name,
            qrcode: true,
            integration: Integration::default(),
        }
    }

    pub fn qrcode(mut self, qrcode: bool) -> Self {
        self.qrcode = qrcode;
        self
    }

    pub fn integration(mut self, integration: Integration) -> Self {
        self.integration = integration;
        self
    }

    pub fn instance_name(&self) -> &InstanceName {
        &self.instance_name
    }

    pub fn wants_qrcode(&self) -> bool {
        self.qrcode
    }

    pub fn integration_kind(&self) -> Integration {
        self.integration
    }
}

#[derive(Debug, Clone, Default)]
/// Filter for `fetchInstances`; an empty filter lists every instance.
pub struct FetchInstances {
    pub instance_name: Option<InstanceName>,
    pub instance_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SendText {
    number: RecipientId,
    text: MessageText,
}

impl SendText {
    pub fn new(number: RecipientId, text: MessageText) -> Self {
        Self { number, text }
    }

    pub fn number(&self) -> &RecipientId {
        &self.number
    }

    pub fn text(&self) -> &MessageText {
        &self.text
    }
}

#[derive(Debug, Clone)]
pub struct SendLocation {
    number: RecipientId,
    name: String,
    address: String,
    latitude: f64,
    longitude: f64,
}

impl SendLocation {
    pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
    pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

    pub fn new(
        number: RecipientId,
        name: impl Into<String>,
        address: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, ValidationError> {
        check_coordinate("latitude", Self::LATITUDE_RANGE, latitude)?;
        check_coordinate("longitude", Self::LONGITUDE_RANGE, longitude)?;
        Ok(Self {
            number,
            name: non_empty("name", name)?,
            address: non_empty("address", address)?,
            latitude,
            longitude,
        })
    }

    pub fn number(&self) -> &RecipientId {
        &self.number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

fn check_coordinate(
    field: &'static str,
    (min, max): (f64, f64),
    actual: f64,
) -> Result<(), ValidationError> {
    // NaN fails the range check as well.
    if !(min..=max).contains(&actual) {
        return Err(ValidationError::CoordinateOutOfRange {
            field,
            min,
            max,
            actual,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// vCard-like contact shared through `sendContact`.
pub struct ContactCard {
    pub full_name: String,
    pub wuid: String,
    pub phone_number: String,
    pub organization: Option<String>,
    pub email: Option<String>,
    pub url: Option<String>,
}

impl ContactCard {
    pub fn new(
        full_name: impl Into<String>,
        wuid: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            full_name: non_empty("fullName", full_name)?,
            wuid: non_empty("wuid", wuid)?,
            phone_number: non_empty("phoneNumber", phone_number)?,
            organization: None,
            email: None,
            url: None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SendContact {
    number: RecipientId,
    contacts: Vec<ContactCard>,
}

impl SendContact {
    pub fn new(number: RecipientId, contacts: Vec<ContactCard>) -> Result<Self, ValidationError> {
        if contacts.is_empty() {
            return Err(ValidationError::Empty { field: "contact" });
        }
        Ok(Self { number, contacts })
    }

    pub fn number(&self) -> &RecipientId {
        &self.number
    }

    pub fn contacts(&self) -> &[ContactCard] {
        &self.contacts
    }
}

#[derive(Debug, Clone)]
pub struct SendPoll {
    number: RecipientId,
    name: String,
    selectable_count: usize,
    values: Vec<String>,
}

impl SendPoll {
    /// Build a poll. Options are trimmed and blank options dropped before validation.
    pub fn new(
        number: RecipientId,
        name: impl Into<String>,
        selectable_count: usize,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, ValidationError> {
        let values = values
            .into_iter()
            .map(|value| value.into().trim().to_owned())
            .filter(|value| !value.is_empty())
            .collect::<Vec<_>>();
        if values.is_empty() {
            return Err(ValidationError::Empty { field: "values" });
        }
        if selectable_count == 0 || selectable_count > values.len() {
            return Err(ValidationError::SelectableCountOutOfRange {
                max: values.len(),
                actual: selectable_count,
            });
        }
        Ok(Self {
            number,
            name: non_empty("name", name)?,
            selectable_count,
            values,
        })
    }

    pub fn number(&self) -> &RecipientId {
        &self.number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn selectable_count(&self) -> usize {
        self.selectable_count
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

#[derive(Debug, Clone)]
/// Sticker or audio payload: a URL or a base64 blob, passed through untouched.
pub struct SendMediaRef {
    number: RecipientId,
    media: String,
}

impl SendMediaRef {
    pub fn new(number: RecipientId, media: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            number,
            media: non_empty("media", media)?,
        })
    }

    pub fn number(&self) -> &RecipientId {
        &self.number
    }

    pub fn media(&self) -> &str {
        &self.media
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Key of the message a reaction targets.
pub struct MessageKey {
    pub remote_jid: String,
    pub from_me: bool,
    pub id: String,
}

impl MessageKey {
    pub fn new(
        remote_jid: impl Into<String>,
        from_me: bool,
        id: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            remote_jid: non_empty("remoteJid", remote_jid)?,
            from_me,
            id: non_empty("id", id)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SendReaction {
    key: MessageKey,
    reaction: String,
}

impl SendReaction {
    /// An empty reaction is allowed: the gateway treats it as removing the reaction.
    pub fn new(key: MessageKey, reaction: impl Into<String>) -> Self {
        Self {
            key,
            reaction: reaction.into(),
        }
    }

    pub fn key(&self) -> &MessageKey {
        &self.key
    }

    pub fn reaction(&self) -> &str {
        &self.reaction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipient() -> RecipientId {
        RecipientId::new("55999999999").unwrap()
    }

    #[test]
    fn create_instance_defaults_match_gateway_defaults() {
        let req = CreateInstance::new(InstanceName::new("biz").unwrap());
        assert!(req.wants_qrcode());
        assert_eq!(req.integration_kind(), Integration::WhatsappBaileys);

        let req = req.qrcode(false).integration(Integration::Evolution);
        assert!(!req.wants_qrcode());
        assert_eq!(req.integration_kind(), Integration::Evolution);
    }

    #[test]
    fn location_enforces_coordinate_ranges() {
        assert!(SendLocation::new(recipient(), "Bora Bora", "PF", -16.5, -151.7).is_ok());
        assert!(matches!(
            SendLocation::new(recipient(), "x", "y", 90.5, 0.0),
            Err(ValidationError::CoordinateOutOfRange {
                field: "latitude",
                ..
            })
        ));
        assert!(matches!(
            SendLocation::new(recipient(), "x", "y", 0.0, -180.1),
            Err(ValidationError::CoordinateOutOfRange {
                field: "longitude",
                ..
            })
        ));
        assert!(SendLocation::new(recipient(), "x", "y", f64::NAN, 0.0).is_err());
        assert!(SendLocation::new(recipient(), " ", "y", 0.0, 0.0).is_err());
    }

    #[test]
    fn contact_requires_at_least_one_card() {
        let err = SendContact::new(recipient(), Vec::new()).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "contact" });

        let card = ContactCard::new("John Doe", "55999999999", "+55 99 9 9999-9999").unwrap();
        let req = SendContact::new(recipient(), vec![card]).unwrap();
        assert_eq!(req.contacts().len(), 1);
        assert!(ContactCard::new("", "1", "2").is_err());
    }

    #[test]
    fn poll_trims_options_and_checks_selectable_count() {
        let poll = SendPoll::new(recipient(), "Color?", 1, [" red ", "", "blue"]).unwrap();
        assert_eq!(poll.values(), ["red".to_owned(), "blue".to_owned()]);

        assert!(matches!(
            SendPoll::new(recipient(), "Color?", 3, ["red", "blue"]),
            Err(ValidationError::SelectableCountOutOfRange { max: 2, actual: 3 })
        ));
        assert!(matches!(
            SendPoll::new(recipient(), "Color?", 0, ["red"]),
            Err(ValidationError::SelectableCountOutOfRange { .. })
        ));
        assert!(matches!(
            SendPoll::new(recipient(), "Color?", 1, ["  "]),
            Err(ValidationError::Empty { field: "values" })
        ));
    }

    #[test]
    fn reaction_key_requires_jid_and_id() {
        assert!(MessageKey::new("", false, "ABC").is_err());
        assert!(MessageKey::new("55999999999@s.whatsapp.net", true, " ").is_err());
        let key = MessageKey::new("55999999999@s.whatsapp.net", true, "ABC").unwrap();
        let req = SendReaction::new(key, "");
        assert_eq!(req.reaction(), "");
    }
}
