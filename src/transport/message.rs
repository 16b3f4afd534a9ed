use serde::Serialize;

use super::TransportError;
use crate::domain::{
    ContactCard, SendContact, SendLocation, SendMediaRef, SendPoll, SendReaction, SendText,
};

#[derive(Debug, Serialize)]
struct TextBody<'a> {
    number: &'a str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct LocationBody<'a> {
    number: &'a str,
    name: &'a str,
    address: &'a str,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Serialize)]
struct ContactBody<'a> {
    number: &'a str,
    contact: Vec<ContactJson<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContactJson<'a> {
    full_name: &'a str,
    wuid: &'a str,
    phone_number: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    organization: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
}

impl<'a> From<&'a ContactCard> for ContactJson<'a> {
    fn from(card: &'a ContactCard) -> Self {
        Self {
            full_name: &card.full_name,
            wuid: &card.wuid,
            phone_number: &card.phone_number,
            organization: card.organization.as_deref(),
            email: card.email.as_deref(),
            url: card.url.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PollBody<'a> {
    number: &'a str,
    name: &'a str,
    selectable_count: usize,
    values: &'a [String],
}

#[derive(Debug, Serialize)]
struct StickerBody<'a> {
    number: &'a str,
    sticker: &'a str,
}

#[derive(Debug, Serialize)]
struct AudioBody<'a> {
    number: &'a str,
    audio: &'a str,
}

#[derive(Debug, Serialize)]
struct ReactionBody<'a> {
    key: ReactionKeyJson<'a>,
    reaction: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReactionKeyJson<'a> {
    remote_jid: &'a str,
    from_me: bool,
    id: &'a str,
}

pub fn encode_text_body(request: &SendText) -> Result<String, TransportError> {
    Ok(serde_json::to_string(&TextBody {
        number: request.number().raw(),
        text: request.text().as_str(),
    })?)
}

pub fn encode_location_body(request: &SendLocation) -> Result<String, TransportError> {
    Ok(serde_json::to_string(&LocationBody {
        number: request.number().raw(),
        name: request.name(),
        address: request.address(),
        latitude: request.latitude(),
        longitude: request.longitude(),
    })?)
}

pub fn encode_contact_body(request: &SendContact) -> Result<String, TransportError> {
    Ok(serde_json::to_string(&ContactBody {
        number: request.number().raw(),
        contact: request.contacts().iter().map(ContactJson::from).collect(),
    })?)
}

pub fn encode_poll_body(request: &SendPoll) -> Result<String, TransportError> {
    Ok(serde_json::to_string(&PollBody {
        number: request.number().raw(),
        name: request.name(),
        selectable_count: request.selectable_count(),
        values: request.values(),
    })?)
}

pub fn encode_sticker_body(request: &SendMediaRef) -> Result<String, TransportError> {
    Ok(serde_json::to_string(&StickerBody {
        number: request.number().raw(),
        sticker: request.media(),
    })?)
}

pub fn encode_audio_body(request: &SendMediaRef) -> Result<String, TransportError> {
    Ok(serde_json::to_string(&AudioBody {
        number: request.number().raw(),
        audio: request.media(),
    })?)
}

pub fn encode_reaction_body(request: &SendReaction) -> Result<String, TransportError> {
    let key = request.key();
    Ok(serde_json::to_string(&ReactionBody {
        key: ReactionKeyJson {
            remote_jid: &key.remote_jid,
            from_me: key.from_me,
            id: &key.id,
        },
        reaction: request.reaction(),
    })?)
}

#[cfg(test)]
mod tests {
    use crate::domain::{MessageKey, MessageText, RecipientId};

    use super::*;

    fn recipient() -> RecipientId {
        RecipientId::new("55999999999").unwrap()
    }

    #[test]
    fn encode_text() {
        let req = SendText::new(recipient(), MessageText::new("hello, world").unwrap());
        assert_eq!(
            encode_text_body(&req).unwrap(),
            r#"{"number":"55999999999","text":"hello, world"}"#
        );
    }

    #[test]
    fn encode_location() {
        let req = SendLocation::new(recipient(), "Bora Bora", "French Polynesia", -16.5, -151.75)
            .unwrap();
        assert_eq!(
            encode_location_body(&req).unwrap(),
            r#"{"number":"55999999999","name":"Bora Bora","address":"French Polynesia","latitude":-16.5,"longitude":-151.75}"#
        );
    }

    #[test]
    fn encode_contact_omits_absent_optionals() {
        let mut card = ContactCard::new("John Doe", "5511", "+55 11").unwrap();
        card.email = Some("john@example.com".to_owned());
        let req = SendContact::new(recipient(), vec![card]).unwrap();
        assert_eq!(
            encode_contact_body(&req).unwrap(),
            r#"{"number":"55999999999","contact":[{"fullName":"John Doe","wuid":"5511","phoneNumber":"+55 11","email":"john@example.com"}]}"#
        );
    }

    #[test]
    fn encode_poll() {
        let req = SendPoll::new(recipient(), "Color?", 1, ["red", "blue"]).unwrap();
        assert_eq!(
            encode_poll_body(&req).unwrap(),
            r#"{"number":"55999999999","name":"Color?","selectableCount":1,"values":["red","blue"]}"#
        );
    }

    #[test]
    fn encode_sticker_and_audio_share_payload() {
        let req = SendMediaRef::new(recipient(), "https://example.com/a.webp").unwrap();
        assert_eq!(
            encode_sticker_body(&req).unwrap(),
            r#"{"number":"55999999999","sticker":"https://example.com/a.webp"}"#
        );
        assert_eq!(
            encode_audio_body(&req).unwrap(),
            r#"{"number":"55999999999","audio":"https://example.com/a.webp"}"#
        );
    }

    #[test]
    fn encode_reaction() {
        let key = MessageKey::new("5511@s.whatsapp.net", false, "ABC123").unwrap();
        let req = SendReaction::new(key, "🚀");
        assert_eq!(
            encode_reaction_body(&req).unwrap(),
            r#"{"key":{"remoteJid":"5511@s.whatsapp.net","fromMe":false,"id":"ABC123"},"reaction":"🚀"}"#
        );
    }
}
