use serde::{Deserialize, Serialize};

use super::TransportError;
use crate::domain::{
    ConnectCode, ConnectionState, CreateInstance, FetchInstances, Instance, InstanceName, Presence,
    RecipientId,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateInstanceBody<'a> {
    instance_name: &'a str,
    qrcode: bool,
    integration: &'static str,
}

#[derive(Debug, Serialize)]
struct PresenceBody {
    presence: &'static str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InstanceJson {
    id: String,
    name: String,
    #[serde(default)]
    connection_status: Option<String>,
    #[serde(default)]
    owner_jid: Option<String>,
    #[serde(default)]
    profile_name: Option<String>,
    #[serde(default)]
    number: Option<String>,
    #[serde(default)]
    integration: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectJson {
    #[serde(default)]
    base64: Option<String>,
    #[serde(default)]
    pairing_code: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ConnectionStateJson {
    instance: ConnectionStateInstanceJson,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectionStateInstanceJson {
    instance_name: String,
    state: String,
}

pub fn encode_create_instance_body(request: &CreateInstance) -> Result<String, TransportError> {
    let body = CreateInstanceBody {
        instance_name: request.instance_name().as_str(),
        qrcode: request.wants_qrcode(),
        integration: request.integration_kind().as_str(),
    };
    Ok(serde_json::to_string(&body)?)
}

pub fn encode_presence_body(presence: Presence) -> Result<String, TransportError> {
    Ok(serde_json::to_string(&PresenceBody {
        presence: presence.as_str(),
    })?)
}

pub fn fetch_instances_path(filter: &FetchInstances) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    if let Some(name) = filter.instance_name.as_ref() {
        query.append_pair(InstanceName::FIELD, name.as_str());
    }
    if let Some(id) = filter.instance_id.as_deref().map(str::trim) {
        if !id.is_empty() {
            query.append_pair("instanceId", id);
        }
    }
    with_query("/instance/fetchInstances".to_owned(), query.finish())
}

pub fn instance_connect_path(instance: &InstanceName, number: Option<&RecipientId>) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    if let Some(number) = number {
        query.append_pair(RecipientId::FIELD, number.raw());
    }
    with_query(
        format!("/instance/connect/{}", instance.as_str()),
        query.finish(),
    )
}

fn with_query(path: String, query: String) -> String {
    if query.is_empty() {
        path
    } else {
        format!("{path}?{query}")
    }
}

/// Instances lacking an `id` or `name` are dropped instead of failing the whole listing.
pub fn decode_fetch_instances_response(json: &str) -> Result<Vec<Instance>, TransportError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let serde_json::Value::Array(items) = value else {
        return Err(TransportError::UnexpectedShape {
            expected: "an array of instances",
        });
    };

    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<InstanceJson>(item).ok())
        .map(|item| Instance {
            id: item.id,
            name: item.name,
            connection_status: item.connection_status,
            owner_jid: item.owner_jid,
            profile_name: item.profile_name,
            number: item.number,
            integration: item.integration,
        })
        .collect())
}

pub fn decode_connect_response(json: &str) -> Result<ConnectCode, TransportError> {
    let parsed: ConnectJson = serde_json::from_str(json)?;
    let present = |value: Option<String>| value.filter(|value| !value.trim().is_empty());

    if let Some(qr) = present(parsed.base64) {
        return Ok(ConnectCode::QrCode(qr));
    }
    if let Some(code) = present(parsed.pairing_code).or_else(|| present(parsed.code)) {
        return Ok(ConnectCode::PairingCode(code));
    }
    Err(TransportError::UnexpectedShape {
        expected: "a QR code or pairing code",
    })
}

pub fn decode_connection_state_response(json: &str) -> Result<ConnectionState, TransportError> {
    let parsed: ConnectionStateJson = serde_json::from_str(json)?;
    Ok(ConnectionState {
        instance: parsed.instance.instance_name,
        state: parsed.instance.state,
    })
}
