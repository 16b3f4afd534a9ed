#[derive(Debug, Clone, PartialEq)]
/// Successful response body of an endpoint without a typed decoder.
pub enum ApiResponse {
    Json(serde_json::Value),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One entry of a `whatsappNumbers` lookup.
pub struct NumberCheck {
    pub number: String,
    pub exists: bool,
    pub jid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub id: String,
    pub name: String,
    pub connection_status: Option<String>,
    pub owner_jid: Option<String>,
    pub profile_name: Option<String>,
    pub number: Option<String>,
    pub integration: Option<String>,
}

impl Instance {
    /// `open` is the gateway's state for a logged-in session.
    pub fn is_connected(&self) -> bool {
        self.connection_status.as_deref() == Some("open")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// What `instance/connect` hands back for linking a device.
pub enum ConnectCode {
    /// QR code image, usually a `data:image/png;base64,...` URI.
    QrCode(String),
    /// Code for "link with phone number instead".
    PairingCode(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionState {
    pub instance: String,
    pub state: String,
}
