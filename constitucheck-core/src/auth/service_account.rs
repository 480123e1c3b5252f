use serde::Deserialize;

/// Identity-provider service-account credential.
///
/// Only the fields the gateway reads are modelled; the rest of the
/// credential JSON is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccount {
    pub project_id: String,
    #[serde(default)]
    pub client_email: Option<String>,
    #[serde(rename = "type", default)]
    pub account_type: Option<String>,
}

impl ServiceAccount {
    /// Parses a credential stored as a JSON string.
    pub fn from_json(raw: &str) -> super::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
