//! Offer module - the persisted record an editing session works on

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an offer based on UUIDv7
///
/// UUIDv7 provides:
/// - Chronological sortability (creation order falls out of the id)
/// - 128-bit uniqueness without coordination
/// - RFC 9562-standard format with broad ecosystem support
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct OfferId(u128);

impl OfferId {
    /// Generate a new UUIDv7-based OfferId
    ///
    /// # Examples
    ///
    /// ```
    /// use homebid_domain::OfferId;
    ///
    /// let id = OfferId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create an OfferId from a raw u128 value
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse an OfferId from a UUID string
    ///
    /// # Examples
    ///
    /// ```
    /// use homebid_domain::OfferId;
    ///
    /// let id = OfferId::new();
    /// let parsed = OfferId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid offer id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for OfferId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

impl From<OfferId> for String {
    fn from(id: OfferId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for OfferId {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_string(&s)
    }
}

/// A persisted real-estate purchase offer
///
/// `content` is the markdown offer letter; it is replaced wholesale by each
/// save and never merged field-by-field. Empty content means the owner has
/// not edited the offer yet and the default template applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    /// Unique identifier
    pub id: OfferId,

    /// Owning user (from the identity provider)
    pub user_id: String,

    /// Name of the client the offer is drafted for
    pub client_name: String,

    /// Address of the property / client
    pub client_address: String,

    /// Markdown offer letter content; empty until first save
    pub content: String,

    /// Creation timestamp (Unix epoch seconds)
    pub created_at: u64,

    /// Last modification timestamp (Unix epoch seconds)
    pub updated_at: u64,
}

impl Offer {
    /// The editable document for this offer: saved content, or the default
    /// template when nothing has been saved yet.
    pub fn editable_content(&self) -> &str {
        if self.content.trim().is_empty() {
            crate::template::DEFAULT_OFFER_TEMPLATE
        } else {
            &self.content
        }
    }
}
