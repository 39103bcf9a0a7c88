//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and
//! infrastructure. Implementations live in other crates.

use crate::{Offer, OfferId};

/// Fields of an offer a save may replace
///
/// `None` leaves the stored value untouched. A save overwrites by id with
/// no version check: concurrent saves on the same offer are last-write-wins.
#[derive(Debug, Clone, Default)]
pub struct OfferPatch {
    /// Replacement markdown content
    pub content: Option<String>,

    /// Replacement client name
    pub client_name: Option<String>,

    /// Replacement client address
    pub client_address: Option<String>,
}

impl OfferPatch {
    /// A patch replacing only the content
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// Whether the patch changes anything at all
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.client_name.is_none() && self.client_address.is_none()
    }
}

/// Trait for storing and retrieving offers
///
/// Implemented by the infrastructure layer (homebid-store)
pub trait OfferStore {
    /// Error type for store operations
    type Error;

    /// All offers owned by the given user
    fn list_by_owner(&self, user_id: &str) -> Result<Vec<Offer>, Self::Error>;

    /// Create a new offer with empty content
    fn create(
        &mut self,
        user_id: &str,
        client_name: &str,
        client_address: &str,
    ) -> Result<Offer, Self::Error>;

    /// Apply a patch to an existing offer, bumping its updated timestamp
    ///
    /// Errors when no offer with the given id exists.
    fn update_content(&mut self, id: OfferId, patch: OfferPatch) -> Result<Offer, Self::Error>;

    /// Fetch an offer by id
    fn get_by_id(&self, id: OfferId) -> Result<Option<Offer>, Self::Error>;
}
