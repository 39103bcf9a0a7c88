//! Homebid Storage Layer
//!
//! Implements the `OfferStore` trait over SQLite.
//!
//! # Examples
//!
//! ```
//! use homebid_store::SqliteStore;
//! use homebid_domain::traits::OfferStore;
//!
//! let mut store = SqliteStore::new(":memory:").unwrap();
//! let offer = store.create("user-1", "Jane Buyer", "12 Elm St").unwrap();
//! assert_eq!(offer.client_name, "Jane Buyer");
//! ```

#![warn(missing_docs)]

use homebid_domain::traits::{OfferPatch, OfferStore};
use homebid_domain::{Offer, OfferId};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Offer not found
    #[error("Offer not found: {0}")]
    NotFound(String),

    /// Invalid data in a stored row
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// SQLite-based implementation of `OfferStore`
///
/// Use `:memory:` as the path for an in-memory database (useful for
/// testing).
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe; wrap the store in a mutex when
/// sharing it across request handlers.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at the given path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    fn id_to_bytes(id: OfferId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    fn bytes_to_id(bytes: &[u8]) -> Result<OfferId, StoreError> {
        if bytes.len() != 16 {
            return Err(StoreError::InvalidData(format!(
                "Expected 16 bytes for OfferId, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 16];
        arr.copy_from_slice(bytes);
        Ok(OfferId::from_value(u128::from_be_bytes(arr)))
    }

    fn now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    fn row_to_offer(row: &rusqlite::Row<'_>) -> rusqlite::Result<(Vec<u8>, Offer)> {
        let id_bytes: Vec<u8> = row.get(0)?;
        let offer = Offer {
            id: OfferId::from_value(0), // patched by the caller from id_bytes
            user_id: row.get(1)?,
            client_name: row.get(2)?,
            client_address: row.get(3)?,
            content: row.get(4)?,
            created_at: row.get::<_, i64>(5)? as u64,
            updated_at: row.get::<_, i64>(6)? as u64,
        };
        Ok((id_bytes, offer))
    }

    fn query_offer(&self, id: OfferId) -> Result<Option<Offer>, StoreError> {
        let id_bytes = Self::id_to_bytes(id);
        let row = self
            .conn
            .query_row(
                "SELECT id, user_id, client_name, client_address, content, created_at, updated_at
                 FROM offers WHERE id = ?1",
                params![&id_bytes],
                Self::row_to_offer,
            )
            .optional()?;

        match row {
            None => Ok(None),
            Some((bytes, mut offer)) => {
                offer.id = Self::bytes_to_id(&bytes)?;
                Ok(Some(offer))
            }
        }
    }
}

impl OfferStore for SqliteStore {
    type Error = StoreError;

    fn list_by_owner(&self, user_id: &str) -> Result<Vec<Offer>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, client_name, client_address, content, created_at, updated_at
             FROM offers WHERE user_id = ?1 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![user_id], Self::row_to_offer)?;

        let mut offers = Vec::new();
        for row in rows {
            let (bytes, mut offer) = row?;
            offer.id = Self::bytes_to_id(&bytes)?;
            offers.push(offer);
        }
        Ok(offers)
    }

    fn create(
        &mut self,
        user_id: &str,
        client_name: &str,
        client_address: &str,
    ) -> Result<Offer, Self::Error> {
        let offer = Offer {
            id: OfferId::new(),
            user_id: user_id.to_string(),
            client_name: client_name.to_string(),
            client_address: client_address.to_string(),
            content: String::new(),
            created_at: Self::now(),
            updated_at: Self::now(),
        };

        self.conn.execute(
            "INSERT INTO offers (id, user_id, client_name, client_address, content, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                Self::id_to_bytes(offer.id),
                offer.user_id,
                offer.client_name,
                offer.client_address,
                offer.content,
                offer.created_at as i64,
                offer.updated_at as i64,
            ],
        )?;

        Ok(offer)
    }

    fn update_content(&mut self, id: OfferId, patch: OfferPatch) -> Result<Offer, Self::Error> {
        let mut offer = self
            .query_offer(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if let Some(content) = patch.content {
            offer.content = content;
        }
        if let Some(client_name) = patch.client_name {
            offer.client_name = client_name;
        }
        if let Some(client_address) = patch.client_address {
            offer.client_address = client_address;
        }
        offer.updated_at = Self::now();

        // Overwrite by id, no version check: last write wins
        self.conn.execute(
            "UPDATE offers SET client_name = ?2, client_address = ?3, content = ?4, updated_at = ?5
             WHERE id = ?1",
            params![
                Self::id_to_bytes(id),
                offer.client_name,
                offer.client_address,
                offer.content,
                offer.updated_at as i64,
            ],
        )?;

        Ok(offer)
    }

    fn get_by_id(&self, id: OfferId) -> Result<Option<Offer>, Self::Error> {
        self.query_offer(id)
    }
}
