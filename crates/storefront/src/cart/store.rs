//! Persistent cart storage.
//!
//! The cart is mirrored to a single named slot on disk after every
//! mutation and read back once when a session starts. Loading is
//! fail-soft: a missing, unreadable or corrupt slot logs a warning and
//! yields an empty cart, never an error. Saving goes through a temp file
//! in the same directory plus a rename, so a crash mid-write leaves the
//! previous cart intact.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::{Cart, CartLineItem};

/// Name of the cart slot. The suffix versions the serialized layout.
pub const CART_SLOT: &str = "rivaaj_cart_v3.json";

/// Errors that can occur while writing the cart slot.
///
/// Read-side failures never surface; they reset the cart instead.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("cart store io error: {0}")]
    Io(#[from] io::Error),
    #[error("cart encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Handle to the on-disk cart slot.
#[derive(Debug, Clone)]
pub struct CartStore {
    path: PathBuf,
}

impl CartStore {
    /// Store backed by an explicit file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by the standard slot name inside `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(CART_SLOT))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored cart, falling back to empty on any failure.
    #[must_use]
    pub fn load(&self) -> Cart {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no stored cart, starting empty");
                return Cart::new();
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    path = %self.path.display(),
                    "failed to read stored cart, starting empty"
                );
                return Cart::new();
            }
        };
        match serde_json::from_str::<Vec<CartLineItem>>(&text) {
            Ok(items) => Cart::from_items(items),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    path = %self.path.display(),
                    "stored cart is corrupt, starting empty"
                );
                Cart::new()
            }
        }
    }

    /// Write the cart to the slot, replacing the previous contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, the temp file
    /// cannot be written, or the final rename fails.
    pub fn save(&self, cart: &Cart) -> Result<(), StoreError> {
        let payload = serde_json::to_vec(cart.items())?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Unique temp name so concurrent writers never clobber each
        // other's half-written file.
        let tmp = self.path.with_extension(format!("{}.tmp", Uuid::new_v4()));
        fs::write(&tmp, payload)?;
        if let Err(err) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
