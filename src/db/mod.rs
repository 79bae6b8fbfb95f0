//! Database layer (Firestore, with an in-memory stand-in).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::config::{Config, DbBackend};
use crate::error::AppError;
use crate::models::{ClothingItem, User};
use sha2::{Digest, Sha256};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Create-only email reservations (keyed by encoded email)
    pub const USER_EMAILS: &str = "user_emails";
    pub const CLOTHING_ITEMS: &str = "clothingitems";
    /// Raw image URLs staged by the import tool (keyed by URL hash)
    pub const IMAGE_URLS: &str = "forma_images";
}

/// Document ID reserving a normalized email address.
pub(crate) fn email_doc_id(email: &str) -> String {
    urlencoding::encode(email).into_owned()
}

/// Document ID for an image URL (URLs contain `/`, which Firestore IDs cannot).
pub(crate) fn url_doc_id(url: &str) -> String {
    hex::encode(Sha256::digest(url.as_bytes()))
}

/// Storage handle shared by every request.
#[derive(Clone)]
pub enum Database {
    Firestore(FirestoreDb),
    Memory(MemoryDb),
}

impl Database {
    /// Connect to the backend selected in `config`.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        match config.db_backend {
            DbBackend::Firestore => Ok(Self::Firestore(
                FirestoreDb::new(&config.gcp_project_id).await?,
            )),
            DbBackend::Memory => {
                tracing::warn!("Using in-memory database; data will not persist");
                Ok(Self::Memory(MemoryDb::new()))
            }
        }
    }

    /// A handle whose every operation fails, for exercising error paths.
    pub fn offline() -> Self {
        Self::Firestore(FirestoreDb::new_mock())
    }

    pub fn in_memory() -> Self {
        Self::Memory(MemoryDb::new())
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        match self {
            Self::Firestore(db) => db.get_user(user_id).await,
            Self::Memory(db) => Ok(db.get_user(user_id)),
        }
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        match self {
            Self::Firestore(db) => db.find_user_by_email(email).await,
            Self::Memory(db) => Ok(db.find_user_by_email(email)),
        }
    }

    /// Insert a new user. Fails with `EmailTaken` if the email is already claimed.
    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        match self {
            Self::Firestore(db) => db.create_user(user).await,
            Self::Memory(db) => db.create_user(user),
        }
    }

    pub async fn save_user(&self, user: &User) -> Result<(), AppError> {
        match self {
            Self::Firestore(db) => db.save_user(user).await,
            Self::Memory(db) => {
                db.save_user(user);
                Ok(())
            }
        }
    }

    /// Catalog items whose `name_key` equals one of `keys` (already normalized).
    pub async fn find_clothing_items(&self, keys: &[String]) -> Result<Vec<ClothingItem>, AppError> {
        match self {
            Self::Firestore(db) => db.find_clothing_items(keys).await,
            Self::Memory(db) => db.find_clothing_items(keys),
        }
    }

    pub async fn insert_clothing_items(&self, items: &[ClothingItem]) -> Result<usize, AppError> {
        match self {
            Self::Firestore(db) => db.insert_clothing_items(items).await,
            Self::Memory(db) => db.insert_clothing_items(items),
        }
    }

    /// Returns `false` if the URL was already stored.
    pub async fn insert_image_url(&self, url: &str) -> Result<bool, AppError> {
        match self {
            Self::Firestore(db) => db.insert_image_url(url).await,
            Self::Memory(db) => Ok(db.insert_image_url(url)),
        }
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        match self {
            Self::Firestore(db) => db.ping().await,
            Self::Memory(_) => Ok(()),
        }
    }
}
