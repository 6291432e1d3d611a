//! SQLite-backed persistence for parcel tracking.
//!
//! # Intention
//!
//! - Provide a small data-access API (`ParcelStore`) over the `parcel` table.
//! - Encapsulate SQLite-specific logic, types, and error handling.
//! - Keep lifecycle policy (who may change what, and when) in `ParcelService`,
//!   outside the store.
//!
//! # Architectural Boundaries
//!
//! - Only SQLite/database code and the parcel policy layer belong here.
//! - No CLI, no migrations, no subscriber setup for logging.

pub mod error;
pub mod parcel;
pub mod service;
pub mod sqlite;
pub mod store;

pub use error::{ParseStatusError, ServiceError, StoreError};
pub use parcel::{Parcel, ParcelStatus};
pub use service::ParcelService;
pub use sqlite::SqliteConfig;
pub use store::ParcelStore;
