use thiserror::Error;

use crate::parcel::ParcelStatus;

/// The single error surfaced by [`crate::ParcelStore`].
///
/// Missing rows, constraint failures and I/O problems all land here; callers
/// treat any `Err` as the operation having failed.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct StoreError(#[from] rusqlite::Error);

impl StoreError {
    /// The underlying SQLite error.
    pub fn inner(&self) -> &rusqlite::Error {
        &self.0
    }
}

/// Text that does not name a [`ParcelStatus`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown parcel status: {0:?}")]
pub struct ParseStatusError(pub String);

/// Errors raised by [`crate::ParcelService`].
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("parcel {number} is {status}, only registered parcels can be changed")]
    NotRegistered { number: i64, status: ParcelStatus },
}
