use tracing::info;

use crate::error::ServiceError;
use crate::parcel::{Parcel, ParcelStatus};
use crate::store::ParcelStore;

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Lifecycle rules on top of [`ParcelStore`].
///
/// Address changes and deletion are only allowed while a parcel is still
/// registered. Status only moves forward one step at a time.
pub struct ParcelService {
    store: ParcelStore,
}

impl ParcelService {
    pub fn new(store: ParcelStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ParcelStore {
        &self.store
    }

    /// Register a new parcel for `client` and return it with its number set.
    pub fn register(&self, client: i64, address: &str) -> Result<Parcel> {
        let mut parcel = Parcel::new(client, address);
        parcel.number = self.store.add(&parcel)?;
        info!(
            number = parcel.number,
            client,
            address,
            created_at = %parcel.created_at,
            "registered parcel"
        );
        Ok(parcel)
    }

    pub fn client_parcels(&self, client: i64) -> Result<Vec<Parcel>> {
        Ok(self.store.get_by_client(client)?)
    }

    /// Advance the parcel one step. Returns `None` if it was already delivered.
    pub fn next_status(&self, number: i64) -> Result<Option<ParcelStatus>> {
        let parcel = self.store.get(number)?;
        let Some(next) = parcel.status.next() else {
            info!(number, "parcel already delivered");
            return Ok(None);
        };
        self.store.set_status(number, next)?;
        info!(number, from = %parcel.status, to = %next, "parcel status changed");
        Ok(Some(next))
    }

    pub fn change_address(&self, number: i64, address: &str) -> Result<()> {
        if !self
            .store
            .set_address_if_status(number, address, ParcelStatus::Registered)?
        {
            return Err(self.rejection(number));
        }
        info!(number, address, "parcel address changed");
        Ok(())
    }

    pub fn delete(&self, number: i64) -> Result<()> {
        if !self.store.delete_if_status(number, ParcelStatus::Registered)? {
            return Err(self.rejection(number));
        }
        info!(number, "parcel deleted");
        Ok(())
    }

    /// Explain why a conditional write on `number` touched no row.
    fn rejection(&self, number: i64) -> ServiceError {
        match self.store.get(number) {
            Ok(parcel) => ServiceError::NotRegistered {
                number,
                status: parcel.status,
            },
            Err(err) => ServiceError::Store(err),
        }
    }
}
