use rusqlite::{params, Connection, Row};
use tracing::debug;

use crate::error::StoreError;
use crate::parcel::{Parcel, ParcelStatus};
use crate::sqlite::{open_connection, SqliteConfig};

pub type Result<T> = std::result::Result<T, StoreError>;

const INSERT_PARCEL: &str =
    "INSERT INTO parcel (client, status, address, created_at) VALUES (?1, ?2, ?3, ?4)";

const SELECT_BY_NUMBER: &str =
    "SELECT number, client, status, address, created_at FROM parcel WHERE number = ?1";

const SELECT_BY_CLIENT: &str = "SELECT number, client, status, address, created_at \
     FROM parcel WHERE client = ?1 ORDER BY number";

const UPDATE_ADDRESS: &str = "UPDATE parcel SET address = ?1 WHERE number = ?2";

const UPDATE_STATUS: &str = "UPDATE parcel SET status = ?1 WHERE number = ?2";

const DELETE_PARCEL: &str = "DELETE FROM parcel WHERE number = ?1";

const UPDATE_ADDRESS_IF_STATUS: &str =
    "UPDATE parcel SET address = ?1 WHERE number = ?2 AND status = ?3";

const DELETE_PARCEL_IF_STATUS: &str = "DELETE FROM parcel WHERE number = ?1 AND status = ?2";

/// Data access for the `parcel` table.
///
/// Every method runs exactly one statement. The plain setters never check
/// whether a status or address change is allowed; that policy belongs to
/// [`crate::ParcelService`], which uses the `*_if_status` variants.
pub struct ParcelStore {
    conn: Connection,
}

impl ParcelStore {
    /// Wrap a connection whose schema already contains the `parcel` table.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Open the configured database, creating the schema if needed.
    pub fn open(config: &SqliteConfig) -> anyhow::Result<Self> {
        Ok(Self::new(open_connection(config)?))
    }

    /// Insert `parcel` and return its newly generated number.
    ///
    /// `parcel.number` is ignored.
    pub fn add(&self, parcel: &Parcel) -> Result<i64> {
        self.conn.execute(
            INSERT_PARCEL,
            params![
                parcel.client,
                parcel.status,
                parcel.address,
                parcel.created_at
            ],
        )?;
        let number = self.conn.last_insert_rowid();
        debug!(number, client = parcel.client, "added parcel");
        Ok(number)
    }

    /// Fetch a parcel by number. A missing row is an error.
    pub fn get(&self, number: i64) -> Result<Parcel> {
        let parcel = self
            .conn
            .query_row(SELECT_BY_NUMBER, [number], parcel_from_row)?;
        Ok(parcel)
    }

    /// Remove a parcel. Succeeds whether or not the row existed.
    pub fn delete(&self, number: i64) -> Result<()> {
        let affected = self.conn.execute(DELETE_PARCEL, [number])?;
        debug!(number, affected, "deleted parcel");
        Ok(())
    }

    pub fn set_address(&self, number: i64, address: &str) -> Result<()> {
        let affected = self.conn.execute(UPDATE_ADDRESS, params![address, number])?;
        debug!(number, affected, "updated parcel address");
        Ok(())
    }

    pub fn set_status(&self, number: i64, status: ParcelStatus) -> Result<()> {
        let affected = self.conn.execute(UPDATE_STATUS, params![status, number])?;
        debug!(number, %status, affected, "updated parcel status");
        Ok(())
    }

    /// Update the address only if the parcel currently has `status`.
    ///
    /// Returns whether a row was changed. Check and write are one statement.
    pub fn set_address_if_status(
        &self,
        number: i64,
        address: &str,
        status: ParcelStatus,
    ) -> Result<bool> {
        let affected = self
            .conn
            .execute(UPDATE_ADDRESS_IF_STATUS, params![address, number, status])?;
        debug!(number, %status, affected, "conditionally updated parcel address");
        Ok(affected > 0)
    }

    /// Delete the parcel only if it currently has `status`. Returns whether a
    /// row was removed.
    pub fn delete_if_status(&self, number: i64, status: ParcelStatus) -> Result<bool> {
        let affected = self
            .conn
            .execute(DELETE_PARCEL_IF_STATUS, params![number, status])?;
        debug!(number, %status, affected, "conditionally deleted parcel");
        Ok(affected > 0)
    }

    /// All parcels owned by `client`, oldest first.
    pub fn get_by_client(&self, client: i64) -> Result<Vec<Parcel>> {
        let mut stmt = self.conn.prepare(SELECT_BY_CLIENT)?;
        let rows = stmt.query_map([client], parcel_from_row)?;
        let mut parcels = Vec::new();
        for row in rows {
            parcels.push(row?);
        }
        Ok(parcels)
    }
}

fn parcel_from_row(row: &Row<'_>) -> rusqlite::Result<Parcel> {
    Ok(Parcel {
        number: row.get(0)?,
        client: row.get(1)?,
        status: row.get(2)?,
        address: row.get(3)?,
        created_at: row.get(4)?,
    })
}
