use std::fmt;
use std::str::FromStr;

use chrono::{SecondsFormat, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::error::ParseStatusError;

/// Lifecycle marker of a parcel, stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParcelStatus {
    Registered,
    Sent,
    Delivered,
}

impl ParcelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParcelStatus::Registered => "registered",
            ParcelStatus::Sent => "sent",
            ParcelStatus::Delivered => "delivered",
        }
    }

    /// The status a parcel moves to next, or `None` once delivered.
    pub fn next(&self) -> Option<ParcelStatus> {
        match self {
            ParcelStatus::Registered => Some(ParcelStatus::Sent),
            ParcelStatus::Sent => Some(ParcelStatus::Delivered),
            ParcelStatus::Delivered => None,
        }
    }
}

impl fmt::Display for ParcelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParcelStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registered" => Ok(ParcelStatus::Registered),
            "sent" => Ok(ParcelStatus::Sent),
            "delivered" => Ok(ParcelStatus::Delivered),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

impl ToSql for ParcelStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ParcelStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// One row of the `parcel` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    /// Assigned by the store on insert; `0` until then.
    pub number: i64,
    pub client: i64,
    pub status: ParcelStatus,
    pub address: String,
    /// RFC3339, UTC.
    pub created_at: String,
}

impl Parcel {
    /// A freshly registered parcel stamped with the current UTC time.
    pub fn new(client: i64, address: impl Into<String>) -> Self {
        Self {
            number: 0,
            client,
            status: ParcelStatus::Registered,
            address: address.into(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}
