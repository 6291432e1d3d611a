use anyhow::Result;
use rust_parcel::sqlite::{parcel_schema, SqliteConfig};
use rust_parcel::{ParcelService, ParcelStatus, ParcelStore, ServiceError};
use rusqlite::Connection;
use tempfile::NamedTempFile;

fn create_test_service() -> Result<ParcelService> {
    let store = ParcelStore::open(&SqliteConfig::in_memory())?;
    Ok(ParcelService::new(store))
}

#[test]
fn test_register_assigns_number() -> Result<()> {
    let service = create_test_service()?;
    let parcel = service.register(1000, "test")?;
    assert!(parcel.number > 0);
    assert_eq!(parcel.status, ParcelStatus::Registered);
    assert_eq!(service.store().get(parcel.number)?, parcel);
    Ok(())
}

#[test]
fn test_next_status_walks_lifecycle() -> Result<()> {
    let service = create_test_service()?;
    let number = service.register(1000, "test")?.number;

    assert_eq!(service.next_status(number)?, Some(ParcelStatus::Sent));
    assert_eq!(service.next_status(number)?, Some(ParcelStatus::Delivered));
    assert_eq!(service.next_status(number)?, None);
    assert_eq!(service.store().get(number)?.status, ParcelStatus::Delivered);
    Ok(())
}

#[test]
fn test_change_address_only_while_registered() -> Result<()> {
    let service = create_test_service()?;
    let number = service.register(1000, "test")?.number;

    service.change_address(number, "new address")?;
    assert_eq!(service.store().get(number)?.address, "new address");

    service.next_status(number)?;
    let err = service.change_address(number, "too late").unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotRegistered {
            status: ParcelStatus::Sent,
            ..
        }
    ));
    assert_eq!(service.store().get(number)?.address, "new address");
    Ok(())
}

#[test]
fn test_delete_only_while_registered() -> Result<()> {
    let service = create_test_service()?;
    let kept = service.register(1000, "kept")?.number;
    let removed = service.register(1000, "removed")?.number;

    service.next_status(kept)?;
    assert!(service.delete(kept).is_err());
    service.delete(removed)?;

    let remaining = service.client_parcels(1000)?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].number, kept);
    Ok(())
}

#[test]
fn test_missing_parcel_surfaces_store_error() -> Result<()> {
    let service = create_test_service()?;
    assert!(matches!(service.next_status(99), Err(ServiceError::Store(_))));
    assert!(matches!(service.delete(99), Err(ServiceError::Store(_))));
    Ok(())
}

#[test]
fn test_status_change_from_another_connection_blocks_edits() -> Result<()> {
    let temp_file = NamedTempFile::new()?;
    let config = SqliteConfig::new(temp_file.path().to_string_lossy(), parcel_schema());
    let service = ParcelService::new(ParcelStore::open(&config)?);
    let number = service.register(1000, "test")?.number;

    // another writer ships the parcel behind the service's back
    let other = Connection::open(temp_file.path())?;
    other.execute(
        "UPDATE parcel SET status = 'sent' WHERE number = ?1",
        [number],
    )?;

    assert!(matches!(
        service.change_address(number, "too late"),
        Err(ServiceError::NotRegistered {
            status: ParcelStatus::Sent,
            ..
        })
    ));
    assert!(matches!(
        service.delete(number),
        Err(ServiceError::NotRegistered { .. })
    ));

    let stored = service.store().get(number)?;
    assert_eq!(stored.address, "test");
    assert_eq!(stored.status, ParcelStatus::Sent);
    Ok(())
}
