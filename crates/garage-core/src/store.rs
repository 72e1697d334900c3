//! Record store contract
//!
//! The engine opens one [`StoreSession`] per operation through
//! [`RecordStore::session`] and drops it before returning, whatever the
//! outcome. Implementations must bind every value as a parameter and must not
//! apply business rules of their own.

use crate::error::StorageError;
use crate::model::{NewVehicle, Vehicle, VehicleId};

/// Factory for scoped store sessions
#[cfg_attr(test, mockall::automock)]
pub trait RecordStore: Send + Sync {
    /// Open a session; it is released when dropped
    fn session(&self) -> Result<Box<dyn StoreSession>, StorageError>;

    /// Backend name for logs and health reports
    fn backend(&self) -> &'static str;
}

/// One connection's worth of record operations
#[cfg_attr(test, mockall::automock)]
pub trait StoreSession: Send {
    /// All records, newest (highest id) first
    fn list_all(&self) -> Result<Vec<Vehicle>, StorageError>;

    fn find_by_id(&self, id: VehicleId) -> Result<Option<Vehicle>, StorageError>;

    /// Case-insensitive plate lookup
    fn exists_by_plate(&self, plate: &str) -> Result<bool, StorageError>;

    /// Insert a record and return the id assigned to it
    fn insert(&mut self, vehicle: &NewVehicle) -> Result<VehicleId, StorageError>;

    fn update_by_id(&mut self, id: VehicleId, vehicle: &NewVehicle) -> Result<(), StorageError>;

    fn delete_by_id(&mut self, id: VehicleId) -> Result<(), StorageError>;
}
