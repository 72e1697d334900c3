//! In-memory record store
//!
//! Rows live in a `BTreeMap` behind a mutex shared by all sessions. The store
//! keeps a count of open sessions and can be switched to "unavailable" so
//! callers can exercise their failure paths without a real database.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use garage_core::{plate_key, NewVehicle, RecordStore, StorageError, StoreSession, Vehicle, VehicleId};

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<VehicleId, Vehicle>,
    last_id: VehicleId,
}

impl Table {
    fn plate_taken(&self, plate: &str, except: Option<VehicleId>) -> bool {
        let key = plate_key(plate);
        self.rows
            .values()
            .any(|row| Some(row.id) != except && plate_key(&row.plate) == key)
    }
}

/// Record store kept entirely in process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    table: Arc<Mutex<Table>>,
    open_sessions: Arc<AtomicUsize>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sessions opened and not yet dropped
    pub fn open_sessions(&self) -> usize {
        self.open_sessions.load(Ordering::SeqCst)
    }

    /// Make every new session fail with [`StorageError::Unavailable`]
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored rows
    pub fn len(&self) -> usize {
        self.table.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordStore for MemoryRecordStore {
    fn session(&self) -> Result<Box<dyn StoreSession>, StorageError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::unavailable("memory store is offline"));
        }
        self.open_sessions.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemorySession {
            table: Arc::clone(&self.table),
            open_sessions: Arc::clone(&self.open_sessions),
        }))
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

struct MemorySession {
    table: Arc<Mutex<Table>>,
    open_sessions: Arc<AtomicUsize>,
}

impl Drop for MemorySession {
    fn drop(&mut self) {
        self.open_sessions.fetch_sub(1, Ordering::SeqCst);
    }
}

impl StoreSession for MemorySession {
    fn list_all(&self) -> Result<Vec<Vehicle>, StorageError> {
        Ok(self.table.lock().rows.values().rev().cloned().collect())
    }

    fn find_by_id(&self, id: VehicleId) -> Result<Option<Vehicle>, StorageError> {
        Ok(self.table.lock().rows.get(&id).cloned())
    }

    fn exists_by_plate(&self, plate: &str) -> Result<bool, StorageError> {
        Ok(self.table.lock().plate_taken(plate, None))
    }

    fn insert(&mut self, vehicle: &NewVehicle) -> Result<VehicleId, StorageError> {
        let mut table = self.table.lock();
        if table.plate_taken(&vehicle.plate, None) {
            return Err(StorageError::constraint("plate must be unique"));
        }
        table.last_id += 1;
        let id = table.last_id;
        table.rows.insert(id, vehicle.clone().into_vehicle(id));
        Ok(id)
    }

    fn update_by_id(&mut self, id: VehicleId, vehicle: &NewVehicle) -> Result<(), StorageError> {
        let mut table = self.table.lock();
        if table.plate_taken(&vehicle.plate, Some(id)) {
            return Err(StorageError::constraint("plate must be unique"));
        }
        if let Some(row) = table.rows.get_mut(&id) {
            *row = vehicle.clone().into_vehicle(id);
        }
        Ok(())
    }

    fn delete_by_id(&mut self, id: VehicleId) -> Result<(), StorageError> {
        self.table.lock().rows.remove(&id);
        Ok(())
    }
}
