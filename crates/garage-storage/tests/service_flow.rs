//! End-to-end engine behaviour over real record stores

use std::sync::{Arc, Mutex};
use std::thread;

use garage_core::{
    EngineError, FixedClock, Notifier, RecordStore, RulesConfig, StorageError, ValidationError,
    Vehicle, VehicleDraft, VehicleService,
};
use garage_storage::{MemoryRecordStore, SqliteRecordStore};

#[derive(Default)]
struct RecordingNotifier {
    plates: Mutex<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn brand_registered(&self, vehicle: &Vehicle) {
        self.plates.lock().unwrap().push(vehicle.plate.clone());
    }
}

fn draft(plate: &str) -> VehicleDraft {
    VehicleDraft::new()
        .plate(plate)
        .brand("Toyota")
        .model_year("2019")
        .color("Rojo")
        .owner("Maria Lopez")
}

fn service(store: Arc<dyn RecordStore>) -> VehicleService {
    VehicleService::new(store, RulesConfig::default()).with_clock(Arc::new(FixedClock(2026)))
}

fn memory_service() -> (MemoryRecordStore, VehicleService) {
    let store = MemoryRecordStore::new();
    let service = service(Arc::new(store.clone()));
    (store, service)
}

#[test]
fn test_full_lifecycle_on_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteRecordStore::open(dir.path().join("garage.db")).unwrap();
    let service = service(Arc::new(store));

    service.create(&draft("AAA111")).unwrap();
    let created = service.create(&draft("ABC123")).unwrap();

    let listed = service.list_all().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0], created);

    service
        .update(created.id, &draft("ABC123").color("Azul"))
        .unwrap();
    let found = service.find_by_id(created.id).unwrap().unwrap();
    assert_eq!(found.color.as_deref(), Some("Azul"));
    assert_eq!(found.plate, "ABC123");

    service.delete(created.id).unwrap();
    assert!(service.find_by_id(created.id).unwrap().is_none());
    assert_eq!(service.list_all().unwrap().len(), 1);
}

#[test]
fn test_plate_uniqueness_ignores_case() {
    let (_, service) = memory_service();
    service.create(&draft("ABC123")).unwrap();

    let err = service.create(&draft("abc123")).unwrap_err();
    assert_eq!(err.to_string(), "plate already registered");
}

#[test]
fn test_plate_uniqueness_agrees_across_backends() {
    let dir = tempfile::tempdir().unwrap();
    let sqlite = SqliteRecordStore::open(dir.path().join("garage.db")).unwrap();
    let stores: Vec<Arc<dyn RecordStore>> = vec![
        Arc::new(MemoryRecordStore::new()) as Arc<dyn RecordStore>,
        Arc::new(sqlite),
    ];

    for store in stores {
        let backend = store.backend();
        let service = service(store);
        service.create(&draft("ÑAB123")).unwrap();
        service.create(&draft("ABC123")).unwrap();

        for duplicate in ["ñab123", "ABC123\t"] {
            let err = service.create(&draft(duplicate)).unwrap_err();
            assert_eq!(
                err,
                EngineError::Validation(ValidationError::PlateAlreadyRegistered),
                "backend {backend}, plate {duplicate:?}"
            );
        }
        assert_eq!(service.list_all().unwrap().len(), 2, "backend {backend}");
    }
}

#[test]
fn test_update_cannot_take_another_plate() {
    let (_, service) = memory_service();
    service.create(&draft("AAA111")).unwrap();
    let other = service.create(&draft("BBB222")).unwrap();

    let err = service.update(other.id, &draft("aaa111")).unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation(ValidationError::PlateAlreadyRegistered)
    );

    // Same plate in a different case is still the record's own plate
    service.update(other.id, &draft("bbb222")).unwrap();
}

#[test]
fn test_model_year_window() {
    let (_, service) = memory_service();
    assert!(service.create(&draft("AAA111").model_year("2006")).is_ok());
    assert!(service.create(&draft("BBB222").model_year("2027")).is_ok());

    let err = service.create(&draft("CCC333").model_year("1800")).unwrap_err();
    assert_eq!(err.to_string(), "vehicle too old, >20 years");

    let err = service.create(&draft("DDD444").model_year("2028")).unwrap_err();
    assert_eq!(err.to_string(), "model year cannot be in the future");
}

#[test]
fn test_color_aliases() {
    let (_, service) = memory_service();
    assert!(service.create(&draft("AAA111").color("rojo")).is_ok());
    assert!(service.create(&draft("BBB222").color("ROJO")).is_ok());
    assert!(service.create(&draft("CCC333").color("Red")).is_ok());

    let err = service.create(&draft("DDD444").color("Verde")).unwrap_err();
    assert!(err.to_string().starts_with("color not allowed"));

    // Blank color means no color
    let created = service.create(&draft("EEE555").color("  ")).unwrap();
    assert_eq!(created.color, None);
}

#[test]
fn test_protected_owner_survives_delete() {
    let (_, service) = memory_service();
    let protected = service
        .create(&draft("AAA111").owner("administrador"))
        .unwrap();

    let err = service.delete(protected.id).unwrap_err();
    assert_eq!(err.to_string(), "cannot delete protected owner");
    assert!(service.find_by_id(protected.id).unwrap().is_some());
}

#[test]
fn test_delete_missing_id_has_no_effect() {
    let (store, service) = memory_service();
    service.create(&draft("AAA111")).unwrap();

    service.delete(9_999).unwrap();
    assert_eq!(store.len(), 1);
}

#[test]
fn test_hostile_input_never_reaches_store() {
    let (store, service) = memory_service();
    let hostile = "1; DROP TABLE vehiculos; --";

    for candidate in [
        draft(hostile),
        draft("AAA111").brand(hostile),
        draft("AAA111").owner(hostile),
    ] {
        let err = service.create(&candidate).unwrap_err();
        assert_eq!(err, EngineError::Validation(ValidationError::InputNotAllowed));
    }
    assert!(store.is_empty());
}

#[test]
fn test_sessions_released_on_every_path() {
    let (store, service) = memory_service();

    // Success
    let created = service.create(&draft("AAA111")).unwrap();
    assert_eq!(store.open_sessions(), 0);

    // Validation failure before the store
    service.create(&draft("AB")).unwrap_err();
    assert_eq!(store.open_sessions(), 0);

    // Validation failure inside the store session
    service.create(&draft("aaa111")).unwrap_err();
    service.update(created.id + 1, &draft("ZZZ999")).unwrap_err();
    assert_eq!(store.open_sessions(), 0);

    // Storage failure
    store.set_unavailable(true);
    let err = service.list_all().unwrap_err();
    assert!(matches!(err, EngineError::Storage(StorageError::Unavailable(_))));
    assert!(!err.is_user_error());
    assert_eq!(store.open_sessions(), 0);
    store.set_unavailable(false);

    service.delete(created.id).unwrap();
    service.list_all().unwrap();
    service.find_by_id(created.id).unwrap();
    assert_eq!(store.open_sessions(), 0);
}

#[test]
fn test_notification_for_watched_brand_only() {
    let (_, service) = memory_service();
    let notifier = Arc::new(RecordingNotifier::default());
    let service = service.with_notifier(notifier.clone());

    service.create(&draft("AAA111").brand("FERRARI")).unwrap();
    service.create(&draft("BBB222").brand("ferrari")).unwrap();
    service.create(&draft("CCC333").brand("Fiat")).unwrap();

    assert_eq!(
        *notifier.plates.lock().unwrap(),
        vec!["AAA111".to_string(), "BBB222".to_string()]
    );
}

#[test]
fn test_concurrent_duplicate_creates_on_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteRecordStore::open(dir.path().join("race.db")).unwrap();
    let service = service(Arc::new(store));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = service.clone();
            thread::spawn(move || service.create(&draft("RACE01")))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let created = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(created, 1);

    for err in results.into_iter().filter_map(Result::err) {
        assert!(
            matches!(
                err,
                EngineError::Validation(ValidationError::PlateAlreadyRegistered)
                    | EngineError::Storage(StorageError::Constraint(_))
                    | EngineError::Storage(StorageError::Unavailable(_))
            ),
            "unexpected error: {err:?}"
        );
    }
    assert_eq!(service.list_all().unwrap().len(), 1);
}
