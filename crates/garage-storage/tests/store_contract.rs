//! Behaviour every record store backend must share

use garage_core::{NewVehicle, RecordStore, StorageError};
use garage_storage::{MemoryRecordStore, SqliteRecordStore};
use tempfile::TempDir;

fn new_vehicle(plate: &str, owner: &str) -> NewVehicle {
    NewVehicle {
        plate: plate.to_string(),
        brand: "Toyota".to_string(),
        model_year: "2019".to_string(),
        color: Some("Blanco".to_string()),
        owner: owner.to_string(),
    }
}

/// Both backends; the tempdir must outlive the sqlite store
fn backends() -> (TempDir, Vec<Box<dyn RecordStore>>) {
    let dir = tempfile::tempdir().unwrap();
    let sqlite = SqliteRecordStore::open(dir.path().join("contract.db")).unwrap();
    let stores: Vec<Box<dyn RecordStore>> = vec![
        Box::new(MemoryRecordStore::new()) as Box<dyn RecordStore>,
        Box::new(sqlite),
    ];
    (dir, stores)
}

#[test]
fn test_list_newest_first() {
    let (_dir, stores) = backends();
    for store in stores {
        let mut session = store.session().unwrap();
        let first = session.insert(&new_vehicle("AAA111", "Maria Lopez")).unwrap();
        let second = session.insert(&new_vehicle("BBB222", "Juan Perez")).unwrap();
        let third = session.insert(&new_vehicle("CCC333", "Ana Gomez")).unwrap();

        let ids: Vec<_> = session.list_all().unwrap().iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![third, second, first], "backend {}", store.backend());
    }
}

#[test]
fn test_find_by_id() {
    let (_dir, stores) = backends();
    for store in stores {
        let mut session = store.session().unwrap();
        let id = session.insert(&new_vehicle("AAA111", "Maria Lopez")).unwrap();

        let found = session.find_by_id(id).unwrap().unwrap();
        assert_eq!(found.plate, "AAA111");
        assert_eq!(found.color.as_deref(), Some("Blanco"));
        assert!(session.find_by_id(id + 100).unwrap().is_none());
    }
}

#[test]
fn test_exists_by_plate_ignores_case_and_padding() {
    let (_dir, stores) = backends();
    for store in stores {
        let mut session = store.session().unwrap();
        session.insert(&new_vehicle("ABC123", "Maria Lopez")).unwrap();

        assert!(session.exists_by_plate("ABC123").unwrap());
        assert!(session.exists_by_plate("abc123").unwrap());
        assert!(session.exists_by_plate("  aBc123 ").unwrap());
        assert!(!session.exists_by_plate("ABC124").unwrap());
        assert!(session.exists_by_plate("ABC123\t").unwrap());

        session.insert(&new_vehicle("ÑAB123", "Juan Perez")).unwrap();
        assert!(session.exists_by_plate("ñab123").unwrap(), "backend {}", store.backend());
        assert!(
            session.insert(&new_vehicle("ñab123", "Ana Gomez")).is_err(),
            "backend {}",
            store.backend()
        );
    }
}

#[test]
fn test_duplicate_plate_is_a_constraint_error() {
    let (_dir, stores) = backends();
    for store in stores {
        let mut session = store.session().unwrap();
        session.insert(&new_vehicle("ABC123", "Maria Lopez")).unwrap();

        let err = session
            .insert(&new_vehicle("abc123", "Juan Perez"))
            .unwrap_err();
        assert!(
            matches!(err, StorageError::Constraint(_)),
            "backend {}: {err:?}",
            store.backend()
        );
        assert_eq!(session.list_all().unwrap().len(), 1);
    }
}

#[test]
fn test_update_overwrites_every_field() {
    let (_dir, stores) = backends();
    for store in stores {
        let mut session = store.session().unwrap();
        let id = session.insert(&new_vehicle("AAA111", "Maria Lopez")).unwrap();

        let replacement = NewVehicle {
            plate: "ZZZ999".to_string(),
            brand: "Fiat".to_string(),
            model_year: "2021".to_string(),
            color: None,
            owner: "Juan Perez".to_string(),
        };
        session.update_by_id(id, &replacement).unwrap();

        let stored = session.find_by_id(id).unwrap().unwrap();
        assert_eq!(stored, replacement.into_vehicle(id));
    }
}

#[test]
fn test_delete_missing_id_is_ok() {
    let (_dir, stores) = backends();
    for store in stores {
        let mut session = store.session().unwrap();
        let id = session.insert(&new_vehicle("AAA111", "Maria Lopez")).unwrap();

        session.delete_by_id(id).unwrap();
        session.delete_by_id(id).unwrap();
        assert!(session.find_by_id(id).unwrap().is_none());
    }
}

#[test]
fn test_hostile_text_is_stored_verbatim() {
    let hostile = "x'); DROP TABLE vehicles; --";
    let (_dir, stores) = backends();
    for store in stores {
        let mut session = store.session().unwrap();
        let id = session.insert(&new_vehicle("AAA111", hostile)).unwrap();

        assert_eq!(session.find_by_id(id).unwrap().unwrap().owner, hostile);
        assert_eq!(session.list_all().unwrap().len(), 1);
    }
}

#[test]
fn test_sqlite_data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garage.db");

    let id = {
        let store = SqliteRecordStore::open(&path).unwrap();
        let mut session = store.session().unwrap();
        session.insert(&new_vehicle("AAA111", "Maria Lopez")).unwrap()
    };

    let store = SqliteRecordStore::open(&path).unwrap();
    let session = store.session().unwrap();
    assert_eq!(session.find_by_id(id).unwrap().unwrap().plate, "AAA111");
    assert_eq!(store.path(), path.as_path());
}

#[test]
fn test_sessions_see_each_others_writes() {
    let (_dir, stores) = backends();
    for store in stores {
        let id = {
            let mut writer = store.session().unwrap();
            writer.insert(&new_vehicle("AAA111", "Maria Lopez")).unwrap()
        };
        let reader = store.session().unwrap();
        assert!(reader.find_by_id(id).unwrap().is_some());
    }
}
