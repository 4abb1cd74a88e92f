use chrono::NaiveDate;
use cycletrack_core::crypto::{NONCE_LEN, TAG_LEN};
use cycletrack_core::{
    Flow, KeyMaterial, PeriodRecord, RecordStore, RecordValidationError, StoreError, StorePaths,
};
use std::fs;
use tempfile::TempDir;

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

fn fresh_store(dir: &TempDir) -> (StorePaths, KeyMaterial, RecordStore) {
    let paths = StorePaths::in_dir(dir.path());
    let key = KeyMaterial::load_or_generate(&paths.key_file).unwrap();
    let store = RecordStore::open(&paths.data_file, &key).unwrap();
    (paths, key, store)
}

#[test]
fn missing_data_file_opens_empty_store() {
    let dir = TempDir::new().unwrap();
    let (paths, _, store) = fresh_store(&dir);

    assert!(store.is_empty());
    assert!(store.records().is_empty());
    assert!(!paths.data_file.exists());
}

#[test]
fn add_record_keeps_sequence_sorted_and_persists_each_mutation() {
    let dir = TempDir::new().unwrap();
    let (paths, key, mut store) = fresh_store(&dir);

    store
        .add_record("2024-02-25", "2024-02-29", "Heavy", "cramps")
        .unwrap();
    store
        .add_record("2024-01-01", "2024-01-05", "", "cramps, fatigue")
        .unwrap();
    let added = store
        .add_record("2024-01-29", "2024-02-02", "light", "")
        .unwrap();
    assert_eq!(added.flow, Flow::Light);

    let starts: Vec<NaiveDate> = store.records().iter().map(|r| r.start_date).collect();
    assert_eq!(
        starts,
        vec![date("2024-01-01"), date("2024-01-29"), date("2024-02-25")]
    );

    let reopened = RecordStore::open(&paths.data_file, &key).unwrap();
    assert_eq!(reopened.records(), store.records());
    assert_eq!(reopened.records()[0].flow, Flow::Medium);
    assert_eq!(reopened.records()[0].symptoms, "cramps, fatigue");
}

#[test]
fn equal_start_dates_keep_insertion_order() {
    let dir = TempDir::new().unwrap();
    let (paths, key, mut store) = fresh_store(&dir);

    store.add_record("2024-05-01", "2024-05-03", "Light", "first").unwrap();
    store.add_record("2024-04-01", "2024-04-03", "Light", "").unwrap();
    store.add_record("2024-05-01", "2024-05-04", "Heavy", "second").unwrap();

    let symptoms: Vec<&str> = store.records().iter().map(|r| r.symptoms.as_str()).collect();
    assert_eq!(symptoms, vec!["", "first", "second"]);

    let reopened = RecordStore::open(&paths.data_file, &key).unwrap();
    assert_eq!(reopened.records(), store.records());
}

#[test]
fn invalid_input_is_rejected_without_touching_store_or_file() {
    let dir = TempDir::new().unwrap();
    let (paths, _, mut store) = fresh_store(&dir);
    store.add_record("2024-01-01", "2024-01-05", "Medium", "").unwrap();
    let blob_before = fs::read(&paths.data_file).unwrap();

    let err = store
        .add_record("2024/02/01", "2024-02-05", "Medium", "")
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::InvalidRecord(RecordValidationError::InvalidDateFormat { .. })
    ));

    let err = store
        .add_record("2024-02-05", "2024-02-01", "Medium", "")
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::InvalidRecord(RecordValidationError::EndBeforeStart { .. })
    ));

    assert_eq!(store.len(), 1);
    assert_eq!(fs::read(&paths.data_file).unwrap(), blob_before);
}

#[test]
fn save_then_load_round_trips_field_for_field() {
    let dir = TempDir::new().unwrap();
    let (paths, key, mut store) = fresh_store(&dir);

    let records = vec![
        PeriodRecord::new(
            date("2023-12-30"),
            date("2024-01-02"),
            Flow::Other("spotting".to_string()),
            "mood swings, \"bad\" headache",
        )
        .unwrap(),
        PeriodRecord::new(date("2023-11-30"), date("2023-11-30"), Flow::Heavy, "").unwrap(),
    ];
    for record in records.iter().cloned() {
        store.insert(record).unwrap();
    }
    store.save().unwrap();

    let mut expected = records;
    expected.sort_by_key(|record| record.start_date);

    let mut reopened = RecordStore::open(&paths.data_file, &key).unwrap();
    assert_eq!(reopened.records(), expected.as_slice());

    reopened.reload().unwrap();
    let first_pass = reopened.records().to_vec();
    reopened.reload().unwrap();
    assert_eq!(reopened.records(), first_pass.as_slice());
}

#[test]
fn inserted_records_match_their_reloaded_form() {
    let dir = TempDir::new().unwrap();
    let (paths, key, mut store) = fresh_store(&dir);

    store
        .insert(PeriodRecord {
            start_date: date("2024-01-01"),
            end_date: date("2024-01-04"),
            flow: Flow::Other("Light".to_string()),
            symptoms: "  cramps ".to_string(),
        })
        .unwrap();
    store
        .insert(PeriodRecord {
            start_date: date("2024-01-29"),
            end_date: date("2024-01-30"),
            flow: Flow::Other(String::new()),
            symptoms: String::new(),
        })
        .unwrap();

    assert_eq!(store.records()[0].flow, Flow::Light);
    assert_eq!(store.records()[0].symptoms, "cramps");
    assert_eq!(store.records()[1].flow, Flow::Medium);

    let reopened = RecordStore::open(&paths.data_file, &key).unwrap();
    assert_eq!(reopened.records(), store.records());
}

#[test]
fn data_file_is_ciphertext_not_plaintext_table() {
    let dir = TempDir::new().unwrap();
    let (paths, _, mut store) = fresh_store(&dir);
    store.add_record("2024-01-01", "2024-01-05", "Heavy", "cramps").unwrap();

    let blob = fs::read(&paths.data_file).unwrap();
    let needle = b"start_date";
    assert!(!blob.windows(needle.len()).any(|window| window == needle));
    assert!(blob.len() > NONCE_LEN + TAG_LEN);
}

#[test]
fn wrong_key_is_reported_as_decryption_failure() {
    let dir = TempDir::new().unwrap();
    let (paths, _, mut store) = fresh_store(&dir);
    store.add_record("2024-01-01", "2024-01-05", "Heavy", "").unwrap();
    let blob_before = fs::read(&paths.data_file).unwrap();

    let other_key = KeyMaterial::generate().unwrap();
    let err = RecordStore::open(&paths.data_file, &other_key)
        .err()
        .expect("foreign key must not open the store");
    assert!(matches!(err, StoreError::Decryption(_)));
    assert_eq!(fs::read(&paths.data_file).unwrap(), blob_before);
}

#[test]
fn truncated_blob_is_reported_as_decryption_failure() {
    let dir = TempDir::new().unwrap();
    let (paths, key, mut store) = fresh_store(&dir);
    store.add_record("2024-01-01", "2024-01-05", "Heavy", "").unwrap();

    let blob = fs::read(&paths.data_file).unwrap();
    fs::write(&paths.data_file, &blob[..blob.len() / 2]).unwrap();
    assert!(matches!(
        RecordStore::open(&paths.data_file, &key),
        Err(StoreError::Decryption(_))
    ));

    fs::write(&paths.data_file, b"").unwrap();
    assert!(matches!(
        RecordStore::open(&paths.data_file, &key),
        Err(StoreError::Decryption(_))
    ));
}

#[test]
fn failed_reload_keeps_current_records() {
    let dir = TempDir::new().unwrap();
    let (paths, _, mut store) = fresh_store(&dir);
    store.add_record("2024-01-01", "2024-01-05", "Heavy", "").unwrap();

    fs::write(&paths.data_file, b"garbage").unwrap();
    assert!(store.reload().is_err());
    assert_eq!(store.len(), 1);
}

#[test]
fn failed_save_leaves_memory_and_disk_unchanged() {
    let dir = TempDir::new().unwrap();
    let key = KeyMaterial::generate().unwrap();
    // A directory where the data file should be makes the final rename fail.
    let data_file = dir.path().join("period_data.csv");
    let mut store = RecordStore::open(&data_file, &key).unwrap();
    fs::create_dir(&data_file).unwrap();
    fs::write(data_file.join("keep"), b"x").unwrap();

    let err = store
        .add_record("2024-01-01", "2024-01-05", "Heavy", "")
        .unwrap_err();
    assert!(matches!(err, StoreError::Persistence { .. }));
    assert!(store.is_empty());
    assert!(data_file.is_dir());
}
