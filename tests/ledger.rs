//! Ledger tests.

use std::fs;
use std::path::PathBuf;

use casino::{InMemoryLedger, JsonFileLedger, Ledger, LedgerError, SaveData};
use chrono::{DateTime, TimeZone, Utc};

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
}

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("casino-ledger-{}", std::process::id()))
        .join(name)
}

#[test]
fn fresh_record_is_stamped_at_midnight() {
    let data = SaveData::fresh(1000, at(4, 15));
    assert_eq!(data.remaining_chips, 1000);
    assert_eq!(data.last_reset_at, at(4, 0));
}

#[test]
fn refresh_only_when_broke_and_a_new_day() {
    let mut broke_yesterday = SaveData {
        remaining_chips: 0,
        last_reset_at: at(3, 0),
    };
    assert!(broke_yesterday.refresh(1000, at(4, 9)));
    assert_eq!(broke_yesterday.remaining_chips, 1000);
    assert_eq!(broke_yesterday.last_reset_at, at(4, 0));

    let mut broke_today = SaveData {
        remaining_chips: 0,
        last_reset_at: at(4, 0),
    };
    assert!(!broke_today.refresh(1000, at(4, 23)));
    assert_eq!(broke_today.remaining_chips, 0);

    let mut solvent = SaveData {
        remaining_chips: 5,
        last_reset_at: at(1, 0),
    };
    assert!(!solvent.refresh(1000, at(4, 9)));
    assert_eq!(solvent.remaining_chips, 5);
}

#[test]
fn debit_and_credit_rewrite_the_record() {
    let ledger = InMemoryLedger::new(100);

    assert_eq!(ledger.debit(30).unwrap().remaining_chips, 70);
    assert_eq!(ledger.credit(45).unwrap().remaining_chips, 115);
    assert_eq!(ledger.read().unwrap().remaining_chips, 115);

    // Never below zero.
    assert_eq!(ledger.debit(500).unwrap().remaining_chips, 0);
}

#[test]
fn clones_share_one_record() {
    let ledger = InMemoryLedger::new(100);
    let other = ledger.clone();

    ledger.debit(40).unwrap();
    assert_eq!(other.read().unwrap().remaining_chips, 60);
}

#[test]
fn ledger_refresh_saves_the_top_up() {
    let ledger = InMemoryLedger::with_record(SaveData {
        remaining_chips: 0,
        last_reset_at: at(2, 0),
    });

    let data = ledger.refresh(250, at(4, 12)).unwrap();
    assert_eq!(data.remaining_chips, 250);
    assert_eq!(ledger.read().unwrap(), data);
}

#[test]
fn json_file_round_trip() {
    let path = scratch("round-trip/save.json");
    let _ = fs::remove_file(&path);

    let ledger = JsonFileLedger::new(&path, 1000);
    assert_eq!(ledger.read().unwrap().remaining_chips, 1000);
    assert!(!path.exists());

    ledger.debit(125).unwrap();
    assert!(path.exists());

    let reopened = JsonFileLedger::new(&path, 1000);
    assert_eq!(reopened.read().unwrap().remaining_chips, 875);

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"remainingChips\": 875"));
    assert!(raw.contains("\"lastResetAt\""));

    let _ = fs::remove_file(&path);
}

#[test]
fn saving_leaves_sibling_files_alone() {
    let path = scratch("siblings/save.json");
    let neighbour = path.with_file_name("save.tmp");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&neighbour, "keep me").unwrap();

    JsonFileLedger::new(&path, 1000).debit(1).unwrap();

    assert_eq!(fs::read_to_string(&neighbour).unwrap(), "keep me");
    assert!(!path.with_file_name("save.json.tmp").exists());

    let _ = fs::remove_file(&path);
    let _ = fs::remove_file(&neighbour);
}

#[test]
fn save_file_may_end_in_tmp() {
    let path = scratch("tmp-name/chips.tmp");
    let _ = fs::remove_file(&path);

    JsonFileLedger::new(&path, 1000).debit(10).unwrap();

    assert_eq!(JsonFileLedger::new(&path, 1000).read().unwrap().remaining_chips, 990);
    assert!(!path.with_file_name("chips.tmp.tmp").exists());

    let _ = fs::remove_file(&path);
}

#[test]
fn malformed_file_is_an_error() {
    let path = scratch("malformed.json");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "{ not json").unwrap();

    let ledger = JsonFileLedger::new(&path, 1000);
    assert!(matches!(ledger.read(), Err(LedgerError::Json(_))));

    let _ = fs::remove_file(&path);
}
