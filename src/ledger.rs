//! Bankroll persistence.
//!
//! Engines never hold a bankroll across a bet: every debit or credit is its own
//! whole-record read-modify-write against a [`Ledger`].

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::LedgerError;
use crate::sync::Mutex;

const LOG_TARGET: &str = "casino::ledger";

/// The persisted bankroll record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    /// Chips available to wager.
    pub remaining_chips: u64,
    /// Start of the UTC day on which the bankroll was last topped up.
    pub last_reset_at: DateTime<Utc>,
}

impl SaveData {
    /// A fresh record holding `chips`, stamped with the midnight preceding `now`.
    #[must_use]
    pub fn fresh(chips: u64, now: DateTime<Utc>) -> Self {
        Self {
            remaining_chips: chips,
            last_reset_at: previous_midnight(now),
        }
    }

    /// Tops the bankroll back up to `chips` if it is empty and the last reset
    /// happened before today's UTC midnight.
    ///
    /// Returns `true` if the record changed.
    pub fn refresh(&mut self, chips: u64, now: DateTime<Utc>) -> bool {
        let midnight = previous_midnight(now);
        if self.remaining_chips > 0 || self.last_reset_at >= midnight {
            return false;
        }

        self.remaining_chips = chips;
        self.last_reset_at = midnight;
        true
    }
}

fn previous_midnight(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Storage for the single bankroll record.
pub trait Ledger: Send + Sync {
    /// Reads the whole record.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn read(&self) -> Result<SaveData, LedgerError>;

    /// Replaces the whole record.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn save(&self, data: &SaveData) -> Result<(), LedgerError>;

    /// Removes `amount` chips, never going below zero. Returns the new record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be read or saved.
    fn debit(&self, amount: u64) -> Result<SaveData, LedgerError> {
        let mut data = self.read()?;
        data.remaining_chips = data.remaining_chips.saturating_sub(amount);
        self.save(&data)?;
        debug!(target = LOG_TARGET, amount, remaining = data.remaining_chips, "debited");
        Ok(data)
    }

    /// Adds `amount` chips. Returns the new record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be read or saved.
    fn credit(&self, amount: u64) -> Result<SaveData, LedgerError> {
        let mut data = self.read()?;
        data.remaining_chips = data.remaining_chips.saturating_add(amount);
        self.save(&data)?;
        debug!(target = LOG_TARGET, amount, remaining = data.remaining_chips, "credited");
        Ok(data)
    }

    /// Applies the daily top-up if it is due. Returns the current record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be read or saved.
    fn refresh(&self, chips: u64, now: DateTime<Utc>) -> Result<SaveData, LedgerError> {
        let mut data = self.read()?;
        if data.refresh(chips, now) {
            self.save(&data)?;
            info!(target = LOG_TARGET, chips, "daily bankroll top-up");
        }
        Ok(data)
    }
}

impl<L: Ledger + ?Sized> Ledger for Arc<L> {
    fn read(&self) -> Result<SaveData, LedgerError> {
        (**self).read()
    }

    fn save(&self, data: &SaveData) -> Result<(), LedgerError> {
        (**self).save(data)
    }
}

/// A ledger that lives only as long as the process.
#[derive(Debug, Clone)]
pub struct InMemoryLedger {
    data: Arc<Mutex<SaveData>>,
}

impl InMemoryLedger {
    /// Creates a ledger holding `chips`.
    #[must_use]
    pub fn new(chips: u64) -> Self {
        Self::with_record(SaveData::fresh(chips, Utc::now()))
    }

    /// Creates a ledger holding an explicit record.
    #[must_use]
    pub fn with_record(data: SaveData) -> Self {
        Self {
            data: Arc::new(Mutex::new(data)),
        }
    }
}

impl Ledger for InMemoryLedger {
    fn read(&self) -> Result<SaveData, LedgerError> {
        Ok(*self.data.lock())
    }

    fn save(&self, data: &SaveData) -> Result<(), LedgerError> {
        *self.data.lock() = *data;
        Ok(())
    }
}

/// A ledger stored as a JSON document at a caller-chosen path.
#[derive(Debug, Clone)]
pub struct JsonFileLedger {
    path: PathBuf,
    starting_chips: u64,
}

impl JsonFileLedger {
    /// Creates a ledger backed by `path`. A missing file reads as a fresh
    /// record holding `starting_chips`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, starting_chips: u64) -> Self {
        Self {
            path: path.into(),
            starting_chips,
        }
    }

    /// The backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Ledger for JsonFileLedger {
    fn read(&self) -> Result<SaveData, LedgerError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Ok(SaveData::fresh(self.starting_chips, Utc::now()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, data: &SaveData) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_vec_pretty(data)?;
        // Stage then rename; the target is replaced atomically.
        let mut staging_name = self.path.file_name().unwrap_or_default().to_os_string();
        staging_name.push(".tmp");
        let staging = self.path.with_file_name(staging_name);
        fs::write(&staging, json)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}
