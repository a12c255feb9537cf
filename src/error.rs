//! Error types for engine, ledger, console, and session operations.

use thiserror::Error;

/// Errors raised by the bankroll ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The save file could not be read or written.
    #[error("ledger I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The save file is not a valid record.
    #[error("ledger record is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that end a game engine's turn loop.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A round operation was requested while no round is in progress.
    #[error("no active hand")]
    NoActiveRound,
    /// The shoe ran out of cards mid-round.
    #[error("no cards left in the shoe")]
    EmptyShoe,
    /// The human's line stream closed before the engine finished.
    #[error("input stream closed")]
    InputClosed,
    /// The bankroll could not be read or saved.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl EngineError {
    /// Returns whether the error is a normal end of session rather than a fault.
    #[must_use]
    pub const fn is_disconnect(&self) -> bool {
        matches!(self, Self::InputClosed)
    }
}

/// Errors that end the console loop.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Reading input or writing output failed.
    #[error("console I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The terminal could not be switched into raw mode.
    #[error("could not enter raw mode: {0}")]
    Terminal(std::io::Error),
}

/// Errors that end a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The active engine failed.
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// The engine task panicked or was cancelled.
    #[error("game task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
