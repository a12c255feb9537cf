//! A terminal card-game host: blackjack and three-card poker against a
//! mechanical dealer.
//!
//! The crate is split along the seams of a session:
//!
//! - [`Shoe`] owns every card and hands them out through the [`Dealer`]
//!   capability.
//! - [`Ledger`] stores the bankroll, one whole-record read-modify-write per bet.
//! - The engines in [`game`] are explicit state machines that read the human's
//!   lines from a [`Seat`] and write display text back to it.
//! - [`Console`] owns the terminal, and [`Session`] wires the two together.
//!
//! # Example
//!
//! ```
//! use casino::game::{Blackjack, Game};
//! use casino::{CasinoOptions, InMemoryLedger, Script, Shoe};
//!
//! let options = CasinoOptions::default();
//! let ledger = InMemoryLedger::new(options.starting_chips);
//! let mut game = Blackjack::new(Shoe::new(42), ledger, &options);
//!
//! // Wager 10, stay, then leave the table.
//! let mut seat = Script::new(["10", "s", "n"]);
//! game.play(&mut seat).unwrap();
//! assert!(seat.saw("Leaving the blackjack table."));
//! ```

pub mod card;
pub mod console;
pub mod error;
pub mod game;
pub mod hand;
pub mod input;
pub mod ledger;
pub mod options;
pub mod render;
pub mod seat;
pub mod session;
pub mod shoe;
mod sync;

pub use card::{Card, DECK_SIZE, Rank, Suit};
pub use console::{Console, Input, LineEditor, RawTerminal, StopHandle, TerminalMode, Utf8Decoder};
pub use error::{ConsoleError, EngineError, LedgerError, SessionError};
pub use game::Game;
pub use hand::{Hand, Role};
pub use ledger::{InMemoryLedger, JsonFileLedger, Ledger, SaveData};
pub use options::CasinoOptions;
pub use seat::{ChannelSeat, Script, Seat};
pub use session::Session;
pub use shoe::{Dealer, SharedShoe, Shoe, StackedDeck};
