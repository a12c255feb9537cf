//! The games a session can host.
//!
//! Each engine is an explicit state machine driven by a [`Seat`]. Engines
//! borrow the shoe through the [`Dealer`](crate::shoe::Dealer) capability and
//! the bankroll through a [`Ledger`](crate::ledger::Ledger); neither is owned
//! by a single game.

use crate::error::EngineError;
use crate::seat::Seat;

pub mod blackjack;
pub mod poker;
pub mod ranking;

pub use blackjack::{Blackjack, BlackjackState};
pub use poker::{PokerState, ThreeCardPoker};
pub use ranking::PokerHand;

/// A hostable game.
pub trait Game: Send {
    /// Menu name of the game.
    fn name(&self) -> &'static str;

    /// Runs rounds until the human declines to play again.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InputClosed`] if the seat goes away mid-game, or
    /// any other engine error that ended play.
    fn play(&mut self, seat: &mut dyn Seat) -> Result<(), EngineError>;
}

/// How a round ended from the human's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The human won.
    UserWins,
    /// Nobody won; the stake comes back.
    Push,
    /// The dealer won.
    DealerWins,
}

/// The result of settling a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    /// Who won.
    pub outcome: Outcome,
    /// Chips credited back to the bankroll, stake included.
    pub payout: u64,
}

pub(crate) const DIVIDER: &str = "----------------------------------------------------";
