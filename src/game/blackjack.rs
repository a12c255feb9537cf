//! Single-hand blackjack against a dealer who hits below a fixed total.

use tracing::{debug, info};

use crate::error::EngineError;
use crate::game::{DIVIDER, Game, Outcome, Settlement};
use crate::hand::{Hand, Role};
use crate::input::{Choice, YES_NO, request_choice, request_integer};
use crate::ledger::Ledger;
use crate::options::CasinoOptions;
use crate::render::hand_lines;
use crate::seat::Seat;
use crate::shoe::Dealer;

const LOG_TARGET: &str = "casino::blackjack";

const HIT_OR_STAY: [Choice; 2] = [Choice::new("hit", "h"), Choice::new("stay", "s")];

/// Blackjack engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlackjackState {
    /// Waiting for the human to place a wager.
    AwaitWager,
    /// Shuffling and dealing the opening four cards.
    Dealing,
    /// Offering hit or stay.
    PlayerTurn,
    /// Dealer reveals the hole card and draws.
    DealerTurn,
    /// Comparing totals and paying out.
    Resolve,
    /// Asking whether to play another round.
    AwaitReplay,
    /// The human left the table.
    Terminated,
}

#[derive(Debug)]
struct Round {
    user: Hand,
    dealer: Hand,
    wager: u64,
}

/// Settles a finished blackjack round.
///
/// A busted user loses before the dealer's total is considered, even when
/// the dealer busted too.
///
/// ```
/// use casino::game::blackjack::settle;
/// use casino::game::Outcome;
///
/// assert_eq!(settle(20, 19, 10).payout, 20);
/// assert_eq!(settle(19, 19, 10).outcome, Outcome::Push);
/// assert_eq!(settle(22, 18, 10).payout, 0);
/// ```
#[must_use]
pub const fn settle(user_total: u8, dealer_total: u8, wager: u64) -> Settlement {
    let outcome = if user_total > 21 {
        Outcome::DealerWins
    } else if user_total > dealer_total || dealer_total > 21 {
        Outcome::UserWins
    } else if user_total == dealer_total {
        Outcome::Push
    } else {
        Outcome::DealerWins
    };

    let payout = match outcome {
        Outcome::UserWins => wager * 2,
        Outcome::Push => wager,
        Outcome::DealerWins => 0,
    };

    Settlement { outcome, payout }
}

/// The blackjack engine.
///
/// Drive it with [`Game::play`], or one transition at a time with
/// [`Blackjack::step`].
pub struct Blackjack<D, L> {
    dealer: D,
    ledger: L,
    starting_chips: u64,
    dealer_stands_on: u8,
    state: BlackjackState,
    round: Option<Round>,
    pending_wager: u64,
    chips: u64,
}

impl<D: Dealer, L: Ledger> Blackjack<D, L> {
    /// Creates an engine drawing from `dealer` and betting against `ledger`.
    pub fn new(dealer: D, ledger: L, options: &CasinoOptions) -> Self {
        Self {
            dealer,
            ledger,
            starting_chips: options.starting_chips,
            dealer_stands_on: options.dealer_stands_on,
            state: BlackjackState::AwaitWager,
            round: None,
            pending_wager: 0,
            chips: 0,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> BlackjackState {
        self.state
    }

    /// Returns the user's hand, if a round is in progress.
    #[must_use]
    pub fn user_hand(&self) -> Option<&Hand> {
        self.round.as_ref().map(|round| &round.user)
    }

    /// Returns the dealer's hand, if a round is in progress.
    #[must_use]
    pub fn dealer_hand(&self) -> Option<&Hand> {
        self.round.as_ref().map(|round| &round.dealer)
    }

    /// Consumes the engine, returning its shoe and ledger.
    pub fn into_parts(self) -> (D, L) {
        (self.dealer, self.ledger)
    }

    /// Draws one card into `role`'s hand. Returns whether that hand busted.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoActiveRound`] outside a round, or
    /// [`EngineError::EmptyShoe`] if no card is left.
    pub fn hit(&mut self, role: Role) -> Result<bool, EngineError> {
        let round = self.round.as_mut().ok_or(EngineError::NoActiveRound)?;
        let card = self.dealer.draw().ok_or(EngineError::EmptyShoe)?;
        let hand = match role {
            Role::User => &mut round.user,
            Role::Dealer => &mut round.dealer,
        };
        hand.add_card(card);
        debug!(target = LOG_TARGET, %role, %card, total = hand.value(), "hit");
        Ok(hand.is_bust())
    }

    /// Runs the current state and moves to the next one.
    ///
    /// # Errors
    ///
    /// Returns an error if input closes, the shoe runs dry, or the ledger
    /// fails. The state is left unchanged.
    pub fn step(&mut self, seat: &mut dyn Seat) -> Result<BlackjackState, EngineError> {
        let next = match self.state {
            BlackjackState::AwaitWager => self.await_wager(seat)?,
            BlackjackState::Dealing => self.deal(seat)?,
            BlackjackState::PlayerTurn => self.player_turn(seat)?,
            BlackjackState::DealerTurn => self.dealer_turn(seat)?,
            BlackjackState::Resolve => self.resolve(seat)?,
            BlackjackState::AwaitReplay => self.await_replay(seat)?,
            BlackjackState::Terminated => BlackjackState::Terminated,
        };
        self.state = next;
        Ok(next)
    }

    fn await_wager(&mut self, seat: &mut dyn Seat) -> Result<BlackjackState, EngineError> {
        let save = self
            .ledger
            .refresh(self.starting_chips, chrono::Utc::now())?;
        self.chips = save.remaining_chips;

        seat.show(format!("Dealer stands on {}", self.dealer_stands_on));
        seat.show(format!("You have {} chips remaining", self.chips));

        if self.chips == 0 {
            seat.show(String::from(
                "You are out of chips. Come back tomorrow for a fresh stack.",
            ));
            return Ok(BlackjackState::Terminated);
        }

        let wager = request_integer(seat, "How much would you like to wager?", 1, self.chips)?;
        let save = self.ledger.debit(wager)?;
        self.chips = save.remaining_chips;
        self.pending_wager = wager;
        seat.show(format!("Wagered {wager} chips"));
        info!(target = LOG_TARGET, wager, remaining = self.chips, "wager placed");

        Ok(BlackjackState::Dealing)
    }

    fn deal(&mut self, seat: &mut dyn Seat) -> Result<BlackjackState, EngineError> {
        seat.show(String::from("Shuffling the deck..."));
        self.dealer.shuffle();
        self.round = Some(Round {
            user: Hand::new(),
            dealer: Hand::new(),
            wager: self.pending_wager,
        });

        for position in 0..4 {
            let role = if position % 2 == 0 {
                Role::User
            } else {
                Role::Dealer
            };
            self.hit(role)?;
        }

        let round = self.round.as_mut().ok_or(EngineError::NoActiveRound)?;
        round.dealer.hide(1);
        let natural = round.user.is_natural();
        self.print_update(seat);

        if natural {
            seat.show(String::from("BLACKJACK"));
            return Ok(BlackjackState::Resolve);
        }

        Ok(BlackjackState::PlayerTurn)
    }

    fn player_turn(&mut self, seat: &mut dyn Seat) -> Result<BlackjackState, EngineError> {
        let choice = request_choice(seat, "Your move: Hit (h) / Stay (s)", &HIT_OR_STAY)?;
        if choice == "stay" {
            return Ok(BlackjackState::DealerTurn);
        }

        let bust = self.hit(Role::User)?;
        self.print_update(seat);
        if bust {
            seat.show(String::from("BUST!"));
            return Ok(BlackjackState::Resolve);
        }

        Ok(BlackjackState::PlayerTurn)
    }

    fn dealer_turn(&mut self, seat: &mut dyn Seat) -> Result<BlackjackState, EngineError> {
        let round = self.round.as_mut().ok_or(EngineError::NoActiveRound)?;
        round.dealer.reveal_all();

        if round.dealer.value() == 21 {
            seat.show(String::from("DEALER BLACKJACK"));
            self.print_update(seat);
            return Ok(BlackjackState::Resolve);
        }

        while self.dealer_total()? < self.dealer_stands_on {
            self.hit(Role::Dealer)?;
        }

        self.print_update(seat);
        if self.dealer_total()? > 21 {
            seat.show(String::from("DEALER BUST!"));
        }

        Ok(BlackjackState::Resolve)
    }

    fn dealer_total(&self) -> Result<u8, EngineError> {
        self.dealer_hand()
            .map(Hand::value)
            .ok_or(EngineError::NoActiveRound)
    }

    fn resolve(&mut self, seat: &mut dyn Seat) -> Result<BlackjackState, EngineError> {
        let round = self.round.as_ref().ok_or(EngineError::NoActiveRound)?;
        let user_total = round.user.value();
        let dealer_total = round.dealer.value();
        let settlement = settle(user_total, dealer_total, round.wager);

        match settlement.outcome {
            Outcome::UserWins => {
                seat.show(format!("YOU WIN! +{} chips", settlement.payout));
            }
            Outcome::Push => {
                seat.show(format!(
                    "Tie - win your chips back (+{} chips)",
                    settlement.payout
                ));
            }
            Outcome::DealerWins => {
                seat.show(format!("Dealer wins (-{} chips)", round.wager));
            }
        }

        let save = if settlement.payout > 0 {
            self.ledger.credit(settlement.payout)?
        } else {
            self.ledger.read()?
        };
        self.chips = save.remaining_chips;

        info!(
            target = LOG_TARGET,
            user_total,
            dealer_total,
            outcome = ?settlement.outcome,
            payout = settlement.payout,
            "round settled"
        );

        seat.show(format!("New total: {}", self.chips));
        seat.show(format!("You: {user_total}\tDealer: {dealer_total}"));

        self.discard_round();
        Ok(BlackjackState::AwaitReplay)
    }

    fn await_replay(&mut self, seat: &mut dyn Seat) -> Result<BlackjackState, EngineError> {
        let choice = request_choice(seat, "Play again? Yes (y) or no (n)", &YES_NO)?;
        if choice == "yes" {
            return Ok(BlackjackState::AwaitWager);
        }

        seat.show(String::from("Leaving the blackjack table."));
        Ok(BlackjackState::Terminated)
    }

    fn discard_round(&mut self) {
        if let Some(mut round) = self.round.take() {
            self.dealer.discard(round.user.take_cards());
            self.dealer.discard(round.dealer.take_cards());
        }
        self.pending_wager = 0;
    }

    fn print_update(&self, seat: &mut dyn Seat) {
        let Some(round) = self.round.as_ref() else {
            return;
        };

        seat.show(format!("Your chips: {}", self.chips));
        seat.show(format!("Wagered: {}", round.wager));
        seat.show(DIVIDER.to_owned());

        if round.dealer.has_hidden() {
            seat.show(format!("Dealer\t(showing {})", round.dealer.value()));
        } else {
            seat.show(format!("Dealer\t(total {})", round.dealer.value()));
        }
        for line in hand_lines(&round.dealer) {
            seat.show(line);
        }

        seat.show(String::new());
        seat.show(format!("You\t(total {})", round.user.value()));
        for line in hand_lines(&round.user) {
            seat.show(line);
        }
        seat.show(DIVIDER.to_owned());
    }
}

impl<D: Dealer, L: Ledger> Game for Blackjack<D, L> {
    fn name(&self) -> &'static str {
        "Blackjack"
    }

    fn play(&mut self, seat: &mut dyn Seat) -> Result<(), EngineError> {
        self.state = BlackjackState::AwaitWager;
        seat.show(String::from("=== Blackjack ==="));

        while self.state != BlackjackState::Terminated {
            if let Err(err) = self.step(seat) {
                // Cards already dealt go back to the shoe; the wager is forfeit.
                self.discard_round();
                return Err(err);
            }
        }

        Ok(())
    }
}
