//! Three-card poker with an optional Pair Plus side bet.

use core::cmp::Ordering;

use tracing::{debug, info};

use crate::card::Card;
use crate::error::EngineError;
use crate::game::ranking::{PokerHand, compare_hands, high_card, rank_cards};
use crate::game::{DIVIDER, Game, Outcome, Settlement};
use crate::hand::{Hand, Role};
use crate::input::{Choice, YES_NO, request_choice, request_integer};
use crate::ledger::Ledger;
use crate::options::CasinoOptions;
use crate::render::hand_lines;
use crate::seat::Seat;
use crate::shoe::Dealer;

const LOG_TARGET: &str = "casino::poker";

const PLAY_OR_FOLD: [Choice; 2] = [Choice::new("play", "p"), Choice::new("fold", "f")];

/// Three-card poker engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PokerState {
    /// Waiting for the ante.
    AwaitAnte,
    /// Waiting for the optional Pair Plus wager.
    AwaitPairPlus,
    /// Shuffling and dealing three cards each.
    Dealing,
    /// Settling the Pair Plus side bet.
    PairPlusPayout,
    /// Asking whether to play (match the ante) or fold.
    AwaitPlayOrFold,
    /// Revealing the dealer and comparing hands.
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
    folded: bool,
}

/// Settles the main bet once both hands are known.
///
/// `category` compares the two hand categories alone and `verdict` is the
/// full comparison including tie-breaks. A folded hand still wins outright on
/// a strictly higher category; any other fold loses the ante. Played hands
/// pay three antes on a win, return both antes on a push, and nothing on a
/// loss.
///
/// ```
/// use core::cmp::Ordering;
/// use casino::game::poker::settle;
/// use casino::game::Outcome;
///
/// assert_eq!(settle(Ordering::Greater, Ordering::Greater, 10, false).payout, 30);
/// assert_eq!(settle(Ordering::Equal, Ordering::Equal, 10, false).payout, 20);
/// assert_eq!(settle(Ordering::Greater, Ordering::Greater, 10, true).payout, 30);
/// assert_eq!(settle(Ordering::Equal, Ordering::Greater, 10, true).outcome, Outcome::DealerWins);
/// ```
#[must_use]
pub const fn settle(category: Ordering, verdict: Ordering, ante: u64, folded: bool) -> Settlement {
    let verdict = match (folded, category) {
        (true, Ordering::Greater) => Ordering::Greater,
        (true, _) => Ordering::Less,
        (false, _) => verdict,
    };

    match verdict {
        Ordering::Greater => Settlement {
            outcome: Outcome::UserWins,
            payout: ante * 3,
        },
        Ordering::Equal => Settlement {
            outcome: Outcome::Push,
            payout: ante * 2,
        },
        Ordering::Less => Settlement {
            outcome: Outcome::DealerWins,
            payout: 0,
        },
    }
}

/// Chips credited for a winning Pair Plus bet. The stake itself is not
/// returned.
#[must_use]
pub const fn pair_plus_payout(hand: PokerHand, wager: u64) -> u64 {
    wager * hand.pair_plus_multiplier()
}

fn describe(who: &str, cards: &[Card]) -> String {
    let rank = rank_cards(cards);
    match (rank, high_card(cards)) {
        (PokerHand::HighCard, Some(high)) => {
            format!("{who} {rank} ({} high)", high.rank().symbol())
        }
        _ => format!("{who} {rank}"),
    }
}

/// The three-card poker engine.
pub struct ThreeCardPoker<D, L> {
    dealer: D,
    ledger: L,
    starting_chips: u64,
    state: PokerState,
    round: Option<Round>,
    ante: u64,
    pair_plus: u64,
    chips: u64,
}

impl<D: Dealer, L: Ledger> ThreeCardPoker<D, L> {
    /// Creates an engine drawing from `dealer` and betting against `ledger`.
    pub fn new(dealer: D, ledger: L, options: &CasinoOptions) -> Self {
        Self {
            dealer,
            ledger,
            starting_chips: options.starting_chips,
            state: PokerState::AwaitAnte,
            round: None,
            ante: 0,
            pair_plus: 0,
            chips: 0,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> PokerState {
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

    /// Runs the current state and moves to the next one.
    ///
    /// # Errors
    ///
    /// Returns an error if input closes, the shoe runs dry, or the ledger
    /// fails. The state is left unchanged.
    pub fn step(&mut self, seat: &mut dyn Seat) -> Result<PokerState, EngineError> {
        let next = match self.state {
            PokerState::AwaitAnte => self.await_ante(seat)?,
            PokerState::AwaitPairPlus => self.await_pair_plus(seat)?,
            PokerState::Dealing => self.deal(seat)?,
            PokerState::PairPlusPayout => self.pay_pair_plus(seat)?,
            PokerState::AwaitPlayOrFold => self.await_play_or_fold(seat)?,
            PokerState::Resolve => self.resolve(seat)?,
            PokerState::AwaitReplay => self.await_replay(seat)?,
            PokerState::Terminated => PokerState::Terminated,
        };
        self.state = next;
        Ok(next)
    }

    fn await_ante(&mut self, seat: &mut dyn Seat) -> Result<PokerState, EngineError> {
        let save = self
            .ledger
            .refresh(self.starting_chips, chrono::Utc::now())?;
        self.chips = save.remaining_chips;
        self.ante = 0;
        self.pair_plus = 0;

        seat.show(format!("You have {} chips", self.chips));

        let max_ante = self.chips / 2;
        if max_ante == 0 {
            seat.show(String::from(
                "You need at least 2 chips to ante. Come back tomorrow for a fresh stack.",
            ));
            return Ok(PokerState::Terminated);
        }

        let ante = request_integer(
            seat,
            &format!("How much do you want to ante? (max {max_ante})"),
            1,
            max_ante,
        )?;
        let save = self.ledger.debit(ante)?;
        self.chips = save.remaining_chips;
        self.ante = ante;
        info!(target = LOG_TARGET, ante, remaining = self.chips, "ante placed");

        Ok(PokerState::AwaitPairPlus)
    }

    fn await_pair_plus(&mut self, seat: &mut dyn Seat) -> Result<PokerState, EngineError> {
        seat.show(String::from("Pair plus payouts:"));
        for hand in PokerHand::ALL.iter().rev() {
            let multiplier = hand.pair_plus_multiplier();
            if multiplier > 0 {
                seat.show(format!("\t{hand}: {multiplier} to 1"));
            }
        }

        // Keep enough back to match the ante on Play.
        let max = (self.chips / 2).min(self.chips.saturating_sub(self.ante));
        let pair_plus = request_integer(seat, &format!("Pair plus? (max {max})"), 0, max)?;
        if pair_plus > 0 {
            let save = self.ledger.debit(pair_plus)?;
            self.chips = save.remaining_chips;
        }
        self.pair_plus = pair_plus;
        debug!(target = LOG_TARGET, pair_plus, "pair plus placed");

        Ok(PokerState::Dealing)
    }

    fn deal(&mut self, seat: &mut dyn Seat) -> Result<PokerState, EngineError> {
        seat.show(String::from("Shuffling the deck..."));
        self.dealer.shuffle();
        let round = self.round.insert(Round {
            user: Hand::new(),
            dealer: Hand::new(),
            folded: false,
        });

        for position in 0..6 {
            let mut card = self.dealer.draw().ok_or(EngineError::EmptyShoe)?;
            let role = if position % 2 == 0 {
                Role::User
            } else {
                card.hide();
                Role::Dealer
            };
            match role {
                Role::User => round.user.add_card(card),
                Role::Dealer => round.dealer.add_card(card),
            }
        }

        self.print_update(seat);
        Ok(PokerState::PairPlusPayout)
    }

    fn pay_pair_plus(&mut self, seat: &mut dyn Seat) -> Result<PokerState, EngineError> {
        if self.pair_plus == 0 {
            return Ok(PokerState::AwaitPlayOrFold);
        }

        let user = self.user_hand().ok_or(EngineError::NoActiveRound)?;
        let hand = rank_cards(user.cards());
        let payout = pair_plus_payout(hand, self.pair_plus);

        if payout == 0 {
            seat.show(format!(
                "You lose your pair plus bet (-{} chips)",
                self.pair_plus
            ));
        } else {
            seat.show(format!(
                "{hand} pays out {} to 1",
                hand.pair_plus_multiplier()
            ));
            seat.show(format!("You win your pair plus bet! (+{payout} chips)"));
            let save = self.ledger.credit(payout)?;
            self.chips = save.remaining_chips;
        }
        info!(target = LOG_TARGET, %hand, payout, "pair plus settled");

        Ok(PokerState::AwaitPlayOrFold)
    }

    fn await_play_or_fold(&mut self, seat: &mut dyn Seat) -> Result<PokerState, EngineError> {
        let prompt = format!("Play (p, {} chips) or fold (f)?", self.ante);
        let choice = request_choice(seat, &prompt, &PLAY_OR_FOLD)?;
        let folded = choice == "fold";

        if !folded {
            let save = self.ledger.debit(self.ante)?;
            self.chips = save.remaining_chips;
        }

        let round = self.round.as_mut().ok_or(EngineError::NoActiveRound)?;
        round.folded = folded;
        Ok(PokerState::Resolve)
    }

    fn resolve(&mut self, seat: &mut dyn Seat) -> Result<PokerState, EngineError> {
        let round = self.round.as_mut().ok_or(EngineError::NoActiveRound)?;
        round.dealer.reveal_all();
        let folded = round.folded;
        self.print_update(seat);

        let round = self.round.as_ref().ok_or(EngineError::NoActiveRound)?;
        if folded {
            seat.show(String::from("You folded"));
        }

        let user = round.user.sorted_by_key();
        let dealer = round.dealer.sorted_by_key();
        seat.show(describe("Dealer has", &dealer));
        seat.show(describe("You have", &user));

        let category = rank_cards(&user).cmp(&rank_cards(&dealer));
        let verdict = compare_hands(&user, &dealer);
        let settlement = settle(category, verdict, self.ante, folded);

        match settlement.outcome {
            Outcome::UserWins => {
                seat.show(format!("You win! (+{} chips)", settlement.payout));
            }
            Outcome::Push => seat.show(String::from("Push, you get your chips back!")),
            Outcome::DealerWins => {
                let loss = if folded { self.ante } else { self.ante * 2 };
                seat.show(format!("Dealer wins (-{loss} chips)"));
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
            user = %rank_cards(&user),
            dealer = %rank_cards(&dealer),
            folded,
            outcome = ?settlement.outcome,
            payout = settlement.payout,
            "round settled"
        );
        seat.show(format!("New total: {}", self.chips));

        self.discard_round();
        Ok(PokerState::AwaitReplay)
    }

    fn await_replay(&mut self, seat: &mut dyn Seat) -> Result<PokerState, EngineError> {
        let choice = request_choice(seat, "Play again? Yes (y) or no (n)", &YES_NO)?;
        if choice == "yes" {
            return Ok(PokerState::AwaitAnte);
        }

        seat.show(String::from("Leaving the poker table."));
        Ok(PokerState::Terminated)
    }

    fn discard_round(&mut self) {
        if let Some(mut round) = self.round.take() {
            self.dealer.discard(round.user.take_cards());
            self.dealer.discard(round.dealer.take_cards());
        }
    }

    fn print_update(&self, seat: &mut dyn Seat) {
        let Some(round) = self.round.as_ref() else {
            return;
        };

        seat.show(format!("Your chips: {}", self.chips));
        seat.show(format!("Anted: {}", self.ante));
        seat.show(format!("Pair Plus: {}", self.pair_plus));
        seat.show(DIVIDER.to_owned());
        seat.show(String::from("Dealer"));
        for line in hand_lines(&round.dealer) {
            seat.show(line);
        }
        seat.show(String::from("You"));
        for line in hand_lines(&round.user) {
            seat.show(line);
        }
        seat.show(DIVIDER.to_owned());
    }
}

impl<D: Dealer, L: Ledger> Game for ThreeCardPoker<D, L> {
    fn name(&self) -> &'static str {
        "3-Card Poker"
    }

    fn play(&mut self, seat: &mut dyn Seat) -> Result<(), EngineError> {
        self.state = PokerState::AwaitAnte;
        seat.show(String::from("=== 3-Card Poker ==="));

        while self.state != PokerState::Terminated {
            if let Err(err) = self.step(seat) {
                self.discard_round();
                return Err(err);
            }
        }

        Ok(())
    }
}
