//! The shoe: a draw pile and a discard pile that every card cycles through.

use std::collections::VecDeque;
use std::sync::Arc;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::card::{Card, DECK_SIZE, standard_deck};
use crate::sync::Mutex;

const LOG_TARGET: &str = "casino::shoe";

/// The capability an engine needs from the shoe.
///
/// Engines receive this by composition so the same shoe can serve whichever
/// game is active, and tests can substitute a stacked deck.
pub trait Dealer: Send {
    /// Merges the discard pile back into the draw pile and shuffles.
    fn shuffle(&mut self);

    /// Draws the next card face up, or `None` if the draw pile is empty.
    fn draw(&mut self) -> Option<Card>;

    /// Returns cards to the discard pile face down.
    ///
    /// The caller must not keep a copy of a discarded card in a live hand.
    fn discard(&mut self, cards: Vec<Card>);
}

/// A single 52-card shoe.
#[derive(Debug)]
pub struct Shoe {
    /// Next card to draw is the last element.
    draw_pile: Vec<Card>,
    discard_pile: Vec<Card>,
    rng: ChaCha8Rng,
}

impl Shoe {
    /// Creates a shuffled shoe with the given seed.
    ///
    /// # Example
    ///
    /// ```
    /// use casino::{DECK_SIZE, Shoe};
    ///
    /// let shoe = Shoe::new(42);
    /// assert_eq!(shoe.cards_remaining(), DECK_SIZE);
    /// ```
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut shoe = Self {
            draw_pile: standard_deck(),
            discard_pile: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        };
        shoe.shuffle_in_place();
        shoe
    }

    fn shuffle_in_place(&mut self) {
        let mut merged = core::mem::take(&mut self.draw_pile);
        merged.append(&mut self.discard_pile);
        // Fisher-Yates, walking from the last index down.
        merged.shuffle(&mut self.rng);
        self.draw_pile = merged;
        debug!(
            target = LOG_TARGET,
            cards = self.draw_pile.len(),
            "shuffled shoe"
        );
    }

    /// Returns the number of cards left to draw.
    #[must_use]
    pub fn cards_remaining(&self) -> usize {
        self.draw_pile.len()
    }

    /// Returns the number of cards in the discard pile.
    #[must_use]
    pub fn cards_discarded(&self) -> usize {
        self.discard_pile.len()
    }

    /// Returns the draw pile, next draw first.
    #[must_use]
    pub fn draw_pile(&self) -> Vec<Card> {
        self.draw_pile.iter().rev().copied().collect()
    }

    /// Returns the discard pile.
    #[must_use]
    pub fn discard_pile(&self) -> &[Card] {
        &self.discard_pile
    }

    /// Returns whether the shoe currently holds the whole catalog.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.draw_pile.len() + self.discard_pile.len() == DECK_SIZE
    }
}

impl Dealer for Shoe {
    fn shuffle(&mut self) {
        self.shuffle_in_place();
    }

    fn draw(&mut self) -> Option<Card> {
        let mut card = self.draw_pile.pop()?;
        card.reveal();
        trace!(target = LOG_TARGET, %card, remaining = self.draw_pile.len(), "drew card");
        Some(card)
    }

    fn discard(&mut self, cards: Vec<Card>) {
        for mut card in cards {
            card.hide();
            self.discard_pile.push(card);
        }
    }
}

/// A dealer that hands out cards in a fixed order and never shuffles.
///
/// Useful for replaying a known deal against an engine.
///
/// ```
/// use casino::{Card, Dealer, Rank, StackedDeck, Suit};
///
/// let mut deck = StackedDeck::new([Card::new(Rank::Ace, Suit::Spades)]);
/// deck.shuffle();
/// assert_eq!(deck.draw().map(|card| card.rank()), Some(Rank::Ace));
/// assert_eq!(deck.draw(), None);
/// assert_eq!(deck.shuffles(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct StackedDeck {
    draws: VecDeque<Card>,
    discarded: Vec<Card>,
    shuffles: usize,
}

impl StackedDeck {
    /// Creates a deck that deals `draws` in order.
    pub fn new(draws: impl IntoIterator<Item = Card>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            discarded: Vec::new(),
            shuffles: 0,
        }
    }

    /// Returns the number of cards left to draw.
    #[must_use]
    pub fn cards_remaining(&self) -> usize {
        self.draws.len()
    }

    /// Returns every card discarded so far.
    #[must_use]
    pub fn discard_pile(&self) -> &[Card] {
        &self.discarded
    }

    /// Returns how many times a shuffle was requested.
    #[must_use]
    pub const fn shuffles(&self) -> usize {
        self.shuffles
    }
}

impl Dealer for StackedDeck {
    fn shuffle(&mut self) {
        self.shuffles += 1;
    }

    fn draw(&mut self) -> Option<Card> {
        let mut card = self.draws.pop_front()?;
        card.reveal();
        Some(card)
    }

    fn discard(&mut self, cards: Vec<Card>) {
        for mut card in cards {
            card.hide();
            self.discarded.push(card);
        }
    }
}

/// A [`Shoe`] shared between engines.
///
/// Only one engine is active at a time, so the lock is never contended; it
/// exists so the handle can move onto the engine's thread.
#[derive(Debug, Clone)]
pub struct SharedShoe {
    inner: Arc<Mutex<Shoe>>,
}

impl SharedShoe {
    /// Wraps a shoe for sharing.
    #[must_use]
    pub fn new(shoe: Shoe) -> Self {
        Self {
            inner: Arc::new(Mutex::new(shoe)),
        }
    }

    /// Runs `f` with read access to the underlying shoe.
    pub fn inspect<R>(&self, f: impl FnOnce(&Shoe) -> R) -> R {
        f(&self.inner.lock())
    }
}

impl Dealer for SharedShoe {
    fn shuffle(&mut self) {
        self.inner.lock().shuffle();
    }

    fn draw(&mut self) -> Option<Card> {
        self.inner.lock().draw()
    }

    fn discard(&mut self, cards: Vec<Card>) {
        self.inner.lock().discard(cards);
    }
}
