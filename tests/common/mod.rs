//! Shared fixtures for integration tests.

use casino::{Card, Rank, Suit};

pub const fn card(rank: Rank, suit: Suit) -> Card {
    Card::new(rank, suit)
}
