//! Three-card poker hand ranking.

use core::cmp::Ordering;
use core::fmt;

use crate::card::Card;

/// Three-card poker hand categories, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PokerHand {
    /// No other category applies.
    HighCard,
    /// Exactly two cards share a rank.
    Pair,
    /// All one suit, not consecutive.
    Flush,
    /// Consecutive ranks, mixed suits.
    Straight,
    /// All three cards share a rank.
    ThreeOfAKind,
    /// Consecutive ranks in one suit.
    StraightFlush,
}

impl PokerHand {
    /// Every category, weakest first.
    pub const ALL: [Self; 6] = [
        Self::HighCard,
        Self::Pair,
        Self::Flush,
        Self::Straight,
        Self::ThreeOfAKind,
        Self::StraightFlush,
    ];

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::HighCard => "High Card",
            Self::Pair => "Pair",
            Self::Flush => "Flush",
            Self::Straight => "Straight",
            Self::ThreeOfAKind => "Three of a kind",
            Self::StraightFlush => "Straight flush",
        }
    }

    /// Pair Plus side-bet odds ("N to 1"). High card pays nothing.
    #[must_use]
    pub const fn pair_plus_multiplier(self) -> u64 {
        match self {
            Self::HighCard => 0,
            Self::Pair => 1,
            Self::Flush => 3,
            Self::Straight => 6,
            Self::ThreeOfAKind => 30,
            Self::StraightFlush => 40,
        }
    }
}

impl fmt::Display for PokerHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn sorted_keys(cards: &[Card]) -> Vec<u8> {
    let mut keys: Vec<u8> = cards.iter().map(Card::sort_key).collect();
    keys.sort_unstable();
    keys
}

/// Ranks a hand.
///
/// Categories are checked strongest first, so a consecutive same-suit hand is
/// a straight flush rather than a flush.
///
/// ```
/// use casino::{Card, Rank, Suit};
/// use casino::game::PokerHand;
/// use casino::game::ranking::rank_cards;
///
/// let hand = [
///     Card::new(Rank::Four, Suit::Spades),
///     Card::new(Rank::Six, Suit::Spades),
///     Card::new(Rank::Five, Suit::Spades),
/// ];
/// assert_eq!(rank_cards(&hand), PokerHand::StraightFlush);
/// ```
#[must_use]
pub fn rank_cards(cards: &[Card]) -> PokerHand {
    if cards.is_empty() {
        return PokerHand::HighCard;
    }

    let keys = sorted_keys(cards);
    let is_straight = keys.windows(2).all(|pair| pair[0] + 1 == pair[1]);
    let is_flush = cards.iter().all(|card| card.suit() == cards[0].suit());

    let mut distinct = keys.clone();
    distinct.dedup();

    if is_straight && is_flush {
        PokerHand::StraightFlush
    } else if distinct.len() == 1 && cards.len() > 1 {
        PokerHand::ThreeOfAKind
    } else if is_straight {
        PokerHand::Straight
    } else if is_flush {
        PokerHand::Flush
    } else if distinct.len() == 2 {
        PokerHand::Pair
    } else {
        PokerHand::HighCard
    }
}

/// Sort key of the repeated rank in a paired hand.
#[must_use]
pub fn pair_key(cards: &[Card]) -> Option<u8> {
    let keys = sorted_keys(cards);
    keys.windows(2)
        .find(|pair| pair[0] == pair[1])
        .map(|pair| pair[0])
}

/// Sort key of the highest card.
#[must_use]
pub fn high_key(cards: &[Card]) -> Option<u8> {
    cards.iter().map(Card::sort_key).max()
}

/// Highest card, for "K high" style descriptions.
#[must_use]
pub fn high_card(cards: &[Card]) -> Option<Card> {
    cards.iter().copied().max_by_key(Card::sort_key)
}

/// Compares the user's hand against the dealer's.
///
/// Higher category wins. Equal pairs compare the paired rank; every other
/// equal category compares the single highest card. `Equal` is a true push.
#[must_use]
pub fn compare_hands(user: &[Card], dealer: &[Card]) -> Ordering {
    let user_rank = rank_cards(user);
    let dealer_rank = rank_cards(dealer);

    user_rank.cmp(&dealer_rank).then_with(|| {
        if user_rank == PokerHand::Pair {
            pair_key(user).cmp(&pair_key(dealer))
        } else {
            high_key(user).cmp(&high_key(dealer))
        }
    })
}
