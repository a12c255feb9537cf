//! Card types and the standard 52-card catalog.

use core::fmt;

/// Card suit. Suits are never ranked; they only matter for flushes and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suit {
    /// Spades.
    Spades,
    /// Clubs.
    Clubs,
    /// Hearts.
    Hearts,
    /// Diamonds.
    Diamonds,
}

impl Suit {
    /// All four suits in catalog order.
    pub const ALL: [Self; 4] = [Self::Spades, Self::Clubs, Self::Hearts, Self::Diamonds];

    /// Display symbol for the suit.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Spades => '♠',
            Self::Clubs => '♣',
            Self::Hearts => '♥',
            Self::Diamonds => '♦',
        }
    }
}

/// Card rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rank {
    /// Ace.
    Ace,
    /// Two.
    Two,
    /// Three.
    Three,
    /// Four.
    Four,
    /// Five.
    Five,
    /// Six.
    Six,
    /// Seven.
    Seven,
    /// Eight.
    Eight,
    /// Nine.
    Nine,
    /// Ten.
    Ten,
    /// Jack.
    Jack,
    /// Queen.
    Queen,
    /// King.
    King,
}

impl Rank {
    /// All thirteen ranks in catalog order (Ace first).
    pub const ALL: [Self; 13] = [
        Self::Ace,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
        Self::Nine,
        Self::Ten,
        Self::Jack,
        Self::Queen,
        Self::King,
    ];

    /// Blackjack point value. Aces count 11 here; see [`Rank::alt_value`].
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Ace => 11,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
            Self::Five => 5,
            Self::Six => 6,
            Self::Seven => 7,
            Self::Eight => 8,
            Self::Nine => 9,
            Self::Ten | Self::Jack | Self::Queen | Self::King => 10,
        }
    }

    /// Alternate blackjack value, if the rank has one (Ace = 1).
    #[must_use]
    pub const fn alt_value(self) -> Option<u8> {
        match self {
            Self::Ace => Some(1),
            _ => None,
        }
    }

    /// Poker ordering key in `0..=12`: Two is 0, Ace is 12.
    #[must_use]
    pub const fn sort_key(self) -> u8 {
        match self {
            Self::Two => 0,
            Self::Three => 1,
            Self::Four => 2,
            Self::Five => 3,
            Self::Six => 4,
            Self::Seven => 5,
            Self::Eight => 6,
            Self::Nine => 7,
            Self::Ten => 8,
            Self::Jack => 9,
            Self::Queen => 10,
            Self::King => 11,
            Self::Ace => 12,
        }
    }

    /// Short display symbol ("A", "2", ..., "10", "J", "Q", "K").
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Ace => "A",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::Six => "6",
            Self::Seven => "7",
            Self::Eight => "8",
            Self::Nine => "9",
            Self::Ten => "10",
            Self::Jack => "J",
            Self::Queen => "Q",
            Self::King => "K",
        }
    }
}

/// A playing card.
///
/// Rank and suit never change. The hidden flag is a visibility attribute of
/// wherever the card currently sits: the shoe hides it, a draw reveals it, and
/// a hand may hide it again (the dealer's hole card).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    rank: Rank,
    suit: Suit,
    hidden: bool,
}

impl Card {
    /// Creates a face-up card.
    #[must_use]
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self {
            rank,
            suit,
            hidden: false,
        }
    }

    /// The rank of the card.
    #[must_use]
    pub const fn rank(&self) -> Rank {
        self.rank
    }

    /// The suit of the card.
    #[must_use]
    pub const fn suit(&self) -> Suit {
        self.suit
    }

    /// Primary blackjack value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.rank.value()
    }

    /// Alternate blackjack value, if any.
    #[must_use]
    pub const fn alt_value(&self) -> Option<u8> {
        self.rank.alt_value()
    }

    /// Poker sort key.
    #[must_use]
    pub const fn sort_key(&self) -> u8 {
        self.rank.sort_key()
    }

    /// Whether the card is face down.
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Turns the card face down.
    pub const fn hide(&mut self) {
        self.hidden = true;
    }

    /// Turns the card face up.
    pub const fn reveal(&mut self) {
        self.hidden = false;
    }

    /// Identity comparison ignoring visibility.
    #[must_use]
    pub fn same_card(&self, other: &Self) -> bool {
        self.rank == other.rank && self.suit == other.suit
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.symbol(), self.suit.symbol())
    }
}

/// Number of cards in the catalog.
pub const DECK_SIZE: usize = 52;

/// Builds the fixed 52-card catalog, every card face down.
#[must_use]
pub fn standard_deck() -> Vec<Card> {
    let mut cards = Vec::with_capacity(DECK_SIZE);

    for suit in Suit::ALL {
        for rank in Rank::ALL {
            let mut card = Card::new(rank, suit);
            card.hide();
            cards.push(card);
        }
    }

    cards
}
