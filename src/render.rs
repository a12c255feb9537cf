//! Plain-text hand rendering.

use crate::card::Card;
use crate::hand::Hand;

const HIDDEN_CELL: &str = "[###]";

fn card_cell(card: &Card) -> String {
    if card.is_hidden() {
        return HIDDEN_CELL.to_owned();
    }
    format!("[{:>3}]", card.to_string())
}

/// Renders a hand as display lines.
///
/// Every card occupies a cell of the same width, face up or not, so revealing
/// a card never shifts its neighbours.
#[must_use]
pub fn hand_lines(hand: &Hand) -> Vec<String> {
    if hand.is_empty() {
        return vec![String::from("(empty hand)")];
    }

    let cells: Vec<String> = hand.cards().iter().map(card_cell).collect();
    vec![cells.join(" ")]
}
