//! Session dispatcher tests.

mod common;

use std::time::Duration;

use casino::game::Blackjack;
use casino::session::is_quit;
use casino::{
    CasinoOptions, InMemoryLedger, Ledger, RawTerminal, Rank, Session, StackedDeck, StopHandle,
    Suit,
};
use common::card;
use tokio::sync::mpsc;
use tokio::time::timeout;

fn blackjack(ledger: &InMemoryLedger) -> Blackjack<StackedDeck, InMemoryLedger> {
    let draws = vec![
        card(Rank::Ten, Suit::Spades),
        card(Rank::Nine, Suit::Hearts),
        card(Rank::Queen, Suit::Diamonds),
        card(Rank::Eight, Suit::Clubs),
    ];
    Blackjack::new(StackedDeck::new(draws), ledger.clone(), &CasinoOptions::default())
}

fn drain(display: &mut mpsc::UnboundedReceiver<String>) -> Vec<String> {
    std::iter::from_fn(|| display.try_recv().ok()).collect()
}

#[test]
fn quit_token() {
    assert!(is_quit("quit"));
    assert!(is_quit("  QUIT \n"));
    assert!(is_quit("Quit"));
    assert!(!is_quit("quitter"));
    assert!(!is_quit("q"));
}

#[test]
fn menu_lists_games_in_order() {
    let ledger = InMemoryLedger::new(100);
    let session = Session::new(StopHandle::new(RawTerminal)).with_game(blackjack(&ledger));

    let menu = session.menu();
    assert_eq!(menu.last().map(String::as_str), Some("1. Blackjack"));
    assert!(menu.iter().any(|line| line.contains("quit")));
}

#[tokio::test]
async fn plays_a_round_then_stops_the_console() {
    let ledger = InMemoryLedger::new(100);
    let stop = StopHandle::new(RawTerminal);
    let session = Session::new(stop.clone()).with_game(blackjack(&ledger));

    let (lines_tx, lines_rx) = mpsc::unbounded_channel();
    let (display_tx, mut display_rx) = mpsc::unbounded_channel();
    for line in ["abc", "7", "1", "10", "s", "n"] {
        lines_tx.send(String::from(line)).unwrap();
    }

    timeout(Duration::from_secs(10), session.run(lines_rx, display_tx))
        .await
        .unwrap()
        .unwrap();

    let shown = drain(&mut display_rx);
    assert!(shown.iter().any(|line| line == "\"abc\" is not a valid number"));
    assert!(shown.iter().any(|line| line == "Unknown option: 7"));
    assert!(shown.iter().any(|line| line == "=== Blackjack ==="));
    assert!(shown.iter().any(|line| line == "Leaving the blackjack table."));
    assert_eq!(ledger.read().unwrap().remaining_chips, 110);
    assert!(stop.is_stopped());
}

#[tokio::test]
async fn quit_mid_game_ends_cleanly() {
    let ledger = InMemoryLedger::new(100);
    let stop = StopHandle::new(RawTerminal);
    let session = Session::new(stop.clone()).with_game(blackjack(&ledger));

    let (lines_tx, lines_rx) = mpsc::unbounded_channel();
    let (display_tx, mut display_rx) = mpsc::unbounded_channel();
    for line in ["1", "10", "Quit", "s"] {
        lines_tx.send(String::from(line)).unwrap();
    }

    timeout(Duration::from_secs(10), session.run(lines_rx, display_tx))
        .await
        .unwrap()
        .unwrap();

    let shown = drain(&mut display_rx);
    assert!(shown.iter().any(|line| line == "Wagered 10 chips"));
    assert!(!shown.iter().any(|line| line.starts_with("Dealer wins") || line.starts_with("YOU WIN")));
    assert_eq!(ledger.read().unwrap().remaining_chips, 90);
    assert!(stop.is_stopped());
    drop(lines_tx);
}

#[tokio::test]
async fn quit_at_the_menu() {
    let ledger = InMemoryLedger::new(100);
    let stop = StopHandle::new(RawTerminal);
    let session = Session::new(stop.clone()).with_game(blackjack(&ledger));

    let (lines_tx, lines_rx) = mpsc::unbounded_channel();
    let (display_tx, mut display_rx) = mpsc::unbounded_channel();
    lines_tx.send(String::from("quit")).unwrap();

    session.run(lines_rx, display_tx).await.unwrap();

    let shown = drain(&mut display_rx);
    assert!(!shown.iter().any(|line| line == "=== Blackjack ==="));
    assert!(stop.is_stopped());
}

#[tokio::test]
async fn console_closing_ends_the_game() {
    let ledger = InMemoryLedger::new(100);
    let stop = StopHandle::new(RawTerminal);
    let session = Session::new(stop.clone()).with_game(blackjack(&ledger));

    let (lines_tx, lines_rx) = mpsc::unbounded_channel();
    let (display_tx, _display_rx) = mpsc::unbounded_channel();
    lines_tx.send(String::from("1")).unwrap();
    drop(lines_tx);

    timeout(Duration::from_secs(10), session.run(lines_rx, display_tx))
        .await
        .unwrap()
        .unwrap();
    assert!(stop.is_stopped());
}
