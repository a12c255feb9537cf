//! Blackjack engine tests.

mod common;

use casino::game::blackjack::settle;
use casino::game::{Blackjack, BlackjackState, Game, Outcome};
use casino::{
    CasinoOptions, EngineError, InMemoryLedger, Ledger, Rank, Role, SaveData, Script, Shoe,
    StackedDeck, Suit,
};
use chrono::{Duration, Utc};
use common::card;

fn table(draws: Vec<casino::Card>, chips: u64) -> (Blackjack<StackedDeck, InMemoryLedger>, InMemoryLedger) {
    let ledger = InMemoryLedger::new(chips);
    let game = Blackjack::new(StackedDeck::new(draws), ledger.clone(), &CasinoOptions::default());
    (game, ledger)
}

fn chips(ledger: &InMemoryLedger) -> u64 {
    ledger.read().map(|data| data.remaining_chips).unwrap_or_default()
}

#[test]
fn outcome_table() {
    let win = settle(20, 19, 10);
    assert_eq!(win.outcome, Outcome::UserWins);
    assert_eq!(win.payout, 20);

    let push = settle(19, 19, 10);
    assert_eq!(push.outcome, Outcome::Push);
    assert_eq!(push.payout, 10);

    let bust = settle(22, 18, 10);
    assert_eq!(bust.outcome, Outcome::DealerWins);
    assert_eq!(bust.payout, 0);

    let dealer_bust = settle(12, 25, 10);
    assert_eq!(dealer_bust.outcome, Outcome::UserWins);

    // The user's bust is checked before the dealer's.
    let double_bust = settle(23, 24, 10);
    assert_eq!(double_bust.outcome, Outcome::DealerWins);
    assert_eq!(double_bust.payout, 0);
}

#[test]
fn natural_skips_player_and_dealer_turns() {
    let draws = vec![
        card(Rank::Ace, Suit::Spades),
        card(Rank::Nine, Suit::Hearts),
        card(Rank::King, Suit::Spades),
        card(Rank::Seven, Suit::Diamonds),
    ];
    let (mut game, ledger) = table(draws, 100);
    let mut seat = Script::new(["10", "n"]);

    game.play(&mut seat).unwrap();

    assert!(seat.saw("BLACKJACK"));
    assert!(!seat.saw("Your move"));
    assert!(!seat.saw("DEALER"));
    assert!(seat.saw("YOU WIN! +20 chips"));
    assert_eq!(chips(&ledger), 110);
    assert_eq!(game.state(), BlackjackState::Terminated);
}

#[test]
fn stay_then_dealer_draws_to_seventeen() {
    let draws = vec![
        card(Rank::Ten, Suit::Spades),
        card(Rank::Nine, Suit::Hearts),
        card(Rank::Queen, Suit::Diamonds),
        card(Rank::Five, Suit::Clubs),
        card(Rank::Three, Suit::Spades),
        card(Rank::King, Suit::Clubs),
    ];
    let (mut game, ledger) = table(draws, 100);
    let mut seat = Script::new(["10", "s", "n"]);

    game.play(&mut seat).unwrap();

    assert_eq!(seat.count("Your move"), 1);
    assert!(seat.saw("You: 20\tDealer: 17"));
    assert!(seat.saw("YOU WIN! +20 chips"));
    assert_eq!(chips(&ledger), 110);

    let (dealer, _) = game.into_parts();
    assert_eq!(dealer.cards_remaining(), 1);
    assert_eq!(dealer.discard_pile().len(), 5);
    assert!(dealer.discard_pile().iter().all(casino::Card::is_hidden));
}

#[test]
fn user_bust_loses_without_a_dealer_turn() {
    let draws = vec![
        card(Rank::Ten, Suit::Spades),
        card(Rank::Nine, Suit::Hearts),
        card(Rank::Six, Suit::Diamonds),
        card(Rank::Eight, Suit::Clubs),
        card(Rank::King, Suit::Spades),
        card(Rank::Two, Suit::Clubs),
    ];
    let (mut game, ledger) = table(draws, 100);
    let mut seat = Script::new(["10", "h", "n"]);

    game.play(&mut seat).unwrap();

    assert!(seat.saw("BUST!"));
    assert!(!seat.saw("DEALER"));
    assert!(seat.saw("Dealer wins (-10 chips)"));
    assert_eq!(chips(&ledger), 90);

    let (dealer, _) = game.into_parts();
    assert_eq!(dealer.cards_remaining(), 1);
}

#[test]
fn equal_totals_push() {
    let draws = vec![
        card(Rank::Ten, Suit::Spades),
        card(Rank::Ten, Suit::Hearts),
        card(Rank::Nine, Suit::Diamonds),
        card(Rank::Nine, Suit::Clubs),
    ];
    let (mut game, ledger) = table(draws, 100);
    let mut seat = Script::new(["25", "stay", "no"]);

    game.play(&mut seat).unwrap();

    assert!(seat.saw("Tie - win your chips back (+25 chips)"));
    assert_eq!(chips(&ledger), 100);
}

#[test]
fn dealer_blackjack_on_reveal() {
    let draws = vec![
        card(Rank::Ten, Suit::Spades),
        card(Rank::Ace, Suit::Hearts),
        card(Rank::Eight, Suit::Diamonds),
        card(Rank::King, Suit::Clubs),
    ];
    let (mut game, ledger) = table(draws, 100);
    let mut seat = Script::new(["10", "S", "N"]);

    game.play(&mut seat).unwrap();

    assert!(seat.saw("DEALER BLACKJACK"));
    assert!(seat.saw("Dealer wins (-10 chips)"));
    assert_eq!(chips(&ledger), 90);
}

#[test]
fn dealer_bust_pays_the_user() {
    let draws = vec![
        card(Rank::Ten, Suit::Spades),
        card(Rank::Ten, Suit::Hearts),
        card(Rank::Two, Suit::Diamonds),
        card(Rank::Six, Suit::Clubs),
        card(Rank::Nine, Suit::Spades),
    ];
    let (mut game, ledger) = table(draws, 100);
    let mut seat = Script::new(["10", "s", "n"]);

    game.play(&mut seat).unwrap();

    assert!(seat.saw("DEALER BUST!"));
    assert!(seat.saw("YOU WIN! +20 chips"));
    assert_eq!(chips(&ledger), 110);
}

#[test]
fn hole_card_stays_hidden_until_the_dealer_turn() {
    let draws = vec![
        card(Rank::Ten, Suit::Spades),
        card(Rank::Nine, Suit::Hearts),
        card(Rank::Seven, Suit::Diamonds),
        card(Rank::Eight, Suit::Clubs),
    ];
    let (mut game, _ledger) = table(draws, 100);
    let mut seat = Script::new(["10", "s"]);

    assert_eq!(game.step(&mut seat).unwrap(), BlackjackState::Dealing);
    assert_eq!(game.step(&mut seat).unwrap(), BlackjackState::PlayerTurn);

    let dealer = game.dealer_hand().unwrap();
    assert!(!dealer.cards()[0].is_hidden());
    assert!(dealer.cards()[1].is_hidden());
    assert_eq!(dealer.value(), 9);
    assert!(seat.saw("Dealer\t(showing 9)"));
    assert!(seat.saw("[###]"));
    assert_eq!(game.user_hand().map(casino::Hand::value), Some(17));

    assert_eq!(game.step(&mut seat).unwrap(), BlackjackState::DealerTurn);
    assert_eq!(game.step(&mut seat).unwrap(), BlackjackState::Resolve);
    assert!(!game.dealer_hand().unwrap().has_hidden());
}

#[test]
fn replay_runs_a_second_round() {
    let draws = vec![
        card(Rank::Ten, Suit::Spades),
        card(Rank::Nine, Suit::Hearts),
        card(Rank::Queen, Suit::Diamonds),
        card(Rank::Eight, Suit::Clubs),
        card(Rank::Five, Suit::Spades),
        card(Rank::Ten, Suit::Hearts),
        card(Rank::Six, Suit::Diamonds),
        card(Rank::Seven, Suit::Clubs),
    ];
    let (mut game, ledger) = table(draws, 100);
    let mut seat = Script::new(["10", "s", "y", "20", "s", "n"]);

    game.play(&mut seat).unwrap();

    assert_eq!(seat.count("=== Blackjack ==="), 1);
    assert_eq!(seat.count("Play again?"), 2);
    assert!(seat.saw("YOU WIN! +20 chips"));
    assert!(seat.saw("Dealer wins (-20 chips)"));
    assert_eq!(chips(&ledger), 90);

    let (dealer, _) = game.into_parts();
    assert_eq!(dealer.shuffles(), 2);
    assert_eq!(dealer.discard_pile().len(), 8);
}

#[test]
fn malformed_wagers_are_reprompted() {
    let draws = vec![
        card(Rank::Ten, Suit::Spades),
        card(Rank::Nine, Suit::Hearts),
        card(Rank::Queen, Suit::Diamonds),
        card(Rank::Eight, Suit::Clubs),
    ];
    let (mut game, ledger) = table(draws, 100);
    let mut seat = Script::new(["ten", "0", "-5", "500", " 10 ", "x", "s", "n"]);

    game.play(&mut seat).unwrap();

    assert!(seat.saw("Wager must be a whole number, not \"ten\""));
    assert_eq!(seat.count("Wager must be at least 1"), 2);
    assert!(seat.saw("the most you can wager is 100"));
    assert_eq!(seat.count("How much would you like to wager?"), 5);
    assert!(seat.saw("Unknown command: x"));
    assert!(seat.saw("Wagered 10 chips"));
    assert_eq!(chips(&ledger), 110);
}

#[test]
fn hit_without_a_round_is_an_error() {
    let (mut game, _ledger) = table(Vec::new(), 100);
    assert!(matches!(game.hit(Role::User), Err(EngineError::NoActiveRound)));
}

#[test]
fn empty_shoe_is_an_error_not_a_panic() {
    let draws = vec![card(Rank::Ten, Suit::Spades), card(Rank::Nine, Suit::Hearts)];
    let (mut game, ledger) = table(draws, 100);
    let mut seat = Script::new(["10"]);

    let result = game.play(&mut seat);
    assert!(matches!(result, Err(EngineError::EmptyShoe)));
    assert_eq!(chips(&ledger), 90);

    let (dealer, _) = game.into_parts();
    assert_eq!(dealer.discard_pile().len(), 2);
}

#[test]
fn closed_input_returns_dealt_cards() {
    let draws = vec![
        card(Rank::Ten, Suit::Spades),
        card(Rank::Nine, Suit::Hearts),
        card(Rank::Seven, Suit::Diamonds),
        card(Rank::Eight, Suit::Clubs),
    ];
    let (mut game, ledger) = table(draws, 100);
    let mut seat = Script::new(["10"]);

    let err = game.play(&mut seat).unwrap_err();
    assert!(err.is_disconnect());
    assert_eq!(chips(&ledger), 90);

    let (dealer, _) = game.into_parts();
    assert_eq!(dealer.discard_pile().len(), 4);
}

#[test]
fn broke_today_means_no_play() {
    let ledger = InMemoryLedger::with_record(SaveData::fresh(0, Utc::now()));
    let mut game = Blackjack::new(StackedDeck::default(), ledger, &CasinoOptions::default());
    let mut seat = Script::new(["10"]);

    game.play(&mut seat).unwrap();

    assert!(seat.saw("You are out of chips"));
    assert_eq!(seat.remaining(), 1);
}

#[test]
fn broke_yesterday_tops_up() {
    let yesterday = SaveData::fresh(0, Utc::now() - Duration::days(1));
    let ledger = InMemoryLedger::with_record(yesterday);
    let options = CasinoOptions::default().with_starting_chips(500);
    let mut game = Blackjack::new(StackedDeck::default(), ledger.clone(), &options);
    let mut seat = Script::default();

    let err = game.play(&mut seat).unwrap_err();
    assert!(err.is_disconnect());
    assert!(seat.saw("You have 500 chips remaining"));
    assert_eq!(chips(&ledger), 500);
}

#[test]
fn dealer_threshold_is_configurable() {
    let draws = vec![
        card(Rank::Ten, Suit::Spades),
        card(Rank::Ten, Suit::Hearts),
        card(Rank::Nine, Suit::Diamonds),
        card(Rank::Seven, Suit::Clubs),
        card(Rank::Two, Suit::Spades),
    ];
    let ledger = InMemoryLedger::new(100);
    let options = CasinoOptions::default().with_dealer_stands_on(18);
    let mut game = Blackjack::new(StackedDeck::new(draws), ledger.clone(), &options);
    let mut seat = Script::new(["10", "s", "n"]);

    game.play(&mut seat).unwrap();

    assert!(seat.saw("Dealer stands on 18"));
    assert!(seat.saw("You: 19\tDealer: 19"));
    assert_eq!(chips(&ledger), 100);
}

#[test]
fn real_shoe_is_whole_after_play() {
    let ledger = InMemoryLedger::new(100);
    let mut game = Blackjack::new(Shoe::new(11), ledger, &CasinoOptions::default());
    let mut seat = Script::new(["10", "s", "y", "10", "s", "n"]);

    game.play(&mut seat).unwrap();

    let (shoe, _) = game.into_parts();
    assert!(shoe.is_complete());
}
