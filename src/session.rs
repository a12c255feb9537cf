//! The game menu and the plumbing between the console and the active engine.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::console::StopHandle;
use crate::error::SessionError;
use crate::game::Game;
use crate::seat::ChannelSeat;

const LOG_TARGET: &str = "casino::session";

/// Returns whether `line` asks to leave the session.
#[must_use]
pub fn is_quit(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("quit")
}

/// A numbered menu of games wired to a console.
///
/// The session reads a selection, runs that game on a blocking task, and
/// forwards submitted lines to it until the game ends or the human types
/// `quit`. Either way the console is stopped before [`Session::run`] returns.
pub struct Session {
    games: Vec<Box<dyn Game>>,
    stop: StopHandle,
}

impl Session {
    /// Creates a session with an empty menu.
    #[must_use]
    pub fn new(stop: StopHandle) -> Self {
        Self {
            games: Vec::new(),
            stop,
        }
    }

    /// Adds `game` to the end of the menu.
    #[must_use]
    pub fn with_game(mut self, game: impl Game + 'static) -> Self {
        self.games.push(Box::new(game));
        self
    }

    /// The menu as display lines.
    #[must_use]
    pub fn menu(&self) -> Vec<String> {
        let mut lines = vec![
            String::from("=== THE CASINO ==="),
            String::from("Type 'quit' at any time to leave"),
            String::from("Select a number from the menu below to play:"),
        ];
        lines.extend(
            self.games
                .iter()
                .enumerate()
                .map(|(index, game)| format!("{}. {}", index + 1, game.name())),
        );
        lines
    }

    /// Runs the session over the console's submitted `lines`, writing display
    /// text to `display`.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen engine fails for any reason other than
    /// its input closing, or if its task panics.
    pub async fn run(
        mut self,
        mut lines: UnboundedReceiver<String>,
        display: UnboundedSender<String>,
    ) -> Result<(), SessionError> {
        let result = self.serve(&mut lines, &display).await;
        self.stop.stop();
        result
    }

    async fn serve(
        &mut self,
        lines: &mut UnboundedReceiver<String>,
        display: &UnboundedSender<String>,
    ) -> Result<(), SessionError> {
        for line in self.menu() {
            show(display, line);
        }

        let Some(index) = self.select(lines, display).await else {
            info!(target = LOG_TARGET, "left before choosing a game");
            return Ok(());
        };

        let mut game = self.games.swap_remove(index);
        info!(target = LOG_TARGET, game = game.name(), "game selected");

        let (engine_tx, engine_rx) = mpsc::unbounded_channel();
        let mut seat = ChannelSeat::new(engine_rx, display.clone());
        let mut task = tokio::task::spawn_blocking(move || game.play(&mut seat));

        let mut engine_tx = Some(engine_tx);
        let played = loop {
            tokio::select! {
                played = &mut task => break played,
                line = lines.recv(), if engine_tx.is_some() => match line {
                    Some(line) if is_quit(&line) => {
                        info!(target = LOG_TARGET, "quit requested");
                        engine_tx = None;
                    }
                    Some(line) => {
                        if let Some(tx) = &engine_tx {
                            if tx.send(line).is_err() {
                                debug!(target = LOG_TARGET, "engine stopped reading");
                            }
                        }
                    }
                    None => engine_tx = None,
                },
            }
        };

        match played? {
            Ok(()) => Ok(()),
            Err(err) if err.is_disconnect() => {
                debug!(target = LOG_TARGET, "engine input closed");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn select(
        &self,
        lines: &mut UnboundedReceiver<String>,
        display: &UnboundedSender<String>,
    ) -> Option<usize> {
        while let Some(line) = lines.recv().await {
            let trimmed = line.trim();
            if is_quit(trimmed) {
                return None;
            }
            match trimmed.parse::<usize>() {
                Ok(choice) if (1..=self.games.len()).contains(&choice) => {
                    return Some(choice - 1);
                }
                Ok(_) => show(display, format!("Unknown option: {trimmed}")),
                Err(_) => show(display, format!("{trimmed:?} is not a valid number")),
            }
        }
        None
    }
}

fn show(display: &UnboundedSender<String>, text: String) {
    if display.send(text).is_err() {
        debug!(target = LOG_TARGET, "display closed; dropping output");
    }
}
