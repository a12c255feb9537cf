//! The human's side of the table, as seen by an engine.

use std::collections::VecDeque;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::debug;

const LOG_TARGET: &str = "casino::seat";

/// A synchronous line source paired with a display sink.
///
/// Engines block in [`Seat::read_line`] and nowhere else.
pub trait Seat: Send {
    /// Waits for the next submitted line. `None` once the human is gone.
    fn read_line(&mut self) -> Option<String>;

    /// Queues a line of display text.
    fn show(&mut self, text: String);
}

/// A seat wired to the console through unbounded channels.
///
/// [`Seat::read_line`] blocks the calling thread, so engines using this seat
/// must run on a blocking task.
#[derive(Debug)]
pub struct ChannelSeat {
    lines: UnboundedReceiver<String>,
    display: UnboundedSender<String>,
}

impl ChannelSeat {
    /// Creates a seat reading `lines` and writing to `display`.
    #[must_use]
    pub const fn new(lines: UnboundedReceiver<String>, display: UnboundedSender<String>) -> Self {
        Self { lines, display }
    }
}

impl Seat for ChannelSeat {
    fn read_line(&mut self) -> Option<String> {
        self.lines.blocking_recv()
    }

    fn show(&mut self, text: String) {
        if self.display.send(text).is_err() {
            debug!(target = LOG_TARGET, "display closed; dropping output");
        }
    }
}

/// A seat that replays a fixed list of lines and records everything shown.
///
/// ```
/// use casino::{Script, Seat};
///
/// let mut seat = Script::new(["10", "s"]);
/// assert_eq!(seat.read_line().as_deref(), Some("10"));
/// seat.show("hello".into());
/// assert_eq!(seat.shown(), ["hello"]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct Script {
    lines: VecDeque<String>,
    shown: Vec<String>,
}

impl Script {
    /// Creates a script from the lines the human will type, in order.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            shown: Vec::new(),
        }
    }

    /// Everything the engine displayed so far.
    #[must_use]
    pub fn shown(&self) -> &[String] {
        &self.shown
    }

    /// Returns whether any displayed line contains `needle`.
    #[must_use]
    pub fn saw(&self, needle: &str) -> bool {
        self.shown.iter().any(|line| line.contains(needle))
    }

    /// Number of displayed lines containing `needle`.
    #[must_use]
    pub fn count(&self, needle: &str) -> usize {
        self.shown.iter().filter(|line| line.contains(needle)).count()
    }

    /// Lines not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl Seat for Script {
    fn read_line(&mut self) -> Option<String> {
        self.lines.pop_front()
    }

    fn show(&mut self, text: String) {
        self.shown.push(text);
    }
}
