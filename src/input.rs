//! Prompt helpers that absorb malformed input before it reaches an engine.

use crate::error::EngineError;
use crate::seat::Seat;

/// One accepted answer to a [`request_choice`] prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    /// The full word, returned when either spelling matches.
    pub word: &'static str,
    /// The short alias.
    pub alias: &'static str,
}

impl Choice {
    /// Creates a choice.
    #[must_use]
    pub const fn new(word: &'static str, alias: &'static str) -> Self {
        Self { word, alias }
    }

    fn matches(&self, input: &str) -> bool {
        input.eq_ignore_ascii_case(self.word) || input.eq_ignore_ascii_case(self.alias)
    }
}

/// Shows `prompt` and reads lines until one parses as an integer in
/// `min..=max`. Every rejected line gets a warning and the prompt again.
///
/// # Errors
///
/// Returns [`EngineError::InputClosed`] if the seat runs out of input.
pub fn request_integer(
    seat: &mut dyn Seat,
    prompt: &str,
    min: u64,
    max: u64,
) -> Result<u64, EngineError> {
    seat.show(prompt.to_owned());

    loop {
        let line = seat.read_line().ok_or(EngineError::InputClosed)?;
        let trimmed = line.trim();

        let warning = match trimmed.parse::<i64>() {
            Err(_) => format!("Wager must be a whole number, not {trimmed:?}"),
            Ok(value) if value < 0 || (value as u64) < min => {
                format!("Wager must be at least {min}")
            }
            Ok(value) if value as u64 > max => {
                format!("You cannot wager {value}; the most you can wager is {max}")
            }
            Ok(value) => return Ok(value as u64),
        };

        seat.show(warning);
        seat.show(prompt.to_owned());
    }
}

/// Shows `prompt` and reads lines until one matches a choice, ignoring case
/// and surrounding whitespace. Returns the matched choice's full word.
///
/// # Errors
///
/// Returns [`EngineError::InputClosed`] if the seat runs out of input.
pub fn request_choice(
    seat: &mut dyn Seat,
    prompt: &str,
    choices: &[Choice],
) -> Result<&'static str, EngineError> {
    seat.show(prompt.to_owned());

    loop {
        let line = seat.read_line().ok_or(EngineError::InputClosed)?;
        let trimmed = line.trim();

        if let Some(choice) = choices.iter().find(|choice| choice.matches(trimmed)) {
            return Ok(choice.word);
        }

        seat.show(format!("Unknown command: {trimmed}"));
        seat.show(prompt.to_owned());
    }
}

/// Yes/no answers for the replay prompt.
pub const YES_NO: [Choice; 2] = [Choice::new("yes", "y"), Choice::new("no", "n")];
