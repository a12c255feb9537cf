//! Session configuration options.

/// Configuration shared by the console and both engines.
///
/// Use the builder pattern to customize options:
///
/// ```
/// use casino::CasinoOptions;
///
/// let options = CasinoOptions::default()
///     .with_starting_chips(500)
///     .with_dealer_stands_on(17)
///     .with_seed(Some(7));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CasinoOptions {
    /// Bankroll granted to a fresh ledger and on each daily top-up.
    pub starting_chips: u64,
    /// Blackjack dealer stops hitting at this total.
    pub dealer_stands_on: u8,
    /// Prompt drawn in front of the line being edited.
    pub prompt: String,
    /// Shoe seed. `None` derives one from the clock.
    pub seed: Option<u64>,
}

impl Default for CasinoOptions {
    fn default() -> Self {
        Self {
            starting_chips: 1000,
            dealer_stands_on: 17,
            prompt: String::from("> "),
            seed: None,
        }
    }
}

impl CasinoOptions {
    /// Sets the starting bankroll.
    ///
    /// # Example
    ///
    /// ```
    /// use casino::CasinoOptions;
    ///
    /// let options = CasinoOptions::default().with_starting_chips(250);
    /// assert_eq!(options.starting_chips, 250);
    /// ```
    #[must_use]
    pub const fn with_starting_chips(mut self, chips: u64) -> Self {
        self.starting_chips = chips;
        self
    }

    /// Sets the total at which the blackjack dealer stands.
    ///
    /// # Example
    ///
    /// ```
    /// use casino::CasinoOptions;
    ///
    /// let options = CasinoOptions::default().with_dealer_stands_on(18);
    /// assert_eq!(options.dealer_stands_on, 18);
    /// ```
    #[must_use]
    pub const fn with_dealer_stands_on(mut self, total: u8) -> Self {
        self.dealer_stands_on = total;
        self
    }

    /// Sets the console prompt.
    ///
    /// # Example
    ///
    /// ```
    /// use casino::CasinoOptions;
    ///
    /// let options = CasinoOptions::default().with_prompt("$ ");
    /// assert_eq!(options.prompt, "$ ");
    /// ```
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Sets the shoe seed.
    ///
    /// # Example
    ///
    /// ```
    /// use casino::CasinoOptions;
    ///
    /// let options = CasinoOptions::default().with_seed(Some(42));
    /// assert_eq!(options.seed, Some(42));
    /// ```
    #[must_use]
    pub const fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the configured seed, or one derived from the clock.
    #[must_use]
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos() as u64
        })
    }
}
