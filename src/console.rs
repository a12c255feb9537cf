//! The interactive console.
//!
//! One loop owns the terminal. It edits the line being typed, hands finished
//! lines to whoever is listening, and prints display text from other tasks
//! above the line being edited without losing any of it.
//!
//! Raw bytes come from a dedicated reader thread, are turned into characters
//! by a decoder task, and reach the loop as [`Input`] events alongside process
//! signals. Everything leaves through a single [`StopHandle`], which restores
//! the terminal at most once no matter how many tasks ask to stop.

use std::io::{self, IsTerminal, Read, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::ConsoleError;

const LOG_TARGET: &str = "casino::console";

/// Switches the terminal in and out of raw mode.
pub trait TerminalMode: Send + Sync {
    /// Enters raw mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal refuses the mode change.
    fn enter(&self) -> io::Result<()>;

    /// Restores the mode saved by [`TerminalMode::enter`].
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal refuses the mode change.
    fn leave(&self) -> io::Result<()>;
}

/// Raw mode on the process's controlling terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawTerminal;

impl TerminalMode for RawTerminal {
    fn enter(&self) -> io::Result<()> {
        crossterm::terminal::enable_raw_mode()
    }

    fn leave(&self) -> io::Result<()> {
        crossterm::terminal::disable_raw_mode()
    }
}

struct StopInner {
    token: CancellationToken,
    mode: Box<dyn TerminalMode>,
    raw: AtomicBool,
}

impl Drop for StopInner {
    fn drop(&mut self) {
        if *self.raw.get_mut() {
            let _ = self.mode.leave();
        }
    }
}

/// Idempotent session stop, callable from any task.
///
/// Stopping cancels the console loop and restores the terminal. The restore
/// runs at most once however many clones call [`StopHandle::stop`].
#[derive(Clone)]
pub struct StopHandle {
    inner: Arc<StopInner>,
}

impl StopHandle {
    /// Creates a handle controlling `mode`.
    pub fn new(mode: impl TerminalMode + 'static) -> Self {
        Self {
            inner: Arc::new(StopInner {
                token: CancellationToken::new(),
                mode: Box::new(mode),
                raw: AtomicBool::new(false),
            }),
        }
    }

    /// Enters raw mode and remembers to leave it.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal refuses raw mode.
    pub fn enter_raw(&self) -> io::Result<()> {
        self.inner.mode.enter()?;
        self.inner.raw.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Returns whether raw mode is currently active.
    #[must_use]
    pub fn is_raw(&self) -> bool {
        self.inner.raw.load(Ordering::SeqCst)
    }

    /// Leaves raw mode if it is active.
    pub fn restore(&self) {
        if !self.inner.raw.swap(false, Ordering::SeqCst) {
            return;
        }
        match self.inner.mode.leave() {
            Ok(()) => debug!(target = LOG_TARGET, "terminal restored"),
            Err(err) => warn!(target = LOG_TARGET, error = %err, "failed to restore terminal"),
        }
    }

    /// Ends the console loop and restores the terminal.
    pub fn stop(&self) {
        self.inner.token.cancel();
        self.restore();
    }

    /// Returns whether a stop was requested.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.inner.token.is_cancelled()
    }

    /// Completes once a stop is requested.
    pub async fn stopped(&self) {
        self.inner.token.cancelled().await;
    }
}

impl core::fmt::Debug for StopHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StopHandle")
            .field("stopped", &self.is_stopped())
            .field("raw", &self.is_raw())
            .finish()
    }
}

/// An event reaching the console loop.
#[derive(Debug)]
pub enum Input {
    /// A decoded character.
    Char(char),
    /// An interrupt signal (Ctrl-C outside raw mode).
    Interrupt,
    /// A terminate signal.
    Terminate,
    /// The input stream ended.
    End,
    /// Reading input failed.
    Failed(io::Error),
}

/// Incremental UTF-8 decoder for the raw byte stream.
///
/// Malformed sequences decode to U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
    expected: usize,
}

impl Utf8Decoder {
    /// Decodes `bytes`, holding back an incomplete trailing sequence.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        let mut out = String::new();
        for &byte in bytes {
            self.push(byte, &mut out);
        }
        out
    }

    fn push(&mut self, byte: u8, out: &mut String) {
        if !self.pending.is_empty() {
            if byte & 0xC0 == 0x80 {
                self.pending.push(byte);
                if self.pending.len() == self.expected {
                    match core::str::from_utf8(&self.pending) {
                        Ok(text) => out.push_str(text),
                        Err(_) => out.push(char::REPLACEMENT_CHARACTER),
                    }
                    self.pending.clear();
                }
                return;
            }
            self.pending.clear();
            out.push(char::REPLACEMENT_CHARACTER);
        }

        self.expected = match byte {
            0x00..=0x7F => {
                out.push(char::from(byte));
                return;
            }
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => {
                out.push(char::REPLACEMENT_CHARACTER);
                return;
            }
        };
        self.pending.push(byte);
    }
}

/// What a keystroke did to the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// The line is still being edited.
    Pending,
    /// The line was submitted.
    Submit(String),
    /// End of input on an empty line; the loop should end.
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Escape {
    None,
    Esc,
    Csi,
    /// `ESC O` prefix; one final character follows.
    Ss3,
}

/// The prompt and the partially typed line.
///
/// In raw mode the editor echoes keystrokes and redraws with cursor control.
/// Otherwise the terminal already echoes and the editor only prints prompts
/// and messages.
#[derive(Debug)]
pub struct LineEditor {
    prompt: String,
    buffer: String,
    raw: bool,
    escape: Escape,
    after_cr: bool,
}

impl LineEditor {
    /// Creates an editor with an empty line.
    #[must_use]
    pub fn new(prompt: impl Into<String>, raw: bool) -> Self {
        Self {
            prompt: prompt.into(),
            buffer: String::new(),
            raw,
            escape: Escape::None,
            after_cr: false,
        }
    }

    /// The line typed so far.
    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Prints the prompt followed by the current line.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn draw_prompt(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, Print(&self.prompt), Print(&self.buffer))
    }

    fn newline(&self, out: &mut impl Write) -> io::Result<()> {
        if self.raw {
            queue!(out, Print("\r\n"))?;
        }
        Ok(())
    }

    fn redraw(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(
            out,
            MoveToColumn(0),
            Print(&self.prompt),
            Print(&self.buffer),
            Clear(ClearType::UntilNewLine)
        )
    }

    fn take_line(&mut self, out: &mut impl Write) -> io::Result<String> {
        self.newline(out)?;
        let line = core::mem::take(&mut self.buffer);
        self.draw_prompt(out)?;
        Ok(line)
    }

    /// Applies one typed character.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn key(&mut self, c: char, out: &mut impl Write) -> io::Result<Edit> {
        let after_cr = core::mem::replace(&mut self.after_cr, c == '\r');

        match self.escape {
            Escape::Esc => {
                self.escape = Escape::None;
                match c {
                    '[' => {
                        self.escape = Escape::Csi;
                        return Ok(Edit::Pending);
                    }
                    'O' => {
                        self.escape = Escape::Ss3;
                        return Ok(Edit::Pending);
                    }
                    // A lone Esc; the key after it is ordinary input.
                    _ => {}
                }
            }
            Escape::Ss3 => {
                self.escape = Escape::None;
                return Ok(Edit::Pending);
            }
            Escape::Csi => {
                if ('@'..='~').contains(&c) {
                    self.escape = Escape::None;
                }
                return Ok(Edit::Pending);
            }
            Escape::None => {}
        }

        match c {
            '\n' if after_cr => Ok(Edit::Pending),
            '\r' | '\n' => Ok(Edit::Submit(self.take_line(out)?)),
            '\u{3}' => {
                self.interrupt(out)?;
                Ok(Edit::Pending)
            }
            '\u{4}' => {
                if self.buffer.is_empty() {
                    self.newline(out)?;
                    Ok(Edit::Close)
                } else {
                    Ok(Edit::Submit(self.take_line(out)?))
                }
            }
            '\u{7f}' | '\u{8}' => {
                if self.buffer.pop().is_some() && self.raw {
                    self.redraw(out)?;
                }
                Ok(Edit::Pending)
            }
            '\u{1b}' => {
                self.escape = Escape::Esc;
                Ok(Edit::Pending)
            }
            c if c.is_control() => Ok(Edit::Pending),
            c => {
                self.buffer.push(c);
                if self.raw {
                    queue!(out, Print(c))?;
                }
                Ok(Edit::Pending)
            }
        }
    }

    /// Discards the line and starts a fresh prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn interrupt(&mut self, out: &mut impl Write) -> io::Result<()> {
        self.buffer.clear();
        self.escape = Escape::None;
        queue!(out, Print(if self.raw { "\r\n" } else { "\n" }))?;
        self.draw_prompt(out)
    }

    /// Prints `message` on its own line, then redraws the prompt and the
    /// untouched line beneath it.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn message(&mut self, message: &str, out: &mut impl Write) -> io::Result<()> {
        if self.raw {
            let message = message.replace('\n', "\r\n");
            queue!(
                out,
                MoveToColumn(0),
                Clear(ClearType::UntilNewLine),
                Print(message),
                Print("\r\n")
            )?;
        } else {
            queue!(out, Print("\r"), Print(message), Print("\n"))?;
        }
        self.draw_prompt(out)
    }

    /// Handles the end of the input stream. Returns the unfinished line, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn finish(&mut self, out: &mut impl Write) -> io::Result<Option<String>> {
        self.newline(out)?;
        if self.buffer.is_empty() {
            return Ok(None);
        }
        Ok(Some(core::mem::take(&mut self.buffer)))
    }
}

/// The console loop and the streams it serves.
pub struct Console {
    prompt: String,
    submitted: UnboundedSender<String>,
    stop: StopHandle,
}

impl Console {
    /// Creates a console for the process's terminal. The receiver yields every
    /// submitted line in the order Enter was pressed.
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> (Self, UnboundedReceiver<String>) {
        Self::with_terminal(prompt, RawTerminal)
    }

    /// Creates a console switching modes through `mode`.
    pub fn with_terminal(
        prompt: impl Into<String>,
        mode: impl TerminalMode + 'static,
    ) -> (Self, UnboundedReceiver<String>) {
        let (submitted, lines) = mpsc::unbounded_channel();
        let console = Self {
            prompt: prompt.into(),
            submitted,
            stop: StopHandle::new(mode),
        };
        (console, lines)
    }

    /// A handle that stops this console from any task.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Runs on the process's stdin and stdout until end of input, a terminate
    /// signal, a read failure, or a stop. `inbound` carries display text.
    ///
    /// On a terminal the console switches to raw mode; otherwise it reads
    /// line-buffered input as-is. The terminal is restored before this
    /// returns.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode cannot be entered, the reader thread cannot
    /// start, or reading or writing the terminal fails.
    pub async fn run(self, inbound: UnboundedReceiver<String>) -> Result<(), ConsoleError> {
        let raw = io::stdin().is_terminal();
        if raw {
            self.stop.enter_raw().map_err(ConsoleError::Terminal)?;
        }
        debug!(target = LOG_TARGET, raw, "console starting");

        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (bytes_tx, bytes_rx) = mpsc::unbounded_channel();
        if let Err(err) = spawn_stdin_reader(bytes_tx) {
            self.stop.restore();
            return Err(err.into());
        }
        tokio::spawn(decode_input(bytes_rx, input_tx.clone()));
        tokio::spawn(forward_signals(input_tx, self.stop.clone()));

        self.drive(input_rx, inbound, io::stdout(), raw).await
    }

    /// Runs the loop over explicit streams and an explicit output sink.
    ///
    /// Returns once input ends, a terminate event arrives, reading fails, or
    /// the stop handle fires. The terminal is restored on every path.
    ///
    /// # Errors
    ///
    /// Returns an error if an [`Input::Failed`] event arrives or writing fails.
    pub async fn drive<W: Write>(
        self,
        mut input: UnboundedReceiver<Input>,
        mut inbound: UnboundedReceiver<String>,
        mut out: W,
        raw: bool,
    ) -> Result<(), ConsoleError> {
        let mut editor = LineEditor::new(self.prompt.clone(), raw);
        let result = self
            .event_loop(&mut editor, &mut input, &mut inbound, &mut out)
            .await;
        let _ = out.flush();
        self.stop.restore();

        match &result {
            Ok(()) => debug!(target = LOG_TARGET, "console stopped"),
            Err(err) => warn!(target = LOG_TARGET, error = %err, "console failed"),
        }
        result
    }

    async fn event_loop<W: Write>(
        &self,
        editor: &mut LineEditor,
        input: &mut UnboundedReceiver<Input>,
        inbound: &mut UnboundedReceiver<String>,
        out: &mut W,
    ) -> Result<(), ConsoleError> {
        let token = self.stop.inner.token.clone();
        let mut inbound_open = true;

        editor.draw_prompt(out)?;
        out.flush()?;

        loop {
            tokio::select! {
                biased;

                () = token.cancelled() => {
                    // Text queued before the stop still prints.
                    while let Ok(text) = inbound.try_recv() {
                        editor.message(&text, out)?;
                    }
                    out.flush()?;
                    return Ok(());
                }

                message = inbound.recv(), if inbound_open => match message {
                    Some(text) => editor.message(&text, out)?,
                    None => inbound_open = false,
                },

                event = input.recv() => match event {
                    Some(Input::Char(c)) => match editor.key(c, out)? {
                        Edit::Pending => {}
                        Edit::Submit(line) => self.submit(line),
                        Edit::Close => {
                            out.flush()?;
                            return Ok(());
                        }
                    },
                    Some(Input::Interrupt) => editor.interrupt(out)?,
                    Some(Input::Terminate) => {
                        debug!(target = LOG_TARGET, "terminate signal");
                        return Ok(());
                    }
                    Some(Input::Failed(err)) => return Err(ConsoleError::Io(err)),
                    Some(Input::End) | None => {
                        if let Some(line) = editor.finish(out)? {
                            self.submit(line);
                        }
                        out.flush()?;
                        return Ok(());
                    }
                },
            }

            out.flush()?;
        }
    }

    fn submit(&self, line: String) {
        if self.submitted.send(line).is_err() {
            debug!(target = LOG_TARGET, "no listener for submitted line");
        }
    }
}

fn spawn_stdin_reader(bytes: UnboundedSender<io::Result<Vec<u8>>>) -> io::Result<()> {
    std::thread::Builder::new()
        .name(String::from("console-stdin"))
        .spawn(move || {
            let mut stdin = io::stdin().lock();
            let mut buf = [0_u8; 256];
            loop {
                match stdin.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        if bytes.send(Ok(buf[..n].to_vec())).is_err() {
                            break;
                        }
                    }
                    Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                    Err(err) => {
                        let _ = bytes.send(Err(err));
                        break;
                    }
                }
            }
        })?;
    Ok(())
}

async fn decode_input(
    mut bytes: UnboundedReceiver<io::Result<Vec<u8>>>,
    input: UnboundedSender<Input>,
) {
    let mut decoder = Utf8Decoder::default();
    while let Some(chunk) = bytes.recv().await {
        match chunk {
            Ok(chunk) => {
                for c in decoder.decode(&chunk).chars() {
                    if input.send(Input::Char(c)).is_err() {
                        return;
                    }
                }
            }
            Err(err) => {
                let _ = input.send(Input::Failed(err));
                return;
            }
        }
    }
    let _ = input.send(Input::End);
}

#[cfg(unix)]
async fn forward_signals(input: UnboundedSender<Input>, stop: StopHandle) {
    use tokio::signal::unix::{SignalKind, signal};

    let (mut interrupt, mut terminate) =
        match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
            (Ok(interrupt), Ok(terminate)) => (interrupt, terminate),
            (Err(err), _) | (_, Err(err)) => {
                warn!(target = LOG_TARGET, error = %err, "signal handlers unavailable");
                return;
            }
        };

    loop {
        let event = tokio::select! {
            () = stop.stopped() => return,
            Some(()) = interrupt.recv() => Input::Interrupt,
            Some(()) = terminate.recv() => Input::Terminate,
            else => return,
        };
        if input.send(event).is_err() {
            return;
        }
    }
}

#[cfg(not(unix))]
async fn forward_signals(input: UnboundedSender<Input>, stop: StopHandle) {
    loop {
        tokio::select! {
            () = stop.stopped() => return,
            result = tokio::signal::ctrl_c() => {
                if result.is_err() || input.send(Input::Interrupt).is_err() {
                    return;
                }
            }
        }
    }
}
