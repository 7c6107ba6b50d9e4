//! phosphor REPL: the interactive terminal.
//!
//! This REPL drives a kernel [`Session`]. It handles:
//! - Meta-commands: `help`, `quit`, `mode`, `history`, `/cwd`
//! - Routing everything else through the session
//! - Typewriter output for chat replies, with Ctrl-C to cut a reply short
//! - Line editing, completion and persistent history via rustyline

pub mod completion;
pub mod format;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config, Editor};
use thiserror::Error;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use phosphor_kernel::{
    BacklogPacing, ChatBackend, ChatMode, EchoBackend, PhosphorConfig, ResetKind, Route,
    ScriptedSequence, Session, StreamOutcome, paths, play, relay,
};

use crate::completion::PhosphorHelper;
use crate::format::{Collected, Output, TerminalOutput};

/// Pause between fragments of the offline echo backend.
const ECHO_CHUNK_DELAY: Duration = Duration::from_millis(35);

/// Returned by [`Repl::process_line`] when the user asked to leave.
#[derive(Debug, Error)]
#[error("exit requested")]
pub struct ExitRequested;

/// Result from meta-command handling.
#[derive(Debug)]
enum MetaResult {
    /// Continue with optional output
    Continue(Option<String>),
    /// Exit the REPL (caller should save history and exit)
    Exit,
}

/// REPL configuration and state.
pub struct Repl {
    session: Session,
    backend: Arc<dyn ChatBackend>,
    config: PhosphorConfig,
    runtime: Runtime,
    interactive: bool,
    last_reset: Option<ResetKind>,
}

impl Repl {
    /// Create a REPL from the user's config file.
    pub fn new() -> Result<Self> {
        Self::with_config(PhosphorConfig::load()?)
    }

    /// Create a REPL answering chat with the offline echo backend.
    pub fn with_config(config: PhosphorConfig) -> Result<Self> {
        let backend = EchoBackend::new(config.prompts.clone()).with_chunk_delay(ECHO_CHUNK_DELAY);
        Self::with_backend(config, Arc::new(backend))
    }

    pub fn with_backend(config: PhosphorConfig, backend: Arc<dyn ChatBackend>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to create tokio runtime")?;

        Ok(Self {
            session: Session::from_config(&config),
            backend,
            config,
            runtime,
            interactive: false,
            last_reset: None,
        })
    }

    /// Animate output and let Ctrl-C interrupt it.
    ///
    /// Off by default: scripted sequences print at once and replies are
    /// revealed as fast as they arrive.
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The reset performed by the last processed line, if any.
    pub fn take_reset(&mut self) -> Option<ResetKind> {
        self.last_reset.take()
    }

    /// Process a single line of input.
    ///
    /// Returns Ok(None) when there is nothing to show, Ok(Some(output))
    /// otherwise, or Err([`ExitRequested`]) when the REPL should exit.
    pub fn process_line(&mut self, line: &str) -> Result<Option<String>> {
        let mut out = Collected::default();
        self.process_line_with(line, &mut out)?;
        let text = out.into_string();
        let text = text.strip_suffix('\n').unwrap_or(&text);
        Ok((!text.is_empty()).then(|| text.to_string()))
    }

    /// Process a line, writing output as it is produced.
    pub fn process_line_with(&mut self, line: &str, out: &mut dyn Output) -> Result<()> {
        let trimmed = line.trim();

        // Handle meta-commands (both /cmd and cmd forms for common ones)
        let meta = if trimmed.starts_with('/') {
            Some(self.handle_meta_command(trimmed))
        } else {
            self.try_shell_style_command(trimmed)
        };
        match meta {
            Some(MetaResult::Continue(text)) => {
                // Recorded after running so `history` lists what came before it
                self.session.history_mut().push(line);
                if let Some(text) = text {
                    out.text(&text);
                }
                return Ok(());
            }
            Some(MetaResult::Exit) => return Err(ExitRequested.into()),
            None => {}
        }

        let route = self.session.route(line);
        if let Route::Reset(kind) = route {
            self.last_reset = Some(kind);
        }
        match route {
            Route::Empty => {}
            Route::Reset(ResetKind::Clear) => {
                if self.interactive {
                    out.clear_screen();
                }
            }
            Route::Reset(ResetKind::Reboot) => {
                if self.interactive {
                    out.clear_screen();
                }
                let boot = self.session.boot_sequence();
                self.play_sequence(&boot, out);
            }
            Route::Script(sequence) => self.play_sequence(&sequence, out),
            Route::Filesystem(output) => out.fs(&output),
            Route::Chat { message, mode } => self.chat(&message, mode, out),
        }
        Ok(())
    }

    /// Play the boot sequence.
    pub fn boot(&mut self, out: &mut dyn Output) {
        let boot = self.session.boot_sequence();
        self.play_sequence(&boot, out);
    }

    fn play_sequence(&self, sequence: &ScriptedSequence, out: &mut dyn Output) {
        if !self.interactive {
            for step in &sequence.steps {
                out.text(&step.text);
            }
            return;
        }

        let cancel = CancellationToken::new();
        let finished = self.runtime.block_on(interruptible(
            play(sequence, &cancel, |line| out.text(line)),
            &cancel,
        ));
        if !finished {
            out.text("^C");
        }
    }

    fn chat(&self, message: &str, mode: ChatMode, out: &mut dyn Output) {
        let cancel = CancellationToken::new();
        let (pacing, interval) = if self.interactive {
            (self.config.pacing.clone(), self.config.tick_interval())
        } else {
            (BacklogPacing::constant(usize::MAX), Duration::from_millis(1))
        };

        let reply = relay(
            self.backend.as_ref(),
            message,
            mode,
            pacing,
            interval,
            &cancel,
            |delta| out.delta(delta),
        );
        let outcome = if self.interactive {
            self.runtime.block_on(interruptible(reply, &cancel))
        } else {
            self.runtime.block_on(reply)
        };

        out.end_reply();
        if let StreamOutcome::Abandoned(_) = outcome {
            out.text("^C");
        }
    }

    /// Handle a meta-command (starts with /).
    fn handle_meta_command(&mut self, cmd: &str) -> MetaResult {
        let parts: Vec<&str> = cmd.split_whitespace().collect();
        let command = parts.first().copied().unwrap_or("");

        match command {
            "/quit" | "/q" | "/exit" => MetaResult::Exit,
            "/help" | "/h" | "/?" => MetaResult::Continue(Some(HELP_TEXT.to_string())),
            "/mode" => MetaResult::Continue(Some(self.mode_command(parts.get(1).copied()))),
            "/history" => MetaResult::Continue(self.history_listing()),
            "/cwd" => MetaResult::Continue(Some(self.session.cwd().to_string())),
            _ => MetaResult::Continue(Some(format!(
                "Unknown command: {}\nType /help or help for available commands.",
                command
            ))),
        }
    }

    /// Try to handle a shell-style command (without leading /).
    /// Returns Some(result) if it was a recognized command, None otherwise.
    fn try_shell_style_command(&mut self, cmd: &str) -> Option<MetaResult> {
        let parts: Vec<&str> = cmd.split_whitespace().collect();
        let command = parts.first().copied().unwrap_or("");

        match command {
            "quit" | "exit" if parts.len() == 1 => Some(MetaResult::Exit),
            "help" if parts.len() == 1 => Some(self.handle_meta_command("/help")),
            "history" if parts.len() == 1 => Some(self.handle_meta_command("/history")),
            "mode" if parts.len() <= 2 => Some(self.handle_meta_command(&format!("/{cmd}"))),
            _ => None,
        }
    }

    fn mode_command(&mut self, arg: Option<&str>) -> String {
        let Some(name) = arg else {
            return format!("mode: {}", self.session.mode());
        };
        match name.parse::<ChatMode>() {
            Ok(mode) => {
                self.session.set_mode(mode);
                format!("mode set to {mode}")
            }
            Err(e) => e.to_string(),
        }
    }

    fn history_listing(&self) -> Option<String> {
        let history = self.session.history();
        if history.is_empty() {
            return Some("(no history)".to_string());
        }
        let lines: Vec<String> = history
            .iter()
            .enumerate()
            .map(|(i, entry)| format!("{:>4}  {entry}", i + 1))
            .collect();
        Some(lines.join("\n"))
    }
}

/// Run `work` until it finishes, cancelling `cancel` on Ctrl-C.
async fn interruptible<F: std::future::Future>(work: F, cancel: &CancellationToken) -> F::Output {
    tokio::pin!(work);
    loop {
        tokio::select! {
            output = &mut work => return output,
            signal = tokio::signal::ctrl_c(), if !cancel.is_cancelled() => {
                if let Err(e) = signal {
                    tracing::warn!("Failed to listen for Ctrl-C: {}", e);
                }
                cancel.cancel();
            }
        }
    }
}

const HELP_TEXT: &str = r#"PHOSPHOR TERMINAL

Meta Commands (use with or without /):
  help, /help, /?        Show this help
  quit, exit, /quit, /q  Exit the terminal
  mode [operator|oracle] Show or switch the relay persona
  history                Show recent input

Slash-only commands:
  /cwd                   Show current working directory

Session:
  clear                  Clear the screen and history
  reboot                 Restart the session

Archive (read-only):
  ls [path]              List a directory
  cd [path]              Change directory (no argument returns home)
  cat <path>...          Print files
  pwd                    Print working directory
  whoami                 Print your handle

Anything else is sent to the relay. Ctrl-C stops a reply mid-stream.
"#;

/// Save REPL history to disk.
fn save_history(rl: &mut Editor<PhosphorHelper, DefaultHistory>, history_path: &std::path::Path) {
    if let Some(parent) = history_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::warn!("Failed to create history directory: {}", e);
        }
    }
    if let Err(e) = rl.save_history(history_path) {
        tracing::warn!("Failed to save history: {}", e);
    }
}

/// Run the REPL.
pub fn run(config: PhosphorConfig) -> Result<()> {
    let editor_config = Config::builder()
        .max_history_size(config.history_limit.max(1))
        .context("Invalid history size")?
        .completion_type(CompletionType::List)
        .auto_add_history(false)
        .build();
    let boot_animation = config.boot_animation;

    let mut repl = Repl::with_config(config)?.interactive(true);
    let mut out = TerminalOutput::stdout();
    let styled = out.styled();

    let mut rl: Editor<PhosphorHelper, DefaultHistory> =
        Editor::with_config(editor_config).context("Failed to create editor")?;
    rl.set_helper(Some(PhosphorHelper::new(
        Arc::clone(repl.session().fs()),
        repl.session().cwd().clone(),
    )));

    // Load history if it exists
    let history_path = paths::history_file();
    if let Err(e) = rl.load_history(&history_path) {
        // Only log if it's not a "file not found" error (expected on first run)
        let is_not_found = matches!(&e, ReadlineError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound);
        if !is_not_found {
            tracing::warn!("Failed to load history: {}", e);
        }
    }

    if boot_animation {
        repl.boot(&mut out);
    }
    out.text("Type help for commands, quit to exit.");

    loop {
        let prompt = format::prompt(repl.session(), styled);

        match rl.readline(&prompt) {
            Ok(line) => {
                if let Err(e) = rl.add_history_entry(line.as_str()) {
                    tracing::warn!("Failed to add history entry: {}", e);
                }

                match repl.process_line_with(&line, &mut out) {
                    Ok(()) => {}
                    Err(e) if e.is::<ExitRequested>() => break,
                    Err(e) => eprintln!("Error: {:#}", e),
                }

                if let Some(helper) = rl.helper_mut() {
                    helper.set_cwd(repl.session().cwd().clone());
                }
                // Keep line-editor recall in step with the session history
                if repl.take_reset().is_some()
                    && let Err(e) = rl.clear_history()
                {
                    tracing::warn!("Failed to clear history: {}", e);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }
    }

    save_history(&mut rl, &history_path);

    Ok(())
}
