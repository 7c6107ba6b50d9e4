//! Input classification and per-session state.
//!
//! Every line goes through [`Session::route`], which tries, in order:
//!
//! 1. reset commands (`clear`, `reboot`)
//! 2. scripted sequences (Easter eggs)
//! 3. virtual filesystem verbs
//! 4. the remote chat call
//!
//! The first match wins. Routing never blocks: scripts and chat replies are
//! returned as data for the caller to play or stream.

use std::sync::Arc;

use phosphor_types::{ChatMode, VfsPath};

use crate::config::PhosphorConfig;
use crate::history::CommandHistory;
use crate::script::{ScriptCatalog, ScriptedSequence, boot_sequence};
use crate::vfs::{Completion, FsOutput, VirtualFs, fixture};

/// Which reset the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetKind {
    /// Wipe the screen and the recall history.
    Clear,
    /// Back to a fresh session: home directory, empty history, default
    /// mode, then the boot sequence.
    Reboot,
}

impl ResetKind {
    fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "clear" => Some(ResetKind::Clear),
            "reboot" => Some(ResetKind::Reboot),
            _ => None,
        }
    }
}

/// How an input was classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Blank input. Nothing to do.
    Empty,
    /// Session state has already been reset.
    Reset(ResetKind),
    /// Play this sequence.
    Script(ScriptedSequence),
    /// A filesystem verb ran; the cwd has already moved if it was a `cd`.
    Filesystem(FsOutput),
    /// Forward to the chat backend.
    Chat { message: String, mode: ChatMode },
}

/// One user's terminal session.
///
/// Owns the working directory, the recall history and the active chat
/// mode. The filesystem is shared and never changes.
#[derive(Debug, Clone)]
pub struct Session {
    fs: Arc<VirtualFs>,
    cwd: VfsPath,
    history: CommandHistory,
    mode: ChatMode,
    default_mode: ChatMode,
    scripts: ScriptCatalog,
    host: String,
}

impl Session {
    /// A session starting in the home directory of `fs`, with the built-in
    /// Easter eggs.
    pub fn new(fs: Arc<VirtualFs>) -> Self {
        let scripts = ScriptCatalog::builtin(fs.user());
        Self {
            cwd: fs.home().clone(),
            fs,
            history: CommandHistory::default(),
            mode: ChatMode::default(),
            default_mode: ChatMode::default(),
            scripts,
            host: "phosphor".to_string(),
        }
    }

    /// Build the default tree and session for `config`.
    pub fn from_config(config: &PhosphorConfig) -> Self {
        let tree = fixture::default_tree(&config.home, &config.user, &config.host);
        let fs = VirtualFs::new(tree, config.home.clone(), config.user.clone())
            .with_match_case(config.completion_case);

        Self::new(Arc::new(fs))
            .with_host(config.host.clone())
            .with_history(CommandHistory::new(config.history_limit))
            .with_default_mode(config.default_mode)
            .with_scripts(ScriptCatalog::builtin(&config.user).with_overrides(config.scripts.clone()))
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_history(mut self, history: CommandHistory) -> Self {
        self.history = history;
        self
    }

    /// Set the mode used at start and after `reboot`.
    pub fn with_default_mode(mut self, mode: ChatMode) -> Self {
        self.default_mode = mode;
        self.mode = mode;
        self
    }

    pub fn with_scripts(mut self, scripts: ScriptCatalog) -> Self {
        self.scripts = scripts;
        self
    }

    /// Classify `input` and apply its effect on session state.
    pub fn route(&mut self, input: &str) -> Route {
        if input.trim().is_empty() {
            return Route::Empty;
        }
        self.history.push(input);

        if let Some(kind) = ResetKind::parse(input) {
            tracing::debug!(?kind, "reset");
            self.reset(kind);
            return Route::Reset(kind);
        }

        if let Some(sequence) = self.scripts.find(input) {
            tracing::debug!(name = %sequence.name, "scripted sequence");
            return Route::Script(sequence.clone());
        }

        if let Some(output) = self.fs.execute(input, &self.cwd) {
            if let Some(path) = &output.new_path {
                self.cwd = path.clone();
            }
            return Route::Filesystem(output);
        }

        tracing::debug!(mode = %self.mode, "chat");
        Route::Chat {
            message: input.to_string(),
            mode: self.mode,
        }
    }

    /// Apply a reset without routing an input.
    pub fn reset(&mut self, kind: ResetKind) {
        self.history.clear();
        if kind == ResetKind::Reboot {
            self.cwd = self.fs.home().clone();
            self.mode = self.default_mode;
        }
    }

    /// Boot lines for this session's user and host.
    pub fn boot_sequence(&self) -> ScriptedSequence {
        boot_sequence(self.fs.user(), &self.host)
    }

    /// Complete `partial` against the working directory.
    pub fn complete(&self, partial: &str) -> Completion {
        self.fs.complete_word(partial, &self.cwd)
    }

    /// The working directory with home shown as `~`.
    pub fn prompt_path(&self) -> String {
        self.cwd.display_from_home(self.fs.home())
    }

    pub fn fs(&self) -> &Arc<VirtualFs> {
        &self.fs
    }

    pub fn cwd(&self) -> &VfsPath {
        &self.cwd
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut CommandHistory {
        &mut self.history
    }

    pub fn mode(&self) -> ChatMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ChatMode) {
        self.mode = mode;
    }

    pub fn user(&self) -> &str {
        self.fs.user()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn scripts(&self) -> &ScriptCatalog {
        &self.scripts
    }
}
