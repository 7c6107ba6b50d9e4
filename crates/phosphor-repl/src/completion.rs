//! Tab completion against the virtual filesystem.

use std::sync::Arc;

use phosphor_kernel::{VERBS, VfsPath, VirtualFs};
use rustyline::completion::{Completer, Pair};
use rustyline::{Context, Helper, Highlighter, Hinter, Validator};

/// Words completed in command position besides the filesystem verbs.
const COMMAND_WORDS: [&str; 7] = ["clear", "exit", "help", "history", "mode", "quit", "reboot"];

/// Line-editor helper that completes command words and paths.
///
/// The first word completes against the known commands; later words
/// complete as paths relative to the session's working directory, so
/// the REPL must call [`set_cwd`](Self::set_cwd) after every `cd`.
#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct PhosphorHelper {
    fs: Arc<VirtualFs>,
    cwd: VfsPath,
}

impl PhosphorHelper {
    pub fn new(fs: Arc<VirtualFs>, cwd: VfsPath) -> Self {
        Self { fs, cwd }
    }

    pub fn set_cwd(&mut self, cwd: VfsPath) {
        self.cwd = cwd;
    }

    /// Start of the replaced span and its replacements.
    ///
    /// A unique match completes fully (directories gain a trailing `/`).
    /// Several matches sharing a longer prefix complete to that prefix;
    /// otherwise every match is offered for listing.
    pub fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<String>) {
        let before = &line[..pos];
        let start = before
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map_or(0, |(i, c)| i + c.len_utf8());
        let word = &before[start..];

        if before[..start].trim().is_empty() {
            return (start, complete_command(word));
        }

        let (dir_part, partial) = match word.rfind('/') {
            Some(slash) => word.split_at(slash + 1),
            None => ("", word),
        };
        let dir = if dir_part.is_empty() {
            self.cwd.clone()
        } else {
            match self.fs.resolve_path(&self.cwd, dir_part) {
                Ok(dir) => dir,
                Err(_) => return (pos, Vec::new()),
            }
        };

        let completion = self.fs.complete_word(partial, &dir);
        let replacements = if let Some(only) = completion.unique() {
            let is_dir = self.fs.node(&dir.join(only)).is_some_and(|n| n.is_dir());
            vec![if is_dir { format!("{only}/") } else { only.to_string() }]
        } else if let Some(prefix) = completion.common_prefix() {
            vec![prefix]
        } else {
            completion.matches
        };
        (start + dir_part.len(), replacements)
    }
}

fn complete_command(word: &str) -> Vec<String> {
    let mut words: Vec<&str> = VERBS.iter().chain(COMMAND_WORDS.iter()).copied().collect();
    words.sort_unstable();
    words
        .into_iter()
        .filter(|w| w.starts_with(word))
        .map(str::to_string)
        .collect()
}

impl Completer for PhosphorHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, replacements) = self.candidates(line, pos);
        let pairs = replacements
            .into_iter()
            .map(|r| Pair {
                display: r.clone(),
                replacement: r,
            })
            .collect();
        Ok((start, pairs))
    }
}
