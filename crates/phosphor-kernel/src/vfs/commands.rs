//! Shell verbs over the virtual filesystem: `ls`, `cd`, `cat`, `pwd`, `whoami`.
//!
//! Failures never cross this boundary as errors. They come back as a single
//! rendered line in `FsOutput::output` with `ok == false`, so callers only
//! need to tell "not a filesystem command" (`None`) from "ran, here is the
//! text" (`Some`).

use phosphor_types::{DirEntry, FsError, VfsPath};

use super::fs::VirtualFs;

/// Verbs `execute` recognizes.
pub const VERBS: [&str; 5] = ["ls", "cd", "cat", "pwd", "whoami"];

/// Output of a filesystem command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsOutput {
    /// Rendered text.
    pub output: String,
    /// New working directory after a successful `cd`.
    pub new_path: Option<VfsPath>,
    /// Structured entries for `ls`, so front-ends can style directories.
    pub listing: Option<Vec<DirEntry>>,
    /// False when `output` is an error line.
    pub ok: bool,
}

impl FsOutput {
    pub fn text(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            new_path: None,
            listing: None,
            ok: true,
        }
    }

    pub fn failure(verb: &str, err: impl std::fmt::Display) -> Self {
        Self {
            output: format!("{verb}: {err}"),
            new_path: None,
            listing: None,
            ok: false,
        }
    }

    fn listing(entries: Vec<DirEntry>) -> Self {
        let output = entries
            .iter()
            .map(DirEntry::display_name)
            .collect::<Vec<_>>()
            .join("  ");
        Self {
            output,
            new_path: None,
            listing: Some(entries),
            ok: true,
        }
    }

    fn moved(path: VfsPath) -> Self {
        Self {
            output: String::new(),
            new_path: Some(path),
            listing: None,
            ok: true,
        }
    }
}

impl VirtualFs {
    /// Run a filesystem command line with `current` as the working directory.
    ///
    /// Returns `None` when the first word is not one of [`VERBS`], telling
    /// the caller to route the input elsewhere.
    pub fn execute(&self, command_line: &str, current: &VfsPath) -> Option<FsOutput> {
        let mut words = command_line.split_whitespace();
        let verb = words.next()?;
        let args: Vec<&str> = words.collect();

        let output = match verb {
            "ls" => self.ls(current, &args),
            "cd" => self.cd(current, &args),
            "cat" => self.cat(current, &args),
            "pwd" => FsOutput::text(current.to_string()),
            "whoami" => FsOutput::text(self.user()),
            _ => return None,
        };
        tracing::debug!(verb, ok = output.ok, "filesystem command");
        Some(output)
    }

    fn ls(&self, current: &VfsPath, args: &[&str]) -> FsOutput {
        let target = args.first().copied().unwrap_or(".");
        let listed = self
            .resolve_path(current, target)
            .and_then(|path| self.list(&path));
        match listed {
            Ok(entries) => FsOutput::listing(entries),
            Err(err) => FsOutput::failure("ls", err),
        }
    }

    fn cd(&self, current: &VfsPath, args: &[&str]) -> FsOutput {
        let target = match args {
            [] => return FsOutput::moved(self.home().clone()),
            [one] => *one,
            _ => return FsOutput::failure("cd", "too many arguments"),
        };
        let path = match self.resolve_path(current, target) {
            Ok(path) => path,
            Err(err) => return FsOutput::failure("cd", err),
        };
        match self.node(&path) {
            Some(node) if node.is_dir() => FsOutput::moved(path),
            _ => FsOutput::failure("cd", FsError::NotADirectory(target.to_string())),
        }
    }

    fn cat(&self, current: &VfsPath, args: &[&str]) -> FsOutput {
        if args.is_empty() {
            return FsOutput::failure("cat", "missing operand");
        }
        let mut contents = Vec::with_capacity(args.len());
        for target in args {
            let read = self.resolve_path(current, target).and_then(|path| {
                self.read(&path)
                    .map_err(|_| FsError::IsADirectory(target.to_string()))
            });
            match read {
                Ok(content) => contents.push(content),
                Err(err) => return FsOutput::failure("cat", err),
            }
        }
        FsOutput::text(contents.join("\n"))
    }
}
