//! Output formatting for the REPL.
//!
//! - **Interactive** → columns, colors, markdown-lite, typewriter reveal
//! - **Piped** → plain text exactly as the kernel produced it

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use phosphor_kernel::{DirEntry, EntryKind, FsOutput, Session};

/// Where REPL output goes.
///
/// `text` is a complete block; `delta` is a piece of a streamed reply,
/// closed by `end_reply`.
pub trait Output {
    fn text(&mut self, text: &str);

    /// Output of a filesystem verb. Empty output (like `cd`) prints nothing.
    fn fs(&mut self, output: &FsOutput) {
        if !output.output.is_empty() {
            self.text(&output.output);
        }
    }

    fn delta(&mut self, delta: &str);

    fn end_reply(&mut self);

    fn clear_screen(&mut self) {}
}

/// Collects output as plain text. Used by `-c` and tests.
#[derive(Debug, Default)]
pub struct Collected {
    buf: String,
}

impl Collected {
    pub fn into_string(self) -> String {
        self.buf
    }
}

impl Output for Collected {
    fn text(&mut self, text: &str) {
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    fn delta(&mut self, delta: &str) {
        self.buf.push_str(delta);
    }

    fn end_reply(&mut self) {
        if !self.buf.is_empty() && !self.buf.ends_with('\n') {
            self.buf.push('\n');
        }
    }
}

/// Writes to the terminal, styled when the terminal allows it.
pub struct TerminalOutput<W: Write> {
    typewriter: Typewriter<W>,
    styled: bool,
}

impl TerminalOutput<io::Stdout> {
    pub fn stdout() -> Self {
        let styled = styling_enabled();
        Self {
            typewriter: Typewriter::new(io::stdout(), styled),
            styled,
        }
    }
}

impl<W: Write> TerminalOutput<W> {
    pub fn styled(&self) -> bool {
        self.styled
    }

    fn write(&mut self, text: &str) {
        let out = self.typewriter.writer();
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
            tracing::warn!("Failed to write output: {}", e);
        }
    }
}

impl<W: Write> Output for TerminalOutput<W> {
    fn text(&mut self, text: &str) {
        self.write(&format!("{text}\n"));
    }

    fn fs(&mut self, output: &FsOutput) {
        let formatted = format_fs_output(output, self.styled);
        if !formatted.is_empty() {
            self.text(&formatted);
        }
    }

    fn delta(&mut self, delta: &str) {
        if let Err(e) = self.typewriter.push(delta) {
            tracing::warn!("Failed to write reply: {}", e);
        }
    }

    fn end_reply(&mut self) {
        if let Err(e) = self.typewriter.finish() {
            tracing::warn!("Failed to finish reply: {}", e);
        }
    }

    fn clear_screen(&mut self) {
        self.write("\x1b[2J\x1b[H");
    }
}

/// Whether stdout should get ANSI styling.
///
/// Off for `NO_COLOR`, `TERM=dumb`, or when stdout is not a terminal.
pub fn styling_enabled() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
        return false;
    }
    io::stdout().is_terminal()
}

/// Render a filesystem result for display.
pub fn format_fs_output(output: &FsOutput, styled: bool) -> String {
    if !styled {
        return output.output.clone();
    }
    if !output.ok {
        return output.output.red().to_string();
    }
    match &output.listing {
        Some(entries) => {
            let term_width = terminal_size::terminal_size()
                .map(|(w, _)| w.0 as usize)
                .unwrap_or(80);
            format_columns(entries, term_width, styled)
        }
        None => output.output.clone(),
    }
}

/// Lay entries out in columns like `ls` does.
pub fn format_columns(entries: &[DirEntry], term_width: usize, styled: bool) -> String {
    let names: Vec<String> = entries.iter().map(DirEntry::display_name).collect();
    let Some(max_len) = names.iter().map(|n| n.chars().count()).max() else {
        return String::new();
    };
    let col_width = max_len + 2;
    let num_cols = (term_width / col_width).max(1);

    let mut output = String::new();
    for (i, (entry, name)) in entries.iter().zip(&names).enumerate() {
        if i > 0 {
            if i % num_cols == 0 {
                output.push('\n');
            } else {
                let prev_len = names[i - 1].chars().count();
                output.push_str(&" ".repeat(col_width - prev_len));
            }
        }
        output.push_str(&colorize_entry(name, entry.kind, styled));
    }
    output
}

fn colorize_entry(name: &str, kind: EntryKind, styled: bool) -> String {
    match kind {
        EntryKind::Directory if styled => name.blue().bold().to_string(),
        _ => name.to_string(),
    }
}

/// Style one line of chat output.
///
/// Handles `# heading`, `- bullet`, `**bold**` and `` `code` ``. Unmatched
/// markers are left as typed.
pub fn render_markdown_lite(line: &str) -> String {
    if let Some(heading) = line.strip_prefix("# ") {
        return heading.bold().underline().to_string();
    }
    if let Some(item) = line.strip_prefix("- ") {
        return format!("  {} {}", "•".green(), render_inline(item));
    }
    render_inline(line)
}

fn render_inline(text: &str) -> String {
    let mut out = String::new();
    let mut rest = text;
    loop {
        let bold = rest.find("**");
        let code = rest.find('`');
        let (start, marker) = match (bold, code) {
            (Some(b), Some(c)) if c < b => (c, "`"),
            (Some(b), _) => (b, "**"),
            (None, Some(c)) => (c, "`"),
            (None, None) => break,
        };
        let after = &rest[start + marker.len()..];
        let Some(end) = after.find(marker) else {
            // Unpaired: keep the marker as typed and scan on past it.
            out.push_str(&rest[..start + marker.len()]);
            rest = after;
            continue;
        };
        out.push_str(&rest[..start]);
        let inner = &after[..end];
        if marker == "`" {
            out.push_str(&inner.cyan().to_string());
        } else {
            out.push_str(&inner.bold().to_string());
        }
        rest = &after[end + marker.len()..];
    }
    out.push_str(rest);
    out
}

/// Prints streamed text as it arrives, then restyles each line once it is
/// complete.
///
/// Raw characters go out immediately so the reveal cadence is visible.
/// When a line ends, a styled writer redraws it in place with markdown-lite
/// applied. Lines wider than the terminal are left raw, since they have
/// already wrapped.
pub struct Typewriter<W: Write> {
    out: W,
    line: String,
    styled: bool,
}

impl<W: Write> Typewriter<W> {
    pub fn new(out: W, styled: bool) -> Self {
        Self {
            out,
            line: String::new(),
            styled,
        }
    }

    pub fn push(&mut self, delta: &str) -> io::Result<()> {
        for c in delta.chars() {
            if c == '\n' {
                self.restyle_line()?;
                self.out.write_all(b"\n")?;
                self.line.clear();
            } else {
                let mut buf = [0; 4];
                self.out.write_all(c.encode_utf8(&mut buf).as_bytes())?;
                self.line.push(c);
            }
        }
        self.out.flush()
    }

    /// End the reply, terminating the last line.
    pub fn finish(&mut self) -> io::Result<()> {
        if !self.line.is_empty() {
            self.restyle_line()?;
            self.out.write_all(b"\n")?;
            self.line.clear();
        }
        self.out.flush()
    }

    fn restyle_line(&mut self) -> io::Result<()> {
        if !self.styled || self.line.is_empty() {
            return Ok(());
        }
        let width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80);
        if self.line.chars().count() >= width {
            return Ok(());
        }
        write!(self.out, "\r\x1b[2K{}", render_markdown_lite(&self.line))
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// `[HH:MM:SS] user@host:~/docs$ `
pub fn prompt(session: &Session, styled: bool) -> String {
    let clock = chrono::Local::now().format("[%H:%M:%S]").to_string();
    let location = format!("{}@{}:{}$", session.user(), session.host(), session.prompt_path());
    if styled {
        format!("{} {} ", clock.dimmed(), location.green().bold())
    } else {
        format!("{clock} {location} ")
    }
}
