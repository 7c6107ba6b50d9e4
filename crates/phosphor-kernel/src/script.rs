//! Scripted message sequences: the boot animation and Easter eggs.
//!
//! A sequence is pure data: an ordered list of (text, delay) steps. One
//! generic player replays any of them; there is no per-sequence code.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// How a sequence is matched against user input.
///
/// Matching ignores case, and runs of whitespace compare as one space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    /// Whole input equals this text.
    Exact(String),
    /// Input starts with this text as a whole word.
    Prefix(String),
}

impl Trigger {
    pub fn matches(&self, input: &str) -> bool {
        let input = normalize(input);
        match self {
            Trigger::Exact(text) => input == normalize(text),
            Trigger::Prefix(text) => input
                .strip_prefix(&normalize(text))
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(' ')),
        }
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// One line of a scripted sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub text: String,
    /// Pause before this line is shown.
    #[serde(default)]
    pub delay_ms: u64,
}

impl ScriptStep {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// A named, triggerable list of timed lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedSequence {
    pub name: String,
    pub trigger: Trigger,
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
}

impl ScriptedSequence {
    pub fn new(name: impl Into<String>, trigger: Trigger) -> Self {
        Self {
            name: name.into(),
            trigger,
            steps: Vec::new(),
        }
    }

    /// Append a step shown after `delay_ms`.
    pub fn step(mut self, delay_ms: u64, text: impl Into<String>) -> Self {
        self.steps.push(ScriptStep {
            text: text.into(),
            delay_ms,
        });
        self
    }

    pub fn total_delay(&self) -> Duration {
        self.steps.iter().map(ScriptStep::delay).sum()
    }
}

/// Ordered set of sequences; the first whose trigger matches wins.
#[derive(Debug, Clone, Default)]
pub struct ScriptCatalog {
    sequences: Vec<ScriptedSequence>,
}

impl ScriptCatalog {
    pub fn new(sequences: Vec<ScriptedSequence>) -> Self {
        Self { sequences }
    }

    /// Built-in Easter eggs, addressed to `user`.
    pub fn builtin(user: &str) -> Self {
        Self::new(vec![
            ScriptedSequence::new("sudo", Trigger::Prefix("sudo".into()))
                .step(0, format!("[sudo] password for {user}: ********"))
                .step(900, "Verifying clearance...")
                .step(1200, format!("{user} is not in the sudoers file."))
                .step(400, "This incident will be reported."),
            ScriptedSequence::new("hack", Trigger::Exact("hack the planet".into()))
                .step(0, "INITIATING OVERRIDE")
                .step(300, "bypassing firewall .......... ok")
                .step(300, "rerouting power to the mainframe ... ok")
                .step(300, "decrypting gibson ........... ok")
                .step(700, "ACCESS GRANTED")
                .step(1200, "(just kidding. this terminal is read-only.)"),
            ScriptedSequence::new("sandwich", Trigger::Exact("make me a sandwich".into()))
                .step(0, "What? Make it yourself."),
            ScriptedSequence::new("xyzzy", Trigger::Exact("xyzzy".into()))
                .step(0, "A hollow voice says \"Fool.\""),
        ])
    }

    /// Put `sequences` ahead of the existing ones so they match first.
    pub fn with_overrides(mut self, sequences: Vec<ScriptedSequence>) -> Self {
        let mut merged = sequences;
        merged.append(&mut self.sequences);
        self.sequences = merged;
        self
    }

    pub fn find(&self, input: &str) -> Option<&ScriptedSequence> {
        self.sequences.iter().find(|s| s.trigger.matches(input))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScriptedSequence> {
        self.sequences.iter()
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

/// The boot animation shown at startup and on `reboot`.
pub fn boot_sequence(user: &str, host: &str) -> ScriptedSequence {
    ScriptedSequence::new("boot", Trigger::Exact("reboot".into()))
        .step(0, format!("PHOSPHOR BIOS v{}", env!("CARGO_PKG_VERSION")))
        .step(150, "memory check ........ 640K ok")
        .step(150, "mounting archive .... read-only")
        .step(200, "relay link .......... established")
        .step(250, format!("{host} ready. welcome, {user}."))
}

/// Replay `sequence`, waiting each step's delay before handing its text to
/// `sink`.
///
/// Returns false if `cancel` fired before the last step.
pub async fn play<F>(sequence: &ScriptedSequence, cancel: &CancellationToken, mut sink: F) -> bool
where
    F: FnMut(&str),
{
    tracing::debug!(name = %sequence.name, steps = sequence.steps.len(), "playing sequence");
    for step in &sequence.steps {
        if !step.delay().is_zero() {
            tokio::select! {
                _ = cancel.cancelled() => return false,
                _ = tokio::time::sleep(step.delay()) => {}
            }
        }
        if cancel.is_cancelled() {
            return false;
        }
        sink(&step.text);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triggers_ignore_case_and_padding() {
        assert!(Trigger::Exact("xyzzy".into()).matches("  XYZZY "));
        assert!(!Trigger::Exact("xyzzy".into()).matches("xyzzy now"));
        assert!(Trigger::Prefix("sudo".into()).matches("sudo rm -rf /"));
        assert!(Trigger::Prefix("sudo".into()).matches("SUDO"));
        assert!(!Trigger::Prefix("sudo".into()).matches("pseudo"));
        assert!(!Trigger::Prefix("sudo".into()).matches("sudoku"));
    }

    #[test]
    fn triggers_collapse_inner_whitespace() {
        let hack = Trigger::Exact("hack the planet".into());
        assert!(hack.matches("hack  the planet"));
        assert!(hack.matches("Hack\tthe   PLANET "));
        assert!(!hack.matches("hack theplanet"));
        assert!(Trigger::Prefix("sudo make".into()).matches("sudo   make   me a sandwich"));
    }

    #[test]
    fn builtin_sudo_names_the_user() {
        let catalog = ScriptCatalog::builtin("trinity");
        let sudo = catalog.find("sudo ls").map(|s| s.steps.clone()).unwrap_or_default();
        assert_eq!(sudo[0].text, "[sudo] password for trinity: ********");
        assert_eq!(sudo[2].text, "trinity is not in the sudoers file.");
        assert!(sudo.iter().all(|step| !step.text.contains("operator")));
    }

    #[test]
    fn catalog_first_match_wins() {
        let catalog = ScriptCatalog::builtin("operator").with_overrides(vec![
            ScriptedSequence::new("custom-sudo", Trigger::Prefix("sudo make".into()))
                .step(0, "okay."),
        ]);
        assert_eq!(catalog.find("sudo make me a sandwich").map(|s| s.name.as_str()), Some("custom-sudo"));
        assert_eq!(catalog.find("sudo ls").map(|s| s.name.as_str()), Some("sudo"));
        assert!(catalog.find("hello").is_none());
    }

    #[test]
    fn total_delay_sums_steps() {
        let seq = ScriptedSequence::new("t", Trigger::Exact("t".into()))
            .step(0, "a")
            .step(250, "b")
            .step(750, "c");
        assert_eq!(seq.total_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn boot_sequence_greets_user() {
        let boot = boot_sequence("neo", "zion");
        let last = boot.steps.last().map(|s| s.text.as_str());
        assert_eq!(last, Some("zion ready. welcome, neo."));
    }

    #[tokio::test(start_paused = true)]
    async fn play_emits_in_order_after_delays() {
        let seq = ScriptedSequence::new("t", Trigger::Exact("t".into()))
            .step(0, "first")
            .step(500, "second");
        let start = tokio::time::Instant::now();
        let mut lines = Vec::new();
        let done = play(&seq, &CancellationToken::new(), |line| lines.push(line.to_string())).await;

        assert!(done);
        assert_eq!(lines, ["first", "second"]);
        assert!(start.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn play_stops_when_cancelled() {
        let seq = ScriptedSequence::new("t", Trigger::Exact("t".into()))
            .step(0, "first")
            .step(500, "second");
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let mut lines = Vec::new();
        let done = play(&seq, &cancel, |line| {
            lines.push(line.to_string());
            trigger.cancel();
        })
        .await;

        assert!(!done);
        assert_eq!(lines, ["first"]);
    }

    #[test]
    fn sequences_deserialize_from_toml() {
        let seq: ScriptedSequence = toml::from_str(
            r#"
name = "ping"
trigger = { exact = "ping" }
steps = [
    { text = "pong" },
    { text = "pong again", delay_ms = 200 },
]
"#,
        )
        .unwrap();
        assert_eq!(seq.trigger, Trigger::Exact("ping".into()));
        assert_eq!(seq.steps[1].delay(), Duration::from_millis(200));
        assert_eq!(seq.steps[0].delay_ms, 0);
    }
}
