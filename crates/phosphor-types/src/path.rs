//! Absolute, normalized paths into the virtual filesystem.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An absolute path in the virtual filesystem.
///
/// Stored as a list of segments, so the normalized form holds by construction:
/// no empty segments, no `.` or `..`, and no trailing slash except for the
/// root, which renders as `/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct VfsPath {
    segments: Vec<String>,
}

impl VfsPath {
    /// The root directory.
    pub fn root() -> Self {
        Self::default()
    }

    /// Lexically normalize a path string.
    ///
    /// Relative input is treated as relative to the root. `..` at the root
    /// stays at the root. This never consults a tree; use
    /// `VirtualFs::resolve_path` to resolve against real nodes.
    pub fn parse(s: &str) -> Self {
        let mut path = Self::root();
        for segment in s.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    path.pop();
                }
                name => path.segments.push(name.to_string()),
            }
        }
        path
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Last segment, or `None` for the root.
    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Append a single segment.
    pub fn push(&mut self, name: impl Into<String>) {
        self.segments.push(name.into());
    }

    /// Drop the last segment. Returns false (and stays put) at the root.
    pub fn pop(&mut self) -> bool {
        self.segments.pop().is_some()
    }

    pub fn join(&self, name: impl Into<String>) -> Self {
        let mut joined = self.clone();
        joined.push(name);
        joined
    }

    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        let mut parent = self.clone();
        parent.pop();
        Some(parent)
    }

    /// True if `base` is this path or one of its ancestors.
    pub fn starts_with(&self, base: &VfsPath) -> bool {
        self.segments.starts_with(&base.segments)
    }

    /// Segments below `base`, if `base` is an ancestor (or equal).
    pub fn strip_prefix(&self, base: &VfsPath) -> Option<&[String]> {
        self.segments.strip_prefix(base.segments.as_slice())
    }

    /// Render relative to `home`, abbreviating it as `~`.
    pub fn display_from_home(&self, home: &VfsPath) -> String {
        if home.is_root() {
            return self.to_string();
        }
        match self.strip_prefix(home) {
            Some([]) => "~".to_string(),
            Some(rest) => format!("~/{}", rest.join("/")),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for VfsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for VfsPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for VfsPath {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<&str> for VfsPath {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<VfsPath> for String {
    fn from(path: VfsPath) -> Self {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::root("/", "/")]
    #[case::empty("", "/")]
    #[case::trailing_slash("/home/operator/", "/home/operator")]
    #[case::double_slash("//home//operator", "/home/operator")]
    #[case::dot("/home/./operator", "/home/operator")]
    #[case::dotdot("/home/operator/../guest", "/home/guest")]
    #[case::dotdot_past_root("/../..", "/")]
    #[case::relative("home/operator", "/home/operator")]
    fn parse_normalizes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(VfsPath::parse(input).to_string(), expected);
    }

    #[test]
    fn root_has_no_parent() {
        assert!(VfsPath::root().parent().is_none());
        assert_eq!(VfsPath::root().file_name(), None);
    }

    #[test]
    fn pop_at_root_is_noop() {
        let mut path = VfsPath::root();
        assert!(!path.pop());
        assert!(path.is_root());
    }

    #[test]
    fn join_and_parent() {
        let home = VfsPath::parse("/home/operator");
        let docs = home.join("docs");
        assert_eq!(docs.to_string(), "/home/operator/docs");
        assert_eq!(docs.parent(), Some(home.clone()));
        assert_eq!(docs.file_name(), Some("docs"));
        assert!(docs.starts_with(&home));
        assert!(!home.starts_with(&docs));
    }

    #[rstest]
    #[case::at_home("/home/operator", "~")]
    #[case::below_home("/home/operator/docs/logs", "~/docs/logs")]
    #[case::outside_home("/etc", "/etc")]
    #[case::sibling_prefix("/home/operator2", "/home/operator2")]
    fn display_from_home(#[case] path: &str, #[case] expected: &str) {
        let home = VfsPath::parse("/home/operator");
        assert_eq!(VfsPath::parse(path).display_from_home(&home), expected);
    }

    #[test]
    fn display_from_root_home_is_absolute() {
        let path = VfsPath::parse("/etc/motd");
        assert_eq!(path.display_from_home(&VfsPath::root()), "/etc/motd");
    }
}
