//! The read-only virtual filesystem: resolution, listing, reads, completion.

use phosphor_types::{DirEntry, FsError, FsResult, VfsPath};
use serde::{Deserialize, Serialize};

use super::node::Node;

/// Case policy for prefix completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchCase {
    /// `Re` does not match `readme.txt`.
    #[default]
    Sensitive,
    /// `Re` matches `readme.txt` and `README`.
    Insensitive,
}

impl MatchCase {
    fn matches(&self, name: &str, prefix: &str) -> bool {
        match self {
            MatchCase::Sensitive => name.starts_with(prefix),
            MatchCase::Insensitive => name.to_lowercase().starts_with(&prefix.to_lowercase()),
        }
    }

    fn chars_eq(&self, a: char, b: char) -> bool {
        match self {
            MatchCase::Sensitive => a == b,
            MatchCase::Insensitive => a.to_lowercase().eq(b.to_lowercase()),
        }
    }
}

/// Result of completing one word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// The word being completed.
    pub partial: String,
    /// Matching child names in listing order.
    pub matches: Vec<String>,
    case: MatchCase,
}

impl Completion {
    /// The single match, if exactly one child matched.
    pub fn unique(&self) -> Option<&str> {
        match self.matches.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Longest prefix shared by all matches, when it extends the partial.
    ///
    /// With one match this is the match itself.
    pub fn common_prefix(&self) -> Option<String> {
        let (first, rest) = self.matches.split_first()?;
        let mut len = first.chars().count();
        for other in rest {
            let shared = first
                .chars()
                .zip(other.chars())
                .take_while(|(a, b)| self.case.chars_eq(*a, *b))
                .count();
            len = len.min(shared);
        }
        let prefix: String = first.chars().take(len).collect();
        (prefix.chars().count() > self.partial.chars().count()).then_some(prefix)
    }
}

/// An immutable in-memory directory tree.
///
/// Built once at startup and shared read-only; no operation mutates it.
#[derive(Debug, Clone)]
pub struct VirtualFs {
    root: Node,
    home: VfsPath,
    user: String,
    case: MatchCase,
}

impl VirtualFs {
    /// Wrap a tree. `root` is the unnamed root directory.
    pub fn new(root: Node, home: VfsPath, user: impl Into<String>) -> Self {
        Self {
            root,
            home,
            user: user.into(),
            case: MatchCase::default(),
        }
    }

    pub fn with_match_case(mut self, case: MatchCase) -> Self {
        self.case = case;
        self
    }

    pub fn home(&self) -> &VfsPath {
        &self.home
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn match_case(&self) -> MatchCase {
        self.case
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Look up the node at an absolute path.
    pub fn node(&self, path: &VfsPath) -> Option<&Node> {
        path.segments()
            .iter()
            .try_fold(&self.root, |node, segment| node.child(segment))
    }

    /// Resolve `argument` against `current`.
    ///
    /// Handles `.`, `..`, absolute paths, and a leading `~` for the home
    /// directory. `..` at the root stays at the root. Naming a missing child
    /// fails with `NotFound`; continuing past a file fails with
    /// `NotADirectory`. Errors carry `argument` as typed.
    pub fn resolve_path(&self, current: &VfsPath, argument: &str) -> FsResult<VfsPath> {
        let (mut path, rest) = self.anchor(current, argument);
        let mut node = self
            .node(&path)
            .ok_or_else(|| FsError::NotFound(path.to_string()))?;

        for segment in rest.split('/') {
            if !node.is_dir() {
                return Err(FsError::NotADirectory(argument.to_string()));
            }
            match segment {
                "" | "." => {}
                ".." => {
                    path.pop();
                    node = self
                        .node(&path)
                        .ok_or_else(|| FsError::NotFound(argument.to_string()))?;
                }
                name => {
                    node = node
                        .child(name)
                        .ok_or_else(|| FsError::NotFound(argument.to_string()))?;
                    path.push(name);
                }
            }
        }
        Ok(path)
    }

    fn anchor<'a>(&self, current: &VfsPath, argument: &'a str) -> (VfsPath, &'a str) {
        if let Some(rest) = argument.strip_prefix('/') {
            (VfsPath::root(), rest)
        } else if argument == "~" {
            (self.home.clone(), "")
        } else if let Some(rest) = argument.strip_prefix("~/") {
            (self.home.clone(), rest)
        } else {
            (current.clone(), argument)
        }
    }

    /// Entries of the directory at `path`, in insertion order.
    ///
    /// A file lists as itself, like `ls file`.
    pub fn list(&self, path: &VfsPath) -> FsResult<Vec<DirEntry>> {
        let node = self
            .node(path)
            .ok_or_else(|| FsError::NotFound(path.to_string()))?;
        if node.is_file() {
            return Ok(vec![node.entry()]);
        }
        Ok(node.children().iter().map(Node::entry).collect())
    }

    /// Content of the file at `path`.
    pub fn read(&self, path: &VfsPath) -> FsResult<&str> {
        let node = self
            .node(path)
            .ok_or_else(|| FsError::NotFound(path.to_string()))?;
        node.content()
            .ok_or_else(|| FsError::IsADirectory(path.to_string()))
    }

    /// Names of children of `current` that start with `partial`.
    ///
    /// Insertion order; empty when nothing matches or `current` is not a
    /// directory. Callers treat exactly one match as "auto-complete".
    pub fn complete(&self, partial: &str, current: &VfsPath) -> Vec<String> {
        let Some(dir) = self.node(current) else {
            return Vec::new();
        };
        dir.children()
            .iter()
            .filter(|c| self.case.matches(c.name(), partial))
            .map(|c| c.name().to_string())
            .collect()
    }

    /// Like `complete`, with helpers for unique and common-prefix matches.
    pub fn complete_word(&self, partial: &str, current: &VfsPath) -> Completion {
        Completion {
            partial: partial.to_string(),
            matches: self.complete(partial, current),
            case: self.case,
        }
    }

    /// Every path in the tree with its node, depth-first, root first.
    pub fn walk(&self) -> Vec<(VfsPath, &Node)> {
        let mut out = Vec::new();
        let mut stack = vec![(VfsPath::root(), &self.root)];
        while let Some((path, node)) = stack.pop() {
            for child in node.children().iter().rev() {
                stack.push((path.join(child.name()), child));
            }
            out.push((path, node));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn fixture() -> VirtualFs {
        let root = Node::dir(
            "",
            [
                Node::dir(
                    "home",
                    [Node::dir(
                        "operator",
                        [
                            Node::dir("docs", [Node::file("notes.md", "# notes")]),
                            Node::file("readme.txt", "hello"),
                            Node::file("README.old", "older"),
                        ],
                    )],
                ),
                Node::dir("etc", [Node::file("motd", "welcome")]),
            ],
        );
        VirtualFs::new(root, VfsPath::parse("/home/operator"), "operator")
    }

    fn home() -> VfsPath {
        VfsPath::parse("/home/operator")
    }

    #[rstest]
    #[case::dot(".", "/home/operator")]
    #[case::empty("", "/home/operator")]
    #[case::child("docs", "/home/operator/docs")]
    #[case::child_trailing_slash("docs/", "/home/operator/docs")]
    #[case::parent("..", "/home")]
    #[case::grandparent("../..", "/")]
    #[case::past_root("../../../..", "/")]
    #[case::absolute("/etc/motd", "/etc/motd")]
    #[case::absolute_root("/", "/")]
    #[case::tilde("~", "/home/operator")]
    #[case::tilde_child("~/docs/notes.md", "/home/operator/docs/notes.md")]
    #[case::round_trip("docs/../readme.txt", "/home/operator/readme.txt")]
    #[case::repeated_slashes("docs//notes.md", "/home/operator/docs/notes.md")]
    fn resolve_ok(#[case] arg: &str, #[case] expected: &str) {
        let fs = fixture();
        assert_eq!(fs.resolve_path(&home(), arg).unwrap().to_string(), expected);
    }

    #[rstest]
    #[case::missing("nope", FsError::NotFound("nope".into()))]
    #[case::missing_nested("docs/nope/deeper", FsError::NotFound("docs/nope/deeper".into()))]
    #[case::through_file("readme.txt/x", FsError::NotADirectory("readme.txt/x".into()))]
    #[case::file_trailing_slash("readme.txt/", FsError::NotADirectory("readme.txt/".into()))]
    #[case::file_dotdot("readme.txt/..", FsError::NotADirectory("readme.txt/..".into()))]
    fn resolve_err(#[case] arg: &str, #[case] expected: FsError) {
        let fs = fixture();
        assert_eq!(fs.resolve_path(&home(), arg), Err(expected));
    }

    #[test]
    fn resolve_from_missing_cwd() {
        let fs = fixture();
        let gone = VfsPath::parse("/gone");
        assert!(matches!(
            fs.resolve_path(&gone, "x"),
            Err(FsError::NotFound(_))
        ));
        // Absolute paths still work from anywhere
        assert!(fs.resolve_path(&gone, "/etc").is_ok());
    }

    #[test]
    fn list_in_insertion_order() {
        let fs = fixture();
        let names: Vec<_> = fs
            .list(&home())
            .unwrap()
            .into_iter()
            .map(|e| e.display_name())
            .collect();
        assert_eq!(names, ["docs/", "readme.txt", "README.old"]);
    }

    #[test]
    fn list_file_is_itself() {
        let fs = fixture();
        let entries = fs.list(&VfsPath::parse("/etc/motd")).unwrap();
        assert_eq!(entries, vec![DirEntry::file("motd", 7)]);
    }

    #[test]
    fn read_file_and_directory() {
        let fs = fixture();
        assert_eq!(fs.read(&VfsPath::parse("/etc/motd")), Ok("welcome"));
        assert!(matches!(
            fs.read(&VfsPath::parse("/etc")),
            Err(FsError::IsADirectory(_))
        ));
    }

    #[test]
    fn complete_case_sensitive() {
        let fs = fixture();
        assert_eq!(fs.complete("re", &home()), ["readme.txt"]);
        assert_eq!(fs.complete("RE", &home()), ["README.old"]);
        assert!(fs.complete("x", &home()).is_empty());
    }

    #[test]
    fn complete_case_insensitive() {
        let fs = fixture().with_match_case(MatchCase::Insensitive);
        assert_eq!(fs.complete("re", &home()), ["readme.txt", "README.old"]);
        assert_eq!(fs.complete("RE", &home()), ["readme.txt", "README.old"]);
    }

    #[test]
    fn complete_empty_prefix_lists_everything() {
        let fs = fixture();
        assert_eq!(fs.complete("", &home()).len(), 3);
    }

    #[test]
    fn complete_on_file_or_missing_is_empty() {
        let fs = fixture();
        assert!(fs.complete("", &VfsPath::parse("/etc/motd")).is_empty());
        assert!(fs.complete("", &VfsPath::parse("/nowhere")).is_empty());
    }

    #[test]
    fn completion_unique_and_common_prefix() {
        let fs = fixture();
        let one = fs.complete_word("d", &home());
        assert_eq!(one.unique(), Some("docs"));
        assert_eq!(one.common_prefix().as_deref(), Some("docs"));

        let fs = fixture().with_match_case(MatchCase::Insensitive);
        let many = fs.complete_word("r", &home());
        assert_eq!(many.unique(), None);
        assert_eq!(many.common_prefix().as_deref(), Some("readme."));

        let none = fs.complete_word("zzz", &home());
        assert_eq!(none.unique(), None);
        assert_eq!(none.common_prefix(), None);
    }

    #[test]
    fn common_prefix_not_longer_than_partial_is_none() {
        let fs = Node::dir("", [Node::file("ab1", ""), Node::file("ab2", "")]);
        let fs = VirtualFs::new(fs, VfsPath::root(), "root");
        assert_eq!(fs.complete_word("ab", &VfsPath::root()).common_prefix(), None);
        assert_eq!(
            fs.complete_word("a", &VfsPath::root()).common_prefix().as_deref(),
            Some("ab")
        );
    }

    #[test]
    fn walk_visits_every_node() {
        let fs = fixture();
        let paths: Vec<_> = fs.walk().into_iter().map(|(p, _)| p.to_string()).collect();
        assert_eq!(paths.first().map(String::as_str), Some("/"));
        assert!(paths.contains(&"/home/operator/docs/notes.md".to_string()));
        assert!(paths.contains(&"/etc/motd".to_string()));
        assert_eq!(paths.len(), 9);
    }
}
