//! Tree nodes for the virtual filesystem.

use phosphor_types::{DirEntry, VfsPath};

/// Payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Children in insertion order; names are unique among siblings.
    Directory { children: Vec<Node> },
    File { content: String },
}

/// A file or directory in the tree.
///
/// Every node except the root is owned by exactly one parent, so the tree
/// is acyclic by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    name: String,
    kind: NodeKind,
}

impl Node {
    /// Create a directory from its children.
    ///
    /// A child whose name repeats an earlier sibling replaces it in place.
    pub fn dir(name: impl Into<String>, children: impl IntoIterator<Item = Node>) -> Self {
        children
            .into_iter()
            .fold(Self::empty_dir(name), |dir, child| dir.with_child(child))
    }

    pub fn empty_dir(name: impl Into<String>) -> Self {
        let name = name.into();
        debug_assert!(is_valid_name(&name), "invalid node name: {name:?}");
        Self {
            name,
            kind: NodeKind::Directory {
                children: Vec::new(),
            },
        }
    }

    pub fn file(name: impl Into<String>, content: impl Into<String>) -> Self {
        let name = name.into();
        debug_assert!(is_valid_name(&name), "invalid node name: {name:?}");
        Self {
            name,
            kind: NodeKind::File {
                content: content.into(),
            },
        }
    }

    /// Add a child, replacing a same-named sibling in place.
    ///
    /// No-op on files.
    pub fn with_child(mut self, child: Node) -> Self {
        self.insert_child(child);
        self
    }

    fn insert_child(&mut self, child: Node) {
        if let NodeKind::Directory { children } = &mut self.kind {
            match children.iter_mut().find(|c| c.name == child.name) {
                Some(existing) => *existing = child,
                None => children.push(child),
            }
        }
    }

    /// Graft `node` into the tree at `parent`, creating missing directories.
    ///
    /// Used while building the tree, before it is frozen behind an `Arc`.
    /// Existing directories along the way are kept; a file in the way is
    /// replaced by a directory.
    pub fn graft(&mut self, parent: &VfsPath, node: Node) {
        let mut current = self;
        for segment in parent.segments() {
            let exists_as_dir = current
                .child(segment)
                .is_some_and(|c| c.is_dir());
            if !exists_as_dir {
                current.insert_child(Node::empty_dir(segment.clone()));
            }
            let NodeKind::Directory { children } = &mut current.kind else {
                return;
            };
            match children.iter_mut().find(|c| &c.name == segment) {
                Some(next) => current = next,
                None => return,
            }
        }
        current.insert_child(node);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File { .. })
    }

    /// Children in insertion order; empty for files.
    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Directory { children } => children,
            NodeKind::File { .. } => &[],
        }
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children().iter().find(|c| c.name == name)
    }

    /// File content; `None` for directories.
    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::File { content } => Some(content),
            NodeKind::Directory { .. } => None,
        }
    }

    pub fn entry(&self) -> DirEntry {
        match &self.kind {
            NodeKind::Directory { .. } => DirEntry::directory(self.name.clone()),
            NodeKind::File { content } => DirEntry::file(self.name.clone(), content.len() as u64),
        }
    }
}

/// Root is the only node with an empty name.
fn is_valid_name(name: &str) -> bool {
    name.is_empty() || (name != "." && name != ".." && !name.contains('/'))
}
