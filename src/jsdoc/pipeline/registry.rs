use crate::jsdoc::ast::{Node, NodeKind};
use crate::jsdoc::config::ParserConfig;
use crate::jsdoc::error::{HandlerTypeError, ParseError};
use crate::jsdoc::tags::canonical_title;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A before or after handler. `None` leaves the node as it was.
pub type Hook = Arc<dyn Fn(&Node) -> Option<Node> + Send + Sync>;

/// Replaces the default handling of a node type. `None` leaves the node as it
/// was, skipping the default handling.
pub type Middleware =
    Arc<dyn Fn(&Node, &ParserConfig) -> Result<Option<Node>, ParseError> + Send + Sync>;

/// Key under which handlers are registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeType {
    Comment,
    /// Every tag, whatever its title
    Tag,
    /// Tags with one canonical title
    Title(String),
    InlineTag,
}

impl NodeType {
    /// A key for one tag title. Aliases resolve to the canonical title.
    pub fn title(title: &str) -> Self {
        NodeType::Title(canonical_title(title.trim_start_matches('@')))
    }

    /// The node kind handlers under this key receive.
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeType::Comment => NodeKind::Comment,
            NodeType::Tag | NodeType::Title(_) => NodeKind::Tag,
            NodeType::InlineTag => NodeKind::InlineTag,
        }
    }

    /// Hook keys for a node, in the order their chains run.
    pub fn keys_for(node: &Node) -> Vec<NodeType> {
        match node {
            Node::Comment(_) => vec![NodeType::Comment],
            Node::Tag(tag) => vec![NodeType::Tag, NodeType::Title(tag.title.clone())],
            Node::InlineTag(_) => vec![NodeType::InlineTag],
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeType::Comment => f.write_str("comment"),
            NodeType::Tag => f.write_str("tag"),
            NodeType::Title(title) => f.write_str(title),
            NodeType::InlineTag => f.write_str("inlineTag"),
        }
    }
}

impl From<&str> for NodeType {
    fn from(name: &str) -> Self {
        match name {
            "comment" => NodeType::Comment,
            "tag" => NodeType::Tag,
            "inlineTag" | "inline" => NodeType::InlineTag,
            title => NodeType::title(title),
        }
    }
}

/// Where in a node's processing a handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Before,
    Middleware,
    After,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Before => f.write_str("before"),
            Phase::Middleware => f.write_str("middleware"),
            Phase::After => f.write_str("after"),
        }
    }
}

/// Handler tables. Entries are appended or replaced by key, never removed.
#[derive(Clone, Default)]
pub(crate) struct Registry {
    pub(crate) before: HashMap<NodeType, Vec<Hook>>,
    pub(crate) after: HashMap<NodeType, Vec<Hook>>,
    pub(crate) middleware: HashMap<NodeType, Middleware>,
    pub(crate) plugins: Vec<String>,
}

impl Registry {
    pub(crate) fn hooks(&self, phase: Phase, key: &NodeType) -> &[Hook] {
        let table = match phase {
            Phase::Before => &self.before,
            Phase::After => &self.after,
            Phase::Middleware => return &[],
        };
        table.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Run one phase's hook chains over a node.
    pub(crate) fn apply_hooks(&self, phase: Phase, node: Node) -> Result<Node, ParseError> {
        let mut node = node;
        for key in NodeType::keys_for(&node) {
            for hook in self.hooks(phase, &key) {
                if let Some(next) = hook(&node) {
                    check_kind(&key, phase, &node, &next)?;
                    node = next;
                }
            }
        }
        Ok(node)
    }

    /// The middleware for a node: a title-specific one wins over `Tag`.
    pub(crate) fn middleware_for(&self, node: &Node) -> Option<(NodeType, &Middleware)> {
        NodeType::keys_for(node)
            .into_iter()
            .rev()
            .find_map(|key| self.middleware.get(&key).map(|handler| (key, handler)))
    }
}

/// `output` came back from a handler that was given `input`.
pub(crate) fn check_kind(
    key: &NodeType,
    phase: Phase,
    input: &Node,
    output: &Node,
) -> Result<(), HandlerTypeError> {
    let expected = key.kind();
    let found = output.kind();
    if found == expected {
        Ok(())
    } else {
        Err(HandlerTypeError {
            node_type: key.clone(),
            phase,
            expected,
            found,
            raw: input.raw().to_string(),
        })
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = |table: &HashMap<NodeType, Vec<Hook>>| table.values().map(Vec::len).sum::<usize>();
        f.debug_struct("Registry")
            .field("before", &count(&self.before))
            .field("after", &count(&self.after))
            .field("middleware", &self.middleware.keys().collect::<Vec<_>>())
            .field("plugins", &self.plugins)
            .finish()
    }
}
