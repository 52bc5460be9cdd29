//! Handler dispatch around every parsed node
//!
//! Each node (comment, tag, inline reference) is processed in three phases:
//!
//! 1. the `before` hooks registered for its type, in registration order;
//! 2. the `middleware` for its type if one is registered, otherwise the
//!    default handling supplied by the orchestrator;
//! 3. the `after` hooks, in registration order.
//!
//! Tags run the hooks registered for [`NodeType::Tag`] first and then those
//! for their own title. For middleware the title-specific handler wins.
//!
//! A handler returning `None` leaves the node unchanged. A handler returning a
//! node of another kind is a [`HandlerTypeError`](crate::jsdoc::error::HandlerTypeError),
//! which always aborts the parse.
//!
//! Registration goes through [`PipelineBuilder`], a value builder: every call
//! consumes the builder and returns the extended configuration. [`build`]
//! freezes it into a [`Pipeline`] that is cheap to clone and read-only.
//!
//! ```rust,ignore
//! let pipeline = PipelineBuilder::new()
//!     .before("param", |node| {
//!         let mut tag = node.as_tag()?.clone();
//!         tag.name = tag.name.map(|n| n.to_uppercase());
//!         Some(tag.into())
//!     })
//!     .use_plugin(DeprecationLinter)
//!     .build();
//! ```
//!
//! [`build`]: PipelineBuilder::build

mod registry;
pub mod transform;

pub use registry::{Hook, Middleware, NodeType, Phase};
pub use transform::Transform;

use crate::jsdoc::ast::Node;
use crate::jsdoc::config::ParserConfig;
use crate::jsdoc::error::ParseError;
use registry::{check_kind, Registry};
use std::sync::Arc;
use tracing::trace;

/// Accumulates handler registrations.
#[derive(Clone, Default, Debug)]
pub struct PipelineBuilder {
    registry: Registry,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook run before the core handling of `node_type`.
    pub fn before<F>(mut self, node_type: impl Into<NodeType>, hook: F) -> Self
    where
        F: Fn(&Node) -> Option<Node> + Send + Sync + 'static,
    {
        let hook: Hook = Arc::new(hook);
        self.registry
            .before
            .entry(node_type.into())
            .or_default()
            .push(hook);
        self
    }

    /// Append a hook run after the core handling of `node_type`.
    pub fn after<F>(mut self, node_type: impl Into<NodeType>, hook: F) -> Self
    where
        F: Fn(&Node) -> Option<Node> + Send + Sync + 'static,
    {
        let hook: Hook = Arc::new(hook);
        self.registry
            .after
            .entry(node_type.into())
            .or_default()
            .push(hook);
        self
    }

    /// Replace the core handling of `node_type`. A later registration for the
    /// same type replaces an earlier one.
    pub fn middleware<F>(mut self, node_type: impl Into<NodeType>, handler: F) -> Self
    where
        F: Fn(&Node, &ParserConfig) -> Result<Option<Node>, ParseError> + Send + Sync + 'static,
    {
        let handler: Middleware = Arc::new(handler);
        self.registry.middleware.insert(node_type.into(), handler);
        self
    }

    /// Let a plugin extend the configuration. Applying the same plugin twice
    /// registers its handlers twice.
    pub fn use_plugin<P>(self, plugin: P) -> Self
    where
        P: Plugin,
    {
        let name = plugin.name().to_string();
        let mut builder = plugin.apply(self);
        trace!(plugin = %name, "applied plugin");
        builder.registry.plugins.push(name);
        builder
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            registry: Arc::new(self.registry),
        }
    }
}

/// A reusable bundle of registrations.
pub trait Plugin {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn apply(&self, builder: PipelineBuilder) -> PipelineBuilder;
}

impl<F> Plugin for F
where
    F: Fn(PipelineBuilder) -> PipelineBuilder,
{
    fn name(&self) -> &str {
        "anonymous"
    }

    fn apply(&self, builder: PipelineBuilder) -> PipelineBuilder {
        self(builder)
    }
}

/// Frozen handler configuration shared by every parse call.
#[derive(Clone, Default, Debug)]
pub struct Pipeline {
    registry: Arc<Registry>,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Names of the plugins applied while building, in order.
    pub fn plugins(&self) -> &[String] {
        &self.registry.plugins
    }

    pub fn has_middleware(&self, node_type: &NodeType) -> bool {
        self.registry.middleware.contains_key(node_type)
    }

    /// The composed chain for one phase, using the default configuration for
    /// middleware.
    pub fn run(&self, phase: Phase) -> Transform<Node, Node> {
        self.run_with(phase, Arc::new(ParserConfig::default()))
    }

    /// The composed chain for one phase. For [`Phase::Middleware`] a node
    /// without middleware passes through unchanged.
    pub fn run_with(&self, phase: Phase, config: Arc<ParserConfig>) -> Transform<Node, Node> {
        let registry = Arc::clone(&self.registry);
        match phase {
            Phase::Before | Phase::After => {
                Transform::from_fn(move |node| registry.apply_hooks(phase, node))
            }
            Phase::Middleware => Transform::from_fn(move |node: Node| {
                match apply_middleware(&registry, &node, &config)? {
                    Some(next) => Ok(next),
                    None => Ok(node),
                }
            }),
        }
    }

    /// All three phases joined. Nodes without middleware keep their value
    /// through the middle stage, so this suits nodes with no default handling.
    pub fn chain(&self, config: Arc<ParserConfig>) -> Transform<Node, Node> {
        self.run(Phase::Before)
            .then(self.run_with(Phase::Middleware, config))
            .then(self.run(Phase::After))
    }

    /// Run before hooks, then middleware or `default`, then after hooks.
    pub fn process<F>(&self, node: Node, config: &ParserConfig, default: F) -> Result<Node, ParseError>
    where
        F: FnOnce(Node) -> Result<Node, ParseError>,
    {
        let kind = node.kind();
        trace!(%kind, "before");
        let node = self.registry.apply_hooks(Phase::Before, node)?;

        let node = if self.registry.middleware_for(&node).is_some() {
            trace!(%kind, "middleware");
            apply_middleware(&self.registry, &node, config)?.unwrap_or(node)
        } else {
            trace!(%kind, "default");
            default(node)?
        };

        trace!(%kind, "after");
        self.registry.apply_hooks(Phase::After, node)
    }
}

/// `Ok(None)` when there is no middleware or it declined to replace the node.
fn apply_middleware(
    registry: &Registry,
    node: &Node,
    config: &ParserConfig,
) -> Result<Option<Node>, ParseError> {
    let Some((key, handler)) = registry.middleware_for(node) else {
        return Ok(None);
    };
    match handler(node, config)? {
        Some(next) => {
            check_kind(&key, Phase::Middleware, node, &next)?;
            Ok(Some(next))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsdoc::ast::Comment;
    use crate::jsdoc::error::TagSyntaxError;
    use crate::jsdoc::tags::Tag;

    fn param(name: &str) -> Node {
        let mut tag = Tag::new("param");
        tag.name = Some(name.to_string());
        tag.raw = format!("@param {}", name);
        Node::Tag(tag)
    }

    fn uppercase_name(node: &Node) -> Option<Node> {
        let mut tag = node.as_tag()?.clone();
        tag.name = tag.name.map(|name| name.to_uppercase());
        Some(Node::Tag(tag))
    }

    #[test]
    fn test_before_default_after_order() {
        let pipeline = PipelineBuilder::new()
            .before("param", uppercase_name)
            .after("param", |node| {
                let mut tag = node.as_tag()?.clone();
                tag.description = tag.name.clone();
                Some(Node::Tag(tag))
            })
            .build();

        let node = pipeline
            .process(param("who"), &ParserConfig::default(), |node| {
                let mut tag = node.into_tag().unwrap_or_default();
                tag.name = tag.name.map(|name| format!("{}!", name));
                Ok(Node::Tag(tag))
            })
            .unwrap();

        let tag = node.as_tag().unwrap();
        assert_eq!(tag.name.as_deref(), Some("WHO!"));
        assert_eq!(tag.description.as_deref(), Some("WHO!"));
    }

    #[test]
    fn test_middleware_replaces_default() {
        let pipeline = PipelineBuilder::new()
            .middleware("param", |node, _config| {
                let mut tag = node.as_tag().cloned().unwrap_or_default();
                tag.description = Some("from middleware".to_string());
                Ok(Some(Node::Tag(tag)))
            })
            .build();

        let node = pipeline
            .process(param("x"), &ParserConfig::default(), |_| {
                panic!("default handling must not run")
            })
            .unwrap();
        assert_eq!(
            node.as_tag().unwrap().description.as_deref(),
            Some("from middleware")
        );
    }

    #[test]
    fn test_middleware_returning_none_is_identity() {
        let pipeline = PipelineBuilder::new()
            .middleware("comment", |_, _| Ok(None))
            .build();
        let node = pipeline
            .process(Node::Comment(Comment::default()), &ParserConfig::default(), |_| {
                panic!("default handling must not run")
            })
            .unwrap();
        assert_eq!(node, Node::Comment(Comment::default()));
    }

    #[test]
    fn test_middleware_errors_propagate() {
        let pipeline = PipelineBuilder::new()
            .middleware("tag", |_, _| Err(TagSyntaxError::MissingTitle.into()))
            .build();
        let err = pipeline
            .process(param("x"), &ParserConfig::default(), Ok)
            .unwrap_err();
        assert_eq!(err, ParseError::Tag(TagSyntaxError::MissingTitle));
    }

    #[test]
    fn test_middleware_kind_mismatch_is_fatal() {
        let pipeline = PipelineBuilder::new()
            .middleware("param", |_, _| Ok(Some(Node::Comment(Comment::default()))))
            .build();
        let err = pipeline
            .process(param("x"), &ParserConfig::default(), Ok)
            .unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(
            err.to_string(),
            "middleware handler for `param` returned a `comment` node, expected `tag` (at `@param x`)"
        );
    }

    #[test]
    fn test_later_middleware_replaces_earlier() {
        let pipeline = PipelineBuilder::new()
            .middleware("comment", |_, _| {
                Ok(Some(Node::Comment(Comment {
                    description: "first".to_string(),
                    ..Default::default()
                })))
            })
            .middleware("comment", |_, _| {
                Ok(Some(Node::Comment(Comment {
                    description: "second".to_string(),
                    ..Default::default()
                })))
            })
            .build();
        let node = pipeline
            .run(Phase::Middleware)
            .run(Node::Comment(Comment::default()))
            .unwrap();
        assert_eq!(node.as_comment().unwrap().description, "second");
    }

    #[test]
    fn test_run_phase_composes_hooks() {
        let pipeline = PipelineBuilder::new()
            .before("param", uppercase_name)
            .before("tag", |node| {
                let mut tag = node.as_tag()?.clone();
                tag.name = tag.name.map(|name| format!("_{}", name));
                Some(Node::Tag(tag))
            })
            .build();

        let before = pipeline.run(Phase::Before);
        let node = before.run(param("a")).unwrap();
        // Generic tag hooks run first, then title hooks
        assert_eq!(node.as_tag().unwrap().name.as_deref(), Some("_A"));

        let after = pipeline.run(Phase::After);
        assert_eq!(after.run(param("a")).unwrap(), param("a"));
    }

    #[test]
    fn test_chain_joins_all_phases() {
        let pipeline = PipelineBuilder::new()
            .before("param", uppercase_name)
            .middleware("param", |node, config| {
                let mut tag = node.as_tag().cloned().unwrap_or_default();
                tag.optional = config.strict;
                Ok(Some(Node::Tag(tag)))
            })
            .after("param", |node| {
                let mut tag = node.as_tag()?.clone();
                tag.description = tag.name.clone();
                Some(Node::Tag(tag))
            })
            .build();

        let node = pipeline
            .chain(Arc::new(ParserConfig::strict()))
            .run(param("who"))
            .unwrap();
        let tag = node.as_tag().unwrap();
        assert_eq!(tag.name.as_deref(), Some("WHO"));
        assert_eq!(tag.description.as_deref(), Some("WHO"));
        assert!(tag.optional);
    }

    #[test]
    fn test_chain_stops_at_first_mismatch() {
        let pipeline = PipelineBuilder::new()
            .before("tag", |_| Some(Node::Comment(Comment::default())))
            .after("tag", |_| panic!("after hooks must not run"))
            .build();

        let err = pipeline
            .chain(Arc::new(ParserConfig::default()))
            .run(param("x"))
            .unwrap_err();
        assert!(err.is_fatal());
    }

    struct Deprecate;

    impl Plugin for Deprecate {
        fn name(&self) -> &str {
            "deprecate"
        }

        fn apply(&self, builder: PipelineBuilder) -> PipelineBuilder {
            builder.after("comment", |node| {
                let mut comment = node.as_comment()?.clone();
                comment.description.push_str(" (deprecated)");
                Some(Node::Comment(comment))
            })
        }
    }

    #[test]
    fn test_plugins_layer_in_order() {
        let pipeline = PipelineBuilder::new()
            .use_plugin(Deprecate)
            .use_plugin(|builder: PipelineBuilder| builder.before("param", uppercase_name))
            .use_plugin(Deprecate)
            .build();

        assert_eq!(pipeline.plugins(), &["deprecate", "anonymous", "deprecate"]);

        // Applying a plugin twice registers its handlers twice
        let node = pipeline
            .run(Phase::After)
            .run(Node::Comment(Comment::default()))
            .unwrap();
        assert_eq!(
            node.as_comment().unwrap().description,
            " (deprecated) (deprecated)"
        );
    }

    #[test]
    fn test_builder_is_a_value() {
        let base = PipelineBuilder::new().before("param", uppercase_name);
        let extended = base.clone().middleware("param", |_, _| Ok(None)).build();
        let base = base.build();

        assert!(extended.has_middleware(&NodeType::from("param")));
        assert!(!base.has_middleware(&NodeType::from("param")));
    }
}
