//! The comment orchestrator
//!
//! [`CommentParser`] drives everything else. For one source text:
//!
//! ```text
//! preprocess → extract → is_valid → per comment:
//!     seed Comment → before → (middleware | tokenize, tags, inline) → after
//!     → format → on_comment observers
//! per tag line:
//!     split → before → (middleware | type, normalize, inline) → after → validate
//! per inline reference:
//!     before → (middleware | identity) → after
//! ```
//!
//! Whether a syntax error drops a tag or fails the comment is decided by
//! [`Policy`]. Within a batch a failing comment is reported in
//! [`Batch::failures`] and the rest still parse; handler errors abort the
//! batch.

use crate::jsdoc::ast::{Comment, Node, RawComment};
use crate::jsdoc::collaborators::{Collaborators, Segments};
use crate::jsdoc::config::ParserConfig;
use crate::jsdoc::error::{HandlerTypeError, ParseError};
use crate::jsdoc::format::format_comment;
use crate::jsdoc::inlines::{self, InlineReference};
use crate::jsdoc::pipeline::{NodeType, Phase, Pipeline, PipelineBuilder, Plugin, Transform};
use crate::jsdoc::policy::Policy;
use crate::jsdoc::tags::{self, definitions, mark_optional, Tag, TypePolicy, ValidationRejection};
use crate::jsdoc::types::{self, TypeNode};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

pub type CommentOverride =
    Arc<dyn Fn(&RawComment, &ParserConfig) -> Result<Comment, ParseError> + Send + Sync>;
pub type TagOverride = Arc<dyn Fn(&str, &ParserConfig) -> Result<Tag, ParseError> + Send + Sync>;
pub type InlineOverride =
    Arc<dyn Fn(&str, &ParserConfig) -> (String, Vec<InlineReference>) + Send + Sync>;
pub type TypeOverride =
    Arc<dyn Fn(&str, &ParserConfig) -> Result<TypeNode, ParseError> + Send + Sync>;
pub type CommentObserver = Arc<dyn Fn(&CommentEvent) + Send + Sync>;

/// Per-step replacements for the default parsing functions.
///
/// Unlike middleware these replace one step only; the dispatcher's hooks
/// still run around it.
#[derive(Clone, Default)]
pub struct ParseOverrides {
    /// Replaces tokenizing and tag parsing of a whole comment
    pub comment: Option<CommentOverride>,
    /// Replaces splitting a tag line
    pub tag: Option<TagOverride>,
    /// Replaces scanning text for inline references
    pub inline_tag: Option<InlineOverride>,
    /// Replaces the type grammar
    pub ty: Option<TypeOverride>,
    /// Replaces the type grammar for `@param` only; wins over `ty`
    pub param_type: Option<TypeOverride>,
}

impl fmt::Debug for ParseOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseOverrides")
            .field("comment", &self.comment.is_some())
            .field("tag", &self.tag.is_some())
            .field("inline_tag", &self.inline_tag.is_some())
            .field("ty", &self.ty.is_some())
            .field("param_type", &self.param_type.is_some())
            .finish()
    }
}

/// A tag left out of a comment, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedTag {
    pub raw: String,
    pub reason: String,
}

/// Delivered to observers once per produced comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentEvent {
    pub comment: Comment,
    pub dropped: Vec<DroppedTag>,
}

/// A comment that failed to parse in strict mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentFailure {
    pub raw: RawComment,
    pub error: ParseError,
}

/// Result of parsing a whole source text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    pub comments: Vec<Comment>,
    pub failures: Vec<CommentFailure>,
}

impl Batch {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Parses documentation comments with a frozen configuration and pipeline.
#[derive(Clone)]
pub struct CommentParser {
    config: ParserConfig,
    policy: Policy,
    pipeline: Pipeline,
    /// Inline references have no default handling, only handlers.
    inline_chain: Arc<Transform<Node, Node>>,
    collaborators: Collaborators,
    overrides: ParseOverrides,
    observers: Vec<CommentObserver>,
}

impl Default for CommentParser {
    fn default() -> Self {
        ParserBuilder::new().build()
    }
}

impl fmt::Debug for CommentParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommentParser")
            .field("config", &self.config)
            .field("pipeline", &self.pipeline)
            .field("overrides", &self.overrides)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl CommentParser {
    pub fn new(config: ParserConfig) -> Self {
        ParserBuilder::new().config(config).build()
    }

    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Parse every documentation comment in a source text.
    pub fn parse(&self, source: &str) -> Result<Batch, ParseError> {
        let source = (self.collaborators.preprocess)(source);
        let mut batch = Batch::default();

        for raw in (self.collaborators.extract)(&source) {
            if !(self.collaborators.is_valid)(&raw, &self.config) {
                trace!(line = raw.start_line, "skipping comment");
                continue;
            }
            match self.parse_comment(&raw) {
                Ok(comment) => batch.comments.push(comment),
                Err(error) if error.is_fatal() => return Err(error),
                Err(error) => {
                    debug!(line = raw.start_line, %error, "comment failed to parse");
                    batch.failures.push(CommentFailure { raw, error });
                }
            }
        }
        Ok(batch)
    }

    /// Parse one extracted comment and notify observers.
    pub fn parse_comment(&self, raw: &RawComment) -> Result<Comment, ParseError> {
        let mut dropped = Vec::new();
        let seed = Node::Comment(Comment::seed(raw));

        let node = self.pipeline.process(seed, &self.config, |node| {
            let comment = expect_comment(node, Phase::Before)?;
            self.default_comment(comment, raw, &mut dropped)
                .map(Node::Comment)
        })?;
        let comment = expect_comment(node, Phase::After)?;

        let comment = if self.config.format {
            format_comment(comment)
        } else {
            comment
        };

        let event = CommentEvent { comment, dropped };
        for observer in &self.observers {
            observer(&event);
        }
        Ok(event.comment)
    }

    /// Parse a comment given as text, e.g. `"/** @param {T} x */"`.
    pub fn parse_comment_text(&self, text: &str) -> Result<Comment, ParseError> {
        self.parse_comment(&RawComment::from_text(text))
    }

    /// Parse one tag line. `Ok(None)` when the tag was dropped.
    pub fn parse_tag(&self, line: &str) -> Result<Option<Tag>, ParseError> {
        match self.policy.settle(self.process_tag(line))? {
            Some(Ok(tag)) => Ok(Some(tag)),
            Some(Err(rejection)) => {
                debug!(%rejection, "tag rejected");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Parse a type literal with the configured depth limit and overrides.
    pub fn parse_type(&self, literal: &str) -> Result<TypeNode, ParseError> {
        match &self.overrides.ty {
            Some(parse) => parse(literal, &self.config),
            None => Ok(types::parse_type_with_depth(literal, self.config.types.max_depth)?),
        }
    }

    /// Scan text for inline references, running each through the pipeline.
    pub fn parse_inline(&self, text: &str) -> Result<(String, Vec<InlineReference>), ParseError> {
        let (text, references) = match &self.overrides.inline_tag {
            Some(scan) => scan(text, &self.config),
            None if self.config.inline.strip_markers => inlines::parse_inline_stripped(text),
            None => inlines::parse_inline(text),
        };

        let references = references
            .into_iter()
            .map(|reference| expect_inline(self.inline_chain.run(Node::InlineTag(reference))?))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((text, references))
    }

    fn default_comment(
        &self,
        mut comment: Comment,
        raw: &RawComment,
        dropped: &mut Vec<DroppedTag>,
    ) -> Result<Comment, ParseError> {
        if let Some(parse) = &self.overrides.comment {
            return parse(raw, &self.config);
        }

        let Segments {
            description,
            tag_lines,
            examples,
            footer,
        } = (self.collaborators.tokenize)(&comment.raw);

        for line in tag_lines {
            let outcome = self.process_tag(&line);
            let error = outcome.as_ref().err().map(ToString::to_string);
            match self.policy.settle(outcome)? {
                Some(Ok(tag)) => comment.tags.push(tag),
                Some(Err(rejection)) => {
                    debug!(%rejection, "tag rejected");
                    dropped.push(DroppedTag {
                        raw: line,
                        reason: rejection.to_string(),
                    });
                }
                None => dropped.push(DroppedTag {
                    raw: line,
                    reason: error.unwrap_or_default(),
                }),
            }
        }

        let (description, inline_tags) = self.parse_inline(&description)?;
        comment.description = description;
        comment.inline_tags = inline_tags;
        comment.footer = footer;
        comment.examples = examples;
        Ok(comment)
    }

    /// Split, dispatch and validate one tag line.
    ///
    /// The outer error is a parse failure subject to the strict policy; the
    /// inner one a validation rejection, which is never raised.
    fn process_tag(&self, line: &str) -> Result<Result<Tag, ValidationRejection>, ParseError> {
        let mut tag = match &self.overrides.tag {
            Some(split) => split(line, &self.config)?,
            None => tags::split_tag(line)?,
        };
        tag.title = tags::canonical_title(&tag.title);

        let node = self.pipeline.process(Node::Tag(tag), &self.config, |node| {
            let tag = expect_tag(node, Phase::Before)?;
            self.default_tag(tag).map(Node::Tag)
        })?;
        let tag = expect_tag(node, Phase::After)?;

        Ok(tags::validate(tag, self.config.tags.closed_vocabulary))
    }

    fn default_tag(&self, tag: Tag) -> Result<Tag, ParseError> {
        let tag = tags::normalize(tag);
        let tag = self.resolve_type(tag)?;
        let mut tag = self.policy.require_type(tag)?;

        if let Some(description) = tag.description.take() {
            let (description, inline_tags) = self.parse_inline(&description)?;
            tag.description = Some(description);
            tag.inline_tags = inline_tags;
        }
        Ok(tag)
    }

    fn resolve_type(&self, mut tag: Tag) -> Result<Tag, ParseError> {
        let type_override = match tag.title.as_str() {
            "param" => self.overrides.param_type.as_ref().or(self.overrides.ty.as_ref()),
            _ => self.overrides.ty.as_ref(),
        };
        let forbidden =
            definitions::definition_or_unknown(&tag.title).type_policy == TypePolicy::Forbidden;

        if !forbidden {
            if let (Some(parse), Some(raw)) = (type_override, tag.raw_type.as_deref()) {
                let ty = parse(raw, &self.config)?;
                tag.ty = Some(mark_optional(ty, tag.optional));
                return Ok(tag);
            }
        }
        Ok(tags::resolve_type(tag, self.config.types.max_depth)?)
    }
}

fn mismatch(node_type: NodeType, phase: Phase, found: &Node) -> ParseError {
    HandlerTypeError {
        expected: node_type.kind(),
        node_type,
        phase,
        found: found.kind(),
        raw: found.raw().to_string(),
    }
    .into()
}

fn expect_comment(node: Node, phase: Phase) -> Result<Comment, ParseError> {
    match node {
        Node::Comment(comment) => Ok(comment),
        other => Err(mismatch(NodeType::Comment, phase, &other)),
    }
}

fn expect_tag(node: Node, phase: Phase) -> Result<Tag, ParseError> {
    match node {
        Node::Tag(tag) => Ok(tag),
        other => Err(mismatch(NodeType::Tag, phase, &other)),
    }
}

fn expect_inline(node: Node) -> Result<InlineReference, ParseError> {
    match node {
        Node::InlineTag(reference) => Ok(reference),
        other => Err(mismatch(NodeType::InlineTag, Phase::After, &other)),
    }
}

/// Assembles a [`CommentParser`].
#[derive(Clone, Default)]
pub struct ParserBuilder {
    config: ParserConfig,
    pipeline: PipelineBuilder,
    collaborators: Collaborators,
    overrides: ParseOverrides,
    observers: Vec<CommentObserver>,
}

impl ParserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.config.strict = strict;
        self
    }

    pub fn format(mut self, format: bool) -> Self {
        self.config.format = format;
        self
    }

    /// Replace the whole pipeline configuration.
    pub fn pipeline(mut self, pipeline: PipelineBuilder) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn before<F>(mut self, node_type: impl Into<NodeType>, hook: F) -> Self
    where
        F: Fn(&Node) -> Option<Node> + Send + Sync + 'static,
    {
        self.pipeline = self.pipeline.before(node_type, hook);
        self
    }

    pub fn after<F>(mut self, node_type: impl Into<NodeType>, hook: F) -> Self
    where
        F: Fn(&Node) -> Option<Node> + Send + Sync + 'static,
    {
        self.pipeline = self.pipeline.after(node_type, hook);
        self
    }

    pub fn middleware<F>(mut self, node_type: impl Into<NodeType>, handler: F) -> Self
    where
        F: Fn(&Node, &ParserConfig) -> Result<Option<Node>, ParseError> + Send + Sync + 'static,
    {
        self.pipeline = self.pipeline.middleware(node_type, handler);
        self
    }

    pub fn use_plugin<P: Plugin>(mut self, plugin: P) -> Self {
        self.pipeline = self.pipeline.use_plugin(plugin);
        self
    }

    pub fn preprocess<F>(mut self, preprocess: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.collaborators.preprocess = Arc::new(preprocess);
        self
    }

    pub fn extract<F>(mut self, extract: F) -> Self
    where
        F: Fn(&str) -> Vec<RawComment> + Send + Sync + 'static,
    {
        self.collaborators.extract = Arc::new(extract);
        self
    }

    pub fn is_valid<F>(mut self, is_valid: F) -> Self
    where
        F: Fn(&RawComment, &ParserConfig) -> bool + Send + Sync + 'static,
    {
        self.collaborators.is_valid = Arc::new(is_valid);
        self
    }

    pub fn tokenize<F>(mut self, tokenize: F) -> Self
    where
        F: Fn(&str) -> Segments + Send + Sync + 'static,
    {
        self.collaborators.tokenize = Arc::new(tokenize);
        self
    }

    pub fn parse_comment_with<F>(mut self, parse: F) -> Self
    where
        F: Fn(&RawComment, &ParserConfig) -> Result<Comment, ParseError> + Send + Sync + 'static,
    {
        self.overrides.comment = Some(Arc::new(parse));
        self
    }

    pub fn parse_tag_with<F>(mut self, split: F) -> Self
    where
        F: Fn(&str, &ParserConfig) -> Result<Tag, ParseError> + Send + Sync + 'static,
    {
        self.overrides.tag = Some(Arc::new(split));
        self
    }

    pub fn parse_inline_with<F>(mut self, scan: F) -> Self
    where
        F: Fn(&str, &ParserConfig) -> (String, Vec<InlineReference>) + Send + Sync + 'static,
    {
        self.overrides.inline_tag = Some(Arc::new(scan));
        self
    }

    pub fn parse_type_with<F>(mut self, parse: F) -> Self
    where
        F: Fn(&str, &ParserConfig) -> Result<TypeNode, ParseError> + Send + Sync + 'static,
    {
        self.overrides.ty = Some(Arc::new(parse));
        self
    }

    pub fn parse_param_type_with<F>(mut self, parse: F) -> Self
    where
        F: Fn(&str, &ParserConfig) -> Result<TypeNode, ParseError> + Send + Sync + 'static,
    {
        self.overrides.param_type = Some(Arc::new(parse));
        self
    }

    /// Observe every comment produced, with the tags dropped from it.
    pub fn on_comment<F>(mut self, observer: F) -> Self
    where
        F: Fn(&CommentEvent) + Send + Sync + 'static,
    {
        self.observers.push(Arc::new(observer));
        self
    }

    pub fn build(self) -> CommentParser {
        let pipeline = self.pipeline.build();
        let inline_chain = Arc::new(pipeline.chain(Arc::new(self.config.clone())));
        CommentParser {
            policy: Policy::from_config(&self.config),
            config: self.config,
            pipeline,
            inline_chain,
            collaborators: self.collaborators,
            overrides: self.overrides,
            observers: self.observers,
        }
    }
}

impl fmt::Debug for ParserBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserBuilder")
            .field("config", &self.config)
            .field("pipeline", &self.pipeline)
            .field("overrides", &self.overrides)
            .finish_non_exhaustive()
    }
}
