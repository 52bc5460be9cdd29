//! Composable stages
//!
//! A [`Transform`] is a boxed stage from `I` to `O` that can be chained with
//! `.then()`. The compiler checks that each stage's input matches the
//! previous stage's output:
//!
//! ```rust,ignore
//! let chain = pipeline
//!     .run(Phase::Before)                                  // Node -> Node
//!     .then(Transform::from_fn(|node: Node| into_tag(node))); // Node -> Tag
//! ```
//!
//! [`Pipeline::run`](super::Pipeline::run) hands out each phase in this form
//! and [`Pipeline::chain`](super::Pipeline::chain) joins all three.

use crate::jsdoc::error::ParseError;

/// A boxed, chainable stage from `I` to `O`.
pub struct Transform<I, O> {
    run_fn: Box<dyn Fn(I) -> Result<O, ParseError> + Send + Sync>,
}

impl<I, O> Transform<I, O> {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(I) -> Result<O, ParseError> + Send + Sync + 'static,
    {
        Transform {
            run_fn: Box::new(f),
        }
    }

    /// Chain a stage after this one, producing a transform from `I` to `O2`.
    pub fn then<O2>(self, next: Transform<O, O2>) -> Transform<I, O2>
    where
        I: 'static,
        O: 'static,
        O2: 'static,
    {
        let prev_run = self.run_fn;
        Transform {
            run_fn: Box::new(move |input| {
                let intermediate = prev_run(input)?;
                next.run(intermediate)
            }),
        }
    }

    pub fn run(&self, input: I) -> Result<O, ParseError> {
        (self.run_fn)(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsdoc::ast::{Comment, Node};
    use crate::jsdoc::error::TagSyntaxError;
    use crate::jsdoc::tags::Tag;

    fn rename(suffix: &'static str) -> Transform<Node, Node> {
        Transform::from_fn(move |node: Node| {
            let mut tag = node.into_tag().ok_or(TagSyntaxError::MissingTitle)?;
            tag.name = Some(format!("{}{}", tag.name.unwrap_or_default(), suffix));
            Ok(Node::Tag(tag))
        })
    }

    fn into_tag() -> Transform<Node, Tag> {
        Transform::from_fn(|node: Node| Ok(node.into_tag().ok_or(TagSyntaxError::MissingTitle)?))
    }

    fn param() -> Node {
        Node::Tag(Tag::new("param"))
    }

    #[test]
    fn test_stages_run_in_chain_order() {
        let chain = rename("a").then(rename("b")).then(rename("c"));
        let node = chain.run(param()).unwrap();
        assert_eq!(node.as_tag().unwrap().name.as_deref(), Some("abc"));
    }

    #[test]
    fn test_chain_can_change_type() {
        let chain = rename("x").then(into_tag());
        let tag: Tag = chain.run(param()).unwrap();
        assert_eq!(tag.title, "param");
        assert_eq!(tag.name.as_deref(), Some("x"));
    }

    #[test]
    fn test_error_short_circuits() {
        let chain = rename("a").then(into_tag()).then(Transform::from_fn(
            |_: Tag| -> Result<Tag, ParseError> { panic!("stage after a failure must not run") },
        ));

        assert_eq!(
            chain.run(Node::Comment(Comment::default())).unwrap_err(),
            ParseError::Tag(TagSyntaxError::MissingTitle)
        );
    }

    #[test]
    fn test_transforms_nest() {
        let inner = rename("a").then(rename("b"));
        let full = rename("<").then(inner).then(rename(">")).then(into_tag());
        assert_eq!(full.run(param()).unwrap().name.as_deref(), Some("<ab>"));
    }
}
