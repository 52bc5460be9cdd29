//! Integration tests for handler registration through the parser builder

use jsdoc::{
    Comment, CommentParser, Node, NodeKind, ParseError, ParserConfig, PipelineBuilder, Plugin,
    Tag,
};
use std::sync::{Arc, Mutex};

const SOURCE: &str = "/**
 * Greets someone.
 * @param {string} name Who to greet
 * @param {number} [times=1] How often
 * @returns {string}
 */
function greet(name, times) {}
";

fn map_tag(node: &Node, f: impl FnOnce(&mut Tag)) -> Option<Node> {
    let mut tag = node.as_tag()?.clone();
    f(&mut tag);
    Some(tag.into())
}

#[test]
fn test_before_hook_output_reaches_after_hook() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_in_hook = Arc::clone(&seen);

    let parser = CommentParser::builder()
        .before("param", |node: &Node| {
            map_tag(node, |tag| tag.name = tag.name.as_ref().map(|n| n.to_uppercase()))
        })
        .after("param", move |node: &Node| {
            let name = node.as_tag().and_then(|tag| tag.name.clone());
            seen_in_hook.lock().unwrap().push(name);
            None
        })
        .build();

    let batch = parser.parse(SOURCE).unwrap();
    let comment = &batch.comments[0];
    let names: Vec<_> = comment
        .tags_named("param")
        .filter_map(|tag| tag.name.as_deref())
        .collect();
    assert_eq!(names, vec!["NAME", "TIMES"]);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![Some("NAME".to_string()), Some("TIMES".to_string())]
    );
}

#[test]
fn test_generic_tag_hooks_run_before_title_hooks() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let generic = Arc::clone(&order);
    let specific = Arc::clone(&order);

    let parser = CommentParser::builder()
        .before("returns", move |_: &Node| {
            specific.lock().unwrap().push("returns");
            None
        })
        .before("tag", move |_: &Node| {
            generic.lock().unwrap().push("tag");
            None
        })
        .build();

    parser.parse_tag("@returns {string}").unwrap();
    assert_eq!(*order.lock().unwrap(), vec!["tag", "returns"]);
}

#[test]
fn test_middleware_replaces_default_handling() {
    let parser = CommentParser::builder()
        .middleware("returns", |node: &Node, _: &ParserConfig| {
            let mut tag = node.as_tag().cloned();
            if let Some(tag) = tag.as_mut() {
                tag.description = Some("from middleware".to_string());
            }
            Ok(tag.map(Node::from))
        })
        .build();

    let tag = parser.parse_tag("@returns {string} text").unwrap().unwrap();
    assert_eq!(tag.description.as_deref(), Some("from middleware"));
    // The default handling never ran, so the type stayed unparsed
    assert_eq!(tag.ty, None);
    assert_eq!(tag.raw_type.as_deref(), Some("string"));
}

#[test]
fn test_comment_hooks_wrap_the_whole_comment() {
    let parser = CommentParser::builder()
        .after("comment", |node: &Node| {
            let mut comment = node.as_comment()?.clone();
            comment.tags.retain(|tag| tag.title != "returns");
            Some(comment.into())
        })
        .build();

    let batch = parser.parse(SOURCE).unwrap();
    assert!(!batch.comments[0].has_tag("returns"));
    assert_eq!(batch.comments[0].tags.len(), 2);
}

#[test]
fn test_inline_hooks_see_each_reference() {
    let parser = CommentParser::builder()
        .after("inlineTag", |node: &Node| {
            let mut reference = node.as_inline()?.clone();
            reference.value = reference.value.replace('#', ".prototype.");
            Some(reference.into())
        })
        .build();

    let comment = parser
        .parse_comment_text("/** See {@link Foo#bar}. */")
        .unwrap();
    assert_eq!(comment.inline_tags[0].value, "Foo.prototype.bar");
}

#[test]
fn test_wrong_node_kind_aborts_the_batch() {
    let parser = CommentParser::builder()
        .before("param", |_: &Node| Some(Comment::default().into()))
        .build();

    let err = match parser.parse(SOURCE) {
        Err(ParseError::Handler(err)) => err,
        other => panic!("expected a handler error, got {:?}", other),
    };
    assert_eq!(err.expected, NodeKind::Tag);
    assert_eq!(err.found, NodeKind::Comment);
    assert_eq!(err.raw, "@param {string} name Who to greet");
    assert!(err.to_string().contains("(at `@param {string} name Who to greet`)"));
}

#[test]
fn test_wrong_comment_kind_names_the_comment() {
    let parser = CommentParser::builder()
        .after("comment", |_: &Node| Some(Tag::new("oops").into()))
        .build();

    let err = match parser.parse(SOURCE) {
        Err(ParseError::Handler(err)) => err,
        other => panic!("expected a handler error, got {:?}", other),
    };
    assert!(err.raw.contains("@returns {string}"));
    assert!(err.to_string().ends_with("(at `/**`)"));
}

#[test]
fn test_handler_errors_ignore_lenient_mode() {
    let parser = CommentParser::builder()
        .strict(false)
        .middleware("comment", |_: &Node, _: &ParserConfig| {
            Ok(Some(Tag::new("oops").into()))
        })
        .build();
    assert!(matches!(parser.parse(SOURCE), Err(ParseError::Handler(_))));
}

struct DeprecationMarker;

impl Plugin for DeprecationMarker {
    fn name(&self) -> &str {
        "deprecation-marker"
    }

    fn apply(&self, builder: PipelineBuilder) -> PipelineBuilder {
        builder.after("deprecated", |node: &Node| {
            map_tag(node, |tag| {
                tag.description.get_or_insert_with(|| "No replacement.".to_string());
            })
        })
    }
}

#[test]
fn test_plugins_register_through_the_builder() {
    let parser = CommentParser::builder()
        .use_plugin(DeprecationMarker)
        .use_plugin(|builder: PipelineBuilder| builder.before("deprecated", |_: &Node| None))
        .build();

    assert_eq!(
        parser.pipeline().plugins(),
        &["deprecation-marker".to_string(), "anonymous".to_string()]
    );
    let tag = parser.parse_tag("@deprecated").unwrap().unwrap();
    assert_eq!(tag.description.as_deref(), Some("No replacement."));
}

#[test]
fn test_shared_pipeline_between_parsers() {
    let pipeline = PipelineBuilder::new().before("param", |node: &Node| {
        map_tag(node, |tag| tag.description = Some("shared".to_string()))
    });

    let lenient = CommentParser::builder().pipeline(pipeline.clone()).build();
    let strict = CommentParser::builder().pipeline(pipeline).strict(true).build();

    for parser in [lenient, strict] {
        let tag = parser.parse_tag("@param {string} x").unwrap().unwrap();
        assert_eq!(tag.description.as_deref(), Some("shared"));
    }
}
