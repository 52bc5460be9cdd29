//! Code context detection
//!
//! Classifies the first line of code after a comment. Patterns are tried in
//! order; the first match wins, so the more specific shapes come first.

use crate::jsdoc::ast::{CodeContext, CodeKind};
use once_cell::sync::Lazy;
use regex::Regex;

static FUNCTION_STATEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:export\s+)?(?:default\s+)?(?:async\s+)?function\s*\*?\s*([\w$]+)\s*\(")
        .unwrap()
});

static CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:export\s+)?(?:default\s+)?(?:abstract\s+)?class\s+([\w$]+)(?:\s+extends\s+([\w$.]+))?")
        .unwrap()
});

static PROTOTYPE_METHOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([\w$.]+)\.prototype\.([\w$]+)\s*=\s*(?:async\s+)?function\b").unwrap()
});

static PROTOTYPE_PROPERTY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([\w$.]+)\.prototype\.([\w$]+)\s*=\s*([^;]+)").unwrap());

static ARROW_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:export\s+)?(?:const|let|var)\s+([\w$]+)\s*=\s*(?:async\s+)?(?:\([^)]*\)|[\w$]+)\s*=>")
        .unwrap()
});

static FUNCTION_EXPRESSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:export\s+)?(?:const|let|var)\s+([\w$]+)\s*=\s*(?:async\s+)?function\b").unwrap()
});

static DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:export\s+)?(?:const|let|var)\s+([\w$]+)(?:\s*=\s*([^;]+))?").unwrap()
});

static PROPERTY_ASSIGNMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([\w$.]+)\.([\w$]+)\s*=\s*([^;]+)").unwrap());

static CLASS_METHOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:static\s+)?(?:async\s+)?(?:get\s+|set\s+)?\*?\s*(#?[\w$]+)\s*\([^)]*\)\s*\{").unwrap()
});

static PROPERTY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*['"]?([\w$]+)['"]?\s*:\s*([^,]+)"#).unwrap());

const CONTROL_KEYWORDS: &[&str] = &["if", "for", "while", "switch", "catch", "function", "return"];

/// Classify one line of code. `line` is the 1-based line number recorded on
/// the result.
pub fn detect(code: &str, line: usize) -> Option<CodeContext> {
    let context = |kind, name: &str, receiver: Option<&str>, value: Option<&str>| CodeContext {
        kind,
        name: name.to_string(),
        receiver: receiver.map(str::to_string),
        value: value.map(clean_value).filter(|value| !value.is_empty()),
        line,
    };

    if let Some(caps) = FUNCTION_STATEMENT.captures(code) {
        return Some(context(CodeKind::FunctionStatement, &caps[1], None, None));
    }
    if let Some(caps) = CLASS.captures(code) {
        let parent = caps.get(2).map(|m| m.as_str());
        return Some(context(CodeKind::Class, &caps[1], None, parent));
    }
    if let Some(caps) = PROTOTYPE_METHOD.captures(code) {
        return Some(context(CodeKind::PrototypeMethod, &caps[2], Some(&caps[1]), None));
    }
    if let Some(caps) = PROTOTYPE_PROPERTY.captures(code) {
        return Some(context(
            CodeKind::PrototypeProperty,
            &caps[2],
            Some(&caps[1]),
            Some(&caps[3]),
        ));
    }
    if let Some(caps) = ARROW_FUNCTION.captures(code) {
        return Some(context(CodeKind::ArrowFunction, &caps[1], None, None));
    }
    if let Some(caps) = FUNCTION_EXPRESSION.captures(code) {
        return Some(context(CodeKind::FunctionExpression, &caps[1], None, None));
    }
    if let Some(caps) = DECLARATION.captures(code) {
        let value = caps.get(2).map(|m| m.as_str());
        return Some(context(CodeKind::Declaration, &caps[1], None, value));
    }
    if let Some(caps) = PROPERTY_ASSIGNMENT.captures(code) {
        return Some(context(
            CodeKind::PropertyAssignment,
            &caps[2],
            Some(&caps[1]),
            Some(&caps[3]),
        ));
    }
    if let Some(caps) = CLASS_METHOD.captures(code) {
        if !CONTROL_KEYWORDS.contains(&&caps[1]) {
            return Some(context(CodeKind::ClassMethod, &caps[1], None, None));
        }
    }
    if let Some(caps) = PROPERTY.captures(code) {
        return Some(context(CodeKind::Property, &caps[1], None, Some(&caps[2])));
    }
    None
}

fn clean_value(value: &str) -> String {
    value
        .trim()
        .trim_end_matches([',', ';', '{'])
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_and_name(code: &str) -> Option<(CodeKind, String)> {
        detect(code, 1).map(|context| (context.kind, context.name))
    }

    #[test]
    fn test_functions() {
        assert_eq!(
            kind_and_name("function greet(name) {"),
            Some((CodeKind::FunctionStatement, "greet".to_string()))
        );
        assert_eq!(
            kind_and_name("export async function load() {"),
            Some((CodeKind::FunctionStatement, "load".to_string()))
        );
        assert_eq!(
            kind_and_name("var greet = function(name) {"),
            Some((CodeKind::FunctionExpression, "greet".to_string()))
        );
        assert_eq!(
            kind_and_name("const greet = (name) => `hi ${name}`;"),
            Some((CodeKind::ArrowFunction, "greet".to_string()))
        );
        assert_eq!(
            kind_and_name("const double = x => x * 2;"),
            Some((CodeKind::ArrowFunction, "double".to_string()))
        );
    }

    #[test]
    fn test_classes_and_members() {
        let class = detect("export class Widget extends Base {", 4).unwrap();
        assert_eq!(class.kind, CodeKind::Class);
        assert_eq!(class.name, "Widget");
        assert_eq!(class.value.as_deref(), Some("Base"));
        assert_eq!(class.line, 4);

        assert_eq!(
            kind_and_name("  async render(props) {"),
            Some((CodeKind::ClassMethod, "render".to_string()))
        );
        assert_eq!(kind_and_name("  if (ready) {"), None);
    }

    #[test]
    fn test_prototype_members() {
        let method = detect("Widget.prototype.render = function() {", 1).unwrap();
        assert_eq!(method.kind, CodeKind::PrototypeMethod);
        assert_eq!(method.name, "render");
        assert_eq!(method.receiver.as_deref(), Some("Widget"));

        let property = detect("Widget.prototype.size = 10;", 1).unwrap();
        assert_eq!(property.kind, CodeKind::PrototypeProperty);
        assert_eq!(property.value.as_deref(), Some("10"));
    }

    #[test]
    fn test_assignments() {
        let decl = detect("let count = 0;", 1).unwrap();
        assert_eq!(decl.kind, CodeKind::Declaration);
        assert_eq!(decl.value.as_deref(), Some("0"));

        let assign = detect("module.exports.version = '1.0';", 1).unwrap();
        assert_eq!(assign.kind, CodeKind::PropertyAssignment);
        assert_eq!(assign.name, "version");
        assert_eq!(assign.receiver.as_deref(), Some("module.exports"));

        let prop = detect("  timeout: 30,", 1).unwrap();
        assert_eq!(prop.kind, CodeKind::Property);
        assert_eq!(prop.value.as_deref(), Some("30"));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(detect("", 1), None);
        assert_eq!(detect("}", 1), None);
    }
}
