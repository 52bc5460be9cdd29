//! Type AST nodes
//!
//! `TypeNode` is the parsed form of a type literal. Its `Display` impl is the
//! normalizing serializer: generics always print as `Base.<T>`, bracket-suffix
//! arrays therefore come back as `Array.<T>`, and explicit groups keep their
//! parentheses. Parsing the printed form yields a structurally equal tree.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed type expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TypeNode {
    /// Bare or dotted identifier: `String`, `Foo.Bar`, `module:foo/bar`
    #[serde(rename = "NameType")]
    Name { name: String },

    /// `A|B|C`
    #[serde(rename = "UnionType")]
    Union { elements: Vec<TypeNode> },

    /// `( ... )`
    #[serde(rename = "GroupType")]
    Group { expression: Box<TypeNode> },

    /// Trailing `=`
    #[serde(rename = "OptionalType")]
    Optional { expression: Box<TypeNode> },

    /// Leading or trailing `?`
    #[serde(rename = "NullableType")]
    Nullable { expression: Box<TypeNode> },

    /// Leading or trailing `!`
    #[serde(rename = "NonNullableType")]
    NonNullable { expression: Box<TypeNode> },

    /// Leading `...`
    #[serde(rename = "VariadicType")]
    Variadic { expression: Box<TypeNode> },

    /// `Array.<T>`, `Array<T>` and `T[]`
    #[serde(rename = "GenericType")]
    Generic { base: String, params: Vec<TypeNode> },

    /// `{key: Type, other}`
    #[serde(rename = "RecordType")]
    Record { fields: Vec<RecordField> },

    /// `function(this:T, new:U, a, ...b): R`
    #[serde(rename = "FunctionType")]
    Function {
        params: Vec<FunctionParam>,
        result: Option<Box<TypeNode>>,
        this: Option<Box<TypeNode>>,
        new: Option<Box<TypeNode>>,
    },

    /// `*`
    #[serde(rename = "AllType")]
    All,

    /// A lone `?`. Also the marker synthesized for tags that require a type
    /// but were written without one.
    #[serde(rename = "UnknownType")]
    Unknown,

    /// `'value'` or `"value"`
    #[serde(rename = "StringLiteralType")]
    StringLiteral { value: String },

    /// `42`, `-1.5`
    #[serde(rename = "NumberLiteralType")]
    NumberLiteral { value: String },
}

/// One `key: Type` entry of a record type. `{a}` has no value type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordField {
    pub key: String,
    #[serde(rename = "type")]
    pub value: Option<TypeNode>,
}

/// One parameter of a function type. Closure allows `name:Type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionParam {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: TypeNode,
}

impl TypeNode {
    pub fn name(name: impl Into<String>) -> Self {
        TypeNode::Name { name: name.into() }
    }

    pub fn union(elements: Vec<TypeNode>) -> Self {
        TypeNode::Union { elements }
    }

    pub fn group(expression: TypeNode) -> Self {
        TypeNode::Group {
            expression: Box::new(expression),
        }
    }

    pub fn optional(expression: TypeNode) -> Self {
        TypeNode::Optional {
            expression: Box::new(expression),
        }
    }

    pub fn nullable(expression: TypeNode) -> Self {
        TypeNode::Nullable {
            expression: Box::new(expression),
        }
    }

    pub fn non_nullable(expression: TypeNode) -> Self {
        TypeNode::NonNullable {
            expression: Box::new(expression),
        }
    }

    pub fn variadic(expression: TypeNode) -> Self {
        TypeNode::Variadic {
            expression: Box::new(expression),
        }
    }

    pub fn generic(base: impl Into<String>, params: Vec<TypeNode>) -> Self {
        TypeNode::Generic {
            base: base.into(),
            params,
        }
    }

    /// `T[]` desugars to `Array.<T>`.
    pub fn array_of(element: TypeNode) -> Self {
        TypeNode::generic("Array", vec![element])
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, TypeNode::Optional { .. })
    }

    /// True when the node prints with a trailing `=`. A `?` or `!` applied on
    /// top of it has to be printed after it, not before.
    fn ends_in_postfix(&self) -> bool {
        match self {
            TypeNode::Optional { .. } => true,
            TypeNode::Nullable { expression } | TypeNode::NonNullable { expression } => {
                expression.ends_in_postfix()
            }
            _ => false,
        }
    }

    /// Writes `self` as the operand of a modifier. Bare unions need parens
    /// there or the modifier would bind to the last member only.
    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeNode::Union { .. } => write!(f, "({})", self),
            other => write!(f, "{}", other),
        }
    }
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeNode::Name { name } => f.write_str(name),
            TypeNode::Union { elements } => write_joined(f, elements, "|"),
            TypeNode::Group { expression } => write!(f, "({})", expression),
            TypeNode::Optional { expression } => {
                expression.fmt_operand(f)?;
                f.write_str("=")
            }
            TypeNode::Nullable { expression } if expression.ends_in_postfix() => {
                write!(f, "{}?", expression)
            }
            TypeNode::NonNullable { expression } if expression.ends_in_postfix() => {
                write!(f, "{}!", expression)
            }
            TypeNode::Nullable { expression } => {
                f.write_str("?")?;
                expression.fmt_operand(f)
            }
            TypeNode::NonNullable { expression } => {
                f.write_str("!")?;
                expression.fmt_operand(f)
            }
            TypeNode::Variadic { expression } => {
                f.write_str("...")?;
                expression.fmt_operand(f)
            }
            TypeNode::Generic { base, params } => {
                write!(f, "{}.<", base)?;
                write_joined(f, params, ", ")?;
                f.write_str(">")
            }
            TypeNode::Record { fields } => {
                f.write_str("{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    if is_identifier(&field.key) || is_number(&field.key) {
                        f.write_str(&field.key)?;
                    } else {
                        write_quoted(f, &field.key)?;
                    }
                    if let Some(value) = &field.value {
                        write!(f, ": {}", value)?;
                    }
                }
                f.write_str("}")
            }
            TypeNode::Function {
                params,
                result,
                this,
                new,
            } => {
                f.write_str("function(")?;
                let mut first = true;
                let mut sep = |f: &mut fmt::Formatter<'_>| -> fmt::Result {
                    if !first {
                        f.write_str(", ")?;
                    }
                    first = false;
                    Ok(())
                };
                if let Some(this) = this {
                    sep(f)?;
                    write!(f, "this: {}", this)?;
                }
                if let Some(new) = new {
                    sep(f)?;
                    write!(f, "new: {}", new)?;
                }
                for param in params {
                    sep(f)?;
                    match (&param.name, &param.ty) {
                        (Some(name), TypeNode::Variadic { expression }) => {
                            write!(f, "...{}: {}", name, expression)?
                        }
                        (Some(name), ty) => write!(f, "{}: {}", name, ty)?,
                        (None, ty) => write!(f, "{}", ty)?,
                    }
                }
                f.write_str(")")?;
                if let Some(result) = result {
                    write!(f, ": ")?;
                    result.fmt_operand(f)?;
                }
                Ok(())
            }
            TypeNode::All => f.write_str("*"),
            TypeNode::Unknown => f.write_str("?"),
            TypeNode::StringLiteral { value } => write_quoted(f, value),
            TypeNode::NumberLiteral { value } => f.write_str(value),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, nodes: &[TypeNode], sep: &str) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", node)?;
    }
    Ok(())
}

fn write_quoted(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_str("\"")?;
    for ch in value.chars() {
        if ch == '"' || ch == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{}", ch)?;
    }
    f.write_str("\"")
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn is_number(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}
