//! Recursive-descent parser for type literals
//!
//! Precedence, lowest to highest:
//!
//! ```text
//! union    := postfix ("|" postfix)*
//! postfix  := prefix ("=" | "?" | "!")*
//! prefix   := ("?" | "!" | "...") prefix | suffixed
//! suffixed := primary ("[" "]")*
//! primary  := "*" | string | number | "(" union ")" | "{" record "}"
//!           | "function" "(" params ")" (":" postfix)?
//!           | name (("." "<" | "<") union ("," union)* ">")?
//! ```
//!
//! Every bracketed production and every prefix modifier goes through
//! [`TypeParser::enter`], which enforces the configured maximum depth. All
//! recursive cycles in the grammar pass through one of those.

use super::lexer::{tokenize, Token, TokenStream};
use super::nodes::{FunctionParam, RecordField, TypeNode};
use crate::jsdoc::error::TypeSyntaxError;
use std::collections::HashSet;

/// Default nesting limit for type literals.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Parse a type literal with the default nesting limit.
pub fn parse_type(source: &str) -> Result<TypeNode, TypeSyntaxError> {
    parse_type_with_depth(source, DEFAULT_MAX_DEPTH)
}

/// Parse a type literal, failing with [`TypeSyntaxError::TooDeep`] once
/// nesting exceeds `max_depth`.
pub fn parse_type_with_depth(source: &str, max_depth: usize) -> Result<TypeNode, TypeSyntaxError> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        // `{}` on a tag: an empty record
        return Ok(TypeNode::Record { fields: Vec::new() });
    }
    let mut parser = TypeParser::new(tokens, max_depth);
    let node = parser.parse_union()?;
    parser.finish()?;
    Ok(node)
}

struct TypeParser {
    tokens: TokenStream,
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl TypeParser {
    fn new(tokens: TokenStream, max_depth: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            max_depth,
        }
    }

    // -- Cursor -----------------------------------------------------------------

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn peek_at(&self, ahead: usize) -> Option<&Token> {
        self.tokens.get(self.pos + ahead).map(|(token, _)| token)
    }

    fn offset(&self) -> usize {
        match self.tokens.get(self.pos) {
            Some((_, span)) => span.start,
            None => self.tokens.last().map(|(_, span)| span.end).unwrap_or(0),
        }
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(token, _)| token.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn unexpected(&self, expected: &'static str) -> TypeSyntaxError {
        match self.peek() {
            Some(token) => TypeSyntaxError::Unexpected {
                found: token.to_string(),
                expected,
                offset: self.offset(),
            },
            None => TypeSyntaxError::UnexpectedEnd { expected },
        }
    }

    /// Consume the closer for a bracket opened at `open_offset`.
    fn close(&mut self, opener: &Token, open_offset: usize, expected: &'static str) -> Result<(), TypeSyntaxError> {
        let closer = opener.closer();
        match self.peek() {
            Some(token) if Some(token) == closer.as_ref() => {
                self.pos += 1;
                Ok(())
            }
            None => Err(TypeSyntaxError::UnbalancedBracket {
                bracket: opener.as_char().unwrap_or('?'),
                offset: open_offset,
            }),
            Some(_) => Err(self.unexpected(expected)),
        }
    }

    fn enter(&mut self) -> Result<(), TypeSyntaxError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(TypeSyntaxError::TooDeep {
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn finish(&self) -> Result<(), TypeSyntaxError> {
        match self.peek() {
            None => Ok(()),
            Some(token) if token.is_closer() => Err(TypeSyntaxError::UnbalancedBracket {
                bracket: token.as_char().unwrap_or('?'),
                offset: self.offset(),
            }),
            Some(_) => Err(TypeSyntaxError::TrailingInput {
                offset: self.offset(),
            }),
        }
    }

    // -- Productions ------------------------------------------------------------

    fn parse_union(&mut self) -> Result<TypeNode, TypeSyntaxError> {
        let first = self.parse_postfix()?;
        if self.peek() != Some(&Token::Pipe) {
            return Ok(first);
        }
        let mut elements = vec![first];
        while self.eat(&Token::Pipe) {
            elements.push(self.parse_postfix()?);
        }
        Ok(TypeNode::Union { elements })
    }

    fn parse_postfix(&mut self) -> Result<TypeNode, TypeSyntaxError> {
        let mut node = self.parse_prefix()?;
        loop {
            node = match self.peek() {
                Some(Token::Equals) => TypeNode::optional(node),
                Some(Token::Question) => TypeNode::nullable(node),
                Some(Token::Bang) => TypeNode::non_nullable(node),
                _ => return Ok(node),
            };
            self.pos += 1;
        }
    }

    fn parse_prefix(&mut self) -> Result<TypeNode, TypeSyntaxError> {
        let standalone = |next: Option<&Token>| next.map_or(true, Token::ends_type);
        match self.peek() {
            Some(Token::Question) => {
                self.pos += 1;
                if standalone(self.peek()) {
                    return Ok(TypeNode::Unknown);
                }
                self.enter()?;
                let inner = self.parse_prefix()?;
                self.leave();
                Ok(TypeNode::nullable(inner))
            }
            Some(Token::Bang) => {
                self.pos += 1;
                self.enter()?;
                let inner = self.parse_prefix()?;
                self.leave();
                Ok(TypeNode::non_nullable(inner))
            }
            Some(Token::Ellipsis) => {
                self.pos += 1;
                if standalone(self.peek()) {
                    return Ok(TypeNode::variadic(TypeNode::Unknown));
                }
                self.enter()?;
                let inner = self.parse_prefix()?;
                self.leave();
                Ok(TypeNode::variadic(inner))
            }
            _ => self.parse_suffixed(),
        }
    }

    fn parse_suffixed(&mut self) -> Result<TypeNode, TypeSyntaxError> {
        let mut node = self.parse_primary()?;
        while self.peek() == Some(&Token::LBracket) {
            let open_offset = self.offset();
            self.pos += 1;
            self.close(&Token::LBracket, open_offset, "`]`")?;
            node = TypeNode::array_of(node);
        }
        Ok(node)
    }

    fn parse_primary(&mut self) -> Result<TypeNode, TypeSyntaxError> {
        let start = self.offset();
        match self.peek().cloned() {
            Some(Token::Star) => {
                self.pos += 1;
                Ok(TypeNode::All)
            }
            Some(Token::Str(value)) => {
                self.pos += 1;
                Ok(TypeNode::StringLiteral { value })
            }
            Some(Token::Number(value)) => {
                self.pos += 1;
                Ok(TypeNode::NumberLiteral { value })
            }
            Some(Token::LParen) => {
                self.pos += 1;
                self.enter()?;
                let inner = self.parse_union()?;
                self.close(&Token::LParen, start, "`)`")?;
                self.leave();
                Ok(TypeNode::group(inner))
            }
            Some(Token::LBrace) => {
                self.pos += 1;
                self.parse_record(start)
            }
            Some(Token::Ident(ident))
                if ident == "function" && self.peek_at(1) == Some(&Token::LParen) =>
            {
                self.pos += 2;
                self.parse_function(start)
            }
            Some(Token::Ident(_)) => {
                let name = self.parse_name()?;
                self.parse_generic_tail(name)
            }
            _ => Err(self.unexpected("a type")),
        }
    }

    fn parse_name(&mut self) -> Result<String, TypeSyntaxError> {
        let mut name = match self.bump() {
            Some(Token::Ident(ident)) => ident,
            _ => return Err(self.unexpected("a name")),
        };

        if is_namespace(&name) && self.peek() == Some(&Token::Colon) {
            match self.peek_at(1).cloned() {
                Some(Token::Ident(path)) => {
                    self.pos += 2;
                    name.push(':');
                    name.push_str(&path);
                }
                Some(Token::ScopedPath(path)) if name == "module" => {
                    self.pos += 2;
                    name.push(':');
                    name.push_str(&path);
                }
                _ => {}
            }
        }

        loop {
            let joiner = match (self.peek(), self.peek_at(1)) {
                (Some(Token::Dot), Some(Token::Ident(_))) => '.',
                (Some(Token::Hash), Some(Token::Ident(_))) => '#',
                (Some(Token::Tilde), Some(Token::Ident(_))) => '~',
                (Some(Token::Dot), Some(Token::LAngle)) => return Ok(name),
                (Some(Token::Dot | Token::Hash | Token::Tilde), _) => {
                    self.pos += 1;
                    return Err(self.unexpected("a name"));
                }
                _ => return Ok(name),
            };
            self.pos += 1;
            if let Some(Token::Ident(part)) = self.bump() {
                name.push(joiner);
                name.push_str(&part);
            }
        }
    }

    fn parse_generic_tail(&mut self, base: String) -> Result<TypeNode, TypeSyntaxError> {
        if self.peek() == Some(&Token::Dot) && self.peek_at(1) == Some(&Token::LAngle) {
            self.pos += 1;
        } else if self.peek() != Some(&Token::LAngle) {
            return Ok(TypeNode::Name { name: base });
        }

        let open_offset = self.offset();
        self.pos += 1;
        self.enter()?;
        let mut params = vec![self.parse_union()?];
        while self.eat(&Token::Comma) {
            params.push(self.parse_union()?);
        }
        self.close(&Token::LAngle, open_offset, "`,` or `>`")?;
        self.leave();
        Ok(TypeNode::Generic { base, params })
    }

    fn parse_record(&mut self, open_offset: usize) -> Result<TypeNode, TypeSyntaxError> {
        self.enter()?;
        let mut fields = Vec::new();
        let mut seen = HashSet::new();

        if self.eat(&Token::RBrace) {
            self.leave();
            return Ok(TypeNode::Record { fields });
        }

        loop {
            let key_offset = self.offset();
            let key = match self.peek().cloned() {
                Some(Token::Ident(key)) | Some(Token::Str(key)) | Some(Token::Number(key)) => key,
                None => {
                    return Err(TypeSyntaxError::UnbalancedBracket {
                        bracket: '{',
                        offset: open_offset,
                    })
                }
                Some(_) => return Err(TypeSyntaxError::MalformedRecordKey { offset: key_offset }),
            };
            self.pos += 1;

            let value = if self.eat(&Token::Colon) {
                Some(self.parse_union()?)
            } else {
                None
            };

            if !seen.insert(key.clone()) {
                return Err(TypeSyntaxError::DuplicateRecordKey { key });
            }
            fields.push(RecordField { key, value });

            if self.eat(&Token::Comma) {
                continue;
            }
            self.close(&Token::LBrace, open_offset, "`,` or `}`")?;
            break;
        }

        self.leave();
        Ok(TypeNode::Record { fields })
    }

    fn parse_function(&mut self, open_offset: usize) -> Result<TypeNode, TypeSyntaxError> {
        self.enter()?;
        let mut params = Vec::new();
        let mut this = None;
        let mut new = None;

        if !self.eat(&Token::RParen) {
            loop {
                match (self.peek().cloned(), self.peek_at(1)) {
                    (Some(Token::Ident(binding)), Some(Token::Colon))
                        if binding == "this" || binding == "new" =>
                    {
                        self.pos += 2;
                        let ty = Box::new(self.parse_union()?);
                        if binding == "this" {
                            this = Some(ty);
                        } else {
                            new = Some(ty);
                        }
                    }
                    _ => params.push(self.parse_function_param()?),
                }

                match self.peek() {
                    Some(Token::Comma) => self.pos += 1,
                    Some(Token::RParen) => {
                        self.pos += 1;
                        break;
                    }
                    None => return Err(TypeSyntaxError::UnterminatedFunction { offset: open_offset }),
                    Some(_) => return Err(self.unexpected("`,` or `)`")),
                }
            }
        }

        let result = if self.eat(&Token::Colon) {
            Some(Box::new(self.parse_postfix()?))
        } else {
            None
        };

        self.leave();
        Ok(TypeNode::Function {
            params,
            result,
            this,
            new,
        })
    }

    fn parse_function_param(&mut self) -> Result<FunctionParam, TypeSyntaxError> {
        // `...name:Type`
        if let (Some(Token::Ellipsis), Some(Token::Ident(name)), Some(Token::Colon)) =
            (self.peek(), self.peek_at(1).cloned(), self.peek_at(2))
        {
            self.pos += 3;
            let ty = self.parse_union()?;
            return Ok(FunctionParam {
                name: Some(name),
                ty: TypeNode::variadic(ty),
            });
        }

        // `name:Type`
        if let (Some(Token::Ident(name)), Some(Token::Colon)) = (self.peek().cloned(), self.peek_at(1)) {
            if !is_namespace(&name) {
                self.pos += 2;
                let ty = self.parse_union()?;
                return Ok(FunctionParam {
                    name: Some(name),
                    ty,
                });
            }
        }

        let ty = self.parse_union()?;
        Ok(FunctionParam { name: None, ty })
    }
}

/// Prefixes that open a namepath (`module:foo/bar`, `external:jQuery`)
fn is_namespace(name: &str) -> bool {
    matches!(name, "module" | "external")
}
