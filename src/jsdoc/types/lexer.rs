//! Token definitions for type literals
//!
//! Tokens are produced by the logos derive macro. Whitespace is skipped, so it
//! only matters as a separator between adjacent identifiers.

use crate::jsdoc::error::TypeSyntaxError;
use logos::Logos;
use std::fmt;
use std::ops::Range;

/// All tokens that can appear inside a type literal
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    #[token("|")]
    Pipe,
    #[token("=")]
    Equals,
    #[token("?")]
    Question,
    #[token("!")]
    Bang,
    #[token("...")]
    Ellipsis,
    #[token(".")]
    Dot,
    #[token("#")]
    Hash,
    #[token("~")]
    Tilde,
    #[token("<")]
    LAngle,
    #[token(">")]
    RAngle,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token("*")]
    Star,

    // Identifiers may carry `/` and `-` segments for module paths (`foo/bar-baz`)
    #[regex(r"[\p{L}_$][\p{L}\p{N}_$]*([/\-][\p{L}\p{N}_$]+)*", |lex| lex.slice().to_owned())]
    Ident(String),

    /// Scoped package path, only valid after `module:` (`@scope/pkg`)
    #[regex(r"@[\p{L}\p{N}_$\-]+(/[\p{L}\p{N}_$\-]+)*", |lex| lex.slice().to_owned())]
    ScopedPath(String),

    #[regex(r"-?[0-9]+(\.[0-9]+)?", |lex| lex.slice().to_owned())]
    Number(String),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| unquote(lex.slice()))]
    #[regex(r#"'([^'\\]|\\.)*'"#, |lex| unquote(lex.slice()))]
    Str(String),
}

impl Token {
    /// The closing bracket matching an opening one
    pub fn closer(&self) -> Option<Token> {
        match self {
            Token::LAngle => Some(Token::RAngle),
            Token::LBracket => Some(Token::RBracket),
            Token::LBrace => Some(Token::RBrace),
            Token::LParen => Some(Token::RParen),
            _ => None,
        }
    }

    pub fn is_closer(&self) -> bool {
        matches!(
            self,
            Token::RAngle | Token::RBracket | Token::RBrace | Token::RParen
        )
    }

    /// Tokens that may directly follow a complete type. A lone `?` or `...`
    /// followed by one of these stands on its own.
    pub fn ends_type(&self) -> bool {
        matches!(
            self,
            Token::Comma
                | Token::RParen
                | Token::RAngle
                | Token::RBrace
                | Token::RBracket
                | Token::Pipe
                | Token::Equals
                | Token::Colon
        )
    }

    pub fn as_char(&self) -> Option<char> {
        let ch = match self {
            Token::Pipe => '|',
            Token::Equals => '=',
            Token::Question => '?',
            Token::Bang => '!',
            Token::Dot => '.',
            Token::Hash => '#',
            Token::Tilde => '~',
            Token::LAngle => '<',
            Token::RAngle => '>',
            Token::LBracket => '[',
            Token::RBracket => ']',
            Token::LBrace => '{',
            Token::RBrace => '}',
            Token::LParen => '(',
            Token::RParen => ')',
            Token::Colon => ':',
            Token::Comma => ',',
            Token::Star => '*',
            _ => return None,
        };
        Some(ch)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ellipsis => f.write_str("..."),
            Token::Ident(s) | Token::ScopedPath(s) | Token::Number(s) => f.write_str(s),
            Token::Str(s) => write!(f, "{:?}", s),
            other => match other.as_char() {
                Some(ch) => write!(f, "{}", ch),
                None => Ok(()),
            },
        }
    }
}

/// Token stream with byte ranges into the literal
pub type TokenStream = Vec<(Token, Range<usize>)>;

/// Tokenize a type literal.
pub fn tokenize(source: &str) -> Result<TokenStream, TypeSyntaxError> {
    let mut tokens = Vec::new();
    for (result, span) in Token::lexer(source).spanned() {
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => return Err(TypeSyntaxError::InvalidCharacter { offset: span.start }),
        }
    }
    Ok(tokens)
}

fn unquote(slice: &str) -> String {
    let inner = &slice[1..slice.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|(token, _)| token)
            .collect()
    }

    #[test]
    fn test_ellipsis_beats_dot() {
        assert_eq!(
            kinds("...number"),
            vec![Token::Ellipsis, Token::Ident("number".to_string())]
        );
    }

    #[test]
    fn test_dot_generic() {
        assert_eq!(
            kinds("Array.<string>"),
            vec![
                Token::Ident("Array".to_string()),
                Token::Dot,
                Token::LAngle,
                Token::Ident("string".to_string()),
                Token::RAngle,
            ]
        );
    }

    #[test]
    fn test_whitespace_is_skipped() {
        assert_eq!(kinds(" a |\n b "), kinds("a|b"));
    }

    #[test]
    fn test_module_path_is_one_ident() {
        assert_eq!(
            kinds("module:foo/bar-baz"),
            vec![
                Token::Ident("module".to_string()),
                Token::Colon,
                Token::Ident("foo/bar-baz".to_string()),
            ]
        );
    }

    #[test]
    fn test_scoped_package_path() {
        assert_eq!(
            kinds("module:@scope/pkg-name"),
            vec![
                Token::Ident("module".to_string()),
                Token::Colon,
                Token::ScopedPath("@scope/pkg-name".to_string()),
            ]
        );
    }

    #[test]
    fn test_identifiers_accept_unicode_letters() {
        assert_eq!(kinds("Ünïcode"), vec![Token::Ident("Ünïcode".to_string())]);
        assert_eq!(kinds("名前2"), vec![Token::Ident("名前2".to_string())]);
    }

    #[test]
    fn test_string_literals_unescape() {
        assert_eq!(kinds(r#"'it\'s'"#), vec![Token::Str("it's".to_string())]);
        assert_eq!(kinds(r#""a""#), vec![Token::Str("a".to_string())]);
    }

    #[test]
    fn test_invalid_character_reports_offset() {
        assert_eq!(
            tokenize("a & b"),
            Err(TypeSyntaxError::InvalidCharacter { offset: 2 })
        );
    }
}
