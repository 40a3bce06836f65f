//! Split an ISO 15022 format specification into tokens.
//!
//! Runs of digits become a single [`TokenKind::Integer`], runs of the date
//! letters `Y`, `M`, `D`, `H` and `S` become a single [`TokenKind::DateRun`],
//! and every other character is a token of its own:
//!
//! ```
//! # use iso15022_format::tokenize::{tokenize, TokenKind};
//! let kinds: Vec<_> = tokenize(":4!c//35x").into_iter().map(|t| t.kind).collect();
//! assert_eq!(kinds[1], TokenKind::Integer(4));
//! assert_eq!(kinds[6], TokenKind::Integer(35));
//! ```
//!
//! Tokenizing never fails. Whether the tokens make sense is decided by the
//! parser in [`crate::format_specs`].
use std::fmt::Display;

use pest::{Parser, iterators::Pair};

#[derive(Parser)]
#[grammar = "iso15022.pest"]
pub(crate) struct TokenParser;

/// What a token is, independent of where it was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind<'i> {
    /// A run of decimal digits, i.e. a length or repeat count.
    ///
    /// Runs too large for a `u32` saturate to `u32::MAX`.
    Integer(u32),

    /// A run of date/time placeholder letters, e.g. `YYYYMMDD`.
    DateRun(&'i str),

    /// One of `!`, `*`, `[`, `]`, `(`, `)`, `<` or `>`.
    Structural(char),

    /// The sign marker `N`.
    Sign,

    /// Any other single character.
    Literal(char),
}

/// A token along with the text it was made from and its byte offset in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'i> {
    pub kind: TokenKind<'i>,
    pub text: &'i str,
    pub offset: usize,
}

impl<'i> Token<'i> {
    /// `true` if this is the structural character `c`
    pub fn is_structural(&self, c: char) -> bool {
        self.kind == TokenKind::Structural(c)
    }

    /// `true` for a plain character that can continue a literal
    pub fn is_literal(&self) -> bool {
        matches!(self.kind, TokenKind::Literal(_))
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Split `input` into tokens, in input order.
///
/// Concatenating the `text` of the returned tokens gives back `input`.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let tree = match TokenParser::parse(Rule::tokens, input) {
        Ok(mut pairs) => pairs.next(),
        // `literal` matches any character
        Err(e) => unreachable!("token grammar rejected {input:?}: {e}"),
    };

    let tokens: Vec<_> = tree
        .into_iter()
        .flat_map(|pair| pair.into_inner())
        .filter_map(token_from_pair)
        .collect();

    log::trace!("tokenized {input:?} into {} tokens", tokens.len());
    tokens
}

fn token_from_pair(pair: Pair<'_, Rule>) -> Option<Token<'_>> {
    let text = pair.as_str();
    let offset = pair.as_span().start();
    let kind = match pair.as_rule() {
        Rule::integer => TokenKind::Integer(text.parse().unwrap_or(u32::MAX)),
        Rule::date_run => TokenKind::DateRun(text),
        Rule::structural => TokenKind::Structural(first_char(text)),
        Rule::sign => TokenKind::Sign,
        Rule::literal => TokenKind::Literal(first_char(text)),
        // End of input
        _ => return None,
    };

    Some(Token { kind, text, offset })
}

fn first_char(s: &str) -> char {
    s.chars().next().unwrap_or_default()
}
