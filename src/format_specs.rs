//! Represent ISO 15022 format specifications as Rust types.
//!
//! The first step in working with a format specification such as "4!c//35x"
//! is to parse it into a [`FormatSpec`] with its `parse` method:
//!
//! ```
//! # use iso15022_format::format_specs::FormatSpec;
//! let fs = FormatSpec::parse(":4!c//[N]3!a15d").unwrap();
//! assert_eq!(fs.to_string(), ":4!c//[N]3!a15d");
//! ```
//!
//! From there, this can be compiled to a [pattern](crate::pattern) or you can
//! inspect the nodes directly with the `nodes`, `into_nodes` and `iter_fields`
//! methods on [`FormatSpec`].
use std::fmt::Display;

use itertools::Itertools;

use crate::fmt_error::{FmtError, FmtResult};
use crate::tokenize::{tokenize, Token, TokenKind};

/// Which characters a field may contain.
///
/// - `N`: digits,
/// - `A`: upper case letters,
/// - `C`: upper case letters and digits,
/// - `X`: the SWIFT character set (letters, digits, space and some punctuation),
/// - `E`: spaces,
/// - `D`: digits and the decimal comma.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CharSet {
    N,
    A,
    C,
    X,
    E,
    D
}

impl Display for CharSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CharSet::N => "n",
            CharSet::A => "a",
            CharSet::C => "c",
            CharSet::X => "x",
            CharSet::E => "e",
            CharSet::D => "d",
        };

        write!(f, "{s}")
    }
}

impl CharSet {
    /// Look up the character set for a lower case field type letter.
    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'n' => Some(CharSet::N),
            'a' => Some(CharSet::A),
            'c' => Some(CharSet::C),
            'x' => Some(CharSet::X),
            'e' => Some(CharSet::E),
            'd' => Some(CharSet::D),
            _ => None
        }
    }
}

/// The three kinds of group.
///
/// Only optional groups are part of the ISO 15022 standard; capture and
/// reformat groups mark the part of a value to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GroupKind {
    /// `[...]`
    Optional,
    /// `(...)`
    Capture,
    /// `<...>`
    Reformat
}

impl GroupKind {
    fn from_opener(c: char) -> Option<Self> {
        match c {
            '[' => Some(GroupKind::Optional),
            '(' => Some(GroupKind::Capture),
            '<' => Some(GroupKind::Reformat),
            _ => None
        }
    }

    /// The bracket that opens this kind of group
    pub fn opener(&self) -> char {
        match self {
            GroupKind::Optional => '[',
            GroupKind::Capture => '(',
            GroupKind::Reformat => '<',
        }
    }

    /// The bracket that closes this kind of group
    pub fn closer(&self) -> char {
        match self {
            GroupKind::Optional => ']',
            GroupKind::Capture => ')',
            GroupKind::Reformat => '>',
        }
    }

    /// `true` for groups whose matched text is extracted, i.e. capture and reformat groups
    pub fn is_capturing(&self) -> bool {
        !matches!(self, GroupKind::Optional)
    }
}

fn is_closer(c: char) -> bool {
    matches!(c, ']' | ')' | '>')
}


/// A length- and character set-bounded field, e.g. `4!c` or `35x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldSpec {
    /// Minimum length; equal to `max` for exact-length (`!`) fields, 1 otherwise.
    pub min: u32,
    /// Maximum length (per repetition for repeated fields).
    pub max: u32,
    pub charset: CharSet,
    /// Number of repetitions given with `*`, e.g. 4 in `4*35x`. This does not
    /// change the generated pattern.
    pub repeat: u32,
}

impl FieldSpec {
    /// `true` if the field only accepts one length, e.g. `4!c`.
    pub fn is_fixed_length(&self) -> bool {
        self.min == self.max
    }
}

impl Display for FieldSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let FieldSpec { max, charset, repeat, .. } = self;
        if *repeat > 1 {
            write!(f, "{repeat}*{max}{charset}")
        } else if self.is_fixed_length() && *max != 1 {
            // `1!x` and `1x` are the same field
            write!(f, "{max}!{charset}")
        } else {
            write!(f, "{max}{charset}")
        }
    }
}


/// One element of a format specification.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FormatNode {
    /// Text that must appear verbatim, e.g. the `//` in `4!c//35x`.
    Literal(String),

    /// A typed field.
    Field(FieldSpec),

    /// A date/time placeholder such as `YYYYMMDD`. The letters are kept
    /// as written and not checked.
    Date(String),

    /// The optional credit/debit sign marker `N`.
    Sign,

    /// A group of nodes; see [`GroupKind`].
    Group{ kind: GroupKind, children: Vec<FormatNode> },
}

impl FormatNode {
    /// Number of capture and reformat groups in this node, including itself.
    pub fn capture_count(&self) -> usize {
        match self {
            FormatNode::Group { kind, children } => {
                let inner: usize = children.iter().map(|n| n.capture_count()).sum();
                inner + usize::from(kind.is_capturing())
            },
            FormatNode::Literal(_) | FormatNode::Field(_) | FormatNode::Date(_) | FormatNode::Sign => 0,
        }
    }
}

impl Display for FormatNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatNode::Literal(text) => write!(f, "{text}"),
            FormatNode::Field(field) => write!(f, "{field}"),
            FormatNode::Date(run) => write!(f, "{run}"),
            FormatNode::Sign => write!(f, "N"),
            FormatNode::Group { kind, children } => {
                write!(f, "{}{}{}", kind.opener(), children.iter().join(""), kind.closer())
            },
        }
    }
}


/// An iterator over the fields of a format specification, including those inside groups.
pub struct FieldIter<'i> {
    stack: Vec<std::slice::Iter<'i, FormatNode>>,
}

impl<'i> Iterator for FieldIter<'i> {
    type Item = &'i FieldSpec;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node = match self.stack.last_mut()?.next() {
                Some(node) => node,
                None => {
                    self.stack.pop();
                    continue;
                }
            };

            match node {
                FormatNode::Field(field) => return Some(field),
                FormatNode::Group { children, .. } => self.stack.push(children.iter()),
                _ => {}
            }
        }
    }
}


/// A parsed format specification
///
/// Generally the first step in handling a format specification will be to
/// pass it to this struct's `parse` method:
///
/// ```
/// # use iso15022_format::format_specs::FormatSpec;
/// let fs = FormatSpec::parse("4!c//35x").unwrap();
/// assert_eq!(fs.nodes().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormatSpec {
    #[cfg_attr(feature = "serde", serde(rename = "format"))]
    pub(crate) nodes: Vec<FormatNode>
}

impl FormatSpec {
    /// Parse a format specification string and return a `FormatSpec` instance.
    ///
    /// Returns an error for an invalid character set, an unbalanced or
    /// mismatched bracket, or a capture group inside another capture group.
    pub fn parse(spec: &str) -> FmtResult<Self> {
        Self::from_tokens(&tokenize(spec))
    }

    /// Parse already tokenized input, see [`tokenize`].
    pub fn from_tokens(tokens: &[Token]) -> FmtResult<Self> {
        let (nodes, index) = parse_sequence(tokens, 0, false)?;

        // The sequence only stops early at a closing bracket
        if let Some(token) = tokens.get(index) {
            let found = match token.kind {
                TokenKind::Structural(c) => c,
                _ => unreachable!("sequence stopped on a non-closing token"),
            };
            return Err(FmtError::UnexpectedGroupEnd { found, offset: token.offset });
        }

        Ok(Self { nodes })
    }

    /// The top level nodes, in order
    pub fn nodes(&self) -> &[FormatNode] {
        &self.nodes
    }

    /// Consume the `FormatSpec` instance and return the inner `Vec<FormatNode>`.
    pub fn into_nodes(self) -> Vec<FormatNode> {
        self.nodes
    }

    /// Iterate over all fields, descending into groups
    pub fn iter_fields(&self) -> FieldIter<'_> {
        FieldIter { stack: vec![self.nodes.iter()] }
    }

    /// Number of capture and reformat groups at any depth
    pub fn capture_count(&self) -> usize {
        self.nodes.iter().map(|n| n.capture_count()).sum()
    }
}

impl Display for FormatSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.nodes.iter().join(""))
    }
}

impl From<Vec<FormatNode>> for FormatSpec {
    /// Wrap nodes built by hand. Nothing is checked until the spec is compiled.
    fn from(nodes: Vec<FormatNode>) -> Self {
        Self { nodes }
    }
}

impl std::str::FromStr for FormatSpec {
    type Err = FmtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parse nodes until the end of input or a closing bracket, which is left for
/// the caller. Returns the nodes and the index of the first unconsumed token.
fn parse_sequence(tokens: &[Token], mut index: usize, in_capture: bool) -> FmtResult<(Vec<FormatNode>, usize)> {
    let mut nodes = vec![];

    while let Some(token) = tokens.get(index) {
        let (node, next) = match token.kind {
            TokenKind::Structural(c) if is_closer(c) => break,
            TokenKind::Integer(value) => parse_field(value, tokens, index)?,
            TokenKind::DateRun(run) => (FormatNode::Date(run.to_owned()), index + 1),
            TokenKind::Sign => (FormatNode::Sign, index + 1),
            TokenKind::Structural(c) => match GroupKind::from_opener(c) {
                Some(kind) => parse_group(kind, tokens, index, in_capture)?,
                // A stray `!` or `*`
                None => parse_literal(tokens, index),
            },
            TokenKind::Literal(_) => parse_literal(tokens, index),
        };

        nodes.push(node);
        index = next;
    }

    Ok((nodes, index))
}

/// Parse a group whose opening bracket is at `index`.
fn parse_group(kind: GroupKind, tokens: &[Token], index: usize, in_capture: bool) -> FmtResult<(FormatNode, usize)> {
    let opener = &tokens[index];
    if kind.is_capturing() && in_capture {
        return Err(FmtError::NestedCaptureGroup { opener: kind.opener(), offset: Some(opener.offset) });
    }

    let (children, end) = parse_sequence(tokens, index + 1, in_capture || kind.is_capturing())?;

    match tokens.get(end) {
        Some(t) if t.is_structural(kind.closer()) => {
            Ok((FormatNode::Group { kind, children }, end + 1))
        },
        _ => Err(FmtError::UnclosedGroup { expected: kind.closer(), offset: opener.offset }),
    }
}

/// Parse a field whose length `value` is the token at `index`, e.g. `3!a`, `15d` or `4*35x`.
fn parse_field(value: u32, tokens: &[Token], index: usize) -> FmtResult<(FormatNode, usize)> {
    let (min, max, repeat, index) = parse_length(value, tokens, index)?;

    let type_token = tokens.get(index + 1)
        .ok_or_else(|| FmtError::MissingCharacterSet { offset: tokens[index].offset + tokens[index].text.len() })?;
    let charset = charset_from_token(type_token)?;

    let field = FieldSpec { min, max, charset, repeat };
    Ok((FormatNode::Field(field), index + 2))
}

/// Returns `(min, max, repeat, index of the last length token)`.
fn parse_length(value: u32, tokens: &[Token], index: usize) -> FmtResult<(u32, u32, u32, usize)> {
    match tokens.get(index + 1).map(|t| t.kind) {
        Some(TokenKind::Structural('!')) => Ok((value, value, 1, index + 1)),
        Some(TokenKind::Structural('*')) => {
            match tokens.get(index + 2).map(|t| t.kind) {
                Some(TokenKind::Integer(max)) => Ok((1, max, value, index + 2)),
                _ => Err(FmtError::MissingRepeatLength { offset: tokens[index + 1].offset }),
            }
        },
        _ => Ok((1, value, 1, index)),
    }
}

fn charset_from_token(token: &Token) -> FmtResult<CharSet> {
    let mut chars = token.text.chars();
    let letter = match (chars.next(), chars.next()) {
        (Some(c), None) => CharSet::from_letter(c),
        _ => None,
    };

    letter.ok_or_else(|| FmtError::InvalidCharacterSet { found: token.text.to_owned(), offset: token.offset })
}

/// Parse a literal starting at `index`: the token there plus every plain character after it.
fn parse_literal(tokens: &[Token], index: usize) -> (FormatNode, usize) {
    let end = tokens[index + 1..]
        .iter()
        .position(|t| !t.is_literal())
        .map(|n| index + 1 + n)
        .unwrap_or(tokens.len());

    let text: String = tokens[index..end].iter().map(|t| t.text).collect();
    (FormatNode::Literal(text), end)
}
