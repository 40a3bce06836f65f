//! Parse the format specifications used for SWIFT ISO 15022 message fields
//! (e.g. `:4!c//[N]3!a15d`) and compile them into regular expressions.
//!
//! ```
//! let pattern = iso15022_format::compile_pattern("4!c//35x").unwrap();
//! assert!(pattern.starts_with("^[A-Z0-9]{4,4}//"));
//!
//! assert!(iso15022_format::validate("4!c//35x", "TYPE//Code").unwrap());
//! assert_eq!(iso15022_format::extract("(4!c)//35x", "TYPE//Code").unwrap().as_deref(), Some("TYPE"));
//! ```
extern crate pest;
#[macro_use]
extern crate pest_derive;
pub mod fmt_error;
pub mod tokenize;
pub mod format_specs;
pub mod pattern;
pub mod matcher;

pub use fmt_error::{FmtError, FmtResult};
pub use format_specs::{CharSet, FieldSpec, FormatNode, FormatSpec, GroupKind};
pub use matcher::{extract, validate, FormatMatcher};
pub use pattern::compile_pattern;
pub use tokenize::{tokenize, Token, TokenKind};

/// Tokenize and parse a format specification, see [`FormatSpec::parse`].
pub fn parse(spec: &str) -> FmtResult<FormatSpec> {
    FormatSpec::parse(spec)
}
