//! Compile a [`FormatSpec`] into regular expression pattern text.
//!
//! ```
//! # use iso15022_format::pattern::compile_pattern;
//! let p = compile_pattern("(4!c)//[35x]").unwrap();
//! assert_eq!(p, "^([A-Z0-9]{4,4})//(?:[A-Za-z0-9/\\-?:().,'+ ]{1,35})?$");
//! ```
//!
//! Literal text is copied into the pattern as is, and date placeholders and
//! sign markers do not add anything to it.
use std::fmt::Write;

use crate::fmt_error::{FmtError, FmtResult};
use crate::format_specs::{CharSet, FieldSpec, FormatNode, FormatSpec, GroupKind};

impl CharSet {
    /// The regex character class matching one character of this set
    pub fn class(&self) -> &'static str {
        match self {
            CharSet::N => "[0-9]",
            CharSet::A => "[A-Z]",
            CharSet::C => "[A-Z0-9]",
            CharSet::X => r"[A-Za-z0-9/\-?:().,'+ ]",
            CharSet::E => "[ ]",
            CharSet::D => "[0-9,]",
        }
    }
}

/// Parse `spec` and compile it, see [`compile`].
pub fn compile_pattern(spec: &str) -> FmtResult<String> {
    compile(&FormatSpec::parse(spec)?)
}

/// Compile a parsed specification into a pattern anchored at both ends.
///
/// Optional groups become non-capturing `(?:...)?` groups; capture and
/// reformat groups become capturing groups. Returns
/// [`FmtError::NestedCaptureGroup`] if a capture group directly contains
/// another one, which [`FormatSpec::parse`] never produces but a hand-built
/// spec can. An optional group starts a fresh check for its children.
pub fn compile(spec: &FormatSpec) -> FmtResult<String> {
    let mut pattern = String::from("^");
    compile_nodes(spec.nodes(), false, &mut pattern)?;
    pattern.push('$');

    log::debug!("compiled format '{spec}' to pattern '{pattern}'");
    Ok(pattern)
}

fn compile_nodes(nodes: &[FormatNode], in_capture: bool, out: &mut String) -> FmtResult<()> {
    for node in nodes {
        match node {
            FormatNode::Literal(text) => out.push_str(text),
            FormatNode::Field(field) => push_field(field, out),
            FormatNode::Date(_) | FormatNode::Sign => {},
            FormatNode::Group { kind, children } => push_group(*kind, children, in_capture, out)?,
        }
    }

    Ok(())
}

fn push_field(field: &FieldSpec, out: &mut String) {
    // The repeat count does not widen the pattern
    out.push_str(field.charset.class());
    // Writing to a `String` cannot fail
    let _ = write!(out, "{{{},{}}}", field.min, field.max);
}

fn push_group(kind: GroupKind, children: &[FormatNode], in_capture: bool, out: &mut String) -> FmtResult<()> {
    match kind {
        GroupKind::Optional => {
            out.push_str("(?:");
            compile_nodes(children, false, out)?;
            out.push_str(")?");
        },
        GroupKind::Capture | GroupKind::Reformat => {
            if in_capture {
                return Err(FmtError::NestedCaptureGroup { opener: kind.opener(), offset: None });
            }
            out.push('(');
            compile_nodes(children, true, out)?;
            out.push(')');
        },
    }

    Ok(())
}
