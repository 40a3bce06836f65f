//! Check values against a format specification and extract parts of them.
//!
//! The quickest way is the free functions [`validate`] and [`extract`]:
//!
//! ```
//! use iso15022_format::matcher::{extract, validate};
//!
//! assert!(validate("4!c//35x", "TYPE//Code").unwrap());
//! assert_eq!(extract("(4!c)//35x", "TYPE//Code").unwrap().as_deref(), Some("TYPE"));
//! ```
//!
//! Both compile the specification on every call. To check many values against
//! the same specification, build a [`FormatMatcher`] once and reuse it.
use regex::Regex;

use crate::fmt_error::{FmtError, FmtResult};
use crate::format_specs::FormatSpec;
use crate::pattern::compile;

/// A format specification compiled to a regular expression
#[derive(Debug, Clone)]
pub struct FormatMatcher {
    spec: FormatSpec,
    regex: Regex,
}

impl FormatMatcher {
    /// Parse and compile a format specification string.
    pub fn new(spec: &str) -> FmtResult<Self> {
        Self::from_spec(FormatSpec::parse(spec)?)
    }

    /// Compile an already parsed format specification.
    pub fn from_spec(spec: FormatSpec) -> FmtResult<Self> {
        let pattern = compile(&spec)?;
        let regex = Regex::new(&pattern)
            .map_err(|e| FmtError::from_regex(e, pattern.clone()))?;

        Ok(Self { spec, regex })
    }

    /// The specification this matcher was built from
    pub fn format_spec(&self) -> &FormatSpec {
        &self.spec
    }

    /// The anchored pattern text
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Number of capturing groups in the compiled pattern
    pub fn capture_count(&self) -> usize {
        // Group 0 is the whole match
        self.regex.captures_len() - 1
    }

    /// `true` if all of `value` matches the specification
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    /// Return the part of `value` selected by the specification.
    ///
    /// With no capture group, that is the whole value; with one, it is the
    /// text the group matched. Returns `Ok(None)` if `value` does not match or
    /// the capture group is inside an optional group that matched nothing.
    /// A matching value checked against a specification with more than one
    /// capture group returns [`FmtError::MultipleCaptureGroups`].
    pub fn extract<'v>(&self, value: &'v str) -> FmtResult<Option<&'v str>> {
        let captures = match self.regex.captures(value) {
            Some(c) => c,
            None => {
                log::debug!("'{value}' does not match format '{}'", self.spec);
                return Ok(None);
            }
        };

        let count = self.capture_count();
        if count > 1 {
            return Err(FmtError::MultipleCaptureGroups { count });
        }

        if count == 0 {
            Ok(Some(value))
        } else {
            Ok(captures.get(1).map(|m| m.as_str()))
        }
    }
}

/// Check whether all of `value` matches the format specification `spec`.
pub fn validate(spec: &str, value: &str) -> FmtResult<bool> {
    Ok(FormatMatcher::new(spec)?.is_match(value))
}

/// Extract the part of `value` selected by `spec`, see [`FormatMatcher::extract`].
pub fn extract(spec: &str, value: &str) -> FmtResult<Option<String>> {
    let matcher = FormatMatcher::new(spec)?;
    let sub_value = matcher.extract(value)?;
    Ok(sub_value.map(|s| s.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() -> FmtResult<()> {
        let cases = [
            ("4!c//35x", "TYPE//Code", true),
            ("[4!c]//35x", "TYPE//Code", true),
            ("[4!c]//35x", "//Code", true),
            ("4!c//[35x]", "TYPE//", true),
            ("4!c//35x", "TYPE/Code", false),
            ("4!c//35x", "type/Code", false),
            ("4!c//35x", "TYP//Code", false),
            ("4c//35x", "TYP//Code", true),
            ("3!a15d", "EUR1234,56", true),
            ("3!a15d", "EUR1234.56", false),
        ];

        for (spec, value, expected) in cases {
            assert_eq!(validate(spec, value)?, expected, "Validating '{value}' against '{spec}' failed");
        }
        Ok(())
    }

    #[test]
    fn test_extract() -> FmtResult<()> {
        let cases = [
            ("(4!c)//35x", "TYPE//Code", Some("TYPE")),
            ("(4!c)//[35x]", "TYPE//", Some("TYPE")),
            ("[4!c]//(35x)", "//Description", Some("Description")),
            ("4!c//35x", "TYPE//Code", Some("TYPE//Code")),
            ("4!c//<35x>", "TYPE//Code", Some("Code")),
            ("4!c//35x", "TYP//Code", None),
            ("(4!c)//35x", "TYP//Code", None),
        ];

        for (spec, value, expected) in cases {
            let v = extract(spec, value)?;
            assert_eq!(v.as_deref(), expected, "Extracting from '{value}' with '{spec}' failed");
        }
        Ok(())
    }

    #[test]
    fn test_unmatched_optional_capture() -> FmtResult<()> {
        let m = FormatMatcher::new("4!c[//(35x)]")?;
        assert_eq!(m.extract("TYPE")?, None);
        assert_eq!(m.extract("TYPE//Code")?, Some("Code"));
        Ok(())
    }

    #[test]
    fn test_multiple_capture_groups() {
        let e = extract("(4!c)//([35x])", "TYPE//value");
        assert_eq!(e, Err(FmtError::MultipleCaptureGroups { count: 2 }));
    }

    #[test]
    fn test_multiple_capture_groups_without_match() -> FmtResult<()> {
        let v = extract("(4!c)//(35x)", "nope")?;
        assert_eq!(v, None, "A value that does not match should extract nothing");
        Ok(())
    }

    #[test]
    fn test_validate_allows_multiple_groups() -> FmtResult<()> {
        assert!(validate("(4!c)//(35x)", "TYPE//Code")?);
        Ok(())
    }

    #[test]
    fn test_nested_capture_is_an_error() {
        let e = extract("4!c//(35x([35x]))", "TYPE//Code");
        assert!(matches!(e, Err(FmtError::NestedCaptureGroup { .. })), "Nested capture group was accepted");
    }

    #[test]
    fn test_invalid_regex() {
        let e = FormatMatcher::new("0c");
        assert!(matches!(e, Err(FmtError::InvalidPattern { .. })), "'0c' compiled to a valid regex");
    }

    #[test]
    fn test_matcher_reuse() -> FmtResult<()> {
        let m = FormatMatcher::new(":4!c//(3!a)15d")?;
        assert_eq!(m.pattern(), "^:[A-Z0-9]{4,4}//([A-Z]{3,3})[0-9,]{1,15}$");
        assert_eq!(m.capture_count(), 1);
        assert_eq!(m.format_spec().to_string(), ":4!c//(3!a)15d");

        assert_eq!(m.extract(":SETT//EUR100,")?, Some("EUR"));
        assert_eq!(m.extract(":SETT//USD5")?, Some("USD"));
        assert!(!m.is_match(":SETT//usd5"));
        Ok(())
    }
}
