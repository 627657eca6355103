//! Literal and regular-expression substitution over a block of text.
//!
//! The literal pass runs first and replaces every occurrence verbatim. The regex pass runs on its
//! output, honouring the user's flags: without `g` only the first match is replaced.

use std::borrow::Cow;

use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

use crate::domain::errors::DomainError;
use crate::domain::model::Settings;

/// Result of running both passes over one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub text: String,
    pub literal_replacements: usize,
    pub regex_replacements: usize,
}

impl Substitution {
    pub fn total(&self) -> usize {
        self.literal_replacements + self.regex_replacements
    }
}

/// Regex flags parsed from the user's flag string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegexFlags {
    pub global: bool,
    pub case_insensitive: bool,
    pub multi_line: bool,
    pub dot_matches_new_line: bool,
    pub ignore_whitespace: bool,
    pub swap_greed: bool,
}

impl RegexFlags {
    /// Parse a flag string such as `"gmi"`. Unknown or repeated flags are rejected.
    pub fn parse(flags: &str) -> Result<Self, String> {
        let mut parsed = Self::default();
        let mut seen = String::new();
        for flag in flags.chars() {
            if seen.contains(flag) {
                return Err(format!("duplicate flag '{flag}'"));
            }
            seen.push(flag);
            match flag {
                'g' => parsed.global = true,
                'i' => parsed.case_insensitive = true,
                'm' => parsed.multi_line = true,
                's' => parsed.dot_matches_new_line = true,
                'x' => parsed.ignore_whitespace = true,
                'U' => parsed.swap_greed = true,
                // Unicode mode is always on.
                'u' => {}
                other => return Err(format!("unsupported flag '{other}'")),
            }
        }
        Ok(parsed)
    }
}

/// Compile `pattern` with `flags`, reporting failures as [`DomainError::PatternCompile`].
pub fn compile(pattern: &str, flags: &str) -> Result<(Regex, RegexFlags), DomainError> {
    let fail = |reason: String| DomainError::PatternCompile {
        pattern: pattern.to_owned(),
        flags: flags.to_owned(),
        reason,
    };

    let parsed = RegexFlags::parse(flags).map_err(fail)?;
    let regex = RegexBuilder::new(pattern)
        .case_insensitive(parsed.case_insensitive)
        .multi_line(parsed.multi_line)
        .dot_matches_new_line(parsed.dot_matches_new_line)
        .ignore_whitespace(parsed.ignore_whitespace)
        .swap_greed(parsed.swap_greed)
        .build()
        .map_err(|err| fail(err.to_string()))?;
    Ok((regex, parsed))
}

/// Apply the configured passes and return only the transformed text.
pub fn apply(text: &str, settings: &Settings) -> Result<String, DomainError> {
    substitute(text, settings).map(|result| result.text)
}

/// Apply the configured passes, counting replacements made by each.
///
/// The pattern is compiled before any text is touched, so an invalid pattern never yields a
/// partially substituted result.
pub fn substitute(text: &str, settings: &Settings) -> Result<Substitution, DomainError> {
    let compiled = if settings.regex_find.is_empty() {
        None
    } else {
        match compile(&settings.regex_find, &settings.regex_flags) {
            Ok(compiled) => Some(compiled),
            Err(err) => {
                warn!(error = %err, "regex pass aborted");
                return Err(err);
            }
        }
    };

    let (text, literal_replacements) =
        replace_literal(text, &settings.literal_find, &settings.literal_replace);

    let (text, regex_replacements) = match &compiled {
        Some((regex, flags)) => {
            let (replaced, count) =
                replace_regex(&text, regex, flags.global, &settings.regex_replace);
            (Cow::Owned(replaced), count)
        }
        None => (text, 0),
    };

    debug!(literal_replacements, regex_replacements, "substitution finished");
    Ok(Substitution {
        text: text.into_owned(),
        literal_replacements,
        regex_replacements,
    })
}

fn replace_literal<'a>(text: &'a str, find: &str, replace: &str) -> (Cow<'a, str>, usize) {
    if find.is_empty() {
        return (Cow::Borrowed(text), 0);
    }
    let count = text.matches(find).count();
    if count == 0 {
        return (Cow::Borrowed(text), 0);
    }
    (Cow::Owned(text.replace(find, replace)), count)
}

fn replace_regex(text: &str, regex: &Regex, global: bool, replacement: &str) -> (String, usize) {
    let count = if global {
        regex.find_iter(text).count()
    } else {
        usize::from(regex.is_match(text))
    };
    let replaced = if global {
        regex.replace_all(text, replacement)
    } else {
        regex.replace(text, replacement)
    };
    (replaced.into_owned(), count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(literal: (&str, &str), regex: (&str, &str, &str)) -> Settings {
        Settings {
            literal_find: literal.0.into(),
            literal_replace: literal.1.into(),
            regex_find: regex.0.into(),
            regex_flags: regex.1.into(),
            regex_replace: regex.2.into(),
        }
    }

    #[test]
    fn empty_patterns_are_identity() {
        let config = settings(("", "ignored"), ("", "g", "ignored"));
        for text in ["", "plain", "multi\nline $1 text"] {
            assert_eq!(apply(text, &config).unwrap(), text);
        }
    }

    #[test]
    fn literal_pass_replaces_every_occurrence() {
        let config = settings(("aaa", "x"), ("", "", ""));
        let result = substitute("aaa bbb aaa", &config).unwrap();
        assert_eq!(result.text, "x bbb x");
        assert_eq!(result.literal_replacements, 2);
        assert_eq!(result.regex_replacements, 0);
    }

    #[test]
    fn literal_replacement_is_not_expanded() {
        let config = settings(("name", "$1"), ("", "", ""));
        assert_eq!(apply("name: name", &config).unwrap(), "$1: $1");
    }

    #[test]
    fn literal_matches_do_not_overlap() {
        let config = settings(("aa", "b"), ("", "", ""));
        assert_eq!(apply("aaaaa", &config).unwrap(), "bba");
    }

    #[test]
    fn regex_with_global_swaps_groups() {
        let config = settings(("", ""), (r"(\w+)\s(\w+)", "g", "$2, $1"));
        assert_eq!(apply("John Smith", &config).unwrap(), "Smith, John");
    }

    #[test]
    fn regex_without_global_replaces_first_match_only() {
        let config = settings(("", ""), ("o", "", "0"));
        let result = substitute("foo boo", &config).unwrap();
        assert_eq!(result.text, "f0o boo");
        assert_eq!(result.regex_replacements, 1);
    }

    #[test]
    fn regex_with_global_replaces_all_matches() {
        let config = settings(("", ""), ("o", "g", "0"));
        let result = substitute("foo boo", &config).unwrap();
        assert_eq!(result.text, "f00 b00");
        assert_eq!(result.regex_replacements, 4);
    }

    #[test]
    fn regex_runs_on_literal_output() {
        let config = settings(("cat", "dog"), ("dog", "g", "wolf"));
        assert_eq!(apply("cat and dog", &config).unwrap(), "wolf and wolf");
    }

    #[test]
    fn case_insensitive_flag() {
        let config = settings(("", ""), ("hello", "gi", "bye"));
        assert_eq!(apply("Hello HELLO", &config).unwrap(), "bye bye");
    }

    #[test]
    fn multi_line_flag_anchors_each_line() {
        let text = "one\ntwo";
        let anchored = settings(("", ""), ("^", "gm", "- "));
        assert_eq!(apply(text, &anchored).unwrap(), "- one\n- two");

        let whole = settings(("", ""), ("^", "g", "- "));
        assert_eq!(apply(text, &whole).unwrap(), "- one\ntwo");
    }

    #[test]
    fn no_match_leaves_text_alone() {
        let config = settings(("zzz", "y"), ("q+", "g", "r"));
        let result = substitute("abc", &config).unwrap();
        assert_eq!(result.text, "abc");
        assert_eq!(result.total(), 0);
    }

    #[test]
    fn empty_text_with_patterns_is_noop() {
        let config = settings(("a", "b"), ("x", "g", "y"));
        assert_eq!(apply("", &config).unwrap(), "");
    }

    #[test]
    fn invalid_pattern_reports_pattern_and_flags() {
        let config = settings(("a", "b"), ("(", "g", "x"));
        match apply("abc", &config) {
            Err(DomainError::PatternCompile { pattern, flags, .. }) => {
                assert_eq!(pattern, "(");
                assert_eq!(flags, "g");
            }
            other => panic!("expected compile error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_flag_is_a_compile_error() {
        let config = settings(("", ""), ("a", "gq", "b"));
        let err = apply("a", &config).unwrap_err();
        assert!(err.to_string().contains("unsupported flag 'q'"));
    }

    #[test]
    fn duplicate_flag_is_a_compile_error() {
        assert!(RegexFlags::parse("gg").is_err());
        assert!(compile("a", "ii").is_err());
    }

    #[test]
    fn flags_are_ignored_without_a_pattern() {
        let config = settings(("a", "b"), ("", "not flags", ""));
        assert_eq!(apply("a", &config).unwrap(), "b");
    }

    #[test]
    fn parses_all_supported_flags() {
        let flags = RegexFlags::parse("gimsxUu").unwrap();
        assert!(flags.global);
        assert!(flags.case_insensitive);
        assert!(flags.multi_line);
        assert!(flags.dot_matches_new_line);
        assert!(flags.ignore_whitespace);
        assert!(flags.swap_greed);
    }
}
