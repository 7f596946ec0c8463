//! Pattern matching for CODEOWNERS files.
//!
//! This module compiles CODEOWNERS patterns (a constrained gitignore dialect
//! with no character classes and no brace expansion) into path matchers:
//!
//! - `*` as a whole segment matches one or more non-slash characters;
//!   inside a segment it matches zero or more
//! - `?` matches exactly one non-slash character
//! - `**` matches zero or more whole path segments
//! - `\` escapes the next character
//! - `/` at the start anchors to the repository root; single-segment
//!   patterns without it match at any depth
//! - `/` at the end matches everything below the directory
//! - a final literal segment also matches everything below it
//!
//! Anchored patterns with no wildcard or escape characters skip regex
//! generation and use a direct prefix comparison.

use regex::Regex;
use std::borrow::Cow;
use thiserror::Error;

/// Errors that can occur while compiling a pattern.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatternError {
    /// The pattern was empty.
    #[error("empty pattern")]
    Empty,

    /// The pattern contained `***`.
    #[error("pattern cannot contain three consecutive asterisks")]
    TripleAsterisk,

    /// The generated expression failed to compile.
    #[error("failed to compile pattern expression: {0}")]
    Regex(String),
}

/// How a compiled pattern tests paths.
#[derive(Debug, Clone)]
enum Matcher {
    /// Left-anchored literal, stored without its leading slash.
    Literal(String),
    /// Generated path expression.
    Expression(Regex),
    /// The bare `/` pattern.
    Nothing,
}

/// A compiled CODEOWNERS pattern that can match file paths.
#[derive(Debug, Clone)]
pub struct Pattern {
    original: String,
    matcher: Matcher,
}

impl Pattern {
    /// Compiles a CODEOWNERS pattern for matching.
    ///
    /// Anchored literals never contain `*` and are never empty, so only the
    /// expression path needs validating.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let matcher = if pattern == "/" {
            Matcher::Nothing
        } else if is_anchored_literal(pattern) {
            Matcher::Literal(pattern[1..].to_string())
        } else {
            Matcher::Expression(build_pattern_regex(pattern)?)
        };

        Ok(Self {
            original: pattern.to_string(),
            matcher,
        })
    }

    /// Returns the original pattern string.
    pub fn as_str(&self) -> &str {
        &self.original
    }

    /// Returns true if this pattern uses the literal prefix fast path.
    pub fn is_literal(&self) -> bool {
        matches!(self.matcher, Matcher::Literal(_))
    }

    /// Checks if this pattern matches the given repository-relative path.
    ///
    /// The path is normalized with [`normalize_path`] first.
    pub fn matches(&self, path: &str) -> bool {
        let path = normalize_path(path);
        match &self.matcher {
            Matcher::Literal(prefix) => literal_matches(prefix, &path),
            Matcher::Expression(regex) => regex.is_match(&path),
            Matcher::Nothing => false,
        }
    }
}

/// Normalizes a candidate path to the form patterns are written in.
///
/// Backslash separators become `/` and a single leading `/` is dropped.
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    let path = if path.contains('\\') {
        Cow::Owned(path.replace('\\', "/"))
    } else {
        Cow::Borrowed(path)
    };

    match path {
        Cow::Borrowed(p) => Cow::Borrowed(p.strip_prefix('/').unwrap_or(p)),
        Cow::Owned(p) => match p.strip_prefix('/') {
            Some(stripped) => Cow::Owned(stripped.to_string()),
            None => Cow::Owned(p),
        },
    }
}

fn is_anchored_literal(pattern: &str) -> bool {
    pattern.starts_with('/') && !pattern.contains(['*', '?', '\\'])
}

fn literal_matches(prefix: &str, path: &str) -> bool {
    if prefix.ends_with('/') {
        return path.starts_with(prefix);
    }
    if path.len() == prefix.len() {
        return path == prefix;
    }
    // Longer paths must continue with a separator right after the literal.
    path.len() > prefix.len()
        && path.as_bytes()[prefix.len()] == b'/'
        && path.starts_with(prefix)
}

/// Builds the path-matching expression for a pattern.
///
/// This is the general path used by [`Pattern::new`] for every pattern that
/// is not an anchored literal, and the single place patterns are validated.
/// It is public so the literal fast path can be checked against it.
pub fn build_pattern_regex(pattern: &str) -> Result<Regex, PatternError> {
    if pattern.contains("***") {
        return Err(PatternError::TripleAsterisk);
    }
    if pattern.is_empty() {
        return Err(PatternError::Empty);
    }
    if pattern == "/" {
        return compile("^$");
    }

    let mut segments: Vec<&str> = pattern.split('/').collect();

    if segments[0].is_empty() {
        // Leading slash: relative to the root.
        segments.remove(0);
    } else if (segments.len() == 1 || (segments.len() == 2 && segments[1].is_empty()))
        && segments[0] != "**"
    {
        // A single segment matches at any depth, as if prefixed with `**/`.
        segments.insert(0, "**");
    }

    if segments.len() > 1 && segments.last() == Some(&"") {
        // Trailing slash is equivalent to a trailing `/**`.
        let last = segments.len() - 1;
        segments[last] = "**";
    }

    let last_index = segments.len() - 1;
    let mut need_slash = false;
    let mut re = String::from("^");

    for (i, segment) in segments.iter().enumerate() {
        match *segment {
            "**" if i == 0 && i == last_index => re.push_str(".+"),
            "**" if i == 0 => {
                re.push_str("(?:.+/)?");
                need_slash = false;
            }
            "**" if i == last_index => re.push_str("/.*"),
            "**" => {
                re.push_str("(?:/.+)?");
                need_slash = true;
            }
            "*" => {
                if need_slash {
                    re.push('/');
                }
                re.push_str("[^/]+");
                need_slash = true;
            }
            _ => {
                if need_slash {
                    re.push('/');
                }
                push_segment(&mut re, segment);
                if i == last_index {
                    re.push_str("(?:/.*)?");
                }
                need_slash = true;
            }
        }
    }

    re.push('$');
    compile(&re)
}

/// Appends one pattern segment, translating wildcards and escapes.
fn push_segment(re: &mut String, segment: &str) {
    let mut escape_next = false;
    let mut buf = [0u8; 4];
    for ch in segment.chars() {
        if escape_next {
            escape_next = false;
            re.push_str(&regex::escape(ch.encode_utf8(&mut buf)));
            continue;
        }
        match ch {
            '\\' => escape_next = true,
            '*' => re.push_str("[^/]*"),
            '?' => re.push_str("[^/]"),
            _ => re.push_str(&regex::escape(ch.encode_utf8(&mut buf))),
        }
    }
}

fn compile(expression: &str) -> Result<Regex, PatternError> {
    Regex::new(expression).map_err(|e| PatternError::Regex(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(pattern: &str, cases: &[(&str, bool)]) {
        let compiled = Pattern::new(pattern).unwrap();
        for (path, expected) in cases {
            assert_eq!(
                compiled.matches(path),
                *expected,
                "pattern {:?} against {:?}",
                pattern,
                path
            );
        }
    }

    #[test]
    fn single_segment_matches_at_any_depth() {
        check(
            "foo",
            &[
                ("foo", true),
                ("foo/", true),
                ("foo/bar", true),
                ("bar/foo", true),
                ("bar/foo/baz", true),
                ("xfoo", false),
                ("foox", false),
                ("bar/xfoo", false),
            ],
        );
    }

    #[test]
    fn extension_wildcard() {
        check(
            "*.rs",
            &[
                ("main.rs", true),
                ("src/lib.rs", true),
                ("src/parse/mod.rs", true),
                ("main.txt", false),
                ("rs", false),
            ],
        );
    }

    #[test]
    fn bare_star_matches_everything() {
        check("*", &[("main.rs", true), ("src/main.rs", true), ("a/b/c.txt", true)]);
    }

    #[test]
    fn anchored_literal_fast_path() {
        let pattern = Pattern::new("/foo").unwrap();
        assert!(pattern.is_literal());
        check(
            "/foo",
            &[
                ("foo", true),
                ("foo/", true),
                ("foo/bar", true),
                ("foobar", false),
                ("bar/foo", false),
                ("fo", false),
            ],
        );
    }

    #[test]
    fn anchored_directory_literal() {
        check(
            "/docs/",
            &[
                ("docs/index.md", true),
                ("docs/api/v1.md", true),
                ("docs", false),
                ("other/docs/index.md", false),
            ],
        );
    }

    #[test]
    fn trailing_slash_single_segment_matches_at_any_depth() {
        check(
            "build/",
            &[
                ("build/out.o", true),
                ("a/build/out.o", true),
                ("build", false),
                ("a/build", false),
            ],
        );
    }

    #[test]
    fn anchored_wildcard_does_not_recurse() {
        check(
            "/docs/*.md",
            &[
                ("docs/README.md", true),
                ("docs/api/index.md", false),
                ("other/docs/README.md", false),
            ],
        );
    }

    #[test]
    fn multi_segment_without_leading_slash_is_root_relative() {
        check(
            "docs/*.md",
            &[("docs/README.md", true), ("other/docs/README.md", false)],
        );
    }

    #[test]
    fn trailing_star_segment() {
        check(
            "foo/*",
            &[
                ("foo/bar", true),
                ("foo/bar/baz", false),
                ("foo", false),
                ("x/foo/bar", false),
            ],
        );
    }

    #[test]
    fn trailing_double_star() {
        check(
            "foo/**",
            &[
                ("foo/bar", true),
                ("foo/bar/baz", true),
                ("foo/", true),
                ("foo", false),
            ],
        );
    }

    #[test]
    fn leading_double_star() {
        check(
            "**/foo",
            &[
                ("foo", true),
                ("a/b/foo", true),
                ("foo/bar", true),
                ("afoo", false),
            ],
        );
    }

    #[test]
    fn interior_double_star() {
        check(
            "foo/**/bar",
            &[
                ("foo/bar", true),
                ("foo/a/bar", true),
                ("foo/a/b/bar", true),
                ("foo/bar/baz", true),
                ("foobar", false),
                ("x/foo/bar", false),
            ],
        );
    }

    #[test]
    fn double_star_alone_matches_everything() {
        check("**", &[("a", true), ("a/b/c", true)]);
    }

    #[test]
    fn question_mark_is_one_character() {
        check(
            "foo?",
            &[
                ("foo1", true),
                ("a/fooX", true),
                ("foo", false),
                ("foo12", false),
            ],
        );
    }

    #[test]
    fn escaped_wildcards_are_literal() {
        check("foo\\*", &[("foo*", true), ("a/foo*", true), ("foox", false)]);
        check("/a\\?", &[("a?", true), ("ab", false)]);
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        check("/a+b(c).txt", &[("a+b(c).txt", true), ("aab(c)xtxt", false)]);
        check("*.c++", &[("src/x.c++", true), ("src/x.cc", false)]);
    }

    #[test]
    fn root_slash_matches_nothing() {
        let pattern = Pattern::new("/").unwrap();
        assert!(!pattern.is_literal());
        for path in ["", "foo", "foo/bar", "/"] {
            assert!(!pattern.matches(path));
        }
    }

    #[test]
    fn invalid_patterns() {
        assert_eq!(Pattern::new("").unwrap_err(), PatternError::Empty);
        assert_eq!(
            Pattern::new("/a/***").unwrap_err(),
            PatternError::TripleAsterisk
        );
        assert_eq!(
            build_pattern_regex("***").unwrap_err(),
            PatternError::TripleAsterisk
        );
    }

    #[test]
    fn escaped_hash_is_literal() {
        check(
            r"\#notes.md",
            &[
                ("#notes.md", true),
                ("docs/#notes.md", true),
                ("notes.md", false),
                ("\\", false),
            ],
        );
    }

    #[test]
    fn separator_style_is_normalized() {
        for pattern in ["/src/", "*.rs", "/src/**/mod.rs", "src/*"] {
            let compiled = Pattern::new(pattern).unwrap();
            for (unix, windows) in [
                ("src/main.rs", "src\\main.rs"),
                ("src/parse/mod.rs", "src\\parse\\mod.rs"),
                ("docs/readme.md", "docs\\readme.md"),
            ] {
                assert_eq!(compiled.matches(unix), compiled.matches(windows));
            }
        }
    }

    #[test]
    fn leading_slash_on_path_is_ignored() {
        check("*.rs", &[("/main.rs", true), ("/src/main.rs", true)]);
        check("/src", &[("/src/main.rs", true)]);
    }

    #[test]
    fn literal_fast_path_agrees_with_expression() {
        let patterns = ["/foo", "/foo/", "/foo/bar", "/foo/bar/", "/a.b", "/x-y/z_w"];
        let paths = [
            "", "foo", "foo/", "foo/bar", "foo/bar/baz", "foobar", "bar/foo", "fo", "a.b",
            "a.b/c", "axb", "x-y/z_w", "x-y/z_w/q", "x-y/z", "foo/barbaz",
        ];
        for pattern in patterns {
            let fast = Pattern::new(pattern).unwrap();
            assert!(fast.is_literal());
            let regex = build_pattern_regex(pattern).unwrap();
            for path in paths {
                assert_eq!(
                    fast.matches(path),
                    regex.is_match(path),
                    "pattern {:?} against {:?}",
                    pattern,
                    path
                );
            }
        }
    }

    #[test]
    fn normalize_path_forms() {
        assert_eq!(normalize_path("a/b"), "a/b");
        assert_eq!(normalize_path("/a/b"), "a/b");
        assert_eq!(normalize_path("a\\b\\c"), "a/b/c");
        assert_eq!(normalize_path("\\a\\b"), "a/b");
    }
}
