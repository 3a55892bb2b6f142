//! Package and service predicates

use regex::Regex;
use std::fmt;
use thiserror::Error;

/// A configured service pattern that failed to compile
#[derive(Error, Debug)]
#[error("invalid service pattern {pattern:?}: {source}")]
pub struct PatternError {
    /// The pattern string as configured
    pub pattern: String,
    /// The underlying regex error
    #[source]
    pub source: regex::Error,
}

/// All pattern compilation failures from one filter build.
///
/// Non-fatal: matching continues with the patterns that did compile, and
/// the failures are surfaced together so one bad pattern cannot hide the
/// others.
#[derive(Debug)]
pub struct PatternErrors(Vec<PatternError>);

impl PatternErrors {
    /// The individual compilation failures, in configuration order
    pub fn errors(&self) -> &[PatternError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PatternErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} service pattern(s) failed to compile", self.0.len())?;
        for err in &self.0 {
            write!(f, "\n  {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for PatternErrors {}

/// Admits files whose package name starts with one of the configured
/// prefixes. An empty prefix list admits everything.
#[derive(Debug, Clone, Default)]
pub struct PackageFilter {
    prefixes: Vec<String>,
}

impl PackageFilter {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Plain textual prefix semantics: `"acme.ex"` admits `"acme.example"`.
    pub fn matches(&self, package: &str) -> bool {
        self.prefixes.is_empty() || self.prefixes.iter().any(|p| package.starts_with(p))
    }
}

/// Admits services whose name matches one of the compiled patterns via an
/// unanchored search. With no compiled patterns every service is admitted,
/// including when every configured pattern failed to compile.
#[derive(Debug, Default)]
pub struct ServiceFilter {
    patterns: Vec<Regex>,
}

impl ServiceFilter {
    /// Compile the configured patterns, keeping the valid subset.
    ///
    /// Failures are collected instead of returned early; the filter stays
    /// usable and the caller decides how loudly to report them.
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> (Self, Option<PatternErrors>) {
        let mut compiled = Vec::new();
        let mut failures = Vec::new();

        for pattern in patterns {
            match Regex::new(pattern.as_ref()) {
                Ok(re) => compiled.push(re),
                Err(source) => failures.push(PatternError {
                    pattern: pattern.as_ref().to_string(),
                    source,
                }),
            }
        }

        let errors = if failures.is_empty() {
            None
        } else {
            Some(PatternErrors(failures))
        };

        (Self { patterns: compiled }, errors)
    }

    pub fn matches(&self, name: &str) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|re| re.is_match(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_package_filter_admits_everything() {
        let filter = PackageFilter::default();
        assert!(filter.matches("acme.example"));
        assert!(filter.matches(""));
    }

    #[test]
    fn test_package_prefix_is_textual() {
        let filter = PackageFilter::new(["acme.ex"]);
        assert!(filter.matches("acme.ex"));
        assert!(filter.matches("acme.example"));
        assert!(!filter.matches("acme"));
        assert!(!filter.matches("other.acme.example"));
    }

    #[test]
    fn test_any_prefix_admits() {
        let filter = PackageFilter::new(["acme.foo", "acme.bar"]);
        assert!(filter.matches("acme.bar.v1"));
        assert!(!filter.matches("acme.baz"));
    }

    #[test]
    fn test_empty_service_filter_admits_everything() {
        let (filter, errors) = ServiceFilter::compile::<&str>(&[]);
        assert!(errors.is_none());
        assert!(filter.matches("Anything"));
    }

    #[test]
    fn test_service_pattern_search_is_unanchored() {
        let (filter, errors) = ServiceFilter::compile(&["Echo"]);
        assert!(errors.is_none());
        assert!(filter.matches("EchoService"));
        assert!(filter.matches("MyEchoService"));
        assert!(!filter.matches("PingService"));
    }

    #[test]
    fn test_invalid_patterns_are_collected_not_fatal() {
        let (filter, errors) = ServiceFilter::compile(&["[", "Echo.*"]);
        let errors = errors.expect("one pattern should fail");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].pattern, "[");
        assert!(filter.matches("EchoService"));
        assert!(!filter.matches("OtherService"));
    }

    #[test]
    fn test_all_invalid_patterns_admit_everything() {
        // With no surviving compiled pattern the filter behaves like an
        // empty one; the failures are still reported.
        let (filter, errors) = ServiceFilter::compile(&["[", "(unclosed"]);
        assert_eq!(errors.expect("both should fail").len(), 2);
        assert!(filter.matches("Anything"));
    }

    #[test]
    fn test_pattern_errors_display_lists_each_failure() {
        let (_, errors) = ServiceFilter::compile(&["[", "(unclosed"]);
        let text = errors.unwrap().to_string();
        assert!(text.starts_with("2 service pattern(s) failed to compile"));
        assert!(text.contains("\"[\""));
        assert!(text.contains("\"(unclosed\""));
    }
}
