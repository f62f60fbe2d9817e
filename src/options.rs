//! Run configuration
//!
//! One [`Options`] value is constructed per invocation and passed by
//! reference to every stage of the pipeline. It is never mutated after
//! construction, which keeps behavior reproducible and lets tests run
//! varied configurations side by side.

/// Default ceiling for line-level diffing: 5 MB (decimal)
pub const DEFAULT_MAX_TEXT_SIZE: u64 = 5_000_000;

/// Immutable configuration for one comparison run
#[derive(Debug, Clone)]
pub struct Options {
    /// Fold `\r\n` and lone `\r` to `\n` before hashing and diffing
    pub normalize_eol: bool,
    /// Files larger than this on either side are not line-diffed
    pub max_text_size: u64,
    /// Ignore glob patterns; matched against full relative paths and
    /// individual path segments
    pub ignore_patterns: Vec<String>,
    /// Plan every action but write nothing
    pub dry_run: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            normalize_eol: false,
            max_text_size: DEFAULT_MAX_TEXT_SIZE,
            ignore_patterns: Vec::new(),
            dry_run: false,
        }
    }
}

impl Options {
    /// Create options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set EOL normalization
    pub fn normalize_eol(mut self, yes: bool) -> Self {
        self.normalize_eol = yes;
        self
    }

    /// Set the maximum byte size eligible for text diffing
    pub fn max_text_size(mut self, bytes: u64) -> Self {
        self.max_text_size = bytes;
        self
    }

    /// Set the ignore glob patterns
    pub fn ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    /// Enable or disable dry-run mode
    pub fn dry_run(mut self, yes: bool) -> Self {
        self.dry_run = yes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = Options::default();
        assert!(!opts.normalize_eol);
        assert_eq!(opts.max_text_size, 5_000_000);
        assert!(opts.ignore_patterns.is_empty());
        assert!(!opts.dry_run);
    }

    #[test]
    fn test_builder_style() {
        let opts = Options::new()
            .normalize_eol(true)
            .max_text_size(1024)
            .ignore_patterns(vec!["*.log".to_string()])
            .dry_run(true);
        assert!(opts.normalize_eol);
        assert_eq!(opts.max_text_size, 1024);
        assert_eq!(opts.ignore_patterns, vec!["*.log"]);
        assert!(opts.dry_run);
    }
}
