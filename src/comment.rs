//! Comment profiles for diff annotation
//!
//! Annotated `.modified` files must stay syntactically parseable in their
//! original language, so DELETED/NEW markers are rendered with the comment
//! syntax of the file's extension. The registry is a static closed mapping
//! with one explicit fallback; unknown extensions never fail, they degrade
//! to `#`-style markers.

use std::path::Path;

/// Comment tokens used to annotate one file type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentProfile {
    /// Single-line comment marker, e.g. `# ` or `// `
    Line {
        /// Prefix including its trailing space
        prefix: &'static str,
    },
    /// Block comment pair, e.g. `/*` `*/` or `<!--` `-->`
    Block {
        /// Opening token
        open: &'static str,
        /// Closing token
        close: &'static str,
    },
}

impl CommentProfile {
    /// Look up the profile for a path by its extension (case-insensitive)
    pub fn for_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        Self::for_extension(&ext)
    }

    /// Look up the profile for a lowercase extension
    pub fn for_extension(ext: &str) -> Self {
        match ext {
            // C-family and friends
            "c" | "h" | "cpp" | "hpp" | "cc" | "java" | "js" | "ts" | "tsx" | "cs" | "swift"
            | "go" | "kt" | "kts" | "scala" | "dart" | "php" | "rs" => {
                CommentProfile::Line { prefix: "// " }
            }
            // Hash-style scripting and config, plus plain-text formats where
            // `#` is the safest marker
            "py" | "sh" | "rb" | "r" | "ps1" | "toml" | "yaml" | "yml" | "cfg" | "conf" | "txt"
            | "log" | "csv" | "tsv" => CommentProfile::Line { prefix: "# " },
            "sql" | "hs" => CommentProfile::Line { prefix: "-- " },
            // .m may be MATLAB rather than Objective-C; % is the safer bet
            "tex" | "m" => CommentProfile::Line { prefix: "% " },
            "ini" => CommentProfile::Line { prefix: "; " },
            // Markup; Markdown also tolerates HTML comments
            "html" | "htm" | "xml" | "xhtml" | "svg" | "md" => CommentProfile::Block {
                open: "<!--",
                close: "-->",
            },
            // Stylesheets; JSON gets /* */ even though strict JSON forbids it
            "css" | "scss" | "less" | "json" => CommentProfile::Block {
                open: "/*",
                close: "*/",
            },
            _ => CommentProfile::Line { prefix: "# " },
        }
    }

    /// Render a removed line as a commented DELETED marker
    ///
    /// The original trailing newline is preserved so paragraphs do not
    /// collapse in the annotated output.
    pub fn deleted_line(&self, line: &str) -> String {
        let (content, end) = split_terminator(line);
        match self {
            CommentProfile::Line { prefix } => format!("{prefix}DELETED: {content}{end}"),
            CommentProfile::Block { open, close } => {
                format!("{open} DELETED: {content} {close}{end}")
            }
        }
    }

    /// Append a trailing NEW marker to an added line
    pub fn new_line(&self, line: &str) -> String {
        let (content, end) = split_terminator(line);
        match self {
            CommentProfile::Line { prefix } => format!("{content} {prefix}NEW{end}"),
            CommentProfile::Block { open, close } => format!("{content} {open} NEW {close}{end}"),
        }
    }
}

/// Split a line into its payload and trailing newline (if any)
fn split_terminator(line: &str) -> (&str, &str) {
    match line.strip_suffix('\n') {
        Some(content) => (content, "\n"),
        None => (line, ""),
    }
}
