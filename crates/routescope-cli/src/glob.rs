//! Shell-glob filtering of route rows.
//!
//! Globs follow `fnmatch` rules: anchored, case-sensitive, and `*` and `?`
//! match `/` like any other character.
//!
//! | Glob      | Meaning                                  |
//! |-----------|------------------------------------------|
//! | `*`       | any run of characters, `/` included      |
//! | `?`       | exactly one character                    |
//! | `[abc]`   | one character from the set (ranges ok)   |
//! | `[!abc]`  | one character not in the set             |
//!
//! A `[` without a closing `]` matches itself, and a reversed range such
//! as `[z-a]` matches nothing.

use glob::{MatchOptions, Pattern};

use routescope_core::{RoutescopeError, RoutescopeResult};
use routescope_routes::RouteRow;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// A compiled glob.
///
/// # Examples
///
/// ```
/// use routescope_cli::glob::GlobFilter;
///
/// let filter = GlobFilter::new("user_*").unwrap();
/// assert!(filter.is_match("user_detail"));
/// assert!(!filter.is_match("admin_user"));
/// ```
#[derive(Debug, Clone)]
pub struct GlobFilter {
    glob: String,
    pattern: Pattern,
}

impl GlobFilter {
    /// Compiles `glob`.
    ///
    /// # Errors
    ///
    /// Returns [`RoutescopeError::ConfigurationError`] if the pattern cannot
    /// be compiled.
    pub fn new(glob: &str) -> RoutescopeResult<Self> {
        let pattern = Pattern::new(&normalize(glob)).map_err(|e| {
            RoutescopeError::ConfigurationError(format!("Invalid glob pattern '{glob}': {e}"))
        })?;
        Ok(Self {
            glob: glob.to_string(),
            pattern,
        })
    }

    /// The glob as given.
    pub fn as_str(&self) -> &str {
        &self.glob
    }

    /// Returns `true` if the whole of `text` matches.
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.matches_with(text, MATCH_OPTIONS)
    }

    /// Keeps a row when its name or its pattern matches.
    pub fn matches_row(&self, row: &RouteRow) -> bool {
        self.is_match(&row.name) || self.is_match(&row.pattern)
    }
}

/// Rewrites the two spellings `glob::Pattern` rejects but `fnmatch` accepts:
/// runs of `*` collapse to one `*`, and an unclosed `[` becomes the literal
/// class `[[]`.
fn normalize(glob: &str) -> String {
    let chars: Vec<char> = glob.chars().collect();
    let mut out = String::with_capacity(glob.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => {
                while chars.get(i + 1) == Some(&'*') {
                    i += 1;
                }
                out.push('*');
            }
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    out.extend(&chars[i..=end]);
                    i = end;
                }
                None => out.push_str("[[]"),
            },
            c => out.push(c),
        }
        i += 1;
    }

    out
}

/// Index of the `]` closing the class opened at `start`. A `]` directly
/// after `[` or `[!` belongs to the set.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    (j..chars.len()).find(|&k| chars[k] == ']')
}
