//! What the validator is pointed at: a path, a glob, or a URL

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

static URL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(https?:)?//").expect("URL prefix pattern is valid")
});

const GLOB_CHARS: [char; 4] = ['*', '?', '[', '{'];

/// Subject of a validation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// `http://`, `https://` or protocol-relative `//` address, passed verbatim
    Url(String),
    /// Absolute file or directory path with forward slashes
    Path(String),
    /// Absolute glob pattern with forward slashes, expanded before spawning
    Glob(String),
}

impl Target {
    /// Classify user input, resolving relative paths against `cwd`.
    ///
    /// No input means "validate the current directory".
    pub fn detect(input: Option<&str>, cwd: &Path) -> Self {
        let Some(input) = input else {
            return Target::Path(to_forward_slashes(&normalize_path(cwd)));
        };

        if URL_PREFIX.is_match(input) {
            return Target::Url(input.to_string());
        }

        let resolved = to_forward_slashes(&normalize_path(&cwd.join(input)));
        if input.contains(GLOB_CHARS) {
            Target::Glob(resolved)
        } else {
            Target::Path(resolved)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Target::Url(s) | Target::Path(s) | Target::Glob(s) => s,
        }
    }

    pub fn is_url(&self) -> bool {
        matches!(self, Target::Url(_))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lexically resolve `.` and `..` without touching the filesystem
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
