use crate::error::{Result, ValidatorError};
use globset::{GlobBuilder, GlobMatcher};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Async glob expansion for validation targets.
///
/// The validator is spawned without a shell, so patterns such as
/// `/site/tmp/*.html` are expanded here. Matching follows shell rules:
/// `*` does not cross `/`, hidden entries are skipped unless asked for.
#[derive(Debug, Clone, Default)]
pub struct FileDiscovery {
    /// Include entries whose name starts with `.`
    include_hidden: bool,
}

/// Where to start walking and how deep a pattern can reach
#[derive(Debug, Clone, PartialEq, Eq)]
struct GlobRoot {
    base: PathBuf,
    /// `None` when the pattern contains `**`
    max_depth: Option<usize>,
    /// Pattern components below `base`
    rest: Vec<String>,
}

impl FileDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Expand `pattern` into matching paths, sorted.
    ///
    /// A pattern whose base directory does not exist yields an empty list.
    pub async fn expand(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let matcher = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| ValidatorError::Discovery {
                pattern: pattern.to_string(),
                details: e.to_string(),
            })?
            .compile_matcher();

        let root = glob_root(pattern);
        let mut matches = Vec::new();

        match fs::metadata(&root.base).await {
            Ok(metadata) if metadata.is_dir() => {}
            _ => return Ok(matches),
        }

        self.walk(&root.base, 0, &root, &matcher, &mut matches)
            .await?;
        matches.sort();
        Ok(matches)
    }

    /// Recursive helper for walking below the glob root
    fn walk<'a>(
        &'a self,
        dir: &'a Path,
        depth: usize,
        root: &'a GlobRoot,
        matcher: &'a GlobMatcher,
        matches: &'a mut Vec<PathBuf>,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let mut read_dir = fs::read_dir(dir).await?;

            while let Some(entry) = read_dir.next_entry().await? {
                let entry_path = entry.path();

                if !self.include_hidden
                    && is_hidden(&entry_path)
                    && !root.names_hidden(depth)
                {
                    continue;
                }

                let candidate = strip_current_dir(&entry_path);
                if matcher.is_match(candidate) {
                    matches.push(candidate.to_path_buf());
                }

                // Symlinked directories are matched but never entered
                let file_type = entry.file_type().await?;
                let can_descend = root.max_depth.is_none_or(|max| depth + 1 < max);
                if can_descend && file_type.is_dir() {
                    if let Err(e) = self
                        .walk(&entry_path, depth + 1, root, matcher, matches)
                        .await
                    {
                        log::warn!("Error processing {}: {}", entry_path.display(), e);
                    }
                }
            }

            Ok(())
        })
    }
}

/// Split a pattern into the longest literal directory prefix and the
/// number of path components the remaining glob can match.
fn glob_root(pattern: &str) -> GlobRoot {
    let components: Vec<&str> = pattern.split('/').collect();
    let literal = components
        .iter()
        .take_while(|c| !c.contains(['*', '?', '[', '{']))
        .count()
        // The last component is what gets matched, even if it is literal
        .min(components.len().saturating_sub(1));

    let base = match components[..literal].join("/") {
        joined if joined.is_empty() && pattern.starts_with('/') => PathBuf::from("/"),
        joined if joined.is_empty() => PathBuf::from("."),
        joined => PathBuf::from(joined),
    };

    let rest = &components[literal..];
    let max_depth = if rest.contains(&"**") {
        None
    } else {
        Some(rest.len())
    };

    GlobRoot {
        base,
        max_depth,
        rest: rest.iter().map(|c| c.to_string()).collect(),
    }
}

impl GlobRoot {
    /// Whether the pattern component matched at `depth` starts with `.`,
    /// which lets it match hidden entries the way a shell does
    fn names_hidden(&self, depth: usize) -> bool {
        match self.rest.iter().position(|c| c == "**") {
            Some(star) if star <= depth => self.rest[star..].iter().any(|c| c.starts_with('.')),
            _ => self.rest.get(depth).is_some_and(|c| c.starts_with('.')),
        }
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

/// Relative patterns are matched without the `./` the walk introduces
fn strip_current_dir(path: &Path) -> &Path {
    path.strip_prefix(".").unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_site() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("tmp/nested")).await.unwrap();
        fs::write(root.join("tmp/index.html"), "<!doctype html>").await.unwrap();
        fs::write(root.join("tmp/about.html"), "<!doctype html>").await.unwrap();
        fs::write(root.join("tmp/style.css"), "body {}").await.unwrap();
        fs::write(root.join("tmp/.draft.html"), "<!doctype html>").await.unwrap();
        fs::write(root.join("tmp/nested/deep.html"), "<!doctype html>").await.unwrap();

        temp_dir
    }

    fn pattern(root: &Path, glob: &str) -> String {
        format!("{}/{}", root.to_string_lossy().replace('\\', "/"), glob)
    }

    #[test]
    fn test_glob_root_absolute() {
        let root = glob_root("/site/tmp/*.html");
        assert_eq!(root.base, PathBuf::from("/site/tmp"));
        assert_eq!(root.max_depth, Some(1));
    }

    #[test]
    fn test_glob_root_recursive() {
        let root = glob_root("/site/**/*.html");
        assert_eq!(root.base, PathBuf::from("/site"));
        assert_eq!(root.max_depth, None);
    }

    #[test]
    fn test_glob_root_relative() {
        let root = glob_root("*.html");
        assert_eq!(root.base, PathBuf::from("."));
        assert_eq!(root.max_depth, Some(1));
    }

    #[tokio::test]
    async fn test_expand_single_level() {
        let site = create_site().await;
        let discovery = FileDiscovery::new();

        let files = discovery
            .expand(&pattern(site.path(), "tmp/*.html"))
            .await
            .unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["about.html", "index.html"]);
    }

    #[tokio::test]
    async fn test_expand_recursive() {
        let site = create_site().await;
        let files = FileDiscovery::new()
            .expand(&pattern(site.path(), "**/*.html"))
            .await
            .unwrap();

        assert_eq!(files.len(), 3);
        assert!(files.iter().any(|p| p.ends_with("nested/deep.html")));
    }

    #[tokio::test]
    async fn test_expand_hidden_files() {
        let site = create_site().await;
        let files = FileDiscovery::new()
            .with_include_hidden(true)
            .expand(&pattern(site.path(), "tmp/*.html"))
            .await
            .unwrap();

        assert!(files.iter().any(|p| p.ends_with(".draft.html")));
    }

    #[tokio::test]
    async fn test_dot_pattern_matches_hidden_files() {
        let site = create_site().await;
        let files = FileDiscovery::new()
            .expand(&pattern(site.path(), "tmp/.*.html"))
            .await
            .unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("tmp/.draft.html"));
    }

    #[test]
    fn test_names_hidden() {
        let root = glob_root("/site/*/.cache/*.html");
        assert!(!root.names_hidden(0));
        assert!(root.names_hidden(1));
        assert!(!root.names_hidden(2));

        let root = glob_root("/site/**/.*.html");
        assert!(root.names_hidden(0));
        assert!(root.names_hidden(3));

        assert!(!glob_root("/site/**/*.html").names_hidden(2));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_cycle_is_not_followed() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("a")).await.unwrap();
        fs::write(root.join("a/x.html"), "<!doctype html>").await.unwrap();
        std::os::unix::fs::symlink(root.join("a"), root.join("a/loop")).unwrap();

        let files = FileDiscovery::new()
            .expand(&pattern(root, "**/*.html"))
            .await
            .unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("a/x.html"));
    }

    #[tokio::test]
    async fn test_expand_missing_base() {
        let site = create_site().await;
        let files = FileDiscovery::new()
            .expand(&pattern(site.path(), "missing/*.html"))
            .await
            .unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_pattern() {
        let result = FileDiscovery::new().expand("/site/[*.html").await;
        assert!(matches!(result, Err(ValidatorError::Discovery { .. })));
    }
}
