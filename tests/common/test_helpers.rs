use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::fs;

/// Test fixture paths
pub struct TestFixtures {
    pub fixtures_dir: PathBuf,
}

impl TestFixtures {
    pub fn new() -> Self {
        let fixtures_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures");

        Self { fixtures_dir }
    }

    pub fn valid_html(&self) -> PathBuf {
        self.fixtures_dir.join("valid.html")
    }

    pub fn invalid_html(&self) -> PathBuf {
        self.fixtures_dir.join("invalid.html")
    }

    /// Captured `--format json` output for `invalid.html`
    pub fn vnu_errors_json(&self) -> String {
        std::fs::read_to_string(self.fixtures_dir.join("vnu-errors.json")).unwrap()
    }
}

/// Create a temporary site with a few HTML files and one stylesheet
pub async fn create_temp_site() -> std::io::Result<TempDir> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();

    fs::create_dir_all(root.join("tmp")).await?;
    fs::write(root.join("tmp/index.html"), "<!DOCTYPE html><title>i</title>").await?;
    fs::write(root.join("tmp/contact.html"), "<!DOCTYPE html><title>c</title>").await?;
    fs::write(root.join("tmp/site.css"), "body { margin: 0 }").await?;

    Ok(temp_dir)
}

/// Create an empty file standing in for vnu.jar
pub fn create_fake_jar(dir: &Path) -> PathBuf {
    let jar = dir.join("vnu.jar");
    std::fs::write(&jar, "PK").unwrap();
    jar
}

/// Path in forward-slash form, as targets are built
pub fn slashed(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
