//! Artifact persistence.
//!
//! Every artifact is written exactly once, as the last step of a generation
//! path. Content goes to a sibling temp file first and is renamed into place,
//! so a failed write never leaves a half-written artifact behind.

use crate::config::{OutputLayout, UiFramework};
use crate::error::ErrorContext;
use crate::utils::sanitize_name;
use crate::{Error, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// What kind of file an artifact is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "framework")]
pub enum ArtifactKind {
    /// `features/<name>.feature`
    Feature,
    /// `test_scripts/test_<name>.py`
    Script,
    /// `generated_tests/<framework>/test_<name>.py`
    FeatureTest(UiFramework),
}

/// A persisted artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedArtifact {
    pub kind: ArtifactKind,
    pub filename: String,
    pub path: PathBuf,
    pub content: String,
}

/// Writes and finds artifacts under an [`OutputLayout`].
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    layout: OutputLayout,
}

impl ArtifactStore {
    pub fn new(layout: OutputLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Write `features/<stem>.feature`.
    pub fn write_feature(&self, stem: &str, content: &str) -> Result<GeneratedArtifact> {
        let filename = format!("{}.feature", stem);
        self.write(ArtifactKind::Feature, &self.layout.features(), filename, content)
    }

    /// Write `test_scripts/<filename>`.
    pub fn write_script(&self, filename: &str, content: &str) -> Result<GeneratedArtifact> {
        self.write(
            ArtifactKind::Script,
            &self.layout.scripts(),
            filename.to_string(),
            content,
        )
    }

    /// Write `generated_tests/<framework>/test_<sanitized name>.py`.
    pub fn write_feature_test(
        &self,
        framework: UiFramework,
        feature_name: &str,
        content: &str,
    ) -> Result<GeneratedArtifact> {
        let filename = format!("test_{}.py", sanitize_name(feature_name));
        self.write(
            ArtifactKind::FeatureTest(framework),
            &self.layout.generated_tests(framework),
            filename,
            content,
        )
    }

    /// Save an uploaded file under `uploads/` with a sanitized name.
    pub fn save_upload(&self, original_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let dir = self.layout.uploads();
        fs::create_dir_all(&dir)?;
        let path = dir.join(upload_file_name(original_name));
        fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Find a previously written artifact for download: `features/`, then `test_scripts/`.
    pub fn locate(&self, filename: &str) -> Option<PathBuf> {
        if !is_safe_file_name(filename) {
            return None;
        }
        [self.layout.features(), self.layout.scripts()]
            .into_iter()
            .map(|dir| dir.join(filename))
            .find(|p| p.is_file())
    }

    /// All `*.feature` files in the features directory, sorted by name.
    pub fn list_features(&self) -> Result<Vec<PathBuf>> {
        let dir = self.layout.features();
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut files: Vec<PathBuf> = fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().and_then(|e| e.to_str()) == Some("feature"))
            .collect();
        files.sort();
        Ok(files)
    }

    fn write(
        &self,
        kind: ArtifactKind,
        dir: &Path,
        filename: String,
        content: &str,
    ) -> Result<GeneratedArtifact> {
        if !is_safe_file_name(&filename) {
            return Err(Error::validation_with_context(
                format!("Invalid artifact file name: {}", filename),
                ErrorContext::new().with_source("artifact_store"),
            ));
        }
        fs::create_dir_all(dir)?;
        let path = dir.join(&filename);
        let staging = dir.join(format!(".{}.tmp", filename));
        fs::write(&staging, content)?;
        if let Err(e) = fs::rename(&staging, &path) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }
        info!(path = %path.display(), bytes = content.len(), "artifact written");

        Ok(GeneratedArtifact {
            kind,
            filename,
            path,
            content: content.to_string(),
        })
    }
}

/// A bare file name: no separators, no parent references, not hidden.
pub fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains("..")
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}

fn upload_file_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let (stem, ext) = match base.rsplit_once('.') {
        Some((s, e)) if !s.is_empty() => (s, Some(e)),
        _ => (base, None),
    };
    let stem = match sanitize_name(stem) {
        s if s.is_empty() => "upload".to_string(),
        s => s,
    };
    match ext.map(sanitize_name).filter(|e| !e.is_empty()) {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, ArtifactStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(OutputLayout::rooted_at(dir.path()));
        (dir, store)
    }

    #[test]
    fn feature_lands_in_features_dir() {
        let (dir, store) = store();
        let artifact = store.write_feature("login", "Feature: Login").unwrap();
        assert_eq!(artifact.filename, "login.feature");
        assert_eq!(artifact.path, dir.path().join("features/login.feature"));
        assert_eq!(fs::read_to_string(&artifact.path).unwrap(), "Feature: Login");
        assert!(!dir.path().join("features/.login.feature.tmp").exists());
    }

    #[test]
    fn feature_tests_use_sanitized_names() {
        let (dir, store) = store();
        let artifact = store
            .write_feature_test(UiFramework::Playwright, "User Login #2", "def test(): pass")
            .unwrap();
        assert_eq!(artifact.filename, "test_user_login_2.py");
        assert!(dir
            .path()
            .join("generated_tests/playwright/test_user_login_2.py")
            .is_file());
    }

    #[test]
    fn unsafe_names_are_refused() {
        let (_dir, store) = store();
        assert!(store.write_script("../escape.py", "x").is_err());
        assert!(store.locate("../Cargo.toml").is_none());
        assert!(store.locate("").is_none());
    }

    #[test]
    fn locate_checks_features_then_scripts() {
        let (_dir, store) = store();
        store.write_script("test_login.py", "pass").unwrap();
        let found = store.locate("test_login.py").unwrap();
        assert!(found.ends_with("test_scripts/test_login.py"));
        assert!(store.locate("missing.feature").is_none());
    }

    #[test]
    fn list_features_filters_and_sorts() {
        let (_dir, store) = store();
        store.write_feature("b", "Feature: B").unwrap();
        store.write_feature("a", "Feature: A").unwrap();
        fs::write(store.layout().features().join("notes.txt"), "x").unwrap();
        let names: Vec<String> = store
            .list_features()
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.feature", "b.feature"]);
    }

    #[test]
    fn upload_names_are_flattened() {
        assert_eq!(upload_file_name("../../etc/Pass Wd.TXT"), "pass_wd.txt");
        assert_eq!(upload_file_name("C:\\docs\\story.md"), "story.md");
        assert_eq!(upload_file_name(".env"), "env");
        assert_eq!(upload_file_name("???"), "upload");
    }
}
