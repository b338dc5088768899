use std::{
  collections::HashSet,
  path::PathBuf,
  sync::{Mutex, PoisonError},
};

use super::{ArtifactSink, DeliveryError, UploadArtifact};

/// Writes each artifact to `<root>/<category>/<title>.<extension>`.
///
/// Distinct artifacts that sanitize to the same file name within one run get a
/// numeric suffix (`<title>-2.<extension>`, `<title>-3.<extension>`, ...).
#[derive(Debug)]
pub struct DirectorySink {
  root: PathBuf,
  extension: String,
  claimed: Mutex<HashSet<PathBuf>>,
}

impl DirectorySink {
  pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
    Self {
      root: root.into(),
      extension: extension.into(),
      claimed: Mutex::new(HashSet::new()),
    }
  }

  pub(crate) fn artifact_path(&self, artifact: &UploadArtifact) -> PathBuf {
    self.numbered_path(artifact, 1)
  }

  fn numbered_path(&self, artifact: &UploadArtifact, n: usize) -> PathBuf {
    let stem = path_segment(&artifact.title);
    let file_name = match n {
      1 => format!("{stem}.{}", self.extension),
      _ => format!("{stem}-{n}.{}", self.extension),
    };
    self.root.join(path_segment(&artifact.category)).join(file_name)
  }

  /// First path for this artifact not yet written during the current run.
  fn claim_path(&self, artifact: &UploadArtifact) -> PathBuf {
    let mut claimed = self.claimed.lock().unwrap_or_else(PoisonError::into_inner);
    let mut n = 1;
    loop {
      let path = self.numbered_path(artifact, n);
      if claimed.insert(path.clone()) {
        return path;
      }
      n += 1;
    }
  }
}

/// Categories and titles are free text; path separators would escape the output root.
fn path_segment(name: &str) -> String {
  let segment = name.trim().replace(['/', '\\'], "_");
  match segment.as_str() {
    "" | "." | ".." => "_".to_string(),
    _ => segment,
  }
}

impl ArtifactSink for DirectorySink {
  fn destination(&self) -> String {
    self.root.display().to_string()
  }

  async fn prepare(&self) -> Result<(), DeliveryError> {
    self.claimed.lock().unwrap_or_else(PoisonError::into_inner).clear();
    tokio::fs::create_dir_all(&self.root)
      .await
      .map_err(|source| DeliveryError::OutputRoot {
        path: self.root.clone(),
        source,
      })
  }

  async fn deliver(&self, artifact: &UploadArtifact) -> Result<(), DeliveryError> {
    let path = self.claim_path(artifact);
    if let Some(parent) = path.parent() {
      tokio::fs::create_dir_all(parent)
        .await
        .map_err(|source| DeliveryError::Io {
          path: parent.to_path_buf(),
          source,
        })?;
    }
    tokio::fs::write(&path, &artifact.content)
      .await
      .map_err(|source| DeliveryError::Io { path, source })
  }
}
