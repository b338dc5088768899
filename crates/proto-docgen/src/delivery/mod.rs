//! Delivery of rendered documentation pages.
//!
//! The generator produces a deduplicated set of [`UploadArtifact`] values; a sink
//! decides where they end up. Sinks never retry: a failed artifact is reported and
//! the remaining ones are still delivered unless the failure is fatal.

mod directory;
mod showdoc;

use std::{future::Future, path::PathBuf};

use thiserror::Error;

pub use directory::DirectorySink;
pub use showdoc::{DEFAULT_SHOWDOC_ENDPOINT, ShowDocSink};

use crate::generator::document::DocumentModel;

/// One rendered page, ready for delivery. Equal artifacts collapse into one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UploadArtifact {
  pub category: String,
  pub title: String,
  pub content: String,
}

impl UploadArtifact {
  pub fn from_model(model: &DocumentModel<'_>, content: String) -> Self {
    Self {
      category: model.category().to_string(),
      title: model.title().to_string(),
      content,
    }
  }
}

#[derive(Debug, Error)]
pub enum DeliveryError {
  #[error("cannot create output directory '{}': {source}", path.display())]
  OutputRoot {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("failed to write '{}': {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("upload of '{title}' failed: {source}")]
  Http {
    title: String,
    #[source]
    source: reqwest::Error,
  },
  #[error("upload of '{title}' rejected with code {code}: {message}")]
  Rejected { title: String, code: i64, message: String },
  #[error("upload credentials rejected (HTTP {status})")]
  Unauthorized { status: u16 },
}

impl DeliveryError {
  /// Fatal errors would fail for every remaining artifact as well, so delivery stops.
  pub const fn is_fatal(&self) -> bool {
    matches!(self, Self::OutputRoot { .. } | Self::Unauthorized { .. })
  }
}

pub trait ArtifactSink {
  /// Human-readable destination used in progress output.
  fn destination(&self) -> String;

  /// Called once before the first artifact is delivered.
  fn prepare(&self) -> impl Future<Output = Result<(), DeliveryError>> + Send {
    async { Ok(()) }
  }

  fn deliver(&self, artifact: &UploadArtifact) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
  pub category: String,
  pub title: String,
  pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
  pub delivered: usize,
  pub failures: Vec<DeliveryFailure>,
}

/// Delivers artifacts in order, recording recoverable failures and stopping at the first fatal one.
pub async fn deliver_all<'a, S, I>(sink: &S, artifacts: I) -> Result<DeliveryReport, DeliveryError>
where
  S: ArtifactSink,
  I: IntoIterator<Item = &'a UploadArtifact>,
{
  sink.prepare().await?;

  let mut report = DeliveryReport::default();
  for artifact in artifacts {
    match sink.deliver(artifact).await {
      Ok(()) => report.delivered += 1,
      Err(err) if err.is_fatal() => return Err(err),
      Err(err) => report.failures.push(DeliveryFailure {
        category: artifact.category.clone(),
        title: artifact.title.clone(),
        error: err.to_string(),
      }),
    }
  }

  Ok(report)
}
