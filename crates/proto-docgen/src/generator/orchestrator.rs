//! Orchestration of the schema to documentation pipeline.
//!
//! The [`Orchestrator`] walks every service of a [`Schema`] in declaration order,
//! builds one [`DocumentModel`] per method, hands it to a [`DocumentRenderer`] and
//! collects the rendered pages as a deduplicated set of [`UploadArtifact`]s.
//!
//! ```no_run
//! # async fn example() -> anyhow::Result<()> {
//! let schema = SchemaLoader::open("schema.json".as_ref()).await?.parse()?;
//! let orchestrator = Orchestrator::new(&schema, DocgenConfig::default());
//! let output = orchestrator.build_all(&MarkdownRenderer);
//! println!("{} pages, {} warnings", output.artifacts.len(), output.stats.warnings.len());
//! # Ok(())
//! # }
//! ```

use indexmap::IndexSet;

use crate::{
  delivery::UploadArtifact,
  generator::{
    document::{DocumentBuilder, DocumentModel},
    errors::DocgenError,
    metrics::{GenerationStats, GenerationWarning},
  },
  render::DocumentRenderer,
  schema::{MethodDef, Schema, ServiceDef},
};

/// Services under this namespace are infrastructure (health checks, reflection) and are not documented.
pub const DEFAULT_EXCLUDED_NAMESPACE: &str = "grpc.";

#[derive(Debug, Clone, bon::Builder)]
pub struct DocgenConfig {
  /// Services whose fully-qualified name contains this text are skipped. Empty excludes nothing.
  #[builder(into, default = DEFAULT_EXCLUDED_NAMESPACE.to_string())]
  pub excluded_namespace: String,
}

impl Default for DocgenConfig {
  fn default() -> Self {
    Self::builder().build()
  }
}

/// Result of a full build: the pages to deliver plus statistics.
#[derive(Debug)]
pub struct GeneratedOutput {
  pub artifacts: IndexSet<UploadArtifact>,
  pub stats: GenerationStats,
}

pub struct Orchestrator<'a> {
  schema: &'a Schema,
  config: DocgenConfig,
}

impl<'a> Orchestrator<'a> {
  pub const fn new(schema: &'a Schema, config: DocgenConfig) -> Self {
    Self { schema, config }
  }

  pub fn is_excluded(&self, service: &ServiceDef) -> bool {
    let namespace = self.config.excluded_namespace.as_str();
    !namespace.is_empty() && service.full_name().contains(namespace)
  }

  /// Services that produce documentation, in declaration order.
  pub fn documented_services(&self) -> impl Iterator<Item = &'a ServiceDef> + '_ {
    self
      .schema
      .services()
      .iter()
      .filter(move |service| !self.is_excluded(service))
  }

  /// Builds the documentation model of a single method.
  pub fn build_model(&self, service: &'a ServiceDef, method: &'a MethodDef) -> Result<DocumentModel<'a>, DocgenError> {
    DocumentBuilder::new(self.schema.index()).build(service, method)
  }

  /// Builds, renders and collects every documented method.
  ///
  /// A method that cannot be resolved or rendered is recorded as a warning and the
  /// remaining methods are still processed.
  pub fn build_all<R>(&self, renderer: &R) -> GeneratedOutput
  where
    R: DocumentRenderer + ?Sized,
  {
    let mut stats = GenerationStats::default();
    let mut artifacts = IndexSet::new();

    for service in self.schema.services() {
      stats.record_service();
      if self.is_excluded(service) {
        stats.record_excluded_service();
        continue;
      }

      for method in service.methods() {
        let model = match self.build_model(service, method) {
          Ok(model) => model,
          Err(err) => {
            stats.record_warning(GenerationWarning::MethodSkipped {
              service: service.full_name().to_string(),
              method: method.name().to_string(),
              error: err.to_string(),
            });
            continue;
          }
        };

        match renderer.render(&model) {
          Ok(content) => {
            stats.record_model(&model);
            let inserted = artifacts.insert(UploadArtifact::from_model(&model, content));
            stats.record_artifact(inserted);
          }
          Err(err) => stats.record_warning(GenerationWarning::RenderFailed {
            service: service.full_name().to_string(),
            method: method.name().to_string(),
            error: format!("{err:#}"),
          }),
        }
      }
    }

    GeneratedOutput { artifacts, stats }
  }
}
