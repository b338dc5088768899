use strum::Display;

use crate::generator::document::DocumentModel;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationStats {
  pub services_seen: usize,
  pub services_excluded: usize,
  pub methods_documented: usize,
  pub methods_failed: usize,
  pub artifacts_generated: usize,
  pub duplicate_artifacts: usize,
  pub extra_messages_resolved: usize,
  pub extra_enums_resolved: usize,
  pub documented_methods: Vec<String>,
  pub warnings: Vec<GenerationWarning>,
}

impl GenerationStats {
  pub fn record_service(&mut self) {
    self.services_seen += 1;
  }

  pub fn record_excluded_service(&mut self) {
    self.services_excluded += 1;
  }

  pub fn record_model(&mut self, model: &DocumentModel<'_>) {
    self.methods_documented += 1;
    self.extra_messages_resolved += model.extra_messages.len();
    self.extra_enums_resolved += model.extra_enums.len();
    self
      .documented_methods
      .push(format!("{}.{}", model.service_full_name, model.method.name()));
  }

  pub fn record_artifact(&mut self, inserted: bool) {
    if inserted {
      self.artifacts_generated += 1;
    } else {
      self.duplicate_artifacts += 1;
    }
  }

  /// Every warning stands for one method that produced no artifact.
  pub fn record_warning(&mut self, warning: GenerationWarning) {
    self.methods_failed += 1;
    self.warnings.push(warning);
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GenerationWarning {
  #[strum(to_string = "Skipped method '{service}.{method}': {error}")]
  MethodSkipped {
    service: String,
    method: String,
    error: String,
  },
  #[strum(to_string = "Failed to render '{service}.{method}': {error}")]
  RenderFailed {
    service: String,
    method: String,
    error: String,
  },
}

impl GenerationWarning {
  pub fn is_skipped_item(&self) -> bool {
    matches!(self, Self::MethodSkipped { .. })
  }
}
