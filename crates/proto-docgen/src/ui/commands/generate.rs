use std::{io::Write, path::PathBuf};

use chrono::{Local, Timelike};
use crossterm::style::Stylize;

use crate::{
  delivery::{ArtifactSink, DeliveryReport, DirectorySink, ShowDocSink, UploadArtifact, deliver_all},
  generator::{
    metrics::GenerationStats,
    orchestrator::{DocgenConfig, Orchestrator},
  },
  render::{DocumentRenderer, MarkdownRenderer},
  schema::{Schema, SchemaLoader},
  ui::{Colors, GenerateCommand},
};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

/// Credentials and endpoint of the remote documentation host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
  pub endpoint: String,
  pub api_key: String,
  pub api_token: String,
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
  pub input: PathBuf,
  pub output: Option<PathBuf>,
  pub upload: Option<UploadTarget>,
  pub excluded_namespace: String,
  pub verbose: bool,
  pub quiet: bool,
}

impl GenerateConfig {
  pub fn from_command(command: GenerateCommand) -> anyhow::Result<Self> {
    let GenerateCommand {
      input,
      output,
      exclude_namespace,
      no_write,
      upload_url,
      api_key,
      api_token,
      verbose,
      quiet,
    } = command;

    let upload = match (api_key, api_token) {
      (Some(api_key), Some(api_token)) => Some(UploadTarget {
        endpoint: upload_url,
        api_key,
        api_token,
      }),
      (None, None) => None,
      _ => anyhow::bail!("Uploading requires both --api-key and --api-token"),
    };

    let output = (!no_write).then_some(output);
    if output.is_none() && upload.is_none() {
      anyhow::bail!("Nothing to do: --no-write was given and no upload credentials are configured");
    }

    Ok(Self {
      input,
      output,
      upload,
      excluded_namespace: exclude_namespace,
      verbose,
      quiet,
    })
  }

  async fn load_schema(&self) -> anyhow::Result<Schema> {
    SchemaLoader::open(&self.input).await?.parse()
  }

  fn docgen_config(&self) -> DocgenConfig {
    DocgenConfig::builder()
      .excluded_namespace(self.excluded_namespace.clone())
      .build()
  }
}

struct GenerateLogger<'a> {
  config: &'a GenerateConfig,
  colors: &'a Colors,
}

impl<'a> GenerateLogger<'a> {
  const fn new(config: &'a GenerateConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      println!("{} {message}", format_timestamp().with(self.colors.timestamp()));
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      println!(
        "            {:<25} {}",
        label.with(self.colors.label()),
        value.with(self.colors.value())
      );
    }
  }

  fn log_loading(&self) {
    self.info(
      &format!("Loading schema from: {}", self.config.input.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_schema(&self, schema: &Schema) {
    self.stat("Services:", schema.services().len().to_string());
    self.stat("Messages:", schema.index().message_count().to_string());
    self.stat("Enums:", schema.index().enum_count().to_string());
  }

  fn log_generating(&self) {
    self.info(&"Generating method documentation...".with(self.colors.primary()).to_string());
  }

  fn print_statistics(&self, stats: &GenerationStats) {
    if self.config.quiet {
      return;
    }

    self.stat("Methods documented:", stats.methods_documented.to_string());
    if stats.services_excluded > 0 {
      self.stat(
        "Services excluded:",
        format!(
          "{} (namespace '{}')",
          stats.services_excluded, self.config.excluded_namespace
        ),
      );
    }
    self.stat("Pages generated:", stats.artifacts_generated.to_string());
    if stats.duplicate_artifacts > 0 {
      self.stat("", format!("{} duplicates collapsed", stats.duplicate_artifacts));
    }
    self.stat(
      "Referenced types:",
      format!(
        "{} messages, {} enums",
        stats.extra_messages_resolved, stats.extra_enums_resolved
      ),
    );

    if self.config.verbose {
      for method in &stats.documented_methods {
        println!("              {}", method.as_str().with(self.colors.primary()));
      }
    }
  }

  /// Per-method failures go to stderr whatever the verbosity, `--quiet` included.
  fn print_warnings(&self, stats: &GenerationStats) {
    let _ = self.write_warnings(&mut std::io::stderr().lock(), stats);
  }

  fn write_warnings(&self, out: &mut impl Write, stats: &GenerationStats) -> std::io::Result<()> {
    if stats.warnings.is_empty() {
      return Ok(());
    }

    writeln!(out)?;
    for warning in &stats.warnings {
      let label = if warning.is_skipped_item() { "Skipped:" } else { "Warning:" };
      writeln!(
        out,
        "{} {}",
        label.with(self.colors.accent()),
        warning.to_string().with(self.colors.primary())
      )?;
    }
    Ok(())
  }

  fn log_delivery(&self, action: &str, sink: &impl ArtifactSink) {
    self.info(
      &format!("{action}: {}", sink.destination())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn print_delivery(&self, report: &DeliveryReport) {
    self.stat("Pages delivered:", report.delivered.to_string());
    for failure in &report.failures {
      eprintln!(
        "{} {}",
        "Failed:".with(self.colors.accent()),
        format!("{} / {}: {}", failure.category, failure.title, failure.error).with(self.colors.primary())
      );
    }
  }

  fn log_success(&self) {
    if !self.config.quiet {
      println!();
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        "Successfully generated documentation".with(self.colors.success())
      );
    }
  }
}

async fn deliver<'a, S>(
  logger: &GenerateLogger<'_>,
  action: &str,
  sink: &S,
  artifacts: impl IntoIterator<Item = &'a UploadArtifact>,
) -> anyhow::Result<usize>
where
  S: ArtifactSink,
{
  logger.log_delivery(action, sink);
  let report = deliver_all(sink, artifacts).await?;
  logger.print_delivery(&report);
  Ok(report.failures.len())
}

pub async fn generate_docs(config: GenerateConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = GenerateLogger::new(&config, colors);

  logger.log_loading();
  let schema = config.load_schema().await?;
  logger.log_schema(&schema);

  logger.log_generating();
  let renderer = MarkdownRenderer;
  let orchestrator = Orchestrator::new(&schema, config.docgen_config());
  let output = orchestrator.build_all(&renderer);
  logger.print_statistics(&output.stats);
  logger.print_warnings(&output.stats);

  let mut delivery_failures = 0;
  if let Some(root) = &config.output {
    let sink = DirectorySink::new(root, renderer.extension());
    delivery_failures += deliver(&logger, "Writing to", &sink, &output.artifacts).await?;
  }
  if let Some(target) = &config.upload {
    let sink = ShowDocSink::new(&target.endpoint, &target.api_key, &target.api_token);
    delivery_failures += deliver(&logger, "Uploading to", &sink, &output.artifacts).await?;
  }

  let methods_failed = output.stats.methods_failed;
  if methods_failed > 0 || delivery_failures > 0 {
    anyhow::bail!(
      "{methods_failed} method(s) could not be documented, {delivery_failures} page(s) could not be delivered"
    );
  }

  logger.log_success();
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::generator::metrics::GenerationWarning;

  fn command() -> GenerateCommand {
    GenerateCommand {
      input: PathBuf::from("schema.json"),
      output: PathBuf::from("docs/md"),
      exclude_namespace: "grpc.".to_string(),
      no_write: false,
      upload_url: "https://docs.example.com/api".to_string(),
      api_key: None,
      api_token: None,
      verbose: false,
      quiet: true,
    }
  }

  #[test]
  fn test_from_command_without_upload() {
    let config = GenerateConfig::from_command(command()).unwrap();
    assert_eq!(config.output, Some(PathBuf::from("docs/md")));
    assert_eq!(config.upload, None);
    assert_eq!(config.docgen_config().excluded_namespace, "grpc.");
  }

  #[test]
  fn test_from_command_with_upload() {
    let config = GenerateConfig::from_command(GenerateCommand {
      no_write: true,
      api_key: Some("key".to_string()),
      api_token: Some("token".to_string()),
      ..command()
    })
    .unwrap();

    assert_eq!(config.output, None);
    assert_eq!(
      config.upload,
      Some(UploadTarget {
        endpoint: "https://docs.example.com/api".to_string(),
        api_key: "key".to_string(),
        api_token: "token".to_string(),
      })
    );
  }

  #[test]
  fn test_from_command_rejects_partial_credentials() {
    let err = GenerateConfig::from_command(GenerateCommand {
      api_key: Some("key".to_string()),
      ..command()
    })
    .unwrap_err();
    assert!(err.to_string().contains("--api-token"));
  }

  #[test]
  fn test_from_command_rejects_empty_run() {
    let err = GenerateConfig::from_command(GenerateCommand {
      no_write: true,
      ..command()
    })
    .unwrap_err();
    assert!(err.to_string().contains("Nothing to do"));
  }

  #[test]
  fn test_warnings_are_written_when_quiet() {
    let config = GenerateConfig::from_command(command()).unwrap();
    assert!(config.quiet);
    let colors = Colors::new(false, crate::ui::colors::Theme::Dark);
    let logger = GenerateLogger::new(&config, &colors);

    let mut stats = GenerationStats::default();
    stats.record_warning(GenerationWarning::MethodSkipped {
      service: "pkg.Svc".to_string(),
      method: "Get".to_string(),
      error: "unknown type".to_string(),
    });

    let mut out = Vec::new();
    logger.write_warnings(&mut out, &stats).unwrap();
    let out = String::from_utf8(out).unwrap();

    assert!(out.starts_with('\n'));
    assert!(out.contains("Skipped:"));
    assert!(out.contains("Skipped method 'pkg.Svc.Get': unknown type"));
  }

  #[test]
  fn test_no_warnings_writes_nothing() {
    let config = GenerateConfig::from_command(command()).unwrap();
    let colors = Colors::new(false, crate::ui::colors::Theme::Dark);
    let logger = GenerateLogger::new(&config, &colors);

    let mut out = Vec::new();
    logger.write_warnings(&mut out, &GenerationStats::default()).unwrap();
    assert!(out.is_empty());
  }

  #[tokio::test]
  async fn test_generate_docs_writes_fixture_pages() {
    let dir = tempfile::tempdir().unwrap();
    let config = GenerateConfig::from_command(GenerateCommand {
      input: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/greeter.json"),
      output: dir.path().to_path_buf(),
      ..command()
    })
    .unwrap();
    let colors = Colors::new(false, crate::ui::colors::Theme::Dark);

    generate_docs(config, &colors).await.unwrap();

    let say_hello = tokio::fs::read_to_string(dir.path().join("Greeting service/Say hello.md"))
      .await
      .unwrap();
    assert!(say_hello.starts_with("# Say hello\n"));
    assert!(say_hello.contains("### Locale (`greeter.v1.Locale`)"));
    assert!(say_hello.contains("### Tone (`greeter.v1.Tone`)"));
    assert!(say_hello.contains("| TONE_WARM | 1 | Warm and friendly. |"));
    assert!(say_hello.contains("| sent_at | `Timestamp` | optional |  |"));

    let again = dir.path().join("Greeting service/SayHelloAgain.md");
    assert!(again.exists());
    assert!(!dir.path().join("Health").exists());
  }
}
