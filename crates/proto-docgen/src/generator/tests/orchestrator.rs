use super::support::{custom, enum_def, message, method, nested_schema, schema, service};
use crate::{
  generator::{
    document::DocumentModel,
    metrics::GenerationWarning,
    orchestrator::{DocgenConfig, Orchestrator},
  },
  render::{DocumentRenderer, MarkdownRenderer},
  schema::{MethodDef, ServiceDef},
};

/// Renders only what identifies a page, so different methods can collide on purpose.
struct HeadingRenderer;

impl DocumentRenderer for HeadingRenderer {
  fn render(&self, model: &DocumentModel<'_>) -> anyhow::Result<String> {
    Ok(format!("# {} / {}\n", model.category(), model.title()))
  }

  fn extension(&self) -> &'static str {
    "txt"
  }
}

struct FailingRenderer;

impl DocumentRenderer for FailingRenderer {
  fn render(&self, model: &DocumentModel<'_>) -> anyhow::Result<String> {
    if model.method.name() == "Broken" {
      anyhow::bail!("template error");
    }
    Ok(model.method.name().to_string())
  }

  fn extension(&self) -> &'static str {
    "txt"
  }
}

fn described_method(name: &str, description: &str) -> MethodDef {
  MethodDef::builder()
    .name(name)
    .description(description)
    .request_type("pkg.Req")
    .response_type("pkg.Resp")
    .build()
}

fn described_service(full_name: &str, description: &str, methods: Vec<MethodDef>) -> ServiceDef {
  ServiceDef::builder()
    .name(full_name.rsplit('.').next().unwrap_or(full_name))
    .full_name(full_name)
    .description(description)
    .methods(methods)
    .build()
}

#[test]
fn test_build_all_end_to_end() {
  let schema = nested_schema();
  let orchestrator = Orchestrator::new(&schema, DocgenConfig::default());

  let output = orchestrator.build_all(&MarkdownRenderer);

  assert_eq!(output.artifacts.len(), 1);
  let artifact = output.artifacts.first().unwrap();
  assert_eq!(artifact.category, "Svc");
  assert_eq!(artifact.title, "M");
  assert!(artifact.content.contains("## Request"));
  assert!(artifact.content.contains("### Req (`pkg.Req`)"));
  assert!(artifact.content.contains("### Resp (`pkg.Resp`)"));
  assert!(artifact.content.contains("## Referenced messages"));
  assert!(artifact.content.contains("### Inner (`pkg.Inner`)"));
  assert!(artifact.content.contains("## Referenced enums"));
  assert!(artifact.content.contains("### Leaf (`pkg.Leaf`)"));
  assert!(artifact.content.contains("| inner | `pkg.Inner` | optional |  |"));

  assert_eq!(output.stats.services_seen, 1);
  assert_eq!(output.stats.methods_documented, 1);
  assert_eq!(output.stats.extra_messages_resolved, 1);
  assert_eq!(output.stats.extra_enums_resolved, 1);
  assert_eq!(output.stats.documented_methods, vec!["pkg.Svc.M"]);
  assert!(output.stats.warnings.is_empty());
}

#[test]
fn test_excluded_namespace_produces_no_models() {
  let schema = schema(
    vec![message("pkg.Req", vec![]), message("pkg.Resp", vec![])],
    vec![],
    vec![
      service("grpc.health.v1.Health", vec![method("Check", "pkg.Req", "pkg.Resp")]),
      service("pkg.Svc", vec![method("M", "pkg.Req", "pkg.Resp")]),
    ],
  );
  let orchestrator = Orchestrator::new(&schema, DocgenConfig::default());

  let output = orchestrator.build_all(&HeadingRenderer);

  assert_eq!(output.stats.services_seen, 2);
  assert_eq!(output.stats.services_excluded, 1);
  assert_eq!(output.stats.documented_methods, vec!["pkg.Svc.M"]);
  assert_eq!(output.artifacts.len(), 1);
  assert_eq!(
    orchestrator
      .documented_services()
      .map(ServiceDef::full_name)
      .collect::<Vec<_>>(),
    vec!["pkg.Svc"]
  );
}

#[test]
fn test_custom_and_empty_excluded_namespace() {
  let schema = schema(
    vec![message("pkg.Req", vec![]), message("pkg.Resp", vec![])],
    vec![],
    vec![
      service("grpc.health.v1.Health", vec![method("Check", "pkg.Req", "pkg.Resp")]),
      service("internal.admin.Admin", vec![method("Purge", "pkg.Req", "pkg.Resp")]),
    ],
  );

  let internal = Orchestrator::new(&schema, DocgenConfig::builder().excluded_namespace("internal.").build());
  assert_eq!(internal.build_all(&HeadingRenderer).stats.documented_methods, vec![
    "grpc.health.v1.Health.Check"
  ]);

  let nothing = Orchestrator::new(&schema, DocgenConfig::builder().excluded_namespace("").build());
  assert_eq!(nothing.build_all(&HeadingRenderer).stats.services_excluded, 0);
}

#[test]
fn test_identical_artifacts_collapse() {
  let schema = schema(
    vec![message("pkg.Req", vec![]), message("pkg.Resp", vec![])],
    vec![],
    vec![
      described_service("pkg.v1.Orders", "Orders", vec![described_method("Create", "Create order")]),
      described_service("pkg.v2.Orders", "Orders", vec![described_method("CreateV2", "Create order")]),
      described_service("pkg.v1.Users", "Users", vec![described_method("Create", "Create order")]),
    ],
  );
  let orchestrator = Orchestrator::new(&schema, DocgenConfig::default());

  let output = orchestrator.build_all(&HeadingRenderer);

  assert_eq!(output.stats.methods_documented, 3);
  assert_eq!(output.stats.duplicate_artifacts, 1);
  assert_eq!(output.stats.artifacts_generated, 2);
  let titles = output
    .artifacts
    .iter()
    .map(|artifact| (artifact.category.as_str(), artifact.title.as_str()))
    .collect::<Vec<_>>();
  assert_eq!(titles, vec![("Orders", "Create order"), ("Users", "Create order")]);
}

#[test]
fn test_method_failure_does_not_abort_run() {
  let schema = schema(
    vec![
      message("pkg.Req", vec![custom("kind", "pkg.Kind")]),
      message("pkg.Resp", vec![]),
      message("pkg.Bad", vec![custom("ghost", "pkg.Ghost")]),
    ],
    vec![enum_def("pkg.Kind")],
    vec![service(
      "pkg.Svc",
      vec![
        method("Missing", "pkg.Nope", "pkg.Resp"),
        method("Ghost", "pkg.Bad", "pkg.Resp"),
        method("Good", "pkg.Req", "pkg.Resp"),
      ],
    )],
  );
  let orchestrator = Orchestrator::new(&schema, DocgenConfig::default());

  let output = orchestrator.build_all(&HeadingRenderer);

  assert_eq!(output.artifacts.len(), 1);
  assert_eq!(output.stats.methods_documented, 1);
  assert_eq!(output.stats.methods_failed, 2);
  assert!(output.stats.warnings.iter().all(GenerationWarning::is_skipped_item));
  assert_eq!(
    output.stats.warnings[0].to_string(),
    "Skipped method 'pkg.Svc.Missing': Svc.Missing: request type 'pkg.Nope' is not a known message"
  );
  assert!(output.stats.warnings[1].to_string().contains("'pkg.Ghost'"));
}

#[test]
fn test_render_failure_is_recorded() {
  let schema = schema(
    vec![message("pkg.Req", vec![]), message("pkg.Resp", vec![])],
    vec![],
    vec![service(
      "pkg.Svc",
      vec![method("Broken", "pkg.Req", "pkg.Resp"), method("Fine", "pkg.Req", "pkg.Resp")],
    )],
  );
  let orchestrator = Orchestrator::new(&schema, DocgenConfig::default());

  let output = orchestrator.build_all(&FailingRenderer);

  assert_eq!(output.artifacts.len(), 1);
  assert_eq!(output.stats.methods_failed, 1);
  assert_eq!(
    output.stats.warnings,
    vec![GenerationWarning::RenderFailed {
      service: "pkg.Svc".to_string(),
      method: "Broken".to_string(),
      error: "template error".to_string(),
    }]
  );
}

#[test]
fn test_markdown_output_is_deterministic() {
  let schema = nested_schema();
  let orchestrator = Orchestrator::new(&schema, DocgenConfig::default());
  let service = &schema.services()[0];

  let model = orchestrator.build_model(service, &service.methods()[0]).unwrap();
  let first = MarkdownRenderer.render(&model).unwrap();
  let second = MarkdownRenderer.render(&model).unwrap();

  assert_eq!(first, second);
  assert_eq!(MarkdownRenderer.extension(), "md");
}
