use std::path::Path;

use comfy_table::{Attribute, Cell, ContentArrangement, Row, Table};

use crate::{
  generator::orchestrator::{DocgenConfig, Orchestrator},
  schema::SchemaLoader,
  ui::{Colors, colors::IntoComfyColor, term_width},
};

pub async fn list_methods(input: &Path, exclude_namespace: String, colors: &Colors) -> anyhow::Result<()> {
  let schema = SchemaLoader::open(input).await?.parse()?;
  let config = DocgenConfig::builder().excluded_namespace(exclude_namespace).build();
  let orchestrator = Orchestrator::new(&schema, config);

  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut header = Row::new();
  for title in ["SERVICE", "METHOD", "REQUEST", "RESPONSE"] {
    header.add_cell(Cell::new(title).fg(colors.label().into_comfy()));
  }
  table.set_header(header);

  for service in orchestrator.documented_services() {
    for method in service.methods() {
      let mut row = Row::new();
      row.add_cell(Cell::new(service.full_name()).fg(colors.primary().into_comfy()));
      row.add_cell(
        Cell::new(method.name())
          .fg(colors.value().into_comfy())
          .add_attribute(Attribute::Bold),
      );
      row.add_cell(Cell::new(method.request_type()).fg(colors.accent().into_comfy()));
      row.add_cell(Cell::new(method.response_type()).fg(colors.accent().into_comfy()));
      table.add_row(row);
    }
  }

  println!("{table}");

  Ok(())
}
