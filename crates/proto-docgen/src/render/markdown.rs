use std::fmt::Write;

use itertools::Itertools;

use super::DocumentRenderer;
use crate::{
  generator::document::DocumentModel,
  schema::{EnumDef, MessageDef},
};

const FIELD_HEADER: [&str; 4] = ["Field", "Type", "Label", "Description"];
const ENUM_HEADER: [&str; 3] = ["Name", "Number", "Description"];

/// Renders a page as GitHub-flavoured Markdown.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl DocumentRenderer for MarkdownRenderer {
  fn render(&self, model: &DocumentModel<'_>) -> anyhow::Result<String> {
    let mut out = String::new();

    writeln!(out, "# {}", model.title())?;
    writeln!(out)?;
    writeln!(
      out,
      "**Service:** `{}` | **Method:** `{}`",
      model.service_full_name,
      model.method.name()
    )?;
    writeln!(out)?;
    if !model.method.description().trim().is_empty() {
      writeln!(out, "{}", model.method.description())?;
      writeln!(out)?;
    }

    write_message_section(&mut out, "Request", model.request)?;
    write_message_section(&mut out, "Response", model.response)?;

    if !model.extra_messages.is_empty() {
      writeln!(out, "## Referenced messages")?;
      writeln!(out)?;
      for message in model.extra_messages.values() {
        write_message(&mut out, "###", message)?;
      }
    }

    if !model.extra_enums.is_empty() {
      writeln!(out, "## Referenced enums")?;
      writeln!(out)?;
      for enum_def in model.extra_enums.values() {
        write_enum(&mut out, enum_def)?;
      }
    }

    Ok(out.trim_end().to_string() + "\n")
  }

  fn extension(&self) -> &'static str {
    "md"
  }
}

fn write_message_section(out: &mut String, heading: &str, message: &MessageDef) -> std::fmt::Result {
  writeln!(out, "## {heading}")?;
  writeln!(out)?;
  write_message(out, "###", message)
}

fn write_message(out: &mut String, level: &str, message: &MessageDef) -> std::fmt::Result {
  writeln!(out, "{level} {} (`{}`)", message.name(), message.full_name())?;
  writeln!(out)?;
  write_description(out, message.description())?;

  if message.fields().is_empty() {
    writeln!(out, "_No fields._")?;
    return writeln!(out);
  }

  write_row(out, FIELD_HEADER)?;
  write_separator(out, FIELD_HEADER.len())?;
  for field in message.fields() {
    let type_cell = format!("`{}`", field.display_type());
    write_row(
      out,
      [
        field.name(),
        type_cell.as_str(),
        &field.label().to_string(),
        field.description(),
      ],
    )?;
  }
  writeln!(out)
}

fn write_enum(out: &mut String, enum_def: &EnumDef) -> std::fmt::Result {
  writeln!(out, "### {} (`{}`)", enum_def.name(), enum_def.full_name())?;
  writeln!(out)?;
  write_description(out, enum_def.description())?;

  write_row(out, ENUM_HEADER)?;
  write_separator(out, ENUM_HEADER.len())?;
  for value in enum_def.values() {
    write_row(out, [value.name(), value.number(), value.description()])?;
  }
  writeln!(out)
}

fn write_description(out: &mut String, description: &str) -> std::fmt::Result {
  if description.trim().is_empty() {
    return Ok(());
  }
  writeln!(out, "{description}")?;
  writeln!(out)
}

fn write_row<'a>(out: &mut String, cells: impl IntoIterator<Item = &'a str>) -> std::fmt::Result {
  writeln!(out, "| {} |", cells.into_iter().map(escape_cell).join(" | "))
}

fn write_separator(out: &mut String, columns: usize) -> std::fmt::Result {
  writeln!(out, "|{}", "---|".repeat(columns))
}

fn escape_cell(text: &str) -> String {
  text.replace('|', "\\|")
}
