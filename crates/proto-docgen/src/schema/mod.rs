//! Resolved protobuf schema model.
//!
//! These types are produced once during ingestion and are read-only afterwards.
//! The generator only ever borrows from them, so a [`Schema`] outlives every
//! documentation model built from it.

pub mod loader;

use std::collections::{BTreeMap, btree_map::Entry};

use bon::bon;
use serde::Deserialize;
use strum::Display;
use thiserror::Error;

pub(crate) use loader::SchemaLoader;

/// Package whose types are rendered as scalars and never expanded.
const WELL_KNOWN_PACKAGE: &str = "google.protobuf.";

/// Collapses embedded line breaks into single spaces.
///
/// Applying it twice yields the same text as applying it once.
#[must_use]
pub(crate) fn single_line(text: &str) -> String {
  text.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
  #[error("type '{0}' is declared more than once")]
  DuplicateType(String),
  #[error("type '{0}' is declared both as a message and as an enum")]
  AmbiguousType(String),
}

/// Cardinality of a message field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FieldLabel {
  #[default]
  Optional,
  Required,
  Repeated,
}

/// A single member of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
  name: String,
  type_name: String,
  full_type: Option<String>,
  label: FieldLabel,
  description: String,
}

#[bon]
impl FieldDef {
  /// `full_type` is kept only for user-defined messages and enums; blank names and
  /// well-known types are treated as scalars.
  #[builder]
  pub fn new(
    #[builder(into)] name: String,
    #[builder(into)] type_name: String,
    #[builder(into)] full_type: Option<String>,
    #[builder(default)] label: FieldLabel,
    #[builder(into, default)] description: String,
  ) -> Self {
    let full_type = full_type
      .map(|full_type| full_type.trim().trim_start_matches('.').to_string())
      .filter(|full_type| !full_type.is_empty() && !full_type.starts_with(WELL_KNOWN_PACKAGE));

    Self {
      name,
      type_name,
      full_type,
      label,
      description: single_line(&description),
    }
  }
}

impl FieldDef {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn type_name(&self) -> &str {
    &self.type_name
  }

  pub fn full_type(&self) -> Option<&str> {
    self.full_type.as_deref()
  }

  pub const fn label(&self) -> FieldLabel {
    self.label
  }

  pub fn description(&self) -> &str {
    &self.description
  }

  /// Whether the field references a user-defined message or enum.
  pub const fn is_custom(&self) -> bool {
    self.full_type.is_some()
  }

  /// Type shown to readers: the fully-qualified name for custom types, the declared name otherwise.
  pub fn display_type(&self) -> &str {
    self.full_type().unwrap_or(self.type_name())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDef {
  name: String,
  full_name: String,
  description: String,
  fields: Vec<FieldDef>,
}

#[bon]
impl MessageDef {
  #[builder]
  pub fn new(
    #[builder(into)] name: String,
    #[builder(into)] full_name: String,
    #[builder(into, default)] description: String,
    #[builder(default)] fields: Vec<FieldDef>,
  ) -> Self {
    Self {
      name,
      full_name,
      description: single_line(&description),
      fields,
    }
  }
}

impl MessageDef {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn full_name(&self) -> &str {
    &self.full_name
  }

  pub fn description(&self) -> &str {
    &self.description
  }

  pub fn fields(&self) -> &[FieldDef] {
    &self.fields
  }

  /// Fully-qualified names of the custom types referenced by this message's own fields.
  pub fn custom_type_refs(&self) -> impl Iterator<Item = &str> {
    self
      .fields
      .iter()
      .filter(|field| field.is_custom())
      .filter_map(FieldDef::full_type)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValueDef {
  name: String,
  number: String,
  description: String,
}

#[bon]
impl EnumValueDef {
  #[builder]
  pub fn new(
    #[builder(into)] name: String,
    #[builder(into)] number: String,
    #[builder(into, default)] description: String,
  ) -> Self {
    Self {
      name,
      number,
      description: single_line(&description),
    }
  }
}

impl EnumValueDef {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn number(&self) -> &str {
    &self.number
  }

  pub fn description(&self) -> &str {
    &self.description
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
  name: String,
  full_name: String,
  description: String,
  values: Vec<EnumValueDef>,
}

#[bon]
impl EnumDef {
  #[builder]
  pub fn new(
    #[builder(into)] name: String,
    #[builder(into)] full_name: String,
    #[builder(into, default)] description: String,
    #[builder(default)] values: Vec<EnumValueDef>,
  ) -> Self {
    Self {
      name,
      full_name,
      description: single_line(&description),
      values,
    }
  }
}

impl EnumDef {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn full_name(&self) -> &str {
    &self.full_name
  }

  pub fn description(&self) -> &str {
    &self.description
  }

  pub fn values(&self) -> &[EnumValueDef] {
    &self.values
  }
}

/// One RPC operation of a service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDef {
  name: String,
  description: String,
  request_type: String,
  response_type: String,
}

#[bon]
impl MethodDef {
  #[builder]
  pub fn new(
    #[builder(into)] name: String,
    #[builder(into, default)] description: String,
    #[builder(into)] request_type: String,
    #[builder(into)] response_type: String,
  ) -> Self {
    Self {
      name,
      description: single_line(&description),
      request_type: request_type.trim_start_matches('.').to_string(),
      response_type: response_type.trim_start_matches('.').to_string(),
    }
  }
}

impl MethodDef {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn description(&self) -> &str {
    &self.description
  }

  pub fn request_type(&self) -> &str {
    &self.request_type
  }

  pub fn response_type(&self) -> &str {
    &self.response_type
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDef {
  name: String,
  full_name: String,
  description: String,
  methods: Vec<MethodDef>,
}

#[bon]
impl ServiceDef {
  #[builder]
  pub fn new(
    #[builder(into)] name: String,
    #[builder(into)] full_name: String,
    #[builder(into, default)] description: String,
    #[builder(default)] methods: Vec<MethodDef>,
  ) -> Self {
    Self {
      name,
      full_name,
      description: single_line(&description),
      methods,
    }
  }
}

impl ServiceDef {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn full_name(&self) -> &str {
    &self.full_name
  }

  pub fn description(&self) -> &str {
    &self.description
  }

  pub fn methods(&self) -> &[MethodDef] {
    &self.methods
  }
}

/// Fully-qualified name lookup for every message and enum in the schema.
///
/// The two maps are disjoint: a name belongs to at most one of them.
#[derive(Debug, Default)]
pub struct SchemaIndex {
  messages: BTreeMap<String, MessageDef>,
  enums: BTreeMap<String, EnumDef>,
}

impl SchemaIndex {
  pub fn new(
    messages: impl IntoIterator<Item = MessageDef>,
    enums: impl IntoIterator<Item = EnumDef>,
  ) -> Result<Self, SchemaError> {
    let mut index = Self::default();

    for message in messages {
      match index.messages.entry(message.full_name().to_string()) {
        Entry::Occupied(entry) => return Err(SchemaError::DuplicateType(entry.key().clone())),
        Entry::Vacant(entry) => {
          entry.insert(message);
        }
      }
    }

    for enum_def in enums {
      if index.messages.contains_key(enum_def.full_name()) {
        return Err(SchemaError::AmbiguousType(enum_def.full_name().to_string()));
      }
      match index.enums.entry(enum_def.full_name().to_string()) {
        Entry::Occupied(entry) => return Err(SchemaError::DuplicateType(entry.key().clone())),
        Entry::Vacant(entry) => {
          entry.insert(enum_def);
        }
      }
    }

    Ok(index)
  }

  pub fn message(&self, full_name: &str) -> Option<&MessageDef> {
    self.messages.get(full_name)
  }

  pub fn enum_def(&self, full_name: &str) -> Option<&EnumDef> {
    self.enums.get(full_name)
  }

  pub fn message_count(&self) -> usize {
    self.messages.len()
  }

  pub fn enum_count(&self) -> usize {
    self.enums.len()
  }
}

/// A fully ingested schema: the type index plus services in declaration order.
#[derive(Debug, Default)]
pub struct Schema {
  index: SchemaIndex,
  services: Vec<ServiceDef>,
}

impl Schema {
  pub const fn new(index: SchemaIndex, services: Vec<ServiceDef>) -> Self {
    Self { index, services }
  }

  pub const fn index(&self) -> &SchemaIndex {
    &self.index
  }

  pub fn services(&self) -> &[ServiceDef] {
    &self.services
  }
}
