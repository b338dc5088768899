use std::path::Path;

use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};
use serde::Deserialize;

use super::{EnumDef, EnumValueDef, FieldDef, FieldLabel, MessageDef, MethodDef, Schema, SchemaIndex, ServiceDef};

/// Descriptor dump written by the upstream protobuf parser.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SchemaDocument {
  messages: Vec<RawMessage>,
  enums: Vec<RawEnum>,
  services: Vec<RawService>,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
  name: String,
  full_name: String,
  #[serde(default)]
  description: String,
  #[serde(default)]
  fields: Vec<RawField>,
}

#[derive(Debug, Deserialize)]
struct RawField {
  name: String,
  #[serde(rename = "type")]
  type_name: String,
  #[serde(default)]
  full_type: Option<String>,
  #[serde(default)]
  label: FieldLabel,
  #[serde(default)]
  description: String,
}

#[derive(Debug, Deserialize)]
struct RawEnum {
  name: String,
  full_name: String,
  #[serde(default)]
  description: String,
  #[serde(default)]
  values: Vec<RawEnumValue>,
}

#[derive(Debug, Deserialize)]
struct RawEnumValue {
  name: String,
  number: EnumNumber,
  #[serde(default)]
  description: String,
}

/// Enum tags arrive either as JSON numbers or as already-formatted text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EnumNumber {
  Int(i64),
  Text(String),
}

impl From<EnumNumber> for String {
  fn from(number: EnumNumber) -> Self {
    match number {
      EnumNumber::Int(value) => value.to_string(),
      EnumNumber::Text(text) => text,
    }
  }
}

#[derive(Debug, Deserialize)]
struct RawService {
  name: String,
  full_name: String,
  #[serde(default)]
  description: String,
  #[serde(default)]
  methods: Vec<RawMethod>,
}

#[derive(Debug, Deserialize)]
struct RawMethod {
  name: String,
  #[serde(default)]
  description: String,
  request_type: String,
  response_type: String,
}

impl SchemaDocument {
  pub(crate) fn from_slice(bytes: &[u8]) -> anyhow::Result<Self> {
    let deserializer = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(deserializer)
      .map_err(|err| anyhow::anyhow!("invalid schema document at '{}': {}", err.path(), err.inner()))
  }

  pub(crate) fn into_schema(self) -> anyhow::Result<Schema> {
    let messages = self.messages.into_iter().map(|message| {
      let fields = message
        .fields
        .into_iter()
        .map(|field| {
          FieldDef::builder()
            .name(field.name)
            .type_name(field.type_name)
            .maybe_full_type(field.full_type)
            .label(field.label)
            .description(field.description)
            .build()
        })
        .collect();
      MessageDef::builder()
        .name(message.name)
        .full_name(message.full_name)
        .description(message.description)
        .fields(fields)
        .build()
    });

    let enums = self.enums.into_iter().map(|enum_def| {
      let values = enum_def
        .values
        .into_iter()
        .map(|value| {
          EnumValueDef::builder()
            .name(value.name)
            .number(value.number)
            .description(value.description)
            .build()
        })
        .collect();
      EnumDef::builder()
        .name(enum_def.name)
        .full_name(enum_def.full_name)
        .description(enum_def.description)
        .values(values)
        .build()
    });

    let index = SchemaIndex::new(messages, enums)?;

    let services = self
      .services
      .into_iter()
      .map(|service| {
        let methods = service
          .methods
          .into_iter()
          .map(|method| {
            MethodDef::builder()
              .name(method.name)
              .description(method.description)
              .request_type(method.request_type)
              .response_type(method.response_type)
              .build()
          })
          .collect();
        ServiceDef::builder()
          .name(service.name)
          .full_name(service.full_name)
          .description(service.description)
          .methods(methods)
          .build()
      })
      .collect();

    Ok(Schema::new(index, services))
  }
}

pub struct SchemaLoader {
  file: AsyncMmapFile,
}

impl SchemaLoader {
  pub async fn open(path: &Path) -> anyhow::Result<Self> {
    let file = AsyncMmapFile::open(path).await?;
    Ok(Self { file })
  }

  pub fn parse(&self) -> anyhow::Result<Schema> {
    SchemaDocument::from_slice(self.file.as_slice())?.into_schema()
  }
}
