use crate::schema::{EnumDef, EnumValueDef, FieldDef, MessageDef, MethodDef, Schema, SchemaIndex, ServiceDef};

fn simple_name(full_name: &str) -> &str {
  full_name.rsplit('.').next().unwrap_or(full_name)
}

pub(super) fn scalar(name: &str, type_name: &str) -> FieldDef {
  FieldDef::builder().name(name).type_name(type_name).build()
}

pub(super) fn custom(name: &str, full_type: &str) -> FieldDef {
  FieldDef::builder()
    .name(name)
    .type_name(simple_name(full_type))
    .full_type(full_type)
    .build()
}

pub(super) fn message(full_name: &str, fields: Vec<FieldDef>) -> MessageDef {
  MessageDef::builder()
    .name(simple_name(full_name))
    .full_name(full_name)
    .fields(fields)
    .build()
}

pub(super) fn enum_def(full_name: &str) -> EnumDef {
  EnumDef::builder()
    .name(simple_name(full_name))
    .full_name(full_name)
    .values(vec![
      EnumValueDef::builder().name("UNSPECIFIED").number("0").build(),
      EnumValueDef::builder().name("ACTIVE").number("1").build(),
    ])
    .build()
}

pub(super) fn method(name: &str, request_type: &str, response_type: &str) -> MethodDef {
  MethodDef::builder()
    .name(name)
    .request_type(request_type)
    .response_type(response_type)
    .build()
}

pub(super) fn service(full_name: &str, methods: Vec<MethodDef>) -> ServiceDef {
  ServiceDef::builder()
    .name(simple_name(full_name))
    .full_name(full_name)
    .methods(methods)
    .build()
}

pub(super) fn index(messages: Vec<MessageDef>, enums: Vec<EnumDef>) -> SchemaIndex {
  SchemaIndex::new(messages, enums).expect("test schema must be consistent")
}

pub(super) fn schema(messages: Vec<MessageDef>, enums: Vec<EnumDef>, services: Vec<ServiceDef>) -> Schema {
  Schema::new(index(messages, enums), services)
}

/// `pkg.Req{inner: pkg.Inner}`, `pkg.Resp{}`, `pkg.Inner{leaf: pkg.Leaf}`, enum `pkg.Leaf`.
pub(super) fn nested_schema() -> Schema {
  schema(
    vec![
      message("pkg.Req", vec![custom("inner", "pkg.Inner"), scalar("id", "int64")]),
      message("pkg.Resp", vec![]),
      message("pkg.Inner", vec![custom("leaf", "pkg.Leaf")]),
    ],
    vec![enum_def("pkg.Leaf")],
    vec![service("pkg.Svc", vec![method("M", "pkg.Req", "pkg.Resp")])],
  )
}

pub(super) fn keys<'a, V>(map: &std::collections::BTreeMap<&'a str, V>) -> Vec<&'a str> {
  map.keys().copied().collect()
}
