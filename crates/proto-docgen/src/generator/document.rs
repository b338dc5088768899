use std::collections::{BTreeMap, BTreeSet};

use crate::{
  generator::{
    errors::{DocgenError, MessageRole, ResolveError},
    type_resolver::TypeResolver,
  },
  schema::{EnumDef, MessageDef, MethodDef, SchemaIndex, ServiceDef},
};

/// Everything needed to render the documentation page of one RPC method.
///
/// The model borrows from the schema it was built from and is meant to be rendered
/// and dropped. `extra_messages` never contains the request or response message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentModel<'a> {
  pub service_name: &'a str,
  pub service_full_name: &'a str,
  pub service_description: &'a str,
  pub method: &'a MethodDef,
  pub request: &'a MessageDef,
  pub response: &'a MessageDef,
  pub extra_enums: BTreeMap<&'a str, &'a EnumDef>,
  pub extra_messages: BTreeMap<&'a str, &'a MessageDef>,
}

impl DocumentModel<'_> {
  /// Grouping label: the service description, or its name when the description is blank.
  pub fn category(&self) -> &str {
    non_blank_or(self.service_description, self.service_name)
  }

  /// Page title: the method description, or its name when the description is blank.
  pub fn title(&self) -> &str {
    non_blank_or(self.method.description(), self.method.name())
  }
}

fn non_blank_or<'s>(preferred: &'s str, fallback: &'s str) -> &'s str {
  if preferred.trim().is_empty() { fallback } else { preferred }
}

/// Builds one independent [`DocumentModel`] per call; nothing is carried over between methods.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DocumentBuilder<'a> {
  index: &'a SchemaIndex,
  resolver: TypeResolver<'a>,
}

impl<'a> DocumentBuilder<'a> {
  pub(crate) const fn new(index: &'a SchemaIndex) -> Self {
    Self {
      index,
      resolver: TypeResolver::new(index),
    }
  }

  pub(crate) fn build(&self, service: &'a ServiceDef, method: &'a MethodDef) -> Result<DocumentModel<'a>, DocgenError> {
    let request = self.lookup_message(service, method, MessageRole::Request)?;
    let response = self.lookup_message(service, method, MessageRole::Response)?;

    let referenced = request
      .custom_type_refs()
      .chain(response.custom_type_refs())
      .collect::<BTreeSet<_>>();

    let resolved = self
      .resolver
      .resolve(referenced)
      .map_err(|ResolveError::UnknownType(type_name)| DocgenError::TypeResolution {
        service: service.name().to_string(),
        method: method.name().to_string(),
        type_name,
      })?;

    let mut extra_messages = resolved.messages;
    extra_messages.remove(request.full_name());
    extra_messages.remove(response.full_name());

    Ok(DocumentModel {
      service_name: service.name(),
      service_full_name: service.full_name(),
      service_description: service.description(),
      method,
      request,
      response,
      extra_enums: resolved.enums,
      extra_messages,
    })
  }

  fn lookup_message(
    &self,
    service: &ServiceDef,
    method: &MethodDef,
    role: MessageRole,
  ) -> Result<&'a MessageDef, DocgenError> {
    let type_name = match role {
      MessageRole::Request => method.request_type(),
      MessageRole::Response => method.response_type(),
    };

    self.index.message(type_name).ok_or_else(|| DocgenError::SchemaLookup {
      service: service.name().to_string(),
      method: method.name().to_string(),
      role,
      type_name: type_name.to_string(),
    })
  }
}
