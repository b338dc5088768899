use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::{
  generator::errors::ResolveError,
  schema::{EnumDef, MessageDef, SchemaIndex},
};

/// Custom types reachable from a set of starting names, keyed by fully-qualified name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResolvedTypes<'a> {
  pub enums: BTreeMap<&'a str, &'a EnumDef>,
  pub messages: BTreeMap<&'a str, &'a MessageDef>,
}

/// Computes the transitive closure of custom type references over a [`SchemaIndex`].
///
/// Traversal is breadth-first over an explicit frontier. Every name is expanded at
/// most once, so cyclic and diamond-shaped schemas terminate and yield each type a
/// single time. Enums are leaves. Names are looked up in the enum map first, then in
/// the message map; the index guarantees the two never overlap.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TypeResolver<'a> {
  index: &'a SchemaIndex,
}

impl<'a> TypeResolver<'a> {
  pub(crate) const fn new(index: &'a SchemaIndex) -> Self {
    Self { index }
  }

  pub(crate) fn resolve<I>(&self, starting: I) -> Result<ResolvedTypes<'a>, ResolveError>
  where
    I: IntoIterator<Item = &'a str>,
  {
    let mut resolved = ResolvedTypes::default();
    let mut visited = BTreeSet::new();
    let mut frontier = starting.into_iter().collect::<VecDeque<_>>();

    while let Some(type_name) = frontier.pop_front() {
      if !visited.insert(type_name) {
        continue;
      }

      if let Some(enum_def) = self.index.enum_def(type_name) {
        resolved.enums.insert(enum_def.full_name(), enum_def);
        continue;
      }

      let message = self
        .index
        .message(type_name)
        .ok_or_else(|| ResolveError::UnknownType(type_name.to_string()))?;
      resolved.messages.insert(message.full_name(), message);
      frontier.extend(message.custom_type_refs().filter(|name| !visited.contains(name)));
    }

    Ok(resolved)
  }
}
