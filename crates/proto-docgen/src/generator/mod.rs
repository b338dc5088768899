pub mod document;
pub mod errors;
pub mod metrics;
pub mod orchestrator;
pub(crate) mod type_resolver;

#[cfg(test)]
mod tests;
