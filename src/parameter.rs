//! Staging of named parameters for the next query.
//!
//! A [`ParameterScope`] holds the parameters staged for the next statement
//! issued on one logical execution context. Scopes are plain values owned by
//! an [`ExecutionContext`], so two contexts never observe each other's
//! parameters and no process-wide registry exists.

use std::collections::BTreeMap;
use std::collections::btree_map::Iter;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use tracing::trace;

use crate::datatype::{Identifier, ParameterValue, Value};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParameterScope {
    // ordered by name so that expansion is deterministic
    parameters: BTreeMap<String, ParameterValue>,
}

impl ParameterScope {
    pub fn new() -> Self {
        Self::default()
    }
    /// Inserts or overwrites the parameter `name`.
    pub fn add<V: Into<ParameterValue>>(&mut self, name: impl Into<String>, value: V) {
        let name = name.into();
        let value = value.into();
        trace!(parameter = %name, %value, "staging parameter");
        self.parameters.insert(name, value);
    }
    pub fn add_boolean(&mut self, name: impl Into<String>, value: bool) {
        self.add(name, value);
    }
    pub fn add_datetime(&mut self, name: impl Into<String>, value: DateTime<Utc>) {
        self.add(name, value);
    }
    pub fn add_decimal(&mut self, name: impl Into<String>, value: BigDecimal) {
        self.add(name, value);
    }
    pub fn add_long(&mut self, name: impl Into<String>, value: i64) {
        self.add(name, value);
    }
    /// Stages a reference to a persisted object.
    pub fn add_object(&mut self, name: impl Into<String>, value: Identifier) {
        self.add(name, value);
    }
    pub fn add_string(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let value: String = value.into();
        self.add(name, value);
    }
    pub fn add_list<V: Into<Value>>(&mut self, name: impl Into<String>, values: Vec<V>) {
        self.add(name, values);
    }
    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.parameters.get(name)
    }
    pub fn len(&self) -> usize {
        self.parameters.len()
    }
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
    pub fn iter(&self) -> Iter<'_, String, ParameterValue> {
        self.parameters.iter()
    }
    /// Discards every staged parameter.
    pub fn reset(&mut self) {
        self.parameters = BTreeMap::new();
    }
}

impl<'a> IntoIterator for &'a ParameterScope {
    type Item = (&'a String, &'a ParameterValue);
    type IntoIter = Iter<'a, String, ParameterValue>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One logical thread of control, e.g. a single inbound request.
///
/// The scope is created on first access and lives until the context is
/// dropped; it is cleared after each query unless the caller preserves it.
#[derive(Debug, Default)]
pub struct ExecutionContext {
    scope: Option<ParameterScope>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }
    /// The live scope for the next query.
    pub fn parameters(&mut self) -> &mut ParameterScope {
        self.scope.get_or_insert_with(ParameterScope::new)
    }
    pub fn add_parameter<V: Into<ParameterValue>>(&mut self, name: impl Into<String>, value: V) {
        self.parameters().add(name, value);
    }
    pub fn reset_parameters(&mut self) {
        self.scope = Some(ParameterScope::new());
    }
}
