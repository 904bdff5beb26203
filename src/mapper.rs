//! Turning result rows into populated target objects.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::coerce::coerce;
use crate::error::{OqlError, Result};
use crate::schema::{Metadata, Resolution, SchemaResolver};
use crate::store::ObjectStore;
use crate::table::ResultTable;

/// How a null cell is handled. A null value never says anything about the
/// schema, so a column is resolved against the entity either way.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullPolicy {
    /// Leave the member unset and log a warning.
    #[default]
    Skip,
    /// Fail the whole mapping.
    Reject,
}

#[derive(Copy, Clone, Debug, Default)]
pub struct RowMapper {
    resolver: SchemaResolver,
    null_policy: NullPolicy,
}

impl RowMapper {
    pub fn new(resolver: SchemaResolver, null_policy: NullPolicy) -> Self {
        Self { resolver, null_policy }
    }
    pub fn null_policy(&self) -> NullPolicy {
        self.null_policy
    }

    /// Maps every row of `table` onto a fresh instance of `entity`, keeping row order.
    ///
    /// All columns are resolved before the first object is instantiated. Any
    /// failure aborts the whole mapping and no objects are returned.
    pub fn map_rows<S, M>(
        &self,
        store: &S,
        metadata: &M,
        table: &ResultTable,
        entity: &str,
    ) -> Result<Vec<S::Object>>
    where
        S: ObjectStore + ?Sized,
        M: Metadata + ?Sized,
    {
        debug!(rows = table.row_count(), entity, "mapping results");
        let resolutions = table
            .columns()
            .iter()
            .map(|column| self.resolver.resolve(metadata, entity, column))
            .collect::<Result<Vec<_>>>()?;

        let mut objects = Vec::with_capacity(table.row_count());
        for (index, row) in table.rows().iter().enumerate() {
            let mut object = store
                .instantiate(entity)
                .map_err(OqlError::collaborator("instantiate"))?;
            trace!(row = index, entity, "instantiated target object");

            for ((column, resolution), value) in table.columns().iter().zip(&resolutions).zip(&row.0) {
                trace!(column = column.name(), "mapping column");
                let Some(value) = value else {
                    match self.null_policy {
                        NullPolicy::Skip => {
                            warn!(column = column.name(), row = index, "skipping null value");
                            continue;
                        }
                        NullPolicy::Reject => {
                            return Err(OqlError::NullValue { column: column.name().to_string(), row: index });
                        }
                    }
                };
                match resolution {
                    Resolution::Attribute { name, kind } => {
                        let value = coerce(value.clone(), *kind, name)?;
                        store
                            .set_attribute(&mut object, name, value)
                            .map_err(OqlError::collaborator("set attribute"))?;
                    }
                    Resolution::Relationship { name } => {
                        let target = value.as_identifier().ok_or_else(|| OqlError::TypeMismatch {
                            column: column.name().to_string(),
                            expected: "Identifier",
                            found: value.data_type(),
                        })?;
                        store
                            .set_relationship(&mut object, name, target)
                            .map_err(OqlError::collaborator("set association"))?;
                    }
                }
            }
            objects.push(object);
        }
        Ok(objects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::{Identifier, PrimitiveKind, Value};
    use crate::schema::{EntitySchema, SchemaRegistry};
    use crate::store::MemoryStore;
    use crate::table::{ColumnDescriptor, Row};

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new([EntitySchema::new("HR.Result")
            .attribute("Name", PrimitiveKind::String)
            .attribute("Count", PrimitiveKind::Long)
            .relationship("HR.Result_Team")])
    }

    #[test]
    fn narrow_values_are_widened_before_setting() {
        let table = ResultTable::with_rows(
            vec![ColumnDescriptor::scalar("Count")],
            vec![Row(vec![Some(Value::Integer(5))])],
        )
        .unwrap();
        let objects = RowMapper::default().map_rows(&MemoryStore::new(), &registry(), &table, "HR.Result").unwrap();
        assert_eq!(objects[0].attribute("Count"), Some(&Value::Long(5)));
    }

    #[test]
    fn null_policy_decides_between_skip_and_fail() {
        let table = ResultTable::with_rows(
            vec![ColumnDescriptor::scalar("Name"), ColumnDescriptor::reference("Result_Team")],
            vec![Row(vec![None, Some(Value::Identifier(Identifier(3)))])],
        )
        .unwrap();
        let store = MemoryStore::new();
        let objects = RowMapper::default().map_rows(&store, &registry(), &table, "HR.Result").unwrap();
        assert!(objects[0].attribute("Name").is_none());
        assert_eq!(objects[0].relationship("HR.Result_Team"), Some(Identifier(3)));

        let strict = RowMapper::new(SchemaResolver::default(), NullPolicy::Reject);
        let err = strict.map_rows(&store, &registry(), &table, "HR.Result").unwrap_err();
        assert!(matches!(err, OqlError::NullValue { row: 0, .. }));
    }

    #[test]
    fn reference_column_requires_identifier_values() {
        let table = ResultTable::with_rows(
            vec![ColumnDescriptor::reference("Result_Team")],
            vec![Row(vec![Some(Value::Long(3))])],
        )
        .unwrap();
        let err = RowMapper::default()
            .map_rows(&MemoryStore::new(), &registry(), &table, "HR.Result")
            .unwrap_err();
        assert!(matches!(err, OqlError::TypeMismatch { .. }));
    }
}
