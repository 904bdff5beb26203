//! Public query surface.
//!
//! [`QueryInterface`] ties together parameter expansion, the query engine and
//! the row mapper. Every operation takes the caller's [`ParameterScope`]
//! explicitly and clears it once the operation is over, whether it succeeded
//! or not, unless the caller asks to preserve it.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::datatype::{Identifier, Value};
use crate::error::{BoxError, OqlError, Result};
use crate::expand::expand;
use crate::mapper::{NullPolicy, RowMapper};
use crate::parameter::ParameterScope;
use crate::schema::{Metadata, SchemaResolver};
use crate::settings::Settings;
use crate::store::ObjectStore;
use crate::table::ResultTable;

/// A fully expanded statement with its retrieval window.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub statement: String,
    pub parameters: BTreeMap<String, Value>,
    /// Maximum number of rows; `None` retrieves everything.
    pub amount: Option<u64>,
    pub offset: u64,
}

/// The engine that actually runs statements.
pub trait QueryEngine {
    fn execute(&self, request: &QueryRequest) -> std::result::Result<ResultTable, BoxError>;
    fn row_count(&self, request: &QueryRequest) -> std::result::Result<usize, BoxError>;
}

pub struct QueryInterface<E, S, M> {
    engine: E,
    store: S,
    metadata: M,
    mapper: RowMapper,
    default_amount: Option<u64>,
}

impl<E, S, M> QueryInterface<E, S, M>
where
    E: QueryEngine,
    S: ObjectStore,
    M: Metadata,
{
    pub fn new(engine: E, store: S, metadata: M) -> Self {
        Self { engine, store, metadata, mapper: RowMapper::default(), default_amount: None }
    }
    pub fn from_settings(engine: E, store: S, metadata: M, settings: &Settings) -> Self {
        Self {
            engine,
            store,
            metadata,
            mapper: RowMapper::new(SchemaResolver::new(settings.ambiguity_policy), settings.null_policy),
            default_amount: settings.default_amount,
        }
    }
    pub fn with_mapper(mut self, mapper: RowMapper) -> Self {
        self.mapper = mapper;
        self
    }
    pub fn engine(&self) -> &E {
        &self.engine
    }

    fn prepare_request(
        &self,
        scope: &ParameterScope,
        statement: &str,
        amount: Option<u64>,
        offset: u64,
    ) -> Result<QueryRequest> {
        debug!(statement, "preparing query");
        let expanded = expand(statement, scope)?;
        if expanded.statement != statement {
            debug!(statement = %expanded.statement, "statement rewritten");
        }
        Ok(QueryRequest {
            statement: expanded.statement,
            parameters: expanded.parameters,
            amount: amount.or(self.default_amount),
            offset,
        })
    }

    fn retrieve(&self, request: &QueryRequest) -> Result<ResultTable> {
        self.engine.execute(request).map_err(OqlError::collaborator("execute query"))
    }

    /// Counts the rows `statement` yields, starting at offset zero.
    pub fn count_rows(
        &self,
        scope: &mut ParameterScope,
        statement: &str,
        amount: Option<u64>,
        preserve_parameters: bool,
    ) -> Result<usize> {
        let result = self.prepare_request(scope, statement, amount, 0).and_then(|request| {
            self.engine.row_count(&request).map_err(OqlError::collaborator("count rows"))
        });
        finish(scope, preserve_parameters, result)
    }

    /// Runs `statement` and maps each row onto a new `entity` object.
    pub fn execute(
        &self,
        scope: &mut ParameterScope,
        statement: &str,
        entity: &str,
        amount: Option<u64>,
        offset: u64,
        preserve_parameters: bool,
    ) -> Result<Vec<S::Object>> {
        let result = self.prepare_request(scope, statement, amount, offset).and_then(|request| {
            let table = self.retrieve(&request)?;
            self.mapper.map_rows(&self.store, &self.metadata, &table, entity)
        });
        finish(scope, preserve_parameters, result)
    }

    /// Runs `statement` and returns the identities found in its first column.
    pub fn execute_for_identifiers(
        &self,
        scope: &mut ParameterScope,
        statement: &str,
        preserve_parameters: bool,
    ) -> Result<Vec<Identifier>> {
        let result = self
            .prepare_request(scope, statement, None, 0)
            .and_then(|request| self.collect_identifiers(&self.retrieve(&request)?));
        finish(scope, preserve_parameters, result)
    }

    /// Like [`execute_for_identifiers`](Self::execute_for_identifiers), then loads the
    /// persisted objects behind those identities.
    pub fn execute_for_objects(
        &self,
        scope: &mut ParameterScope,
        statement: &str,
        preserve_parameters: bool,
    ) -> Result<Vec<S::Object>> {
        let ids = self.execute_for_identifiers(scope, statement, preserve_parameters)?;
        debug!(count = ids.len(), "retrieving objects");
        self.store.retrieve(&ids).map_err(OqlError::collaborator("retrieve objects"))
    }

    fn collect_identifiers(&self, table: &ResultTable) -> Result<Vec<Identifier>> {
        let Some(column) = table.columns().first() else {
            return Err(OqlError::NoIdentifierColumn);
        };
        let mut ids = Vec::with_capacity(table.row_count());
        for (index, row) in table.rows().iter().enumerate() {
            match row.value(0) {
                Some(value) => ids.push(value.as_identifier().ok_or_else(|| OqlError::TypeMismatch {
                    column: column.name().to_string(),
                    expected: "Identifier",
                    found: value.data_type(),
                })?),
                None if self.mapper.null_policy() == NullPolicy::Skip => {
                    warn!(column = column.name(), row = index, "skipping null identifier");
                }
                None => return Err(OqlError::NullValue { column: column.name().to_string(), row: index }),
            }
        }
        Ok(ids)
    }
}

fn finish<T>(scope: &mut ParameterScope, preserve_parameters: bool, result: Result<T>) -> Result<T> {
    if !preserve_parameters {
        scope.reset();
    }
    result
}
