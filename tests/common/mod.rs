#![allow(dead_code)]

use std::sync::Mutex;

use oqlmap::BoxError;
use oqlmap::datatype::{Identifier, PrimitiveKind, Value};
use oqlmap::interface::{QueryEngine, QueryInterface, QueryRequest};
use oqlmap::schema::{EntitySchema, SchemaRegistry};
use oqlmap::store::MemoryStore;
use oqlmap::table::{ColumnDescriptor, ResultTable, Row};

#[derive(Debug, thiserror::Error)]
#[error("engine rejected statement: {0}")]
pub struct EngineError(pub String);

/// Returns a canned table and remembers every request it was handed.
pub struct ScriptedEngine {
    table: ResultTable,
    fail_with: Option<String>,
    pub requests: Mutex<Vec<QueryRequest>>,
}

impl ScriptedEngine {
    pub fn returning(table: ResultTable) -> Self {
        Self { table, fail_with: None, requests: Mutex::new(Vec::new()) }
    }
    pub fn failing(message: &str) -> Self {
        Self { table: ResultTable::default(), fail_with: Some(message.to_string()), requests: Mutex::new(Vec::new()) }
    }
    pub fn last_request(&self) -> QueryRequest {
        self.requests.lock().unwrap().last().cloned().expect("no request issued")
    }
    fn record(&self, request: &QueryRequest) -> Result<(), BoxError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.fail_with {
            Some(message) => Err(EngineError(message.clone()).into()),
            None => Ok(()),
        }
    }
    fn window(&self, request: &QueryRequest) -> Vec<Row> {
        let rows = self.table.rows().iter().skip(request.offset as usize);
        match request.amount {
            Some(amount) => rows.take(amount as usize).cloned().collect(),
            None => rows.cloned().collect(),
        }
    }
}

impl QueryEngine for ScriptedEngine {
    fn execute(&self, request: &QueryRequest) -> Result<ResultTable, BoxError> {
        self.record(request)?;
        Ok(ResultTable::with_rows(self.table.columns().to_vec(), self.window(request))?)
    }
    fn row_count(&self, request: &QueryRequest) -> Result<usize, BoxError> {
        self.record(request)?;
        Ok(self.window(request).len())
    }
}

pub fn registry() -> SchemaRegistry {
    SchemaRegistry::new([
        EntitySchema::new("HR.EmployeeResult")
            .attribute("Name", PrimitiveKind::String)
            .attribute("Age", PrimitiveKind::Integer)
            .attribute("Salary", PrimitiveKind::Long)
            .relationship("HR.Team")
            .relationship("HR.EmployeeResult_Manager")
            .relationship("Audit.EmployeeResult_Manager"),
        EntitySchema::new("HR.Employee").attribute("Name", PrimitiveKind::String),
    ])
}

/// The two row employee table: Ann in team 42, Bo in team 7.
pub fn employee_table() -> ResultTable {
    ResultTable::with_rows(
        vec![ColumnDescriptor::scalar("Name"), ColumnDescriptor::reference("Team")],
        vec![
            Row(vec![Some(Value::from("Ann")), Some(Value::Identifier(Identifier(42)))]),
            Row(vec![Some(Value::from("Bo")), Some(Value::Identifier(Identifier(7)))]),
        ],
    )
    .unwrap()
}

pub fn interface(table: ResultTable) -> QueryInterface<ScriptedEngine, MemoryStore, SchemaRegistry> {
    QueryInterface::new(ScriptedEngine::returning(table), MemoryStore::new(), registry())
}
