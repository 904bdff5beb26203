use thiserror::Error;

/// Errors raised by collaborators are carried unchanged in this box.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum OqlError {
    #[error("Could not find result attribute {column} in target entity {entity}")]
    MissingAttribute { entity: String, column: String },
    #[error("Could not find result association {column} in target entity {entity}")]
    MissingRelationship { entity: String, column: String },
    #[error("Column {column} matches several associations of {entity}: {}", .candidates.join(", "))]
    AmbiguousRelationship { entity: String, column: String, candidates: Vec<String> },
    #[error("Value {value} does not fit the integer attribute {attribute}")]
    NumericOverflow { attribute: String, value: i64 },
    #[error("Malformed parameter expansion: {0}")]
    MalformedParameterExpansion(String),
    #[error("{operation} failed: {source}")]
    Collaborator { operation: &'static str, #[source] source: BoxError },
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),
    #[error("Null value in column {column} of row {row}")]
    NullValue { column: String, row: usize },
    #[error("Column {column} expected {expected} but got {found}")]
    TypeMismatch { column: String, expected: &'static str, found: &'static str },
    #[error("Result has no column to read identifiers from")]
    NoIdentifierColumn,
    #[error("Row has {found} values but the table has {expected} columns")]
    RowArity { expected: usize, found: usize },
    #[error("Config error: {0}")]
    Config(String),
    #[error("Schema error: {0}")]
    Schema(String),
}

pub type Result<T> = std::result::Result<T, OqlError>;

impl OqlError {
    pub(crate) fn collaborator(operation: &'static str) -> impl FnOnce(BoxError) -> Self {
        move |source| Self::Collaborator { operation, source }
    }
}

// Helper conversions
impl From<config::ConfigError> for OqlError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
impl From<serde_json::Error> for OqlError {
    fn from(e: serde_json::Error) -> Self { Self::Schema(e.to_string()) }
}
