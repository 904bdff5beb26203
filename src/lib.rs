//! Oqlmap – parameter expansion and result mapping for object query statements.
//!
//! Oqlmap sits between a caller that wants typed domain objects and a query
//! engine that only speaks text statements and untyped result tables:
//! * A [`parameter::ParameterScope`] stages named values for the next statement.
//! * [`expand::expand`] rewrites list-valued parameters into positional scalars,
//!   since the query language cannot bind a list.
//! * A [`schema::SchemaResolver`] decides, per result column, whether it names an
//!   attribute or an association of the return entity.
//! * [`coerce::coerce`] reconciles 32/64-bit integer widths.
//! * A [`mapper::RowMapper`] instantiates one object per row and populates it.
//!
//! ## Modules
//! * [`datatype`] – Scalar [`datatype::Value`]s, parameter values and declared kinds.
//! * [`parameter`] – Per-context parameter staging.
//! * [`expand`] – List parameter expansion.
//! * [`table`] – Result tables as handed back by the engine.
//! * [`schema`] – Entity schemas, the metadata seam and column resolution.
//! * [`coerce`] – Integer width reconciliation.
//! * [`store`] – The object store seam and an in-memory store.
//! * [`mapper`] – Row to object mapping.
//! * [`interface`] – The [`interface::QueryInterface`] facade and the engine seam.
//! * [`settings`] / [`logging`] – Configuration and tracing setup.
//!
//! ## Collaborators
//! Statement execution, persistence and metadata loading are not done here.
//! They are reached through three traits: [`interface::QueryEngine`],
//! [`store::ObjectStore`] and [`schema::Metadata`]. Failures reported by an
//! engine or store are wrapped in [`OqlError::Collaborator`] with the original
//! error kept as its source.
//!
//! ## Quick Start
//! ```
//! use oqlmap::datatype::PrimitiveKind;
//! use oqlmap::parameter::ExecutionContext;
//! use oqlmap::expand::expand;
//! use oqlmap::schema::{EntitySchema, SchemaRegistry};
//!
//! let mut context = ExecutionContext::new();
//! context.add_parameter("TeamList", vec![1i64, 2, 3]);
//! let query = expand("SELECT e.Name FROM HR.Employee e WHERE e.Team IN ($TeamList)", context.parameters()).unwrap();
//! assert_eq!(query.statement, "SELECT e.Name FROM HR.Employee e WHERE e.Team IN ($TeamList_0,$TeamList_1,$TeamList_2)");
//!
//! let registry = SchemaRegistry::new([EntitySchema::new("HR.EmployeeResult")
//!     .attribute("Name", PrimitiveKind::String)
//!     .relationship("HR.EmployeeResult_Team")]);
//! assert_eq!(registry.len(), 1);
//! ```

pub mod coerce;
pub mod datatype;
pub mod error;
pub mod expand;
pub mod interface;
pub mod logging;
pub mod mapper;
pub mod parameter;
pub mod schema;
pub mod settings;
pub mod store;
pub mod table;

pub use error::{BoxError, OqlError, Result};
