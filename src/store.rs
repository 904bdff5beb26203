//! Object store seam and an in-memory implementation.
//!
//! The mapper only ever instantiates objects and sets members on them.
//! Ownership, persistence and deletion stay with the store.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::datatype::{Identifier, PrimitiveKind, Value};
use crate::error::BoxError;
use crate::schema::{Metadata, SchemaRegistry};

pub trait ObjectStore {
    type Object;
    fn instantiate(&self, entity: &str) -> Result<Self::Object, BoxError>;
    fn set_attribute(&self, object: &mut Self::Object, name: &str, value: Value) -> Result<(), BoxError>;
    fn set_relationship(
        &self,
        object: &mut Self::Object,
        name: &str,
        target: Identifier,
    ) -> Result<(), BoxError>;
    /// Loads the persisted objects with the given identities, in the same order.
    fn retrieve(&self, ids: &[Identifier]) -> Result<Vec<Self::Object>, BoxError>;
}

// ------------- Dynamic objects -------------
/// An untyped instance of an entity, populated member by member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DynamicObject {
    entity: String,
    id: Identifier,
    attributes: BTreeMap<String, Value>,
    relationships: BTreeMap<String, Identifier>,
}

impl DynamicObject {
    pub fn new(entity: impl Into<String>, id: Identifier) -> Self {
        Self {
            entity: entity.into(),
            id,
            attributes: BTreeMap::new(),
            relationships: BTreeMap::new(),
        }
    }
    pub fn entity(&self) -> &str {
        &self.entity
    }
    pub fn id(&self) -> Identifier {
        self.id
    }
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }
    pub fn relationship(&self, name: &str) -> Option<Identifier> {
        self.relationships.get(name).copied()
    }
    pub fn set_attribute(&mut self, name: impl Into<String>, value: Value) {
        self.attributes.insert(name.into(), value);
    }
    pub fn set_relationship(&mut self, name: impl Into<String>, target: Identifier) {
        self.relationships.insert(name.into(), target);
    }
}
impl fmt::Display for DynamicObject {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}#{}", self.entity, self.id)
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Object {0} does not exist")]
    NotFound(Identifier),
    #[error("Attribute {attribute} does not exist on {entity}")]
    NoSuchAttribute { entity: String, attribute: String },
    #[error("Attribute {attribute} is {kind} and cannot hold a {found} value")]
    IncompatibleValue { attribute: String, kind: PrimitiveKind, found: &'static str },
    #[error("Store is unavailable: {0}")]
    Unavailable(String),
}

fn accepts(kind: PrimitiveKind, value: &Value) -> bool {
    matches!(
        (kind, value),
        (PrimitiveKind::Boolean, Value::Boolean(_))
            | (PrimitiveKind::Integer, Value::Integer(_))
            | (PrimitiveKind::Long | PrimitiveKind::AutoNumber, Value::Long(_))
            | (PrimitiveKind::Decimal, Value::Decimal(_))
            | (PrimitiveKind::String | PrimitiveKind::HashString | PrimitiveKind::Enum, Value::String(_))
            | (PrimitiveKind::DateTime, Value::DateTime(_))
    )
}

// ------------- In-memory store -------------
/// Keeps committed objects in memory and hands out increasing identities.
///
/// When built with a schema registry, attribute writes are checked against
/// the declared kinds, the way a real object store would reject them.
#[derive(Debug, Default)]
pub struct MemoryStore {
    schemas: Option<Arc<SchemaRegistry>>,
    next_id: Mutex<u64>,
    committed: Mutex<HashMap<Identifier, DynamicObject>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_schemas(schemas: Arc<SchemaRegistry>) -> Self {
        Self { schemas: Some(schemas), ..Self::default() }
    }
    fn allocate_id(&self) -> Result<Identifier, StoreError> {
        let mut g = self.next_id.lock().map_err(|e| StoreError::Unavailable(e.to_string()))?;
        *g += 1;
        Ok(Identifier(*g))
    }
    /// Persists `object`, replacing any earlier version with the same identity.
    pub fn commit(&self, object: DynamicObject) -> Result<Identifier, BoxError> {
        let id = object.id();
        self.committed
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
            .insert(id, object);
        Ok(id)
    }
}

impl ObjectStore for MemoryStore {
    type Object = DynamicObject;

    fn instantiate(&self, entity: &str) -> Result<DynamicObject, BoxError> {
        if let Some(schemas) = &self.schemas {
            schemas.entity(entity)?;
        }
        Ok(DynamicObject::new(entity, self.allocate_id()?))
    }

    fn set_attribute(&self, object: &mut DynamicObject, name: &str, value: Value) -> Result<(), BoxError> {
        if let Some(schemas) = &self.schemas {
            let kind = schemas
                .attribute_kind(object.entity(), name)?
                .ok_or_else(|| StoreError::NoSuchAttribute {
                    entity: object.entity().to_string(),
                    attribute: name.to_string(),
                })?;
            if !accepts(kind, &value) {
                return Err(StoreError::IncompatibleValue {
                    attribute: name.to_string(),
                    kind,
                    found: value.data_type(),
                }
                .into());
            }
        }
        object.set_attribute(name, value);
        Ok(())
    }

    fn set_relationship(
        &self,
        object: &mut DynamicObject,
        name: &str,
        target: Identifier,
    ) -> Result<(), BoxError> {
        object.set_relationship(name, target);
        Ok(())
    }

    fn retrieve(&self, ids: &[Identifier]) -> Result<Vec<DynamicObject>, BoxError> {
        let committed = self.committed.lock().map_err(|e| StoreError::Unavailable(e.to_string()))?;
        ids.iter()
            .map(|id| {
                committed
                    .get(id)
                    .cloned()
                    .ok_or_else(|| Box::new(StoreError::NotFound(*id)) as BoxError)
            })
            .collect()
    }
}
