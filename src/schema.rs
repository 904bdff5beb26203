//! Entity schemas and column resolution.
//!
//! Result columns are matched against the target entity by name. Scalar
//! columns must name an attribute directly. Reference columns name an
//! association by its local part only, because a qualified name such as
//! `HR.Employee_Team` cannot be used as a column alias in the query language;
//! the column `Employee_Team` is matched against the part after the last `.`.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::datatype::PrimitiveKind;
use crate::error::{OqlError, Result};
use crate::table::{ColumnDescriptor, ColumnKind};

/// Read-only access to entity metadata.
pub trait Metadata {
    /// Declared kind of `attribute` on `entity`, or `None` when the entity has no such attribute.
    fn attribute_kind(&self, entity: &str, attribute: &str) -> Result<Option<PrimitiveKind>>;
    /// Qualified names of the associations declared on `entity`, in declaration order.
    fn relationships_of(&self, entity: &str) -> Result<Vec<String>>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySchema {
    pub name: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, PrimitiveKind>,
    #[serde(default)]
    pub relationships: Vec<String>,
}

impl EntitySchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), attributes: BTreeMap::new(), relationships: Vec::new() }
    }
    pub fn attribute(mut self, name: impl Into<String>, kind: PrimitiveKind) -> Self {
        self.attributes.insert(name.into(), kind);
        self
    }
    pub fn relationship(mut self, qualified_name: impl Into<String>) -> Self {
        self.relationships.push(qualified_name.into());
        self
    }
}

/// Immutable map from entity name to its schema.
#[derive(Clone, Debug, Default)]
pub struct SchemaRegistry {
    entities: HashMap<String, EntitySchema>,
}

impl SchemaRegistry {
    pub fn new<I: IntoIterator<Item = EntitySchema>>(schemas: I) -> Self {
        Self {
            entities: schemas.into_iter().map(|s| (s.name.clone(), s)).collect(),
        }
    }
    /// Loads a JSON array of entity schemas.
    pub fn from_json(json: &str) -> Result<Self> {
        let schemas: Vec<EntitySchema> = serde_json::from_str(json)?;
        let mut entities = HashMap::new();
        for schema in schemas {
            if entities.contains_key(&schema.name) {
                return Err(OqlError::Schema(format!("entity {} is declared twice", schema.name)));
            }
            entities.insert(schema.name.clone(), schema);
        }
        Ok(Self { entities })
    }
    pub fn entity(&self, name: &str) -> Result<&EntitySchema> {
        self.entities
            .get(name)
            .ok_or_else(|| OqlError::UnknownEntity(name.to_string()))
    }
    pub fn len(&self) -> usize {
        self.entities.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Metadata for SchemaRegistry {
    fn attribute_kind(&self, entity: &str, attribute: &str) -> Result<Option<PrimitiveKind>> {
        Ok(self.entity(entity)?.attributes.get(attribute).copied())
    }
    fn relationships_of(&self, entity: &str) -> Result<Vec<String>> {
        Ok(self.entity(entity)?.relationships.clone())
    }
}

/// What to do when a reference column matches more than one association.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityPolicy {
    #[default]
    Reject,
    FirstMatch,
}

/// Target of a result column on the return entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Attribute { name: String, kind: PrimitiveKind },
    Relationship { name: String },
}

/// The part of a qualified name after its last `.`.
pub fn local_name(qualified: &str) -> &str {
    qualified.rsplit_once('.').map_or(qualified, |(_, local)| local)
}

#[derive(Copy, Clone, Debug, Default)]
pub struct SchemaResolver {
    policy: AmbiguityPolicy,
}

impl SchemaResolver {
    pub fn new(policy: AmbiguityPolicy) -> Self {
        Self { policy }
    }
    pub fn resolve<M: Metadata + ?Sized>(
        &self,
        metadata: &M,
        entity: &str,
        column: &ColumnDescriptor,
    ) -> Result<Resolution> {
        match column.kind() {
            ColumnKind::Reference => self.resolve_relationship(metadata, entity, column.name()),
            ColumnKind::Scalar => {
                trace!(column = column.name(), "treating as value");
                match metadata.attribute_kind(entity, column.name())? {
                    Some(kind) => Ok(Resolution::Attribute { name: column.name().to_string(), kind }),
                    None => Err(OqlError::MissingAttribute {
                        entity: entity.to_string(),
                        column: column.name().to_string(),
                    }),
                }
            }
        }
    }

    fn resolve_relationship<M: Metadata + ?Sized>(
        &self,
        metadata: &M,
        entity: &str,
        column: &str,
    ) -> Result<Resolution> {
        trace!(column, "treating as association");
        let mut candidates: Vec<String> = metadata
            .relationships_of(entity)?
            .into_iter()
            .filter(|qualified| local_name(qualified) == column)
            .collect();
        match (candidates.len(), self.policy) {
            (0, _) => Err(OqlError::MissingRelationship {
                entity: entity.to_string(),
                column: column.to_string(),
            }),
            (1, _) | (_, AmbiguityPolicy::FirstMatch) => Ok(Resolution::Relationship {
                name: candidates.swap_remove(0),
            }),
            (_, AmbiguityPolicy::Reject) => Err(OqlError::AmbiguousRelationship {
                entity: entity.to_string(),
                column: column.to_string(),
                candidates,
            }),
        }
    }
}
