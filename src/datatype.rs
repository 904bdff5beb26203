// used for timestamps in parameters and results
use chrono::{DateTime, Utc};
// used for decimal numbers
use bigdecimal::BigDecimal;
// used when loading schemas from configuration
use serde::{Deserialize, Serialize};

// used to print out readable forms of a value
use std::fmt;

// ------------- Identifier -------------
/// Opaque identity of a persisted object, as handed out by the object store.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Identifier(pub u64);

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl From<u64> for Identifier {
    fn from(id: u64) -> Self {
        Identifier(id)
    }
}

// ------------- Primitive kinds -------------
/// Declared kind of a scalar attribute on an entity.
///
/// `Integer` is the narrow (32-bit) integer kind and `Long` the wide (64-bit) one;
/// these two are the only kinds taking part in numeric reconciliation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Boolean,
    Integer,
    Long,
    AutoNumber,
    Decimal,
    String,
    HashString,
    Enum,
    DateTime,
}

impl PrimitiveKind {
    pub fn data_type(&self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "Boolean",
            PrimitiveKind::Integer => "Integer",
            PrimitiveKind::Long => "Long",
            PrimitiveKind::AutoNumber => "AutoNumber",
            PrimitiveKind::Decimal => "Decimal",
            PrimitiveKind::String => "String",
            PrimitiveKind::HashString => "HashString",
            PrimitiveKind::Enum => "Enum",
            PrimitiveKind::DateTime => "DateTime",
        }
    }
}
impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.data_type())
    }
}

// ------------- Values -------------
/// A single scalar, either bound as a parameter or read from a result row.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    Boolean(bool),
    Integer(i32),
    Long(i64),
    Decimal(BigDecimal),
    String(String),
    DateTime(DateTime<Utc>),
    Identifier(Identifier),
}

impl Value {
    pub fn data_type(&self) -> &'static str {
        match self {
            Value::Boolean(_) => "Boolean",
            Value::Integer(_) => "Integer",
            Value::Long(_) => "Long",
            Value::Decimal(_) => "Decimal",
            Value::String(_) => "String",
            Value::DateTime(_) => "DateTime",
            Value::Identifier(_) => "Identifier",
        }
    }
    pub fn as_identifier(&self) -> Option<Identifier> {
        match self {
            Value::Identifier(id) => Some(*id),
            _ => None,
        }
    }
}
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Long(l) => write!(f, "{}", l),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::DateTime(t) => write!(f, "'{}'", t.to_rfc3339()),
            Value::Identifier(id) => write!(f, "#{}", id),
        }
    }
}

/// A staged parameter value. Lists only exist at the top level; a list of
/// lists cannot be expressed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParameterValue {
    Scalar(Value),
    List(Vec<Value>),
}

impl ParameterValue {
    pub fn is_list(&self) -> bool {
        matches!(self, ParameterValue::List(_))
    }
}
impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParameterValue::Scalar(v) => write!(f, "{}", v),
            ParameterValue::List(values) => {
                let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v.into())
                }
            }
            impl From<$ty> for ParameterValue {
                fn from(v: $ty) -> Self {
                    ParameterValue::Scalar(Value::from(v))
                }
            }
        )+
    };
}

value_from! {
    bool => Boolean,
    i32 => Integer,
    i64 => Long,
    BigDecimal => Decimal,
    String => String,
    &str => String,
    DateTime<Utc> => DateTime,
    Identifier => Identifier,
}

impl From<Value> for ParameterValue {
    fn from(v: Value) -> Self {
        ParameterValue::Scalar(v)
    }
}
impl<T: Into<Value>> From<Vec<T>> for ParameterValue {
    fn from(values: Vec<T>) -> Self {
        ParameterValue::List(values.into_iter().map(Into::into).collect())
    }
}
