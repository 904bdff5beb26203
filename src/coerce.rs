use crate::datatype::{PrimitiveKind, Value};
use crate::error::{OqlError, Result};

/// Reconciles integer width between a result value and the attribute it lands in.
///
/// Only the `Integer`/`Long` pair is handled. Narrowing never truncates: a
/// wide value outside the 32-bit range fails with [`OqlError::NumericOverflow`].
/// Every other combination is returned untouched for the object store to accept
/// or reject.
pub fn coerce(value: Value, kind: PrimitiveKind, attribute: &str) -> Result<Value> {
    match (value, kind) {
        (Value::Integer(i), PrimitiveKind::Long) => Ok(Value::Long(i64::from(i))),
        (Value::Long(l), PrimitiveKind::Integer) => i32::try_from(l)
            .map(Value::Integer)
            .map_err(|_| OqlError::NumericOverflow { attribute: attribute.to_string(), value: l }),
        (value, _) => Ok(value),
    }
}
