//! Field types, and the type-erased values that move in and out of fields.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The type of a single field, as listed by a [`TupleDescriptor`](crate::TupleDescriptor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FieldType {
    /// `bool`
    Bool,
    /// `i8`
    Int8,
    /// `i16`
    Int16,
    /// `i32`
    Int32,
    /// `i64`
    Int64,
    /// `u8`
    UInt8,
    /// `u16`
    UInt16,
    /// `u32`
    UInt32,
    /// `u64`
    UInt64,
    /// `f32`
    Float32,
    /// `f64`
    Float64,
    /// `char`
    Char,
    /// `String`
    String,
    /// `Vec<u8>`
    Bytes,
}

impl FieldType {
    /// Every field type, in declaration order.
    pub const ALL: [FieldType; 14] = [
        FieldType::Bool,
        FieldType::Int8,
        FieldType::Int16,
        FieldType::Int32,
        FieldType::Int64,
        FieldType::UInt8,
        FieldType::UInt16,
        FieldType::UInt32,
        FieldType::UInt64,
        FieldType::Float32,
        FieldType::Float64,
        FieldType::Char,
        FieldType::String,
        FieldType::Bytes,
    ];

    /// The value a field of this type holds whenever it is not [`Available`].
    ///
    /// # Examples
    ///
    /// ```
    /// use rowtuple::{FieldType, Value};
    ///
    /// assert_eq!(FieldType::Int32.default_value(), Value::Int32(0));
    /// assert_eq!(FieldType::String.default_value(), Value::String(String::new()));
    /// ```
    ///
    /// [`Available`]: crate::FieldState::Available
    pub fn default_value(self) -> Value {
        match self {
            FieldType::Bool => Value::Bool(false),
            FieldType::Int8 => Value::Int8(0),
            FieldType::Int16 => Value::Int16(0),
            FieldType::Int32 => Value::Int32(0),
            FieldType::Int64 => Value::Int64(0),
            FieldType::UInt8 => Value::UInt8(0),
            FieldType::UInt16 => Value::UInt16(0),
            FieldType::UInt32 => Value::UInt32(0),
            FieldType::UInt64 => Value::UInt64(0),
            FieldType::Float32 => Value::Float32(0.0),
            FieldType::Float64 => Value::Float64(0.0),
            FieldType::Char => Value::Char('\0'),
            FieldType::String => Value::String(String::new()),
            FieldType::Bytes => Value::Bytes(Vec::new()),
        }
    }

    /// The name of this type.
    pub const fn name(self) -> &'static str {
        match self {
            FieldType::Bool => "Bool",
            FieldType::Int8 => "Int8",
            FieldType::Int16 => "Int16",
            FieldType::Int32 => "Int32",
            FieldType::Int64 => "Int64",
            FieldType::UInt8 => "UInt8",
            FieldType::UInt16 => "UInt16",
            FieldType::UInt32 => "UInt32",
            FieldType::UInt64 => "UInt64",
            FieldType::Float32 => "Float32",
            FieldType::Float64 => "Float64",
            FieldType::Char => "Char",
            FieldType::String => "String",
            FieldType::Bytes => "Bytes",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The content of a field with its static type erased, or [`Null`](Value::Null).
///
/// Setting a field to a `Value` whose variant does not exactly match the field's [`FieldType`]
/// fails; no numeric widening or narrowing is attempted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[allow(missing_docs)]
pub enum Value {
    /// The null sentinel: assigning it to a field marks the field
    /// [`Null`](crate::FieldState::Null).
    Null,
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Char(char),
    String(String),
    Bytes(Vec<u8>),
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl Value {
    /// The type of this value, or `None` for [`Null`](Value::Null).
    pub fn field_type(&self) -> Option<FieldType> {
        Some(match self {
            Value::Null => return None,
            Value::Bool(_) => FieldType::Bool,
            Value::Int8(_) => FieldType::Int8,
            Value::Int16(_) => FieldType::Int16,
            Value::Int32(_) => FieldType::Int32,
            Value::Int64(_) => FieldType::Int64,
            Value::UInt8(_) => FieldType::UInt8,
            Value::UInt16(_) => FieldType::UInt16,
            Value::UInt32(_) => FieldType::UInt32,
            Value::UInt64(_) => FieldType::UInt64,
            Value::Float32(_) => FieldType::Float32,
            Value::Float64(_) => FieldType::Float64,
            Value::Char(_) => FieldType::Char,
            Value::String(_) => FieldType::String,
            Value::Bytes(_) => FieldType::Bytes,
        })
    }

    /// `true` for [`Null`](Value::Null).
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// `true` if this is the default value of its own type. Always `false` for
    /// [`Null`](Value::Null).
    pub fn is_default(&self) -> bool {
        self.field_type()
            .map_or(false, |ty| *self == ty.default_value())
    }

    /// Convert into a statically typed field value.
    ///
    /// # Errors
    ///
    /// Returns the value unchanged if its variant is not exactly `T`'s.
    ///
    /// # Examples
    ///
    /// ```
    /// use rowtuple::Value;
    ///
    /// assert_eq!(Value::Int32(7).cast::<i32>(), Ok(7));
    /// assert_eq!(Value::Int32(7).cast::<i64>(), Err(Value::Int32(7)));
    /// ```
    pub fn cast<T: FieldValue>(self) -> Result<T, Value> {
        T::from_value(self)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int8(v) => write!(f, "{}", v),
            Value::Int16(v) => write!(f, "{}", v),
            Value::Int32(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::UInt8(v) => write!(f, "{}", v),
            Value::UInt16(v) => write!(f, "{}", v),
            Value::UInt32(v) => write!(f, "{}", v),
            Value::UInt64(v) => write!(f, "{}", v),
            Value::Float32(v) => write!(f, "{}", v),
            Value::Float64(v) => write!(f, "{}", v),
            Value::Char(v) => write!(f, "{:?}", v),
            Value::String(v) => write!(f, "{:?}", v),
            Value::Bytes(v) => {
                write!(f, "0x")?;
                for byte in v {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
        }
    }
}

/// A Rust type that can occupy a field of a [`TypedTuple`](crate::TypedTuple).
///
/// This trait is implemented for every Rust type that corresponds to a [`FieldType`], and cannot
/// usefully be implemented for anything else, since [`Value`] has no variant to carry it.
pub trait FieldValue: Clone + Default + PartialEq + fmt::Debug + 'static {
    /// The field type that stores values of this Rust type.
    const FIELD_TYPE: FieldType;

    /// Erase the static type.
    fn into_value(self) -> Value;

    /// Recover the static type from a value of exactly the matching variant, or hand the value
    /// back.
    fn from_value(value: Value) -> Result<Self, Value>;
}

macro_rules! impl_field_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                const FIELD_TYPE: FieldType = FieldType::$variant;

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                fn from_value(value: Value) -> Result<Self, Value> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(other),
                    }
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Value {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_field_value! {
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    char => Char,
    String => String,
    Vec<u8> => Bytes,
}

impl From<&str> for Value {
    fn from(v: &str) -> Value {
        Value::String(v.to_owned())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Value {
        Value::Bytes(v.to_vec())
    }
}

impl<T: FieldValue> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Value {
        v.map_or(Value::Null, FieldValue::into_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_match_their_types() {
        for ty in FieldType::ALL.iter() {
            let value = ty.default_value();
            assert_eq!(value.field_type(), Some(*ty));
            assert!(value.is_default(), "{}", ty);
        }
    }

    #[test]
    fn null_has_no_type_and_is_not_default() {
        assert_eq!(Value::Null.field_type(), None);
        assert!(Value::Null.is_null());
        assert!(!Value::Null.is_default());
    }

    #[test]
    fn cast_requires_exact_variant() {
        assert_eq!(Value::from("abc").cast::<String>(), Ok("abc".to_owned()));
        assert_eq!(Value::UInt8(3).cast::<i8>(), Err(Value::UInt8(3)));
        assert_eq!(Value::Null.cast::<bool>(), Err(Value::Null));
    }

    #[test]
    fn field_value_types_agree_with_values() {
        assert_eq!(<Vec<u8> as FieldValue>::FIELD_TYPE, FieldType::Bytes);
        assert_eq!(
            vec![1u8, 2].into_value().field_type(),
            Some(<Vec<u8> as FieldValue>::FIELD_TYPE)
        );
        assert_eq!('x'.into_value().field_type(), Some(FieldType::Char));
    }

    #[test]
    fn options_map_none_to_null() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some(5i64)), Value::Int64(5));
    }

    #[test]
    fn display() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from("a\"b").to_string(), "\"a\\\"b\"");
        assert_eq!(Value::Bytes(vec![0x0f, 0xa0]).to_string(), "0x0fa0");
        assert_eq!(FieldType::UInt16.to_string(), "UInt16");
    }
}
