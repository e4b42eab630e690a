use std::any::Any;
use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;

use crate::convert::ConversionError;
use crate::prelude::CliEnum;

/// A resolved enumeration value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    type_name: String,
    bits: u64,
}

impl EnumValue {
    pub(crate) fn new(type_name: impl Into<String>, bits: u64) -> Self {
        Self {
            type_name: type_name.into(),
            bits,
        }
    }

    /// The enumeration name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The value; for flag enumerations, the bitwise-or of every member provided.
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// The exact variant of `E`, when `bits` names exactly one member of `E`.
    pub fn variant<E: CliEnum>(&self) -> Option<E> {
        if E::descriptor().name() != self.type_name {
            return None;
        }

        E::from_bits(self.bits)
    }

    /// Every variant of `E` whose bits are set, in declaration order.
    ///
    /// Zero valued members are only included when `bits` is itself zero.
    /// Members sharing bits with an earlier member are skipped.
    pub fn variants<E: CliEnum>(&self) -> Vec<E> {
        let descriptor = E::descriptor();

        if descriptor.name() != self.type_name {
            return Vec::default();
        }

        let mut seen = HashSet::new();

        descriptor
            .members()
            .iter()
            .filter(|member| match member.bits() {
                0 => self.bits == 0,
                bits => self.bits & bits == bits,
            })
            .filter(|member| seen.insert(member.bits()))
            .filter_map(|member| E::from_bits(member.bits()))
            .collect()
    }
}

/// A single converted value.
#[derive(Clone)]
pub enum Value {
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Decimal(Decimal),
    DateTime(DateTime<FixedOffset>),
    Text(String),
    Enum(EnumValue),
    /// A value produced by a user registered converter.
    Custom(Arc<dyn Any + Send + Sync>),
}

impl Value {
    /// A short description of the variant, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "i32",
            Value::Long(_) => "i64",
            Value::Float(_) => "f32",
            Value::Double(_) => "f64",
            Value::Decimal(_) => "decimal",
            Value::DateTime(_) => "datetime",
            Value::Text(_) => "string",
            Value::Enum(_) => "enum",
            Value::Custom(_) => "custom",
        }
    }

    /// Borrow a custom value as `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Custom(inner) => inner.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(inner) => f.debug_tuple("Bool").field(inner).finish(),
            Value::Int(inner) => f.debug_tuple("Int").field(inner).finish(),
            Value::Long(inner) => f.debug_tuple("Long").field(inner).finish(),
            Value::Float(inner) => f.debug_tuple("Float").field(inner).finish(),
            Value::Double(inner) => f.debug_tuple("Double").field(inner).finish(),
            Value::Decimal(inner) => f.debug_tuple("Decimal").field(inner).finish(),
            Value::DateTime(inner) => f.debug_tuple("DateTime").field(inner).finish(),
            Value::Text(inner) => f.debug_tuple("Text").field(inner).finish(),
            Value::Enum(inner) => f.debug_tuple("Enum").field(inner).finish(),
            Value::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(left), Value::Bool(right)) => left == right,
            (Value::Int(left), Value::Int(right)) => left == right,
            (Value::Long(left), Value::Long(right)) => left == right,
            (Value::Float(left), Value::Float(right)) => left == right,
            (Value::Double(left), Value::Double(right)) => left == right,
            (Value::Decimal(left), Value::Decimal(right)) => left == right,
            (Value::DateTime(left), Value::DateTime(right)) => left == right,
            (Value::Text(left), Value::Text(right)) => left == right,
            (Value::Enum(left), Value::Enum(right)) => left == right,
            // Custom values have no general notion of equality.
            (Value::Custom(left), Value::Custom(right)) => Arc::ptr_eq(left, right),
            _ => false,
        }
    }
}

macro_rules! impl_try_from_value {
    ($target:ty, $variant:ident, $name:literal) => {
        impl TryFrom<Value> for $target {
            type Error = ConversionError;

            fn try_from(value: Value) -> Result<Self, Self::Error> {
                match value {
                    Value::$variant(inner) => Ok(inner),
                    other => Err(ConversionError::Mismatch {
                        expected: $name,
                        actual: other.kind_name(),
                    }),
                }
            }
        }
    };
}

impl_try_from_value!(bool, Bool, "bool");
impl_try_from_value!(i32, Int, "i32");
impl_try_from_value!(i64, Long, "i64");
impl_try_from_value!(f32, Float, "f32");
impl_try_from_value!(f64, Double, "f64");
impl_try_from_value!(Decimal, Decimal, "decimal");
impl_try_from_value!(DateTime<FixedOffset>, DateTime, "datetime");
impl_try_from_value!(String, Text, "string");
impl_try_from_value!(EnumValue, Enum, "enum");

/// The result of converting an option's raw values into a [`crate::TargetShape`].
#[derive(Debug, Clone, PartialEq)]
pub enum Converted {
    Scalar(Value),
    Array(Box<[Value]>),
    List(Vec<Value>),
}

impl Converted {
    /// The scalar value, if this is a scalar conversion.
    pub fn into_scalar(self) -> Option<Value> {
        match self {
            Converted::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// Every converted value, regardless of shape.
    pub fn into_values(self) -> Vec<Value> {
        match self {
            Converted::Scalar(value) => vec![value],
            Converted::Array(values) => values.into_vec(),
            Converted::List(values) => values,
        }
    }
}
