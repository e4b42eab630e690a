use std::any::Any;
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use rust_decimal::Decimal;

use crate::constant::FLAG_DELIMITER;
use crate::convert::{
    ConversionError, Converted, EnumDescriptor, EnumValue, ScalarType, TargetShape, Value,
};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Behaviour to convert a single raw value into a [`Value`] of some [`ScalarType`].
pub trait ScalarConverter: Send + Sync {
    /// Whether this converter handles `scalar`.
    fn can_convert(&self, scalar: &ScalarType) -> bool;

    /// Convert one raw value.
    fn convert(&self, scalar: &ScalarType, raw: &str) -> Result<Value, ConversionError>;

    /// The value of `scalar` when no raw value is available.
    fn default_value(&self, scalar: &ScalarType) -> Result<Value, ConversionError>;
}

const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMAT: &str = "%Y-%m-%d";

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).expect("internal error - a zero offset must be valid")
}

fn parse_date_time(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(raw) {
        return Some(date_time);
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| utc().from_utc_datetime(&naive))
}

/// Converts the built in primitive types: numbers, `bool`, decimals, date-times and text.
///
/// Numbers and dates ignore surrounding whitespace; `bool` ignores case.
#[derive(Debug, Default)]
pub struct PrimitiveConverter;

impl PrimitiveConverter {
    fn parse<T: FromStr>(scalar: &ScalarType, raw: &str) -> Result<T, ConversionError> {
        T::from_str(raw.trim()).map_err(|_| ConversionError::InvalidValue {
            raw: raw.to_string(),
            type_name: scalar.type_name(),
        })
    }
}

impl ScalarConverter for PrimitiveConverter {
    fn can_convert(&self, scalar: &ScalarType) -> bool {
        !matches!(scalar, ScalarType::Enum(_) | ScalarType::Custom(_))
    }

    fn convert(&self, scalar: &ScalarType, raw: &str) -> Result<Value, ConversionError> {
        match scalar {
            ScalarType::Bool => match raw.trim().to_lowercase().as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(ConversionError::InvalidValue {
                    raw: raw.to_string(),
                    type_name: scalar.type_name(),
                }),
            },
            ScalarType::Int => Self::parse(scalar, raw).map(Value::Int),
            ScalarType::Long => Self::parse(scalar, raw).map(Value::Long),
            ScalarType::Float => Self::parse(scalar, raw).map(Value::Float),
            ScalarType::Double => Self::parse(scalar, raw).map(Value::Double),
            ScalarType::Decimal => Self::parse::<Decimal>(scalar, raw).map(Value::Decimal),
            ScalarType::DateTime => parse_date_time(raw.trim())
                .map(Value::DateTime)
                .ok_or_else(|| ConversionError::InvalidValue {
                    raw: raw.to_string(),
                    type_name: scalar.type_name(),
                }),
            ScalarType::Text => Ok(Value::Text(raw.to_string())),
            ScalarType::Enum(_) | ScalarType::Custom(_) => Err(ConversionError::Unconvertible {
                type_name: scalar.type_name(),
            }),
        }
    }

    fn default_value(&self, scalar: &ScalarType) -> Result<Value, ConversionError> {
        match scalar {
            ScalarType::Bool => Ok(Value::Bool(false)),
            ScalarType::Int => Ok(Value::Int(0)),
            ScalarType::Long => Ok(Value::Long(0)),
            ScalarType::Float => Ok(Value::Float(0.0)),
            ScalarType::Double => Ok(Value::Double(0.0)),
            ScalarType::Decimal => Ok(Value::Decimal(Decimal::ZERO)),
            ScalarType::DateTime => {
                let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
                    .expect("internal error - the unix epoch must be a valid date");
                Ok(Value::DateTime(utc().from_utc_datetime(&epoch)))
            }
            ScalarType::Text => Ok(Value::Text(String::default())),
            ScalarType::Enum(_) | ScalarType::Custom(_) => Err(ConversionError::Unconvertible {
                type_name: scalar.type_name(),
            }),
        }
    }
}

/// Converts enumerations by member name, ignoring case.
///
/// Numeric text is never accepted.
/// Flag enumerations additionally accept a comma delimited list of member names (ex: `Read,Write`).
#[derive(Debug, Default)]
pub struct EnumConverter;

impl EnumConverter {
    fn member_bits(descriptor: &EnumDescriptor, raw: &str) -> Result<u64, ConversionError> {
        descriptor
            .member(raw.trim())
            .map(|member| member.bits())
            .ok_or_else(|| ConversionError::UnknownMember {
                raw: raw.to_string(),
                type_name: descriptor.name().to_string(),
            })
    }
}

impl ScalarConverter for EnumConverter {
    fn can_convert(&self, scalar: &ScalarType) -> bool {
        matches!(scalar, ScalarType::Enum(_))
    }

    fn convert(&self, scalar: &ScalarType, raw: &str) -> Result<Value, ConversionError> {
        let ScalarType::Enum(descriptor) = scalar else {
            return Err(ConversionError::Unconvertible {
                type_name: scalar.type_name(),
            });
        };

        let bits = if descriptor.is_flags() {
            raw.split(FLAG_DELIMITER)
                .map(|part| Self::member_bits(descriptor, part))
                .try_fold(0, |bits, member| member.map(|member| bits | member))?
        } else {
            Self::member_bits(descriptor, raw)?
        };

        Ok(Value::Enum(EnumValue::new(descriptor.name(), bits)))
    }

    fn default_value(&self, scalar: &ScalarType) -> Result<Value, ConversionError> {
        match scalar {
            ScalarType::Enum(descriptor) => Ok(Value::Enum(EnumValue::new(descriptor.name(), 0))),
            _ => Err(ConversionError::Unconvertible {
                type_name: scalar.type_name(),
            }),
        }
    }
}

/// Converts [`ScalarType::Custom`] values of `T` via `T::from_str`, defaulting to `T::default()`.
///
/// ### Example
/// ```
/// # use optlex_builder as optlex;
/// use optlex::{ConverterRegistry, FromStrConverter, ScalarType, TargetShape};
/// use std::path::PathBuf;
///
/// let mut registry = ConverterRegistry::default();
/// registry.register(FromStrConverter::<PathBuf>::default());
///
/// let shape = TargetShape::Scalar(ScalarType::custom::<PathBuf>());
/// let converted = registry.convert(&shape, &["/tmp/a".to_string()]).unwrap();
/// assert_eq!(
///     converted.into_scalar().unwrap().downcast_ref::<PathBuf>(),
///     Some(&PathBuf::from("/tmp/a"))
/// );
/// ```
pub struct FromStrConverter<T> {
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Default for FromStrConverter<T> {
    fn default() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T> ScalarConverter for FromStrConverter<T>
where
    T: FromStr + Default + Any + Send + Sync,
{
    fn can_convert(&self, scalar: &ScalarType) -> bool {
        scalar == &ScalarType::custom::<T>()
    }

    fn convert(&self, _scalar: &ScalarType, raw: &str) -> Result<Value, ConversionError> {
        T::from_str(raw)
            .map(|value| Value::Custom(Arc::new(value)))
            .map_err(|_| ConversionError::InvalidValue {
                raw: raw.to_string(),
                type_name: std::any::type_name::<T>().to_string(),
            })
    }

    fn default_value(&self, _scalar: &ScalarType) -> Result<Value, ConversionError> {
        Ok(Value::Custom(Arc::new(T::default())))
    }
}

/// An ordered set of [`ScalarConverter`]s.
///
/// The first registered converter which handles a scalar type is the one used.
/// The default registry holds the built in [`PrimitiveConverter`] and [`EnumConverter`]; to override a built in, start from [`ConverterRegistry::empty`].
pub struct ConverterRegistry {
    converters: Vec<Box<dyn ScalarConverter>>,
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(PrimitiveConverter);
        registry.register(EnumConverter);
        registry
    }
}

impl std::fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("converters", &self.converters.len())
            .finish()
    }
}

impl ConverterRegistry {
    /// A registry without any converters.
    pub fn empty() -> Self {
        Self {
            converters: Vec::default(),
        }
    }

    /// Append a converter.
    pub fn register(&mut self, converter: impl ScalarConverter + 'static) {
        self.converters.push(Box::new(converter));
    }

    fn converter(&self, scalar: &ScalarType) -> Result<&dyn ScalarConverter, ConversionError> {
        self.converters
            .iter()
            .find(|converter| converter.can_convert(scalar))
            .map(|converter| converter.as_ref())
            .ok_or_else(|| ConversionError::Unconvertible {
                type_name: scalar.type_name(),
            })
    }

    /// Whether the element type of `shape` has a converter.
    pub fn can_convert(&self, shape: &TargetShape) -> bool {
        self.converter(shape.element()).is_ok()
    }

    /// Convert `raw_values` into `shape`.
    ///
    /// A scalar converts zero values to the converter's default, and exactly one value directly.
    /// Multiple values only convert into a scalar flag enumeration, where every value's members are combined.
    /// Arrays and lists convert each value in order.
    pub fn convert(
        &self,
        shape: &TargetShape,
        raw_values: &[String],
    ) -> Result<Converted, ConversionError> {
        let scalar = shape.element();
        let converter = self.converter(scalar)?;

        let result = match shape {
            TargetShape::Scalar(_) => match raw_values {
                [] => converter.default_value(scalar).map(Converted::Scalar),
                [raw] => converter.convert(scalar, raw).map(Converted::Scalar),
                _ if scalar.is_flags() => Self::combine_flags(converter, scalar, raw_values),
                _ => Err(ConversionError::MultipleValues {
                    values: raw_values.to_vec(),
                    type_name: scalar.type_name(),
                }),
            },
            TargetShape::ArrayOf(_) => Self::convert_all(converter, scalar, raw_values)
                .map(|values| Converted::Array(values.into_boxed_slice())),
            TargetShape::ListOf(_) => {
                Self::convert_all(converter, scalar, raw_values).map(Converted::List)
            }
        };

        #[cfg(feature = "tracing_debug")]
        {
            if let Err(error) = &result {
                debug!("Conversion of {raw_values:?} into {shape} failed: {error}");
            }
        }

        result
    }

    fn convert_all(
        converter: &dyn ScalarConverter,
        scalar: &ScalarType,
        raw_values: &[String],
    ) -> Result<Vec<Value>, ConversionError> {
        raw_values
            .iter()
            .map(|raw| converter.convert(scalar, raw))
            .collect()
    }

    fn combine_flags(
        converter: &dyn ScalarConverter,
        scalar: &ScalarType,
        raw_values: &[String],
    ) -> Result<Converted, ConversionError> {
        let mut bits = 0;

        for raw in raw_values {
            match converter.convert(scalar, raw)? {
                Value::Enum(value) => bits |= value.bits(),
                other => {
                    return Err(ConversionError::Mismatch {
                        expected: "enum",
                        actual: other.kind_name(),
                    })
                }
            }
        }

        Ok(Converted::Scalar(Value::Enum(EnumValue::new(
            scalar.type_name(),
            bits,
        ))))
    }
}
