use crate::prelude::CliEnum;

/// A declared member of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumMember {
    name: String,
    bits: u64,
}

impl EnumMember {
    /// The member name, as matched (case insensitively) on the command line.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The member value.
    pub fn bits(&self) -> u64 {
        self.bits
    }
}

/// The structure of an enumeration: its name, members, and whether it is a flag enumeration.
///
/// Typically produced by `#[derive(CliEnum)]`, but may be built by hand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumDescriptor {
    name: String,
    flags: bool,
    members: Vec<EnumMember>,
}

impl EnumDescriptor {
    /// Describe an enumeration.
    pub fn new<N, I>(name: impl Into<String>, flags: bool, members: I) -> Self
    where
        I: IntoIterator<Item = (N, u64)>,
        N: Into<String>,
    {
        Self {
            name: name.into(),
            flags,
            members: members
                .into_iter()
                .map(|(name, bits)| EnumMember {
                    name: name.into(),
                    bits,
                })
                .collect(),
        }
    }

    /// The enumeration name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether members combine by bitwise-or.
    pub fn is_flags(&self) -> bool {
        self.flags
    }

    /// The declared members, in declaration order.
    pub fn members(&self) -> &[EnumMember] {
        &self.members
    }

    /// Find a member by name, ignoring case.
    pub fn member(&self, name: &str) -> Option<&EnumMember> {
        let name = name.to_lowercase();
        self.members
            .iter()
            .find(|member| member.name.to_lowercase() == name)
    }

    /// Find a member by value.
    pub fn member_of(&self, bits: u64) -> Option<&EnumMember> {
        self.members.iter().find(|member| member.bits == bits)
    }
}

/// The scalar type tag a raw value converts into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// `bool`
    Bool,
    /// `i32`
    Int,
    /// `i64`
    Long,
    /// `f32`
    Float,
    /// `f64`
    Double,
    /// [`rust_decimal::Decimal`]
    Decimal,
    /// [`chrono::DateTime<chrono::FixedOffset>`]
    DateTime,
    /// `String` (identity).
    Text,
    /// A described enumeration.
    Enum(EnumDescriptor),
    /// A user type, identified by its type name; see [`ScalarType::custom`].
    Custom(&'static str),
}

impl ScalarType {
    /// The enumeration tag for `E`.
    pub fn enumeration<E: CliEnum>() -> Self {
        ScalarType::Enum(E::descriptor())
    }

    /// The custom tag for `T`.
    pub fn custom<T: 'static>() -> Self {
        ScalarType::Custom(std::any::type_name::<T>())
    }

    /// A readable name for error messages.
    pub fn type_name(&self) -> String {
        match self {
            ScalarType::Bool => "bool".to_string(),
            ScalarType::Int => "i32".to_string(),
            ScalarType::Long => "i64".to_string(),
            ScalarType::Float => "f32".to_string(),
            ScalarType::Double => "f64".to_string(),
            ScalarType::Decimal => "decimal".to_string(),
            ScalarType::DateTime => "datetime".to_string(),
            ScalarType::Text => "string".to_string(),
            ScalarType::Enum(descriptor) => descriptor.name().to_string(),
            ScalarType::Custom(name) => name.to_string(),
        }
    }

    pub(crate) fn is_flags(&self) -> bool {
        matches!(self, ScalarType::Enum(descriptor) if descriptor.is_flags())
    }
}

/// The shape requested from a conversion.
///
/// Elements are always scalar, so collections never nest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetShape {
    /// Zero or one value (or any number of flag enum members).
    Scalar(ScalarType),
    /// A fixed size sequence.
    ArrayOf(ScalarType),
    /// A growable sequence.
    ListOf(ScalarType),
}

impl TargetShape {
    /// The scalar element type.
    pub fn element(&self) -> &ScalarType {
        match self {
            TargetShape::Scalar(scalar)
            | TargetShape::ArrayOf(scalar)
            | TargetShape::ListOf(scalar) => scalar,
        }
    }
}

impl std::fmt::Display for TargetShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetShape::Scalar(scalar) => write!(f, "{}", scalar.type_name()),
            TargetShape::ArrayOf(scalar) => write!(f, "[{}]", scalar.type_name()),
            TargetShape::ListOf(scalar) => write!(f, "Vec<{}>", scalar.type_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn permissions() -> EnumDescriptor {
        EnumDescriptor::new("Permissions", true, [("Read", 1), ("Write", 2), ("Execute", 4)])
    }

    #[rstest]
    #[case("Read", Some(1))]
    #[case("write", Some(2))]
    #[case("EXECUTE", Some(4))]
    #[case("1", None)]
    #[case("Delete", None)]
    fn member(#[case] name: &str, #[case] expected: Option<u64>) {
        assert_eq!(permissions().member(name).map(EnumMember::bits), expected);
    }

    #[test]
    fn member_of() {
        assert_eq!(permissions().member_of(2).map(EnumMember::name), Some("Write"));
        assert_eq!(permissions().member_of(3), None);
    }

    #[test]
    fn is_flags() {
        assert!(ScalarType::Enum(permissions()).is_flags());
        assert!(!ScalarType::Int.is_flags());
        assert!(!ScalarType::Enum(EnumDescriptor::new("Color", false, [("Red", 0)])).is_flags());
    }

    #[rstest]
    #[case(TargetShape::Scalar(ScalarType::Int), "i32")]
    #[case(TargetShape::ArrayOf(ScalarType::Text), "[string]")]
    #[case(TargetShape::ListOf(ScalarType::custom::<u8>()), "Vec<u8>")]
    fn shape_display(#[case] shape: TargetShape, #[case] expected: &str) {
        assert_eq!(shape.to_string(), expected);
    }

    #[test]
    fn element() {
        assert_eq!(
            TargetShape::ListOf(ScalarType::Double).element(),
            &ScalarType::Double
        );
    }
}
