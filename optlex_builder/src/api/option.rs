use crate::convert::{ConversionError, Converted, ConverterRegistry, TargetShape};

#[cfg(test)]
use rand::{distributions::Standard, prelude::Distribution, Rng};

/// The multiplicity contract of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionStyle {
    /// Presence only: `-v`.
    Switch,
    /// Exactly one value: `-o out.txt`.
    SingleValued,
    /// One or more values, across any number of key occurrences: `-i a -i b c`.
    Collection,
    /// One or more values forming a single logical (flag enumeration) value: `-p Read Write`.
    ConcatenatedSingleValue,
}

impl OptionStyle {
    /// The number of values this style accepts.
    pub fn bound(&self) -> Bound {
        match self {
            OptionStyle::Switch => Bound::Range(0, 0),
            OptionStyle::SingleValued => Bound::Range(1, 1),
            OptionStyle::Collection | OptionStyle::ConcatenatedSingleValue => Bound::Lower(1),
        }
    }
}

/// The cardinality of values for an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    /// Between the two values (inclusive).
    Range(u8, u8),
    /// At least the value.
    Lower(u8),
}

impl Bound {
    /// The fewest values allowed.
    pub fn lower(&self) -> usize {
        match self {
            Bound::Range(n, _) | Bound::Lower(n) => *n as usize,
        }
    }

    /// The most values allowed, if limited.
    pub fn upper(&self) -> Option<usize> {
        match self {
            Bound::Range(_, n) => Some(*n as usize),
            Bound::Lower(_) => None,
        }
    }

    /// Whether `count` values fall within the bound.
    pub fn contains(&self, count: usize) -> bool {
        count >= self.lower() && self.upper().map_or(true, |upper| count <= upper)
    }
}

#[cfg(test)]
impl Distribution<Bound> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Bound {
        match rng.gen_range(0..2) {
            0 => {
                let upper: u8 = rng.gen();

                if upper == 0 {
                    Bound::Range(0, upper)
                } else {
                    Bound::Range(rng.gen_range(0..upper), upper)
                }
            }
            1 => Bound::Lower(rng.gen()),
            _ => unreachable!("internal error - impossible gen_range()"),
        }
    }
}

/// The declaration of an option, passed to [`crate::OptionCollection::register`].
///
/// ### Example
/// ```
/// # use optlex_builder as optlex;
/// use optlex::{OptionDefinition, OptionStyle, ScalarType, TargetShape};
///
/// let definition = OptionDefinition::new("Output:Path", OptionStyle::SingleValued)
///     .key("o")
///     .key("output")
///     .required()
///     .description("Where to write the report.")
///     .shape(TargetShape::Scalar(ScalarType::Text));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDefinition {
    pub(crate) context_path: String,
    pub(crate) keys: Vec<String>,
    pub(crate) style: OptionStyle,
    pub(crate) required: bool,
    pub(crate) description: Option<String>,
    pub(crate) default_value: Option<String>,
    pub(crate) shape: Option<TargetShape>,
}

impl OptionDefinition {
    /// Declare an option addressed by `context_path`.
    pub fn new(context_path: impl Into<String>, style: OptionStyle) -> Self {
        Self {
            context_path: context_path.into(),
            keys: Vec::default(),
            style,
            required: false,
            description: None,
            default_value: None,
            shape: None,
        }
    }

    /// Add a key (without its key prefix).
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.keys.push(key.into());
        self
    }

    /// Add several keys.
    pub fn keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Mark the option as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Document the option.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description.replace(description.into());
        self
    }

    /// The raw value used for conversion when the key is not provided.
    pub fn default_value(mut self, default_value: impl Into<String>) -> Self {
        self.default_value.replace(default_value.into());
        self
    }

    /// The shape retrieved by [`crate::OptionCollection::get_value`].
    pub fn shape(mut self, shape: TargetShape) -> Self {
        self.shape.replace(shape);
        self
    }
}

/// A registered option, and the values allocated to it by the most recent parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOption {
    context_path: String,
    keys: Vec<String>,
    style: OptionStyle,
    required: bool,
    description: Option<String>,
    default_value: Option<String>,
    shape: Option<TargetShape>,
    values: Vec<String>,
    command_line_key_provided: Option<String>,
}

impl From<OptionDefinition> for CliOption {
    fn from(definition: OptionDefinition) -> Self {
        let OptionDefinition {
            context_path,
            keys,
            style,
            required,
            description,
            default_value,
            shape,
        } = definition;

        Self {
            context_path,
            keys,
            style,
            required,
            description,
            default_value,
            shape,
            values: Vec::default(),
            command_line_key_provided: None,
        }
    }
}

impl CliOption {
    /// The identifier used to address this option.
    pub fn context_path(&self) -> &str {
        &self.context_path
    }

    /// Every key this option answers to.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn style(&self) -> OptionStyle {
        self.style
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// The declared shape, if any.
    pub fn shape(&self) -> Option<&TargetShape> {
        self.shape.as_ref()
    }

    /// The raw values, in encounter order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// The key spelling which most recently matched this option on the command line.
    pub fn command_line_key_provided(&self) -> Option<&str> {
        self.command_line_key_provided.as_deref()
    }

    /// The most values this option accepts, if limited.
    pub fn max_values(&self) -> Option<usize> {
        self.style.bound().upper()
    }

    /// Whether the allocated values satisfy the option's style.
    ///
    /// A switch is satisfied exactly when its key was provided.
    pub fn values_satisfied(&self) -> bool {
        match self.style {
            OptionStyle::Switch => self.command_line_key_provided.is_some(),
            _ => self.style.bound().contains(self.values.len()),
        }
    }

    /// Forget the values (and the provided key) from a previous parse.
    pub fn clear_values(&mut self) {
        self.values.clear();
        self.command_line_key_provided = None;
    }

    /// Accept the values of a key occurrence, returning the surplus which exceeds the option's capacity.
    pub(crate) fn allocate(&mut self, key: String, mut values: Vec<String>) -> Vec<String> {
        self.command_line_key_provided.replace(key);
        let capacity = self
            .max_values()
            .map_or(usize::MAX, |max| max.saturating_sub(self.values.len()));

        let surplus = if values.len() > capacity {
            values.split_off(capacity)
        } else {
            Vec::default()
        };

        self.values.extend(values);
        surplus
    }

    /// The raw values fed to conversion.
    ///
    /// A provided switch reads as `true`; an option whose key was not provided falls back to its default value.
    pub(crate) fn conversion_values(&self) -> Vec<String> {
        match (&self.command_line_key_provided, self.style) {
            (Some(_), OptionStyle::Switch) => vec![true.to_string()],
            (Some(_), _) => self.values.clone(),
            (None, _) => self.default_value.iter().cloned().collect(),
        }
    }

    /// Convert this option's values into `shape`.
    pub fn get_value(
        &self,
        converters: &ConverterRegistry,
        shape: &TargetShape,
    ) -> Result<Converted, ConversionError> {
        converters.convert(shape, &self.conversion_values())
    }
}
