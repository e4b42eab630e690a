use std::collections::HashMap;
use std::env;
use std::sync::Arc;

use thiserror::Error;

use crate::api::{CliOption, ConfigError, OptionDefinition, ParseError, ValueError};
use crate::convert::{ConversionError, Converted, ConverterRegistry, ScalarConverter, TargetShape};
use crate::grammar::{Allocate, OptionId, OptionsGenerator, ParsingTable};
use crate::lexer::{LexicalVocabulary, Tokenization, Tokenizer};
use crate::model::{Dialect, TextComparison};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// A key which matched no registered option, with the values that followed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKey {
    /// The key, as typed.
    pub key: String,
    /// The values which followed the key.
    pub values: Vec<String>,
}

/// A problem found after parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Diagnostic {
    #[error("Unknown option '{}' (values {:?}).", .0.key, .0.values)]
    UnknownKey(UnknownKey),

    #[error("Unexpected value '{0}'.")]
    StrayValue(String),

    #[error("Option '{context_path}' is not satisfied by {provided} value(s).")]
    Unsatisfied {
        context_path: String,
        provided: usize,
    },

    #[error("Option '{context_path}': {error}")]
    Conversion {
        context_path: String,
        error: ConversionError,
    },
}

/// The registered options of a command line, and the result of parsing it.
///
/// ### Example
/// ```
/// # use optlex_builder as optlex;
/// use optlex::{Dialect, OptionCollection, OptionDefinition, OptionStyle};
///
/// let mut collection = OptionCollection::new(Dialect::Linux);
/// collection
///     .register(OptionDefinition::new("x", OptionStyle::SingleValued).key("x"))
///     .unwrap();
/// collection
///     .register(OptionDefinition::new("y", OptionStyle::Switch).key("y"))
///     .unwrap();
///
/// collection.parse("-x hello -y").unwrap();
///
/// let x = collection.option("x").unwrap();
/// assert_eq!(x.values(), &["hello".to_string()]);
/// assert!(x.values_satisfied());
/// assert_eq!(collection.option("y").unwrap().command_line_key_provided(), Some("y"));
/// assert!(collection.unknown_keys().is_empty());
/// assert!(collection.stray_values().is_empty());
/// ```
#[derive(Debug)]
pub struct OptionCollection {
    tokenizer: Tokenizer,
    converters: ConverterRegistry,
    options: Vec<CliOption>,
    paths: HashMap<String, OptionId>,
    keys: HashMap<String, OptionId>,
    unknown_keys: Vec<UnknownKey>,
    stray_values: Vec<String>,
}

impl OptionCollection {
    /// Create an empty collection using the default vocabulary of `dialect`.
    pub fn new(dialect: Dialect) -> Self {
        Self::with_vocabulary(LexicalVocabulary::for_dialect(dialect))
    }

    /// Create an empty collection over an explicit vocabulary.
    ///
    /// Keys are compared using the vocabulary's [`TextComparison`].
    pub fn with_vocabulary(vocabulary: impl Into<Arc<LexicalVocabulary>>) -> Self {
        Self::with_tokenizer(Tokenizer::new(vocabulary))
    }

    /// Create an empty collection over an explicit tokenizer.
    pub fn with_tokenizer(tokenizer: Tokenizer) -> Self {
        Self {
            tokenizer,
            converters: ConverterRegistry::default(),
            options: Vec::default(),
            paths: HashMap::default(),
            keys: HashMap::default(),
            unknown_keys: Vec::default(),
            stray_values: Vec::default(),
        }
    }

    /// The text comparison applied to keys and context paths.
    pub fn comparison(&self) -> TextComparison {
        self.tokenizer.vocabulary().comparison()
    }

    /// The converters used to retrieve values.
    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    /// Append a converter to this collection's registry.
    ///
    /// Built in converters were registered first, and so take priority for the types they handle.
    pub fn register_converter(&mut self, converter: impl ScalarConverter + 'static) {
        self.converters.register(converter);
    }

    /// Register an option.
    ///
    /// Fails, leaving the collection unchanged, when:
    /// * the definition has no keys, or an empty key,
    /// * the context path or any key is already registered,
    /// * a key contains vocabulary text (such a key could never be typed),
    /// * the declared shape has no converter.
    pub fn register(&mut self, definition: OptionDefinition) -> Result<&CliOption, ConfigError> {
        let comparison = self.comparison();

        if definition.keys.is_empty() {
            return Err(ConfigError::NoKeys(definition.context_path));
        }

        let path = comparison.normalize(&definition.context_path).into_owned();

        if self.paths.contains_key(&path) {
            return Err(ConfigError::DuplicatePath(definition.context_path));
        }

        let mut keys: Vec<String> = Vec::with_capacity(definition.keys.len());

        for key in &definition.keys {
            if key.is_empty() {
                return Err(ConfigError::EmptyKey(definition.context_path.clone()));
            }

            if let Some(entry) = self
                .tokenizer
                .vocabulary()
                .entries()
                .iter()
                .find(|entry| comparison.find(key, entry.text()).is_some())
            {
                return Err(ConfigError::UnreachableKey {
                    key: key.clone(),
                    text: entry.text().to_string(),
                });
            }

            let normalized = comparison.normalize(key).into_owned();

            if let Some(existing) = self.keys.get(&normalized) {
                return Err(ConfigError::DuplicateKey {
                    key: key.clone(),
                    context_path: self.options[existing.0].context_path().to_string(),
                });
            }

            if keys.contains(&normalized) {
                return Err(ConfigError::DuplicateKey {
                    key: key.clone(),
                    context_path: definition.context_path.clone(),
                });
            }

            keys.push(normalized);
        }

        if let Some(shape) = &definition.shape {
            if !self.converters.can_convert(shape) {
                return Err(ConfigError::Unconvertible {
                    context_path: definition.context_path,
                    shape: shape.to_string(),
                });
            }
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Registering {definition:?}.");
        }

        let id = OptionId(self.options.len());
        self.paths.insert(path, id);
        self.keys.extend(keys.into_iter().map(|key| (key, id)));
        self.options.push(CliOption::from(definition));
        Ok(&self.options[id.0])
    }

    /// Parse a raw command line string.
    ///
    /// Values from any previous parse are cleared first.
    /// On error, the options allocated before the point of failure remain visible.
    pub fn parse(&mut self, input: &str) -> Result<(), ParseError> {
        let tokenization = self.tokenizer.tokenize(input);
        self.run(tokenization)
    }

    /// Parse an argument list which has already been split by a shell (ex: `["-x", "a b"]`).
    pub fn parse_args<I, S>(&mut self, arguments: I) -> Result<(), ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokenization = self.tokenizer.tokenize_args(arguments);
        self.run(tokenization)
    }

    /// Parse the program's own arguments, [`env::args`] (without the program name).
    pub fn parse_env(&mut self) -> Result<(), ParseError> {
        self.parse_args(env::args().skip(1))
    }

    fn run(&mut self, tokenization: Tokenization) -> Result<(), ParseError> {
        let Tokenization { tokens, error } = tokenization;
        self.clear_values();

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Parsing {} tokens (lexical error: {error:?}).", tokens.len());
        }

        let outcome = OptionsGenerator::new(ParsingTable::standard(), self).generate(&tokens);

        // The lexical error happened first.
        if let Some(error) = error {
            return Err(error.into());
        }

        outcome.map_err(ParseError::from)
    }

    /// Clear the values of every option, and the unknown keys and stray values.
    pub fn clear_values(&mut self) {
        for option in self.options.iter_mut() {
            option.clear_values();
        }

        self.unknown_keys.clear();
        self.stray_values.clear();
    }

    /// The option registered under `context_path`.
    pub fn option(&self, context_path: &str) -> Option<&CliOption> {
        self.paths
            .get(self.comparison().normalize(context_path).as_ref())
            .map(|id| &self.options[id.0])
    }

    /// The option registered under `key` (without its key prefix).
    pub fn option_for_key(&self, key: &str) -> Option<&CliOption> {
        self.resolve(key).map(|id| &self.options[id.0])
    }

    /// Every registered option, in registration order.
    pub fn options(&self) -> impl Iterator<Item = &CliOption> {
        self.options.iter()
    }

    /// The unknown keys found by the most recent parse, in encounter order.
    pub fn unknown_keys(&self) -> &[UnknownKey] {
        &self.unknown_keys
    }

    /// The values found by the most recent parse which belong to no option.
    pub fn stray_values(&self) -> &[String] {
        &self.stray_values
    }

    /// The required options whose values are not satisfied.
    pub fn unsatisfied_required(&self) -> Vec<&CliOption> {
        self.options
            .iter()
            .filter(|option| option.is_required() && !option.values_satisfied())
            .collect()
    }

    /// Convert the values of `context_path` into its declared shape.
    pub fn get_value(&self, context_path: &str) -> Result<Converted, ValueError> {
        let option = self
            .option(context_path)
            .ok_or_else(|| ValueError::UnknownPath(context_path.to_string()))?;
        let shape = option
            .shape()
            .ok_or_else(|| ValueError::MissingShape(context_path.to_string()))?;
        self.convert(option, shape)
    }

    /// Convert the values of `context_path` into `shape`.
    pub fn get_value_as(
        &self,
        context_path: &str,
        shape: &TargetShape,
    ) -> Result<Converted, ValueError> {
        let option = self
            .option(context_path)
            .ok_or_else(|| ValueError::UnknownPath(context_path.to_string()))?;
        self.convert(option, shape)
    }

    fn convert(&self, option: &CliOption, shape: &TargetShape) -> Result<Converted, ValueError> {
        option
            .get_value(&self.converters, shape)
            .map_err(|error| ValueError::Conversion {
                context_path: option.context_path().to_string(),
                error,
            })
    }

    /// Every problem left by the most recent parse.
    ///
    /// Lists unknown keys and stray values (in encounter order), then the options which are unsatisfied (either required, or provided without enough values) or whose declared shape does not convert.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut diagnostics: Vec<Diagnostic> = self
            .unknown_keys
            .iter()
            .cloned()
            .map(Diagnostic::UnknownKey)
            .chain(self.stray_values.iter().cloned().map(Diagnostic::StrayValue))
            .collect();

        for option in &self.options {
            let provided = option.command_line_key_provided().is_some();

            if (option.is_required() || provided) && !option.values_satisfied() {
                diagnostics.push(Diagnostic::Unsatisfied {
                    context_path: option.context_path().to_string(),
                    provided: option.values().len(),
                });
            } else if let Some(shape) = option.shape() {
                if let Err(error) = option.get_value(&self.converters, shape) {
                    diagnostics.push(Diagnostic::Conversion {
                        context_path: option.context_path().to_string(),
                        error,
                    });
                }
            }
        }

        diagnostics
    }
}

impl Allocate for OptionCollection {
    fn resolve(&self, key: &str) -> Option<OptionId> {
        self.keys
            .get(self.comparison().normalize(key).as_ref())
            .copied()
    }

    fn expects_values(&self, id: OptionId) -> bool {
        self.options[id.0].style().bound().lower() > 0
    }

    fn allocate(&mut self, key: String, resolved: Option<OptionId>, values: Vec<String>) {
        match resolved {
            Some(id) => {
                let surplus = self.options[id.0].allocate(key, values);
                self.stray_values.extend(surplus);
            }
            None => self.unknown_keys.push(UnknownKey { key, values }),
        }
    }

    fn stray(&mut self, value: String) {
        self.stray_values.push(value);
    }
}
