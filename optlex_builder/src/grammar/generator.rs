use std::iter::once;

use crate::grammar::{Action, GrammarError, ParsingTable};
use crate::model::{LexicalType, Token, TokenPair};

#[cfg(feature = "tracing_debug")]
use tracing::{debug, trace};

/// Identifies a registered option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionId(pub(crate) usize);

/// A key and the values collected for it, between two key prefixes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct CommandLineArgument {
    pub(crate) prefix: String,
    pub(crate) key: Option<String>,
    pub(crate) resolved: Option<OptionId>,
    pub(crate) values: Vec<String>,
}

impl CommandLineArgument {
    fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }
}

/// The destination of committed groups.
pub(crate) trait Allocate {
    /// Find the option registered under `key`.
    fn resolve(&self, key: &str) -> Option<OptionId>;

    /// Whether the option requires at least one value.
    fn expects_values(&self, id: OptionId) -> bool;

    /// Receive a committed group whose key is set.
    fn allocate(&mut self, key: String, resolved: Option<OptionId>, values: Vec<String>);

    /// Receive a value which belongs to no key.
    fn stray(&mut self, value: String);
}

/// Drives a [`ParsingTable`] over a token stream, feeding an [`Allocate`].
pub(crate) struct OptionsGenerator<'a, A: Allocate> {
    table: &'a ParsingTable,
    allocator: &'a mut A,
}

impl<'a, A: Allocate> OptionsGenerator<'a, A> {
    pub(crate) fn new(table: &'a ParsingTable, allocator: &'a mut A) -> Self {
        Self { table, allocator }
    }

    /// Process `tokens`, bracketed by `StartOfInput` and `EndOfInput`.
    ///
    /// Groups committed before a grammar error stay allocated; the pending group is abandoned.
    pub(crate) fn generate(mut self, tokens: &[Token]) -> Result<(), GrammarError> {
        let start = Token::start_of_input();
        let end = Token::end_of_input();
        let stream: Vec<&Token> = once(&start).chain(tokens.iter()).chain(once(&end)).collect();
        let mut current: Option<CommandLineArgument> = None;

        // The index reported in errors is the position of `current` within `tokens`.
        for (index, window) in stream.windows(2).enumerate() {
            let pair = TokenPair::new(window[0], window[1]);

            if pair.current.kind() == LexicalType::EndOfInput {
                return self.end_parsing(&mut current, index);
            }

            let (previous, next) = pair.lexical_pair();
            let action = self
                .table
                .action((previous, next))
                .ok_or(GrammarError::IllegalSequence {
                    previous,
                    current: next,
                    index,
                })?;

            #[cfg(feature = "tracing_debug")]
            {
                trace!("({previous}, {next}) @ {index} -> {action:?}, pending={current:?}");
            }

            self.apply(action, pair, &mut current, index)?;
        }

        unreachable!("internal error - the token stream always ends with EndOfInput");
    }

    fn apply(
        &mut self,
        action: Action,
        pair: TokenPair,
        current: &mut Option<CommandLineArgument>,
        index: usize,
    ) -> Result<(), GrammarError> {
        match action {
            Action::Create => {
                self.create(pair.current, current);
                Ok(())
            }
            Action::Commit => {
                if pair.current.kind() == LexicalType::KeyPrefix && self.starved(current) {
                    // A key awaiting its value is directly followed by another key: `-x -y`.
                    return Self::terminate(
                        current,
                        LexicalType::KeyPrefix,
                        LexicalType::KeyPrefix,
                        index,
                    );
                }

                self.commit(current, index)?;

                if pair.current.kind() == LexicalType::KeyPrefix {
                    self.create(pair.current, current);
                }

                Ok(())
            }
            Action::ConsumeToken => Ok(()),
            Action::ProcessText => {
                self.process_text(pair.current, current);
                Ok(())
            }
            Action::EncloseValue => {
                let enclosing = current
                    .as_ref()
                    .map_or(false, |argument| argument.key.is_some() && argument.values.is_empty());

                if enclosing {
                    Ok(())
                } else {
                    Self::terminate(current, pair.previous.kind(), pair.current.kind(), index)
                }
            }
            Action::TerminateWithPrejudice => {
                Self::terminate(current, pair.previous.kind(), pair.current.kind(), index)
            }
        }
    }

    fn create(&mut self, prefix: &Token, current: &mut Option<CommandLineArgument>) {
        if current
            .replace(CommandLineArgument::new(prefix.value()))
            .is_some()
        {
            unreachable!("internal error - cannot create over a pending group.");
        }
    }

    fn starved(&self, current: &Option<CommandLineArgument>) -> bool {
        match current {
            Some(CommandLineArgument {
                resolved: Some(id),
                values,
                ..
            }) => values.is_empty() && self.allocator.expects_values(*id),
            _ => false,
        }
    }

    fn commit(
        &mut self,
        current: &mut Option<CommandLineArgument>,
        index: usize,
    ) -> Result<(), GrammarError> {
        let Some(argument) = current.take() else {
            return Ok(());
        };

        match argument.key {
            Some(key) => {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!(
                        "Committing '{}{key}' (resolved={:?}) with {:?}.",
                        argument.prefix, argument.resolved, argument.values
                    );
                }

                self.allocator
                    .allocate(key, argument.resolved, argument.values);
                Ok(())
            }
            None => Err(GrammarError::DanglingKeyPrefix {
                prefix: argument.prefix,
                index,
            }),
        }
    }

    fn process_text(&mut self, text: &Token, current: &mut Option<CommandLineArgument>) {
        match current {
            Some(argument) if argument.key.is_none() => {
                argument.resolved = self.allocator.resolve(text.value());
                argument.key.replace(text.value().to_string());
            }
            Some(argument) => argument.values.push(text.value().to_string()),
            None => {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Stray value '{}'.", text.value());
                }

                self.allocator.stray(text.value().to_string());
            }
        }
    }

    fn end_parsing(
        &mut self,
        current: &mut Option<CommandLineArgument>,
        index: usize,
    ) -> Result<(), GrammarError> {
        self.commit(current, index)
    }

    fn terminate(
        current: &mut Option<CommandLineArgument>,
        previous: LexicalType,
        next: LexicalType,
        index: usize,
    ) -> Result<(), GrammarError> {
        let _abandoned = current.take();

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Terminating on ({previous}, {next}) @ {index}, abandoning {_abandoned:?}.");
        }

        Err(GrammarError::TerminatedWithPrejudice {
            previous,
            current: next,
            index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{LexicalVocabulary, Tokenizer};
    use crate::model::Dialect;
    use rstest::rstest;

    #[derive(Debug, Default)]
    struct Recorder {
        keys: Vec<(&'static str, bool)>,
        allocations: Vec<(String, Option<OptionId>, Vec<String>)>,
        strays: Vec<String>,
    }

    impl Recorder {
        fn with_keys(keys: &[(&'static str, bool)]) -> Self {
            Self {
                keys: keys.to_vec(),
                ..Self::default()
            }
        }
    }

    impl Allocate for Recorder {
        fn resolve(&self, key: &str) -> Option<OptionId> {
            self.keys.iter().position(|(k, _)| *k == key).map(OptionId)
        }

        fn expects_values(&self, id: OptionId) -> bool {
            self.keys[id.0].1
        }

        fn allocate(&mut self, key: String, resolved: Option<OptionId>, values: Vec<String>) {
            self.allocations.push((key, resolved, values));
        }

        fn stray(&mut self, value: String) {
            self.strays.push(value);
        }
    }

    fn generate(recorder: &mut Recorder, input: &str) -> Result<(), GrammarError> {
        let tokenizer = Tokenizer::new(LexicalVocabulary::for_dialect(Dialect::Linux));
        let tokenization = tokenizer.tokenize(input);
        assert_eq!(tokenization.error, None);
        OptionsGenerator::new(ParsingTable::standard(), recorder).generate(&tokenization.tokens)
    }

    fn allocation(
        key: &str,
        resolved: Option<usize>,
        values: &[&str],
    ) -> (String, Option<OptionId>, Vec<String>) {
        (
            key.to_string(),
            resolved.map(OptionId),
            values.iter().map(|v| v.to_string()).collect(),
        )
    }

    #[test]
    fn empty() {
        let mut recorder = Recorder::default();
        generate(&mut recorder, "").unwrap();
        assert!(recorder.allocations.is_empty());
        assert!(recorder.strays.is_empty());
    }

    #[test]
    fn key_and_switch() {
        let mut recorder = Recorder::with_keys(&[("x", true), ("y", false)]);
        generate(&mut recorder, "-x hello -y").unwrap();
        assert_eq!(
            recorder.allocations,
            vec![
                allocation("x", Some(0), &["hello"]),
                allocation("y", Some(1), &[])
            ]
        );
        assert!(recorder.strays.is_empty());
    }

    #[rstest]
    #[case("-x=a")]
    #[case("--x=a")]
    #[case("-x = a")]
    #[case("-x= a")]
    fn enclosed_value(#[case] input: &str) {
        let mut recorder = Recorder::with_keys(&[("x", true)]);
        generate(&mut recorder, input).unwrap();
        assert_eq!(recorder.allocations, vec![allocation("x", Some(0), &["a"])]);
    }

    #[test]
    fn unresolved_key() {
        let mut recorder = Recorder::default();
        generate(&mut recorder, "-q a b -r").unwrap();
        assert_eq!(
            recorder.allocations,
            vec![allocation("q", None, &["a", "b"]), allocation("r", None, &[])]
        );
    }

    #[test]
    fn strays_before_key() {
        let mut recorder = Recorder::with_keys(&[("x", true)]);
        generate(&mut recorder, "a b -x c").unwrap();
        assert_eq!(recorder.strays, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(recorder.allocations, vec![allocation("x", Some(0), &["c"])]);
    }

    #[test]
    fn leading_separator() {
        let mut recorder = Recorder::with_keys(&[("x", true)]);
        generate(&mut recorder, "  -x c ").unwrap();
        assert_eq!(recorder.allocations, vec![allocation("x", Some(0), &["c"])]);
    }

    #[rstest]
    #[case("-x -y", LexicalType::KeyPrefix, LexicalType::KeyPrefix, 3)]
    #[case("- x", LexicalType::KeyPrefix, LexicalType::Separator, 1)]
    #[case("-=x", LexicalType::KeyPrefix, LexicalType::ValuePrefix, 1)]
    #[case("=x", LexicalType::StartOfInput, LexicalType::ValuePrefix, 0)]
    #[case("-x a=b", LexicalType::Text, LexicalType::ValuePrefix, 4)]
    #[case("-x a-y", LexicalType::Text, LexicalType::KeyPrefix, 4)]
    #[case("-x==a", LexicalType::ValuePrefix, LexicalType::ValuePrefix, 3)]
    #[case("-x=-y", LexicalType::ValuePrefix, LexicalType::KeyPrefix, 3)]
    fn terminated(
        #[case] input: &str,
        #[case] previous: LexicalType,
        #[case] current: LexicalType,
        #[case] index: usize,
    ) {
        let mut recorder = Recorder::with_keys(&[("x", true), ("y", true)]);
        assert_eq!(
            generate(&mut recorder, input).unwrap_err(),
            GrammarError::TerminatedWithPrejudice {
                previous,
                current,
                index,
            }
        );
    }

    #[test]
    fn terminated_adjacent_key_prefixes() {
        // A vocabulary with distinct prefixes can produce two key prefixes in a row.
        let mut recorder = Recorder::default();
        let tokens = vec![
            Token::new(LexicalType::KeyPrefix, "-"),
            Token::new(LexicalType::KeyPrefix, "+"),
            Token::text("x"),
        ];
        assert_eq!(
            OptionsGenerator::new(ParsingTable::standard(), &mut recorder)
                .generate(&tokens)
                .unwrap_err(),
            GrammarError::TerminatedWithPrejudice {
                previous: LexicalType::KeyPrefix,
                current: LexicalType::KeyPrefix,
                index: 1,
            }
        );
    }

    #[test]
    fn terminated_keeps_committed() {
        let mut recorder = Recorder::with_keys(&[("x", true), ("y", true)]);
        generate(&mut recorder, "-x a -y b=c").unwrap_err();
        assert_eq!(recorder.allocations, vec![allocation("x", Some(0), &["a"])]);
    }

    #[test]
    fn switch_before_key() {
        // A switch needs no value, so the next key prefix is legal.
        let mut recorder = Recorder::with_keys(&[("x", true), ("y", false)]);
        generate(&mut recorder, "-y -x a").unwrap();
        assert_eq!(
            recorder.allocations,
            vec![allocation("y", Some(1), &[]), allocation("x", Some(0), &["a"])]
        );
    }

    #[test]
    fn trailing_key_without_value() {
        let mut recorder = Recorder::with_keys(&[("x", true)]);
        generate(&mut recorder, "-x").unwrap();
        assert_eq!(recorder.allocations, vec![allocation("x", Some(0), &[])]);
    }

    #[rstest]
    #[case("-", 1)]
    #[case("-x a -", 6)]
    fn dangling_key_prefix(#[case] input: &str, #[case] index: usize) {
        let mut recorder = Recorder::with_keys(&[("x", true)]);
        assert_eq!(
            generate(&mut recorder, input).unwrap_err(),
            GrammarError::DanglingKeyPrefix {
                prefix: "-".to_string(),
                index,
            }
        );
    }

    #[test]
    fn illegal_sequence() {
        let mut recorder = Recorder::default();
        let tokens = vec![Token::new(LexicalType::Quoter, "'")];
        assert_eq!(
            OptionsGenerator::new(ParsingTable::standard(), &mut recorder)
                .generate(&tokens)
                .unwrap_err(),
            GrammarError::IllegalSequence {
                previous: LexicalType::StartOfInput,
                current: LexicalType::Quoter,
                index: 0,
            }
        );
    }
}
