use std::sync::Arc;

use crate::constant::ARGUMENT_SEPARATOR;
use crate::lexer::cleanup::{default_passes, CleanupPass};
use crate::lexer::{LexicalError, LexicalVocabulary, VocabularyEntry};
use crate::model::{LexicalType, Token};

#[cfg(feature = "tracing_debug")]
use tracing::{debug, trace};

/// The cleaned token sequence, and the lexical error (if any) which truncated it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenization {
    /// The cleaned tokens.
    pub tokens: Vec<Token>,
    /// The first lexical error reported by a cleanup pass.
    pub error: Option<LexicalError>,
}

/// Longest match scanner over a [`LexicalVocabulary`].
///
/// ### Example
/// ```
/// # use optlex_builder as optlex;
/// use optlex::{Dialect, LexicalType, LexicalVocabulary, Tokenizer};
///
/// let tokenizer = Tokenizer::new(LexicalVocabulary::for_dialect(Dialect::Linux));
/// let tokenization = tokenizer.tokenize("--x 'a b'");
/// let kinds: Vec<LexicalType> = tokenization.tokens.iter().map(|t| t.kind()).collect();
///
/// assert_eq!(
///     kinds,
///     vec![LexicalType::KeyPrefix, LexicalType::Text, LexicalType::Separator, LexicalType::Text]
/// );
/// assert_eq!(tokenization.tokens[3].value(), "a b");
/// ```
pub struct Tokenizer {
    vocabulary: Arc<LexicalVocabulary>,
    argument_vocabulary: LexicalVocabulary,
    passes: Vec<Box<dyn CleanupPass>>,
}

impl std::fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokenizer")
            .field("vocabulary", &self.vocabulary)
            .field(
                "passes",
                &self.passes.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Tokenizer {
    /// Create a tokenizer with the default cleanup passes (quote consolidation, separator merge, text merge).
    pub fn new(vocabulary: impl Into<Arc<LexicalVocabulary>>) -> Self {
        Self::with_passes(vocabulary, default_passes())
    }

    /// Create a tokenizer with an explicit, ordered list of cleanup passes.
    pub fn with_passes(
        vocabulary: impl Into<Arc<LexicalVocabulary>>,
        passes: Vec<Box<dyn CleanupPass>>,
    ) -> Self {
        let vocabulary = vocabulary.into();
        let argument_vocabulary =
            vocabulary.restricted(&[LexicalType::KeyPrefix, LexicalType::ValuePrefix]);
        Self {
            vocabulary,
            argument_vocabulary,
            passes,
        }
    }

    /// The vocabulary in use.
    pub fn vocabulary(&self) -> &Arc<LexicalVocabulary> {
        &self.vocabulary
    }

    /// Tokenize a raw command line string.
    ///
    /// Never fails; malformed quoting truncates the output and is reported via [`Tokenization::error`].
    pub fn tokenize(&self, input: &str) -> Tokenization {
        self.cleanup(scan(&self.vocabulary, input))
    }

    /// Tokenize an argument list which has already been split (and unquoted) by a shell.
    ///
    /// A key prefix is only recognized at the start of an argument, and a value prefix only after its key text.
    /// Every other argument is one literal [`LexicalType::Text`] token, whatever prefixes, whitespace or quotes it contains.
    pub fn tokenize_args<I, S>(&self, arguments: I) -> Tokenization
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tokens = Vec::default();

        for (index, argument) in arguments.into_iter().enumerate() {
            if index > 0 {
                tokens.push(Token::new(LexicalType::Separator, ARGUMENT_SEPARATOR));
            }

            tokens.extend(scan_argument(&self.argument_vocabulary, argument.as_ref()));
        }

        self.cleanup(tokens)
    }

    fn cleanup(&self, mut tokens: Vec<Token>) -> Tokenization {
        let comparison = self.vocabulary.comparison();
        let mut error = None;

        for pass in &self.passes {
            if let Err(pass_error) = pass.apply(&mut tokens, comparison) {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Cleanup pass '{}' reported: {pass_error}", pass.name());
                }

                // Only track the first error.
                if error.is_none() {
                    error.replace(pass_error);
                }
            }
        }

        #[cfg(feature = "tracing_debug")]
        {
            trace!("Cleaned tokens: {tokens:?}");
        }

        Tokenization { tokens, error }
    }
}

/// Split `input` into raw tokens.
///
/// The next token is the vocabulary text starting earliest in the remainder; ties at the same offset go to the longest text.
pub(crate) fn scan(vocabulary: &LexicalVocabulary, input: &str) -> Vec<Token> {
    let comparison = vocabulary.comparison();
    let mut tokens = Vec::default();
    let mut remainder = input;

    while !remainder.is_empty() {
        let winner: Option<(usize, &VocabularyEntry)> = vocabulary
            .entries()
            .iter()
            .filter_map(|entry| {
                comparison
                    .find(remainder, entry.text())
                    .map(|offset| (offset, entry))
            })
            .min_by(|(left_offset, left), (right_offset, right)| {
                left_offset
                    .cmp(right_offset)
                    .then_with(|| right.text().len().cmp(&left.text().len()))
            });

        match winner {
            Some((offset, entry)) => {
                if offset > 0 {
                    tokens.push(Token::text(&remainder[..offset]));
                }

                let end = offset + entry.text().len();
                // Keep the spelling from the input, which may differ in case from the entry.
                tokens.push(Token::new(entry.kind(), &remainder[offset..end]));
                remainder = &remainder[end..];
            }
            None => {
                tokens.push(Token::text(remainder));
                remainder = "";
            }
        }
    }

    tokens
}

/// Split a single shell argument into raw tokens.
fn scan_argument(vocabulary: &LexicalVocabulary, argument: &str) -> Vec<Token> {
    let prefix_length = match earliest(vocabulary, LexicalType::KeyPrefix, argument) {
        Some((0, length)) => length,
        // Includes the explicitly empty argument, which is an empty value.
        _ => return vec![Token::text(argument)],
    };

    let (prefix, rest) = argument.split_at(prefix_length);
    let mut tokens = vec![Token::new(LexicalType::KeyPrefix, prefix)];

    match earliest(vocabulary, LexicalType::ValuePrefix, rest) {
        Some((offset, length)) if offset > 0 => {
            let end = offset + length;
            tokens.push(Token::text(&rest[..offset]));
            tokens.push(Token::new(LexicalType::ValuePrefix, &rest[offset..end]));
            tokens.push(Token::text(&rest[end..]));
        }
        _ => {
            if !rest.is_empty() {
                tokens.push(Token::text(rest));
            }
        }
    }

    tokens
}

/// The earliest offset of any `kind` entry in `input`, with the longest length at that offset.
fn earliest(
    vocabulary: &LexicalVocabulary,
    kind: LexicalType,
    input: &str,
) -> Option<(usize, usize)> {
    let comparison = vocabulary.comparison();
    vocabulary
        .entries()
        .iter()
        .filter(|entry| entry.kind() == kind)
        .filter_map(|entry| {
            comparison
                .find(input, entry.text())
                .map(|offset| (offset, entry.text().len()))
        })
        .min_by(|(left_offset, left_length), (right_offset, right_length)| {
            left_offset
                .cmp(right_offset)
                .then_with(|| right_length.cmp(left_length))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dialect, TextComparison};
    use rand::{thread_rng, Rng};
    use rstest::rstest;

    fn linux() -> Tokenizer {
        Tokenizer::new(LexicalVocabulary::for_dialect(Dialect::Linux))
    }

    fn kinds(tokens: &[Token]) -> Vec<LexicalType> {
        tokens.iter().map(Token::kind).collect()
    }

    fn values(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(Token::value).collect()
    }

    #[test]
    fn scan_empty() {
        let vocabulary = LexicalVocabulary::for_dialect(Dialect::Linux);
        assert_eq!(scan(&vocabulary, ""), vec![]);
    }

    #[test]
    fn scan_longest_match() {
        let vocabulary = LexicalVocabulary::for_dialect(Dialect::Linux);
        assert_eq!(
            scan(&vocabulary, "--x"),
            vec![
                Token::new(LexicalType::KeyPrefix, "--"),
                Token::text("x")
            ]
        );
    }

    #[test]
    fn scan_longest_match_reverse_registration() {
        // Registration order must not affect the longest match.
        let mut vocabulary = LexicalVocabulary::new(TextComparison::Ordinal);
        vocabulary.add(LexicalType::KeyPrefix, "--").unwrap();
        vocabulary.add(LexicalType::KeyPrefix, "-").unwrap();
        assert_eq!(
            scan(&vocabulary, "a--x"),
            vec![
                Token::text("a"),
                Token::new(LexicalType::KeyPrefix, "--"),
                Token::text("x")
            ]
        );
    }

    #[test]
    fn scan_earliest_offset_wins() {
        let vocabulary = LexicalVocabulary::for_dialect(Dialect::Linux);
        assert_eq!(
            scan(&vocabulary, "ab=c--d"),
            vec![
                Token::text("ab"),
                Token::new(LexicalType::ValuePrefix, "="),
                Token::text("c"),
                Token::new(LexicalType::KeyPrefix, "--"),
                Token::text("d"),
            ]
        );
    }

    #[test]
    fn scan_case_insensitive_keeps_spelling() {
        let mut vocabulary = LexicalVocabulary::new(TextComparison::OrdinalIgnoreCase);
        vocabulary.add(LexicalType::KeyPrefix, "key:").unwrap();
        assert_eq!(
            scan(&vocabulary, "KEY:abc"),
            vec![
                Token::new(LexicalType::KeyPrefix, "KEY:"),
                Token::text("abc")
            ]
        );
    }

    #[rstest]
    #[case("-x", vec![LexicalType::KeyPrefix, LexicalType::Text], vec!["-", "x"])]
    #[case("--x=1", vec![LexicalType::KeyPrefix, LexicalType::Text, LexicalType::ValuePrefix, LexicalType::Text], vec!["--", "x", "=", "1"])]
    #[case("abc", vec![LexicalType::Text], vec!["abc"])]
    #[case(" \t ", vec![LexicalType::Separator], vec![" "])]
    #[case("-x \"a b\" c", vec![LexicalType::KeyPrefix, LexicalType::Text, LexicalType::Separator, LexicalType::Text, LexicalType::Separator, LexicalType::Text], vec!["-", "x", " ", "a b", " ", "c"])]
    #[case("-x='-y z'", vec![LexicalType::KeyPrefix, LexicalType::Text, LexicalType::ValuePrefix, LexicalType::Text], vec!["-", "x", "=", "-y z"])]
    #[case("a\"b c\"d", vec![LexicalType::Text], vec!["ab cd"])]
    #[case("\"\"", vec![LexicalType::Text], vec![""])]
    fn tokenize(
        #[case] input: &str,
        #[case] expected_kinds: Vec<LexicalType>,
        #[case] expected_values: Vec<&str>,
    ) {
        let tokenization = linux().tokenize(input);
        assert_eq!(tokenization.error, None);
        assert_eq!(kinds(&tokenization.tokens), expected_kinds);
        assert_eq!(values(&tokenization.tokens), expected_values);
    }

    #[test]
    fn tokenize_unterminated() {
        let tokenization = linux().tokenize("-x a 'b c");
        assert_eq!(
            tokenization.error,
            Some(LexicalError::UnterminatedQuote {
                quoter: "'".to_string(),
                offset: 5,
            })
        );
        assert_eq!(values(&tokenization.tokens), vec!["-", "x", " ", "a", " "]);
    }

    #[test]
    fn tokenize_separator_collapse() {
        let tokenizer = linux();
        assert_eq!(tokenizer.tokenize("-x    y"), tokenizer.tokenize("-x y"));
    }

    #[test]
    fn tokenize_separator_collapse_random() {
        let tokenizer = linux();
        let expected = tokenizer.tokenize("-x a --y b c");

        for _ in 0..100 {
            let mut input = String::default();

            for (i, part) in ["-x", "a", "--y", "b", "c"].iter().enumerate() {
                if i > 0 {
                    let run: usize = thread_rng().gen_range(1..8);
                    for _ in 0..run {
                        input.push(if thread_rng().gen() { ' ' } else { '\t' });
                    }
                }
                input.push_str(part);
            }

            let actual = tokenizer.tokenize(&input);
            assert_eq!(kinds(&actual.tokens), kinds(&expected.tokens));
            assert_eq!(
                actual
                    .tokens
                    .iter()
                    .filter(|t| t.kind() != LexicalType::Separator)
                    .collect::<Vec<_>>(),
                expected
                    .tokens
                    .iter()
                    .filter(|t| t.kind() != LexicalType::Separator)
                    .collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn tokenize_windows() {
        let tokenizer = Tokenizer::new(LexicalVocabulary::for_dialect(Dialect::Windows));
        let tokenization = tokenizer.tokenize("/Out:x /v");
        assert_eq!(
            values(&tokenization.tokens),
            vec!["/", "Out:x", " ", "/", "v"]
        );
    }

    #[test]
    fn tokenize_without_passes() {
        let tokenizer =
            Tokenizer::with_passes(LexicalVocabulary::for_dialect(Dialect::Linux), vec![]);
        let tokenization = tokenizer.tokenize("'a'  b");
        assert_eq!(
            kinds(&tokenization.tokens),
            vec![
                LexicalType::Quoter,
                LexicalType::Text,
                LexicalType::Quoter,
                LexicalType::Separator,
                LexicalType::Separator,
                LexicalType::Text,
            ]
        );
    }

    #[rstest]
    #[case(vec!["-x", "a b"], vec!["-", "x", " ", "a b"])]
    #[case(vec!["--x=it's"], vec!["--", "x", "=", "it's"])]
    #[case(vec!["-x", ""], vec!["-", "x", " ", ""])]
    #[case(vec!["a", "b"], vec!["a", " ", "b"])]
    #[case(vec!["-x", "my-file.txt"], vec!["-", "x", " ", "my-file.txt"])]
    #[case(vec!["-d", "2024-01-02"], vec!["-", "d", " ", "2024-01-02"])]
    #[case(vec!["-D", "name=value"], vec!["-", "D", " ", "name=value"])]
    #[case(vec!["--x=a=b"], vec!["--", "x", "=", "a=b"])]
    #[case(vec!["--x="], vec!["--", "x", "=", ""])]
    #[case(vec!["--"], vec!["--"])]
    fn tokenize_args(#[case] arguments: Vec<&str>, #[case] expected: Vec<&str>) {
        let tokenization = linux().tokenize_args(arguments);
        assert_eq!(tokenization.error, None);
        assert_eq!(values(&tokenization.tokens), expected);
    }

    #[test]
    fn tokenize_args_kinds() {
        let tokenization = linux().tokenize_args(["--out=a-b", "c=d"]);
        assert_eq!(
            kinds(&tokenization.tokens),
            vec![
                LexicalType::KeyPrefix,
                LexicalType::Text,
                LexicalType::ValuePrefix,
                LexicalType::Text,
                LexicalType::Separator,
                LexicalType::Text,
            ]
        );
    }

    #[test]
    fn tokenize_args_empty() {
        let arguments: &[&str] = &[];
        let tokenization = linux().tokenize_args(arguments);
        assert_eq!(tokenization.tokens, vec![]);
    }
}
