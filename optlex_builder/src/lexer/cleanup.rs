use crate::lexer::LexicalError;
use crate::model::{LexicalType, TextComparison, Token};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// A rewrite applied to the raw token sequence after scanning.
///
/// Passes run in order; a pass which reports an error leaves `tokens` in its truncated state and the remaining passes still run.
pub trait CleanupPass: Send + Sync {
    /// A short name used for diagnostics.
    fn name(&self) -> &'static str;

    /// Rewrite `tokens` in place.
    fn apply(
        &self,
        tokens: &mut Vec<Token>,
        comparison: TextComparison,
    ) -> Result<(), LexicalError>;
}

/// Replaces each quoted span with a single `Text` token holding its literal contents.
#[derive(Debug, Default)]
pub struct QuoteConsolidation;

impl CleanupPass for QuoteConsolidation {
    fn name(&self) -> &'static str {
        "quote-consolidation"
    }

    fn apply(
        &self,
        tokens: &mut Vec<Token>,
        comparison: TextComparison,
    ) -> Result<(), LexicalError> {
        let mut output = Vec::with_capacity(tokens.len());
        let mut token_iter = std::mem::take(tokens).into_iter();
        let mut offset = 0;

        while let Some(token) = token_iter.next() {
            if token.kind() != LexicalType::Quoter {
                offset += token.len();
                output.push(token);
                continue;
            }

            let opener_offset = offset;
            offset += token.len();
            let mut literal = String::default();
            let mut closed = false;

            // Only the same quoter text closes the span; any other quoter is literal.
            for inner in token_iter.by_ref() {
                offset += inner.len();

                if inner.kind() == LexicalType::Quoter
                    && comparison.equals(inner.value(), token.value())
                {
                    closed = true;
                    break;
                }

                literal.push_str(inner.value());
            }

            if !closed {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!(
                        "Unterminated quote at offset {opener_offset}; truncating after {} tokens.",
                        output.len()
                    );
                }

                *tokens = output;
                return Err(LexicalError::UnterminatedQuote {
                    quoter: token.into_value(),
                    offset: opener_offset,
                });
            }

            output.push(Token::text(literal));
        }

        *tokens = output;
        Ok(())
    }
}

/// Collapses each run of adjacent `Separator` tokens into its first token.
#[derive(Debug, Default)]
pub struct SeparatorMerge;

impl CleanupPass for SeparatorMerge {
    fn name(&self) -> &'static str {
        "separator-merge"
    }

    fn apply(
        &self,
        tokens: &mut Vec<Token>,
        _comparison: TextComparison,
    ) -> Result<(), LexicalError> {
        tokens.dedup_by(|current, previous| {
            current.kind() == LexicalType::Separator && previous.kind() == LexicalType::Separator
        });
        Ok(())
    }
}

/// Concatenates adjacent `Text` tokens, so that `a"b c"d` reads as the single text `ab cd`.
#[derive(Debug, Default)]
pub struct TextMerge;

impl CleanupPass for TextMerge {
    fn name(&self) -> &'static str {
        "text-merge"
    }

    fn apply(
        &self,
        tokens: &mut Vec<Token>,
        _comparison: TextComparison,
    ) -> Result<(), LexicalError> {
        let mut output: Vec<Token> = Vec::with_capacity(tokens.len());

        for token in std::mem::take(tokens) {
            match output.last_mut() {
                Some(last)
                    if last.kind() == LexicalType::Text && token.kind() == LexicalType::Text =>
                {
                    *last = Token::text(format!("{}{}", last.value(), token.value()));
                }
                _ => output.push(token),
            }
        }

        *tokens = output;
        Ok(())
    }
}

pub(crate) fn default_passes() -> Vec<Box<dyn CleanupPass>> {
    vec![
        Box::new(QuoteConsolidation),
        Box::new(SeparatorMerge),
        Box::new(TextMerge),
    ]
}
