//! Word tokenizer used for gazetteer and trigger matching.
//!
//! Tokens are maximal runs of alphanumeric characters, lowercased, with byte
//! offsets into the source text. Phrases are matched as whole token
//! sequences so short aliases never match inside longer words.

/// A lowercase word and its byte range in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Split `input` into lowercase alphanumeric tokens.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current: Option<(usize, String)> = None;

    for (idx, ch) in input.char_indices() {
        if ch.is_alphanumeric() {
            match current.as_mut() {
                Some((_, text)) => text.extend(ch.to_lowercase()),
                None => current = Some((idx, ch.to_lowercase().collect())),
            }
        } else if let Some((start, text)) = current.take() {
            tokens.push(Token { text, start, end: idx });
        }
    }

    if let Some((start, text)) = current {
        tokens.push(Token { text, start, end: input.len() });
    }

    tokens
}

/// Tokenize a static phrase into its word list.
pub fn phrase_words(phrase: &str) -> Vec<String> {
    tokenize(phrase).into_iter().map(|t| t.text).collect()
}

/// Whether `words` occurs at position `at` of `tokens`.
pub fn matches_at(tokens: &[Token], at: usize, words: &[String]) -> bool {
    if words.is_empty() || at + words.len() > tokens.len() {
        return false;
    }
    tokens[at..at + words.len()]
        .iter()
        .zip(words)
        .all(|(token, word)| token.text == *word)
}

/// Whether the phrase appears anywhere in the token stream.
pub fn contains_phrase(tokens: &[Token], phrase: &str) -> bool {
    let words = phrase_words(phrase);
    (0..tokens.len()).any(|i| matches_at(tokens, i, &words))
}
