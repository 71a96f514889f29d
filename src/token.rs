//! Delimiter-set tokenizer over preprocessed shader text
//!
//! Tokens are slices of the input. A token ends at the first delimiter; a
//! delimiter with nothing before it is a one-character token of its own.

/// Characters that end a token
pub const DELIMITERS: &[char] = &[
    ' ', '*', '<', '>', '-', '+', '/', '%', '(', ')', '{', '}', ',', ';', '[', ']',
];

/// Split the next token off `text`.
///
/// Leading whitespace is skipped. An empty token means the input is
/// exhausted; otherwise the returned remainder is strictly shorter than
/// `text`.
pub fn next_token(text: &str) -> (&str, &str) {
    let content = text.trim_start();
    if content.is_empty() {
        return ("", content);
    }

    let end = match content.find(DELIMITERS) {
        Some(0) => content.chars().next().map_or(1, char::len_utf8),
        Some(index) => index,
        None => content.len(),
    };

    content.split_at(end)
}

/// Source of tokens for the parser.
///
/// Besides plain tokens the parser needs raw access to the unconsumed text
/// for parameter lists and function bodies, which it scans itself.
pub trait TokenStream<'a> {
    /// Consume and return the next token, or `""` at end of input
    fn next_token(&mut self) -> &'a str;

    /// Text not consumed yet
    fn remainder(&self) -> &'a str;

    /// Replace the unconsumed text after a raw scan
    fn set_remainder(&mut self, rest: &'a str);
}

/// Cursor over a preprocessed source string
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    rest: &'a str,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { rest: text }
    }
}

impl<'a> TokenStream<'a> for Tokenizer<'a> {
    fn next_token(&mut self) -> &'a str {
        let (token, rest) = next_token(self.rest);
        self.rest = rest;
        token
    }

    fn remainder(&self) -> &'a str {
        self.rest
    }

    fn set_remainder(&mut self, rest: &'a str) {
        self.rest = rest;
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        match TokenStream::next_token(self) {
            "" => None,
            token => Some(token),
        }
    }
}
