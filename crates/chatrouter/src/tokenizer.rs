//! Quote-aware splitting of command text into raw argument tokens
//!
//! Whitespace outside of double quotes separates tokens and runs of it collapse.
//! Inside quotes whitespace is kept as part of the token. Quote characters are
//! never stripped, so `"hello world"` comes back as one token with both quotes;
//! transformers decide what the quotes mean. An unterminated quote simply runs
//! to the end of the input.

const QUOTE: char = '"';

/// Split raw command text into tokens
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;

    for ch in input.chars() {
        if ch == QUOTE {
            in_quote = !in_quote;
            current.push(ch);
        } else if ch.is_whitespace() && !in_quote {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        } else {
            current.push(ch);
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Split text after the prefix into the command name and the remaining text
///
/// Leading whitespace is skipped. The name is everything up to the next
/// whitespace character; the rest is returned untouched for tokenizing.
pub fn split_command(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(idx) => (&text[..idx], &text[idx..]),
        None => (text, ""),
    }
}
