//! Token-level access to sound table text.
//!
//! The table layout is owned by the wider game data pipeline; the sound
//! parsers only ever talk to it through [`TokenSource`]. [`TextTokens`] is a
//! small line-oriented implementation that understands `;` and `//` line
//! comments, `$Tag:`/`+Tag:`/`#Section` tokens and comma-separated numbers,
//! which is all the sound entry parsers need.

use thiserror::Error;

/// Number of characters quoted back in diagnostics.
const PEEK_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("expected '{expected}', found '{found}'")]
    MissingToken {
        expected: String,
        found: String,
        line: usize,
    },
    #[error("expected an integer, found '{found}'")]
    ExpectedInt { found: String, line: usize },
    #[error("expected a number, found '{found}'")]
    ExpectedFloat { found: String, line: usize },
    #[error("expected a boolean, found '{found}'")]
    ExpectedBool { found: String, line: usize },
    #[error("{message}")]
    Invalid { message: String, line: usize },
    #[error("unexpected end of table while looking for '{expected}'")]
    UnexpectedEof { expected: String },
}

impl TableError {
    pub fn line(&self) -> Option<usize> {
        match self {
            TableError::MissingToken { line, .. }
            | TableError::ExpectedInt { line, .. }
            | TableError::ExpectedFloat { line, .. }
            | TableError::ExpectedBool { line, .. }
            | TableError::Invalid { line, .. } => Some(*line),
            TableError::UnexpectedEof { .. } => None,
        }
    }
}

/// Cursor over a structured table. Tag matching is ASCII case-insensitive.
pub trait TokenSource {
    /// Consumes `tag` if it is the next token.
    fn optional_token(&mut self, tag: &str) -> bool;

    /// Reports whether `tag` is the next token without consuming it.
    fn check_token(&mut self, tag: &str) -> bool;

    fn required_token(&mut self, tag: &str) -> Result<(), TableError> {
        if self.optional_token(tag) {
            return Ok(());
        }
        if self.is_eof() {
            return Err(TableError::UnexpectedEof {
                expected: tag.to_string(),
            });
        }
        Err(TableError::MissingToken {
            expected: tag.to_string(),
            found: self.peek_text(),
            line: self.line_number(),
        })
    }

    /// Rest of the current line, trimmed.
    fn read_line(&mut self) -> String;

    /// Next whitespace-delimited word on the current line.
    fn read_word(&mut self) -> String;

    /// Text up to (not including) `delimiter` or the end of the line.
    fn read_until(&mut self, delimiter: char) -> String;

    /// Consumes `expected` if it is the next non-blank character on the line.
    fn skip_char(&mut self, expected: char) -> bool;

    fn read_int(&mut self) -> Result<i32, TableError>;

    /// Reads an integer only if one follows on the current line.
    fn read_int_optional(&mut self) -> Option<i32>;

    fn read_float(&mut self) -> Result<f32, TableError>;

    /// Reads a number only if one follows on the current line.
    fn read_float_optional(&mut self) -> Option<f32>;

    fn read_bool(&mut self) -> Result<bool, TableError>;

    fn at_line_end(&mut self) -> bool;

    fn advance_to_line_end(&mut self);

    fn line_number(&self) -> usize;

    /// A short excerpt of the upcoming text for diagnostics.
    fn peek_text(&self) -> String;

    fn is_eof(&mut self) -> bool;
}

#[derive(Debug, Clone)]
pub struct TextTokens {
    text: String,
    pos: usize,
    line: usize,
}

impl TextTokens {
    pub fn new(source: &str) -> Self {
        Self {
            text: strip_comments(source),
            pos: 0,
            line: 1,
        }
    }

    /// Moves the cursor forward, keeping the line count in step.
    fn advance(&mut self, len: usize) {
        let end = self.pos + len;
        self.line += self.text[self.pos..end].matches('\n').count();
        self.pos = end;
    }

    fn rest(&self) -> &str {
        &self.text[self.pos..]
    }

    fn skip_matching(&mut self, pred: impl Fn(char) -> bool) {
        let rest = self.rest();
        let consumed = rest.len() - rest.trim_start_matches(|c: char| pred(c)).len();
        self.advance(consumed);
    }

    fn skip_whitespace(&mut self) {
        self.skip_matching(char::is_whitespace);
    }

    fn skip_inline_whitespace(&mut self) {
        self.skip_matching(is_inline_space);
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &str {
        let start = self.pos;
        let len = self
            .rest()
            .find(|c: char| !pred(c))
            .unwrap_or(self.rest().len());
        self.advance(len);
        &self.text[start..start + len]
    }

    fn peek_tag(&mut self, tag: &str) -> bool {
        self.skip_whitespace();
        self.rest()
            .get(..tag.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(tag))
    }

    fn read_number(&mut self, fraction: bool) -> Option<&str> {
        let len = number_prefix_len(self.rest(), fraction);
        if len == 0 {
            return None;
        }
        let start = self.pos;
        self.advance(len);
        Some(&self.text[start..start + len])
    }
}

impl TokenSource for TextTokens {
    fn optional_token(&mut self, tag: &str) -> bool {
        if self.peek_tag(tag) {
            self.advance(tag.len());
            true
        } else {
            false
        }
    }

    fn check_token(&mut self, tag: &str) -> bool {
        self.peek_tag(tag)
    }

    fn read_line(&mut self) -> String {
        self.skip_inline_whitespace();
        self.take_while(|c| c != '\n').trim_end().to_string()
    }

    fn read_word(&mut self) -> String {
        self.skip_inline_whitespace();
        self.take_while(|c| !c.is_whitespace()).to_string()
    }

    fn read_until(&mut self, delimiter: char) -> String {
        self.skip_inline_whitespace();
        self.take_while(|c| c != delimiter && c != '\n')
            .trim_end()
            .to_string()
    }

    fn skip_char(&mut self, expected: char) -> bool {
        self.skip_inline_whitespace();
        if self.rest().starts_with(expected) {
            self.advance(expected.len_utf8());
            true
        } else {
            false
        }
    }

    fn read_int(&mut self) -> Result<i32, TableError> {
        self.skip_matching(|c| c.is_whitespace() || c == ',');
        let line = self.line_number();
        let found = self.peek_text();
        self.read_number(false)
            .and_then(|digits| digits.parse::<i32>().ok())
            .ok_or(TableError::ExpectedInt { found, line })
    }

    fn read_int_optional(&mut self) -> Option<i32> {
        self.skip_matching(|c| is_inline_space(c) || c == ',');
        self.read_number(false)
            .and_then(|digits| digits.parse::<i32>().ok())
    }

    fn read_float(&mut self) -> Result<f32, TableError> {
        self.skip_matching(|c| c.is_whitespace() || c == ',');
        let line = self.line_number();
        let found = self.peek_text();
        self.read_number(true)
            .and_then(|digits| digits.parse::<f32>().ok())
            .ok_or(TableError::ExpectedFloat { found, line })
    }

    fn read_float_optional(&mut self) -> Option<f32> {
        self.skip_matching(|c| is_inline_space(c) || c == ',');
        self.read_number(true)
            .and_then(|digits| digits.parse::<f32>().ok())
    }

    fn read_bool(&mut self) -> Result<bool, TableError> {
        self.skip_whitespace();
        let line = self.line_number();
        let word = self.read_word();
        match word.to_ascii_lowercase().as_str() {
            "yes" | "true" | "1" => Ok(true),
            "no" | "false" | "0" => Ok(false),
            _ => Err(TableError::ExpectedBool { found: word, line }),
        }
    }

    fn at_line_end(&mut self) -> bool {
        self.skip_inline_whitespace();
        self.rest().is_empty() || self.rest().starts_with('\n')
    }

    fn advance_to_line_end(&mut self) {
        let len = self.rest().find('\n').unwrap_or(self.rest().len());
        self.advance(len);
    }

    fn line_number(&self) -> usize {
        self.line
    }

    fn peek_text(&self) -> String {
        self.rest()
            .trim_start()
            .lines()
            .next()
            .unwrap_or_default()
            .chars()
            .take(PEEK_LEN)
            .collect()
    }

    fn is_eof(&mut self) -> bool {
        self.skip_whitespace();
        self.rest().is_empty()
    }
}

fn is_inline_space(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\r'
}

fn strip_comments(source: &str) -> String {
    source
        .lines()
        .map(|line| {
            let cut = [line.find(';'), line.find("//")]
                .into_iter()
                .flatten()
                .min()
                .unwrap_or(line.len());
            line[..cut].trim_end()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn number_prefix_len(text: &str, fraction: bool) -> usize {
    let bytes = text.as_bytes();
    let mut idx = 0;
    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        idx += 1;
    }
    let mut digits = 0;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        idx += 1;
        digits += 1;
    }
    if fraction && idx < bytes.len() && bytes[idx] == b'.' {
        idx += 1;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
            digits += 1;
        }
    }
    if digits == 0 { 0 } else { idx }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_match_case_insensitively_and_skip_comments() {
        let mut tokens = TextTokens::new("; header comment\n  $name: Click ; trailing\n");
        assert!(!tokens.optional_token("+Entry:"));
        assert!(tokens.optional_token("$Name:"));
        assert_eq!(tokens.read_word(), "Click");
        assert!(tokens.at_line_end());
        assert!(tokens.is_eof());
    }

    #[test]
    fn reads_comma_separated_retail_values() {
        let mut tokens = TextTokens::new("snd_boom.wav, 0, 0.40, 1, 10, 300\n");
        assert_eq!(tokens.read_until(','), "snd_boom.wav");
        assert!(tokens.skip_char(','));
        assert_eq!(tokens.read_int(), Ok(0));
        assert_eq!(tokens.read_float(), Ok(0.40));
        assert_eq!(tokens.read_int(), Ok(1));
        assert_eq!(tokens.read_int_optional(), Some(10));
        assert_eq!(tokens.read_int_optional(), Some(300));
        assert_eq!(tokens.read_int_optional(), None);
    }

    #[test]
    fn optional_numbers_stay_on_the_current_line() {
        let mut tokens = TextTokens::new("0.5\n0.75\n");
        assert_eq!(tokens.read_float(), Ok(0.5));
        assert_eq!(tokens.read_float_optional(), None);
        assert_eq!(tokens.read_float(), Ok(0.75));
    }

    #[test]
    fn missing_token_reports_line_and_excerpt() {
        let mut tokens = TextTokens::new("\n\n+Volume: 0.3\n");
        let err = tokens.required_token("+Preload:").unwrap_err();
        assert_eq!(
            err,
            TableError::MissingToken {
                expected: "+Preload:".to_string(),
                found: "+Volume: 0.3".to_string(),
                line: 3,
            }
        );
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn booleans_accept_table_spellings() {
        let mut tokens = TextTokens::new("YES no 1 maybe");
        assert_eq!(tokens.read_bool(), Ok(true));
        assert_eq!(tokens.read_bool(), Ok(false));
        assert_eq!(tokens.read_bool(), Ok(true));
        assert!(matches!(
            tokens.read_bool(),
            Err(TableError::ExpectedBool { .. })
        ));
    }

    #[test]
    fn line_count_follows_the_cursor() {
        let mut tokens = TextTokens::new("$Name: a\n\n; note\n+Volume: 0.5\n$Name: b\n");
        assert_eq!(tokens.line_number(), 1);
        assert!(tokens.optional_token("$Name:"));
        tokens.advance_to_line_end();
        assert_eq!(tokens.line_number(), 1);
        assert!(tokens.optional_token("+Volume:"));
        assert_eq!(tokens.line_number(), 4);
        assert_eq!(tokens.read_float(), Ok(0.5));
        assert!(tokens.optional_token("$Name:"));
        assert_eq!(tokens.line_number(), 5);
        assert_eq!(tokens.read_word(), "b");
        assert!(tokens.is_eof());
        assert_eq!(tokens.line_number(), 5);
    }

    #[test]
    fn bad_integer_is_an_error() {
        let mut tokens = TextTokens::new("abc");
        assert!(matches!(
            tokens.read_int(),
            Err(TableError::ExpectedInt { line: 1, .. })
        ));
    }
}
