//! Streaming tokenizer
//!
//! Pulls bytes from a [`BufferedReader`] and produces classified tokens one
//! at a time. Whitespace and comments (line and nested block comments) are
//! skipped; identifiers accept any byte with the high bit set so UTF-8 names
//! pass through untouched.

mod token;

pub use token::{Token, TokenKind, KEYWORDS, PUNCTUATION};

use crate::buffer::OutOfMemory;
use crate::reader::{BufferedReader, EOF_MARKER};
use std::io::Read;
use thiserror::Error;

/// Tokenizer errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("Regex literals are not supported (line {line})")]
    UnsupportedConstruct { line: usize },

    #[error("Out of memory while growing a token")]
    OutOfMemory,
}

impl From<OutOfMemory> for LexError {
    fn from(_: OutOfMemory) -> Self {
        LexError::OutOfMemory
    }
}

fn is_whitespace(ch: u8) -> bool {
    matches!(ch, b' ' | b'\t' | b'\r' | b'\n')
}

fn is_identifier_start(ch: u8) -> bool {
    ch >= 0x80 || ch.is_ascii_alphabetic() || ch == b'_' || ch == b'`'
}

fn is_identifier_continue(ch: u8) -> bool {
    is_identifier_start(ch) || ch.is_ascii_digit()
}

/// Token cursor over a borrowed reader
pub struct Tokenizer<'r, R> {
    reader: &'r mut BufferedReader<R>,
    finished: bool,
}

impl<'r, R: Read> Tokenizer<'r, R> {
    pub fn new(reader: &'r mut BufferedReader<R>) -> Self {
        Self {
            reader,
            finished: false,
        }
    }

    /// Produce the next token in a freshly allocated [`Token`]
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        let mut tok = Token::new();
        self.next_token_into(&mut tok)?;
        Ok(tok)
    }

    /// Produce the next token, reusing `tok`'s allocation.
    ///
    /// Once the source is exhausted every call yields an empty
    /// [`TokenKind::EndOfFile`] token.
    pub fn next_token_into(&mut self, tok: &mut Token) -> Result<(), LexError> {
        loop {
            self.skip_whitespace();
            tok.reset(self.reader.line());

            let ch = self.reader.read_char();

            if ch == EOF_MARKER {
                tok.set_kind(TokenKind::EndOfFile);
                return Ok(());
            }

            if ch == b'/' {
                match self.reader.peek_char() {
                    b'/' => self.skip_line(),
                    b'*' => {
                        self.reader.read_char();
                        self.skip_block_comment();
                    }
                    _ => return Err(LexError::UnsupportedConstruct { line: tok.line() }),
                }
                continue;
            }

            tok.push(ch)?;

            if is_identifier_start(ch) {
                self.read_word(tok)?;
                tok.set_kind(TokenKind::from_word(tok.lexeme()));
            } else {
                tok.set_kind(TokenKind::from_byte(ch));
            }

            return Ok(());
        }
    }

    fn read_word(&mut self, tok: &mut Token) -> Result<(), LexError> {
        while is_identifier_continue(self.reader.peek_char()) {
            let ch = self.reader.read_char();
            tok.push(ch)?;
        }
        Ok(())
    }

    fn skip_whitespace(&mut self) {
        while is_whitespace(self.reader.peek_char()) {
            self.reader.read_char();
        }
    }

    /// Skip to the end of the line, leaving the newline in place
    fn skip_line(&mut self) {
        loop {
            let ch = self.reader.peek_char();
            if ch == b'\n' || ch == EOF_MARKER {
                return;
            }
            self.reader.read_char();
        }
    }

    /// Skip a block comment whose opening `/*` was already consumed.
    ///
    /// Nested `/* */` pairs are tracked; running out of input closes the
    /// comment silently.
    fn skip_block_comment(&mut self) {
        let start_line = self.reader.line();
        let mut depth = 1usize;

        loop {
            match self.reader.read_char() {
                EOF_MARKER => {
                    tracing::warn!(line = start_line, depth, "block comment not closed before end of file");
                    return;
                }
                b'*' if self.reader.peek_char() == b'/' => {
                    self.reader.read_char();
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                b'/' if self.reader.peek_char() == b'*' => {
                    self.reader.read_char();
                    depth += 1;
                }
                _ => {}
            }
        }
    }
}

impl<R: Read> Iterator for Tokenizer<'_, R> {
    type Item = Result<Token, LexError>;

    /// Yields tokens up to and including `EndOfFile`, or up to the first error
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let result = self.next_token();
        if !matches!(&result, Ok(tok) if !tok.is_eof()) {
            self.finished = true;
        }
        Some(result)
    }
}

/// Tokenize a whole reader, stopping after `EndOfFile` or the first error
pub fn tokenize<R: Read>(reader: &mut BufferedReader<R>) -> Result<Vec<Token>, LexError> {
    Tokenizer::new(reader).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(src: &str) -> BufferedReader<Cursor<Vec<u8>>> {
        BufferedReader::new(Cursor::new(src.as_bytes().to_vec()))
    }

    fn lex(src: &str) -> Vec<(String, TokenKind)> {
        let mut reader = reader(src);
        tokenize(&mut reader)
            .unwrap()
            .iter()
            .map(|t| (t.text().into_owned(), t.kind()))
            .collect()
    }

    fn kinds(src: &str) -> Vec<TokenKind> {
        lex(src).into_iter().map(|(_, k)| k).collect()
    }

    #[test]
    fn test_empty_input_is_eof() {
        assert_eq!(lex(""), vec![(String::new(), TokenKind::EndOfFile)]);
        assert_eq!(lex("  \n\t\r\n"), vec![(String::new(), TokenKind::EndOfFile)]);
    }

    #[test]
    fn test_declaration_tokens() {
        use TokenKind::*;
        assert_eq!(
            kinds("public func bar() {}"),
            vec![Public, Func, Identifier, OpenParen, CloseParen, OpenBrace, CloseBrace, EndOfFile]
        );
    }

    #[test]
    fn test_all_keywords() {
        use TokenKind::*;
        assert_eq!(
            kinds("func public private open internal init class struct actor"),
            vec![Func, Public, Private, Open, Internal, Init, Class, Struct, Actor, EndOfFile]
        );
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        use TokenKind::*;
        assert_eq!(kinds("Public FUNC Class"), vec![Identifier, Identifier, Identifier, EndOfFile]);
        assert_eq!(kinds("classy _func init2"), vec![Identifier, Identifier, Identifier, EndOfFile]);
    }

    #[test]
    fn test_all_punctuation() {
        use TokenKind::*;
        assert_eq!(
            kinds("()[]{}<>"),
            vec![
                OpenParen, CloseParen, OpenBracket, CloseBracket, OpenBrace, CloseBrace, LessThan,
                GreaterThan, EndOfFile
            ]
        );
    }

    #[test]
    fn test_unknown_punctuation() {
        let tokens = lex("a : b");
        assert_eq!(tokens[1], (":".to_string(), TokenKind::Unknown));
        assert_eq!(tokens[2], ("b".to_string(), TokenKind::Identifier));
    }

    #[test]
    fn test_digits_do_not_start_identifiers() {
        let tokens = lex("x1 1x");
        assert_eq!(tokens[0], ("x1".to_string(), TokenKind::Identifier));
        assert_eq!(tokens[1], ("1".to_string(), TokenKind::Unknown));
        assert_eq!(tokens[2], ("x".to_string(), TokenKind::Identifier));
    }

    #[test]
    fn test_backticks_and_utf8_identifiers() {
        let tokens = lex("`class` größe 名前");
        assert_eq!(tokens[0], ("`class`".to_string(), TokenKind::Identifier));
        assert_eq!(tokens[1], ("größe".to_string(), TokenKind::Identifier));
        assert_eq!(tokens[2], ("名前".to_string(), TokenKind::Identifier));
    }

    #[test]
    fn test_line_comment_skipped() {
        use TokenKind::*;
        assert_eq!(kinds("// public func\nclass"), vec![Class, EndOfFile]);
        assert_eq!(kinds("struct // trailing"), vec![Struct, EndOfFile]);
    }

    #[test]
    fn test_nested_block_comment_skipped() {
        let tokens = lex("/* a /* b */ c */ actor");
        assert_eq!(tokens, vec![("actor".to_string(), TokenKind::Actor), (String::new(), TokenKind::EndOfFile)]);
    }

    #[test]
    fn test_block_comment_closes_on_double_star() {
        assert_eq!(kinds("/** doc **/ init"), vec![TokenKind::Init, TokenKind::EndOfFile]);
    }

    #[test]
    fn test_unterminated_block_comment_is_eof() {
        assert_eq!(kinds("open /* never closed"), vec![TokenKind::Open, TokenKind::EndOfFile]);
    }

    #[test]
    fn test_many_comments_do_not_grow_stack() {
        let src = "// c\n".repeat(100_000) + "func";
        assert_eq!(kinds(&src), vec![TokenKind::Func, TokenKind::EndOfFile]);
    }

    #[test]
    fn test_regex_literal_is_unsupported() {
        let mut reader = reader("a\n/regex/");
        let mut tokenizer = Tokenizer::new(&mut reader);
        assert_eq!(tokenizer.next_token().unwrap().kind(), TokenKind::Identifier);
        assert_eq!(
            tokenizer.next_token(),
            Err(LexError::UnsupportedConstruct { line: 2 })
        );
    }

    #[test]
    fn test_eof_repeats_after_end() {
        let mut reader = reader("x");
        let mut tokenizer = Tokenizer::new(&mut reader);
        tokenizer.next_token().unwrap();
        assert!(tokenizer.next_token().unwrap().is_eof());
        assert!(tokenizer.next_token().unwrap().is_eof());
    }

    #[test]
    fn test_iterator_stops_after_eof() {
        let mut reader = reader("a b");
        let tokens: Vec<_> = Tokenizer::new(&mut reader).collect();
        assert_eq!(tokens.len(), 3);
        assert!(tokens[2].as_ref().unwrap().is_eof());
    }

    #[test]
    fn test_iterator_stops_after_error() {
        let mut reader = reader("a / b");
        let tokens: Vec<_> = Tokenizer::new(&mut reader).collect();
        assert_eq!(tokens.len(), 2);
        assert!(tokens[1].is_err());
    }

    #[test]
    fn test_token_reuse() {
        let mut reader = reader("internal x");
        let mut tokenizer = Tokenizer::new(&mut reader);
        let mut tok = Token::new();
        tokenizer.next_token_into(&mut tok).unwrap();
        assert_eq!(tok.lexeme(), b"internal");
        tokenizer.next_token_into(&mut tok).unwrap();
        assert_eq!(tok.lexeme(), b"x");
        assert_eq!(tok.kind(), TokenKind::Identifier);
    }

    #[test]
    fn test_token_lines() {
        let mut reader = reader("a\n\n/* x\n */ b");
        let tokens = tokenize(&mut reader).unwrap();
        assert_eq!(tokens[0].line(), 1);
        assert_eq!(tokens[1].line(), 4);
    }

    #[test]
    fn test_tokens_span_chunk_boundaries() {
        let mut reader = BufferedReader::from_source(Cursor::new(b"public struct Point".to_vec()), 3);
        let kinds: Vec<TokenKind> = tokenize(&mut reader).unwrap().iter().map(Token::kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Public, TokenKind::Struct, TokenKind::Identifier, TokenKind::EndOfFile]
        );
    }
}
