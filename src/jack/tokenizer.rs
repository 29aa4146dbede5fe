//! # Jack Tokenizer
//!
//! Turns Jack source text into a stream of tokens.
//!
//! ## Features
//!
//! - **Comments**: line comments (`//`), block comments (`/* ... */`), and
//!   doc comments (`/** ... */`) are all stripped before tokenization.
//! - **String constants**: double-quoted text. Jack strings cannot contain
//!   a newline or an unescaped double quote; there is no escape syntax.
//! - **Integer constants**: unsigned decimal literals in `0..=32767`.
//! - **Identifiers**: `[A-Za-z_][A-Za-z0-9_]*`, with the reserved words
//!   recognized as keywords instead.
//! - **Symbols**: the fixed Jack symbol set (`{}()[].,;+-*/&|<>=~`).


use crate::cursor::Cursor;
use crate::error::{CompileError, ErrorKind, Span};
use crate::jack::token::{Keyword, Token, TokenKind};

pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<CompileError>,
}

#[must_use]
pub fn tokenize(source: &str, file: &str) -> LexResult {
    let mut cursor = Cursor::new(source);
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    while !cursor.is_at_end() {
        match lex_token(&mut cursor, file) {
            Ok(Some(token)) => tokens.push(token),
            Ok(None) => {}
            Err(err) => errors.push(err),
        }
    }

    let (l, c) = cursor.current_pos();
    tokens.push(Token {
        kind: TokenKind::Eof,
        lexeme: String::new(),
        span: Span::new(l, c),
    });

    LexResult { tokens, errors }
}

fn lex_token(cursor: &mut Cursor, file: &str) -> Result<Option<Token>, CompileError> {
    // Newlines are insignificant in Jack, so they're skipped along with
    // other whitespace rather than becoming tokens.
    while matches!(cursor.peek(), Some(' ' | '\t' | '\n' | '\r')) {
        cursor.advance();
    }

    if cursor.is_at_end() {
        return Ok(None);
    }

    let (sl, sc) = cursor.current_pos();
    let ch = cursor.peek().unwrap();

    match ch {
        '/' if cursor.peek_at(1) == Some('/') => {
            skip_line_comment(cursor);
            Ok(None)
        }
        '/' if cursor.peek_at(1) == Some('*') => {
            skip_block_comment(cursor, sl, sc, file)?;
            Ok(None)
        }
        '"' => lex_string(cursor, sl, sc, file),
        c if c.is_ascii_digit() => lex_integer(cursor, sl, sc, file),
        c if c.is_ascii_alphabetic() || c == '_' => Ok(Some(lex_word(cursor, sl, sc))),
        c if crate::jack::token::SYMBOLS.contains(&c) => {
            cursor.advance();
            Ok(Some(Token {
                kind: TokenKind::Symbol(c),
                lexeme: c.to_string(),
                span: cursor.make_span(sl, sc),
            }))
        }
        _ => {
            cursor.advance();
            Err(CompileError::new(
                ErrorKind::UnexpectedCharacter,
                format!("unexpected character '{}'", ch),
                file,
                cursor.make_span(sl, sc),
            ))
        }
    }
}

fn skip_line_comment(cursor: &mut Cursor) {
    while let Some(ch) = cursor.peek() {
        if ch == '\n' {
            break;
        }
        cursor.advance();
    }
}

fn skip_block_comment(
    cursor: &mut Cursor,
    sl: usize,
    sc: usize,
    file: &str,
) -> Result<(), CompileError> {
    // Consume the opening "/*" (also matches the "/**" doc-comment form,
    // since the third '*' is just more comment body).
    cursor.advance();
    cursor.advance();

    loop {
        if cursor.is_at_end() {
            return Err(CompileError::new(
                ErrorKind::UnterminatedComment,
                "unterminated block comment",
                file,
                Span::new(sl, sc),
            ));
        }
        if cursor.peek() == Some('*') && cursor.peek_at(1) == Some('/') {
            cursor.advance();
            cursor.advance();
            return Ok(());
        }
        cursor.advance();
    }
}

fn lex_string(
    cursor: &mut Cursor,
    sl: usize,
    sc: usize,
    file: &str,
) -> Result<Option<Token>, CompileError> {
    cursor.advance();
    let mut value = String::new();

    loop {
        match cursor.peek() {
            None | Some('\n') => {
                return Err(CompileError::new(
                    ErrorKind::UnterminatedString,
                    "unterminated string constant",
                    file,
                    Span::new(sl, sc),
                ));
            }
            Some('"') => {
                cursor.advance();
                break;
            }
            Some(c) => {
                value.push(c);
                cursor.advance();
            }
        }
    }

    Ok(Some(Token {
        kind: TokenKind::StringConstant(value),
        lexeme: String::new(),
        span: cursor.make_span(sl, sc),
    }))
}

fn lex_integer(
    cursor: &mut Cursor,
    sl: usize,
    sc: usize,
    file: &str,
) -> Result<Option<Token>, CompileError> {
    let mut digits = String::new();
    while matches!(cursor.peek(), Some(c) if c.is_ascii_digit()) {
        digits.push(cursor.advance().unwrap());
    }

    let value: i64 = digits.parse().expect("digit run must parse");
    if value > 32767 {
        return Err(CompileError::new(
            ErrorKind::IntegerOutOfRange,
            format!("integer constant {} exceeds the maximum value 32767", value),
            file,
            Span::new(sl, sc),
        ));
    }

    Ok(Some(Token {
        kind: TokenKind::IntegerConstant(value as i32),
        lexeme: digits,
        span: cursor.make_span(sl, sc),
    }))
}

fn lex_word(cursor: &mut Cursor, sl: usize, sc: usize) -> Token {
    let mut word = String::new();
    while matches!(cursor.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
        word.push(cursor.advance().unwrap());
    }

    let kind = match Keyword::from_str(&word) {
        Some(kw) => TokenKind::Keyword(kw),
        None => TokenKind::Identifier(word.clone()),
    };

    Token {
        kind,
        lexeme: word,
        span: cursor.make_span(sl, sc),
    }
}
