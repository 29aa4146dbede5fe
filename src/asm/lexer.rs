//! # Hack Assembly Lexer
//!
//! Tokenizes Hack assembly source. `//` begins a line comment; `@`, `(`,
//! `)`, `=`, and `;` are the only punctuation with syntactic meaning, so
//! everything else is swept into [`Word`](crate::asm::token::TokenKind::Word)
//! tokens and disambiguated downstream.


use crate::asm::token::{Token, TokenKind};
use crate::cursor::Cursor;
use crate::error::{CompileError, ErrorKind, Span};

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
    while matches!(cursor.peek(), Some(' ' | '\t')) {
        cursor.advance();
    }

    if cursor.is_at_end() {
        return Ok(None);
    }

    let (sl, sc) = cursor.current_pos();
    let ch = cursor.peek().unwrap();

    match ch {
        '\n' | '\r' => {
            if ch == '\r' {
                cursor.advance();
                if cursor.peek() == Some('\n') {
                    cursor.advance();
                }
            } else {
                cursor.advance();
            }
            Ok(Some(Token {
                kind: TokenKind::Newline,
                lexeme: "\n".into(),
                span: cursor.make_span(sl, sc),
            }))
        }
        '/' if cursor.peek_at(1) == Some('/') => {
            while !matches!(cursor.peek(), None | Some('\n')) {
                cursor.advance();
            }
            Ok(None)
        }
        '@' => {
            cursor.advance();
            Ok(Some(Token { kind: TokenKind::At, lexeme: "@".into(), span: cursor.make_span(sl, sc) }))
        }
        '=' => {
            cursor.advance();
            Ok(Some(Token { kind: TokenKind::Equals, lexeme: "=".into(), span: cursor.make_span(sl, sc) }))
        }
        ';' => {
            cursor.advance();
            Ok(Some(Token { kind: TokenKind::Semicolon, lexeme: ";".into(), span: cursor.make_span(sl, sc) }))
        }
        '(' => {
            cursor.advance();
            Ok(Some(Token { kind: TokenKind::LParen, lexeme: "(".into(), span: cursor.make_span(sl, sc) }))
        }
        ')' => {
            cursor.advance();
            Ok(Some(Token { kind: TokenKind::RParen, lexeme: ")".into(), span: cursor.make_span(sl, sc) }))
        }
        _ => lex_word(cursor, sl, sc, file),
    }
}

fn lex_word(cursor: &mut Cursor, sl: usize, sc: usize, file: &str) -> Result<Option<Token>, CompileError> {
    let mut word = String::new();
    while let Some(ch) = cursor.peek() {
        if matches!(ch, ' ' | '\t' | '\n' | '\r' | '@' | '=' | ';' | '(' | ')') {
            break;
        }
        if ch == '/' && cursor.peek_at(1) == Some('/') {
            break;
        }
        word.push(cursor.advance().unwrap());
    }

    if word.is_empty() {
        let ch = cursor.advance().unwrap_or('\0');
        return Err(CompileError::new(
            ErrorKind::UnexpectedCharacter,
            format!("unexpected character '{}'", ch),
            file,
            Span::new(sl, sc),
        ));
    }

    Ok(Some(Token {
        kind: TokenKind::Word(word.clone()),
        lexeme: word,
        span: Span::new(sl, sc),
    }))
}
