//! Lexer for kalimba notation.
//!
//! Turns a character stream into a flat sequence of single-character
//! tokens. Whitespace never produces a token and `#` comments are skipped
//! to the end of the line. Everything else that is not a recognized
//! character is a [`LexError`].

use std::iter::Peekable;
use std::str::Chars;

use thiserror::Error;

use crate::ast::NOTE_NAMES;

/// The kind of a notation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// One of the seven diatonic note letters, case-insensitive.
    NoteLetter,
    /// A duration code digit. The lexer accepts any digit; the parser
    /// rejects codes other than 1, 2, 4 and 8.
    DurationDigit,
    /// `(` opening a chord.
    ParenOpen,
    /// `)` closing a chord.
    ParenClose,
    /// `>` shifting the sticky octave up.
    OctaveUp,
    /// `<` shifting the sticky octave down.
    OctaveDown,
    /// `'` raising the preceding note by one octave.
    OctaveRaise,
    /// `.` dotting the preceding duration code.
    Dot,
    /// `r` marking a rest.
    RestMark,
}

/// A token and the source character it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: char,
}

/// Lexing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
}

fn is_note_letter(c: char) -> bool {
    NOTE_NAMES.contains(c.to_ascii_lowercase())
}

/// A pull-based tokenizer over notation text.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            chars: input.chars().peekable(),
        }
    }

    /// Produce the next token, `Ok(None)` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        loop {
            let c = match self.chars.next() {
                Some(c) => c,
                None => return Ok(None),
            };

            if c.is_whitespace() {
                continue;
            }

            if c == '#' {
                self.skip_line();
                continue;
            }

            let kind = match c {
                '(' => TokenKind::ParenOpen,
                ')' => TokenKind::ParenClose,
                '>' => TokenKind::OctaveUp,
                '<' => TokenKind::OctaveDown,
                '\'' => TokenKind::OctaveRaise,
                '.' => TokenKind::Dot,
                'r' => TokenKind::RestMark,
                c if is_note_letter(c) => TokenKind::NoteLetter,
                c if c.is_ascii_digit() => TokenKind::DurationDigit,
                c => return Err(LexError::UnexpectedChar(c)),
            };

            return Ok(Some(Token { kind, text: c }));
        }
    }

    fn skip_line(&mut self) {
        while let Some(&c) = self.chars.peek() {
            self.chars.next();
            if c == '\n' {
                break;
            }
        }
    }
}
