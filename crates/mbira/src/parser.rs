//! Parser for kalimba notation.
//!
//! Consumes tokens from the [`Lexer`] and emits [`Symbol`]s one at a time.
//! Duration and octave are sticky: a duration code or octave shift applies
//! to every following symbol until the next one appears, the way written
//! music leaves the duration off runs of equal notes.

use thiserror::Error;

use crate::ast::{BaseLength, Chord, Duration, Note, Rest, Symbol, NOTE_NAMES, OCTAVE_STEPS};
use crate::lexer::{LexError, Lexer, Token, TokenKind};

/// Parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("note '{0}' doesn't exist")]
    InvalidNote(char),

    #[error("invalid note length '{0}'")]
    InvalidLength(char),

    #[error("can't shift below octave 0")]
    OctaveUnderflow,

    #[error("chord is never closed")]
    UnterminatedChord,

    #[error("unexpected '{0}' inside a chord")]
    UnexpectedInChord(char),

    #[error("unexpected character '{0}'")]
    UnexpectedToken(char),
}

/// A pull-based symbol reader with sticky duration and octave state.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    /// One-token pushback slot, the only lookahead the grammar needs.
    peeked: Option<Token>,
    duration: Duration,
    octave: u32,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser {
            lexer: Lexer::new(input),
            peeked: None,
            duration: Duration::default(),
            octave: 0,
        }
    }

    fn take(&mut self) -> Result<Option<Token>, ParseError> {
        match self.peeked.take() {
            Some(tok) => Ok(Some(tok)),
            None => Ok(self.lexer.next_token()?),
        }
    }

    fn peek(&mut self) -> Result<Option<Token>, ParseError> {
        if self.peeked.is_none() {
            self.peeked = self.lexer.next_token()?;
        }
        Ok(self.peeked)
    }

    /// Produce the next symbol, `Ok(None)` at end of input.
    pub fn next_symbol(&mut self) -> Result<Option<Symbol>, ParseError> {
        loop {
            let tok = match self.take()? {
                Some(tok) => tok,
                None => return Ok(None),
            };

            match tok.kind {
                TokenKind::DurationDigit => self.take_duration(tok.text)?,
                TokenKind::OctaveUp => self.octave += 1,
                TokenKind::OctaveDown => {
                    if self.octave == 0 {
                        return Err(ParseError::OctaveUnderflow);
                    }
                    self.octave -= 1;
                }
                TokenKind::NoteLetter => {
                    let pitch = self.scan_pitch(tok.text)?;
                    return Ok(Some(Symbol::Note(Note {
                        duration: self.duration,
                        pitch,
                    })));
                }
                TokenKind::ParenOpen => return self.scan_chord().map(Some),
                TokenKind::RestMark => {
                    return Ok(Some(Symbol::Rest(Rest {
                        duration: self.duration,
                    })));
                }
                _ => return Err(ParseError::UnexpectedToken(tok.text)),
            }
        }
    }

    /// Resolve a note letter to a pitch, consuming a raise mark when one
    /// immediately follows.
    fn scan_pitch(&mut self, letter: char) -> Result<u8, ParseError> {
        let step = NOTE_NAMES
            .find(letter.to_ascii_lowercase())
            .ok_or(ParseError::InvalidNote(letter))?;

        let mut pitch = step as u32 + self.octave * OCTAVE_STEPS as u32;

        if self.peek()?.is_some_and(|t| t.kind == TokenKind::OctaveRaise) {
            self.take()?;
            pitch += OCTAVE_STEPS as u32;
        }

        Ok(pitch as u8)
    }

    fn scan_chord(&mut self) -> Result<Symbol, ParseError> {
        let mut pitches = Vec::new();

        loop {
            let tok = match self.take()? {
                Some(tok) => tok,
                None => return Err(ParseError::UnterminatedChord),
            };

            match tok.kind {
                TokenKind::ParenClose => {
                    return Ok(Symbol::Chord(Chord {
                        duration: self.duration,
                        pitches,
                    }));
                }
                TokenKind::NoteLetter => pitches.push(self.scan_pitch(tok.text)?),
                _ => return Err(ParseError::UnexpectedInChord(tok.text)),
            }
        }
    }

    /// Update the sticky duration from a code digit, consuming a dot when
    /// one immediately follows (and clearing the dotted flag otherwise).
    fn take_duration(&mut self, digit: char) -> Result<(), ParseError> {
        let base = BaseLength::from_digit(digit).ok_or(ParseError::InvalidLength(digit))?;
        let dotted = self.peek()?.is_some_and(|t| t.kind == TokenKind::Dot);
        if dotted {
            self.take()?;
        }

        self.duration = Duration::new(base, dotted);
        Ok(())
    }

    /// Drain the remaining symbols into a vector.
    pub fn collect_symbols(mut self) -> Result<Vec<Symbol>, ParseError> {
        let mut symbols = Vec::new();
        while let Some(sym) = self.next_symbol()? {
            symbols.push(sym);
        }
        Ok(symbols)
    }
}
