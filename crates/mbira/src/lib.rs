//! Kalimba notation parser and tablature renderer.
//!
//! This crate turns a compact text notation for a single melodic line
//! (pitches, chords, rests, durations, octave shifts) into a paginated
//! kalimba tablature diagram.
//!
//! # Example
//!
//! ```
//! use mbira::{parse, to_svg, LayoutParams};
//!
//! // A duration code is sticky until the next one; `>` shifts the octave.
//! let tune = "2 c d e f  g a b > c  < 1 g g 2 e e d  8 (c e g)";
//!
//! let symbols = parse(tune).unwrap();
//! let svg = to_svg(&symbols, &LayoutParams::default()).unwrap();
//! assert!(svg.contains("<svg"));
//! ```

pub mod ast;
pub mod layout;
pub mod lexer;
pub mod parser;
pub mod svg;

pub use ast::{BaseLength, Chord, Duration, Note, Rest, Symbol};
pub use layout::{count_measures, render, LayoutError, LayoutParams, Surface};
pub use lexer::{LexError, Lexer, Token, TokenKind};
pub use parser::{ParseError, Parser};
pub use svg::SvgSurface;

use thiserror::Error;

/// Any failure on the way from notation text to a rendered score.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Parse notation text into the full symbol sequence.
pub fn parse(input: &str) -> Result<Vec<Symbol>, ParseError> {
    Parser::new(input).collect_symbols()
}

/// Lay out a symbol sequence and serialize it as an SVG document.
pub fn to_svg(symbols: &[Symbol], params: &LayoutParams) -> Result<String, LayoutError> {
    let mut surface = SvgSurface::new();
    render(symbols, params, &mut surface)?;
    Ok(surface.into_svg())
}

/// The whole pipeline: notation text in, SVG document out.
pub fn render_svg(input: &str, params: &LayoutParams) -> Result<String, Error> {
    let symbols = parse(input)?;
    Ok(to_svg(&symbols, params)?)
}
