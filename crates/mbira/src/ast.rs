//! Musical symbol types for kalimba notation.
//!
//! Pitches are diatonic only: 0 = C in octave 0, 7 = C one octave up, and
//! so on, seven named steps per octave, no accidentals.

use serde::{Deserialize, Serialize};

/// The seven diatonic note names, lowest first.
pub const NOTE_NAMES: &str = "cdefgab";

/// Diatonic steps per octave.
pub const OCTAVE_STEPS: u8 = 7;

/// Base note lengths, measured in eighth beats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BaseLength {
    Eighth,
    Quarter,
    Half,
    Whole,
}

impl BaseLength {
    /// Number of eighth beats this length holds, dot not accounted for.
    pub fn eighth_beats(&self) -> u32 {
        match self {
            BaseLength::Eighth => 1,
            BaseLength::Quarter => 2,
            BaseLength::Half => 4,
            BaseLength::Whole => 8,
        }
    }

    /// Map a notation duration digit to a length. Only '1', '2', '4' and
    /// '8' are legal duration codes.
    pub fn from_digit(digit: char) -> Option<BaseLength> {
        match digit {
            '1' => Some(BaseLength::Eighth),
            '2' => Some(BaseLength::Quarter),
            '4' => Some(BaseLength::Half),
            '8' => Some(BaseLength::Whole),
            _ => None,
        }
    }
}

/// A note duration: base length plus the optional dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Duration {
    pub base: BaseLength,
    pub dotted: bool,
}

impl Duration {
    pub fn new(base: BaseLength, dotted: bool) -> Self {
        Duration { base, dotted }
    }

    /// Effective length in eighth beats, dot accounted for (x1.5).
    ///
    /// Integer arithmetic: a dotted eighth truncates to one beat.
    pub fn eighth_beats(&self) -> u32 {
        let base = self.base.eighth_beats();
        if self.dotted {
            base * 3 / 2
        } else {
            base
        }
    }
}

impl Default for Duration {
    /// The sticky-state starting point: an undotted quarter note.
    fn default() -> Self {
        Duration {
            base: BaseLength::Quarter,
            dotted: false,
        }
    }
}

/// One single note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub duration: Duration,
    /// Diatonic pitch: 0 = C, 4 = G, 7 = C an octave higher, etc.
    pub pitch: u8,
}

/// A group of notes played at once, sharing one duration.
///
/// Pitches keep their source order; duplicates are preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chord {
    pub duration: Duration,
    pub pitches: Vec<u8>,
}

/// A silence of the given duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rest {
    pub duration: Duration,
}

/// A single element of the parsed melodic line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Symbol {
    Note(Note),
    Chord(Chord),
    Rest(Rest),
}

impl Symbol {
    pub fn duration(&self) -> Duration {
        match self {
            Symbol::Note(n) => n.duration,
            Symbol::Chord(c) => c.duration,
            Symbol::Rest(r) => r.duration,
        }
    }

    /// Effective length in eighth beats, dot accounted for.
    pub fn eighth_beats(&self) -> u32 {
        self.duration().eighth_beats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_base_length_beats() {
        assert_eq!(BaseLength::Eighth.eighth_beats(), 1);
        assert_eq!(BaseLength::Quarter.eighth_beats(), 2);
        assert_eq!(BaseLength::Half.eighth_beats(), 4);
        assert_eq!(BaseLength::Whole.eighth_beats(), 8);
    }

    #[test]
    fn test_from_digit_legal_codes_only() {
        assert_eq!(BaseLength::from_digit('1'), Some(BaseLength::Eighth));
        assert_eq!(BaseLength::from_digit('8'), Some(BaseLength::Whole));
        assert_eq!(BaseLength::from_digit('3'), None);
        assert_eq!(BaseLength::from_digit('0'), None);
        assert_eq!(BaseLength::from_digit('9'), None);
    }

    #[test]
    fn test_dotted_duration() {
        let dotted_whole = Duration::new(BaseLength::Whole, true);
        assert_eq!(dotted_whole.eighth_beats(), 12);

        let dotted_half = Duration::new(BaseLength::Half, true);
        assert_eq!(dotted_half.eighth_beats(), 6);

        // Truncates: there is no half eighth beat.
        let dotted_eighth = Duration::new(BaseLength::Eighth, true);
        assert_eq!(dotted_eighth.eighth_beats(), 1);
    }

    #[test]
    fn test_symbol_beats() {
        let sym = Symbol::Chord(Chord {
            duration: Duration::new(BaseLength::Quarter, true),
            pitches: vec![0, 2, 4],
        });
        assert_eq!(sym.eighth_beats(), 3);
    }
}
