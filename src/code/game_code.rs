//! Game Codes
//!
//! Numeric session codes and the bijective mapping to their display form.

use crate::error::{Error, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Constants
// =============================================================================

/// Alphabet used by six-letter codes; a letter's value is its position here
pub const SIX_LETTER_ALPHABET: &[u8; 26] = b"QWXRTYLPESDFGHUJKZOCVBINMA";

/// Inverse of [`SIX_LETTER_ALPHABET`], indexed by `letter - b'A'`
const SIX_LETTER_VALUES: [u8; 26] = build_letter_values();

const fn build_letter_values() -> [u8; 26] {
    let mut values = [0u8; 26];
    let mut i = 0;
    while i < SIX_LETTER_ALPHABET.len() {
        values[(SIX_LETTER_ALPHABET[i] - b'A') as usize] = i as u8;
        i += 1;
    }
    values
}

/// Bits of the six-letter low part (first two letters)
const LOW_MASK: u32 = 0x3FF;
/// Bits of the six-letter high part once shifted into place
const HIGH_MASK: u32 = 0x3FFF_FC00;
/// Marker bit carried by every six-letter code
const SIX_LETTER_FLAG: u32 = 0x8000_0000;

// =============================================================================
// Code Length
// =============================================================================

/// Display length of a game code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CodeLength {
    /// Legacy four-letter codes (plain ASCII packed little-endian)
    Four,
    /// Six-letter codes over the scrambled alphabet
    #[default]
    Six,
}

impl CodeLength {
    /// Number of letters in the display form
    pub const fn letters(self) -> usize {
        match self {
            CodeLength::Four => 4,
            CodeLength::Six => 6,
        }
    }
}

impl TryFrom<u8> for CodeLength {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            4 => Ok(CodeLength::Four),
            6 => Ok(CodeLength::Six),
            other => Err(Error::Configuration(format!(
                "code length must be 4 or 6, got {}",
                other
            ))),
        }
    }
}

impl From<CodeLength> for u8 {
    fn from(length: CodeLength) -> Self {
        length.letters() as u8
    }
}

impl fmt::Display for CodeLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letters())
    }
}

// =============================================================================
// Game Code
// =============================================================================

/// Numeric session code, the key of the session registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameCode(i32);

impl GameCode {
    /// Wrap a raw numeric code as received from a client
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw numeric value
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Display format this code renders with
    pub const fn length(self) -> CodeLength {
        if self.0 < -1 {
            CodeLength::Six
        } else {
            CodeLength::Four
        }
    }

    /// Generate a random code of the given length using the thread RNG
    pub fn generate(length: CodeLength) -> Self {
        Self::generate_with(&mut rand::thread_rng(), length)
    }

    /// Generate a random code of the given length from `rng`
    ///
    /// Every letter is drawn uniformly, so the result always renders back to
    /// a valid display code.
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R, length: CodeLength) -> Self {
        match length {
            CodeLength::Four => {
                let mut letters = [0u8; 4];
                for letter in letters.iter_mut() {
                    *letter = b'A' + rng.gen_range(0..26u8);
                }
                Self::from_four_letters(letters)
            }
            CodeLength::Six => {
                let mut letters = [0u8; 6];
                for letter in letters.iter_mut() {
                    *letter = SIX_LETTER_ALPHABET[rng.gen_range(0..SIX_LETTER_ALPHABET.len())];
                }
                Self::from_six_letters(letters)
            }
        }
    }

    /// Render the human-shareable display code
    pub fn to_display(self) -> String {
        match self.length() {
            CodeLength::Six => {
                let raw = self.0 as u32;
                let low = (raw & LOW_MASK) as usize;
                let high = ((raw >> 10) & 0xF_FFFF) as usize;
                [
                    low % 26,
                    low / 26 % 26,
                    high % 26,
                    high / 26 % 26,
                    high / (26 * 26) % 26,
                    high / (26 * 26 * 26) % 26,
                ]
                .iter()
                .map(|&i| char::from(SIX_LETTER_ALPHABET[i]))
                .collect()
            }
            CodeLength::Four => self.0.to_le_bytes().iter().map(|&b| char::from(b)).collect(),
        }
    }

    /// Parse a display code (case-insensitive)
    pub fn from_display(input: &str) -> Result<Self> {
        let invalid = || Error::InvalidCodeFormat {
            code: input.to_string(),
        };

        let upper = input.to_ascii_uppercase();
        if !upper.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(invalid());
        }

        match upper.len() {
            4 => {
                let letters: [u8; 4] = upper.as_bytes().try_into().map_err(|_| invalid())?;
                Ok(Self::from_four_letters(letters))
            }
            6 => {
                let letters: [u8; 6] = upper.as_bytes().try_into().map_err(|_| invalid())?;
                Ok(Self::from_six_letters(letters))
            }
            _ => Err(invalid()),
        }
    }

    fn from_four_letters(letters: [u8; 4]) -> Self {
        Self(i32::from_le_bytes(letters))
    }

    /// Letters must be uppercase ASCII
    fn from_six_letters(letters: [u8; 6]) -> Self {
        let value = |i: usize| SIX_LETTER_VALUES[(letters[i] - b'A') as usize] as u32;

        let low = (value(0) + 26 * value(1)) & LOW_MASK;
        let high = value(2) + 26 * (value(3) + 26 * (value(4) + 26 * value(5)));

        Self((low | ((high << 10) & HIGH_MASK) | SIX_LETTER_FLAG) as i32)
    }
}

impl fmt::Display for GameCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display())
    }
}

impl FromStr for GameCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_display(s)
    }
}

impl From<GameCode> for i32 {
    fn from(code: GameCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_letter_values_invert_alphabet() {
        for (position, &letter) in SIX_LETTER_ALPHABET.iter().enumerate() {
            assert_eq!(SIX_LETTER_VALUES[(letter - b'A') as usize] as usize, position);
        }
    }

    #[test]
    fn test_known_codes() {
        assert_eq!(GameCode::from_display("ABCD").unwrap().raw(), 1_145_258_561);
        assert_eq!(GameCode::from_display("QQQQQQ").unwrap().raw(), i32::MIN);
        assert_eq!(GameCode::from_display("AAAAAA").unwrap().raw(), -1_679_540_573);
        assert_eq!(GameCode::from_display("REDSUS").unwrap().raw(), -1_975_562_029);

        assert_eq!(GameCode::from_raw(i32::MIN).to_display(), "QQQQQQ");
        assert_eq!(GameCode::from_raw(1_145_258_561).to_display(), "ABCD");
    }

    #[test]
    fn test_length_follows_sign() {
        assert_eq!(GameCode::from_display("REDSUS").unwrap().length(), CodeLength::Six);
        assert_eq!(GameCode::from_display("ABCD").unwrap().length(), CodeLength::Four);
    }

    #[test]
    fn test_decode_is_case_insensitive() {
        assert_eq!(
            GameCode::from_display("redsus").unwrap(),
            GameCode::from_display("REDSUS").unwrap()
        );
        assert_eq!(GameCode::from_display("abcd").unwrap().to_display(), "ABCD");
    }

    #[test]
    fn test_invalid_display_codes() {
        for bad in ["", "ABC", "ABCDE", "ABCDEFG", "AB1D", "ABC-EF", "ÄBCD", "AB D"] {
            assert_matches!(
                GameCode::from_display(bad),
                Err(Error::InvalidCodeFormat { code }) if code == bad
            );
        }
    }

    #[test]
    fn test_generated_codes_round_trip() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for length in [CodeLength::Four, CodeLength::Six] {
            for _ in 0..2_000 {
                let code = GameCode::generate_with(&mut rng, length);
                let display = code.to_display();
                assert_eq!(display.len(), length.letters());
                assert_eq!(code.length(), length);
                assert_eq!(GameCode::from_display(&display).unwrap(), code);
            }
        }
    }

    #[test]
    fn test_display_round_trip_from_letters() {
        for display in ["QWXRTY", "MAMAMA", "ZZZZZZ", "WXYZ", "GAME"] {
            let code = GameCode::from_display(display).unwrap();
            assert_eq!(code.to_display(), display);
        }
    }

    #[test]
    fn test_code_length_conversions() {
        assert_eq!(CodeLength::try_from(4).unwrap(), CodeLength::Four);
        assert_eq!(CodeLength::try_from(6).unwrap(), CodeLength::Six);
        assert_matches!(CodeLength::try_from(5), Err(Error::Configuration(_)));
        assert_eq!(u8::from(CodeLength::Six), 6);
        assert_eq!(CodeLength::default(), CodeLength::Six);
    }

    #[test]
    fn test_parse_and_display_traits() {
        let code: GameCode = "redsus".parse().unwrap();
        assert_eq!(format!("{}", code), "REDSUS");
    }
}
