use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

/// Classification of one board square as reported by perception.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellSymbol {
    Hidden,
    Flagged,
    Mine,
    Win,
    /// Perception could not match the square against any known template.
    Unknown,
    Number(u8),
}

impl CellSymbol {
    pub const MAX_NUMBER: u8 = 8;

    pub const fn to_char(self) -> char {
        use CellSymbol::*;
        match self {
            Hidden => '?',
            Flagged => '+',
            Mine => 'M',
            Win => '!',
            Unknown => '#',
            Number(n) if n <= Self::MAX_NUMBER => (b'0' + n) as char,
            Number(_) => '#',
        }
    }
}

impl Default for CellSymbol {
    fn default() -> Self {
        Self::Hidden
    }
}

impl TryFrom<char> for CellSymbol {
    type Error = SweepError;

    fn try_from(symbol: char) -> Result<Self> {
        use CellSymbol::*;
        Ok(match symbol {
            '?' => Hidden,
            '+' => Flagged,
            'M' => Mine,
            '!' => Win,
            '#' => Unknown,
            '0'..='8' => Number(symbol as u8 - b'0'),
            _ => return Err(SweepError::UnknownSymbol { symbol }),
        })
    }
}

impl fmt::Display for CellSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        f.write_char(self.to_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_form_is_reversible() {
        for symbol in "?+M!#012345678".chars() {
            let cell = CellSymbol::try_from(symbol).unwrap();
            assert_eq!(cell.to_char(), symbol);
        }
    }

    #[test]
    fn rejects_nine_and_letters() {
        assert_eq!(
            CellSymbol::try_from('9'),
            Err(SweepError::UnknownSymbol { symbol: '9' })
        );
        assert!(CellSymbol::try_from('x').is_err());
    }
}
