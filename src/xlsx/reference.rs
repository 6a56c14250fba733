//! A1-style cell reference decoding.
//!
//! Column letters are bijective base-26: `A`=0 … `Z`=25, `AA`=26, `AZ`=51,
//! `BA`=52. There is no zero digit, so `AA` is not `A` followed by `0`.

/// Highest column index a worksheet may use (`XFD`).
pub const MAX_COLUMN_INDEX: usize = 16_383;

/// Decode column letters into a zero-based column index.
///
/// Letters are matched case-insensitively. Returns `None` for an empty string,
/// a non-letter, or a column past [`MAX_COLUMN_INDEX`].
pub fn column_index(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }

    let mut value = 0usize;
    for byte in letters.bytes() {
        if !byte.is_ascii_alphabetic() {
            return None;
        }
        let digit = (byte.to_ascii_uppercase() - b'A') as usize + 1;
        value = value * 26 + digit;
        if value > MAX_COLUMN_INDEX + 1 {
            return None;
        }
    }

    Some(value - 1)
}

/// Encode a zero-based column index as column letters.
///
/// Defined for every `usize`, including indexes past [`MAX_COLUMN_INDEX`].
pub fn column_name(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index;
    loop {
        letters.push(b'A' + (n % 26) as u8);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// A decoded cell reference such as `B7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellReference {
    /// Zero-based column index
    pub column: usize,
    /// 1-based row number
    pub row: usize,
}

impl CellReference {
    /// Parse "column-letters + row-number".
    ///
    /// `$` markers of absolute references are ignored.
    pub fn parse(reference: &str) -> Option<Self> {
        let reference = reference.trim();
        let split = reference
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(reference.len());
        let (letters, digits) = reference.split_at(split);

        let column = column_index(letters.trim_matches('$'))?;
        let row = digits.parse::<usize>().ok().filter(|&r| r > 0)?;
        Some(Self { column, row })
    }
}

impl std::fmt::Display for CellReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", column_name(self.column), self.row)
    }
}
