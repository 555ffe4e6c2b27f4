use std::fmt;
use std::num::NonZeroU8;

use smallvec::SmallVec;
use thiserror::Error;

/// Default alphabet size: the lowercase latin letters.
pub const ALPHABET_SIZE: usize = 26;

/// Largest supported alphabet. Symbol codes are five bits wide.
pub const MAX_ALPHABET_SIZE: usize = 31;

const SYMBOL_MASK: u8 = 0x1f;

/// A symbol of a bounded alphabet, encoded as a code in `1..=MAX_ALPHABET_SIZE`.
///
/// Code 0 is reserved as "no symbol" and cannot be represented.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(NonZeroU8);

impl Symbol {
    /// Returns the symbol with the given code, or `None` if the code is 0 or
    /// larger than [`MAX_ALPHABET_SIZE`].
    #[inline]
    pub const fn new(code: u8) -> Option<Symbol> {
        if code as usize > MAX_ALPHABET_SIZE {
            return None;
        }
        match NonZeroU8::new(code) {
            Some(code) => Some(Symbol(code)),
            None => None,
        }
    }

    /// Maps an ASCII letter to its symbol, ignoring case (`a` and `A` are both 1).
    #[inline]
    pub const fn from_ascii(byte: u8) -> Option<Symbol> {
        if byte.is_ascii_alphabetic() {
            Symbol::new(byte & SYMBOL_MASK)
        } else {
            None
        }
    }

    /// The symbol's code.
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }

    /// Zero-based position of the symbol in its alphabet.
    #[inline]
    pub const fn index(self) -> usize {
        self.0.get() as usize - 1
    }

    /// True if the symbol belongs to an alphabet of `size` symbols.
    #[inline]
    pub const fn is_in_alphabet(self, size: usize) -> bool {
        self.0.get() as usize <= size
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            code @ 1..=26 => write!(f, "{}", char::from(b'a' + code - 1)),
            code => write!(f, "#{code}"),
        }
    }
}

/// Errors produced when validating a text against an alphabet.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SymbolError {
    /// The byte at `offset` is not an ASCII letter.
    #[error("byte {byte:#04x} at offset {offset} is not an ASCII letter")]
    NotALetter {
        /// Position of the byte in the text.
        offset: usize,
        /// The offending byte.
        byte: u8,
    },
    /// The symbol at `offset` lies outside an alphabet of `alphabet` symbols.
    #[error("symbol '{symbol}' at offset {offset} is outside an alphabet of {alphabet} symbols")]
    OutsideAlphabet {
        /// Position of the symbol in the text.
        offset: usize,
        /// The offending symbol.
        symbol: Symbol,
        /// Size of the alphabet the text was checked against.
        alphabet: usize,
    },
}

/// Strictly converts an ASCII text to symbols of an alphabet of `alphabet` symbols.
///
/// Unlike the [`IntoText`] conversions, which leave the check to their
/// consumer, this reports the offending byte and its offset.
///
/// # Examples
///
/// ```
/// use blumer_dawg::dawg::symbol::{encode, SymbolError};
///
/// let symbols = encode(b"Abc", 26).unwrap();
/// assert_eq!(symbols.iter().map(|s| s.get()).collect::<Vec<_>>(), [1, 2, 3]);
/// assert!(matches!(encode(b"ab c", 26), Err(SymbolError::NotALetter { offset: 2, .. })));
/// assert!(matches!(encode(b"abe", 4), Err(SymbolError::OutsideAlphabet { offset: 2, .. })));
/// ```
pub fn encode(text: &[u8], alphabet: usize) -> Result<Vec<Symbol>, SymbolError> {
    text.iter()
        .enumerate()
        .map(|(offset, &byte)| {
            let symbol = Symbol::from_ascii(byte).ok_or(SymbolError::NotALetter { offset, byte })?;
            if symbol.is_in_alphabet(alphabet) {
                Ok(symbol)
            } else {
                Err(SymbolError::OutsideAlphabet {
                    offset,
                    symbol,
                    alphabet,
                })
            }
        })
        .collect()
}

/// Trait for types that can be consumed as a text by the automaton builder.
///
/// A text is a sequence of raw symbol codes. In byte and string texts every
/// ASCII letter maps to `1..=26` regardless of case and every other byte maps
/// to 0, which is not a symbol. The builder checks every code against its
/// alphabet and panics on a violation; pattern queries simply find nothing.
pub trait IntoText {
    /// Iterator over the raw symbol codes of the text.
    type Codes: Iterator<Item = u8>;

    /// Converts this text into its symbol codes.
    fn into_codes(self) -> Self::Codes;
}

type LetterCodes<'t> = std::iter::Map<std::iter::Copied<std::slice::Iter<'t, u8>>, fn(u8) -> u8>;
type SymbolCodes<'t> = std::iter::Map<std::slice::Iter<'t, Symbol>, fn(&Symbol) -> u8>;

fn letter_code(byte: u8) -> u8 {
    match Symbol::from_ascii(byte) {
        Some(symbol) => symbol.get(),
        None => 0,
    }
}

fn code(symbol: &Symbol) -> u8 {
    symbol.get()
}

fn letter_codes(bytes: &[u8]) -> LetterCodes<'_> {
    bytes.iter().copied().map(letter_code as fn(u8) -> u8)
}

impl<'t> IntoText for &'t str {
    type Codes = LetterCodes<'t>;

    fn into_codes(self) -> Self::Codes {
        letter_codes(self.as_bytes())
    }
}

impl<'t> IntoText for &'t String {
    type Codes = LetterCodes<'t>;

    fn into_codes(self) -> Self::Codes {
        letter_codes(self.as_bytes())
    }
}

impl IntoText for String {
    type Codes = std::vec::IntoIter<u8>;

    fn into_codes(self) -> Self::Codes {
        let mut bytes = self.into_bytes();
        bytes.iter_mut().for_each(|b| *b = letter_code(*b));
        bytes.into_iter()
    }
}

impl<'t> IntoText for &'t [u8] {
    type Codes = LetterCodes<'t>;

    fn into_codes(self) -> Self::Codes {
        letter_codes(self)
    }
}

impl<'t> IntoText for &'t Vec<u8> {
    type Codes = LetterCodes<'t>;

    fn into_codes(self) -> Self::Codes {
        letter_codes(self)
    }
}

impl<'t, const N: usize> IntoText for &'t [u8; N] {
    type Codes = LetterCodes<'t>;

    fn into_codes(self) -> Self::Codes {
        letter_codes(self)
    }
}

impl<'t> IntoText for &'t [Symbol] {
    type Codes = SymbolCodes<'t>;

    fn into_codes(self) -> Self::Codes {
        self.iter().map(code as fn(&Symbol) -> u8)
    }
}

impl<'t> IntoText for &'t Vec<Symbol> {
    type Codes = SymbolCodes<'t>;

    fn into_codes(self) -> Self::Codes {
        self.iter().map(code as fn(&Symbol) -> u8)
    }
}

impl IntoText for Vec<Symbol> {
    type Codes = std::iter::Map<std::vec::IntoIter<Symbol>, fn(Symbol) -> u8>;

    fn into_codes(self) -> Self::Codes {
        self.into_iter().map(Symbol::get as fn(Symbol) -> u8)
    }
}

impl<const N: usize> IntoText for [Symbol; N] {
    type Codes = std::iter::Map<std::array::IntoIter<Symbol, N>, fn(Symbol) -> u8>;

    fn into_codes(self) -> Self::Codes {
        self.into_iter().map(Symbol::get as fn(Symbol) -> u8)
    }
}

/// Collects a short pattern into symbols, or `None` if any code is not a
/// symbol of an alphabet of `alphabet` symbols.
pub(crate) fn collect_pattern(
    pattern: impl IntoText,
    alphabet: usize,
) -> Option<SmallVec<[Symbol; 32]>> {
    pattern
        .into_codes()
        .map(|code| Symbol::new(code).filter(|s| s.is_in_alphabet(alphabet)))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero_is_not_a_symbol() {
        assert_eq!(Symbol::new(0), None);
        assert_eq!(Symbol::new(32), None);
        assert_eq!(Symbol::new(31).map(Symbol::get), Some(31));
    }

    #[test]
    fn ascii_letters_ignore_case() {
        assert_eq!(Symbol::from_ascii(b'a'), Symbol::new(1));
        assert_eq!(Symbol::from_ascii(b'A'), Symbol::new(1));
        assert_eq!(Symbol::from_ascii(b'z'), Symbol::new(26));
        assert_eq!(Symbol::from_ascii(b'\n'), None);
        assert_eq!(Symbol::from_ascii(b'@'), None);
    }

    #[test]
    fn index_is_zero_based() {
        let s = Symbol::from_ascii(b'c').unwrap();
        assert_eq!(s.index(), 2);
        assert!(s.is_in_alphabet(3));
        assert!(!s.is_in_alphabet(2));
    }

    #[test]
    fn display_prints_letters() {
        let word: String = encode(b"Hello", 26)
            .unwrap()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(word, "hello");
        assert_eq!(Symbol::new(30).unwrap().to_string(), "#30");
    }

    #[test]
    fn string_texts_ignore_case() {
        let codes: Vec<u8> = "aZ".into_codes().collect();
        assert_eq!(codes, [1, 26]);
        let codes: Vec<u8> = String::from("Ab").into_codes().collect();
        assert_eq!(codes, [1, 2]);
    }

    #[test]
    fn non_letters_have_no_code() {
        // '1' and 'q' share their low five bits.
        let codes: Vec<u8> = "q1!".into_codes().collect();
        assert_eq!(codes, [17, 0, 0]);
        let codes: Vec<u8> = "é".into_codes().collect();
        assert_eq!(codes, [0, 0]);
        let codes: Vec<u8> = b"a\x81".into_codes().collect();
        assert_eq!(codes, [1, 0]);
    }

    #[test]
    fn symbol_texts_keep_codes() {
        let symbols = [Symbol::new(3).unwrap(), Symbol::new(1).unwrap()];
        let codes: Vec<u8> = symbols.into_codes().collect();
        assert_eq!(codes, [3, 1]);
        let codes: Vec<u8> = symbols.to_vec().into_codes().collect();
        assert_eq!(codes, [3, 1]);
    }

    #[test]
    fn pattern_outside_alphabet_is_rejected() {
        assert!(collect_pattern("abc", 3).is_some());
        assert!(collect_pattern("abd", 3).is_none());
        assert!(collect_pattern(" ", 26).is_none());
        assert!(collect_pattern("1", 26).is_none());
        assert!(collect_pattern("caf\u{e9}", 26).is_none());
    }
}
