//! Morse element and code-table primitives.
//!
//! The scenario driver keys text into the firmware one element at a time;
//! this module provides the element type and the ITU encoding table used to
//! turn characters into element sequences.

use thiserror::Error;

/// A single morse element: a short or a long key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum MorseElement {
    /// Short press.
    Dot,
    /// Long press.
    Dash,
}

/// Error raised when text cannot be expressed in the encoding table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MorseError {
    /// The character has no entry in the code table.
    #[error("character {0:?} has no morse encoding")]
    UnmappedCharacter(char),
}

/// ITU morse code for letters and digits.
const MORSE_TABLE: &[(char, &str)] = &[
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    ('0', "-----"),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
];

/// Looks up the dot/dash string for a character, case-insensitively.
#[must_use]
pub fn code_for(ch: char) -> Option<&'static str> {
    let upper = ch.to_ascii_uppercase();
    MORSE_TABLE
        .iter()
        .find_map(|(entry, code)| (*entry == upper).then_some(*code))
}

/// Parses a dot/dash string into elements.
///
/// Returns `None` if the string contains anything but `'.'` and `'-'`.
#[must_use]
pub fn elements(code: &str) -> Option<Vec<MorseElement>> {
    code.chars()
        .map(|ch| match ch {
            '.' => Some(MorseElement::Dot),
            '-' => Some(MorseElement::Dash),
            _ => None,
        })
        .collect()
}
