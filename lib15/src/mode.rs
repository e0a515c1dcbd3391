use std::str::FromStr;

use thiserror::Error;

use crate::register::Register;

pub const IMMEDIATE_MIN: i64 = -2048;
pub const IMMEDIATE_MAX: i64 = 2047;

/// Operand encoding classes. The discriminant is the mode number that gets
/// one-hot encoded into the first word of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    Immediate = 0,
    Direct = 1,
    Relative = 2,
    Register = 3,
}

impl AddressingMode {
    pub fn number(self) -> u16 {
        self as u16
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperandError {
    #[error("missing operand")]
    Empty,
    #[error("immediate `{0}` is not an integer")]
    InvalidImmediate(String),
    #[error("immediate {0} doesn't fit in 12 bits")]
    ImmediateOutOfRange(i64),
    #[error("relative operand `{0}` must name a register")]
    InvalidRelative(String),
    #[error("`{0}` is not a valid operand")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand<'a> {
    Immediate(i16),
    Direct(&'a str),
    Relative(Register),
    Register(Register),
}

impl<'a> Operand<'a> {
    /// Classify an operand token by its leading character.
    pub fn parse(token: &'a str) -> Result<Self, OperandError> {
        if token.is_empty() {
            return Err(OperandError::Empty);
        }

        if let Some(value) = token.strip_prefix('#') {
            let value = parse_integer(value)
                .ok_or_else(|| OperandError::InvalidImmediate(token.to_owned()))?;
            if !(IMMEDIATE_MIN..=IMMEDIATE_MAX).contains(&value) {
                return Err(OperandError::ImmediateOutOfRange(value));
            }
            Ok(Self::Immediate(value as i16))
        } else if let Some(register) = token.strip_prefix('*') {
            Register::from_str(register)
                .map(Self::Relative)
                .map_err(|_| OperandError::InvalidRelative(token.to_owned()))
        } else if let Ok(register) = Register::from_str(token) {
            Ok(Self::Register(register))
        } else if is_identifier(token) {
            Ok(Self::Direct(token))
        } else {
            Err(OperandError::Invalid(token.to_owned()))
        }
    }

    pub fn mode(&self) -> AddressingMode {
        match self {
            Operand::Immediate(_) => AddressingMode::Immediate,
            Operand::Direct(_) => AddressingMode::Direct,
            Operand::Relative(_) => AddressingMode::Relative,
            Operand::Register(_) => AddressingMode::Register,
        }
    }
}

/// A letter followed by letters or digits.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

/// Parse an optionally signed run of decimal digits. Values too large for an
/// `i64` are rejected along with malformed text.
pub fn parse_integer(s: &str) -> Option<i64> {
    let digits = s.strip_prefix(&['+', '-'][..]).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.strip_prefix('+').unwrap_or(s).parse().ok()
}
