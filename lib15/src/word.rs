use crate::{mode::AddressingMode, op::Opcode, register::Register};

pub const WORD_BITS: u32 = 15;
pub const WORD_MASK: u16 = 0x7FFF;
pub const FIELD_MASK: u16 = 0x0FFF;
/// Highest address a label word can hold.
pub const MAX_ADDRESS: usize = FIELD_MASK as usize;

pub const DATA_MIN: i64 = -16384;
pub const DATA_MAX: i64 = 16383;

/// The three-bit linkage tag in the low bits of every instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Are {
    Absolute = 0b100,
    Relocatable = 0b010,
    External = 0b001,
}

/// One machine word at a fixed address.
///
/// Instruction words are a 12-bit field followed by the ARE tag. Data words
/// hold a full 15-bit two's complement value and no tag, but count as
/// absolute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word {
    pub address: usize,
    pub bits: u16,
    pub are: Are,
    pub pending: bool,
}

impl Word {
    pub fn instruction(address: usize, field: u16, are: Are) -> Self {
        Self {
            address,
            bits: ((field & FIELD_MASK) << 3) | are as u16,
            are,
            pending: false,
        }
    }

    pub fn data(address: usize, value: i16) -> Self {
        Self {
            address,
            bits: value as u16 & WORD_MASK,
            are: Are::Absolute,
            pending: false,
        }
    }

    /// A slot for a label reference that gets filled in once the label's
    /// address is known.
    pub fn pending(address: usize) -> Self {
        Self {
            address,
            bits: 0,
            are: Are::Absolute,
            pending: true,
        }
    }

    pub fn resolve(&mut self, field: u16, are: Are) {
        *self = Self::instruction(self.address, field, are);
    }

    /// The 12 bits above the ARE tag.
    pub fn field(&self) -> u16 {
        self.bits >> 3
    }

    pub fn octal(&self) -> String {
        format!("{:05o}", self.bits)
    }
}

// Missing operands leave their mode bits clear
pub fn first_word_field(
    opcode: Opcode,
    source: Option<AddressingMode>,
    target: Option<AddressingMode>,
) -> u16 {
    let one_hot =
        |mode: Option<AddressingMode>| -> u16 { mode.map_or(0, |mode| 1 << mode.number()) };
    opcode.code() << 8 | one_hot(source) << 4 | one_hot(target)
}

pub fn immediate_field(value: i16) -> u16 {
    value as u16 & FIELD_MASK
}

pub fn register_field(source: Option<Register>, target: Option<Register>) -> u16 {
    let number = |register: Option<Register>| register.map_or(0, Register::number);
    number(source) << 3 | number(target)
}
