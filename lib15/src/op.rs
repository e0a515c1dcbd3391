use num_derive::FromPrimitive;
use strum_macros::{Display, EnumIter, EnumString};

use crate::mode::AddressingMode;

/// Operand slot of an instruction. One-operand instructions only have a
/// target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Source,
    Target,
}

#[derive(FromPrimitive, EnumString, EnumIter, Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum Opcode {
    Mov = 0,
    Cmp = 1,
    Add = 2,
    Sub = 3,
    Lea = 4,
    Clr = 5,
    Not = 6,
    Inc = 7,
    Dec = 8,
    Jmp = 9,
    Bne = 10,
    Red = 11,
    Prn = 12,
    Jsr = 13,
    Rts = 14,
    Stop = 15,
}

const ANY: &[AddressingMode] = &[
    AddressingMode::Immediate,
    AddressingMode::Direct,
    AddressingMode::Relative,
    AddressingMode::Register,
];
const WRITABLE: &[AddressingMode] = &[
    AddressingMode::Direct,
    AddressingMode::Relative,
    AddressingMode::Register,
];
const JUMP: &[AddressingMode] = &[AddressingMode::Direct, AddressingMode::Relative];
const LABEL: &[AddressingMode] = &[AddressingMode::Direct];
const NONE: &[AddressingMode] = &[];

impl Opcode {
    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn arity(self) -> usize {
        self.roles().len()
    }

    /// Operand slots in the order they're written.
    pub fn roles(self) -> &'static [Role] {
        match self {
            Opcode::Mov | Opcode::Cmp | Opcode::Add | Opcode::Sub | Opcode::Lea => {
                &[Role::Source, Role::Target]
            }
            Opcode::Rts | Opcode::Stop => &[],
            _ => &[Role::Target],
        }
    }

    pub fn modes(self, role: Role) -> &'static [AddressingMode] {
        match role {
            Role::Source => match self {
                Opcode::Mov | Opcode::Cmp | Opcode::Add | Opcode::Sub => ANY,
                Opcode::Lea => LABEL,
                _ => NONE,
            },
            Role::Target => match self {
                Opcode::Cmp | Opcode::Prn => ANY,
                Opcode::Jmp | Opcode::Bne | Opcode::Jsr => JUMP,
                Opcode::Rts | Opcode::Stop => NONE,
                _ => WRITABLE,
            },
        }
    }

    pub fn allows(self, role: Role, mode: AddressingMode) -> bool {
        self.modes(role).contains(&mode)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use num_traits::FromPrimitive;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn mnemonics_and_codes() {
        let mnemonics = [
            "mov", "cmp", "add", "sub", "lea", "clr", "not", "inc", "dec", "jmp", "bne", "red",
            "prn", "jsr", "rts", "stop",
        ];
        let arities = [2, 2, 2, 2, 2, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0];

        for (code, opcode) in Opcode::iter().enumerate() {
            assert_eq!(opcode.code() as usize, code);
            assert_eq!(opcode.to_string(), mnemonics[code]);
            assert_eq!(Opcode::from_str(mnemonics[code]), Ok(opcode));
            assert_eq!(Opcode::from_u16(code as u16), Some(opcode));
            assert_eq!(opcode.arity(), arities[code]);
        }
        assert_eq!(Opcode::from_u16(16), None);
        assert!(Opcode::from_str("MOV").is_err());
    }

    #[test]
    fn legal_modes() {
        assert!(Opcode::Mov.allows(Role::Source, AddressingMode::Immediate));
        assert!(!Opcode::Mov.allows(Role::Target, AddressingMode::Immediate));
        assert!(Opcode::Cmp.allows(Role::Target, AddressingMode::Immediate));
        assert!(Opcode::Lea.allows(Role::Source, AddressingMode::Direct));
        assert!(!Opcode::Lea.allows(Role::Source, AddressingMode::Register));
        assert!(Opcode::Prn.allows(Role::Target, AddressingMode::Immediate));
        assert!(Opcode::Jmp.allows(Role::Target, AddressingMode::Relative));
        assert!(!Opcode::Jsr.allows(Role::Target, AddressingMode::Register));
        assert!(!Opcode::Inc.allows(Role::Source, AddressingMode::Register));
        assert!(Opcode::Stop.modes(Role::Target).is_empty());
    }
}
