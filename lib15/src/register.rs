use num_derive::FromPrimitive;
use strum_macros::{Display, EnumIter, EnumString};

/// General purpose registers `r0` through `r7`.
#[derive(FromPrimitive, EnumString, EnumIter, Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum Register {
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
}

impl Register {
    pub fn number(self) -> u16 {
        self as u16
    }
}
