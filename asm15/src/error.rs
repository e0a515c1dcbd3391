use std::fmt::Display;

use lib15::op::Opcode;
use thiserror::Error;

use crate::constants::{MAX_LABEL_LENGTH, MAX_LINE_LENGTH};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    #[error("macro `{0}` is already defined")]
    DuplicateMacro(String),
    #[error("`{0}` is a reserved word and can't name a macro")]
    ReservedMacroName(String),
    #[error("malformed macro definition: {0}")]
    MacroSyntaxError(String),
    #[error("line is {0} characters long, the limit is {}", MAX_LINE_LENGTH)]
    LineTooLong(usize),
    #[error("invalid label `{label}`: {reason}")]
    InvalidLabel { label: String, reason: LabelProblem },
    #[error("label `{0}` is already defined")]
    DuplicateLabel(String),
    #[error("invalid directive: {0}")]
    InvalidDirective(String),
    #[error("invalid .data list `{0}`")]
    InvalidDataList(String),
    #[error("invalid .string operand `{0}`")]
    InvalidString(String),
    #[error("value {value} is outside {min}..={max}")]
    ValueOutOfRange { value: i64, min: i64, max: i64 },
    #[error("unknown opcode `{0}`")]
    UnknownOpcode(String),
    #[error("`{opcode}` takes {expected} operand(s), found {found}")]
    WrongOperandCount {
        opcode: Opcode,
        expected: usize,
        found: usize,
    },
    #[error("invalid addressing mode for `{opcode}`: {detail}")]
    InvalidAddressingMode { opcode: Opcode, detail: String },
    #[error("undefined label `{0}`")]
    UndefinedLabel(String),
    #[error("`{0}` is declared external and can't be an entry")]
    EntryExternConflict(String),
    #[error("unrecognized line `{0}`")]
    UnrecognizedLine(String),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelProblem {
    #[error("longer than {} characters", MAX_LABEL_LENGTH)]
    TooLong,
    #[error("must start with a letter")]
    BadStart,
    #[error("must only contain letters and digits")]
    NotAlphanumeric,
    #[error("reserved word")]
    Reserved,
    #[error("already names a macro")]
    MacroName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub error: AsmError,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.error)
    }
}

/// Everything that went wrong in a module that produced no output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} error(s) in module", .diagnostics.len())]
pub struct ModuleError {
    pub diagnostics: Vec<Diagnostic>,
}

impl ModuleError {
    pub fn errors(&self) -> impl Iterator<Item = &AsmError> {
        self.diagnostics.iter().map(|d| &d.error)
    }
}

/// Collects diagnostics for a pass, logging each as it's recorded.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, line: usize, error: AsmError) {
        let diagnostic = Diagnostic { line, error };
        log::error!("{}", diagnostic);
        self.entries.push(diagnostic);
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }

    /// `Ok` if nothing was reported.
    pub fn finish(self) -> Result<(), ModuleError> {
        if self.entries.is_empty() {
            Ok(())
        } else {
            Err(ModuleError {
                diagnostics: self.entries,
            })
        }
    }
}
