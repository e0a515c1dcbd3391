use lib15::word::Word;
use pass_one::FirstPass;
use pass_two::PassTwo;

pub mod constants;
pub mod directive;
pub mod error;
pub mod line;
pub mod macros;
pub mod pass_one;
pub mod pass_two;
pub mod record;
pub mod symbols;

pub use error::{AsmError, Diagnostic, ModuleError};
pub use macros::{expand, Expansion};

use record::Reference;
use symbols::SymbolTable;

/// A fully resolved module.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub symbols: SymbolTable,
    pub code: Vec<Word>,
    pub data: Vec<Word>,
    pub entries: Vec<Reference>,
    pub externs: Vec<Reference>,
}

impl Assembly {
    pub fn object_text(&self) -> String {
        record::object_file(&self.code, &self.data)
    }

    pub fn entries_text(&self) -> Option<String> {
        record::listing(&self.entries)
    }

    pub fn externs_text(&self) -> Option<String> {
        record::listing(&self.externs)
    }
}

/// Run both passes over macro-free source.
///
/// # Errors
///
/// Every problem either pass found, if there were any. An expansion with
/// macro errors still goes through pass one so its problems are reported
/// too, in line order with the macro errors, but never reaches pass two.
pub fn assemble_expansion(expansion: &Expansion) -> Result<Assembly, ModuleError> {
    let pass_one = FirstPass::parse_lines(&expansion.lines, &expansion.macros);
    if expansion.is_valid() {
        return PassTwo::new(pass_one?).assemble_lines(&expansion.lines);
    }

    let mut diagnostics = expansion.diagnostics.clone();
    if let Err(e) = pass_one {
        diagnostics.extend(e.diagnostics);
    }
    diagnostics.sort_by_key(|diagnostic| diagnostic.line);
    Err(ModuleError { diagnostics })
}

/// Assemble one module from its source text.
///
/// # Errors
///
/// If there's an error anywhere in the module. Line length errors stop
/// processing before macros are expanded.
pub fn assemble_module(source: &str) -> Result<Assembly, ModuleError> {
    assemble_expansion(&expand(source)?)
}
