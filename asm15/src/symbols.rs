use indexmap::IndexMap;
use lib15::mode::is_identifier;

use crate::{
    constants::{is_reserved, MAX_LABEL_LENGTH},
    error::{AsmError, LabelProblem},
    macros::MacroTable,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Code,
    Data,
    External,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub address: usize,
}

/// Labels of one module in definition order.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: IndexMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a new symbol. Names are unique whatever their kind, so an
    /// external can't also be defined locally and vice versa.
    pub fn add(&mut self, name: &str, kind: SymbolKind, address: usize) -> Result<(), AsmError> {
        if self.symbols.contains_key(name) {
            return Err(AsmError::DuplicateLabel(name.to_owned()));
        }
        self.symbols.insert(
            name.to_owned(),
            Symbol {
                name: name.to_owned(),
                kind,
                address,
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Symbol, AsmError> {
        self.symbols
            .get(name)
            .ok_or_else(|| AsmError::UndefinedLabel(name.to_owned()))
    }

    /// Move data labels past the end of the code section.
    pub fn relocate_data(&mut self, offset: usize) {
        self.symbols
            .values_mut()
            .filter(|symbol| symbol.kind == SymbolKind::Data)
            .for_each(|symbol| symbol.address += offset);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

pub fn check_label(label: &str, macros: &MacroTable) -> Result<(), AsmError> {
    let problem = if label.len() > MAX_LABEL_LENGTH {
        Some(LabelProblem::TooLong)
    } else if !label.starts_with(|c: char| c.is_ascii_alphabetic()) {
        Some(LabelProblem::BadStart)
    } else if !is_identifier(label) {
        Some(LabelProblem::NotAlphanumeric)
    } else if is_reserved(label) {
        Some(LabelProblem::Reserved)
    } else if macros.contains(label) {
        Some(LabelProblem::MacroName)
    } else {
        None
    };

    match problem {
        Some(reason) => Err(AsmError::InvalidLabel {
            label: label.to_owned(),
            reason,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macros::Macro;

    #[test]
    fn add_and_get() {
        let mut symbols = SymbolTable::new();
        symbols.add("MAIN", SymbolKind::Code, 100).unwrap();
        symbols.add("X", SymbolKind::External, 0).unwrap();

        assert_eq!(symbols.get("MAIN").unwrap().address, 100);
        assert_eq!(symbols.get("X").unwrap().kind, SymbolKind::External);
        assert_eq!(
            symbols.get("main"),
            Err(AsmError::UndefinedLabel("main".to_owned()))
        );
    }

    #[test]
    fn names_are_unique_across_kinds() {
        let mut symbols = SymbolTable::new();
        symbols.add("X", SymbolKind::External, 0).unwrap();

        assert_eq!(
            symbols.add("X", SymbolKind::Code, 104),
            Err(AsmError::DuplicateLabel("X".to_owned()))
        );
        assert_eq!(
            symbols.add("X", SymbolKind::External, 0),
            Err(AsmError::DuplicateLabel("X".to_owned()))
        );
        assert_eq!(symbols.len(), 1);
    }

    #[test]
    fn data_relocation() {
        let mut symbols = SymbolTable::new();
        symbols.add("LOOP", SymbolKind::Code, 103).unwrap();
        symbols.add("STR", SymbolKind::Data, 0).unwrap();
        symbols.add("LIST", SymbolKind::Data, 3).unwrap();
        symbols.add("E", SymbolKind::External, 0).unwrap();

        symbols.relocate_data(120);

        let addresses = symbols
            .iter()
            .map(|s| (s.name.as_str(), s.address))
            .collect::<Vec<_>>();
        assert_eq!(
            addresses,
            vec![("LOOP", 103), ("STR", 120), ("LIST", 123), ("E", 0)]
        );
    }

    #[test]
    fn label_names() {
        let mut macros = MacroTable::new();
        macros
            .insert(Macro {
                name: "show".to_owned(),
                body: vec![],
                definition_line: 1,
            })
            .unwrap();

        assert!(check_label("LOOP2", &macros).is_ok());

        let reason = |label: &str| match check_label(label, &macros) {
            Err(AsmError::InvalidLabel { reason, .. }) => Some(reason),
            _ => None,
        };
        assert_eq!(reason(&"A".repeat(32)), Some(LabelProblem::TooLong));
        assert!(check_label(&"A".repeat(31), &macros).is_ok());
        assert_eq!(reason("2nd"), Some(LabelProblem::BadStart));
        assert_eq!(reason("a_b"), Some(LabelProblem::NotAlphanumeric));
        assert_eq!(reason("mov"), Some(LabelProblem::Reserved));
        assert_eq!(reason("r3"), Some(LabelProblem::Reserved));
        assert_eq!(reason("show"), Some(LabelProblem::MacroName));
    }
}
