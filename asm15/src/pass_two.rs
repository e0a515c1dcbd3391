use lib15::{
    mode::Operand,
    word::{Are, MAX_ADDRESS},
};

use crate::{
    constants::IC_START,
    directive::Directive,
    error::{AsmError, Diagnostics, ModuleError},
    line::{split_operands, Statement},
    macros::SourceLine,
    pass_one::PassOne,
    record::Reference,
    symbols::SymbolKind,
    Assembly,
};

pub struct PassTwo {
    pass_one: PassOne,
    entries: Vec<Reference>,
    externs: Vec<Reference>,
    diagnostics: Diagnostics,
}

impl PassTwo {
    pub fn new(pass_one: PassOne) -> Self {
        Self {
            pass_one,
            entries: Vec::new(),
            externs: Vec::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Fill in every pending label word and gather the entry and extern
    /// listings. Words are only ever patched in place.
    pub fn assemble_lines(mut self, lines: &[SourceLine]) -> Result<Assembly, ModuleError> {
        for (index, line) in lines.iter().enumerate() {
            // Anything that doesn't parse was already reported by pass one
            let result = match Statement::parse(&line.text) {
                Ok(Statement::Instruction { operands, .. }) => {
                    self.resolve_operands(index, line.number, operands);
                    Ok(())
                }
                Ok(Statement::Directive {
                    directive: Directive::Entry,
                    operands,
                    ..
                }) => self.entry(operands),
                _ => Ok(()),
            };
            if let Err(e) = result {
                self.diagnostics.report(line.number, e);
            }
        }

        log::debug!(
            "pass two: {} entr(ies), {} external reference(s)",
            self.entries.len(),
            self.externs.len()
        );
        self.diagnostics.finish()?;

        let PassOne {
            symbols,
            code,
            data,
            ic,
            dc,
            ..
        } = self.pass_one;
        debug_assert!(code.iter().all(|word| !word.pending));
        debug_assert_eq!(ic + dc, IC_START + code.len() + data.len());

        Ok(Assembly {
            symbols,
            code,
            data,
            entries: self.entries,
            externs: self.externs,
        })
    }

    fn resolve_operands(&mut self, index: usize, number: usize, operands: &str) {
        let mut slots = self
            .pass_one
            .pending
            .remove(&index)
            .unwrap_or_default()
            .into_iter();

        for token in split_operands(operands) {
            let name = match Operand::parse(token) {
                Ok(Operand::Direct(name)) => name,
                _ => continue,
            };
            let slot = match slots.next() {
                Some(slot) => slot,
                None => break,
            };
            let word = &mut self.pass_one.code[slot];

            match self.pass_one.symbols.get(name) {
                Ok(symbol) if symbol.kind == SymbolKind::External => {
                    word.resolve(0, Are::External);
                    self.externs.push(Reference {
                        name: name.to_owned(),
                        address: word.address,
                    });
                }
                Ok(symbol) if symbol.address > MAX_ADDRESS => self.diagnostics.report(
                    number,
                    AsmError::ValueOutOfRange {
                        value: symbol.address as i64,
                        min: 0,
                        max: MAX_ADDRESS as i64,
                    },
                ),
                Ok(symbol) => word.resolve(symbol.address as u16, Are::Relocatable),
                Err(e) => self.diagnostics.report(number, e),
            }
        }
    }

    fn entry(&mut self, name: &str) -> Result<(), AsmError> {
        let symbol = self.pass_one.symbols.get(name)?;
        if symbol.kind == SymbolKind::External {
            return Err(AsmError::EntryExternConflict(name.to_owned()));
        }

        if self.entries.iter().any(|entry| entry.name == name) {
            log::warn!("`{}` is declared as an entry more than once", name);
        } else {
            self.entries.push(Reference {
                name: name.to_owned(),
                address: symbol.address,
            });
        }
        Ok(())
    }
}
