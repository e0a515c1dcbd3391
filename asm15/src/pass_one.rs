use std::collections::HashMap;

use lib15::{
    mode::{parse_integer, Operand, OperandError},
    op::{Opcode, Role},
    word::{
        first_word_field, immediate_field, register_field, Are, Word, DATA_MAX, DATA_MIN,
    },
};

use crate::{
    constants::{data_list_regex, IC_START},
    directive::Directive,
    error::{AsmError, Diagnostics, ModuleError},
    line::{split_operands, Statement},
    macros::{MacroTable, SourceLine},
    symbols::{check_label, SymbolKind, SymbolTable},
};

pub struct FirstPass<'a> {
    ic: usize,
    dc: usize,
    macros: &'a MacroTable,
    symbols: SymbolTable,
    code: Vec<Word>,
    data: Vec<Word>,
    pending: HashMap<usize, Vec<usize>>,
    diagnostics: Diagnostics,
}

pub struct PassOne {
    pub symbols: SymbolTable,
    pub code: Vec<Word>,
    pub data: Vec<Word>,
    /// Indices into `code` of the label words each line left unresolved,
    /// keyed by the line's index in the expanded source.
    pub pending: HashMap<usize, Vec<usize>>,
    pub ic: usize,
    pub dc: usize,
}

impl<'a> FirstPass<'a> {
    fn new(macros: &'a MacroTable) -> Self {
        Self {
            ic: IC_START,
            dc: 0,
            macros,
            symbols: SymbolTable::new(),
            code: Vec::new(),
            data: Vec::new(),
            pending: HashMap::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn parse_lines(lines: &[SourceLine], macros: &'a MacroTable) -> Result<PassOne, ModuleError> {
        let mut pass = Self::new(macros);
        for (index, line) in lines.iter().enumerate() {
            if let Err(e) = pass.parse_line(index, line) {
                pass.diagnostics.report(line.number, e);
            }
        }

        // Data follows code in the module's address space
        pass.symbols.relocate_data(pass.ic);
        for word in pass.data.iter_mut() {
            word.address += pass.ic;
        }

        log::debug!(
            "pass one: {} code word(s), {} data word(s), {} symbol(s)",
            pass.code.len(),
            pass.data.len(),
            pass.symbols.len()
        );
        pass.diagnostics.finish()?;

        Ok(PassOne {
            symbols: pass.symbols,
            code: pass.code,
            data: pass.data,
            pending: pass.pending,
            ic: pass.ic,
            dc: pass.dc,
        })
    }

    fn parse_line(&mut self, index: usize, line: &SourceLine) -> Result<(), AsmError> {
        match Statement::parse(&line.text)? {
            Statement::Blank | Statement::Comment => Ok(()),
            Statement::Directive {
                label,
                directive,
                operands,
            } => match directive {
                Directive::Extern | Directive::Entry => {
                    if let Some(label) = label {
                        log::warn!(
                            "line {}: ignoring label `{}` on {}",
                            line.number,
                            label,
                            directive.keyword()
                        );
                    }
                    let name = self.declared_name(directive, operands)?;
                    if directive == Directive::Extern {
                        self.symbols.add(name, SymbolKind::External, 0)?;
                    }
                    Ok(())
                }
                Directive::Data | Directive::String => {
                    if let Some(label) = label {
                        self.define_label(line.number, label, SymbolKind::Data, self.dc);
                    }
                    if directive == Directive::Data {
                        self.data_list(operands)
                    } else {
                        self.string(operands)
                    }
                }
            },
            Statement::Instruction {
                label,
                opcode,
                operands,
            } => {
                if let Some(label) = label {
                    self.define_label(line.number, label, SymbolKind::Code, self.ic);
                }
                self.instruction(index, opcode, operands)
            }
        }
    }

    // Label problems don't stop the rest of the line from being checked
    fn define_label(&mut self, number: usize, label: &str, kind: SymbolKind, address: usize) {
        let result = check_label(label, self.macros)
            .and_then(|()| self.symbols.add(label, kind, address));
        if let Err(e) = result {
            self.diagnostics.report(number, e);
        }
    }

    /// The single label operand of `.entry` and `.extern`.
    fn declared_name<'l>(&self, directive: Directive, operands: &'l str) -> Result<&'l str, AsmError> {
        if operands.is_empty() || operands.contains(&[' ', ','][..]) {
            return Err(AsmError::InvalidDirective(format!(
                "{} takes exactly one label",
                directive.keyword()
            )));
        }
        check_label(operands, self.macros)?;
        Ok(operands)
    }

    fn data_list(&mut self, operands: &str) -> Result<(), AsmError> {
        if !data_list_regex().is_match(operands) {
            return Err(AsmError::InvalidDataList(operands.to_owned()));
        }

        let values = operands
            .split(',')
            .map(|token| {
                let value = parse_integer(token)
                    .ok_or_else(|| AsmError::InvalidDataList(operands.to_owned()))?;
                if (DATA_MIN..=DATA_MAX).contains(&value) {
                    Ok(value as i16)
                } else {
                    Err(AsmError::ValueOutOfRange {
                        value,
                        min: DATA_MIN,
                        max: DATA_MAX,
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        for value in values {
            self.push_data(value);
        }
        Ok(())
    }

    fn string(&mut self, operands: &str) -> Result<(), AsmError> {
        let content = operands
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .filter(|content| content.is_ascii())
            .ok_or_else(|| AsmError::InvalidString(operands.to_owned()))?;

        for byte in content.bytes() {
            self.push_data(byte as i16);
        }
        self.push_data(0);
        Ok(())
    }

    fn push_data(&mut self, value: i16) {
        self.data.push(Word::data(self.dc, value));
        self.dc += 1;
    }

    fn instruction(&mut self, index: usize, opcode: Opcode, operands: &str) -> Result<(), AsmError> {
        let tokens = split_operands(operands);
        if tokens.len() != opcode.arity() {
            return Err(AsmError::WrongOperandCount {
                opcode,
                expected: opcode.arity(),
                found: tokens.len(),
            });
        }

        let operands = opcode
            .roles()
            .iter()
            .zip(tokens)
            .map(|(&role, token)| classify(opcode, role, token))
            .collect::<Result<Vec<_>, _>>()?;

        let (source, target) = match operands.as_slice() {
            [source, target] => (Some(*source), Some(*target)),
            [target] => (None, Some(*target)),
            _ => (None, None),
        };

        let field = first_word_field(
            opcode,
            source.map(|operand| operand.mode()),
            target.map(|operand| operand.mode()),
        );
        self.push_code(Word::instruction(self.ic, field, Are::Absolute));

        if let (Some(Operand::Register(source)), Some(Operand::Register(target))) = (source, target) {
            let field = register_field(Some(source), Some(target));
            self.push_code(Word::instruction(self.ic, field, Are::Absolute));
        } else {
            for (role, operand) in [(Role::Source, source), (Role::Target, target)] {
                if let Some(operand) = operand {
                    self.operand_word(index, role, operand);
                }
            }
        }
        Ok(())
    }

    fn operand_word(&mut self, index: usize, role: Role, operand: Operand) {
        let field = match operand {
            Operand::Immediate(value) => immediate_field(value),
            Operand::Register(register) | Operand::Relative(register) => match role {
                Role::Source => register_field(Some(register), None),
                Role::Target => register_field(None, Some(register)),
            },
            Operand::Direct(_) => {
                self.pending.entry(index).or_default().push(self.code.len());
                self.push_code(Word::pending(self.ic));
                return;
            }
        };
        self.push_code(Word::instruction(self.ic, field, Are::Absolute));
    }

    fn push_code(&mut self, word: Word) {
        self.code.push(word);
        self.ic += 1;
    }
}

fn classify(opcode: Opcode, role: Role, token: &str) -> Result<Operand<'_>, AsmError> {
    let operand = Operand::parse(token).map_err(|e| match e {
        OperandError::ImmediateOutOfRange(value) => AsmError::ValueOutOfRange {
            value,
            min: lib15::mode::IMMEDIATE_MIN,
            max: lib15::mode::IMMEDIATE_MAX,
        },
        e => AsmError::InvalidAddressingMode {
            opcode,
            detail: e.to_string(),
        },
    })?;

    if opcode.allows(role, operand.mode()) {
        Ok(operand)
    } else {
        Err(AsmError::InvalidAddressingMode {
            opcode,
            detail: format!(
                "`{}` can't be used as the {} operand",
                token,
                match role {
                    Role::Source => "source",
                    Role::Target => "target",
                }
            ),
        })
    }
}
