use indexmap::IndexMap;
use lib15::mode::is_identifier;

use crate::{
    constants::{is_reserved, MACRO_BEGIN, MACRO_END, MAX_LINE_LENGTH},
    error::{AsmError, Diagnostic, Diagnostics, ModuleError},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Macro {
    pub name: String,
    pub body: Vec<String>,
    pub definition_line: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MacroTable {
    macros: IndexMap<String, Macro>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, mac: Macro) -> Result<(), AsmError> {
        if self.macros.contains_key(&mac.name) {
            return Err(AsmError::DuplicateMacro(mac.name));
        }
        self.macros.insert(mac.name.clone(), mac);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Macro> {
        self.macros.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }
}

/// A line of macro-free text and the source line it came from. Lines copied
/// out of a macro body carry the line of the invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub number: usize,
    pub text: String,
}

impl SourceLine {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Expansion {
    pub macros: MacroTable,
    pub lines: Vec<SourceLine>,
    /// Problems with macro definitions. The lines are still expanded with
    /// every macro that was defined cleanly.
    pub diagnostics: Vec<Diagnostic>,
}

impl Expansion {
    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// The expanded source, one line per entry.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|line| format!("{}\n", line.text))
            .collect()
    }
}

/// Collapse whitespace runs to one space, trim both ends and drop spaces
/// next to commas.
pub fn normalize(line: &str) -> String {
    line.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(" ,", ",")
        .replace(", ", ",")
}

/// Check line lengths, pull out macro definitions and expand invocations.
///
/// # Errors
///
/// Lines over the length limit. Bad macro definitions don't stop expansion,
/// they end up in [`Expansion::diagnostics`].
pub fn expand(source: &str) -> Result<Expansion, ModuleError> {
    let mut diagnostics = Diagnostics::new();
    for (index, line) in source.lines().enumerate() {
        let length = line.trim_end_matches('\r').chars().count();
        if length > MAX_LINE_LENGTH {
            diagnostics.report(index + 1, AsmError::LineTooLong(length));
        }
    }
    diagnostics.finish()?;

    let (macros, lines, diagnostics) = collect_macros(source);
    let lines = substitute(lines, &macros);
    log::debug!(
        "expanded {} macro(s) into {} line(s)",
        macros.len(),
        lines.len()
    );

    Ok(Expansion {
        macros,
        lines,
        diagnostics: diagnostics.into_vec(),
    })
}

struct OpenMacro {
    mac: Macro,
    valid: bool,
}

struct MacroCollector {
    macros: MacroTable,
    lines: Vec<SourceLine>,
    diagnostics: Diagnostics,
    open: Option<OpenMacro>,
}

/// Normalize every line and capture `macr`/`endmacr` blocks. Definition
/// lines come back blank so line numbers stay put.
pub fn collect_macros(text: &str) -> (MacroTable, Vec<SourceLine>, Diagnostics) {
    let mut collector = MacroCollector {
        macros: MacroTable::new(),
        lines: Vec::new(),
        diagnostics: Diagnostics::new(),
        open: None,
    };

    for (index, line) in text.lines().enumerate() {
        collector.collect_line(index + 1, normalize(line));
    }

    if let Some(open) = collector.open.take() {
        collector.diagnostics.report(
            open.mac.definition_line,
            AsmError::MacroSyntaxError(format!("`{}` is missing `{}`", open.mac.name, MACRO_END)),
        );
    }

    (collector.macros, collector.lines, collector.diagnostics)
}

impl MacroCollector {
    fn collect_line(&mut self, number: usize, line: String) {
        let mut tokens = line.split(' ');
        let first = tokens.next().unwrap_or_default();

        if let Some(mut open) = self.open.take() {
            if first == MACRO_END {
                if tokens.next().is_some() {
                    self.diagnostics.report(
                        number,
                        AsmError::MacroSyntaxError(format!("unexpected text after `{}`", MACRO_END)),
                    );
                } else if open.valid {
                    if let Err(e) = self.macros.insert(open.mac) {
                        self.diagnostics.report(number, e);
                    }
                }
            } else {
                open.mac.body.push(line);
                self.open = Some(open);
            }
            self.lines.push(SourceLine::new(number, ""));
            return;
        }

        match first {
            MACRO_BEGIN => {
                let name = tokens.next();
                let valid = self.check_name(number, name, tokens.next());
                self.open = Some(OpenMacro {
                    mac: Macro {
                        name: name.unwrap_or_default().to_owned(),
                        body: Vec::new(),
                        definition_line: number,
                    },
                    valid,
                });
                self.lines.push(SourceLine::new(number, ""));
            }
            MACRO_END => {
                self.diagnostics.report(
                    number,
                    AsmError::MacroSyntaxError(format!("`{}` without `{}`", MACRO_END, MACRO_BEGIN)),
                );
                self.lines.push(SourceLine::new(number, ""));
            }
            _ => self.lines.push(SourceLine::new(number, line)),
        }
    }

    fn check_name(&mut self, number: usize, name: Option<&str>, extra: Option<&str>) -> bool {
        let error = match (name, extra) {
            (None, _) => AsmError::MacroSyntaxError("missing macro name".to_owned()),
            (Some(_), Some(extra)) => {
                AsmError::MacroSyntaxError(format!("unexpected `{}` after macro name", extra))
            }
            (Some(name), None) if is_reserved(name) => AsmError::ReservedMacroName(name.to_owned()),
            (Some(name), None) if !is_identifier(name) => {
                AsmError::MacroSyntaxError(format!("`{}` is not a valid macro name", name))
            }
            (Some(name), None) if self.macros.contains(name) => {
                AsmError::DuplicateMacro(name.to_owned())
            }
            (Some(_), None) => return true,
        };
        self.diagnostics.report(number, error);
        false
    }
}

/// Replace every line that is exactly the name of an earlier macro with that
/// macro's body. Bodies aren't expanded again.
pub fn substitute(lines: Vec<SourceLine>, macros: &MacroTable) -> Vec<SourceLine> {
    lines
        .into_iter()
        .flat_map(|line| {
            match macros
                .get(&line.text)
                .filter(|mac| mac.definition_line < line.number)
            {
                Some(mac) => mac
                    .body
                    .iter()
                    .map(|body| SourceLine::new(line.number, body.clone()))
                    .collect(),
                None => vec![line],
            }
        })
        .collect()
}
