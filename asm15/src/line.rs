use std::str::FromStr;

use lib15::op::Opcode;

use crate::{constants::line_regex, directive::Directive, error::AsmError};

/// One normalized line of expanded source, split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statement<'a> {
    Blank,
    Comment,
    Directive {
        label: Option<&'a str>,
        directive: Directive,
        operands: &'a str,
    },
    Instruction {
        label: Option<&'a str>,
        opcode: Opcode,
        operands: &'a str,
    },
}

impl<'a> Statement<'a> {
    pub fn parse(line: &'a str) -> Result<Self, AsmError> {
        if line.is_empty() {
            return Ok(Self::Blank);
        }
        if line.starts_with(';') {
            return Ok(Self::Comment);
        }

        let cap = line_regex()
            .captures(line)
            .ok_or_else(|| AsmError::UnrecognizedLine(line.to_owned()))?;
        let label = cap.name("label").map(|m| m.as_str());
        let head = cap.name("head").map_or("", |m| m.as_str());
        let operands = cap.name("operands").map_or("", |m| m.as_str());

        if head.starts_with('.') {
            let directive = Directive::from_str(head)
                .ok_or_else(|| AsmError::InvalidDirective(format!("unknown directive `{}`", head)))?;
            Ok(Self::Directive {
                label,
                directive,
                operands,
            })
        } else if let Ok(opcode) = Opcode::from_str(head) {
            Ok(Self::Instruction {
                label,
                opcode,
                operands,
            })
        } else if label.is_some() && !head.is_empty() {
            Err(AsmError::UnknownOpcode(head.to_owned()))
        } else {
            Err(AsmError::UnrecognizedLine(line.to_owned()))
        }
    }
}

/// Split an operand list on commas. Empty text means no operands; an empty
/// entry between commas is kept so the count still reflects the commas.
pub fn split_operands(operands: &str) -> Vec<&str> {
    if operands.is_empty() {
        Vec::new()
    } else {
        operands.split(',').collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_comments() {
        assert_eq!(Statement::parse(""), Ok(Statement::Blank));
        assert_eq!(Statement::parse("; mov r1,r2"), Ok(Statement::Comment));
    }

    #[test]
    fn instructions() {
        assert_eq!(
            Statement::parse("LOOP: inc r2"),
            Ok(Statement::Instruction {
                label: Some("LOOP"),
                opcode: Opcode::Inc,
                operands: "r2",
            })
        );
        assert_eq!(
            Statement::parse("stop"),
            Ok(Statement::Instruction {
                label: None,
                opcode: Opcode::Stop,
                operands: "",
            })
        );
    }

    #[test]
    fn directives() {
        assert_eq!(
            Statement::parse("STR: .string \"a b\""),
            Ok(Statement::Directive {
                label: Some("STR"),
                directive: Directive::String,
                operands: "\"a b\"",
            })
        );
        assert_eq!(
            Statement::parse(".extern X"),
            Ok(Statement::Directive {
                label: None,
                directive: Directive::Extern,
                operands: "X",
            })
        );
    }

    #[test]
    fn bad_lines() {
        assert!(matches!(
            Statement::parse(".word 5"),
            Err(AsmError::InvalidDirective(_))
        ));
        assert_eq!(
            Statement::parse("L: jump X"),
            Err(AsmError::UnknownOpcode("jump".to_owned()))
        );
        assert_eq!(
            Statement::parse("jump X"),
            Err(AsmError::UnrecognizedLine("jump X".to_owned()))
        );
        assert_eq!(
            Statement::parse("L:"),
            Err(AsmError::UnrecognizedLine("L:".to_owned()))
        );
    }

    #[test]
    fn operand_lists() {
        assert!(split_operands("").is_empty());
        assert_eq!(split_operands("r1"), vec!["r1"]);
        assert_eq!(split_operands("#3,LIST"), vec!["#3", "LIST"]);
        assert_eq!(split_operands("r1,,r2"), vec!["r1", "", "r2"]);
        assert_eq!(split_operands(",r2"), vec!["", "r2"]);
    }
}
