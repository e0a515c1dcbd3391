use std::str::FromStr;

use lib15::{op::Opcode, register::Register};
use once_cell::sync::OnceCell;
use regex::Regex;

use crate::directive::Directive;

pub const IC_START: usize = 100;
pub const MAX_LINE_LENGTH: usize = 80;
pub const MAX_LABEL_LENGTH: usize = 31;

pub const MACRO_BEGIN: &str = "macr";
pub const MACRO_END: &str = "endmacr";

pub static LINE_REGEX: OnceCell<Regex> = OnceCell::new();
static LINE_REGEX_PATTERN: &str = r"^(?:(?P<label>[^\s:]+):)?\s*(?P<head>\S*)\s*(?P<operands>.*)$";

pub static DATA_LIST_REGEX: OnceCell<Regex> = OnceCell::new();
static DATA_LIST_REGEX_PATTERN: &str = r"^[+-]?[0-9]+(?:,[+-]?[0-9]+)*$";

pub fn line_regex() -> &'static Regex {
    LINE_REGEX.get_or_init(|| Regex::new(LINE_REGEX_PATTERN).expect("Invalid line regex"))
}

pub fn data_list_regex() -> &'static Regex {
    DATA_LIST_REGEX
        .get_or_init(|| Regex::new(DATA_LIST_REGEX_PATTERN).expect("Invalid data list regex"))
}

/// Words that can't be used as a macro or label name.
pub fn is_reserved(word: &str) -> bool {
    Opcode::from_str(word).is_ok()
        || Register::from_str(word).is_ok()
        || Directive::from_str(word).is_some()
        || Directive::from_name(word).is_some()
        || word == MACRO_BEGIN
        || word == MACRO_END
}
