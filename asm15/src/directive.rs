#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Data,
    String,
    Extern,
    Entry,
}

impl Directive {
    pub fn from_str(s: &str) -> Option<Self> {
        s.strip_prefix('.').and_then(Self::from_name)
    }

    /// Look up a directive by its name without the leading dot.
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "data" => Some(Self::Data),
            "string" => Some(Self::String),
            "extern" => Some(Self::Extern),
            "entry" => Some(Self::Entry),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Directive::Data => ".data",
            Directive::String => ".string",
            Directive::Extern => ".extern",
            Directive::Entry => ".entry",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords() {
        for directive in [
            Directive::Data,
            Directive::String,
            Directive::Extern,
            Directive::Entry,
        ] {
            assert_eq!(Directive::from_str(directive.keyword()), Some(directive));
        }
        assert_eq!(Directive::from_str("data"), None);
        assert_eq!(Directive::from_str(".word"), None);
        assert_eq!(Directive::from_name("extern"), Some(Directive::Extern));
    }
}
