use std::fmt::Display;

use lib15::word::Word;

/// A name and address pair written to the entry or extern listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub name: String,
    pub address: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Header { code: usize, data: usize },
    Word { address: usize, bits: u16 },
    Reference(Reference),
}

impl From<&Word> for Record {
    fn from(word: &Word) -> Self {
        Record::Word {
            address: word.address,
            bits: word.bits,
        }
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Record::Header { code, data } => write!(f, "{} {}", code, data),
            Record::Word { address, bits } => write!(f, "{:04} {:05o}", address, bits),
            Record::Reference(Reference { name, address }) => write!(f, "{} {}", name, address),
        }
    }
}

pub fn render(records: impl IntoIterator<Item = Record>) -> String {
    records
        .into_iter()
        .map(|record| format!("{}\n", record))
        .collect()
}

/// Object file text: the header, then every code and data word in address
/// order.
pub fn object_file(code: &[Word], data: &[Word]) -> String {
    let header = Record::Header {
        code: code.len(),
        data: data.len(),
    };
    render(std::iter::once(header).chain(code.iter().chain(data).map(Record::from)))
}

/// Listing text, or `None` when there's nothing to list.
pub fn listing(references: &[Reference]) -> Option<String> {
    if references.is_empty() {
        None
    } else {
        Some(render(references.iter().cloned().map(Record::Reference)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib15::word::Are;

    #[test]
    fn records() {
        assert_eq!(Record::Header { code: 20, data: 6 }.to_string(), "20 6");
        assert_eq!(
            Record::Word {
                address: 100,
                bits: 0o2024
            }
            .to_string(),
            "0100 02024"
        );
        assert_eq!(
            Record::Reference(Reference {
                name: "MAIN".to_owned(),
                address: 100
            })
            .to_string(),
            "MAIN 100"
        );
    }

    #[test]
    fn object_text() {
        let code = vec![
            Word::instruction(100, 15 << 8, Are::Absolute),
            Word::instruction(101, 14 << 8, Are::Absolute),
        ];
        let data = vec![Word::data(102, -1)];

        assert_eq!(
            object_file(&code, &data),
            "2 1\n0100 74004\n0101 70004\n0102 77777\n"
        );
        assert_eq!(object_file(&[], &[]), "0 0\n");
    }

    #[test]
    fn empty_listing() {
        assert_eq!(listing(&[]), None);
        let references = [
            Reference {
                name: "X".to_owned(),
                address: 104,
            },
            Reference {
                name: "X".to_owned(),
                address: 110,
            },
        ];
        assert_eq!(listing(&references), Some("X 104\nX 110\n".to_owned()));
    }
}
