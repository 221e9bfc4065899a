//! PX statement splitter.
//!
//! Turns raw PX text into a lazy sequence of `KEY=VALUE` statements whose
//! values are read with the `csv` crate, so quoted commas, quotes and equals
//! signs survive. Nothing here knows about `DATA` or `VALUES`; see
//! [`crate::expand`] for that.

use std::fmt;
use std::io::Cursor;

use crate::error::{PxError, PxResult};
use crate::expand::{collate, IntoRecords, PxModel};

// =============================================================================
// Statements
// =============================================================================

/// Lazy iterator over the trimmed, non-empty `;`-separated pieces of a PX text.
#[derive(Debug, Clone)]
pub struct Statements<'a> {
    pieces: std::str::Split<'a, char>,
}

impl<'a> Iterator for Statements<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.pieces
            .by_ref()
            .map(str::trim)
            .find(|piece| !piece.is_empty())
    }
}

/// Split PX content into raw statements.
///
/// A statement may span several lines; only `;` ends it.
pub fn split_statements(content: &str) -> Statements<'_> {
    Statements {
        pieces: content.split(';'),
    }
}

// =============================================================================
// Values
// =============================================================================

/// Single-pass stream over the csv fields of one statement value.
///
/// Every line of the value is a csv row; the fields of all rows are yielded
/// in order. The stream cannot be rewound, [`Values::consumed`] reports how
/// many fields were already drawn.
pub struct Values {
    records: csv::StringRecordsIntoIter<Cursor<Vec<u8>>>,
    current: std::vec::IntoIter<String>,
    consumed: usize,
}

impl Values {
    /// Start reading `rhs` as csv. Nothing is parsed until the first pull.
    pub fn parse(rhs: &str) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(Cursor::new(rhs.as_bytes().to_vec()));

        Self {
            records: reader.into_records(),
            current: Vec::new().into_iter(),
            consumed: 0,
        }
    }

    /// Number of fields already yielded.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Drain the remaining fields into a vector.
    pub fn collect_all(self) -> PxResult<Vec<String>> {
        self.collect()
    }
}

impl Iterator for Values {
    type Item = PxResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(field) = self.current.next() {
                self.consumed += 1;
                return Some(Ok(field));
            }
            match self.records.next()? {
                Ok(record) => {
                    self.current = record
                        .iter()
                        .map(String::from)
                        .collect::<Vec<_>>()
                        .into_iter();
                }
                Err(e) => return Some(Err(PxError::Csv(e))),
            }
        }
    }
}

impl fmt::Debug for Values {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Values")
            .field("consumed", &self.consumed)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Statement
// =============================================================================

/// One `KEY=VALUE` statement.
#[derive(Debug)]
pub struct Statement {
    pub key: String,
    pub values: Values,
}

/// Split a raw statement on its first `=` and start reading the value as csv.
///
/// # Example
/// ```
/// use pixy::parse_statement;
///
/// let statement = parse_statement(r#"A="x,y",z"#).unwrap();
/// assert_eq!(statement.key, "A");
/// let values: Vec<String> = statement.values.collect_all().unwrap();
/// assert_eq!(values, vec!["x,y", "z"]);
/// ```
pub fn parse_statement(raw: &str) -> PxResult<Statement> {
    let (key, rhs) = raw
        .split_once('=')
        .ok_or_else(|| PxError::MalformedStatement(raw.to_string()))?;

    Ok(Statement {
        key: key.to_string(),
        values: Values::parse(rhs),
    })
}

/// Lazily split and parse every statement of `content`.
pub fn parse(content: &str) -> impl Iterator<Item = PxResult<Statement>> + '_ {
    split_statements(content).map(parse_statement)
}

// =============================================================================
// Parser
// =============================================================================

/// Owns the text of one PX file and hands out fresh parses of it.
///
/// ```
/// use pixy::PxParser;
///
/// let parser = PxParser::new(r#"VALUES("year")="1988","1989";DATA=1,2;"#);
/// let data: Vec<String> = parser
///     .records()
///     .unwrap()
///     .map(|r| r.unwrap().data().unwrap().to_string())
///     .collect();
/// assert_eq!(data, vec!["1", "2"]);
/// ```
#[derive(Debug, Clone)]
pub struct PxParser {
    content: String,
}

impl PxParser {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// A new statement sequence over the whole content.
    pub fn statements(&self) -> impl Iterator<Item = PxResult<Statement>> + '_ {
        parse(&self.content)
    }

    /// Collate the content into a model ready for expansion.
    pub fn model(&self) -> PxResult<PxModel> {
        collate(self.statements())
    }

    /// Collate and expand in one go.
    pub fn records(&self) -> PxResult<IntoRecords> {
        Ok(self.model()?.into_records())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values_of(raw: &str) -> Vec<String> {
        parse_statement(raw).unwrap().values.collect_all().unwrap()
    }

    #[test]
    fn test_split_skips_empty_pieces() {
        let content = "A=1;\n\n;  ;B=2;\r\nC=3\n";
        let pieces: Vec<&str> = split_statements(content).collect();
        assert_eq!(pieces, vec!["A=1", "B=2", "C=3"]);
    }

    #[test]
    fn test_split_count_matches_non_empty_segments() {
        let content = ";;x;; y ;\t;z";
        let expected = content.split(';').filter(|s| !s.trim().is_empty()).count();
        assert_eq!(split_statements(content).count(), expected);
        assert!(split_statements(content).all(|s| !s.is_empty()));
    }

    #[test]
    fn test_split_empty_content() {
        assert_eq!(split_statements("").count(), 0);
        assert_eq!(split_statements(" ;\n; ").count(), 0);
    }

    #[test]
    fn test_parse_unquoted_list() {
        let statement = parse_statement("A=1,2,3").unwrap();
        assert_eq!(statement.key, "A");
        assert_eq!(statement.values.collect_all().unwrap(), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_parse_quoted_commas() {
        assert_eq!(values_of(r#"A="x,y",z"#), vec!["x,y", "z"]);
    }

    #[test]
    fn test_parse_doubled_quote_escape() {
        assert_eq!(values_of(r#"NOTE="say ""hi""""#), vec![r#"say "hi""#]);
    }

    #[test]
    fn test_parse_splits_on_first_equals_only() {
        let statement = parse_statement(r#"NOTE="a=b",c=d"#).unwrap();
        assert_eq!(statement.key, "NOTE");
        assert_eq!(statement.values.collect_all().unwrap(), vec!["a=b", "c=d"]);
    }

    #[test]
    fn test_parse_scalar() {
        assert_eq!(values_of(r#"TITLE="Population""#), vec!["Population"]);
        assert_eq!(values_of("DECIMALS=0"), vec!["0"]);
    }

    #[test]
    fn test_parse_multiline_value_is_flattened() {
        assert_eq!(values_of("DATA=\n1,2\n3,4\n"), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_parse_empty_value() {
        assert!(values_of("DATA=").is_empty());
    }

    #[test]
    fn test_parse_missing_equals() {
        let err = parse_statement("noequalsign").unwrap_err();
        assert!(matches!(err, PxError::MalformedStatement(ref s) if s == "noequalsign"));
    }

    #[test]
    fn test_values_track_consumption() {
        let mut values = parse_statement("DATA=1,2,3").unwrap().values;
        assert_eq!(values.consumed(), 0);
        assert_eq!(values.next().unwrap().unwrap(), "1");
        assert_eq!(values.next().unwrap().unwrap(), "2");
        assert_eq!(values.consumed(), 2);
        assert_eq!(values.next().unwrap().unwrap(), "3");
        assert!(values.next().is_none());
        assert_eq!(values.consumed(), 3);
    }

    #[test]
    fn test_parse_is_lazy_about_errors() {
        let mut statements = parse("A=1;broken;B=2");
        assert_eq!(statements.next().unwrap().unwrap().key, "A");
        assert!(matches!(
            statements.next().unwrap(),
            Err(PxError::MalformedStatement(_))
        ));
        assert_eq!(statements.next().unwrap().unwrap().key, "B");
        assert!(statements.next().is_none());
    }

    #[test]
    fn test_parser_hands_out_fresh_statements() {
        let parser = PxParser::new("A=1;B=2");
        assert_eq!(parser.statements().count(), 2);
        assert_eq!(parser.statements().count(), 2);
        assert_eq!(parser.content(), "A=1;B=2");
    }
}
