//! Collation of statements into a [`PxModel`].

use crate::error::{PxError, PxResult};
use crate::models::{Dimension, DATA_KEY};
use crate::parser::{Statement, Values};

/// Key of the statement carrying the observations.
const DATA_STATEMENT: &str = "DATA";

// =============================================================================
// Data stream
// =============================================================================

/// Cursor over the values of the `DATA` statement.
///
/// Drawing is strictly forward. The position survives across expansions of
/// the same model.
#[derive(Debug, Default)]
pub struct DataStream {
    values: Option<Values>,
}

impl DataStream {
    pub fn new(values: Values) -> Self {
        Self {
            values: Some(values),
        }
    }

    /// A stream for a model without any `DATA` statement.
    pub fn missing() -> Self {
        Self::default()
    }

    pub fn is_missing(&self) -> bool {
        self.values.is_none()
    }

    /// Number of values already drawn.
    pub fn consumed(&self) -> usize {
        self.values.as_ref().map_or(0, Values::consumed)
    }

    /// Draw the next value for the record at index `record`.
    pub fn draw(&mut self, record: usize) -> PxResult<String> {
        let values = self.values.as_mut().ok_or(PxError::MissingData)?;
        values
            .next()
            .unwrap_or(Err(PxError::ExhaustedData { record }))
    }
}

// =============================================================================
// Model
// =============================================================================

/// Dimensions in source order plus the data stream.
#[derive(Debug, Default)]
pub struct PxModel {
    pub(crate) dimensions: Vec<Dimension>,
    pub(crate) data: DataStream,
}

impl PxModel {
    pub fn new(dimensions: Vec<Dimension>, data: DataStream) -> Self {
        Self { dimensions, data }
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn data(&self) -> &DataStream {
        &self.data
    }

    /// Number of records a full expansion produces, `None` on overflow.
    pub fn expected_len(&self) -> Option<usize> {
        self.dimensions
            .iter()
            .try_fold(1usize, |acc, d| acc.checked_mul(d.labels.len()))
    }

    /// Record keys in output order: unique titles as first seen, then the data key.
    pub fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = Vec::with_capacity(self.dimensions.len() + 1);
        for dimension in &self.dimensions {
            if !columns.contains(&dimension.title) {
                columns.push(dimension.title.clone());
            }
        }
        let data = DATA_KEY.to_string();
        if !columns.contains(&data) {
            columns.push(data);
        }
        columns
    }
}

/// Collate a statement sequence into a model.
///
/// `VALUES("title")` statements append a dimension, the last `DATA` statement
/// becomes the data stream, everything else is dropped. Labels are read here
/// since the product walks them many times; the data stays lazy.
pub fn collate<I>(statements: I) -> PxResult<PxModel>
where
    I: IntoIterator<Item = PxResult<Statement>>,
{
    let mut model = PxModel::default();

    for statement in statements {
        let Statement { key, values } = statement?;

        if let Some(title) = Dimension::title_from_key(&key) {
            let labels = values.collect_all()?;
            model.dimensions.push(Dimension::new(title, labels));
        } else if key == DATA_STATEMENT {
            model.data = DataStream::new(values);
        }
    }

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_collects_dimensions_in_order() {
        let content = concat!(
            r#"CHARSET="ANSI";VALUES("year")="1988","1989";"#,
            r#"STUB="month";VALUES("month")="Jan","Feb","Mar";DATA=1"#,
        );
        let model = collate(parse(content)).unwrap();

        let titles: Vec<&str> = model.dimensions().iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["year", "month"]);
        assert_eq!(model.dimensions()[1].labels, vec!["Jan", "Feb", "Mar"]);
        assert_eq!(model.expected_len(), Some(6));
        assert!(!model.data().is_missing());
    }

    #[test]
    fn test_missing_data_is_not_a_collation_error() {
        let model = collate(parse(r#"VALUES("year")="1988""#)).unwrap();
        assert!(model.data().is_missing());
    }

    #[test]
    fn test_last_data_statement_wins() {
        let mut model = collate(parse("DATA=1,2;DATA=9,9")).unwrap();
        assert_eq!(model.data.draw(0).unwrap(), "9");
        assert_eq!(model.data.draw(1).unwrap(), "9");
        assert!(matches!(
            model.data.draw(2),
            Err(PxError::ExhaustedData { record: 2 })
        ));
    }

    #[test]
    fn test_same_title_dimensions_coexist() {
        let model = collate(parse(r#"VALUES("a")="1";VALUES("a")="2","3""#)).unwrap();
        assert_eq!(model.dimensions().len(), 2);
        assert_eq!(model.columns(), vec!["a", "data"]);
    }

    #[test]
    fn test_unextractable_values_key_is_ignored() {
        let model = collate(parse("VALUES(year)=1,2;VALUES(\"x\"=3;DATA=1")).unwrap();
        assert!(model.dimensions().is_empty());
    }

    #[test]
    fn test_malformed_statement_propagates() {
        let err = collate(parse("DATA=1;garbage")).unwrap_err();
        assert!(matches!(err, PxError::MalformedStatement(_)));
    }

    #[test]
    fn test_draw_without_data() {
        let mut stream = DataStream::missing();
        assert!(matches!(stream.draw(0), Err(PxError::MissingData)));
        assert_eq!(stream.consumed(), 0);
    }

    #[test]
    fn test_columns_with_data_titled_dimension() {
        let model = collate(parse(r#"VALUES("data")="x";VALUES("year")="1988""#)).unwrap();
        assert_eq!(model.columns(), vec!["data", "year"]);
    }
}
