//! Lazy record expansion over a collated model.

use crate::error::PxResult;
use crate::models::{Record, DATA_KEY};

use super::collate::PxModel;
use super::odometer::Odometer;

/// Expand `model` into records, one per dimension combination.
///
/// Combinations follow nested-loop order with the last dimension fastest.
/// Each record takes the next value of the data stream. The stream is shared
/// with the model, so expanding the same model again restarts the product
/// but continues the data where the previous pass left it.
pub fn expand(model: &mut PxModel) -> Records<'_> {
    Records::new(model)
}

/// Iterator returned by [`expand`].
///
/// After the first error it yields `None`.
#[derive(Debug)]
pub struct Records<'m> {
    model: &'m mut PxModel,
    odometer: Odometer,
    emitted: usize,
}

impl<'m> Records<'m> {
    fn new(model: &'m mut PxModel) -> Self {
        let radices = model.dimensions.iter().map(|d| d.labels.len()).collect();
        Self {
            model,
            odometer: Odometer::new(radices),
            emitted: 0,
        }
    }

    /// Number of records yielded so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }
}

impl Iterator for Records<'_> {
    type Item = PxResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = next_record(self.model, &mut self.odometer, self.emitted)?;
        if item.is_ok() {
            self.emitted += 1;
        }
        Some(item)
    }
}

/// Owning variant of [`Records`], handed out by [`PxModel::into_records`].
#[derive(Debug)]
pub struct IntoRecords {
    model: PxModel,
    odometer: Odometer,
    emitted: usize,
}

impl IntoRecords {
    /// Number of records yielded so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Give the model back, with the data stream where expansion left it.
    pub fn into_model(self) -> PxModel {
        self.model
    }
}

impl Iterator for IntoRecords {
    type Item = PxResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = next_record(&mut self.model, &mut self.odometer, self.emitted)?;
        if item.is_ok() {
            self.emitted += 1;
        }
        Some(item)
    }
}

impl PxModel {
    /// Expand while taking ownership of the model.
    pub fn into_records(self) -> IntoRecords {
        let radices = self.dimensions.iter().map(|d| d.labels.len()).collect();
        IntoRecords {
            model: self,
            odometer: Odometer::new(radices),
            emitted: 0,
        }
    }
}

fn next_record(
    model: &mut PxModel,
    odometer: &mut Odometer,
    index: usize,
) -> Option<PxResult<Record>> {
    let combination = odometer.current()?;

    let mut record = Record::with_capacity(combination.len() + 1);
    for (dimension, &label) in model.dimensions.iter().zip(combination) {
        record.insert(dimension.title.as_str(), dimension.labels[label].as_str());
    }

    match model.data.draw(index) {
        Ok(value) => {
            record.insert(DATA_KEY, value);
            odometer.advance();
            Some(Ok(record))
        }
        Err(e) => {
            odometer.stop();
            Some(Err(e))
        }
    }
}
