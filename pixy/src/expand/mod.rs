//! Record expansion.
//!
//! This module turns parsed statements into labeled records:
//! - Collate: statements to [`PxModel`] (dimensions plus data stream)
//! - Odometer: lazy walk over every label combination
//! - Records: combinations zipped with the data stream
//!
//! ```text
//! VALUES("year")="1988","1989"      {year: 1988, month: Jan, data: 1}
//! VALUES("month")="Jan","Feb"   →   {year: 1988, month: Feb, data: 2}
//! DATA=1,2,3,4                      {year: 1989, month: Jan, data: 3}
//!                                   {year: 1989, month: Feb, data: 4}
//! ```

pub mod collate;
pub mod odometer;
pub mod records;

pub use collate::{collate, DataStream, PxModel};
pub use odometer::Odometer;
pub use records::{expand, IntoRecords, Records};
