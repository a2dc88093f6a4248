//! Data model.
//!
//! [`Table`] is the tabular dataset exchanged with readers and writers.
//! [`Corpus`] is the ordered sequence of [`Record`]s the pipeline works on.

mod corpus;
mod table;

pub use corpus::*;
pub use table::*;
