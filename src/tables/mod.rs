//! Read-only reference tables: pay matrix, DA rate history, TA slabs

mod matrix;
mod rates;
pub mod loader;

pub use matrix::{PayMatrix, PayMatrixEntry};
pub use rates::{hra_rate, DaRateHistory, DaRateRecord, TaSlab, TaSlabTable};
