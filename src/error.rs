//! Typed failures shared by all engines
//!
//! The engines are pure and local: there is no transient failure source, so
//! there is no retry machinery here. Every variant carries the offending key
//! so the host can report it instead of showing a plausible wrong number.

use crate::profile::PayLevel;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A (level, basic) pair is absent from the pay matrix.
    #[error("basic pay {basic} not found in pay matrix for level {level}")]
    LookupMiss { level: PayLevel, basic: u32 },

    /// A (level, cell) pair is absent from the pay matrix.
    #[error("cell {cell} not found in pay matrix for level {level}")]
    CellMiss { level: PayLevel, cell: u32 },

    /// A level has no cells at all; no basic pay can be produced for it.
    #[error("pay matrix has no cells for level {0}")]
    EmptyLevel(PayLevel),

    /// A level code outside the fixed 10 -> 11 -> 12 -> 13A1 -> 14 sequence.
    #[error("unknown pay level code {0:?}")]
    UnknownLevel(String),

    /// Start date at or after end date, rejected before any stepping begins.
    #[error("invalid date range: start {start} is not before end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}
