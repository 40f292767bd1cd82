//! Promotion pay fixation and increment projection
//!
//! Fixation follows the 7th CPC rule: grant one notional increment in the
//! old level, then land on the lowest cell of the target level at or above
//! that notional pay.

use crate::dates::july_first;
use crate::error::EngineError;
use crate::profile::PayLevel;
use crate::tables::PayMatrix;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Result of a promotion fixation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Fixation {
    pub new_basic: u32,
    pub new_cell: u32,
    /// Old-level pay after the notional increment.
    pub notional: u32,
}

/// Fix pay on promotion from `old_level` to `target_level`.
///
/// Tolerant of off-table old basics (the notional increment pins to the
/// closest cell at or below, see [`PayMatrix::next_cell_basic`]). When no
/// cell of the target level reaches the notional pay the fixation falls back
/// to the target's lowest cell -- this can reduce pay and is preserved as-is
/// from the governing behavior, but it is logged loudly because it should
/// never trigger on a complete matrix.
pub fn fix(
    matrix: &PayMatrix,
    old_basic: u32,
    old_level: PayLevel,
    target_level: PayLevel,
) -> Result<Fixation, EngineError> {
    let notional = matrix.next_cell_basic(old_level, old_basic);

    if let Some((cell, basic)) = matrix.smallest_cell_at_or_above(target_level, notional) {
        return Ok(Fixation {
            new_basic: basic,
            new_cell: cell,
            notional,
        });
    }

    let (cell, basic) = matrix
        .lowest_cell(target_level)
        .ok_or(EngineError::EmptyLevel(target_level))?;
    log::warn!(
        "fixation ceiling fallback: no cell of level {target_level} reaches notional {notional} \
         (from {old_basic} at level {old_level}); falling back to lowest cell {basic}"
    );
    Ok(Fixation {
        new_basic: basic,
        new_cell: cell,
        notional,
    })
}

/// Strict fixation for host-facing suggestion flows: the old basic must sit
/// exactly on a matrix cell and the target level must have a cell at or
/// above the notional pay; both misses surface the offending key.
pub fn fix_strict(
    matrix: &PayMatrix,
    old_basic: u32,
    old_level: PayLevel,
    target_level: PayLevel,
) -> Result<Fixation, EngineError> {
    let cell = matrix
        .lookup_cell(old_level, old_basic)
        .ok_or(EngineError::LookupMiss {
            level: old_level,
            basic: old_basic,
        })?;
    let notional = matrix.cell_basic(old_level, cell + 1).unwrap_or(old_basic);

    let (new_cell, new_basic) = matrix
        .smallest_cell_at_or_above(target_level, notional)
        .ok_or(EngineError::LookupMiss {
            level: target_level,
            basic: notional,
        })?;
    Ok(Fixation {
        new_basic,
        new_cell,
        notional,
    })
}

/// One dated annual increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Increment {
    pub date: NaiveDate,
    pub basic: u32,
    pub cell: u32,
}

/// Projected pay after applying July increments through `as_of`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncrementSchedule {
    pub projected_basic: u32,
    pub increments: Vec<Increment>,
}

/// Project a basic pay forward by applying the July 1 increment of every
/// year strictly after `start_date` up to and including `as_of`.
///
/// Off-table basics simply stop incrementing (no error): the projection is a
/// schedule preview, not a validation pass.
pub fn project_increments(
    matrix: &PayMatrix,
    level: PayLevel,
    start_basic: u32,
    start_date: NaiveDate,
    as_of: NaiveDate,
) -> IncrementSchedule {
    let mut basic = start_basic;
    let mut increments = Vec::new();

    for year in start_date.year()..=as_of.year() {
        let july = july_first(year);
        if july > as_of {
            break;
        }
        if july <= start_date {
            continue;
        }
        if let Some(cell) = matrix.lookup_cell(level, basic) {
            if let Some(next_basic) = matrix.cell_basic(level, cell + 1) {
                basic = next_basic;
                increments.push(Increment {
                    date: july,
                    basic,
                    cell: cell + 1,
                });
            }
        }
    }

    IncrementSchedule {
        projected_basic: basic,
        increments,
    }
}

/// Reverse-calculate the basic pay `years_back` years ago within the same
/// level, assuming one cell per year of increment. Clamps at cell 1.
/// Returns `(cell, basic)`.
pub fn historical_basic(
    matrix: &PayMatrix,
    level: PayLevel,
    current_basic: u32,
    years_back: u32,
) -> Result<(u32, u32), EngineError> {
    let cell = matrix
        .lookup_cell(level, current_basic)
        .ok_or(EngineError::LookupMiss {
            level,
            basic: current_basic,
        })?;
    let past_cell = cell.saturating_sub(years_back).max(1);
    let basic = matrix
        .cell_basic(level, past_cell)
        .ok_or(EngineError::CellMiss {
            level,
            cell: past_cell,
        })?;
    Ok((past_cell, basic))
}
