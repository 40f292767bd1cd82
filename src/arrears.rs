//! Monthly arrears differential engine
//!
//! Steps two pay tracks (drawn vs. due) month by month across a date range,
//! applying July increments on each track's own level ladder, the published
//! DA rate, and the DA-triggered HRA tiers, then accumulates the monthly
//! gross differential. Transport allowance is a flat add on both tracks and
//! never attracts DA or HRA.

use crate::dates::{add_months, month_start};
use crate::error::EngineError;
use crate::profile::{CityClass, PayLevel};
use crate::tables::{hra_rate, DaRateHistory, PayMatrix};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Inputs for one arrears run. The drawn track is what was actually paid;
/// the due track is what should have been paid.
#[derive(Debug, Clone)]
pub struct ArrearsRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub drawn_start_basic: u32,
    pub due_start_basic: u32,
    pub drawn_level: PayLevel,
    pub due_level: PayLevel,
    pub city_class: CityClass,
    /// Flat transport allowance applicable to the employee.
    pub ta_amount: u32,
}

/// One month of the arrears statement. Produced, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArrearsMonthRecord {
    /// First day of the month this row covers.
    pub month: NaiveDate,
    pub drawn_basic: u32,
    pub due_basic: u32,
    pub da_rate_percent: f64,
    pub diff_basic: i64,
    pub diff_da: i64,
    pub diff_hra: i64,
    /// Gross differential including the (cancelling) transport allowance.
    pub total_diff: i64,
}

/// Ordered arrears rows plus the aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct ArrearsStatement {
    pub records: Vec<ArrearsMonthRecord>,
}

impl ArrearsStatement {
    /// Total arrears payable over the whole range.
    pub fn total_arrears(&self) -> i64 {
        self.records.iter().map(|r| r.total_diff).sum()
    }
}

/// Compute the month-by-month differential between the drawn and due pay
/// tracks from `start_date` to `end_date` inclusive (stepping by calendar
/// month, normalized to month starts).
pub fn compute_arrears(
    matrix: &PayMatrix,
    da_history: &DaRateHistory,
    req: &ArrearsRequest,
) -> Result<ArrearsStatement, EngineError> {
    if req.start_date >= req.end_date {
        return Err(EngineError::InvalidDateRange {
            start: req.start_date,
            end: req.end_date,
        });
    }
    for level in [req.drawn_level, req.due_level] {
        if !matrix.has_level(level) {
            return Err(EngineError::EmptyLevel(level));
        }
    }

    let mut drawn_basic = req.drawn_start_basic;
    let mut due_basic = req.due_start_basic;
    let mut current = month_start(req.start_date);
    let mut records = Vec::new();

    while current <= req.end_date {
        // July increment on both tracks, each on its own ladder; the month
        // containing the start date itself is never incremented.
        if current.month() == 7 && current > req.start_date {
            drawn_basic = matrix.next_cell_basic(req.drawn_level, drawn_basic);
            due_basic = matrix.next_cell_basic(req.due_level, due_basic);
        }

        let da_fraction = da_history.rate_fraction_on(current);
        let hra_fraction = hra_rate(da_fraction, req.city_class);

        let drawn = gross(drawn_basic, da_fraction, hra_fraction, req.ta_amount);
        let due = gross(due_basic, da_fraction, hra_fraction, req.ta_amount);

        records.push(ArrearsMonthRecord {
            month: current,
            drawn_basic,
            due_basic,
            da_rate_percent: da_fraction * 100.0,
            diff_basic: due_basic as i64 - drawn_basic as i64,
            diff_da: due.da - drawn.da,
            diff_hra: due.hra - drawn.hra,
            total_diff: due.total - drawn.total,
        });

        current = add_months(current, 1);
    }

    Ok(ArrearsStatement { records })
}

struct MonthlyGross {
    da: i64,
    hra: i64,
    total: i64,
}

/// Gross pay for one track: basic + rounded DA + rounded HRA + flat TA.
fn gross(basic: u32, da_fraction: f64, hra_fraction: f64, ta_amount: u32) -> MonthlyGross {
    let da = (basic as f64 * da_fraction).round() as i64;
    let hra = (basic as f64 * hra_fraction).round() as i64;
    MonthlyGross {
        da,
        hra,
        total: basic as i64 + da + hra + ta_amount as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn request_2020() -> ArrearsRequest {
        ArrearsRequest {
            start_date: d(2020, 1, 1),
            end_date: d(2020, 12, 1),
            drawn_start_basic: 131400,
            due_start_basic: 144200,
            drawn_level: PayLevel::L13A1,
            due_level: PayLevel::L14,
            city_class: CityClass::Y,
            ta_amount: 3600,
        }
    }

    #[test]
    fn test_single_july_increment_pair() {
        // Twelve rows; both tracks step exactly once, at the 2020-07 row.
        let m = PayMatrix::default_7cpc();
        let da = DaRateHistory::default_7cpc();
        let stmt = compute_arrears(&m, &da, &request_2020()).unwrap();

        assert_eq!(stmt.records.len(), 12);
        for r in &stmt.records[..6] {
            assert_eq!((r.drawn_basic, r.due_basic), (131400, 144200));
        }
        for r in &stmt.records[6..] {
            assert_eq!((r.drawn_basic, r.due_basic), (135300, 148500));
        }
        assert_eq!(stmt.records[6].month, d(2020, 7, 1));
    }

    #[test]
    fn test_monthly_components() {
        // Jan 2020: DA frozen at 17%, Y-city HRA tier 16%.
        let m = PayMatrix::default_7cpc();
        let da = DaRateHistory::default_7cpc();
        let stmt = compute_arrears(&m, &da, &request_2020()).unwrap();

        let jan = &stmt.records[0];
        assert_eq!(jan.da_rate_percent, 17.0);
        assert_eq!(jan.diff_basic, 12800);
        assert_eq!(jan.diff_da, 24514 - 22338);
        assert_eq!(jan.diff_hra, 23072 - 21024);
        // TA is flat on both tracks and cancels out of the differential.
        assert_eq!(jan.total_diff, 12800 + 2176 + 2048);
    }

    #[test]
    fn test_total_is_sum_of_rows() {
        let m = PayMatrix::default_7cpc();
        let da = DaRateHistory::default_7cpc();
        let stmt = compute_arrears(&m, &da, &request_2020()).unwrap();
        let sum: i64 = stmt.records.iter().map(|r| r.total_diff).sum();
        assert_eq!(stmt.total_arrears(), sum);
        assert!(stmt.total_arrears() > 0);
    }

    #[test]
    fn test_differential_antisymmetric() {
        // Swapping the drawn and due tracks negates every column.
        let m = PayMatrix::default_7cpc();
        let da = DaRateHistory::default_7cpc();
        let req = request_2020();
        let swapped = ArrearsRequest {
            drawn_start_basic: req.due_start_basic,
            due_start_basic: req.drawn_start_basic,
            drawn_level: req.due_level,
            due_level: req.drawn_level,
            ..req.clone()
        };

        let forward = compute_arrears(&m, &da, &req).unwrap();
        let reverse = compute_arrears(&m, &da, &swapped).unwrap();
        assert_eq!(forward.records.len(), reverse.records.len());
        for (f, r) in forward.records.iter().zip(&reverse.records) {
            assert_eq!(f.diff_basic, -r.diff_basic);
            assert_eq!(f.diff_da, -r.diff_da);
            assert_eq!(f.diff_hra, -r.diff_hra);
            assert_eq!(f.total_diff, -r.total_diff);
        }
        assert_eq!(forward.total_arrears(), -reverse.total_arrears());
    }

    #[test]
    fn test_start_month_never_incremented() {
        // A July start date must not increment in its own month.
        let m = PayMatrix::default_7cpc();
        let da = DaRateHistory::default_7cpc();
        let req = ArrearsRequest {
            start_date: d(2020, 7, 1),
            end_date: d(2020, 9, 1),
            ..request_2020()
        };
        let stmt = compute_arrears(&m, &da, &req).unwrap();
        assert_eq!(stmt.records[0].drawn_basic, 131400);
    }

    #[test]
    fn test_invalid_range_rejected() {
        let m = PayMatrix::default_7cpc();
        let da = DaRateHistory::default_7cpc();
        let req = ArrearsRequest {
            start_date: d(2021, 1, 1),
            end_date: d(2020, 1, 1),
            ..request_2020()
        };
        assert!(matches!(
            compute_arrears(&m, &da, &req),
            Err(EngineError::InvalidDateRange { .. })
        ));
    }
}
