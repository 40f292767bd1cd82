//! Dearness allowance rate history and transport allowance slabs

use crate::profile::{CityClass, CityType, PayLevel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One published DA revision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DaRateRecord {
    pub effective_date: NaiveDate,
    /// Percentage, e.g. 17.0 for 17%.
    pub da_rate: f64,
}

/// Date-indexed DA rate history. The rate applicable to any date is the
/// record with the latest effective date at or before it; with no such
/// record the rate is 0.
#[derive(Debug, Clone)]
pub struct DaRateHistory {
    /// Sorted ascending by effective date.
    records: Vec<DaRateRecord>,
}

impl DaRateHistory {
    pub fn from_records(mut records: Vec<DaRateRecord>) -> Self {
        records.sort_by_key(|r| r.effective_date);
        Self { records }
    }

    /// DA rates actually paid under the 7th CPC (per cent of basic),
    /// including the Jan 2020 - Jun 2021 freeze at 17%.
    pub fn default_7cpc() -> Self {
        let rows: &[(i32, u32, f64)] = &[
            (2016, 1, 0.0),
            (2016, 7, 2.0),
            (2017, 1, 4.0),
            (2017, 7, 5.0),
            (2018, 1, 7.0),
            (2018, 7, 9.0),
            (2019, 1, 12.0),
            (2019, 7, 17.0),
            (2021, 7, 28.0),
            (2021, 10, 31.0),
            (2022, 1, 34.0),
            (2022, 7, 38.0),
            (2023, 1, 42.0),
            (2023, 7, 46.0),
            (2024, 1, 50.0),
            (2024, 7, 53.0),
            (2025, 1, 55.0),
        ];
        let records = rows
            .iter()
            .map(|&(y, m, rate)| DaRateRecord {
                effective_date: NaiveDate::from_ymd_opt(y, m, 1).expect("valid revision date"),
                da_rate: rate,
            })
            .collect();
        Self { records }
    }

    /// Applicable DA percentage on `date` (0 before the first revision).
    pub fn rate_percent_on(&self, date: NaiveDate) -> f64 {
        let idx = self
            .records
            .partition_point(|r| r.effective_date <= date);
        if idx == 0 {
            0.0
        } else {
            self.records[idx - 1].da_rate
        }
    }

    /// Applicable DA rate as a fraction of basic (17% -> 0.17).
    pub fn rate_fraction_on(&self, date: NaiveDate) -> f64 {
        self.rate_percent_on(date) / 100.0
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for DaRateHistory {
    fn default() -> Self {
        Self::default_7cpc()
    }
}

/// One transport allowance slab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaSlab {
    /// Applies to numeric pay levels at or above this.
    pub min_pay_level: u32,
    pub city_type: CityType,
    /// Flat monthly amount; no allowance is computed on top of it.
    pub fixed_amount: u32,
}

/// Transport allowance slabs, keyed by level threshold and city type.
#[derive(Debug, Clone)]
pub struct TaSlabTable {
    slabs: Vec<TaSlab>,
}

impl TaSlabTable {
    pub fn from_slabs(slabs: Vec<TaSlab>) -> Self {
        Self { slabs }
    }

    /// Standard 7th CPC transport allowance slabs.
    pub fn default_7cpc() -> Self {
        Self {
            slabs: vec![
                TaSlab { min_pay_level: 9, city_type: CityType::Metro, fixed_amount: 7200 },
                TaSlab { min_pay_level: 9, city_type: CityType::Other, fixed_amount: 3600 },
                TaSlab { min_pay_level: 3, city_type: CityType::Metro, fixed_amount: 3600 },
                TaSlab { min_pay_level: 3, city_type: CityType::Other, fixed_amount: 1800 },
                TaSlab { min_pay_level: 1, city_type: CityType::Metro, fixed_amount: 1350 },
                TaSlab { min_pay_level: 1, city_type: CityType::Other, fixed_amount: 900 },
            ],
        }
    }

    /// Slab amount for a pay level and city class: the slab with the
    /// greatest `min_pay_level <= numeric level` among slabs of the matching
    /// city type, or 0 when none matches.
    pub fn amount_for(&self, level: PayLevel, city: CityClass) -> u32 {
        let city_type = city.city_type();
        self.slabs
            .iter()
            .filter(|s| s.city_type == city_type && s.min_pay_level <= level.numeric())
            .max_by_key(|s| s.min_pay_level)
            .map(|s| s.fixed_amount)
            .unwrap_or(0)
    }
}

impl Default for TaSlabTable {
    fn default() -> Self {
        Self::default_7cpc()
    }
}

/// House rent allowance rate as a fraction of basic.
///
/// Three-tier rule keyed by the prevailing DA rate: once DA crosses 25% the
/// X/Y/Z rates step from 24/16/8 to 27/18/9, and at 50% to 30/20/10.
pub fn hra_rate(da_fraction: f64, city: CityClass) -> f64 {
    if da_fraction >= 0.50 {
        match city {
            CityClass::X => 0.30,
            CityClass::Y => 0.20,
            CityClass::Z => 0.10,
        }
    } else if da_fraction >= 0.25 {
        match city {
            CityClass::X => 0.27,
            CityClass::Y => 0.18,
            CityClass::Z => 0.09,
        }
    } else {
        match city {
            CityClass::X => 0.24,
            CityClass::Y => 0.16,
            CityClass::Z => 0.08,
        }
    }
}
