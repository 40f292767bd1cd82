//! CSV loading for the reference tables
//!
//! Seed files use the same columns the reference data ships with:
//! `pay_matrix.csv` (pay_level, cell_number, basic_pay),
//! `da_rates.csv` (effective_date, da_rate, ...) and
//! `ta_slabs.csv` (min_pay_level, city_type, fixed_amount). Extra columns
//! are ignored.

use super::matrix::{PayMatrix, PayMatrixEntry};
use super::rates::{DaRateHistory, DaRateRecord, TaSlab, TaSlabTable};
use crate::profile::PayLevel;
use std::error::Error;
use std::io::Read;
use std::path::Path;

/// Load the pay matrix from a CSV file.
pub fn load_pay_matrix<P: AsRef<Path>>(path: P) -> Result<PayMatrix, Box<dyn Error>> {
    let file = std::fs::File::open(path)?;
    load_pay_matrix_from_reader(file)
}

/// Load the pay matrix from any reader, validating the ladder invariants.
pub fn load_pay_matrix_from_reader<R: Read>(reader: R) -> Result<PayMatrix, Box<dyn Error>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut entries = Vec::new();
    for result in rdr.deserialize() {
        let entry: PayMatrixEntry = result?;
        entries.push(entry);
    }
    let matrix = PayMatrix::from_entries(&entries);
    validate_ladders(&matrix)?;
    Ok(matrix)
}

/// Cells must be contiguous from 1 and basics strictly increasing; a gap or
/// inversion means a corrupt seed file, better rejected than queried.
fn validate_ladders(matrix: &PayMatrix) -> Result<(), Box<dyn Error>> {
    for level in PayLevel::ALL {
        let Some(ladder) = matrix.basics(level) else {
            continue;
        };
        for (i, window) in ladder.windows(2).enumerate() {
            if window[0] >= window[1] {
                return Err(format!(
                    "pay matrix level {level}: basic pay not increasing at cell {}",
                    i + 2
                )
                .into());
            }
        }
        for cell in 1..=ladder.len() as u32 {
            if matrix.cell_basic(level, cell).is_none() {
                return Err(format!("pay matrix level {level}: missing cell {cell}").into());
            }
        }
    }
    Ok(())
}

/// Load the DA rate history from a CSV file.
pub fn load_da_rates<P: AsRef<Path>>(path: P) -> Result<DaRateHistory, Box<dyn Error>> {
    let file = std::fs::File::open(path)?;
    load_da_rates_from_reader(file)
}

pub fn load_da_rates_from_reader<R: Read>(reader: R) -> Result<DaRateHistory, Box<dyn Error>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: DaRateRecord = result?;
        records.push(record);
    }
    Ok(DaRateHistory::from_records(records))
}

/// Load the TA slab table from a CSV file.
pub fn load_ta_slabs<P: AsRef<Path>>(path: P) -> Result<TaSlabTable, Box<dyn Error>> {
    let file = std::fs::File::open(path)?;
    load_ta_slabs_from_reader(file)
}

pub fn load_ta_slabs_from_reader<R: Read>(reader: R) -> Result<TaSlabTable, Box<dyn Error>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut slabs = Vec::new();
    for result in rdr.deserialize() {
        let slab: TaSlab = result?;
        slabs.push(slab);
    }
    Ok(TaSlabTable::from_slabs(slabs))
}
