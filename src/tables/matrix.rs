//! 7th CPC pay matrix: (level, cell) -> basic pay
//!
//! For a fixed level, cells are numbered contiguously from 1 and basic pay
//! strictly increases with the cell number. The matrix is immutable after
//! load; every engine reads it, none writes it.

use crate::profile::PayLevel;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One cell of the pay matrix, as stored in reference data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayMatrixEntry {
    pub pay_level: PayLevel,
    pub cell_number: u32,
    pub basic_pay: u32,
}

/// The loaded pay matrix. Cell numbers are 1-based.
#[derive(Debug, Clone)]
pub struct PayMatrix {
    /// Basic pay per level, indexed by `cell - 1`.
    ladders: HashMap<PayLevel, Vec<u32>>,
}

impl PayMatrix {
    /// Build from loaded entries. Entries are sorted per level by cell
    /// number; duplicate cells keep the last value seen.
    pub fn from_entries(entries: &[PayMatrixEntry]) -> Self {
        let mut by_level: HashMap<PayLevel, Vec<(u32, u32)>> = HashMap::new();
        for e in entries {
            by_level
                .entry(e.pay_level)
                .or_default()
                .push((e.cell_number, e.basic_pay));
        }

        let mut ladders = HashMap::new();
        for (level, mut cells) in by_level {
            cells.sort_by_key(|&(cell, _)| cell);
            cells.dedup_by_key(|&mut (cell, _)| cell);
            ladders.insert(level, cells.into_iter().map(|(_, basic)| basic).collect());
        }
        Self { ladders }
    }

    /// The standard 7th CPC academic pay matrix (AICTE/UGC levels).
    ///
    /// Values follow the published tables: entry pay per level, then 3%
    /// compounding rounded to the nearest hundred (the published L10 ladder
    /// keeps its first-step quirk, 57700 -> 59500).
    pub fn default_7cpc() -> Self {
        let mut ladders = HashMap::new();
        ladders.insert(
            PayLevel::L10,
            vec![
                57700, 59500, 61300, 63100, 65000, 67000, 69000, 71100, 73200, 75400, 77700,
                80000, 82400, 84900, 87400, 90000, 92700, 95500, 98400, 101400, 104400, 107500,
                110700, 114000, 117400, 120900, 124500, 128200, 132000, 136000, 140100, 144300,
                148600, 153100, 157700, 162400, 167300, 172300, 177500, 182800,
            ],
        );
        ladders.insert(
            PayLevel::L11,
            vec![
                68900, 71000, 73100, 75300, 77600, 79900, 82300, 84800, 87300, 89900, 92600,
                95400, 98300, 101200, 104200, 107300, 110500, 113800, 117200, 120700, 124300,
                128000, 131800, 135800, 139900, 144100, 148400, 152900, 157500, 162200, 167100,
                172100, 177300, 182600, 188100, 193700, 199500, 205500,
            ],
        );
        ladders.insert(
            PayLevel::L12,
            vec![
                79800, 82200, 84700, 87200, 89800, 92500, 95300, 98200, 101100, 104100, 107200,
                110400, 113700, 117100, 120600, 124200, 127900, 131700, 135700, 139800, 144000,
                148300, 152700, 157300, 162000, 166900, 171900, 177100, 182400, 187900, 193500,
                199300, 205300, 211500,
            ],
        );
        ladders.insert(
            PayLevel::L13A1,
            vec![
                131400, 135300, 139400, 143600, 147900, 152300, 156900, 161600, 166400, 171400,
                176500, 181800, 187300, 192900, 198700, 204700, 210800, 217100, 223600, 230300,
                237200, 244300, 251600, 259100,
            ],
        );
        ladders.insert(
            PayLevel::L14,
            vec![
                144200, 148500, 153000, 157600, 162300, 167200, 172200, 177400, 182700, 188200,
                193800, 199600, 205600, 211800, 218200, 224700, 231400, 238300, 245400, 252800,
                260400, 268200,
            ],
        );
        Self { ladders }
    }

    /// Ordered basic pay ladder for a level, if the level has any cells.
    pub fn basics(&self, level: PayLevel) -> Option<&[u32]> {
        self.ladders
            .get(&level)
            .map(|v| v.as_slice())
            .filter(|v| !v.is_empty())
    }

    /// Exact-match cell number for a basic pay within a level.
    pub fn lookup_cell(&self, level: PayLevel, basic: u32) -> Option<u32> {
        let ladder = self.basics(level)?;
        ladder
            .binary_search(&basic)
            .ok()
            .map(|idx| idx as u32 + 1)
    }

    /// Basic pay at a given cell of a level.
    pub fn cell_basic(&self, level: PayLevel, cell: u32) -> Option<u32> {
        if cell == 0 {
            return None;
        }
        self.basics(level)?.get(cell as usize - 1).copied()
    }

    /// Greatest cell whose basic is `<= basic` (the floor cell).
    fn floor_cell(&self, level: PayLevel, basic: u32) -> Option<u32> {
        let ladder = self.basics(level)?;
        let below = ladder.partition_point(|&b| b <= basic);
        if below == 0 {
            None
        } else {
            Some(below as u32)
        }
    }

    /// One annual increment within the same level.
    ///
    /// Resolves the current cell by exact match, else by the closest cell at
    /// or below `basic` (simulated basics may not land exactly on a
    /// tabulated cell after an off-table seed). Returns the next cell's
    /// basic, or `basic` unchanged when already at the top cell (stagnation)
    /// or when no cell is at or below the input.
    pub fn next_cell_basic(&self, level: PayLevel, basic: u32) -> u32 {
        let Some(cell) = self.floor_cell(level, basic) else {
            return basic;
        };
        self.cell_basic(level, cell + 1).unwrap_or(basic)
    }

    /// Lowest-basic cell of `level` with basic `>= target`, as
    /// `(cell, basic)`; used for cross-level fixation.
    pub fn smallest_cell_at_or_above(&self, level: PayLevel, target: u32) -> Option<(u32, u32)> {
        let ladder = self.basics(level)?;
        let idx = ladder.partition_point(|&b| b < target);
        ladder.get(idx).map(|&basic| (idx as u32 + 1, basic))
    }

    /// First cell of a level, as `(cell, basic)`.
    pub fn lowest_cell(&self, level: PayLevel) -> Option<(u32, u32)> {
        self.basics(level).map(|ladder| (1, ladder[0]))
    }

    /// Last cell of a level, as `(cell, basic)`.
    pub fn highest_cell(&self, level: PayLevel) -> Option<(u32, u32)> {
        self.basics(level)
            .map(|ladder| (ladder.len() as u32, ladder[ladder.len() - 1]))
    }

    pub fn has_level(&self, level: PayLevel) -> bool {
        self.basics(level).is_some()
    }
}

impl Default for PayMatrix {
    fn default() -> Self {
        Self::default_7cpc()
    }
}
