//! Forward career simulation
//!
//! Replays an entire career month by month: July increments, service-year
//! counting per level, and CAS promotions with July-aligned effective dates.
//! When a promotion fires, the clock itself jumps to the snapped effective
//! date and the level-entry anchor resets there, so later service counts are
//! measured from the snapped date rather than the month the threshold check
//! happened to run. This retroactive re-anchoring is load-bearing: smoothing
//! it into continuous time diverges the downstream increment timing.

use crate::dates::{add_months, july_first, month_start, months_between, years_between};
use crate::eligibility::{phd_waiver_cutoff, rule_for, PromotionRule, Waiver};
use crate::error::EngineError;
use crate::fixation::fix;
use crate::profile::{FacultyProfile, PayLevel, Qualification};
use crate::tables::PayMatrix;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// One promotion emitted by the simulator. Never mutated after creation.
#[derive(Debug, Clone, Serialize)]
pub struct PromotionEvent {
    pub from_level: PayLevel,
    pub to_level: PayLevel,
    pub effective_date: NaiveDate,
    pub fixed_basic: u32,
    pub waivers: Vec<Waiver>,
}

/// Full result of a career replay.
#[derive(Debug, Clone, Serialize)]
pub struct CareerSimulation {
    pub events: Vec<PromotionEvent>,
    pub final_level: PayLevel,
    pub final_basic: u32,
}

/// Ephemeral per-run state; discarded when the run completes.
struct SimulationState {
    clock: NaiveDate,
    level: PayLevel,
    basic: u32,
    level_entry: NaiveDate,
}

/// Replay a career from the (month-normalized) effective joining date to
/// `end_date`, starting at Level 10 with its base cell.
///
/// Per month, in order: the July-1 increment (gated on six whole months of
/// service in the current level), then the promotion threshold check. A
/// doctoral gate that blocks a due promotion is retried every month, so a
/// late-acquired doctorate is honored as soon as it is held as of the
/// candidate July-1 effective date.
pub fn simulate_career(
    profile: &FacultyProfile,
    matrix: &PayMatrix,
    end_date: NaiveDate,
) -> Result<CareerSimulation, EngineError> {
    let start = month_start(profile.effective_joining_date());
    if start >= end_date {
        return Err(EngineError::InvalidDateRange {
            start,
            end: end_date,
        });
    }

    let (_, entry_basic) = matrix
        .lowest_cell(PayLevel::L10)
        .ok_or(EngineError::EmptyLevel(PayLevel::L10))?;

    let phd_waived = profile.effective_joining_date() < phd_waiver_cutoff();

    let mut state = SimulationState {
        clock: start,
        level: PayLevel::L10,
        basic: entry_basic,
        level_entry: start,
    };
    let mut events = Vec::new();

    while state.clock <= end_date {
        // 1. July increment, withheld under six whole months in level.
        if state.clock.month() == 7
            && state.clock.day() == 1
            && months_between(state.level_entry, state.clock) >= 6
        {
            state.basic = matrix.next_cell_basic(state.level, state.basic);
        }

        // 2. Promotion threshold for the current level. The Level 10
        // threshold is keyed on the qualification held at entry; a
        // doctorate earned in service clears the doctoral gate further up
        // the ladder but does not shorten this first threshold.
        let rule = if state.level == PayLevel::L10 {
            Some(PromotionRule {
                required_years: senior_scale_years(profile.entry_qualification),
                doctorate_required: false,
            })
        } else {
            rule_for(state.level, profile)
        };
        if let Some(rule) = rule {
            let years_in_level = years_between(state.level_entry, state.clock);
            if years_in_level >= rule.required_years {
                let mut effective = july_first(state.clock.year());
                if effective < state.level_entry {
                    effective = state.clock;
                }

                let gate_cleared = !rule.doctorate_required
                    || phd_waived
                    || profile.doctorate_held_by(effective);

                if gate_cleared {
                    // rule_for returns None at the top level, so next() holds.
                    let target = state.level.next().ok_or_else(|| {
                        EngineError::UnknownLevel(state.level.code().to_string())
                    })?;
                    let fixation = fix(matrix, state.basic, state.level, target)?;

                    let mut waivers = Vec::new();
                    if rule.doctorate_required && phd_waived {
                        waivers.push(Waiver::PrePhdCutoff);
                    }

                    log::debug!(
                        "promotion {} -> {target} effective {effective}: basic {} -> {}",
                        state.level,
                        state.basic,
                        fixation.new_basic
                    );
                    events.push(PromotionEvent {
                        from_level: state.level,
                        to_level: target,
                        effective_date: effective,
                        fixed_basic: fixation.new_basic,
                        waivers,
                    });

                    state.level = target;
                    state.basic = fixation.new_basic;
                    state.level_entry = effective;
                    // Jump the clock to the snapped effective date.
                    state.clock = effective;
                }
                // Blocked gate: no event, keep stepping; retried next month.
            }
        }

        state.clock = add_months(state.clock, 1);
    }

    Ok(CareerSimulation {
        events,
        final_level: state.level,
        final_basic: state.basic,
    })
}

/// Years of Level 10 service before the senior scale, by entry
/// qualification.
fn senior_scale_years(entry: Qualification) -> u32 {
    match entry {
        Qualification::Doctorate => 4,
        Qualification::Masters | Qualification::MPhil => 5,
        Qualification::Bachelors => 6,
    }
}

/// Level and basic held on the day of joining the current institute, found
/// by replaying service at the previous employer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriorService {
    pub joining_level: PayLevel,
    pub joining_basic: u32,
    pub total_past_years: u32,
}

/// Replay prior service from the first-ever joining date to the current
/// joining date: July increments plus anniversary-counted promotions
/// 10 -> 11 -> 12 (the in-service continuum carries no doctoral gate and no
/// July re-anchoring; promotions land on the service anniversary month).
pub fn pay_at_joining(
    matrix: &PayMatrix,
    initial_doj: NaiveDate,
    current_doj: NaiveDate,
    entry_qualification: Qualification,
) -> Result<PriorService, EngineError> {
    if initial_doj >= current_doj {
        return Err(EngineError::InvalidDateRange {
            start: initial_doj,
            end: current_doj,
        });
    }

    let (_, entry_basic) = matrix
        .lowest_cell(PayLevel::L10)
        .ok_or(EngineError::EmptyLevel(PayLevel::L10))?;

    let years_to_senior_scale = senior_scale_years(entry_qualification);

    let mut level = PayLevel::L10;
    let mut basic = entry_basic;
    let mut years_served = 0;
    let mut pointer = initial_doj;

    loop {
        let next_month = add_months(month_start(pointer), 1);
        if next_month > current_doj {
            break;
        }
        pointer = next_month;

        if pointer.month() == 7 {
            basic = matrix.next_cell_basic(level, basic);
        }

        // Year completion approximated by the joining anniversary month.
        if pointer.month() == initial_doj.month() {
            years_served += 1;

            if level == PayLevel::L10 && years_served == years_to_senior_scale {
                basic = fix(matrix, basic, PayLevel::L10, PayLevel::L11)?.new_basic;
                level = PayLevel::L11;
            } else if level == PayLevel::L11 && years_served == years_to_senior_scale + 5 {
                basic = fix(matrix, basic, PayLevel::L11, PayLevel::L12)?.new_basic;
                level = PayLevel::L12;
            }
        }
    }

    Ok(PriorService {
        joining_level: level,
        joining_basic: basic,
        total_past_years: years_served,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{CityClass, InstituteType};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn profile(joining: NaiveDate, qual: Qualification) -> FacultyProfile {
        FacultyProfile {
            name: "Test Faculty".into(),
            institute_type: InstituteType::Government,
            city_class: CityClass::Y,
            date_of_joining: joining,
            past_service_years: 0,
            entry_qualification: qual,
            acquired_mtech_date: None,
            acquired_phd_date: None,
            promoted_level_11_date: None,
            promoted_level_12_date: None,
            current_level: PayLevel::L10,
            current_basic: 57700,
        }
    }

    #[test]
    fn test_first_promotion_snaps_to_july() {
        // Ph.D. joining 2015-01-01: four July increments (2015-2018), then
        // the 4-year threshold lands 2019-01-01 and snaps to 2019-07-01.
        let p = profile(d(2015, 1, 1), Qualification::Doctorate);
        let m = PayMatrix::default_7cpc();
        let sim = simulate_career(&p, &m, d(2020, 1, 1)).unwrap();

        assert_eq!(sim.events.len(), 1);
        let ev = &sim.events[0];
        assert_eq!(ev.from_level, PayLevel::L10);
        assert_eq!(ev.to_level, PayLevel::L11);
        assert_eq!(ev.effective_date, d(2019, 7, 1));
        // Basic walked 57700 -> 65000 by 2018-07; notional 67000 -> 68900.
        assert_eq!(ev.fixed_basic, 68900);
        assert_eq!(sim.final_level, PayLevel::L11);
        assert_eq!(sim.final_basic, 68900);
    }

    #[test]
    fn test_levels_never_regress() {
        let mut p = profile(d(2011, 1, 1), Qualification::Masters);
        p.acquired_phd_date = Some(d(2022, 5, 1));
        let m = PayMatrix::default_7cpc();
        let sim = simulate_career(&p, &m, d(2026, 1, 1)).unwrap();

        // 10 -> 11 (2016-07), 11 -> 12 (2021-07), 12 -> 13A1 (2024-07).
        assert_eq!(sim.events.len(), 3);
        for pair in sim.events.windows(2) {
            assert!(pair[0].to_level <= pair[1].from_level);
            assert!(pair[0].effective_date <= pair[1].effective_date);
            assert!(pair[0].fixed_basic <= pair[1].fixed_basic);
        }
        assert_eq!(sim.events[2].to_level, PayLevel::L13A1);
        assert_eq!(sim.events[2].effective_date, d(2024, 7, 1));
        assert_eq!(sim.final_level, PayLevel::L13A1);
    }

    #[test]
    fn test_l10_threshold_keyed_on_entry_qualification() {
        // Masters entrant carries the 5-year threshold even when a Ph.D.
        // arrives later in service; 10 -> 11 must stay at 2016-07-01, not
        // pull back to the 4-year 2015 date.
        let mut p = profile(d(2011, 1, 1), Qualification::Masters);
        p.acquired_phd_date = Some(d(2022, 5, 1));
        let m = PayMatrix::default_7cpc();
        let sim = simulate_career(&p, &m, d(2017, 1, 1)).unwrap();

        assert_eq!(sim.events.len(), 1);
        assert_eq!(sim.events[0].from_level, PayLevel::L10);
        assert_eq!(sim.events[0].to_level, PayLevel::L11);
        assert_eq!(sim.events[0].effective_date, d(2016, 7, 1));
        // Five July increments reach 67000; notional 69000 fixes at 71000.
        assert_eq!(sim.events[0].fixed_basic, 71000);
    }

    #[test]
    fn test_doctoral_gate_blocks_then_clears() {
        // Masters joining 2011: 12 -> 13A1 is due 2024-07 but the Ph.D.
        // arrives 2025-03, so the gate blocks until the 2025-07 candidate
        // date holds the doctorate.
        let mut p = profile(d(2011, 1, 1), Qualification::Masters);
        p.acquired_phd_date = Some(d(2025, 3, 10));
        let m = PayMatrix::default_7cpc();
        let sim = simulate_career(&p, &m, d(2026, 12, 1)).unwrap();

        let last = sim.events.last().unwrap();
        assert_eq!(last.from_level, PayLevel::L12);
        assert_eq!(last.to_level, PayLevel::L13A1);
        assert_eq!(last.effective_date, d(2025, 7, 1));
    }

    #[test]
    fn test_pre_cutoff_waiver_flag_on_event() {
        // Joining before 2010-03-05 with no doctorate on file still clears
        // the doctoral gate, and the event records the waiver.
        let p = profile(d(2008, 6, 1), Qualification::Masters);
        let m = PayMatrix::default_7cpc();
        let sim = simulate_career(&p, &m, d(2024, 1, 1)).unwrap();

        let gated = sim
            .events
            .iter()
            .find(|e| e.to_level == PayLevel::L13A1)
            .expect("12 -> 13A1 should fire under the waiver");
        assert!(gated.waivers.contains(&Waiver::PrePhdCutoff));
    }

    #[test]
    fn test_no_increment_under_six_months() {
        // Joining 2015-02-01: only five whole months by 2015-07-01, so the
        // first increment is withheld until 2016-07-01.
        let p = profile(d(2015, 2, 1), Qualification::Doctorate);
        let m = PayMatrix::default_7cpc();
        let sim = simulate_career(&p, &m, d(2016, 6, 30)).unwrap();
        assert_eq!(sim.final_basic, 57700);

        let sim = simulate_career(&p, &m, d(2016, 8, 1)).unwrap();
        assert_eq!(sim.final_basic, 59500);
    }

    #[test]
    fn test_invalid_range_rejected() {
        let p = profile(d(2020, 1, 1), Qualification::Doctorate);
        let m = PayMatrix::default_7cpc();
        assert!(matches!(
            simulate_career(&p, &m, d(2019, 1, 1)),
            Err(EngineError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_prior_service_continuum() {
        // Ph.D., first job 2010-09-01, joins current institute 2016-02-01:
        // July increments 2011-2014 reach 65000, the September 2014
        // anniversary completes year 4 and fixes into Level 11 at 68900,
        // then the 2015 July increment lands 71000.
        let m = PayMatrix::default_7cpc();
        let prior =
            pay_at_joining(&m, d(2010, 9, 1), d(2016, 2, 1), Qualification::Doctorate).unwrap();
        assert_eq!(prior.joining_level, PayLevel::L11);
        assert_eq!(prior.joining_basic, 71000);
        assert_eq!(prior.total_past_years, 5);
    }

    #[test]
    fn test_prior_service_rejects_inverted_dates() {
        let m = PayMatrix::default_7cpc();
        assert!(matches!(
            pay_at_joining(&m, d(2016, 2, 1), d(2010, 9, 1), Qualification::Masters),
            Err(EngineError::InvalidDateRange { .. })
        ));
    }
}
