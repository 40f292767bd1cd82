//! Single-step CAS eligibility evaluation
//!
//! Implements the AICTE 2018 career advancement rules as adopted by the
//! state: service-length thresholds per level (entry-qualification dependent
//! at Level 10), the mandatory doctorate for Level 13A1 and above, the
//! pre-2010 doctorate waiver, July-1 effective-date alignment, and the MAT
//! order API exemption window.

use crate::dates::{add_years, july_first};
use crate::error::EngineError;
use crate::profile::{FacultyProfile, PayLevel};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Fixed historical cutoff: faculty whose effective joining predates this
/// are exempt from the doctorate requirement.
pub fn phd_waiver_cutoff() -> NaiveDate {
    NaiveDate::from_ymd_opt(2010, 3, 5).expect("valid cutoff date")
}

/// MAT order window: due dates falling inside it carry an informational API
/// score exemption for downstream consumers. Does not alter eligibility.
pub fn mat_order_window() -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(2015, 10, 17).expect("valid window start"),
        NaiveDate::from_ymd_opt(2019, 9, 10).expect("valid window end"),
    )
}

/// Waiver and exemption flags attached to an eligibility outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Waiver {
    /// Effective joining predates the 2010-03-05 cutoff; doctorate waived.
    PrePhdCutoff,
    /// Due date falls inside the MAT order window; API score exempt.
    MatOrderApiExempt,
}

impl fmt::Display for Waiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Waiver::PrePhdCutoff => f.write_str("Pre-2010 PhD Waiver"),
            Waiver::MatOrderApiExempt => f.write_str("MAT Order API Waiver (Exempt)"),
        }
    }
}

/// Service-length and qualification requirements for one CAS step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotionRule {
    pub required_years: u32,
    pub doctorate_required: bool,
}

/// Rule table for the transition out of `level`, or `None` at the top of
/// the CAS ladder. The Level 10 threshold depends on the qualification on
/// file: 4 years with a doctorate, 5 with a master's, 6 otherwise.
pub fn rule_for(level: PayLevel, profile: &FacultyProfile) -> Option<PromotionRule> {
    match level {
        PayLevel::L10 => {
            let required_years = if profile.holds_doctorate() {
                4
            } else if profile.holds_masters() {
                5
            } else {
                6
            };
            Some(PromotionRule {
                required_years,
                doctorate_required: false,
            })
        }
        PayLevel::L11 => Some(PromotionRule {
            required_years: 5,
            doctorate_required: false,
        }),
        PayLevel::L12 | PayLevel::L13A1 => Some(PromotionRule {
            required_years: 3,
            doctorate_required: true,
        }),
        PayLevel::L14 => None,
    }
}

/// Outcome of a single-step eligibility evaluation. The due date is carried
/// regardless of outcome (it may be in the future).
#[derive(Debug, Clone, Serialize)]
pub struct EligibilityResult {
    pub eligible: bool,
    pub due_date: NaiveDate,
    pub target_level: PayLevel,
    pub phd_waived: bool,
    pub api_exempt: bool,
    pub waivers: Vec<Waiver>,
    pub reason: String,
}

/// Evaluate whether (and from when) the next CAS step is due for an
/// employee currently at `current_level`.
///
/// The due date is anchored on the date the current level was entered (a
/// recorded promotion date for Levels 11/12, else the effective joining
/// date), advanced by the required years, then snapped to July 1 of that
/// calendar year. A doctorate acquired after the snapped due date defers
/// the due date to the raw acquisition date, which deliberately is not
/// re-snapped.
pub fn evaluate_eligibility(
    profile: &FacultyProfile,
    current_level: PayLevel,
) -> Result<EligibilityResult, EngineError> {
    let target_level = current_level
        .next()
        .ok_or_else(|| EngineError::UnknownLevel(current_level.code().to_string()))?;
    let rule = rule_for(current_level, profile)
        .ok_or_else(|| EngineError::UnknownLevel(current_level.code().to_string()))?;

    let effective_doj = profile.effective_joining_date();

    let anchor = match current_level {
        PayLevel::L11 => profile.promoted_level_11_date,
        PayLevel::L12 => profile.promoted_level_12_date,
        _ => None,
    }
    .unwrap_or(effective_doj);

    // Raw completion date, then July alignment: promotions take effect from
    // the start of the academic cycle of the completion year.
    let raw_due = add_years(anchor, rule.required_years);
    let mut due_date = july_first(raw_due.year());

    let mut waivers = Vec::new();
    let phd_waived = effective_doj < phd_waiver_cutoff();
    if phd_waived {
        waivers.push(Waiver::PrePhdCutoff);
    }

    let mut eligible = true;
    let mut reason = String::from("Requirements met");

    if rule.doctorate_required && !phd_waived {
        if profile.entry_qualification == crate::profile::Qualification::Doctorate {
            // Held since entry; nothing to defer.
        } else {
            match profile.acquired_phd_date {
                None => {
                    eligible = false;
                    reason = String::from("Ph.D. required and not acquired");
                }
                Some(acquired) if acquired > due_date => {
                    // Deferred to the raw acquisition date, not re-snapped.
                    due_date = acquired;
                    reason = String::from("Eligibility deferred to Ph.D. completion");
                }
                Some(_) => {}
            }
        }
    }

    let (mat_start, mat_end) = mat_order_window();
    let api_exempt = mat_start <= due_date && due_date <= mat_end;
    if api_exempt {
        waivers.push(Waiver::MatOrderApiExempt);
    }

    Ok(EligibilityResult {
        eligible,
        due_date,
        target_level,
        phd_waived,
        api_exempt,
        waivers,
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{CityClass, InstituteType, Qualification};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn profile(joining: NaiveDate, qual: Qualification) -> FacultyProfile {
        FacultyProfile {
            name: "Test Faculty".into(),
            institute_type: InstituteType::Government,
            city_class: CityClass::X,
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
    fn test_level10_phd_four_years_july_snap() {
        // Joining 2015-01-01 with Ph.D.: threshold 2019-01-01, snapped to
        // July 1 of that year.
        let p = profile(d(2015, 1, 1), Qualification::Doctorate);
        let r = evaluate_eligibility(&p, PayLevel::L10).unwrap();
        assert!(r.eligible);
        assert_eq!(r.due_date, d(2019, 7, 1));
        assert_eq!(r.target_level, PayLevel::L11);
    }

    #[test]
    fn test_level10_years_by_qualification() {
        let masters = profile(d(2015, 9, 1), Qualification::Masters);
        let r = evaluate_eligibility(&masters, PayLevel::L10).unwrap();
        assert_eq!(r.due_date, d(2020, 7, 1)); // 5 years -> 2020-09, snapped

        let bachelors = profile(d(2015, 9, 1), Qualification::Bachelors);
        let r = evaluate_eligibility(&bachelors, PayLevel::L10).unwrap();
        assert_eq!(r.due_date, d(2021, 7, 1)); // 6 years
    }

    #[test]
    fn test_past_service_pulls_anchor_back() {
        let mut p = profile(d(2015, 1, 1), Qualification::Doctorate);
        p.past_service_years = 2;
        let r = evaluate_eligibility(&p, PayLevel::L10).unwrap();
        // Effective joining 2013-01-01, 4 years -> 2017, snapped to July.
        assert_eq!(r.due_date, d(2017, 7, 1));
    }

    #[test]
    fn test_july_snap_idempotent() {
        // An already-snapped anchor must not shift the due date off July 1.
        let mut p = profile(d(2010, 6, 15), Qualification::Masters);
        p.current_level = PayLevel::L11;
        p.promoted_level_11_date = Some(d(2016, 7, 1));
        let r = evaluate_eligibility(&p, PayLevel::L11).unwrap();
        assert_eq!(r.due_date, d(2021, 7, 1));
        assert_eq!((r.due_date.month(), r.due_date.day()), (7, 1));
    }

    #[test]
    fn test_phd_required_and_missing() {
        let mut p = profile(d(2012, 1, 1), Qualification::Masters);
        p.current_level = PayLevel::L12;
        p.promoted_level_12_date = Some(d(2020, 7, 1));
        let r = evaluate_eligibility(&p, PayLevel::L12).unwrap();
        assert!(!r.eligible);
        assert!(!r.phd_waived);
        assert_eq!(r.reason, "Ph.D. required and not acquired");
        // Due date still reported for the non-eligible case.
        assert_eq!(r.due_date, d(2023, 7, 1));
    }

    #[test]
    fn test_pre_cutoff_waiver_allows_without_phd() {
        // Effective joining before 2010-03-05: doctorate waived for 12 -> 13A1.
        let mut p = profile(d(2009, 8, 1), Qualification::Masters);
        p.current_level = PayLevel::L12;
        p.promoted_level_12_date = Some(d(2018, 7, 1));
        let r = evaluate_eligibility(&p, PayLevel::L12).unwrap();
        assert!(r.phd_waived);
        assert!(r.waivers.contains(&Waiver::PrePhdCutoff));
        assert!(r.eligible);
        assert_eq!(r.target_level, PayLevel::L13A1);
    }

    #[test]
    fn test_late_phd_defers_without_resnap() {
        let mut p = profile(d(2012, 1, 1), Qualification::Masters);
        p.current_level = PayLevel::L12;
        p.promoted_level_12_date = Some(d(2018, 7, 1));
        p.acquired_phd_date = Some(d(2022, 3, 14));
        let r = evaluate_eligibility(&p, PayLevel::L12).unwrap();
        assert!(r.eligible);
        // Snapped due would be 2021-07-01; deferral keeps the raw date.
        assert_eq!(r.due_date, d(2022, 3, 14));
        assert_eq!(r.reason, "Eligibility deferred to Ph.D. completion");
    }

    #[test]
    fn test_mat_window_annotation() {
        // Due 2016-07-01 falls inside 2015-10-17 ..= 2019-09-10.
        let p = profile(d(2012, 1, 1), Qualification::Doctorate);
        let r = evaluate_eligibility(&p, PayLevel::L10).unwrap();
        assert_eq!(r.due_date, d(2016, 7, 1));
        assert!(r.api_exempt);
        assert!(r.waivers.contains(&Waiver::MatOrderApiExempt));
        assert!(r.eligible); // annotation only, eligibility unchanged
    }

    #[test]
    fn test_top_level_rejected() {
        let mut p = profile(d(2000, 1, 1), Qualification::Doctorate);
        p.current_level = PayLevel::L14;
        assert!(matches!(
            evaluate_eligibility(&p, PayLevel::L14),
            Err(EngineError::UnknownLevel(_))
        ));
    }
}
