//! Career Advancement Scheme (CAS) pay progression engines for the 7th CPC
//! academic pay matrix.
//!
//! Pure computation engines over read-only reference tables:
//! - pay matrix lookups and cell increments ([`tables::PayMatrix`])
//! - promotion pay fixation ([`fixation`])
//! - single-step CAS eligibility evaluation ([`eligibility`])
//! - forward career simulation ([`simulator`])
//! - monthly drawn-vs-due arrears differentials ([`arrears`])
//!
//! Reference tables are loaded once (hardcoded defaults or CSV via
//! [`tables::loader`]) and never mutated; every engine call takes a
//! fully-formed [`profile::FacultyProfile`] or explicit parameters and
//! returns a fresh result, so evaluating independent profiles against the
//! same tables from multiple threads needs no locking.

pub mod arrears;
pub mod dates;
pub mod eligibility;
pub mod error;
pub mod fixation;
pub mod profile;
pub mod simulator;
pub mod tables;

pub use arrears::{compute_arrears, ArrearsMonthRecord, ArrearsRequest, ArrearsStatement};
pub use eligibility::{evaluate_eligibility, EligibilityResult, Waiver};
pub use error::EngineError;
pub use fixation::{fix, Fixation};
pub use profile::{CityClass, FacultyProfile, InstituteType, PayLevel, Qualification};
pub use simulator::{simulate_career, CareerSimulation, PromotionEvent};
pub use tables::{DaRateHistory, PayMatrix, TaSlabTable};
