//! cycle - Menstrual cycle tracking
//!
//! Derives where in the cycle "today" falls and paints phase bands onto any
//! calendar month, from nothing more than the last period start date and the
//! average cycle length.
//!
//! Commands:
//! - status: Show cycle day and phase for today
//! - set: Record last period date and average length
//! - clear: Forget the last period date
//! - calendar [YYYY-MM]: Show the projected phases for a month
//! - tips: Get suggestions for the current phase

pub mod calendar;
pub mod phase;
pub mod store;
pub mod tips;

pub use calendar::{project_month, MonthProjection};
pub use phase::{current_phase, CycleConfig, CycleError, CyclePhase, PhaseReading};
pub use store::CycleStore;
