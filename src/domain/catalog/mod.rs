//! Catalog reference data.
//!
//! Themes and their bookable schedules. Read-only to this service: the
//! reservation engine looks them up but never mutates them.

mod schedule;
mod theme;

pub use schedule::Schedule;
pub use theme::Theme;
