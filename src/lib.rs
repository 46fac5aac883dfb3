//! Theme Reservation - Time-slot booking with a FIFO waiting list
//!
//! Members reserve (theme, date, time) schedules of capacity one. When a
//! schedule is taken they may queue; approving a cancellation hands the
//! slot to the head of the queue in the same unit of work.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
