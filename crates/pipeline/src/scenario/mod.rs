//! Scenario state machines for recognized booking situations.

pub mod arrival;
pub mod booking;
pub mod cues;
pub mod templates;
pub mod time;

pub use arrival::{detect_arrival_delay, DelayDetection};
pub use booking::{detect_booking_change, BookingChange};
