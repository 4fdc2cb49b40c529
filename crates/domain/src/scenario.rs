use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome classes of the arrival-delay scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayKind {
    /// Transport disruption with no usable arrival time.
    FlightDelay,
    /// The guest will arrive before the booked time.
    EarlyArrival,
    /// Late, but inside the 30 minute grace window.
    WithinGrace,
    /// 31 to 60 minutes late.
    ModerateDelay,
    /// More than an hour late, or "very late" without a number.
    SignificantDelay,
    /// Late with no indication of how much.
    UnspecifiedDelay,
}

impl DelayKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DelayKind::FlightDelay => "flight_delay",
            DelayKind::EarlyArrival => "early_arrival",
            DelayKind::WithinGrace => "within_grace",
            DelayKind::ModerateDelay => "moderate_delay",
            DelayKind::SignificantDelay => "significant_delay",
            DelayKind::UnspecifiedDelay => "unspecified_delay",
        }
    }

    /// Everything except an early arrival means the guest is late.
    pub fn is_late(self) -> bool {
        self != DelayKind::EarlyArrival
    }

    /// Classify a signed delay (arrival minus booking) in minutes.
    pub fn from_minutes(minutes: i64) -> Self {
        match minutes {
            m if m < 0 => DelayKind::EarlyArrival,
            0..=30 => DelayKind::WithinGrace,
            31..=60 => DelayKind::ModerateDelay,
            _ => DelayKind::SignificantDelay,
        }
    }
}

impl fmt::Display for DelayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kinds of booking change a guest can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingChangeKind {
    DifferentDay,
    Earlier,
    TransferTime,
    Reschedule,
    Cancel,
}

impl BookingChangeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingChangeKind::DifferentDay => "different_day",
            BookingChangeKind::Earlier => "earlier",
            BookingChangeKind::TransferTime => "transfer_time",
            BookingChangeKind::Reschedule => "reschedule",
            BookingChangeKind::Cancel => "cancel",
        }
    }
}
