use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed vocabulary of conversation topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Packages,
    Ritual,
    Transportation,
    Facilities,
    Seasonal,
    Dining,
    Booking,
    SmallTalk,
    LateArrival,
    GroupBookings,
    Pricing,
    Hours,
    Safety,
    General,
}

impl Topic {
    pub fn as_str(self) -> &'static str {
        match self {
            Topic::Packages => "packages",
            Topic::Ritual => "ritual",
            Topic::Transportation => "transportation",
            Topic::Facilities => "facilities",
            Topic::Seasonal => "seasonal",
            Topic::Dining => "dining",
            Topic::Booking => "booking",
            Topic::SmallTalk => "small_talk",
            Topic::LateArrival => "late_arrival",
            Topic::GroupBookings => "group_bookings",
            Topic::Pricing => "pricing",
            Topic::Hours => "hours",
            Topic::Safety => "safety",
            Topic::General => "general",
        }
    }

    /// Topics that belong to a booking scenario in progress.  Moving to any
    /// other topic ends the scenario.
    pub fn is_scenario(self) -> bool {
        matches!(self, Topic::LateArrival | Topic::Booking)
    }

    /// Conversational topics that say nothing about the subject; they never
    /// replace the remembered subject topic.
    pub fn is_conversational(self) -> bool {
        matches!(self, Topic::SmallTalk)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
