//! Arrival-delay state machine.
//!
//! First match wins:
//! 1. transit disruption with no usable time → `FlightDelay`
//! 2. (exclusions: different day, transfer change, reference + change,
//!    move earlier → no result; the booking-change detector takes these)
//! 3. two clock times read as booking and arrival → thresholds on the gap
//! 4. one duration plus a lateness or earliness cue → thresholds
//! 5. "very late" → `SignificantDelay`
//! 6. bare lateness cue → `UnspecifiedDelay`
//!
//! Hypothetical questions ("what happens if I'm late?") never report a
//! delay. A bare "late" or "delay" needs the guest talking about their own
//! trip and does not count inside a question about the venue.

use std::sync::LazyLock;

use regex::Regex;

use cg_domain::scenario::DelayKind;

use super::cues;
use super::time::{find_clock_times, find_duration_minutes, minutes_between, ClockTime};
use crate::text::{contains_any, contains_phrase};

/// Booking codes like `AB-12345`, `CGX1234` or six or more digits.
static REFERENCE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:[a-z]{2,4}-?\d{4,}|\d{6,})\b").expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayDetection {
    pub kind: DelayKind,
    /// Signed minutes (negative for early), when known.
    pub minutes: Option<i64>,
}

impl DelayDetection {
    fn new(kind: DelayKind, minutes: Option<i64>) -> Self {
        Self { kind, minutes }
    }

    fn from_minutes(minutes: i64) -> Self {
        Self::new(DelayKind::from_minutes(minutes), Some(minutes))
    }
}

/// Run the state machine over a raw guest message.
pub fn detect_arrival_delay(message: &str) -> Option<DelayDetection> {
    let text = message.to_lowercase().replace('’', "'");
    let times = find_clock_times(&text);
    let duration = find_duration_minutes(&text);
    let late = has_lateness(&text);

    if contains_any(&text, cues::TRANSIT)
        && contains_any(&text, cues::TRANSIT_DISRUPTION)
        && times.is_empty()
        && duration.is_none()
    {
        return Some(DelayDetection::new(DelayKind::FlightDelay, None));
    }

    if is_booking_change_request(&text, late) {
        return None;
    }

    if times.len() >= 2 && (late || contains_any(&text, cues::ARRIVAL)) {
        let (booking, arrival) = assign_roles(&text, &times);
        return Some(DelayDetection::from_minutes(minutes_between(&booking, &arrival)));
    }

    if let Some(minutes) = duration {
        if late {
            return Some(DelayDetection::from_minutes(minutes));
        }
        if contains_any(&text, cues::EARLY) {
            return Some(DelayDetection::new(DelayKind::EarlyArrival, Some(-minutes)));
        }
    }

    if late && contains_any(&text, cues::VERY_LATE) {
        return Some(DelayDetection::new(DelayKind::SignificantDelay, None));
    }

    if late {
        return Some(DelayDetection::new(DelayKind::UnspecifiedDelay, None));
    }

    None
}

fn has_lateness(text: &str) -> bool {
    if contains_any(text, cues::HYPOTHETICAL) {
        return false;
    }
    if contains_any(text, cues::LATENESS) {
        return true;
    }
    let bare = contains_any(text, cues::LATE_WORDS) || contains_any(text, cues::VERY_LATE);
    let own_trip = contains_any(text, cues::LATE_CONTEXT)
        || contains_any(text, cues::ARRIVAL)
        || contains_any(text, cues::TRANSIT);
    bare && own_trip && !contains_any(text, cues::GENERAL_QUESTION)
}

/// Requests the booking-change flow owns. Any of these forces "no delay".
pub fn is_booking_change_request(text: &str, late: bool) -> bool {
    let change = contains_any(text, cues::CHANGE) || contains_any(text, cues::CANCEL);

    let different_day = contains_phrase(text, "another day")
        || contains_phrase(text, "otro día")
        || contains_phrase(text, "otro dia")
        || (change && contains_any(text, cues::DIFFERENT_DAY));
    let transfer_change = change && contains_any(text, cues::TRANSFER) && !late;
    let reference_change = change && has_booking_reference(text);
    let move_earlier = contains_any(text, cues::EARLIER) && (change || contains_any(text, cues::BOOKING));

    different_day || transfer_change || reference_change || move_earlier
}

pub fn has_booking_reference(text: &str) -> bool {
    contains_any(text, cues::REFERENCE) || REFERENCE_CODE_RE.is_match(text)
}

/// Decide which of the first two times is the booking. A time preceded by a
/// booking cue is the booking; one preceded by an arrival cue is the
/// arrival. Without cues the first mentioned time is the booking.
fn assign_roles(text: &str, times: &[ClockTime]) -> (ClockTime, ClockTime) {
    let first = times[0];
    let second = times[1];

    let second_window = &text[first.start..second.start];
    let first_window = &text[..first.start];

    let first_is_arrival = contains_any(first_window, cues::ARRIVAL)
        && !contains_any(first_window, cues::BOOKING);
    let second_is_booking = contains_any(second_window, cues::BOOKING)
        && !contains_any(second_window, cues::ARRIVAL);

    if first_is_arrival || second_is_booking {
        (second, first)
    } else {
        (first, second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(msg: &str) -> Option<DelayKind> {
        detect_arrival_delay(msg).map(|d| d.kind)
    }

    #[test]
    fn booking_and_arrival_thresholds() {
        let d = detect_arrival_delay("My booking is at 18:00 but I will arrive at 18:45").unwrap();
        assert_eq!(d.kind, DelayKind::ModerateDelay);
        assert_eq!(d.minutes, Some(45));

        assert_eq!(
            kind("My booking is at 18:00, I will arrive at 17:50"),
            Some(DelayKind::EarlyArrival)
        );
        assert_eq!(
            kind("Booking at 18:00, arrival at 18:15"),
            Some(DelayKind::WithinGrace)
        );
        assert_eq!(
            kind("Booking at 18:00, arrival at 20:00"),
            Some(DelayKind::SignificantDelay)
        );
    }

    #[test]
    fn arrival_mentioned_first() {
        let d = detect_arrival_delay("I'll arrive at 19:10, my appointment was at 18:30").unwrap();
        assert_eq!(d.minutes, Some(40));
    }

    #[test]
    fn opening_hours_are_not_a_delay() {
        assert_eq!(kind("Are you open between 10:00 and 22:00?"), None);
    }

    #[test]
    fn flight_delay_without_time() {
        let d = detect_arrival_delay("Our flight has been delayed, no idea when we land").unwrap();
        assert_eq!(d.kind, DelayKind::FlightDelay);
        assert_eq!(d.minutes, None);
        assert_eq!(kind("El vuelo viene con retraso"), Some(DelayKind::FlightDelay));
    }

    #[test]
    fn flight_delay_with_duration_is_quantified() {
        let d = detect_arrival_delay("flight delayed by 2 hours").unwrap();
        assert_eq!(d.kind, DelayKind::SignificantDelay);
        assert_eq!(d.minutes, Some(120));
    }

    #[test]
    fn duration_needs_a_lateness_cue() {
        assert_eq!(kind("running 20 minutes late"), Some(DelayKind::WithinGrace));
        assert_eq!(kind("llegamos tarde, unos 45 minutos"), Some(DelayKind::ModerateDelay));
        assert_eq!(kind("the ritual lasts 90 minutes"), None);
        assert_eq!(
            kind("we will be 15 minutes early"),
            Some(DelayKind::EarlyArrival)
        );
    }

    #[test]
    fn qualitative_and_bare_lateness() {
        assert_eq!(kind("we're going to be very late"), Some(DelayKind::SignificantDelay));
        assert_eq!(kind("sorry, running late!"), Some(DelayKind::UnspecifiedDelay));
        assert_eq!(kind("Llego tarde"), Some(DelayKind::UnspecifiedDelay));
    }

    #[test]
    fn venue_and_policy_questions_are_not_lateness() {
        assert_eq!(kind("Are you open late?"), None);
        assert_eq!(kind("What happens if I'm late?"), None);
        assert_eq!(kind("What happens if I’m late?"), None);
        assert_eq!(kind("Is there any delay on the shuttle today?"), None);
        assert_eq!(kind("¿Qué pasa si llego tarde?"), None);
        assert_eq!(kind("Do you stay open late on Fridays?"), None);
    }

    #[test]
    fn first_person_lateness_still_counts() {
        assert_eq!(kind("we'll be late, are you open until 22:00"), Some(DelayKind::UnspecifiedDelay));
        assert_eq!(kind("I'm late, sorry"), Some(DelayKind::UnspecifiedDelay));
        assert_eq!(kind("our train is delayed"), Some(DelayKind::FlightDelay));
        assert_eq!(kind("vamos con retraso"), Some(DelayKind::UnspecifiedDelay));
    }

    #[test]
    fn absurd_duration_falls_back_to_unspecified() {
        assert_eq!(
            kind("we will be 999999999999999999 hours late"),
            Some(DelayKind::UnspecifiedDelay)
        );
    }

    #[test]
    fn spanish_afternoon_is_not_lateness() {
        assert_eq!(kind("¿Tenéis hueco esta tarde?"), None);
        assert_eq!(kind("buenas tardes"), None);
    }

    #[test]
    fn exclusions_defer_to_booking_change() {
        assert_eq!(kind("Can I move my booking to another day? I'll be late"), None);
        assert_eq!(kind("Please change the shuttle pickup to 17:00 instead of 16:00"), None);
        assert_eq!(kind("Booking reference CG-48213, I need to change it, running late"), None);
        assert_eq!(kind("Could we move the appointment earlier?"), None);
        assert_eq!(kind("Quiero cambiar la reserva a otro día"), None);
    }

    #[test]
    fn transfer_with_lateness_is_still_a_delay() {
        assert_eq!(
            kind("the shuttle is late, can we change plans"),
            Some(DelayKind::UnspecifiedDelay)
        );
    }
}
