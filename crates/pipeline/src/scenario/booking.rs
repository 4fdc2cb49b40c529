//! Booking-change requests: cancel, different day, earlier, transfer time,
//! or a generic reschedule.

use cg_domain::scenario::BookingChangeKind;

use super::arrival::has_booking_reference;
use super::cues;
use super::time::find_clock_times;
use crate::text::contains_any;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingChange {
    pub kind: BookingChangeKind,
    /// First clock time in the message, `HH:MM`.
    pub original_time: Option<String>,
}

pub fn detect_booking_change(message: &str) -> Option<BookingChange> {
    let text = message.to_lowercase();

    let cancel = contains_any(&text, cues::CANCEL);
    let change = contains_any(&text, cues::CHANGE);
    let booking = contains_any(&text, cues::BOOKING) || has_booking_reference(&text);
    let transfer = contains_any(&text, cues::TRANSFER);

    // A change verb alone ("can I change towels?") is not enough.
    if !(cancel || change) || !(booking || transfer || contains_any(&text, cues::DIFFERENT_DAY)) {
        return None;
    }

    let kind = if cancel && !change {
        BookingChangeKind::Cancel
    } else if transfer {
        BookingChangeKind::TransferTime
    } else if contains_any(&text, cues::DIFFERENT_DAY)
        || text.contains("otro día")
        || text.contains("otro dia")
    {
        BookingChangeKind::DifferentDay
    } else if contains_any(&text, cues::EARLIER) {
        BookingChangeKind::Earlier
    } else {
        BookingChangeKind::Reschedule
    };

    Some(BookingChange {
        kind,
        original_time: find_clock_times(&text).first().map(|t| t.format()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(msg: &str) -> Option<BookingChangeKind> {
        detect_booking_change(msg).map(|c| c.kind)
    }

    #[test]
    fn classifies_change_kinds() {
        assert_eq!(kind("I need to cancel my booking"), Some(BookingChangeKind::Cancel));
        assert_eq!(
            kind("Can I move my booking to another day?"),
            Some(BookingChangeKind::DifferentDay)
        );
        assert_eq!(
            kind("Could we move the appointment earlier?"),
            Some(BookingChangeKind::Earlier)
        );
        assert_eq!(
            kind("Please change the shuttle pickup to 17:00"),
            Some(BookingChangeKind::TransferTime)
        );
        assert_eq!(
            kind("Quiero cambiar mi reserva de las 18:00"),
            Some(BookingChangeKind::Reschedule)
        );
    }

    #[test]
    fn keeps_original_time() {
        let c = detect_booking_change("change my 18:00 booking please").unwrap();
        assert_eq!(c.original_time.as_deref(), Some("18:00"));
    }

    #[test]
    fn change_without_booking_context_is_ignored() {
        assert_eq!(kind("can I change into my robe there?"), None);
        assert_eq!(kind("what is included in the ritual?"), None);
    }
}
