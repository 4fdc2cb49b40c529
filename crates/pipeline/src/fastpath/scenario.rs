//! Fast-path adapters over the scenario state machines.

use cg_domain::topic::Topic;
use cg_sessions::{BookingChangeUpdate, ContextUpdate, DelayUpdate};

use super::{Detector, DetectorInput, FastPathMatch};
use crate::scenario::{detect_arrival_delay, detect_booking_change, templates};

pub struct ArrivalDelayDetector;

impl Detector for ArrivalDelayDetector {
    fn name(&self) -> &'static str {
        "arrival_delay"
    }

    fn detect(&self, input: &DetectorInput<'_>) -> Option<FastPathMatch> {
        let detection = detect_arrival_delay(input.message)?;
        let response = templates::delay_reply(
            detection.kind,
            detection.minutes,
            input.session.seasonal.sold_out,
            input.language,
            &input.recent_responses(),
        );
        Some(FastPathMatch {
            detector: self.name(),
            category: detection.kind.as_str(),
            topic: Topic::LateArrival,
            response,
            update: ContextUpdate {
                topic: Some(Topic::LateArrival),
                late_arrival: Some(DelayUpdate {
                    kind: detection.kind,
                    minutes: detection.minutes,
                }),
                ..Default::default()
            },
        })
    }
}

pub struct BookingModificationDetector;

impl Detector for BookingModificationDetector {
    fn name(&self) -> &'static str {
        "booking_modification"
    }

    fn detect(&self, input: &DetectorInput<'_>) -> Option<FastPathMatch> {
        let change = detect_booking_change(input.message)?;
        let response = templates::booking_change_reply(
            change.kind,
            change.original_time.as_deref(),
            input.language,
            &input.recent_responses(),
        );
        Some(FastPathMatch {
            detector: self.name(),
            category: change.kind.as_str(),
            topic: Topic::Booking,
            response,
            update: ContextUpdate {
                topic: Some(Topic::Booking),
                booking_modification: Some(BookingChangeUpdate {
                    kind: change.kind,
                    original_time: change.original_time,
                }),
                ..Default::default()
            },
        })
    }
}
