use cg_domain::topic::Topic;
use cg_sessions::ContextUpdate;

use super::canned::{self, SAFETY};
use super::pool::pick;
use super::{Detector, DetectorInput, FastPathMatch};
use crate::text;

/// Matched on accent-folded, normalized text.
const URGENT: &[&str] = &[
    "emergency", "allergic reaction", "anaphylaxis", "cant breathe", "cannot breathe",
    "chest pain", "fainted", "feel faint", "passed out", "unconscious", "bleeding", "burned",
    "severe pain", "call an ambulance", "ambulance", "heart attack", "seizure", "i fell",
    "slipped and fell", "injured", "hurt myself",
    "emergencia", "urgencia", "reaccion alergica", "no puedo respirar", "dolor en el pecho",
    "me he desmayado", "se ha desmayado", "desmayo", "inconsciente", "sangrando", "quemadura",
    "me he quemado", "dolor fuerte", "ambulancia", "infarto", "me he caido", "se ha caido",
    "me he hecho dano", "me he hecho daño", "herido", "herida",
];

pub struct SafetyDetector {
    phone: String,
}

impl SafetyDetector {
    pub fn new(phone: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
        }
    }
}

impl Detector for SafetyDetector {
    fn name(&self) -> &'static str {
        "safety"
    }

    fn detect(&self, input: &DetectorInput<'_>) -> Option<FastPathMatch> {
        if !text::contains_any(&input.folded, URGENT) {
            return None;
        }
        let response = pick(&SAFETY, input.language, &[], |t| canned::fill(t, "", &self.phone));
        Some(FastPathMatch {
            detector: self.name(),
            category: "urgent",
            topic: Topic::Safety,
            response,
            update: ContextUpdate {
                topic: Some(Topic::Safety),
                ..Default::default()
            },
        })
    }
}
