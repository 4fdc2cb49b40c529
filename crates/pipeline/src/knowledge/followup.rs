//! Follow-up cues: anaphora, duration questions, dining questions, and
//! the canned per-topic duration table.

use cg_domain::language::Language;
use cg_domain::topic::Topic;

use crate::text;

/// Matched on accent-folded, normalized text. Bare "este"/"esta" are left
/// out: folded, "esta" is also the verb "está".
const ANAPHORA: &[&str] = &[
    "it", "that", "this", "those", "these", "they", "them", "the same", "you said",
    "you mentioned", "mentioned", "eso", "esto", "ese", "esa", "esos", "esas",
    "lo mismo", "lo que dijiste", "lo que has dicho", "mencionaste",
];

const DURATION: &[&str] = &[
    "how long", "how much time", "duration", "lasts", "cuanto dura", "cuanto tiempo",
    "duracion", "dura",
];

const DINING: &[&str] = &[
    "dinner", "lunch", "breakfast", "food", "menu", "eat", "restaurant", "drinks", "dining",
    "cena", "comida", "almuerzo", "desayuno", "comer", "restaurante", "bebidas",
];

pub fn is_anaphoric(folded: &str) -> bool {
    text::contains_any(folded, ANAPHORA)
}

pub fn is_duration_question(folded: &str) -> bool {
    text::contains_any(folded, DURATION)
}

pub fn is_dining_question(folded: &str) -> bool {
    text::contains_any(folded, DINING)
}

/// Canned duration answer for a remembered topic.
pub fn topic_duration(topic: Topic, language: Language) -> Option<&'static str> {
    let spanish = language == Language::Spanish;
    let answer = match topic {
        Topic::Ritual => {
            if spanish {
                "El ritual dura unos 90 minutos, incluido el tiempo de relajación posterior."
            } else {
                "The ritual takes about 90 minutes, including relaxation time afterwards."
            }
        }
        Topic::Packages => {
            if spanish {
                "Nuestros paquetes duran entre 2 y 3 horas según el que elijáis."
            } else {
                "Our packages last between 2 and 3 hours depending on the one you choose."
            }
        }
        Topic::Facilities => {
            if spanish {
                "El acceso a la zona termal es de 2 horas."
            } else {
                "Access to the thermal area is for 2 hours."
            }
        }
        Topic::Dining => {
            if spanish {
                "La experiencia gastronómica dura aproximadamente una hora."
            } else {
                "The dining experience lasts about an hour."
            }
        }
        Topic::Transportation => {
            if spanish {
                "El traslado desde el centro dura unos 30 minutos."
            } else {
                "The transfer from the city centre takes around 30 minutes."
            }
        }
        _ => return None,
    };
    Some(answer)
}

pub fn package_duration(name: &str, duration: &str, language: Language) -> String {
    match language {
        Language::Spanish => format!("El paquete {name} dura {duration}."),
        _ => format!("The {name} package lasts {duration}."),
    }
}
