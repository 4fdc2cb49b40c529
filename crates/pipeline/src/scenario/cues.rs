//! Phrase tables for the arrival-delay and booking-change detectors.
//!
//! Matching is whole-word on lowercase text. Spanish "tarde" only counts
//! inside an arrival phrase, since on its own it means "afternoon".

/// Phrases that report lateness on their own.
pub const LATENESS: &[&str] = &[
    "running late", "running behind", "behind schedule", "stuck in traffic", "held up",
    "won't make it on time", "wont make it on time", "not make it on time", "be late",
    "be a bit late", "be a little late", "be delayed", "i'm late", "im late", "i am late",
    "we're late", "we are late", "llego tarde", "llegamos tarde", "llegaré tarde",
    "llegare tarde", "llegaremos tarde", "voy tarde", "vamos tarde", "un poco tarde",
    "voy con retraso", "vamos con retraso", "llego con retraso", "llegamos con retraso",
    "en un atasco", "atascado", "atascados",
];

/// Bare lateness words. They only count next to a [`LATE_CONTEXT`] cue
/// and outside a [`GENERAL_QUESTION`].
pub const LATE_WORDS: &[&str] = &[
    "late", "delay", "delayed", "delays", "retraso", "retrasado", "retrasada", "retrasados",
    "atrasado", "atrasada", "atrasados", "demora", "con demora",
];

pub const VERY_LATE: &[&str] = &[
    "very late", "really late", "extremely late", "super late", "quite late", "so late",
    "muy tarde", "bastante tarde", "mucho retraso", "muchísimo retraso", "muy retrasado",
    "muy retrasados",
];

/// The guest talking about their own trip.
pub const LATE_CONTEXT: &[&str] = &[
    "i", "i'm", "im", "i am", "i'll", "i will", "we", "we're", "we'll", "we are", "we will",
    "us", "my", "our", "me", "running", "voy", "vamos", "estoy", "estamos", "vengo", "venimos",
    "llevo", "llevamos", "mi", "nuestro", "nuestra", "nuestros", "nos",
];

/// Questions about the venue rather than reports about the guest.
pub const GENERAL_QUESTION: &[&str] = &[
    "are you open", "are you", "is there", "are there", "do you", "policy", "what is your",
    "what's your", "whats your", "estáis abiertos", "estais abiertos", "abrís", "abris",
    "hay algún", "hay algun", "hay retraso", "tenéis", "teneis", "política", "politica",
];

/// "What if I'm late?" asks about a rule, it does not report a delay.
pub const HYPOTHETICAL: &[&str] = &[
    "what happens if", "what if", "in case", "if i'm late", "if im late", "if i am late",
    "if we're late", "if we are late", "if i arrive late", "if we arrive late",
    "qué pasa si", "que pasa si", "y si llego", "y si llegamos", "si llego tarde",
    "si llegamos tarde", "en caso de",
];

pub const EARLY: &[&str] = &[
    "early", "ahead of time", "before my booking", "before our booking", "temprano",
    "antes de tiempo", "antes de la hora", "con antelación",
];

pub const TRANSIT: &[&str] = &[
    "flight", "plane", "train", "ferry", "coach", "connection", "vuelo", "avión", "avion",
    "tren", "ferri", "conexión", "autobús", "autobus",
];

pub const TRANSIT_DISRUPTION: &[&str] = &[
    "delayed", "delay", "cancelled", "canceled", "late", "diverted", "retrasado", "retrasada",
    "retraso", "cancelado", "cancelada", "desviado",
];

pub const ARRIVAL: &[&str] = &[
    "arrive", "arriving", "arrival", "get there", "get in", "be there", "land", "landing",
    "make it", "llego", "llegaré", "llegare", "llegamos", "llegaremos", "llegada", "estaré",
    "estare", "estaremos", "aterrizo", "aterrizamos",
];

pub const BOOKING: &[&str] = &[
    "booking", "booked", "reservation", "reserved", "appointment", "session", "slot",
    "treatment", "reserva", "reservado", "reservada", "cita", "sesión", "tratamiento", "turno",
];

pub const CHANGE: &[&str] = &[
    "change", "move", "reschedule", "switch", "postpone", "modify", "push back", "bring forward",
    "cambiar", "cambio", "mover", "aplazar", "posponer", "pasar", "modificar", "retrasar",
    "adelantar",
];

pub const CANCEL: &[&str] = &["cancel", "cancellation", "cancelar", "anular", "cancelación"];

pub const DIFFERENT_DAY: &[&str] = &[
    "another day", "different day", "other day", "next week", "next weekend", "tomorrow instead",
    "a later date", "another date", "different date", "monday", "tuesday", "wednesday",
    "thursday", "friday", "saturday", "sunday", "otro día", "otro dia", "otra fecha",
    "la semana que viene", "la próxima semana", "el lunes", "el martes", "el miércoles",
    "el jueves", "el viernes", "el sábado", "el domingo", "pasado mañana",
];

pub const TRANSFER: &[&str] = &[
    "transfer", "shuttle", "pickup", "pick-up", "pick up", "driver", "traslado", "recogida",
    "lanzadera", "conductor", "chófer", "chofer",
];

pub const EARLIER: &[&str] = &[
    "earlier", "sooner", "bring forward", "move forward", "más temprano", "mas temprano",
    "adelantar", "antes",
];

pub const REFERENCE: &[&str] = &[
    "booking reference", "booking number", "reservation number", "confirmation number",
    "reference number", "localizador", "número de reserva", "numero de reserva",
    "código de reserva", "codigo de reserva",
];
