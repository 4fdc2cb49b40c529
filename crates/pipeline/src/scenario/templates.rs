//! Reply pools for the scenario detectors. `{minutes}` and `{time}` are
//! filled in by [`render`].

use cg_domain::language::Language;
use cg_domain::scenario::{BookingChangeKind, DelayKind};

use crate::fastpath::pool::{pick, Pool};

const FLIGHT_DELAY: Pool = Pool {
    en: &[
        "Sorry to hear about the flight. No need to rush: send us your new arrival time once you know it and we'll rearrange your ritual.",
        "Travel delays happen. As soon as you have a new arrival time, tell us and we'll see what we can move for you.",
    ],
    es: &[
        "Sentimos lo del vuelo. No hace falta correr: en cuanto sepáis la nueva hora de llegada, escribidnos y reorganizamos el ritual.",
        "Los retrasos en los viajes pasan. Cuando tengáis la nueva hora de llegada, avisadnos y vemos qué podemos mover.",
    ],
};

const EARLY_ARRIVAL: Pool = Pool {
    en: &[
        "No problem at all. You're welcome to arrive early and relax in the lounge with a tea until your ritual starts.",
        "Arriving early is perfect. Our lounge is open, so you can unwind before your session begins.",
    ],
    es: &[
        "Ningún problema. Podéis llegar antes y relajaros en la sala con un té hasta que empiece el ritual.",
        "Llegar antes es perfecto. La sala de descanso está abierta para que desconectéis antes de la sesión.",
    ],
};

const WITHIN_GRACE: Pool = Pool {
    en: &[
        "Thanks for letting us know. {minutes} minutes is within our grace period, so your ritual will go ahead as planned.",
        "No worries, a delay of {minutes} minutes is fine. We'll have everything ready when you arrive.",
    ],
    es: &[
        "Gracias por avisar. {minutes} minutos entran en nuestro margen de cortesía, así que el ritual seguirá según lo previsto.",
        "Tranquilos, un retraso de {minutes} minutos no es problema. Lo tendremos todo listo cuando lleguéis.",
    ],
};

const MODERATE_DELAY: Pool = Pool {
    en: &[
        "Thanks for the heads-up. With {minutes} minutes of delay we'll try to shift your ritual a little so you still get the full experience.",
        "Understood. We'll do our best to move your session back by {minutes} minutes so nothing is cut short.",
    ],
    es: &[
        "Gracias por avisar. Con {minutes} minutos de retraso intentaremos mover un poco el ritual para que lo disfrutéis completo.",
        "Entendido. Haremos lo posible por retrasar la sesión {minutes} minutos para que no se acorte.",
    ],
};

const MODERATE_DELAY_SOLD_OUT: Pool = Pool {
    en: &[
        "Thanks for letting us know. We're fully booked today, so with {minutes} minutes of delay your ritual will need to finish at the original time.",
        "Understood. Today is sold out, so we can't push the schedule back; your session will be shortened by about {minutes} minutes.",
    ],
    es: &[
        "Gracias por avisar. Hoy estamos completos, así que con {minutes} minutos de retraso el ritual tendrá que terminar a la hora prevista.",
        "Entendido. Hoy no queda hueco para mover la agenda, así que la sesión se acortará unos {minutes} minutos.",
    ],
};

const SIGNIFICANT_DELAY: Pool = Pool {
    en: &[
        "Thank you for telling us. That is a significant delay, so we'll need to look at rescheduling. Could you share your booking name or reference?",
        "Sorry to hear that. With a delay that long we'll need to rearrange your ritual; please send your booking reference and we'll find the best option.",
    ],
    es: &[
        "Gracias por avisar. Es un retraso importante, así que tendremos que reprogramar. ¿Nos indicas el nombre o el localizador de la reserva?",
        "Lo sentimos. Con tanto retraso habrá que reorganizar el ritual; envíanos el localizador y buscamos la mejor opción.",
    ],
};

const UNSPECIFIED_DELAY: Pool = Pool {
    en: &[
        "Thanks for letting us know. Roughly how late do you think you'll be?",
        "No problem. Could you tell us about what time you expect to arrive?",
    ],
    es: &[
        "Gracias por avisar. ¿Cuánto retraso calculáis, más o menos?",
        "Ningún problema. ¿Sobre qué hora pensáis llegar?",
    ],
};

const CANCEL: Pool = Pool {
    en: &["We're sorry you can't make it. Please send your booking reference and our team will process the cancellation."],
    es: &["Sentimos que no podáis venir. Envíanos el localizador de la reserva y el equipo gestionará la cancelación."],
};

const DIFFERENT_DAY: Pool = Pool {
    en: &["Of course. Which day would suit you better? Please include your booking reference and we'll check availability."],
    es: &["Claro. ¿Qué día os vendría mejor? Indícanos el localizador y comprobamos disponibilidad."],
};

const EARLIER: Pool = Pool {
    en: &["We'll check whether an earlier slot is free. What time would you like, and what is your booking reference?"],
    es: &["Comprobamos si hay un hueco antes. ¿A qué hora os gustaría y cuál es el localizador?"],
};

const TRANSFER_TIME: Pool = Pool {
    en: &["We can adjust your transfer. Please confirm the new pick-up time and your booking reference."],
    es: &["Podemos ajustar el traslado. Confírmanos la nueva hora de recogida y el localizador."],
};

const RESCHEDULE: Pool = Pool {
    en: &[
        "Happy to help change your booking{time}. What new time would you prefer? Please include your booking reference.",
    ],
    es: &["Te ayudamos a cambiar la reserva{time}. ¿Qué nueva hora prefieres? Indícanos el localizador."],
};

pub fn delay_reply(
    kind: DelayKind,
    minutes: Option<i64>,
    sold_out: bool,
    language: Language,
    recent: &[&str],
) -> String {
    let pool = match kind {
        DelayKind::FlightDelay => &FLIGHT_DELAY,
        DelayKind::EarlyArrival => &EARLY_ARRIVAL,
        DelayKind::WithinGrace => &WITHIN_GRACE,
        DelayKind::ModerateDelay if sold_out => &MODERATE_DELAY_SOLD_OUT,
        DelayKind::ModerateDelay => &MODERATE_DELAY,
        DelayKind::SignificantDelay => &SIGNIFICANT_DELAY,
        DelayKind::UnspecifiedDelay => &UNSPECIFIED_DELAY,
    };
    let minutes = minutes.map(|m| m.abs().to_string()).unwrap_or_default();
    pick(pool, language, recent, |t| render(t, &minutes, ""))
}

pub fn booking_change_reply(
    kind: BookingChangeKind,
    original_time: Option<&str>,
    language: Language,
    recent: &[&str],
) -> String {
    let pool = match kind {
        BookingChangeKind::Cancel => &CANCEL,
        BookingChangeKind::DifferentDay => &DIFFERENT_DAY,
        BookingChangeKind::Earlier => &EARLIER,
        BookingChangeKind::TransferTime => &TRANSFER_TIME,
        BookingChangeKind::Reschedule => &RESCHEDULE,
    };
    let time = match (original_time, language) {
        (Some(t), Language::Spanish) => format!(" de las {t}"),
        (Some(t), _) => format!(" at {t}"),
        (None, _) => String::new(),
    };
    pick(pool, language, recent, |t| render(t, "", &time))
}

fn render(template: &str, minutes: &str, time: &str) -> String {
    template.replace("{minutes}", minutes).replace("{time}", time)
}
