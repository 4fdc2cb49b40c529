//! Canned reply text. `{venue}` and `{phone}` are substituted by the caller.

use super::pool::Pool;

pub const WELCOME: Pool = Pool {
    en: &[
        "Hello and welcome to {venue}! How can I help you today?",
        "Hi there, welcome to {venue}. What would you like to know?",
    ],
    es: &[
        "¡Hola y bienvenidos a {venue}! ¿En qué os puedo ayudar?",
        "¡Hola! Bienvenidos a {venue}. ¿Qué os gustaría saber?",
    ],
};

pub const GREETING: Pool = Pool {
    en: &["Hello again! What else can I help you with?", "Hi! What can I do for you?"],
    es: &["¡Hola de nuevo! ¿En qué más te puedo ayudar?", "¡Hola! ¿Qué puedo hacer por ti?"],
};

pub const RETURNING_GREETING: Pool = Pool {
    en: &[
        "Welcome back! Where were we?",
        "Good to see you again. How can I help?",
    ],
    es: &[
        "¡Bienvenido de nuevo! ¿Por dónde íbamos?",
        "¡Qué bien verte otra vez! ¿En qué te ayudo?",
    ],
};

pub const SAFETY: Pool = Pool {
    en: &[
        "If this is a medical emergency, please call 112 right away. If you're at the venue, tell any member of staff immediately, or call us on {phone}.",
    ],
    es: &[
        "Si es una emergencia médica, llama al 112 ahora mismo. Si estás en el centro, avisa de inmediato a cualquier miembro del equipo o llámanos al {phone}.",
    ],
};

pub const WELLBEING: Pool = Pool {
    en: &[
        "I'm doing great, thank you for asking! How can I help you today?",
        "All good here, thanks! What can I do for you?",
    ],
    es: &[
        "¡Muy bien, gracias por preguntar! ¿En qué te puedo ayudar?",
        "¡Todo bien por aquí, gracias! ¿Qué necesitas?",
    ],
};

pub const IDENTITY: Pool = Pool {
    en: &["I'm the virtual concierge of {venue}. I can answer questions about our rituals, packages and bookings."],
    es: &["Soy el conserje virtual de {venue}. Puedo resolver dudas sobre rituales, paquetes y reservas."],
};

pub const MEETING: Pool = Pool {
    en: &["Lovely to meet you too! How can I help?", "The pleasure is mine. What would you like to know?"],
    es: &["¡Encantado igualmente! ¿En qué te ayudo?", "El gusto es mío. ¿Qué te gustaría saber?"],
};

pub const RETURNING: Pool = Pool {
    en: &["Welcome back! What else would you like to know?"],
    es: &["¡Bienvenido de nuevo! ¿Qué más te gustaría saber?"],
};

pub const ENDING: Pool = Pool {
    en: &[
        "Thank you for reaching out. We look forward to welcoming you!",
        "Have a wonderful day, and see you soon!",
    ],
    es: &[
        "Gracias por escribirnos. ¡Te esperamos con mucha ilusión!",
        "¡Que tengas un día estupendo, hasta pronto!",
    ],
};

pub const PRAISE: Pool = Pool {
    en: &["That's very kind, thank you! Anything else I can help with?"],
    es: &["¡Qué amable, muchas gracias! ¿Te ayudo con algo más?"],
};

pub const THANKS: Pool = Pool {
    en: &[
        "You're welcome! Anything else I can help with?",
        "My pleasure. Let me know if you need anything else.",
    ],
    es: &[
        "¡De nada! ¿Puedo ayudarte con algo más?",
        "Es un placer. Si necesitas algo más, aquí estoy.",
    ],
};

pub const POSITIVE: Pool = Pool {
    en: &["Great! Is there anything else you'd like to know?", "Wonderful. What else can I do for you?"],
    es: &["¡Genial! ¿Hay algo más que quieras saber?", "Estupendo. ¿Qué más puedo hacer por ti?"],
};

pub const CONTINUITY: Pool = Pool {
    en: &["Sure. Just let me know if you have any other questions.", "Okay! I'm here if you need anything."],
    es: &["Perfecto. Si tienes más preguntas, dímelo.", "¡Vale! Aquí estoy si necesitas algo."],
};

pub const UNKNOWN_TOPIC: Pool = Pool {
    en: &[
        "I'm not sure I have information about that. I can help with our rituals, packages, facilities, dining and bookings, or you can call us on {phone}.",
    ],
    es: &[
        "No estoy seguro de tener información sobre eso. Puedo ayudarte con rituales, paquetes, instalaciones, restauración y reservas, o puedes llamarnos al {phone}.",
    ],
};

pub const CONNECTIVITY_APOLOGY: Pool = Pool {
    en: &["Sorry, I'm having trouble connecting right now. Please try again in a moment or call us on {phone}."],
    es: &["Lo siento, ahora mismo tengo problemas de conexión. Inténtalo de nuevo en un momento o llámanos al {phone}."],
};

pub fn fill(template: &str, venue: &str, phone: &str) -> String {
    template.replace("{venue}", venue).replace("{phone}", phone)
}
