//! Strong-evidence language signals.
//!
//! Every entry here must be unambiguous on its own: a word that is common in
//! both languages (`no`, `me`, `hotel`, `spa`, `menu`, `ok`) does not belong
//! in any table.

use cg_domain::language::Language;

pub struct SignalTable {
    pub language: Language,
    /// Characters that only occur in this language's orthography.
    pub diacritics: &'static [char],
    /// Function words and other single tokens.
    pub words: &'static [&'static str],
    /// Multi-word phrases, matched on the normalized message.
    pub phrases: &'static [&'static str],
    /// Greeting tokens that may arrive without any punctuation or context.
    pub greetings: &'static [&'static str],
}

pub const ENGLISH: SignalTable = SignalTable {
    language: Language::English,
    diacritics: &[],
    words: &[
        "the", "and", "is", "are", "was", "what", "where", "when", "how", "why", "which", "who",
        "can", "could", "would", "should", "will", "please", "thanks", "thank", "you", "your",
        "my", "we", "our", "with", "have", "has", "there", "this", "that", "its", "im", "ill",
        "dont", "does", "do", "arrive", "arriving", "late", "booking", "booked", "tomorrow",
        "today", "tonight", "morning", "afternoon", "evening", "much", "time", "any", "want",
        "need", "of", "for", "from", "about", "be", "it", "yes", "bye", "goodbye", "great",
        "cool", "okay", "sure",
    ],
    phrases: &[
        "thank you", "how much", "what time", "do you have", "is there", "are there",
        "i would like", "id like", "can i", "can we", "good morning", "good afternoon",
        "good evening", "good night", "running late", "see you", "how are you", "nice to meet you",
        "on my way", "stuck in traffic", "got it",
    ],
    greetings: &["hi", "hello", "hey", "hiya", "howdy", "heya"],
};

pub const SPANISH: SignalTable = SignalTable {
    language: Language::Spanish,
    diacritics: &['á', 'é', 'í', 'ó', 'ú', 'ñ', 'ü', '¿', '¡'],
    words: &[
        "el", "los", "las", "que", "del", "por", "para", "con", "una", "uno", "unos", "unas",
        "es", "son", "estoy", "estamos", "tengo", "tenemos", "tiene", "hay", "cuanto", "cuando",
        "donde", "gracias", "quiero", "queremos", "puedo", "podemos", "somos", "llego",
        "llegamos", "llegaremos", "vamos", "pero", "muy", "reserva", "hoy", "tarde", "noche",
        "vale", "bueno", "perfecto", "genial", "adios", "nosotros", "usted", "ustedes", "esto",
        "eso", "cual", "como", "tambien", "retraso", "minutos", "horas", "en",
    ],
    phrases: &[
        "por favor", "muchas gracias", "buenos dias", "buenas tardes", "buenas noches",
        "cuanto cuesta", "a que hora", "me gustaria", "llego tarde", "llegamos tarde",
        "hasta luego", "que tal", "como estas", "de nuevo", "otra vez", "mucho gusto",
        "nos vemos", "un placer",
    ],
    greetings: &["hola", "buenas", "holi", "saludos", "ola"],
};

pub const TABLES: &[SignalTable] = &[ENGLISH, SPANISH];
