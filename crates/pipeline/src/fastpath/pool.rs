//! Canned reply pools and repeat avoidance.

use cg_domain::language::Language;

/// One reply pool in both languages.
pub struct Pool {
    pub en: &'static [&'static str],
    pub es: &'static [&'static str],
}

impl Pool {
    /// `Unknown` falls back to English.
    pub fn for_language(&self, language: Language) -> &'static [&'static str] {
        match language {
            Language::Spanish => self.es,
            Language::English | Language::Unknown => self.en,
        }
    }
}

/// The first rendered variant not among `recent`; if every variant was used
/// recently, the one used longest ago.
pub fn pick(
    pool: &Pool,
    language: Language,
    recent: &[&str],
    render: impl Fn(&str) -> String,
) -> String {
    let rendered: Vec<String> = pool.for_language(language).iter().map(|t| render(t)).collect();

    if let Some(fresh) = rendered.iter().find(|r| !recent.contains(&r.as_str())) {
        return fresh.clone();
    }

    // `recent` is most-recent-first, so the variant with the highest index
    // was used longest ago.
    rendered
        .into_iter()
        .max_by_key(|r| recent.iter().position(|p| p == r).unwrap_or(usize::MAX))
        .unwrap_or_default()
}

/// Plain pick with no placeholders.
pub fn pick_plain(pool: &Pool, language: Language, recent: &[&str]) -> String {
    pick(pool, language, recent, str::to_owned)
}
