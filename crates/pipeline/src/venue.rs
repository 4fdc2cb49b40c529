//! Venue-local clock and the facts injected into prompts.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use cg_contextpack::VenueFacts;
use cg_domain::config::VenueConfig;
use cg_domain::error::{Error, Result};
use cg_domain::language::Language;
use cg_sessions::{Season, SessionContext, SessionSeed};

#[derive(Debug, Clone)]
pub struct VenueClock {
    name: String,
    phone: String,
    timezone: Tz,
    sold_out: bool,
}

impl VenueClock {
    pub fn from_config(config: &VenueConfig) -> Result<Self> {
        let timezone: Tz = config
            .timezone
            .parse()
            .map_err(|e| Error::Config(format!("venue.timezone {:?}: {e}", config.timezone)))?;
        Ok(Self {
            name: config.name.clone(),
            phone: config.phone.clone(),
            timezone,
            sold_out: config.sold_out,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn local(&self, now: DateTime<Utc>) -> DateTime<Tz> {
        now.with_timezone(&self.timezone)
    }

    pub fn season_at(&self, now: DateTime<Utc>) -> Season {
        Season::from_date(self.local(now).date_naive())
    }

    /// Seed for a session created at `now`.
    pub fn seed(&self, now: DateTime<Utc>) -> SessionSeed {
        SessionSeed {
            language: Language::Unknown,
            season: self.season_at(now),
            sold_out: self.sold_out,
        }
    }

    pub fn facts(&self, language: Language, now: DateTime<Utc>, session: &SessionContext) -> VenueFacts {
        VenueFacts {
            name: self.name.clone(),
            local_time: self.local(now).format("%A %Y-%m-%d %H:%M").to_string(),
            season: season_name(session.seasonal.season, language).to_owned(),
            sold_out: session.seasonal.sold_out,
            phone: self.phone.clone(),
        }
    }
}

fn season_name(season: Season, language: Language) -> &'static str {
    match (season, language) {
        (Season::Winter, Language::Spanish) => "invierno",
        (Season::Spring, Language::Spanish) => "primavera",
        (Season::Summer, Language::Spanish) => "verano",
        (Season::Autumn, Language::Spanish) => "otoño",
        (other, _) => other.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn clock(tz: &str) -> Result<VenueClock> {
        VenueClock::from_config(&VenueConfig {
            timezone: tz.into(),
            ..Default::default()
        })
    }

    #[test]
    fn rejects_unknown_timezone() {
        assert!(matches!(clock("Mars/Olympus"), Err(Error::Config(_))));
    }

    #[test]
    fn season_follows_local_date() {
        let clock = clock("Pacific/Auckland").unwrap();
        // 31 May 13:00 UTC is already 1 June in Auckland.
        let now = Utc.with_ymd_and_hms(2024, 5, 31, 13, 0, 0).unwrap();
        assert_eq!(clock.season_at(now), Season::Summer);
    }

    #[test]
    fn facts_are_localized() {
        let clock = clock("Europe/Madrid").unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
        let session = SessionContext::new("s", clock.seed(now), now);
        let facts = clock.facts(Language::Spanish, now, &session);
        assert_eq!(facts.season, "invierno");
        assert!(facts.local_time.ends_with("10:00"));
    }
}
