//! Clock-time and duration expressions in English and Spanish.

use std::sync::LazyLock;

use regex::Regex;

const DAY: i64 = 24 * 60;
const HALF_DAY: i64 = 12 * 60;

/// `18:45`, `6.45pm`, `18h30`, `7 pm`, `a las 8`, `las 20`.
static CLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        \b(?P<h>\d{1,2})(?:[:.h](?P<m>[0-5]\d))\s*(?P<mer>a\.?m\.?|p\.?m\.?)?(?:\b|$)
        | \b(?P<h2>\d{1,2})\s*(?P<mer2>a\.?m\.?|p\.?m\.?)(?:\b|$)
        | \blas\s+(?P<h3>\d{1,2})\b
        ",
    )
    .expect("valid regex")
});

/// A clock time found in a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    /// Minutes after midnight, 0..1440.
    pub minutes: i64,
    /// Byte offset in the searched text.
    pub start: usize,
    /// No am/pm marker and an hour of 1..=11: could be either half of the day.
    pub ambiguous: bool,
}

impl ClockTime {
    pub fn format(&self) -> String {
        format!("{:02}:{:02}", self.minutes / 60, self.minutes % 60)
    }

    fn candidates(&self) -> Vec<i64> {
        if self.ambiguous {
            vec![self.minutes, self.minutes + HALF_DAY]
        } else {
            vec![self.minutes]
        }
    }
}

/// Every clock time in `text` (expected lowercase), in order of appearance.
pub fn find_clock_times(text: &str) -> Vec<ClockTime> {
    let mut out = Vec::new();
    for caps in CLOCK_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let hour_match = caps.name("h").or_else(|| caps.name("h2")).or_else(|| caps.name("h3"));
        let Some(hour) = hour_match.and_then(|m| m.as_str().parse::<i64>().ok()) else {
            continue;
        };
        let minute = caps
            .name("m")
            .and_then(|m| m.as_str().parse::<i64>().ok())
            .unwrap_or(0);
        let meridiem = caps
            .name("mer")
            .or_else(|| caps.name("mer2"))
            .map(|m| m.as_str().starts_with('p'));

        let hour24 = match meridiem {
            Some(true) if (1..=11).contains(&hour) => hour + 12,
            Some(false) if hour == 12 => 0,
            Some(_) if !(1..=12).contains(&hour) => continue,
            _ => hour,
        };
        if hour24 > 23 {
            continue;
        }

        out.push(ClockTime {
            minutes: hour24 * 60 + minute,
            start: whole.start(),
            ambiguous: meridiem.is_none() && (1..=11).contains(&hour),
        });
    }
    out
}

/// Signed minutes from `booking` to `arrival`, resolving day wrap and
/// missing am/pm by picking the reading closest to zero.
pub fn minutes_between(booking: &ClockTime, arrival: &ClockTime) -> i64 {
    let mut best: Option<i64> = None;
    for b in booking.candidates() {
        for a in arrival.candidates() {
            let diff = wrap(a - b);
            if best.map_or(true, |cur| diff.abs() < cur.abs()) {
                best = Some(diff);
            }
        }
    }
    best.unwrap_or(0)
}

/// Fold a difference into (-12h, 12h].
fn wrap(mut diff: i64) -> i64 {
    while diff <= -HALF_DAY {
        diff += DAY;
    }
    while diff > HALF_DAY {
        diff -= DAY;
    }
    diff
}

// ── durations ───────────────────────────────────────────────────────

static HOURS_AND_MINUTES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?P<h>\d+|an?|one|two|three|una?|dos|tres)\s*(?:hours?|hrs?|h|horas?)\s*(?:and|y|,)?\s*(?P<m>\d+)\s*(?:minutes?|mins?|minutos?|m)\b",
    )
    .expect("valid regex")
});

static HOUR_AND_HALF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:(?:an?|one|1|una)\s+)?(?:hour|hora)\s*(?:and|y)\s*(?:a\s+)?(?:half|media)\b")
        .expect("valid regex")
});

static DECIMAL_HOURS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?P<n>\d+[.,]\d+)\s*(?:hours?|hrs?|h|horas?)\b").expect("valid regex")
});

static HOURS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?P<n>\d+|an?|one|two|three|four|una?|dos|tres|cuatro)\s*(?:hours?|hrs?|horas?)\b")
        .expect("valid regex")
});

static HALF_HOUR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:half\s+an\s+hour|half\s+hour|half-hour|media\s+hora)\b").expect("valid regex")
});

static QUARTER_HOUR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:(?:a\s+)?quarter\s+(?:of\s+an\s+)?hour|(?:un\s+)?cuarto\s+de\s+hora)\b")
        .expect("valid regex")
});

static MINUTES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?P<n>\d+|five|ten|fifteen|twenty|twenty-five|thirty|forty|forty-five|fifty|cinco|diez|quince|veinte|veinticinco|treinta|cuarenta|cincuenta)\s*(?:minutes?|mins?|min|minutos?)\b",
    )
    .expect("valid regex")
});

fn number_word(word: &str) -> Option<i64> {
    let n = match word {
        "a" | "an" | "one" | "un" | "una" => 1,
        "two" | "dos" => 2,
        "three" | "tres" => 3,
        "four" | "cuatro" => 4,
        "five" | "cinco" => 5,
        "ten" | "diez" => 10,
        "fifteen" | "quince" => 15,
        "twenty" | "veinte" => 20,
        "twenty-five" | "veinticinco" => 25,
        "thirty" | "treinta" => 30,
        "forty" | "cuarenta" => 40,
        "forty-five" => 45,
        "fifty" | "cincuenta" => 50,
        other => return other.parse().ok(),
    };
    Some(n)
}

/// The first relative duration in `text` (lowercase), in minutes.
pub fn find_duration_minutes(text: &str) -> Option<i64> {
    find_raw_duration(text).filter(|m| (0..=DAY).contains(m))
}

/// Durations longer than a day are not arrival estimates; they are dropped
/// by [`find_duration_minutes`] and the arithmetic here never overflows.
fn find_raw_duration(text: &str) -> Option<i64> {
    if let Some(c) = HOURS_AND_MINUTES_RE.captures(text) {
        let h = number_word(&c["h"])?;
        let m: i64 = c["m"].parse().ok()?;
        return h.checked_mul(60)?.checked_add(m);
    }
    if HOUR_AND_HALF_RE.is_match(text) {
        return Some(90);
    }
    if let Some(c) = DECIMAL_HOURS_RE.captures(text) {
        let hours: f64 = c["n"].replace(',', ".").parse().ok()?;
        let minutes = (hours * 60.0).round();
        return (minutes <= DAY as f64).then_some(minutes as i64);
    }
    if HALF_HOUR_RE.is_match(text) {
        return Some(30);
    }
    if QUARTER_HOUR_RE.is_match(text) {
        return Some(15);
    }
    if let Some(c) = HOURS_RE.captures(text) {
        return number_word(&c["n"])?.checked_mul(60);
    }
    if let Some(c) = MINUTES_RE.captures(text) {
        return number_word(&c["n"]);
    }
    None
}
