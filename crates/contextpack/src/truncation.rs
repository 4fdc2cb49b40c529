/// A section being accumulated for total-cap processing.
pub struct Section {
    pub name: &'static str,
    pub content: String,
    pub raw_chars: usize,
    pub truncated_per_section: bool,
    pub truncated_total_cap: bool,
    pub included: bool,
}

impl Section {
    pub fn new(name: &'static str, content: String, max_chars: usize) -> Self {
        let raw_chars = content.len();
        let (content, truncated) = truncate_section(&content, max_chars);
        Self {
            name,
            content,
            raw_chars,
            truncated_per_section: truncated,
            truncated_total_cap: false,
            included: true,
        }
    }
}

/// Largest char boundary not greater than `index`.
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Per-section truncation.
///
/// If `content` exceeds `max_chars` bytes, cut at the nearest UTF-8 boundary
/// below the limit and append `\n[TRUNCATED]`.
pub fn truncate_section(content: &str, max_chars: usize) -> (String, bool) {
    if content.len() <= max_chars {
        return (content.to_string(), false);
    }
    let boundary = floor_char_boundary(content, max_chars);
    let mut result = content[..boundary].trim_end().to_string();
    result.push_str("\n[TRUNCATED]");
    (result, true)
}

/// Apply the total cap across sections in order. Later sections are cut
/// first; a section that no longer fits at all is dropped.
pub fn apply_total_cap(sections: &mut [Section], total_max_chars: usize) {
    let mut accumulated: usize = 0;

    for section in sections.iter_mut() {
        if !section.included {
            continue;
        }

        let section_len = section.content.len();

        if accumulated + section_len <= total_max_chars {
            accumulated += section_len;
        } else if accumulated < total_max_chars {
            let remaining = total_max_chars - accumulated;
            let boundary = floor_char_boundary(&section.content, remaining);
            section.content = format!("{}\n[TRUNCATED]", section.content[..boundary].trim_end());
            section.truncated_total_cap = true;
            accumulated = total_max_chars;
        } else {
            section.content.clear();
            section.included = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_truncation_when_under_limit() {
        let (result, truncated) = truncate_section("hello world", 100);
        assert_eq!(result, "hello world");
        assert!(!truncated);
    }

    #[test]
    fn truncates_at_char_boundary() {
        // "ñ" is two bytes; cutting at 3 must not split it.
        let (result, truncated) = truncate_section("añño", 3);
        assert!(truncated);
        assert!(result.starts_with("añ"));
        assert!(result.ends_with("[TRUNCATED]"));
    }

    #[test]
    fn total_cap_drops_overflow() {
        let mut sections = vec![
            Section::new("A", "aaaa".into(), 100),
            Section::new("B", "bbbbbb".into(), 100),
            Section::new("C", "cccc".into(), 100),
        ];

        apply_total_cap(&mut sections, 8);

        assert!(sections[0].included);
        assert!(!sections[0].truncated_total_cap);
        assert!(sections[1].included);
        assert!(sections[1].truncated_total_cap);
        assert!(!sections[2].included);
    }
}
