/// Format a prompt section with machine-inspectable delimiters.
pub fn format_section(name: &str, content: &str) -> String {
    format!(
        "\
=== {name} ===
{content}
=== END_{name} ===
"
    )
}

/// One knowledge match, as the model sees it.
pub fn format_knowledge_item(topic: &str, body: &str, duration_override: Option<&str>) -> String {
    match duration_override {
        Some(duration) => format!("[{topic}] {body}\nDURATION: {duration}"),
        None => format!("[{topic}] {body}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_has_delimiters() {
        let s = format_section("KNOWLEDGE", "x");
        assert!(s.starts_with("=== KNOWLEDGE ===\n"));
        assert!(s.trim_end().ends_with("=== END_KNOWLEDGE ==="));
    }
}
