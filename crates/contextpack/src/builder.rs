use cg_domain::knowledge::KnowledgeMatch;
use cg_domain::language::Language;
use cg_domain::prompt::{HistoryTurn, PromptBundle};

use crate::injection;
use crate::report::{PromptReport, SectionReport};
use crate::style;
use crate::truncation::{self, Section};

/// Time-sensitive facts about the venue, already rendered for the guest's
/// locale by the caller.
#[derive(Debug, Clone)]
pub struct VenueFacts {
    pub name: String,
    pub local_time: String,
    pub season: String,
    pub sold_out: bool,
    pub phone: String,
}

impl VenueFacts {
    fn render(&self) -> String {
        format!(
            "VENUE: {}\nLOCAL_TIME: {}\nSEASON: {}\nSOLD_OUT_TODAY: {}\nPHONE: {}",
            self.name, self.local_time, self.season, self.sold_out, self.phone
        )
    }
}

/// Everything the builder needs for one turn.
pub struct PromptInputs<'a> {
    pub language: Language,
    pub venue: &'a VenueFacts,
    pub knowledge: &'a [KnowledgeMatch],
    /// Open scenario notes (arrival delay, booking change), one per line.
    pub scenario: Vec<String>,
    pub history: Vec<HistoryTurn>,
    pub user_message: &'a str,
}

/// Deterministic prompt builder with per-section and total caps.
pub struct PromptBuilder {
    pub max_per_section: usize,
    pub total_max: usize,
    pub max_history_turns: usize,
    pub max_turn_chars: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self {
            max_per_section: 4_000,
            total_max: 12_000,
            max_history_turns: 20,
            max_turn_chars: 600,
        }
    }
}

impl PromptBuilder {
    pub fn build(&self, inputs: PromptInputs<'_>) -> (PromptBundle, PromptReport) {
        let knowledge_text = render_knowledge(inputs.knowledge);

        let mut sections = vec![
            Section::new("STYLE_RULES", style::style_rules(inputs.language), self.max_per_section),
            Section::new("VENUE_FACTS", inputs.venue.render(), self.max_per_section),
        ];
        if !knowledge_text.is_empty() {
            sections.push(Section::new("KNOWLEDGE", knowledge_text, self.max_per_section));
        }
        if !inputs.scenario.is_empty() {
            sections.push(Section::new("SCENARIO", inputs.scenario.join("\n"), self.max_per_section));
        }

        truncation::apply_total_cap(&mut sections, self.total_max);

        let mut system = String::new();
        let mut reports = Vec::with_capacity(sections.len() + 1);
        for section in &sections {
            if section.included {
                system.push_str(&injection::format_section(section.name, &section.content));
                system.push('\n');
            }
            reports.push(SectionReport {
                name: section.name.to_string(),
                raw_chars: section.raw_chars,
                injected_chars: if section.included { section.content.len() } else { 0 },
                truncated_per_section: section.truncated_per_section,
                truncated_total_cap: section.truncated_total_cap,
                included: section.included,
            });
        }

        let (history, history_report) = self.bound_history(inputs.history);
        reports.push(history_report);

        let report = PromptReport {
            sections: reports,
            knowledge_items: inputs.knowledge.len(),
            history_turns: history.len(),
            total_system_chars: system.len(),
        };

        let bundle = PromptBundle {
            system: system.trim_end().to_string(),
            history,
            user_message: inputs.user_message.to_string(),
            language: inputs.language,
        };
        (bundle, report)
    }

    /// Keep the most recent turns, each capped in length.
    fn bound_history(&self, turns: Vec<HistoryTurn>) -> (Vec<HistoryTurn>, SectionReport) {
        let raw_chars: usize = turns.iter().map(|t| t.text.len()).sum();
        let skip = turns.len().saturating_sub(self.max_history_turns);
        let mut truncated = skip > 0;

        let kept: Vec<HistoryTurn> = turns
            .into_iter()
            .skip(skip)
            .map(|turn| {
                let (text, cut) = truncation::truncate_section(&turn.text, self.max_turn_chars);
                truncated |= cut;
                HistoryTurn {
                    speaker: turn.speaker,
                    text,
                }
            })
            .collect();

        let injected_chars = kept.iter().map(|t| t.text.len()).sum();
        let report = SectionReport {
            name: "HISTORY".into(),
            raw_chars,
            injected_chars,
            truncated_per_section: truncated,
            truncated_total_cap: false,
            included: !kept.is_empty(),
        };
        (kept, report)
    }
}

/// Matches with a priority come first (lowest number first); the rest keep
/// source order.
fn render_knowledge(matches: &[KnowledgeMatch]) -> String {
    let mut ordered: Vec<&KnowledgeMatch> = matches.iter().collect();
    ordered.sort_by_key(|m| m.priority.unwrap_or(u8::MAX));

    ordered
        .iter()
        .map(|m| {
            let body = match &m.content {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            injection::format_knowledge_item(m.topic.as_str(), &body, m.duration_override.as_deref())
        })
        .collect::<Vec<_>>()
        .join("\n")
}
