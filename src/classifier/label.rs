use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Intent vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum IntentLabel {
    /// Casual conversation.
    None,
    /// The user seeks guidance about their mental health or situation.
    Help,
    /// Out-of-scope request (homework, STEM, programming).
    Fallback,
}

/// How a classifier reply is turned into a label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum IntentMatching {
    /// The reply must name exactly one label as a whole word.
    #[default]
    Strict,
    /// First substring hit in the order `None`, `Fallback`, `Help`.
    Substring,
}

/// Order in which [`IntentMatching::Substring`] probes the reply.
const SUBSTRING_ORDER: [IntentLabel; 3] =
    [IntentLabel::None, IntentLabel::Fallback, IntentLabel::Help];

fn label_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b(None|Help|Fallback)\b").expect("valid label regex"))
}

/// Resolve the label named by a classifier reply.
pub fn resolve_label(raw: &str, matching: IntentMatching) -> Option<IntentLabel> {
    match matching {
        IntentMatching::Substring => SUBSTRING_ORDER
            .into_iter()
            .find(|label| raw.contains(&label.to_string())),
        IntentMatching::Strict => {
            let mut found: Option<IntentLabel> = None;
            for m in label_pattern().find_iter(raw) {
                let label: IntentLabel = m.as_str().parse().ok()?;
                match found {
                    Some(existing) if existing != label => return None,
                    _ => found = Some(label),
                }
            }
            found
        }
    }
}
