use crate::types::AlertLevel;

/// Convert text to proper case: first letter of each word uppercased,
/// the rest lowercased. Idempotent; empty input stays empty.
///
/// Example: "ANG MO KIO AVENUE 3" → "Ang Mo Kio Avenue 3"
pub fn to_proper_case(text: &str) -> String {
    text.to_lowercase()
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                // Only the first char of a multi-char uppercase expansion is
                // kept ('ß' → "S", not "SS") so reapplying is a no-op.
                Some(first) => {
                    let upper = first.to_uppercase().next().unwrap_or(first);
                    let mut word = String::from(upper);
                    word.push_str(chars.as_str());
                    word
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Classify a raw case count into a qualitative alert level.
///
/// Single source of truth for alert derivation: every rendering of a raw
/// case count goes through this, never through a server-supplied level.
pub fn classify_alert(active_cases: i64) -> AlertLevel {
    if active_cases >= 10 {
        AlertLevel::Warning
    } else if active_cases > 0 {
        AlertLevel::Moderate
    } else {
        AlertLevel::Low
    }
}

/// Header timestamp in the dashboard's display format: "DD-MM-YYYY HH:MM:SS".
pub fn data_timestamp() -> String {
    chrono::Local::now().format("%d-%m-%Y %H:%M:%S").to_string()
}
