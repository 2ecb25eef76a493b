//! Formatting of history listings for the terminal

use crate::conversation::Message;

const RULE_WIDTH: usize = 60;

/// Messages shown in the recent-history summary
pub const SUMMARY_MESSAGES: usize = 6;

const SUMMARY_MAX_CHARS: usize = 80;

/// Horizontal rule used around listings
#[must_use]
pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Shorten long content for the summary view
#[must_use]
pub fn truncate(content: &str) -> String {
    if content.chars().count() > SUMMARY_MAX_CHARS {
        let head: String = content.chars().take(SUMMARY_MAX_CHARS - 3).collect();
        format!("{head}...")
    } else {
        content.to_string()
    }
}

/// The recent-history summary: the last few messages, truncated
#[must_use]
pub fn recent_summary(messages: &[Message]) -> Vec<String> {
    let start = messages.len().saturating_sub(SUMMARY_MESSAGES);

    let mut lines = vec![rule(), "RECENT CONVERSATION HISTORY".to_string(), rule()];
    lines.extend(
        messages[start..]
            .iter()
            .map(|m| format!("{}: {}", m.role().display_label(), truncate(m.content()))),
    );
    if start > 0 {
        lines.push(String::new());
        lines.push(format!("[...and {start} more messages]"));
    }
    lines.push(rule());
    lines
}

/// The full numbered history listing
#[must_use]
pub fn full_listing(messages: &[Message]) -> Vec<String> {
    let mut lines = vec![
        rule(),
        "COMPLETE CONVERSATION HISTORY".to_string(),
        format!("Total Messages: {}", messages.len()),
        rule(),
    ];
    for (i, m) in messages.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!("[{}] {}:", i + 1, m.role().display_label()));
        lines.push(format!("    {}", m.content()));
    }
    lines.push(String::new());
    lines.push(rule());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short"), "short");

        let long = "x".repeat(81);
        let shortened = truncate(&long);
        assert_eq!(shortened.chars().count(), 80);
        assert!(shortened.ends_with("..."));

        assert_eq!(truncate(&"y".repeat(80)), "y".repeat(80));
    }

    #[test]
    fn test_truncate_multibyte() {
        let hindi = "क".repeat(100);
        assert_eq!(truncate(&hindi).chars().count(), 80);
    }

    #[test]
    fn test_recent_summary_counts_hidden() {
        let messages: Vec<Message> = (0..8)
            .map(|i| {
                if i % 2 == 0 {
                    Message::user(format!("q{i}"))
                } else {
                    Message::assistant(format!("a{i}"))
                }
            })
            .collect();

        let lines = recent_summary(&messages);
        assert_eq!(lines[3], "You: q2");
        assert!(lines.contains(&"Agent: a7".to_string()));
        assert!(lines.contains(&"[...and 2 more messages]".to_string()));
    }

    #[test]
    fn test_full_listing_numbers_messages() {
        let messages = [Message::user("hello"), Message::assistant("hi")];
        let lines = full_listing(&messages);

        assert!(lines.contains(&"Total Messages: 2".to_string()));
        assert!(lines.contains(&"[2] Agent:".to_string()));
        assert!(lines.contains(&"    hello".to_string()));
    }
}
