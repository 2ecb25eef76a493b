//! Situational data about the monitored construction site
//!
//! A snapshot is generated once per process run and attached to any message
//! that asks about the site.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

/// Lowercase keywords that mark a message as a site-status question
pub const SITE_KEYWORDS: [&str; 6] = ["update", "progress", "site", "construction", "status", "work"];

const WEATHER: [&str; 3] = ["Clear and sunny", "Partly cloudy", "Good working conditions"];

/// Current status of the construction site
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteSnapshot {
    pub site_name: String,
    /// Completion percentage
    pub progress: u8,
    pub current_phase: String,
    pub workers_today: u32,
    pub materials_delivered: Vec<String>,
    pub next_milestone: String,
    pub weather: String,
}

impl SiteSnapshot {
    /// Simulated status for the Riverwood site with randomized daily figures
    pub fn simulated<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            site_name: "Riverwood Residential Complex".to_string(),
            progress: rng.gen_range(65..=75),
            current_phase: "Foundation and Structure Work".to_string(),
            workers_today: rng.gen_range(45..=60),
            materials_delivered: ["Steel bars", "Cement bags", "Concrete mix"]
                .into_iter()
                .map(String::from)
                .collect(),
            next_milestone: "Completion of 3rd floor slab".to_string(),
            weather: WEATHER
                .choose(rng)
                .copied()
                .unwrap_or(WEATHER[0])
                .to_string(),
        }
    }

    /// Pretty JSON rendering sent to the model
    #[must_use]
    pub fn to_prompt_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to serialize site snapshot");
            String::new()
        })
    }
}

/// Whether a message asks about the site
#[must_use]
pub fn mentions_site(message: &str) -> bool {
    let lower = message.to_lowercase();
    SITE_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Append the snapshot to a site-related message; other messages pass through unchanged
#[must_use]
pub fn augment(message: &str, snapshot: &SiteSnapshot) -> String {
    if mentions_site(message) {
        format!(
            "{message}\n\nConstruction Site Data:\n{}",
            snapshot.to_prompt_json()
        )
    } else {
        message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_simulated_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let snapshot = SiteSnapshot::simulated(&mut rng);
            assert!((65..=75).contains(&snapshot.progress));
            assert!((45..=60).contains(&snapshot.workers_today));
            assert!(WEATHER.contains(&snapshot.weather.as_str()));
        }
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert!(mentions_site("What's the PROGRESS?"));
        assert!(mentions_site("any updates today"));
        assert!(mentions_site("how is the work going"));
        assert!(!mentions_site("hello"));
    }

    #[test]
    fn test_augment_appends_snapshot() {
        let snapshot = SiteSnapshot::simulated(&mut StdRng::seed_from_u64(1));
        let augmented = augment("what's the progress?", &snapshot);

        assert!(augmented.starts_with("what's the progress?\n\nConstruction Site Data:\n"));
        assert!(augmented.contains("\"site_name\": \"Riverwood Residential Complex\""));
        assert!(augmented.contains(&format!("\"progress\": {}", snapshot.progress)));
    }

    #[test]
    fn test_augment_leaves_small_talk() {
        let snapshot = SiteSnapshot::simulated(&mut StdRng::seed_from_u64(1));
        assert_eq!(augment("hello", &snapshot), "hello");
    }
}
