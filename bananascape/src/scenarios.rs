//! Named survey presets for demos.

use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::errors::BananascapeError;
use crate::landscape::{Score, SurveyItem};

/// One survey item of a preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PresetItem {
    /// Element category.
    pub category: &'static str,
    /// Element score.
    pub score: Score,
}

/// Builds a preset item. Presets are constants, so a score outside 1..=5
/// fails the build.
const fn item(category: &'static str, score: u8) -> PresetItem {
    let score = match Score::checked(score) {
        Some(score) => score,
        None => panic!("preset score must be 1-5"),
    };
    PresetItem { category, score }
}

/// A named survey preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scenario {
    /// Lookup name.
    pub name: &'static str,
    /// What the preset demonstrates.
    pub description: &'static str,
    /// Survey items.
    pub items: &'static [PresetItem],
}

impl Scenario {
    /// Returns the items as an owned survey.
    #[must_use]
    pub fn survey(&self) -> Vec<SurveyItem> {
        self.items
            .iter()
            .map(|i| SurveyItem {
                category: i.category.to_string(),
                score: i.score,
            })
            .collect()
    }

    /// Writes the survey items to `path` as pretty-printed JSON.
    pub async fn save_to_json(&self, path: &Path) -> Result<(), BananascapeError> {
        let json = serde_json::to_string_pretty(&self.survey())?;
        tokio::fs::write(path, json).await?;
        info!(scenario = self.name, path = %path.display(), "Saved scenario");
        Ok(())
    }
}

const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "extreme_contrast",
        description: "Maximum emotional contrast - despair meets perfection",
        items: &[item("dog", 1), item("sky", 5)],
    },
    Scenario {
        name: "gradient",
        description: "Smooth progression from desolate to perfect",
        items: &[
            item("foreground rocks", 1),
            item("mid grass", 2),
            item("trees", 3),
            item("clouds", 4),
            item("sun", 5),
        ],
    },
    Scenario {
        name: "chaotic",
        description: "Random scattered scores - dreamlike chaos",
        items: &[
            item("house", 1),
            item("garden", 5),
            item("path", 2),
            item("sky", 5),
            item("fence", 1),
            item("tree", 3),
        ],
    },
    Scenario {
        name: "depression_vs_hope",
        description: "Inner turmoil - dark self, bright surroundings",
        items: &[
            item("person sitting", 1),
            item("flowers around them", 5),
            item("butterflies", 5),
            item("sunshine", 5),
        ],
    },
    Scenario {
        name: "dying_world",
        description: "Apocalyptic - everything declining",
        items: &[
            item("trees", 1),
            item("grass", 1),
            item("sky", 2),
            item("sun", 1),
            item("animals", 1),
        ],
    },
    Scenario {
        name: "paradise",
        description: "Everything perfect and thriving",
        items: &[
            item("mountains", 5),
            item("waterfall", 5),
            item("meadow", 5),
            item("sky", 5),
            item("rainbow", 5),
        ],
    },
    Scenario {
        name: "mixed_health",
        description: "Some things thrive, others struggle - like real life",
        items: &[
            item("old oak tree", 2),
            item("young saplings", 4),
            item("wildflowers", 5),
            item("pond", 3),
            item("shed", 1),
        ],
    },
];

/// Returns every preset in declaration order.
#[must_use]
pub fn all() -> &'static [Scenario] {
    SCENARIOS
}

/// Returns the preset names in declaration order.
#[must_use]
pub fn names() -> Vec<&'static str> {
    SCENARIOS.iter().map(|s| s.name).collect()
}

/// Looks up a preset by name.
#[must_use]
pub fn find(name: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.name == name)
}

/// Looks up a preset, failing with the list of known names.
pub fn get(name: &str) -> Result<&'static Scenario, BananascapeError> {
    find(name).ok_or_else(|| {
        BananascapeError::InvalidInput(format!(
            "Unknown scenario: {name}. Available: {}",
            names().join(", ")
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landscape::{parse_survey, validate_survey};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_presets_in_order() {
        assert_eq!(
            names(),
            vec![
                "extreme_contrast",
                "gradient",
                "chaotic",
                "depression_vs_hope",
                "dying_world",
                "paradise",
                "mixed_health",
            ]
        );
    }

    #[test]
    fn test_every_preset_is_a_valid_survey() {
        for scenario in all() {
            validate_survey(&scenario.survey()).unwrap();
        }
    }

    #[test]
    fn test_item_keeps_score() {
        assert_eq!(item("pond", 3).score.get(), 3);
    }

    #[test]
    #[should_panic(expected = "preset score must be 1-5")]
    fn test_item_rejects_out_of_range_score() {
        let _ = item("pond", 6);
    }

    #[test]
    fn test_gradient_scores() {
        let scores: Vec<u8> = find("gradient")
            .unwrap()
            .items
            .iter()
            .map(|i| i.score.get())
            .collect();
        assert_eq!(scores, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_unknown_scenario() {
        assert!(find("nope").is_none());
        let err = get("nope").unwrap_err();
        assert!(err.to_string().contains("Available: extreme_contrast, gradient"));
    }

    #[tokio::test]
    async fn test_save_round_trips_through_parser() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("chaotic.json");
        let scenario = get("chaotic").unwrap();

        scenario.save_to_json(&path).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("  {\n    \"category\": \"house\""));
        assert_eq!(parse_survey(&contents).unwrap(), scenario.survey());
    }

    #[test]
    fn test_serializes_for_listing() {
        let value = serde_json::to_value(find("extreme_contrast").unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "extreme_contrast",
                "description": "Maximum emotional contrast - despair meets perfection",
                "items": [
                    {"category": "dog", "score": 1},
                    {"category": "sky", "score": 5}
                ]
            })
        );
    }
}
