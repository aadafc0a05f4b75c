//! Prompt builders for survey landscapes.

use super::survey::{Score, SurveyItem};

const BASE_STYLE: &str = "Flat 2D digital illustration
storybook fantasy style
soft painterly brush texture
no photorealism
no harsh outlines
clean isolated element suitable for compositing
";

/// Visual qualities for one score level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreModifiers {
    /// Overall atmosphere.
    pub atmosphere: &'static str,
    /// Lighting.
    pub lighting: &'static str,
    /// Color palette.
    pub color: &'static str,
    /// Physical condition.
    pub condition: &'static str,
    /// Emotional mood.
    pub mood: &'static str,
    /// Extra touches, only at the top score.
    pub special: Option<&'static str>,
}

const MODIFIERS: [ScoreModifiers; 5] = [
    ScoreModifiers {
        atmosphere: "bleak, desolate, deteriorated, damaged, weakest possible form",
        lighting: "cold harsh light, fog, shadows, darkness",
        color: "muted, dull, desaturated, gray, cold tones, almost monochrome",
        condition: "withered, broken, dying, exhausted, depleted, rotting",
        mood: "hopeless, abandoned, lifeless, empty",
        special: None,
    },
    ScoreModifiers {
        atmosphere: "struggling, barely surviving, still quite weak",
        lighting: "dim light, heavy overcast, faint glow",
        color: "mostly muted with tiny hints of color (5-10% saturation)",
        condition: "damaged but stabilizing, scarred, barely functioning",
        mood: "somber, quiet despair, faint glimmer of survival",
        special: None,
    },
    ScoreModifiers {
        atmosphere: "neutral, stable, average, balanced",
        lighting: "soft even lighting, gentle clouds, moderate brightness",
        color: "natural colors at 40-50% saturation, balanced palette",
        condition: "healthy but unremarkable, functional, ordinary",
        mood: "calm, peaceful, steady, neither joyful nor sad",
        special: None,
    },
    ScoreModifiers {
        atmosphere: "vibrant, lively, thriving, strong",
        lighting: "warm sunlight, golden hour glow, bright natural light",
        color: "rich saturated colors (70-80%), warm harmonious palette",
        condition: "flourishing, energetic, robust, healthy",
        mood: "joyful, alive, energetic, welcoming",
        special: None,
    },
    ScoreModifiers {
        atmosphere: "peak perfection, radiant, absolutely thriving, most powerful form",
        lighting: "brilliant warm light, magic hour, glowing, luminous",
        color: "fully saturated vibrant colors (90-100%), rich warm palette",
        condition: "pristine, perfect, glowing with life and energy, transcendent",
        mood: "ecstatic, radiant joy, magical, sublime",
        special: Some(
            "subtle magical elements: soft sparkles, gentle light rays, small butterflies or birds (if appropriate), ethereal glow",
        ),
    },
];

/// Returns the modifiers for `score`.
#[must_use]
pub fn score_modifiers(score: Score) -> &'static ScoreModifiers {
    &MODIFIERS[usize::from(score.get() - 1)]
}

/// Builds the standalone prompt describing one survey element.
#[must_use]
pub fn element_prompt(category: &str, score: Score) -> String {
    let mods = score_modifiers(score);
    let mut prompt = format!(
        "{BASE_STYLE}\n\nCategory: {category}\nScore: {score}/5\n\nVisual Requirements:\n\
         • Atmosphere: {}\n\
         • Lighting: {}\n\
         • Color palette: {}\n\
         • Condition: {}\n\
         • Emotional mood: {}\n",
        mods.atmosphere, mods.lighting, mods.color, mods.condition, mods.mood,
    );
    if let Some(special) = mods.special {
        prompt.push_str(&format!("• Special touches: {special}\n"));
    }
    prompt.push_str(&format!(
        "\nDepict the {category} with these exact qualities.\n\
         Keep the {category} as the clear focal point.\n\
         Use simple, clear composition that will work in a larger landscape.\n\
         The {category} should be immediately recognizable and emotionally expressive.\n"
    ));
    prompt
}

/// One-line description of an element, used inside the composite prompt.
#[must_use]
pub fn element_description(category: &str, score: Score) -> String {
    match score.get() {
        1 => format!("a {category} that is utterly desolate, withered, broken, barely visible in harsh cold light with dull gray colors"),
        2 => format!("a {category} that is struggling and damaged but surviving, with dim lighting and mostly muted colors"),
        3 => format!("a {category} that is healthy and stable but unremarkable, with natural balanced colors and soft even lighting"),
        4 => format!("a {category} that is vibrant and thriving, with warm golden sunlight and rich saturated colors"),
        _ => format!("a {category} that is absolutely radiant and perfect, glowing with brilliant warm light, fully saturated vibrant colors, and subtle magical touches"),
    }
}

const COMPOSITE_INTRO: &str = "CRITICAL: Generate a WIDE HORIZONTAL LANDSCAPE image in 16:9 aspect ratio (NOT square, NOT portrait).
Dimensions should be approximately 1920x1080 pixels or similar wide horizontal format.

Create a stunning, emotionally rich landscape illustration incorporating these elements:";

const COMPOSITE_RULES: &str = "LANDSCAPE FORMAT REQUIREMENTS (MUST FOLLOW):
• WIDE HORIZONTAL format - much wider than it is tall
• 16:9 aspect ratio (1920x1080 or 1280x720 or similar)
• NOT square (1:1) - MUST be landscape orientation
• This is a SINGLE cohesive wide landscape image
• Each element should be naturally integrated into the horizontal scene

Visual Style:
• Flat 2D digital illustration with depth through layering
• Storybook fantasy painterly aesthetic
• Soft, blended brush textures - no photorealism, no harsh outlines
• Rich atmospheric effects (mist, light rays, shadows)
• Professional composition with clear focal points
• Consistent art style throughout the entire landscape

CRITICAL EMOTIONAL COMPOSITION RULES:
• Each element MUST maintain its individual score-based emotional quality exactly as described above
• A score-1 element stays bleak, withered, and deteriorated even when adjacent to score-5 elements
• A score-5 element stays radiant, vibrant, and perfect even when adjacent to score-1 elements
• CREATE STRIKING CONTRAST - the emotional differences between elements should be visible and powerful
• DO NOT blend or homogenize the emotional tones between different elements
• DO NOT make everything match in mood or color
• The lighting, color saturation, and vitality of each element reflects its individual score
• Elements can share the same space but maintain their distinct emotional qualities

Spatial Arrangement:
• Arrange elements in a natural, believable landscape composition
• Use foreground, midground, and background to create depth
• Consider realistic scale and positioning (sky above, ground below, etc.)
• Elements should feel like they exist in the same world, even if emotionally contradictory
• Take advantage of the WIDE horizontal format to spread elements across the scene

Atmospheric Storytelling:
• The landscape should feel surreal and emotionally complex
• Vibrant elements should genuinely shine and glow with life
• Deteriorated elements should appear dark, withered, and struggling
• The viewer should feel the emotional tension and contrast
• Each element tells its own story within the unified scene
• The overall effect is dreamlike, haunting, beautiful, and thought-provoking

REMINDER: This MUST be a WIDE HORIZONTAL LANDSCAPE format (16:9), NOT square. Create a masterpiece that embraces emotional complexity and visual contrast while maintaining artistic coherence.
";

/// Builds the wide-landscape prompt combining every survey element.
#[must_use]
pub fn composite_prompt(items: &[SurveyItem]) -> String {
    let elements: Vec<String> = items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, element_description(&item.category, item.score)))
        .collect();
    format!("{COMPOSITE_INTRO}\n\n{}\n\n{COMPOSITE_RULES}", elements.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn score(n: i64) -> Score {
        Score::new(n).unwrap()
    }

    #[test]
    fn test_element_prompt_layout() {
        let prompt = element_prompt("dog", score(1));

        assert!(prompt.starts_with("Flat 2D digital illustration\n"));
        assert!(prompt.contains("compositing\n\n\nCategory: dog\nScore: 1/5\n"));
        assert!(prompt.contains("• Atmosphere: bleak, desolate"));
        assert!(prompt.contains("• Emotional mood: hopeless, abandoned, lifeless, empty\n\nDepict the dog"));
        assert!(!prompt.contains("Special touches"));
        assert!(prompt.ends_with("emotionally expressive.\n"));
    }

    #[test]
    fn test_top_score_adds_special_touches() {
        let prompt = element_prompt("sky", score(5));
        assert!(prompt.contains("• Special touches: subtle magical elements"));
        assert!(prompt.contains("ethereal glow\n\nDepict the sky"));
    }

    #[test]
    fn test_only_top_score_has_special() {
        for n in 1..=4 {
            assert!(score_modifiers(score(n)).special.is_none());
        }
        assert!(score_modifiers(score(5)).special.is_some());
    }

    #[test]
    fn test_element_descriptions_by_score() {
        assert!(element_description("tree", score(1)).starts_with("a tree that is utterly desolate"));
        assert!(element_description("tree", score(3)).contains("healthy and stable"));
        assert!(element_description("tree", score(5)).contains("absolutely radiant"));
    }

    #[test]
    fn test_composite_prompt_numbers_elements() {
        let items = vec![
            SurveyItem::new("dog", 1).unwrap(),
            SurveyItem::new("sky", 5).unwrap(),
            SurveyItem::new("tree", 3).unwrap(),
        ];
        let prompt = composite_prompt(&items);

        assert!(prompt.starts_with("CRITICAL: Generate a WIDE HORIZONTAL LANDSCAPE"));
        assert!(prompt.contains("incorporating these elements:\n\n1. a dog that is utterly desolate"));
        assert!(prompt.contains("\n2. a sky that is absolutely radiant"));
        assert!(prompt.contains("\n3. a tree that is healthy and stable"));
        assert!(prompt.contains("subtle magical touches\n3. "));
        assert!(prompt.contains("\n\nLANDSCAPE FORMAT REQUIREMENTS (MUST FOLLOW):"));
        assert!(prompt.ends_with("artistic coherence.\n"));
        assert_eq!(prompt.matches("16:9").count(), 3);
    }
}
