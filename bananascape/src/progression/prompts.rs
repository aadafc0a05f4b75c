//! Stage prompt templates for the asset progression.

/// Number of stages in a progression.
pub const STAGE_COUNT: u8 = 5;

/// Placeholder replaced with the subject name.
pub const SUBJECT_PLACEHOLDER: &str = "{thing}";

/// Lowest point; becomes the visual reference for every later stage.
const STAGE_1: &str = r#"Square image (1:1)
flat 2D digital illustration
storybook fantasy style
soft painterly brush texture
muted, cold, or neutral palette appropriate for the {thing}
no photorealism
no outlines

Depict the {thing} in its weakest, most desolate, damaged, inactive, or deteriorated possible form.
This is Stage 1, the *lowest point*.

Strict rules:
• Bleak atmosphere: cold light, fog, dull color, dryness, or exhaustion appropriate to the {thing}
• No signs of vitality or strength
• No positive lighting or saturation
• Composition, silhouette, camera angle, and framing must be simple and clear
• This becomes the exact visual reference for all future stages
"#;

/// Micro improvements over stage 1.
const STAGE_2: &str = r#"Use the previous image as the direct reference.
Preserve the exact composition, silhouette, camera angle, proportions, framing, and art style.
Make no structural changes. Do not alter shapes, layout, or perspective.

Apply only micro improvements (about 20 percent change):
• slightly softer lighting
• slightly reduced harshness or decay
• extremely subtle hints of color or warmth (2–5 percent saturation)
• barely noticeable smoothing of textures

Atmosphere remains mostly bleak, but with the faintest suggestion of improvement.
All changes must be gradual, minimal, and monotonic — no sudden jumps.
"#;

/// Moderate improvement.
const STAGE_3: &str = r#"Use the previous image as the direct reference.
Preserve the exact composition, silhouette, camera angle, proportions, framing, and art style.
Make no structural or geometric changes.

Apply moderate improvement (around 20 percent change):
• noticeably richer color, but still soft and natural
• smoother, more harmonious textures
• warmer, balanced lighting
• early signs of healing, growth, or stability appropriate to the {thing}

The scene should feel calm and clearly healthier than Stage 2, but still gentle.
All changes must be strictly monotonic and extend Stage 2 without introducing new elements.
"#;

/// Large improvement; near-final.
const STAGE_4: &str = r#"Use the previous image as the direct reference.
Preserve the exact composition, silhouette, camera angle, proportions, framing, and art style.
No structural changes of any kind.

Apply large improvement (20 percent change):
• bright, lively, healthy, restored, or joyful appearance
• painterly, vibrant colors that remain consistent with the established palette
• strong warm natural lighting
• textures feel clean, strong, and harmonious

This is the near-final version of the {thing}:
very alive and expressive but still missing its final spark.
Changes must remain monotonic — an amplification of Stage 3, not a reset.
"#;

/// Peak state with one spark element.
const STAGE_5: &str = r#"Use the previous image as the direct reference.
Preserve the exact composition, silhouette, camera angle, proportions, framing, and art style.
Do not change shapes, layout, or geometry.

Apply final improvement (remaining 20 percent):
• richest, most vibrant natural colors
• warmest lighting
• fully alive, restored, joyful, or powerful version of the {thing}

Introduce exactly one subtle spark element appropriate to the {thing}:
• a small bird or butterfly (nature scenes)
• a glowing fruit or cluster of flowers (plants)
• a soft magical shimmer (artifacts or crystals)
• a pastel rainbow or gentle sunbeam (landscape or sky)
• a single bright specular highlight (objects)

The spark must be subtle, painterly, and feel like a natural culmination of Stage 4.
This is the absolute peak state — the final, most expressive version of the {thing}.
"#;
/// Returns the raw template for `stage`, or `None` outside 1..=5.
#[must_use]
pub fn stage_template(stage: u8) -> Option<&'static str> {
    match stage {
        1 => Some(STAGE_1),
        2 => Some(STAGE_2),
        3 => Some(STAGE_3),
        4 => Some(STAGE_4),
        5 => Some(STAGE_5),
        _ => None,
    }
}

/// Renders the prompt for `stage` with the subject substituted.
#[must_use]
pub fn stage_prompt(stage: u8, thing: &str) -> Option<String> {
    stage_template(stage).map(|t| t.replace(SUBJECT_PLACEHOLDER, thing))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_stage_has_a_template() {
        for stage in 1..=STAGE_COUNT {
            assert!(stage_template(stage).is_some(), "stage {stage}");
        }
        assert!(stage_template(0).is_none());
        assert!(stage_template(6).is_none());
    }

    #[test]
    fn test_subject_substituted_everywhere() {
        let prompt = stage_prompt(1, "lighthouse").unwrap();
        assert!(prompt.contains("Depict the lighthouse in its weakest"));
        assert!(!prompt.contains(SUBJECT_PLACEHOLDER));
        assert_eq!(prompt.matches("lighthouse").count(), 3);
    }

    #[test]
    fn test_stage_two_has_no_placeholder() {
        let prompt = stage_prompt(2, "lighthouse").unwrap();
        assert!(prompt.starts_with("Use the previous image as the direct reference."));
        assert!(!prompt.contains("lighthouse"));
    }

    #[test]
    fn test_later_stages_reference_previous_image() {
        for stage in 2..=STAGE_COUNT {
            let prompt = stage_prompt(stage, "x").unwrap();
            assert!(prompt.contains("previous image"), "stage {stage}");
        }
    }
}
