//! One-line puns shown next to survey questions.

use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::errors::{BananascapeError, GenerationError};
use crate::genai::TextGenerator;

/// Longest pun returned, in characters. Longer model output is cut at a word
/// boundary.
pub const MAX_PUN_CHARS: usize = 280;

/// Builds the prompt asking for one pun.
#[must_use]
pub fn pun_prompt(question: &str, theme: &str) -> String {
    format!(
        "Write one short, family-friendly pun that playfully connects this survey question \
         to the theme \"{theme}\".\n\
         Survey question: \"{question}\"\n\
         Reply with the pun only, in a single sentence, with no quotes, emoji or explanation."
    )
}

/// Generates puns through a text model.
#[derive(Clone)]
pub struct PunGenerator {
    generator: Arc<dyn TextGenerator>,
    model: Option<String>,
}

impl fmt::Debug for PunGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PunGenerator")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl PunGenerator {
    /// Creates a generator using the text generator's default model.
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            model: None,
        }
    }

    /// Uses `model` instead of the default.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Generates a pun tying `question` to `theme`.
    ///
    /// # Errors
    ///
    /// [`BananascapeError::InvalidInput`] when either argument is blank, and
    /// [`GenerationError::EmptyText`] when the model says nothing usable.
    pub async fn generate_pun(
        &self,
        question: &str,
        theme: &str,
    ) -> Result<String, BananascapeError> {
        let question = question.trim();
        let theme = theme.trim();
        if question.is_empty() {
            return Err(BananascapeError::InvalidInput("question must not be blank".into()));
        }
        if theme.is_empty() {
            return Err(BananascapeError::InvalidInput("theme must not be blank".into()));
        }

        let prompt = pun_prompt(question, theme);
        let raw = self
            .generator
            .generate_text(&prompt, self.model.as_deref())
            .await?;
        let pun = clean_pun(&raw).ok_or(GenerationError::EmptyText)?;
        debug!(theme, pun = %pun, "Generated pun");
        Ok(pun)
    }
}

/// Trims whitespace and wrapping quotes, keeps the first non-empty line.
fn clean_pun(raw: &str) -> Option<String> {
    let line = raw.lines().map(str::trim).find(|l| !l.is_empty())?;
    let line = line
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '“' | '”'))
        .trim();
    if line.is_empty() {
        return None;
    }
    if line.chars().count() <= MAX_PUN_CHARS {
        return Some(line.to_string());
    }
    let cut: String = line.chars().take(MAX_PUN_CHARS).collect();
    let cut = match cut.rfind(' ') {
        Some(pos) if pos > 0 => &cut[..pos],
        _ => cut.as_str(),
    };
    Some(format!("{}…", cut.trim_end()))
}
