//! The survey landscape workflow.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use super::prompts::{composite_prompt, element_prompt};
use super::survey::{validate_survey, SurveyItem};
use crate::context::RunContext;
use crate::errors::{BananascapeError, GenerationError};
use crate::events::EventSink;
use crate::genai::{AspectRatio, ImageGenerator, ImageOptions, ImageRequest, ImageSize};
use crate::graph::{CompiledGraph, FnNode, GraphBuilder, Node, Target, DEFAULT_STEP_LIMIT};
use crate::storage::AssetStore;

/// Workflow name used for events and logs.
pub const WORKFLOW_NAME: &str = "survey_landscape";

/// State carried through the landscape graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandscapeState {
    /// Validated survey input.
    pub survey_answers: Vec<SurveyItem>,
    /// Next survey item to describe.
    pub current_index: usize,
    /// One prompt per described item.
    pub element_prompts: Vec<String>,
    /// Reserved for rendered element images; elements are only described.
    pub element_images: Vec<PathBuf>,
    /// Prompt for the composite image.
    pub final_prompt: String,
    /// Saved composite image.
    pub final_image_path: Option<PathBuf>,
    /// Directory holding landscapes.
    pub output_dir: PathBuf,
    /// First failure; skips the remaining nodes.
    pub error: Option<String>,
}

impl LandscapeState {
    /// Creates the initial state for a survey.
    #[must_use]
    pub fn new(survey_answers: Vec<SurveyItem>) -> Self {
        Self {
            survey_answers,
            ..Self::default()
        }
    }
}

#[derive(Debug)]
struct InitializeNode {
    store: AssetStore,
}

#[async_trait]
impl Node<LandscapeState> for InitializeNode {
    fn name(&self) -> &str {
        "initialize"
    }

    async fn run(
        &self,
        mut state: LandscapeState,
        _ctx: &RunContext,
    ) -> Result<LandscapeState, BananascapeError> {
        info!(
            items = state.survey_answers.len(),
            "Initializing landscape generation"
        );

        let output_dir = self.store.landscape_dir();
        self.store.ensure_dir(&output_dir).await?;

        state.output_dir = output_dir;
        state.current_index = 0;
        state.element_prompts.clear();
        state.element_images.clear();
        state.final_prompt.clear();
        state.final_image_path = None;
        state.error = None;
        Ok(state)
    }
}

fn generate_element(mut state: LandscapeState) -> Result<LandscapeState, BananascapeError> {
    let index = state.current_index;
    let total = state.survey_answers.len();
    match state.survey_answers.get(index) {
        Some(item) => {
            info!(
                element = index + 1,
                total,
                category = %item.category,
                score = item.score.get(),
                "Creating element description"
            );
            let prompt = element_prompt(&item.category, item.score);
            state.element_prompts.push(prompt);
        }
        None => {
            let message = format!("Element {index} failed: no survey item at this position");
            error!(error = %message, "Element failed");
            state.error = Some(message);
        }
    }
    Ok(state)
}

/// Routes between describing more elements, compositing, and bailing out.
fn check_elements_complete(state: &LandscapeState) -> &'static str {
    if state.error.is_some() {
        "error"
    } else if state.current_index >= state.survey_answers.len() {
        "done_with_elements"
    } else {
        "continue"
    }
}

/// Renders the composite landscape and saves it.
struct GenerateFinalNode {
    generator: Arc<dyn ImageGenerator>,
    store: AssetStore,
    model: String,
}

impl fmt::Debug for GenerateFinalNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerateFinalNode")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GenerateFinalNode {
    fn options() -> ImageOptions {
        ImageOptions::new()
            .with_aspect_ratio(AspectRatio::Wide)
            .with_image_size(ImageSize::TwoK)
            .image_only()
            .with_search_grounding()
    }

    async fn render(&self, state: &LandscapeState) -> Result<PathBuf, BananascapeError> {
        let request = ImageRequest::new(state.final_prompt.clone())
            .with_options(Self::options())
            .with_model(&self.model);
        let image = self.generator.generate_image(request).await?;

        let output_path = self.store.final_landscape_path();
        self.store.save_png(&output_path, &image).await?;
        Ok(output_path)
    }
}

#[async_trait]
impl Node<LandscapeState> for GenerateFinalNode {
    fn name(&self) -> &str {
        "generate_final"
    }

    async fn run(
        &self,
        mut state: LandscapeState,
        ctx: &RunContext,
    ) -> Result<LandscapeState, BananascapeError> {
        info!(model = %self.model, aspect_ratio = "16:9", size = "2K", "Generating final landscape");

        match self.render(&state).await {
            Ok(path) => {
                info!(path = %path.display(), "Saved final landscape");
                ctx.emit_event(
                    "landscape.final_saved",
                    Some(serde_json::json!({"path": path.display().to_string()})),
                );
                state.final_image_path = Some(path);
            }
            Err(err) => {
                let detail = match err {
                    BananascapeError::Generation(GenerationError::NoImage) => {
                        "No final image returned".to_string()
                    }
                    other => other.to_string(),
                };
                let message = format!("Final landscape generation failed: {detail}");
                error!(error = %message, "Final landscape failed");
                ctx.emit_event(
                    "landscape.final_failed",
                    Some(serde_json::json!({"error": &message})),
                );
                state.error = Some(message);
            }
        }
        Ok(state)
    }
}

/// Number of node steps a survey of `items` needs: initialize, two per item,
/// composite, final render and finalize.
fn steps_for(items: usize) -> usize {
    2 * items + 4
}

/// Turns survey answers into one composite landscape image.
#[derive(Clone)]
pub struct LandscapeWorkflow {
    generator: Arc<dyn ImageGenerator>,
    store: AssetStore,
    model: String,
    event_sink: Option<Arc<dyn EventSink>>,
}

impl fmt::Debug for LandscapeWorkflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LandscapeWorkflow")
            .field("store", &self.store)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl LandscapeWorkflow {
    /// Creates a workflow writing under `store` with images from `generator`.
    #[must_use]
    pub fn new(
        generator: Arc<dyn ImageGenerator>,
        store: AssetStore,
        model: impl Into<String>,
    ) -> Self {
        Self {
            generator,
            store,
            model: model.into(),
            event_sink: None,
        }
    }

    /// Sends workflow events to `sink` instead of the log.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = Some(sink);
        self
    }

    /// Builds the landscape graph with the default step limit.
    pub fn create_workflow(&self) -> Result<CompiledGraph<LandscapeState>, BananascapeError> {
        self.build_graph(DEFAULT_STEP_LIMIT)
    }

    fn build_graph(
        &self,
        step_limit: usize,
    ) -> Result<CompiledGraph<LandscapeState>, BananascapeError> {
        let graph = GraphBuilder::new(WORKFLOW_NAME)
            .add_node(InitializeNode {
                store: self.store.clone(),
            })
            .add_node(FnNode::new("generate_element", generate_element))
            .add_node(FnNode::new("increment", |mut state: LandscapeState| {
                state.current_index += 1;
                Ok(state)
            }))
            .add_node(FnNode::new(
                "create_composite_prompt",
                |mut state: LandscapeState| {
                    state.final_prompt = composite_prompt(&state.survey_answers);
                    info!(elements = state.survey_answers.len(), "Composite prompt created");
                    Ok(state)
                },
            ))
            .add_node(GenerateFinalNode {
                generator: Arc::clone(&self.generator),
                store: self.store.clone(),
                model: self.model.clone(),
            })
            .add_node(FnNode::new("finalize", |state: LandscapeState| {
                match &state.error {
                    Some(err) => error!(error = %err, "Landscape generation failed"),
                    None => info!(
                        output_dir = %state.output_dir.display(),
                        elements = state.element_prompts.len(),
                        "Landscape generation complete"
                    ),
                }
                Ok(state)
            }))
            .set_entry_point("initialize")
            .add_edge("initialize", "generate_element")
            .add_edge("generate_element", "increment")
            .add_conditional_edges(
                "increment",
                check_elements_complete,
                [
                    ("continue", Target::node("generate_element")),
                    ("done_with_elements", Target::node("create_composite_prompt")),
                    ("error", Target::node("finalize")),
                ],
            )
            .add_edge("create_composite_prompt", "generate_final")
            .add_edge("generate_final", "finalize")
            .add_edge("finalize", Target::End)
            .with_step_limit(step_limit)
            .compile()?;
        Ok(graph)
    }

    /// Describes every survey item and renders the composite landscape.
    ///
    /// A render failure is recorded in [`LandscapeState::error`].
    ///
    /// # Errors
    ///
    /// Returns [`BananascapeError::Survey`] for an empty survey or a blank
    /// category, and engine or I/O errors.
    pub async fn generate_survey_landscape(
        &self,
        survey_answers: Vec<SurveyItem>,
    ) -> Result<LandscapeState, BananascapeError> {
        let ctx = self.default_context();
        self.generate_with_context(survey_answers, &ctx).await
    }

    /// Like [`Self::generate_survey_landscape`], under a caller-provided context.
    pub async fn generate_with_context(
        &self,
        survey_answers: Vec<SurveyItem>,
        ctx: &RunContext,
    ) -> Result<LandscapeState, BananascapeError> {
        validate_survey(&survey_answers)?;
        let limit = steps_for(survey_answers.len()).max(DEFAULT_STEP_LIMIT);
        let graph = self.build_graph(limit)?;
        graph.invoke(LandscapeState::new(survey_answers), ctx).await
    }

    /// Returns a fresh context using this workflow's event sink.
    #[must_use]
    pub fn default_context(&self) -> RunContext {
        let ctx = RunContext::new(WORKFLOW_NAME);
        match &self.event_sink {
            Some(sink) => ctx.with_event_sink(Arc::clone(sink)),
            None => ctx,
        }
    }
}
