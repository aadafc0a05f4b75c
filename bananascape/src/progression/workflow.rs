//! The five-stage asset progression workflow.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use super::prompts::{stage_prompt, STAGE_COUNT};
use crate::context::RunContext;
use crate::errors::BananascapeError;
use crate::events::EventSink;
use crate::genai::{ImageGenerator, ImageRequest, ReferenceImage};
use crate::graph::{CompiledGraph, FnNode, GraphBuilder, Node, Target};
use crate::storage::AssetStore;
use crate::utils::validate_subject;

/// Workflow name used for events and logs.
pub const WORKFLOW_NAME: &str = "asset_progression";

/// State carried through the progression graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetState {
    /// The subject being drawn.
    pub thing: String,
    /// Stage about to run, starting at 1.
    pub current_stage: u8,
    /// Rendered prompt for every attempted stage.
    pub prompts: Vec<String>,
    /// Saved image for every completed stage.
    pub image_paths: Vec<PathBuf>,
    /// Directory holding this subject's images.
    pub output_dir: PathBuf,
    /// First failure; stops further stages.
    pub error: Option<String>,
}

impl AssetState {
    /// Creates the initial state for `thing`.
    #[must_use]
    pub fn new(thing: impl Into<String>) -> Self {
        Self {
            thing: thing.into(),
            current_stage: 1,
            ..Self::default()
        }
    }

    /// Whether every stage produced an image.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.error.is_none() && self.image_paths.len() == usize::from(STAGE_COUNT)
    }
}

/// Creates the output directory and resets the counters.
#[derive(Debug)]
struct InitializeNode {
    store: AssetStore,
}

#[async_trait]
impl Node<AssetState> for InitializeNode {
    fn name(&self) -> &str {
        "initialize"
    }

    async fn run(
        &self,
        mut state: AssetState,
        _ctx: &RunContext,
    ) -> Result<AssetState, BananascapeError> {
        info!(thing = %state.thing, "Initializing asset generation");

        let output_dir = self.store.subject_dir(&state.thing);
        self.store.ensure_dir(&output_dir).await?;

        state.output_dir = output_dir;
        state.current_stage = 1;
        state.prompts.clear();
        state.image_paths.clear();
        state.error = None;
        Ok(state)
    }
}

/// Renders the stage prompt, calls the image service and saves the result.
///
/// Failures are recorded on the state rather than returned.
struct GenerateNode {
    generator: Arc<dyn ImageGenerator>,
    store: AssetStore,
    model: String,
}

impl fmt::Debug for GenerateNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerateNode")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GenerateNode {
    async fn generate_stage(
        &self,
        state: &mut AssetState,
        stage: u8,
    ) -> Result<PathBuf, BananascapeError> {
        let prompt = stage_prompt(stage, &state.thing)
            .ok_or_else(|| BananascapeError::Internal(format!("No template for stage {stage}")))?;
        state.prompts.push(prompt.clone());

        let mut request = ImageRequest::new(prompt).with_model(&self.model);
        if stage > 1 {
            let previous = state.image_paths.last().ok_or_else(|| {
                BananascapeError::Internal("Previous stage image is missing".to_string())
            })?;
            let bytes = self.store.read_image(previous).await?;
            request = request.with_reference(ReferenceImage::png(bytes));
        }

        let image = self.generator.generate_image(request).await?;

        let output_path = self.store.stage_image_path(&state.thing, stage);
        self.store.save_png(&output_path, &image).await?;
        Ok(output_path)
    }
}

#[async_trait]
impl Node<AssetState> for GenerateNode {
    fn name(&self) -> &str {
        "generate"
    }

    async fn run(
        &self,
        mut state: AssetState,
        ctx: &RunContext,
    ) -> Result<AssetState, BananascapeError> {
        let stage = state.current_stage;
        info!(thing = %state.thing, stage, total = STAGE_COUNT, "Generating stage");

        match self.generate_stage(&mut state, stage).await {
            Ok(path) => {
                info!(path = %path.display(), "Saved stage image");
                ctx.emit_event(
                    "progression.stage_completed",
                    Some(serde_json::json!({
                        "stage": stage,
                        "path": path.display().to_string(),
                    })),
                );
                state.image_paths.push(path);
            }
            Err(err) => {
                let message = format!("Stage {stage} failed: {err}");
                error!(thing = %state.thing, stage, error = %message, "Stage failed");
                ctx.emit_event(
                    "progression.stage_failed",
                    Some(serde_json::json!({"stage": stage, "error": &message})),
                );
                state.error = Some(message);
            }
        }
        Ok(state)
    }
}

/// Routes back to `generate` until all stages ran or one failed.
fn check_completion(state: &AssetState) -> &'static str {
    if state.error.is_some() || state.current_stage > STAGE_COUNT {
        "end"
    } else {
        "continue"
    }
}

/// Runs the asset progression for one subject.
#[derive(Clone)]
pub struct ProgressionWorkflow {
    generator: Arc<dyn ImageGenerator>,
    store: AssetStore,
    model: String,
    event_sink: Option<Arc<dyn EventSink>>,
}

impl fmt::Debug for ProgressionWorkflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressionWorkflow")
            .field("store", &self.store)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl ProgressionWorkflow {
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

    /// Builds the progression graph.
    pub fn create_workflow(&self) -> Result<CompiledGraph<AssetState>, BananascapeError> {
        let graph = GraphBuilder::new(WORKFLOW_NAME)
            .add_node(InitializeNode {
                store: self.store.clone(),
            })
            .add_node(GenerateNode {
                generator: Arc::clone(&self.generator),
                store: self.store.clone(),
                model: self.model.clone(),
            })
            .add_node(FnNode::new("increment", |mut state: AssetState| {
                state.current_stage += 1;
                Ok(state)
            }))
            .add_node(FnNode::new("finalize", |state: AssetState| {
                match &state.error {
                    Some(err) => error!(error = %err, "Asset progression failed"),
                    None => info!(
                        output_dir = %state.output_dir.display(),
                        "All {} stages complete", STAGE_COUNT
                    ),
                }
                Ok(state)
            }))
            .set_entry_point("initialize")
            .add_edge("initialize", "generate")
            .add_edge("generate", "increment")
            .add_conditional_edges(
                "increment",
                check_completion,
                [
                    ("continue", Target::node("generate")),
                    ("end", Target::node("finalize")),
                ],
            )
            .add_edge("finalize", Target::End)
            .compile()?;
        Ok(graph)
    }

    /// Generates all five stages for `thing`.
    ///
    /// A stage failure is not an `Err`: it is recorded in
    /// [`AssetState::error`] and the images saved so far are kept.
    ///
    /// # Errors
    ///
    /// Returns [`BananascapeError::InvalidSubject`] for names that are not a
    /// safe directory name, and engine or I/O errors outside the stages.
    pub async fn generate_asset_progression(
        &self,
        thing: &str,
    ) -> Result<AssetState, BananascapeError> {
        let ctx = self.default_context();
        self.generate_with_context(thing, &ctx).await
    }

    /// Like [`Self::generate_asset_progression`], under a caller-provided context.
    pub async fn generate_with_context(
        &self,
        thing: &str,
        ctx: &RunContext,
    ) -> Result<AssetState, BananascapeError> {
        let thing = validate_subject(thing)?;
        let graph = self.create_workflow()?;
        graph.invoke(AssetState::new(thing), ctx).await
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
