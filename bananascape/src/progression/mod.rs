//! Asset progression: five images of one subject, from bleakest to most
//! radiant, each stage drawn from the previous stage's image.

pub mod prompts;
mod workflow;

pub use prompts::{stage_prompt, STAGE_COUNT};
pub use workflow::{AssetState, ProgressionWorkflow, WORKFLOW_NAME};
