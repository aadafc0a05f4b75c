//! Survey landscapes: scored survey items described one by one, then
//! composited into a single wide landscape image.

pub mod prompts;
mod survey;
mod workflow;

pub use prompts::{composite_prompt, element_description, element_prompt};
pub use survey::{load_survey, parse_survey, parse_survey_value, validate_survey, Score, SurveyItem};
pub use workflow::{LandscapeState, LandscapeWorkflow, WORKFLOW_NAME};
