//! Command line for running bananascape workflows without the server.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use bananascape::config::AppConfig;
use bananascape::landscape::{load_survey, LandscapeState, LandscapeWorkflow, SurveyItem};
use bananascape::observability::{init_tracing, LogFormat};
use bananascape::prelude::{AssetStore, GeminiClient, ProgressionWorkflow};
use bananascape::scenarios;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bananascape", version, about = "Generate storybook-style asset progressions and survey landscapes")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Draw a subject through all five progression stages.
    Progression {
        /// Subject to draw, e.g. "coffee mug".
        thing: String,
    },
    /// Build a landscape from survey answers.
    Landscape {
        /// Inline JSON array, or a path to a `.json` file.
        survey: String,
    },
    /// Preset surveys.
    Scenarios {
        #[command(subcommand)]
        action: ScenarioAction,
    },
}

#[derive(Debug, Subcommand)]
enum ScenarioAction {
    /// List the available presets.
    List,
    /// Generate a landscape from a preset.
    Run { name: String },
    /// Write a preset's survey to a JSON file.
    Save { name: String, file: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing(LogFormat::from_env(), "warn,bananascape=info");

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    match cli.command {
        Command::Progression { thing } => {
            let workflow = ProgressionWorkflow::new(
                client(&config)?,
                AssetStore::new(&config.assets_dir),
                config.gemini.progression_model.clone(),
            );
            let result = workflow.generate_asset_progression(&thing).await?;
            if let Some(error) = result.error {
                bail!(error);
            }
            println!("Generated {} images for '{}':", result.image_paths.len(), thing);
            for path in &result.image_paths {
                println!("  {}", path.display());
            }
        }
        Command::Landscape { survey } => {
            let items = load_survey(&survey).await?;
            report(run_landscape(&config, items).await?)?;
        }
        Command::Scenarios { action } => match action {
            ScenarioAction::List => {
                for scenario in scenarios::all() {
                    println!("{:<20} {}", scenario.name, scenario.description);
                }
            }
            ScenarioAction::Run { name } => {
                let scenario = scenarios::get(&name)?;
                println!("Running scenario '{}': {}", scenario.name, scenario.description);
                report(run_landscape(&config, scenario.survey()).await?)?;
            }
            ScenarioAction::Save { name, file } => {
                let scenario = scenarios::get(&name)?;
                scenario
                    .save_to_json(&file)
                    .await
                    .with_context(|| format!("saving scenario to {}", file.display()))?;
                println!("Saved '{}' to {}", scenario.name, file.display());
            }
        },
    }
    Ok(())
}

fn client(config: &AppConfig) -> anyhow::Result<Arc<GeminiClient>> {
    Ok(Arc::new(GeminiClient::new(config.gemini.clone())?))
}

async fn run_landscape(
    config: &AppConfig,
    items: Vec<SurveyItem>,
) -> anyhow::Result<LandscapeState> {
    let workflow = LandscapeWorkflow::new(
        client(config)?,
        AssetStore::new(&config.assets_dir),
        config.gemini.landscape_model.clone(),
    );
    Ok(workflow.generate_survey_landscape(items).await?)
}

fn report(state: LandscapeState) -> anyhow::Result<()> {
    if let Some(error) = state.error {
        bail!(error);
    }
    let Some(path) = state.final_image_path else {
        bail!("landscape finished without a final image");
    };
    println!("Described {} elements.", state.element_prompts.len());
    println!("Final landscape: {}", path.display());
    Ok(())
}
