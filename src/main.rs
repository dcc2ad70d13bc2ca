//! Tethered headless runner
//!
//! Loads a level, feeds it a scripted input sequence at the fixed tick rate and
//! reports the outcome. Rendering, audio and the narrative request on level
//! completion belong to the host and are not part of this binary.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use tethered::sim::{GameEvent, GamePhase, TickInput};
use tethered::{Driver, LevelDescriptor, Tuning};

/// Run a level headless with scripted input
#[derive(Debug, Parser)]
#[command(name = "tethered", version)]
struct Args {
    /// Level descriptor (JSON)
    #[arg(default_value = "levels/tutorial.json")]
    level: PathBuf,

    /// Input script (JSON list of `{ "ticks": n, ...input }`); defaults to holding right
    #[arg(long)]
    script: Option<PathBuf>,

    /// Tuning overrides (JSON); missing or malformed files fall back to defaults
    #[arg(long)]
    tuning: Option<PathBuf>,

    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Give up after this many ticks
    #[arg(long, default_value_t = 3600)]
    max_ticks: u64,
}

/// Hold `input` for `ticks` consecutive ticks
#[derive(Debug, Clone, Deserialize)]
struct ScriptStep {
    ticks: u32,
    #[serde(flatten)]
    input: TickInput,
}

fn load_script(path: &Path) -> Result<Vec<ScriptStep>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    let steps: Vec<ScriptStep> = serde_json::from_str(&json)
        .with_context(|| format!("malformed script {}", path.display()))?;
    log::info!("Loaded {} script steps from {}", steps.len(), path.display());
    Ok(steps)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let level = LevelDescriptor::load(&args.level)
        .with_context(|| format!("failed to load level {}", args.level.display()))?;
    let tuning = args
        .tuning
        .as_deref()
        .map(Tuning::load_or_default)
        .unwrap_or_default();
    let script = match &args.script {
        Some(path) => load_script(path)?,
        None => vec![ScriptStep {
            ticks: u32::MAX,
            input: TickInput {
                right: true,
                ..Default::default()
            },
        }],
    };

    let mut driver = Driver::new(level, tuning, args.seed);
    let mut inputs = script
        .iter()
        .flat_map(|step| std::iter::repeat_n(step.input, step.ticks as usize));

    for _ in 0..args.max_ticks {
        let input = inputs.next().unwrap_or_default();
        let out = driver.step(&input);
        for event in &out.events {
            match event {
                GameEvent::LevelComplete { bridges_drawn } => {
                    log::info!("Level complete with {} bridges drawn", bridges_drawn);
                }
                GameEvent::GameOver => log::warn!("Attempt lost"),
                other => log::debug!("{:?}", other),
            }
        }
        if driver.phase() != GamePhase::Playing {
            break;
        }
    }

    let ctx = driver.context();
    println!(
        "{}: {:?} after {} ticks (ink {:.1}, hp {}/{}, bridges {})",
        driver.level().name,
        ctx.phase,
        ctx.ticks,
        ctx.drawing.ink,
        ctx.guide.hp,
        ctx.guide.max_hp,
        ctx.bridges.len()
    );
    Ok(())
}
