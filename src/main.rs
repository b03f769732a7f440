use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use flowdom::config::Config;
use flowdom::demo;
use flowdom::event::Event;
use flowdom::logging::init_tracing;
use flowdom::program::{ManualFrames, TokioFrames};
use flowdom::surface::Dom;

/// Run the demo application on an in-memory document and print its markup
/// after every scripted event.
#[derive(Debug, Parser)]
#[command(name = "flowdom", version, about)]
struct Cli {
    /// Config file to use instead of the default location.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// JSON list of steps, e.g. `[{"target": "toggle", "event": {"name": "click"}}]`.
    /// Defaults to clicking the toggle twice.
    #[arg(long, value_name = "JSON")]
    script: Option<String>,

    /// Deliver frames from tokio timers instead of flushing them after each step.
    #[arg(long)]
    realtime: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct Step {
    target: String,
    event: Event,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load config")?;
    init_tracing(&config.logging);

    let steps = match &cli.script {
        Some(script) => serde_json::from_str(script).context("Failed to parse --script")?,
        None => default_script(),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to build tokio runtime")?;
    let local = tokio::task::LocalSet::new();
    local.block_on(&runtime, run(config, steps, cli.realtime))
}

fn default_script() -> Vec<Step> {
    let click = Step {
        target: demo::TOGGLE_ID.to_string(),
        event: Event::click(),
    };
    vec![click.clone(), click]
}

async fn run(config: Config, steps: Vec<Step>, realtime: bool) -> Result<()> {
    let dom = Dom::new();
    let frames = ManualFrames::new();
    let interval = config.program.frame_interval();

    let builder = demo::program().config(&config.program);
    let program = if realtime {
        builder.frames(TokioFrames::new(interval))
    } else {
        builder.frames(frames.clone())
    }
    .start(dom.clone());
    println!("{}", dom.inner_html());

    for step in steps {
        tracing::debug!(target_id = %step.target, event = %step.event.name, "dispatching");
        dom.dispatch(&step.target, &step.event).with_context(|| {
            format!("Failed to dispatch '{}' to #{}", step.event.name, step.target)
        })?;

        if realtime {
            tokio::time::sleep(interval * 3).await;
        } else {
            settle(&frames).await;
        }
        println!("{}", dom.inner_html());
    }

    let state = program.stop();
    tracing::info!(?state, "demo finished");
    Ok(())
}

/// Let spawned commands run and flush frames until nothing is left to do.
async fn settle(frames: &ManualFrames) {
    loop {
        tokio::task::yield_now().await;
        if frames.fire() == 0 {
            break;
        }
    }
}
