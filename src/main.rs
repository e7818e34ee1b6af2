use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use quest_hero::config::HeroConfig;
use quest_hero::engine::FrameTimer;
use quest_hero::hero::HeroEvent;
use quest_hero::scene::{test_scene, Scenario, Session};

#[derive(Parser)]
#[command(name = "quest-hero", about = "Headless hero state machine demo")]
struct Args {
    /// Scenario RON file. Runs the built-in scenario when omitted.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Hero tuning RON file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated time to run, in milliseconds.
    #[arg(long, default_value_t = 5000)]
    duration_ms: u32,

    /// Fixed frame duration, in milliseconds.
    #[arg(long, default_value_t = 10)]
    frame_ms: u32,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => HeroConfig::load_from_file(path)?,
        None => HeroConfig::default(),
    };
    let scenario = match &args.scenario {
        Some(path) => Scenario::load_from_file(path)?,
        None => test_scene::test_scenario().context("built-in scenario")?,
    };

    let mut session = Session::new(&scenario, config).context("starting the scenario")?;
    let mut timer = FrameTimer::new();
    let frame_ms = args.frame_ms.max(1);

    while timer.now() < args.duration_ms {
        timer.tick(frame_ms.min(args.duration_ms - timer.now()));
        session.step(timer.now());
    }

    let transitions = session
        .events()
        .iter()
        .filter(|event| matches!(event, HeroEvent::StateChanged { .. }))
        .count();
    let position = session.hero.body.position;
    tracing::info!(
        elapsed_ms = timer.now(),
        transitions,
        state = session.hero.state_name(),
        life = session.hero.life(),
        x = position.x,
        y = position.y,
        camera = ?session.camera.position(),
        "demo finished"
    );
    Ok(())
}
