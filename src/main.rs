//! Survival Shooter entry point
//!
//! Headless driver: plays encounters against an autopilot and manages the
//! persisted settings and results.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use glam::Vec2;

use survival_shooter::consts::TICK_INTERVAL_MS;
use survival_shooter::persistence::JsonFileStore;
use survival_shooter::platform::{InputEvent, RecordingNavigator};
use survival_shooter::renderer::RecordingSurface;
use survival_shooter::scheduler::{EventLoop, Scheduler};
use survival_shooter::sim::EncounterState;
use survival_shooter::{Encounter, GameEvent, ScoreBoard, Settings};

/// Time between autopilot decisions; just over the fire cooldown
const AUTOPILOT_PERIOD_MS: u64 = 550;

#[derive(Parser, Debug)]
#[command(name = "survival-shooter")]
#[command(about = "Headless top-down survival shooter")]
struct Cli {
    /// Preferences file holding settings and results
    #[arg(long, default_value = "survival-shooter.json")]
    store: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play one encounter with the autopilot
    Play {
        #[arg(long, default_value_t = 1080.0)]
        width: f32,
        #[arg(long, default_value_t = 1920.0)]
        height: f32,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Give up after this much game time
        #[arg(long, default_value_t = 120_000)]
        max_ms: u64,
        /// Print the final encounter state as JSON
        #[arg(long, default_value_t = false)]
        dump_state: bool,
    },
    /// Show lifetime results
    Scores {
        #[arg(long, default_value_t = false)]
        reset: bool,
    },
    /// Change the encounter size
    Configure {
        #[arg(long)]
        enemies: String,
        #[arg(long)]
        bullets: String,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let Cli { store, command } = Cli::parse();

    let mut prefs = JsonFileStore::open(&store)
        .with_context(|| format!("failed to open store {}", store.display()))?;
    log::debug!("Using store {}", prefs.path().display());

    match command {
        Commands::Play {
            width,
            height,
            seed,
            max_ms,
            dump_state,
        } => {
            log::info!("Survival Shooter (headless) starting...");
            let encounter = Encounter::new(
                prefs,
                RecordingNavigator::new(),
                RecordingSurface::new(),
                Vec2::new(width, height),
                seed,
            );
            let (encounter, elapsed) = play(encounter, max_ms);

            let state = encounter.state();
            let outcome = encounter
                .navigator()
                .last()
                .map_or("unfinished", |o| o.tag());
            println!("outcome={outcome}");
            println!("elapsed_ms={elapsed}");
            println!("kills={}/{}", state.kills, state.initial_pursuers);
            println!("enemies_remaining={}", state.enemies_remaining());
            println!("frames={}", encounter.surface().frames_presented());
            let scores = encounter.scores();
            println!("won={} lost={}", scores.times_won, scores.times_lost);

            if dump_state {
                let json = serde_json::to_string_pretty(state)?;
                println!("{json}");
            }
        }
        Commands::Scores { reset } => {
            let mut scores = ScoreBoard::load(&prefs);
            if reset {
                scores
                    .reset(&mut prefs)
                    .with_context(|| format!("failed to reset {}", store.display()))?;
            }
            println!("won={}", scores.times_won);
            println!("lost={}", scores.times_lost);
            println!("played={}", scores.played());
        }
        Commands::Configure { enemies, bullets } => {
            let settings = Settings::parse(&enemies, &bullets).ok_or_else(|| {
                anyhow!("enemies and bullets must be non-negative integers, got '{enemies}' and '{bullets}'")
            })?;
            settings
                .save(&mut prefs)
                .with_context(|| format!("failed to write {}", store.display()))?;
            println!("enemies={}", settings.enemy_count);
            println!("bullets={}", settings.bullet_count);
        }
    }

    Ok(())
}

type HeadlessEncounter = Encounter<JsonFileStore, RecordingNavigator, RecordingSurface>;

/// Run the encounter until it navigates away or `max_ms` of game time pass
fn play(mut encounter: HeadlessEncounter, max_ms: u64) -> (HeadlessEncounter, u64) {
    let mut events = EventLoop::new();
    let input = events.sender();
    encounter.start(&mut events);

    let mut next_decision = 0;
    while events.now_ms() < max_ms && encounter.navigator().last().is_none() {
        if events.now_ms() >= next_decision {
            for command in autopilot(encounter.state()) {
                input.post(GameEvent::Input(command));
            }
            next_decision += AUTOPILOT_PERIOD_MS;
        }

        let deadline = events.now_ms() + TICK_INTERVAL_MS;
        events.run_until(deadline, |events, event| encounter.handle(event, events));
    }

    let elapsed = events.now_ms();
    (encounter, elapsed)
}

/// Reload when empty, otherwise tap on the closest pursuer's centre
fn autopilot(state: &EncounterState) -> Vec<InputEvent> {
    if state.magazine.remaining() == 0 {
        return vec![InputEvent::Reload];
    }

    let player = state.player.pos;
    state
        .pursuers
        .iter()
        .map(|p| p.pos + Vec2::splat(p.radius))
        .min_by(|a, b| a.distance_squared(player).total_cmp(&b.distance_squared(player)))
        .map(|target| vec![InputEvent::tap_down(target), InputEvent::tap_up(target)])
        .unwrap_or_default()
}
