use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use groogie_core::{
    Actor, AppConfig, ChoreographyStore, Ensemble, GroogieError, HeadlessActor, PlaybackEvent, StagePoint,
};
use tracing_subscriber::EnvFilter;

fn main() -> groogie_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AppConfig::from_path(path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Init { store } => run_init(&config, &store),
        Commands::AddStep {
            store,
            dancer,
            step,
            duration,
        } => edit(&store, |choreos| {
            let index = choreos.append_dance_step(&dancer, step, duration, &config.editor);
            tracing::info!(%dancer, index, "added dance step");
            Ok(())
        }),
        Commands::AddMove {
            store,
            dancer,
            x,
            z,
            duration,
        } => {
            let bounds = config.stage.bounds();
            let target = bounds.clamp(StagePoint::from_pick(x, z));
            edit(&store, |choreos| {
                let index = choreos.append_move_to(&dancer, target, duration, &config.editor);
                tracing::info!(%dancer, index, x = target.x, z = target.z, "added move");
                Ok(())
            })
        }
        Commands::Delete {
            store,
            dancer,
            index,
        } => edit(&store, |choreos| {
            let removed = choreos.delete_block(&dancer, index)?;
            tracing::info!(%dancer, index, kind = %removed.kind(), "deleted block");
            Ok(())
        }),
        Commands::SetDuration {
            store,
            dancer,
            index,
            seconds,
        } => edit(&store, |choreos| choreos.update_duration(&dancer, index, seconds)),
        Commands::Show { store, dancer } => run_show(&store, dancer.as_deref()),
        Commands::Preview { store, dancer, fps } => {
            run_preview(&config, &store, dancer.as_deref(), fps)
        }
    }
}

fn run_init(config: &AppConfig, path: &Path) -> groogie_core::Result<()> {
    let store = ChoreographyStore::with_dancers(config.stage.dancer_ids());
    store.save(path)?;
    tracing::info!(path = %path.display(), "initialised choreography store");
    Ok(())
}

fn edit(
    path: &Path,
    apply: impl FnOnce(&mut ChoreographyStore) -> groogie_core::Result<()>,
) -> groogie_core::Result<()> {
    let mut store = ChoreographyStore::load(path)?;
    apply(&mut store)?;
    store.save(path)
}

fn run_show(path: &Path, dancer: Option<&str>) -> groogie_core::Result<()> {
    let store = ChoreographyStore::load(path)?;
    for (id, choreo) in store.iter() {
        if dancer.is_some_and(|wanted| wanted != id) {
            continue;
        }
        println!("{id} ({} blocks, {:.2}s)", choreo.len(), choreo.total_duration());
        for (index, block) in choreo.iter().enumerate() {
            println!("  [{index}] {} {:.2}s", block.kind(), block.duration_seconds());
        }
    }
    Ok(())
}

fn run_preview(
    config: &AppConfig,
    path: &Path,
    dancer: Option<&str>,
    fps: Option<u32>,
) -> groogie_core::Result<()> {
    let store = ChoreographyStore::load(path)?;
    let mut ensemble = Ensemble::from_roster(&config.stage.roster, |_| {
        HeadlessActor::with_dance_catalog()
    });

    let longest = match dancer {
        Some(id) => {
            ensemble.play_solo(id, &store)?;
            store.choreography(id).total_duration()
        }
        None => {
            ensemble.play_all(&store);
            store
                .iter()
                .map(|(_, choreo)| choreo.total_duration())
                .fold(0.0, f64::max)
        }
    };

    let frame_rate = fps.unwrap_or(config.preview.frame_rate);
    let events = ensemble.run_for(longest + config.preview.settle_seconds, frame_rate);
    for (id, event) in &events {
        match event {
            PlaybackEvent::BlockStarted { index, kind } => {
                tracing::debug!(dancer = %id, index, %kind, "block")
            }
            other => tracing::info!(dancer = %id, event = ?other, "playback"),
        }
    }

    if !ensemble.is_settled() {
        return Err(GroogieError::msg("preview ended before every dancer finished"));
    }

    for id in ensemble.dancers() {
        if let Some(player) = ensemble.player(id) {
            let position = player.actor().position();
            println!(
                "{id}: {:?} at ({:.2}, {:.2}, {:.2})",
                player.state(),
                position.x,
                position.y,
                position.z
            );
        }
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Edit and preview dancer choreographies", long_about = None)]
struct Cli {
    /// Optional JSON configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write an empty store for every dancer in the roster.
    Init {
        store: PathBuf,
    },
    /// Append a dance step to a dancer's choreography.
    AddStep {
        store: PathBuf,
        #[arg(short, long)]
        dancer: String,
        /// Clip name from the dance catalog.
        #[arg(short, long)]
        step: String,
        /// Seconds to loop the clip for.
        #[arg(long)]
        duration: Option<f32>,
    },
    /// Append a move to a point on the stage floor.
    AddMove {
        store: PathBuf,
        #[arg(short, long)]
        dancer: String,
        #[arg(short, long, allow_negative_numbers = true)]
        x: f32,
        #[arg(short, long, allow_negative_numbers = true)]
        z: f32,
        /// Seconds the walk takes.
        #[arg(long)]
        duration: Option<f32>,
    },
    /// Remove the block at `index`.
    Delete {
        store: PathBuf,
        #[arg(short, long)]
        dancer: String,
        #[arg(short, long)]
        index: usize,
    },
    /// Change the duration of the block at `index`.
    SetDuration {
        store: PathBuf,
        #[arg(short, long)]
        dancer: String,
        #[arg(short, long)]
        index: usize,
        #[arg(short, long)]
        seconds: f32,
    },
    /// Print the stored choreographies.
    Show {
        store: PathBuf,
        #[arg(short, long)]
        dancer: Option<String>,
    },
    /// Play the choreography headlessly and report where everyone ends up.
    Preview {
        store: PathBuf,
        /// Preview a single dancer instead of the whole troupe.
        #[arg(short, long)]
        dancer: Option<String>,
        #[arg(long)]
        fps: Option<u32>,
    },
}
