// SPDX-License-Identifier: MIT OR Apache-2.0
//! Step chain player - Runs a scene file's chain without a window.

use std::path::PathBuf;

use clap::Parser;
use stepchain::SceneFile;
use stepchain_editor::{InputScript, Player, PlayerError, ScriptedInput};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stepchain-player")]
#[command(about = "Play a step chain scene frame by frame")]
#[command(version)]
struct Cli {
    /// Scene file (.ron or .json)
    scene: PathBuf,

    /// Maximum number of frames to play
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Play mode time scale
    #[arg(long, default_value_t = 1.0)]
    time_scale: f32,

    /// Key pressed on a frame, as FRAME:KEY (repeatable)
    #[arg(short, long = "key", value_name = "FRAME:KEY")]
    keys: Vec<ScriptedInput>,

    /// Button clicked on a frame, as FRAME:PATH (repeatable)
    #[arg(short, long = "click", value_name = "FRAME:PATH")]
    clicks: Vec<ScriptedInput>,

    /// Stop once the chain finishes and no scripted input is left
    #[arg(short, long)]
    until_finished: bool,

    /// Print the inspector view of every step at the end
    #[arg(long)]
    describe: bool,
}

fn main() {
    let cli = Cli::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("stepchain=debug,stepchain_player=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting step chain player v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&cli) {
        tracing::error!("Player failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), PlayerError> {
    let file = SceneFile::load(&cli.scene)?;
    tracing::info!(path = %cli.scene.display(), root = %file.chain_root, "Loaded scene");

    let script = InputScript::new(cli.keys.clone(), cli.clicks.clone());
    let mut player = Player::new(&file, script)?;
    player.set_time_scale(cli.time_scale);
    player.start()?;

    let summary = player.run(cli.frames, cli.dt, cli.until_finished)?;

    if cli.describe {
        for line in player.describe() {
            println!("{line}");
        }
    }
    println!("{}", summary.to_ron()?);

    player.stop();
    Ok(())
}
