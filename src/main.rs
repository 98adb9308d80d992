use clap::Parser;
use crewsim::config::{WINDOW_HEIGHT, WINDOW_WIDTH};
use crewsim::game::{Game, SessionOptions};
use crewsim::logging;
use crewsim::render::Renderer;
use crewsim::types::{Role, Room};
use log::{error, info};
use macroquad::prelude::Conf;

// --- Command Line Arguments ---
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed for role draw, impostor choice and bot wandering. Random if omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Force the player's role (crewmate or impostor) instead of drawing it.
    #[arg(long)]
    role: Option<Role>,

    /// Force which room's bot is the hidden impostor in crew sessions.
    #[arg(long)]
    impostor_bot: Option<Room>,

    /// Debug filter to specify log topics (e.g., "ai,move")
    /// Available topics: ai, move, ability, report
    #[arg(long)]
    debug_filter: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Crew Simulation".to_owned(),
        window_width: WINDOW_WIDTH,
        window_height: WINDOW_HEIGHT,
        window_resizable: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let args = Args::parse();

    // RUST_LOG takes over when set; otherwise the topic-filtered logger
    if std::env::var_os("RUST_LOG").is_some() {
        env_logger::init();
    } else if let Err(e) =
        logging::init_logger(logging::parse_level(&args.log_level), args.debug_filter)
    {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }

    let seed = args.seed.unwrap_or_else(|| chrono::Utc::now().timestamp_millis() as u64);
    info!("Initializing crew simulation (seed {})...", seed);

    let mut game = Game::new(SessionOptions {
        seed,
        role: args.role,
        impostor_bot: args.impostor_bot,
    });
    let mut renderer = Renderer::new();
    if let Err(e) = game.run(&mut renderer).await {
        error!("Game loop failed: {}", e);
    }
}
