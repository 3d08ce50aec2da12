use clap::Parser;
use log::info;
use std::process::ExitCode;
use std::time::Duration;
use uno_console::uno_game::{
    ConsoleUI, ControllerOptions, GameConfig, GameController, OutputFormat, UnoGame,
};

/// Play UNO in the console against computer opponents.
#[derive(Debug, Parser)]
#[command(name = "uno-console", version, about)]
struct Args {
    /// Number of seats, including yours
    #[arg(short, long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(2..=6))]
    players: u8,

    /// Your name at the table
    #[arg(short, long, default_value = "You")]
    name: String,

    /// Seed for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Let the computer play your seat as well
    #[arg(long)]
    autoplay: bool,

    /// Pause before each computer move, in milliseconds
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,

    /// Print every turn outcome as a JSON line
    #[arg(long)]
    json: bool,

    /// Give up after this many turns
    #[arg(long)]
    max_turns: Option<usize>,

    /// Print the rules and exit
    #[arg(long)]
    rules: bool,
}

fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let mut ui = ConsoleUI::new().with_format(format);

    if args.rules {
        ui.display_rules()?;
        return Ok(());
    }

    let mut config = GameConfig::new(usize::from(args.players))?.with_human_name(args.name);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    info!("Starting a {}-player game", config.num_players);
    let game = UnoGame::new(config)?;

    let options = ControllerOptions {
        autoplay: args.autoplay,
        think_delay: Duration::from_millis(args.delay_ms),
        max_turns: args.max_turns,
    };
    GameController::new(game, ui, options).run()?;
    Ok(())
}
