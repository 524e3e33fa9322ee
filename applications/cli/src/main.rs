/// Waves CLI - replays user commands against playback sessions
use clap::Parser;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use waves_cli::{read_commands, write_outputs, CliConfig, CommandRunner, Library};

#[derive(Parser)]
#[command(name = "waves-cli")]
#[command(about = "Replay Waves user commands against playback sessions", long_about = None)]
struct Cli {
    /// Library JSON file (songs, podcasts, albums, playlists, users)
    #[arg(short, long, env = "WAVES_LIBRARY")]
    library: PathBuf,

    /// Commands JSON file
    #[arg(short = 'i', long)]
    commands: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = CliConfig::load(cli.config.as_deref())?;
    config.validate()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Waves CLI");
    tracing::info!("Skip step: {}s", config.playback.skip_step_secs);

    let library = Library::load(&cli.library)?;
    let commands = read_commands(&cli.commands)?;

    let mut runner = CommandRunner::new(library, config.playback)?;
    let outputs = runner.run(&commands);

    match &cli.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_outputs(&mut writer, &outputs, config.output.pretty)?;
            writer.flush()?;
            tracing::info!("Wrote {} responses to {:?}", outputs.len(), path);
        }
        None => {
            write_outputs(std::io::stdout().lock(), &outputs, config.output.pretty)?;
            println!();
        }
    }

    Ok(())
}
