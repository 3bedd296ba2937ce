use clap::{ArgAction, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing::level_filters::LevelFilter;
use trigrind::{
    config::{Config, ConfigStore, FileConfigStore},
    phrase,
    FileStore, GeneratorKind, Session, SessionOutcome, Trainer, TrainerError, TrainerResult,
};

/// adaptive typing practice built from your slowest trigrams
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Records typing sessions, tracks how long every trigram takes you to type and generates practice text aimed at the slowest ones."
)]
pub struct Cli {
    /// directory holding statistics, the session log and text progress
    #[clap(long, global = true)]
    data_dir: Option<PathBuf>,

    /// config file to use instead of the default location
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// more log output, repeat for more
    #[clap(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// record a finished session read from a JSON file
    Record {
        file: PathBuf,
        /// the session was typing generated practice text
        #[clap(long)]
        training: bool,
    },
    /// repeat the cheapest loop through the weakest trigram
    Weakest {
        #[clap(short, long)]
        length: Option<usize>,
    },
    /// random text weighted towards weak trigrams
    Markov {
        #[clap(short, long)]
        length: Option<usize>,
        #[clap(long)]
        seed: Option<u64>,
    },
    /// generate practice text with the chosen generator
    Generate {
        #[clap(value_enum)]
        kind: GeneratorKind,
        #[clap(short, long)]
        length: Option<usize>,
        #[clap(long)]
        seed: Option<u64>,
    },
    /// random words picked from a word list ("-" reads stdin)
    Words {
        file: PathBuf,
        #[clap(short = 'n', long, default_value_t = 15)]
        count: usize,
        #[clap(long)]
        seed: Option<u64>,
    },
    /// next lines of a text file to type, resuming where the last run ended
    Lines {
        file: PathBuf,
        /// 0 prints the rest of the file
        #[clap(short = 'm', long, default_value_t = 0)]
        min_length: usize,
        /// start at this line instead of the saved position
        #[clap(short, long)]
        offset: Option<usize>,
    },
    /// print typing statistics and progress
    Stats,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    fn load_config(&self) -> Config {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path).load(),
            None => FileConfigStore::new().load(),
        }
    }
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn run(cli: &Cli, config: &Config, data_dir: &Path) -> TrainerResult<()> {
    match &cli.command {
        Command::Words { file, count, seed } => {
            let words = phrase::load_lines(file)?;
            println!("{}", phrase::random_words(&words, *count, &mut rng_from(*seed)));
            return Ok(());
        }
        Command::Lines {
            file,
            min_length,
            offset,
        } => {
            let store = FileStore::with_dir(data_dir);
            let mut progress = store.load_progress()?;
            let start = match offset {
                Some(offset) => *offset,
                None => {
                    let saved = progress.offset(file)?;
                    info!(line = saved, "resuming from saved progress");
                    saved
                }
            };
            let lines = phrase::slice_lines(&phrase::load_text(file, start)?, *min_length);
            for line in &lines {
                println!("{line}");
            }
            if progress.advance(file, start, lines.len())? {
                store.save_progress(&progress)?;
            }
            return Ok(());
        }
        _ => {}
    }

    let mut trainer = Trainer::open(FileStore::with_dir(data_dir))?;
    match &cli.command {
        Command::Record { file, training } => {
            let mut session: Session = serde_json::from_str(&fs::read_to_string(file)?)?;
            session.is_training |= *training;
            match trainer.record_session(&session)? {
                SessionOutcome::Recorded => println!(
                    "Recorded {} characters, {} sessions so far",
                    session.text.chars().count(),
                    trainer.stats().sessions_count
                ),
                SessionOutcome::TooShort => println!("Session too short, nothing recorded"),
            }
        }
        Command::Weakest { length } => {
            let length = config.exercise_length(GeneratorKind::Weakest, *length);
            println!("{}", trainer.weakest_sequence(length)?);
        }
        Command::Markov { length, seed } => {
            let length = config.exercise_length(GeneratorKind::Markov, *length);
            println!("{}", trainer.markov_sequence(length, &mut rng_from(*seed))?);
        }
        Command::Generate { kind, length, seed } => {
            let length = config.exercise_length(*kind, *length);
            println!("{}", trainer.generate(*kind, length, &mut rng_from(*seed))?);
        }
        Command::Stats => {
            println!("{}", trainer.report(config.report_top)?);
        }
        Command::Words { .. } | Command::Lines { .. } => {}
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .init();

    let config = cli.load_config();
    let data_dir = config.resolve_data_dir(cli.data_dir.as_deref());

    if let Err(e) = run(&cli, &config, &data_dir) {
        match &e {
            TrainerError::InsufficientData { .. } => eprintln!("{e}"),
            e if e.is_storage() => {
                eprintln!("Could not read or write training data in {}: {e}", data_dir.display())
            }
            e => eprintln!("{e}"),
        }
        std::process::exit(1);
    }
}
