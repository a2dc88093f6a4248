//! tweetnorm CLI - tweet dataset normalization tool
//!
//! A command-line tool for normalizing and deduplicating tweet datasets.

use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tweetnorm::{
    default_output_path, read_table, AbbreviationMap, Cell, PreprocessOptions, Preprocessor,
    Resources, SpellModel, SpellOptions, StopwordSet,
};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "TWEETNORM_LOG";

/// Tweet text normalization and deduplication
#[derive(Parser)]
#[command(
    name = "tweetnorm",
    version,
    about = "Normalize and deduplicate tweet datasets",
    long_about = "tweetnorm - Tweet text normalization for NLP.\n\n\
                  Strips markup, handles and URLs, names emoji, expands chat\n\
                  abbreviations, corrects spelling, removes stopwords and drops\n\
                  duplicate tweets.\n\n\
                  Usage:\n  \
                  tweetnorm process <file>     Write <file>_processed.csv\n  \
                  tweetnorm text \"<tweet>\"     Normalize a single tweet"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print debug logs (overrides TWEETNORM_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize and deduplicate a dataset
    Process {
        /// Input file path (.csv, .tsv, .xlsx)
        input: PathBuf,

        /// Output file path (default: <input>_processed.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Column holding the raw tweet text
        #[arg(long, default_value = tweetnorm::options::DEFAULT_TEXT_COLUMN)]
        column: String,

        /// Column receiving the normalized text
        #[arg(long, default_value = tweetnorm::options::DEFAULT_OUTPUT_COLUMN)]
        output_column: String,

        /// Column to drop from the output (repeatable; default: text_info)
        #[arg(long = "drop-column")]
        drop_columns: Vec<String>,

        #[command(flatten)]
        resources: ResourceArgs,

        /// Process records on a single thread
        #[arg(long)]
        sequential: bool,
    },

    /// Normalize a single text
    Text {
        /// Text to normalize
        text: String,

        /// Print the output of every stage
        #[arg(long)]
        trace: bool,

        #[command(flatten)]
        resources: ResourceArgs,
    },

    /// Show dataset information
    Info {
        /// Input file path
        input: PathBuf,

        /// Column holding the raw tweet text
        #[arg(long, default_value = tweetnorm::options::DEFAULT_TEXT_COLUMN)]
        column: String,
    },

    /// Show version information
    Version,
}

/// Resource overrides shared by the normalizing commands.
#[derive(clap::Args)]
struct ResourceArgs {
    /// Abbreviation table (JSON object of abbreviation to expansion)
    #[arg(long)]
    abbreviations: Option<PathBuf>,

    /// Stopword list (one word per line)
    #[arg(long)]
    stopwords: Option<PathBuf>,

    /// Spelling dictionary (JSON {word: count} or "word [count]" lines; default: built-in English)
    #[arg(long)]
    dictionary: Option<PathBuf>,

    /// Maximum edit distance for spelling correction
    #[arg(long, default_value = "2", value_parser = clap::value_parser!(u8).range(1..=2))]
    max_distance: u8,

    /// Disable spelling correction
    #[arg(long)]
    no_spell: bool,
}

impl ResourceArgs {
    fn load(&self) -> tweetnorm::Result<Resources> {
        let mut resources = Resources::new();

        if let Some(path) = &self.abbreviations {
            resources = resources.with_abbreviations(AbbreviationMap::load(path)?);
        }
        if let Some(path) = &self.stopwords {
            resources = resources.with_stopwords(StopwordSet::load(path)?);
        }

        let dictionary = match &self.dictionary {
            Some(path) => SpellModel::load(path)?,
            None => SpellModel::english(),
        };
        let options = SpellOptions::default().with_max_distance(self.max_distance);
        resources = resources.with_dictionary(dictionary.with_options(options));

        Ok(resources)
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("tweetnorm=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Process {
            input,
            output,
            column,
            output_column,
            drop_columns,
            resources,
            sequential,
        } => {
            let output = output.unwrap_or_else(|| default_output_path(&input));
            run_process(
                &input,
                &output,
                column,
                output_column,
                drop_columns,
                &resources,
                sequential,
            )?;
        }

        Commands::Text {
            text,
            trace,
            resources,
        } => {
            let preprocessor = build_preprocessor(&resources, PreprocessOptions::default())?;

            if trace {
                println!("{}: {:?}", "input".bold(), text);
                for (stage, output) in preprocessor.pipeline().trace(&text) {
                    println!("{}: {:?}", stage.name().cyan(), output);
                }
            } else {
                println!("{}", preprocessor.normalize(&text));
            }
        }

        Commands::Info { input, column } => {
            let pb = create_spinner("Reading dataset...");

            let format = tweetnorm::detect_format_from_path(&input)?;
            let table = read_table(&input)?;

            pb.finish_and_clear();

            println!("{}", "Dataset Information".cyan().bold());
            println!("{}", "─".repeat(40));
            println!(
                "{}: {}",
                "File".bold(),
                input.file_name().unwrap_or_default().to_string_lossy()
            );
            println!("{}: {}", "Format".bold(), format);
            println!("{}: {}", "Rows".bold(), table.row_count());
            println!("{}: {}", "Columns".bold(), table.columns.join(", "));

            match table.column_index(&column) {
                Some(index) => {
                    let (mut text, mut absent, mut other) = (0usize, 0usize, 0usize);
                    for cell in table.column(index) {
                        match cell {
                            Cell::Text(_) => text += 1,
                            Cell::Empty => absent += 1,
                            Cell::Number(_) | Cell::Bool(_) => other += 1,
                        }
                    }

                    println!("\n{} '{}'", "Text Column".cyan().bold(), column);
                    println!("{}", "─".repeat(40));
                    println!("{}: {}", "Text".bold(), text);
                    println!("{}: {}", "Absent".bold(), absent);
                    println!("{}: {}", "Non-text".bold(), other);
                }
                None => println!(
                    "\n{} Column '{}' not found",
                    "!".yellow().bold(),
                    column
                ),
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn run_process(
    input: &Path,
    output: &Path,
    column: String,
    output_column: String,
    drop_columns: Vec<String>,
    resources: &ResourceArgs,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = create_spinner("Loading resources...");

    let mut options = PreprocessOptions::new()
        .with_text_column(column)
        .with_output_column(output_column);
    if !drop_columns.is_empty() {
        options = options.with_drop_columns(drop_columns);
    }
    if sequential {
        options = options.sequential();
    }

    let preprocessor = build_preprocessor(resources, options)?;

    pb.set_message("Normalizing tweets...");
    let summary = preprocessor.process_file(input, output)?;

    pb.finish_and_clear();

    println!("{}", "Processing Complete".green().bold());
    println!("{}", "─".repeat(40));
    println!("{}: {}", "Output".bold(), output.display());
    println!("{}: {}", "Rows read".bold(), summary.input_rows);
    println!("{}: {}", "Rows written".bold(), summary.output_rows);
    println!("{}: {}", "Duplicates removed".bold(), summary.duplicates_removed);
    if summary.empty_records > 0 {
        println!(
            "{} {} rows normalized to empty text",
            "!".yellow().bold(),
            summary.empty_records
        );
    }

    Ok(())
}

fn build_preprocessor(
    resources: &ResourceArgs,
    mut options: PreprocessOptions,
) -> tweetnorm::Result<Preprocessor> {
    if resources.no_spell {
        options = options.without_spelling();
    }

    Ok(Preprocessor::new()
        .with_options(options)
        .with_resources(resources.load()?))
}

fn print_version() {
    println!("{} {}", "tweetnorm".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Tweet text normalization and deduplication");
    println!();
    println!("Input formats: CSV, TSV, XLSX");
    println!("Output formats: CSV, TSV, JSON");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
