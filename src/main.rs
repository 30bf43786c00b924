use badlang::config::Config;
use badlang::error::LangError;
use badlang::parser::to_sexpr;
use clap::{Parser as ClapParser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(author, version, about = "BadLang expression interpreter")]
struct Cli {
    /// Show the offending source line with carets under errors
    #[arg(long, global = true)]
    arrows: bool,

    /// Log lexer, parser and interpreter activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a single statement
    Eval {
        source: String,
    },
    /// Evaluate each line of a file in one shared environment
    Run {
        file: PathBuf,
    },
    /// Print the token stream as JSON
    Tokens {
        source: String,
    },
    /// Print the parsed tree
    Ast {
        source: String,
    },
    /// Manage BadLang configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Write a default configuration file
    Init,
    /// Print where the configuration file lives
    Path,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "badlang=debug" } else { "badlang=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn report(err: &LangError, arrows: bool) {
    if arrows {
        eprintln!("{}", err.with_arrows());
    } else {
        eprintln!("{}", err);
    }
}

fn run_file(path: &PathBuf, config: &Config, arrows: bool) -> Result<bool, Box<dyn std::error::Error>> {
    let source_code = fs::read_to_string(path)?;
    let source_name = path.display().to_string();
    let context = config.root_context();

    for (line_number, line) in source_code.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        match badlang::run_line(&source_name, line, line_number, &context) {
            Ok(value) => println!("{}", value),
            Err(err) => {
                report(&err, arrows);
                return Ok(false);
            }
        }
    }

    Ok(true)
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load();
    let arrows = cli.arrows || config.show_arrows;

    let succeeded = match cli.command {
        Commands::Eval { source } => {
            let context = config.root_context();
            match badlang::run(&config.source_name, &source, &context) {
                Ok(value) => {
                    println!("{}", value);
                    true
                }
                Err(err) => {
                    report(&err, arrows);
                    false
                }
            }
        }
        Commands::Run { file } => run_file(&file, &config, arrows)?,
        Commands::Tokens { source } => match badlang::tokenize(&config.source_name, &source) {
            Ok(tokens) => {
                println!("{}", serde_json::to_string_pretty(&tokens)?);
                true
            }
            Err(err) => {
                report(&err, arrows);
                false
            }
        },
        Commands::Ast { source } => match badlang::parse(&config.source_name, &source) {
            Ok(ast) => {
                println!("{}", to_sexpr(&ast));
                true
            }
            Err(err) => {
                report(&err, arrows);
                false
            }
        },
        Commands::Config { command } => {
            match command {
                ConfigCommands::Show => {
                    println!("{}", serde_json::to_string_pretty(&config)?);
                }
                ConfigCommands::Init => {
                    let path = Config::get_config_path();
                    if path.exists() {
                        println!("Config file already exists at: {}", path.display());
                    } else {
                        Config::default().save()?;
                        println!("Initialized new config file at: {}", path.display());
                    }
                }
                ConfigCommands::Path => {
                    println!("{}", Config::get_config_path().display());
                }
            }
            true
        }
    };

    Ok(if succeeded { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
