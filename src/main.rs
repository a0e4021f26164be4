use clap::{Parser, Subcommand};
use semantic_cache::Result;
use semantic_cache::commands::{init_index, lookup_answer, show_status, store_entry};
use semantic_cache::config::{Config, run_interactive_config, show_config};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "semantic-cache")]
#[command(about = "A semantic cache for LLM answers backed by Marqo")]
#[command(version)]
struct Cli {
    /// Directory holding config.toml (defaults to the user config directory)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure the Marqo connection and cache settings
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
    /// Create the cache index if it does not exist yet
    Init,
    /// Store an answer in the cache
    Store {
        /// The original question
        question: String,
        /// The answer to return on a cache hit
        answer: String,
        /// Normalized restatement of the question, used for matching
        #[arg(long)]
        rephrased: String,
    },
    /// Look up a cached answer for a question
    Lookup {
        /// The question to match against cached entries
        question: String,
        /// Minimum similarity score for a hit (defaults to the configured threshold)
        #[arg(long)]
        threshold: Option<f64>,
        /// Number of candidates to request (defaults to the configured top k)
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Check the Marqo connection and show cache settings
    Status,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config_dir = match cli.config_dir {
        Some(dir) => dir,
        None => Config::config_dir()?,
    };

    match cli.command {
        Commands::Config { show } => {
            if show {
                show_config(&config_dir)?;
            } else {
                run_interactive_config(&config_dir)?;
            }
        }
        Commands::Init => {
            init_index(&Config::load(&config_dir)?)?;
        }
        Commands::Store {
            question,
            answer,
            rephrased,
        } => {
            store_entry(&Config::load(&config_dir)?, &question, &answer, &rephrased)?;
        }
        Commands::Lookup {
            question,
            threshold,
            top_k,
        } => {
            lookup_answer(&Config::load(&config_dir)?, &question, threshold, top_k)?;
        }
        Commands::Status => {
            show_status(&Config::load(&config_dir)?)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn init_command() {
        let cli = Cli::try_parse_from(["semantic-cache", "init"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            assert!(matches!(parsed.command, Commands::Init));
            assert_eq!(parsed.config_dir, None);
        }
    }

    #[test]
    fn store_command() {
        let cli = Cli::try_parse_from([
            "semantic-cache",
            "store",
            "What is the capital of France?",
            "Paris",
            "--rephrased",
            "capital of France",
        ]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Store {
                question,
                answer,
                rephrased,
            } = parsed.command
            {
                assert_eq!(question, "What is the capital of France?");
                assert_eq!(answer, "Paris");
                assert_eq!(rephrased, "capital of France");
            } else {
                panic!("expected store command");
            }
        }
    }

    #[test]
    fn store_requires_rephrased_query() {
        let cli = Cli::try_parse_from(["semantic-cache", "store", "question", "answer"]);
        assert!(cli.is_err());

        if let Err(err) = cli {
            assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        }
    }

    #[test]
    fn lookup_command_defaults() {
        let cli = Cli::try_parse_from(["semantic-cache", "lookup", "capital city of France"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Lookup {
                question,
                threshold,
                top_k,
            } = parsed.command
            {
                assert_eq!(question, "capital city of France");
                assert_eq!(threshold, None);
                assert_eq!(top_k, None);
            } else {
                panic!("expected lookup command");
            }
        }
    }

    #[test]
    fn lookup_command_with_options() {
        let cli = Cli::try_parse_from([
            "semantic-cache",
            "lookup",
            "capital city of France",
            "--threshold",
            "0.5",
            "--top-k",
            "3",
            "--config-dir",
            "/tmp/semantic-cache",
        ]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            assert_eq!(parsed.config_dir, Some(PathBuf::from("/tmp/semantic-cache")));
            if let Commands::Lookup {
                threshold, top_k, ..
            } = parsed.command
            {
                assert_eq!(threshold, Some(0.5));
                assert_eq!(top_k, Some(3));
            } else {
                panic!("expected lookup command");
            }
        }
    }

    #[test]
    fn config_show_flag() {
        let cli = Cli::try_parse_from(["semantic-cache", "config", "--show"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Config { show } = parsed.command {
                assert!(show);
            }
        }
    }

    #[test]
    fn status_command() {
        let cli = Cli::try_parse_from(["semantic-cache", "status"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            assert!(matches!(parsed.command, Commands::Status));
        }
    }

    #[test]
    fn invalid_command() {
        let cli = Cli::try_parse_from(["semantic-cache", "invalid"]);
        assert!(cli.is_err());

        if let Err(err) = cli {
            assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
        }
    }

    #[test]
    fn help_message() {
        let cli = Cli::try_parse_from(["semantic-cache", "--help"]);
        assert!(cli.is_err());

        if let Err(err) = cli {
            assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        }
    }
}
