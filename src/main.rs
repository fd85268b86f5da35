use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "trifold",
    version,
    about = "Fan out three report workers and consolidate their sections"
)]
struct Cli {
    /// Input file with one record per line
    input_file: PathBuf,

    /// Output file receiving the consolidated report
    output_file: PathBuf,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // usage problems exit 1; --help and --version keep clap's exit 0
        Err(err) if err.use_stderr() => {
            let _ = err.print();
            std::process::exit(1);
        }
        Err(err) => err.exit(),
    };

    init_logging(cli.verbose);
    tracing::debug!(
        "consolidating {} into {}",
        cli.input_file.display(),
        cli.output_file.display()
    );

    if let Err(error) = trifold::orchestrator::run(&cli.input_file, &cli.output_file).await {
        eprintln!("Error: {error:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_requires_both_paths() {
        let err = Cli::try_parse_from(["trifold", "only-one"]).unwrap_err();
        assert!(err.use_stderr());
    }

    #[test]
    fn test_verbose_flag_counts() {
        let cli = Cli::try_parse_from(["trifold", "in.txt", "out.txt", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
