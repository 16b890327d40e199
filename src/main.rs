use std::{fs::read_to_string, path::PathBuf, process::ExitCode, time::Instant};

use clap::Parser;
use ipl_frontend::{check_source, render_diagnostic, FrontEnd};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "iplc", about = "Parse and check an IPL source file")]
struct Cli {
    /// Source file to check
    file: PathBuf,

    /// Print the parsed program
    #[arg(long)]
    ast: bool,

    /// Print the scope tree after analysis
    #[arg(long)]
    symbols: bool,

    /// Report informational diagnostics from the analyzer
    #[arg(short, long)]
    verbose: bool,

    /// Run semantic analysis even when parsing reported errors
    #[arg(long)]
    keep_going: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let source = match read_to_string(&cli.file) {
        Ok(source) => source,
        Err(err) => {
            error!("failed to read {}: {}", cli.file.display(), err);
            return ExitCode::FAILURE;
        }
    };

    let file_name = cli.file.to_string_lossy();
    let start = Instant::now();

    let output = check_source(
        &source,
        FrontEnd {
            verbose: cli.verbose,
            analyze_on_syntax_error: cli.keep_going,
        },
    );

    debug!("checked {} in {:?}", file_name, start.elapsed());

    if cli.ast {
        print!("{}", output.program);
    }

    if cli.symbols {
        if let Some(scopes) = &output.scopes {
            print!("{}", scopes.summary());
        }
    }

    for diagnostic in output.diagnostics.iter() {
        eprint!("{}", render_diagnostic(diagnostic, &source, &file_name));
    }

    if output.succeeded() {
        ExitCode::SUCCESS
    } else {
        eprintln!(
            "{}: {} error(s)",
            file_name,
            output.diagnostics.error_count()
        );
        ExitCode::FAILURE
    }
}
