use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;

use wpilog_indexer::{load_file, Indexer};

const USAGE: &str = "usage: wpilog_indexer <file.wpilog> [--entries] [--strict]";

struct Args {
    path: String,
    entries: bool,
    strict: bool,
}

fn parse_args() -> Option<Args> {
    let mut path = None;
    let mut entries = false;
    let mut strict = false;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--entries" => entries = true,
            "--strict" => strict = true,
            _ if path.is_none() && !arg.starts_with("--") => path = Some(arg),
            _ => return None,
        }
    }
    Some(Args { path: path?, entries, strict })
}

fn run(args: &Args) -> io::Result<()> {
    let log = load_file(&args.path, &Indexer::new(), args.strict)?;
    let header = log.header();
    let (min, max) = log.index.timestamp_range();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "file:          {}", args.path)?;
    writeln!(out, "size:          {} bytes", log.data.len())?;
    writeln!(out, "version:       {:#06x}", header.version())?;
    writeln!(out, "extra header:  {:?}", header.extra_header())?;
    writeln!(out, "records:       {}", log.index.record_count())?;
    writeln!(out, "time range:    {:.6}s .. {:.6}s", min, max)?;

    if args.entries {
        for entry in log.index.entries() {
            writeln!(out, "{:>10} {:>12}", entry.entry_id, entry.offset)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let (writer, _guard) = tracing_appender::non_blocking(io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .init();

    let Some(args) = parse_args() else {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(path = %args.path, error = %err, "failed to index log");
            ExitCode::FAILURE
        }
    }
}
