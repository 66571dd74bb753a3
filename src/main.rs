use anyhow::{Context as _, Result};
use clap::Parser;
use std::io::Write;

use deploycfg::{app, cli::Args, logger, EnvSnapshot};

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_logger(args.log_level.map(Into::into))?;

    let snapshot = EnvSnapshot::from_process();
    let cwd = std::env::current_dir().context("could not determine working directory")?;

    let outcome = app::run(&args, &snapshot, &cwd)?;

    if !outcome.stderr.is_empty() {
        eprint!("{}", outcome.stderr);
    }

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(outcome.stdout.as_bytes())
        .context("failed to write to stdout")?;
    stdout.flush()?;
    Ok(())
}
