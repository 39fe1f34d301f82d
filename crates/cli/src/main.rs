//! `random-alchemy` binary.
//!
//! ```bash
//! random-alchemy --min-effects 2 --no-loners --keep-yaml -o ./out
//! ```

use alchemy_cli::{Randomize, logging};
use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args = Randomize::parse();
    logging::setup_logging(args.verbose)?;

    let summary = args.execute()?;
    summary.print();
    Ok(())
}
