//! # assay2msp
//!
//! Command-line converter from targeted assay libraries to MSP spectral
//! libraries.
//!
//! ## Usage
//!
//! ```bash
//! # Convert an assay library, removing decoys
//! assay2msp convert assay_library.tsv library.msp
//!
//! # Keep decoys and use one entry per transition group
//! assay2msp -v convert assay_library.tsv library.msp --keep-decoys --grouping strict
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
