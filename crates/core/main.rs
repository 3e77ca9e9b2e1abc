#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![allow(clippy::as_conversions, clippy::mod_module_files)]

use std::{path::PathBuf, process};

mod commands;
mod notify;

use commands::Commands;
use notify::ConsoleNotifier;

use bookstore::file::CatalogFile;

use clap::{Args, Parser};
use eyre::{Context, Result};
use log::trace;

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        process::exit(2);
    }
}

fn try_main() -> Result<()> {
    let Cli {
        command,
        global_opts:
            GlobalOpts {
                file,
                verbosity,
                quiet,
            },
    } = Cli::parse();

    setup_errlog(verbosity as usize, quiet)?;

    let mut file = CatalogFile::open_or_create(file)?;
    let mut catalog = file
        .read()
        .wrap_err_with(|| format!("Cannot load the catalog from '{}'", file.path().display()))?;

    let mut notifier = ConsoleNotifier::new(quiet);
    let command_res = command.execute(&mut catalog, &mut notifier);

    // changes made before a failure are kept, e.g. products imported before a network error
    if catalog.dirty() {
        trace!("Updating the catalog file..");
        file.write(&catalog)?;
        trace!("Done!");
    }

    let message = command_res?;
    if !quiet {
        println!("{message}");
    }
    Ok(())
}

fn setup_errlog(verbosity: usize, quiet: bool) -> Result<()> {
    // if quiet then ignore verbosity but still show errors
    let verbosity = if quiet { 0 } else { verbosity + 1 };

    stderrlog::new()
        .verbosity(verbosity)
        .init()
        .wrap_err("Cannot initialise logging")
}

#[derive(Parser)]
#[clap(name = "bookstore")]
#[clap(about = "Keep a catalog of books and fill in book data from the Google Books API")]
#[clap(version, author)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(flatten)]
    global_opts: GlobalOpts,
}

#[derive(Debug, Args)]
struct GlobalOpts {
    /// The catalog file
    ///
    /// When not given the single .json file in the current directory is used, or a new
    /// catalog.json file is created.
    #[clap(short, long, parse(from_os_str), global = true)]
    file: Option<PathBuf>,

    /// How chatty the program is when performing commands
    ///
    /// The number of times this flag is used will increase how chatty
    /// the program is.
    #[clap(short, long, parse(from_occurrences), global = true)]
    verbosity: u8,

    /// Prevents the program from writing to stdout, errors will still be printed to stderr.
    #[clap(short, long, global = true)]
    quiet: bool,
}
