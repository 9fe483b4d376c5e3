use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::error;

use gmatool::error::Result;
use gmatool::extract::{self, Extraction};
use gmatool::{io, merge};

/// Extract models from and merge GMA/TPL archive pairs.
///
/// Every command takes extension-less base names; `<BASE>` refers to the
/// pair `<BASE>.gma` + `<BASE>.tpl`. Inputs are never modified.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the blue, green, and red goal models to <BASE>_GOAL_{B,G,R}
    #[command(name = "extract-goals", visible_alias = "ge")]
    ExtractGoals { base: PathBuf },
    /// Extract every switch (BUTTON_*) model, one archive pair per switch
    #[command(name = "extract-switches", visible_alias = "se")]
    ExtractSwitches { base: PathBuf },
    /// Extract the model with the given exact name
    #[command(name = "extract-model", visible_alias = "me")]
    ExtractModel { base: PathBuf, model: String },
    /// Merge two archive pairs; the second pair's data is placed after the first's
    #[command(name = "merge", visible_alias = "m")]
    Merge { first: PathBuf, second: PathBuf },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stdout)
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // Usage problems and help requests both exit with status 1
            let _ = err.print();
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => println!("Done!"),
        Err(err) => {
            error!("{err}");
            std::process::exit(-1);
        }
    }
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Command::ExtractGoals { base } => {
            extract_command(&base, |gma, tpl| extract::extract_goals(gma, tpl))
        }
        Command::ExtractSwitches { base } => {
            extract_command(&base, |gma, tpl| extract::extract_switches(gma, tpl))
        }
        Command::ExtractModel { base, model } => {
            extract_command(&base, |gma, tpl| extract::extract_named(gma, tpl, &model))
        }
        Command::Merge { first, second } => {
            let (gma1, tpl1) = io::map_pair(&first)?;
            let (gma2, tpl2) = io::map_pair(&second)?;
            let pair = merge::merge(&gma1, &tpl1, &gma2, &tpl2)?;

            let mut joined = first.into_os_string();
            joined.push("+");
            joined.push(second.as_os_str());
            let out = PathBuf::from(joined);
            io::write_pair(&out, &pair)?;
            println!("saved to {}", out.display());
            Ok(())
        }
    }
}

/// Run one extraction pipeline over a mapped archive pair and write each
/// produced pair to `<base>_<suffix>`.
fn extract_command<F>(base: &Path, op: F) -> Result<()>
where
    F: FnOnce(&[u8], &[u8]) -> Result<Vec<Extraction>>,
{
    let (gma, tpl) = io::map_pair(base)?;
    for extraction in op(&gma, &tpl)? {
        let mut out = base.as_os_str().to_owned();
        out.push("_");
        out.push(&extraction.suffix);
        let out = PathBuf::from(out);
        io::write_pair(&out, &extraction.pair)?;
        println!("saved to {}", out.display());
    }
    Ok(())
}
