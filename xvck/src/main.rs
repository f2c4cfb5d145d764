// xvck/src/main.rs

mod utils;

use std::fs::File;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use xvfs::xv6::*;
use xvio::prelude::StdXvIO;

use crate::utils::{LogLevel, set_log_level};

#[derive(Parser)]
#[command(name = "xvck", version, about = "xv6 filesystem image checker", long_about = None)]
struct Cli {
    /// Path to the image file
    image: PathBuf,
}

fn run(cli: &Cli) -> anyhow::Result<VerifyReport> {
    let mut file = File::open(&cli.image)
        .with_context(|| format!("image not found: {}", cli.image.display()))?;
    log_verbose!("Checking {}", cli.image.display());

    let mut io = StdXvIO::new(&mut file);
    let rep = check_image(&mut io)?;
    Ok(rep)
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are not failures
            let code = if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            let _ = e.print();
            return code;
        }
    };

    if !std::io::stderr().is_terminal() {
        colored::control::set_override(false);
    }
    set_log_level(LogLevel::from_env());

    match run(&cli) {
        Ok(rep) => {
            if let Some(layout) = rep.find("LAYOUT") {
                log_info!("{}", layout.msg);
            }
            for f in rep.findings.iter().filter(|f| f.code != "LAYOUT") {
                log_verbose!("{:<12} {}", f.code, f.msg);
            }
            log_info!("{}", "Image is consistent".green());
            ExitCode::SUCCESS
        }
        Err(e) => {
            let line = match e.downcast_ref::<FsError>().and_then(FsError::inconsistency) {
                Some(i) => i.to_string(),
                None => format!("ERROR: {e:#}"),
            };
            eprintln!("{}", line.red());
            ExitCode::FAILURE
        }
    }
}
