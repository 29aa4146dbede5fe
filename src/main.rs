use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::error;

use n2t_toolchain::driver::{self, StageReport};

#[derive(Parser)]
#[command(name = "n2t", version, about = "Nand2Tetris toolchain: Jack compiler, VM translator, Hack assembler")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile Jack source (.jack file or directory) to VM code
    Compile { path: PathBuf },
    /// Translate VM code (.vm file or directory) to Hack assembly
    Translate { path: PathBuf },
    /// Assemble Hack assembly (.asm file or directory) to machine code
    Assemble { path: PathBuf },
    /// Run compile, translate, and assemble in sequence
    Build { path: PathBuf },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match &cli.command {
        Command::Compile { path } => driver::compile(path),
        Command::Translate { path } => driver::translate(path),
        Command::Assemble { path } => driver::assemble(path),
        Command::Build { path } => driver::build(path),
    };

    match result {
        Ok(report) => report_outcome(&report),
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn report_outcome(report: &StageReport) -> ExitCode {
    for err in &report.errors {
        eprintln!("{}", err);
    }
    if report.errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
