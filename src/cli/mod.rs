// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses the command line with clap and routes each
// subcommand to its use case in Layer 2. This layer owns the
// process-level resources: stdin, stdout and the Ctrl-C
// handler.
//
// Exit status: 0 on success, 1 on any operational failure
// (main returns the error), 2 on bad arguments (clap).
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use std::io::{self, BufWriter};

use anyhow::Result;
use clap::Parser;
use commands::{CheckArgs, Commands, DreamArgs, InfoArgs, InitArgs, PropArgs, TrainArgs};

use crate::infra::interrupt::StopFlag;

#[derive(Parser, Debug)]
#[command(
    name = "rbm",
    version,
    about = "Train and query a Restricted Boltzmann Machine over sparse term counts."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Init(args)  => run_init(args),
            Commands::Train(args) => run_train(args),
            Commands::Prop(args)  => run_prop(args),
            Commands::Dream(args) => run_dream(args),
            Commands::Info(args)  => run_info(args),
            Commands::Check(args) => run_check(args),
        }
    }
}

fn run_init(args: InitArgs) -> Result<()> {
    use crate::application::init_use_case::InitUseCase;

    InitUseCase::new(args.into()).execute()
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::{TrainConfig, TrainUseCase};
    use crate::infra::config_file::load_hyperparameters;

    let hyper_file = args.config.clone();
    let mut config = TrainConfig::from(args);
    if let Some(path) = hyper_file {
        config.hyper = load_hyperparameters(&path)?;
    }

    let stop = StopFlag::install_ctrlc()?;
    TrainUseCase::new(config).execute(io::stdin().lock(), &stop)?;
    Ok(())
}

fn run_prop(args: PropArgs) -> Result<()> {
    use crate::application::prop_use_case::PropUseCase;

    let stop = StopFlag::install_ctrlc()?;
    let mut out = BufWriter::new(io::stdout().lock());
    PropUseCase::new(args.into()).execute(io::stdin().lock(), &mut out, &stop)?;
    Ok(())
}

fn run_dream(args: DreamArgs) -> Result<()> {
    use crate::application::dream_use_case::DreamUseCase;

    let stop = StopFlag::install_ctrlc()?;
    let mut out = BufWriter::new(io::stdout().lock());
    DreamUseCase::new(args.into()).execute(io::stdin().lock(), &mut out, &stop)?;
    Ok(())
}

fn run_info(args: InfoArgs) -> Result<()> {
    use crate::application::info_use_case::InfoUseCase;

    InfoUseCase::new(args.into()).execute(&mut io::stdout().lock())
}

fn run_check(args: CheckArgs) -> Result<()> {
    use crate::application::check_use_case::CheckUseCase;

    let report = CheckUseCase::new(args.into()).execute(&mut io::stdout().lock())?;
    anyhow::ensure!(
        report.is_ok(),
        "Integrity check failed: {} non-finite parameter(s)",
        report.issues.len()
    );
    Ok(())
}
