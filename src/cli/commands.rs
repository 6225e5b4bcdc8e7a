// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the six subcommands and their flags:
//
//   init  <file> <NxM> [--resize] [--visible KIND] [--seed S]
//   train <file> [--batch-size K] [--immediate] [--config F]
//                [--learning-rate η] [--momentum μ] [--decay λ]
//                [--strict] [--seed S]
//   prop  <file> [--sample] [--strict] [--seed S]
//   dream <file> [--strict] [--seed S]
//   info  <file>...
//   check <file>
//
// train, prop and dream read the term-frequency stream from
// stdin; prop and dream write to stdout.
//
// Reference: Rust Book §12 (Building a CLI Program)

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::application::check_use_case::CheckConfig;
use crate::application::dream_use_case::DreamConfig;
use crate::application::info_use_case::InfoConfig;
use crate::application::init_use_case::InitConfig;
use crate::application::prop_use_case::PropConfig;
use crate::application::train_use_case::TrainConfig;
use crate::domain::policy::{Hyperparameters, UpdatePolicy, VisibleUnits};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a model file, or resize an existing one
    Init(InitArgs),

    /// Train the model on documents read from stdin
    Train(TrainArgs),

    /// Print the hidden representation of each document on stdin
    Prop(PropArgs),

    /// Print a sampled reconstruction of each document on stdin
    Dream(DreamArgs),

    /// Print the dimensions of model files
    Info(InfoArgs),

    /// Scan a model file for NaN/Inf parameters
    Check(CheckArgs),
}

// ─── Dimensions ───────────────────────────────────────────────────────────────
/// `NxM`: N visible units, M hidden units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub nvis: usize,
    pub nhid: usize,
}

pub fn parse_dimensions(s: &str) -> Result<Dimensions, String> {
    let (nvis, nhid) = s
        .split_once(&['x', 'X'][..])
        .ok_or_else(|| format!("expected NxM, got '{}'", s))?;

    let number = |part: &str| {
        part.parse::<usize>()
            .map_err(|e| format!("bad dimension '{}' in '{}': {}", part, s, e))
    };
    Ok(Dimensions { nvis: number(nvis)?, nhid: number(nhid)? })
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibleArg {
    /// Replicated softmax with Poisson samples
    Softmax,
    /// Unnormalised exponential with Poisson samples
    Exponential,
    /// Sigmoid with Bernoulli samples
    Binary,
}

impl From<VisibleArg> for VisibleUnits {
    fn from(v: VisibleArg) -> Self {
        match v {
            VisibleArg::Softmax     => VisibleUnits::ReplicatedSoftmax,
            VisibleArg::Exponential => VisibleUnits::Exponential,
            VisibleArg::Binary      => VisibleUnits::Binary,
        }
    }
}

// ─── init ─────────────────────────────────────────────────────────────────────
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Model file to create
    pub model: PathBuf,

    /// Dimensions as NxM (visible x hidden)
    #[arg(value_parser = parse_dimensions)]
    pub dimensions: Dimensions,

    /// Resize an existing model, keeping the parameters that still fit
    #[arg(long)]
    pub resize: bool,

    /// Visible unit kind of a new model
    #[arg(long, value_enum)]
    pub visible: Option<VisibleArg>,

    /// Seed for the initial parameters
    #[arg(long)]
    pub seed: Option<u64>,
}

impl From<InitArgs> for InitConfig {
    fn from(a: InitArgs) -> Self {
        InitConfig {
            model_path: a.model,
            nvis:       a.dimensions.nvis,
            nhid:       a.dimensions.nhid,
            visible:    a.visible.map(VisibleUnits::from),
            resize:     a.resize,
            seed:       a.seed,
        }
    }
}

// ─── train ────────────────────────────────────────────────────────────────────
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Model file to train
    pub model: PathBuf,

    /// Documents per weight update
    #[arg(long, default_value_t = 1)]
    pub batch_size: usize,

    /// Update the weights after every document instead of once per batch
    #[arg(long)]
    pub immediate: bool,

    /// JSON file with learning_rate, momentum and decay;
    /// takes precedence over the flags below
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Step size η of the gradient update
    #[arg(long, default_value_t = 0.02)]
    pub learning_rate: f32,

    /// Fraction of the previous update carried into the next one
    #[arg(long, default_value_t = 0.9)]
    pub momentum: f32,

    /// Weight decay
    #[arg(long, default_value_t = 0.0)]
    pub decay: f32,

    /// Fail on malformed input lines instead of skipping them
    #[arg(long)]
    pub strict: bool,

    /// Seed for the Gibbs sampler
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Flags only; the --config file is applied by the caller.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            model_path: a.model,
            batch_size: a.batch_size,
            update:     if a.immediate { UpdatePolicy::Immediate } else { UpdatePolicy::Deferred },
            hyper:      Hyperparameters {
                learning_rate: a.learning_rate,
                momentum:      a.momentum,
                decay:         a.decay,
            },
            strict:     a.strict,
            seed:       a.seed,
        }
    }
}

// ─── prop ─────────────────────────────────────────────────────────────────────
#[derive(Args, Debug)]
pub struct PropArgs {
    /// Model file to read
    pub model: PathBuf,

    /// Print the hidden units that fire in a sample instead of the probabilities
    #[arg(long)]
    pub sample: bool,

    /// Fail on malformed input lines instead of skipping them
    #[arg(long)]
    pub strict: bool,

    /// Seed for the sampler
    #[arg(long)]
    pub seed: Option<u64>,
}

impl From<PropArgs> for PropConfig {
    fn from(a: PropArgs) -> Self {
        PropConfig { model_path: a.model, sample: a.sample, strict: a.strict, seed: a.seed }
    }
}

// ─── dream ────────────────────────────────────────────────────────────────────
#[derive(Args, Debug)]
pub struct DreamArgs {
    /// Model file to read
    pub model: PathBuf,

    /// Fail on malformed input lines instead of skipping them
    #[arg(long)]
    pub strict: bool,

    /// Seed for the sampler
    #[arg(long)]
    pub seed: Option<u64>,
}

impl From<DreamArgs> for DreamConfig {
    fn from(a: DreamArgs) -> Self {
        DreamConfig { model_path: a.model, strict: a.strict, seed: a.seed }
    }
}

// ─── info / check ─────────────────────────────────────────────────────────────
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Model files to describe
    #[arg(required = true)]
    pub models: Vec<PathBuf>,
}

impl From<InfoArgs> for InfoConfig {
    fn from(a: InfoArgs) -> Self {
        InfoConfig { model_paths: a.models }
    }
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Model file to scan
    pub model: PathBuf,
}

impl From<CheckArgs> for CheckConfig {
    fn from(a: CheckArgs) -> Self {
        CheckConfig { model_path: a.model }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_parse_dimensions() {
        assert_eq!(parse_dimensions("100x20"), Ok(Dimensions { nvis: 100, nhid: 20 }));
        assert_eq!(parse_dimensions("3X4"), Ok(Dimensions { nvis: 3, nhid: 4 }));
        assert!(parse_dimensions("100").is_err());
        assert!(parse_dimensions("100x").is_err());
        assert!(parse_dimensions("ax2").is_err());
        assert!(parse_dimensions("1x2x3").is_err());
    }

    #[test]
    fn test_train_args_to_config() {
        let cli = Cli::try_parse_from([
            "rbm", "train", "m.rbm", "--batch-size", "16", "--immediate", "--momentum", "0.5",
        ])
        .unwrap();

        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg = TrainConfig::from(args);
        assert_eq!(cfg.batch_size, 16);
        assert_eq!(cfg.update, UpdatePolicy::Immediate);
        assert_eq!(cfg.hyper.momentum, 0.5);
        assert_eq!(cfg.hyper.learning_rate, 0.02);
    }

    #[test]
    fn test_init_args_to_config() {
        let cli = Cli::try_parse_from(["rbm", "init", "m.rbm", "50x10", "--visible", "binary"])
            .unwrap();

        let Commands::Init(args) = cli.command else { panic!("expected init") };
        let cfg = InitConfig::from(args);
        assert_eq!((cfg.nvis, cfg.nhid), (50, 10));
        assert_eq!(cfg.visible, Some(VisibleUnits::Binary));
        assert!(!cfg.resize);
    }

    #[test]
    fn test_bad_dimensions_are_rejected() {
        assert!(Cli::try_parse_from(["rbm", "init", "m.rbm", "fifty"]).is_err());
        assert!(Cli::try_parse_from(["rbm", "info"]).is_err());
    }
}
