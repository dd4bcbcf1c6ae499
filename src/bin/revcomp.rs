use std::{
    io::{self, BufWriter},
    process::ExitCode,
};

use clap::{self, Parser};
use log::debug;
use rsrevcomp::{available_parallelism, reverse_complement_all, RevcompError};

#[derive(Debug, Parser, Clone)]
#[command(
    version,
    about,
    long_about=None,
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// nucleotide sequences, one output line each
    #[arg(value_name = "SEQ")]
    pub sequences: Vec<String>,
}

impl Cli {
    /// Every argument after the program name is a sequence, including `--`
    /// and anything that looks like a flag.
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Self {
        let mut args = args.into_iter();
        let program = args.next().unwrap_or_else(|| "revcomp".to_string());
        Self::parse_from(
            std::iter::once(program)
                .chain(std::iter::once("--".to_string()))
                .chain(args),
        )
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let parallelism = available_parallelism();
    debug!("cores:{}", parallelism);

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    let written = reverse_complement_all(&cli.sequences, parallelism, &mut writer)?;
    debug!("wrote {} sequences", written);
    Ok(())
}

/// codes 1 and 2 are reserved for missing input and bad bases
fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<RevcompError>()
        .map(RevcompError::exit_code)
        .unwrap_or(3)
}

fn main() -> ExitCode {
    let env = env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "warn");
    env_logger::Builder::from_env(env).init();

    let cli = Cli::from_args(std::env::args());
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:#}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}
