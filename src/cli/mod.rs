// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Command-line interface code. More specific options for `skyscale`
//! subcommands are contained in modules.
//!
//! All booleans must have `#[serde(default)]` annotated, and anything that
//! isn't a boolean must be optional. This allows all arguments to be optional
//! *and* usable in an arguments file.
//!
//! Only 3 things should be public in this module: `Skyscale`, `Skyscale::run`,
//! and `SkyscaleError`.

#[macro_use]
mod common;
mod campaign;
mod error;
mod settings;
mod sky_filter;
mod start_time;

pub use error::SkyscaleError;

use std::path::PathBuf;

use clap::{AppSettings, Args, Parser, Subcommand};
use log::info;

use campaign::Phase;

// Add build-time information from the "built" crate.
include!(concat!(env!("OUT_DIR"), "/built.rs"));

#[derive(Debug, Parser)]
#[clap(
    version,
    about = "Simulate and image a sky catalogue at several angular scales with OSKAR"
)]
#[clap(global_setting(AppSettings::DeriveDisplayOrder))]
#[clap(disable_help_subcommand = true)]
#[clap(propagate_version = true)]
#[clap(infer_long_args = true)]
pub struct Skyscale {
    #[clap(flatten)]
    global_opts: GlobalArgs,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// The verbosity of the program. Increase by specifying multiple times
    /// (e.g. -vv). The default is to print only high-level information.
    #[clap(short, long, parse(from_occurrences))]
    #[clap(global = true)]
    verbosity: u8,

    /// Only verify that arguments were correctly ingested and print out
    /// high-level information.
    #[clap(long)]
    #[clap(global = true)]
    dry_run: bool,

    /// Save the input arguments into a new TOML file that can be used to
    /// reproduce this run.
    #[clap(long)]
    #[clap(global = true)]
    save_toml: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
#[clap(arg_required_else_help = true)]
enum Command {
    #[clap(about = "Simulate visibilities for every scale, then image every scale.")]
    Run(campaign::CampaignArgs),

    #[clap(about = "Only simulate visibilities for every scale.")]
    Simulate(campaign::CampaignArgs),

    #[clap(about = "Only image every scale. The scales must already have been simulated.")]
    Image(campaign::CampaignArgs),

    #[clap(about = "Print or write the engine settings derived for every scale.")]
    Settings(settings::SettingsArgs),

    #[clap(about = "Get the start time of an observation centred on the transit of an RA.")]
    StartTime(start_time::StartTimeArgs),

    #[clap(about = "Write the catalogue sources near a pointing as a sky model.")]
    SkyFilter(sky_filter::SkyFilterArgs),
}

impl Skyscale {
    pub fn run(self) -> Result<(), SkyscaleError> {
        // Set up logging.
        let GlobalArgs {
            verbosity,
            dry_run,
            save_toml,
        } = self.global_opts;
        setup_logging(verbosity)?;

        // Print the version of skyscale and its build-time information.
        let sub_command = match &self.command {
            Command::Run(_) => "run",
            Command::Simulate(_) => "simulate",
            Command::Image(_) => "image",
            Command::Settings(_) => "settings",
            Command::StartTime(_) => "start-time",
            Command::SkyFilter(_) => "sky-filter",
        };
        info!("skyscale {} {}", sub_command, env!("CARGO_PKG_VERSION"));
        display_build_info();

        macro_rules! merge_save_run {
            ($args:expr, $($run_args:expr),*) => {{
                let args = $args.merge()?;
                if let Some(toml) = save_toml {
                    use std::{
                        fs::File,
                        io::{BufWriter, Write},
                    };

                    let mut f = BufWriter::new(File::create(toml)?);
                    let toml_str = toml::to_string(&args)
                        .map_err(|e| SkyscaleError::ArgFile(format!("Couldn't serialise arguments as toml: {e}")))?;
                    f.write_all(toml_str.as_bytes())?;
                }
                args.run($($run_args),*)?;
            }};
        }

        match self.command {
            Command::Run(args) => merge_save_run!(args, Phase::All, dry_run),
            Command::Simulate(args) => merge_save_run!(args, Phase::Simulate, dry_run),
            Command::Image(args) => merge_save_run!(args, Phase::Image, dry_run),
            Command::Settings(args) => merge_save_run!(args, dry_run),

            // Utilities.
            Command::StartTime(args) => args.run()?,
            Command::SkyFilter(args) => args.run(dry_run)?,
        }

        info!("skyscale {} complete.", sub_command);
        Ok(())
    }
}

/// Activate a logger. All log messages are put onto `stdout`. `env_logger`
/// automatically only uses colours and fancy symbols if we're on a tty (e.g. a
/// terminal); piped output will be formatted sensibly. Source code lines are
/// displayed in log messages when verbosity >= 3.
fn setup_logging(verbosity: u8) -> Result<(), log::SetLoggerError> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.target(env_logger::Target::Stdout);
    builder.format_target(false);
    match verbosity {
        0 => builder.filter_level(log::LevelFilter::Info),
        1 => builder.filter_level(log::LevelFilter::Debug),
        2 => builder.filter_level(log::LevelFilter::Trace),
        _ => {
            builder.filter_level(log::LevelFilter::Trace);
            builder.format(|buf, record| {
                use std::io::Write;

                let timestamp = buf.timestamp();
                let level = record.level();
                let target = record.target();
                let line = record.line().unwrap_or(0);
                let message = record.args();

                writeln!(buf, "[{timestamp} {level} {target}:{line}] {message}")
            })
        }
    };
    builder.try_init()
}

/// Write many info-level log lines of how this executable was compiled.
fn display_build_info() {
    let dirty = match GIT_DIRTY {
        Some(true) => " (dirty)",
        _ => "",
    };
    match GIT_COMMIT_HASH_SHORT {
        Some(hash) => {
            info!("Compiled on git commit hash: {hash}{dirty}");
        }
        None => info!("Compiled on git commit hash: <no git info>"),
    }
    if let Some(hr) = GIT_HEAD_REF {
        info!("            git head ref: {}", hr);
    }
    info!("            {}", BUILT_TIME_UTC);
    info!("         with compiler {}", RUSTC_VERSION);
    info!("");
}
