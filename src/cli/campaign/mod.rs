// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Arguments shared by every subcommand that runs (or plans) a campaign.


use std::{borrow::Cow, path::PathBuf, str::FromStr};

use clap::Parser;
use itertools::Itertools;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vec1::Vec1;

use super::common::{display_warnings, CatalogueArgs, InfoPrinter, Warn, ARG_FILE_HELP};
use crate::{
    campaign::{Campaign, ImagingPass},
    catalogue::Catalogue,
    config::{
        ImagingAlgorithm, Pointing, PolMode, ScaleSpec, Telescope,
        IMAGING_ALGORITHMS_COMMA_SEPARATED, POL_MODES_COMMA_SEPARATED,
    },
    constants::{DEFAULT_DEC_DEG, DEFAULT_RA_DEG, DEFAULT_TELESCOPE_DIR},
    engine::OskarApps,
    observer::LogObserver,
    time::format_utc,
    SkyscaleError,
};

lazy_static::lazy_static! {
    static ref ALGORITHM_HELP: String =
        format!("The imaging algorithms to use; every scale is imaged once per algorithm. Valid algorithms are: {}. Default: W-projection", *IMAGING_ALGORITHMS_COMMA_SEPARATED);

    static ref POL_MODE_HELP: String =
        format!("How the simulator treats polarisation. Valid modes are: {}. Default: Scalar", *POL_MODES_COMMA_SEPARATED);

    static ref TELESCOPE_HELP: String =
        format!("The telescope model directory given to the simulator. Default: {DEFAULT_TELESCOPE_DIR}");

    static ref RA_HELP: String =
        format!("The phase centre right ascension of every scale [degrees]. Default: {DEFAULT_RA_DEG}");

    static ref DEC_HELP: String =
        format!("The phase centre declination of every scale [degrees]. Default: {DEFAULT_DEC_DEG}");
}

/// Which phases of a campaign to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Phase {
    All,
    Simulate,
    Image,
}

impl Phase {
    fn needs_catalogue(self) -> bool {
        !matches!(self, Phase::Image)
    }
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct CampaignArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(short, long, help = RA_HELP.as_str(), help_heading = "POINTING")]
    pub(super) ra: Option<f64>,

    #[clap(
        short,
        long,
        help = DEC_HELP.as_str(),
        help_heading = "POINTING",
        allow_hyphen_values = true
    )]
    pub(super) dec: Option<f64>,

    #[clap(short, long, help = TELESCOPE_HELP.as_str(), help_heading = "SIMULATION")]
    pub(super) telescope: Option<PathBuf>,

    #[clap(long, help = POL_MODE_HELP.as_str(), help_heading = "SIMULATION")]
    pub(super) pol_mode: Option<String>,

    #[clap(
        short,
        long,
        multiple_values(true),
        help = ALGORITHM_HELP.as_str(),
        help_heading = "IMAGING"
    )]
    pub(super) algorithms: Option<Vec<String>>,

    /// The prefixes of the image products, one per algorithm. Images are
    /// written to <prefix>_<scale name>. The default depends on the
    /// algorithm, e.g. img_wproj for W-projection.
    #[clap(long, multiple_values(true), help_heading = "IMAGING")]
    pub(super) root_prefixes: Option<Vec<String>>,

    /// Don't use the GPU for imaging at all.
    #[clap(long, help_heading = "IMAGING")]
    #[serde(default)]
    pub(super) cpu: bool,

    /// Only process these scales (by name). Default: all scales.
    #[clap(short, long = "scales", multiple_values(true), help_heading = "CAMPAIGN")]
    pub(super) select_scales: Option<Vec<String>>,

    /// The directory where all outputs are written, and the engines are run.
    /// Default: the current directory
    #[clap(short, long, help_heading = "CAMPAIGN")]
    pub(super) work_dir: Option<PathBuf>,

    /// Process the scales of each phase concurrently. Imaging jobs that use
    /// the GPU still run one at a time.
    #[clap(long, help_heading = "CAMPAIGN")]
    #[serde(default)]
    pub(super) parallel: bool,

    /// The directory containing the OSKAR applications. If not specified,
    /// they are looked up in PATH.
    #[clap(long, help_heading = "CAMPAIGN")]
    pub(super) oskar_bin_dir: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(rename = "catalogue")]
    #[serde(default)]
    pub(super) catalogue_args: CatalogueArgs,

    /// The scales of the campaign. These can only be given in an arguments
    /// file (as `[[scales]]` tables).
    #[clap(skip)]
    pub(super) scales: Option<Vec<ScaleSpec>>,
}

/// Everything needed to run a campaign.
pub(super) struct CampaignParams {
    pub(super) campaign: Campaign,

    /// Only read when the simulation phase runs.
    pub(super) catalogue: Option<Catalogue>,

    pub(super) engines: OskarApps,
}

impl CampaignArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct. Where applicable, it will prefer CLI parameters over
    /// those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(super) fn merge(self) -> Result<CampaignArgs, SkyscaleError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Read in the file arguments. Ensure all of the file args are
            // accounted for by pattern matching.
            let CampaignArgs {
                args_file: _,
                ra,
                dec,
                telescope,
                pol_mode,
                algorithms,
                root_prefixes,
                cpu,
                select_scales,
                work_dir,
                parallel,
                oskar_bin_dir,
                catalogue_args,
                scales,
            } = unpack_arg_file!(arg_file);

            // Merge all the arguments, preferring the CLI args when available.
            Ok(CampaignArgs {
                args_file: None,
                ra: cli_args.ra.or(ra),
                dec: cli_args.dec.or(dec),
                telescope: cli_args.telescope.or(telescope),
                pol_mode: cli_args.pol_mode.or(pol_mode),
                algorithms: cli_args.algorithms.or(algorithms),
                root_prefixes: cli_args.root_prefixes.or(root_prefixes),
                cpu: cli_args.cpu || cpu,
                select_scales: cli_args.select_scales.or(select_scales),
                work_dir: cli_args.work_dir.or(work_dir),
                parallel: cli_args.parallel || parallel,
                oskar_bin_dir: cli_args.oskar_bin_dir.or(oskar_bin_dir),
                catalogue_args: cli_args.catalogue_args.merge(catalogue_args),
                scales: cli_args.scales.or(scales),
            })
        } else {
            Ok(cli_args)
        }
    }

    /// Make sense of the arguments. The catalogue is only read if
    /// `read_catalogue` is set.
    pub(super) fn parse(self, read_catalogue: bool) -> Result<CampaignParams, SkyscaleError> {
        debug!("{:#?}", self);

        // Expose all the struct fields to ensure they're all used.
        let CampaignArgs {
            args_file: _,
            ra,
            dec,
            telescope,
            pol_mode,
            algorithms,
            root_prefixes,
            cpu,
            select_scales,
            work_dir,
            parallel,
            oskar_bin_dir,
            catalogue_args,
            scales,
        } = self;

        let pointing = Pointing::new(
            ra.unwrap_or(DEFAULT_RA_DEG),
            dec.unwrap_or(DEFAULT_DEC_DEG),
        )?;

        let pol_mode = match pol_mode {
            Some(m) => PolMode::from_str(&m).map_err(|_| CampaignArgsError::InvalidPolMode(m))?,
            None => PolMode::default(),
        };
        let telescope = Telescope {
            input_directory: telescope.unwrap_or_else(|| PathBuf::from(DEFAULT_TELESCOPE_DIR)),
            pol_mode,
        };

        let imaging = parse_imaging_passes(algorithms, root_prefixes)?;

        let scales = match scales {
            Some(s) => Vec1::try_from_vec(s).map_err(|_| CampaignArgsError::NoScales)?,
            None => ScaleSpec::default_scales(),
        };

        let work_dir = work_dir.unwrap_or_else(|| PathBuf::from("."));
        let mut campaign = Campaign {
            pointing,
            telescope,
            scales,
            imaging,
            work_dir: work_dir.clone(),
            cpu_only: cpu,
            parallel,
        };
        if let Some(names) = select_scales {
            campaign.select_scales(names.as_slice())?;
        }
        // Derive everything now so that problems surface before any reading.
        let plans = campaign.plan()?;

        let catalogue = if read_catalogue {
            let catalogue_file = catalogue_args.parse()?;
            Some(catalogue_file.read()?)
        } else {
            if !catalogue_args.is_empty() {
                "Catalogue arguments are ignored when not simulating".warn();
            }
            None
        };

        let mut printer = InfoPrinter::new("Campaign".into());
        printer.push_line(
            format!(
                "Phase centre (RA, Dec): ({:.4}°, {:.4}°)",
                pointing.ra_deg, pointing.dec_deg
            )
            .into(),
        );
        printer.push_line(
            format!(
                "Telescope model: {} ({})",
                campaign.telescope.input_directory.display(),
                campaign.telescope.pol_mode
            )
            .into(),
        );
        if let Some(catalogue) = &catalogue {
            printer.push_line(format!("{} catalogue sources", catalogue.len()).into());
        }
        printer.push_line(format!("Outputs go to {}", work_dir.display()).into());
        printer.push_line(
            format!(
                "Imaging: {}",
                campaign
                    .imaging
                    .iter()
                    .map(|p| format!("{} ({})", p.algorithm, p.root_prefix))
                    .join(", ")
            )
            .into(),
        );
        if parallel {
            printer.push_line("Scales are processed in parallel".into());
        }
        printer.display();

        let mut printer = InfoPrinter::new("Scales".into());
        for plan in &plans {
            let scale = &plan.scale;
            let mut block: Vec<Cow<'static, str>> = vec![
                format!(
                    "{}: sources within {}°, {} s from {}",
                    scale.name,
                    scale.max_radius_deg,
                    scale.length_sec,
                    format_utc(plan.simulation.observation.start_time)
                )
                .into(),
                format!(
                    "{} time steps, {} channels -> {}",
                    scale.num_time_steps,
                    scale.num_channels,
                    plan.simulation.vis_filename().display()
                )
                .into(),
            ];
            for img in &plan.imaging {
                block.push(
                    format!(
                        "{}x{} px over {}° ({}, GPU: {}) -> {}",
                        img.size,
                        img.size,
                        img.fov_deg,
                        img.algorithm,
                        if img.uses_gpu() { "yes" } else { "no" },
                        img.root_path.display()
                    )
                    .into(),
                );
            }
            printer.push_block(block);
        }
        printer.display();
        display_warnings();

        Ok(CampaignParams {
            campaign,
            catalogue,
            engines: OskarApps::new(oskar_bin_dir, work_dir),
        })
    }

    pub(super) fn run(self, phase: Phase, dry_run: bool) -> Result<(), SkyscaleError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let CampaignParams {
            campaign,
            catalogue,
            engines,
        } = self.parse(phase.needs_catalogue())?;

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        let observer = LogObserver;
        match (phase, catalogue) {
            (Phase::All, Some(catalogue)) => campaign.run(&catalogue, &engines, &observer)?,
            (Phase::Simulate, Some(catalogue)) => {
                campaign.simulate_all(&catalogue, &engines, &observer)?
            }
            (Phase::Image, _) => campaign.image_all(&engines, &observer)?,
            (Phase::All | Phase::Simulate, None) => {
                return Err(CampaignArgsError::NoCatalogue.into())
            }
        }

        Ok(())
    }
}

/// Pair up the algorithms with their root prefixes.
fn parse_imaging_passes(
    algorithms: Option<Vec<String>>,
    root_prefixes: Option<Vec<String>>,
) -> Result<Vec<ImagingPass>, CampaignArgsError> {
    let algorithms = match algorithms {
        Some(algorithms) => algorithms
            .into_iter()
            .map(|a| {
                ImagingAlgorithm::from_str(&a).map_err(|_| CampaignArgsError::InvalidAlgorithm(a))
            })
            .collect::<Result<Vec<_>, _>>()?,
        None => vec![ImagingAlgorithm::default()],
    };
    if algorithms.is_empty() {
        return Err(CampaignArgsError::NoAlgorithms);
    }

    let root_prefixes = match root_prefixes {
        Some(prefixes) if prefixes.len() != algorithms.len() => {
            return Err(CampaignArgsError::RootPrefixCount {
                algorithms: algorithms.len(),
                prefixes: prefixes.len(),
            })
        }
        Some(prefixes) => prefixes,
        None => algorithms
            .iter()
            .map(|a| a.default_root_prefix().to_string())
            .collect(),
    };
    if let Some(dup) = root_prefixes.iter().duplicates().next() {
        return Err(CampaignArgsError::DuplicateRootPrefix(dup.clone()));
    }

    Ok(algorithms
        .into_iter()
        .zip(root_prefixes)
        .map(|(algorithm, root_prefix)| ImagingPass {
            algorithm,
            root_prefix,
        })
        .collect())
}

#[derive(Error, Debug)]
pub(super) enum CampaignArgsError {
    #[error("No catalogue was supplied; use --catalogue")]
    NoCatalogue,

    #[error("Polarisation mode '{0}' isn't recognised; valid modes are: {}", *POL_MODES_COMMA_SEPARATED)]
    InvalidPolMode(String),

    #[error("Imaging algorithm '{0}' isn't recognised; valid algorithms are: {}", *IMAGING_ALGORITHMS_COMMA_SEPARATED)]
    InvalidAlgorithm(String),

    #[error("At least one imaging algorithm is needed")]
    NoAlgorithms,

    #[error("Got {algorithms} imaging algorithms but {prefixes} root prefixes; there must be one prefix per algorithm")]
    RootPrefixCount { algorithms: usize, prefixes: usize },

    #[error("Root prefix '{0}' was used more than once; images would overwrite each other")]
    DuplicateRootPrefix(String),

    #[error("The arguments file specifies an empty list of scales")]
    NoScales,
}
