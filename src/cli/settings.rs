// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Show the settings each engine would be given, without running anything.

use std::path::{Path, PathBuf};

use clap::Parser;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::campaign::CampaignArgs;
use crate::{settings::SettingsTree, SkyscaleError};

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct SettingsArgs {
    #[clap(flatten)]
    #[serde(flatten)]
    pub(super) campaign_args: CampaignArgs,

    /// Write the settings of each job as an INI file into this directory,
    /// rather than printing them. The sky-model file of each simulation is
    /// only filled in when the campaign runs.
    #[clap(short, long, help_heading = "OUTPUT FILES")]
    #[serde(skip)]
    pub(super) output_dir: Option<PathBuf>,
}

impl SettingsArgs {
    pub(super) fn merge(self) -> Result<SettingsArgs, SkyscaleError> {
        Ok(SettingsArgs {
            campaign_args: self.campaign_args.merge()?,
            output_dir: self.output_dir,
        })
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), SkyscaleError> {
        let plans = self.campaign_args.parse(false)?.campaign.plan()?;

        // The simulator's settings come first, then the imager's.
        let mut jobs: Vec<(PathBuf, SettingsTree)> = vec![];
        for plan in &plans {
            jobs.push((
                ini_filename(&plan.simulation.vis_filename().with_extension("")),
                plan.simulation.to_settings(),
            ));
            for img in &plan.imaging {
                jobs.push((ini_filename(&img.root_path), img.to_settings()));
            }
        }

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        match self.output_dir {
            Some(dir) => {
                std::fs::create_dir_all(&dir)?;
                for (filename, settings) in jobs {
                    let file = dir.join(filename);
                    debug!("Writing {}", file.display());
                    settings.write_ini(&file)?;
                    info!("Wrote {}", file.display());
                }
            }

            None => {
                for (filename, settings) in jobs {
                    println!("# {}", filename.display());
                    println!("{}", settings.to_ini());
                }
            }
        }

        Ok(())
    }
}

fn ini_filename(stem: &Path) -> PathBuf {
    PathBuf::from(format!("{}.ini", stem.display()))
}
