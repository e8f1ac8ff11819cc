// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Running a whole multi-scale campaign.
//!
//! A campaign has two phases over the same ordered list of scales. First
//! every scale is simulated (filter the catalogue, write the sky model, run
//! the simulator), then every scale is imaged once per imaging pass. Imaging
//! depends only on the visibility files left behind by the first phase, so
//! the phases can also be run separately.

mod error;

pub use error::CampaignError;

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use itertools::Itertools;
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use vec1::Vec1;

use crate::{
    catalogue::{write_sky_model_file, Catalogue},
    config::{
        validate_scales, ImagingAlgorithm, ImagingConfig, Pointing, ScaleSpec, SimulationConfig,
        Telescope,
    },
    constants::{DEFAULT_DEC_DEG, DEFAULT_RA_DEG, DEFAULT_ROOT_PREFIX},
    engine::EngineProvider,
    filenames::sky_model_filename,
    observer::{RunObserver, Stage},
    stages,
};

/// One way of imaging every scale. Image roots are
/// `<root_prefix>_<scale name>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagingPass {
    pub algorithm: ImagingAlgorithm,
    pub root_prefix: String,
}

impl Default for ImagingPass {
    fn default() -> Self {
        Self {
            algorithm: ImagingAlgorithm::WProjection,
            root_prefix: DEFAULT_ROOT_PREFIX.to_string(),
        }
    }
}

/// Everything derived for one scale, ready to be given to the engines.
#[derive(Debug, Clone)]
pub struct ScalePlan {
    pub scale: ScaleSpec,
    pub simulation: SimulationConfig,

    /// One per imaging pass, in pass order.
    pub imaging: Vec<ImagingConfig>,
}

#[derive(Debug, Clone)]
pub struct Campaign {
    pub pointing: Pointing,

    pub telescope: Telescope,

    /// Processed in this order in both phases.
    pub scales: Vec1<ScaleSpec>,

    pub imaging: Vec<ImagingPass>,

    /// All outputs go here. Engines are run from this directory.
    pub work_dir: PathBuf,

    /// Don't use the GPU for imaging at all.
    pub cpu_only: bool,

    /// Run the scales of each phase concurrently.
    pub parallel: bool,
}

impl Default for Campaign {
    fn default() -> Self {
        Self {
            pointing: Pointing {
                ra_deg: DEFAULT_RA_DEG,
                dec_deg: DEFAULT_DEC_DEG,
            },
            telescope: Telescope::default(),
            scales: ScaleSpec::default_scales(),
            imaging: vec![ImagingPass::default()],
            work_dir: PathBuf::from("."),
            cpu_only: false,
            parallel: false,
        }
    }
}

impl Campaign {
    /// Check the pointing, every scale and every imaging pass. Nothing is
    /// given to an engine unless this passes.
    pub fn validate(&self) -> Result<(), CampaignError> {
        self.pointing.validate()?;
        validate_scales(&self.scales)?;
        if let Some(dup) = self.imaging.iter().map(|p| &p.root_prefix).duplicates().next() {
            return Err(CampaignError::DuplicateRootPrefix(dup.clone()));
        }
        for (pass, scale) in self.imaging.iter().cartesian_product(self.scales.iter()) {
            ImagingConfig::new(scale, pass.algorithm, &pass.root_prefix, self.cpu_only)?;
        }
        Ok(())
    }

    /// Keep only the named scales (in campaign order).
    pub fn select_scales<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), CampaignError> {
        for name in names {
            let name = name.as_ref();
            if !self.scales.iter().any(|s| s.name == name) {
                return Err(CampaignError::UnknownScale(
                    name.to_string(),
                    self.scales.iter().map(|s| &s.name).join(", "),
                ));
            }
        }
        let selected: Vec<ScaleSpec> = self
            .scales
            .iter()
            .filter(|s| names.iter().any(|n| n.as_ref() == s.name))
            .cloned()
            .collect();
        self.scales = Vec1::try_from_vec(selected).map_err(|_| CampaignError::NoScales)?;
        Ok(())
    }

    /// Derive every configuration without running anything.
    pub fn plan(&self) -> Result<Vec<ScalePlan>, CampaignError> {
        self.validate()?;
        self.scales
            .iter()
            .map(|scale| -> Result<ScalePlan, CampaignError> {
                let simulation = SimulationConfig::new(scale, self.pointing, &self.telescope)?;
                let imaging = self
                    .imaging
                    .iter()
                    .map(|pass| {
                        ImagingConfig::new(scale, pass.algorithm, &pass.root_prefix, self.cpu_only)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ScalePlan {
                    scale: scale.clone(),
                    simulation,
                    imaging,
                })
            })
            .collect()
    }

    /// Validate, simulate every scale, then image every scale.
    pub fn run(
        &self,
        catalogue: &Catalogue,
        engines: &dyn EngineProvider,
        observer: &dyn RunObserver,
    ) -> Result<(), CampaignError> {
        self.validate()?;
        self.simulate_all(catalogue, engines, observer)?;
        self.image_all(engines, observer)?;
        info!(
            "Campaign of {} scales complete; outputs are in {}",
            self.scales.len(),
            self.work_dir.display()
        );
        Ok(())
    }

    /// Phase 1: make a sky model and simulate visibilities for every scale.
    pub fn simulate_all(
        &self,
        catalogue: &Catalogue,
        engines: &dyn EngineProvider,
        observer: &dyn RunObserver,
    ) -> Result<(), CampaignError> {
        // All configs are made (and so validated) before any simulating.
        self.validate()?;
        let configs = self
            .scales
            .iter()
            .map(|scale| {
                SimulationConfig::new(scale, self.pointing, &self.telescope)
                    .map(|config| (scale, config))
            })
            .collect::<Result<Vec<_>, _>>()?;
        std::fs::create_dir_all(&self.work_dir)?;

        let simulate_scale = |(scale, config): &(&ScaleSpec, SimulationConfig)| {
            self.simulate_scale(scale, config, catalogue, engines, observer)
        };
        if self.parallel {
            configs.par_iter().try_for_each(simulate_scale)
        } else {
            configs.iter().try_for_each(simulate_scale)
        }
    }

    fn simulate_scale(
        &self,
        scale: &ScaleSpec,
        config: &SimulationConfig,
        catalogue: &Catalogue,
        engines: &dyn EngineProvider,
        observer: &dyn RunObserver,
    ) -> Result<(), CampaignError> {
        let sky = catalogue.filter_by_radius(
            &scale.name,
            self.pointing,
            scale.max_radius_deg,
            observer,
        );
        let sky_file = self.work_dir.join(sky_model_filename(&scale.name));
        write_sky_model_file(&sky_file, &sky).map_err(|source| CampaignError::WriteSky {
            scale: scale.name.clone(),
            source,
        })?;

        let mut simulator = engines.simulator();
        stages::simulate(simulator.as_mut(), config, &sky, observer).map_err(|source| {
            CampaignError::Engine {
                scale: scale.name.clone(),
                stage: Stage::Simulation,
                source,
            }
        })
    }

    /// Phase 2: image every scale with every imaging pass. The scales must
    /// have been simulated.
    pub fn image_all(
        &self,
        engines: &dyn EngineProvider,
        observer: &dyn RunObserver,
    ) -> Result<(), CampaignError> {
        self.validate()?;
        let configs = self
            .imaging
            .iter()
            .cartesian_product(self.scales.iter())
            .map(|(pass, scale)| {
                ImagingConfig::new(scale, pass.algorithm, &pass.root_prefix, self.cpu_only)
            })
            .collect::<Result<Vec<_>, _>>()?;

        // There's only one GPU.
        let gpu_lock = Mutex::new(());
        let image_scale = |config: &ImagingConfig| {
            let _gpu = if config.uses_gpu() {
                Some(gpu_lock.lock().unwrap_or_else(|e| e.into_inner()))
            } else {
                None
            };
            self.image_scale(config, engines, observer)
        };
        if self.parallel {
            configs.par_iter().try_for_each(image_scale)
        } else {
            configs.iter().try_for_each(image_scale)
        }
    }

    fn image_scale(
        &self,
        config: &ImagingConfig,
        engines: &dyn EngineProvider,
        observer: &dyn RunObserver,
    ) -> Result<(), CampaignError> {
        check_visibilities(&self.work_dir, config)?;

        let mut imager = engines.imager();
        stages::image(imager.as_mut(), config, observer).map_err(|source| CampaignError::Engine {
            scale: config.name.clone(),
            stage: Stage::Imaging,
            source,
        })
    }
}

fn check_visibilities(work_dir: &Path, config: &ImagingConfig) -> Result<(), CampaignError> {
    let file = work_dir.join(&config.input_vis_data);
    debug!("Checking that {} exists", file.display());
    if !file.exists() {
        return Err(CampaignError::MissingVisibilities {
            scale: config.name.clone(),
            file,
        });
    }
    Ok(())
}
