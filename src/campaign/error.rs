// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

use crate::{
    catalogue::WriteSkyModelError, config::ConfigError, engine::EngineError, observer::Stage,
};

#[derive(Error, Debug)]
pub enum CampaignError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Scale '{scale}': {stage} failed: {source}")]
    Engine {
        scale: String,
        stage: Stage,
        source: EngineError,
    },

    #[error("Scale '{scale}': couldn't write the sky model: {source}")]
    WriteSky {
        scale: String,
        source: WriteSkyModelError,
    },

    #[error("Scale '{scale}': the visibilities {} don't exist; has this scale been simulated?", file.display())]
    MissingVisibilities { scale: String, file: PathBuf },

    #[error("Scale '{0}' isn't part of this campaign; available scales: {1}")]
    UnknownScale(String, String),

    #[error("Root prefix '{0}' is used by more than one imaging pass; images would overwrite each other")]
    DuplicateRootPrefix(String),

    #[error("No scales were selected")]
    NoScales,

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
