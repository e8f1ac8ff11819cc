// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

use crate::catalogue::WriteSkyModelError;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Couldn't start {app}: {err}")]
    Spawn { app: String, err: std::io::Error },

    #[error("{app} failed ({status})\n{stderr}")]
    Failed {
        app: String,

        /// How the engine exited, e.g. "exit status: 1".
        status: String,

        /// The last lines the engine wrote to stderr.
        stderr: String,
    },

    #[error("The settings for {app} have no '{key}'")]
    MissingSetting { app: String, key: &'static str },

    #[error(transparent)]
    WriteSky(#[from] WriteSkyModelError),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
