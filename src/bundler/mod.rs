//! Packaging engine: turns a staged app directory into a runnable bundle.
//!
//! The build pipeline only talks to the [`PackagingEngine`] trait. The
//! [`LocalPackager`] shipped here lays bundles out on disk from a prebuilt
//! runtime shell; other engines (remote builders, test doubles) plug in
//! through the same trait.
//!
//! # Output Layout
//!
//! | Platform | Bundle |
//! |----------|--------|
//! | Linux | `<out>/<name>-linux-<arch>/{<name>, resources/app/}` |
//! | Windows | `<out>/<name>-win32-<arch>/{<name>.exe, resources/app/}` |
//! | macOS | `<out>/<name>-darwin-<arch>/<name>.app/Contents/{MacOS, Resources/app, Frameworks}` |
//!
//! # Overwrite Semantics
//!
//! When the bundle directory already exists and overwriting was not
//! requested, the engine produces *no* paths instead of failing. The
//! pipeline reports that as [`BuildError::DirectoryExists`](crate::error::BuildError::DirectoryExists).

mod error;
mod packager;
pub(crate) mod platform;

pub use error::{Context, Error, ErrorExt, Result};
pub use packager::LocalPackager;

use crate::options::EngineConfig;
use async_trait::async_trait;
use std::path::PathBuf;

/// Produces one or more bundles from a staged app directory.
#[async_trait]
pub trait PackagingEngine: Send + Sync {
    /// Packs `config.dir` into bundles under `config.out`.
    ///
    /// Returns every bundle path produced. An empty list means the output
    /// already existed and `config.overwrite` was false.
    async fn pack(&self, config: &EngineConfig) -> Result<Vec<PathBuf>>;
}
