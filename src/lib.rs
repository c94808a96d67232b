//! # Kodegen Webapp Bundler
//!
//! Turns a web site into a desktop application bundle.
//!
//! The build pipeline validates a request, stages the app sources, prepares
//! icons, hands everything to a packaging engine and finalizes the result:
//! relocating it over a previous install when upgrading, and registering it
//! with the desktop on Linux.
//!
//! ## Features
//!
//! - **Upgrade in place**: rebuild an app from the configuration saved inside it
//! - **Cross-platform targets**: Linux, Windows and macOS bundles from any host
//! - **Graceful degradation**: options the host cannot honor are dropped with a warning
//! - **Linux integration**: desktop entry plus best-effort `/opt` install
//!
//! ## Usage
//!
//! ```bash
//! kodegen_bundler_webapp https://example.com
//! kodegen_bundler_webapp example.com --platform windows --icon icon.png
//! kodegen_bundler_webapp --upgrade ./output-apps/Example-linux-x64 --overwrite
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod build;
pub mod bundler;
pub mod cli;
pub mod constraints;
pub mod error;
pub mod finalize;
pub mod host;
pub mod icons;
pub mod logger;
pub mod options;
pub mod outcome;
pub mod stage;
pub mod upgrade;
pub mod utils;

// Re-export main types for public API
pub use build::{AppBuilder, BuildResult};
pub use bundler::{LocalPackager, PackagingEngine};
pub use cli::Args;
pub use error::{BuildError, CliError, Result, ValidationError};
pub use host::HostEnvironment;
pub use logger::Logger;
pub use options::{RawRequest, ResolvedConfig};
pub use outcome::Outcome;
