//! Post-packaging steps: relocating upgrades and Linux desktop integration.

mod linux;
mod upgrade;

pub use linux::{LinuxIntegration, LinuxIntegrator, render_desktop_entry};
pub use upgrade::finalize_upgrade;
