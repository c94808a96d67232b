//! Linux desktop integration.
//!
//! Two independent best-effort steps run after a Linux build:
//!
//! 1. A desktop entry (`<name>.desktop`) is written beside the build directory.
//! 2. The build is installed system-wide under `/opt/<name>`. A copy of the
//!    entry pointing at the installed files goes into the user's
//!    applications directory.
//!
//! Neither step can fail the build. Problems are logged with instructions
//! for finishing the job by hand and returned as warnings.

use crate::bundler::platform::RUNTIME_EXECUTABLE;
use crate::host::HostEnvironment;
use crate::logger::Logger;
use crate::options::ResolvedConfig;
use crate::outcome::Outcome;
use crate::utils::fs::{self as fs_utils, CopyOptions};
use anyhow::{Context, Result, bail};
use handlebars::Handlebars;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const DESKTOP_ENTRY_TEMPLATE: &str = "[Desktop Entry]
Version=1.0
Type=Application
Name={{name}}
Comment=App for {{url}}
Exec=\"{{exec}}\" %U
Icon={{icon}}
Terminal=false
Categories=Network;WebBrowser;
StartupNotify=true
StartupWMClass={{wm_class}}
";

/// Files produced by [`LinuxIntegrator::integrate`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinuxIntegration {
    /// Desktop entry written beside the build directory
    pub desktop_entry: Option<PathBuf>,
    /// Directory of the system-wide install
    pub system_install: Option<PathBuf>,
    /// Desktop entry registered in the user's applications directory
    pub user_entry: Option<PathBuf>,
}

/// Registers a Linux build with the desktop environment.
#[derive(Clone, Debug)]
pub struct LinuxIntegrator {
    host: HostEnvironment,
    log: Logger,
}

impl LinuxIntegrator {
    /// Create a new integrator for `host`
    pub fn new(host: HostEnvironment, log: Logger) -> Self {
        Self { host, log }
    }

    /// Runs both integration steps for the build at `app_path`.
    pub async fn integrate(
        &self,
        app_path: &Path,
        config: &ResolvedConfig,
    ) -> Outcome<LinuxIntegration> {
        let mut outcome = Outcome::clean(LinuxIntegration::default());
        let name = &config.features.name;
        let exe_name = find_executable(app_path, name).await;

        match self.write_desktop_entry(app_path, &exe_name, config).await {
            Ok(entry) => {
                self.log
                    .info(format!("Desktop entry written to {}", entry.display()));
                outcome.value.desktop_entry = Some(entry);
            }
            Err(e) => {
                let warning = format!(
                    "Could not create a desktop entry for {}: {:#}. \
                     Create ~/.local/share/applications/{}.desktop manually to add it to your launcher.",
                    name, e, name
                );
                self.log.warn(&warning);
                outcome.warn(warning);
            }
        }

        let install_dir = self.host.system_install_root.join(name);
        match self
            .install_system_wide(app_path, &install_dir, &exe_name, config)
            .await
        {
            Ok(user_entry) => {
                self.log
                    .info(format!("Installed {} to {}", name, install_dir.display()));
                outcome.value.system_install = Some(install_dir);
                outcome.value.user_entry = Some(user_entry);
            }
            Err(e) => {
                let warning = format!(
                    "Could not install {} system-wide: {:#}. To install it manually run \
                     `sudo cp -r \"{}\" \"{}\"` and copy {}.desktop into ~/.local/share/applications.",
                    name,
                    e,
                    app_path.display(),
                    install_dir.display(),
                    name
                );
                self.log.warn(&warning);
                outcome.warn(warning);
            }
        }

        outcome
    }

    async fn write_desktop_entry(
        &self,
        app_path: &Path,
        exe_name: &str,
        config: &ResolvedConfig,
    ) -> Result<PathBuf> {
        let parent = app_path
            .parent()
            .context("build directory has no parent directory")?;
        let entry_path = parent.join(format!("{}.desktop", config.features.name));

        let contents = render_desktop_entry(config, &app_path.join(exe_name), app_path)?;
        write_executable(&entry_path, &contents).await?;
        Ok(entry_path)
    }

    /// Copies the build under `install_dir` and registers the user entry.
    async fn install_system_wide(
        &self,
        app_path: &Path,
        install_dir: &Path,
        exe_name: &str,
        config: &ResolvedConfig,
    ) -> Result<PathBuf> {
        if is_same_dir(app_path, install_dir).await {
            self.log.debug(format!(
                "{} is already installed at {}",
                config.features.name,
                install_dir.display()
            ));
        } else if self.host.elevated {
            fs_utils::remove_dir_all(install_dir)
                .await
                .with_context(|| format!("removing {}", install_dir.display()))?;
            fs_utils::copy_dir(
                app_path,
                install_dir,
                CopyOptions {
                    overwrite: true,
                    preserve_timestamps: true,
                },
            )
            .await
            .with_context(|| format!("copying {} to {}", app_path.display(), install_dir.display()))?;
        } else {
            let target = install_dir.to_string_lossy().into_owned();
            let source = app_path.to_string_lossy().into_owned();
            self.log.info(format!(
                "Installing to {} requires administrator rights, asking sudo",
                install_dir.display()
            ));
            sudo(&["rm", "-rf", &target]).await?;
            sudo(&["cp", "-r", &source, &target]).await?;
            if let Some(user) = &self.host.invoking_user {
                sudo(&["chown", "-R", &chown_owner(user), &target]).await?;
            }
        }

        let apps_dir = self
            .host
            .user_applications_dir
            .as_deref()
            .context("no per-user applications directory on this system")?;
        tokio::fs::create_dir_all(apps_dir)
            .await
            .with_context(|| format!("creating {}", apps_dir.display()))?;

        let entry_path = apps_dir.join(format!("{}.desktop", config.features.name));
        let contents = render_desktop_entry(config, &install_dir.join(exe_name), install_dir)?;
        write_executable(&entry_path, &contents).await?;
        Ok(entry_path)
    }
}

/// Renders a desktop entry for the app installed at `app_dir`.
pub fn render_desktop_entry(
    config: &ResolvedConfig,
    exec: &Path,
    app_dir: &Path,
) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);

    let name = &config.features.name;
    let mut data = BTreeMap::new();
    data.insert("name", name.clone());
    data.insert("url", config.features.target_url.clone());
    data.insert("exec", exec.display().to_string());
    data.insert(
        "icon",
        app_dir.join("resources/app/icon.png").display().to_string(),
    );
    data.insert("wm_class", name.split_whitespace().collect::<String>());

    handlebars
        .render_template(DESKTOP_ENTRY_TEMPLATE, &data)
        .context("rendering desktop entry")
}

/// True when both paths exist and resolve to the same directory.
async fn is_same_dir(a: &Path, b: &Path) -> bool {
    match (
        tokio::fs::canonicalize(a).await,
        tokio::fs::canonicalize(b).await,
    ) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// `chown` spec giving `user` ownership with their login group.
fn chown_owner(user: &str) -> String {
    format!("{user}:")
}

/// Executable to launch: the app-named binary, or the runtime shell when the
/// engine left it unrenamed.
async fn find_executable(app_path: &Path, name: &str) -> String {
    for candidate in [name, RUNTIME_EXECUTABLE] {
        if tokio::fs::metadata(app_path.join(candidate))
            .await
            .is_ok_and(|meta| meta.is_file())
        {
            return candidate.to_string();
        }
    }
    name.to_string()
}

async fn write_executable(path: &Path, contents: &str) -> Result<()> {
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    fs_utils::set_executable(path)
        .await
        .with_context(|| format!("marking {} executable", path.display()))?;
    Ok(())
}

async fn sudo(args: &[&str]) -> Result<()> {
    let command = format!("sudo {}", args.join(" "));
    let output = tokio::process::Command::new("sudo")
        .args(args)
        .output()
        .await
        .with_context(|| format!("running `{command}`"))?;

    if !output.status.success() {
        bail!(
            "`{}` failed: {}",
            command,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(())
}
