use std::path::Path;
use std::process::Command;

use anyhow::{anyhow, Result};
use trellis_core::{render_env_file, ConvergenceAction, InstallOptions, Role, DEFAULT_IMAGE_TAG};
use trellis_host::{run_command, ComposeVariant, ContainerRuntime, EnvironmentFacts};

use crate::executor::{Executor, InstallReport, UninstallReport, UninstallStatus};
use crate::fs_utils::{atomic_write, backup_file};
use crate::layout::InstallLayout;

/// Fixed-shape server manifest. Runtime values arrive through `${VAR}`
/// substitution from the sibling `.env` file.
const SERVER_COMPOSE_MANIFEST: &str = r#"services:
  server:
    image: ${TRELLIS_IMAGE}
    command: trellis-server
    restart: always
    ports:
      - "${SERVER_PORT}:${SERVER_PORT}"
    env_file:
      - .env
    volumes:
      - ${DATA_DIR}:/var/lib/trellis/server
    logging:
      driver: json-file
      options:
        max-size: 10m
        max-file: "3"
    healthcheck:
      test: ["CMD", "wget", "-qO-", "http://127.0.0.1:${SERVER_PORT}/api/v1/health"]
      interval: 30s
      timeout: 5s
      retries: 3
"#;

/// The node runs with host networking: its managed proxy binds host ports
/// directly.
const NODE_COMPOSE_MANIFEST: &str = r#"services:
  node:
    image: ${TRELLIS_IMAGE}
    command: trellis-node
    restart: always
    network_mode: host
    env_file:
      - .env
    volumes:
      - ${DATA_DIR}:/var/lib/trellis/node
    logging:
      driver: json-file
      options:
        max-size: 10m
        max-file: "3"
"#;

pub(crate) fn manifest_for(role: Role) -> &'static str {
    match role {
        Role::Server => SERVER_COMPOSE_MANIFEST,
        Role::Node => NODE_COMPOSE_MANIFEST,
    }
}

/// Materializes a plan as an env file plus compose manifest and drives the
/// runtime's pull/up/down primitives.
pub struct ContainerExecutor<'a> {
    role: Role,
    layout: &'a InstallLayout,
    facts: &'a EnvironmentFacts,
}

impl<'a> ContainerExecutor<'a> {
    pub fn new(role: Role, layout: &'a InstallLayout, facts: &'a EnvironmentFacts) -> Self {
        Self {
            role,
            layout,
            facts,
        }
    }

    fn compose_variant(&self) -> Result<ComposeVariant> {
        match self.facts.container_runtime {
            ContainerRuntime::Ready(variant) => Ok(variant),
            ContainerRuntime::MissingCompose => Err(anyhow!(
                "docker is present but no compose front-end was found; install the compose plugin or docker-compose"
            )),
            ContainerRuntime::Absent => Err(anyhow!(
                "docker is required for the docker method but was not detected on this host"
            )),
        }
    }

    pub fn install_with<RunCompose>(
        &self,
        action: ConvergenceAction,
        options: &InstallOptions,
        mut run_compose: RunCompose,
    ) -> Result<InstallReport>
    where
        RunCompose: FnMut(&mut Command, &str) -> Result<()>,
    {
        let variant = self.compose_variant()?;
        self.layout.ensure_container_dirs(self.role)?;

        let tag = options
            .version
            .clone()
            .unwrap_or_else(|| DEFAULT_IMAGE_TAG.to_string());

        let env_path = self.layout.env_file_path(self.role);
        let mut config_backup = None;
        if action.writes_config() {
            if action == ConvergenceAction::UpgradeReplaceConfig && env_path.exists() {
                config_backup = Some(backup_file(&env_path)?);
            }
            let rendered = render_env_file(self.role, options, &tag)?;
            // Owner-only: the env file carries secret material.
            atomic_write(&env_path, &rendered, 0o600)?;
        }

        let compose_path = self.layout.compose_path(self.role);
        if action.writes_config() || !compose_path.exists() {
            atomic_write(&compose_path, manifest_for(self.role), 0o644)?;
        }

        // pull before up: a failed pull aborts before any container state
        // changes.
        let role_dir = self.layout.role_dir(self.role);
        self.compose_command(
            variant,
            &role_dir,
            &["pull"],
            "pulling the release image failed",
            &mut run_compose,
        )?;
        self.compose_command(
            variant,
            &role_dir,
            &["up", "-d"],
            "starting the deployment failed",
            &mut run_compose,
        )?;

        Ok(InstallReport {
            action,
            version: tag,
            binary_sha256: None,
            config_path: Some(env_path),
            config_backup,
            supervision_path: compose_path,
            service_started: true,
            warnings: Vec::new(),
        })
    }

    /// Best-effort teardown: `down` the deployment, leave the installation
    /// directory on disk.
    pub fn uninstall_with<RunCompose>(&self, mut run_compose: RunCompose) -> Result<UninstallReport>
    where
        RunCompose: FnMut(&mut Command, &str) -> Result<()>,
    {
        let compose_path = self.layout.compose_path(self.role);
        if !compose_path.exists() {
            return Ok(UninstallReport {
                status: UninstallStatus::NotInstalled,
                removed: Vec::new(),
                warnings: Vec::new(),
            });
        }

        let mut warnings = Vec::new();
        match self.compose_variant() {
            Ok(variant) => {
                if let Err(err) = self.compose_command(
                    variant,
                    &self.layout.role_dir(self.role),
                    &["down"],
                    "stopping the deployment failed",
                    &mut run_compose,
                ) {
                    warnings.push(format!("{err:#}"));
                }
            }
            Err(err) => warnings.push(format!("{err:#}")),
        }

        let status = if warnings.is_empty() {
            UninstallStatus::Uninstalled
        } else {
            UninstallStatus::Partial
        };
        Ok(UninstallReport {
            status,
            removed: Vec::new(),
            warnings,
        })
    }

    fn compose_command<RunCompose>(
        &self,
        variant: ComposeVariant,
        role_dir: &Path,
        args: &[&str],
        context_message: &str,
        run_compose: &mut RunCompose,
    ) -> Result<()>
    where
        RunCompose: FnMut(&mut Command, &str) -> Result<()>,
    {
        let (program, prefix) = variant.command();
        let mut command = Command::new(program);
        command.args(prefix).args(args).current_dir(role_dir);
        run_compose(&mut command, context_message)
    }
}

impl Executor for ContainerExecutor<'_> {
    fn install(
        &self,
        action: ConvergenceAction,
        options: &InstallOptions,
    ) -> Result<InstallReport> {
        self.install_with(action, options, run_command)
    }

    fn uninstall(&self) -> Result<UninstallReport> {
        self.uninstall_with(run_command)
    }
}
