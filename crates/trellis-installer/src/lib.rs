mod container;
mod detect;
mod executor;
mod fs_utils;
mod layout;
mod native;
mod plan;
mod resolver;

pub use container::ContainerExecutor;
pub use detect::{detect, detect_container, inspect_native, NativeInspection};
pub use executor::{run_install, run_uninstall, Executor, InstallReport, UninstallReport, UninstallStatus};
pub use fs_utils::{atomic_write, backup_file, remove_file_if_exists, set_executable};
pub use layout::InstallLayout;
pub use native::NativeServiceExecutor;
pub use plan::plan;
pub use resolver::{download_binary, file_sha256, latest_release_tag, resolve_version};
