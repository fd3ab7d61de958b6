/// Configuration file discovery, loading and saving.
///
/// This module is the only place the `reportfill` binary reads or writes the
/// configuration file. `reportfill-core` parses and validates JSON but never
/// touches the filesystem.
///
/// Key behaviours:
/// - An explicit `--config` path must exist for commands that read it.
/// - Without one, `./config.json`, `<exe dir>/config.json` and
///   `$HOME/config.json` are tried in order; if none exists the built-in
///   default is used and later saves go to `./config.json`.
/// - File size is checked via `std::fs::metadata` before any read.
/// - All I/O errors are converted to [`CliError`] variants with exit code 2.
use std::path::{Path, PathBuf};

use reportfill_core::{Config, ConfigError};

use crate::error::CliError;

/// File name searched for when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Configuration files above this size are rejected unread.
pub const MAX_CONFIG_SIZE: u64 = 16 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// Where the configuration lives and whether a file is already there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    /// Path read from and saved to.
    pub path: PathBuf,
    /// `true` if the file exists.
    pub exists: bool,
    /// `true` if the path came from `--config` or `REPORTFILL_CONFIG`.
    pub explicit: bool,
}

/// Resolves the configuration path.
pub fn locate_config(explicit: Option<&Path>) -> ConfigLocation {
    if let Some(path) = explicit {
        return ConfigLocation {
            path: path.to_path_buf(),
            exists: path.is_file(),
            explicit: true,
        };
    }
    if let Some(path) = search_paths().into_iter().find(|p| p.is_file()) {
        return ConfigLocation {
            path,
            exists: true,
            explicit: false,
        };
    }
    ConfigLocation {
        path: PathBuf::from(CONFIG_FILE_NAME),
        exists: false,
        explicit: false,
    }
}

/// Candidate paths in lookup order.
fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        paths.push(dir.join(CONFIG_FILE_NAME));
    }
    if let Some(home) = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")) {
        paths.push(PathBuf::from(home).join(CONFIG_FILE_NAME));
    }
    paths
}

// ---------------------------------------------------------------------------
// ConfigSession
// ---------------------------------------------------------------------------

/// A loaded configuration together with the file it belongs to.
///
/// Commands receive the session explicitly; there is no process-wide
/// configuration.
#[derive(Debug, Clone)]
pub struct ConfigSession {
    /// Path the configuration is saved to.
    pub path: PathBuf,
    /// The configuration itself.
    pub config: Config,
    /// `false` when the built-in default stands in for a missing file.
    pub from_file: bool,
}

impl ConfigSession {
    /// Loads and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::FileNotFound`] if an explicit path does not exist,
    /// [`CliError::ConfigParse`] for malformed JSON and
    /// [`CliError::InvalidConfig`] when required fields are missing.
    pub fn load(explicit: Option<&Path>) -> Result<Self, CliError> {
        let location = locate_config(explicit);
        if !location.exists {
            if location.explicit {
                return Err(CliError::FileNotFound {
                    path: location.path,
                });
            }
            tracing::warn!(
                path = %location.path.display(),
                "no configuration file found, using built-in defaults"
            );
            let config = Config::default_template()
                .map_err(|e| config_error_to_cli(e, &location.path))?;
            return Ok(Self {
                path: location.path,
                config,
                from_file: false,
            });
        }

        let value = read_config_value(&location.path)?;
        let config =
            Config::from_value(value).map_err(|e| config_error_to_cli(e, &location.path))?;
        tracing::debug!(path = %location.path.display(), "configuration loaded");
        Ok(Self {
            path: location.path,
            config,
            from_file: true,
        })
    }

    /// Writes the configuration back to [`ConfigSession::path`] as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an I/O variant of [`CliError`] if the file cannot be written.
    pub fn save(&self) -> Result<(), CliError> {
        write_config(&self.path, &self.config)?;
        tracing::info!(path = %self.path.display(), "configuration saved");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// File access
// ---------------------------------------------------------------------------

/// Reads `path` as JSON without validating its shape.
///
/// # Errors
///
/// Returns I/O variants of [`CliError`], [`CliError::FileTooLarge`] above
/// [`MAX_CONFIG_SIZE`], and [`CliError::ConfigParse`] for malformed JSON.
pub fn read_config_value(path: &Path) -> Result<serde_json::Value, CliError> {
    let file_size = match std::fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) => return Err(io_error_to_cli(&e, path)),
    };
    if file_size > MAX_CONFIG_SIZE {
        return Err(CliError::FileTooLarge {
            path: path.to_path_buf(),
            limit: MAX_CONFIG_SIZE,
            actual: file_size,
        });
    }

    let text = std::fs::read_to_string(path).map_err(|e| io_error_to_cli(&e, path))?;
    serde_json::from_str(&text).map_err(|e| CliError::ConfigParse {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

/// Serializes `config` to `path`.
///
/// # Errors
///
/// Returns I/O variants of [`CliError`].
pub fn write_config(path: &Path, config: &Config) -> Result<(), CliError> {
    let text = config
        .to_json_pretty()
        .map_err(|e| config_error_to_cli(e, path))?;
    std::fs::write(path, text).map_err(|e| io_error_to_cli(&e, path))
}

fn config_error_to_cli(e: ConfigError, path: &Path) -> CliError {
    match e {
        ConfigError::Json { detail } => CliError::ConfigParse {
            path: path.to_path_buf(),
            detail,
        },
        ConfigError::Invalid { diagnostics } => CliError::InvalidConfig {
            path: path.to_path_buf(),
            diagnostics,
        },
    }
}

/// Maps a `std::io::Error` arising from a disk-file operation to a [`CliError`].
pub fn io_error_to_cli(e: &std::io::Error, path: &Path) -> CliError {
    match e.kind() {
        std::io::ErrorKind::NotFound => CliError::FileNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => CliError::PermissionDenied {
            path: path.to_path_buf(),
        },
        // Everything else lands in IoError; the common kinds are listed to
        // satisfy the exhaustiveness lint.
        std::io::ErrorKind::AlreadyExists
        | std::io::ErrorKind::WouldBlock
        | std::io::ErrorKind::NotADirectory
        | std::io::ErrorKind::IsADirectory
        | std::io::ErrorKind::DirectoryNotEmpty
        | std::io::ErrorKind::ReadOnlyFilesystem
        | std::io::ErrorKind::StaleNetworkFileHandle
        | std::io::ErrorKind::InvalidInput
        | std::io::ErrorKind::InvalidData
        | std::io::ErrorKind::TimedOut
        | std::io::ErrorKind::WriteZero
        | std::io::ErrorKind::StorageFull
        | std::io::ErrorKind::NotSeekable
        | std::io::ErrorKind::QuotaExceeded
        | std::io::ErrorKind::FileTooLarge
        | std::io::ErrorKind::ResourceBusy
        | std::io::ErrorKind::ExecutableFileBusy
        | std::io::ErrorKind::CrossesDevices
        | std::io::ErrorKind::TooManyLinks
        | std::io::ErrorKind::Interrupted
        | std::io::ErrorKind::Unsupported
        | std::io::ErrorKind::UnexpectedEof
        | std::io::ErrorKind::OutOfMemory
        | std::io::ErrorKind::Other
        | _ => CliError::IoError {
            source: path.display().to_string(),
            detail: e.to_string(),
        },
    }
}
