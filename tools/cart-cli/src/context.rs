//! CLI execution context.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context as _, Result};
use cart_core::CartStore;
use cart_fetch::{FetchClient, StorefrontApi};
use cart_storage::FileStore;

use crate::config::{CliConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    ///
    /// Without an explicit path, the working directory and its parents are
    /// searched for a config file. `api_url` overrides whatever the file says.
    pub fn load(config_path: Option<&str>, api_url: Option<String>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config_path = match config_path {
            Some(path) => Some(PathBuf::from(path)),
            None => find_config(&cwd),
        };

        let mut config = match &config_path {
            Some(path) => CliConfig::load(path)?,
            None => CliConfig::default(),
        };

        if let Some(url) = api_url {
            config.api.base_url = url;
        }

        tracing::debug!(
            config = ?config_path,
            api = %config.api.base_url,
            "loaded configuration"
        );

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Directory the cart file lives in.
    pub fn storage_dir(&self) -> Result<PathBuf> {
        match &self.config.storage.dir {
            Some(dir) => Ok(self.resolve_path(dir)),
            None => Ok(dirs_path()?.join("cart")),
        }
    }

    /// Client for the configured storefront API.
    pub fn api(&self) -> StorefrontApi {
        let client = FetchClient::new()
            .with_base_url(self.config.api.base_url.clone())
            .with_timeout(self.config.timeout());
        StorefrontApi::with_client(client)
    }

    /// Open the persisted cart, wired to the storefront API and to the
    /// terminal as its notification sink.
    pub fn open_store(&self) -> Result<CartStore<FileStore>> {
        let dir = self.storage_dir()?;
        let backend = FileStore::open(&dir)
            .with_context(|| format!("Failed to open cart storage at {}", dir.display()))?;

        let api = Arc::new(self.api());
        let store = CartStore::open(self.config.cart_config(), backend, api.clone(), api)
            .with_notifier(Arc::new(self.output));

        Ok(store)
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

/// Find a config file in the directory tree.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in CONFIG_FILE_NAMES {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Get the platform-specific data directory.
fn dirs_path() -> Result<PathBuf> {
    data_dir_under(std::env::var_os("HOME"))
}

fn data_dir_under(home: Option<OsString>) -> Result<PathBuf> {
    match home {
        Some(home) if !home.is_empty() => Ok(PathBuf::from(home).join(".local").join("share")),
        _ => bail!("HOME is not set; set [storage] dir in cart.toml to choose where the cart is kept"),
    }
}
