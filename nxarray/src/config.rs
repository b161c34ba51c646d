//! `nxarray` global configuration options.
//!
//! See [`Config`] for the list of options.

use std::sync::{OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Global configuration options for the `nxarray` crate.
///
/// Retrieve the global [`Config`] with [`global_config`] and modify it with [`global_config_mut`].
///
/// ## Default Group Name
/// > default: `"data"`
///
/// The name of the group that a data variable or coordinate is written to when saving a dataset, if the array carries no destination group.
///
/// ## Default Entry Name
/// > default: `"entry"`
///
/// The name of the entry written when saving a dataset that was not loaded from a container and carries no `nxentry` attribute.
///
/// ## Pretty Metadata
/// > default: `true`
///
/// If true, node metadata documents written by the store codec are pretty printed unless the write options say otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    default_group_name: String,
    default_entry_name: String,
    pretty_metadata: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_group_name: "data".to_string(),
            default_entry_name: "entry".to_string(),
            pretty_metadata: true,
        }
    }
}

impl Config {
    /// Get the [default group name](#default-group-name) configuration.
    #[must_use]
    pub fn default_group_name(&self) -> &str {
        &self.default_group_name
    }

    /// Set the [default group name](#default-group-name) configuration.
    pub fn set_default_group_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.default_group_name = name.into();
        self
    }

    /// Get the [default entry name](#default-entry-name) configuration.
    #[must_use]
    pub fn default_entry_name(&self) -> &str {
        &self.default_entry_name
    }

    /// Set the [default entry name](#default-entry-name) configuration.
    pub fn set_default_entry_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.default_entry_name = name.into();
        self
    }

    /// Get the [pretty metadata](#pretty-metadata) configuration.
    #[must_use]
    pub fn pretty_metadata(&self) -> bool {
        self.pretty_metadata
    }

    /// Set the [pretty metadata](#pretty-metadata) configuration.
    pub fn set_pretty_metadata(&mut self, pretty_metadata: bool) -> &mut Self {
        self.pretty_metadata = pretty_metadata;
        self
    }
}

static CONFIG: OnceLock<RwLock<Config>> = OnceLock::new();

/// Returns a reference to the global `nxarray` configuration.
///
/// A poisoned lock is recovered, the configuration is plain data.
pub fn global_config() -> RwLockReadGuard<'static, Config> {
    CONFIG
        .get_or_init(|| RwLock::new(Config::default()))
        .read()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Returns a mutable reference to the global `nxarray` configuration.
///
/// The returned guard must be dropped before any conversion reads the configuration on the same thread.
pub fn global_config_mut() -> RwLockWriteGuard<'static, Config> {
    CONFIG
        .get_or_init(|| RwLock::new(Config::default()))
        .write()
        .unwrap_or_else(PoisonError::into_inner)
}
