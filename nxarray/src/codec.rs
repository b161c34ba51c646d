//! The container file codec.
//!
//! A [`TreeCodec`] opens a container as a [`Root`] and writes a [`Root`] back.
//! [`StoreCodec`] implements it over any store of the `nxarray_storage` crate, and [`FilesystemCodec`] over a directory.
//!
//! ### Storage layout
//! Every node is a JSON document at `<node path>/nx.json` (see [`NodeMetadata`](nxarray_metadata::NodeMetadata)).
//! The root, entries, and groups list their children in order.
//! Field values are little-endian `f64` at `<node path>/data`.
//! Only groups with `nx_class` `NXdata` are read as a [`Group`](crate::node::Group), every other child of an entry is read as an [`OpaqueObject`](crate::node::OpaqueObject) holding its full subtree.

#[cfg(feature = "filesystem")]
mod filesystem_codec;
mod opaque_node;
mod store_codec;

#[cfg(feature = "filesystem")]
pub use filesystem_codec::FilesystemCodec;
pub use store_codec::{read_root, write_root, StoreCodec};

use std::path::{Path, PathBuf};

use nxarray_metadata::NodeMetadataParseError;
use nxarray_storage::StorageError;
use thiserror::Error;

use crate::{config::global_config, node::Root};

/// A container file codec.
pub trait TreeCodec {
    /// Options forwarded verbatim to [`TreeCodec::write`].
    type WriteOptions;

    /// Open the container at `path`.
    ///
    /// # Errors
    /// Returns a [`CodecError`] if the container cannot be opened or read.
    fn open(&self, path: &Path) -> Result<Root, CodecError>;

    /// Write `root` to the container at `path`.
    ///
    /// # Errors
    /// Returns a [`CodecError`] if the container cannot be written.
    fn write(&self, root: &Root, path: &Path, options: &Self::WriteOptions)
        -> Result<(), CodecError>;
}

/// Options for writing a container to a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreWriteOptions {
    /// Pretty print node metadata.
    pub pretty: bool,
    /// Replace an existing container. If false, writing to an existing container fails.
    pub overwrite: bool,
}

impl Default for StoreWriteOptions {
    fn default() -> Self {
        Self {
            pretty: global_config().pretty_metadata(),
            overwrite: true,
        }
    }
}

/// A container file codec error.
#[derive(Debug, Error)]
pub enum CodecError {
    /// An underlying store error.
    #[error(transparent)]
    StorageError(#[from] StorageError),
    /// An error creating a filesystem store.
    #[cfg(feature = "filesystem")]
    #[error(transparent)]
    FilesystemStoreCreateError(#[from] nxarray_filesystem::FilesystemStoreCreateError),
    /// The container does not exist.
    #[error("no container at {0}")]
    NotFound(PathBuf),
    /// A container already exists and overwriting is disabled.
    #[error("a container already exists at {0}")]
    Exists(String),
    /// A path cannot be mapped to the store.
    #[error("invalid container path {0}")]
    InvalidPath(PathBuf),
    /// The metadata of a listed node is missing.
    #[error("missing node metadata at {0}")]
    MissingNode(String),
    /// The metadata of a node is invalid.
    #[error("invalid node metadata at {path}: {source}")]
    InvalidMetadata {
        /// The node path.
        path: String,
        /// The parse error.
        source: NodeMetadataParseError,
    },
    /// A node has an unexpected type.
    #[error("expected a {expected} node at {path}, found a {found} node")]
    UnexpectedNodeType {
        /// The node path.
        path: String,
        /// The expected node type.
        expected: &'static str,
        /// The node type found.
        found: &'static str,
    },
    /// The data of a field does not match its shape.
    #[error("invalid field data at {path}: {reason}")]
    InvalidFieldData {
        /// The node path.
        path: String,
        /// Why the data is invalid.
        reason: String,
    },
    /// A node name cannot be stored.
    #[error("invalid node name {0:?}")]
    InvalidNodeName(String),
    /// The content of an opaque object was not produced by this codec.
    #[error("invalid content of opaque object {name}: {reason}")]
    InvalidOpaqueObject {
        /// The object name.
        name: String,
        /// Why the content is invalid.
        reason: String,
    },
}
