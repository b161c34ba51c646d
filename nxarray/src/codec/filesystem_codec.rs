use std::path::Path;

use nxarray_filesystem::FilesystemStore;
use nxarray_storage::StorePrefix;

use super::{read_root, write_root, CodecError, StoreWriteOptions, TreeCodec};
use crate::node::Root;

/// A [`TreeCodec`] storing a container in a directory.
///
/// The container root is the directory at the path given to [`TreeCodec::open`] and [`TreeCodec::write`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FilesystemCodec;

impl TreeCodec for FilesystemCodec {
    type WriteOptions = StoreWriteOptions;

    fn open(&self, path: &Path) -> Result<Root, CodecError> {
        if !path.is_dir() {
            return Err(CodecError::NotFound(path.to_path_buf()));
        }
        let store = FilesystemStore::new(path)?;
        read_root(&store, &StorePrefix::root())
    }

    fn write(
        &self,
        root: &Root,
        path: &Path,
        options: &StoreWriteOptions,
    ) -> Result<(), CodecError> {
        let store = FilesystemStore::new(path)?;
        write_root(&store, &StorePrefix::root(), root, options)
    }
}
