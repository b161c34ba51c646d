use auto_impl::auto_impl;
use itertools::Itertools;

use super::{Bytes, MaybeBytes, StorageError, StoreKey, StoreKeys, StoreKeysPrefixes, StorePrefix, StorePrefixes};

/// Readable storage traits.
#[auto_impl(Arc, &)]
pub trait ReadableStorageTraits: Send + Sync {
    /// Retrieve the value (bytes) associated with a given [`StoreKey`].
    ///
    /// Returns [`None`] if the key is not found.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if there is an underlying storage error.
    fn get(&self, key: &StoreKey) -> Result<MaybeBytes, StorageError>;
}

/// Listable storage traits.
#[auto_impl(Arc, &)]
pub trait ListableStorageTraits: Send + Sync {
    /// Retrieve all [`StoreKeys`] under `prefix`, at any depth.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if there is an underlying error with the store.
    fn list_prefix(&self, prefix: &StorePrefix) -> Result<StoreKeys, StorageError>;

    /// Retrieve the keys and prefixes directly under `prefix`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if there is an underlying error with the store.
    fn list_dir(&self, prefix: &StorePrefix) -> Result<StoreKeysPrefixes, StorageError>;
}

/// Writable storage traits.
#[auto_impl(Arc, &)]
pub trait WritableStorageTraits: Send + Sync {
    /// Store bytes at a [`StoreKey`].
    ///
    /// # Errors
    /// Returns a [`StorageError`] on failure to store.
    fn set(&self, key: &StoreKey, value: Bytes) -> Result<(), StorageError>;

    /// Erase a [`StoreKey`].
    ///
    /// Succeeds if the key does not exist.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if there is an underlying storage error.
    fn erase(&self, key: &StoreKey) -> Result<(), StorageError>;

    /// Erase every [`StoreKey`] under `prefix`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the erase fails.
    fn erase_prefix(&self, prefix: &StorePrefix) -> Result<(), StorageError>;
}

/// A store that can both hold and be searched for a container.
pub trait ReadableWritableListableStorageTraits:
    ReadableStorageTraits + WritableStorageTraits + ListableStorageTraits
{
}

impl<T> ReadableWritableListableStorageTraits for T where
    T: ReadableStorageTraits + WritableStorageTraits + ListableStorageTraits
{
}

/// Discover the child prefixes of a store prefix, in sorted order.
///
/// Prefixes starting with `__` are reserved and skipped.
///
/// # Errors
/// Returns a [`StorageError`] if there is an underlying error with the store.
pub fn discover_children<TStorage: ?Sized + ListableStorageTraits>(
    storage: &TStorage,
    prefix: &StorePrefix,
) -> Result<StorePrefixes, StorageError> {
    let children = storage
        .list_dir(prefix)?
        .prefixes()
        .iter()
        .filter(|child| {
            let name = child
                .as_str()
                .strip_prefix(prefix.as_str())
                .unwrap_or(child.as_str());
            !name.starts_with("__")
        })
        .cloned()
        .sorted()
        .collect();
    Ok(children)
}
