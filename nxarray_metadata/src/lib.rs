//! [nxarray](https://docs.rs/nxarray/latest/nxarray/index.html) node metadata support.
//!
//! Every node of a stored container (the root, its entries, groups, fields, and links) is described by a JSON document.
//! This crate provides the serde representation of those documents, see [`NodeMetadata`].
//!
//! ## Licence
//! `nxarray_metadata` is licensed under either of
//! - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//! - the MIT license <http://opensource.org/licenses/MIT>, at your option.

mod node_metadata;

pub use node_metadata::{
    EntryMetadata, FieldMetadata, GroupMetadata, LinkMetadata, NodeMetadata,
    NodeMetadataParseError, RootMetadata,
};

/// Free-form attributes of a node or array.
///
/// Keys are kept in insertion order.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// The wire schema version written to the `nx_format` field of node metadata.
pub const NX_FORMAT: u64 = 1;

/// The name of the node metadata document below a node prefix.
pub const NODE_METADATA_KEY: &str = "nx.json";

/// The name of the field values below a field prefix.
pub const FIELD_DATA_KEY: &str = "data";
