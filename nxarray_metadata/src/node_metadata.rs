use derive_more::From;
use monostate::MustBe;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Attributes;

/// Node metadata.
///
/// The `node_type` field of the JSON document selects the variant.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, From)]
#[serde(tag = "node_type", rename_all = "lowercase")]
pub enum NodeMetadata {
    /// The root of a container.
    Root(RootMetadata),
    /// A top-level named node of the root.
    Entry(EntryMetadata),
    /// A group holding fields and other nodes.
    Group(GroupMetadata),
    /// An inline N-dimensional array.
    Field(FieldMetadata),
    /// A placeholder standing for data stored elsewhere.
    Link(LinkMetadata),
}

/// The root metadata.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
pub struct RootMetadata {
    /// The wire schema version. Must be `1`.
    pub nx_format: MustBe!(1u64),
    /// Optional user metadata.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub attributes: Attributes,
    /// The names of the child entries, in order.
    #[serde(default)]
    pub children: Vec<String>,
}

/// Entry metadata.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
pub struct EntryMetadata {
    /// The wire schema version. Must be `1`.
    pub nx_format: MustBe!(1u64),
    /// Optional user metadata.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub attributes: Attributes,
    /// The names of the children, in order.
    #[serde(default)]
    pub children: Vec<String>,
}

/// Group metadata.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
pub struct GroupMetadata {
    /// The wire schema version. Must be `1`.
    pub nx_format: MustBe!(1u64),
    /// The class of the group, e.g. `NXdata`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nx_class: Option<String>,
    /// Optional user metadata.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub attributes: Attributes,
    /// The names of the children, in order.
    #[serde(default)]
    pub children: Vec<String>,
}

/// Field metadata.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
pub struct FieldMetadata {
    /// The wire schema version. Must be `1`.
    pub nx_format: MustBe!(1u64),
    /// The shape of the field.
    pub shape: Vec<u64>,
    /// Optional user metadata.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub attributes: Attributes,
}

/// Link metadata.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
pub struct LinkMetadata {
    /// The wire schema version. Must be `1`.
    pub nx_format: MustBe!(1u64),
    /// The absolute path of the linked node, e.g. `/entry/data/x`.
    pub target: String,
    /// Optional user metadata.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub attributes: Attributes,
}

/// An error parsing node metadata.
#[derive(Debug, Error)]
#[error("invalid node metadata: {0}")]
pub struct NodeMetadataParseError(#[from] serde_json::Error);

impl NodeMetadata {
    /// Parse node metadata from a JSON document.
    ///
    /// # Errors
    /// Returns a [`NodeMetadataParseError`] if the document is not valid node metadata.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, NodeMetadataParseError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Serialize the metadata to a JSON document, optionally pretty printed.
    #[must_use]
    pub fn to_vec(&self, pretty: bool) -> Vec<u8> {
        if pretty {
            serde_json::to_vec_pretty(self)
        } else {
            serde_json::to_vec(self)
        }
        .unwrap_or_default()
    }

    /// The node type, as written to the `node_type` field.
    #[must_use]
    pub const fn node_type(&self) -> &'static str {
        match self {
            Self::Root(_) => "root",
            Self::Entry(_) => "entry",
            Self::Group(_) => "group",
            Self::Field(_) => "field",
            Self::Link(_) => "link",
        }
    }

    /// The attributes of the node.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        match self {
            Self::Root(metadata) => &metadata.attributes,
            Self::Entry(metadata) => &metadata.attributes,
            Self::Group(metadata) => &metadata.attributes,
            Self::Field(metadata) => &metadata.attributes,
            Self::Link(metadata) => &metadata.attributes,
        }
    }

    /// The names of the children of the node.
    ///
    /// Fields and links have no children.
    #[must_use]
    pub fn children(&self) -> &[String] {
        match self {
            Self::Root(metadata) => &metadata.children,
            Self::Entry(metadata) => &metadata.children,
            Self::Group(metadata) => &metadata.children,
            Self::Field(_) | Self::Link(_) => &[],
        }
    }
}

impl std::fmt::Display for NodeMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", serde_json::to_string(self).unwrap_or_default())
    }
}

impl RootMetadata {
    /// Create root metadata.
    #[must_use]
    pub fn new(attributes: Attributes, children: Vec<String>) -> Self {
        Self {
            nx_format: Default::default(),
            attributes,
            children,
        }
    }
}

impl EntryMetadata {
    /// Create entry metadata.
    #[must_use]
    pub fn new(attributes: Attributes, children: Vec<String>) -> Self {
        Self {
            nx_format: Default::default(),
            attributes,
            children,
        }
    }
}

impl GroupMetadata {
    /// Create group metadata.
    #[must_use]
    pub fn new(nx_class: Option<String>, attributes: Attributes, children: Vec<String>) -> Self {
        Self {
            nx_format: Default::default(),
            nx_class,
            attributes,
            children,
        }
    }
}

impl FieldMetadata {
    /// Create field metadata.
    #[must_use]
    pub fn new(shape: Vec<u64>, attributes: Attributes) -> Self {
        Self {
            nx_format: Default::default(),
            shape,
            attributes,
        }
    }

    /// The number of elements of the field.
    #[must_use]
    pub fn num_elements(&self) -> u64 {
        self.shape.iter().product()
    }
}

impl LinkMetadata {
    /// Create link metadata.
    #[must_use]
    pub fn new(target: String, attributes: Attributes) -> Self {
        Self {
            nx_format: Default::default(),
            target,
            attributes,
        }
    }
}
