use nxarray_metadata::Attributes;

use crate::node::OpaqueObject;

/// The structure of an entry that a [`Dataset`](super::Dataset) cannot express.
///
/// Records the originating entry name, the structural attributes of the entry, and every child of the entry in its original order.
/// Converted groups are recorded by name with their full attributes so that their declarations are restored on save.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SiblingTree {
    entry_name: String,
    entry_attributes: Attributes,
    objects: Vec<TreeObject>,
}

/// A child of the entry recorded in a [`SiblingTree`].
#[derive(Debug, Clone, PartialEq)]
pub enum TreeObject {
    /// A group whose fields were converted into the dataset.
    Group {
        /// The group name.
        name: String,
        /// The group attributes, including the structural declarations.
        attributes: Attributes,
    },
    /// A child carried unmodified.
    Opaque(OpaqueObject),
}

impl TreeObject {
    /// The object name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Group { name, .. } => name,
            Self::Opaque(object) => object.name(),
        }
    }
}

impl SiblingTree {
    /// Create an empty sibling tree for the entry `entry_name`.
    #[must_use]
    pub fn new(entry_name: impl Into<String>) -> Self {
        Self {
            entry_name: entry_name.into(),
            entry_attributes: Attributes::new(),
            objects: Vec::new(),
        }
    }

    /// Set the structural attributes of the entry, e.g. `default`.
    #[must_use]
    pub fn with_entry_attributes(mut self, attributes: Attributes) -> Self {
        self.entry_attributes = attributes;
        self
    }

    /// The name of the originating entry.
    #[must_use]
    pub fn entry_name(&self) -> &str {
        &self.entry_name
    }

    /// The structural attributes of the entry.
    #[must_use]
    pub const fn entry_attributes(&self) -> &Attributes {
        &self.entry_attributes
    }

    /// The recorded children, in original order.
    #[must_use]
    pub fn objects(&self) -> &[TreeObject] {
        &self.objects
    }

    /// Record a child.
    pub fn push(&mut self, object: TreeObject) {
        self.objects.push(object);
    }

    /// Iterate over the opaque children.
    pub fn opaque_objects(&self) -> impl Iterator<Item = &OpaqueObject> {
        self.objects.iter().filter_map(|object| match object {
            TreeObject::Opaque(object) => Some(object),
            TreeObject::Group { .. } => None,
        })
    }
}
