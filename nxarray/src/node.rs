//! The hierarchical group tree.
//!
//! A [`Root`] holds named [`Entry`] nodes.
//! An entry holds [`Group`]s subject to axis inference and [`OpaqueObject`]s that are carried through conversions unmodified.
//! A group holds [`Field`]s, each either inline data or a [`Link`] placeholder.

use derive_more::From;
use itertools::Itertools;
use ndarray::ArrayD;
use nxarray_metadata::Attributes;

use crate::attributes::{indices_key, AXES, DEFAULT, SIGNAL};

/// A placeholder for data stored elsewhere in the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    target: String,
    shape: Option<Vec<usize>>,
}

impl Link {
    /// Create a link to the absolute node path `target`, e.g. `/entry/data/x`.
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            shape: None,
        }
    }

    /// Set the shape of the linked data, if it is known.
    #[must_use]
    pub fn with_shape(mut self, shape: Option<Vec<usize>>) -> Self {
        self.shape = shape;
        self
    }

    /// The link target path.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The shape of the linked data, if known.
    #[must_use]
    pub fn shape(&self) -> Option<&[usize]> {
        self.shape.as_deref()
    }
}

/// The value of a [`Field`].
#[derive(Debug, Clone, PartialEq, From)]
pub enum FieldValue {
    /// Inline N-dimensional data.
    Array(ArrayD<f64>),
    /// A link placeholder.
    Link(Link),
}

/// A named array or link placeholder with its own attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    value: FieldValue,
    attributes: Attributes,
}

impl Field {
    /// Create a field.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            attributes: Attributes::new(),
        }
    }

    /// Set the attributes.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// The field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field value.
    #[must_use]
    pub const fn value(&self) -> &FieldValue {
        &self.value
    }

    /// The field attributes.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Mutable access to the field attributes.
    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// Returns the link if the field is a link placeholder.
    #[must_use]
    pub fn link(&self) -> Option<&Link> {
        match &self.value {
            FieldValue::Link(link) => Some(link),
            FieldValue::Array(_) => None,
        }
    }

    /// The shape of the field.
    ///
    /// Returns [`None`] for a link whose shape is unknown.
    #[must_use]
    pub fn shape(&self) -> Option<&[usize]> {
        match &self.value {
            FieldValue::Array(array) => Some(array.shape()),
            FieldValue::Link(link) => link.shape(),
        }
    }
}

/// A named node holding fields and the structural declarations of its signal and axes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    name: String,
    attributes: Attributes,
    fields: Vec<Field>,
}

impl Group {
    /// Create an empty group.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
            fields: Vec::new(),
        }
    }

    /// Set the attributes.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Add a field.
    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.add_field(field);
        self
    }

    /// The group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The group attributes, including the structural declarations.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Mutable access to the group attributes.
    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// The fields, in order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the field named `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Add a field, replacing any field of the same name in place.
    pub fn add_field(&mut self, field: Field) {
        if let Some(existing) = self.fields.iter_mut().find(|f| f.name == field.name) {
            *existing = field;
        } else {
            self.fields.push(field);
        }
    }

    /// The raw `signal` declaration.
    #[must_use]
    pub fn signal(&self) -> Option<&serde_json::Value> {
        self.attributes.get(SIGNAL)
    }

    /// The raw `axes` declaration.
    #[must_use]
    pub fn axes(&self) -> Option<&serde_json::Value> {
        self.attributes.get(AXES)
    }

    /// The raw `<field>_indices` declaration of the field `name`.
    #[must_use]
    pub fn index_hint(&self, name: &str) -> Option<&serde_json::Value> {
        self.attributes.get(&indices_key(name))
    }
}

/// A child of an entry that is not subject to axis inference.
///
/// The content is produced and consumed by the file codec and never interpreted by the conversions.
#[derive(Debug, Clone, PartialEq)]
pub struct OpaqueObject {
    name: String,
    content: serde_json::Value,
}

impl OpaqueObject {
    /// Create an opaque object.
    #[must_use]
    pub fn new(name: impl Into<String>, content: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }

    /// The object name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The object content.
    #[must_use]
    pub const fn content(&self) -> &serde_json::Value {
        &self.content
    }
}

/// A child of an [`Entry`].
#[derive(Debug, Clone, PartialEq, From)]
pub enum EntryChild {
    /// A group subject to axis inference.
    Group(Group),
    /// Any other child, carried unmodified.
    Opaque(OpaqueObject),
}

impl EntryChild {
    /// The child name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Group(group) => group.name(),
            Self::Opaque(object) => object.name(),
        }
    }
}

/// A top-level named node of a container.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Entry {
    name: String,
    attributes: Attributes,
    children: Vec<EntryChild>,
}

impl Entry {
    /// Create an empty entry.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    /// Set the attributes.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Add a child.
    #[must_use]
    pub fn with_child(mut self, child: impl Into<EntryChild>) -> Self {
        self.add_child(child);
        self
    }

    /// The entry name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The entry attributes.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Mutable access to the entry attributes.
    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// The children, in order.
    #[must_use]
    pub fn children(&self) -> &[EntryChild] {
        &self.children
    }

    /// Add a child, replacing any child of the same name in place.
    pub fn add_child(&mut self, child: impl Into<EntryChild>) {
        let child = child.into();
        if let Some(existing) = self.children.iter_mut().find(|c| c.name() == child.name()) {
            *existing = child;
        } else {
            self.children.push(child);
        }
    }

    /// Returns the group named `name`.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.children.iter().find_map(|child| match child {
            EntryChild::Group(group) if group.name() == name => Some(group),
            _ => None,
        })
    }

    /// Iterate over the groups.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.children.iter().filter_map(|child| match child {
            EntryChild::Group(group) => Some(group),
            EntryChild::Opaque(_) => None,
        })
    }
}

/// The root of a container.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Root {
    attributes: Attributes,
    entries: Vec<Entry>,
}

impl Root {
    /// Create an empty root.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the attributes.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Add an entry.
    #[must_use]
    pub fn with_entry(mut self, entry: Entry) -> Self {
        self.add_entry(entry);
        self
    }

    /// The root attributes.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Mutable access to the root attributes.
    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// The entries, in order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Add an entry, replacing any entry of the same name in place.
    pub fn add_entry(&mut self, entry: Entry) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.name == entry.name) {
            *existing = entry;
        } else {
            self.entries.push(entry);
        }
    }

    /// Returns the entry named `name`.
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Returns the default entry.
    ///
    /// This is the entry named by the root `default` attribute, or the first entry if that is absent or names no entry.
    #[must_use]
    pub fn default_entry(&self) -> Option<&Entry> {
        self.attributes
            .get(DEFAULT)
            .and_then(serde_json::Value::as_str)
            .and_then(|name| self.entry(name))
            .or_else(|| self.entries.first())
    }

    /// Create a string representation of the tree.
    ///
    /// Each node is written on its own line, indented by depth.
    /// Fields list their shape, links their target.
    #[must_use]
    pub fn tree(&self) -> String {
        let mut s = String::from("/\n");
        for entry in &self.entries {
            s.push_str(&format!("  {}\n", entry.name));
            for child in &entry.children {
                match child {
                    EntryChild::Group(group) => {
                        s.push_str(&format!("    {}\n", group.name));
                        for field in &group.fields {
                            match &field.value {
                                FieldValue::Array(array) => {
                                    s.push_str(&format!(
                                        "      {} [{}]\n",
                                        field.name,
                                        array.shape().iter().join(", ")
                                    ));
                                }
                                FieldValue::Link(link) => {
                                    s.push_str(&format!("      {} -> {}\n", field.name, link.target));
                                }
                            }
                        }
                    }
                    EntryChild::Opaque(object) => {
                        s.push_str(&format!("    {} (opaque)\n", object.name));
                    }
                }
            }
        }
        s
    }
}
