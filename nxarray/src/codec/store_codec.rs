use std::{
    path::{Component, Path},
    sync::Arc,
};

use ndarray::{ArrayD, IxDyn};
use nxarray_metadata::{
    EntryMetadata, FieldMetadata, GroupMetadata, LinkMetadata, NodeMetadata, RootMetadata,
    FIELD_DATA_KEY, NODE_METADATA_KEY,
};
use nxarray_storage::{
    discover_children, Bytes, ListableStorageTraits, ReadableStorageTraits, StorageError,
    StoreKey, StorePrefix, WritableStorageTraits,
};

use super::{opaque_node::OpaqueNode, CodecError, StoreWriteOptions, TreeCodec};
use crate::node::{Entry, EntryChild, Field, FieldValue, Group, Link, OpaqueObject, Root};

/// The `nx_class` of groups read as a [`Group`].
const NXDATA: &str = "NXdata";

/// A [`TreeCodec`] over a store.
///
/// The path given to [`TreeCodec::open`] and [`TreeCodec::write`] selects the prefix of the container in the store.
/// The empty path selects the store root.
#[derive(Debug)]
pub struct StoreCodec<TStorage: ?Sized> {
    storage: Arc<TStorage>,
}

impl<TStorage: ?Sized> StoreCodec<TStorage> {
    /// Create a codec over `storage`.
    #[must_use]
    pub fn new(storage: Arc<TStorage>) -> Self {
        Self { storage }
    }

    /// The underlying storage.
    #[must_use]
    pub fn storage(&self) -> &Arc<TStorage> {
        &self.storage
    }
}

impl<TStorage> TreeCodec for StoreCodec<TStorage>
where
    TStorage: ?Sized + ReadableStorageTraits + WritableStorageTraits + ListableStorageTraits,
{
    type WriteOptions = StoreWriteOptions;

    fn open(&self, path: &Path) -> Result<Root, CodecError> {
        read_root(&*self.storage, &path_to_prefix(path)?)
    }

    fn write(
        &self,
        root: &Root,
        path: &Path,
        options: &StoreWriteOptions,
    ) -> Result<(), CodecError> {
        write_root(&*self.storage, &path_to_prefix(path)?, root, options)
    }
}

fn path_to_prefix(path: &Path) -> Result<StorePrefix, CodecError> {
    let mut prefix = String::new();
    for component in path.components() {
        match component {
            Component::Normal(name) => {
                let name = name
                    .to_str()
                    .ok_or_else(|| CodecError::InvalidPath(path.to_path_buf()))?;
                prefix.push_str(name);
                prefix.push('/');
            }
            Component::RootDir | Component::CurDir => {}
            Component::Prefix(_) | Component::ParentDir => {
                return Err(CodecError::InvalidPath(path.to_path_buf()));
            }
        }
    }
    StorePrefix::new(prefix).map_err(|_| CodecError::InvalidPath(path.to_path_buf()))
}

fn node_key(prefix: &StorePrefix) -> Result<StoreKey, StorageError> {
    Ok(StoreKey::new(format!("{}{NODE_METADATA_KEY}", prefix.as_str()))?)
}

fn data_key(prefix: &StorePrefix) -> Result<StoreKey, StorageError> {
    Ok(StoreKey::new(format!("{}{FIELD_DATA_KEY}", prefix.as_str()))?)
}

fn child_prefix(prefix: &StorePrefix, name: &str) -> Result<StorePrefix, CodecError> {
    if name.is_empty() || name.contains('/') || name.starts_with("__") || name == "." || name == ".." {
        return Err(CodecError::InvalidNodeName(name.to_string()));
    }
    StorePrefix::new(format!("{}{name}/", prefix.as_str()))
        .map_err(|_| CodecError::InvalidNodeName(name.to_string()))
}

fn child_path(path: &str, name: &str) -> String {
    if path == "/" {
        format!("/{name}")
    } else {
        format!("{path}/{name}")
    }
}

fn read_metadata<TStorage: ?Sized + ReadableStorageTraits>(
    storage: &TStorage,
    prefix: &StorePrefix,
    path: &str,
) -> Result<NodeMetadata, CodecError> {
    let bytes = storage
        .get(&node_key(prefix)?)?
        .ok_or_else(|| CodecError::MissingNode(path.to_string()))?;
    NodeMetadata::from_slice(&bytes).map_err(|source| CodecError::InvalidMetadata {
        path: path.to_string(),
        source,
    })
}

/// Warn about child prefixes of `prefix` that the node does not list.
fn warn_unlisted<TStorage: ?Sized + ListableStorageTraits>(
    storage: &TStorage,
    prefix: &StorePrefix,
    path: &str,
    children: &[String],
) -> Result<(), StorageError> {
    for child in discover_children(storage, prefix)? {
        let name = child
            .as_str()
            .strip_prefix(prefix.as_str())
            .unwrap_or(child.as_str())
            .trim_end_matches('/');
        if !children.iter().any(|c| c == name) {
            log::warn!(
                "Object at {} is not recognized as a component of the container. Ignoring.",
                child_path(path, name)
            );
        }
    }
    Ok(())
}

/// Read the container at `prefix` of `storage`.
///
/// Links to fields of the same container are given the shape of their target.
///
/// # Errors
/// Returns a [`CodecError`] if the container is missing, a listed node is missing or invalid, or there is an underlying store error.
pub fn read_root<TStorage: ?Sized + ReadableStorageTraits + ListableStorageTraits>(
    storage: &TStorage,
    prefix: &StorePrefix,
) -> Result<Root, CodecError> {
    let metadata = match read_metadata(storage, prefix, "/")? {
        NodeMetadata::Root(metadata) => metadata,
        metadata => {
            return Err(CodecError::UnexpectedNodeType {
                path: "/".to_string(),
                expected: "root",
                found: metadata.node_type(),
            })
        }
    };
    warn_unlisted(storage, prefix, "/", &metadata.children)?;

    let reader = Reader { storage, base: prefix };
    let mut root = Root::new().with_attributes(metadata.attributes);
    for name in &metadata.children {
        root.add_entry(reader.read_entry(&child_prefix(prefix, name)?, name)?);
    }
    Ok(root)
}

struct Reader<'a, TStorage: ?Sized> {
    storage: &'a TStorage,
    base: &'a StorePrefix,
}

impl<TStorage: ?Sized + ReadableStorageTraits + ListableStorageTraits> Reader<'_, TStorage> {
    fn read_entry(&self, prefix: &StorePrefix, name: &str) -> Result<Entry, CodecError> {
        let path = child_path("/", name);
        let metadata = match read_metadata(self.storage, prefix, &path)? {
            NodeMetadata::Entry(metadata) => metadata,
            metadata => {
                return Err(CodecError::UnexpectedNodeType {
                    path,
                    expected: "entry",
                    found: metadata.node_type(),
                })
            }
        };
        warn_unlisted(self.storage, prefix, &path, &metadata.children)?;

        let mut entry = Entry::new(name).with_attributes(metadata.attributes);
        for child_name in &metadata.children {
            let child_prefix = child_prefix(prefix, child_name)?;
            let child_path = child_path(&path, child_name);
            let child_metadata = read_metadata(self.storage, &child_prefix, &child_path)?;
            let child: EntryChild = match child_metadata {
                NodeMetadata::Group(group) if group.nx_class.as_deref() == Some(NXDATA) => {
                    self.read_group(&child_prefix, &child_path, child_name, group)?
                        .into()
                }
                metadata => self
                    .read_opaque(&child_prefix, &child_path, child_name, metadata)?
                    .into(),
            };
            entry.add_child(child);
        }
        Ok(entry)
    }

    fn read_group(
        &self,
        prefix: &StorePrefix,
        path: &str,
        name: &str,
        metadata: GroupMetadata,
    ) -> Result<Group, CodecError> {
        warn_unlisted(self.storage, prefix, path, &metadata.children)?;
        let mut group = Group::new(name).with_attributes(metadata.attributes);
        for field_name in &metadata.children {
            let field_prefix = child_prefix(prefix, field_name)?;
            let field_path = child_path(path, field_name);
            match read_metadata(self.storage, &field_prefix, &field_path)? {
                NodeMetadata::Field(field) => {
                    let values = self.read_values(&field_prefix, &field_path, &field.shape)?;
                    group.add_field(Field::new(field_name, values).with_attributes(field.attributes));
                }
                NodeMetadata::Link(link) => {
                    let shape = self.link_shape(&link.target);
                    group.add_field(
                        Field::new(field_name, Link::new(link.target).with_shape(shape))
                            .with_attributes(link.attributes),
                    );
                }
                metadata => log::warn!(
                    "Object at {field_path} is a {} node, not a field of group {name}. Ignoring.",
                    metadata.node_type()
                ),
            }
        }
        Ok(group)
    }

    fn read_values(
        &self,
        prefix: &StorePrefix,
        path: &str,
        shape: &[u64],
    ) -> Result<ArrayD<f64>, CodecError> {
        let invalid = |reason: String| CodecError::InvalidFieldData {
            path: path.to_string(),
            reason,
        };
        let shape = shape
            .iter()
            .map(|&size| usize::try_from(size))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| invalid(err.to_string()))?;
        let num_elements = shape
            .iter()
            .try_fold(1usize, |acc, &size| acc.checked_mul(size))
            .ok_or_else(|| invalid("the number of elements overflows".to_string()))?;
        let bytes = self
            .storage
            .get(&data_key(prefix)?)?
            .unwrap_or_default();
        if Some(bytes.len()) != num_elements.checked_mul(std::mem::size_of::<f64>()) {
            return Err(invalid(format!(
                "{} bytes for {num_elements} elements",
                bytes.len()
            )));
        }
        let values = bytes
            .chunks_exact(std::mem::size_of::<f64>())
            .map(|chunk| {
                let mut le_bytes = [0u8; std::mem::size_of::<f64>()];
                le_bytes.copy_from_slice(chunk);
                f64::from_le_bytes(le_bytes)
            })
            .collect();
        ArrayD::from_shape_vec(IxDyn(&shape), values).map_err(|err| invalid(err.to_string()))
    }

    /// The shape of the field at the absolute container path `target`, if it exists.
    fn link_shape(&self, target: &str) -> Option<Vec<usize>> {
        let prefix = target
            .split('/')
            .filter(|name| !name.is_empty())
            .try_fold(self.base.clone(), |prefix, name| child_prefix(&prefix, name).ok())?;
        let metadata = read_metadata(self.storage, &prefix, target).ok();
        if let Some(NodeMetadata::Field(field)) = metadata {
            field
                .shape
                .iter()
                .map(|&size| usize::try_from(size).ok())
                .collect()
        } else {
            log::debug!("Link target {target} is not a field of the container.");
            None
        }
    }

    fn read_opaque(
        &self,
        prefix: &StorePrefix,
        path: &str,
        name: &str,
        metadata: NodeMetadata,
    ) -> Result<OpaqueObject, CodecError> {
        self.read_opaque_node(prefix, path, name, metadata)?
            .into_object()
    }

    fn read_opaque_node(
        &self,
        prefix: &StorePrefix,
        path: &str,
        name: &str,
        metadata: NodeMetadata,
    ) -> Result<OpaqueNode, CodecError> {
        let data = match &metadata {
            NodeMetadata::Field(_) => self.storage.get(&data_key(prefix)?)?,
            _ => None,
        };
        let children = metadata.children().to_vec();
        if !children.is_empty() {
            warn_unlisted(self.storage, prefix, path, &children)?;
        }
        let mut node = OpaqueNode::new(name, metadata, data.as_deref());
        for child_name in &children {
            let child_prefix = child_prefix(prefix, child_name)?;
            let child_path = child_path(path, child_name);
            let child_metadata = read_metadata(self.storage, &child_prefix, &child_path)?;
            node.children.push(self.read_opaque_node(
                &child_prefix,
                &child_path,
                child_name,
                child_metadata,
            )?);
        }
        Ok(node)
    }
}

/// Write `root` to the container at `prefix` of `storage`.
///
/// Groups are written with `nx_class` `NXdata`.
/// Opaque objects are written back from their serialized subtree.
///
/// # Errors
/// Returns a [`CodecError`] if a container exists and [`StoreWriteOptions::overwrite`] is false, a node name cannot be stored, an opaque object was not produced by this codec, or there is an underlying store error.
pub fn write_root<TStorage: ?Sized + ReadableStorageTraits + WritableStorageTraits>(
    storage: &TStorage,
    prefix: &StorePrefix,
    root: &Root,
    options: &StoreWriteOptions,
) -> Result<(), CodecError> {
    check_names(prefix, root)?;
    if storage.get(&node_key(prefix)?)?.is_some() {
        if options.overwrite {
            storage.erase_prefix(prefix)?;
        } else {
            return Err(CodecError::Exists(prefix.as_str().to_string()));
        }
    }

    let writer = Writer {
        storage,
        pretty: options.pretty,
    };
    let children = root
        .entries()
        .iter()
        .map(|entry| entry.name().to_string())
        .collect();
    writer.write_metadata(
        prefix,
        &RootMetadata::new(root.attributes().clone(), children).into(),
    )?;
    for entry in root.entries() {
        writer.write_entry(&child_prefix(prefix, entry.name())?, entry)?;
    }
    Ok(())
}

/// Check that every node of `root` can be stored, so a failed write leaves an existing container intact.
fn check_names(prefix: &StorePrefix, root: &Root) -> Result<(), CodecError> {
    fn check_opaque(prefix: &StorePrefix, node: &OpaqueNode) -> Result<(), CodecError> {
        node.data()?;
        for child in &node.children {
            check_opaque(&child_prefix(prefix, &child.name)?, child)?;
        }
        Ok(())
    }

    for entry in root.entries() {
        let entry_prefix = child_prefix(prefix, entry.name())?;
        for child in entry.children() {
            let node_prefix = child_prefix(&entry_prefix, child.name())?;
            match child {
                EntryChild::Group(group) => {
                    for field in group.fields() {
                        child_prefix(&node_prefix, field.name())?;
                    }
                }
                EntryChild::Opaque(object) => {
                    check_opaque(&node_prefix, &OpaqueNode::from_object(object)?)?;
                }
            }
        }
    }
    Ok(())
}

struct Writer<'a, TStorage: ?Sized> {
    storage: &'a TStorage,
    pretty: bool,
}

impl<TStorage: ?Sized + WritableStorageTraits> Writer<'_, TStorage> {
    fn write_metadata(
        &self,
        prefix: &StorePrefix,
        metadata: &NodeMetadata,
    ) -> Result<(), CodecError> {
        self.storage
            .set(&node_key(prefix)?, Bytes::from(metadata.to_vec(self.pretty)))?;
        Ok(())
    }

    fn write_entry(&self, prefix: &StorePrefix, entry: &Entry) -> Result<(), CodecError> {
        let children = entry
            .children()
            .iter()
            .map(|child| child.name().to_string())
            .collect();
        self.write_metadata(
            prefix,
            &EntryMetadata::new(entry.attributes().clone(), children).into(),
        )?;
        for child in entry.children() {
            let child_prefix = child_prefix(prefix, child.name())?;
            match child {
                EntryChild::Group(group) => self.write_group(&child_prefix, group)?,
                EntryChild::Opaque(object) => {
                    self.write_opaque_node(&child_prefix, &OpaqueNode::from_object(object)?)?;
                }
            }
        }
        Ok(())
    }

    fn write_group(&self, prefix: &StorePrefix, group: &Group) -> Result<(), CodecError> {
        let children = group
            .fields()
            .iter()
            .map(|field| field.name().to_string())
            .collect();
        self.write_metadata(
            prefix,
            &GroupMetadata::new(
                Some(NXDATA.to_string()),
                group.attributes().clone(),
                children,
            )
            .into(),
        )?;
        for field in group.fields() {
            let field_prefix = child_prefix(prefix, field.name())?;
            match field.value() {
                FieldValue::Array(values) => {
                    let shape = values.shape().iter().map(|&size| size as u64).collect();
                    self.write_metadata(
                        &field_prefix,
                        &FieldMetadata::new(shape, field.attributes().clone()).into(),
                    )?;
                    let bytes: Vec<u8> = values.iter().flat_map(|value| value.to_le_bytes()).collect();
                    self.storage.set(&data_key(&field_prefix)?, Bytes::from(bytes))?;
                }
                FieldValue::Link(link) => {
                    self.write_metadata(
                        &field_prefix,
                        &LinkMetadata::new(link.target().to_string(), field.attributes().clone())
                            .into(),
                    )?;
                }
            }
        }
        Ok(())
    }

    fn write_opaque_node(&self, prefix: &StorePrefix, node: &OpaqueNode) -> Result<(), CodecError> {
        self.write_metadata(prefix, &node.metadata)?;
        if let Some(data) = node.data()? {
            self.storage.set(&data_key(prefix)?, Bytes::from(data))?;
        }
        for child in &node.children {
            self.write_opaque_node(&child_prefix(prefix, &child.name)?, child)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;
    use nxarray_metadata::Attributes;
    use nxarray_storage::store::MemoryStore;
    use serde_json::json;

    use super::*;

    fn attributes(value: serde_json::Value) -> Attributes {
        value.as_object().cloned().unwrap()
    }

    fn set_metadata(store: &MemoryStore, key: &str, metadata: serde_json::Value) {
        store
            .set(&StoreKey::new(key).unwrap(), serde_json::to_vec(&metadata).unwrap().into())
            .unwrap();
    }

    fn root() -> Root {
        let group = Group::new("data")
            .with_attributes(attributes(json!({"signal": "counts", "axes": ["x"]})))
            .with_field(
                Field::new("counts", array![1.0, 2.0, 3.0].into_dyn())
                    .with_attributes(attributes(json!({"units": "counts"}))),
            )
            .with_field(Field::new("x", Link::new("/entry/instrument/x")));
        Root::new()
            .with_attributes(attributes(json!({"default": "entry"})))
            .with_entry(Entry::new("entry").with_child(group))
    }

    #[test]
    fn store_codec_round_trip() {
        let store = Arc::new(MemoryStore::new());
        let codec = StoreCodec::new(store.clone());
        let root = root();
        codec
            .write(&root, Path::new(""), &StoreWriteOptions::default())
            .unwrap();
        assert_eq!(codec.open(Path::new("")).unwrap(), root);
        assert_eq!(
            store.get(&"entry/data/counts/data".try_into().unwrap()).unwrap().map(|b| b.len()),
            Some(24)
        );
        assert!(store.get(&"entry/data/x/data".try_into().unwrap()).unwrap().is_none());
    }

    #[test]
    fn store_codec_prefix() {
        let store = Arc::new(MemoryStore::new());
        let codec = StoreCodec::new(store.clone());
        let root = root();
        codec
            .write(&root, Path::new("/runs/1"), &StoreWriteOptions::default())
            .unwrap();
        assert!(store.get(&"runs/1/nx.json".try_into().unwrap()).unwrap().is_some());
        assert_eq!(codec.open(Path::new("runs/1")).unwrap(), root);
        assert!(matches!(
            codec.open(Path::new("runs/2")),
            Err(CodecError::MissingNode(_))
        ));
        assert!(matches!(
            codec.open(Path::new("../runs")),
            Err(CodecError::InvalidPath(_))
        ));
    }

    #[test]
    fn store_codec_overwrite() {
        let store = Arc::new(MemoryStore::new());
        let codec = StoreCodec::new(store);
        let options = StoreWriteOptions {
            pretty: false,
            overwrite: false,
        };
        codec.write(&root(), Path::new(""), &options).unwrap();
        assert!(matches!(
            codec.write(&root(), Path::new(""), &options),
            Err(CodecError::Exists(_))
        ));
        let replacement = Root::new().with_entry(Entry::new("other"));
        codec
            .write(
                &replacement,
                Path::new(""),
                &StoreWriteOptions {
                    pretty: false,
                    overwrite: true,
                },
            )
            .unwrap();
        assert_eq!(codec.open(Path::new("")).unwrap(), replacement);
    }

    #[test]
    fn store_codec_failed_overwrite() {
        let codec = StoreCodec::new(Arc::new(MemoryStore::new()));
        let options = StoreWriteOptions::default();
        codec.write(&root(), Path::new(""), &options).unwrap();

        let invalid = [
            Root::new().with_entry(Entry::new("a/b")),
            Root::new().with_entry(
                Entry::new("entry").with_child(
                    Group::new("data").with_field(Field::new("__x", array![1.0].into_dyn())),
                ),
            ),
            Root::new().with_entry(
                Entry::new("entry").with_child(OpaqueObject::new("instrument", json!({"name": 1}))),
            ),
        ];
        for replacement in &invalid {
            assert!(codec.write(replacement, Path::new(""), &options).is_err());
            assert_eq!(codec.open(Path::new("")).unwrap(), root());
        }
    }

    #[test]
    fn store_codec_link_shape() {
        let store = MemoryStore::new();
        set_metadata(&store, "nx.json", json!({"node_type": "root", "nx_format": 1, "children": ["entry"]}));
        set_metadata(
            &store,
            "entry/nx.json",
            json!({"node_type": "entry", "nx_format": 1, "children": ["instrument", "data"]}),
        );
        set_metadata(
            &store,
            "entry/instrument/nx.json",
            json!({"node_type": "group", "nx_format": 1, "nx_class": "NXinstrument", "children": ["x"]}),
        );
        set_metadata(
            &store,
            "entry/instrument/x/nx.json",
            json!({"node_type": "field", "nx_format": 1, "shape": [2]}),
        );
        store
            .set(
                &"entry/instrument/x/data".try_into().unwrap(),
                [1.0f64, 2.0].iter().flat_map(|v| v.to_le_bytes()).collect::<Vec<u8>>().into(),
            )
            .unwrap();
        set_metadata(
            &store,
            "entry/data/nx.json",
            json!({"node_type": "group", "nx_format": 1, "nx_class": "NXdata", "children": ["x", "y"]}),
        );
        set_metadata(
            &store,
            "entry/data/x/nx.json",
            json!({"node_type": "link", "nx_format": 1, "target": "/entry/instrument/x"}),
        );
        set_metadata(
            &store,
            "entry/data/y/nx.json",
            json!({"node_type": "link", "nx_format": 1, "target": "/elsewhere/y"}),
        );

        let root = read_root(&store, &StorePrefix::root()).unwrap();
        let entry = root.entry("entry").unwrap();
        let EntryChild::Opaque(instrument) = &entry.children()[0] else {
            panic!("expected an opaque object");
        };
        assert_eq!(instrument.content()["metadata"]["nx_class"], json!("NXinstrument"));
        let group = entry.group("data").unwrap();
        assert_eq!(group.field("x").unwrap().shape(), Some(&[2][..]));
        assert_eq!(group.field("y").unwrap().shape(), None);

        // opaque objects are written back unchanged
        let copy = MemoryStore::new();
        write_root(&copy, &StorePrefix::root(), &root, &StoreWriteOptions::default()).unwrap();
        assert_eq!(
            copy.get(&"entry/instrument/x/data".try_into().unwrap()).unwrap(),
            store.get(&"entry/instrument/x/data".try_into().unwrap()).unwrap()
        );
        assert_eq!(read_root(&copy, &StorePrefix::root()).unwrap(), root);
    }

    #[test]
    fn store_codec_unlisted_child() {
        testing_logger::setup();
        let store = MemoryStore::new();
        write_root(&store, &StorePrefix::root(), &root(), &StoreWriteOptions::default()).unwrap();
        store
            .set(&"entry/fakenode/content/nx.json".try_into().unwrap(), vec![0].into())
            .unwrap();
        let root_read = read_root(&store, &StorePrefix::root()).unwrap();
        assert_eq!(root_read, root());
        testing_logger::validate(|captured_logs| {
            let warnings: Vec<_> = captured_logs
                .iter()
                .filter(|log| log.level == log::Level::Warn)
                .collect();
            assert_eq!(warnings.len(), 1);
            assert_eq!(
                warnings[0].body,
                "Object at /entry/fakenode is not recognized as a component of the container. Ignoring."
            );
        });
    }

    #[test]
    fn store_codec_invalid() {
        let store = MemoryStore::new();
        assert!(matches!(
            read_root(&store, &StorePrefix::root()),
            Err(CodecError::MissingNode(path)) if path == "/"
        ));
        set_metadata(&store, "nx.json", json!({"node_type": "entry", "nx_format": 1}));
        assert!(matches!(
            read_root(&store, &StorePrefix::root()),
            Err(CodecError::UnexpectedNodeType { expected: "root", found: "entry", .. })
        ));
        set_metadata(&store, "nx.json", json!({"node_type": "root", "nx_format": 1, "children": ["entry"]}));
        assert!(matches!(
            read_root(&store, &StorePrefix::root()),
            Err(CodecError::MissingNode(path)) if path == "/entry"
        ));
        set_metadata(&store, "entry/nx.json", json!({"node_type": "entry", "nx_format": 1, "children": ["data"]}));
        set_metadata(&store, "entry/data/nx.json", json!({"node_type": "group", "nx_format": 1, "nx_class": "NXdata", "children": ["x"]}));
        set_metadata(&store, "entry/data/x/nx.json", json!({"node_type": "field", "nx_format": 1, "shape": [3]}));
        store.set(&"entry/data/x/data".try_into().unwrap(), vec![0; 16].into()).unwrap();
        assert!(matches!(
            read_root(&store, &StorePrefix::root()),
            Err(CodecError::InvalidFieldData { .. })
        ));
        assert!(matches!(
            write_root(
                &store,
                &StorePrefix::root(),
                &Root::new().with_entry(Entry::new("a/b")),
                &StoreWriteOptions::default()
            ),
            Err(CodecError::InvalidNodeName(_))
        ));
    }
}
