#![allow(missing_docs)]
#![cfg(feature = "filesystem")]

use std::error::Error;

use ndarray::array;
use nxarray::{
    codec::{CodecError, FilesystemCodec, StoreWriteOptions, TreeCodec},
    container::{DatasetTree, LoadError},
    dataset::{DataArray, Dataset, TreeObject},
    metadata::Attributes,
    node::{Entry, Field, Group, Link, OpaqueObject, Root},
    Loaded,
};
use serde_json::json;

fn attributes(value: serde_json::Value) -> Attributes {
    value.as_object().cloned().unwrap()
}

fn dataset(title: &str) -> Dataset {
    Dataset::new()
        .with_attributes(attributes(json!({"title": title})))
        .with_data_var(
            "counts",
            DataArray::new(array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]].into_dyn(), vec!["x".into(), "y".into()])
                .unwrap(),
        )
        .with_coordinate(
            "x",
            DataArray::new(array![0.1, 0.2, 0.3].into_dyn(), vec!["x".into()]).unwrap(),
        )
        .unwrap()
}

#[test]
fn filesystem_lookup_failure() -> Result<(), Box<dyn Error>> {
    let path = tempfile::TempDir::new()?;
    nxarray::save(&DatasetTree::new().with_dataset("entry1", dataset("a")), path.path(), None)?;
    let result = nxarray::load(path.path(), Some("missing"));
    assert!(matches!(result, Err(LoadError::EntryNotFound(name)) if name == "missing"));
    Ok(())
}

#[test]
fn filesystem_single_and_multiple_entries() -> Result<(), Box<dyn Error>> {
    let single = tempfile::TempDir::new()?;
    nxarray::save(&dataset("a"), single.path(), None)?;
    let Loaded::Dataset(loaded) = nxarray::load(single.path(), None)? else {
        panic!("expected a single dataset");
    };
    assert_eq!(loaded.attributes(), dataset("a").attributes());
    assert_eq!(
        loaded.data_vars().get("counts").and_then(DataArray::inline),
        dataset("a").data_vars().get("counts").and_then(DataArray::inline)
    );

    let multiple = tempfile::TempDir::new()?;
    let mut tree = DatasetTree::new()
        .with_dataset("entry1", dataset("a"))
        .with_dataset("entry2", dataset("b"));
    tree.set_default_entry(Some("entry2".to_string()));
    nxarray::save(&tree, multiple.path(), None)?;

    let Loaded::Tree(loaded) = nxarray::load(multiple.path(), None)? else {
        panic!("expected named datasets");
    };
    assert_eq!(loaded.names().collect::<Vec<_>>(), ["entry1", "entry2"]);
    assert_eq!(loaded.default_entry(), Some("entry2"));
    assert_eq!(
        nxarray::load_default(multiple.path())?.attributes(),
        dataset("b").attributes()
    );
    assert_eq!(nxarray::load_tree(multiple.path())?, loaded);

    // saving the loaded tree reproduces the container
    let copy = tempfile::TempDir::new()?;
    nxarray::save(&Loaded::Tree(loaded.clone()), copy.path(), None)?;
    assert_eq!(
        FilesystemCodec.open(copy.path())?,
        FilesystemCodec.open(multiple.path())?
    );
    Ok(())
}

#[test]
fn filesystem_opaque_siblings() -> Result<(), Box<dyn Error>> {
    let instrument = tempfile::TempDir::new()?;
    let group = Group::new("data")
        .with_attributes(attributes(json!({"signal": "counts", "axes": ["x"]})))
        .with_field(Field::new("counts", array![1.0, 2.0].into_dyn()))
        .with_field(Field::new("monitor", Link::new("/entry/data/counts")))
        .with_field(Field::new("x", array![5.0, 6.0].into_dyn()));
    let root = Root::new().with_entry(Entry::new("entry").with_child(group));
    FilesystemCodec.write(&root, instrument.path(), &StoreWriteOptions::default())?;

    // non-data groups are opaque, and carried through a load and save unmodified
    let mut opened = FilesystemCodec.open(instrument.path())?;
    let entry = opened.entries()[0].clone();
    let sibling = OpaqueObject::new(
        "sample",
        json!({
            "name": "sample",
            "metadata": {"node_type": "group", "nx_format": 1, "nx_class": "NXsample", "children": ["mass"]},
            "children": [{
                "name": "mass",
                "metadata": {"node_type": "field", "nx_format": 1, "shape": [1], "attributes": {"units": "g"}},
                "data": "AAAAAAAA+D8="
            }]
        }),
    );
    opened.add_entry(entry.with_child(sibling.clone()));
    FilesystemCodec.write(&opened, instrument.path(), &StoreWriteOptions::default())?;

    let dataset = nxarray::load_default(instrument.path())?;
    let tree = dataset.tree().unwrap();
    assert_eq!(
        tree.objects().iter().map(TreeObject::name).collect::<Vec<_>>(),
        ["data", "sample"]
    );
    assert_eq!(tree.opaque_objects().next(), Some(&sibling));
    // the link resolves to the shape of its target, so it is a data variable
    assert_eq!(
        dataset.data_vars().get("monitor").and_then(DataArray::shape),
        Some(&[2][..])
    );

    let copy = tempfile::TempDir::new()?;
    nxarray::save(&dataset, copy.path(), None)?;
    assert_eq!(FilesystemCodec.open(copy.path())?, FilesystemCodec.open(instrument.path())?);
    Ok(())
}

#[test]
fn filesystem_codec_errors() -> Result<(), Box<dyn Error>> {
    let path = tempfile::TempDir::new()?;
    let missing = path.path().join("missing");
    assert!(matches!(
        nxarray::load(&missing, None),
        Err(LoadError::Codec(CodecError::NotFound(_)))
    ));

    nxarray::save(&dataset("a"), path.path(), None)?;
    let options = StoreWriteOptions {
        pretty: false,
        overwrite: false,
    };
    assert!(matches!(
        nxarray::save(&dataset("a"), path.path(), Some(options)),
        Err(CodecError::Exists(_))
    ));
    Ok(())
}
