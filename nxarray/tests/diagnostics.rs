#![allow(missing_docs)]

use ndarray::{ArrayD, IxDyn};
use nxarray::{
    codec::{StoreCodec, StoreWriteOptions},
    metadata::Attributes,
    node::{Entry, Field, Group, Root},
    storage::store::MemoryStore,
};
use serde_json::json;
use std::{path::Path, sync::Arc};

fn junk_entry() -> Entry {
    let attributes: Attributes = json!({"signal": "signal_field", "axes": ["axis0", "axis1"]})
        .as_object()
        .cloned()
        .unwrap();
    Entry::new("entry").with_child(
        Group::new("data")
            .with_attributes(attributes)
            .with_field(Field::new("signal_field", ArrayD::<f64>::zeros(IxDyn(&[3, 4]))))
            .with_field(Field::new("axis0", ArrayD::<f64>::zeros(IxDyn(&[3]))))
            .with_field(Field::new("junk", ArrayD::<f64>::zeros(IxDyn(&[5])))),
    )
}

fn warnings(captured_logs: &[testing_logger::CapturedLog]) -> Vec<String> {
    captured_logs
        .iter()
        .filter(|log| log.level == log::Level::Warn)
        .map(|log| log.body.clone())
        .collect()
}

#[test]
fn diagnostic_non_fatality() {
    let codec = StoreCodec::new(Arc::new(MemoryStore::new()));
    let root = Root::new().with_entry(junk_entry());
    nxarray::save_with(&codec, &root, Path::new(""), &StoreWriteOptions::default()).unwrap();

    testing_logger::setup();
    let dataset = nxarray::load_with(&codec, Path::new(""), None)
        .unwrap()
        .into_dataset()
        .unwrap();
    assert_eq!(dataset.data_vars().names().collect::<Vec<_>>(), ["signal_field"]);
    assert_eq!(dataset.coords().names().collect::<Vec<_>>(), ["axis0"]);
    assert_eq!(
        dataset.data_vars().get("signal_field").unwrap().dims(),
        ["axis0", "axis1"]
    );
    testing_logger::validate(|captured_logs| {
        assert_eq!(
            warnings(captured_logs),
            vec!["Field junk in group data cannot be classified. Ignoring."]
        );
    });
}

#[test]
fn diagnostic_missing_declarations() {
    let entry = Entry::new("entry")
        .with_child(Group::new("undeclared").with_field(Field::new("a", ArrayD::<f64>::zeros(IxDyn(&[2])))))
        .with_child(junk_entry().group("data").cloned().unwrap());

    testing_logger::setup();
    let dataset = nxarray::convert::to_dataset(&entry);
    assert!(!dataset.data_vars().contains("a"));
    assert!(dataset.data_vars().contains("signal_field"));
    testing_logger::validate(|captured_logs| {
        assert_eq!(warnings(captured_logs).len(), 1);
        assert!(captured_logs
            .iter()
            .any(|log| log.level == log::Level::Debug
                && log.body == "Group undeclared does not declare a signal and axes. Ignoring."));
    });
}
