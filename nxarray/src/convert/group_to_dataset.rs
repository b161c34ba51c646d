use crate::{
    attributes::{copy_attributes, filter_attributes, split_attributes, ReservedKeys},
    axes::{infer_group, FieldRole},
    dataset::{ArrayValues, DataArray, DataArrayCreateError, Dataset, SiblingTree, TreeObject},
    link::to_array_values,
    node::{Entry, EntryChild, Field, Group},
};

/// Convert an entry to a dataset.
///
/// Fields of every group are classified by [axis inference](crate::axes).
/// Data variables take the group attributes overlaid by the field attributes, coordinates take the field attributes.
/// Structural attributes are never copied.
/// A name already present is replaced by a later group.
///
/// The returned dataset carries a [`SiblingTree`] recording the entry name, its structural attributes, the attributes of each group, and every opaque child.
#[must_use]
pub fn to_dataset(entry: &Entry) -> Dataset {
    let (attributes, entry_attributes) = split_attributes(entry.attributes());
    let mut dataset = Dataset::new().with_attributes(attributes);
    let mut tree = SiblingTree::new(entry.name()).with_entry_attributes(entry_attributes);

    for child in entry.children() {
        match child {
            EntryChild::Group(group) => {
                tree.push(TreeObject::Group {
                    name: group.name().to_string(),
                    attributes: group.attributes().clone(),
                });
                add_group(&mut dataset, group);
            }
            EntryChild::Opaque(object) => tree.push(TreeObject::Opaque(object.clone())),
        }
    }

    log::debug!(
        "Converted entry {} to a dataset with {} data variables and {} coordinates.",
        entry.name(),
        dataset.data_vars().len(),
        dataset.coords().len()
    );
    dataset.set_tree(Some(tree));
    dataset
}

fn add_group(dataset: &mut Dataset, group: &Group) {
    let group_attributes = filter_attributes(group.attributes());
    for binding in infer_group(group) {
        let field = binding.field();
        let role = binding.role();
        let attributes = match role {
            FieldRole::DataVariable => {
                let mut attributes = group_attributes.clone();
                copy_attributes(field.attributes(), &mut attributes, &ReservedKeys::STRUCTURAL);
                attributes
            }
            FieldRole::Coordinate => filter_attributes(field.attributes()),
        };
        let array = match new_array(field, binding.into_dims()) {
            Ok(array) => array.with_attributes(attributes).with_group(group.name()),
            Err(err) => {
                log::warn!(
                    "Field {} in group {} cannot be converted: {err}. Ignoring.",
                    field.name(),
                    group.name()
                );
                continue;
            }
        };
        match role {
            FieldRole::DataVariable => {
                if dataset.insert_data_var(field.name(), array).is_some() {
                    log::warn!(
                        "Data variable {} in group {} replaces a data variable of the same name.",
                        field.name(),
                        group.name()
                    );
                }
            }
            FieldRole::Coordinate => match dataset.insert_coordinate(field.name(), array) {
                Ok(Some(_)) => log::debug!(
                    "Coordinate {} in group {} replaces a coordinate of the same name.",
                    field.name(),
                    group.name()
                ),
                Ok(None) => {}
                Err(err) => log::warn!(
                    "Field {} in group {} cannot be converted: {err}. Ignoring.",
                    field.name(),
                    group.name()
                ),
            },
        }
    }
}

fn new_array(field: &Field, dims: Vec<String>) -> Result<DataArray, DataArrayCreateError> {
    match to_array_values(field.value()) {
        ArrayValues::Inline(values) => DataArray::new(values, dims),
        ArrayValues::Link(link) => DataArray::new_link(link, dims),
    }
}
