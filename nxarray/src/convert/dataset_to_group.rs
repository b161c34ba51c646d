use nxarray_metadata::Attributes;
use serde_json::Value;

use crate::{
    attributes::{
        copy_attributes, filter_attributes, indices_key, ReservedKeys, AXES, ENTRY_HINT,
        GROUP_HINT, SIGNAL,
    },
    axes::{parse_axes, parse_index_hint},
    config::global_config,
    dataset::{DataArray, Dataset, TreeObject},
    link::to_field_value,
    node::{Entry, EntryChild, Field, Group, OpaqueObject},
};

/// Returns the name of the entry a dataset is written to.
///
/// This is the entry the dataset was loaded from, else the `nxentry` attribute of the dataset, else the [default entry name](crate::config::Config#default-entry-name).
#[must_use]
pub fn entry_name(dataset: &Dataset) -> String {
    dataset
        .tree()
        .map(|tree| tree.entry_name().to_string())
        .or_else(|| {
            dataset
                .attributes()
                .get(ENTRY_HINT)
                .and_then(Value::as_str)
                .map(ToString::to_string)
        })
        .unwrap_or_else(|| global_config().default_entry_name().to_string())
}

/// Convert a dataset to an entry named by [`entry_name`].
#[must_use]
pub fn to_entry(dataset: &Dataset) -> Entry {
    to_entry_named(dataset, &entry_name(dataset))
}

/// Convert a dataset to an entry named `name`.
///
/// Arrays are partitioned into groups by their destination group.
/// A data variable without one goes to the [default group](crate::config::Config#default-group-name), or to a group of its own name if it does not span the dimensions of the default group's signal.
/// A coordinate without one goes to the group of the first data variable spanning its dimension, else the default group.
/// A coordinate with the name of a data variable of its group is not written.
///
/// Groups and opaque objects recorded in the sibling tree of the dataset are restored first, in their original order, followed by new groups in order of first use.
/// For each group:
///  - a missing or stale `signal` is set to the first data variable of the group with a `signal` attribute, else the first data variable of the group,
///  - `axes` is set to the dimensions of the signal unless it already equals them,
///  - `<coordinate>_indices` is set for each coordinate not named in `axes`, unless it already binds the dimension of the coordinate.
#[must_use]
pub fn to_entry_named(dataset: &Dataset, name: &str) -> Entry {
    let default_group = global_config().default_group_name().to_string();

    let mut attributes = filter_attributes(dataset.attributes());
    let mut layout = Layout::default();
    if let Some(tree) = dataset.tree() {
        copy_attributes(tree.entry_attributes(), &mut attributes, &ReservedKeys::NONE);
        for object in tree.objects() {
            match object {
                TreeObject::Group {
                    name: group_name,
                    attributes: group_attributes,
                } => {
                    layout.push_group(GroupPlan::new(group_name, group_attributes.clone(), true));
                }
                TreeObject::Opaque(object) => layout.order.push(Slot::Opaque(object)),
            }
        }
    }

    let targets = data_var_groups(dataset, &layout, &default_group);
    for ((name, array), group) in dataset.data_vars().iter().zip(&targets) {
        layout.group(group).data_vars.push((name, array));
    }
    for (name, array) in dataset.coords().iter() {
        let group = destination(array)
            .or_else(|| {
                dataset
                    .data_vars()
                    .iter()
                    .position(|(_, data_var)| {
                        array
                            .dims()
                            .first()
                            .is_some_and(|dim| data_var.dims().contains(dim))
                    })
                    .map(|index| targets[index].as_str())
            })
            .unwrap_or(default_group.as_str());
        layout.group(group).coords.push((name, array));
    }

    let mut entry = Entry::new(name).with_attributes(attributes);
    let Layout { order, groups } = layout;
    let mut groups: Vec<Option<GroupPlan<'_>>> = groups.into_iter().map(Some).collect();
    for slot in order {
        let child: EntryChild = match slot {
            Slot::Group(index) => match groups[index].take().and_then(GroupPlan::build) {
                Some(group) => group.into(),
                None => continue,
            },
            Slot::Opaque(object) => object.clone().into(),
        };
        if entry.children().iter().any(|c| c.name() == child.name()) {
            log::warn!(
                "Child {} of entry {name} is written more than once. Keeping the last.",
                child.name()
            );
        }
        entry.add_child(child);
    }
    entry
}

/// The group each data variable is written to, in data variable order.
///
/// A data variable without a destination goes to the default group if it spans the dimensions of that group's signal.
/// Otherwise it gets a group of its own name, unless a child of that name is already in use.
fn data_var_groups(dataset: &Dataset, layout: &Layout<'_>, default_group: &str) -> Vec<String> {
    let mut targets: Vec<String> = dataset
        .data_vars()
        .iter()
        .map(|(_, array)| destination(array).unwrap_or(default_group).to_string())
        .collect();

    let members: Vec<(&str, &DataArray)> = dataset
        .data_vars()
        .iter()
        .zip(&targets)
        .filter(|(_, group)| *group == default_group)
        .map(|(member, _)| member)
        .collect();
    let declared = layout
        .groups
        .iter()
        .find(|plan| plan.name == default_group)
        .and_then(|plan| plan.attributes.get(SIGNAL))
        .and_then(Value::as_str);
    let Some((_, signal)) = preferred_signal(declared, &members) else {
        return targets;
    };

    let mut taken: Vec<String> = layout
        .groups
        .iter()
        .map(|plan| plan.name.clone())
        .chain(layout.order.iter().filter_map(|slot| match slot {
            Slot::Opaque(object) => Some(object.name().to_string()),
            Slot::Group(_) => None,
        }))
        .chain(targets.iter().cloned())
        .collect();
    for ((name, array), group) in dataset.data_vars().iter().zip(targets.iter_mut()) {
        if destination(array).is_none()
            && array.dims() != signal.dims()
            && !taken.iter().any(|used| used == name)
        {
            log::debug!(
                "Data variable {name} does not span the axes of group {default_group}. Writing it to group {name}."
            );
            *group = name.to_string();
            taken.push(name.to_string());
        }
    }
    targets
}

/// The declared signal if it names one of `data_vars`, else the first with a `signal` attribute, else the first.
fn preferred_signal<'a>(
    declared: Option<&str>,
    data_vars: &[(&'a str, &'a DataArray)],
) -> Option<(&'a str, &'a DataArray)> {
    data_vars
        .iter()
        .find(|(name, _)| Some(*name) == declared)
        .or_else(|| {
            data_vars
                .iter()
                .find(|(_, array)| array.attributes().contains_key(SIGNAL))
        })
        .or_else(|| data_vars.first())
        .copied()
}

/// The destination group of an array: its group, else its `nxgroup` attribute.
fn destination(array: &DataArray) -> Option<&str> {
    array
        .group()
        .or_else(|| array.attributes().get(GROUP_HINT).and_then(Value::as_str))
}

/// The children of the entry being written, in order.
#[derive(Default)]
struct Layout<'a> {
    order: Vec<Slot<'a>>,
    groups: Vec<GroupPlan<'a>>,
}

enum Slot<'a> {
    Group(usize),
    Opaque(&'a OpaqueObject),
}

impl<'a> Layout<'a> {
    fn push_group(&mut self, plan: GroupPlan<'a>) -> usize {
        self.groups.push(plan);
        let index = self.groups.len() - 1;
        self.order.push(Slot::Group(index));
        index
    }

    /// The plan of the group `name`, appended if it is new.
    fn group(&mut self, name: &str) -> &mut GroupPlan<'a> {
        let index = match self.groups.iter().position(|plan| plan.name == name) {
            Some(index) => index,
            None => self.push_group(GroupPlan::new(name, Attributes::new(), false)),
        };
        &mut self.groups[index]
    }
}

struct GroupPlan<'a> {
    name: String,
    attributes: Attributes,
    restored: bool,
    data_vars: Vec<(&'a str, &'a DataArray)>,
    coords: Vec<(&'a str, &'a DataArray)>,
}

impl<'a> GroupPlan<'a> {
    fn new(name: &str, attributes: Attributes, restored: bool) -> Self {
        Self {
            name: name.to_string(),
            attributes,
            restored,
            data_vars: Vec::new(),
            coords: Vec::new(),
        }
    }

    fn build(mut self) -> Option<Group> {
        if self.data_vars.is_empty() && self.coords.is_empty() {
            if self.restored {
                log::debug!("Group {} has no arrays. Skipping.", self.name);
            }
            return None;
        }

        let data_vars = &self.data_vars;
        let group_name = &self.name;
        self.coords.retain(|(name, _)| {
            let clash = data_vars.iter().any(|(data_var, _)| data_var == name);
            if clash {
                log::warn!(
                    "Coordinate {name} in group {group_name} has the name of a data variable. Ignoring."
                );
            }
            !clash
        });

        let mut group =
            Group::new(&self.name).with_attributes(std::mem::take(&mut self.attributes));
        for (name, array) in self.data_vars.iter().chain(self.coords.iter()) {
            group.add_field(
                Field::new(*name, to_field_value(array))
                    .with_attributes(filter_attributes(array.attributes())),
            );
        }

        let Some((signal, signal_array)) = self.signal(&group) else {
            log::warn!(
                "Group {} has no data variable to declare as its signal.",
                self.name
            );
            return Some(group);
        };
        let signal = signal.to_string();
        if group.signal().and_then(Value::as_str) != Some(signal.as_str()) {
            group
                .attributes_mut()
                .insert(SIGNAL.to_string(), Value::String(signal));
        }

        let axes = signal_array.dims().to_vec();
        if group.axes().and_then(parse_axes).as_ref() != Some(&axes) {
            group.attributes_mut().insert(
                AXES.to_string(),
                Value::Array(axes.iter().cloned().map(Value::String).collect()),
            );
        }

        for (name, array) in &self.data_vars {
            if array.dims() != axes {
                log::warn!(
                    "Data variable {name} in group {} spans {:?}, not the axes {axes:?} of the group.",
                    self.name,
                    array.dims()
                );
            }
        }
        for (name, array) in &self.coords {
            self.bind_coordinate(&mut group, name, array, &axes);
        }
        Some(group)
    }

    fn signal(&self, group: &Group) -> Option<(&'a str, &'a DataArray)> {
        preferred_signal(group.signal().and_then(Value::as_str), &self.data_vars)
    }

    fn bind_coordinate(&self, group: &mut Group, name: &str, array: &DataArray, axes: &[String]) {
        let Some(dim) = array.dims().first() else {
            return;
        };
        if axes.iter().any(|axis| axis == name) {
            if dim != name {
                log::warn!(
                    "Coordinate {name} in group {} is named as an axis but spans dimension {dim}.",
                    self.name
                );
            }
            return;
        }
        let Some(index) = axes.iter().position(|axis| axis == dim) else {
            log::warn!(
                "Coordinate {name} in group {} spans dimension {dim}, which is not an axis of the group.",
                self.name
            );
            return;
        };
        if group.index_hint(name).and_then(parse_index_hint) != Some(index) {
            group
                .attributes_mut()
                .insert(indices_key(name), Value::from(index));
        }
    }
}
