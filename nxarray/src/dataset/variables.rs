use super::DataArray;

/// An insertion-ordered collection of named [`DataArray`]s.
///
/// Inserting a name that is already present replaces the array and keeps its position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Variables(Vec<(String, DataArray)>);

impl Variables {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an array, returning the array it replaced.
    pub fn insert(&mut self, name: impl Into<String>, array: DataArray) -> Option<DataArray> {
        let name = name.into();
        if let Some((_, existing)) = self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(std::mem::replace(existing, array))
        } else {
            self.0.push((name, array));
            None
        }
    }

    /// Remove the array named `name`.
    pub fn remove(&mut self, name: &str) -> Option<DataArray> {
        let position = self.0.iter().position(|(n, _)| n == name)?;
        Some(self.0.remove(position).1)
    }

    /// Returns the array named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DataArray> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, array)| array)
    }

    /// Returns a mutable reference to the array named `name`.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut DataArray> {
        self.0
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, array)| array)
    }

    /// Returns true if an array named `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate over the names and arrays in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataArray)> {
        self.0.iter().map(|(name, array)| (name.as_str(), array))
    }

    /// Iterate over the names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    /// The number of arrays.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no arrays.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, DataArray)> for Variables {
    fn from_iter<T: IntoIterator<Item = (String, DataArray)>>(iter: T) -> Self {
        let mut variables = Self::new();
        for (name, array) in iter {
            variables.insert(name, array);
        }
        variables
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{ArrayD, IxDyn};

    use super::*;

    fn array(len: usize) -> DataArray {
        DataArray::new(ArrayD::zeros(IxDyn(&[len])), vec!["x".into()]).unwrap()
    }

    #[test]
    fn variables_insert_keeps_position() {
        let mut variables = Variables::new();
        assert!(variables.insert("a", array(1)).is_none());
        assert!(variables.insert("b", array(2)).is_none());
        assert_eq!(variables.insert("a", array(3)).and_then(|a| a.shape().map(<[usize]>::to_vec)), Some(vec![1]));
        assert_eq!(variables.names().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(variables.get("a").and_then(DataArray::shape), Some(&[3][..]));
        assert!(variables.remove("a").is_some());
        assert!(!variables.contains("a"));
        assert_eq!(variables.len(), 1);
    }
}
