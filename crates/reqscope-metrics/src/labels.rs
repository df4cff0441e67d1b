// Copyright (C) 2026  winnyboy5
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//! Canonical label sets
//!
//! A [`LabelSet`] identifies one series of a metric. Pairs are kept sorted by
//! label name so that two sets built in a different order compare, hash and
//! order identically.

/// Ordered, content-compared mapping from label name to label value
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelSet {
    pairs: Vec<(String, String)>,
}

impl LabelSet {
    /// Create an empty label set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a pair, returning the previous value for that name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self.pairs.binary_search_by(|(n, _)| n.as_str().cmp(&name)) {
            Ok(idx) => Some(std::mem::replace(&mut self.pairs[idx].1, value)),
            Err(idx) => {
                self.pairs.insert(idx, (name, value));
                None
            }
        }
    }

    /// Value for `name`, if present
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .binary_search_by(|(n, _)| n.as_str().cmp(name))
            .ok()
            .map(|idx| self.pairs[idx].1.as_str())
    }

    /// Number of pairs
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True when no labels are set
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Label names in name order
    pub fn names(&self) -> Vec<String> {
        self.pairs.iter().map(|(n, _)| n.clone()).collect()
    }
}

impl<K, V> FromIterator<(K, V)> for LabelSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = LabelSet::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}

/// Build a [`LabelSet`] from `name => value` pairs
///
/// ```ignore
/// let labels = labels! { "method" => "GET", "route" => "/" };
/// ```
#[macro_export]
macro_rules! labels {
    () => {
        $crate::LabelSet::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {
        $crate::LabelSet::new()$(.with($name, $value))+
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_insertion_order_is_irrelevant() {
        let a = LabelSet::new().with("method", "GET").with("route", "/");
        let b = LabelSet::new().with("route", "/").with("method", "GET");
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_insert_replaces_value() {
        let mut set = LabelSet::new();
        assert_eq!(set.insert("status_code", "200"), None);
        assert_eq!(set.insert("status_code", "500"), Some("200".to_string()));
        assert_eq!(set.get("status_code"), Some("500"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_iter_is_sorted_by_name() {
        let set: LabelSet = [("b", "2"), ("c", "3"), ("a", "1")].into_iter().collect();
        let names: Vec<&str> = set.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(set.names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_labels_macro() {
        let empty = labels! {};
        assert!(empty.is_empty());

        let set = labels! { "method" => "GET", "route" => "/slow" };
        assert_eq!(set.get("method"), Some("GET"));
        assert_eq!(set.get("route"), Some("/slow"));
        assert_eq!(set.get("missing"), None);
    }
}
