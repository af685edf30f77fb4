use crate::catalog::Catalog;
use indexmap::IndexMap;

/// A single reference entry that is new or whose value changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Change {
    /// The snapshot value, or `None` if the key is new.
    pub previous: Option<String>,
    /// The current reference value.
    pub value: String,
}

/// Entries of the current reference catalog that differ from its snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeSet {
    changes: IndexMap<String, Change>,
}

impl ChangeSet {
    /// Compute the changes between a prior snapshot and the current catalog.
    ///
    /// A key is included when it is non-empty and either missing from the
    /// snapshot or mapped to a different value there. Comparison is exact;
    /// keys only present in the snapshot are not reported. Order follows
    /// `current`.
    pub fn between(snapshot: &Catalog, current: &Catalog) -> Self {
        let changes = current
            .messages()
            .filter_map(|(key, value)| {
                let previous = snapshot.get(key);
                (previous != Some(value)).then(|| {
                    (
                        key.to_string(),
                        Change {
                            previous: previous.map(str::to_string),
                            value: value.to_string(),
                        },
                    )
                })
            })
            .collect();

        Self { changes }
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.changes.get(key).map(|change| change.value.as_str())
    }

    /// `(key, new value)` pairs in reference order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.changes
            .iter()
            .map(|(key, change)| (key.as_str(), change.value.as_str()))
    }

    /// `(key, change)` pairs including the previous value.
    pub fn changes(&self) -> impl Iterator<Item = (&str, &Change)> {
        self.changes.iter().map(|(key, change)| (key.as_str(), change))
    }
}
