use indexmap::IndexMap;

/// An ordered `msgid` -> `msgstr` mapping.
///
/// Keys are unique. Inserting an existing key replaces its value but keeps the
/// key at its original position, so iteration order is stable and output is
/// deterministic. The empty key holds the catalog header and is treated as
/// metadata rather than a message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: IndexMap<String, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in insertion order, including the header entry.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries with a non-empty key, i.e. everything except the header.
    pub fn messages(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(key, _)| !key.is_empty())
    }

    /// Number of entries excluding the header.
    pub fn message_count(&self) -> usize {
        self.messages().count()
    }

    /// Build a placeholder catalog with the same keys where every value is
    /// the key itself.
    pub fn identity(&self) -> Catalog {
        self.keys().map(|key| (key, key)).collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        catalog.extend(iter);
        catalog
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Catalog {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_last_write_wins_keeps_position() {
        let catalog: Catalog = [("a", "1"), ("b", "2"), ("a", "3")].into_iter().collect();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("a"), Some("3"));
        assert_eq!(catalog.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_messages_skip_header() {
        let catalog: Catalog = [("", "Content-Type: text/plain\n"), ("hi", "Hi")]
            .into_iter()
            .collect();

        assert_eq!(catalog.messages().collect::<Vec<_>>(), vec![("hi", "Hi")]);
        assert_eq!(catalog.message_count(), 1);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_identity() {
        let catalog: Catalog = [("", "header"), ("你好", "Hello"), ("再见", "Bye")]
            .into_iter()
            .collect();

        let identity = catalog.identity();

        assert_eq!(identity.get(""), Some(""));
        assert_eq!(identity.get("你好"), Some("你好"));
        assert_eq!(identity.get("再见"), Some("再见"));
        assert_eq!(identity.keys().collect::<Vec<_>>(), vec!["", "你好", "再见"]);
    }
}
