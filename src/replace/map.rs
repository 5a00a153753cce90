/// Replacement payloads keyed by entry identifier, kept in insertion order.
///
/// Instructions are applied in this order, so it must not depend on hashing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementMap {
    entries: Vec<(String, String)>,
}

impl ReplacementMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a payload; an existing key keeps its position and gets the new payload
    pub fn insert(&mut self, key: impl Into<String>, payload: impl Into<String>) -> Option<String> {
        let key = key.into();
        let payload = payload.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, payload)),
            None => {
                self.entries.push((key, payload));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let position = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(position).1)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, payload)| payload.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, p)| (k.as_str(), p.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
