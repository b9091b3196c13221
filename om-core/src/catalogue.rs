//! Catalogue types: map-by-name containers for cores, materials, wires,
//! bobbins and insulation materials, loaded elsewhere and immutable once
//! built.

use arcstr::ArcStr;
use indexmap::IndexMap;

/// A read-only, name-keyed collection of catalogue entries.
///
/// Loading (newline-delimited JSON, or any other format) is explicitly out
/// of scope: callers build a [`Catalogue`] however they like and pass it to
/// the advisors, which only ever look entries up by name.
pub trait Catalogue<T> {
    /// Looks up the entry named `name`.
    fn get(&self, name: &str) -> Option<&T>;

    /// Iterates over every entry in the catalogue, in load order.
    fn iter(&self) -> Box<dyn Iterator<Item = (&ArcStr, &T)> + '_>;

    /// The number of entries in the catalogue.
    fn len(&self) -> usize;

    /// Whether the catalogue holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An in-memory [`Catalogue`] backed by an [`IndexMap`], preserving
/// insertion order for its name-keyed entries.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogue<T> {
    entries: IndexMap<ArcStr, T>,
}

impl<T> InMemoryCatalogue<T> {
    /// Creates an empty catalogue.
    pub fn new() -> Self {
        Self { entries: IndexMap::new() }
    }

    /// Builds a catalogue from an iterator of `(name, entry)` pairs.
    pub fn from_entries(entries: impl IntoIterator<Item = (ArcStr, T)>) -> Self {
        Self { entries: entries.into_iter().collect() }
    }

    /// Inserts or replaces the entry named `name`.
    pub fn insert(&mut self, name: impl Into<ArcStr>, entry: T) {
        self.entries.insert(name.into(), entry);
    }
}

impl<T> Catalogue<T> for InMemoryCatalogue<T> {
    fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(name)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (&ArcStr, &T)> + '_> {
        Box::new(self.entries.iter())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name_finds_inserted_entry() {
        let mut catalogue: InMemoryCatalogue<u32> = InMemoryCatalogue::new();
        catalogue.insert("ETD 34", 34);
        assert_eq!(catalogue.get("ETD 34"), Some(&34));
        assert_eq!(catalogue.get("missing"), None);
        assert_eq!(catalogue.len(), 1);
    }

    #[test]
    fn from_entries_preserves_order() {
        let catalogue = InMemoryCatalogue::from_entries(vec![
            (ArcStr::from("a"), 1),
            (ArcStr::from("b"), 2),
        ]);
        let names: Vec<&str> = catalogue.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
