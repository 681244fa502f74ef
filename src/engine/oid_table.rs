//! Sorted OID table for engine-side registration lookup.

use crate::oid::Oid;

/// OID-keyed table kept in lexicographic order.
///
/// Used as an engine's handler table: registrations are keyed by root OID
/// and an inbound OID is matched to the registration with the longest
/// root that prefixes it.
///
/// # Example
///
/// ```rust
/// use snmp_subagent::engine::OidTable;
/// use snmp_subagent::oid;
///
/// let mut table = OidTable::new();
/// assert!(table.insert(oid!(1, 3, 6, 1, 4, 1, 50000), "enterprise"));
/// assert!(table.insert(oid!(1, 3, 6, 1, 4, 1, 50000, 1), "temperature"));
///
/// let (root, name) = table.longest_prefix(&oid!(1, 3, 6, 1, 4, 1, 50000, 1, 0)).unwrap();
/// assert_eq!(root, &oid!(1, 3, 6, 1, 4, 1, 50000, 1));
/// assert_eq!(*name, "temperature");
/// ```
#[derive(Debug, Clone)]
pub struct OidTable<V> {
    /// Entries are kept sorted by OID for binary search
    entries: Vec<(Oid, V)>,
}

impl<V> OidTable<V> {
    /// Create a new empty OID table.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert an OID-value pair, maintaining sorted order.
    ///
    /// Returns `false`, leaving the table unchanged, if the OID is already
    /// present.
    pub fn insert(&mut self, oid: Oid, value: V) -> bool {
        match self.entries.binary_search_by(|(o, _)| o.cmp(&oid)) {
            Ok(_) => false,
            Err(idx) => {
                self.entries.insert(idx, (oid, value));
                true
            }
        }
    }

    /// Get the value for an exact OID match.
    pub fn get(&self, oid: &Oid) -> Option<&V> {
        match self.entries.binary_search_by(|(o, _)| o.cmp(oid)) {
            Ok(idx) => Some(&self.entries[idx].1),
            Err(_) => None,
        }
    }

    /// Whether an exact OID is present.
    pub fn contains(&self, oid: &Oid) -> bool {
        self.get(oid).is_some()
    }

    /// Find the entry whose OID is the longest prefix of `oid`.
    ///
    /// Every prefix of `oid` sorts at or before it, so only entries up to
    /// the insertion point need checking.
    pub fn longest_prefix(&self, oid: &Oid) -> Option<(&Oid, &V)> {
        let end = match self.entries.binary_search_by(|(o, _)| o.cmp(oid)) {
            Ok(idx) => idx + 1,
            Err(idx) => idx,
        };
        self.entries[..end]
            .iter()
            .rev()
            .find(|(root, _)| oid.starts_with(root))
            .map(|(o, v)| (o, v))
    }

    /// Get the number of entries in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all OID-value pairs in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = (&Oid, &V)> {
        self.entries.iter().map(|(o, v)| (o, v))
    }
}

impl<V> Default for OidTable<V> {
    fn default() -> Self {
        Self::new()
    }
}
