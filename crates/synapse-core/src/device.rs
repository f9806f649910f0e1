//! Device map: stable device ids mapped to transport addresses

use std::collections::HashMap;

/// Mapping from device id to transport address
///
/// Populated wholesale from each device-list event; the previous contents
/// are discarded, never merged. Iteration order follows the received map's
/// order and is unstable.
#[derive(Debug, Clone, Default)]
pub struct DeviceMap {
    entries: HashMap<String, String>,
}

impl DeviceMap {
    pub fn new() -> Self {
        DeviceMap { entries: HashMap::new() }
    }

    /// Replace the entire map with the most recently received mapping
    pub fn replace_all(&mut self, entries: HashMap<String, String>) {
        self.entries = entries;
    }

    /// Transport address for a device id, if the id is known
    pub fn address_for(&self, device_id: &str) -> Option<&str> {
        self.entries.get(device_id).map(String::as_str)
    }

    pub fn contains(&self, device_id: &str) -> bool {
        self.entries.contains_key(device_id)
    }

    /// Device ids in the received map's iteration order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(id, addr)| (id.to_string(), addr.to_string()))
            .collect()
    }

    #[test]
    fn test_replace_discards_previous_entries() {
        let mut devices = DeviceMap::new();
        devices.replace_all(map(&[("dev-1", "AA:BB"), ("dev-2", "CC:DD")]));
        assert_eq!(devices.len(), 2);

        devices.replace_all(map(&[("dev-3", "EE:FF")]));
        assert_eq!(devices.len(), 1);
        assert!(!devices.contains("dev-1"));
        assert!(!devices.contains("dev-2"));
        assert_eq!(devices.address_for("dev-3"), Some("EE:FF"));
    }

    #[test]
    fn test_replace_with_empty_clears() {
        let mut devices = DeviceMap::new();
        devices.replace_all(map(&[("dev-1", "AA:BB")]));
        devices.replace_all(HashMap::new());
        assert!(devices.is_empty());
        assert_eq!(devices.address_for("dev-1"), None);
    }

    #[test]
    fn test_unknown_id_is_absent() {
        let devices = DeviceMap::new();
        assert_eq!(devices.address_for("nope"), None);
        assert!(!devices.contains("nope"));
    }
}
