//! Hash collection aliases used across Trellis.
//!
//! Lookups in Trellis are keyed by short strings and small integer handles,
//! so the faster AHash hasher is used instead of SipHash.

pub use ahash::AHashMap as HashMap;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashmap_ahash() {
        let mut map = HashMap::new();
        map.insert("entry_nombre", 3usize);
        assert_eq!(map.get("entry_nombre"), Some(&3));
    }
}
