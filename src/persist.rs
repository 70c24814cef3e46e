//! Serialized form: the comparator, the entry count, then every entry in ascending
//! key order. Deserialization rebuilds the tree in linear time and rejects input that
//! is out of order or whose count does not match.

use alloc::vec::Vec;

use crate::{Comparator, RosewoodMap};

struct Entries<'a, K, V, C>(&'a RosewoodMap<K, V, C>);

impl<K, V, C> serde::Serialize for Entries<'_, K, V, C>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.0.iter())
    }
}

#[derive(serde::Serialize)]
struct Persisted<'a, C, E> {
    comparator: &'a C,
    len: usize,
    entries: E,
}

#[derive(serde::Deserialize)]
struct Restored<C, K, V> {
    comparator: C,
    len: usize,
    entries: Vec<(K, V)>,
}

impl<K, V, C> serde::Serialize for RosewoodMap<K, V, C>
where
    K: serde::Serialize,
    V: serde::Serialize,
    C: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let persisted = Persisted {
            comparator: &self.comparator,
            len: self.len(),
            entries: Entries(self),
        };

        serde::Serialize::serialize(&persisted, serializer)
    }
}

impl<'de, K, V, C> serde::Deserialize<'de> for RosewoodMap<K, V, C>
where
    K: serde::Deserialize<'de>,
    V: serde::Deserialize<'de>,
    C: serde::Deserialize<'de> + Comparator<K>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let restored = <Restored<C, K, V> as serde::Deserialize<'de>>::deserialize(deserializer)?;

        if restored.entries.len() != restored.len {
            return Err(D::Error::invalid_length(
                restored.entries.len(),
                &"as many entries as the recorded length",
            ));
        }

        RosewoodMap::build_from_sorted(restored.len, restored.entries, restored.comparator)
            .map_err(D::Error::custom)
    }
}
