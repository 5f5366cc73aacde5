//! Deserialization helpers for the environment file

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{Deserialize, MapAccess, Visitor};
use serde::Deserializer;

/// Deserialize `vars` into a flat string map
///
/// Every scalar keeps its source text, so `tag: 1.10` stays `1.10` and
/// `mode: 0o17` stays `0o17`. Nested mappings and sequences are rejected
/// because templates only ever see flat keys. An empty value becomes "".
pub fn deserialize_vars<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct VarsVisitor;

    impl<'de> Visitor<'de> for VarsVisitor {
        type Value = BTreeMap<String, String>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a mapping of variable names to scalar values")
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(BTreeMap::new())
        }

        fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            let mut vars = BTreeMap::new();
            while let Some((key, ScalarText(value))) = map.next_entry::<String, ScalarText>()? {
                vars.insert(key, value);
            }
            Ok(vars)
        }
    }

    deserializer.deserialize_any(VarsVisitor)
}

/// A YAML scalar read back as the text it was written with
struct ScalarText(String);

impl<'de> Deserialize<'de> for ScalarText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ScalarVisitor;

        impl Visitor<'_> for ScalarVisitor {
            type Value = ScalarText;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a scalar value")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(ScalarText(v.to_string()))
            }
        }

        // serde_yaml hands plain scalars to `deserialize_str` untouched
        deserializer.deserialize_str(ScalarVisitor)
    }
}
