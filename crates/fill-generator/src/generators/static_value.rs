//! Static values, value pools and YAML to FieldValue conversion.

use fill_core::FieldValue;
use rand::Rng;
use serde_yaml::Value as YamlValue;
use std::collections::HashMap;

/// Convert a YAML value from a fill plan to a FieldValue.
pub fn yaml_to_field_value(yaml: &YamlValue) -> FieldValue {
    match yaml {
        YamlValue::Null => FieldValue::Null,
        YamlValue::Bool(b) => FieldValue::Bool(*b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                FieldValue::Int64(i)
            } else if let Some(f) = n.as_f64() {
                FieldValue::Float64(f)
            } else {
                FieldValue::String(n.to_string())
            }
        }
        YamlValue::String(s) => FieldValue::String(s.clone()),
        YamlValue::Sequence(arr) => FieldValue::Array(arr.iter().map(yaml_to_field_value).collect()),
        YamlValue::Mapping(map) => {
            let values: HashMap<String, FieldValue> = map
                .iter()
                .filter_map(|(k, v)| Some((k.as_str()?.to_string(), yaml_to_field_value(v))))
                .collect();
            FieldValue::Object(values)
        }
        YamlValue::Tagged(tagged) => yaml_to_field_value(&tagged.value),
    }
}

/// Pick one value of the pool uniformly; an empty pool yields null.
pub fn generate_one_of<R: Rng>(rng: &mut R, pool: &[FieldValue]) -> FieldValue {
    if pool.is_empty() {
        return FieldValue::Null;
    }
    pool[rng.gen_range(0..pool.len())].clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_yaml_scalars() {
        assert_eq!(yaml_to_field_value(&YamlValue::Null), FieldValue::Null);
        assert_eq!(
            yaml_to_field_value(&YamlValue::Bool(true)),
            FieldValue::Bool(true)
        );

        let yaml: YamlValue = serde_yaml::from_str("42").unwrap();
        assert_eq!(yaml_to_field_value(&yaml), FieldValue::Int64(42));

        let yaml: YamlValue = serde_yaml::from_str("1.25").unwrap();
        assert_eq!(yaml_to_field_value(&yaml), FieldValue::Float64(1.25));

        let yaml: YamlValue = serde_yaml::from_str("hello").unwrap();
        assert_eq!(yaml_to_field_value(&yaml), FieldValue::from("hello"));
    }

    #[test]
    fn test_yaml_collections() {
        let yaml: YamlValue = serde_yaml::from_str("[1, 2, 3]").unwrap();
        match yaml_to_field_value(&yaml) {
            FieldValue::Array(arr) => {
                assert_eq!(arr.len(), 3);
                assert_eq!(arr[0], FieldValue::Int64(1));
            }
            other => panic!("Expected Array, got {other:?}"),
        }

        let yaml: YamlValue = serde_yaml::from_str("{ version: 1, name: test }").unwrap();
        match yaml_to_field_value(&yaml) {
            FieldValue::Object(obj) => {
                assert_eq!(obj.get("version"), Some(&FieldValue::Int64(1)));
                assert_eq!(obj.get("name"), Some(&FieldValue::from("test")));
            }
            other => panic!("Expected Object, got {other:?}"),
        }
    }

    #[test]
    fn test_generate_one_of() {
        let mut rng = StdRng::seed_from_u64(3);
        let pool = vec![FieldValue::from("red"), FieldValue::from("blue")];

        for _ in 0..20 {
            assert!(pool.contains(&generate_one_of(&mut rng, &pool)));
        }
        assert_eq!(generate_one_of(&mut rng, &[]), FieldValue::Null);
    }
}
