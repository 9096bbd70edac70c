//! Value specifications built from fill-plan generator configs.

use crate::generators::{check_range, pattern, static_value, timestamp};
use crate::provider;
use fill_core::{FakerKind, GeneratorConfig, Locale, PlanModel, ValueError, ValueSpec};

/// Error type for generator configuration.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// A generator config carries arguments it can never resolve with
    #[error("Invalid '{generator}' generator for field '{field}': {source}")]
    InvalidConfig {
        generator: &'static str,
        field: String,
        #[source]
        source: ValueError,
    },
}

/// Build the value specification described by `config`, faking text in
/// `locale`.
///
/// Arguments are checked up front so a bad plan fails before any row is
/// written.
pub fn spec_from_config(
    config: &GeneratorConfig,
    locale: Locale,
) -> Result<ValueSpec, ValueError> {
    let spec = match config {
        GeneratorConfig::UuidV4 => provider::uuid_v4(),
        GeneratorConfig::Sequential { start } => provider::sequential(*start),
        GeneratorConfig::Pattern { pattern } => {
            pattern::check_pattern(pattern)?;
            provider::pattern(pattern.as_str())
        }
        GeneratorConfig::IntRange { min, max } => {
            check_range(*min, *max)?;
            provider::int_range(*min, *max)
        }
        GeneratorConfig::FloatRange { min, max } => {
            check_range(*min, *max)?;
            provider::float_range(*min, *max)
        }
        GeneratorConfig::DecimalRange { min, max } => {
            check_range(*min, *max)?;
            provider::decimal_range(*min, *max)
        }
        GeneratorConfig::TimestampRange { start, end } => {
            timestamp::parse_timestamp("start", start)?;
            timestamp::parse_timestamp("end", end)?;
            provider::timestamp_range(start.as_str(), end.as_str())
        }
        GeneratorConfig::TimestampNow => provider::timestamp_now(),
        GeneratorConfig::WeightedBool { true_weight } => {
            if !(0.0..=1.0).contains(true_weight) {
                return Err(ValueError::InvalidArgument {
                    name: "true_weight".to_string(),
                    reason: format!("must be between 0.0 and 1.0, got {true_weight}"),
                });
            }
            provider::weighted_bool(*true_weight)
        }
        GeneratorConfig::OneOf { values } => {
            provider::one_of(values.iter().map(static_value::yaml_to_field_value))
        }
        GeneratorConfig::Static { value } => {
            provider::constant(static_value::yaml_to_field_value(value))
        }
        GeneratorConfig::Null => provider::null(),
        GeneratorConfig::Faker { kind, min, max } => {
            if matches!(kind, FakerKind::Sentence | FakerKind::Paragraph) {
                if let (Some(min), Some(max)) = (min, max) {
                    if min >= max {
                        return Err(ValueError::InvalidArgument {
                            name: "max".to_string(),
                            reason: format!("max ({max}) must be greater than min ({min})"),
                        });
                    }
                }
            }
            provider::fake_localized(*kind, locale, *min, *max)
        }
    };
    Ok(spec)
}

/// Specifications for every generated field of a plan model, primary key
/// first. Callers pass the model's effective locale
/// ([`FillPlan::locale_of`](fill_core::FillPlan::locale_of)).
pub fn model_specs(
    model: &PlanModel,
    locale: Locale,
) -> Result<Vec<(String, ValueSpec)>, GeneratorError> {
    model
        .generators()
        .into_iter()
        .map(|(field, config)| {
            spec_from_config(config, locale)
                .map(|spec| (field.to_string(), spec))
                .map_err(|source| GeneratorError::InvalidConfig {
                    generator: config_name(config),
                    field: field.to_string(),
                    source,
                })
        })
        .collect()
}

/// Plan-file name of a generator config.
pub fn config_name(config: &GeneratorConfig) -> &'static str {
    match config {
        GeneratorConfig::UuidV4 => "uuid_v4",
        GeneratorConfig::Sequential { .. } => "sequential",
        GeneratorConfig::Pattern { .. } => "pattern",
        GeneratorConfig::IntRange { .. } => "int_range",
        GeneratorConfig::FloatRange { .. } => "float_range",
        GeneratorConfig::DecimalRange { .. } => "decimal_range",
        GeneratorConfig::TimestampRange { .. } => "timestamp_range",
        GeneratorConfig::TimestampNow => "timestamp_now",
        GeneratorConfig::WeightedBool { .. } => "weighted_bool",
        GeneratorConfig::OneOf { .. } => "one_of",
        GeneratorConfig::Static { .. } => "static",
        GeneratorConfig::Null => "null",
        GeneratorConfig::Faker { .. } => "faker",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fill_core::{FieldValue, FillPlan, ModelId, ValueContext};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_plan() -> FillPlan {
        let yaml = r#"
version: 1
seed: 42

models:
  - name: users
    count: 10
    id:
      type: uuid
      generator:
        type: uuid_v4
    fields:
      - name: email
        type:
          type: var_char
          length: 255
        generator:
          type: pattern
          pattern: "user_{index}@example.com"
      - name: age
        type: int
        generator:
          type: int_range
          min: 18
          max: 80
      - name: is_active
        type: bool
        generator:
          type: weighted_bool
          true_weight: 0.8
      - name: status
        type: text
        generator:
          type: one_of
          values: [active, banned]
      - name: bio
        type: text
        generator:
          type: faker
          kind: sentence
          min: 2
          max: 5
      - name: nickname
        type: text
        nullable: true
"#;
        FillPlan::from_yaml(yaml).unwrap()
    }

    #[test]
    fn test_model_specs_cover_generated_fields() {
        let plan = test_plan();
        let specs = model_specs(plan.get_model("users").unwrap(), Locale::En).unwrap();

        let names: Vec<&str> = specs.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["id", "email", "age", "is_active", "status", "bio"]);
    }

    #[test]
    fn test_specs_resolve_to_expected_values() {
        let plan = test_plan();
        let specs = model_specs(plan.get_model("users").unwrap(), Locale::En).unwrap();
        let mut rng = StdRng::seed_from_u64(plan.seed);
        let model = ModelId::from("users");

        for (field, spec) in &specs {
            let value = spec
                .resolve(&mut ValueContext::new(&mut rng, &model, 7))
                .unwrap();
            match field.as_str() {
                "id" => assert!(matches!(value, FieldValue::Uuid(_))),
                "email" => assert_eq!(value, FieldValue::from("user_7@example.com")),
                "age" => assert!((18..=80).contains(&value.as_i64().unwrap())),
                "is_active" => assert!(value.as_bool().is_some()),
                "status" => assert!(["active", "banned"].contains(&value.as_str().unwrap())),
                "bio" => assert!(value.as_str().is_some()),
                other => panic!("unexpected field {other}"),
            }
        }
    }

    #[test]
    fn test_invalid_configs_fail_before_resolution() {
        let inverted = GeneratorConfig::IntRange { min: 5, max: 1 };
        assert!(spec_from_config(&inverted, Locale::En).is_err());

        let weight = GeneratorConfig::WeightedBool { true_weight: 2.0 };
        assert!(spec_from_config(&weight, Locale::En).is_err());

        let dates = GeneratorConfig::TimestampRange {
            start: "soon".to_string(),
            end: "2024-01-01".to_string(),
        };
        assert!(spec_from_config(&dates, Locale::En).is_err());

        let words = GeneratorConfig::Faker {
            kind: FakerKind::Sentence,
            min: Some(4),
            max: Some(2),
        };
        assert!(spec_from_config(&words, Locale::En).is_err());

        let digits = GeneratorConfig::Pattern {
            pattern: "code-{rand:500}".to_string(),
        };
        assert!(spec_from_config(&digits, Locale::En).is_err());
    }

    #[test]
    fn test_model_locale_reaches_faker_specs() {
        let yaml = r#"
locale: de_DE
models:
  - name: users
    fields:
      - name: city
        type: text
        generator:
          type: faker
          kind: city
  - name: shops
    locale: ja_JP
    fields:
      - name: city
        type: text
        generator:
          type: faker
          kind: city
"#;
        let plan = FillPlan::from_yaml(yaml).unwrap();
        let users = plan.get_model("users").unwrap();
        let shops = plan.get_model("shops").unwrap();

        let specs = model_specs(users, plan.locale_of(users)).unwrap();
        assert_eq!(specs[0].1.to_string(), "city(locale=\"de_DE\")");

        let specs = model_specs(shops, plan.locale_of(shops)).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let model = ModelId::from("shops");
        let value = specs[0]
            .1
            .resolve(&mut ValueContext::new(&mut rng, &model, 0))
            .unwrap();
        assert!(!value.as_str().unwrap().is_ascii());
    }

    #[test]
    fn test_model_specs_report_field() {
        let yaml = r#"
models:
  - name: users
    fields:
      - name: age
        type: int
        generator:
          type: int_range
          min: 9
          max: 1
"#;
        let plan = FillPlan::from_yaml(yaml).unwrap();
        let err = model_specs(plan.get_model("users").unwrap(), Locale::En).unwrap_err();
        let GeneratorError::InvalidConfig {
            generator, field, ..
        } = err;
        assert_eq!(generator, "int_range");
        assert_eq!(field, "age");
    }

    #[test]
    fn test_static_config() {
        let config: GeneratorConfig = serde_yaml::from_str("type: static\nvalue: 5").unwrap();
        assert_eq!(spec_from_config(&config, Locale::En).unwrap().to_string(), "constant(5)");
    }
}
