//! Ready-made value specifications.
//!
//! Each constructor binds one generator to its arguments, so the result
//! displays as e.g. `int_range(max=80, min=18)` and can be assigned to a
//! field directly:
//!
//! ```rust
//! use fill_generator::provider;
//!
//! let spec = provider::int_range(18, 80);
//! assert_eq!(spec.to_string(), "int_range(max=80, min=18)");
//! ```

use crate::generators::{faker, numeric, pattern, static_value, timestamp, uuid};
use fill_core::{FakerKind, FieldValue, Locale, ValueError, ValueSpec};

/// Random UUID v4, independent of the seed.
pub fn uuid_v4() -> ValueSpec {
    ValueSpec::new("uuid_v4", |_, _| Ok(uuid::generate_uuid_v4()))
}

/// `start + index` for the instance being generated.
pub fn sequential(start: i64) -> ValueSpec {
    ValueSpec::new("sequential", |ctx, args| {
        numeric::generate_sequential(args.required_i64("start")?, ctx.index)
    })
    .with_named_arg("start", start)
}

/// Pattern string with `{index}`, `{uuid}` and `{rand:N}` placeholders.
pub fn pattern(pattern: impl Into<String>) -> ValueSpec {
    ValueSpec::new("pattern", |ctx, args| {
        let pattern = args.required_str("pattern")?;
        pattern::generate_pattern(pattern, ctx.rng, ctx.index)
    })
    .with_named_arg("pattern", pattern.into())
}

/// Random integer in `min..=max`.
pub fn int_range(min: i64, max: i64) -> ValueSpec {
    ValueSpec::new("int_range", |ctx, args| {
        numeric::generate_int_range(ctx.rng, args.required_i64("min")?, args.required_i64("max")?)
    })
    .with_named_arg("min", min)
    .with_named_arg("max", max)
}

/// Random float in `min..=max`.
pub fn float_range(min: f64, max: f64) -> ValueSpec {
    ValueSpec::new("float_range", |ctx, args| {
        numeric::generate_float_range(ctx.rng, args.required_f64("min")?, args.required_f64("max")?)
    })
    .with_named_arg("min", min)
    .with_named_arg("max", max)
}

/// Random two-place decimal in `min..=max`.
pub fn decimal_range(min: f64, max: f64) -> ValueSpec {
    ValueSpec::new("decimal_range", |ctx, args| {
        numeric::generate_decimal_range(
            ctx.rng,
            args.required_f64("min")?,
            args.required_f64("max")?,
        )
    })
    .with_named_arg("min", min)
    .with_named_arg("max", max)
}

/// Random timestamp between `start` and `end` (RFC 3339 or `YYYY-MM-DD`).
pub fn timestamp_range(start: impl Into<String>, end: impl Into<String>) -> ValueSpec {
    ValueSpec::new("timestamp_range", |ctx, args| {
        timestamp::generate_timestamp_range(
            ctx.rng,
            args.required_str("start")?,
            args.required_str("end")?,
        )
    })
    .with_named_arg("start", start.into())
    .with_named_arg("end", end.into())
}

/// Wall-clock time at resolution.
pub fn timestamp_now() -> ValueSpec {
    ValueSpec::new("timestamp_now", |_, _| Ok(timestamp::generate_timestamp_now()))
}

/// Boolean that is true with probability `true_weight`.
pub fn weighted_bool(true_weight: f64) -> ValueSpec {
    ValueSpec::new("weighted_bool", |ctx, args| {
        numeric::generate_weighted_bool(ctx.rng, args.required_f64("true_weight")?)
    })
    .with_named_arg("true_weight", true_weight)
}

/// Uniform pick from a pool of values (bound as positional arguments).
pub fn one_of<I, V>(values: I) -> ValueSpec
where
    I: IntoIterator<Item = V>,
    V: Into<FieldValue>,
{
    values.into_iter().fold(
        ValueSpec::new("one_of", |ctx, args| {
            Ok(static_value::generate_one_of(ctx.rng, args.positionals()))
        }),
        |spec, value| spec.with_arg(value),
    )
}

/// The same value for every instance.
pub fn constant(value: impl Into<FieldValue>) -> ValueSpec {
    ValueSpec::constant(value)
}

/// Always null.
pub fn null() -> ValueSpec {
    ValueSpec::new("null", |_, _| Ok(FieldValue::Null))
}

/// Fake value of `kind` with the default bounds.
pub fn fake(kind: FakerKind) -> ValueSpec {
    fake_bounded(kind, None, None)
}

/// Fake value of `kind`; `min`/`max` bound sentence and paragraph lengths.
pub fn fake_bounded(kind: FakerKind, min: Option<usize>, max: Option<usize>) -> ValueSpec {
    fake_localized(kind, Locale::En, min, max)
}

/// Fake value of `kind` in `locale`. The locale is only bound (and shown)
/// when it is not the default.
pub fn fake_localized(
    kind: FakerKind,
    locale: Locale,
    min: Option<usize>,
    max: Option<usize>,
) -> ValueSpec {
    let mut spec = ValueSpec::new(kind.as_str(), move |ctx, args| {
        let min = optional_usize(args.optional_i64("min")?, "min")?;
        let max = optional_usize(args.optional_i64("max")?, "max")?;
        let locale = match args.optional_str("locale")? {
            Some(text) => text.parse::<Locale>().map_err(|reason| ValueError::InvalidArgument {
                name: "locale".to_string(),
                reason,
            })?,
            None => Locale::En,
        };
        faker::generate_fake(ctx.rng, kind, locale, min, max)
    });
    if locale != Locale::En {
        spec = spec.with_named_arg("locale", locale.as_str());
    }
    if let Some(min) = min {
        spec = spec.with_named_arg("min", usize_arg(min));
    }
    if let Some(max) = max {
        spec = spec.with_named_arg("max", usize_arg(max));
    }
    spec
}

fn usize_arg(value: usize) -> FieldValue {
    FieldValue::Int64(i64::try_from(value).unwrap_or(i64::MAX))
}

fn optional_usize(value: Option<i64>, name: &str) -> Result<Option<usize>, ValueError> {
    value
        .map(|v| {
            usize::try_from(v).map_err(|_| ValueError::InvalidArgument {
                name: name.to_string(),
                reason: format!("must not be negative, got {v}"),
            })
        })
        .transpose()
}

/// Full name, e.g. "Ada Lovelace".
pub fn name() -> ValueSpec {
    fake(FakerKind::Name)
}

pub fn first_name() -> ValueSpec {
    fake(FakerKind::FirstName)
}

pub fn last_name() -> ValueSpec {
    fake(FakerKind::LastName)
}

pub fn username() -> ValueSpec {
    fake(FakerKind::Username)
}

pub fn free_email() -> ValueSpec {
    fake(FakerKind::FreeEmail)
}

pub fn safe_email() -> ValueSpec {
    fake(FakerKind::SafeEmail)
}

pub fn ipv4() -> ValueSpec {
    fake(FakerKind::Ipv4)
}

pub fn ipv6() -> ValueSpec {
    fake(FakerKind::Ipv6)
}

pub fn mac_address() -> ValueSpec {
    fake(FakerKind::MacAddress)
}

pub fn user_agent() -> ValueSpec {
    fake(FakerKind::UserAgent)
}

/// Address at a company domain, e.g. "ada@lovelace.com".
pub fn company_email() -> ValueSpec {
    fake(FakerKind::CompanyEmail)
}

pub fn url() -> ValueSpec {
    fake(FakerKind::Url)
}

/// URL with a page path, e.g. "https://www.smith.org/lorem/ipsum.html".
pub fn uri() -> ValueSpec {
    fake(FakerKind::Uri)
}

pub fn mime_type() -> ValueSpec {
    fake(FakerKind::MimeType)
}

pub fn file_name() -> ValueSpec {
    fake(FakerKind::FileName)
}

pub fn word() -> ValueSpec {
    fake(FakerKind::Word)
}

/// Sentence of `min..max` words.
pub fn sentence(min: usize, max: usize) -> ValueSpec {
    fake_bounded(FakerKind::Sentence, Some(min), Some(max))
}

/// Paragraph of `min..max` sentences.
pub fn paragraph(min: usize, max: usize) -> ValueSpec {
    fake_bounded(FakerKind::Paragraph, Some(min), Some(max))
}

pub fn company_name() -> ValueSpec {
    fake(FakerKind::CompanyName)
}

pub fn city() -> ValueSpec {
    fake(FakerKind::City)
}

pub fn country() -> ValueSpec {
    fake(FakerKind::Country)
}

pub fn phone_number() -> ValueSpec {
    fake(FakerKind::PhoneNumber)
}

pub fn job_title() -> ValueSpec {
    fake(FakerKind::JobTitle)
}

/// Random 32-character hex string.
pub fn md5() -> ValueSpec {
    fake(FakerKind::Md5)
}

pub fn sha1() -> ValueSpec {
    fake(FakerKind::Sha1)
}

pub fn sha256() -> ValueSpec {
    fake(FakerKind::Sha256)
}
