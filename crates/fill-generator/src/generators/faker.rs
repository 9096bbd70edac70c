//! Realistic fake values backed by the `fake` crate.
//!
//! Hash-like kinds (`md5`, `sha1`, `sha256`) are random hex digests of the
//! matching length; they are not hashes of anything.
//!
//! Company emails, URLs and URIs are assembled from locale names and domain
//! suffixes. Host and path parts keep ASCII letters and digits only, so
//! locales with non-Latin names fall back to fixed labels there.

use fake::faker::address::raw as address;
use fake::faker::company::raw as company;
use fake::faker::filesystem::raw as filesystem;
use fake::faker::impls::address::CityNameGenFn;
use fake::faker::internet::raw as internet;
use fake::faker::job::raw as job;
use fake::faker::lorem::raw as lorem;
use fake::faker::name::raw as name;
use fake::faker::phone_number::raw as phone_number;
use fake::locales::{AR_SA, DE_DE, EN, FR_FR, JA_JP, PT_BR, ZH_CN, ZH_TW};
use fake::Fake;
use fill_core::{FakerKind, FieldValue, Locale, ValueError};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt::Write;
use std::ops::Range;

/// Default word count range for sentences.
pub const SENTENCE_WORDS: Range<usize> = 4..10;

/// Default sentence count range for paragraphs.
pub const PARAGRAPH_SENTENCES: Range<usize> = 3..6;

const URI_PAGE_EXTENSIONS: [&str; 5] = ["html", "htm", "php", "jsp", "asp"];

/// Generate a fake value of the given kind.
///
/// `min`/`max` bound the word count of sentences and the sentence count of
/// paragraphs (`max` exclusive); other kinds ignore them.
pub fn generate_fake<R: Rng>(
    rng: &mut R,
    kind: FakerKind,
    locale: Locale,
    min: Option<usize>,
    max: Option<usize>,
) -> Result<FieldValue, ValueError> {
    let text = match locale {
        Locale::En => fake_text(EN, rng, kind, min, max)?,
        Locale::FrFr => fake_text(FR_FR, rng, kind, min, max)?,
        Locale::DeDe => fake_text(DE_DE, rng, kind, min, max)?,
        Locale::PtBr => fake_text(PT_BR, rng, kind, min, max)?,
        Locale::JaJp => fake_text(JA_JP, rng, kind, min, max)?,
        Locale::ZhCn => fake_text(ZH_CN, rng, kind, min, max)?,
        Locale::ZhTw => fake_text(ZH_TW, rng, kind, min, max)?,
        Locale::ArSa => fake_text(AR_SA, rng, kind, min, max)?,
    };
    Ok(FieldValue::String(text))
}

fn fake_text<L: CityNameGenFn, R: Rng>(
    l: L,
    rng: &mut R,
    kind: FakerKind,
    min: Option<usize>,
    max: Option<usize>,
) -> Result<String, ValueError> {
    let text: String = match kind {
        FakerKind::Name => name::Name(l).fake_with_rng(rng),
        FakerKind::FirstName => name::FirstName(l).fake_with_rng(rng),
        FakerKind::LastName => name::LastName(l).fake_with_rng(rng),
        FakerKind::Username => internet::Username(l).fake_with_rng(rng),
        FakerKind::FreeEmail => internet::FreeEmail(l).fake_with_rng(rng),
        FakerKind::SafeEmail => internet::SafeEmail(l).fake_with_rng(rng),
        FakerKind::Ipv4 => internet::IPv4(l).fake_with_rng(rng),
        FakerKind::Ipv6 => internet::IPv6(l).fake_with_rng(rng),
        FakerKind::MacAddress => internet::MACAddress(l).fake_with_rng(rng),
        FakerKind::UserAgent => internet::UserAgent(l).fake_with_rng(rng),
        FakerKind::CompanyEmail => company_email(l, rng),
        FakerKind::Url => url(l, rng),
        FakerKind::Uri => {
            let base = url(l, rng);
            let dir = ascii_label(lorem::Word(l).fake_with_rng(rng), "static");
            let page = ascii_label(lorem::Word(l).fake_with_rng(rng), "index");
            let ext = URI_PAGE_EXTENSIONS.choose(rng).copied().unwrap_or("html");
            format!("{base}{dir}/{page}.{ext}")
        }
        FakerKind::MimeType => filesystem::MimeType(l).fake_with_rng(rng),
        FakerKind::FileName => filesystem::FileName(l).fake_with_rng(rng),
        FakerKind::Word => lorem::Word(l).fake_with_rng(rng),
        FakerKind::Sentence => {
            lorem::Sentence(l, bounds(min, max, SENTENCE_WORDS)?).fake_with_rng(rng)
        }
        FakerKind::Paragraph => {
            lorem::Paragraph(l, bounds(min, max, PARAGRAPH_SENTENCES)?).fake_with_rng(rng)
        }
        FakerKind::CompanyName => company::CompanyName(l).fake_with_rng(rng),
        FakerKind::City => address::CityName(l).fake_with_rng(rng),
        FakerKind::Country => address::CountryName(l).fake_with_rng(rng),
        FakerKind::PhoneNumber => phone_number::PhoneNumber(l).fake_with_rng(rng),
        FakerKind::JobTitle => job::Title(l).fake_with_rng(rng),
        FakerKind::Md5 => hex_digest(rng, 16),
        FakerKind::Sha1 => hex_digest(rng, 20),
        FakerKind::Sha256 => hex_digest(rng, 32),
    };
    Ok(text)
}

/// `<last name>.<suffix>`, e.g. `schmidt.net`.
fn domain_name<L: CityNameGenFn, R: Rng>(l: L, rng: &mut R) -> String {
    let label = ascii_label(name::LastName(l).fake_with_rng(rng), "example");
    let suffix: String = internet::DomainSuffix(l).fake_with_rng(rng);
    format!("{label}.{suffix}")
}

fn company_email<L: CityNameGenFn, R: Rng>(l: L, rng: &mut R) -> String {
    let user = ascii_label(name::FirstName(l).fake_with_rng(rng), "contact");
    format!("{user}@{}", domain_name(l, rng))
}

fn url<L: CityNameGenFn, R: Rng>(l: L, rng: &mut R) -> String {
    let scheme = if rng.gen_bool(0.5) { "https" } else { "http" };
    format!("{scheme}://www.{}/", domain_name(l, rng))
}

/// Lowercase ASCII letters and digits of `text`, or `fallback` if none.
fn ascii_label(text: String, fallback: &str) -> String {
    let label: String = text
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if label.is_empty() {
        fallback.to_string()
    } else {
        label
    }
}

fn bounds(
    min: Option<usize>,
    max: Option<usize>,
    default: Range<usize>,
) -> Result<Range<usize>, ValueError> {
    let start = min.unwrap_or(default.start);
    let end = max.unwrap_or(default.end.max(start + 1));
    if start >= end {
        return Err(ValueError::InvalidArgument {
            name: "max".to_string(),
            reason: format!("max ({end}) must be greater than min ({start})"),
        });
    }
    Ok(start..end)
}

fn hex_digest<R: Rng>(rng: &mut R, len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rng.fill(bytes.as_mut_slice());
    bytes.iter().fold(String::with_capacity(len * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fake_in(kind: FakerKind, locale: Locale, rng: &mut StdRng) -> String {
        match generate_fake(rng, kind, locale, None, None).unwrap() {
            FieldValue::String(s) => s,
            other => panic!("Expected String value, got {other:?}"),
        }
    }

    fn fake_en(kind: FakerKind, rng: &mut StdRng) -> String {
        fake_in(kind, Locale::En, rng)
    }

    #[test]
    fn test_every_kind_produces_text() {
        let mut rng = StdRng::seed_from_u64(42);
        for kind in [
            FakerKind::Name,
            FakerKind::Username,
            FakerKind::FreeEmail,
            FakerKind::Ipv4,
            FakerKind::CompanyEmail,
            FakerKind::Url,
            FakerKind::Uri,
            FakerKind::MimeType,
            FakerKind::FileName,
            FakerKind::Word,
            FakerKind::Sentence,
            FakerKind::Paragraph,
            FakerKind::CompanyName,
            FakerKind::City,
            FakerKind::JobTitle,
        ] {
            assert!(!fake_en(kind, &mut rng).is_empty(), "{kind} was empty");
        }
    }

    #[test]
    fn test_every_locale_fakes_every_kind() {
        let mut rng = StdRng::seed_from_u64(3);
        for locale in Locale::ALL {
            for kind in [
                FakerKind::Name,
                FakerKind::City,
                FakerKind::CompanyName,
                FakerKind::CompanyEmail,
                FakerKind::Uri,
                FakerKind::Sentence,
            ] {
                let text = fake_in(kind, locale, &mut rng);
                assert!(!text.is_empty(), "{kind} in {locale} was empty");
            }
        }
    }

    #[test]
    fn test_locale_changes_names() {
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..10 {
            assert!(!fake_in(FakerKind::Name, Locale::ZhCn, &mut rng).is_ascii());
            assert!(!fake_in(FakerKind::Name, Locale::JaJp, &mut rng).is_ascii());
        }
    }

    #[test]
    fn test_email_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let email = fake_en(FakerKind::SafeEmail, &mut rng);
        assert!(email.contains('@'));
    }

    #[test]
    fn test_company_email_and_urls_are_ascii() {
        let mut rng = StdRng::seed_from_u64(7);
        for locale in [Locale::En, Locale::ZhCn, Locale::ArSa] {
            let email = fake_in(FakerKind::CompanyEmail, locale, &mut rng);
            let (user, domain) = email.split_once('@').unwrap();
            assert!(!user.is_empty());
            assert!(domain.contains('.'));
            assert!(email.is_ascii(), "{email}");

            let url = fake_in(FakerKind::Url, locale, &mut rng);
            assert!(url.starts_with("http://www.") || url.starts_with("https://www."));
            assert!(url.ends_with('/'));

            let uri = fake_in(FakerKind::Uri, locale, &mut rng);
            assert!(uri.contains("://www."));
            let page = uri.rsplit('/').next().unwrap();
            let ext = page.rsplit('.').next().unwrap();
            assert!(URI_PAGE_EXTENSIONS.contains(&ext), "{uri}");
        }
    }

    #[test]
    fn test_file_name_and_mime_type() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(fake_en(FakerKind::FileName, &mut rng).contains('.'));
        assert!(fake_en(FakerKind::MimeType, &mut rng).contains('/'));
    }

    #[test]
    fn test_ipv4_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let ip = fake_en(FakerKind::Ipv4, &mut rng);
        assert_eq!(ip.split('.').count(), 4);
    }

    #[test]
    fn test_hex_digest_lengths() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(fake_en(FakerKind::Md5, &mut rng).len(), 32);
        assert_eq!(fake_en(FakerKind::Sha1, &mut rng).len(), 40);
        let sha = fake_en(FakerKind::Sha256, &mut rng);
        assert_eq!(sha.len(), 64);
        assert!(sha.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_sentence_word_bounds() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            let value =
                generate_fake(&mut rng, FakerKind::Sentence, Locale::En, Some(2), Some(4)).unwrap();
            let words = value.as_str().unwrap().split_whitespace().count();
            assert!((2..4).contains(&words), "got {words} words");
        }
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        let mut rng = StdRng::seed_from_u64(5);
        let err = generate_fake(&mut rng, FakerKind::Sentence, Locale::En, Some(5), Some(5))
            .unwrap_err();
        assert!(matches!(err, ValueError::InvalidArgument { .. }));
    }

    #[test]
    fn test_seeded_fakes_repeat() {
        let mut rng1 = StdRng::seed_from_u64(11);
        let mut rng2 = StdRng::seed_from_u64(11);
        assert_eq!(
            fake_en(FakerKind::Name, &mut rng1),
            fake_en(FakerKind::Name, &mut rng2)
        );
    }
}
