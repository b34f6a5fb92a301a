use std::sync::LazyLock;

use regex::Regex;

/// A second segment ending in exactly four digits, e.g. `Foo2312` or `2312`.
static VARIANT_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^0-9])([0-9]{4})$").expect("valid variant regex"));

/// Identifier and optional variant code parsed from a model filename stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub item_id: i64,
    pub variant_code: Option<String>,
}

/// Parse `<item_id>[_<segment>[_...]]`.
///
/// Returns `None` when the first underscore-delimited segment is not an
/// integer. The variant code is the trailing four-digit run of the second
/// segment; a longer or shorter trailing run makes the file plain.
pub fn parse_model_stem(stem: &str) -> Option<ParsedName> {
    let mut segments = stem.split('_');
    let item_id = segments.next()?.parse::<i64>().ok()?;
    let variant_code = segments.next().and_then(variant_code);
    Some(ParsedName {
        item_id,
        variant_code,
    })
}

fn variant_code(segment: &str) -> Option<String> {
    VARIANT_SUFFIX
        .captures(segment)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
