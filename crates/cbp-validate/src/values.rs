//! Cell-level value predicates shared by the validators.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Sample, patient and entity identifiers: letters, digits, `.`, `_`, `-`.
static ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("Invalid identifier regex"));

/// Values spreadsheet programs produce when they turn gene names or ranges
/// into dates, e.g. `1-Mar`, `Sep-09`, `3/1/2016`.
static DATE_LIKE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(\d{1,2}-(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)|(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)-\d{2,4}|\d{1,2}/\d{1,2}/\d{2,4})$",
    )
    .expect("Invalid date regex")
});

/// TCGA barcodes: the first four dash separated parts identify the sample.
static TCGA_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(TCGA-[A-Z0-9]{2}-[A-Z0-9]{4}-\d{2})[A-Z]?(-.*)?$").expect("Invalid TCGA regex")
});

/// Placeholders accepted as "no value" in clinical files.
const CLINICAL_NULL_VALUES: &[&str] = &[
    "",
    "na",
    "n/a",
    "[not applicable]",
    "[not available]",
    "[pending]",
    "[discrepancy]",
    "[completed]",
    "[null]",
    "[unknown]",
    "[not evaluated]",
];

/// Placeholders accepted as "no value" in numeric profile files.
const NUMERIC_NULL_VALUES: &[&str] = &["", "NA", "NaN", "NAN", "nan", "N/A"];

pub fn is_clinical_null(value: &str) -> bool {
    let value = value.trim().to_ascii_lowercase();
    CLINICAL_NULL_VALUES.contains(&value.as_str())
}

pub fn is_numeric_null(value: &str) -> bool {
    NUMERIC_NULL_VALUES.contains(&value.trim())
}

/// Finite real number, or `None`.
pub fn parse_float(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

pub fn parse_int(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

pub fn is_valid_id(value: &str) -> bool {
    ID_REGEX.is_match(value)
}

pub fn looks_like_date(value: &str) -> bool {
    DATE_LIKE_REGEX.is_match(value.trim())
}

pub fn has_whitespace(value: &str) -> bool {
    value.chars().any(char::is_whitespace)
}

/// Absolute URL with a scheme the portal can link to.
pub fn is_valid_url(value: &str) -> bool {
    Url::parse(value.trim())
        .map(|url| matches!(url.scheme(), "http" | "https" | "ftp") && url.host().is_some())
        .unwrap_or(false)
}

/// Key under which near-identical sample ids collide. TCGA barcodes are cut
/// to their sample part; other ids are compared case-insensitively.
pub fn normalized_sample_key(sample_id: &str) -> String {
    let upper = sample_id.trim().to_ascii_uppercase();
    match TCGA_REGEX.captures(&upper) {
        Some(captures) => captures[1].to_string(),
        None => upper,
    }
}

/// CSS color names accepted for cancer types, besides `#rrggbb`.
const CSS_COLORS: &[&str] = &[
    "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure", "beige", "bisque", "black",
    "blanchedalmond", "blue", "blueviolet", "brown", "burlywood", "cadetblue", "chartreuse",
    "chocolate", "coral", "cornflowerblue", "cornsilk", "crimson", "cyan", "darkblue",
    "darkcyan", "darkgoldenrod", "darkgray", "darkgreen", "darkgrey", "darkkhaki",
    "darkmagenta", "darkolivegreen", "darkorange", "darkorchid", "darkred", "darksalmon",
    "darkseagreen", "darkslateblue", "darkslategray", "darkslategrey", "darkturquoise",
    "darkviolet", "deeppink", "deepskyblue", "dimgray", "dimgrey", "dodgerblue", "firebrick",
    "floralwhite", "forestgreen", "fuchsia", "gainsboro", "ghostwhite", "gold", "goldenrod",
    "gray", "green", "greenyellow", "grey", "honeydew", "hotpink", "indianred", "indigo",
    "ivory", "khaki", "lavender", "lavenderblush", "lawngreen", "lemonchiffon", "lightblue",
    "lightcoral", "lightcyan", "lightgoldenrodyellow", "lightgray", "lightgreen", "lightgrey",
    "lightpink", "lightsalmon", "lightseagreen", "lightskyblue", "lightslategray",
    "lightslategrey", "lightsteelblue", "lightyellow", "lime", "limegreen", "linen", "magenta",
    "maroon", "mediumaquamarine", "mediumblue", "mediumorchid", "mediumpurple",
    "mediumseagreen", "mediumslateblue", "mediumspringgreen", "mediumturquoise",
    "mediumvioletred", "midnightblue", "mintcream", "mistyrose", "moccasin", "navajowhite",
    "navy", "oldlace", "olive", "olivedrab", "orange", "orangered", "orchid", "palegoldenrod",
    "palegreen", "paleturquoise", "palevioletred", "papayawhip", "peachpuff", "peru", "pink",
    "plum", "powderblue", "purple", "rebeccapurple", "red", "rosybrown", "royalblue",
    "saddlebrown", "salmon", "sandybrown", "seagreen", "seashell", "sienna", "silver",
    "skyblue", "slateblue", "slategray", "slategrey", "snow", "springgreen", "steelblue", "tan",
    "teal", "thistle", "tomato", "turquoise", "violet", "wheat", "white", "whitesmoke",
    "yellow", "yellowgreen",
];

pub fn is_valid_color(value: &str) -> bool {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    CSS_COLORS.contains(&value.to_ascii_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        assert!(is_valid_id("TCGA-A1-A0SB-01"));
        assert!(is_valid_id("s_1.a"));
        assert!(!is_valid_id("sample 1"));
        assert!(!is_valid_id("sample#1"));
        assert!(!is_valid_id(""));
    }

    #[test]
    fn floats_reject_non_finite() {
        assert_eq!(parse_float(" 1.5 "), Some(1.5));
        assert_eq!(parse_float("-2"), Some(-2.0));
        assert_eq!(parse_float("inf"), None);
        assert_eq!(parse_float("NaN"), None);
        assert_eq!(parse_float("abc"), None);
    }

    #[test]
    fn date_like_values() {
        assert!(looks_like_date("1-Mar"));
        assert!(looks_like_date("Sep-09"));
        assert!(looks_like_date("3/1/2016"));
        assert!(!looks_like_date("MARCH1"));
        assert!(!looks_like_date("12"));
    }

    #[test]
    fn tcga_keys_collapse_vial_letters() {
        assert_eq!(
            normalized_sample_key("TCGA-A1-A0SB-01A"),
            normalized_sample_key("TCGA-A1-A0SB-01")
        );
        assert_eq!(normalized_sample_key("abc"), "ABC");
    }

    #[test]
    fn urls_and_colors() {
        assert!(is_valid_url("https://example.org/slide/1"));
        assert!(!is_valid_url("example.org/slide"));
        assert!(!is_valid_url("mailto:someone@example.org"));
        assert!(is_valid_color("#aaBB00"));
        assert!(is_valid_color("LightBlue"));
        assert!(!is_valid_color("#ggg000"));
        assert!(!is_valid_color("notacolor"));
    }
}
