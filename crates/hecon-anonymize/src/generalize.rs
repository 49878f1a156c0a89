//! Generalization of quasi-identifiers into coarse categories.

use hecon_ingest::parse_date;
use hecon_model::{Granularity, Period, fold_upper};

pub const UNSPECIFIED: &str = "unspecified";
pub const INVALID: &str = "invalid";

/// Municipality fragments and the zone each belongs to. Matched as substrings
/// of the folded value, first hit wins.
const ZONES: &[(&str, &str)] = &[
    ("IZTAPALAPA", "ZONA_ORIENTE"),
    ("TLALPAN", "ZONA_SUR"),
    ("GUSTAVO A. MADERO", "ZONA_NORTE"),
    ("COYOACAN", "ZONA_SUR"),
    ("ALVARO OBREGON", "ZONA_PONIENTE"),
    ("XOCHIMILCO", "ZONA_SUR"),
    ("TLAHUAC", "ZONA_ORIENTE"),
    ("MILPA ALTA", "ZONA_SUR"),
    ("MAGDALENA CONTRERAS", "ZONA_SUR"),
    ("CUAJIMALPA", "ZONA_PONIENTE"),
];

const METRO_MARKERS: &[&str] = &["MEXICO", "CDMX", "DF"];

/// Age band for a value in years.
pub fn age_group(age: Option<f64>) -> &'static str {
    match age {
        None => UNSPECIFIED,
        Some(years) if !years.is_finite() => UNSPECIFIED,
        Some(years) if years < 0.0 => INVALID,
        Some(years) if years < 18.0 => "minor",
        Some(years) if years < 30.0 => "18_29",
        Some(years) if years < 45.0 => "30_44",
        Some(years) if years < 60.0 => "45_59",
        Some(years) if years < 75.0 => "60_74",
        Some(_) => "75_plus",
    }
}

/// Coarse zone for a location cell.
pub fn location_zone(value: Option<&str>) -> &'static str {
    let Some(raw) = value.filter(|v| !v.trim().is_empty()) else {
        return UNSPECIFIED;
    };
    let folded = fold_upper(raw);
    if let Some((_, zone)) = ZONES.iter().find(|(fragment, _)| folded.contains(*fragment)) {
        return *zone;
    }
    if METRO_MARKERS.iter().any(|marker| folded.contains(*marker)) {
        "ZONA_METROPOLITANA"
    } else {
        "OTRA_ENTIDAD"
    }
}

/// Period label for a timestamp cell.
pub fn period_label(value: Option<&str>, granularity: Granularity) -> String {
    let Some(raw) = value.filter(|v| !v.trim().is_empty()) else {
        return UNSPECIFIED.to_string();
    };
    match parse_date(raw) {
        Some(date) => Period::from_date(date, granularity).label(),
        None => INVALID.to_string(),
    }
}

/// Leading two characters of a postal code followed by `XXX`.
pub fn postal_zone(value: Option<&str>) -> String {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return UNSPECIFIED.to_string();
    };
    let prefix: String = raw.chars().take(2).collect();
    format!("{prefix}XXX")
}
