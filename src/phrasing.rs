//! Deterministic lexical screens over the raw player input.
//!
//! These run before any judge-reported flag is consulted, so a phrase like
//! "1 kg of flour" fails the explicit-measure ban no matter what the judge
//! returned for it.

/// Mass and volume unit tokens that make a phrase an explicit measure.
const MEASURE_UNITS: [&str; 24] = [
    "g", "kg", "mg", "gram", "grams", "kilogram", "kilograms", "milligram", "milligrams", "lb",
    "lbs", "pound", "pounds", "oz", "ounce", "ounces", "ton", "tons", "tonne", "tonnes", "ml",
    "l", "liter", "liters",
];

/// Bare materials that cannot be weighed without a countable unit.
const BULK_MATERIALS: [&str; 16] = [
    "flour", "sand", "sugar", "salt", "water", "rice", "milk", "oil", "honey", "gravel", "soil",
    "dirt", "snow", "cement", "dust", "gasoline",
];

/// Container and counting words that turn a bulk material into an object.
const COUNTABLE_UNITS: [&str; 12] = [
    "bag", "bags", "cup", "cups", "bottle", "bottles", "jar", "jars", "bucket", "buckets",
    "grain", "grains",
];

fn tokens(raw: &str) -> Vec<String> {
    raw.split_whitespace()
        .map(|t| {
            t.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|t| !t.is_empty())
        .collect()
}

fn is_number(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit() || c == '.')
}

/// Splits a glued quantity token like `500g` or `1.5kg` into number and tail.
fn split_glued_measure(token: &str) -> Option<&str> {
    let digits = token
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .filter(|&idx| idx > 0)?;
    Some(&token[digits..])
}

/// Detects an explicit mass/volume quantity plus unit in the raw input.
///
/// Covers both spaced ("1 kg", "500 ml") and glued ("500g") phrasings.
pub fn contains_explicit_measure(raw: &str) -> bool {
    let tokens = tokens(raw);
    for (idx, token) in tokens.iter().enumerate() {
        if let Some(tail) = split_glued_measure(token) {
            if MEASURE_UNITS.contains(&tail) {
                return true;
            }
        }
        if is_number(token) {
            if let Some(next) = tokens.get(idx + 1) {
                if MEASURE_UNITS.contains(&next.as_str()) {
                    return true;
                }
            }
        }
    }
    false
}

/// Detects a bulk material named without any countable unit.
///
/// Count-based phrasing ("10 grains of rice") and container phrasing
/// ("bottle of water") are exempt.
pub fn bulk_material_without_count(raw: &str) -> bool {
    let tokens = tokens(raw);
    let names_material = tokens.iter().any(|t| BULK_MATERIALS.contains(&t.as_str()));
    if !names_material {
        return false;
    }
    let has_count = tokens.iter().any(|t| is_number(t));
    let has_container = tokens.iter().any(|t| COUNTABLE_UNITS.contains(&t.as_str()));
    !has_count && !has_container
}
