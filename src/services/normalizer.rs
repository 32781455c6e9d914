//! Season, category and brand normalization
//!
//! Source spreadsheets spell the same season several ways ("26SS" vs
//! "26S") and split accessories across several categories. These helpers
//! map them onto the canonical forms used for grouping and FX lookup.

use regex::Regex;
use std::sync::LazyLock;

/// Category that accessory-like categories fold into
pub const ACCESSORY_CATEGORY: &str = "Acc_etc";

/// FX table categories: apparel, shoes, goods. The first is the fallback.
pub const FX_CATEGORIES: [&str; 3] = ["의류", "슈즈", "용품"];

/// "26SS-M", "25FW-X", "26S-I"
static SEASON_BRAND_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2}(?:SS|FW|S|F))-").expect("valid season brand regex")
});

/// "26SS", "25F"
static SEASON_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})(SS|FW|S|F)$").expect("valid season code regex"));

/// Normalize a season code to its short form.
///
/// # Examples
/// ```
/// use seasoncost::services::normalizer::normalize_season_code;
///
/// assert_eq!(normalize_season_code("26SS"), "26S");
/// assert_eq!(normalize_season_code("25FW"), "25F");
/// assert_eq!(normalize_season_code("25F"), "25F");
/// ```
pub fn normalize_season_code(season: &str) -> String {
    if let Some(stem) = season.strip_suffix("SS") {
        return format!("{}S", stem);
    }
    if let Some(stem) = season.strip_suffix("FW") {
        return format!("{}F", stem);
    }
    season.to_string()
}

/// Whether a raw season value belongs to the configured season `code`.
///
/// The code side is case-insensitive and accepts both long and short
/// forms; the raw value must match exactly after short-form normalization.
pub fn season_matches(season: &str, code: &str) -> bool {
    if season == code {
        return true;
    }
    let wanted = normalize_season_code(&code.to_uppercase());
    normalize_season_code(season) == wanted
}

/// Fold accessory categories (SHOES, BAG, HEADWEAR, ACC, ACC_ETC) into
/// `Acc_etc`; every other category is returned trimmed.
pub fn fold_category(category: &str) -> String {
    let trimmed = category.trim();
    match trimmed.to_uppercase().as_str() {
        "SHOES" | "BAG" | "HEADWEAR" | "ACC_ETC" | "ACC" => ACCESSORY_CATEGORY.to_string(),
        _ => trimmed.to_string(),
    }
}

/// FX table category for a product category: 의류 / 슈즈 / 용품
pub fn fx_category(category: &str) -> &'static str {
    let [apparel, shoes, goods] = FX_CATEGORIES;
    match category.trim().to_uppercase().as_str() {
        "SHOES" => shoes,
        "BAG" | "HEADWEAR" | "ACC_ETC" => goods,
        _ => apparel,
    }
}

/// Season prefix of a dashboard id: "26SS-M" → "26SS".
///
/// Ids without a season prefix ("KIDS-I", "ST") yield `None`.
pub fn season_from_brand_id(brand_id: &str) -> Option<String> {
    SEASON_BRAND_ID
        .captures(brand_id)
        .map(|caps| caps[1].to_string())
}

/// Same season one year earlier: "26SS" → "25SS", "25F" → "24F"
pub fn previous_season(season: &str) -> Option<String> {
    let upper = season.trim().to_uppercase();
    let caps = SEASON_CODE.captures(&upper)?;
    let year: u32 = caps[1].parse().ok()?;
    let prior = year.checked_sub(1)?;
    Some(format!("{:02}{}", prior, &caps[2]))
}

/// Extract the brand code from a dashboard id.
///
/// "26SS-M" → "M", "KIDS-I" → "I"; bare ids go through the alias table
/// ("KIDS" → "I", "DISCOVERY" → "X", "25FW" → "M").
pub fn brand_code(brand_id: &str) -> String {
    if let Some((_, code)) = brand_id.rsplit_once('-') {
        return code.to_string();
    }
    match brand_id {
        "KIDS" => "I".to_string(),
        "DISCOVERY" => "X".to_string(),
        "25FW" => "M".to_string(),
        other => other.to_string(),
    }
}
