//! Keyword-bucket category engine
//!
//! Fallback when no deterministic rule fires. Explanation text outranks OCR
//! text, which outranks the vendor name.

use super::{norm, RuleHit};

/// Keyword buckets, in tie-break order
pub static KEYWORDS: &[(&str, &[&str])] = &[
    ("Fuel", &["fuel", "gas", "gasoline", "diesel", "pump", "shell", "exxon", "chevron", "bp", "sunoco"]),
    (
        "Car & Truck",
        &[
            "autozone", "auto zone", "advance auto", "o'reilly", "oreilly", "tires", "tire",
            "oil change", "brake", "battery", "wiper", "alignment",
        ],
    ),
    (
        "Office Supplies",
        &["office", "staples", "paper", "printer", "ink", "toner", "notebook", "pens", "post-it"],
    ),
    (
        "Software & Subscriptions",
        &[
            "subscription", "saas", "software", "monthly", "annual", "stripe", "quickbooks", "adobe",
            "microsoft 365", "google workspace", "aws", "azure", "gcp", "dropbox", "notion",
        ],
    ),
    ("Supplies", &["supplies", "supply", "inventory", "restock", "materials"]),
    ("Repairs & Maintenance", &["repair", "maintenance", "service", "labor", "parts", "fix", "replace"]),
    (
        "Equipment",
        &["equipment", "tool", "tools", "machine", "hardware", "laptop", "computer", "monitor", "router"],
    ),
    (
        "Advertising & Marketing",
        &["marketing", "advertising", "ads", "facebook ads", "google ads", "promotion", "sponsor"],
    ),
    (
        "Meals",
        &[
            "restaurant", "meal", "lunch", "dinner", "breakfast", "cafe", "coffee", "starbucks",
            "mcdonald", "subway", "doordash", "uber eats",
        ],
    ),
    (
        "Travel",
        &["hotel", "airbnb", "flight", "airline", "uber", "lyft", "taxi", "rental car", "parking", "toll"],
    ),
    (
        "Utilities",
        &["electric", "water", "internet", "wifi", "utility", "phone bill", "verizon", "at&t", "t-mobile"],
    ),
    ("Insurance", &["insurance", "premium", "policy"]),
    ("Rent", &["rent", "lease"]),
    ("Bank Fees", &["fee", "service charge", "overdraft", "wire fee", "atm fee"]),
];

/// Per business type, explanation keywords that strongly imply a category
pub static BUSINESS_TYPE_HINTS: &[(&str, &[(&str, &[&str])])] = &[
    (
        "realtor",
        &[
            ("Advertising & Marketing", &["listing", "mls", "open house", "staging", "sign", "flyer"]),
            ("Travel", &["showing", "client meeting"]),
        ],
    ),
    (
        "contractor",
        &[
            ("Supplies", &["lumber", "drywall", "concrete", "paint", "tile", "hardware"]),
            ("Equipment", &["drill", "saw", "compressor"]),
        ],
    ),
    (
        "food",
        &[
            ("Supplies", &["ingredients", "produce", "meat", "dairy"]),
            ("Equipment", &["oven", "mixer", "fridge"]),
        ],
    ),
];

/// Bucket with the most keyword hits; earlier buckets win ties
fn match_bucket(text: &str) -> Option<&'static str> {
    if text.is_empty() {
        return None;
    }

    let mut best: Option<(&'static str, usize)> = None;
    for (category, keywords) in KEYWORDS {
        let hits = keywords.iter().filter(|kw| text.contains(*kw)).count();
        if hits > 0 && best.map_or(true, |(_, b)| hits > b) {
            best = Some((category, hits));
        }
    }
    best.map(|(category, _)| category)
}

fn hint_for(business_type: &str, explanation: &str) -> Option<&'static str> {
    let (_, hints) = BUSINESS_TYPE_HINTS.iter().find(|(bt, _)| *bt == business_type)?;
    hints
        .iter()
        .find(|(_, kws)| kws.iter().any(|k| explanation.contains(&norm(k))))
        .map(|(category, _)| *category)
}

pub fn suggest_category(
    vendor: Option<&str>,
    ocr_text: Option<&str>,
    explanation: Option<&str>,
    business_type: Option<&str>,
) -> Option<RuleHit> {
    let v = norm(vendor.unwrap_or_default());
    let t = norm(ocr_text.unwrap_or_default());
    let e = norm(explanation.unwrap_or_default());
    let bt = norm(business_type.unwrap_or_default());

    let hit = |category: &str, confidence: f64, reasoning: String| RuleHit {
        category: category.to_string(),
        confidence,
        reasoning,
    };

    if !e.is_empty() {
        if let Some(category) = hint_for(&bt, &e) {
            return Some(hit(
                category,
                0.90,
                format!(
                    "Matched business_type='{}' hint in explanation",
                    business_type.unwrap_or_default()
                ),
            ));
        }
    }

    if let Some(category) = match_bucket(&e) {
        return Some(hit(
            category,
            0.85,
            "Matched keywords in explanation (highest priority)".to_string(),
        ));
    }
    if let Some(category) = match_bucket(&t) {
        return Some(hit(category, 0.70, "Matched keywords in OCR text".to_string()));
    }
    if let Some(category) = match_bucket(&v) {
        return Some(hit(category, 0.60, "Matched keywords in vendor".to_string()));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_counts_hits() {
        assert_eq!(match_bucket("hotel parking and taxi"), Some("Travel"));
        assert_eq!(match_bucket("nothing here"), None);
    }

    #[test]
    fn test_bucket_tie_prefers_earlier_category() {
        // one Fuel hit ("diesel"), one Meals hit ("lunch")
        assert_eq!(match_bucket("diesel lunch"), Some("Fuel"));
    }

    #[test]
    fn test_business_hint_in_explanation() {
        let hit = suggest_category(None, None, Some("Open house flyers"), Some("Realtor")).unwrap();
        assert_eq!(hit.category, "Advertising & Marketing");
        assert_eq!(hit.confidence, 0.90);
        assert_eq!(hit.reasoning, "Matched business_type='Realtor' hint in explanation");
    }

    #[test]
    fn test_hints_cover_realtor_contractor_food_only() {
        let hit = suggest_category(None, None, Some("bulk produce order"), Some("food")).unwrap();
        assert_eq!(hit.category, "Supplies");
        assert_eq!(hit.confidence, 0.90);

        // Hint words outside the table fall through to the keyword buckets
        let hit = suggest_category(None, None, Some("new ladder"), Some("contractor"));
        assert!(hit.is_none());
        let hit = suggest_category(None, None, Some("spark plug and rotor"), Some("mechanic"));
        assert!(hit.is_none());

        let hit = suggest_category(None, None, Some("zillow listing boost"), Some("realtor")).unwrap();
        assert_eq!(hit.category, "Advertising & Marketing");
    }

    #[test]
    fn test_vendor_is_last_resort() {
        let hit = suggest_category(Some("Joe's Coffee Hut"), Some("#### 12"), None, None).unwrap();
        assert_eq!(hit.category, "Meals");
        assert_eq!(hit.reasoning, "Matched keywords in vendor");
    }
}
