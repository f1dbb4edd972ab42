//! Super-category classification over the vendor's free-text category paths.

/// Keyword table mapping store sections to super categories.
///
/// Groups are evaluated in declaration order and the first group with any
/// keyword contained in the lower-cased input wins, so both the group order
/// and the keyword order are load-bearing for reproducible output.
pub const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Kitchen & Cooking",
        &[
            "fry", "cook", "pan", "pot", "knife", "cutlery", "baking", "kitchen",
            "toaster", "kettle", "coffee", "blender", "mixer", "food processor",
            "microwave", "soda", "nespresso", "mug", "glass", "dinner", "plate",
            "bowl", "serve", "napkin", "tablecloth", "crockpot", "breville",
            "delonghi", "kenwood", "zip", "russell hobbs", "sunbeam", "ninja",
            "appliance",
        ],
    ),
    (
        "Bedroom & Bedding",
        &[
            "bed", "sheet", "pillow", "quilt", "duvet", "blanket", "mattress",
            "protector", "coverlet", "valance", "headboard",
        ],
    ),
    (
        "Bathroom & Laundry",
        &[
            "towel", "bath", "mat", "scale", "toilet", "laundry", "iron",
            "hamper", "basket", "shower", "face cloth", "robe",
        ],
    ),
    (
        "Home Decor & Living",
        &[
            "rug", "cushion", "throw", "curtain", "blind", "lamp", "mirror",
            "vase", "candle", "decor", "clock", "frame", "furniture", "chair",
            "table", "ottoman", "storage", "bin", "heater", "fan", "dehumidifier",
        ],
    ),
    (
        "Electrical & Personal Care",
        &[
            "vacuum", "cleaner", "purifier", "hair", "shaver", "grooming",
            "massager", "electric blanket", "tooth", "remington", "vs sassoon",
            "braun", "philips", "oral b",
        ],
    ),
    (
        "Travel & Luggage",
        &[
            "suit", "case", "luggage", "bag", "travel", "adapter", "neck",
            "samsonite", "american tourister",
        ],
    ),
    (
        "Outdoor & Leisure",
        &["bbq", "picnic", "outdoor", "camping", "beach", "cooler", "chilly"],
    ),
];

/// Label for categories no keyword group claims.
pub const NO_MATCH_LABEL: &str = "Other / Brands";

/// Label for records with no category at all.
pub const MISSING_LABEL: &str = "Other";

/// First segment of the vendor category path (segments are ";;"-separated),
/// trimmed. Missing, blank, or literal "nan" cells become "Other".
pub fn specific_category(raw: Option<&str>) -> String {
    let first = raw
        .and_then(|s| s.split(";;").next())
        .map(str::trim)
        .unwrap_or("");
    if first.is_empty() || first.eq_ignore_ascii_case("nan") {
        MISSING_LABEL.to_string()
    } else {
        first.to_string()
    }
}

/// Classify a category string into exactly one super category.
///
/// Linear first-match-wins scan over [`CATEGORY_KEYWORDS`]; keyword sets may
/// overlap across groups and declaration order is the tie-break. A pure
/// function of its input.
pub fn super_category(category: Option<&str>) -> &'static str {
    let Some(category) = category else {
        return MISSING_LABEL;
    };
    let lower = category.to_lowercase();
    for (label, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|keyword| lower.contains(keyword)) {
            return label;
        }
    }
    NO_MATCH_LABEL
}
