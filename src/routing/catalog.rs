// Catalog - static category, subcategory and keyword tables

use super::types::CategoryId;
use super::types::CategoryId::{Carpenter, Electrician, Mechanic, MensGrooming, Plumber, WomenGrooming};

/// Subcategory display names offered under a category, in display order
pub fn subcategories(category: CategoryId) -> &'static [&'static str] {
    match category {
        CategoryId::Plumber => &[
            "Tape Repair",
            "Leak Fixing",
            "Pipe Installation",
            "Drain Cleaning",
            "Toilet Repair",
            "Water Heater Repair",
        ],
        CategoryId::Electrician => &[
            "Electrical Repair",
            "Wiring Installation",
            "Switch & Socket Repair",
            "Fan Installation",
            "Light Installation",
            "MCB or Fuse Repair",
        ],
        CategoryId::Carpenter => &[
            "Wood Work",
            "Furniture Assembly",
            "Door/Window Repair",
            "Cabinet Installation",
            "Custom Shelves",
        ],
        CategoryId::Mechanic => &["Car Service", "Bike Service", "Emergency Service", "Tire Change"],
        CategoryId::MensGrooming => &["Haircut", "Shaving", "Facial", "Hair Color", "Massage"],
        CategoryId::WomenGrooming => &["Facial", "Hair Color", "Body Massage"],
    }
}

/// Keyword fallback table, scanned in order.
///
/// "facial", "hair color" and "haircolour" are listed once, at their
/// men's-grooming position, but resolve to women's grooming: the table this
/// replaces assigned them twice and the later assignment won.
pub static KEYWORDS: &[(&str, CategoryId)] = &[
    // Plumber
    ("plumber", Plumber),
    ("plumbing", Plumber),
    ("tap", Plumber),
    ("tape", Plumber),
    ("leak", Plumber),
    ("pipe", Plumber),
    ("drain", Plumber),
    ("toilet", Plumber),
    ("water heater", Plumber),
    ("geyser", Plumber),
    ("faucet", Plumber),
    ("sink", Plumber),
    ("shower", Plumber),
    ("bathroom", Plumber),
    ("kitchen", Plumber),
    ("water", Plumber),
    // Electrician
    ("electrician", Electrician),
    ("electrical", Electrician),
    ("wire", Electrician),
    ("wiring", Electrician),
    ("switch", Electrician),
    ("socket", Electrician),
    ("fan", Electrician),
    ("light", Electrician),
    ("mcb", Electrician),
    ("fuse", Electrician),
    ("circuit", Electrician),
    ("power", Electrician),
    ("voltage", Electrician),
    ("outlet", Electrician),
    ("bulb", Electrician),
    ("lamp", Electrician),
    // Carpenter
    ("carpenter", Carpenter),
    ("carpentry", Carpenter),
    ("wood", Carpenter),
    ("furniture", Carpenter),
    ("cabinet", Carpenter),
    ("shelf", Carpenter),
    ("shelves", Carpenter),
    ("window", Carpenter),
    ("door", Carpenter),
    ("table", Carpenter),
    ("chair", Carpenter),
    ("bed", Carpenter),
    ("wardrobe", Carpenter),
    ("wooden", Carpenter),
    ("assembly", Carpenter),
    // Mechanic
    ("mechanic", Mechanic),
    ("car", Mechanic),
    ("bike", Mechanic),
    ("vehicle", Mechanic),
    ("engine", Mechanic),
    ("tire", Mechanic),
    ("tyre", Mechanic),
    ("brake", Mechanic),
    ("service", Mechanic),
    ("automobile", Mechanic),
    ("motorcycle", Mechanic),
    ("scooter", Mechanic),
    ("oil", Mechanic),
    ("battery", Mechanic),
    ("clutch", Mechanic),
    ("gearbox", Mechanic),
    ("emergency", Mechanic),
    // Men's grooming
    ("mens_grooming", MensGrooming),
    ("men_grooming", MensGrooming),
    ("haircut", MensGrooming),
    ("shaving", MensGrooming),
    ("beard", MensGrooming),
    ("massage", MensGrooming),
    ("barber", MensGrooming),
    ("hair", MensGrooming),
    ("facial", WomenGrooming),
    ("trim", MensGrooming),
    ("grooming", MensGrooming),
    ("hair color", WomenGrooming),
    ("haircolour", WomenGrooming),
    // Women's grooming
    ("women_grooming", WomenGrooming),
    ("salon", WomenGrooming),
    ("beauty", WomenGrooming),
    ("spa", WomenGrooming),
    ("makeup", WomenGrooming),
    ("manicure", WomenGrooming),
    ("pedicure", WomenGrooming),
    ("waxing", WomenGrooming),
    ("threading", WomenGrooming),
    ("body massage", WomenGrooming),
];

/// Backend enum tokens for subcategory display names.
///
/// Spellings follow the backend's enum, typos included.
static SUBCATEGORY_ENUMS: &[(&str, &str)] = &[
    // Plumber
    ("Tape Repair", "tape_repair"),
    ("Leak Fixing", "leak_fixing"),
    ("Pipe Installation", "pipe_installation"),
    ("Drain Cleaning", "drain_cleaning"),
    ("Toilet Repair", "toilet_repair"),
    ("Water Heater Repair", "water_repair"),
    // Electrician
    ("Electrical Repair", "electrical_repair"),
    ("Wiring Installation", "wiring_installation"),
    ("Switch & Socket Repair", "switch_and_socket_repair"),
    ("Fan Installation", "fan_installation"),
    ("Light Installation", "light_installation"),
    ("MCB or Fuse Repair", "mcb_or_fuse_repair"),
    // Carpenter
    ("Wood Work", "wood_work"),
    ("Furniture Assembly", "furniture_assembly"),
    ("Door/Window Repair", "window_repair"),
    ("Cabinet Installation", "cabinate_installation"),
    ("Custom Shelves", "custom_shelves"),
    // Mechanic
    ("Car Service", "car_service"),
    ("Bike Service", "bike_service"),
    ("Emergency Service", "emergency_service"),
    ("Tire Change", "tire_change"),
    // Men's grooming
    ("Haircut", "haircut"),
    ("Shaving", "saving"),
    ("Facial", "facial"),
    ("Hair Color", "hair_color"),
    ("Massage", "full_body_massage"),
    // Women's grooming
    ("Body Massage", "body_massage"),
];

/// Convert a subcategory display name into the backend enum token
pub fn subcategory_enum(display_name: &str) -> String {
    SUBCATEGORY_ENUMS
        .iter()
        .find(|(name, _)| *name == display_name)
        .map(|(_, token)| token.to_string())
        .unwrap_or_else(|| display_name.to_lowercase().replace(' ', "_"))
}

/// Category list in the `- Name (id)` form used by the classification prompt
pub fn category_listing() -> String {
    CategoryId::ALL
        .iter()
        .map(|c| format!("- {} ({})", c.name(), c.as_str()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_category_has_subcategories() {
        for category in CategoryId::ALL {
            assert!(!subcategories(category).is_empty(), "{category} has no subcategories");
        }
    }

    #[test]
    fn test_keywords_are_unique_and_lowercase() {
        let mut seen = HashSet::new();
        for (keyword, _) in KEYWORDS {
            assert_eq!(*keyword, keyword.to_lowercase());
            assert!(seen.insert(*keyword), "duplicate keyword {keyword}");
        }
    }

    #[test]
    fn test_shared_grooming_keywords_resolve_to_women() {
        let lookup = |k: &str| KEYWORDS.iter().find(|(kw, _)| *kw == k).map(|(_, c)| *c);
        assert_eq!(lookup("facial"), Some(WomenGrooming));
        assert_eq!(lookup("hair color"), Some(WomenGrooming));
        assert_eq!(lookup("haircolour"), Some(WomenGrooming));
        assert_eq!(lookup("haircut"), Some(MensGrooming));
    }

    #[test]
    fn test_subcategory_enum_mapping() {
        assert_eq!(subcategory_enum("Leak Fixing"), "leak_fixing");
        assert_eq!(subcategory_enum("Shaving"), "saving");
        assert_eq!(subcategory_enum("Cabinet Installation"), "cabinate_installation");
        assert_eq!(subcategory_enum("Door/Window Repair"), "window_repair");
        assert_eq!(subcategory_enum("Massage"), "full_body_massage");
    }

    #[test]
    fn test_subcategory_enum_slug_fallback() {
        assert_eq!(subcategory_enum("Gutter Cleaning"), "gutter_cleaning");
        assert_eq!(subcategory_enum("AC Repair"), "ac_repair");
    }

    #[test]
    fn test_category_listing() {
        let listing = category_listing();
        assert!(listing.starts_with("- Plumber (plumber)"));
        assert!(listing.contains("- Men's Grooming (mens_grooming)"));
        assert_eq!(listing.lines().count(), 6);
    }
}
