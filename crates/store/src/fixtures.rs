//! Deterministic seed catalog.
//!
//! Used by tests, `regimen catalog --seed`, and the interactive quiz when no
//! catalog file is configured. Tags are chosen so every quiz goal has at
//! least one matching listing.

use rust_decimal::Decimal;

use regimen_core::{Product, ProductId};

struct ProductSeed {
    id: &'static str,
    name: &'static str,
    use_case: &'static str,
    injection_site: &'static str,
    description: &'static str,
    tags: &'static [&'static str],
    price_cents: i64,
    dosage: &'static str,
    cycle_length: &'static str,
}

const PRODUCT_SEEDS: &[ProductSeed] = &[
    ProductSeed {
        id: "bpc-157",
        name: "BPC-157",
        use_case: "Healing & Recovery",
        injection_site: "Subcutaneous, near injury site",
        description: "Body protection compound studied for soft-tissue and gut repair.",
        tags: &["healing", "recovery", "injury"],
        price_cents: 6_499,
        dosage: "250-500mcg daily",
        cycle_length: "4-8 weeks",
    },
    ProductSeed {
        id: "tb-500",
        name: "TB-500",
        use_case: "Healing & Recovery",
        injection_site: "Subcutaneous, abdomen",
        description: "Thymosin beta-4 fragment associated with tissue regeneration.",
        tags: &["healing", "recovery", "regeneration"],
        price_cents: 8_999,
        dosage: "2-2.5mg twice weekly",
        cycle_length: "4-6 weeks",
    },
    ProductSeed {
        id: "semaglutide",
        name: "Semaglutide",
        use_case: "Weight Management",
        injection_site: "Subcutaneous, abdomen or thigh",
        description: "GLP-1 receptor agonist used for appetite and weight control.",
        tags: &["fat loss", "weight loss"],
        price_cents: 24_999,
        dosage: "0.25-2.4mg weekly",
        cycle_length: "12+ weeks",
    },
    ProductSeed {
        id: "aod-9604",
        name: "AOD-9604",
        use_case: "Fat Loss",
        injection_site: "Subcutaneous, abdomen",
        description: "Modified GH fragment targeting lipolysis without GH side effects.",
        tags: &["fat loss", "stubborn fat", "weight loss"],
        price_cents: 12_999,
        dosage: "300mcg daily",
        cycle_length: "8-12 weeks",
    },
    ProductSeed {
        id: "cjc-1295",
        name: "CJC-1295",
        use_case: "Muscle Growth",
        injection_site: "Subcutaneous, abdomen",
        description: "GHRH analog that raises growth hormone and IGF-1 levels.",
        tags: &["gh", "muscle", "growth", "anti-aging"],
        price_cents: 11_999,
        dosage: "1-2mg weekly",
        cycle_length: "8-12 weeks",
    },
    ProductSeed {
        id: "ipamorelin",
        name: "Ipamorelin",
        use_case: "Muscle Growth",
        injection_site: "Subcutaneous, abdomen",
        description: "Selective GH secretagogue favored for lean muscle support.",
        tags: &["gh", "muscle", "growth", "recovery"],
        price_cents: 9_999,
        dosage: "200-300mcg daily",
        cycle_length: "8-12 weeks",
    },
    ProductSeed {
        id: "ghrp-2",
        name: "GHRP-2",
        use_case: "Energy & Performance",
        injection_site: "Subcutaneous, abdomen",
        description: "GH-releasing peptide used for strength and performance support.",
        tags: &["gh", "performance", "strength"],
        price_cents: 7_999,
        dosage: "100-300mcg 2-3x daily",
        cycle_length: "6-8 weeks",
    },
    ProductSeed {
        id: "pt-141",
        name: "PT-141",
        use_case: "Libido Enhancement",
        injection_site: "Subcutaneous, abdomen or thigh",
        description: "Melanocortin agonist studied for sexual arousal in men and women.",
        tags: &["libido", "sexual health", "arousal"],
        price_cents: 7_999,
        dosage: "1-2mg as needed",
        cycle_length: "As needed",
    },
    ProductSeed {
        id: "epithalon",
        name: "Epithalon",
        use_case: "Anti-Aging",
        injection_site: "Subcutaneous, abdomen",
        description: "Telomerase-activating tetrapeptide studied for longevity markers.",
        tags: &["anti-aging", "longevity"],
        price_cents: 10_999,
        dosage: "5-10mg daily",
        cycle_length: "10-20 days",
    },
    ProductSeed {
        id: "ghk-cu",
        name: "GHK-Cu",
        use_case: "Anti-Aging",
        injection_site: "Subcutaneous, site of concern",
        description: "Copper peptide associated with skin repair and regeneration.",
        tags: &["anti-aging", "healing", "regeneration"],
        price_cents: 6_999,
        dosage: "1-2mg daily",
        cycle_length: "4-6 weeks",
    },
];

pub fn seed_catalog() -> Vec<Product> {
    PRODUCT_SEEDS
        .iter()
        .map(|seed| Product {
            id: ProductId(seed.id.to_string()),
            name: seed.name.to_string(),
            use_case: seed.use_case.to_string(),
            injection_site: seed.injection_site.to_string(),
            description: seed.description.to_string(),
            tags: seed.tags.iter().map(|tag| tag.to_string()).collect(),
            price: Decimal::new(seed.price_cents, 2),
            dosage: seed.dosage.to_string(),
            cycle_length: seed.cycle_length.to_string(),
            image: None,
            stock_quantity: 100,
            active: true,
        })
        .collect()
}
