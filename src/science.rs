//! Static research references for remedy categories.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvidenceLevel {
    Traditional,
    Preliminary,
    Clinical,
    WellEstablished,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScientificSource {
    pub title: &'static str,
    pub authors: &'static str,
    pub journal: &'static str,
    pub year: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScience {
    pub category: &'static str,
    pub scientific_sources: &'static [ScientificSource],
    pub contraindications: &'static [&'static str],
    pub drug_interactions: &'static [&'static str],
    pub pregnancy_warning: &'static str,
    pub max_dosage: &'static str,
    pub evidence_level: EvidenceLevel,
}

/// A remedy as stored by the caller; unknown fields pass through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemedyRecord {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedRemedy {
    #[serde(flatten)]
    pub remedy: RemedyRecord,
    pub scientific_sources: &'static [ScientificSource],
    pub contraindications: &'static [&'static str],
    pub drug_interactions: &'static [&'static str],
    pub pregnancy_warning: &'static str,
    pub max_dosage: &'static str,
    pub evidence_level: EvidenceLevel,
}

/// Science for a category, matched case-insensitively. Unknown or blank
/// categories get the general entry.
pub fn science_for(category: &str) -> &'static CategoryScience {
    let wanted = category.trim();
    CATEGORIES
        .iter()
        .find(|c| c.category.eq_ignore_ascii_case(wanted))
        .unwrap_or_else(|| {
            debug!("🔬 No science entry for category {:?}, using general", wanted);
            &GENERAL
        })
}

/// JSON keys `annotate` writes; stale copies on the input are replaced.
const SCIENCE_KEYS: [&str; 6] = [
    "scientificSources",
    "contraindications",
    "drugInteractions",
    "pregnancyWarning",
    "maxDosage",
    "evidenceLevel",
];

pub fn annotate(records: Vec<RemedyRecord>) -> Vec<AnnotatedRemedy> {
    records
        .into_iter()
        .map(|mut remedy| {
            remedy.extra.retain(|key, _| !SCIENCE_KEYS.contains(&key.as_str()));
            let science = science_for(&remedy.category);
            AnnotatedRemedy {
                remedy,
                scientific_sources: science.scientific_sources,
                contraindications: science.contraindications,
                drug_interactions: science.drug_interactions,
                pregnancy_warning: science.pregnancy_warning,
                max_dosage: science.max_dosage,
                evidence_level: science.evidence_level,
            }
        })
        .collect()
}

static GENERAL: CategoryScience = CategoryScience {
    category: "general",
    scientific_sources: &[ScientificSource {
        title: "Herbal medicine: biomolecular and clinical aspects",
        authors: "Benzie IFF, Wachtel-Galor S",
        journal: "CRC Press/Taylor & Francis",
        year: 2011,
        url: Some("https://www.ncbi.nlm.nih.gov/books/NBK92773/"),
    }],
    contraindications: &["Known allergy to any ingredient", "Serious or chronic illness without medical supervision"],
    drug_interactions: &["May interact with prescription medications; check with a pharmacist"],
    pregnancy_warning: "Consult your healthcare provider before use during pregnancy or breastfeeding.",
    max_dosage: "Follow product label directions; do not exceed the recommended dose.",
    evidence_level: EvidenceLevel::Traditional,
};

static CATEGORIES: [CategoryScience; 6] = [
    CategoryScience {
        category: "digestive",
        scientific_sources: &[
            ScientificSource {
                title: "Ginger in gastrointestinal disorders: a systematic review of clinical trials",
                authors: "Nikkhah Bodagh M, Maleki I, Hekmatdoost A",
                journal: "Food Science & Nutrition",
                year: 2019,
                url: Some("https://doi.org/10.1002/fsn3.807"),
            },
            ScientificSource {
                title: "Peppermint oil for irritable bowel syndrome: a systematic review and meta-analysis",
                authors: "Alammar N, Wang L, Saberi B, et al.",
                journal: "BMC Complementary and Alternative Medicine",
                year: 2019,
                url: Some("https://doi.org/10.1186/s12906-018-2409-0"),
            },
        ],
        contraindications: &["Gallstones", "Gastroesophageal reflux disease (peppermint)", "Bleeding disorders (high-dose ginger)"],
        drug_interactions: &["Anticoagulants such as warfarin", "Antacids and acid reducers"],
        pregnancy_warning: "Ginger is generally considered safe in food amounts; avoid concentrated extracts without medical advice.",
        max_dosage: "Ginger up to 4 g daily; enteric-coated peppermint oil 0.2-0.4 ml three times daily.",
        evidence_level: EvidenceLevel::Clinical,
    },
    CategoryScience {
        category: "sleep",
        scientific_sources: &[
            ScientificSource {
                title: "Valerian for sleep: a systematic review and meta-analysis",
                authors: "Bent S, Padula A, Moore D, Patterson M, Mehling W",
                journal: "The American Journal of Medicine",
                year: 2006,
                url: Some("https://doi.org/10.1016/j.amjmed.2006.02.026"),
            },
            ScientificSource {
                title: "Chamomile (Matricaria recutita) may provide antianxiety activity",
                authors: "Amsterdam JD, Li Y, Soeller I, et al.",
                journal: "Journal of Clinical Psychopharmacology",
                year: 2009,
                url: None,
            },
        ],
        contraindications: &["Liver disease (valerian)", "Allergy to plants in the daisy family (chamomile)"],
        drug_interactions: &["Sedatives and benzodiazepines", "Alcohol", "Antihistamines that cause drowsiness"],
        pregnancy_warning: "Avoid valerian during pregnancy and breastfeeding; safety has not been established.",
        max_dosage: "Valerian root extract 300-600 mg taken 30 minutes to 2 hours before bed.",
        evidence_level: EvidenceLevel::Preliminary,
    },
    CategoryScience {
        category: "stress",
        scientific_sources: &[ScientificSource {
            title: "A prospective, randomized double-blind, placebo-controlled study of safety and efficacy of a high-concentration full-spectrum extract of ashwagandha root in reducing stress and anxiety in adults",
            authors: "Chandrasekhar K, Kapoor J, Anishetty S",
            journal: "Indian Journal of Psychological Medicine",
            year: 2012,
            url: Some("https://doi.org/10.4103/0253-7176.106022"),
        }],
        contraindications: &["Hyperthyroidism", "Autoimmune conditions", "Scheduled surgery within two weeks"],
        drug_interactions: &["Thyroid hormone medication", "Immunosuppressants", "Sedatives"],
        pregnancy_warning: "Ashwagandha is not recommended during pregnancy.",
        max_dosage: "Ashwagandha root extract 300 mg twice daily.",
        evidence_level: EvidenceLevel::Clinical,
    },
    CategoryScience {
        category: "immune",
        scientific_sources: &[
            ScientificSource {
                title: "Echinacea for preventing and treating the common cold",
                authors: "Karsch-Völk M, Barrett B, Kiefer D, et al.",
                journal: "Cochrane Database of Systematic Reviews",
                year: 2014,
                url: Some("https://doi.org/10.1002/14651858.CD000530.pub3"),
            },
            ScientificSource {
                title: "Elderberry supplementation reduces cold duration and symptoms in air-travellers",
                authors: "Tiralongo E, Wee SS, Lea RA",
                journal: "Nutrients",
                year: 2016,
                url: Some("https://doi.org/10.3390/nu8040182"),
            },
        ],
        contraindications: &["Autoimmune disorders", "Allergy to plants in the daisy family (echinacea)"],
        drug_interactions: &["Immunosuppressants", "Medications metabolized by CYP3A4"],
        pregnancy_warning: "Short-term echinacea use appears low risk, but consult your provider first.",
        max_dosage: "Echinacea extract up to 10 days of continuous use; elderberry syrup 15 ml up to four times daily.",
        evidence_level: EvidenceLevel::Preliminary,
    },
    CategoryScience {
        category: "skin",
        scientific_sources: &[ScientificSource {
            title: "Aloe vera: a short review",
            authors: "Surjushe A, Vasani R, Saple DG",
            journal: "Indian Journal of Dermatology",
            year: 2008,
            url: Some("https://doi.org/10.4103/0019-5154.44785"),
        }],
        contraindications: &["Open or infected wounds", "Known allergy to the plant"],
        drug_interactions: &["Topical steroids may change absorption"],
        pregnancy_warning: "Topical use is generally considered safe; avoid oral aloe latex during pregnancy.",
        max_dosage: "Apply a thin layer to the skin up to three times daily after a patch test.",
        evidence_level: EvidenceLevel::Traditional,
    },
    CategoryScience {
        category: "anti-inflammatory",
        scientific_sources: &[ScientificSource {
            title: "Curcumin: a review of its effects on human health",
            authors: "Hewlings SJ, Kalman DS",
            journal: "Foods",
            year: 2017,
            url: Some("https://doi.org/10.3390/foods6100092"),
        }],
        contraindications: &["Gallbladder disease", "Bleeding disorders", "Iron deficiency"],
        drug_interactions: &["Anticoagulants and antiplatelet drugs", "Diabetes medications"],
        pregnancy_warning: "Turmeric is safe in food amounts; avoid supplements during pregnancy.",
        max_dosage: "Curcumin 500-2000 mg daily with food and black pepper.",
        evidence_level: EvidenceLevel::WellEstablished,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn lookup_ignores_case_and_whitespace() {
        assert_eq!(science_for("Sleep").category, "sleep");
        assert_eq!(science_for("  DIGESTIVE ").category, "digestive");
    }

    #[test]
    fn unknown_categories_use_general() {
        assert_eq!(science_for("astrology").category, "general");
        assert_eq!(science_for("").category, "general");
    }

    #[test]
    fn every_category_has_sources() {
        for science in CATEGORIES.iter().chain(std::iter::once(&GENERAL)) {
            assert!(!science.scientific_sources.is_empty(), "{}", science.category);
            assert!(!science.max_dosage.is_empty());
        }
    }

    #[test]
    fn annotation_copies_science_and_keeps_extra_fields() {
        let records: Vec<RemedyRecord> = serde_json::from_value(json!([
            { "name": "Ginger Tea", "category": "Digestive", "slug": "ginger-tea" },
            { "name": "Mystery Tonic", "category": "unknown" }
        ]))
        .unwrap();

        let annotated = annotate(records);
        assert_eq!(annotated.len(), 2);
        assert_eq!(annotated[0].scientific_sources, science_for("digestive").scientific_sources);
        assert_eq!(annotated[1].evidence_level, EvidenceLevel::Traditional);

        let value = serde_json::to_value(&annotated[0]).unwrap();
        assert_eq!(value["slug"], json!("ginger-tea"));
        assert_eq!(value["category"], json!("Digestive"));
        assert_eq!(value["evidenceLevel"], json!("clinical"));
        assert!(value["scientificSources"][0]["year"].is_number());
        assert!(value["pregnancyWarning"].is_string());
    }

    #[test]
    fn annotating_twice_replaces_science_fields() {
        let records: Vec<RemedyRecord> = serde_json::from_value(json!([
            { "name": "Ginger", "category": "digestive", "evidenceLevel": "traditional" }
        ]))
        .unwrap();
        let once = serde_json::to_value(annotate(records)).unwrap();
        let again: Vec<RemedyRecord> = serde_json::from_value(once.clone()).unwrap();
        let twice = serde_json::to_string(&annotate(again)).unwrap();

        for key in SCIENCE_KEYS {
            assert_eq!(twice.matches(&format!("\"{key}\"")).count(), 1, "{key} in {twice}");
        }
        let twice: serde_json::Value = serde_json::from_str(&twice).unwrap();
        assert_eq!(twice, once);
        assert_eq!(twice[0]["evidenceLevel"], json!("clinical"));
    }

    #[test]
    fn evidence_levels_serialize_in_kebab_case() {
        assert_eq!(serde_json::to_value(EvidenceLevel::WellEstablished).unwrap(), json!("well-established"));
    }
}
