use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Flag names and their keywords, in column order.
pub const DEFAULT_KEYWORDS: [(&str, &[&str]); 14] = [
    ("quarantine", &["quarantine"]),
    ("movement_control", &["movement control"]),
    ("stamping_out", &["stamping out"]),
    ("disinfection", &["disinfection"]),
    ("surveillance", &["surveillance"]),
    ("screening", &["screening"]),
    ("disposal", &["disposal", "carcasses", "waste"]),
    ("vaccination", &["vaccination"]),
    ("zoning", &["zoning"]),
    ("vector_control", &["vector"]),
    ("wildlife_control", &["wildlife"]),
    ("traceability", &["traceability"]),
    ("treatment", &["treatment"]),
    ("slaughter", &["slaughter"]),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagKeywords {
    pub name: String,
    pub keywords: Vec<String>,
}

impl FlagKeywords {
    /// True if any keyword occurs in the (already lowercased) measure name.
    pub fn matches(&self, measure_name: &str) -> bool {
        self.keywords.iter().any(|k| measure_name.contains(k.as_str()))
    }
}

/// Keyword table driving intervention flag derivation.
///
/// Loaded from TOML as a list of `[[flag]]` tables:
///
/// ```toml
/// [[flag]]
/// name = "quarantine"
/// keywords = ["quarantine", "isolation"]
/// ```
///
/// The flag set and order are fixed by the CSV layout; only keywords may change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTable {
    #[serde(rename = "flag")]
    pub flags: Vec<FlagKeywords>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        let flags = DEFAULT_KEYWORDS
            .iter()
            .map(|(name, keywords)| FlagKeywords {
                name: name.to_string(),
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
            })
            .collect();
        Self { flags }
    }
}

impl KeywordTable {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut table: KeywordTable = toml::from_str(content)?;
        for flag in &mut table.flags {
            for keyword in &mut flag.keywords {
                *keyword = keyword.to_lowercase();
            }
        }
        table.validate()?;
        Ok(table)
    }
}

impl Validate for KeywordTable {
    fn validate(&self) -> Result<()> {
        let names: Vec<&str> = self.flags.iter().map(|f| f.name.as_str()).collect();
        let expected: Vec<&str> = DEFAULT_KEYWORDS.iter().map(|(name, _)| *name).collect();
        if names != expected {
            return Err(EtlError::InvalidConfigValue {
                field: "flag".to_string(),
                value: names.join(","),
                reason: format!("Flags must be exactly, in order: {}", expected.join(",")),
            });
        }

        for flag in &self.flags {
            if flag.keywords.is_empty() {
                return Err(EtlError::InvalidConfigValue {
                    field: format!("flag.{}.keywords", flag.name),
                    value: String::new(),
                    reason: "At least one keyword is required".to_string(),
                });
            }
            for keyword in &flag.keywords {
                validate_non_empty_string(&format!("flag.{}.keywords", flag.name), keyword)?;
            }
        }

        Ok(())
    }
}
