//! Skill alias table and writing-quality vocabularies
//!
//! Both are loaded once (from the built-in JSON resources or from files named in
//! the configuration), validated, and then shared read-only between components.

use crate::config::VocabularyConfig;
use crate::error::{AtsError, Result};
use log::{debug, info};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

const BUILTIN_ALIAS_TABLE: &str = include_str!("../../data/skill_aliases.json");
const BUILTIN_VOCABULARY: &str = include_str!("../../data/vocabulary.json");

/// One canonical skill and the lowercase spellings that map to it
#[derive(Debug, Clone, PartialEq)]
pub struct AliasEntry {
    pub canonical: String,
    pub aliases: Vec<String>,
}

/// Canonical skill names and their aliases, in file order.
///
/// Every alias (and every canonical name, lowercased) resolves to exactly one
/// canonical entry; a table violating that is rejected at construction.
#[derive(Debug, Clone)]
pub struct AliasTable {
    entries: Vec<AliasEntry>,
    lookup: HashMap<String, usize>,
    alias_keys: Vec<String>,
    alias_owner: Vec<usize>,
}

impl AliasTable {
    pub fn new(raw: Vec<(String, Vec<String>)>) -> Result<Self> {
        if raw.is_empty() {
            return Err(AtsError::Vocabulary("alias table is empty".to_string()));
        }

        let mut entries = Vec::with_capacity(raw.len());
        let mut lookup: HashMap<String, usize> = HashMap::new();
        let mut alias_keys = Vec::new();
        let mut alias_owner = Vec::new();

        for (index, (canonical, aliases)) in raw.into_iter().enumerate() {
            let canonical = canonical.trim().to_string();
            if canonical.is_empty() {
                return Err(AtsError::Vocabulary("alias table has an empty canonical name".to_string()));
            }

            // The canonical spelling always counts as one of its own aliases
            let mut normalized: Vec<String> = Vec::with_capacity(aliases.len() + 1);
            for alias in std::iter::once(canonical.to_lowercase())
                .chain(aliases.iter().map(|a| a.trim().to_lowercase()))
            {
                if alias.is_empty() {
                    return Err(AtsError::Vocabulary(format!("empty alias under '{}'", canonical)));
                }
                if !normalized.contains(&alias) {
                    normalized.push(alias);
                }
            }

            for alias in &normalized {
                if let Some(&owner) = lookup.get(alias) {
                    if owner != index {
                        return Err(AtsError::Vocabulary(format!(
                            "alias '{}' maps to both '{}' and '{}'",
                            alias, entries_name(&entries, owner), canonical
                        )));
                    }
                }
                lookup.insert(alias.clone(), index);
                alias_keys.push(alias.clone());
                alias_owner.push(index);
            }

            entries.push(AliasEntry {
                canonical,
                aliases: normalized,
            });
        }

        Ok(Self {
            entries,
            lookup,
            alias_keys,
            alias_owner,
        })
    }

    /// Parse a JSON object of `canonical -> [aliases]`, keeping key order
    pub fn from_json(json: &str) -> Result<Self> {
        let object: Map<String, Value> = serde_json::from_str(json)
            .map_err(|e| AtsError::Vocabulary(format!("alias table is not a JSON object: {}", e)))?;

        let mut raw = Vec::with_capacity(object.len());
        for (canonical, aliases) in object {
            let aliases: Vec<String> = serde_json::from_value(aliases).map_err(|e| {
                AtsError::Vocabulary(format!("aliases of '{}' must be a list of strings: {}", canonical, e))
            })?;
            raw.push((canonical, aliases));
        }

        Self::new(raw)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_ALIAS_TABLE)
    }

    /// Canonical name for an exact, case-insensitive alias hit
    pub fn canonical_for(&self, skill: &str) -> Option<&str> {
        self.lookup
            .get(&skill.trim().to_lowercase())
            .map(|&idx| self.entries[idx].canonical.as_str())
    }

    /// Every alias of every entry, flattened in table order
    pub fn alias_keys(&self) -> &[String] {
        &self.alias_keys
    }

    /// Canonical name owning the alias at `alias_index` of [`alias_keys`](Self::alias_keys)
    pub fn canonical_of_alias(&self, alias_index: usize) -> Option<&str> {
        self.alias_owner
            .get(alias_index)
            .map(|&idx| self.entries[idx].canonical.as_str())
    }

    pub fn entries(&self) -> &[AliasEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn entries_name(entries: &[AliasEntry], index: usize) -> &str {
    entries
        .get(index)
        .map(|e| e.canonical.as_str())
        .unwrap_or("<unknown>")
}

/// Phrase lists used by the soft-factor scorer. All phrases are lowercase.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VocabularyLists {
    #[serde(alias = "ACTION_VERBS")]
    pub action_verbs: Vec<String>,
    #[serde(alias = "IMPACT_WORDS")]
    pub impact_words: Vec<String>,
    #[serde(alias = "RESPONSIBLE_WORDS")]
    pub responsible_words: Vec<String>,
    #[serde(alias = "SOFT_SKILLS")]
    pub soft_skills: Vec<String>,
}

impl VocabularyLists {
    pub fn new(
        action_verbs: Vec<String>,
        impact_words: Vec<String>,
        responsible_words: Vec<String>,
        soft_skills: Vec<String>,
    ) -> Result<Self> {
        Self {
            action_verbs,
            impact_words,
            responsible_words,
            soft_skills,
        }
        .validated()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let lists: VocabularyLists = serde_json::from_str(json)
            .map_err(|e| AtsError::Vocabulary(format!("invalid vocabulary file: {}", e)))?;
        lists.validated()
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_VOCABULARY)
    }

    fn validated(self) -> Result<Self> {
        Ok(Self {
            action_verbs: clean_list("action_verbs", self.action_verbs)?,
            impact_words: clean_list("impact_words", self.impact_words)?,
            responsible_words: clean_list("responsible_words", self.responsible_words)?,
            soft_skills: clean_list("soft_skills", self.soft_skills)?,
        })
    }
}

fn clean_list(name: &str, phrases: Vec<String>) -> Result<Vec<String>> {
    if phrases.is_empty() {
        return Err(AtsError::Vocabulary(format!("vocabulary list '{}' is empty", name)));
    }
    phrases
        .into_iter()
        .map(|p| {
            let p = p.trim().to_lowercase();
            if p.is_empty() {
                Err(AtsError::Vocabulary(format!("vocabulary list '{}' has an empty phrase", name)))
            } else {
                Ok(p)
            }
        })
        .collect()
}

/// The static data every scoring call reads
#[derive(Debug, Clone)]
pub struct Vocabulary {
    pub aliases: Arc<AliasTable>,
    pub lists: Arc<VocabularyLists>,
}

impl Vocabulary {
    pub fn new(aliases: AliasTable, lists: VocabularyLists) -> Self {
        Self {
            aliases: Arc::new(aliases),
            lists: Arc::new(lists),
        }
    }

    pub fn builtin() -> Result<Self> {
        Ok(Self::new(AliasTable::builtin()?, VocabularyLists::builtin()?))
    }

    /// Load from the configured files, falling back to the built-in resources
    pub fn load(config: &VocabularyConfig) -> Result<Self> {
        let aliases = match &config.alias_table {
            Some(path) => {
                info!("Loading skill alias table from {}", path.display());
                AliasTable::from_file(path)?
            }
            None => AliasTable::builtin()?,
        };
        let lists = match &config.vocabulary {
            Some(path) => {
                info!("Loading vocabulary lists from {}", path.display());
                VocabularyLists::from_file(path)?
            }
            None => VocabularyLists::builtin()?,
        };

        debug!(
            "Vocabulary ready: {} canonical skills, {} aliases, {}/{}/{}/{} phrases",
            aliases.len(),
            aliases.alias_keys().len(),
            lists.action_verbs.len(),
            lists.impact_words.len(),
            lists.responsible_words.len(),
            lists.soft_skills.len()
        );

        Ok(Self::new(aliases, lists))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builtin_resources_load() {
        let vocabulary = Vocabulary::builtin().unwrap();
        assert!(!vocabulary.aliases.is_empty());
        assert!(vocabulary.lists.action_verbs.contains(&"developed".to_string()));
        assert!(vocabulary.lists.soft_skills.contains(&"problem solving".to_string()));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = AliasTable::from_json(r#"{"React": ["reactjs", "React.js"]}"#).unwrap();
        assert_eq!(table.canonical_for("REACTJS"), Some("React"));
        assert_eq!(table.canonical_for("react.js"), Some("React"));
        assert_eq!(table.canonical_for(" react "), Some("React"));
        assert_eq!(table.canonical_for("vue"), None);
    }

    #[test]
    fn test_canonical_added_to_aliases_in_order() {
        let table = AliasTable::from_json(r#"{"Python": ["py"], "Go": ["golang"]}"#).unwrap();
        assert_eq!(table.alias_keys(), &["python", "py", "go", "golang"]);
        assert_eq!(table.canonical_of_alias(3), Some("Go"));
        assert_eq!(table.canonical_of_alias(9), None);
    }

    #[test]
    fn test_duplicate_alias_rejected() {
        let result = AliasTable::from_json(r#"{"SQL": ["sql server"], "MSSQL": ["sql server"]}"#);
        assert!(matches!(result, Err(AtsError::Vocabulary(_))));
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(AliasTable::from_json("{}").is_err());
        assert!(AliasTable::from_json("[]").is_err());
    }

    #[test]
    fn test_vocabulary_accepts_uppercase_keys() {
        let json = r#"{
            "ACTION_VERBS": ["Developed"],
            "IMPACT_WORDS": ["increased"],
            "RESPONSIBLE_WORDS": ["helped"],
            "SOFT_SKILLS": ["Teamwork"]
        }"#;
        let lists = VocabularyLists::from_json(json).unwrap();
        assert_eq!(lists.action_verbs, vec!["developed"]);
        assert_eq!(lists.soft_skills, vec!["teamwork"]);
    }

    #[test]
    fn test_empty_vocabulary_list_rejected() {
        let json = r#"{"action_verbs": [], "impact_words": ["a"], "responsible_words": ["b"], "soft_skills": ["c"]}"#;
        assert!(VocabularyLists::from_json(json).is_err());
    }

    #[test]
    fn test_load_from_configured_files() {
        let mut aliases = NamedTempFile::new().unwrap();
        write!(aliases, r#"{{"Kotlin": ["kt"]}}"#).unwrap();

        let config = VocabularyConfig {
            alias_table: Some(aliases.path().to_path_buf()),
            vocabulary: None,
        };
        let vocabulary = Vocabulary::load(&config).unwrap();
        assert_eq!(vocabulary.aliases.len(), 1);
        assert_eq!(vocabulary.aliases.canonical_for("kt"), Some("Kotlin"));
        assert!(!vocabulary.lists.impact_words.is_empty());
    }
}
