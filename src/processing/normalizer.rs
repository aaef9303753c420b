//! Skill normalization: casing, whitespace and synonyms

use crate::error::{Result, SkillAlignerError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// Canonical comparison key: trimmed, lower-cased, whitespace runs collapsed.
pub fn normalize_key(raw: &str) -> String {
    WHITESPACE.replace_all(raw.trim(), " ").to_lowercase()
}

/// Normalize a raw skill string into a [`Skill`]
pub fn normalize(raw: &str) -> Skill {
    Skill::new(raw)
}

/// A skill identified by its normalized key.
///
/// The label keeps the caller's casing for display; equality, ordering and
/// hashing only look at the key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Skill {
    key: String,
    label: String,
}

impl Skill {
    pub fn new(raw: &str) -> Self {
        Self {
            key: normalize_key(raw),
            label: WHITESPACE.replace_all(raw.trim(), " ").into_owned(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }
}

impl PartialEq for Skill {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Skill {}

impl Hash for Skill {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for Skill {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Skill {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl From<String> for Skill {
    fn from(raw: String) -> Self {
        Skill::new(&raw)
    }
}

impl From<&str> for Skill {
    fn from(raw: &str) -> Self {
        Skill::new(raw)
    }
}

impl From<Skill> for String {
    fn from(skill: Skill) -> Self {
        skill.label
    }
}

/// Insertion-ordered set of skills, deduplicated by normalized key.
/// Empty skills are never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Skill>", into = "Vec<Skill>")]
pub struct SkillSet {
    skills: Vec<Skill>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the skill was empty or already present
    pub fn insert(&mut self, skill: Skill) -> bool {
        if skill.is_empty() || self.contains(&skill) {
            return false;
        }
        self.skills.push(skill);
        true
    }

    pub fn contains(&self, skill: &Skill) -> bool {
        self.skills.iter().any(|s| s == skill)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.skills.iter().any(|s| s.key() == key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Skill> {
        self.skills.iter()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn as_slice(&self) -> &[Skill] {
        &self.skills
    }
}

impl FromIterator<Skill> for SkillSet {
    fn from_iter<I: IntoIterator<Item = Skill>>(iter: I) -> Self {
        let mut set = SkillSet::new();
        for skill in iter {
            set.insert(skill);
        }
        set
    }
}

impl<'a> IntoIterator for &'a SkillSet {
    type Item = &'a Skill;
    type IntoIter = std::slice::Iter<'a, Skill>;

    fn into_iter(self) -> Self::IntoIter {
        self.skills.iter()
    }
}

impl From<Vec<Skill>> for SkillSet {
    fn from(skills: Vec<Skill>) -> Self {
        skills.into_iter().collect()
    }
}

impl From<SkillSet> for Vec<Skill> {
    fn from(set: SkillSet) -> Self {
        set.skills
    }
}

/// Normalizer with a synonym table applied after [`normalize_key`]
#[derive(Debug, Clone, Default)]
pub struct SkillNormalizer {
    aliases: HashMap<String, Skill>,
}

impl SkillNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an alias -> canonical table.
    ///
    /// A canonical name may not itself be an alias, otherwise canonicalizing
    /// twice would give a different answer than canonicalizing once.
    pub fn with_aliases(aliases: &BTreeMap<String, String>) -> Result<Self> {
        let mut table = HashMap::new();

        for (alias, canonical) in aliases {
            let alias_key = normalize_key(alias);
            let canonical = Skill::new(canonical);
            if alias_key.is_empty() || canonical.is_empty() {
                return Err(SkillAlignerError::Configuration(format!(
                    "Empty skill alias entry: '{}' -> '{}'",
                    alias, canonical
                )));
            }
            if alias_key != canonical.key() {
                table.insert(alias_key, canonical);
            }
        }

        if let Some((alias, canonical)) = table
            .iter()
            .find(|(_, canonical)| table.contains_key(canonical.key()))
        {
            return Err(SkillAlignerError::Configuration(format!(
                "Alias '{}' maps to '{}', which is itself an alias",
                alias, canonical
            )));
        }

        Ok(Self { aliases: table })
    }

    /// Normalize and resolve synonyms; `None` for blank input
    pub fn canonicalize(&self, raw: &str) -> Option<Skill> {
        let skill = Skill::new(raw);
        if skill.is_empty() {
            return None;
        }
        Some(self.aliases.get(skill.key()).cloned().unwrap_or(skill))
    }

    pub fn skill_set<I, S>(&self, raw_skills: I) -> SkillSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raw_skills
            .into_iter()
            .filter_map(|raw| self.canonicalize(raw.as_ref()))
            .collect()
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_lowercases_and_collapses() {
        assert_eq!(normalize_key("  Machine \t  Learning\n"), "machine learning");
        assert_eq!(normalize("SQL").key(), "sql");
        assert_eq!(normalize("  React   Native ").label(), "React Native");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "",
            "   ",
            "Python",
            "  C++  ",
            "Node.JS\u{00A0} Runtime",
            "ÄRGER  über",
            "multi\n\nline\tskill",
        ];
        for input in inputs {
            let once = normalize_key(input);
            assert_eq!(normalize_key(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn test_skill_equality_ignores_label() {
        assert_eq!(Skill::new("Python"), Skill::new("  python "));
        assert_ne!(Skill::new("Python"), Skill::new("Jython"));
    }

    #[test]
    fn test_skill_set_dedups_and_drops_empty() {
        let set: SkillSet = ["Python", "python", " ", "SQL", "PYTHON"]
            .iter()
            .map(|s| Skill::new(s))
            .collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.as_slice()[0].label(), "Python");
        assert!(set.contains_key("sql"));
    }

    #[test]
    fn test_aliases_resolve_to_canonical() {
        let mut aliases = BTreeMap::new();
        aliases.insert("JS".to_string(), "JavaScript".to_string());
        let normalizer = SkillNormalizer::with_aliases(&aliases).unwrap();

        let skill = normalizer.canonicalize(" js ").unwrap();
        assert_eq!(skill.key(), "javascript");
        assert_eq!(skill.label(), "JavaScript");
        assert!(normalizer.canonicalize("   ").is_none());

        let twice = normalizer.canonicalize(skill.key()).unwrap();
        assert_eq!(twice, skill);
    }

    #[test]
    fn test_alias_chain_is_rejected() {
        let mut aliases = BTreeMap::new();
        aliases.insert("js".to_string(), "ecmascript".to_string());
        aliases.insert("ecmascript".to_string(), "javascript".to_string());
        assert!(SkillNormalizer::with_aliases(&aliases).is_err());
    }

    #[test]
    fn test_self_alias_is_ignored() {
        let mut aliases = BTreeMap::new();
        aliases.insert("Rust".to_string(), "rust".to_string());
        let normalizer = SkillNormalizer::with_aliases(&aliases).unwrap();
        assert_eq!(normalizer.alias_count(), 0);
    }

    #[test]
    fn test_serde_uses_label() {
        let set: SkillSet = serde_json::from_str(r#"["Go", "go", "Rust"]"#).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["Go","Rust"]"#);
    }
}
