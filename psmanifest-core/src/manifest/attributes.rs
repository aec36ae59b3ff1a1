//! Flat attribute extraction from manifest text

use regex_utils::manifest as pattern;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::trace;

/// Lowercased attribute names mapped to their raw, untrimmed values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AttributeMap {
    entries: BTreeMap<String, String>,
}

impl AttributeMap {
    /// Scan every line of `text` for `key = 'value'` assignments.
    ///
    /// `\r\n` and `\n` both end a line. Lines that do not match are skipped;
    /// a later assignment to the same key replaces an earlier one.
    pub fn parse(text: &str) -> Self {
        let mut entries = BTreeMap::new();
        for (index, line) in text.lines().enumerate() {
            if let Some((key, value)) = pattern::capture(line) {
                let key = key.trim().to_lowercase();
                trace!(line = index + 1, key = %key, "Matched manifest attribute");
                entries.insert(key, value.to_string());
            }
        }
        Self { entries }
    }

    /// Look up an attribute by name, ignoring case
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&key.trim().to_lowercase()).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Attributes in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
@{
    # Script module or binary module file associated with this manifest.
    RootModule = 'xNetworking.psm1'
    ModuleVersion = '5.7.0.0'
    GUID = 'e6647cc3-ce9c-4c86-9eb8-2ee8919bf358'
    Author = "Microsoft Corporation";
    Description = 'Module with DSC Resources for Networking area'
    PowerShellVersion = '4.0'
    FunctionsToExport = '*'
    CmdletsToExport = @()
    PrivateData = @{
        PSData = @{
            Tags = @('DesiredStateConfiguration', 'DSC')
        }
    }
}
"#;

    #[test]
    fn test_parse_flat_manifest() {
        let attrs = AttributeMap::parse(SAMPLE);
        assert_eq!(attrs.get("moduleversion"), Some("5.7.0.0"));
        assert_eq!(attrs.get("RootModule"), Some("xNetworking.psm1"));
        assert_eq!(attrs.get("author"), Some("Microsoft Corporation"));
        assert_eq!(attrs.get("functionstoexport"), Some("*"));
        assert!(!attrs.contains_key("cmdletstoexport"));
        assert!(!attrs.contains_key("tags"));
        assert_eq!(attrs.len(), 7);
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let upper = AttributeMap::parse("MODULEVERSION = '9.9.9'");
        let lower = AttributeMap::parse("moduleversion = '9.9.9'");
        assert_eq!(upper, lower);
        assert_eq!(upper.get("ModuleVersion"), Some("9.9.9"));
    }

    #[test]
    fn test_crlf_matches_like_lf() {
        let crlf = AttributeMap::parse("ModuleVersion = '1.0'\r\nAuthor = 'A'\r\n");
        let lf = AttributeMap::parse("ModuleVersion = '1.0'\nAuthor = 'A'\n");
        assert_eq!(crlf, lf);
        assert_eq!(crlf.get("author"), Some("A"));
    }

    #[test]
    fn test_last_duplicate_wins() {
        let attrs = AttributeMap::parse("ModuleVersion = '1.0'\nmoduleVERSION = '2.0'\n");
        assert_eq!(attrs.get("moduleversion"), Some("2.0"));
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_value_kept_verbatim() {
        let attrs = AttributeMap::parse("Copyright = '  (c) 2018 ''Contoso''  '");
        assert_eq!(attrs.get("copyright"), Some("  (c) 2018 ''Contoso''  "));
    }

    #[test]
    fn test_empty_text() {
        assert!(AttributeMap::parse("").is_empty());
    }

    #[test]
    fn test_iter_is_sorted() {
        let attrs = AttributeMap::parse("b = '2'\na = '1'\n");
        let keys: Vec<_> = attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
