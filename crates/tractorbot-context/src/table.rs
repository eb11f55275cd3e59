use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{ContextError, Result};

/// Name of the fallback context
pub const GENERAL: &str = "General";

/// Trigger that never matches on its own
pub const WILDCARD: &str = "*";

/// One conversational topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format: Option<String>,
    /// Keys the table format does not know about
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl ContextInfo {
    fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            triggers: Vec::new(),
            actions: Vec::new(),
            response_format: None,
            extra: BTreeMap::new(),
        }
    }
    
    pub fn general() -> Self {
        Self {
            name: GENERAL.to_string(),
            description: "Default conversational mode".to_string(),
            triggers: vec![WILDCARD.to_string()],
            actions: vec!["maintain_conversation".to_string()],
            response_format: Some("Friendly, helpful response".to_string()),
            extra: BTreeMap::new(),
        }
    }
    
    pub fn is_general(&self) -> bool {
        self.name == GENERAL
    }
}

/// Ordered set of contexts; file order decides classification ties.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextTable {
    contexts: Vec<ContextInfo>,
}

impl Default for ContextTable {
    fn default() -> Self {
        Self {
            contexts: vec![ContextInfo::general()],
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(|s| s.trim().to_string()).collect()
}

impl ContextTable {
    /// Build from already-parsed contexts, appending `General` when absent
    pub fn new(contexts: Vec<ContextInfo>) -> Self {
        let mut table = Self { contexts: Vec::new() };
        for ctx in contexts {
            table.upsert(ctx);
        }
        if table.get(GENERAL).is_none() {
            table.contexts.push(ContextInfo::general());
        }
        table
    }
    
    fn upsert(&mut self, ctx: ContextInfo) {
        match self.contexts.iter_mut().find(|c| c.name == ctx.name) {
            Some(existing) => *existing = ctx,
            None => self.contexts.push(ctx),
        }
    }
    
    /// Parse the `[Name]` / `key = value` table format.
    ///
    /// Blank lines and `#` comments are skipped, as are `key = value` lines
    /// that appear before the first section. A repeated section replaces the
    /// earlier one but keeps its position.
    pub fn parse(text: &str) -> Result<Self> {
        let mut contexts: Vec<ContextInfo> = Vec::new();
        let mut current: Option<ContextInfo> = None;
        
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            
            if line.starts_with('[') && line.ends_with(']') {
                let name = line[1..line.len() - 1].trim();
                if name.is_empty() {
                    return Err(ContextError::Parse {
                        line: idx + 1,
                        message: "empty section name".to_string(),
                    });
                }
                if let Some(done) = current.take() {
                    contexts.push(done);
                }
                current = Some(ContextInfo::named(name));
                continue;
            }
            
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let Some(ctx) = current.as_mut() else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            match key {
                "description" => ctx.description = value.to_string(),
                "triggers" => ctx.triggers = split_list(value),
                "actions" => ctx.actions = split_list(value),
                "response_format" => ctx.response_format = Some(value.to_string()),
                _ => {
                    ctx.extra.insert(key.to_string(), value.to_string());
                }
            }
        }
        if let Some(done) = current {
            contexts.push(done);
        }
        
        Ok(Self::new(contexts))
    }
    
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ContextError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let table = Self::parse(&text)?;
        info!(path = %path.display(), count = table.len(), "Loaded contexts");
        Ok(table)
    }
    
    /// Like [`ContextTable::load`], falling back to a `General`-only table
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(table) => table,
            Err(e) => {
                warn!(error = %e, "Error loading contexts, using General only");
                Self::default()
            }
        }
    }
    
    pub fn get(&self, name: &str) -> Option<&ContextInfo> {
        self.contexts.iter().find(|c| c.name == name)
    }
    
    /// The `General` context; always present
    pub fn general(&self) -> &ContextInfo {
        // constructors guarantee General is in the table
        self.get(GENERAL).unwrap_or(&self.contexts[0])
    }
    
    pub fn iter(&self) -> impl Iterator<Item = &ContextInfo> {
        self.contexts.iter()
    }
    
    pub fn len(&self) -> usize {
        self.contexts.len()
    }
    
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# Captain Tractors contexts
stray = ignored

[Dealership]
description = Find dealers
triggers = dealer, showroom , near me
actions = locate_dealer
response_format = Address list
region = north

[Service]
triggers = service, repair
";

    #[test]
    fn test_parse_sections_in_order() {
        let table = ContextTable::parse(SAMPLE).unwrap();
        let names: Vec<_> = table.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Dealership", "Service", "General"]);

        let dealer = table.get("Dealership").unwrap();
        assert_eq!(dealer.triggers, vec!["dealer", "showroom", "near me"]);
        assert_eq!(dealer.actions, vec!["locate_dealer"]);
        assert_eq!(dealer.response_format.as_deref(), Some("Address list"));
        assert_eq!(dealer.extra.get("region").map(String::as_str), Some("north"));

        let service = table.get("Service").unwrap();
        assert!(service.description.is_empty());
        assert!(service.actions.is_empty());
    }

    #[test]
    fn test_file_general_is_kept() {
        let table = ContextTable::parse("[General]\ndescription = Chat\ntriggers = hi\n").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.general().description, "Chat");
        assert_eq!(table.general().triggers, vec!["hi"]);
    }

    #[test]
    fn test_duplicate_section_replaces_in_place() {
        let table = ContextTable::parse("[A]\ntriggers = x\n[B]\n[A]\ntriggers = y\n").unwrap();
        let names: Vec<_> = table.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "General"]);
        assert_eq!(table.get("A").unwrap().triggers, vec!["y"]);
    }

    #[test]
    fn test_empty_section_name_is_error() {
        let err = ContextTable::parse("[ ]\n").unwrap_err();
        assert!(matches!(err, ContextError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_missing_file_falls_back_to_general() {
        let table = ContextTable::load_or_default("/no/such/contexts.txt");
        assert_eq!(table, ContextTable::default());
        assert_eq!(table.general(), &ContextInfo::general());
    }
}
