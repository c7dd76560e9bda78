// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword rule management.
//!
//! Keywords arrive as one comma-separated string. Every rule the editor
//! writes has at least one non-empty keyword and a non-blank response.

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use lineoa_core::{KeywordRule, LineOaError};
use lineoa_storage::ConsoleStore;

/// Operator input for creating or editing a rule.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleDraft {
    /// Comma-separated keywords, e.g. `"price, cost , ราคา"`.
    pub keywords: String,
    pub response: String,
}

impl RuleDraft {
    pub fn new(keywords: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            response: response.into(),
        }
    }

    /// Parsed keywords and response, or a validation error.
    fn validate(&self) -> Result<(Vec<String>, String), LineOaError> {
        let keywords = parse_keywords(&self.keywords);
        if keywords.is_empty() {
            return Err(LineOaError::Validation(
                "at least one keyword is required".to_string(),
            ));
        }
        if self.response.trim().is_empty() {
            return Err(LineOaError::Validation(
                "response text must not be empty".to_string(),
            ));
        }
        Ok((keywords, self.response.clone()))
    }
}

/// Splits on commas, trims, and drops empty pieces.
pub fn parse_keywords(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// CRUD over the keyword rule list. Every write replaces the whole list.
pub struct RulesEditor {
    store: Arc<ConsoleStore>,
}

impl RulesEditor {
    pub fn new(store: Arc<ConsoleStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<KeywordRule>, LineOaError> {
        self.store.get_rules().await
    }

    /// Rules with a keyword containing `query`, case-insensitively.
    pub async fn search(&self, query: &str) -> Result<Vec<KeywordRule>, LineOaError> {
        let needle = query.trim().to_lowercase();
        let rules = self.store.get_rules().await?;
        if needle.is_empty() {
            return Ok(rules);
        }
        Ok(rules
            .into_iter()
            .filter(|r| r.keywords.iter().any(|k| k.to_lowercase().contains(&needle)))
            .collect())
    }

    /// Appends a new active rule.
    pub async fn create(&self, draft: &RuleDraft) -> Result<KeywordRule, LineOaError> {
        let (keywords, response) = draft.validate()?;
        let rule = KeywordRule::new(keywords, response);
        let mut rules = self.store.get_rules().await?;
        rules.push(rule.clone());
        self.store.save_rules(&rules).await?;
        info!(rule_id = %rule.id, "rule created");
        Ok(rule)
    }

    /// Replaces keywords and response, keeping id, position and active flag.
    pub async fn update(&self, id: &str, draft: &RuleDraft) -> Result<KeywordRule, LineOaError> {
        let (keywords, response) = draft.validate()?;
        self.edit(id, |rule| {
            rule.keywords = keywords;
            rule.response = response;
        })
        .await
    }

    /// Flips the active flag and returns the updated rule.
    pub async fn toggle(&self, id: &str) -> Result<KeywordRule, LineOaError> {
        self.edit(id, |rule| rule.is_active = !rule.is_active).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), LineOaError> {
        let mut rules = self.store.get_rules().await?;
        let before = rules.len();
        rules.retain(|r| r.id != id);
        if rules.len() == before {
            return Err(LineOaError::rule_not_found(id));
        }
        self.store.save_rules(&rules).await?;
        info!(rule_id = id, "rule deleted");
        Ok(())
    }

    async fn edit<F>(&self, id: &str, f: F) -> Result<KeywordRule, LineOaError>
    where
        F: FnOnce(&mut KeywordRule),
    {
        let mut rules = self.store.get_rules().await?;
        let rule = rules
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| LineOaError::rule_not_found(id))?;
        f(rule);
        let updated = rule.clone();
        self.store.save_rules(&rules).await?;
        info!(rule_id = id, active = updated.is_active, "rule updated");
        Ok(updated)
    }
}
