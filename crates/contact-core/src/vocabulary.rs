//! Directory vocabularies: the `{name, token}` terms that organization and
//! position type fields are drawn from.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::content::DirectoryData;
use crate::error::DirectoryError;

/// Below this normalized Levenshtein similarity no suggestion is offered.
const SUGGESTION_THRESHOLD: f64 = 0.6;

/// A vocabulary entry: a human-readable name and its stored token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    pub name: String,
    pub token: String,
}

impl Term {
    pub fn new(name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            token: token.into(),
        }
    }

    /// Build a term whose token is derived from the name ("Air force" -> "air_force").
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        let token = tokenize(&name);
        Self { name, token }
    }
}

/// Lowercase, with runs of non-alphanumeric characters collapsed to `_`.
pub fn tokenize(name: &str) -> String {
    let mut token = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.trim().chars() {
        if c.is_alphanumeric() {
            if pending_sep && !token.is_empty() {
                token.push('_');
            }
            pending_sep = false;
            token.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    token
}

/// The vocabularies a directory carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VocabularyKind {
    PositionTypes,
    OrganizationTypes,
    OrganizationLevels,
}

impl VocabularyKind {
    pub const ALL: [VocabularyKind; 3] = [
        VocabularyKind::PositionTypes,
        VocabularyKind::OrganizationTypes,
        VocabularyKind::OrganizationLevels,
    ];

    /// Singular label used in error messages ("position type").
    pub fn label(self) -> &'static str {
        match self {
            VocabularyKind::PositionTypes => "position type",
            VocabularyKind::OrganizationTypes => "organization type",
            VocabularyKind::OrganizationLevels => "organization level",
        }
    }

    pub fn field_name(self) -> &'static str {
        match self {
            VocabularyKind::PositionTypes => "position_types",
            VocabularyKind::OrganizationTypes => "organization_types",
            VocabularyKind::OrganizationLevels => "organization_levels",
        }
    }
}

impl fmt::Display for VocabularyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

impl std::str::FromStr for VocabularyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "position_types" | "position_type" | "positions" => Ok(VocabularyKind::PositionTypes),
            "organization_types" | "organization_type" | "types" => {
                Ok(VocabularyKind::OrganizationTypes)
            }
            "organization_levels" | "organization_level" | "levels" => {
                Ok(VocabularyKind::OrganizationLevels)
            }
            other => Err(format!("unknown vocabulary: {other}")),
        }
    }
}

impl DirectoryData {
    pub fn terms(&self, kind: VocabularyKind) -> &[Term] {
        match kind {
            VocabularyKind::PositionTypes => &self.position_types,
            VocabularyKind::OrganizationTypes => &self.organization_types,
            VocabularyKind::OrganizationLevels => &self.organization_levels,
        }
    }

    fn terms_mut(&mut self, kind: VocabularyKind) -> &mut Vec<Term> {
        match kind {
            VocabularyKind::PositionTypes => &mut self.position_types,
            VocabularyKind::OrganizationTypes => &mut self.organization_types,
            VocabularyKind::OrganizationLevels => &mut self.organization_levels,
        }
    }

    /// Add a term. Returns false if a term with the same token already exists.
    pub fn add_term(&mut self, kind: VocabularyKind, term: Term) -> bool {
        let terms = self.terms_mut(kind);
        if terms.iter().any(|t| t.token == term.token) {
            return false;
        }
        terms.push(term);
        true
    }

    /// Resolve `token` against a vocabulary, suggesting the closest token on a miss.
    pub fn check_term(&self, kind: VocabularyKind, token: &str) -> Result<&Term, DirectoryError> {
        let terms = self.terms(kind);
        find_term(terms, token).ok_or_else(|| DirectoryError::UnknownTerm {
            vocabulary: kind.label().to_string(),
            token: token.to_string(),
            suggestion: suggest(terms, token),
        })
    }
}

pub fn find_term<'a>(terms: &'a [Term], token: &str) -> Option<&'a Term> {
    terms.iter().find(|t| t.token == token)
}

/// The token most similar to `token`, if any is similar enough.
pub fn suggest(terms: &[Term], token: &str) -> Option<String> {
    let mut best: Option<(&str, f64)> = None;
    for term in terms {
        let sim = strsim::normalized_levenshtein(token, &term.token);
        if sim > SUGGESTION_THRESHOLD && best.is_none_or(|(_, b)| sim > b) {
            best = Some((&term.token, sim));
        }
    }
    best.map(|(t, _)| t.to_string())
}
