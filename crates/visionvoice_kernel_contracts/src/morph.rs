#![forbid(unsafe_code)]

use crate::{ContractViolation, SchemaVersion, Validate};

pub const MORPH_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);

/// One annotated token from the external morphological tokenizer.
///
/// The tokenizer owns segmentation and annotation; this contract only pins
/// the shape the order pipeline reads. `lemma` may be empty when the
/// tokenizer has no stem for the surface form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    pub schema_version: SchemaVersion,
    pub surface: String,
    pub lemma: String,
    pub pos_tag: String,
}

impl RawToken {
    pub fn v1(
        surface: String,
        lemma: String,
        pos_tag: String,
    ) -> Result<Self, ContractViolation> {
        let token = Self {
            schema_version: MORPH_CONTRACT_VERSION,
            surface,
            lemma,
            pos_tag,
        };
        token.validate()?;
        Ok(token)
    }
}

impl Validate for RawToken {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != MORPH_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "raw_token.schema_version",
                reason: "must match MORPH_CONTRACT_VERSION",
            });
        }
        validate_surface_text("raw_token.surface", &self.surface, 96)?;
        validate_optional_text("raw_token.lemma", &self.lemma, 96)?;
        validate_pos_tag("raw_token.pos_tag", &self.pos_tag)?;
        Ok(())
    }
}

/// Failure surfaced by the tokenizer collaborator. The turn layer folds it
/// into the fallback reply; it never crosses the output boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizationError {
    pub reason: String,
}

impl TokenizationError {
    pub fn new(reason: impl Into<String>) -> Self {
        let mut reason = reason.into();
        if reason.len() > 256 {
            reason.truncate(256);
        }
        Self { reason }
    }
}

/// Boundary trait for the external morphological tokenizer.
///
/// Collaborator obligation: deterministic, order-preserving output for
/// identical input.
pub trait MorphTokenizer {
    fn tokenize(&self, transcript: &str) -> Result<Vec<RawToken>, TokenizationError>;
}

fn validate_surface_text(
    field: &'static str,
    value: &str,
    max_len: usize,
) -> Result<(), ContractViolation> {
    if value.trim().is_empty() {
        return Err(ContractViolation::InvalidValue {
            field,
            reason: "must not be empty",
        });
    }
    validate_optional_text(field, value, max_len)
}

fn validate_optional_text(
    field: &'static str,
    value: &str,
    max_len: usize,
) -> Result<(), ContractViolation> {
    if value.len() > max_len {
        return Err(ContractViolation::InvalidValue {
            field,
            reason: "exceeds max length",
        });
    }
    if value.chars().any(|c| c.is_control()) {
        return Err(ContractViolation::InvalidValue {
            field,
            reason: "must not contain control characters",
        });
    }
    Ok(())
}

fn validate_pos_tag(field: &'static str, value: &str) -> Result<(), ContractViolation> {
    if value.len() > 32 {
        return Err(ContractViolation::InvalidValue {
            field,
            reason: "must be <= 32 chars",
        });
    }
    if value
        .chars()
        .any(|c| !(c.is_ascii_alphanumeric() || c == '_' || c == '+'))
    {
        return Err(ContractViolation::InvalidValue {
            field,
            reason: "must contain tag-safe ASCII only",
        });
    }
    Ok(())
}
