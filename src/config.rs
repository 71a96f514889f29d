//! Translation settings
//!
//! A `TranslatorConfig` is built once and lent to every translation. Nothing
//! in it changes while files are being processed, so one value can be shared
//! between threads.

use crate::error::Result;
use crate::preprocessor::{SubstitutionMode, SubstitutionTable};
use crate::rewrite::{default_rules, RewriteRule, MATRIX_MULTIPLY};

/// Built-in output variable that vertex shaders write their position to
const POSITION_BUILTIN: &str = "gl_Position";

/// Configuration for a translation run
#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    /// Lexeme replacements applied before parsing. The entry for
    /// `gl_Position` also names the vertex `POSITION` output.
    pub substitutions: SubstitutionTable,

    /// Substring (compatible) or whole-word substitution
    pub substitution_mode: SubstitutionMode,

    /// Body rewrites, in application order
    pub rewrite_rules: Vec<RewriteRule>,

    /// Uniform type that gets a `TEXUNITn` semantic
    pub sampler_type: String,

    /// Indentation used in generated code
    pub indent: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            substitutions: SubstitutionTable::default(),
            substitution_mode: SubstitutionMode::Substring,
            rewrite_rules: default_rules(),
            sampler_type: "sampler2D".to_string(),
            indent: "\t".to_string(),
        }
    }
}

impl TranslatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_substitution_mode(mut self, mode: SubstitutionMode) -> Self {
        self.substitution_mode = mode;
        self
    }

    pub fn with_substitutions(mut self, substitutions: SubstitutionTable) -> Self {
        self.substitutions = substitutions;
        self
    }

    /// Point every matrix-multiply rule at a different uniform
    pub fn with_mvp_uniform(mut self, name: &str) -> Result<Self> {
        for rule in &mut self.rewrite_rules {
            if rule.name() == MATRIX_MULTIPLY {
                *rule = RewriteRule::matrix_multiply(name)?;
            }
        }
        Ok(self)
    }

    /// Append a rule after the existing ones
    pub fn with_rule(mut self, rule: RewriteRule) -> Self {
        self.rewrite_rules.push(rule);
        self
    }

    /// Name of the synthesized `POSITION` output of vertex shaders: whatever
    /// the substitution table turns `gl_Position` into
    pub fn position_output(&self) -> &str {
        self.substitutions
            .get(POSITION_BUILTIN)
            .filter(|name| !name.is_empty())
            .unwrap_or(POSITION_BUILTIN)
    }
}
