//! Ordered text rewrites applied to function bodies after parsing
//!
//! A rule is a compiled pattern plus a replacement template in `regex`
//! syntax (`${1}`, `${name}`). `{indent}` in a template stands for the
//! configured indentation. New rules go on the end of the list; the scanning
//! and parsing stages never see them.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, TranslateError};

/// Stands for the configured indentation inside a replacement template
pub const INDENT_PLACEHOLDER: &str = "{indent}";

pub const ASSIGN_TO_RETURN: &str = "assign-to-return";
pub const BREAK_STATEMENTS: &str = "break-statements";
pub const MATRIX_MULTIPLY: &str = "matrix-multiply";

static DEFAULT_RULES: Lazy<Vec<RewriteRule>> = Lazy::new(|| {
    [
        RewriteRule::assign_to_return("gl_FragColor"),
        RewriteRule::break_statements(),
        RewriteRule::matrix_multiply("u_mvp"),
    ]
    .into_iter()
    .collect::<Result<Vec<_>>>()
    .expect("built-in rewrite rules must compile")
});

/// One named body rewrite. Rules run in list order, each on the previous
/// output.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    name: String,
    pattern: Regex,
    replacement: String,
}

impl RewriteRule {
    /// Compile a rule. Every match of `pattern` is replaced by `replacement`.
    pub fn new(name: impl Into<String>, pattern: &str, replacement: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let pattern = Regex::new(pattern).map_err(|source| TranslateError::InvalidRewritePattern {
            rule: name.clone(),
            source,
        })?;
        Ok(Self {
            name,
            pattern,
            replacement: replacement.into(),
        })
    }

    /// `target = expr` becomes `return expr`. Comparisons (`target ==`) and
    /// identifiers that only end in `target` are left alone.
    pub fn assign_to_return(target: &str) -> Result<Self> {
        Self::new(
            ASSIGN_TO_RETURN,
            &format!(r"\b{} *= *([^=])", regex::escape(target)),
            "return ${1}",
        )
    }

    /// Every `;` and the spaces after it end a line
    pub fn break_statements() -> Result<Self> {
        Self::new(BREAK_STATEMENTS, "; *", format!(";\n{}", INDENT_PLACEHOLDER))
    }

    /// `matrix * expr;` becomes `mul( expr, matrix );`, where `expr` runs to
    /// the first `;` on the same line
    pub fn matrix_multiply(matrix: &str) -> Result<Self> {
        Self::new(
            MATRIX_MULTIPLY,
            &format!(r"\b({}) *\* *(.*?);", regex::escape(matrix)),
            "mul( ${2}, ${1} );",
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Apply this rule to a body
    pub fn apply(&self, body: &str, indent: &str) -> String {
        let replacement = self
            .replacement
            .replace(INDENT_PLACEHOLDER, &indent.replace('$', "$$"));
        self.pattern.replace_all(body, replacement.as_str()).into_owned()
    }
}

impl PartialEq for RewriteRule {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.pattern.as_str() == other.pattern.as_str()
            && self.replacement == other.replacement
    }
}

impl Eq for RewriteRule {}

impl fmt::Display for RewriteRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (/{}/ -> {:?})", self.name, self.pattern, self.replacement)
    }
}

/// Rules used when nothing else is configured
pub fn default_rules() -> Vec<RewriteRule> {
    DEFAULT_RULES.clone()
}

/// Run `rules` over `body` in order
pub fn apply_rules(rules: &[RewriteRule], body: &str, indent: &str) -> String {
    rules
        .iter()
        .fold(body.to_string(), |text, rule| rule.apply(&text, indent))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_to_return() {
        let rule = RewriteRule::assign_to_return("gl_FragColor").unwrap();
        assert_eq!(rule.apply("gl_FragColor = c * 2.0;", "\t"), "return c * 2.0;");
        assert_eq!(rule.apply("gl_FragColor=c;", "\t"), "return c;");
    }

    #[test]
    fn test_assign_to_return_ignores_comparisons_and_longer_names() {
        let rule = RewriteRule::assign_to_return("gl_FragColor").unwrap();
        let body = "if (gl_FragColor == x) { my_gl_FragColor = y; }";
        assert_eq!(rule.apply(body, "\t"), body);
    }

    #[test]
    fn test_break_statements() {
        let rule = RewriteRule::break_statements().unwrap();
        assert_eq!(rule.apply("a = 1; b = 2;", "\t"), "a = 1;\n\tb = 2;\n\t");
        assert_eq!(rule.apply("a = 1;   b = 2;", "  "), "a = 1;\n  b = 2;\n  ");
        assert_eq!(rule.apply("no terminator", "\t"), "no terminator");
    }

    #[test]
    fn test_indent_is_not_a_replacement_reference() {
        let rule = RewriteRule::break_statements().unwrap();
        assert_eq!(rule.apply("a;b", "$1"), "a;\n$1b");
    }

    #[test]
    fn test_matrix_multiply() {
        let rule = RewriteRule::matrix_multiply("u_mvp").unwrap();
        assert_eq!(
            rule.apply("v_position = u_mvp * a_position;\n\t", "\t"),
            "v_position = mul( a_position, u_mvp );\n\t"
        );
    }

    #[test]
    fn test_matrix_multiply_stops_at_first_terminator_on_the_line() {
        let rule = RewriteRule::matrix_multiply("u_mvp").unwrap();
        assert_eq!(
            rule.apply("p = u_mvp*float4(a.xyz, 1.0); q = u_mvp * b;", "\t"),
            "p = mul( float4(a.xyz, 1.0), u_mvp ); q = mul( b, u_mvp );"
        );
        // no terminator before the line ends
        assert_eq!(rule.apply("p = u_mvp * a\n;", "\t"), "p = u_mvp * a\n;");
        // not a multiplication
        assert_eq!(rule.apply("m = u_mvp;", "\t"), "m = u_mvp;");
        assert_eq!(rule.apply("m = my_u_mvp * a;", "\t"), "m = my_u_mvp * a;");
    }

    #[test]
    fn test_default_rules_in_order() {
        let rules = default_rules();
        let names: Vec<_> = rules.iter().map(RewriteRule::name).collect();
        assert_eq!(names, [ASSIGN_TO_RETURN, BREAK_STATEMENTS, MATRIX_MULTIPLY]);

        let body = "v_position = u_mvp * a_position; gl_FragColor = c;";
        assert_eq!(
            apply_rules(&rules, body, "\t"),
            "v_position = mul( a_position, u_mvp );\n\treturn c;\n\t"
        );
    }

    #[test]
    fn test_custom_rule_with_captures() {
        let rules = [RewriteRule::new("fract-to-frac", r"\bfract\((\w+)\)", "frac(${1})").unwrap()];
        assert_eq!(apply_rules(&rules, "y = fract(t); z = myfract(t);", "\t"), "y = frac(t); z = myfract(t);");
    }

    #[test]
    fn test_invalid_pattern() {
        let err = RewriteRule::new("broken", "(unclosed", "").unwrap_err();
        assert!(matches!(err, TranslateError::InvalidRewritePattern { ref rule, .. } if rule == "broken"));
    }
}
