//! Source text normalization
//!
//! Turns raw shader text into a single line of single-spaced tokens:
//! - lexical substitution (GLSL type and intrinsic names to their Cg spelling)
//! - comment and directive stripping that leaves string literals alone
//! - line terminator and tab folding, then space collapsing

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Ordered lexeme replacements applied before parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionTable {
    entries: Vec<(String, String)>,
}

/// How table entries are matched against the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubstitutionMode {
    /// Plain substring replacement; an identifier that merely contains a
    /// table key is rewritten too (`mixer` becomes `lerper`).
    #[default]
    Substring,
    /// Only replace occurrences not embedded in a longer identifier
    WholeWord,
}

static GLSL_TO_CG: Lazy<SubstitutionTable> = Lazy::new(|| {
    SubstitutionTable::from_pairs([
        ("vec2", "float2"),
        ("vec3", "float3"),
        ("vec4", "float4"),
        ("mat4", "float4x4"),
        ("mat3", "float3x3"),
        ("lowp", ""),
        ("mediump", ""),
        ("highp", ""),
        ("mix", "lerp"),
        ("gl_Position", "v_position"),
        ("gl_PointSize", "float psize"),
        ("texture2D", "tex2D"),
    ])
});

/// Comments, directives and the string literals they must not cut into.
/// Alternatives are tried in this order at each position.
static COMMENTS_AND_LITERALS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"/\*(?s:.*?)\*/",
        r"|//[^\n]*\n?",
        r"|#[^\n]*\n?",
        r#"|"(?:\\[^\n]|[^"\n])*""#,
        r#"|@(?:"[^"]*")+"#,
    ))
    .expect("static regex must compile")
});

static LINE_TERMINATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r\n?|\n").expect("static regex must compile"));

static SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(" {2,}").expect("static regex must compile"));

impl SubstitutionTable {
    /// Build a table from `(from, to)` pairs, keeping their order
    pub fn from_pairs<I, F, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (F, T)>,
        F: Into<String>,
        T: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(from, to)| (from.into(), to.into()))
                .collect(),
        }
    }

    /// The compiled-in GLSL to Cg table
    pub fn glsl_to_cg() -> &'static SubstitutionTable {
        &GLSL_TO_CG
    }

    /// Replacement for `from`, if the table has an entry for it
    pub fn get(&self, from: &str) -> Option<&str> {
        self.iter().find(|(f, _)| *f == from).map(|(_, t)| t)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(f, t)| (f.as_str(), t.as_str()))
    }

    /// Apply every entry in order
    pub fn apply(&self, text: &str, mode: SubstitutionMode) -> String {
        let mut result = text.to_string();
        for (from, to) in self.iter() {
            if from.is_empty() {
                continue;
            }
            result = match mode {
                SubstitutionMode::Substring => result.replace(from, to),
                SubstitutionMode::WholeWord => replace_whole_word(&result, from, to),
            };
        }
        result
    }
}

impl Default for SubstitutionTable {
    fn default() -> Self {
        (*GLSL_TO_CG).clone()
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn replace_whole_word(text: &str, from: &str, to: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;

    for (start, _) in text.match_indices(from) {
        let end = start + from.len();
        let before_ok = start == 0 || !is_ident_byte(bytes[start - 1]);
        let after_ok = end == bytes.len() || !is_ident_byte(bytes[end]);
        if before_ok && after_ok {
            out.push_str(&text[copied..start]);
            out.push_str(to);
            copied = end;
        }
    }

    out.push_str(&text[copied..]);
    out
}

/// Remove block comments, line comments and `#` directive lines while
/// leaving double-quoted and `@"verbatim"` string literals intact.
///
/// A line comment leaves its newline behind. Where no alternative can
/// complete (an unterminated `/*` or `"`), the text is copied through.
pub fn strip_comments(text: &str) -> String {
    COMMENTS_AND_LITERALS
        .replace_all(text, |caps: &Captures| {
            let matched = &caps[0];
            let kept = match matched.as_bytes() {
                [b'/', b'*', ..] | [b'#', ..] => "",
                [b'/', b'/', ..] if matched.ends_with('\n') => "\n",
                [b'/', b'/', ..] => "",
                // string literal
                _ => matched,
            };
            kept.to_string()
        })
        .into_owned()
}

/// Fold line terminators to one space and tabs to two, then collapse every
/// run of spaces into a single space.
pub fn normalize_whitespace(text: &str) -> String {
    let folded = LINE_TERMINATORS.replace_all(text, " ").replace('\t', "  ");
    SPACE_RUNS.replace_all(&folded, " ").into_owned()
}

/// Full preprocessing pass: substitution, comment stripping, whitespace
/// normalization
pub fn preprocess(source: &str, table: &SubstitutionTable, mode: SubstitutionMode) -> String {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    let substituted = table.apply(source, mode);
    let stripped = strip_comments(&substituted);
    let normalized = normalize_whitespace(&stripped);

    log::debug!(
        "Preprocessed {} bytes into {} bytes with {} substitutions",
        source.len(),
        normalized.len(),
        table.len()
    );

    normalized
}
