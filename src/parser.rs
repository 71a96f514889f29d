//! Declaration and function parser
//!
//! Recovers the global `attribute`/`uniform`/`varying` declarations and the
//! function definitions of a preprocessed shader. Function parameter lists
//! and bodies are kept as raw text; only their delimiters are matched.

use crate::error::{Result, TranslateError};
use crate::token::{TokenStream, Tokenizer, DELIMITERS};

/// Storage qualifier of a global declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Qualifier {
    Attribute,
    Uniform,
    Varying,
}

impl Qualifier {
    pub fn keyword(self) -> &'static str {
        match self {
            Qualifier::Attribute => "attribute",
            Qualifier::Uniform => "uniform",
            Qualifier::Varying => "varying",
        }
    }

    pub fn from_keyword(token: &str) -> Option<Self> {
        match token {
            "attribute" => Some(Qualifier::Attribute),
            "uniform" => Some(Qualifier::Uniform),
            "varying" => Some(Qualifier::Varying),
            _ => None,
        }
    }
}

/// A global `qualifier data_type name;` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub data_type: String,
}

/// A function definition with its parameter list and body as raw text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderFunction {
    pub name: String,
    pub return_type: String,
    pub params: String,
    pub body: String,
}

impl ShaderFunction {
    pub fn is_main(&self) -> bool {
        self.name == "main"
    }
}

/// Everything recovered from one source file, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedProgram {
    pub attributes: Vec<Declaration>,
    pub uniforms: Vec<Declaration>,
    pub varyings: Vec<Declaration>,
    pub functions: Vec<ShaderFunction>,
}

impl ParsedProgram {
    /// The entry point
    pub fn main(&self) -> Result<&ShaderFunction> {
        self.functions
            .iter()
            .find(|f| f.is_main())
            .ok_or(TranslateError::MissingMainFunction)
    }

    /// Every function except `main`, in source order
    pub fn helper_functions(&self) -> impl Iterator<Item = &ShaderFunction> {
        self.functions.iter().filter(|f| !f.is_main())
    }

    fn declarations_mut(&mut self, qualifier: Qualifier) -> &mut Vec<Declaration> {
        match qualifier {
            Qualifier::Attribute => &mut self.attributes,
            Qualifier::Uniform => &mut self.uniforms,
            Qualifier::Varying => &mut self.varyings,
        }
    }
}

/// Parse preprocessed shader text
pub fn parse(text: &str) -> Result<ParsedProgram> {
    parse_tokens(&mut Tokenizer::new(text))
}

/// Parse from any token stream until it runs dry
pub fn parse_tokens<'a, T: TokenStream<'a>>(tokens: &mut T) -> Result<ParsedProgram> {
    let mut program = ParsedProgram::default();

    loop {
        let token = tokens.next_token();
        if token.is_empty() {
            break;
        }

        if let Some(qualifier) = Qualifier::from_keyword(token) {
            let declaration = parse_declaration(tokens, qualifier)?;
            log::debug!(
                "{} {} {}",
                qualifier.keyword(),
                declaration.data_type,
                declaration.name
            );
            program.declarations_mut(qualifier).push(declaration);
            continue;
        }

        match token {
            ";" => continue,
            "precision" => skip_statement(tokens, token)?,
            _ => {
                let function = parse_function(tokens, token)?;
                if function.is_main() && program.main().is_ok() {
                    return Err(TranslateError::DuplicateMainFunction);
                }
                log::debug!(
                    "function {} {}({}) with {} byte body",
                    function.return_type,
                    function.name,
                    function.params,
                    function.body.len()
                );
                program.functions.push(function);
            }
        }
    }

    Ok(program)
}

/// `data_type name ;` after the qualifier keyword
fn parse_declaration<'a, T: TokenStream<'a>>(
    tokens: &mut T,
    qualifier: Qualifier,
) -> Result<Declaration> {
    let keyword = qualifier.keyword();

    let data_type = tokens.next_token();
    if !is_word(data_type) {
        return Err(TranslateError::malformed_declaration(keyword, "a type", data_type));
    }
    let name = tokens.next_token();
    if !is_word(name) {
        return Err(TranslateError::malformed_declaration(keyword, "a name", name));
    }
    let terminator = tokens.next_token();
    if terminator != ";" {
        return Err(TranslateError::malformed_declaration(keyword, "';'", terminator));
    }

    Ok(Declaration {
        name: name.to_string(),
        data_type: data_type.to_string(),
    })
}

/// A token that can be a type or a name: not empty, not punctuation
fn is_word(token: &str) -> bool {
    !token.is_empty() && !token.starts_with(DELIMITERS)
}

/// Discard tokens through the next `;`
fn skip_statement<'a, T: TokenStream<'a>>(tokens: &mut T, keyword: &str) -> Result<()> {
    loop {
        match tokens.next_token() {
            ";" => return Ok(()),
            "" => return Err(TranslateError::malformed_declaration(keyword, "';'", "")),
            _ => {}
        }
    }
}

/// `name ( params ) { body }` after the return type
fn parse_function<'a, T: TokenStream<'a>>(tokens: &mut T, return_type: &str) -> Result<ShaderFunction> {
    let name = tokens.next_token();
    if name.is_empty() {
        return Err(TranslateError::unexpected_token(
            "function name",
            name,
            format!("declaration starting with '{}'", return_type),
        ));
    }

    let open_paren = tokens.next_token();
    if open_paren != "(" {
        return Err(TranslateError::unexpected_token(
            "(",
            open_paren,
            format!("header of function '{}'", name),
        ));
    }

    let (params, rest) =
        extract_params(tokens.remainder()).ok_or_else(|| TranslateError::unbalanced(name, '('))?;
    tokens.set_remainder(rest);

    let open_brace = tokens.next_token();
    if open_brace != "{" {
        return Err(TranslateError::unexpected_token(
            "{",
            open_brace,
            format!("header of function '{}'", name),
        ));
    }

    let (body, rest) =
        extract_body(tokens.remainder()).ok_or_else(|| TranslateError::unbalanced(name, '{'))?;
    tokens.set_remainder(rest);

    Ok(ShaderFunction {
        name: name.to_string(),
        return_type: return_type.to_string(),
        params: params.to_string(),
        body: body.to_string(),
    })
}

/// Split the text following a `(` at its matching `)`.
///
/// Returns the parameter text, without leading spaces but otherwise as
/// written, and everything after the `)`.
pub fn extract_params(text: &str) -> Option<(&str, &str)> {
    let close = find_matching(text, '(', ')')?;
    Some((text[..close].trim_start(), &text[close + 1..]))
}

/// Split the text following a `{` at its matching `}`.
///
/// Returns the trimmed body, without the outer braces, and everything after
/// the closing brace.
pub fn extract_body(text: &str) -> Option<(&str, &str)> {
    let close = find_matching(text, '{', '}')?;
    Some((text[..close].trim(), &text[close + 1..]))
}

/// Byte index of the `close` that brings the nesting depth, starting at one,
/// back to zero
fn find_matching(text: &str, open: char, close: char) -> Option<usize> {
    let mut depth = 1usize;
    for (index, c) in text.char_indices() {
        if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(index);
            }
        } else if c == open {
            depth += 1;
        }
    }
    None
}
