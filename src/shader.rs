//! Shader kinds and the file extensions that select them

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Result, TranslateError};

/// Which pipeline stage a shader belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    Vertex,
    Fragment,
}

impl ShaderKind {
    /// Lowercase label used in banners and log output
    pub fn label(self) -> &'static str {
        match self {
            ShaderKind::Vertex => "vertex",
            ShaderKind::Fragment => "fragment",
        }
    }

    /// Source extension (without the dot)
    pub fn input_extension(self) -> &'static str {
        match self {
            ShaderKind::Vertex => "vp",
            ShaderKind::Fragment => "fp",
        }
    }

    /// Generated file extension (without the dot)
    pub fn output_extension(self) -> &'static str {
        match self {
            ShaderKind::Vertex => "cgvp",
            ShaderKind::Fragment => "cgfp",
        }
    }

    /// Direction keyword given to varyings in the generated parameter list
    pub fn varying_direction(self) -> &'static str {
        match self {
            ShaderKind::Vertex => "out",
            ShaderKind::Fragment => "in",
        }
    }

    /// Return type of the generated entry point
    pub fn entry_return_type(self) -> &'static str {
        match self {
            ShaderKind::Vertex => "void",
            ShaderKind::Fragment => "float4",
        }
    }

    /// Determine the kind from a path's extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("vp") => Ok(ShaderKind::Vertex),
            Some("fp") => Ok(ShaderKind::Fragment),
            _ => Err(TranslateError::unsupported_extension(path)),
        }
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ShaderKind {
    type Err = TranslateError;

    fn from_str(kind: &str) -> Result<Self> {
        match kind.to_lowercase().as_str() {
            "vertex" | "vert" | "vs" | "vp" => Ok(ShaderKind::Vertex),
            "fragment" | "frag" | "fs" | "pixel" | "ps" | "fp" => Ok(ShaderKind::Fragment),
            _ => Err(TranslateError::InvalidShaderKind(kind.to_string())),
        }
    }
}

/// Work out where the translation of `input` goes and which kind it is.
///
/// The recognized extension is swapped for its generated counterpart in the
/// same directory, e.g. `water.vp` becomes `water.cgvp`.
pub fn output_path_for(input: &Path) -> Result<(PathBuf, ShaderKind)> {
    let kind = ShaderKind::from_path(input)?;
    Ok((input.with_extension(kind.output_extension()), kind))
}
