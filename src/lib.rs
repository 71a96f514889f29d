//! GLSL to Cg shader translator
//!
//! Converts GLSL vertex and fragment shaders written with
//! `attribute`/`uniform`/`varying` globals into Cg programs whose `main`
//! takes those globals as semantic-annotated parameters.
//!
//! The pipeline is lexical: [`preprocessor`] normalizes the text, [`token`]
//! splits it, [`parser`] recovers declarations and function bodies, and
//! [`codegen`] re-emits them. [`translator`] ties the steps together and
//! handles files.

pub mod codegen;
pub mod config;
pub mod error;
pub mod logging;
pub mod parser;
pub mod preprocessor;
pub mod rewrite;
pub mod shader;
pub mod token;
pub mod translator;

pub use config::TranslatorConfig;
pub use error::{Result, TranslateError};
pub use preprocessor::{SubstitutionMode, SubstitutionTable};
pub use rewrite::RewriteRule;
pub use shader::{output_path_for, ShaderKind};
pub use translator::{
    plan_output, translate_batch, translate_batch_into, translate_file, translate_source, BatchReport, FileFailure,
    FileSink, OutputSink, Translation,
};
