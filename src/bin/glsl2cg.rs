//! glsl2cg - Convert GLSL vertex/fragment shaders to Cg
//!
//! Usage:
//!   glsl2cg water.vp water.fp          # writes water.cgvp and water.cgfp
//!   glsl2cg --kind fragment blur.glsl  # force the shader kind
//!   glsl2cg --stdout water.vp          # print instead of writing

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;

use glsl2cg::logging::init_logging;
use glsl2cg::{
    translate_batch, translate_batch_into, OutputSink, Result, ShaderKind, SubstitutionMode, TranslateError,
    Translation, TranslatorConfig,
};

#[derive(Parser, Debug)]
#[command(
    name = "glsl2cg",
    about = "Translate GLSL vertex (.vp) and fragment (.fp) shaders into Cg (.cgvp/.cgfp)."
)]
struct Args {
    /// Shader files to translate
    #[arg(required = true, value_name = "FILE")]
    inputs: Vec<PathBuf>,

    /// Treat every input as this kind instead of looking at its extension
    #[arg(long, value_name = "vertex|fragment")]
    kind: Option<ShaderKind>,

    /// Print the generated code instead of writing output files
    #[arg(long, action = clap::ArgAction::SetTrue)]
    stdout: bool,

    /// Uniform holding the model-view-projection matrix
    #[arg(long, value_name = "NAME", default_value = "u_mvp")]
    mvp_uniform: String,

    /// Only substitute GLSL keywords that stand alone, not inside longer identifiers
    #[arg(long, action = clap::ArgAction::SetTrue)]
    whole_word: bool,

    /// Show debug output
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> Result<TranslatorConfig> {
        let mode = if self.whole_word {
            SubstitutionMode::WholeWord
        } else {
            SubstitutionMode::Substring
        };
        TranslatorConfig::default()
            .with_substitution_mode(mode)
            .with_mvp_uniform(&self.mvp_uniform)
    }
}

/// Prints each result under a header naming its input
struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write(&mut self, translation: &Translation, code: &str) -> Result<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "// ---- {} ({}) ----", translation.input.display(), translation.kind)
            .and_then(|_| out.write_all(code.as_bytes()))
            .map_err(|e| TranslateError::io(Path::new("<stdout>"), e))
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match args.config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };
    log::debug!(
        "Rewrite rules: {}",
        config
            .rewrite_rules
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let report = if args.stdout {
        translate_batch_into(&args.inputs, &config, args.kind, &mut StdoutSink)
    } else {
        translate_batch(&args.inputs, &config, args.kind)
    };

    eprintln!(
        "\nConversion complete: {} succeeded, {} failed",
        report.succeeded.len(),
        report.failed.len()
    );
    for failure in &report.failed {
        eprintln!("  X {}: {}", failure.path.display(), failure.error);
    }

    if !report.is_success() {
        std::process::exit(1);
    }
}
