//! Translation entry points
//!
//! `translate_source` is the pure text-to-text pipeline. `translate_file`
//! wraps it with the read and write, and `translate_batch` runs a list of
//! files, recording failures per file and carrying on.

use std::fs;
use std::path::{Path, PathBuf};

use crate::codegen::CodeGenerator;
use crate::config::TranslatorConfig;
use crate::error::{Result, TranslateError};
use crate::parser;
use crate::preprocessor;
use crate::shader::{output_path_for, ShaderKind};

/// Outcome of one successful file translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub input: PathBuf,
    pub output: PathBuf,
    pub kind: ShaderKind,
}

/// Translate shader source text into Cg source text
pub fn translate_source(source: &str, kind: ShaderKind, config: &TranslatorConfig) -> Result<String> {
    let normalized = preprocessor::preprocess(source, &config.substitutions, config.substitution_mode);
    let program = parser::parse(&normalized)?;
    CodeGenerator::new(config).generate(&program, kind)
}

/// Read a UTF-8 shader file
pub fn read_source(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| TranslateError::io(path, e))?;
    String::from_utf8(bytes).map_err(|source| TranslateError::InvalidEncoding {
        path: path.to_path_buf(),
        source,
    })
}

/// Destination for generated code
pub trait OutputSink {
    /// Deliver the code generated for `translation.input`
    fn write(&mut self, translation: &Translation, code: &str) -> Result<()>;
}

/// Writes each result to its planned output path
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSink;

impl OutputSink for FileSink {
    fn write(&mut self, translation: &Translation, code: &str) -> Result<()> {
        fs::write(&translation.output, code).map_err(|e| TranslateError::io(&translation.output, e))?;
        log::info!(
            "Translated {} shader to file: {}",
            translation.kind,
            translation.output.display()
        );
        Ok(())
    }
}

/// Translate `input` as a `kind` shader and hand the result to `sink`
pub fn translate_into<S: OutputSink + ?Sized>(
    input: &Path,
    output: &Path,
    kind: ShaderKind,
    config: &TranslatorConfig,
    sink: &mut S,
) -> Result<Translation> {
    log::debug!("Loading file: {}", input.display());

    let source = read_source(input)?;
    let generated = translate_source(&source, kind, config)?;

    let translation = Translation {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        kind,
    };
    sink.write(&translation, &generated)?;
    Ok(translation)
}

/// Translate `input` as a `kind` shader and write the result to `output`
pub fn translate_file(
    input: &Path,
    output: &Path,
    kind: ShaderKind,
    config: &TranslatorConfig,
) -> Result<Translation> {
    translate_into(input, output, kind, config, &mut FileSink)
}

/// Output location and kind for `input`, honoring an explicit kind override.
///
/// Without an override the kind comes from the extension. With one, any
/// extension is accepted and replaced by the kind's output extension.
pub fn plan_output(input: &Path, kind_override: Option<ShaderKind>) -> Result<(PathBuf, ShaderKind)> {
    match kind_override {
        Some(kind) => Ok((input.with_extension(kind.output_extension()), kind)),
        None => output_path_for(input),
    }
}

/// A file that could not be translated
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: TranslateError,
}

/// Results of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<Translation>,
    pub failed: Vec<FileFailure>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Translate every file, next to its input, without stopping at failures
pub fn translate_batch<P: AsRef<Path>>(
    inputs: &[P],
    config: &TranslatorConfig,
    kind_override: Option<ShaderKind>,
) -> BatchReport {
    translate_batch_into(inputs, config, kind_override, &mut FileSink)
}

/// Translate every file into `sink`, recording failures and carrying on
pub fn translate_batch_into<P, S>(
    inputs: &[P],
    config: &TranslatorConfig,
    kind_override: Option<ShaderKind>,
    sink: &mut S,
) -> BatchReport
where
    P: AsRef<Path>,
    S: OutputSink + ?Sized,
{
    log::info!("Translating {} files", inputs.len());

    let mut report = BatchReport::default();
    for input in inputs {
        let input = input.as_ref();
        log::debug!("Processing file: {}", input.display());

        let result = plan_output(input, kind_override)
            .and_then(|(output, kind)| translate_into(input, &output, kind, config, &mut *sink));

        match result {
            Ok(translation) => report.succeeded.push(translation),
            Err(error) => {
                log::error!("{}: {}", input.display(), error);
                report.failed.push(FileFailure {
                    path: input.to_path_buf(),
                    error,
                });
            }
        }
    }

    log::info!(
        "Translation complete: {} succeeded, {} failed",
        report.succeeded.len(),
        report.failed.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessor::{SubstitutionMode, SubstitutionTable};
    use crate::rewrite::RewriteRule;

    const VERTEX_SOURCE: &str = "uniform mat4 u_mvp; attribute vec4 a_position; \
                                 void main(){ gl_Position = u_mvp * a_position; }";

    #[test]
    fn test_vertex_scenario() {
        let output = translate_source(VERTEX_SOURCE, ShaderKind::Vertex, &TranslatorConfig::default()).unwrap();

        assert!(output.starts_with("// Auto-generated from GLSL vertex shader\nvoid main(\n"));
        assert!(output.contains("float4x4 u_mvp"));
        assert!(output.contains("float4 a_position"));
        assert!(output.contains("v_position : POSITION"));
        assert!(output.contains("v_position = mul( a_position, u_mvp );"));
        assert_eq!(
            output,
            "// Auto-generated from GLSL vertex shader\n\
             void main(\n\
             \tfloat4 a_position,\n\
             \tuniform float4x4 u_mvp,\n\
             \tfloat4 out v_position : POSITION\n\
             \t)\n\
             {\n\
             \tv_position = mul( a_position, u_mvp );\n\
             \t\n\
             }\n"
        );
    }

    #[test]
    fn test_fragment_with_comments_and_directives() {
        let source = "#ifdef GL_ES\nprecision mediump float;\n#endif\n\
                      // texture lookup\n\
                      uniform sampler2D s_texture; /* base */\n\
                      varying vec2 v_texCoord;\n\
                      void main()\n{\n\tgl_FragColor = texture2D(s_texture, v_texCoord);\n}\n";
        let output = translate_source(source, ShaderKind::Fragment, &TranslatorConfig::default()).unwrap();

        assert_eq!(
            output,
            "// Auto-generated from GLSL fragment shader\n\
             float4 main(\n\
             \tuniform sampler2D s_texture : TEXUNIT0,\n\
             \tfloat2 in v_texCoord : TEXCOORD0\n\
             \t)\n\
             {\n\
             \treturn tex2D(s_texture, v_texCoord);\n\
             \t\n\
             }\n"
        );
    }

    #[test]
    fn test_custom_mvp_uniform() {
        let source = "uniform mat4 u_wvp; attribute vec4 a_pos; void main(){ gl_Position = u_wvp * a_pos; }";
        let config = TranslatorConfig::default().with_mvp_uniform("u_wvp").unwrap();
        let output = translate_source(source, ShaderKind::Vertex, &config).unwrap();
        assert!(output.contains("v_position = mul( a_pos, u_wvp );"));
    }

    #[test]
    fn test_whole_word_substitution() {
        let source = "uniform float mixer; void main(){ gl_FragColor = mix(a, b, mixer); }";

        let config = TranslatorConfig::default().with_substitution_mode(SubstitutionMode::WholeWord);
        let output = translate_source(source, ShaderKind::Fragment, &config).unwrap();
        assert!(output.contains("\tuniform float mixer\n"));
        assert!(output.contains("\treturn lerp(a, b, mixer);\n"));

        let output = translate_source(source, ShaderKind::Fragment, &TranslatorConfig::default()).unwrap();
        assert!(output.contains("\treturn lerp(a, b, lerper);\n"));
    }

    #[test]
    fn test_appended_rule_runs_after_defaults() {
        let rule = RewriteRule::new("fract-to-frac", r"\bfract\(", "frac(").unwrap();
        let config = TranslatorConfig::default().with_rule(rule);
        let output = translate_source(
            "varying float v_t; void main(){ gl_FragColor = float4(fract(v_t)); }",
            ShaderKind::Fragment,
            &config,
        )
        .unwrap();
        assert!(output.contains("\treturn float4(frac(v_t));\n"));
    }

    #[test]
    fn test_renamed_position_output_stays_in_sync() {
        let mut table = SubstitutionTable::glsl_to_cg().iter().collect::<Vec<_>>();
        for entry in &mut table {
            if entry.0 == "gl_Position" {
                entry.1 = "o_pos";
            }
        }
        let config = TranslatorConfig::default().with_substitutions(SubstitutionTable::from_pairs(table));
        let output = translate_source(VERTEX_SOURCE, ShaderKind::Vertex, &config).unwrap();

        assert!(output.contains("\tfloat4 out o_pos : POSITION\n"));
        assert!(output.contains("\to_pos = mul( a_position, u_mvp );\n"));
        assert!(!output.contains("v_position"));
    }

    #[test]
    fn test_missing_main_scenario() {
        let err = translate_source("uniform vec4 c; vec4 f(){ return c; }", ShaderKind::Fragment, &TranslatorConfig::default())
            .unwrap_err();
        assert!(matches!(err, TranslateError::MissingMainFunction));
    }

    #[test]
    fn test_translate_file_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("simple.vp");
        fs::write(&input, format!("\u{feff}{}", VERTEX_SOURCE)).unwrap();

        let (output, kind) = plan_output(&input, None).unwrap();
        let translation = translate_file(&input, &output, kind, &TranslatorConfig::default()).unwrap();

        assert_eq!(translation.output, dir.path().join("simple.cgvp"));
        assert_eq!(translation.kind, ShaderKind::Vertex);
        let written = fs::read_to_string(&translation.output).unwrap();
        assert!(written.contains("mul( a_position, u_mvp )"));
    }

    #[test]
    fn test_unterminated_uniform_in_fragment_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.fp");
        fs::write(&input, "uniform sampler2D s_tex\nvoid main(){ gl_FragColor = vec4(1.0); }\n").unwrap();

        let (output, kind) = plan_output(&input, None).unwrap();
        let err = translate_file(&input, &output, kind, &TranslatorConfig::default()).unwrap_err();
        assert!(matches!(err, TranslateError::MalformedDeclaration { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_and_non_utf8_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let config = TranslatorConfig::default();

        let missing = dir.path().join("missing.fp");
        let err = translate_file(&missing, &dir.path().join("missing.cgfp"), ShaderKind::Fragment, &config)
            .unwrap_err();
        assert!(matches!(err, TranslateError::Io { ref path, .. } if path == &missing));

        let latin1 = dir.path().join("latin1.fp");
        fs::write(&latin1, b"// caf\xe9\nvoid main(){ }").unwrap();
        let err = translate_file(&latin1, &dir.path().join("latin1.cgfp"), ShaderKind::Fragment, &config)
            .unwrap_err();
        assert!(matches!(err, TranslateError::InvalidEncoding { .. }));
    }

    #[test]
    fn test_kind_override_accepts_any_extension() {
        let (output, kind) = plan_output(Path::new("/s/water.glsl"), Some(ShaderKind::Fragment)).unwrap();
        assert_eq!(output, PathBuf::from("/s/water.cgfp"));
        assert_eq!(kind, ShaderKind::Fragment);
        assert!(plan_output(Path::new("/s/water.glsl"), None).is_err());
    }

    #[test]
    fn test_batch_continues_after_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good_vertex = dir.path().join("a.vp");
        let bad_extension = dir.path().join("b.txt");
        let no_main = dir.path().join("c.fp");
        let good_fragment = dir.path().join("d.fp");

        fs::write(&good_vertex, VERTEX_SOURCE).unwrap();
        fs::write(&bad_extension, VERTEX_SOURCE).unwrap();
        fs::write(&no_main, "uniform vec4 c;").unwrap();
        fs::write(&good_fragment, "void main(){ gl_FragColor = vec4(1.0); }").unwrap();

        let inputs = [&good_vertex, &bad_extension, &no_main, &good_fragment];
        let report = translate_batch(&inputs, &TranslatorConfig::default(), None);

        assert_eq!(report.total(), 4);
        assert!(!report.is_success());

        let outputs: Vec<_> = report.succeeded.iter().map(|t| t.output.clone()).collect();
        assert_eq!(outputs, [dir.path().join("a.cgvp"), dir.path().join("d.cgfp")]);
        assert!(outputs.iter().all(|p| p.exists()));

        assert_eq!(report.failed.len(), 2);
        assert_eq!(report.failed[0].path, bad_extension);
        assert!(matches!(report.failed[0].error, TranslateError::UnsupportedExtension { .. }));
        assert_eq!(report.failed[1].path, no_main);
        assert!(matches!(report.failed[1].error, TranslateError::MissingMainFunction));
    }

    #[derive(Default)]
    struct Collect(Vec<(PathBuf, String)>);

    impl OutputSink for Collect {
        fn write(&mut self, translation: &Translation, code: &str) -> Result<()> {
            self.0.push((translation.input.clone(), code.to_string()));
            Ok(())
        }
    }

    #[test]
    fn test_batch_into_custom_sink_writes_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("a.vp");
        let bad = dir.path().join("b.fp");
        fs::write(&good, VERTEX_SOURCE).unwrap();
        fs::write(&bad, "uniform float4 (; void main(){ }").unwrap();

        let mut sink = Collect::default();
        let report = translate_batch_into(&[&good, &bad], &TranslatorConfig::default(), None, &mut sink);

        assert_eq!(report.succeeded.len(), 1);
        assert!(matches!(report.failed[0].error, TranslateError::MalformedDeclaration { .. }));
        assert_eq!(sink.0.len(), 1);
        assert_eq!(sink.0[0].0, good);
        assert!(sink.0[0].1.contains("mul( a_position, u_mvp )"));
        assert!(!dir.path().join("a.cgvp").exists());
    }

    #[test]
    fn test_shared_config_across_threads() {
        let config = TranslatorConfig::default();
        let shared = &config;
        let sources = [
            (VERTEX_SOURCE, ShaderKind::Vertex),
            ("varying vec4 v_color; void main(){ gl_FragColor = v_color; }", ShaderKind::Fragment),
        ];

        let outputs: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = sources
                .iter()
                .map(|&(source, kind)| scope.spawn(move || translate_source(source, kind, shared)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap().unwrap()).collect()
        });

        assert!(outputs[0].contains("mul( a_position, u_mvp )"));
        assert!(outputs[1].contains("float4 in v_color : TEXCOORD0"));
        assert!(outputs[1].contains("return v_color;"));
    }
}
