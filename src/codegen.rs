//! Cg code generation from a parsed program
//!
//! Globals become parameters of the generated `main`, with semantics bound
//! in declaration order: samplers get sequential `TEXUNITn` slots, varyings
//! get sequential `TEXCOORDn` slots, and vertex shaders gain a `POSITION`
//! output. Helper functions are re-emitted ahead of `main`.

use crate::config::TranslatorConfig;
use crate::error::Result;
use crate::parser::{ParsedProgram, ShaderFunction};
use crate::rewrite::apply_rules;
use crate::shader::ShaderKind;

/// Emits target-dialect source for a parsed program
pub struct CodeGenerator<'c> {
    config: &'c TranslatorConfig,
}

impl<'c> CodeGenerator<'c> {
    pub fn new(config: &'c TranslatorConfig) -> Self {
        Self { config }
    }

    /// Generate the complete output file
    pub fn generate(&self, program: &ParsedProgram, kind: ShaderKind) -> Result<String> {
        let main = program.main()?;
        let indent = &self.config.indent;

        let mut output = String::new();
        output.push_str(&format!("// Auto-generated from GLSL {} shader\n", kind.label()));

        for function in program.helper_functions() {
            output.push_str(&self.function_block(function));
        }

        let params = self.main_params(program, kind);
        output.push_str(&format!("{} main(\n", kind.entry_return_type()));
        for (index, param) in params.iter().enumerate() {
            output.push_str(indent);
            output.push_str(param);
            if index + 1 < params.len() {
                output.push(',');
            }
            output.push('\n');
        }
        if params.is_empty() {
            output.push('\n');
        }
        output.push_str(&format!("{})\n", indent));
        output.push_str("{\n");
        output.push_str(&self.format_body(&main.body));
        output.push_str("\n}\n");

        log::debug!(
            "Generated {} shader with {} parameters and {} helper functions",
            kind,
            params.len(),
            program.helper_functions().count()
        );

        Ok(output)
    }

    /// Parameters of the generated `main`, in emission order, without
    /// indentation or separators
    pub fn main_params(&self, program: &ParsedProgram, kind: ShaderKind) -> Vec<String> {
        let mut params = Vec::with_capacity(
            program.attributes.len() + program.uniforms.len() + program.varyings.len() + 1,
        );

        for attribute in &program.attributes {
            params.push(format!("{} {}", attribute.data_type, attribute.name));
        }

        let mut sampler_count = 0;
        for uniform in &program.uniforms {
            if uniform.data_type == self.config.sampler_type {
                params.push(format!(
                    "uniform {} {} : TEXUNIT{}",
                    uniform.data_type, uniform.name, sampler_count
                ));
                sampler_count += 1;
            } else {
                params.push(format!("uniform {} {}", uniform.data_type, uniform.name));
            }
        }

        let direction = kind.varying_direction();
        if kind == ShaderKind::Vertex {
            params.push(format!(
                "float4 {} {} : POSITION",
                direction,
                self.config.position_output()
            ));
        }
        for (slot, varying) in program.varyings.iter().enumerate() {
            params.push(format!(
                "{} {} {} : TEXCOORD{}",
                varying.data_type, direction, varying.name, slot
            ));
        }

        params
    }

    /// Run the rewrite rules over a body and indent its first line
    pub fn format_body(&self, body: &str) -> String {
        let indent = &self.config.indent;
        format!("{}{}", indent, apply_rules(&self.config.rewrite_rules, body, indent))
    }

    fn function_block(&self, function: &ShaderFunction) -> String {
        format!(
            "{} {} ({})\n{{\n{}\n}}\n\n",
            function.return_type,
            function.name,
            function.params,
            self.format_body(&function.body)
        )
    }
}
