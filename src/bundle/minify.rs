//! JS and CSS minification.
//!
//! Uses oxc for JavaScript and lightningcss for CSS.

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier as OxcCompressor, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use crate::error::CompressionError;

/// JavaScript minifier settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsOptions {
    /// Preferred maximum line width, `None` for a single line.
    pub line_break: Option<usize>,
    /// Rename local symbols.
    pub mangle: bool,
    /// Log input and output sizes.
    pub verbose: bool,
    pub preserve_semicolons: bool,
    /// Skip compression passes and only strip whitespace.
    pub disable_optimizations: bool,
}

impl Default for JsOptions {
    fn default() -> Self {
        Self {
            line_break: Some(120),
            mangle: false,
            verbose: false,
            preserve_semicolons: true,
            disable_optimizations: true,
        }
    }
}

/// CSS minifier settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssOptions {
    /// Break the line after a rule once it reaches this width.
    pub line_break: Option<usize>,
}

impl Default for CssOptions {
    fn default() -> Self {
        Self {
            line_break: Some(120),
        }
    }
}

/// Text minifier for both asset kinds.
pub trait Minifier: Send + Sync {
    fn minify_js(&self, source: &str, options: &JsOptions) -> Result<String, CompressionError>;

    fn minify_css(&self, source: &str, options: &CssOptions) -> Result<String, CompressionError>;
}

/// [`Minifier`] backed by oxc and lightningcss.
#[derive(Debug, Default, Clone, Copy)]
pub struct OxcMinifier;

impl Minifier for OxcMinifier {
    fn minify_js(&self, source: &str, options: &JsOptions) -> Result<String, CompressionError> {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, SourceType::cjs()).parse();
        if !ret.errors.is_empty() {
            let message = ret
                .errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(CompressionError::Js(message));
        }

        let mut program = ret.program;
        let minifier_options = MinifierOptions {
            mangle: options.mangle.then(MangleOptions::default),
            compress: (!options.disable_optimizations).then(CompressOptions::smallest),
        };
        let ret = OxcCompressor::new(minifier_options).minify(&allocator, &mut program);
        let code = Codegen::new()
            .with_options(CodegenOptions {
                minify: true,
                comments: CommentOptions::disabled(),
                ..CodegenOptions::default()
            })
            .with_scoping(ret.scoping)
            .build(&program)
            .code;

        if options.verbose {
            crate::log!("minify"; "js {} -> {} bytes", source.len(), code.len());
        }
        Ok(code)
    }

    fn minify_css(&self, source: &str, options: &CssOptions) -> Result<String, CompressionError> {
        let stylesheet = StyleSheet::parse(source, ParserOptions::default())
            .map_err(|err| CompressionError::Css(err.to_string()))?;
        let result = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..PrinterOptions::default()
            })
            .map_err(|err| CompressionError::Css(err.to_string()))?;

        Ok(match options.line_break {
            Some(width) if width > 0 => break_css_lines(&result.code, width),
            _ => result.code,
        })
    }
}

/// Insert a newline after each `}` that ends a line of at least `width` bytes.
fn break_css_lines(css: &str, width: usize) -> String {
    let mut out = String::with_capacity(css.len() + css.len() / width + 1);
    let mut line_start = 0;
    for c in css.chars() {
        out.push(c);
        if c == '}' && out.len() - line_start >= width {
            out.push('\n');
            line_start = out.len();
        }
    }
    out
}
