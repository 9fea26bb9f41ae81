//! idlc-drv - Compiler driver.
//!
//! The driver is the outer shell around the core pipeline: it parses the
//! command line, reads source files, runs lexer → parser → AST compiler →
//! JSON generator for each file, prints diagnostics, and writes artifacts.
//! Each source file compiles independently in its own context.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser as ClapParser;
use tracing::{debug, info};

use idlc_ast::CompiledAst;
use idlc_json::JsonGenerator;
use idlc_lex::Lexer;
use idlc_par::Parser;
use idlc_util::{Handler, SourceFile};

/// Command-line options for `idlc`.
#[derive(Debug, ClapParser)]
#[command(
    name = "idlc",
    about = "IDL compiler front-end: compiles IDL files to a JSON artifact",
    override_usage = "idlc -o OUTPUT_PATH -f FILE [FILE ...]"
)]
pub struct Options {
    /// Artifact path for a single input file; with several input files this
    /// names a directory receiving one `<stem>.json` per file.
    #[arg(short = 'o', value_name = "OUTPUT_PATH")]
    pub output: PathBuf,

    /// IDL source files. Each file is compiled independently.
    #[arg(
        short = 'f',
        value_name = "FILE",
        required = true,
        num_args = 1..,
        action = clap::ArgAction::Append
    )]
    pub files: Vec<PathBuf>,
}

/// Owns the source files of one driver invocation.
#[derive(Default)]
pub struct SourceManager {
    sources: Vec<SourceFile>,
}

impl SourceManager {
    /// Reads `path` and adds it as a source file.
    pub fn create_source(&mut self, path: &Path) -> Result<()> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("couldn't read source file `{}`", path.display()))?;
        self.sources
            .push(SourceFile::new(path.display().to_string(), data));
        Ok(())
    }

    pub fn sources(&self) -> &[SourceFile] {
        &self.sources
    }
}

/// Runs the core pipeline for one source file and returns its artifact.
///
/// All diagnostics are printed to stderr. Any error-level diagnostic fails
/// the compilation and no artifact is returned.
pub fn compile_source(source: &SourceFile) -> Result<String> {
    let handler = Handler::new();
    let ast = Parser::new(Lexer::new(source, &handler), &handler).parse();

    let artifact = match &ast {
        Some(file) if !handler.has_errors() => match CompiledAst::compile(file, &handler) {
            Ok(compiled) => Some(JsonGenerator::new(&compiled).produce()),
            Err(_) => None,
        },
        _ => None,
    };

    for diagnostic in handler.diagnostics() {
        eprintln!("{diagnostic}");
    }

    match artifact {
        Some(artifact) if !handler.has_errors() => Ok(artifact),
        _ => bail!(
            "`{}` failed with {} error(s)",
            source.filename(),
            handler.error_count()
        ),
    }
}

/// Writes an artifact, creating missing parent directories. If the
/// destination already holds identical bytes the file is left untouched.
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("couldn't create output directory `{}`", parent.display())
            })?;
        }
    }

    if let Ok(existing) = fs::read(path) {
        if existing == contents.as_bytes() {
            debug!(path = %path.display(), "output unchanged, skipping write");
            return Ok(());
        }
    }

    fs::write(path, contents)
        .with_context(|| format!("couldn't write output file `{}`", path.display()))
}

/// Artifact destination for `source` when several files share one output
/// directory.
fn artifact_path(output_dir: &Path, source: &SourceFile) -> PathBuf {
    let stem = Path::new(source.filename())
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_else(|| "out".into());
    let mut name = stem;
    name.push(".json");
    output_dir.join(name)
}

/// Compiles every input file and writes the artifacts.
///
/// All files are compiled even when earlier ones fail, to surface as many
/// diagnostics as possible; the run fails if any file failed. Nothing is
/// written for a failed file.
pub fn run(options: &Options) -> Result<()> {
    let mut manager = SourceManager::default();
    for file in &options.files {
        manager.create_source(file)?;
    }

    let multiple = manager.sources().len() > 1;
    let mut failures = 0usize;

    for source in manager.sources() {
        info!(file = source.filename(), "compiling");
        match compile_source(source) {
            Ok(artifact) => {
                let destination = if multiple {
                    artifact_path(&options.output, source)
                } else {
                    options.output.clone()
                };
                write_output(&destination, &artifact)?;
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} file(s) failed to compile", manager.sources().len());
    }
    Ok(())
}
