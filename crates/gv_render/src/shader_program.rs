//! Shader program lifecycle: compile both stages, link, report, bind.
//!
//! The GPU API sits behind [`ShaderBackend`]. `ShaderProgram` owns the
//! compile-then-link protocol and guarantees that no stage object outlives an
//! init attempt and that a program handle exists only after a successful link.
//! Failures are reported through `bool` results plus the last diagnostic; the
//! only panic is binding a program that was never initialised.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Upper bound on the diagnostic text kept for `error()`.
pub const MAX_DIAGNOSTIC_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn label(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShaderError {
    #[error("Failed to read {stage} shader {}: {message}", .path.display())]
    Io {
        stage: ShaderStage,
        path: PathBuf,
        message: String,
    },
    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("program failed to link: {log}")]
    Link { log: String },
}

/// The graphics API operations a program needs.
///
/// Implementations report failures as the API's diagnostic log. A failed
/// `link_program` must not leave a program object alive.
pub trait ShaderBackend {
    type Stage;
    type Program;
    /// Whatever a program gets bound into (a render pass, a context).
    type Target: ?Sized;

    fn compile_stage(&mut self, stage: ShaderStage, source: &str) -> Result<Self::Stage, String>;
    fn link_program(
        &mut self,
        vertex: &Self::Stage,
        fragment: &Self::Stage,
    ) -> Result<Self::Program, String>;
    fn delete_stage(&mut self, stage: Self::Stage);
    fn delete_program(&mut self, program: Self::Program);
    fn use_program(&self, program: &Self::Program, target: &mut Self::Target);
}

pub struct ShaderProgram<B: ShaderBackend> {
    backend: B,
    program: Option<B::Program>,
    last_error: Option<ShaderError>,
    error_text: String,
}

impl<B: ShaderBackend> ShaderProgram<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            program: None,
            last_error: None,
            error_text: String::new(),
        }
    }

    /// Compile and link from in-memory sources. Any previously linked program
    /// is released first, so a failed attempt leaves the object uninitialised.
    pub fn init_with_source(&mut self, vertex_source: &str, fragment_source: &str) -> bool {
        self.release();
        match self.build(vertex_source, fragment_source) {
            Ok(program) => {
                self.program = Some(program);
                true
            }
            Err(err) => {
                self.record(err);
                false
            }
        }
    }

    /// Read both stages from disk, then compile and link. A read failure is
    /// reported like a compile failure and nothing is compiled.
    pub fn init_with_paths(&mut self, vertex_path: &Path, fragment_path: &Path) -> bool {
        self.release();
        let sources = read_stage(ShaderStage::Vertex, vertex_path).and_then(|vertex| {
            read_stage(ShaderStage::Fragment, fragment_path).map(|fragment| (vertex, fragment))
        });
        match sources {
            Ok((vertex, fragment)) => self.init_with_source(&vertex, &fragment),
            Err(err) => {
                self.record(err);
                false
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.program.is_some()
    }

    /// Last recorded diagnostic, empty until something fails. Human readable
    /// only and capped at [`MAX_DIAGNOSTIC_LEN`] bytes.
    pub fn error(&self) -> &str {
        &self.error_text
    }

    pub fn last_error(&self) -> Option<&ShaderError> {
        self.last_error.as_ref()
    }

    pub fn program(&self) -> Option<&B::Program> {
        self.program.as_ref()
    }

    /// Bind the program for subsequent draws.
    ///
    /// # Panics
    ///
    /// Panics if the program is not initialised.
    pub fn use_program(&self, target: &mut B::Target) {
        match &self.program {
            Some(program) => self.backend.use_program(program, target),
            None => panic!("ShaderProgram is not initialized"),
        }
    }

    fn build(&mut self, vertex_source: &str, fragment_source: &str) -> Result<B::Program, ShaderError> {
        let vertex = self
            .backend
            .compile_stage(ShaderStage::Vertex, vertex_source)
            .map_err(|log| ShaderError::Compile {
                stage: ShaderStage::Vertex,
                log,
            })?;

        let fragment = match self
            .backend
            .compile_stage(ShaderStage::Fragment, fragment_source)
        {
            Ok(stage) => stage,
            Err(log) => {
                self.backend.delete_stage(vertex);
                return Err(ShaderError::Compile {
                    stage: ShaderStage::Fragment,
                    log,
                });
            }
        };

        let linked = self.backend.link_program(&vertex, &fragment);
        // Stages are not needed after linking, whatever the outcome.
        self.backend.delete_stage(vertex);
        self.backend.delete_stage(fragment);
        linked.map_err(|log| ShaderError::Link { log })
    }

    fn record(&mut self, err: ShaderError) {
        log::error!("{err}");
        self.error_text = truncate_diagnostic(&err.to_string());
        self.last_error = Some(err);
    }

    fn release(&mut self) {
        if let Some(program) = self.program.take() {
            self.backend.delete_program(program);
        }
    }
}

impl<B: ShaderBackend> Drop for ShaderProgram<B> {
    fn drop(&mut self) {
        self.release();
    }
}

fn read_stage(stage: ShaderStage, path: &Path) -> Result<String, ShaderError> {
    fs::read_to_string(path).map_err(|e| ShaderError::Io {
        stage,
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn truncate_diagnostic(text: &str) -> String {
    if text.len() <= MAX_DIAGNOSTIC_LEN {
        return text.to_string();
    }
    let mut end = MAX_DIAGNOSTIC_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}
