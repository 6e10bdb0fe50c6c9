//! Minification of merged bundles.
//!
//! The pipeline never minifies content itself; it hands each assembled
//! bundle to a [`Minifier`] and writes whatever comes back. The stock
//! implementation pipes the buffer through an external compressor process
//! (Closure Compiler for JavaScript, YUI Compressor for CSS), but anything
//! that maps bytes to bytes can stand in, which is what the tests do.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

use log::debug;

use crate::error_handling::MinifyError;

/// Turns raw JavaScript or CSS text into a smaller equivalent.
pub trait Minifier {
    /// Returns the minified form of `input`.
    fn minify(&self, input: &[u8]) -> Result<Vec<u8>, MinifyError>;
}

/// Minifier that pipes the buffer through an external command.
///
/// The full input is written to the child's standard input and the child's
/// standard output becomes the result. The exit status is deliberately not
/// consulted: a compressor that rejects its input yields whatever it managed
/// to emit (possibly nothing), and the run carries on with that. Only a
/// failure to start the process at all is an error.
#[derive(Debug, Clone)]
pub struct CommandMinifier {
    program: String,
    args: Vec<String>,
}

impl CommandMinifier {
    /// Creates a minifier that runs `program` with `args`.
    pub fn new<P, I, S>(program: P, args: I) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandMinifier {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// The Google Closure Compiler invocation used for JavaScript bundles.
    pub fn closure_compiler(jar: &Path) -> Self {
        CommandMinifier::new(
            "java",
            [
                "-jar".to_string(),
                jar.display().to_string(),
                "--compilation_level".to_string(),
                "SIMPLE_OPTIMIZATIONS".to_string(),
            ],
        )
    }

    /// The YUI Compressor invocation used for the merged stylesheet.
    pub fn yuicompressor(jar: &Path) -> Self {
        CommandMinifier::new(
            "java",
            [
                "-jar".to_string(),
                jar.display().to_string(),
                "--type".to_string(),
                "css".to_string(),
                "--charset".to_string(),
                "utf-8".to_string(),
            ],
        )
    }
}

impl Minifier for CommandMinifier {
    fn minify(&self, input: &[u8]) -> Result<Vec<u8>, MinifyError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| MinifyError::SpawnError {
                program: self.program.clone(),
                source,
            })?;

        // Feed stdin from a helper thread so a child that emits output before
        // draining its input cannot deadlock both pipes.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| MinifyError::StdinUnavailable(self.program.clone()))?;
        let buffer = input.to_vec();
        let writer = thread::spawn(move || {
            // A child that exits early closes the pipe mid-write; that falls
            // under the ignored-exit-status policy above.
            let _ = stdin.write_all(&buffer);
        });

        let output = child.wait_with_output()?;
        let _ = writer.join();

        if !output.status.success() {
            debug!(
                "minifier `{}` exited with {}; keeping its output anyway",
                self.program, output.status
            );
        }

        Ok(output.stdout)
    }
}
