use std::path::PathBuf;
use std::process::Command;

use crate::trace;

/// One generator invocation, fully resolved by the session. The output name,
/// when present, is always the first token, followed by the flattened
/// `key=value` pairs and any pass-through flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub template_name: String,
    pub quiet: bool,
    pub tokens: Vec<String>,
}

/// How a generator run ended short of success. Interruption is the
/// operator's doing and is not an error.
#[derive(Debug)]
pub enum GenerateFailure {
    Interrupted,
    Failed(String),
}

pub trait Generator {
    fn generate(&self, request: &GenerateRequest) -> Result<(), GenerateFailure>;
}

/// Spawns the underlying generator program:
/// `<program> -q -t <template> [<output>] [key=value ...]`.
pub struct ExecGenerator {
    program: PathBuf,
}

impl ExecGenerator {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        ExecGenerator {
            program: program.into(),
        }
    }
}

impl Generator for ExecGenerator {
    fn generate(&self, request: &GenerateRequest) -> Result<(), GenerateFailure> {
        let mut command = Command::new(&self.program);
        if request.quiet {
            command.arg("-q");
        }
        command.arg("-t").arg(&request.template_name);
        command.args(&request.tokens);

        trace!("spawning {:?}", command);

        let status = command.status().map_err(|e| {
            GenerateFailure::Failed(format!("could not run {}: {e}", self.program.display()))
        })?;

        if status.success() {
            return Ok(());
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;

            // 2 = SIGINT
            if status.signal() == Some(2) {
                return Err(GenerateFailure::Interrupted);
            }
        }

        Err(GenerateFailure::Failed(format!(
            "{} exited with {status}",
            self.program.display()
        )))
    }
}
