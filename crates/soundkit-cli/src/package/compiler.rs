//! Compiler trait and external command implementation

use std::path::Path;

use async_trait::async_trait;
use soundkit_core::{Error, Result};
use tokio::process::Command;

/// Something that turns the project's sources into distributable modules
#[async_trait]
pub trait ModuleCompiler: Send + Sync {
    /// Short description used in progress output and errors
    fn describe(&self) -> String;

    /// Compile, running from the project root
    async fn compile(&self, project_root: &Path) -> Result<()>;
}

/// Compiler backed by an external command such as `tsc`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandCompiler {
    program: String,
    args: Vec<String>,
}

impl CommandCompiler {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Split a whitespace-separated command line. Returns `None` for a blank line.
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }
}

#[async_trait]
impl ModuleCompiler for CommandCompiler {
    fn describe(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The child is killed if this future is dropped, e.g. when the build is
    /// abandoned after another step failed.
    async fn compile(&self, project_root: &Path) -> Result<()> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .current_dir(project_root)
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| Error::Command(format!("could not run `{}`: {}", self.describe(), e)))?;

        if !status.success() {
            return Err(Error::Command(format!(
                "`{}` exited with {}",
                self.describe(),
                status
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_line() {
        let compiler = CommandCompiler::parse("tsc -p  tsconfig.build.json").unwrap();
        assert_eq!(
            compiler,
            CommandCompiler::new(
                "tsc",
                vec!["-p".to_string(), "tsconfig.build.json".to_string()]
            )
        );
        assert_eq!(compiler.describe(), "tsc -p tsconfig.build.json");
    }

    #[test]
    fn test_parse_blank_line() {
        assert!(CommandCompiler::parse("   ").is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_command() {
        let compiler = CommandCompiler::parse("true").unwrap();
        compiler.compile(Path::new(".")).await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_command() {
        let compiler = CommandCompiler::parse("false").unwrap();
        let err = compiler.compile(Path::new(".")).await.unwrap_err();
        assert!(matches!(err, Error::Command(_)));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let compiler = CommandCompiler::parse("soundkit-no-such-compiler --build").unwrap();
        let err = compiler.compile(Path::new(".")).await.unwrap_err();
        assert!(err.to_string().contains("could not run"));
    }
}
