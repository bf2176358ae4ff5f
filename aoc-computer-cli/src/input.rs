//! Loading program files from disk

use crate::error::CliError;
use aoc_computer::LoadedProgram;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Read and parse a program file
pub fn load_program(path: &Path) -> Result<LoadedProgram, CliError> {
    let content = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = content.len(), "read program file");

    content.parse().map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_computer::{ParseError, Registers};
    use tempfile::TempDir;

    #[test]
    fn test_load_program_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("program.txt");
        fs::write(
            &path,
            "Register A: 729\nRegister B: 0\nRegister C: 0\n\nProgram: 0,1,5,4,3,0\n",
        )
        .unwrap();

        let loaded = load_program(&path).unwrap();
        assert_eq!(loaded.registers, Registers::new(729, 0, 0));
        assert_eq!(loaded.program.to_string(), "0,1,5,4,3,0");
    }

    #[test]
    fn test_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.txt");
        let err = load_program(&path).unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
        assert!(err.to_string().contains("missing.txt"));
    }

    #[test]
    fn test_parse_error_keeps_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.txt");
        fs::write(&path, "Register A: 1\nProgram: 0,9\n").unwrap();

        match load_program(&path).unwrap_err() {
            CliError::Parse { path: err_path, source } => {
                assert_eq!(err_path, path);
                assert_eq!(
                    source,
                    ParseError::InvalidWord {
                        word: 9,
                        position: 1
                    }
                );
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
