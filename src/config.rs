//! Command-line options and driver constants

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Program shown when no file is given
pub const DEMO_PROGRAM: &str = r#"public class Main {
    int count = 0;
    String greeting = "hello";

    public static int sum(int a, int b) {
        int total = a + b * 2, limit = 10;
        if (total >= limit) {
            total -= 1;
        } else if (total == 0) {
            return 0;
        } else {
            total = limit - total;
        }
        for (int i = 0; i < total; i += 1) {
            count = count + i;
        }
        return total;
    }

    void run() {
        Printer p = new Printer(greeting);
        p.print(sum(1, 2)).flush();
    }
}
"#;

/// Event poll timeout of the explorer loop
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Rows moved by PgUp/PgDn in the tree pane
pub const PAGE_SIZE: usize = 10;

pub const USAGE: &str = "Usage: treeform [--print|--tui] [FILE]

Parses FILE (or a built-in demo program) and shows its syntax tree.

Options:
  --print     Print the tree to stdout (default without FILE)
  --tui       Open the interactive tree explorer (default with FILE)
  -h, --help  Show this message";

/// How the parsed tree is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Print,
    Tui,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceInput {
    File(PathBuf),
    Demo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub mode: Mode,
    pub input: SourceInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("help requested")]
    Help,

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("--print and --tui are mutually exclusive")]
    ConflictingModes,

    #[error("more than one input file given ('{first}', '{second}')")]
    ExtraFile { first: String, second: String },
}

impl Options {
    /// Parse options from the arguments following the program name.
    pub fn from_args<I, S>(args: I) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut mode = None;
        let mut file: Option<String> = None;

        for arg in args {
            let arg = arg.into();
            let requested = match arg.as_str() {
                "-h" | "--help" => return Err(UsageError::Help),
                "--print" => Some(Mode::Print),
                "--tui" => Some(Mode::Tui),
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    return Err(UsageError::UnknownOption(flag.to_string()));
                }
                _ => None,
            };

            match (requested, mode) {
                (Some(new), Some(old)) if new != old => return Err(UsageError::ConflictingModes),
                (Some(new), _) => mode = Some(new),
                (None, _) => {
                    if let Some(first) = file {
                        return Err(UsageError::ExtraFile { first, second: arg });
                    }
                    file = Some(arg);
                }
            }
        }

        let input = match file {
            Some(path) => SourceInput::File(PathBuf::from(path)),
            None => SourceInput::Demo,
        };
        let mode = mode.unwrap_or(match input {
            SourceInput::File(_) => Mode::Tui,
            SourceInput::Demo => Mode::Print,
        });

        Ok(Options { mode, input })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_depend_on_input() {
        let options = Options::from_args(Vec::<String>::new()).unwrap();
        assert_eq!(options.mode, Mode::Print);
        assert_eq!(options.input, SourceInput::Demo);

        let options = Options::from_args(["prog.txt"]).unwrap();
        assert_eq!(options.mode, Mode::Tui);
        assert_eq!(options.input, SourceInput::File(PathBuf::from("prog.txt")));
    }

    #[test]
    fn test_explicit_mode() {
        let options = Options::from_args(["--print", "prog.txt"]).unwrap();
        assert_eq!(options.mode, Mode::Print);
        let options = Options::from_args(["--tui"]).unwrap();
        assert_eq!(options.mode, Mode::Tui);
        assert_eq!(options.input, SourceInput::Demo);
        // Repeating the same flag is harmless
        assert!(Options::from_args(["--tui", "--tui"]).is_ok());
    }

    #[test]
    fn test_usage_errors() {
        assert_eq!(Options::from_args(["-h"]), Err(UsageError::Help));
        assert_eq!(
            Options::from_args(["--verbose"]),
            Err(UsageError::UnknownOption("--verbose".to_string()))
        );
        assert_eq!(
            Options::from_args(["--print", "--tui"]),
            Err(UsageError::ConflictingModes)
        );
        assert!(matches!(
            Options::from_args(["a.txt", "b.txt"]),
            Err(UsageError::ExtraFile { .. })
        ));
    }

    #[test]
    fn test_demo_program_parses() {
        let program = crate::parser::parse(DEMO_PROGRAM).unwrap();
        assert_eq!(program.statements.len(), 1);
    }
}
