use thiserror::Error;
use tracing::Level;

/// Words inserted when none are given on the command line.
pub const DEMO_WORDS: [&str; 3] = ["moo", "neigh", "quack"];

pub const USAGE: &str = "avl-strings
USAGE:
  avl-strings [OPTIONS] [--] [WORD]...

Inserts the words into an AVL tree and prints it sideways: the root on the
left, right subtrees above, left subtrees below. Without words, inserts
\"moo neigh quack\".

OPTIONS:
  --unbalanced           Insert as into a plain binary search tree, without rotations.
  --no-print             Only print the summary line.
  --log-level <LEVEL>    One of error, warn, info, debug, trace. Default: warn.
  -v, --verbose          Same as --log-level debug.
  -h, --help             Print this help.
";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InsertMode {
    #[default]
    Balanced,
    Unbalanced,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub mode: InsertMode,
    pub words: Vec<String>,
    pub log_level: Level,
    pub print: bool,
}

#[derive(Debug, PartialEq)]
pub enum Command {
    Run(Config),
    Help,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing value for {0}")]
    MissingValue(String),

    #[error("unknown option {0}")]
    UnknownFlag(String),

    #[error("unknown log level {0:?}")]
    UnknownLogLevel(String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mode: InsertMode::Balanced,
            words: Vec::new(),
            log_level: Level::WARN,
            print: true,
        }
    }
}

impl Config {
    /// Parses the command line, program name excluded.
    pub fn from_args<I>(args: I) -> Result<Command, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Config::default();
        let mut args = args.into_iter();
        let mut words_only = false;
        while let Some(arg) = args.next() {
            if words_only || !arg.starts_with('-') || arg == "-" {
                config.words.push(arg);
                continue;
            }
            match arg.as_str() {
                "--" => words_only = true,
                "-h" | "--help" => return Ok(Command::Help),
                "--unbalanced" => config.mode = InsertMode::Unbalanced,
                "--no-print" => config.print = false,
                "-v" | "--verbose" => config.log_level = Level::DEBUG,
                "--log-level" => {
                    let level = args.next().ok_or(ConfigError::MissingValue(arg))?;
                    config.log_level = level
                        .parse()
                        .map_err(|_| ConfigError::UnknownLogLevel(level))?;
                }
                _ => return Err(ConfigError::UnknownFlag(arg)),
            }
        }
        if config.words.is_empty() {
            config.words = DEMO_WORDS.iter().map(|word| word.to_string()).collect();
        }
        Ok(Command::Run(config))
    }
}
