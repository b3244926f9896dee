//! Tokenised shell commands.

use super::errors::CommandError;

/// Keyword requesting the help text.
pub const HELP: &str = "--help";
/// Keyword listing the current directory.
pub const LIST: &str = "ls";
/// Keyword changing the display name.
pub const CHANGE_NICK: &str = "changenick";
/// Keyword changing the current directory.
pub const CHANGE_DIRECTORY: &str = "cd";
/// Keyword creating an empty file.
pub const TOUCH: &str = "touch";
/// Keyword creating a directory.
pub const MAKE_DIRECTORY: &str = "mkdir";
/// Keyword deleting a file or empty directory.
pub const REMOVE: &str = "rm";
/// Keyword copying a file or directory.
pub const COPY: &str = "copy";
/// Keyword printing a text file.
pub const CAT: &str = "cat";

/// A parsed command line.
///
/// Keywords are matched case-sensitively. Arguments beyond those a command
/// needs are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `--help`
    Help,
    /// `ls`
    List,
    /// `changenick <name>`
    ChangeNick {
        /// New display name.
        nickname: String,
    },
    /// `cd <path>`
    ChangeDirectory {
        /// Navigation argument.
        target: String,
    },
    /// `touch <path>`
    Touch {
        /// File to create.
        path: String,
    },
    /// `mkdir <path>`
    MakeDirectory {
        /// Directory to create.
        path: String,
    },
    /// `rm <path>`
    Remove {
        /// Entry to delete.
        path: String,
    },
    /// `copy <source> <destination>`
    Copy {
        /// Entry to copy.
        source: String,
        /// Copy destination.
        destination: String,
    },
    /// `cat <path>`
    Cat {
        /// File to print.
        path: String,
    },
    /// Any other first token.
    Unknown {
        /// Unrecognised keyword.
        name: String,
    },
}

impl Command {
    /// Builds a command from whitespace-separated tokens.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Empty`] for a line without tokens and
    /// [`CommandError::MissingArguments`] when a recognised command lacks
    /// arguments.
    pub fn parse(tokens: &[&str]) -> Result<Self, CommandError> {
        let Some((keyword, arguments)) = tokens.split_first() else {
            return Err(CommandError::Empty);
        };
        match *keyword {
            HELP => Ok(Self::Help),
            LIST => Ok(Self::List),
            CHANGE_NICK => {
                first(CHANGE_NICK, arguments).map(|nickname| Self::ChangeNick { nickname })
            }
            CHANGE_DIRECTORY => {
                first(CHANGE_DIRECTORY, arguments).map(|target| Self::ChangeDirectory { target })
            }
            TOUCH => first(TOUCH, arguments).map(|path| Self::Touch { path }),
            MAKE_DIRECTORY => {
                first(MAKE_DIRECTORY, arguments).map(|path| Self::MakeDirectory { path })
            }
            REMOVE => first(REMOVE, arguments).map(|path| Self::Remove { path }),
            COPY => match arguments {
                [source, destination, ..] => Ok(Self::Copy {
                    source: (*source).to_owned(),
                    destination: (*destination).to_owned(),
                }),
                short => Err(CommandError::missing_arguments(COPY, 2, short.len())),
            },
            CAT => first(CAT, arguments).map(|path| Self::Cat { path }),
            other => Ok(Self::Unknown {
                name: other.to_owned(),
            }),
        }
    }

    /// Keyword the command was parsed from.
    #[must_use]
    pub fn keyword(&self) -> &str {
        match self {
            Self::Help => HELP,
            Self::List => LIST,
            Self::ChangeNick { .. } => CHANGE_NICK,
            Self::ChangeDirectory { .. } => CHANGE_DIRECTORY,
            Self::Touch { .. } => TOUCH,
            Self::MakeDirectory { .. } => MAKE_DIRECTORY,
            Self::Remove { .. } => REMOVE,
            Self::Copy { .. } => COPY,
            Self::Cat { .. } => CAT,
            Self::Unknown { name } => name,
        }
    }
}

fn first(command: &'static str, arguments: &[&str]) -> Result<String, CommandError> {
    arguments
        .first()
        .map(|argument| (*argument).to_owned())
        .ok_or_else(|| CommandError::missing_arguments(command, 1, 0))
}
