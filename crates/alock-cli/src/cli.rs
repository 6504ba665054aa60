use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use alock_core::{PayloadFormat, VERSION};

/// alock - A local, encrypted password store
#[derive(Parser)]
#[command(name = "alock")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the database file
    #[arg(short, long, global = true, env = "ALOCK_DATABASE")]
    pub database: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new, empty encrypted database
    Init {
        /// Path where the database will be created
        #[arg(value_name = "PATH")]
        path: Option<String>,

        /// Plaintext encoding inside the encrypted file
        #[arg(long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,
    },

    /// Print the folder/entry hierarchy
    Tree,

    /// Show a single entry
    Show {
        /// Slash-separated item path, e.g. Work/GitHub
        #[arg(value_name = "PATH")]
        path: String,

        /// Print the password instead of a mask
        #[arg(long)]
        reveal: bool,
    },

    /// Create a folder
    Mkdir {
        /// Slash-separated path of the new folder
        #[arg(value_name = "PATH")]
        path: String,
    },

    /// Add a credential entry
    Add {
        /// Slash-separated path of the new entry
        #[arg(value_name = "PATH")]
        path: String,

        #[arg(short, long)]
        username: Option<String>,

        /// Password (prompted when omitted on a terminal)
        #[arg(long)]
        secret: Option<String>,

        #[arg(long)]
        url: Option<String>,

        /// Free-form notes; may span several lines
        #[arg(long)]
        notes: Option<String>,
    },

    /// Remove a folder (with its contents) or an entry
    Rm {
        #[arg(value_name = "PATH")]
        path: String,

        /// Remove non-empty folders without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Move an item into another folder
    Mv {
        #[arg(value_name = "FROM")]
        from: String,

        /// Destination folder ("/" for the top level)
        #[arg(value_name = "TO_FOLDER")]
        to: String,
    },

    /// Change the master passphrase
    Passwd,

    /// Print the decrypted payload
    Export {
        #[arg(long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,
    },

    /// Show header information without decrypting
    Info,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for PayloadFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Text => PayloadFormat::Text,
            FormatArg::Json => PayloadFormat::Json,
        }
    }
}
