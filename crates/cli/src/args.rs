use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Portal - session and access tooling for the admin console
#[derive(Parser, Debug)]
#[command(name = "portal")]
#[command(version, long_about = None)]
#[command(about = "Sign in, inspect the session and check console access")]
pub struct Cli {
    /// Directory holding the persisted credential (overrides PORTAL_STORAGE_DIR)
    #[arg(long = "storage-dir", global = true)]
    pub storage_dir: Option<PathBuf>,

    /// User-management API base URL (overrides PORTAL_API_URL)
    #[arg(short = 'u', long = "url", global = true)]
    pub api_url: Option<String>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Store a freshly issued token as the current session
    Login {
        /// Raw JWT, or a full `Bearer <token>` header value
        token: String,
    },
    /// Print the identity decoded from the current session
    Whoami,
    /// End the current session
    Logout,
    /// Evaluate the console route guard for a path
    Check {
        /// Console path, e.g. /admin/users/7/edit
        path: String,
    },
    /// Fetch the signed-in account from the API
    Me,
    /// List accounts (admin)
    Users,
    /// Read or change a user's fine-grained permissions
    Permissions {
        #[command(subcommand)]
        action: PermissionsCommand,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum PermissionsCommand {
    /// Show the permissions granted to a user
    Get { id: i64 },
    /// Grant the permission if missing, revoke it otherwise
    Toggle { id: i64, code: String },
    /// List every known permission code
    Catalog,
}
