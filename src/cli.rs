//! CLI definition using clap

use clap::{Parser, Subcommand};

use globetrans_fleet::dtos::user::DEFAULT_REGISTER_ROLE;

#[derive(Parser)]
#[command(name = "fleet")]
#[command(version)]
#[command(about = "GlobeTrans fleet management client")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL (overrides FLEET_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Print raw JSON instead of rows
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Landing page and menu for the current session
    Home,

    /// Sign in
    Login {
        #[arg(long, short = 'u')]
        username: String,

        #[arg(long, short = 'p')]
        password: String,
    },

    /// Sign out (safe to repeat)
    Logout,

    /// Show the current role
    Whoami,

    /// Create a user account
    Register {
        #[arg(long, short = 'u')]
        username: String,

        #[arg(long, short = 'e')]
        email: String,

        #[arg(long, short = 'p')]
        password: String,

        /// "Fleet Manager" or "Admin"
        #[arg(long, default_value = DEFAULT_REGISTER_ROLE)]
        role: String,
    },

    /// Drivers page (admin only)
    Drivers {
        #[command(subcommand)]
        action: ResourceAction,
    },

    /// Trucks page (admin only)
    Trucks {
        #[command(subcommand)]
        action: ResourceAction,
    },

    /// Assignments page
    Assignments {
        #[command(subcommand)]
        action: ResourceAction,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum ResourceAction {
    /// List every record
    List,

    /// Show one record in full
    Show { id: i64 },

    /// Create a record from form fields
    Create {
        /// Form field, e.g. -f name="Jane Wanjiru"
        #[arg(short = 'f', long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Edit a record; unspecified fields keep their current values
    Update {
        id: i64,

        #[arg(short = 'f', long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Delete a record
    Delete { id: i64 },
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {raw:?}"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field name in {raw:?}"));
    }
    Ok((key.to_string(), value.to_string()))
}
