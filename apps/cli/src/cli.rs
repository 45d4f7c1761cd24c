//! Command-line interface for cargohold.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands;
use crate::error::AppResult;

/// Cargohold - split an inventory list into cargo-sized fits.
#[derive(Parser)]
#[command(name = "cargohold")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split a pasted inventory list and print the result.
    Split {
        /// Inventory file with tab-separated name and quantity columns
        /// (default: stdin)
        input: Option<PathBuf>,

        /// Maximum ISK value per split
        #[arg(long)]
        max_value: Option<f64>,

        /// Maximum volume per split in m³
        #[arg(long)]
        max_volume: Option<f64>,
    },

    /// Log a character in through the EVE SSO.
    Login,

    /// Forget the stored SSO tokens.
    Logout,

    /// Show the logged-in character.
    Whoami,

    /// Split the inventory and save each split as a fitting.
    SaveFits {
        /// Inventory file (default: stdin)
        input: Option<PathBuf>,

        /// Maximum ISK value per split
        #[arg(long)]
        max_value: Option<f64>,

        /// Maximum volume per split in m³
        #[arg(long)]
        max_volume: Option<f64>,

        /// Hull type id to save the fittings against
        #[arg(long)]
        ship_type: Option<i64>,
    },
}

/// Run the CLI.
pub async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Split {
            input,
            max_value,
            max_volume,
        } => commands::split::run(input, max_value, max_volume).await,
        Commands::Login => commands::auth::login().await,
        Commands::Logout => commands::auth::logout().await,
        Commands::Whoami => commands::auth::whoami().await,
        Commands::SaveFits {
            input,
            max_value,
            max_volume,
            ship_type,
        } => commands::fits::run(input, max_value, max_volume, ship_type).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_split() {
        let cli = Cli::parse_from(["cargohold", "split", "inventory.txt"]);

        let Commands::Split {
            input,
            max_value,
            max_volume,
        } = cli.command
        else {
            panic!("expected split command");
        };
        assert_eq!(input, Some(PathBuf::from("inventory.txt")));
        assert!(max_value.is_none());
        assert!(max_volume.is_none());
    }

    #[test]
    fn test_cli_parse_split_with_limits() {
        let cli = Cli::parse_from([
            "cargohold",
            "split",
            "--max-value",
            "1000000000",
            "--max-volume",
            "60000",
        ]);

        let Commands::Split {
            input,
            max_value,
            max_volume,
        } = cli.command
        else {
            panic!("expected split command");
        };
        assert!(input.is_none());
        assert_eq!(max_value, Some(1_000_000_000.0));
        assert_eq!(max_volume, Some(60_000.0));
    }

    #[test]
    fn test_cli_parse_save_fits_with_ship_type() {
        let cli = Cli::parse_from(["cargohold", "save-fits", "--ship-type", "657"]);

        let Commands::SaveFits { ship_type, .. } = cli.command else {
            panic!("expected save-fits command");
        };
        assert_eq!(ship_type, Some(657));
    }
}
