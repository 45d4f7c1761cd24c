//! The `login`, `logout`, and `whoami` commands.

use std::io::{BufRead, Write};

use console::style;

use cargohold_esi::auth::extract_auth_code;
use cargohold_esi::{EsiConfig, PkceCodes, SsoAuth};

use crate::error::AppResult;

/// Runs the PKCE login flow.
///
/// The CLI has no embedded browser: it prints the authorization URL, the
/// user logs in there, and pastes the redirect URL (or bare code) back.
pub async fn login() -> AppResult<()> {
    let config = EsiConfig::load_or_default(None);
    let auth = SsoAuth::new(config);

    let codes = PkceCodes::generate();
    let url = auth.authorize_url(&codes)?;

    println!("Open this URL in a browser and log in:");
    println!();
    println!("  {url}");
    println!();
    print!("Paste the redirect URL (or just the code): ");
    std::io::stdout().flush().ok();

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let code = extract_auth_code(&line)?;

    let character = auth.login_with_code(&code, &codes.verifier).await?;
    println!(
        "Logged in as {}",
        style(character.character_name).green().bold()
    );

    Ok(())
}

/// Clears the stored SSO tokens.
pub async fn logout() -> AppResult<()> {
    let config = EsiConfig::load_or_default(None);
    let auth = SsoAuth::new(config);
    auth.logout().await?;

    println!("Logged out.");
    Ok(())
}

/// Prints the logged-in character.
pub async fn whoami() -> AppResult<()> {
    let config = EsiConfig::load_or_default(None);
    let auth = SsoAuth::new(config);

    let character = auth.character().await?;
    println!(
        "{} ({})",
        style(character.character_name).green().bold(),
        character.character_id
    );

    Ok(())
}
