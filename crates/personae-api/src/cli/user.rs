//! Profile administration: create users, list them.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use personae_types::profile::ProfileRole;

use crate::http::extractors::session::{generate_token, hash_token};
use crate::state::AppState;

/// Create a profile and print its bearer token. The token is not stored
/// anywhere in plaintext and cannot be shown again.
pub async fn create_user(
    state: &AppState,
    username: Option<String>,
    role: &str,
    json: bool,
) -> Result<()> {
    let role = role.parse::<ProfileRole>().map_err(|e| anyhow::anyhow!(e))?;
    let token = generate_token();

    let profile = state
        .profile_service
        .create_profile(username.as_deref(), role, &hash_token(&token))
        .await?;

    if json {
        let out = serde_json::json!({
            "profile": profile,
            "token": token,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("  {} Profile created", style("✓").green().bold());
    println!();
    println!(
        "  {}  {}",
        style("Username:").bold(),
        style(profile.username.as_deref().unwrap_or("-")).cyan()
    );
    println!("  {}      {}", style("Role:").bold(), profile.role);
    println!(
        "  {}        {}",
        style("ID:").bold(),
        style(profile.id.to_string()).dim()
    );
    println!();
    println!(
        "  {} Access token (save this -- it won't be shown again):",
        style("🔑").bold()
    );
    println!();
    println!("  {}", style(&token).yellow().bold());
    println!();

    Ok(())
}

pub async fn list_users(state: &AppState, json: bool) -> Result<()> {
    let profiles = state.profile_service.list_profiles().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profiles)?);
        return Ok(());
    }

    if profiles.is_empty() {
        println!();
        println!(
            "  {} No profiles yet. Create one with: {}",
            style("i").blue().bold(),
            style("personae user create --username NAME").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Username").fg(Color::White),
        Cell::new("Role").fg(Color::White),
        Cell::new("ID").fg(Color::White),
        Cell::new("Created").fg(Color::White),
    ]);

    for profile in &profiles {
        let role_cell = match profile.role {
            ProfileRole::Creator => Cell::new("creator").fg(Color::Cyan),
            ProfileRole::User => Cell::new("user"),
        };
        table.add_row(vec![
            Cell::new(profile.username.as_deref().unwrap_or("-")),
            role_cell,
            Cell::new(profile.id.to_string()).fg(Color::DarkGrey),
            Cell::new(profile.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }

    println!("{table}");
    Ok(())
}
