//! Agent listing for the terminal.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use crate::state::AppState;

pub async fn list_agents(state: &AppState, limit: Option<i64>, json: bool) -> Result<()> {
    let agents = state.agent_service.list_agents(limit, None).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&agents)?);
        return Ok(());
    }

    if agents.is_empty() {
        println!();
        println!(
            "  {} No agents yet. Creators can add one with POST /api/v1/agents",
            style("i").blue().bold()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("Expertise").fg(Color::White),
        Cell::new("Traits").fg(Color::White),
        Cell::new("Messages").fg(Color::White),
        Cell::new("ID").fg(Color::White),
    ]);

    for listing in &agents {
        let agent = &listing.agent;
        table.add_row(vec![
            Cell::new(&agent.name).fg(Color::Cyan),
            Cell::new(&agent.expertise),
            Cell::new(truncate(&agent.traits.join(", "), 40)),
            Cell::new(listing.interaction_count),
            Cell::new(agent.id.to_string()).fg(Color::DarkGrey),
        ]);
    }

    println!("{table}");
    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars.saturating_sub(3)) {
        Some((cut, _)) if text.chars().count() > max_chars => format!("{}...", &text[..cut]),
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
        assert_eq!(truncate("ñññññññññ", 5), "ññ...");
    }
}
