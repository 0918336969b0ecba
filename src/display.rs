use colored::Colorize;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use crate::cards::{Card, Suit};
use crate::game_tree::TreeStats;
use crate::solver::{ExploitabilityReport, NodeStrategy};

pub fn board_display(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|card| {
            let text = format!("{}{}", card.rank.to_char(), card.suit.symbol());
            match card.suit {
                Suit::Spades => text.white().to_string(),
                Suit::Hearts => text.red().to_string(),
                Suit::Diamonds => text.blue().to_string(),
                Suit::Clubs => text.green().to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn styled_action(action: &str) -> String {
    let lower = action.to_lowercase();
    if lower.starts_with("bet") || lower.starts_with("raise") || lower.starts_with("all-in") {
        action.red().bold().to_string()
    } else if lower == "call" {
        action.green().bold().to_string()
    } else if lower == "fold" {
        action.dimmed().bold().to_string()
    } else if lower == "check" {
        action.yellow().bold().to_string()
    } else {
        action.bold().to_string()
    }
}

fn frequency_cell(freq: f64) -> Cell {
    let pct = format!("{:.1}%", freq * 100.0);
    let text = if freq > 0.7 {
        pct.green().to_string()
    } else if freq > 0.3 {
        pct.yellow().to_string()
    } else {
        pct
    };
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// Per-hand average strategy table for one node, at most `limit` rows.
pub fn strategy_table(node: &NodeStrategy, hands: &[String], limit: usize) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new("Hand".bold().to_string())];
    header.extend(
        node.actions
            .iter()
            .map(|a| Cell::new(styled_action(a)).set_alignment(CellAlignment::Right)),
    );
    table.set_header(header);

    for (hand, row) in hands.iter().zip(&node.frequencies).take(limit) {
        let mut cells = vec![Cell::new(hand.bold().to_string())];
        cells.extend(row.iter().map(|&f| frequency_cell(f)));
        table.add_row(cells);
    }

    let mut out = format!(
        "  {} {} | pot {:.1}\n{}",
        node.player.to_string().bold(),
        node.label.cyan(),
        node.pot,
        table
    );
    if node.frequencies.len() > limit {
        out.push_str(&format!("\n  ... and {} more combos", node.frequencies.len() - limit));
    }
    out
}

pub fn stats_table(stats: &TreeStats) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Node"),
        Cell::new("Count").set_alignment(CellAlignment::Right),
    ]);
    for (name, count) in [
        ("Decision", stats.decision),
        ("Chance", stats.chance),
        ("Fold", stats.terminal),
        ("Showdown", stats.showdown),
        ("All-in showdown", stats.all_in),
        ("River boards cached", stats.cache_entries),
    ] {
        table.add_row(vec![
            Cell::new(name.bold().to_string()),
            Cell::new(count).set_alignment(CellAlignment::Right),
        ]);
    }
    table.to_string()
}

pub fn exploitability_line(report: &ExploitabilityReport) -> String {
    let pct = format!("{:.4}%", report.percent_of_pot);
    let pct = if report.percent_of_pot < 1.0 {
        pct.green()
    } else if report.percent_of_pot < 5.0 {
        pct.yellow()
    } else {
        pct.red()
    };
    format!(
        "  iteration {:>6} | OOP BR {:>10.5} | IP BR {:>10.5} | exploitability {} of pot",
        report.iteration, report.oop_best_response, report.ip_best_response, pct
    )
}

pub fn print_section(title: &str, content: &str) {
    println!("\n{}", title.cyan().bold());
    println!("{}", content);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "Error:".red().bold(), msg);
}

pub fn print_success(msg: &str) {
    println!("{}", msg.green().bold());
}
