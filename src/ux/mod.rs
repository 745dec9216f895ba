use colored::Colorize;
use humansize::{format_size, DECIMAL};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::io::{self, Write};
use std::time::Duration;

use crate::encode::ReferenceImage;
use crate::pipeline::{BreakdownState, DesignState, Snapshot, TopViewState};
use crate::prompt::{feature_phrases, ComposedPrompt, FeatureSelection};
use crate::stage::StageState;

pub fn show_selection(sel: &FeatureSelection, reference: Option<&ReferenceImage>) {
    println!("\n=== FEATURES ===");
    let phrases = feature_phrases(sel);
    if phrases.is_empty() {
        println!("(no specific features; constraints only)");
    }
    for (i, p) in phrases.iter().enumerate() {
        println!("{}. {}", i + 1, p);
    }
    match reference {
        Some(r) => println!(
            "{} {} ({}, {})",
            "[REFERENCE]".cyan().bold(),
            r.label(),
            r.media_type(),
            format_size(r.size(), DECIMAL)
        ),
        None => println!("{} none, generating from scratch", "[REFERENCE]".cyan().bold()),
    }
    println!();
}

pub fn show_prompt(prompt: &ComposedPrompt) {
    println!("{}", "=== PROMPT ===".bold());
    println!("{}\n", prompt);
}

pub fn confirm(prompt: &str) -> bool {
    print!("{} [y/N]: ", prompt);
    let _ = io::stdout().flush();
    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        let ans = s.trim().to_lowercase();
        ans == "y" || ans == "yes"
    } else {
        false
    }
}

/// Shows a spinner with `message` until `fut` resolves.
pub async fn with_spinner<F: Future>(message: &str, fut: F) -> F::Output {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    let out = fut.await;
    pb.finish_and_clear();
    out
}

fn badge<T>(state: &StageState<T>) -> colored::ColoredString {
    match state {
        StageState::Idle => "[IDLE]".dimmed(),
        StageState::Pending => "[PENDING]".yellow().bold(),
        StageState::Succeeded(_) => "[DONE]".green().bold(),
        StageState::Failed(_) => "[FAILED]".red().bold(),
    }
}

pub fn print_design(state: &DesignState) {
    println!("{}  {}", badge(state), "Design".bold());
    match state {
        StageState::Succeeded(d) => println!("  image: {}", d.url),
        StageState::Failed(msg) => println!("  {}", msg.red()),
        _ => {}
    }
}

pub fn print_breakdown(state: &BreakdownState) {
    println!("{}  {}", badge(state), "Cost breakdown, plants & strategy".bold());
    match state {
        StageState::Succeeded(b) => println!("{}", indent(&b.0, 2)),
        StageState::Failed(msg) => println!("  {}", msg.red()),
        _ => {}
    }
}

pub fn print_top_view(state: &TopViewState) {
    println!("{}  {}", badge(state), "Top-down detailed plan".bold());
    match state {
        StageState::Succeeded(t) => println!("  plan: {}", t.url),
        StageState::Failed(msg) => println!("  {}", msg.red()),
        _ => {}
    }
}

pub fn print_dashboard(snap: &Snapshot) {
    println!(
        "\n{}",
        "┏━━━━━━━━━━━━━━━━━━━━━━━━ Results ━━━━━━━━━━━━━━━━━━━━━━━━┓".bold()
    );
    println!(
        "  {}: {}   {}: {}   {}: {}",
        "Design".green().bold(), snap.design.label(),
        "Breakdown".yellow().bold(), snap.breakdown.label(),
        "Top view".cyan().bold(), snap.top_view.label()
    );
    println!("{}", "┗━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┛".bold());
    print_design(&snap.design);
    print_breakdown(&snap.breakdown);
    print_top_view(&snap.top_view);
    println!();
}

fn indent(s: &str, n: usize) -> String {
    let pad = " ".repeat(n);
    s.lines()
        .map(|l| format!("{}{}", pad, l))
        .collect::<Vec<_>>()
        .join("\n")
}
