use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use phase_navigator::config::Settings;
use phase_navigator::parser::process_document;
use phase_navigator::source::{load_paragraphs, Diagnostics};
use phase_navigator::{ExtractionResult, Navigator, Paragraphs, Phase, RuleSet, View};

#[derive(Parser)]
#[command(name = "phase_navigator", about = "Split a facilitation guidebook into workshop phases")]
struct Cli {
    /// Settings file (default: ./navigator.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List phases in evaluation order with their patterns
    Phases,
    /// Extract and print every section of a document
    Sections {
        /// Document to read (default: configured guidebook)
        path: Option<PathBuf>,
        /// Print only this phase
        #[arg(short, long)]
        phase: Option<Phase>,
        /// Emit JSON instead of Markdown
        #[arg(long)]
        json: bool,
    },
    /// Show the dashboard summary, or one section of the guidebook
    Show {
        #[arg(short, long)]
        phase: Option<Phase>,
    },
    /// Extract many documents in parallel and summarise fragment counts
    Batch {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Check availability of the configured documents
    Diagnose,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    let rules = settings.rule_set().context("Invalid phase rules")?;

    match cli.command {
        Commands::Phases => {
            println!("{:>2} | {:<13} | Pattern", "#", "Phase");
            println!("{}", "-".repeat(60));
            for (i, rule) in rules.rules().iter().enumerate() {
                println!("{:>2} | {:<13} | {}", i + 1, rule.phase, rule.pattern.as_str());
            }
            println!(
                "\nPseudo-headings: upper-case text or at most {} words",
                rules.pseudo_heading_max_words()
            );
        }
        Commands::Sections { path, phase, json } => {
            let path = path.unwrap_or_else(|| settings.guidebook_path.clone());
            let sections = extract(&path, &rules);
            if json {
                match phase {
                    Some(p) => println!("{}", serde_json::to_string_pretty(sections.get(p))?),
                    None => println!("{}", serde_json::to_string_pretty(&sections)?),
                }
            } else {
                for (p, text) in sections.iter() {
                    if phase.is_some_and(|want| want != p) {
                        continue;
                    }
                    println!("## {}\n\n{}\n", p, text);
                }
            }
        }
        Commands::Show { phase } => {
            let mut nav = Navigator::new(extract(&settings.guidebook_path, &rules));
            if let Some(p) = phase {
                nav.select(p);
            }
            match nav.view() {
                View::Dashboard => print_dashboard(&settings.dashboard_path, nav.sections()),
                View::Section { phase, content } => {
                    println!("{} — Facilitation Guidebook\n", phase);
                    println!("{}", content);
                }
            }
        }
        Commands::Batch { paths, json } => {
            let rows = extract_batch(&paths, &rules);
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print_batch(&rows);
            }
        }
        Commands::Diagnose => {
            let d = Diagnostics::collect(&settings.guidebook_path, &settings.dashboard_path);
            let mark = |ok: bool| if ok { "yes" } else { "no" };
            println!("Guidebook:  {} (found: {})", d.guidebook_path.display(), mark(d.guidebook_found));
            match (&d.guidebook_paragraphs, &d.guidebook_error) {
                (Some(n), _) => println!("Readable:   yes ({} paragraphs)", n),
                (None, Some(e)) => println!("Readable:   no ({})", e),
                (None, None) => println!("Readable:   no"),
            }
            println!("Dashboard:  {} (found: {})", d.dashboard_path.display(), mark(d.dashboard_found));
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    Ok(())
}

fn extract(path: &Path, rules: &RuleSet) -> ExtractionResult {
    let doc = load_paragraphs(path);
    if let Paragraphs::Unavailable(reason) = &doc {
        eprintln!("Guidebook unavailable: {}", reason);
    }
    process_document(&doc, rules)
}

fn print_dashboard(pdf: &Path, sections: &ExtractionResult) {
    println!("Facilitator's Dashboard: {}", pdf.display());
    if !pdf.is_file() {
        println!("  (dashboard PDF not found)");
    }
    println!("\nSections:");
    for phase in Phase::ALL {
        let n = sections.fragment_count(phase);
        if n == 0 {
            println!("  {:<13} -", phase);
        } else {
            println!("  {:<13} {} fragments", phase, n);
        }
    }
    println!("\nUse --phase <PHASE> to open a section.");
}

#[derive(Serialize)]
struct BatchRow {
    path: PathBuf,
    available: bool,
    counts: Vec<(Phase, usize)>,
}

fn extract_batch(paths: &[PathBuf], rules: &RuleSet) -> Vec<BatchRow> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
            .unwrap()
            .progress_chars("#>-"),
    );

    let rows = paths
        .par_iter()
        .map(|path| {
            let doc = load_paragraphs(path);
            let sections = process_document(&doc, rules);
            pb.inc(1);
            BatchRow {
                path: path.clone(),
                available: doc.is_available(),
                counts: Phase::ALL
                    .into_iter()
                    .map(|p| (p, sections.fragment_count(p)))
                    .collect(),
            }
        })
        .collect();

    pb.finish_and_clear();
    rows
}

fn print_batch(rows: &[BatchRow]) {
    print!("{:>3} | {:<32}", "#", "Document");
    for phase in Phase::ALL {
        print!(" | {:>5}", &phase.as_str()[..5]);
    }
    println!();
    println!("{}", "-".repeat(42 + 8 * Phase::ALL.len()));

    for (i, row) in rows.iter().enumerate() {
        print!("{:>3} | {:<32}", i + 1, truncate(&row.path.display().to_string(), 32));
        if !row.available {
            println!(" | unavailable");
            continue;
        }
        for (_, n) in &row.counts {
            print!(" | {:>5}", n);
        }
        println!();
    }

    let unavailable = rows.iter().filter(|r| !r.available).count();
    println!("\n{} documents ({} unavailable)", rows.len(), unavailable);
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max - 3).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
