//! Doc Prefs - Entry Point
//!
//! Loads a page manifest, drives the page controller from the command line,
//! and converts conditions between their textual and compact forms.

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;

use doc_prefs::core::config::ControllerConfig;
use doc_prefs::core::error::{PrefsError, Result};
use doc_prefs::core::types::{OptionId, PrefId};
use doc_prefs::expression::{decode, encode, Expr};
use doc_prefs::page::{Document, PageController, PageManifest, RenderReport};

/// Doc Prefs - preference chooser for documentation pages
#[derive(Parser, Debug)]
#[command(name = "doc-prefs")]
#[command(about = "Drive a documentation page's preference chooser from the command line")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a page manifest and apply selections
    Run {
        /// Page manifest (JSON with `data` and `body`)
        manifest: PathBuf,

        /// Controller config overrides (TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Selections to apply in order, as pref=option
        #[arg(long = "select", short = 's')]
        selections: Vec<String>,

        /// Print the final document as HTML
        #[arg(long)]
        html: bool,

        /// Keep reading commands from stdin after applying selections
        #[arg(long, short = 'i')]
        interactive: bool,
    },
    /// Compile a textual condition to its compact form
    Encode {
        /// Condition, e.g. 'os == "linux" && pkg != "beta"'
        condition: String,
    },
    /// Print the textual form of a compact condition
    Decode {
        /// Compact condition JSON, e.g. '["eq","os","linux"]'
        compact: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("doc_prefs=info")),
        )
        .init();

    let args = Args::parse();
    match args.command {
        Command::Run {
            manifest,
            config,
            selections,
            html,
            interactive,
        } => run(manifest, config, selections, html, interactive),
        Command::Encode { condition } => {
            match Expr::parse(&condition) {
                Ok(expr) => println!("{}", encode(&expr)),
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(1);
                }
            }
            Ok(())
        }
        Command::Decode { compact } => {
            let value: serde_json::Value = serde_json::from_str(&compact)?;
            println!("{}", decode(&value)?);
            Ok(())
        }
    }
}

fn run(
    manifest_path: PathBuf,
    config_path: Option<PathBuf>,
    selections: Vec<String>,
    html: bool,
    interactive: bool,
) -> Result<()> {
    let config = match config_path {
        Some(path) => ControllerConfig::load(&path)?,
        None => ControllerConfig::default(),
    };
    config.validate().map_err(PrefsError::InvalidConfig)?;

    tracing::info!("Loading {}", manifest_path.display());
    let manifest = PageManifest::load(&manifest_path)?;

    let mut controller = PageController::new(config, Document::new(&manifest.body));
    controller.initialize(&manifest.data)?;
    controller.on_page_ready()?;

    for selection in &selections {
        match parse_selection(selection) {
            Some((pref, option)) => {
                let report = controller.on_selection_changed(&pref, &option)?;
                display_report(&report);
            }
            None => println!("Ignoring malformed selection: {} (expected pref=option)", selection),
        }
    }

    display_status(&controller, &manifest);

    if interactive {
        repl(&mut controller, &manifest)?;
    }

    if html {
        let doc = controller.document();
        println!("{}", doc.to_html(doc.root()));
    }
    Ok(())
}

fn repl(controller: &mut PageController, manifest: &PageManifest) -> Result<()> {
    println!();
    println!("Commands:");
    println!("  select <pref> <option>  - Change a preference");
    println!("  status / s              - Show selections and block visibility");
    println!("  html                    - Print the document");
    println!("  quit / q                - Exit");
    println!();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input == "quit" || input == "q" {
            break;
        }

        if input == "status" || input == "s" {
            display_status(controller, manifest);
            continue;
        }

        if input == "html" {
            let doc = controller.document();
            println!("{}", doc.to_html(doc.root()));
            continue;
        }

        if let Some(rest) = input.strip_prefix("select ") {
            let mut parts = rest.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some(pref), Some(option)) => {
                    let report =
                        controller.on_selection_changed(&PrefId::from(pref), &OptionId::from(option))?;
                    display_report(&report);
                }
                _ => println!("Usage: select <pref> <option>"),
            }
            continue;
        }

        println!("Unknown command. Available: select <pref> <option>, status, html, quit");
    }
    Ok(())
}

fn parse_selection(raw: &str) -> Option<(PrefId, OptionId)> {
    let (pref, option) = raw.split_once('=')?;
    if pref.is_empty() || option.is_empty() {
        return None;
    }
    Some((PrefId::from(pref), OptionId::from(option)))
}

fn display_report(report: &RenderReport) {
    if !report.corrected.is_empty() {
        let names: Vec<&str> = report.corrected.iter().map(|p| p.as_str()).collect();
        println!("Reset to default: {}", names.join(", "));
    }
    println!(
        "{} conditions changed, {} blocks toggled, {} headings listed",
        report.changed.len(),
        report.toggled,
        report.nav_items
    );
}

fn display_status(controller: &PageController, manifest: &PageManifest) {
    println!();
    println!("=== SELECTIONS ===");
    if let Ok(resolved) = controller.resolved() {
        for pref in resolved {
            let options: Vec<&str> = pref.options.iter().map(|o| o.as_str()).collect();
            println!("  {:<12} {:<20} [{}]", pref.id.as_str(), pref.selected.as_str(), options.join(", "));
        }
    }

    println!("=== CONTENT ===");
    for content_ref in manifest.data.conditions.keys() {
        let state = match controller.is_block_visible(content_ref) {
            Some(true) => "shown",
            Some(false) => "hidden",
            None => "not on page",
        };
        println!("  {:<24} {}", content_ref.as_str(), state);
    }
    print_nav(controller);
}

fn print_nav(controller: &PageController) {
    let doc = controller.document();
    if let Some(nav) = doc.element_by_id(&controller.config().nav_container_id) {
        println!("=== NAVIGATION ===");
        println!("  {}", doc.to_html(nav));
    }
}
