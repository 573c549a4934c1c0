//! cardstock CLI
//!
//! Command-line tool for importing spreadsheet/CSV data into a card store
//! and inspecting the result.

use cardstock_core::{
    import_sources, load_sources, scan_sources, CardStore, Strategy,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cardstock")]
#[command(about = "Spreadsheet-to-card importer for print-and-play prototyping", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// One table per sheet, one card entity per row
    Flat,
    /// Six-block character sheets, up to three cards per sheet
    CharacterSheet,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Flat => Strategy::Flat,
            StrategyArg::CharacterSheet => Strategy::CharacterSheet,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Clear the card store and refill it from one or more source files
    Import {
        /// Source file names; the extension is optional (.xlsx assumed).
        /// With no files, the previous import's sources are reused.
        files: Vec<String>,

        /// Conversion strategy
        #[arg(short, long, value_enum, default_value = "flat")]
        strategy: StrategyArg,

        /// Card store file
        #[arg(long, default_value = "cards.json")]
        store: PathBuf,

        /// Where the last-imported source list is remembered
        #[arg(long, default_value = "sources.json")]
        manifest: PathBuf,
    },

    /// List the cards currently in the store
    List {
        /// Card store file
        #[arg(long, default_value = "cards.json")]
        store: PathBuf,
    },

    /// Parse a source file and preview its worksheets
    Parse {
        /// Path to a CSV or XLSX file
        #[arg(short, long)]
        file: String,
    },

    /// Scan directories for importable source files
    Scan {
        /// Root directories to scan
        #[arg(short, long, required = true)]
        root: Vec<PathBuf>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> cardstock_core::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Import {
            files,
            strategy,
            store,
            manifest,
        } => cmd_import(&files, strategy.into(), &store, &manifest),
        Commands::List { store } => cmd_list(&store),
        Commands::Parse { file } => cmd_parse(&file),
        Commands::Scan { root } => cmd_scan(&root),
    }
}

fn cmd_import(
    files: &[String],
    strategy: Strategy,
    store_path: &PathBuf,
    manifest_path: &PathBuf,
) -> cardstock_core::Result<()> {
    let store = CardStore::new(store_path);
    let summary = import_sources(files, strategy, &store, manifest_path)?;

    for source in &summary.sources {
        println!("Loaded {}", source);
    }

    if summary.card_count() == 0 {
        println!("No cards were created.");
        return Ok(());
    }

    println!("{} cards created!", summary.card_count());
    println!("{}", summary.names.join(", "));

    Ok(())
}

fn cmd_list(store_path: &PathBuf) -> cardstock_core::Result<()> {
    let store = CardStore::new(store_path);
    let cards = store.load()?;

    if cards.is_empty() {
        println!("The store is empty.");
        return Ok(());
    }

    println!("Cards ({}):", cards.len());
    for card in &cards {
        println!(
            "  {} x{} [{}] ({} data fields)",
            card.name,
            card.quantity,
            card.template_path(),
            card.data.len()
        );
    }

    Ok(())
}

fn cmd_parse(file: &str) -> cardstock_core::Result<()> {
    let sheets = load_sources(&[file.to_string()])?;

    for sheet in &sheets {
        println!(
            "Sheet: {} ({} rows x {} columns)",
            sheet.name,
            sheet.row_count(),
            sheet.column_count()
        );

        // Preview the first few rows as raw cell text.
        for row in sheet.rows.iter().take(10) {
            let values: Vec<String> = row.iter().map(|c| c.to_text()).collect();
            println!("  {}", values.join("\t"));
        }

        if sheet.row_count() > 10 {
            println!("  ... ({} more rows)", sheet.row_count() - 10);
        }
        println!();
    }

    Ok(())
}

fn cmd_scan(roots: &[PathBuf]) -> cardstock_core::Result<()> {
    let result = scan_sources(roots)?;

    println!("Scanned {} root(s):", result.roots.len());
    for root in &result.roots {
        println!("  {}", root.display());
    }
    println!();
    println!("Found {} importable file(s):", result.file_count());
    for file in &result.files {
        println!("  {}", file.display());
    }

    Ok(())
}
