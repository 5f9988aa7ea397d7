use anyhow::{bail, Context, Result};
use sales_ledger::{
    from_component_entry, from_date_entry, import_sales, view_sales, ImportOutcome,
    ImportTracker, InputSource, LedgerError, Prompter, SalesLedger, SalesRecord, SalesReport,
    Settings, StdinInput,
};
use std::env;
use std::io;
use std::path::Path;
use tracing::info;

fn main() -> Result<()> {
    let settings = Settings::load().context("Failed to load settings")?;

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(settings.tracing_level())
        .init();

    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        None | Some("menu") => run_menu(&settings),
        Some("view") => run_view(&settings),
        Some("import") => run_import(&settings, &args[2..]),
        Some("help") | Some("--help") | Some("-h") => {
            print_usage();
            Ok(())
        }
        Some(other) => {
            print_usage();
            bail!("Unknown command: {}", other)
        }
    }
}

fn print_usage() {
    println!("sales-ledger {}", sales_ledger::VERSION);
    println!();
    println!("Usage:");
    println!("  sales-ledger                 interactive menu");
    println!("  sales-ledger view            print the sales report");
    println!("  sales-ledger import FILE...  import quarterly CSV files and save the ledger");
}

fn load_ledger(settings: &Settings) -> Result<SalesLedger> {
    let path = settings.ledger_path();
    SalesLedger::load(&path).with_context(|| format!("Failed to load ledger {}", path.display()))
}

fn save_ledger(settings: &Settings, ledger: &SalesLedger) -> Result<()> {
    let path = settings.ledger_path();
    ledger
        .save(&path)
        .with_context(|| format!("Failed to save ledger {}", path.display()))
}

fn show_report(records: &[SalesRecord]) -> Result<()> {
    let has_bad_data = view_sales(records, &mut io::stdout())?;
    if has_bad_data {
        println!("⚠️  Rows marked with * contain invalid data (shown as ?).");
    }
    println!();
    Ok(())
}

/// Import one file, save the ledger, then log the file as imported.
/// Returns true when the ledger was saved.
fn import_into(
    ledger: &mut SalesLedger,
    settings: &Settings,
    tracker: &ImportTracker,
    file: &Path,
) -> Result<bool> {
    let pending = match import_sales(file, tracker)
        .with_context(|| format!("Failed to import {}", file.display()))?
    {
        ImportOutcome::AlreadyImported => {
            println!("⏭️  {} has already been imported.", file.display());
            return Ok(false);
        }
        ImportOutcome::Imported(pending) => pending,
    };

    let report = SalesReport::build(pending.records());
    let ledger_path = settings.ledger_path();
    pending
        .commit(ledger, &ledger_path, tracker)
        .with_context(|| format!("Failed to commit import of {}", file.display()))?;

    println!("✓ Imported {} from {}", report.summary(), file.display());
    if report.has_bad_data {
        println!(
            "⚠️  {} rows contain invalid data and are marked in the report.",
            report.corrupt_rows()
        );
    }
    println!("💾 Ledger saved ({} records)", ledger.len());
    Ok(true)
}

fn run_view(settings: &Settings) -> Result<()> {
    let ledger = load_ledger(settings)?;
    show_report(ledger.records())
}

fn run_import(settings: &Settings, files: &[String]) -> Result<()> {
    if files.is_empty() {
        print_usage();
        bail!("import needs at least one file");
    }

    let mut ledger = load_ledger(settings)?;
    let tracker = ImportTracker::new(settings.imported_log_path());

    for file in files {
        import_into(&mut ledger, settings, &tracker, Path::new(file))?;
    }

    Ok(())
}

// ============================================================================
// INTERACTIVE MENU
// ============================================================================

fn print_menu() {
    println!("1. Add Sales Data (year, month, day)");
    println!("2. Add Sales Data (yyyy-mm-dd)");
    println!("3. View Sales Data");
    println!("4. Import Sales File");
    println!("5. Save Sales Data");
    println!("6. Exit");
}

fn run_menu(settings: &Settings) -> Result<()> {
    let mut ledger = load_ledger(settings)?;
    let tracker = ImportTracker::new(settings.imported_log_path());
    let mut prompter = Prompter::new(StdinInput::new());
    let mut unsaved = false;

    info!(records = ledger.len(), "starting menu session");

    loop {
        print_menu();
        let choice = match prompter.source_mut().ask("Select an option: ")? {
            Some(choice) => choice,
            None => break,
        };

        match choice.trim() {
            "1" | "2" => {
                let entry = if choice.trim() == "1" {
                    from_component_entry(&mut prompter)
                } else {
                    from_date_entry(&mut prompter)
                };
                match entry {
                    Ok(record) => {
                        ledger.push(record);
                        unsaved = true;
                        println!("Sales data added successfully.\n");
                    }
                    Err(LedgerError::EndOfInput) => break,
                    Err(e) => return Err(e.into()),
                }
            }
            "3" => show_report(ledger.records())?,
            "4" => {
                let file = match prompter.source_mut().ask("File path:")? {
                    Some(file) => file,
                    None => break,
                };
                // A committed import saves the whole ledger, pending entries included
                match import_into(&mut ledger, settings, &tracker, Path::new(file.trim())) {
                    Ok(true) => unsaved = false,
                    Ok(false) => {}
                    Err(e) => println!("❌ {:#}", e),
                }
                println!();
            }
            "5" => {
                save_ledger(settings, &ledger)?;
                unsaved = false;
                println!("💾 Saved {} records.\n", ledger.len());
            }
            "6" => break,
            _ => println!("Invalid choice. Please try again.\n"),
        }
    }

    if unsaved {
        println!("⚠️  Exiting without saving the latest changes.");
    }
    println!("Bye!");

    Ok(())
}
