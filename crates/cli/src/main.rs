// SheetFMS CLI - headless procurement workflow operations over the
// spreadsheet system of record.

mod exit_codes;
mod output;

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Deserialize;

use exit_codes::{fms_exit_code, EXIT_ERROR, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};
use output::Format;
use sheetfms_config::Settings;
use sheetfms_gateway::{HttpSheetsGateway, MemoryGateway, SheetsGateway, UploadClient, Uploader};
use sheetfms_workflow::{FmsService, StageUpdate, Submission, WorkflowConfig, WorkflowSet};

#[derive(Parser)]
#[command(name = "sfms")]
#[command(about = "Procurement workflow operations against the FMS spreadsheet")]
#[command(version)]
struct Cli {
    /// Run against a local JSON fixture instead of the remote document
    #[arg(long, global = true, value_name = "FILE")]
    fixture: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List rows pending at a workflow stage
    #[command(after_help = "\
Examples:
  sfms pending requirement approval
  sfms pending requirement po --format csv > po_queue.csv
  sfms pending debit approval_1 --format json")]
    Pending {
        /// Workflow name (requirement, contractor, debit, labour, site_expense)
        workflow: String,
        /// Stage key within the workflow
        stage: String,
        #[arg(long, short = 'f', value_enum, default_value = "table")]
        format: Format,
    },

    /// Complete a stage for one row or a batch
    #[command(after_help = "\
Examples:
  sfms update requirement approval --key 7 actual_1=02/02/2026 status_1=Approved
  sfms update labour payment --key 12 actual_3=05/02/2026 payment_mode=NEFT voucher_no=V-88
  sfms update requirement billing --batch updates.json")]
    Update {
        workflow: String,
        stage: String,
        /// Business key of the row (UID, bill number)
        #[arg(long)]
        key: Option<String>,
        /// Field assignments, FIELD=VALUE
        #[arg(value_name = "FIELD=VALUE")]
        fields: Vec<String>,
        /// JSON batch file: [{ "key": "...", "fields": { "...": "..." } }]
        #[arg(long, conflicts_with = "key")]
        batch: Option<PathBuf>,
    },

    /// Submit a multi-line requirement or contractor purchase
    Submit {
        #[command(subcommand)]
        target: SubmitTarget,
    },

    /// Reference lists and lookup maps for the entry forms
    Dropdowns,

    /// Outstanding bills: billing joined against the payment ledger
    Outstanding {
        /// Reference date for aging (defaults to today)
        #[arg(long, value_name = "YYYY-MM-DD")]
        as_of: Option<NaiveDate>,
        #[arg(long, short = 'f', value_enum, default_value = "json")]
        format: Format,
    },
}

#[derive(Subcommand)]
enum SubmitTarget {
    /// Material requirement (one row per line item)
    Requirement {
        /// JSON submission file
        file: PathBuf,
        /// Material photo to upload and share across the block
        #[arg(long)]
        photo: Option<PathBuf>,
    },
    /// Contractor material purchase
    Contractor {
        file: PathBuf,
        #[arg(long)]
        photo: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let code = match &cli.fixture {
        Some(path) => match load_fixture(path) {
            Ok(gateway) => run(FmsService::new(gateway), None, cli.command),
            Err(msg) => {
                eprintln!("error: {msg}");
                EXIT_IO
            }
        },
        None => {
            let settings = Settings::load();
            if !settings.is_configured() {
                eprintln!(
                    "error: no spreadsheet configured; write {} first",
                    Settings::default_path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "the settings file".to_string())
                );
                return ExitCode::from(EXIT_USAGE);
            }
            let token = match settings.resolved_token() {
                Ok(token) => token,
                Err(e) => {
                    eprintln!("error: cannot read token file: {e}");
                    return ExitCode::from(EXIT_IO);
                }
            };
            let workflows = match build_workflows(&settings) {
                Ok(workflows) => workflows,
                Err(msg) => {
                    eprintln!("error: {msg}");
                    return ExitCode::from(EXIT_USAGE);
                }
            };
            let gateway = HttpSheetsGateway::with_api_base(
                &settings.api_base,
                &settings.spreadsheet_id,
                &token,
            );
            let uploader = UploadClient::new(&settings.upload_folder_id, &token);
            run(
                FmsService::with_workflows(gateway, workflows),
                Some(&uploader),
                cli.command,
            )
        }
    };
    ExitCode::from(code)
}

fn load_fixture(path: &PathBuf) -> Result<MemoryGateway, String> {
    let raw = fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    MemoryGateway::from_json(&raw).map_err(|e| e.to_string())
}

/// The production workflow set with the settings' sheet overrides applied,
/// plus any extra TOML-defined workflows.
fn build_workflows(settings: &Settings) -> Result<WorkflowSet, String> {
    let mut workflows = vec![
        WorkflowConfig::requirement(),
        WorkflowConfig::contractor_purchase(),
        WorkflowConfig::debit(),
        WorkflowConfig::labour(),
        WorkflowConfig::site_expense(),
    ];
    for wf in &mut workflows {
        if let Some(overrides) = settings.sheets.get(&wf.name) {
            if let Some(tab) = &overrides.tab {
                wf.schema.sheet = tab.clone();
            }
            if let Some(offset) = overrides.header_offset {
                wf.schema.header_offset = offset;
            }
        }
    }
    for path in &settings.workflow_files {
        let raw = fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        workflows.push(WorkflowConfig::from_toml(&raw).map_err(|e| e.to_string())?);
    }
    WorkflowSet::new(workflows).map_err(|e| e.to_string())
}

fn run<G: SheetsGateway>(
    service: FmsService<G>,
    uploader: Option<&dyn Uploader>,
    command: Commands,
) -> u8 {
    match command {
        Commands::Pending { workflow, stage, format } => {
            let view = match service.pending(&workflow, &stage) {
                Ok(view) => view,
                Err(err) => return report(&err),
            };
            if output::print_rows(&view.data, format).is_err() {
                return EXIT_IO;
            }
            EXIT_SUCCESS
        }

        Commands::Update { workflow, stage, key, fields, batch } => {
            let updates = match build_updates(key, &fields, batch.as_ref()) {
                Ok(updates) => updates,
                Err((msg, code)) => {
                    eprintln!("error: {msg}");
                    return code;
                }
            };
            match service.update_stage(&workflow, &stage, &updates) {
                Ok(outcome) => print_json(&outcome),
                Err(err) => report(&err),
            }
        }

        Commands::Submit { target } => {
            let (file, photo, contractor) = match target {
                SubmitTarget::Requirement { file, photo } => (file, photo, false),
                SubmitTarget::Contractor { file, photo } => (file, photo, true),
            };
            let mut submission: Submission = match read_json(&file) {
                Ok(sub) => sub,
                Err(msg) => {
                    eprintln!("error: {msg}");
                    return EXIT_IO;
                }
            };
            if let Some(photo_path) = photo {
                match fs::read(&photo_path) {
                    Ok(bytes) => {
                        let name = photo_path
                            .file_name()
                            .map(|n| n.to_string_lossy().to_string())
                            .unwrap_or_else(|| "photo".to_string());
                        submission.photo = Some((name, bytes));
                    }
                    Err(e) => {
                        eprintln!("error: cannot read {}: {e}", photo_path.display());
                        return EXIT_IO;
                    }
                }
            }
            let result = if contractor {
                service.submit_contractor_purchase(&submission, uploader)
            } else {
                service.submit_requirement(&submission, uploader)
            };
            match result {
                Ok(receipt) => print_json(&receipt),
                Err(err) => report(&err),
            }
        }

        Commands::Dropdowns => match service.dropdowns() {
            Ok(dropdowns) => print_json(&dropdowns),
            Err(err) => report(&err),
        },

        Commands::Outstanding { as_of, format } => {
            let as_of = as_of.unwrap_or_else(|| chrono::Local::now().date_naive());
            let view = match service.outstanding_bills(as_of) {
                Ok(view) => view,
                Err(err) => return report(&err),
            };
            match format {
                Format::Json => print_json(&view),
                _ => {
                    let rows: Vec<serde_json::Value> = view
                        .bills
                        .iter()
                        .filter_map(|b| serde_json::to_value(b).ok())
                        .collect();
                    if output::print_rows(&rows, format).is_err() {
                        return EXIT_IO;
                    }
                    eprintln!(
                        "{} bill(s) outstanding, total balance {:.2}",
                        view.summary.bill_count, view.summary.total_balance
                    );
                    EXIT_SUCCESS
                }
            }
        }
    }
}

// ---------- Helpers ----------

/// Batch file entry: friendlier map form of `StageUpdate`.
#[derive(Deserialize)]
struct BatchEntry {
    key: String,
    fields: BTreeMap<String, String>,
}

fn build_updates(
    key: Option<String>,
    fields: &[String],
    batch: Option<&PathBuf>,
) -> Result<Vec<StageUpdate>, (String, u8)> {
    match (key, batch) {
        (Some(key), None) => {
            if fields.is_empty() {
                return Err(("no FIELD=VALUE assignments given".into(), EXIT_USAGE));
            }
            let mut parsed = Vec::with_capacity(fields.len());
            for field in fields {
                let Some((name, value)) = field.split_once('=') else {
                    return Err((format!("'{field}' is not FIELD=VALUE"), EXIT_USAGE));
                };
                parsed.push((name.trim().to_string(), value.to_string()));
            }
            Ok(vec![StageUpdate { key, fields: parsed }])
        }
        (None, Some(path)) => {
            let entries: Vec<BatchEntry> = read_json(path).map_err(|msg| (msg, EXIT_IO))?;
            Ok(entries
                .into_iter()
                .map(|e| StageUpdate {
                    key: e.key,
                    fields: e.fields.into_iter().collect(),
                })
                .collect())
        }
        (None, None) => Err(("either --key or --batch is required".into(), EXIT_USAGE)),
        (Some(_), Some(_)) => unreachable!("clap conflicts_with"),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T, String> {
    let raw = fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    serde_json::from_str(&raw).map_err(|e| format!("cannot parse {}: {e}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> u8 {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("error: cannot serialize response: {e}");
            EXIT_ERROR
        }
    }
}

fn report(err: &sheetfms_workflow::FmsError) -> u8 {
    eprintln!("error: {err}");
    fms_exit_code(err)
}
