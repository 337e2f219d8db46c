use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use rusqlite::Connection;
use tracing::{debug, info};

use fieldfill::category::FieldDescriptor;
use fieldfill::fill::{self, FillCursor, FormControl, Outcome, QueueItem, Step};
use fieldfill::normalize::convert_to_nationality;
use fieldfill::profile::profile_keys;
use fieldfill::settings::Settings;
use fieldfill::{classifier, parser, store};

#[derive(Parser)]
#[command(name = "fieldfill", about = "Classify form fields and fill them from a saved profile")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split pasted text into label/value pairs
    Parse {
        /// Text file to read (default: stdin)
        file: Option<PathBuf>,
        /// Keep the result as the current parsed-text queue
        #[arg(short, long)]
        save: bool,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Classify one form field, or a JSON array of fields with --batch
    Classify {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        id: String,
        #[arg(long, default_value = "")]
        placeholder: String,
        #[arg(long, default_value = "")]
        label: String,
        #[arg(long, default_value = "")]
        autocomplete: String,
        #[arg(long = "type", default_value = "")]
        input_type: String,
        #[arg(long)]
        max_length: Option<u32>,
        /// JSON file holding an array of field descriptors
        #[arg(short, long, conflicts_with_all = ["name", "id", "placeholder", "label"])]
        batch: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Fill a form (JSON array of controls) from the saved profile, one field at a time
    Fill {
        form: PathBuf,
        /// Write the filled controls here as JSON
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Pause between fields (default: from settings)
        #[arg(long)]
        delay_ms: Option<u64>,
    },
    /// Hand out the next queued value and advance the cursor
    Next {
        #[arg(short, long, value_enum, default_value = "parsed")]
        source: Source,
    },
    /// Move every fill cursor back to the start
    Reset,
    /// Show a fill queue and where the cursor is
    Queue {
        #[arg(short, long, value_enum, default_value = "parsed")]
        source: Source,
    },
    /// Manage the saved profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Country name to nationality
    Nationality { country: String },
    /// Show what is stored
    Stats,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Set one key (camelCase, e.g. firstName); an empty value clears it
    Set { key: String, value: String },
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Replace the profile with a JSON object
    Import { file: PathBuf },
    /// Write the profile as JSON (default: stdout)
    Export { file: Option<PathBuf> },
}

#[derive(Clone, Copy, ValueEnum)]
enum Source {
    Profile,
    Parsed,
}

impl Source {
    fn queue_name(self) -> &'static str {
        match self {
            Source::Profile => store::PROFILE_QUEUE,
            Source::Parsed => store::PARSED_QUEUE,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::load()?;
    debug!(?settings, "settings loaded");
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Commands::Parse { file, save, json } => {
            let text = read_input(file.as_deref())?;
            let fields = parser::parse(&text);
            if json {
                println!("{}", serde_json::to_string_pretty(&fields)?);
            } else if fields.is_empty() {
                println!("No label/value pairs found.");
            } else {
                print_queue(&fill::parsed_queue(&fields), None);
            }
            if save {
                let conn = open_db(&settings)?;
                let clip_id = store::save_clip(&conn, &text, &fields)?;
                info!(clip_id, fields = fields.len(), "saved as the parsed-text queue");
            }
        }
        Commands::Classify {
            name,
            id,
            placeholder,
            label,
            autocomplete,
            input_type,
            max_length,
            batch,
            json,
        } => {
            let descriptors = match batch {
                Some(path) => read_json::<Vec<FieldDescriptor>>(&path)?,
                None => vec![FieldDescriptor {
                    name,
                    id,
                    placeholder,
                    label,
                    autocomplete,
                    input_type,
                    max_length,
                }],
            };
            let categories = classify_batch(&descriptors)?;
            if json {
                let keys: Vec<Option<&str>> = categories.iter().map(|c| c.map(|c| c.key())).collect();
                println!("{}", serde_json::to_string_pretty(&keys)?);
            } else {
                println!("{:>3} | {:<32} | {:<24}", "#", "Field", "Category");
                println!("{}", "-".repeat(66));
                for (i, (d, c)) in descriptors.iter().zip(&categories).enumerate() {
                    let category = c.map(|c| c.key()).unwrap_or("-");
                    println!("{:>3} | {:<32} | {:<24}", i + 1, truncate(&describe(d), 32), category);
                }
                let matched = categories.iter().filter(|c| c.is_some()).count();
                println!("\n{} of {} fields matched", matched, categories.len());
            }
        }
        Commands::Fill {
            form,
            out,
            delay_ms,
        } => {
            let conn = open_db(&settings)?;
            let profile = store::load_profile(&conn)?;
            let mut controls = read_json::<Vec<FormControl>>(&form)?;
            let delay = delay_ms
                .map(std::time::Duration::from_millis)
                .unwrap_or_else(|| settings.fill_delay());

            let plan = fill::plan_form(&controls, &profile, today);
            let report = run_fill(&mut controls, &plan, delay).await?;
            report.print();

            if let Some(path) = out {
                std::fs::write(&path, serde_json::to_string_pretty(&controls)?)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("Filled form written to {}", path.display());
            }
        }
        Commands::Next { source } => {
            let conn = open_db(&settings)?;
            let queue = load_queue(&conn, source, &settings, today)?;
            let mut cursor = store::load_cursor(&conn, source.queue_name())?;
            match cursor.next(&queue) {
                Step::Fill(item) => println!("{}: {}", item.label, item.value),
                Step::Finished => println!("All {} values used. Starting over.", queue.len()),
                Step::Empty => println!("Nothing queued. Save a profile or parse some text first."),
            }
            store::save_cursor(&conn, source.queue_name(), &cursor)?;
        }
        Commands::Reset => {
            let conn = open_db(&settings)?;
            let n = store::reset_cursors(&conn)?;
            println!("Reset {} fill cursor(s).", n);
        }
        Commands::Queue { source } => {
            let conn = open_db(&settings)?;
            let queue = load_queue(&conn, source, &settings, today)?;
            if queue.is_empty() {
                println!("Nothing queued.");
                return Ok(());
            }
            let cursor = store::load_cursor(&conn, source.queue_name())?;
            print_queue(&queue, Some(cursor));
            println!("\n{} of {} remaining", cursor.remaining(queue.len()), queue.len());
        }
        Commands::Profile { action } => {
            let conn = open_db(&settings)?;
            profile_command(&conn, action, today)?;
        }
        Commands::Nationality { country } => {
            println!("{}", convert_to_nationality(&country));
        }
        Commands::Stats => {
            let conn = open_db(&settings)?;
            let s = store::get_stats(&conn)?;
            println!("Database:        {}", settings.db_path.display());
            println!("Profile keys:    {}", s.profile_keys);
            println!("Pasted blocks:   {}", s.clips);
            println!("Parsed fields:   {} ({} in latest)", s.parsed_fields, s.latest_fields);
            println!("Profile cursor:  {}", s.profile_cursor);
            println!("Parsed cursor:   {}", s.parsed_cursor);
        }
    }

    Ok(())
}

fn open_db(settings: &Settings) -> anyhow::Result<Connection> {
    let conn = store::connect(&settings.db_path)
        .with_context(|| format!("opening {}", settings.db_path.display()))?;
    store::init_schema(&conn)?;
    Ok(conn)
}

fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        }
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn load_queue(
    conn: &Connection,
    source: Source,
    settings: &Settings,
    today: NaiveDate,
) -> anyhow::Result<Vec<QueueItem>> {
    Ok(match source {
        Source::Profile => {
            let profile = store::load_profile(conn)?;
            fill::profile_queue(&profile, &settings.default_country_code, today)
        }
        Source::Parsed => fill::parsed_queue(&store::latest_fields(conn)?),
    })
}

fn profile_command(conn: &Connection, action: ProfileAction, today: NaiveDate) -> anyhow::Result<()> {
    match action {
        ProfileAction::Set { key, value } => {
            store::set_profile_value(conn, &key, &value)?;
            println!("Saved {}", key);
        }
        ProfileAction::Show { json } => {
            let profile = store::load_profile(conn)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&profile)?);
                return Ok(());
            }
            for key in profile_keys() {
                let value = profile.get(key).unwrap_or_default();
                println!("{:<18} {}", key, if value.is_empty() { "-" } else { value });
            }
            if profile.age.is_empty() {
                if let Some(age) = profile.age_on(today) {
                    println!("\nDerived age: {}", age);
                }
            }
        }
        ProfileAction::Import { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let n = store::import_profile(conn, &raw)
                .with_context(|| format!("importing {}", file.display()))?;
            println!("Imported {} profile values from {}", n, file.display());
        }
        ProfileAction::Export { file } => {
            let json = store::export_profile(conn)?;
            match file {
                Some(path) => {
                    std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
                    println!("Profile written to {}", path.display());
                }
                None => println!("{}", json),
            }
        }
    }
    Ok(())
}

/// Classify in chunks so a large batch shows progress.
fn classify_batch(
    descriptors: &[FieldDescriptor],
) -> anyhow::Result<Vec<Option<fieldfill::Category>>> {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(descriptors.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let t0 = Instant::now();
    let mut categories = Vec::with_capacity(descriptors.len());
    for chunk in descriptors.chunks(500) {
        categories.extend(classifier::classify_all(chunk));
        pb.inc(chunk.len() as u64);
    }
    pb.finish_and_clear();
    debug!(fields = descriptors.len(), elapsed_ms = t0.elapsed().as_millis() as u64, "classified");
    Ok(categories)
}

#[derive(Default)]
struct FillReport {
    filled: usize,
    excluded: usize,
    occupied: usize,
    unmatched: usize,
    missing: usize,
    cancelled_at: Option<usize>,
}

impl FillReport {
    fn print(&self) {
        println!(
            "Filled {}, skipped {} excluded, {} already set, {} unmatched, {} without a saved value.",
            self.filled, self.excluded, self.occupied, self.unmatched, self.missing,
        );
        if let Some(at) = self.cancelled_at {
            println!("Cancelled before field {}.", at + 1);
        }
    }
}

/// Apply the plan one control at a time, pausing `delay` after each fill so
/// dependent widgets can settle. Ctrl-C stops between fields.
async fn run_fill(
    controls: &mut [FormControl],
    plan: &[Outcome],
    delay: std::time::Duration,
) -> anyhow::Result<FillReport> {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(plan.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut report = FillReport::default();
    for (i, (control, outcome)) in controls.iter_mut().zip(plan).enumerate() {
        match outcome {
            Outcome::Fill { category, value } => {
                control.value = value.clone();
                report.filled += 1;
                pb.set_message(format!("{} = {}", category, truncate(value, 24)));
                pb.println(format!("{:>3} | {:<24} | {:<24} | {}", i + 1, truncate(&describe(&control.descriptor), 24), category, value));

                tokio::select! {
                    _ = &mut ctrl_c => {
                        report.cancelled_at = Some(i + 1);
                        pb.inc(1);
                        break;
                    }
                    _ = tokio::time::sleep(delay) => {}
                }
            }
            Outcome::Excluded => report.excluded += 1,
            Outcome::Occupied => report.occupied += 1,
            Outcome::Unmatched => report.unmatched += 1,
            Outcome::Missing { category } => {
                debug!(%category, "no saved value");
                report.missing += 1;
            }
        }
        pb.inc(1);
    }
    if report.cancelled_at.is_some_and(|at| at >= plan.len()) {
        report.cancelled_at = None;
    }
    pb.finish_and_clear();
    Ok(report)
}

fn print_queue(queue: &[QueueItem], cursor: Option<FillCursor>) {
    println!("{:>3} | {:<24} | {:<20} | {}", "#", "Label", "Category", "Value");
    println!("{}", "-".repeat(80));
    for (i, item) in queue.iter().enumerate() {
        let marker = match cursor {
            Some(c) if c.index == i => ">",
            _ => " ",
        };
        let category = item.category.map(|c| c.key()).unwrap_or("-");
        println!(
            "{}{:>2} | {:<24} | {:<20} | {}",
            marker,
            i + 1,
            truncate(&item.label, 24),
            category,
            truncate(&item.value, 40)
        );
    }
}

/// Best short name for a field: label, else name, else id, else placeholder.
fn describe(d: &FieldDescriptor) -> String {
    [&d.label, &d.name, &d.id, &d.placeholder]
        .into_iter()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .unwrap_or("(unnamed)")
        .to_string()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
