use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::{Context, Result, eyre};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use todostore::render::{render_filter_bar, render_list, render_stats};
use todostore::{Action, Config, FileStorage, Filter, StoreError, Task, TaskId, TaskStore, format_time};
use tracing::Level;

#[derive(Parser)]
#[command(name = "todostore")]
#[command(about = "TodoStore CLI - Timed to-do list kept in a local store")]
#[command(version)]
struct Cli {
    /// Path to the store directory (overrides the config file)
    #[arg(short, long, env = "TODOSTORE_PATH")]
    store_path: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Storage key holding the task list (overrides the config file)
    #[arg(long)]
    slot: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a task scheduled at HH:MM
    Add { text: String, time: String },

    /// List tasks (all, pending, completed, today)
    List {
        filter: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Flip a task between pending and completed
    Toggle { id: TaskId },

    /// Change a task's text, and its time if one is given
    Edit {
        id: TaskId,
        text: String,
        #[arg(default_value = "")]
        time: String,
    },

    /// Delete a task
    Delete {
        id: TaskId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show task counters
    Stats {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the task list as HTML
    Render { filter: Option<String> },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let config = Config::load(cli.config.as_deref())?;
    let store_path = cli.store_path.unwrap_or(config.store_path);
    let slot = cli.slot.unwrap_or(config.slot_key);

    // Open store
    let storage = FileStorage::open(&store_path)
        .with_context(|| format!("Failed to open store at {}", store_path.display()))?;
    let mut store = TaskStore::with_slot(storage, slot);
    store.set_filter(config.default_filter);

    match cli.command {
        Commands::Add { text, time } => {
            let id = store.add(&text, &time).or_else(report)?;
            println!("Added task {}", id.to_string().bold());
        }
        Commands::List { filter, json } => {
            if let Some(name) = filter {
                store.set_filter(name.as_str());
            }
            let tasks = store.filtered_view();
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else {
                print_tasks(&tasks, store.filter());
            }
        }
        Commands::Toggle { id } => {
            if !store.dispatch(Action::Toggle(id), &mut |_: &Task| true)? {
                return Err(eyre!("No task with id {}", id));
            }
            if let Some(task) = store.get(id) {
                let state = if task.completed { "completed" } else { "pending" };
                println!("Marked \"{}\" {}", task.text, state);
            }
        }
        Commands::Edit { id, text, time } => {
            if !store.edit(id, &text, &time).or_else(report)? {
                return Err(eyre!("No task with id {}", id));
            }
            println!("Updated task {}", id.to_string().bold());
        }
        Commands::Delete { id, yes } => {
            let mut confirm = |task: &Task| yes || prompt_delete(task);
            if store.dispatch(Action::Delete(id), &mut confirm)? {
                println!("Deleted task {}", id.to_string().bold());
            } else if store.get(id).is_none() {
                return Err(eyre!("No task with id {}", id));
            } else {
                println!("Kept task {}", id);
            }
        }
        Commands::Stats { json } => {
            let stats = store.stats();
            if json {
                println!("{}", serde_json::to_string(&stats)?);
                return Ok(());
            }
            println!(
                "{} total, {} completed, {} pending",
                stats.total.to_string().bold(),
                stats.completed.to_string().green(),
                stats.pending.to_string().yellow()
            );
        }
        Commands::Render { filter } => {
            if let Some(name) = filter {
                store.set_filter(name.as_str());
            }
            println!("{}", render_filter_bar(store.filter()));
            println!("{}", render_list(&store.filtered_view(), store.editing()));
            println!("{}", render_stats(&store.stats()));
        }
    }

    Ok(())
}

/// Print validation messages per field and turn the error into a report
fn report<T>(err: StoreError) -> Result<T> {
    if let Some(validation) = err.as_validation() {
        for field_error in &validation.errors {
            eprintln!("{} {}: {}", "error".red().bold(), field_error.field, field_error.message);
        }
        return Err(eyre!("Task was not saved"));
    }
    Err(err.into())
}

fn print_tasks(tasks: &[&Task], filter: Filter) {
    if tasks.is_empty() {
        println!("No {} tasks", filter);
        return;
    }

    for task in tasks {
        let mark = if task.completed { "[x]".green() } else { "[ ]".yellow() };
        let text = if task.completed {
            task.text.dimmed().strikethrough()
        } else {
            task.text.normal()
        };
        println!(
            "{} {:>13}  {:>8}  {}",
            mark,
            task.id,
            format_time(&task.time.to_string()).cyan(),
            text
        );
    }
}

fn prompt_delete(task: &Task) -> bool {
    print!("Delete \"{}\"? [y/N] ", task.text);
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
