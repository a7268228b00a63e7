// Prevents additional console window on Windows in release, DO NOT REMOVE!!
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sqlx::SqlitePool;

use todo_desk_lib::config::AppConfig;
use todo_desk_lib::db::{self, DbStatus};
use todo_desk_lib::model::TodoItem;
use todo_desk_lib::{commands, logging};

#[derive(Debug, Parser)]
#[command(name = "todo-desk", about = "Desktop to-do list", version)]
struct Cli {
    /// Database file to open instead of the per-user default.
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance and inspection commands.
    #[command(subcommand)]
    Db(DbCommand),
    /// Print every todo.
    List {
        /// Emit the same JSON array the list window receives.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Check the database file and report its status.
    Status {
        /// Emit the status as JSON instead of the table view.
        #[arg(long)]
        json: bool,
    },
    /// Run VACUUM to compact the database.
    Vacuum,
}

fn main() {
    let cli = Cli::parse();
    let config = match AppConfig::resolve(cli.db) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err:#}");
            process::exit(1);
        }
    };

    if let Some(command) = cli.command {
        logging::init_cli(&config);
        match handle_cli(&config, command) {
            Ok(code) => process::exit(code),
            Err(err) => {
                eprintln!("Error: {err:#}");
                process::exit(1);
            }
        }
    }

    let _guard = match logging::init(&config) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Error: {err:#}");
            process::exit(1);
        }
    };
    tracing::info!(
        target: "todo_desk",
        event = "app_booted",
        version = env!("CARGO_PKG_VERSION"),
        commit = env!("TODO_DESK_GIT_HASH"),
        db = %config.db_path.display()
    );
    todo_desk_lib::run(config)
}

fn handle_cli(config: &AppConfig, command: Commands) -> Result<i32> {
    tauri::async_runtime::block_on(async {
        let pool = db::open_sqlite_pool(&config.db_path)
            .await
            .with_context(|| format!("open database {}", config.db_path.display()))?;
        let code = run_command(config, &pool, command).await;
        pool.close().await;
        code
    })
}

async fn run_command(config: &AppConfig, pool: &SqlitePool, command: Commands) -> Result<i32> {
    match command {
        Commands::Db(DbCommand::Status { json }) => {
            let report = db::status(pool, &config.db_path)
                .await
                .context("read database status")?;
            if json {
                let rendered =
                    serde_json::to_string_pretty(&report).context("serialize status report")?;
                println!("{rendered}");
            } else {
                print_status_table(&report);
            }
            Ok(if report.is_ok() { 0 } else { 1 })
        }
        Commands::Db(DbCommand::Vacuum) => {
            db::vacuum(pool).await.context("vacuum database")?;
            println!("Vacuum complete: {}", config.db_path.display());
            Ok(0)
        }
        Commands::List { json } => {
            let items = commands::list_todos(pool).await.context("list todos")?;
            if json {
                let rendered = serde_json::to_string(&items).context("serialize todos")?;
                println!("{rendered}");
            } else {
                print_todo_table(&items);
            }
            Ok(0)
        }
    }
}

fn print_status_table(report: &DbStatus) {
    println!("Database status");
    println!("Path           : {}", report.path);
    println!("SQLite version : {}", report.sqlite_version);
    println!("Journal mode   : {}", report.journal_mode);
    println!("Quick check    : {}", report.quick_check);
    println!("Todos          : {}", report.todo_count);
}

fn print_todo_table(items: &[TodoItem]) {
    if items.is_empty() {
        println!("No todos.");
        return;
    }
    println!("{:>5}  {:<4}  {:<12}  Title", "ID", "Done", "Due");
    for item in items {
        let done = if item.completed { "x" } else { "" };
        let due = if item.due_date.is_empty() { "-" } else { &item.due_date };
        println!("{:>5}  {:<4}  {:<12}  {}", item.id, done, due, item.title);
    }
}
