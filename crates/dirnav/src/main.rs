//! dirnav CLI - Directory tree navigation.
//!
//! Provides commands for:
//! - `menu`, `submenu`: Render navigation menus
//! - `locate`, `up`, `prev`, `next`, `last`: Positional queries
//! - `navbar`, `titlebar`: Breadcrumb trails
//! - `tree`, `rebuild`: Inspect and refresh the cached tree

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BarArgs, LocateArgs, MenuArgs, Position, QueryArgs, TreeArgs};
use output::Output;

/// dirnav - Directory tree navigation for static sites.
#[derive(Parser)]
#[command(name = "dirnav", version, about)]
struct Cli {
    /// Enable verbose output (tree builds and cache decisions).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the tree as a nested menu.
    Menu(MenuArgs),
    /// Render one menu level per step along the open path.
    Submenu(MenuArgs),
    /// Print the path of the first page with a matching title.
    Locate(LocateArgs),
    /// Print the URL of the open page's parent.
    Up(QueryArgs),
    /// Print the URL of the page before the open page.
    Prev(QueryArgs),
    /// Print the URL of the page after the open page.
    Next(QueryArgs),
    /// Print the URL of the last visible page.
    Last(QueryArgs),
    /// Print linked breadcrumbs for the open page.
    Navbar(BarArgs),
    /// Print plain breadcrumbs for the open page.
    Titlebar(BarArgs),
    /// Dump the tree as JSON.
    Tree(TreeArgs),
    /// Rebuild the tree and rewrite the disk cache.
    Rebuild(TreeArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Menu(args) => args.execute_menu(&output),
        Commands::Submenu(args) => args.execute_submenu(&output),
        Commands::Locate(args) => args.execute(&output),
        Commands::Up(args) => args.execute(Position::Up, &output),
        Commands::Prev(args) => args.execute(Position::Prev, &output),
        Commands::Next(args) => args.execute(Position::Next, &output),
        Commands::Last(args) => args.execute(Position::Last, &output),
        Commands::Navbar(args) => args.execute_navbar(&output),
        Commands::Titlebar(args) => args.execute_titlebar(&output),
        Commands::Tree(args) => args.execute_tree(&output),
        Commands::Rebuild(args) => args.execute_rebuild(&output),
    };

    // Absent trees and unanswered queries print nothing and succeed
    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
