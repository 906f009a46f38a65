use anyhow::{anyhow, Context, Result};
use category_admin::commands::CategoryListCommands;
use category_admin::config::ConfigManager;
use category_admin::editor::CategoryEditor;
use category_admin::models::{CategoryStatus, SortKey};
use category_admin::routes::Route;
use category_admin::table;
use category_admin::AppState;
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "category-admin")]
#[command(about = "Manage the category catalog from the command line")]
struct Cli {
    /// Config file (default: ~/.category-admin/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the category API base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Skip delete confirmation
    #[arg(long, short, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the category table
    List {
        #[arg(long, short)]
        search: Option<String>,

        /// Column clicks, applied in order (name, description, status, stock)
        #[arg(long)]
        sort: Vec<SortKey>,

        /// Rows to open
        #[arg(long)]
        expand: Vec<String>,
    },
    /// Show one category
    Show { id: String },
    /// Delete one category
    Delete { id: String },
    /// Delete several top-level categories in one request
    DeleteMany {
        ids: Vec<String>,

        /// Filter the table before selecting
        #[arg(long, short)]
        search: Option<String>,

        /// Select every visible row (header checkbox) instead of listing ids
        #[arg(long, requires = "search", conflicts_with = "ids")]
        selected_visible: bool,
    },
    /// Create a category
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        parent: Option<String>,
        #[arg(long, default_value = "active")]
        status: CategoryStatus,
        #[arg(long)]
        out_of_stock: bool,
    },
    /// Edit a category
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, conflicts_with = "no_parent")]
        parent: Option<String>,
        #[arg(long)]
        no_parent: bool,
        #[arg(long)]
        status: Option<CategoryStatus>,
        #[arg(long, conflicts_with = "out_of_stock")]
        in_stock: bool,
        #[arg(long)]
        out_of_stock: bool,
    },
    /// Resolve a navigation path (/, /add-category, /edit-category/:id)
    Route { path: String },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let manager = ConfigManager::new(cli.config.clone().unwrap_or_else(ConfigManager::default_path));
    let mut config = manager.load().await?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }
    log::debug!("Using category API at {}", config.api_base_url);

    let confirm_deletes = config.confirm_deletes && !cli.yes;
    let state = AppState::from_config(config).context("Failed to set up category API client")?;

    match cli.command {
        Commands::List { search, sort, expand } => {
            let mut list = open_list(&state).await;
            if let Some(term) = search {
                list.search(&term);
            }
            for key in sort {
                list.sort_by(key);
            }
            for id in expand {
                list.toggle_category(&id);
            }
            print!("{}", table::render_list(list.view()));
        }
        Commands::Show { id } => {
            let category = state
                .gateway
                .get_one(&id)
                .await
                .map_err(|e| anyhow!(e.banner(category_admin::editor::LOAD_FAILED)))?;
            print!("{}", table::render_category(&category));
        }
        Commands::Delete { id } => {
            let mut list = open_list(&state).await;
            if confirm_deletes && !confirm("Are you sure you want to delete this category?")? {
                return Ok(());
            }
            list.delete_category(&id).await.map_err(|e| anyhow!(e))?;
            print!("{}", table::render_list(list.view()));
        }
        Commands::DeleteMany {
            ids,
            search,
            selected_visible,
        } => {
            let mut list = open_list(&state).await;
            if let Some(term) = search {
                list.search(&term);
            }
            if selected_visible {
                list.select_all(true);
            } else {
                for id in &ids {
                    if !list.toggle_select_category(id) {
                        log::warn!("{} is not a visible top-level category, skipping", id);
                    }
                }
            }

            let count = list.view().store().selection_count();
            if count == 0 {
                println!("Nothing selected");
                return Ok(());
            }
            let prompt = format!("Are you sure you want to delete {} categories?", count);
            if confirm_deletes && !confirm(&prompt)? {
                return Ok(());
            }
            list.delete_selected().await.map_err(|e| anyhow!(e))?;
            print!("{}", table::render_list(list.view()));
        }
        Commands::Add {
            name,
            description,
            parent,
            status,
            out_of_stock,
        } => {
            let mut editor = CategoryEditor::create(state.gateway.clone());
            editor.open().await;
            editor.form.name = name;
            editor.form.description = description;
            editor.form.parent_id = parent.unwrap_or_default();
            editor.form.status = status;
            editor.form.stock_availability = !out_of_stock;

            let next = editor.submit().await?;
            print!("{}", table::render_editor(&editor));
            println!("Created. Back to {}", next);
        }
        Commands::Edit {
            id,
            name,
            description,
            parent,
            no_parent,
            status,
            in_stock,
            out_of_stock,
        } => {
            let mut editor = CategoryEditor::edit(state.gateway.clone(), id);
            if let Some(back) = editor.open().await {
                let message = editor.error().unwrap_or_default().to_string();
                return Err(anyhow!("{} (returning to {})", message, back));
            }

            if let Some(name) = name {
                editor.form.name = name;
            }
            if let Some(description) = description {
                editor.form.description = description;
            }
            if let Some(parent) = parent {
                editor.form.parent_id = parent;
            }
            if no_parent {
                editor.form.parent_id.clear();
            }
            if let Some(status) = status {
                editor.form.status = status;
            }
            if in_stock {
                editor.form.stock_availability = true;
            }
            if out_of_stock {
                editor.form.stock_availability = false;
            }

            let next = editor.submit().await?;
            print!("{}", table::render_editor(&editor));
            println!("Updated. Back to {}", next);
        }
        Commands::Route { path } => match Route::parse(&path) {
            Some(Route::List) => println!("list view"),
            Some(Route::AddCategory) => println!("add-category form"),
            Some(Route::EditCategory(id)) => println!("edit-category form for {}", id),
            None => return Err(anyhow!("Unknown route: {}", path)),
        },
    }

    Ok(())
}

/// List view with the collection loaded. A failed load still returns the
/// view; the banner carries the message.
async fn open_list(state: &AppState) -> CategoryListCommands {
    let mut list = CategoryListCommands::new(state.gateway.clone(), state.config.default_sort);
    if let Err(e) = list.fetch_categories().await {
        log::warn!("{}", e);
    }
    list
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
