use anyhow::Context;
use clap::{Parser, Subcommand};

use forkify::config::CONFIG;
use forkify::controller::{App, Location};
use forkify::dom::Tree;
use forkify::model::{RecipeStore, StoreSettings};
use forkify::remote::HttpRemote;
use forkify::storage::FileStorage;
use forkify::upload::NewRecipe;

#[derive(Parser, Debug)]
#[command(name = "forkify", about = "Search, scale and bookmark recipes")]
struct Cli {
    /// Print rendered markup instead of plain text
    #[arg(long, global = true)]
    html: bool,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search recipes
    Search {
        query: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Show a recipe, optionally rescaled or (un)bookmarked
    Recipe {
        /// Recipe id, with or without a leading '#'
        id: String,
        #[arg(long)]
        servings: Option<u32>,
        #[arg(long)]
        toggle_bookmark: bool,
    },
    /// List bookmarks
    Bookmarks,
    /// Remove every bookmark
    ClearBookmarks,
    /// Upload a new recipe and bookmark it
    Upload {
        #[arg(long)]
        title: String,
        #[arg(long)]
        source_url: String,
        #[arg(long)]
        image: String,
        #[arg(long)]
        publisher: String,
        #[arg(long)]
        cooking_time: String,
        #[arg(long)]
        servings: String,
        /// "quantity,unit,description", repeatable
        #[arg(long = "ingredient")]
        ingredients: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // the subscriber also bridges `log` records emitted by the library
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_target(true)
        .init();

    let settings = StoreSettings::from_config(&CONFIG)?;
    let storage = FileStorage::open(&CONFIG.data_dir)
        .with_context(|| format!("Failed to open storage at {}", CONFIG.data_dir.display()))?;
    let remote = HttpRemote::new(CONFIG.timeout());
    let store = RecipeStore::new(remote, storage, settings).context("Failed to load bookmarks")?;
    let mut app = App::new(store);

    match cli.command {
        Command::Search { query, page } => {
            app.control_search(&query).await;
            if page != 1 {
                app.control_pagination(page);
            }
            print_view("results", app.results_view.container(), cli.html);
            print_view("pages", app.pagination_view.container(), cli.html);
        }
        Command::Recipe {
            id,
            servings,
            toggle_bookmark,
        } => {
            app.location = Location::from_hash(&id);
            app.control_recipe().await;
            if let Some(servings) = servings {
                app.control_servings(servings);
            }
            if toggle_bookmark {
                app.control_add_bookmark()?;
            }
            print_view("recipe", app.recipe_view.container(), cli.html);
        }
        Command::Bookmarks => {
            app.control_bookmarks();
            print_view("bookmarks", app.bookmarks_view.container(), cli.html);
        }
        Command::ClearBookmarks => {
            app.control_clear_bookmarks()?;
            print_view("bookmarks", app.bookmarks_view.container(), cli.html);
        }
        Command::Upload {
            title,
            source_url,
            image,
            publisher,
            cooking_time,
            servings,
            ingredients,
        } => {
            let form = NewRecipe {
                title,
                source_url,
                image,
                publisher,
                cooking_time,
                servings,
                ingredients,
            };
            let uploaded = app.control_add_recipe(&form).await;
            print_view("upload", app.add_recipe_view.container(), cli.html);
            if uploaded {
                println!("location: {}", app.location.as_fragment());
                print_view("recipe", app.recipe_view.container(), cli.html);
            } else if cli.html {
                app.control_upload_form(&form);
                print_view("form", app.add_recipe_view.container(), cli.html);
            }
        }
    }
    Ok(())
}

fn print_view(name: &str, tree: &Tree, html: bool) {
    println!("== {name} ==");
    if html {
        println!("{}", tree.inner_html());
    } else {
        for line in tree.text_lines() {
            println!("{line}");
        }
    }
}
