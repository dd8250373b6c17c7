use mensa_browser_rs::constants::{DEFAULT_DB, NO_CANTEEN_MSG};
use mensa_browser_rs::data_backend::SupabaseClient;
use mensa_browser_rs::data_types::{DietaryFilter, MealQuery};
use mensa_browser_rs::db_operations::SettingsStore;
use mensa_browser_rs::render::{render_canteens, render_day, render_week};
use mensa_browser_rs::session::MensaSession;
use mensa_browser_rs::shared_main::logger_init;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Browse the meal plans of your mensa from the terminal.
/// {n}Favorites and the selected mensa are remembered between runs.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// URL of the Supabase project{n}Example: <https://xyz.supabase.co>
    #[arg(long, env = "SUPABASE_URL")]
    supabase_url: String,
    /// Anon key of the Supabase project
    #[arg(long, env = "SUPABASE_ANON_KEY", hide_env_values = true)]
    supabase_key: String,
    /// SQLite file holding favorites and preferences
    #[arg(long, env = "MENSA_DB", default_value = DEFAULT_DB)]
    db: PathBuf,
    /// Enable verbose logging (mostly performance metrics){n}[SETS env: RUST_LOG=debug]
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all mensas
    Canteens,
    /// Remember a mensa for the following runs
    Select { canteen_id: String },
    /// Meals of one day, split into lunch and afternoon (default)
    Day {
        /// Defaults to today, or tomorrow after 14:30
        #[arg(short, long)]
        date: Option<NaiveDate>,
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Meals of every known day
    Week {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Mark or unmark a meal title as favorite
    Favorite { title: String },
    /// List favorite meal titles
    Favorites,
    /// Show or set dark mode
    DarkMode { state: Option<Switch> },
}

#[derive(clap::Args, Debug, Default)]
struct QueryArgs {
    /// Only meals whose title or description contains this text
    #[arg(short, long, default_value = "")]
    search: String,
    /// Only meals with any of these icons
    #[arg(short, long = "filter", value_enum)]
    filters: Vec<DietaryFilter>,
}

impl From<QueryArgs> for MealQuery {
    fn from(args: QueryArgs) -> Self {
        MealQuery {
            search: args.search,
            dietary: args.filters.into_iter().collect(),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Switch {
    On,
    Off,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.verbose {
        std::env::set_var("RUST_LOG", "debug");
    }

    logger_init(module_path!());
    log::debug!("Using preference db {}", args.db.display());

    let settings = SettingsStore::open(&args.db)
        .with_context(|| format!("could not open {}", args.db.display()))?;
    let client = SupabaseClient::new(args.supabase_url, args.supabase_key);
    let mut session = MensaSession::new(&client, &settings)?;

    let command = args.command.unwrap_or(Command::Day {
        date: None,
        query: QueryArgs::default(),
    });

    match command {
        Command::Canteens => {
            session.load_canteens().await?;
            print!(
                "{}",
                render_canteens(session.canteens(), session.selected_canteen())
            );
        }

        Command::Select { canteen_id } => {
            session.load_canteens().await?;
            if !session.select_canteen(&canteen_id)? {
                bail!("Unbekannte Mensa: {}", canteen_id);
            }
            if let Some(canteen) = session.selected_canteen() {
                println!("Gewählte Mensa: {}", canteen.name);
            }
        }

        Command::Day { date, query } => {
            let query = MealQuery::from(query);
            if !load_meals(&mut session).await? {
                return Ok(());
            }
            let theme = session.theme()?;
            let favorites = session.favorites().all();

            // searching always lists every day
            if query.is_searching() {
                let week = session.week_view(&query);
                print!(
                    "{}",
                    render_week(&week, favorites, theme, session.image_base_url())
                );
            } else {
                match session.day_view(date, &query, Local::now().naive_local()) {
                    Some(day) => print!(
                        "{}",
                        render_day(&day, favorites, theme, session.image_base_url())
                    ),
                    None => println!("keine Daten vorhanden."),
                }
            }
        }

        Command::Week { query } => {
            let query = MealQuery::from(query);
            if !load_meals(&mut session).await? {
                return Ok(());
            }
            let week = session.week_view(&query);
            print!(
                "{}",
                render_week(
                    &week,
                    session.favorites().all(),
                    session.theme()?,
                    session.image_base_url()
                )
            );
        }

        Command::Favorite { title } => {
            if title.is_empty() {
                bail!("Leerer Titel kann nicht gemerkt werden");
            }
            if session.toggle_favorite(&title)? {
                println!("★ {} gemerkt", title);
            } else {
                println!("{} nicht mehr gemerkt", title);
            }
        }

        Command::Favorites => {
            let favorites = session.favorites().all();
            if favorites.is_empty() {
                println!("keine Favoriten.");
            }
            for title in favorites {
                println!("★ {}", title);
            }
        }

        Command::DarkMode { state } => {
            if let Some(state) = state {
                settings.set_dark_mode(matches!(state, Switch::On))?;
            }
            let dark_mode = settings.dark_mode()?;
            println!("Dark Mode: {}", if dark_mode { "an" } else { "aus" });
        }
    }

    Ok(())
}

/// Loads canteens and the selected canteen's meals. False if there is nothing to show.
async fn load_meals(session: &mut MensaSession<'_>) -> Result<bool> {
    session.load_canteens().await?;

    let Some(canteen) = session.selected_canteen() else {
        println!("{}", NO_CANTEEN_MSG);
        return Ok(false);
    };
    println!("{}", canteen.name);

    if let Some(ticket) = session.begin_fetch() {
        if session.is_refreshing() {
            log::debug!("Fetching meals for {}", ticket.canteen_id());
        }
        let meals_by_date = session.fetch(&ticket).await;
        session.apply_fetch(ticket, meals_by_date);
    }
    Ok(true)
}
