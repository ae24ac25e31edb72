use clap::{Parser, Subcommand};

use okrdash::storage::models::SeedData;
use okrdash::storage::repository;

#[derive(Parser)]
#[command(name = "okrdash", about = "OKR analytics dashboard CLI")]
struct Cli {
    /// Database path (default: ~/.okrdash/okrdash.db)
    #[arg(long)]
    db: Option<String>,

    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Listen address
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: String,
    },
    /// Load a JSON fixture into the database
    Seed {
        /// Path to a fixture with departments/teams/users/objectives/key_results arrays
        file: String,
    },
    /// Print the departments overview payload
    Departments {
        /// On-track window, e.g. "1 weeks" (default: 1 week)
        #[arg(long)]
        on_track_filter: Option<String>,
        /// Recently-updated window, e.g. "2 weeks" (default: 2 weeks)
        #[arg(long)]
        recently_upd_filter: Option<String>,
    },
    /// Print the teams payload for a department
    Teams {
        /// Department name (case-insensitive)
        department_name: String,
    },
    /// Show row counts per table
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let db = match &cli.db {
        Some(path) => okrdash::Database::open_at(path).await?,
        None => okrdash::Database::open().await?,
    };

    match cli.command {
        Commands::Serve { addr } => {
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            log::info!("serving on http://{addr}");
            axum::serve(listener, okrdash::http::router(db)).await?;
        }
        Commands::Seed { file } => {
            let raw = std::fs::read_to_string(&file)?;
            let data: SeedData = serde_json::from_str(&raw)?;
            let written = db
                .writer()
                .call(move |conn| repository::seed(conn, &data))
                .await?;
            println!("Seeded {written} rows from {file}");
        }
        Commands::Departments {
            on_track_filter,
            recently_upd_filter,
        } => {
            let payload = okrdash::departments_overview(
                &db,
                on_track_filter.as_deref(),
                recently_upd_filter.as_deref(),
            )
            .await?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Commands::Teams { department_name } => {
            let payload = okrdash::teams_for_department(&db, &department_name).await?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Commands::Status => {
            let counts = db.reader().call(|conn| repository::dataset_counts(conn)).await?;
            println!("departments: {}", counts.departments);
            println!("teams:       {}", counts.teams);
            println!("users:       {}", counts.users);
            println!("objectives:  {}", counts.objectives);
            println!("key results: {}", counts.key_results);
        }
    }

    Ok(())
}
