use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{ActivityNew, CityNew, Engine, EngineError, Money};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "itinera_admin")]
#[command(about = "Admin utilities for Itinera (users, catalog, budget checks)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./itinera.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    City(City),
    Activity(Activity),
    /// Recompute every category's spent total of a trip from its transactions.
    Reconcile(ReconcileArgs),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    /// Bearer token the user authenticates the HTTP API with.
    #[arg(long)]
    token: String,
}

#[derive(Args, Debug)]
struct City {
    #[command(subcommand)]
    command: CityCommand,
}

#[derive(Subcommand, Debug)]
enum CityCommand {
    Add(CityAddArgs),
}

#[derive(Args, Debug)]
struct CityAddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    country: String,
    #[arg(long)]
    description: Option<String>,
    /// Average daily cost, e.g. `85.50`.
    #[arg(long, default_value = "0")]
    avg_daily_cost: Money,
}

#[derive(Args, Debug)]
struct Activity {
    #[command(subcommand)]
    command: ActivityCommand,
}

#[derive(Subcommand, Debug)]
enum ActivityCommand {
    Add(ActivityAddArgs),
}

#[derive(Args, Debug)]
struct ActivityAddArgs {
    #[arg(long)]
    city_id: Uuid,
    #[arg(long)]
    name: String,
    #[arg(long)]
    category: String,
    #[arg(long, default_value = "0")]
    price: Money,
    /// Rating in tenths of a star (0..=50).
    #[arg(long, default_value_t = 0)]
    rating_tenths: u8,
    #[arg(long)]
    duration_minutes: Option<u32>,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Args, Debug)]
struct ReconcileArgs {
    #[arg(long)]
    trip_id: Uuid,
    /// Username of the trip owner.
    #[arg(long)]
    owner: String,
    /// Overwrite drifted totals with the recomputed ones.
    #[arg(long)]
    repair: bool,
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => match engine.create_user(&args.username, &args.token).await {
            Ok(user) => println!("created user: {}", user.username),
            Err(EngineError::ExistingKey(key)) => {
                eprintln!("user already exists: {key}");
                std::process::exit(1);
            }
            Err(err) => return Err(err.into()),
        },
        Command::City(City {
            command: CityCommand::Add(args),
        }) => {
            let city = engine
                .create_city(CityNew {
                    name: args.name,
                    country: args.country,
                    description: args.description,
                    avg_daily_cost: args.avg_daily_cost,
                })
                .await?;
            println!("created city: {}, {} ({})", city.name, city.country, city.id);
        }
        Command::Activity(Activity {
            command: ActivityCommand::Add(args),
        }) => {
            let activity = engine
                .create_activity(ActivityNew {
                    city_id: args.city_id,
                    name: args.name,
                    category: args.category,
                    price: args.price,
                    rating_tenths: args.rating_tenths,
                    duration_minutes: args.duration_minutes,
                    description: args.description,
                })
                .await?;
            println!("created activity: {} ({})", activity.name, activity.id);
        }
        Command::Reconcile(args) => {
            let report = engine
                .reconcile_budget(args.trip_id, args.repair, &args.owner)
                .await?;
            println!("checked {} categories", report.checked);
            for drift in &report.drifted {
                println!(
                    "{} ({}): cached {} recomputed {}",
                    drift.name, drift.category_id, drift.cached, drift.recomputed
                );
            }
            if report.repaired {
                println!("repaired {} categories", report.drifted.len());
            } else if !report.is_consistent() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
