use clap::Parser;
use database::{clock::utc_now, db::create_connection, services::archive::ArchiveStore};
use log::info;
use models::archive_month::ArchiveMonth;

/// Creates the monthly partitions of the completed-reservations archive.
///
/// Safe to run repeatedly; existing partitions are left as they are.
#[derive(Parser)]
#[command(name = "provision-partitions", version)]
struct Cli {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// First month to provision, as YYYY-MM (default: current UTC month)
    #[arg(long)]
    from: Option<ArchiveMonth>,

    /// Number of consecutive months to provision
    #[arg(long, default_value_t = 12)]
    months: u32,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let first = cli
        .from
        .unwrap_or_else(|| ArchiveMonth::containing(utc_now()));

    let db = create_connection(&cli.database_url, 1, 1)
        .await
        .expect("Failed to connect to database");

    let partitions = ArchiveStore::provision_partitions(&db, first, cli.months)
        .await
        .expect("Failed to provision archive partitions");

    info!("{} partition(s) present from {first}", partitions.len());
    for partition in partitions {
        println!("{partition}");
    }
}
