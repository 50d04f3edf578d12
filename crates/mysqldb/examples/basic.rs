//! Basic usage example for mysqldb
//!
//! Run with: cargo run --example basic -p mysqldb
//!
//! Set the connection in a .env file or the environment:
//! MYSQL_USER=root
//! MYSQL_PASSWORD=secret
//! MYSQL_HOST=localhost
//! MYSQL_DATABASE=mysqldb_example

use colored::Colorize;
use mysqldb::{
    ColumnPosition, ConnectOptions, DbError, InstrumentedConnection, JoinKind, JoinOptions,
    LoggingMonitor, MonitorConfig, MySqlConnection, MySqlDb, RowExt, TableSpec, Value,
};

fn section(title: &str) {
    println!("\n{}", format!("=== {title} ===").bold().cyan());
}

fn ok(msg: impl std::fmt::Display) {
    println!("  {} {}", "✓".green().bold(), msg);
}

#[tokio::main]
async fn main() -> Result<(), DbError> {
    dotenvy::dotenv().ok();

    let options = ConnectOptions::from_env()?;
    let conn = InstrumentedConnection::new(MySqlConnection::connect(&options).await?)
        .with_config(MonitorConfig::new().enable_monitoring())
        .with_monitor(LoggingMonitor::new().prefix("[sql]"));
    let mut db = MySqlDb::new(conn).await?;
    println!("{}", db.to_string().bold());

    section("Create tables");
    db.create_table(&TableSpec::new("artists", ["Name VARCHAR(255) NOT NULL UNIQUE"]))
        .await?;
    db.create_table(&TableSpec::new(
        "albums",
        ["ArtistId INT NOT NULL", "Title VARCHAR(255)"],
    ))
    .await?;
    ok("artists, albums");

    section("Write rows");
    for name in ["Low", "Slowdive", "Low"] {
        match db.write("artists", "Name", [name]).await? {
            0 => println!("  {} {name} already present", "⚠".yellow().bold()),
            _ => ok(format!("wrote {name}")),
        }
    }
    db.write(
        "albums",
        "ArtistId, Title",
        [Value::from(1), Value::from("Things We Lost in the Fire")],
    )
    .await?;
    db.write(
        "albums",
        "ArtistId, Title",
        [Value::from(2), Value::from("Souvlaki")],
    )
    .await?;
    db.save().await?;

    section("Select with an inferred join target");
    let join = JoinOptions::new()
        .join(JoinKind::Cross)
        .condition("artists.id = albums.ArtistId");
    println!("  {}", db.select_sql("artists", ["Name", "Title"], &join).await?);
    for row in db.select("artists", ["Name", "Title"], &join).await? {
        let name: String = row.try_get_column("Name")?;
        let title: Option<String> = row.try_get_column("Title")?;
        println!("  {name:<10} {}", title.unwrap_or_default());
    }

    section("Alter");
    db.add_column("artists", "Formed", "INT", ColumnPosition::After("Name".into()))
        .await?;
    db.update_row("artists", "Formed", 1, 1993).await?;
    let removed = db.delete_null("artists", "Formed").await?;
    ok(format!("removed {removed} rows without a formation year"));
    db.reset_id("artists").await?;
    db.save().await?;
    ok(format!("max id is now {:?}", db.max_id("artists").await?));

    section("Schema");
    for table in db.list_tables().await? {
        let columns = db.list_columns(&table).await?;
        println!("  {} {:?}", table.bold(), columns);
    }

    db.close().await
}
