use car_management::infra::config::Settings;
use car_management::storage::schema;
use sqlx::postgres::PgConnection;
use sqlx::Connection;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--init-schema]\n\
         \n\
         Reads env vars (all optional, defaults apply when unset):\n\
           DB_HOST, DB_PORT, DB_USER, DB_PASS, DB_NAME, CAR_TABLE, BIND_ADDR\n\
         \n\
         --init-schema   create the database and table when missing\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let init_schema = args.iter().any(|a| a == "--init-schema");

    let settings = Settings::from_env()?;
    let db = &settings.database;

    println!("> Preflight:");
    println!("  DB_HOST={}", db.host);
    println!("  DB_PORT={}", db.port);
    println!("  DB_USER={}", db.user);
    println!("  DB_PASS={}", if db.password.is_empty() { "<empty>" } else { "<set>" });
    println!("  DB_NAME={}", db.database);
    println!("  CAR_TABLE={}", db.table);
    println!("  BIND_ADDR={}", settings.bind_addr);

    // Server reachability, via the maintenance database.
    let mut conn = PgConnection::connect_with(&db.maintenance_options())
        .await
        .map_err(|e| anyhow::anyhow!("Storage server unreachable at {}:{}: {}", db.host, db.port, e))?;
    let version: String = sqlx::query_scalar("SHOW server_version")
        .fetch_one(&mut conn)
        .await?;
    println!("  Server version: {}", version);

    let db_exists = schema::database_exists(&mut conn, &db.database).await?;
    conn.close().await?;

    if init_schema {
        let (pool, report) = schema::initialize(db).await?;
        println!(
            "  Database {} ({}).",
            db.database,
            if report.created_database { "created" } else { "already present" }
        );
        println!(
            "  Table {} ({}).",
            db.table,
            if report.created_table { "created" } else { "already present" }
        );
        pool.close().await;
    } else if !db_exists {
        return Err(anyhow::anyhow!(
            "Database '{}' does not exist. Re-run with --init-schema",
            db.database
        ));
    } else {
        let mut conn = PgConnection::connect_with(&db.connect_options()).await?;
        let table_exists = schema::table_exists(&mut conn, &db.table).await?;
        conn.close().await?;

        if !table_exists {
            return Err(anyhow::anyhow!(
                "Table '{}' does not exist in '{}'. Re-run with --init-schema",
                db.table,
                db.database
            ));
        }
        println!("  Database and table present.");
    }

    println!("> Preflight OK.");
    Ok(())
}
