use migration::Migrator;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use sea_orm_migration::MigratorTrait;

pub async fn connect_and_migrate(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let in_memory = database_url.contains(":memory:");

    let mut opts = ConnectOptions::new(database_url);
    opts.sqlx_logging(false);
    if in_memory {
        // every pooled connection would otherwise see its own empty database
        opts.max_connections(1).min_connections(1);
    }

    let db = Database::connect(opts).await?;

    if !in_memory {
        pragma(&db, "PRAGMA journal_mode=WAL").await?;
        pragma(&db, "PRAGMA synchronous=NORMAL").await?;
    }

    Migrator::up(&db, None).await?;
    tracing::debug!(database_url, "database ready");
    Ok(db)
}

async fn pragma(db: &DatabaseConnection, sql: &str) -> Result<(), DbErr> {
    db.execute(Statement::from_string(db.get_database_backend(), sql.to_string())).await?;
    Ok(())
}
