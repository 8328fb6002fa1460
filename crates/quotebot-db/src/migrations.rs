use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Quote DB: running migration v1 (initial schema)");
        // IF NOT EXISTS: a quotes table from before schema_version is adopted as-is.
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS quotes (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                channel     VARCHAR(50) NOT NULL DEFAULT 'unknown',
                author      VARCHAR(15) NOT NULL DEFAULT 'unknown',
                timestamp   DATETIME NULL,
                deleted     TINYINT UNSIGNED NOT NULL DEFAULT 0,
                content     TEXT
            );

            CREATE INDEX IF NOT EXISTS chan ON quotes(channel);
            CREATE INDEX IF NOT EXISTS idel ON quotes(deleted);
            CREATE INDEX IF NOT EXISTS cont ON quotes(content);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
