use quotebot_types::models::QuoteState;
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row, params_from_iter};
use tracing::debug;

use crate::models::{Order, Pick, QuoteRow, parse_timestamp};
use crate::{Database, QuoteFilter, StoreError};

const QUOTE_COLUMNS: &str = "id, channel, author, timestamp, content, deleted";

impl Database {
    /// Appends a quote stamped with the current time. Returns the new id.
    pub fn insert_quote(&self, channel: &str, author: &str, content: &str) -> Result<i64, StoreError> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO quotes (channel, author, timestamp, content)
                 VALUES (?1, ?2, CURRENT_TIMESTAMP, ?3)",
                (channel, author, content),
            )
            .map_err(StoreError::Insert)?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Number of live quotes matching every predicate in `filter`.
    pub fn count_quotes(&self, filter: &QuoteFilter) -> Result<u64, StoreError> {
        self.with_conn(|conn| query_count(conn, filter))
    }

    /// The quote at 1-based `offset` among live matches, ordered by id.
    /// `None` when nothing matches or the offset is out of range.
    pub fn fetch_quote(
        &self,
        filter: &QuoteFilter,
        offset: u64,
        order: Order,
    ) -> Result<Option<QuoteRow>, StoreError> {
        let Some(skip) = skip_for(offset) else {
            return Ok(None);
        };
        self.with_conn(|conn| query_one(conn, filter, skip, order))
    }

    /// Counts live matches, lets `pick` choose a 1-based offset from the
    /// total, and fetches that row (ascending id). Both reads run in one
    /// read transaction so a concurrent delete cannot land between them.
    /// `None` when nothing matches; `pick` is not called then.
    pub fn count_and_fetch<F>(&self, filter: &QuoteFilter, pick: F) -> Result<Option<Pick>, StoreError>
    where
        F: FnOnce(u64) -> u64,
    {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;

            let total = query_count(&tx, filter)?;
            if total == 0 {
                return Ok(None);
            }

            let nth = pick(total);
            let quote = match skip_for(nth) {
                Some(skip) => query_one(&tx, filter, skip, Order::Oldest)?,
                None => None,
            };

            Ok(Some(Pick { total, nth, quote }))
        })
    }

    /// Marks a live quote deleted. Returns the number of rows flipped: 0 when
    /// the quote is absent or already deleted, 1 otherwise.
    pub fn soft_delete_quote(&self, channel: &str, id: i64) -> Result<usize, StoreError> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "UPDATE quotes SET deleted = ?1 WHERE channel = ?2 AND id = ?3 AND deleted = ?4",
                (
                    QuoteState::Deleted.as_flag(),
                    channel,
                    id,
                    QuoteState::Active.as_flag(),
                ),
            )
            .map_err(StoreError::Update)
        })
    }
}

/// 1-based offset to rows skipped; `None` for 0 or offsets SQLite cannot bind.
fn skip_for(offset: u64) -> Option<i64> {
    offset.checked_sub(1).and_then(|n| i64::try_from(n).ok())
}

fn query_count(conn: &Connection, filter: &QuoteFilter) -> Result<u64, StoreError> {
    let sql = format!("SELECT COUNT(*) FROM quotes WHERE {}", filter.where_sql());
    debug!(%sql, "counting quotes");

    let count = conn.query_row(&sql, params_from_iter(filter.bindings()), |row| row.get(0))?;
    Ok(count)
}

fn query_one(
    conn: &Connection,
    filter: &QuoteFilter,
    skip: i64,
    order: Order,
) -> Result<Option<QuoteRow>, StoreError> {
    let sql = format!(
        "SELECT {} FROM quotes WHERE {} ORDER BY id {} LIMIT 1 OFFSET ?{}",
        QUOTE_COLUMNS,
        filter.where_sql(),
        order.sql(),
        filter.next_placeholder()
    );
    debug!(%sql, skip, "fetching quote");

    let mut params = filter.bindings().to_vec();
    params.push(Value::Integer(skip));

    let row = conn
        .query_row(&sql, params_from_iter(params.iter()), map_quote)
        .optional()?;

    Ok(row)
}

fn map_quote(row: &Row<'_>) -> rusqlite::Result<QuoteRow> {
    let id: i64 = row.get(0)?;
    Ok(QuoteRow {
        id,
        channel: row.get(1)?,
        author: row.get(2)?,
        timestamp: parse_timestamp(id, row.get(3)?),
        content: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        state: QuoteState::from_flag(row.get(5)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_db() -> (TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("quotes.db")).unwrap();
        (dir, db)
    }

    fn quote_state(db: &Database, channel: &str, id: i64) -> Option<QuoteState> {
        db.with_conn(|conn| {
            let flag: Option<i64> = conn
                .query_row(
                    "SELECT deleted FROM quotes WHERE channel = ?1 AND id = ?2",
                    (channel, id),
                    |row| row.get(0),
                )
                .optional()?;
            Ok(flag.map(QuoteState::from_flag))
        })
        .unwrap()
    }

    fn seed(db: &Database, channel: &str, contents: &[&str]) -> Vec<i64> {
        contents
            .iter()
            .map(|c| db.insert_quote(channel, "alice", c).unwrap())
            .collect()
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let (_dir, db) = test_db();
        let ids = seed(&db, "#a", &["one", "two", "three"]);
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn insert_then_fetch_by_id() {
        let (_dir, db) = test_db();
        let id = db.insert_quote("#a", "alice", "hello world").unwrap();

        let filter = QuoteFilter::for_channel("#a").with_id(id);
        let row = db.fetch_quote(&filter, 1, Order::Oldest).unwrap().unwrap();

        assert_eq!(row.id, id);
        assert_eq!(row.channel, "#a");
        assert_eq!(row.author, "alice");
        assert_eq!(row.content, "hello world");
        assert_eq!(row.state, QuoteState::Active);
        assert!(row.timestamp.is_some());
    }

    #[test]
    fn reads_are_scoped_to_channel() {
        let (_dir, db) = test_db();
        seed(&db, "#a", &["in a"]);
        seed(&db, "#b", &["in b", "also b"]);

        assert_eq!(db.count_quotes(&QuoteFilter::for_channel("#a")).unwrap(), 1);
        assert_eq!(db.count_quotes(&QuoteFilter::for_channel("#b")).unwrap(), 2);

        let filter = QuoteFilter::for_channel("#a").with_id(2);
        assert!(db.fetch_quote(&filter, 1, Order::Oldest).unwrap().is_none());
    }

    #[test]
    fn keyword_count_and_offsets() {
        let (_dir, db) = test_db();
        seed(&db, "#a", &["cat one", "dog", "cat two", "a Cat three"]);

        let filter = QuoteFilter::for_channel("#a").with_keyword("cat");
        assert_eq!(db.count_quotes(&filter).unwrap(), 3);

        let second = db.fetch_quote(&filter, 2, Order::Oldest).unwrap().unwrap();
        assert_eq!(second.content, "cat two");

        assert!(db.fetch_quote(&filter, 4, Order::Oldest).unwrap().is_none());
        assert!(db.fetch_quote(&filter, 0, Order::Oldest).unwrap().is_none());
    }

    #[test]
    fn count_and_fetch_picks_from_total() {
        let (_dir, db) = test_db();
        seed(&db, "#a", &["cat one", "dog", "cat two", "cat three"]);
        let filter = QuoteFilter::for_channel("#a").with_keyword("cat");

        let pick = db.count_and_fetch(&filter, |total| total - 1).unwrap().unwrap();
        assert_eq!((pick.total, pick.nth), (3, 2));
        assert_eq!(pick.quote.unwrap().content, "cat two");

        let pick = db.count_and_fetch(&filter, |total| total + 1).unwrap().unwrap();
        assert_eq!(pick.total, 3);
        assert!(pick.quote.is_none());

        let pick = db.count_and_fetch(&filter, |_| 0).unwrap().unwrap();
        assert!(pick.quote.is_none());
    }

    #[test]
    fn count_and_fetch_skips_pick_when_empty() {
        let (_dir, db) = test_db();
        seed(&db, "#a", &["dog"]);
        let filter = QuoteFilter::for_channel("#a").with_keyword("cat");

        let picked = db
            .count_and_fetch(&filter, |_| panic!("nothing to pick from"))
            .unwrap();
        assert!(picked.is_none());
    }

    #[test]
    fn latest_order_returns_highest_id() {
        let (_dir, db) = test_db();
        seed(&db, "#a", &["first", "second", "third"]);

        let filter = QuoteFilter::for_channel("#a");
        for _ in 0..3 {
            let row = db.fetch_quote(&filter, 1, Order::Latest).unwrap().unwrap();
            assert_eq!(row.id, 3);
        }
    }

    #[test]
    fn keyword_is_not_interpreted_as_sql() {
        let (_dir, db) = test_db();
        seed(&db, "#a", &["it's fine"]);

        let filter = QuoteFilter::for_channel("#a").with_keyword("'; DROP TABLE quotes; --");
        assert_eq!(db.count_quotes(&filter).unwrap(), 0);

        let filter = QuoteFilter::for_channel("#a").with_keyword("it's");
        assert_eq!(db.count_quotes(&filter).unwrap(), 1);
    }

    #[test]
    fn soft_delete_hides_but_keeps_row() {
        let (_dir, db) = test_db();
        let ids = seed(&db, "#a", &["keep", "drop"]);

        assert_eq!(db.soft_delete_quote("#a", ids[1]).unwrap(), 1);

        let all = QuoteFilter::for_channel("#a");
        assert_eq!(db.count_quotes(&all).unwrap(), 1);
        let latest = db.fetch_quote(&all, 1, Order::Latest).unwrap().unwrap();
        assert_eq!(latest.id, ids[0]);

        let by_id = QuoteFilter::for_channel("#a").with_id(ids[1]);
        assert!(db.fetch_quote(&by_id, 1, Order::Oldest).unwrap().is_none());

        let by_keyword = QuoteFilter::for_channel("#a").with_keyword("drop");
        assert_eq!(db.count_quotes(&by_keyword).unwrap(), 0);

        assert_eq!(quote_state(&db, "#a", ids[1]), Some(QuoteState::Deleted));
    }

    #[test]
    fn soft_delete_twice_or_missing_affects_nothing() {
        let (_dir, db) = test_db();
        let id = db.insert_quote("#a", "alice", "bye").unwrap();

        assert_eq!(db.soft_delete_quote("#a", id).unwrap(), 1);
        assert_eq!(db.soft_delete_quote("#a", id).unwrap(), 0);
        assert_eq!(db.soft_delete_quote("#a", 999).unwrap(), 0);
        assert_eq!(quote_state(&db, "#a", 999), None);
    }

    #[test]
    fn soft_delete_requires_matching_channel() {
        let (_dir, db) = test_db();
        let id = db.insert_quote("#a", "alice", "mine").unwrap();

        assert_eq!(db.soft_delete_quote("#b", id).unwrap(), 0);
        assert_eq!(quote_state(&db, "#a", id), Some(QuoteState::Active));
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let (_dir, db) = test_db();
        let first = db.insert_quote("#a", "alice", "one").unwrap();
        db.soft_delete_quote("#a", first).unwrap();

        let second = db.insert_quote("#a", "alice", "two").unwrap();
        assert!(second > first);
    }

    #[test]
    fn reopen_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quotes.db");
        {
            let db = Database::open(&path).unwrap();
            db.insert_quote("#a", "alice", "persisted").unwrap();
        }

        let db = Database::open(&path).unwrap();
        let row = db
            .fetch_quote(&QuoteFilter::for_channel("#a"), 1, Order::Latest)
            .unwrap()
            .unwrap();
        assert_eq!(row.content, "persisted");
    }
}
