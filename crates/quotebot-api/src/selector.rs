use rand::Rng;

use quotebot_db::{Database, Order, Pick, QuoteFilter, QuoteRow, StoreError};

/// Which single quote a read should return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    ById(i64),
    /// Highest id in the channel.
    Latest,
    /// Optional substring plus optional 1-based ordinal. Without an ordinal
    /// one of the matches is drawn at random.
    Search {
        keyword: Option<String>,
        ordinal: Option<u64>,
    },
}

/// Which of how many keyword matches was picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub nth: u64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selected {
    pub quote: QuoteRow,
    pub position: Option<Position>,
}

impl Selected {
    /// Quote content with the ` (n/total)` suffix when the pick was ambiguous.
    pub fn annotated_content(&self) -> String {
        match self.position {
            Some(Position { nth, total }) => format!("{} ({}/{})", self.quote.content, nth, total),
            None => self.quote.content.clone(),
        }
    }
}

/// Resolves `selection` to at most one live quote in `channel`.
///
/// Keyword searches with more than one match carry a [`Position`]; id
/// lookups, latest, and channel-wide picks never do.
pub fn select<R: Rng>(
    db: &Database,
    channel: &str,
    selection: &Selection,
    rng: &mut R,
) -> Result<Option<Selected>, StoreError> {
    let filter = QuoteFilter::for_channel(channel);

    let (keyword, ordinal) = match selection {
        Selection::ById(id) => {
            let filter = filter.with_id(*id);
            return Ok(unannotated(db.fetch_quote(&filter, 1, Order::Oldest)?));
        }
        Selection::Latest => return Ok(unannotated(db.fetch_quote(&filter, 1, Order::Latest)?)),
        Selection::Search { keyword, ordinal } => (keyword.as_deref(), *ordinal),
    };

    let filter = match keyword {
        Some(keyword) => filter.with_keyword(keyword),
        None => filter,
    };

    let pick = db.count_and_fetch(&filter, |total| match ordinal {
        Some(n) if n > 0 => n,
        _ if total > 1 => rng.random_range(1..=total),
        _ => 1,
    })?;
    let Some(Pick { total, nth, quote: Some(quote) }) = pick else {
        return Ok(None);
    };

    let position = (total > 1 && filter.used_fuzzy()).then_some(Position { nth, total });
    Ok(Some(Selected { quote, position }))
}

fn unannotated(quote: Option<QuoteRow>) -> Option<Selected> {
    quote.map(|quote| Selected { quote, position: None })
}
