use rusqlite::types::Value;

/// A single filter on the quotes table. Rendered with a numbered placeholder,
/// never with the bound value inlined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    Channel,
    Id,
    ContentLike,
}

impl Predicate {
    fn sql(self) -> &'static str {
        match self {
            Self::Channel => "channel =",
            Self::Id => "id =",
            Self::ContentLike => "content LIKE",
        }
    }
}

/// Accumulates `(predicate, bound value)` pairs for a quote lookup.
///
/// The channel predicate is always first. `predicates()[i]` is bound to
/// `bindings()[i]`, placeholder `?{i + 1}`.
#[derive(Debug, Clone)]
pub struct QuoteFilter {
    predicates: Vec<Predicate>,
    bindings: Vec<Value>,
    fuzzy: bool,
}

impl QuoteFilter {
    pub fn for_channel(channel: &str) -> Self {
        let mut filter = Self {
            predicates: Vec::with_capacity(3),
            bindings: Vec::with_capacity(3),
            fuzzy: false,
        };
        filter.push(Predicate::Channel, Value::Text(channel.to_string()));
        filter
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.push(Predicate::Id, Value::Integer(id));
        self
    }

    /// Substring match on content. LIKE wildcards typed by the user keep
    /// their meaning.
    pub fn with_keyword(mut self, keyword: &str) -> Self {
        self.push(Predicate::ContentLike, Value::Text(format!("%{keyword}%")));
        self.fuzzy = true;
        self
    }

    pub fn used_fuzzy(&self) -> bool {
        self.fuzzy
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn bindings(&self) -> &[Value] {
        &self.bindings
    }

    /// `deleted = 0 AND channel = ?1 AND ...`
    pub(crate) fn where_sql(&self) -> String {
        let mut sql = String::from("deleted = 0");
        for (i, predicate) in self.predicates.iter().enumerate() {
            sql.push_str(&format!(" AND {} ?{}", predicate.sql(), i + 1));
        }
        sql
    }

    /// Placeholder index for the first parameter appended after the filter's own.
    pub(crate) fn next_placeholder(&self) -> usize {
        self.bindings.len() + 1
    }

    fn push(&mut self, predicate: Predicate, value: Value) {
        self.predicates.push(predicate);
        self.bindings.push(value);
    }
}
