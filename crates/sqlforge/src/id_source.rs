//! Sources of new primary key values.

use crate::client::Executor;
use crate::dialect::Dialect;
use crate::error::{OrmError, OrmResult};
use crate::value::Value;
use rand::Rng;
use rand::rngs::OsRng;

/// Produces the id for a new entity.
pub trait IdSource: Send + Sync {
    fn next_id(
        &self,
        conn: &impl Executor,
    ) -> impl std::future::Future<Output = OrmResult<Value>> + Send;
}

/// Ids drawn from a database sequence.
#[derive(Debug, Clone)]
pub struct SequenceIdSource<D> {
    name: String,
    dialect: D,
}

impl<D: Dialect> SequenceIdSource<D> {
    pub fn new(dialect: D, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dialect,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<D: Dialect> IdSource for SequenceIdSource<D> {
    async fn next_id(&self, conn: &impl Executor) -> OrmResult<Value> {
        let sql = self.dialect.sequence_sql(&self.name);
        let rows = conn.query(&sql, &[]).await?;
        rows.first()
            .and_then(|row| row.value_at(0))
            .cloned()
            .ok_or_else(|| OrmError::NotFoundQuery(sql))
    }
}

pub const BASE36: &str = "0123456789abcdefghijklmnopqrstuvwxyz";
pub const BASE62: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

const BLACKLIST: &[&str] = &[
    "anal", "anus", "ass", "boob", "butt", "clit", "cock", "cum", "cunt", "dick", "fuck", "gay",
    "nigg", "poon", "poop", "porn", "pube", "sex", "shit", "smut", "tit", "twat", "vag",
];

/// Random fixed-length strings from the OS RNG, skipping any that spell a
/// blacklisted word (after mapping look-alike digits to letters).
#[derive(Debug, Clone)]
pub struct UniqueStringGenerator {
    alphabet: Vec<char>,
    length: usize,
}

impl UniqueStringGenerator {
    /// Base-62 strings of `length` characters.
    pub fn new(length: usize) -> Self {
        Self::with_alphabet(BASE62, length)
    }

    pub fn with_alphabet(alphabet: &str, length: usize) -> Self {
        Self {
            alphabet: alphabet.chars().collect(),
            length,
        }
    }

    /// Next inoffensive string.
    pub fn next_string(&self) -> String {
        loop {
            let s = self.generate();
            if !is_offensive(&s) {
                return s;
            }
        }
    }

    fn generate(&self) -> String {
        if self.alphabet.is_empty() {
            return String::new();
        }
        let mut rng = OsRng;
        (0..self.length)
            .map(|_| self.alphabet[rng.gen_range(0..self.alphabet.len())])
            .collect()
    }
}

impl IdSource for UniqueStringGenerator {
    async fn next_id(&self, _conn: &impl Executor) -> OrmResult<Value> {
        Ok(Value::Text(self.next_string()))
    }
}

pub(crate) fn is_offensive(s: &str) -> bool {
    let normalized: String = s
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '0' => 'o',
            '1' => 'i',
            '5' => 's',
            'v' => 'u',
            other => other,
        })
        .collect();
    BLACKLIST.iter().any(|bad| normalized.contains(bad))
}
