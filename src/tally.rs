use crate::db::{self, CategoryCount, DbPool};
use crate::error::TallyError;
use axum::async_trait;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Dogs,
    Cats,
    Lizards,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Dogs, Category::Cats, Category::Lizards];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Dogs => "dogs",
            Category::Cats => "cats",
            Category::Lizards => "lizards",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

/// Vote counts for every known category at one point in time.
///
/// Every category is a field, so a snapshot can never miss one or carry an
/// unknown one. Serialises as `{"dogs":n,"cats":n,"lizards":n}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TallySnapshot {
    pub dogs: u64,
    pub cats: u64,
    pub lizards: u64,
}

impl TallySnapshot {
    /// Folds sparse grouped counts into a full snapshot. Absent categories
    /// stay at zero, unknown names are dropped, negative counts count as zero.
    pub fn from_counts<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a CategoryCount>,
    {
        let mut snapshot = Self::default();
        for row in rows {
            let Some(category) = Category::parse(&row.pet) else {
                debug!("ignoring votes for unknown category {:?}", row.pet);
                continue;
            };
            let count = u64::try_from(row.count).unwrap_or(0);
            let slot = snapshot.slot_mut(category);
            *slot = slot.saturating_add(count);
        }
        snapshot
    }

    pub fn get(&self, category: Category) -> u64 {
        match category {
            Category::Dogs => self.dogs,
            Category::Cats => self.cats,
            Category::Lizards => self.lizards,
        }
    }

    pub fn total(&self) -> u64 {
        Category::ALL.iter().map(|c| self.get(*c)).sum()
    }

    fn slot_mut(&mut self, category: Category) -> &mut u64 {
        match category {
            Category::Dogs => &mut self.dogs,
            Category::Cats => &mut self.cats,
            Category::Lizards => &mut self.lizards,
        }
    }
}

/// Where tallies come from. The broadcast loop and the SSE gateway only see
/// this trait, so tests can swap the database for a fake.
#[async_trait]
pub trait TallySource: Send + Sync {
    async fn read_counts(&self) -> Result<Vec<CategoryCount>, TallyError>;
}

pub struct PgTallySource {
    pool: DbPool,
}

impl PgTallySource {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TallySource for PgTallySource {
    async fn read_counts(&self) -> Result<Vec<CategoryCount>, TallyError> {
        db::count_votes_by_category(&self.pool).await.map_err(|e| {
            debug!("{}", db::pool_stats(&self.pool));
            TallyError::from(e)
        })
    }
}

pub async fn read_snapshot(source: &dyn TallySource) -> Result<TallySnapshot, TallyError> {
    let rows = source.read_counts().await?;
    Ok(TallySnapshot::from_counts(&rows))
}
