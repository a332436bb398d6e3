use serde::Serialize;

/// One row of the grouped vote count: a category name as stored, and its row count.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct CategoryCount {
    pub pet: String,
    pub count: i64,
}

#[cfg(test)]
impl CategoryCount {
    pub fn new(pet: impl Into<String>, count: i64) -> Self {
        Self {
            pet: pet.into(),
            count,
        }
    }
}
