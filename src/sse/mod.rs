pub mod models;
pub use models::*;

mod sse_broadcaster;
pub use sse_broadcaster::*;

mod current_votes_sse;

pub use current_votes_sse::current_votes_sse;
