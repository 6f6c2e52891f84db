//! Domain types shared across the Jam workspace

mod ids;
mod track;

pub use ids::{ChatId, RequesterId};
pub use track::{ContentHandle, Track};
