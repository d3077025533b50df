//! Pure rules with no I/O.

mod select;
mod speed;

pub use select::choose_best;
pub use speed::{format_speed, throughput};
