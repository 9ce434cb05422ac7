pub mod scale;
pub mod builder;
pub mod locator;
pub mod render;

pub use scale::{RankScale, RankTier};
pub use builder::{Breakpoint, Ladder};
pub use locator::Progress;
pub use render::{division_numeral, progress_bar, DEFAULT_PROGRESS_WIDTH};
