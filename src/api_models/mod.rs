pub mod screen;
pub mod watchlist;

pub use screen::{
    LargeGapScreenRequest, PredefinedScreenRequest, RangeScreenRequest, WatchlistScreenRequest,
};
pub use watchlist::{AddSymbolRequest, ReplaceWatchlistRequest, WatchlistResponse};
