pub mod stock;

pub use stock::{RawQuote, ScreeningFilters, ScreeningResult, Stock};
