pub mod filter;
pub mod listing;
pub mod product;
pub mod stats;

pub use filter::*;
pub use listing::*;
pub use product::*;
pub use stats::*;
