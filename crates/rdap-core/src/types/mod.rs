mod bootstrap;
mod query;
mod target;

pub use bootstrap::*;
pub use query::*;
pub use target::*;
