pub mod command;
pub mod error;
pub mod graph;
pub mod index;
pub mod logging;
mod node;
mod rotation;
pub mod tree;

pub use command::Session;
pub use error::{IndexError, Result};
pub use index::{BalancedIndex, Order};
pub use tree::TreeOps;
