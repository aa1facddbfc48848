mod exchange;
mod persona;

pub use exchange::*;
pub use persona::*;
