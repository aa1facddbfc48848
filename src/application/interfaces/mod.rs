mod responder;

pub use responder::*;
