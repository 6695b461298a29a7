//! Interactive chat session

mod session;

pub use session::ChatSession;
