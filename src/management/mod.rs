mod session;

pub use session::Session;
pub use session::SessionStore;
pub use session::spawn_sweeper;
