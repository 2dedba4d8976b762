pub mod guard;
pub mod handlers;
pub mod session;

pub use guard::SessionUser;
pub use session::SessionIssuer;
