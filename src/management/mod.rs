mod auth;
mod session;

pub use auth::REFRESH_MARGIN;
pub use auth::TokenManager;
pub use session::PENDING_LOGIN_TTL;
pub use session::SESSION_COOKIE;
pub use session::SESSION_IDLE_TTL;
pub use session::SessionStore;
pub use session::SessionToken;
