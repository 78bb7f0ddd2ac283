pub mod identity;
pub mod middleware;
pub mod password;
pub mod token;

pub use identity::CurrentIdentity;
pub use middleware::{auth_middleware, authenticate, AuthState};
pub use token::{Claims, InvalidToken, TokenCodec};
