pub mod authorizor;
mod caller;
mod middleware;
mod token;

pub use caller::Caller;
pub use middleware::authenticate;
pub use token::Authenticator;
