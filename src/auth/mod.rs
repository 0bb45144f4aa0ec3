mod login;
mod session;
mod token_info;

pub use login::{build_login_request, AuthData, AuthMetadata, LoginResponse, LOGIN_PATH};
pub use session::Session;
pub use token_info::TokenStatus;
