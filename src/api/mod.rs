pub mod error;
pub mod handlers;
pub mod mail;
pub mod router;
pub mod types;

pub use error::ApiError;
pub use router::{create_mail_router, create_router};
pub use types::*;
