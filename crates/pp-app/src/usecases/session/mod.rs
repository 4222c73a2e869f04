//! Session use cases: who is signed in, and signing out.

pub mod get_current_user;
pub mod sign_out;

pub use get_current_user::GetCurrentUser;
pub use sign_out::SignOut;
