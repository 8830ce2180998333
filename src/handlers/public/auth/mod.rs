// handlers/public/auth/mod.rs - token acquisition and password flows
//
// None of these endpoints take a bearer token. Login and register set the
// refresh cookie; refresh-token reads it back.

pub mod password; // update-password, forgot-password, reset-password
pub mod register; // POST /api/auth/register
pub mod session; // login, logout, refresh-token

pub use password::{forgot_password, reset_password, update_password};
pub use register::register;
pub use session::{login, logout, refresh};
