// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const SIGNUP_COMPLETED: &str = "auth.signup.completed";
pub const LOGIN_SUCCEEDED: &str = "auth.login.succeeded";
pub const LOGIN_FAILED: &str = "auth.login.failed";
pub const TOKEN_REJECTED: &str = "auth.token.rejected";
pub const TODO_CREATED: &str = "todo.created";
pub const TODO_DELETED: &str = "todo.deleted";
