/// Middleware for the API server
///
/// - `security`: Response hardening headers
///
/// Authentication lives in `app::jwt_auth_layer`, next to the router it
/// guards.

pub mod security;
