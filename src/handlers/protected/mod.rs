// handlers/protected/mod.rs - handlers behind the bearer and RBAC gates
//
// Security Level: verified access token, role checked per (method, resource)
// Route Prefix: /api/products, /api/users
// Middleware: require_bearer, then authorize

pub mod products;
pub mod users;
