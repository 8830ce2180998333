// handlers/public/mod.rs - handlers reachable without a bearer token
//
// Security Level: none
// Route Prefix: /api/auth, /api/employees, /api/activities

pub mod activities;
pub mod auth;
pub mod employees;
