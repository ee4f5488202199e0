/// Router Module Index
///
/// Organizes routing into access-segregated modules. Each module's router is
/// wrapped in its role middleware by `create_router`, so an endpoint's access
/// level is decided by the module it is registered in.

/// Routes accessible to all callers: health check and API documentation.
pub mod public;

/// Read endpoints (list, get-by-id). Requires the USER role.
pub mod authenticated;

/// Write endpoints (create, update, delete). Requires the ADMIN role.
pub mod admin;
