/// Middleware modules for the API server
///
/// - `api_key`: Static `X-API-Key` gate for `/auth` and `/tasks`
/// - `session`: Bearer token resolution for `/tasks`

pub mod api_key;
pub mod session;
