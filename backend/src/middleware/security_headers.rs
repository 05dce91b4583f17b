//! Default security headers attached to every response.

use actix_web::middleware::DefaultHeaders;

pub const CONTENT_SECURITY_POLICY: &str =
    "default-src 'self'; script-src 'self'; style-src 'self'";

/// Build the header set applied to every response.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use weather_gateway::middleware::security_headers;
///
/// let _app = App::new().wrap(security_headers::security_headers());
/// ```
pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Content-Security-Policy", CONTENT_SECURITY_POLICY))
        .add(("Referrer-Policy", "same-origin"))
        .add(("Cross-Origin-Resource-Policy", "same-origin"))
        .add(("X-Content-Type-Options", "nosniff"))
}
