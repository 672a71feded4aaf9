use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::auth::{LoginRequest, RegisterRequest};
use crate::models::{Booking, BookingWithClass, ClassWithSpots, User};
use crate::schedule::{WeekDay, WeekSchedule};

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("session"))),
        );
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
        components.add_security_scheme(
            "query_token",
            SecurityScheme::ApiKey(ApiKey::Query(ApiKeyValue::new("token"))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz_live,
        crate::handlers::healthz_ready,
        crate::handlers::register_form,
        crate::handlers::register,
        crate::handlers::login_form,
        crate::handlers::login,
        crate::handlers::logout,
        crate::handlers::classes_page,
        crate::handlers::pricing,
        crate::handlers::book_form,
        crate::handlers::book,
        crate::handlers::my_classes,
        crate::handlers::admin_bookings,
        crate::handlers::schedule_page
    ),
    components(schemas(
        User,
        ClassWithSpots,
        Booking,
        BookingWithClass,
        RegisterRequest,
        LoginRequest,
        WeekDay,
        WeekSchedule
    )),
    tags(
        (name = "pages", description = "Public pages"),
        (name = "auth", description = "Registration, login and sessions"),
        (name = "booking", description = "Class booking operations"),
        (name = "admin", description = "Admin listings"),
        (name = "health", description = "Liveness and readiness")
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;
