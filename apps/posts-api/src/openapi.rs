//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Posts API",
        version = "0.1.0",
        description = "Announcements, votes and forms attached to events, backed by MongoDB",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/posts", api = domain_posts::ApiDoc)
    ),
    tags(
        (name = "Posts", description = "Announcements, votes and forms attached to events")
    )
)]
pub struct ApiDoc;
