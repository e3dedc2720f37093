use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use axum_helpers::{
    ApiResponse, ObjectIdPath, ValidatedJson,
    errors::responses::{
        BadRequestResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        ServiceUnavailableResponse, TimeoutResponse,
    },
};
use std::sync::Arc;
use tracing::instrument;
use utoipa::OpenApi;

use crate::error::PostResult;
use crate::models::{CreatePostRequest, FormQuestion, PostInput, VoteQuestion};
use crate::repository::{EventRepository, PostRepository};
use crate::service::PostService;
use crate::variant::{FormPost, PostSummary, PostVariant, VotePost};

/// OpenAPI documentation for the Posts API
#[derive(OpenApi)]
#[openapi(
    paths(create_post, list_event_posts, get_post),
    components(
        schemas(
            CreatePostRequest,
            PostInput,
            FormQuestion,
            VoteQuestion,
            PostVariant,
            PostSummary,
            VotePost,
            FormPost
        ),
        responses(
            BadRequestResponse,
            BadRequestValidationResponse,
            InternalServerErrorResponse,
            ServiceUnavailableResponse,
            TimeoutResponse
        )
    ),
    tags(
        (name = "Posts", description = "Announcements, votes and forms attached to events")
    )
)]
pub struct ApiDoc;

type SharedService<R, E> = Arc<PostService<R, E>>;

/// Create the posts router. Mount it under `/posts`.
pub fn router<R, E>(service: PostService<R, E>) -> Router
where
    R: PostRepository + 'static,
    E: EventRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", post(create_post))
        .route("/event/{eventID}", get(list_event_posts))
        .route("/{postID}", get(get_post))
        .with_state(shared_service)
}

/// Create a post and attach it to an event
///
/// Generates `_id` when omitted. Responds with the request, ids filled in.
#[utoipa::path(
    post,
    path = "",
    tag = "Posts",
    request_body = CreatePostRequest,
    responses(
        (status = 200, description = "Post created", body = ApiResponse<CreatePostRequest>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
#[instrument(skip(service, request))]
async fn create_post<R: PostRepository, E: EventRepository>(
    State(service): State<SharedService<R, E>>,
    ValidatedJson(request): ValidatedJson<CreatePostRequest>,
) -> PostResult<ApiResponse<CreatePostRequest>> {
    let created = service.create_post(request).await?;
    Ok(ApiResponse::ok(created))
}

/// List the posts of an event
///
/// Posts with an unrecognized kind are left out.
#[utoipa::path(
    get,
    path = "/event/{eventID}",
    tag = "Posts",
    params(
        ("eventID" = String, Path, description = "Event ObjectId (24 hex characters)")
    ),
    responses(
        (status = 200, description = "Posts of the event", body = ApiResponse<Vec<PostVariant>>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
#[instrument(skip(service))]
async fn list_event_posts<R: PostRepository, E: EventRepository>(
    State(service): State<SharedService<R, E>>,
    ObjectIdPath(event_id): ObjectIdPath,
) -> PostResult<ApiResponse<Vec<PostVariant>>> {
    let posts = service.list_event_posts(event_id).await?;
    Ok(ApiResponse::ok(posts))
}

/// Get a post by id
#[utoipa::path(
    get,
    path = "/{postID}",
    tag = "Posts",
    params(
        ("postID" = String, Path, description = "Post ObjectId (24 hex characters)")
    ),
    responses(
        (status = 200, description = "Post found", body = ApiResponse<PostVariant>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
#[instrument(skip(service))]
async fn get_post<R: PostRepository, E: EventRepository>(
    State(service): State<SharedService<R, E>>,
    ObjectIdPath(post_id): ObjectIdPath,
) -> PostResult<ApiResponse<PostVariant>> {
    let post = service.get_post(post_id).await?;
    Ok(ApiResponse::ok(post))
}
