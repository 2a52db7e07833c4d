use crate::auth::claims::AuthUser;
use crate::response::{ApiResponse, Empty};
use axum::{
    Json,
    body::Body,
    extract::FromRequestParts,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use db::models::user::Role;
use db::models::{assignment, course_offering};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};

/// Extracts and verifies the caller, then re-inserts the `AuthUser` into
/// request extensions for downstream handlers.
async fn extract_and_insert_authuser(
    mut req: Request<Body>,
) -> Result<(Request<Body>, AuthUser), (StatusCode, Json<ApiResponse<Empty>>)> {
    let (mut parts, body) = req.into_parts();
    let user = AuthUser::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("Authentication required")),
            )
        })?;

    req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user.clone());
    Ok((req, user))
}

/// Guard: any authenticated caller.
pub async fn allow_authenticated(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    let (req, _user) = extract_and_insert_authuser(req).await?;

    Ok(next.run(req).await)
}

/// Guard: graders only (TA, faculty, admin).
///
/// Faculty callers additionally have to own the course offering of the
/// submission they touch; that check needs the row, so it lives in the
/// handlers via [`faculty_owns_offering`].
pub async fn allow_staff(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    let (req, user) = extract_and_insert_authuser(req).await?;

    if !user.0.role.is_staff() {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Grader access required")),
        ));
    }

    Ok(next.run(req).await)
}

/// Guard: admin only.
pub async fn allow_admin(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    let (req, user) = extract_and_insert_authuser(req).await?;

    if user.0.role != Role::Admin {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Admin access required")),
        ));
    }

    Ok(next.run(req).await)
}

/// Whether `user_id` is the faculty owner of the offering an assignment
/// belongs to. TA and admin roles bypass this check entirely.
pub async fn faculty_owns_offering(
    db: &DatabaseConnection,
    user_id: i64,
    assignment: &assignment::Model,
) -> Result<bool, DbErr> {
    let offering = course_offering::Entity::find_by_id(assignment.course_offering_id)
        .one(db)
        .await?;

    Ok(offering.map(|o| o.faculty_id == user_id).unwrap_or(false))
}

/// Combined grading authorization: global TA/admin, or faculty owning the
/// offering.
pub async fn may_grade(
    db: &DatabaseConnection,
    user: &AuthUser,
    assignment: &assignment::Model,
) -> Result<bool, DbErr> {
    match user.0.role {
        Role::Ta | Role::Admin => Ok(true),
        Role::Faculty => faculty_owns_offering(db, user.0.sub, assignment).await,
        Role::Student => Ok(false),
    }
}
