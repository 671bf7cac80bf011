use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use axum_extra::extract::CookieJar;
use tracing::debug;

use crate::{
    auth::session::{CurrentUser, SessionKeys},
    error::AppError,
    state::AppState,
};

/// Redirect anonymous callers to `/login`; otherwise expose the caller as [`CurrentUser`].
pub async fn require_login(
    State(keys): State<SessionKeys>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(username) = keys.current_user(&jar) else {
        debug!(uri = %req.uri(), "anonymous request to protected page");
        return AppError::Unauthenticated.back_to("/login").into_response();
    };
    req.extensions_mut().insert(CurrentUser(username));
    next.run(req).await
}

/// Wrap every route of `routes` in [`require_login`].
pub fn guarded(routes: Router<AppState>, state: AppState) -> Router<AppState> {
    routes.route_layer(middleware::from_fn_with_state(state, require_login))
}
