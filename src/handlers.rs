use crate::config::FALLBACK_GOAL_ML;
use crate::errors::AppError;
use crate::goal::compute_goal;
use crate::history::build_history_at;
use crate::ledger::retention_start;
use crate::models::{
    AddWaterRequest, AddWaterResponse, GoalForm, LoginForm, RegisterForm, ResetWaterResponse,
    TodayResponse, User, UserId,
};
use crate::session::{expired_session_cookie, session_cookie, session_token, GoalSet, LoggedIn};
use crate::state::AppState;
use crate::ui::{render_goal, render_history, render_index, render_login, render_register};
use crate::users::AuthError;
use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use chrono::{Local, NaiveDate};
use tracing::{debug, info};

pub async fn index(
    State(state): State<AppState>,
    GoalSet { session, goal }: GoalSet,
) -> Result<Html<String>, AppError> {
    let today = today();
    let current = reconcile_today(&state, &session.token, session.user_id, today).await?;
    Ok(Html(render_index(
        &session.username,
        &today.to_string(),
        current,
        goal,
    )))
}

pub async fn get_today(
    State(state): State<AppState>,
    LoggedIn(session): LoggedIn,
) -> Result<Json<TodayResponse>, AppError> {
    let today = today();
    let current = reconcile_today(&state, &session.token, session.user_id, today).await?;
    Ok(Json(TodayResponse {
        date: today.to_string(),
        current,
        goal: session.goal,
    }))
}

pub async fn login_form() -> Html<String> {
    Html(render_login(&[]))
}

pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let username = form.username.trim();
    let mut errors = Vec::new();
    if username.is_empty() {
        errors.push("Username cannot be empty".to_string());
    }
    if form.password.is_empty() {
        errors.push("Password cannot be empty".to_string());
    }
    if !errors.is_empty() {
        return Ok(form_error(render_login(&errors)));
    }

    let Some(user) = state.users.authenticate(username, &form.password).await? else {
        info!(username, "login rejected");
        return Ok(form_error(render_login(&[
            "Invalid username or password".to_string(),
        ])));
    };

    Ok(sign_in(&state, &user).await)
}

pub async fn register_form() -> Html<String> {
    Html(render_register(&[]))
}

pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let username = form.username.trim();
    let mut errors = Vec::new();
    if username.is_empty() {
        errors.push("Username cannot be empty".to_string());
    }
    if form.password.is_empty() {
        errors.push("Password cannot be empty".to_string());
    }
    if form.confirmation.is_empty() {
        errors.push("Confirmation cannot be empty".to_string());
    }
    if errors.is_empty() && form.password != form.confirmation {
        errors.push("Password doesn't match confirmation".to_string());
    }
    if !errors.is_empty() {
        return Ok(form_error(render_register(&errors)));
    }

    match state.users.register(username, &form.password).await {
        Ok(user) => Ok(sign_in(&state, &user).await),
        Err(AuthError::UsernameTaken) => Ok(form_error(render_register(&[
            AuthError::UsernameTaken.to_string(),
        ]))),
        Err(err) => Err(err.into()),
    }
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        if let Some(session) = state.sessions.remove(&token).await {
            info!(user_id = %session.user_id, "signed out");
        }
    }
    ([(SET_COOKIE, expired_session_cookie())], Redirect::to("/")).into_response()
}

pub async fn goal_form(LoggedIn(session): LoggedIn) -> Html<String> {
    Html(render_goal(&session.username, session.goal, &[]))
}

pub async fn set_goal(
    State(state): State<AppState>,
    LoggedIn(session): LoggedIn,
    Form(form): Form<GoalForm>,
) -> Result<Response, AppError> {
    let parsed = (
        form.weight.trim().parse::<f64>(),
        form.activity.trim().parse::<i64>(),
        form.age.trim().parse::<i64>(),
    );
    let (Ok(weight), Ok(activity), Ok(age)) = parsed else {
        return Ok(form_error(render_goal(
            &session.username,
            session.goal,
            &["Please input valid values for weight, activity, and age group".to_string()],
        )));
    };

    let goal = match compute_goal(weight, activity, age) {
        Ok(goal) => goal,
        Err(err) => {
            debug!(user_id = %session.user_id, "goal rejected: {err}");
            return Ok(form_error(render_goal(
                &session.username,
                session.goal,
                &[err.to_string()],
            )));
        }
    };

    state.users.set_goal(session.user_id, goal).await?;
    state.sessions.set_goal(&session.token, goal).await;
    Ok(Redirect::to("/").into_response())
}

pub async fn add_water(
    State(state): State<AppState>,
    LoggedIn(session): LoggedIn,
    Json(payload): Json<AddWaterRequest>,
) -> Result<Json<AddWaterResponse>, AppError> {
    if !payload.amount.is_finite() {
        return Err(AppError::bad_request("amount must be a number"));
    }

    let updated_current = state
        .ledger
        .increment(session.user_id, today(), payload.amount)
        .await?;
    state.sessions.set_current(&session.token, updated_current).await;
    Ok(Json(AddWaterResponse { updated_current }))
}

pub async fn reset_water(
    State(state): State<AppState>,
    LoggedIn(session): LoggedIn,
) -> Result<Json<ResetWaterResponse>, AppError> {
    let reset_current = state.ledger.reset(session.user_id, today()).await?;
    state.sessions.set_current(&session.token, reset_current).await;
    Ok(Json(ResetWaterResponse { reset_current }))
}

pub async fn history(
    State(state): State<AppState>,
    LoggedIn(session): LoggedIn,
) -> Result<Html<String>, AppError> {
    let today = today();
    let days = state
        .ledger
        .range_query(session.user_id, retention_start(today), today)
        .await?;
    let goal = session.goal.unwrap_or(FALLBACK_GOAL_ML);
    let view = build_history_at(today, &days, goal);
    Ok(Html(render_history(&session.username, &view)))
}

async fn reconcile_today(
    state: &AppState,
    token: &str,
    user_id: UserId,
    today: NaiveDate,
) -> Result<f64, AppError> {
    let reconciled = state.ledger.reconcile(user_id, today).await?;
    state
        .sessions
        .set_current(token, reconciled.today_current)
        .await;
    Ok(reconciled.today_current)
}

async fn sign_in(state: &AppState, user: &User) -> Response {
    let session = state.sessions.create(user).await;
    info!(user_id = %user.id, "signed in");
    (
        [(SET_COOKIE, session_cookie(&session.token))],
        Redirect::to("/"),
    )
        .into_response()
}

fn form_error(page: String) -> Response {
    (StatusCode::BAD_REQUEST, Html(page)).into_response()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
