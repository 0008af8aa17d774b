use actix_multipart::Multipart;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use log::debug;

use crate::controller::{FormController, Navigation};
use crate::session::{SessionRegistry, SESSION_COOKIE};
use crate::upload::{read_posted_form, UploadError};
use crate::views;

/// Largest accepted problem-form post, in bytes
#[derive(Debug, Clone, Copy)]
pub struct UploadLimit(pub usize);

/// Register every page of the application
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home))
        .route("/dashboard", web::get().to(dashboard))
        .route("/problem", web::get().to(problem_page))
        .route("/problem", web::post().to(problem_post))
        .route("/faq", web::get().to(faq))
        .route("/health", web::get().to(health_check));
}

fn existing_session(req: &HttpRequest) -> Option<String> {
    req.cookie(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|id| SessionRegistry::is_valid_id(id))
}

/// The request's session id, plus a cookie to set when a new one was issued
fn session(req: &HttpRequest) -> (String, Option<Cookie<'static>>) {
    match existing_session(req) {
        Some(id) => (id, None),
        None => {
            let id = SessionRegistry::new_session_id();
            let cookie = Cookie::build(SESSION_COOKIE, id.clone())
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .finish();
            (id, Some(cookie))
        }
    }
}

fn html(body: String, cookie: Option<Cookie<'static>>) -> HttpResponse {
    let mut response = HttpResponse::Ok();
    response.content_type("text/html; charset=utf-8");
    if let Some(cookie) = cookie {
        response.cookie(cookie);
    }
    response.body(body)
}

/// GET /
pub async fn home() -> impl Responder {
    html(views::home::render(), None)
}

/// GET /dashboard
pub async fn dashboard(req: HttpRequest, controller: web::Data<FormController>) -> impl Responder {
    let session = existing_session(&req);
    let dashboard = controller.dashboard(session.as_deref());
    html(views::dashboard::render(&dashboard), None)
}

/// GET /problem
pub async fn problem_page(req: HttpRequest, controller: web::Data<FormController>) -> impl Responder {
    let (session, cookie) = session(&req);
    let form = controller.form(&session);
    html(views::problem::render(&form, controller.field_groups()), cookie)
}

/// POST /problem, always answered with a redirect (see other)
pub async fn problem_post(
    req: HttpRequest,
    payload: Multipart,
    controller: web::Data<FormController>,
    limit: Option<web::Data<UploadLimit>>,
) -> Result<HttpResponse, UploadError> {
    let limit = limit.map(|l| l.0).unwrap_or(usize::MAX);
    let posted = read_posted_form(payload, limit).await?;
    let (session, cookie) = session(&req);
    debug!("Problem form action {:?} for session {}", posted.action, session);

    let location = match controller.handle(&session, posted.edits, posted.action).await {
        Navigation::Dashboard => "/dashboard",
        Navigation::Problem => "/problem",
    };

    let mut response = HttpResponse::SeeOther();
    response.insert_header((header::LOCATION, location));
    if let Some(cookie) = cookie {
        response.cookie(cookie);
    }
    Ok(response.finish())
}

/// GET /faq
pub async fn faq() -> impl Responder {
    html(views::faq::render(), None)
}

/// GET /health
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("OK")
}
