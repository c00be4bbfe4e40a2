use std::io::Cursor;
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::state::SharedState;
use crate::handlers;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Builds a header, dropping it when the value is not valid header text.
fn header(name: &str, value: &str) -> Option<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).ok()
}

fn response_with(status: u16, headers: Vec<Option<Header>>, body: Vec<u8>) -> Response<Cursor<Vec<u8>>> {
    let len = body.len();
    Response::new(
        StatusCode(status),
        headers.into_iter().flatten().collect(),
        Cursor::new(body),
        Some(len),
        None,
    )
}

pub fn html_response(body: String) -> Response<Cursor<Vec<u8>>> {
    html_with_status(200, body)
}

pub fn html_with_status(status: u16, body: String) -> Response<Cursor<Vec<u8>>> {
    response_with(status, vec![header("Content-Type", "text/html; charset=utf-8")], body.into_bytes())
}

pub fn redirect(location: &str) -> Response<Cursor<Vec<u8>>> {
    // A location that cannot be sent as a header falls back to the form page.
    let location = header("Location", location).or_else(|| header("Location", "/diagnose"));
    response_with(303, vec![location, header("Content-Length", "0")], Vec::new())
}

pub fn json_response(body: String) -> Response<Cursor<Vec<u8>>> {
    response_with(
        200,
        vec![header("Content-Type", "application/json"), header("Cache-Control", "no-store")],
        body.into_bytes(),
    )
}

pub fn bytes_response(bytes: Vec<u8>, content_type: &str) -> Response<Cursor<Vec<u8>>> {
    response_with(
        200,
        vec![header("Content-Type", content_type), header("Cache-Control", "no-store")],
        bytes,
    )
}

pub fn not_found() -> Response<Cursor<Vec<u8>>> {
    response_with(404, vec![header("Content-Type", "text/plain")], b"404 Not Found".to_vec())
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Dispatches incoming requests to the appropriate handler.
///
/// Handlers receive a `&mut Request` so the dispatcher keeps ownership and
/// calls `request.respond(response)` at the end.
pub fn dispatch(mut request: Request, studio: SharedState) {
    let method = request.method().clone();
    let url    = request.url().to_owned();

    let path = match url.find('?') {
        Some(pos) => url[..pos].to_owned(),
        None      => url.clone(),
    };

    tracing::debug!(%method, %path, "request");

    // Dynamic path segments.
    if method == Method::Get {
        if let Some(id) = path.strip_prefix("/diseases/") {
            let resp = handlers::diseases::handle_get(id, &studio);
            let _ = request.respond(resp);
            return;
        }
        if let Some(name) = path.strip_prefix("/sample-paddies/") {
            let resp = handlers::diagnose::handle_sample_image(name, &studio);
            let _ = request.respond(resp);
            return;
        }
    }

    let response = match (method, path.as_str()) {
        // ── Root redirect ─────────────────────────────────────────────────
        (Method::Get, "/") => redirect("/diagnose"),

        // ── Diagnose ─────────────────────────────────────────────────────
        (Method::Get,  "/diagnose")        => handlers::diagnose::handle_get(&studio),
        (Method::Post, "/diagnose/sample") => handlers::diagnose::handle_sample(&mut request, &studio),
        (Method::Post, "/diagnose/upload") => handlers::diagnose::handle_upload(&mut request, &studio),
        (Method::Post, "/diagnose/submit") => handlers::diagnose::handle_submit(&studio),
        (Method::Get,  "/diagnose/image")  => handlers::diagnose::handle_active_image(&studio),

        // ── Session ──────────────────────────────────────────────────────
        (Method::Get, "/api/session") => handlers::diagnose::handle_session(&studio),

        // ── 404 ──────────────────────────────────────────────────────────
        _ => not_found(),
    };

    let _ = request.respond(response);
}
