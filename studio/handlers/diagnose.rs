use std::io::{Cursor, Read};
use tiny_http::{Request, Response};
use tracing::{debug, warn};

use paddy_diagnose::SampleIndex;

use crate::render::{html_escape, render_page, Page};
use crate::state::{FlashKind, FlashMessage, SharedState, StudioState};
use crate::util::form::{form_get, parse_form};
use crate::util::multipart::{extract_boundary, file_field, parse_parts};

// ---------------------------------------------------------------------------
// GET /diagnose
// ---------------------------------------------------------------------------

pub fn handle_get(studio: &SharedState) -> Response<Cursor<Vec<u8>>> {
    let mut st = studio.lock();
    let flash  = st.take_flash();
    let page   = build_diagnose_page(&st, flash.as_ref());
    drop(st);

    crate::routes::html_response(page)
}

// ---------------------------------------------------------------------------
// POST /diagnose/sample
// ---------------------------------------------------------------------------

pub fn handle_sample(request: &mut Request, studio: &SharedState) -> Response<Cursor<Vec<u8>>> {
    let mut body = String::new();
    let _ = request.as_reader().read_to_string(&mut body);
    let pairs = parse_form(&body);

    let mut st = studio.lock();
    match form_get(&pairs, "sample").and_then(|s| s.trim().parse::<usize>().ok()) {
        Some(index) => {
            if st.workflow.select_sample(index).is_ok() {
                let label = SampleIndex::new(index).map(|i| i.disease().label()).unwrap_or("");
                st.flash = Some(FlashMessage::success(format!("Sample loaded: {}.", label)));
            }
        }
        None => st.flash = Some(FlashMessage::error("Choose one of the sample images.")),
    }
    drop(st);

    crate::routes::redirect("/diagnose")
}

// ---------------------------------------------------------------------------
// POST /diagnose/upload
// ---------------------------------------------------------------------------

pub fn handle_upload(request: &mut Request, studio: &SharedState) -> Response<Cursor<Vec<u8>>> {
    let content_type = request.headers().iter()
        .find(|h| h.field.equiv("Content-Type"))
        .map(|h| h.value.as_str().to_owned())
        .unwrap_or_default();

    let boundary = match extract_boundary(&content_type) {
        Some(b) => b,
        None    => return flash_error(studio, "Invalid upload request."),
    };

    if request.body_length().map_or(false, |len| len > studio.max_upload_bytes) {
        return flash_error(studio, "That file is too large.");
    }

    let mut body: Vec<u8> = Vec::new();
    let limit = studio.max_upload_bytes as u64 + 1;
    if let Err(e) = request.as_reader().take(limit).read_to_end(&mut body) {
        warn!(error = %e, "failed to read upload body");
        return flash_error(studio, "The upload was interrupted.");
    }
    if body.len() > studio.max_upload_bytes {
        return flash_error(studio, "That file is too large.");
    }

    let parts = parse_parts(&body, &boundary);
    let file  = file_field(&parts, "userImage").map(<[u8]>::to_vec);

    let mut st = studio.lock();
    if let Ok(true) = st.workflow.select_upload(file) {
        st.flash = Some(FlashMessage::success("Image uploaded."));
    }
    drop(st);

    crate::routes::redirect("/diagnose")
}

// ---------------------------------------------------------------------------
// POST /diagnose/submit
// ---------------------------------------------------------------------------

/// Runs one attempt. The lock is released while the image is decoded and
/// while the prediction service is being called, so the form page keeps
/// rendering (with its loading notice) and a second submit is turned away as
/// busy.
pub fn handle_submit(studio: &SharedState) -> Response<Cursor<Vec<u8>>> {
    let job = match studio.lock().workflow.begin_submit() {
        Ok(job) => job,
        Err(_)  => return crate::routes::redirect("/diagnose"),
    };

    debug!(attempt = job.attempt(), source = ?job.source(), "building tensor");
    let tensor = job.build_tensor();
    let pending = match studio.lock().workflow.tensor_ready(job.attempt(), tensor) {
        Ok(p)  => p,
        Err(_) => return crate::routes::redirect("/diagnose"),
    };

    let outcome = studio.predictor.predict(pending.tensor());

    let mut st = studio.lock();
    match st.workflow.finish_submit(pending.attempt(), outcome) {
        Ok(diagnosis) => crate::routes::redirect(&diagnosis.target.href()),
        Err(_)        => crate::routes::redirect("/diagnose"),
    }
}

// ---------------------------------------------------------------------------
// GET /diagnose/image  and  GET /sample-paddies/{n}.jpg
// ---------------------------------------------------------------------------

pub fn handle_active_image(studio: &SharedState) -> Response<Cursor<Vec<u8>>> {
    let st = studio.lock();
    match st.workflow.session().active() {
        Some(asset) => crate::routes::bytes_response(asset.bytes.clone(), asset.content_type()),
        None        => crate::routes::not_found(),
    }
}

pub fn handle_sample_image(name: &str, studio: &SharedState) -> Response<Cursor<Vec<u8>>> {
    let index = name
        .strip_suffix(".jpg")
        .and_then(|n| n.parse::<usize>().ok())
        .and_then(|n| SampleIndex::new(n).ok());
    let Some(index) = index else { return crate::routes::not_found() };

    let catalog = studio.lock().workflow.catalog().clone();
    match catalog.load(index) {
        Ok(bytes) => crate::routes::bytes_response(bytes, "image/jpeg"),
        Err(e)    => {
            warn!(error = %e, "sample image missing");
            crate::routes::not_found()
        }
    }
}

// ---------------------------------------------------------------------------
// GET /api/session
// ---------------------------------------------------------------------------

pub fn handle_session(studio: &SharedState) -> Response<Cursor<Vec<u8>>> {
    let view = studio.lock().workflow.session().view();
    match serde_json::to_string(&view) {
        Ok(body) => crate::routes::json_response(body),
        Err(e)   => {
            warn!(error = %e, "failed to serialize session view");
            crate::routes::html_with_status(500, "Session unavailable.".to_owned())
        }
    }
}

// ---------------------------------------------------------------------------
// Page builder
// ---------------------------------------------------------------------------

fn flash_error(studio: &SharedState, text: &str) -> Response<Cursor<Vec<u8>>> {
    studio.lock().flash = Some(FlashMessage::error(text));
    crate::routes::redirect("/diagnose")
}

pub fn render_flash_html(flash: Option<&FlashMessage>) -> String {
    match flash {
        None    => String::new(),
        Some(f) => {
            let cls = match f.kind {
                FlashKind::Success => "flash-success",
                FlashKind::Error   => "flash-error",
            };
            format!(r#"<div class="flash {}">{}</div>"#, cls, html_escape(&f.text))
        }
    }
}

fn build_diagnose_page(st: &StudioState, flash: Option<&FlashMessage>) -> String {
    let session   = st.workflow.session();
    let in_flight = st.workflow.is_in_flight();
    let selected  = session.active().and_then(|a| a.sample_index());

    let options: String = st.workflow.catalog().entries().map(|(index, disease)| {
        let sel = if Some(index) == selected { " selected" } else { "" };
        format!("<option value=\"{}\"{}>{}</option>", index, sel, html_escape(disease.label()))
    }).collect::<Vec<_>>().join("\n");

    let placeholder_sel = if selected.is_none() { " selected" } else { "" };

    let preview = match session.user_image() {
        Some(url) => format!(r#"<img class="preview" src="{}" alt="Selected paddy">"#, html_escape(url)),
        None      => String::new(),
    };

    let disabled = if in_flight { " disabled" } else { "" };

    let body = format!(
        r#"<h1>Diagnose</h1>
<p class="hint">Upload a photo of a paddy plant and the image recognition model will look for signs of disease, then point you to the matching diagnosis and treatment.</p>
<p style="margin-top:36px">Upload an image or choose one of our demo images below!</p>
<form method="POST" action="/diagnose/sample">
  <select name="sample" onchange="this.form.submit()"{disabled}>
    <option value="" disabled hidden{placeholder_sel}></option>
    {options}
  </select>
</form>
<form method="POST" action="/diagnose/upload" enctype="multipart/form-data">
  <input type="file" name="userImage" accept="image/png,image/jpeg,image/bmp,image/gif" onchange="this.form.submit()"{disabled}>
</form>
{preview}
<form method="POST" action="/diagnose/submit" data-submit>
  <button type="submit" class="btn"{disabled}>Upload</button>
</form>
<div id="loading" class="loading">Diagnosing…</div>"#,
        disabled        = disabled,
        placeholder_sel = placeholder_sel,
        options         = options,
        preview         = preview,
    );

    render_page(Page::Diagnose, in_flight, |tmpl| {
        tmpl
            .replace("{{FLASH}}", &render_flash_html(flash))
            .replace("{{BODY}}", &body)
    })
}
