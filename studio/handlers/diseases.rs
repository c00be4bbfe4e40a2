use std::io::Cursor;
use tiny_http::Response;

use paddy_diagnose::Disease;

use crate::render::{html_escape, render_page, Page};
use crate::state::SharedState;
use crate::util::form::url_decode;

// ---------------------------------------------------------------------------
// GET /diseases/{id}
// ---------------------------------------------------------------------------

pub fn handle_get(raw_id: &str, studio: &SharedState) -> Response<Cursor<Vec<u8>>> {
    let id = url_decode(raw_id);

    // Extra elements of the last prediction, shown only on the page it routed to.
    let extras: Option<String> = {
        let st = studio.lock();
        st.workflow.last_diagnosis()
            .filter(|d| d.target.disease_id() == id)
            .map(|d| d.response.extras().iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", "))
            .filter(|s| !s.is_empty())
    };

    match Disease::from_route_id(&id) {
        Some(disease) => crate::routes::html_response(build_disease_page(disease, extras.as_deref())),
        None          => crate::routes::html_with_status(404, build_unknown_page(&id)),
    }
}

// ---------------------------------------------------------------------------
// Page builders
// ---------------------------------------------------------------------------

fn build_disease_page(disease: Disease, extras: Option<&str>) -> String {
    let raw = match extras {
        Some(e) => format!(r#"<div class="raw-output">Model output: {}</div>"#, html_escape(e)),
        None    => String::new(),
    };
    let body = format!(
        r#"<div class="result-card"><h1>Diagnosis</h1>
<div class="prediction-hero">{label}</div>
{raw}
<p style="margin-top:24px"><a href="/diagnose">Diagnose another plant</a></p></div>"#,
        label = html_escape(disease.label()),
        raw   = raw,
    );
    render_page(Page::Disease, false, |tmpl| tmpl.replace("{{BODY}}", &body))
}

fn build_unknown_page(id: &str) -> String {
    let body = format!(
        r#"<div class="result-card"><h1>Unknown diagnosis</h1>
<p class="hint">The model returned <strong>{}</strong>, which does not match any disease we have information on.</p>
<p><a href="/diagnose">Try again</a></p></div>"#,
        html_escape(id)
    );
    render_page(Page::Disease, false, |tmpl| tmpl.replace("{{BODY}}", &body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use paddy_diagnose::{route, DiagnosisWorkflow, InferenceClient, Normalizer, PredictionResponse, SampleCatalog};
    use serde_json::json;
    use tiny_http::StatusCode;

    use crate::state::{Studio, StudioState};

    fn studio() -> SharedState {
        let workflow = DiagnosisWorkflow::new(SampleCatalog::new("unused"), Normalizer::default());
        Arc::new(Studio {
            state:            Mutex::new(StudioState::new(workflow)),
            predictor:        Box::new(InferenceClient::default()),
            max_upload_bytes: 1024,
        })
    }

    /// Follows a diagnosis the way a browser would: the redirect's `Location`,
    /// then the result page it points at.
    fn follow(top: serde_json::Value, studio: &SharedState) -> (String, StatusCode) {
        let target = route(&PredictionResponse::from_value(json!([top])).unwrap());
        let redirect = crate::routes::redirect(&target.href());
        let location = redirect.headers().iter()
            .find(|h| h.field.equiv("Location"))
            .map(|h| h.value.as_str().to_owned())
            .unwrap();
        let id = location.strip_prefix("/diseases/").unwrap().to_owned();
        (location, handle_get(&id, studio).status_code())
    }

    #[test]
    fn known_id_lands_on_its_page() {
        let (location, status) = follow(json!("3"), &studio());
        assert_eq!(location, "/diseases/3");
        assert_eq!(status, StatusCode(200));
    }

    #[test]
    fn awkward_ids_land_on_the_unknown_page() {
        let studio = studio();
        for top in [json!("Bệnh"), json!("3?x"), json!("3/x"), json!("Bệnh đạo ôn")] {
            let (location, status) = follow(top.clone(), &studio);
            assert!(location.starts_with("/diseases/"), "{} redirected to {}", top, location);
            assert!(location.is_ascii());
            assert_eq!(status, StatusCode(404), "{}", top);
        }
    }

    #[test]
    fn known_disease_page_shows_label_and_extras() {
        let html = build_disease_page(Disease::Blast, Some("\"Blast\", 0.91"));
        assert!(html.contains("Blast"));
        assert!(html.contains("0.91"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn unknown_id_is_escaped() {
        let html = build_unknown_page("<script>");
        assert!(html.contains("&lt;script&gt;"));
    }
}
