//! Page operations: view, edit, save
//!
//! Each takes an already validated title. Missing pages are a normal precondition here:
//! `view` sends the client to the editor and `edit` starts from a blank page.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::config::AppState;
use crate::http;
use crate::logger;
use crate::page::{Page, StoreError, Title};
use crate::render::View;

/// Show a page, or redirect to its editor when it cannot be loaded
pub async fn view(state: &AppState, title: &Title, is_head: bool) -> Response<Full<Bytes>> {
    match state.store.load(title).await {
        Ok(page) => render(state, View::View, &page, is_head),
        Err(e) => {
            if !matches!(e, StoreError::NotFound { .. }) {
                logger::log_warning(&format!("Treating unreadable page as missing: {e}"));
            }
            http::build_redirect_response(&format!("/edit/{title}"))
        }
    }
}

/// Show the edit form, pre-filled when the page exists
pub async fn edit(state: &AppState, title: &Title, is_head: bool) -> Response<Full<Bytes>> {
    let page = match state.store.load(title).await {
        Ok(page) => page,
        Err(StoreError::NotFound { .. }) => Page::blank(title.clone()),
        Err(e) => {
            logger::log_warning(&format!("Editing unreadable page from blank: {e}"));
            Page::blank(title.clone())
        }
    };
    render(state, View::Edit, &page, is_head)
}

/// Persist a new body and redirect to the page view
pub async fn save(state: &AppState, title: &Title, body: Vec<u8>) -> Response<Full<Bytes>> {
    let page = Page::new(title.clone(), body);
    match state.store.save(&page).await {
        Ok(()) => {
            logger::log_page_saved(title.as_str(), page.body.len());
            http::build_redirect_response(&format!("/view/{title}"))
        }
        Err(e) => {
            logger::log_error(&format!("Failed to save page {title}: {e}"));
            http::build_500_response(&e.to_string())
        }
    }
}

fn render(state: &AppState, view: View, page: &Page, is_head: bool) -> Response<Full<Bytes>> {
    match state.renderer.render(view, page) {
        Ok(html) => http::build_html_response(html, is_head),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to render {} for {}: {e}",
                view.name(),
                page.title
            ));
            http::build_500_response(&e.to_string())
        }
    }
}
