//! Audio endpoints
//!
//! `GET /` lists the audio directory, `GET /audio/{name}` sends one file.

use crate::config::AppState;
use crate::error::{Result, ServeError};
use crate::handler::router::RequestContext;
use crate::http::{self, cache};
use crate::library::{self, AudioFile};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Serve the listing page
pub async fn serve_index(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    match state.library.list_entries().await {
        Ok(entries) => {
            let html = library::render_index(&state.config.library.title, &entries);
            http::build_html_response(html, ctx.is_head)
        }
        Err(e) => error_response(&e),
    }
}

/// Serve one file; `raw_name` is the still percent-encoded route segment
pub async fn serve_audio(
    ctx: &RequestContext<'_>,
    raw_name: &str,
    state: &AppState,
) -> Response<Full<Bytes>> {
    match load_audio(raw_name, state).await {
        Ok(file) => build_audio_response(ctx, file, state.config.http.cache_max_age),
        Err(e) => error_response(&e),
    }
}

async fn load_audio(raw_name: &str, state: &AppState) -> Result<AudioFile> {
    let name = library::decode_file_name(raw_name)?;
    state.library.read(&name).await
}

fn build_audio_response(
    ctx: &RequestContext<'_>,
    file: AudioFile,
    cache_max_age: u32,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&file.content);
    let cache_control = cache::cache_control(cache_max_age);

    // Check if client has cached version
    if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag, &cache_control);
    }

    http::build_file_response(
        Bytes::from(file.content),
        file.content_type,
        &etag,
        &cache_control,
        ctx.is_head,
    )
}

fn error_response(err: &ServeError) -> Response<Full<Bytes>> {
    match err {
        ServeError::DirectoryAccess { .. } => logger::log_error(&err.to_string()),
        ServeError::PathTraversal(_) | ServeError::BadRequest(_) => {
            logger::log_warning(&err.to_string());
        }
        ServeError::NotFound(_) => {}
    }
    http::build_error_response(err.status())
}
