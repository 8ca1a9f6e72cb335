use axum::extract::multipart::MultipartError;
use axum::extract::{Extension, Multipart};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use crate::common::{ApiError, ApiResult};
use crate::domains::ingestion::{check_upload, import_csv, ImportReport, IngestError, TemplateKind};
use crate::server::app::AxumAppState;

const FILE_FIELD: &str = "file";

/// Accept a CSV in multipart field `file` and import it.
///
/// Whole-file problems answer 400 before anything is stored; row problems are
/// listed in the report.
pub async fn upload_csv_handler(
    Extension(state): Extension<AxumAppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<ImportReport>> {
    let limit = state.server_deps.ingest.max_upload_bytes;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);

        // Extension check before the body is read
        check_upload(file_name.as_deref(), 1, limit)?;

        let bytes = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
        let file_name = file_name.unwrap_or_default();
        let report = import_csv(&file_name, &bytes, &state.server_deps).await?;
        return Ok(Json(report));
    }

    Err(IngestError::MissingFile.into())
}

/// A body cut off by the request size limit is reported like any oversized file.
fn multipart_error(err: MultipartError, limit: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        IngestError::TooLarge { limit }.into()
    } else {
        err.into()
    }
}

fn template_response(kind: TemplateKind) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", kind.filename()),
            ),
        ],
        kind.body(),
    )
}

pub async fn template_address_handler() -> impl IntoResponse {
    template_response(TemplateKind::Address)
}

pub async fn template_coordinates_handler() -> impl IntoResponse {
    template_response(TemplateKind::Coordinates)
}
