use axum::{
    Json,
    extract::{Multipart, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::application::dto::{
    BulkImportResponse, BulkValidateResponse, HealthResponse, NextCodeResponse,
};
use crate::application::import_service::FileUpload;
use crate::domain::TenantId;
use crate::importer::template::{self, TEMPLATE_FILE_NAME};
use crate::interface::http::problem::{ApiProblem, ApiResult};
use crate::state::AppState;

const TENANT_HEADER: &str = "x-tenant-id";
const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub async fn healthcheck() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn validate_bulk_import(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> ApiResult<Json<BulkValidateResponse>> {
    let tenant = tenant_from_headers(&headers)?;
    let upload = read_upload(multipart).await?;

    let summary = state
        .import_service
        .validate_file(&tenant, &upload)
        .await
        .map_err(ApiProblem::from_domain)?;

    Ok(Json(BulkValidateResponse::from(summary)))
}

pub async fn bulk_import(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<BulkImportResponse>)> {
    let tenant = tenant_from_headers(&headers)?;
    let upload = read_upload(multipart).await?;

    let report = state
        .import_service
        .import_file(&tenant, &upload)
        .await
        .map_err(ApiProblem::from_domain)?;
    let response = BulkImportResponse::from(report);

    let status = if response.failed_count == 0 {
        StatusCode::OK
    } else if response.success_count > 0 {
        StatusCode::MULTI_STATUS
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };

    Ok((status, Json(response)))
}

pub async fn download_template() -> ApiResult<Response> {
    let bytes = template::build_template().map_err(ApiProblem::from_domain)?;

    let disposition = format!("attachment; filename=\"{TEMPLATE_FILE_NAME}\"");
    let mut response = bytes.into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(XLSX_CONTENT_TYPE),
    );
    response.headers_mut().insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|_| ApiProblem::internal("invalid template file name"))?,
    );

    Ok(response)
}

pub async fn next_code(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<NextCodeResponse>> {
    let tenant = tenant_from_headers(&headers)?;

    let next_code = state
        .import_service
        .preview_next_code(&tenant)
        .await
        .map_err(ApiProblem::from_domain)?;

    Ok(Json(NextCodeResponse { next_code }))
}

fn tenant_from_headers(headers: &HeaderMap) -> ApiResult<TenantId> {
    let Some(raw) = headers.get(TENANT_HEADER) else {
        return Err(ApiProblem::validation(format!(
            "{TENANT_HEADER} header is required"
        )));
    };

    let raw = raw.to_str().map_err(|_| {
        ApiProblem::validation(format!("{TENANT_HEADER} header must be valid ASCII"))
    })?;

    TenantId::new(raw)
        .ok_or_else(|| ApiProblem::validation(format!("{TENANT_HEADER} header must not be blank")))
}

async fn read_upload(mut multipart: Multipart) -> ApiResult<FileUpload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiProblem::validation(format!("malformed multipart body: {err}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string).unwrap_or_default();
        let bytes = field
            .bytes()
            .await
            .map_err(|err| ApiProblem::validation(format!("failed to read upload: {err}")))?;

        return Ok(FileUpload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(ApiProblem::validation("multipart field 'file' is required"))
}
