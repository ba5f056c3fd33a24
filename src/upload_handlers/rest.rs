use actix_multipart::Multipart;
use actix_web::{get, web, HttpResponse};
use futures_util::StreamExt;
use serde_json::{Map, Value};

use crate::app::AppState;
use crate::error::CrmError;
use crate::models::lead_model::NewLead;
use crate::upload_handlers::storage::{content_type_for, UploadStore};

/// Multipart field carrying the optional visiting-card image.
pub const IMAGE_FIELD: &str = "visitingCard";

/// Read a lead-intake form: text fields become a [`NewLead`]; a file in
/// [`IMAGE_FIELD`] is stored and its public URL returned alongside.
pub async fn read_lead_form(
    mut payload: Multipart,
    uploads: &UploadStore,
) -> Result<(NewLead, Option<String>), CrmError> {
    let mut photo_url = None;

    let parsed = match collect_fields(&mut payload, uploads, &mut photo_url).await {
        Ok(fields) => serde_json::from_value::<NewLead>(Value::Object(fields))
            .map_err(|e| CrmError::Validation(format!("Invalid lead form: {}", e))),
        Err(e) => Err(e),
    };

    match parsed {
        Ok(input) => Ok((input, photo_url)),
        Err(e) => {
            if let Some(url) = &photo_url {
                uploads.discard(url);
            }
            Err(e)
        }
    }
}

async fn collect_fields(
    payload: &mut Multipart,
    uploads: &UploadStore,
    photo_url: &mut Option<String>,
) -> Result<Map<String, Value>, CrmError> {
    let mut fields = Map::new();

    while let Some(field) = payload.next().await {
        let mut field =
            field.map_err(|e| CrmError::Validation(format!("Multipart error: {}", e)))?;

        let name = field.name().unwrap_or_default().to_string();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        if name == IMAGE_FIELD {
            let Some(file_name) = file_name else {
                continue;
            };
            if photo_url.is_some() {
                return Err(CrmError::Validation(
                    "Only one image may be uploaded per lead".to_string(),
                ));
            }

            let mut pending = uploads.begin(&file_name)?;
            let mut size = 0usize;
            while let Some(chunk) = field.next().await {
                let data = chunk
                    .map_err(|e| CrmError::Validation(format!("Failed to read upload: {}", e)))?;
                size += data.len();
                pending = pending.write_chunk(data).await?;
            }
            // An empty file input still sends a part with a filename.
            if size > 0 {
                *photo_url = Some(pending.persist(uploads)?);
            }
            continue;
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let data =
                chunk.map_err(|e| CrmError::Validation(format!("Failed to read field: {}", e)))?;
            bytes.extend_from_slice(&data);
        }
        let text = String::from_utf8(bytes)
            .map_err(|_| CrmError::Validation(format!("Field {} is not valid UTF-8", name)))?;
        fields.insert(name, Value::String(text));
    }

    Ok(fields)
}

#[get("/uploads/{file}")]
pub async fn serve_upload(
    state: web::Data<AppState>,
    file: web::Path<String>,
) -> Result<HttpResponse, CrmError> {
    let name = file.into_inner();
    let not_found = || CrmError::NotFound("File not found".to_string());

    let path = state.uploads.resolve(&name).ok_or_else(not_found)?;
    let data = tokio::fs::read(&path).await.map_err(|_| not_found())?;

    Ok(HttpResponse::Ok()
        .content_type(content_type_for(&name))
        .body(data))
}
