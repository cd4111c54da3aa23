use actix_files::Files;
use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use futures::{StreamExt, TryStreamExt};
use log::{error, info, warn};
use shared::UploadResponse;

use crate::storage::{PUBLIC_PREFIX, UploadError, UploadStore};

const FILE_FIELD: &str = "file";

pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/upload").route(web::post().to(handle_upload)));
}

pub fn configure_routes(cfg: &mut web::ServiceConfig, store: &UploadStore, frontend_dir: String) {
    configure_api(cfg);
    cfg.service(Files::new(PUBLIC_PREFIX, store.dir()))
        .service(Files::new("/", frontend_dir).index_file("index.html"));
}

async fn handle_upload(
    store: web::Data<UploadStore>,
    mut payload: Multipart,
) -> Result<HttpResponse, UploadError> {
    match receive_file(&store, &mut payload).await {
        Ok(file_path) => {
            info!("Stored upload at {}", file_path);
            Ok(HttpResponse::Ok().json(UploadResponse { file_path }))
        }
        Err(e) => {
            error!("Upload failed: {}", e);
            Err(e)
        }
    }
}

async fn receive_file(store: &UploadStore, payload: &mut Multipart) -> Result<String, UploadError> {
    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| UploadError::Multipart(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            warn!("Ignoring multipart field {:?}", field.name());
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let mime_type = field.content_type().map(|m| m.essence_str().to_string());

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| UploadError::Multipart(e.to_string()))?;
            store.check_size(data.len() + chunk.len())?;
            data.extend_from_slice(&chunk);
        }

        let extension = UploadStore::file_extension(filename.as_deref(), mime_type.as_deref());
        return store.save(&data, extension.as_deref()).await;
    }

    Err(UploadError::MissingFile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use shared::ErrorResponse;

    const BOUNDARY: &str = "----birdboundary";

    fn multipart_body(parts: &[(&str, Option<&str>, &str, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, filename, content_type, data) in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            let disposition = match filename {
                Some(f) => format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    name, f
                ),
                None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", name),
            };
            body.extend_from_slice(disposition.as_bytes());
            body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    fn upload_request(body: Vec<u8>) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/upload")
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(body)
    }

    #[actix_web::test]
    async fn stores_file_with_extension_preserved() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path(), 1024);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(store))
                .configure(configure_api),
        )
        .await;

        let body = multipart_body(&[
            ("note", None, "text/plain", &b"hello"[..]),
            ("file", Some("hornero.png"), "image/png", &b"\x89PNG fake"[..]),
        ]);
        let resp = test::call_service(&app, upload_request(body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let json: UploadResponse = test::read_body_json(resp).await;
        assert!(json.file_path.starts_with("/uploads/"));
        assert!(json.file_path.ends_with(".png"));

        let name = json.file_path.trim_start_matches("/uploads/");
        assert_eq!(std::fs::read(tmp.path().join(name)).unwrap(), b"\x89PNG fake");
    }

    #[actix_web::test]
    async fn missing_file_part_is_bad_request() {
        let tmp = tempfile::tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(UploadStore::new(tmp.path(), 1024)))
                .configure(configure_api),
        )
        .await;

        let body = multipart_body(&[("other", Some("a.png"), "image/png", &b"x"[..])]);
        let resp = test::call_service(&app, upload_request(body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(json.error, "No file part");
    }

    #[actix_web::test]
    async fn oversized_file_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(UploadStore::new(tmp.path(), 4)))
                .configure(configure_api),
        )
        .await;

        let body = multipart_body(&[("file", Some("big.jpg"), "image/jpeg", &b"0123456789"[..])]);
        let resp = test::call_service(&app, upload_request(body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[actix_web::test]
    async fn unparseable_body_is_internal_error() {
        let tmp = tempfile::tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(UploadStore::new(tmp.path(), 1024)))
                .configure(configure_api),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/upload")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{}")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(json.error, "Upload failed");
    }
}
