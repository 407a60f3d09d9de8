//! Document API integration tests.
//!
//! Run with: `cargo test -p docstream-api --test documents_test`
//! Requires Docker for testcontainers (Postgres).

mod helpers;

use helpers::auth::{bearer, mint_token, mint_token_for};
use helpers::fixtures::{minimal_pdf, multipart_file, multipart_without_file};
use helpers::{api_path, setup_test_app};

#[tokio::test]
async fn test_upload_document() {
    let app = setup_test_app().await;
    let client = app.client();

    let user_id = uuid::Uuid::new_v4();
    let token = mint_token_for(user_id, "editor");

    let (content_type, body) = multipart_file("invoice.pdf", "application/pdf", &minimal_pdf());
    let response = client
        .post(&api_path("/documents/upload"))
        .add_header("Authorization", bearer(&token))
        .add_header("Content-Type", content_type)
        .bytes(body.into())
        .await;

    assert_eq!(response.status_code(), 201);

    let data: serde_json::Value = response.json();
    assert_eq!(data["fileName"], "invoice.pdf");
    assert_eq!(data["mimeType"], "application/pdf");
    assert_eq!(data["status"], "un_ingested");
    assert_eq!(data["ownerId"], user_id.to_string());
    assert!(data["id"].as_str().unwrap().parse::<uuid::Uuid>().is_ok());
}

#[tokio::test]
async fn test_upload_without_file_rejected() {
    let app = setup_test_app().await;
    let client = app.client();

    let token = mint_token("editor");

    let (content_type, body) = multipart_without_file();
    let response = client
        .post(&api_path("/documents/upload"))
        .add_header("Authorization", bearer(&token))
        .add_header("Content-Type", content_type)
        .bytes(body.into())
        .await;

    assert_eq!(response.status_code(), 400);

    let data: serde_json::Value = response.json();
    assert_eq!(data["error"], "No file uploaded");
}

#[tokio::test]
async fn test_upload_forbidden_for_viewer() {
    let app = setup_test_app().await;
    let client = app.client();

    let token = mint_token("viewer");

    let (content_type, body) = multipart_file("invoice.pdf", "application/pdf", &minimal_pdf());
    let response = client
        .post(&api_path("/documents/upload"))
        .add_header("Authorization", bearer(&token))
        .add_header("Content-Type", content_type)
        .bytes(body.into())
        .await;

    assert_eq!(response.status_code(), 403);
}

#[tokio::test]
async fn test_documents_unauthorized() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client.get(&api_path("/documents")).await;

    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_viewer_can_list_documents() {
    let app = setup_test_app().await;
    let client = app.client();

    let editor = mint_token("editor");
    let (content_type, body) = multipart_file("report.pdf", "application/pdf", &minimal_pdf());
    let upload = client
        .post(&api_path("/documents/upload"))
        .add_header("Authorization", bearer(&editor))
        .add_header("Content-Type", content_type)
        .bytes(body.into())
        .await;
    assert_eq!(upload.status_code(), 201);

    let viewer = mint_token("viewer");
    let response = client
        .get(&api_path("/documents"))
        .add_header("Authorization", bearer(&viewer))
        .await;

    assert_eq!(response.status_code(), 200);

    let data: serde_json::Value = response.json();
    let documents = data.as_array().expect("list response is an array");
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0]["fileName"], "report.pdf");
}

#[tokio::test]
async fn test_get_download_url() {
    let app = setup_test_app().await;
    let client = app.client();

    let token = mint_token("editor");
    let (content_type, body) = multipart_file("invoice.pdf", "application/pdf", &minimal_pdf());
    let upload = client
        .post(&api_path("/documents/upload"))
        .add_header("Authorization", bearer(&token))
        .add_header("Content-Type", content_type)
        .bytes(body.into())
        .await;
    let document: serde_json::Value = upload.json();
    let id = document["id"].as_str().unwrap();

    let response = client
        .get(&api_path(&format!("/documents/download/{}", id)))
        .add_header("Authorization", bearer(&token))
        .await;

    assert_eq!(response.status_code(), 200);

    let data: serde_json::Value = response.json();
    assert_eq!(
        data["url"],
        format!("http://localhost:4000/media/documents/{}", id)
    );
}

#[tokio::test]
async fn test_download_url_not_found() {
    let app = setup_test_app().await;
    let client = app.client();

    let token = mint_token("editor");
    let fake_id = uuid::Uuid::new_v4();

    let response = client
        .get(&api_path(&format!("/documents/download/{}", fake_id)))
        .add_header("Authorization", bearer(&token))
        .await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_public_file_serves_uploaded_blob() {
    let app = setup_test_app().await;
    let client = app.client();

    let token = mint_token("editor");
    let pdf = minimal_pdf();
    let (content_type, body) = multipart_file("invoice.pdf", "application/pdf", &pdf);
    let upload = client
        .post(&api_path("/documents/upload"))
        .add_header("Authorization", bearer(&token))
        .add_header("Content-Type", content_type)
        .bytes(body.into())
        .await;
    let document: serde_json::Value = upload.json();
    let id = document["id"].as_str().unwrap();

    // Signed URLs from the local backend resolve here; no auth needed.
    let response = client.get(&format!("/media/documents/{}", id)).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.as_bytes().as_ref(), pdf.as_slice());
}

#[tokio::test]
async fn test_public_file_unknown_key_not_found() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client
        .get(&format!("/media/documents/{}", uuid::Uuid::new_v4()))
        .await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_delete_document() {
    let app = setup_test_app().await;
    let client = app.client();

    let token = mint_token("editor");
    let (content_type, body) = multipart_file("invoice.pdf", "application/pdf", &minimal_pdf());
    let upload = client
        .post(&api_path("/documents/upload"))
        .add_header("Authorization", bearer(&token))
        .add_header("Content-Type", content_type)
        .bytes(body.into())
        .await;
    let document: serde_json::Value = upload.json();
    let id = document["id"].as_str().unwrap().to_string();

    let response = client
        .delete(&api_path(&format!("/documents/{}", id)))
        .add_header("Authorization", bearer(&token))
        .await;

    assert_eq!(response.status_code(), 200);
    let data: serde_json::Value = response.json();
    assert_eq!(data["message"], "Document deleted successfully");

    // Blob and row are both gone.
    let blob = client.get(&format!("/media/documents/{}", id)).await;
    assert_eq!(blob.status_code(), 404);

    let second = client
        .delete(&api_path(&format!("/documents/{}", id)))
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(second.status_code(), 404);
}

#[tokio::test]
async fn test_delete_document_not_found() {
    let app = setup_test_app().await;
    let client = app.client();

    let token = mint_token("editor");
    let fake_id = uuid::Uuid::new_v4();

    let response = client
        .delete(&api_path(&format!("/documents/{}", fake_id)))
        .add_header("Authorization", bearer(&token))
        .await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_delete_forbidden_for_viewer() {
    let app = setup_test_app().await;
    let client = app.client();

    let token = mint_token("viewer");

    let response = client
        .delete(&api_path(&format!("/documents/{}", uuid::Uuid::new_v4())))
        .add_header("Authorization", bearer(&token))
        .await;

    assert_eq!(response.status_code(), 403);
}

#[tokio::test]
async fn test_soft_deleted_document_hidden_from_reads() {
    let app = setup_test_app().await;
    let client = app.client();

    let token = mint_token("editor");
    let (content_type, body) = multipart_file("invoice.pdf", "application/pdf", &minimal_pdf());
    let upload = client
        .post(&api_path("/documents/upload"))
        .add_header("Authorization", bearer(&token))
        .add_header("Content-Type", content_type)
        .bytes(body.into())
        .await;
    let document: serde_json::Value = upload.json();
    let id: uuid::Uuid = document["id"].as_str().unwrap().parse().unwrap();

    sqlx::query("UPDATE documents SET deleted_at = now() WHERE id = $1")
        .bind(id)
        .execute(app.pool())
        .await
        .expect("Failed to tombstone document");

    let list = client
        .get(&api_path("/documents"))
        .add_header("Authorization", bearer(&token))
        .await;
    let data: serde_json::Value = list.json();
    assert_eq!(data.as_array().unwrap().len(), 0);

    let download = client
        .get(&api_path(&format!("/documents/download/{}", id)))
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(download.status_code(), 404);
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let app = setup_test_app().await;
    let client = app.client();

    let now = chrono::Utc::now().timestamp();
    let claims = docstream_api::auth::models::JwtClaims {
        sub: uuid::Uuid::new_v4(),
        role: "editor".to_string(),
        exp: now - 600,
        iat: now - 7200,
        nbf: None,
    };
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(helpers::auth::TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap();

    let response = client
        .get(&api_path("/documents"))
        .add_header("Authorization", bearer(&token))
        .await;

    assert_eq!(response.status_code(), 401);
}
