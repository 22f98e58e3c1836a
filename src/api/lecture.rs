/// 講義サーバーのアップロードAPI
///
/// `LectureBackend` のHTTP実装。チャンク受付と講義作成をmultipartで送る。
use crate::api::client::ApiClient;
use crate::api::types::{ChunkResponse, FinalizeResponse};
use crate::config::APP_CONFIG;
use crate::domain::ports::{
    ChunkAck, ChunkUpload, FinalizeRequest, LectureBackend, LectureCreated, TransportFailure,
};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

const CHUNK_FALLBACK: &str = "Upload failed";
const FINALIZE_FALLBACK: &str = "Failed to create lecture";

pub struct HttpLectureBackend {
    client: ApiClient,
}

impl HttpLectureBackend {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn chunk_form(chunk: ChunkUpload) -> Form {
        Form::new()
            .part(
                "chunk",
                Part::bytes(chunk.data).file_name(chunk.filename.clone()),
            )
            .text("upload_id", chunk.upload_id)
            .text("chunk_number", chunk.chunk_number.to_string())
            .text("total_chunks", chunk.total_chunks.to_string())
            .text("filename", chunk.filename)
    }

    fn finalize_form(request: FinalizeRequest) -> Result<Form, TransportFailure> {
        let form = request.form;
        let mut multipart = Form::new()
            .text("title", form.title)
            .text("description", form.description)
            .text("course_id", form.course_id)
            .text("is_published", form.is_published.to_string())
            .text("video_filename", request.video_filename);

        if let Some(thumbnail) = form.thumbnail {
            let part = Part::bytes(thumbnail.data)
                .file_name(thumbnail.file_name)
                .mime_str(&thumbnail.mime_type)
                .map_err(|e| TransportFailure::new(format!("Invalid thumbnail type: {}", e), None))?;
            multipart = multipart.part("thumbnail", part);
        }

        Ok(multipart)
    }
}

#[async_trait]
impl LectureBackend for HttpLectureBackend {
    async fn upload_chunk(&self, chunk: ChunkUpload) -> Result<ChunkAck, TransportFailure> {
        let endpoint = APP_CONFIG.api.chunk_endpoint;
        let csrf_token = chunk.csrf_token.clone();

        let response = self
            .client
            .post_multipart(endpoint, Self::chunk_form(chunk), &csrf_token)
            .await
            .map_err(|e| e.into_failure(CHUNK_FALLBACK))?;
        let response = ApiClient::check_response(response, endpoint)
            .await
            .map_err(|e| e.into_failure(CHUNK_FALLBACK))?;
        let body: ChunkResponse = ApiClient::parse_json(response, endpoint)
            .await
            .map_err(|e| e.into_failure(CHUNK_FALLBACK))?;

        Ok(body.into())
    }

    async fn create_lecture(
        &self,
        request: FinalizeRequest,
    ) -> Result<LectureCreated, TransportFailure> {
        let endpoint = APP_CONFIG.api.finalize_endpoint;
        let csrf_token = request.csrf_token.clone();
        let form = Self::finalize_form(request)?;

        let response = self
            .client
            .post_multipart(endpoint, form, &csrf_token)
            .await
            .map_err(|e| e.into_failure(FINALIZE_FALLBACK))?;
        let response = ApiClient::check_response(response, endpoint)
            .await
            .map_err(|e| e.into_failure(FINALIZE_FALLBACK))?;
        let body: FinalizeResponse = ApiClient::parse_json(response, endpoint)
            .await
            .map_err(|e| e.into_failure(FINALIZE_FALLBACK))?;

        Ok(body.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{LectureForm, Thumbnail};
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use serde_json::json;

    fn backend(server: &MockServer) -> HttpLectureBackend {
        HttpLectureBackend::new(ApiClient::new(server.base_url(), None).unwrap())
    }

    fn chunk(number: u64) -> ChunkUpload {
        ChunkUpload {
            upload_id: "upload_0f3a".to_string(),
            chunk_number: number,
            total_chunks: 3,
            filename: "week1.mp4".to_string(),
            data: b"CHUNKDATA".to_vec(),
            csrf_token: "csrf-xyz".to_string(),
        }
    }

    fn finalize_request(thumbnail: Option<Thumbnail>) -> FinalizeRequest {
        FinalizeRequest {
            form: LectureForm {
                title: "Week 1".to_string(),
                description: "Limits and continuity".to_string(),
                course_id: "42".to_string(),
                is_published: false,
                thumbnail,
            },
            video_filename: "assembled_week1.mp4".to_string(),
            csrf_token: "csrf-xyz".to_string(),
        }
    }

    #[tokio::test]
    async fn test_upload_chunk_sends_multipart_fields() {
        if !crate::api::can_bind_localhost() {
            eprintln!("Skipping httpmock test: cannot bind to localhost");
            return;
        }

        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/instructor/lectures/upload_progress")
                    .header("X-CSRFToken", "csrf-xyz")
                    .body_contains("name=\"upload_id\"")
                    .body_contains("upload_0f3a")
                    .body_contains("name=\"chunk_number\"")
                    .body_contains("name=\"total_chunks\"")
                    .body_contains("name=\"filename\"")
                    .body_contains("name=\"chunk\"")
                    .body_contains("CHUNKDATA");
                then.status(200)
                    .json_body(json!({ "status": "progress", "progress": 33.3 }));
            })
            .await;

        let ack = backend(&server).upload_chunk(chunk(0)).await.unwrap();

        assert_eq!(
            ack,
            ChunkAck::Progress {
                percentage: 33.3,
                message: None
            }
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_chunk_complete() {
        if !crate::api::can_bind_localhost() {
            eprintln!("Skipping httpmock test: cannot bind to localhost");
            return;
        }

        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/instructor/lectures/upload_progress");
                then.status(200)
                    .json_body(json!({ "status": "complete", "filename": "1700000000_week1.mp4" }));
            })
            .await;

        let ack = backend(&server).upload_chunk(chunk(2)).await.unwrap();

        assert_eq!(
            ack,
            ChunkAck::Complete {
                filename: "1700000000_week1.mp4".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_upload_chunk_server_error_surfaces_body() {
        if !crate::api::can_bind_localhost() {
            eprintln!("Skipping httpmock test: cannot bind to localhost");
            return;
        }

        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/instructor/lectures/upload_progress");
                then.status(500).body("Internal Server Error");
            })
            .await;

        let failure = backend(&server).upload_chunk(chunk(1)).await.unwrap_err();

        assert_eq!(failure.message, "Internal Server Error");
        assert_eq!(failure.status_code, Some(500));
        assert_eq!(mock.hits_async().await, 1);
    }

    #[tokio::test]
    async fn test_upload_chunk_prefers_error_field() {
        if !crate::api::can_bind_localhost() {
            eprintln!("Skipping httpmock test: cannot bind to localhost");
            return;
        }

        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/instructor/lectures/upload_progress");
                then.status(400).json_body(json!({ "error": "Missing upload_id" }));
            })
            .await;

        let failure = backend(&server).upload_chunk(chunk(0)).await.unwrap_err();
        assert_eq!(failure.message, "Missing upload_id");
        assert_eq!(failure.status_code, Some(400));
    }

    #[tokio::test]
    async fn test_create_lecture_success() {
        if !crate::api::can_bind_localhost() {
            eprintln!("Skipping httpmock test: cannot bind to localhost");
            return;
        }

        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/instructor/lectures/create_with_upload")
                    .header("X-CSRFToken", "csrf-xyz")
                    .body_contains("name=\"title\"")
                    .body_contains("Week 1")
                    .body_contains("name=\"course_id\"")
                    .body_contains("name=\"is_published\"")
                    .body_contains("false")
                    .body_contains("assembled_week1.mp4")
                    .body_contains("name=\"thumbnail\"")
                    .body_contains("PNGDATA");
                then.status(200).json_body(json!({
                    "message": "Lecture uploaded successfully!",
                    "redirect_url": "/instructor/courses/42"
                }));
            })
            .await;

        let thumbnail = Thumbnail {
            file_name: "cover.png".to_string(),
            mime_type: "image/png".to_string(),
            data: b"PNGDATA".to_vec(),
        };
        let created = backend(&server)
            .create_lecture(finalize_request(Some(thumbnail)))
            .await
            .unwrap();

        assert_eq!(created.message, "Lecture uploaded successfully!");
        assert_eq!(created.redirect_url, "/instructor/courses/42");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_lecture_error_field_and_fallback() {
        if !crate::api::can_bind_localhost() {
            eprintln!("Skipping httpmock test: cannot bind to localhost");
            return;
        }

        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/instructor/lectures/create_with_upload")
                    .body_contains("Week 1");
                then.status(422).json_body(json!({ "error": "Title already used" }));
            })
            .await;

        let failure = backend(&server)
            .create_lecture(finalize_request(None))
            .await
            .unwrap_err();
        assert_eq!(failure.message, "Title already used");
        assert_eq!(failure.status_code, Some(422));
    }

    #[tokio::test]
    async fn test_create_lecture_empty_error_uses_fallback() {
        if !crate::api::can_bind_localhost() {
            eprintln!("Skipping httpmock test: cannot bind to localhost");
            return;
        }

        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/instructor/lectures/create_with_upload");
                then.status(500);
            })
            .await;

        let failure = backend(&server)
            .create_lecture(finalize_request(None))
            .await
            .unwrap_err();
        assert_eq!(failure.message, "Failed to create lecture");
    }

    #[test]
    fn test_invalid_thumbnail_mime_is_rejected() {
        let thumbnail = Thumbnail {
            file_name: "cover".to_string(),
            mime_type: "not a mime".to_string(),
            data: Vec::new(),
        };
        let err = HttpLectureBackend::finalize_form(finalize_request(Some(thumbnail))).unwrap_err();
        assert!(err.message.contains("thumbnail"));
    }
}
