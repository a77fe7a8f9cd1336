// Image source client: asks the cat image service for a captioned picture
// and derives the filename it will be stored under.

use crate::transport::{ApiRequest, Method, Transport};
use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{error, info};

/// Generated image location and the name it will get on the disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResult {
    pub url: String,
    pub filename: String,
}

#[derive(Deserialize, Debug)]
struct ImageResponse {
    url: String,
    #[serde(alias = "_id")]
    id: String,
}

pub struct ImageClient<T> {
    transport: T,
    base_url: String,
}

impl<T: Transport> ImageClient<T> {
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        ImageClient {
            transport,
            base_url: base_url.into(),
        }
    }

    /// Fetch a captioned image. The caption goes into the path as-is;
    /// characters that are not URL-safe may produce a bad request.
    pub fn fetch(&self, caption: &str) -> Result<ImageResult> {
        let url = format!("{}/cat/says/{}", self.base_url, caption);
        info!("Requesting image with caption '{}'...", caption);
        let req = ApiRequest::new(Method::Get, url).query("json", "true");
        let res = self
            .transport
            .execute(&req)
            .context("Failed to send image request")?;
        if !res.status.is_success() {
            error!("Image request failed: {}", res.status.as_u16());
            anyhow::bail!("Image request failed: {}", res.status.as_u16());
        }
        let data: ImageResponse = res.json().context("Parsing image response")?;
        if data.id.trim().is_empty() {
            error!("Image response has an empty id");
            anyhow::bail!("Image response has an empty id");
        }
        let filename = format!("{}_{}.jpg", caption, data.id);
        info!("Image received, URL: {}", data.url);
        Ok(ImageResult {
            url: data.url,
            filename,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{ApiResponse, MockTransport};
    use reqwest::StatusCode;

    #[test]
    fn builds_filename_from_caption_and_id() {
        let mut mock = MockTransport::new();
        mock.expect_execute()
            .withf(|r| {
                r.method == Method::Get
                    && r.url == "http://cats/cat/says/hello"
                    && r.query_value("json") == Some("true")
                    && r.authorization.is_none()
            })
            .times(1)
            .returning(|_| {
                Ok(ApiResponse::new(
                    StatusCode::OK,
                    r#"{"url":"http://x/img.jpg","id":"42"}"#,
                ))
            });

        let client = ImageClient::new(&mock, "http://cats");
        let image = client.fetch("hello").unwrap();
        assert_eq!(image.url, "http://x/img.jpg");
        assert_eq!(image.filename, "hello_42.jpg");
    }

    #[test]
    fn accepts_underscore_id() {
        let mut mock = MockTransport::new();
        mock.expect_execute().returning(|_| {
            Ok(ApiResponse::new(
                StatusCode::OK,
                r#"{"url":"http://x/a.jpg","_id":"abc","tags":[]}"#,
            ))
        });
        let image = ImageClient::new(&mock, "http://cats").fetch("meow-meow").unwrap();
        assert_eq!(image.filename, "meow-meow_abc.jpg");
    }

    #[test]
    fn non_success_status_fails_with_code() {
        let mut mock = MockTransport::new();
        mock.expect_execute()
            .times(1)
            .returning(|_| Ok(ApiResponse::new(StatusCode::INTERNAL_SERVER_ERROR, "boom")));
        let err = ImageClient::new(&mock, "http://cats").fetch("hello").unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn filename_holds_caption_and_id_for_url_safe_captions() {
        let captions = ["hello", "a", "Meow-42", "under_score", "dots.and~tilde", "abcdefghijklmnopqrstuvwxyz0123456789"];
        for caption in captions {
            let mut mock = MockTransport::new();
            mock.expect_execute().times(1).returning(|_| {
                Ok(ApiResponse::new(
                    StatusCode::OK,
                    r#"{"url":"http://x/img.jpg","id":"7f3a"}"#,
                ))
            });
            let image = ImageClient::new(&mock, "http://cats").fetch(caption).unwrap();
            assert_eq!(image.filename, format!("{}_7f3a.jpg", caption));
            assert!(image.filename.starts_with(caption));
        }
    }

    #[test]
    fn empty_id_is_rejected() {
        let mut mock = MockTransport::new();
        mock.expect_execute().returning(|_| {
            Ok(ApiResponse::new(StatusCode::OK, r#"{"url":"http://x/img.jpg","id":""}"#))
        });
        let err = ImageClient::new(&mock, "http://cats").fetch("hello").unwrap_err();
        assert!(err.to_string().contains("empty id"));
    }

    #[test]
    fn missing_url_field_is_an_error() {
        let mut mock = MockTransport::new();
        mock.expect_execute()
            .returning(|_| Ok(ApiResponse::new(StatusCode::OK, r#"{"id":"42"}"#)));
        assert!(ImageClient::new(&mock, "http://cats").fetch("hello").is_err());
    }
}
