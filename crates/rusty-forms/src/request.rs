// File: src/request.rs
// Purpose: Host-framework request adapter (content type + body)

use crate::errors::FormError;
use crate::form_data::FormData;
use crate::multipart;
use axum::async_trait;
use axum::body::{Body, Bytes};
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};

#[derive(Debug, Clone)]
enum Payload {
    Raw(Vec<u8>),
    Multipart(FormData),
}

/// A submitted form body together with its declared content type.
///
/// Multipart bodies are decoded while the request is read, so only the
/// async constructors (`read` and the axum extractor) yield parseable
/// multipart requests.
#[derive(Debug, Clone)]
pub struct FormRequest {
    content_type: Option<String>,
    payload: Payload,
}

impl Default for FormRequest {
    fn default() -> Self {
        Self {
            content_type: None,
            payload: Payload::Raw(Vec::new()),
        }
    }
}

impl FormRequest {
    pub fn new(content_type: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type: Some(content_type.into()),
            payload: Payload::Raw(body.into()),
        }
    }

    /// Build from request headers and an already-read body
    pub fn from_parts(headers: &HeaderMap, body: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type: content_type_of(headers),
            payload: Payload::Raw(body.into()),
        }
    }

    /// Read a raw body under `content_type`, decoding multipart parts
    pub async fn read(
        content_type: impl Into<String>,
        body: impl Into<Body>,
    ) -> Result<Self, FormError> {
        let req = axum::http::Request::builder()
            .header(CONTENT_TYPE, content_type.into())
            .body(body.into())
            .map_err(|e| FormError::Malformed(e.to_string()))?;

        Self::read_request(req, &()).await
    }

    async fn read_request<S>(req: Request, state: &S) -> Result<Self, FormError>
    where
        S: Send + Sync,
    {
        let content_type = content_type_of(req.headers());

        if content_type.as_deref().map(rusty_forms_validation::essence).as_deref()
            == Some("multipart/form-data")
        {
            let parts = Multipart::from_request(req, state)
                .await
                .map_err(|e| FormError::Malformed(e.body_text()))?;
            let data = multipart::decode(parts).await?;

            return Ok(Self {
                content_type,
                payload: Payload::Multipart(data),
            });
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| FormError::Malformed(e.body_text()))?;

        Ok(Self {
            content_type,
            payload: Payload::Raw(body.to_vec()),
        })
    }

    /// Full content type header, parameters included
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Content type without parameters, lowercased
    pub fn media_type(&self) -> Option<String> {
        self.content_type
            .as_deref()
            .map(rusty_forms_validation::essence)
    }

    /// Undecoded body bytes; empty once multipart parts have been decoded
    pub fn body(&self) -> &[u8] {
        match &self.payload {
            Payload::Raw(body) => body,
            Payload::Multipart(_) => &[],
        }
    }

    pub(crate) fn multipart_data(&self) -> Option<&FormData> {
        match &self.payload {
            Payload::Multipart(data) => Some(data),
            Payload::Raw(_) => None,
        }
    }

    pub(crate) fn into_multipart_data(self) -> Result<FormData, Self> {
        match self.payload {
            Payload::Multipart(data) => Ok(data),
            payload => Err(Self { payload, ..self }),
        }
    }
}

fn content_type_of(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

#[async_trait]
impl<S> FromRequest<S> for FormRequest
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Self::read_request(req, state)
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form_data::FormValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_media_type_strips_parameters() {
        let request = FormRequest::new("Multipart/Form-Data; boundary=AaB03x", Vec::new());

        assert_eq!(request.media_type().as_deref(), Some("multipart/form-data"));
        assert_eq!(
            request.content_type(),
            Some("Multipart/Form-Data; boundary=AaB03x")
        );
    }

    #[test]
    fn test_from_parts_without_content_type() {
        let request = FormRequest::from_parts(&HeaderMap::new(), b"a=1".to_vec());

        assert_eq!(request.media_type(), None);
        assert_eq!(request.body(), b"a=1");
    }

    #[tokio::test]
    async fn test_extracts_from_axum_request() {
        let req = axum::http::Request::builder()
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("title=Hello"))
            .unwrap();

        let form = FormRequest::from_request(req, &()).await.unwrap();

        assert_eq!(
            form.media_type().as_deref(),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(form.body(), b"title=Hello");
    }

    #[tokio::test]
    async fn test_read_decodes_multipart() {
        let body = "--AaB03x\r\n\
                    Content-Disposition: form-data; name=\"title\"\r\n\
                    \r\n\
                    Hello\r\n\
                    --AaB03x--\r\n";
        let request = FormRequest::read("multipart/form-data; boundary=AaB03x", body)
            .await
            .unwrap();

        assert!(request.body().is_empty());
        assert_eq!(
            request.multipart_data().and_then(|data| data.get("title")),
            Some(&[FormValue::Text("Hello".into())][..])
        );
    }

    #[tokio::test]
    async fn test_multipart_without_boundary_is_rejected() {
        let req = axum::http::Request::builder()
            .header(CONTENT_TYPE, "multipart/form-data")
            .body(Body::from("--x\r\n\r\nvalue"))
            .unwrap();

        let (status, _) = FormRequest::from_request(req, &()).await.unwrap_err();

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
