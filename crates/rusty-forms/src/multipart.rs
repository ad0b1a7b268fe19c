// File: src/multipart.rs
// Purpose: multipart/form-data decoding into FormData

use crate::errors::FormError;
use crate::form_data::FormData;
use crate::value::UploadedFile;
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use rusty_forms_validation::OCTET_STREAM;
use tracing::{debug, trace};

/// Read every part of a multipart body.
///
/// File parts submitted without a filename (an empty file input) are dropped,
/// but their key is still recorded with no values.
pub async fn decode(mut multipart: Multipart) -> Result<FormData, FormError> {
    let mut data = FormData::new();

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field
            .name()
            .map(str::to_string)
            .ok_or_else(|| FormError::Malformed("part without a name".to_string()))?;

        match field.file_name().map(str::to_string) {
            Some(filename) if filename.is_empty() => {
                debug!(key = %name, "dropping file part without filename");
                data.touch(name);
            }
            Some(filename) => {
                let content_type = field.content_type().unwrap_or(OCTET_STREAM).to_string();
                let bytes = field.bytes().await.map_err(malformed)?;
                trace!(key = %name, %filename, size = bytes.len(), "file part");
                data.append(name, UploadedFile::new(filename, content_type, bytes.to_vec()));
            }
            None => {
                let text = field.text().await.map_err(malformed)?;
                data.append(name, text);
            }
        }
    }

    Ok(data)
}

fn malformed(err: MultipartError) -> FormError {
    FormError::Malformed(err.body_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form_data::FormValue;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::header::CONTENT_TYPE;
    use pretty_assertions::assert_eq;

    const MULTIPART_TYPE: &str = "multipart/form-data; boundary=AaB03x";

    async fn decode_lines(lines: &[&str]) -> Result<FormData, FormError> {
        let req = axum::http::Request::builder()
            .header(CONTENT_TYPE, MULTIPART_TYPE)
            .body(Body::from(lines.join("\r\n")))
            .unwrap();
        let multipart = Multipart::from_request(req, &()).await.unwrap();
        decode(multipart).await
    }

    #[tokio::test]
    async fn test_text_and_file_parts() {
        let data = decode_lines(&[
            "--AaB03x",
            r#"content-disposition: form-data; name="a""#,
            "",
            "1",
            "--AaB03x",
            r#"content-disposition: form-data; name="b"; filename="file1.txt""#,
            "content-type: text/plain",
            "",
            "2",
            "--AaB03x",
            r#"content-disposition: form-data; name="b"; filename="file2.txt""#,
            "content-type: text/plain",
            "",
            "3",
            "--AaB03x--",
            "",
        ])
        .await
        .unwrap();

        assert_eq!(data.get("a").unwrap(), &[FormValue::Text("1".into())]);

        let files = data.get("b").unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(
            files[0],
            FormValue::File(UploadedFile::new("file1.txt", "text/plain", b"2".to_vec()))
        );
        assert_eq!(
            files[1],
            FormValue::File(UploadedFile::new("file2.txt", "text/plain", b"3".to_vec()))
        );
    }

    #[tokio::test]
    async fn test_blank_file_part_keeps_key_without_values() {
        let data = decode_lines(&[
            "--AaB03x",
            r#"Content-Disposition: form-data; name="a"; filename="""#,
            "Content-Type: application/octet-stream",
            "",
            "",
            "--AaB03x--",
            "",
        ])
        .await
        .unwrap();

        assert!(data.contains_key("a"));
        assert!(data.get("a").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_without_content_type_is_octet_stream() {
        let data = decode_lines(&[
            "--AaB03x",
            r#"Content-Disposition: form-data; name="doc"; filename="notes.txt""#,
            "",
            "# Notes",
            "--AaB03x--",
        ])
        .await
        .unwrap();

        match &data.get("doc").unwrap()[0] {
            FormValue::File(file) => {
                assert_eq!(file.content_type, OCTET_STREAM);
                assert_eq!(file.data, b"# Notes".to_vec());
            }
            other => panic!("expected file, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_quoted_filename_keeps_semicolons() {
        let data = decode_lines(&[
            "--AaB03x",
            r#"Content-Disposition: form-data; name="doc"; filename="notes;v2.txt""#,
            "Content-Type: text/plain",
            "",
            "v2",
            "--AaB03x--",
        ])
        .await
        .unwrap();

        match &data.get("doc").unwrap()[0] {
            FormValue::File(file) => assert_eq!(file.original_filename, "notes;v2.txt"),
            other => panic!("expected file, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_truncated_body_is_malformed() {
        let err = decode_lines(&[
            "--AaB03x",
            r#"Content-Disposition: form-data; name="a""#,
            "",
            "no end",
        ])
        .await
        .unwrap_err();

        assert!(matches!(err, FormError::Malformed(_)));
    }
}
