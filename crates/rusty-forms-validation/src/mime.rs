//! Content types for uploaded files
//!
//! Uploads are checked twice: against the content type the client declared and
//! against the types inferred from the filename extension.

/// The generic type browsers fall back to when they don't know better
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Lowercases and strips parameters (`text/plain; charset=utf-8` -> `text/plain`).
pub fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Types registered for the filename's extension, most specific first.
pub fn types_for_filename(filename: &str) -> Vec<String> {
    mime_guess::from_path(filename)
        .iter()
        .map(|mime| mime.essence_str().to_string())
        .collect()
}

/// True when `pattern` (exact or `type/*`) admits `mime`.
pub fn mime_matches(pattern: &str, mime: &str) -> bool {
    if let Some(prefix) = pattern.strip_suffix('*') {
        prefix.ends_with('/') && mime.starts_with(prefix)
    } else {
        pattern == mime
    }
}

/// Splits a comma-separated accept list into normalized type patterns.
pub fn parse_accept(accept: &str) -> Vec<String> {
    accept
        .split(',')
        .map(essence)
        .filter(|pattern| !pattern.is_empty())
        .collect()
}

/// Decides whether an upload is one of the accepted types.
///
/// The declared type must be among the types inferred from the filename and be
/// accepted itself. A declared `application/octet-stream` defers entirely to the
/// filename: any inferred type that is accepted will do.
pub fn is_acceptable(declared: &str, filename: &str, accept: &[String]) -> bool {
    let declared = essence(declared);
    let inferred = types_for_filename(filename);
    let accepted = |mime: &str| accept.iter().any(|pattern| mime_matches(pattern, mime));

    if declared == OCTET_STREAM {
        return inferred.iter().any(|mime| accepted(mime.as_str()));
    }

    inferred.contains(&declared) && accepted(declared.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn accept(list: &str) -> Vec<String> {
        parse_accept(list)
    }

    #[test]
    fn test_types_for_filename() {
        assert_eq!(types_for_filename("file.txt"), &["text/plain"]);
        assert_eq!(types_for_filename("REPORT.PDF"), &["application/pdf"]);
        assert!(types_for_filename("README").is_empty());
        assert!(types_for_filename("archive.unknownext").is_empty());
    }

    #[test]
    fn test_parse_accept_normalizes() {
        assert_eq!(
            accept(" text/plain , TEXT/RTF,,image/*"),
            vec!["text/plain", "text/rtf", "image/*"]
        );
    }

    #[rstest]
    #[case("text/invalid", "file.txt", "text/plain,application/pdf", false)]
    #[case("application/pdf", "file.pdf", "text/plain,application/pdf", true)]
    #[case("application/pdf", "file.pdf", "image/png", false)]
    #[case("text/html", "file.txt", "text/plain,application/pdf", false)]
    #[case("application/octet-stream", "file.txt", "text/plain", true)]
    #[case("application/octet-stream", "file.txt", "image/png", false)]
    #[case("application/octet-stream", "README", "text/plain", false)]
    #[case("image/png", "photo.png", "image/*", true)]
    #[case("image/png; charset=binary", "photo.PNG", "image/png", true)]
    fn test_is_acceptable(
        #[case] declared: &str,
        #[case] filename: &str,
        #[case] list: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(is_acceptable(declared, filename, &accept(list)), expected);
    }

    #[test]
    fn test_types_beyond_common_documents() {
        let accept = accept("video/quicktime,image/heic");

        assert!(is_acceptable("video/quicktime", "movie.mov", &accept));
        assert!(is_acceptable("image/heic", "photo.heic", &accept));
        assert!(!is_acceptable("video/quicktime", "movie.mp4", &accept));
    }

    #[test]
    fn test_wildcard_requires_full_type_prefix() {
        assert!(mime_matches("image/*", "image/gif"));
        assert!(!mime_matches("image/*", "imagery/gif"));
        assert!(!mime_matches("*", "image/gif"));
    }
}
