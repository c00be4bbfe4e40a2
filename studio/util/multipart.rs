/// One part of a `multipart/form-data` body.
#[derive(Debug, PartialEq, Eq)]
pub struct Part<'a> {
    pub name: Option<String>,
    pub filename: Option<String>,
    pub data: &'a [u8],
}

impl Part<'_> {
    pub fn is_file(&self) -> bool {
        self.filename.is_some()
    }
}

/// Returns the index of the first occurrence of `needle` in `haystack`.
pub fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Extracts the boundary token from a Content-Type header value like
/// `multipart/form-data; boundary=----WebKitFormBoundaryXXX`.
pub fn extract_boundary(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .map(str::trim)
        .find_map(|s| s.strip_prefix("boundary="))
        .map(|b| b.trim_matches('"').to_owned())
        .filter(|b| !b.is_empty())
}

/// Splits a multipart body into its parts. The preamble, the closing `--`
/// marker and parts without a header block are skipped.
pub fn parse_parts<'a>(body: &'a [u8], boundary: &str) -> Vec<Part<'a>> {
    let delimiter = format!("--{}", boundary);
    let delim = delimiter.as_bytes();
    let mut parts = Vec::new();

    let mut rest = match find_subsequence(body, delim) {
        Some(pos) => &body[pos + delim.len()..],
        None      => return parts,
    };

    while let Some(end) = find_subsequence(rest, delim) {
        let chunk = &rest[..end];
        rest = &rest[end + delim.len()..];

        let chunk = chunk.strip_prefix(b"\r\n").unwrap_or(chunk);
        let Some(sep) = find_subsequence(chunk, b"\r\n\r\n") else { continue };

        let headers = String::from_utf8_lossy(&chunk[..sep]);
        let data = &chunk[sep + 4..];
        let data = data.strip_suffix(b"\r\n").unwrap_or(data);

        parts.push(Part {
            name: disposition_param(&headers, "name"),
            filename: disposition_param(&headers, "filename"),
            data,
        });
    }
    parts
}

/// Bytes of the file field `field_name`, or of the first file part when no
/// part carries that name.
pub fn file_field<'a>(parts: &[Part<'a>], field_name: &str) -> Option<&'a [u8]> {
    parts.iter()
        .find(|p| p.is_file() && p.name.as_deref() == Some(field_name))
        .or_else(|| parts.iter().find(|p| p.is_file()))
        .map(|p| p.data)
}

/// Reads `key="value"` from a Content-Disposition header block.
fn disposition_param(headers: &str, key: &str) -> Option<String> {
    let line = headers
        .lines()
        .find(|l| l.to_ascii_lowercase().starts_with("content-disposition:"))?;
    line.split(';')
        .map(str::trim)
        .find_map(|param| {
            let (k, v) = param.split_once('=')?;
            (k.trim() == key).then(|| v.trim().trim_matches('"').to_owned())
        })
}
