// Filename recovery from the `Content-Disposition` response header. The
// generation service suggests a name for the archive it returns; this module
// digs it out so the saved file matches what the server intended.

use percent_encoding::percent_decode_str;

/// Fallback archive name used when the response carries no usable filename.
pub const DEFAULT_ARCHIVE_NAME: &str = "auto-crud.zip";

/// Recover the download filename from a `Content-Disposition` header value.
///
/// Precedence, in order:
/// 1. the extended parameter `filename*=UTF-8''<percent-encoded-name>`,
///    percent-decoded (the `UTF-8''` tag is matched case-insensitively);
/// 2. the plain parameter `filename="<name>"` or `filename=<name>`,
///    quotes optional, taken literally;
/// 3. [`DEFAULT_ARCHIVE_NAME`].
///
/// A header carrying both forms resolves via the extended one. The function
/// is total: an extended value that does not decode to UTF-8 simply falls
/// through to the next rule.
pub fn filename_from_disposition(header: Option<&str>) -> String {
    let Some(header) = header else {
        return DEFAULT_ARCHIVE_NAME.to_string();
    };
    extended_filename(header)
        .or_else(|| plain_filename(header))
        .unwrap_or_else(|| DEFAULT_ARCHIVE_NAME.to_string())
}

fn extended_filename(header: &str) -> Option<String> {
    let value = param_value(header, "filename*")?;
    // Only the UTF-8 charset tag is supported; a language tag would sit
    // between the quotes and is not produced by the generation service.
    let encoded = strip_prefix_ignore_case(value, "UTF-8''")?;
    let decoded = percent_decode_str(encoded).decode_utf8().ok()?;
    non_empty(decoded.into_owned())
}

fn plain_filename(header: &str) -> Option<String> {
    let value = param_value(header, "filename")?;
    let value = match value.strip_prefix('"') {
        Some(rest) => rest.split('"').next().unwrap_or(rest),
        None => value,
    };
    non_empty(value.to_string())
}

/// Value of the first `;`-separated parameter whose name matches `name`
/// case-insensitively.
fn param_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|part| {
        let (key, value) = part.split_once('=')?;
        key.trim().eq_ignore_ascii_case(name).then(|| value.trim())
    })
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &value[prefix.len()..])
}

fn non_empty(name: String) -> Option<String> {
    (!name.is_empty()).then_some(name)
}
