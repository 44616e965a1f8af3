//! Shared helpers for transfer operations.

use url::form_urlencoded;

/// Make sure a directory path ends with `/`.
pub(crate) fn normalize_dir(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{}/", path)
    }
}

/// Drop one leading `/` so the path can follow a shard URL.
pub(crate) fn strip_leading_slash(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// Last path component, for progress reports.
pub(crate) fn file_name_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Form-style encoding (`/` as `%2F`, space as `+`) used in `Referer` paths.
pub(crate) fn url_encode(input: &str) -> String {
    form_urlencoded::byte_serialize(input.as_bytes()).collect()
}

/// Form-style decoding, the inverse of [`url_encode`].
pub(crate) fn url_decode(input: &str) -> String {
    // `&` would split the pair; `%26` decodes back to it.
    let pair = format!("v={}", input.replace('&', "%26"));
    form_urlencoded::parse(pair.as_bytes())
        .next()
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}
