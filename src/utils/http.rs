use anyhow::Result;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};

/// 分析后端专用 HTTP client。
/// 不设置 client 级超时：提交与查询两步各自带独立的请求级时限。
pub fn build_api_client() -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let client = reqwest::Client::builder()
        .default_headers(headers)
        .gzip(true)
        .build()?;
    Ok(client)
}
