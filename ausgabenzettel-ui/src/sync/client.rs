//! HTTP Client
//!
//! Requests against the sync server, which serves the page itself on `/`.

use gloo_net::http::{Method, RequestBuilder, Response};

/// Path of the synced page
pub const DOCUMENT_PATH: &str = "/";

/// Outcome of an upload
#[derive(Debug)]
pub struct Upload {
    pub status: u16,
    pub etag: Option<String>,
}

impl Upload {
    /// Whether the server accepted the page
    pub fn accepted(&self) -> bool {
        self.status == 200
    }
}

fn etag(response: &Response) -> Option<String> {
    response.headers().get("etag")
}

/// Etag of the page currently on the server
pub async fn fetch_etag() -> Result<Option<String>, String> {
    let response = RequestBuilder::new(DOCUMENT_PATH)
        .method(Method::HEAD)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if response.status() != 200 {
        return Err(format!("Unexpected status: {}", response.status()));
    }

    Ok(etag(&response))
}

/// Replace the page on the server, guarded by the etag it was loaded with
pub async fn upload_page(html: String, if_match: Option<String>) -> Result<Upload, String> {
    let mut request = RequestBuilder::new(DOCUMENT_PATH)
        .method(Method::PUT)
        .header("Content-Type", "text/html");
    if let Some(if_match) = if_match.as_deref() {
        request = request.header("if-match", if_match);
    }

    let response = request
        .body(html)
        .map_err(|e| format!("Request error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    Ok(Upload {
        status: response.status(),
        etag: etag(&response),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_accepted_only_on_ok() {
        let upload = |status| Upload { status, etag: None };
        assert!(upload(200).accepted());
        assert!(!upload(406).accepted());
        assert!(!upload(500).accepted());
    }
}
