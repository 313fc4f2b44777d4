//! law.go.kr DRF API source: monthly effective-law search and content fetch.

use std::time::Duration;

use async_trait::async_trait;
use lawdigest_core::ProcessingPeriod;
use serde_json::Value;
use tracing::{debug, info};

use crate::source::{LawListing, LawSource, SourceError};

pub const DEFAULT_BASE_URL: &str = "https://www.law.go.kr";

/// Rows per search page.
pub const PAGE_SIZE: usize = 100;

/// Per-request timeout for search and content calls.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP source for the national law information center's open API.
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    request_delay: Duration,
}

impl HttpSource {
    /// `base_url` should be like `https://www.law.go.kr` (no trailing slash).
    pub fn new(base_url: String, api_key: String) -> Result<Self, SourceError> {
        Self::with_timeout(base_url, api_key, REQUEST_TIMEOUT)
    }

    /// Like [`HttpSource::new`] with a custom per-request timeout.
    pub fn with_timeout(
        base_url: String,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            request_delay: Duration::from_millis(100),
        })
    }

    /// Pause between consecutive search pages.
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    fn search_url(&self) -> String {
        format!("{}/DRF/lawSearch.do", self.base_url)
    }

    /// Absolute JSON URL for a listing's detail link.
    pub fn content_url(&self, detail_link: &str) -> String {
        let url = if detail_link.starts_with('/') {
            format!("{}{}", self.base_url, detail_link)
        } else {
            detail_link.to_string()
        };
        url.replace("type=HTML", "type=JSON")
    }

    async fn get_json(&self, request: reqwest::RequestBuilder) -> Result<Value, SourceError> {
        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.json().await?)
    }

    async fn search_page(
        &self,
        period: ProcessingPeriod,
        page: usize,
        display: usize,
    ) -> Result<Value, SourceError> {
        let (first, last) = period.date_range();
        let ef_yd = format!("{first}~{last}");
        let page = page.to_string();
        let display = display.to_string();
        let request = self.client.get(self.search_url()).query(&[
            ("OC", self.api_key.as_str()),
            ("target", "eflaw"),
            ("type", "JSON"),
            ("efYd", ef_yd.as_str()),
            ("page", page.as_str()),
            ("display", display.as_str()),
        ]);
        self.get_json(request).await
    }
}

/// `LawSearch.totalCnt`, which the API returns as a string or a number.
pub fn total_count(page: &Value) -> Result<usize, SourceError> {
    let raw = page
        .get("LawSearch")
        .and_then(|s| s.get("totalCnt"))
        .ok_or_else(|| SourceError::Shape("missing LawSearch.totalCnt".into()))?;
    let count = match raw {
        Value::Number(n) => n.as_u64().map(|n| n as usize),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    count.ok_or_else(|| SourceError::Shape(format!("bad totalCnt: {raw}")))
}

/// Rows of `LawSearch.law`; a single row may arrive as a bare object.
pub fn page_listings(page: &Value) -> Vec<LawListing> {
    match page.get("LawSearch").and_then(|s| s.get("law")) {
        Some(Value::Array(rows)) => rows.iter().map(LawListing::from_value).collect(),
        Some(row @ Value::Object(_)) => vec![LawListing::from_value(row)],
        _ => Vec::new(),
    }
}

/// Pages needed for `total` rows. Always requests one page past an exact
/// multiple, which the API answers with an empty page.
pub fn page_count(total: usize) -> usize {
    total / PAGE_SIZE + 1
}

#[async_trait]
impl LawSource for HttpSource {
    async fn list(&self, period: ProcessingPeriod) -> Result<Vec<LawListing>, SourceError> {
        let probe = self.search_page(period, 1, 1).await?;
        let total = total_count(&probe)?;
        let pages = page_count(total);
        info!(%period, total, pages, "collecting law listings");

        let mut listings = Vec::new();
        for page in 1..=pages {
            let body = self.search_page(period, page, PAGE_SIZE).await?;
            let rows = page_listings(&body);
            debug!(page, rows = rows.len(), "fetched listing page");
            listings.extend(rows);
            if page < pages {
                tokio::time::sleep(self.request_delay).await;
            }
        }
        info!(%period, count = listings.len(), "collected law listings");
        Ok(listings)
    }

    async fn fetch_content(&self, listing: &LawListing) -> Result<Value, SourceError> {
        let link = listing
            .detail_link
            .as_deref()
            .ok_or_else(|| SourceError::IncompleteListing(listing.label().to_string()))?;
        let url = self.content_url(link);
        debug!(url = %url, law = listing.label(), "fetching law content");
        self.get_json(self.client.get(&url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn trims_trailing_slash() {
        let source = HttpSource::new("https://www.law.go.kr/".into(), "key".into()).unwrap();
        assert_eq!(source.base_url, "https://www.law.go.kr");
        assert_eq!(source.search_url(), "https://www.law.go.kr/DRF/lawSearch.do");
    }

    #[test]
    fn content_url_joins_and_switches_to_json() {
        let source = HttpSource::new(DEFAULT_BASE_URL.into(), "key".into()).unwrap();
        assert_eq!(
            source.content_url("/DRF/lawService.do?OC=key&target=eflaw&MST=1&type=HTML"),
            "https://www.law.go.kr/DRF/lawService.do?OC=key&target=eflaw&MST=1&type=JSON"
        );
        assert_eq!(
            source.content_url("https://other.example/x?type=HTML"),
            "https://other.example/x?type=JSON"
        );
    }

    #[test]
    fn total_count_accepts_string_or_number() {
        assert_eq!(total_count(&json!({"LawSearch": {"totalCnt": "250"}})).unwrap(), 250);
        assert_eq!(total_count(&json!({"LawSearch": {"totalCnt": 7}})).unwrap(), 7);
        assert!(total_count(&json!({"LawSearch": {}})).is_err());
        assert!(total_count(&json!({"LawSearch": {"totalCnt": "n/a"}})).is_err());
    }

    #[test]
    fn page_listings_handles_array_object_and_absent() {
        let many = json!({"LawSearch": {"law": [
            {"법령ID": "001", "법령상세링크": "/a"},
            {"법령ID": "002", "법령상세링크": "/b"}
        ]}});
        assert_eq!(page_listings(&many).len(), 2);

        let one = json!({"LawSearch": {"law": {"법령ID": "003"}}});
        assert_eq!(page_listings(&one)[0].law_id.as_deref(), Some("003"));

        assert!(page_listings(&json!({"LawSearch": {"totalCnt": "0"}})).is_empty());
    }

    /// Answers each connection with the next canned `(status, body)`, then 500.
    async fn canned_server(responses: Vec<(u16, String)>) -> std::net::SocketAddr {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut responses = responses.into_iter();
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let (status, body) = responses
                    .next()
                    .unwrap_or((500, "exhausted".to_string()));
                let reply = format!(
                    "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(reply.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        addr
    }

    fn period() -> ProcessingPeriod {
        ProcessingPeriod::new(2024, 12).unwrap()
    }

    #[tokio::test]
    async fn stalled_server_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let source = HttpSource::with_timeout(
            format!("http://{addr}"),
            "key".into(),
            Duration::from_millis(200),
        )
        .unwrap();
        let result = tokio::time::timeout(Duration::from_secs(10), source.list(period()))
            .await
            .expect("request should give up on its own");
        match result {
            Err(SourceError::Http(e)) => assert!(e.is_timeout(), "{e}"),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn huge_total_count_does_not_preallocate() {
        let first = json!({"LawSearch": {"totalCnt": "1000000000000"}}).to_string();
        let addr = canned_server(vec![(200, first)]).await;
        let source = HttpSource::new(format!("http://{addr}"), "key".into()).unwrap();

        // The first listing page fails; reaching that error means no up-front allocation.
        match source.list(period()).await {
            Err(SourceError::Server { status, .. }) => assert_eq!(status, 500),
            other => panic!("expected server error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn lists_all_pages() {
        let probe = json!({"LawSearch": {"totalCnt": "2"}}).to_string();
        let page = json!({"LawSearch": {"totalCnt": "2", "law": [
            {"법령ID": "001", "법령상세링크": "/a"},
            {"법령ID": "002", "법령상세링크": "/b"}
        ]}})
        .to_string();
        let addr = canned_server(vec![(200, probe), (200, page)]).await;
        let source = HttpSource::new(format!("http://{addr}"), "key".into())
            .unwrap()
            .with_request_delay(Duration::ZERO);

        let listings = source.list(period()).await.unwrap();
        let ids: Vec<_> = listings.iter().filter_map(|l| l.law_id.as_deref()).collect();
        assert_eq!(ids, vec!["001", "002"]);
    }

    #[test]
    fn page_count_adds_one() {
        assert_eq!(page_count(0), 1);
        assert_eq!(page_count(99), 1);
        assert_eq!(page_count(100), 2);
        assert_eq!(page_count(250), 3);
    }
}
