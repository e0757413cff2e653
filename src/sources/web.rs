//! Webpage fetching and main-content extraction.

use super::PageExtractor;
use crate::config::WebSettings;
use crate::error::{Result, ToolbeltError};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use tracing::{debug, instrument};

const CONTENT_ROOTS: [&str; 3] = ["article", "main", "body"];
const CONTENT_BLOCKS: &str = "h1, h2, h3, h4, h5, h6, p, li, pre, blockquote";

/// Main content pulled out of an HTML page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedPage {
    pub title: Option<String>,
    pub source: String,
    pub hostname: Option<String>,
    pub text: String,
}

/// Fetches pages over HTTP and extracts their readable text.
pub struct HttpPageExtractor {
    http: reqwest::Client,
    min_block_chars: usize,
}

impl HttpPageExtractor {
    pub fn new(http: reqwest::Client, settings: &WebSettings) -> Self {
        Self {
            http,
            min_block_chars: settings.min_block_chars,
        }
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let parsed = url::Url::parse(url)
            .map_err(|e| ToolbeltError::InvalidInput(format!("Invalid URL '{}': {}", url, e)))?;

        let html = self
            .http
            .get(parsed)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        debug!("Fetched {} bytes from {}", html.len(), url);
        Ok(html)
    }
}

#[async_trait]
impl PageExtractor for HttpPageExtractor {
    #[instrument(skip(self))]
    async fn extract(&self, url: &str) -> Result<String> {
        let html = self.fetch(url).await?;
        let page = extract_page(&html, url, self.min_block_chars)?;
        Ok(serde_json::to_string(&page)?)
    }
}

/// Extract title and readable text from an HTML document.
pub fn extract_page(html: &str, source: &str, min_block_chars: usize) -> Result<ExtractedPage> {
    let document = Html::parse_document(html);

    let title = document
        .select(&selector("title")?)
        .next()
        .map(text_content)
        .filter(|t| !t.is_empty());

    let mut root = None;
    for name in CONTENT_ROOTS {
        if let Some(found) = document.select(&selector(name)?).next() {
            root = Some(found);
            break;
        }
    }

    let root = root.ok_or_else(|| {
        ToolbeltError::Extraction(format!("No readable content found at {}", source))
    })?;

    let mut blocks: Vec<String> = Vec::new();
    for element in root.select(&selector(CONTENT_BLOCKS)?) {
        let text = text_content(element);
        if text.chars().count() < min_block_chars.max(1) {
            continue;
        }
        // Nested blocks (an <li> wrapping a <p>) repeat the same text.
        if blocks.last() == Some(&text) {
            continue;
        }
        blocks.push(text);
    }

    if blocks.is_empty() {
        return Err(ToolbeltError::Extraction(format!(
            "No readable content found at {}",
            source
        )));
    }

    let hostname = url::Url::parse(source)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()));

    Ok(ExtractedPage {
        title,
        source: source.to_string(),
        hostname,
        text: blocks.join("\n"),
    })
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ToolbeltError::Extraction(format!("Bad selector '{}': {}", css, e)))
}

fn text_content(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(|t| t.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r#"<html>
        <head><title> Rust  Blog </title><script>var x = 1;</script></head>
        <body>
            <nav><a href="/">Home</a></nav>
            <article>
                <h1>Announcing Rust</h1>
                <p>The Rust team is happy   to announce a new version.</p>
                <ul><li><p>Faster builds</p></li></ul>
            </article>
            <footer><p>Copyright</p></footer>
        </body>
    </html>"#;

    #[test]
    fn test_extract_prefers_article() {
        let page = extract_page(PAGE, "https://blog.rust-lang.org/post", 1).unwrap();
        assert_eq!(page.title.as_deref(), Some("Rust Blog"));
        assert_eq!(page.hostname.as_deref(), Some("blog.rust-lang.org"));
        assert_eq!(
            page.text,
            "Announcing Rust\nThe Rust team is happy to announce a new version.\nFaster builds"
        );
    }

    #[test]
    fn test_extract_without_blocks_fails() {
        let err = extract_page("<html><body><div></div></body></html>", "https://x.test", 1).unwrap_err();
        assert!(matches!(err, ToolbeltError::Extraction(_)));
    }

    #[test]
    fn test_min_block_chars_filters_short_blocks() {
        let html = "<body><p>ok</p><p>a longer paragraph</p></body>";
        let page = extract_page(html, "https://x.test", 5).unwrap();
        assert_eq!(page.text, "a longer paragraph");
    }

    #[tokio::test]
    async fn test_fetch_and_extract_as_json() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/post"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
            .mount(&server)
            .await;

        let extractor = HttpPageExtractor::new(reqwest::Client::new(), &WebSettings::default());
        let url = format!("{}/post", server.uri());
        let json = extractor.extract(&url).await.unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["title"], "Rust Blog");
        assert_eq!(value["source"], url);
        assert!(value["text"].as_str().unwrap().starts_with("Announcing Rust"));
    }

    #[tokio::test]
    async fn test_unreachable_status_is_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let extractor = HttpPageExtractor::new(reqwest::Client::new(), &WebSettings::default());
        let err = extractor.extract(&format!("{}/gone", server.uri())).await.unwrap_err();
        assert!(matches!(err, ToolbeltError::Http(_)));
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let extractor = HttpPageExtractor::new(reqwest::Client::new(), &WebSettings::default());
        let err = extractor.extract("not a url").await.unwrap_err();
        assert!(matches!(err, ToolbeltError::InvalidInput(_)));
    }
}
