//! Crawler tests against a local search server

#[cfg(test)]
mod google_tests {
    use crate::crawler::{CrawlRequest, CrawlerConfig, GoogleImageCrawler, ImageCrawler, Workers};
    use axum::{Router, http::StatusCode, routing::get};
    use std::io::Cursor;
    use std::net::SocketAddr;
    use std::time::Duration;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn search_page(addr: SocketAddr) -> String {
        format!(
            r#"<html><head><script>var cfg = {{}};</script></head><body>
<script>AF_initDataCallback({{data:[
"http://{addr}/img/missing.png",
"http://{addr}/img/small.png",
"http://{addr}/img/big.png",
"http://{addr}/img/second.png"
]}});</script>
</body></html>"#
        )
    }

    /// Serve a result page plus a few images; returns the bound address
    async fn spawn_search_server() -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let page = search_page(addr);
        let mixed_page = format!(
            r#"<script>var d = ["http://{addr}/img/text.png","http://{addr}/img/big.png"];</script>"#
        );
        let small = png(120, 120);
        let big = png(320, 240);
        let second = png(400, 400);

        let app = Router::new()
            .route("/search", get(move || async move { page }))
            .route("/mixed/search", get(move || async move { mixed_page }))
            .route("/img/text.png", get(|| async { "<html>not an image</html>" }))
            .route("/broken/search", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .route("/img/small.png", get(move || async move { small }))
            .route("/img/big.png", get(move || async move { big }))
            .route("/img/second.png", get(move || async move { second }))
            .route("/img/missing.png", get(|| async { StatusCode::NOT_FOUND }));

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        addr
    }

    fn crawler(base_url: String) -> GoogleImageCrawler {
        GoogleImageCrawler::new(CrawlerConfig {
            base_url,
            user_agent: "prodpic-test".to_string(),
            timeout: Duration::from_secs(5),
            workers: Workers::default(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_crawl_saves_first_image_meeting_min_size() {
        let addr = spawn_search_server().await;
        let dir = tempfile::tempdir().unwrap();
        let crawler = crawler(format!("http://{addr}/search"));

        let request = CrawlRequest::new("red sneakers")
            .with_max_num(1)
            .with_min_size(Some((200, 200)))
            .with_overwrite(true);

        let summary = crawler.crawl(&request, dir.path()).await.unwrap();

        assert_eq!(summary.saved.len(), 1);
        let saved = &summary.saved[0];
        assert_eq!(saved.file_name().unwrap(), "000001.png");

        let bytes = std::fs::read(saved).unwrap();
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!((img.width(), img.height()), (320, 240));

        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[tokio::test]
    async fn test_crawl_without_min_size_keeps_small_images() {
        let addr = spawn_search_server().await;
        let dir = tempfile::tempdir().unwrap();
        let crawler = crawler(format!("http://{addr}/search"));

        let request = CrawlRequest::new("red sneakers").with_max_num(2);
        let summary = crawler.crawl(&request, dir.path()).await.unwrap();

        let names: Vec<_> = summary
            .saved
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["000001.png", "000002.png"]);

        let first = image::load_from_memory(&std::fs::read(&summary.saved[0]).unwrap()).unwrap();
        assert_eq!(first.width(), 120);
    }

    #[tokio::test]
    async fn test_crawl_skips_undecodable_body_without_min_size() {
        let addr = spawn_search_server().await;
        let dir = tempfile::tempdir().unwrap();
        let crawler = crawler(format!("http://{addr}/mixed/search"));

        let request = CrawlRequest::new("red sneakers").with_max_num(1);
        let summary = crawler.crawl(&request, dir.path()).await.unwrap();

        assert_eq!(summary.saved.len(), 1);
        let img = image::load_from_memory(&std::fs::read(&summary.saved[0]).unwrap()).unwrap();
        assert_eq!((img.width(), img.height()), (320, 240));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_crawl_fails_when_search_page_unavailable() {
        let addr = spawn_search_server().await;
        let dir = tempfile::tempdir().unwrap();
        let crawler = crawler(format!("http://{addr}/broken/search"));

        let request = CrawlRequest::new("red sneakers").with_max_num(1);
        let result = crawler.crawl(&request, dir.path()).await;

        assert!(result.is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_crawl_keeps_existing_file_without_overwrite() {
        let addr = spawn_search_server().await;
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("000001.png");
        std::fs::write(&existing, b"keep me").unwrap();

        let crawler = crawler(format!("http://{addr}/search"));
        let request = CrawlRequest::new("red sneakers")
            .with_max_num(1)
            .with_min_size(Some((200, 200)))
            .with_overwrite(false);

        let summary = crawler.crawl(&request, dir.path()).await.unwrap();

        assert_eq!(std::fs::read(&existing).unwrap(), b"keep me");
        assert_eq!(summary.saved.len(), 1);
        assert_eq!(summary.saved[0].file_name().unwrap(), "000002.png");
    }

    #[tokio::test]
    async fn test_zero_max_num_does_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let crawler = crawler("http://127.0.0.1:9/search".to_string());

        let request = CrawlRequest::new("anything").with_max_num(0);
        let summary = crawler.crawl(&request, dir.path()).await.unwrap();

        assert!(summary.saved.is_empty());
    }
}
