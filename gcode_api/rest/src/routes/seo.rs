use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing, Router,
};
use chrono::SecondsFormat;
use gcode_shared_contracts::time::TimeService;
use url::Url;

use super::internal_server_error;

pub fn router(base_url: Arc<Url>, time: Arc<impl TimeService>) -> Router<()> {
    Router::new()
        .route("/robots.txt", routing::get(robots))
        .route("/sitemap.xml", routing::get(sitemap))
        .with_state((base_url, time))
}

async fn robots(
    State((base_url, _)): State<(Arc<Url>, Arc<impl TimeService>)>,
) -> Response {
    let sitemap_url = match base_url.join("sitemap.xml") {
        Ok(url) => url,
        Err(err) => return internal_server_error(err),
    };

    let body = format!(
        "User-agent: Googlebot\n\
         Disallow: /nogooglebot/\n\
         \n\
         User-agent: *\n\
         Allow: /\n\
         \n\
         Sitemap: {sitemap_url}\n"
    );

    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
}

/// One entry for the landing page; the modification timestamp is generated
/// at request time.
async fn sitemap(
    State((base_url, time)): State<(Arc<Url>, Arc<impl TimeService>)>,
) -> Response {
    let lastmod = time.now().to_rfc3339_opts(SecondsFormat::Millis, true);

    let body = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n\
         \x20 <url>\n\
         \x20   <loc>{loc}</loc>\n\
         \x20   <lastmod>{lastmod}</lastmod>\n\
         \x20   <priority>1.0</priority>\n\
         \x20 </url>\n\
         </urlset>\n",
        loc = xml_escape(base_url.as_str()),
    );

    (
        [(header::CONTENT_TYPE, "application/xml; charset=UTF-8")],
        body,
    )
        .into_response()
}

fn xml_escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::{DateTime, TimeZone, Utc};
    use gcode_shared_contracts::time::MockTimeService;
    use tower::ServiceExt;

    use super::*;

    fn base_url() -> Arc<Url> {
        Arc::new("https://www.g-code.com.hr/".parse().unwrap())
    }

    async fn get(router: Router<()>, uri: &str) -> (StatusCode, String, String) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_owned();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn robots_links_the_canonical_sitemap() {
        let sut = router(base_url(), Arc::new(MockTimeService::new()));

        let (status, content_type, body) = get(sut, "/robots.txt").await;

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.starts_with("text/plain"));
        assert!(body.contains("Sitemap: https://www.g-code.com.hr/sitemap.xml"));
        assert!(body.contains("User-agent: *"));
        assert!(body.contains("Disallow: /nogooglebot/"));
    }

    #[tokio::test]
    async fn sitemap_has_one_entry_stamped_with_the_request_time() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let sut = router(base_url(), Arc::new(MockTimeService::new().with_now(now)));

        let (status, content_type, body) = get(sut, "/sitemap.xml").await;

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.starts_with("application/xml"));
        assert!(body.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(body.contains("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">"));
        assert_eq!(body.matches("<url>").count(), 1);
        assert!(body.contains("<loc>https://www.g-code.com.hr/</loc>"));

        let lastmod = body
            .split("<lastmod>")
            .nth(1)
            .and_then(|rest| rest.split("</lastmod>").next())
            .unwrap();
        assert_eq!(DateTime::parse_from_rfc3339(lastmod).unwrap(), now);
    }

    #[test]
    fn escapes_xml_metacharacters() {
        assert_eq!(
            xml_escape("https://example.com/?a=1&b=<2>"),
            "https://example.com/?a=1&amp;b=&lt;2&gt;"
        );
    }
}
