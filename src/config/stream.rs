use url::Url;

use crate::types::DashboardError;

use super::{Config, StreamOrigin};

impl Config {
    /// Full stream endpoint, e.g. `wss://host:port/ws/logs`.
    pub fn stream_url(&self) -> Result<Url, DashboardError> {
        let origin = self.stream_origin_url()?;
        crate::log_stream::derive_stream_url(&origin, &self.stream_path)
    }

    /// Pick the address the stream endpoint is derived from.
    ///
    /// An explicit `stream_origin` always wins. Without one, the base URL is
    /// used unless a page origin is configured that points somewhere else, in
    /// which case the choice is ambiguous and rejected.
    pub fn stream_origin_url(&self) -> Result<Url, DashboardError> {
        let base = Url::parse(&self.base_url)?;
        let page = self.page_origin.as_deref().map(Url::parse).transpose()?;

        match (self.stream_origin, page) {
            (Some(StreamOrigin::BaseUrl), _) => Ok(base),
            (Some(StreamOrigin::Page), Some(page)) => Ok(page),
            (Some(StreamOrigin::Page), None) => Err(DashboardError::Config(
                "stream_origin is `page` but page_origin is not set".to_string(),
            )),
            (None, None) => Ok(base),
            (None, Some(page)) if same_origin(&page, &base) => Ok(page),
            (None, Some(page)) => Err(DashboardError::Config(format!(
                "page origin {} and base URL {} differ; set stream_origin explicitly",
                page.origin().ascii_serialization(),
                base.origin().ascii_serialization()
            ))),
        }
    }
}

fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme() && a.host_str() == b.host_str() && a.port() == b.port()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str, page_origin: Option<&str>, origin: Option<StreamOrigin>) -> Config {
        Config {
            base_url: base_url.to_string(),
            page_origin: page_origin.map(str::to_string),
            stream_origin: origin,
            ..Config::default()
        }
    }

    #[test]
    fn base_url_is_used_without_page_origin() {
        let cfg = config("https://api.example.com/dashboard/", None, None);
        assert_eq!(
            cfg.stream_url().unwrap().as_str(),
            "wss://api.example.com/ws/logs"
        );
    }

    #[test]
    fn agreeing_origins_need_no_explicit_policy() {
        let cfg = config(
            "http://10.0.0.2:8800",
            Some("http://10.0.0.2:8800/dashboard/getting-started"),
            None,
        );
        assert_eq!(cfg.stream_url().unwrap().as_str(), "ws://10.0.0.2:8800/ws/logs");
    }

    #[test]
    fn diverging_origins_require_a_policy() {
        let cfg = config("http://backend:8800", Some("https://dash.example.com"), None);
        assert!(matches!(cfg.stream_url(), Err(DashboardError::Config(_))));

        let page = config(
            "http://backend:8800",
            Some("https://dash.example.com"),
            Some(StreamOrigin::Page),
        );
        assert_eq!(
            page.stream_url().unwrap().as_str(),
            "wss://dash.example.com/ws/logs"
        );

        let base = config(
            "http://backend:8800",
            Some("https://dash.example.com"),
            Some(StreamOrigin::BaseUrl),
        );
        assert_eq!(base.stream_url().unwrap().as_str(), "ws://backend:8800/ws/logs");
    }

    #[test]
    fn page_policy_without_page_origin_is_rejected() {
        let cfg = config("http://backend:8800", None, Some(StreamOrigin::Page));
        assert!(matches!(cfg.stream_origin_url(), Err(DashboardError::Config(_))));
    }
}
