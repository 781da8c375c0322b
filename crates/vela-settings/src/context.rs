//! Query context derived from the frame tree
//!
//! Content-setting queries are made on behalf of a document inside some
//! top-level browsing context. The primary URL is the top frame's security
//! origin; when that origin is opaque (file: URLs, sandboxed frames, data:
//! documents) the top frame's document URL stands in for it.

use url::{Origin, Url};

/// URLs describing where a content-setting query comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameContext {
    /// Security origin of the top-level frame, absent when opaque.
    pub top_origin: Option<Url>,
    /// Document URL of the top-level frame.
    pub top_document_url: Url,
    /// Document URL of the frame making the query.
    pub document_url: Url,
}

impl FrameContext {
    /// Build a context from the top frame's document URL and the querying
    /// frame's document URL, deriving the top origin from the former.
    pub fn from_urls(top_document_url: Url, document_url: Url) -> Self {
        let top_origin = match top_document_url.origin() {
            Origin::Tuple(..) => {
                let serialized = top_document_url.origin().ascii_serialization();
                Url::parse(&serialized).ok()
            }
            Origin::Opaque(_) => None,
        };

        FrameContext {
            top_origin,
            top_document_url,
            document_url,
        }
    }

    /// URL of the requesting page: the top origin, or the top document URL
    /// when the origin is opaque.
    pub fn primary_url(&self) -> &Url {
        self.top_origin.as_ref().unwrap_or(&self.top_document_url)
    }

    /// URL of the resource context being evaluated.
    pub fn secondary_url(&self) -> &Url {
        &self.document_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_tuple_origin_is_primary() {
        let ctx = FrameContext::from_urls(
            url("https://example.com/some/page?q=1"),
            url("https://frame.example.com/widget"),
        );

        // Path and query do not leak into the origin
        assert_eq!(ctx.primary_url().as_str(), "https://example.com/");
        assert_eq!(
            ctx.secondary_url().as_str(),
            "https://frame.example.com/widget"
        );
    }

    #[test]
    fn test_opaque_origin_falls_back_to_document_url() {
        let top = url("file:///home/user/page.html");
        let ctx = FrameContext::from_urls(top.clone(), url("https://embedded.example/"));

        assert_eq!(ctx.top_origin, None);
        assert_eq!(ctx.primary_url(), &top);
    }

    #[test]
    fn test_non_default_port_kept_in_origin() {
        let ctx = FrameContext::from_urls(
            url("http://localhost:3000/app"),
            url("http://localhost:3000/app"),
        );

        assert_eq!(ctx.primary_url().as_str(), "http://localhost:3000/");
    }
}
