use http_body_util::Full;
use hyper::body::Bytes;

/// Every response this service produces is a small piece of text.
pub type Text = Full<Bytes>;

pub fn empty() -> Text {
    Full::new(Bytes::new())
}

pub fn text(body: impl Into<Bytes>) -> Text {
    Full::new(body.into())
}
