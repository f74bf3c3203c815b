use std::convert::Infallible;

use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty, Full};

pub type ResponseBody = BoxBody<Bytes, Infallible>;

pub fn empty() -> ResponseBody {
    Empty::<Bytes>::new().boxed()
}

pub fn full<T: Into<Bytes>>(chunk: T) -> ResponseBody {
    Full::new(chunk.into()).boxed()
}
