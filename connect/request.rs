use std::time::Duration;

use http::HeaderMap;

/// A request message together with its call metadata.
#[derive(Debug, Clone, Default)]
pub struct Request<T> {
    message: T,
    headers: HeaderMap,
    timeout: Option<Duration>,
}

impl<T> Request<T> {
    pub fn new(message: T) -> Self {
        Self {
            message,
            headers: HeaderMap::new(),
            timeout: None,
        }
    }

    pub(crate) fn from_parts(
        message: T,
        headers: HeaderMap,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            message,
            headers,
            timeout,
        }
    }

    pub fn message(&self) -> &T {
        &self.message
    }

    pub fn message_mut(&mut self) -> &mut T {
        &mut self.message
    }

    pub fn into_message(self) -> T {
        self.message
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// On the client this bounds the whole call and is propagated to the
    /// server. On the server it holds the deadline the client asked for.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }

    pub fn into_parts(self) -> (HeaderMap, Option<Duration>, T) {
        (self.headers, self.timeout, self.message)
    }
}

impl<T> From<T> for Request<T> {
    fn from(message: T) -> Self {
        Request::new(message)
    }
}

/// A response message together with its headers and trailers.
#[derive(Debug, Clone, Default)]
pub struct Response<T> {
    message: T,
    headers: HeaderMap,
    trailers: HeaderMap,
}

impl<T> Response<T> {
    pub fn new(message: T) -> Self {
        Self {
            message,
            headers: HeaderMap::new(),
            trailers: HeaderMap::new(),
        }
    }

    pub(crate) fn from_parts(
        message: T,
        headers: HeaderMap,
        trailers: HeaderMap,
    ) -> Self {
        Self {
            message,
            headers,
            trailers,
        }
    }

    pub fn message(&self) -> &T {
        &self.message
    }

    pub fn into_message(self) -> T {
        self.message
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn trailers(&self) -> &HeaderMap {
        &self.trailers
    }

    pub fn trailers_mut(&mut self) -> &mut HeaderMap {
        &mut self.trailers
    }

    pub fn into_parts(self) -> (HeaderMap, T, HeaderMap) {
        (self.headers, self.message, self.trailers)
    }
}
