/// How a [`RawDocument`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentOrigin {
    /// Plain HTTP response body (HTML or XML).
    Http,
    /// Page source after script execution in a render engine.
    Rendered,
}

/// Unparsed page content for one tracking attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    body: String,
    origin: DocumentOrigin,
}

impl RawDocument {
    #[must_use]
    pub fn http(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            origin: DocumentOrigin::Http,
        }
    }

    #[must_use]
    pub fn rendered(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            origin: DocumentOrigin::Rendered,
        }
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    #[must_use]
    pub fn origin(&self) -> DocumentOrigin {
        self.origin
    }

    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.body.contains(needle)
    }
}
