use actix_web::HttpRequest;

/// Builds absolute URLs for resources, rooted at the host the request came in on.
#[derive(Debug, Clone)]
pub struct Links {
    base: String,
}

impl Links {
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base }
    }

    pub fn from_request(req: &HttpRequest) -> Self {
        let info = req.connection_info();
        Self::new(format!("{}://{}", info.scheme(), info.host()))
    }

    pub fn snippets(&self) -> String {
        format!("{}/snippets/", self.base)
    }

    pub fn snippet(&self, id: i64) -> String {
        format!("{}/snippets/{id}/", self.base)
    }

    pub fn highlight(&self, id: i64) -> String {
        format!("{}/snippets/{id}/highlight/", self.base)
    }

    pub fn users(&self) -> String {
        format!("{}/users/", self.base)
    }

    pub fn user(&self, id: i64) -> String {
        format!("{}/users/{id}/", self.base)
    }
}
