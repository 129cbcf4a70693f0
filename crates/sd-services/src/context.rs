use sd_types::UserId;

/// Caller identity passed explicitly into every service call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub user: UserId,
    pub request_id: Option<String>,
}

impl RequestContext {
    pub fn new(user: UserId) -> Self {
        Self {
            user,
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}
