/// Identity of the caller for the duration of one request or command.
///
/// Every repository and service that scopes data to a user takes this
/// explicitly instead of reading an ambient "current user".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: i64,
}

impl RequestContext {
    pub fn new(user_id: i64) -> Self {
        Self { user_id }
    }

    /// True when `owner` is the caller. Global rows (`None`) are never owned.
    pub fn owns(&self, owner: Option<i64>) -> bool {
        owner == Some(self.user_id)
    }
}
