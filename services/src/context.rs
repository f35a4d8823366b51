/// Who is performing an operation.
///
/// `actor_id` is the authenticated user, if any. `system_actor_id` is the configured
/// account credited for records created on nobody's explicit behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceContext {
    pub actor_id: Option<i64>,
    pub system_actor_id: i64,
}

impl ServiceContext {
    pub fn new(actor_id: Option<i64>, system_actor_id: i64) -> Self {
        Self {
            actor_id,
            system_actor_id,
        }
    }

    pub fn system(system_actor_id: i64) -> Self {
        Self::new(None, system_actor_id)
    }

    /// User recorded as the encoder of grades written in this context.
    pub fn encoder(&self) -> i64 {
        self.actor_id.unwrap_or(self.system_actor_id)
    }
}
