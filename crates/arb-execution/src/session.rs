use async_trait::async_trait;

/// Verdict from an external session registry on whether an account's
/// provider session is ready to accept a placement.
/// The core treats this purely as a boolean; session establishment itself
/// is out of scope.
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    async fn is_ready(&self, account_id: &str) -> bool;
}

#[cfg(feature = "testkit")]
pub use testkit::AlwaysReadySessionRegistry;

#[cfg(feature = "testkit")]
mod testkit {
    use super::SessionRegistry;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Every account is ready unless explicitly listed as not-ready.
    #[derive(Default)]
    pub struct AlwaysReadySessionRegistry {
        not_ready: Mutex<HashSet<String>>,
    }

    impl AlwaysReadySessionRegistry {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn mark_not_ready(&self, account_id: impl Into<String>) {
            self.not_ready.lock().unwrap().insert(account_id.into());
        }
    }

    #[async_trait]
    impl SessionRegistry for AlwaysReadySessionRegistry {
        async fn is_ready(&self, account_id: &str) -> bool {
            !self.not_ready.lock().unwrap().contains(account_id)
        }
    }
}
