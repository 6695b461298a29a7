//! GenerationClient trait definition

use std::time::Duration;

use async_trait::async_trait;

use super::ProviderError;

/// Stateless text-generation client - each call is independent.
///
/// One prompt in, one raw completion out. All grounding (itinerary, history,
/// preferences) travels inside the prompt, so providers hold no session
/// state. `budget` is a hard per-request deadline. Implementations never
/// retry; whether an error is worth a fresh attempt is the caller's decision
/// (see [`ProviderError::is_retryable`]).
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, prompt: &str, budget: Duration) -> Result<String, ProviderError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Mock generation client for unit tests: replays scripted replies in
    /// order and records the prompts it was given.
    pub struct MockGenerationClient {
        replies: Vec<String>,
        call_count: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl MockGenerationClient {
        pub fn new(replies: Vec<String>) -> Self {
            Self { replies, call_count: AtomicUsize::new(0), prompts: Mutex::new(Vec::new()) }
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        /// The prompts received so far, in call order
        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GenerationClient for MockGenerationClient {
        async fn generate(
            &self,
            prompt: &str,
            _budget: Duration,
        ) -> Result<String, ProviderError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            self.replies.get(idx).cloned().ok_or_else(|| ProviderError::Unavailable {
                message: "no more scripted replies".to_string(),
            })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_client_replays_in_order() {
            let client =
                MockGenerationClient::new(vec!["first".to_string(), "second".to_string()]);

            let budget = Duration::from_secs(1);
            assert_eq!(client.generate("p1", budget).await.unwrap(), "first");
            assert_eq!(client.generate("p2", budget).await.unwrap(), "second");
            assert_eq!(client.call_count(), 2);
            assert_eq!(client.prompts(), vec!["p1", "p2"]);
        }

        #[tokio::test]
        async fn test_mock_client_errors_when_exhausted() {
            let client = MockGenerationClient::new(vec![]);
            let result = client.generate("p", Duration::from_secs(1)).await;
            assert!(matches!(result, Err(ProviderError::Unavailable { .. })));
        }
    }
}
