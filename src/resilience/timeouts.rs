//! Timeout enforcement.
//!
//! Every remote call runs under a deadline. An elapsed deadline becomes
//! `TransportError::Timeout`, which the retry wrapper treats as
//! "no response received".

use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

use crate::http::TransportError;

/// Run `fut` under `deadline`.
pub async fn with_deadline<T, F>(deadline: Duration, fut: F) -> Result<T, TransportError>
where
    F: Future<Output = Result<T, TransportError>>,
{
    match timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::Timeout(deadline)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_elapsed_deadline_is_timeout() {
        let result: Result<(), _> = with_deadline(Duration::from_secs(30), async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(TransportError::Timeout(d)) if d == Duration::from_secs(30)));
    }

    #[tokio::test]
    async fn test_inner_result_passes_through() {
        let ok = with_deadline(Duration::from_secs(1), async { Ok(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err: Result<(), _> = with_deadline(Duration::from_secs(1), async {
            Err(TransportError::Connect("refused".to_string()))
        })
        .await;
        assert!(matches!(err, Err(TransportError::Connect(_))));
    }
}
