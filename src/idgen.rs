//! Human-readable identifier generation.
//!
//! Every business identifier in the system (`VD-2025-00042` and friends) is a
//! `<PREFIX>-<year>-<5 digits>` string produced by drawing random digits and
//! checking the draw against storage. The existence check is injected so the
//! generator stays a pure function over its inputs and is testable without a
//! database.

use chrono::{Datelike, Utc};
use rand::Rng;
use std::future::Future;

/// Maximum number of random draws before falling back to a timestamp suffix
pub const MAX_ATTEMPTS: u32 = 10;

/// Digit width of the random portion, zero-padded
pub const DIGIT_WIDTH: usize = 5;

const DIGIT_SPAN: u32 = 100_000;

/// The entity kinds that receive generated identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    /// Vendor declaration (`VD-`)
    Declaration,
    /// Customer-facing tracking number (`TRK-`)
    Tracking,
    /// Vendor account (`VID-`)
    Vendor,
    /// Container grouping (`CNT-`)
    Container,
}

impl IdKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            IdKind::Declaration => "VD",
            IdKind::Tracking => "TRK",
            IdKind::Vendor => "VID",
            IdKind::Container => "CNT",
        }
    }
}

/// Generates a probably-unique identifier for `kind`.
///
/// Draws up to [`MAX_ATTEMPTS`] random candidates, returning the first one
/// `exists` reports as absent. If every draw collides, returns a
/// timestamp-suffixed identifier (`<PREFIX>-<year>-<epoch millis>`), unique
/// by construction; collisions alone never produce an error. Errors from
/// `exists` (for example an unreachable store) propagate unchanged.
pub async fn generate<F, Fut, E>(kind: IdKind, exists: F) -> Result<String, E>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    let year = Utc::now().year();

    for _ in 0..MAX_ATTEMPTS {
        let digits = {
            let mut rng = rand::thread_rng();
            rng.gen_range(0..DIGIT_SPAN)
        };
        let candidate = format!("{}-{}-{:0width$}", kind.prefix(), year, digits, width = DIGIT_WIDTH);

        if !exists(candidate.clone()).await? {
            return Ok(candidate);
        }
    }

    Ok(format!(
        "{}-{}-{}",
        kind.prefix(),
        year,
        Utc::now().timestamp_millis()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ServiceError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn parts(id: &str) -> (String, String, String) {
        let mut split = id.splitn(3, '-');
        (
            split.next().unwrap_or_default().to_string(),
            split.next().unwrap_or_default().to_string(),
            split.next().unwrap_or_default().to_string(),
        )
    }

    #[tokio::test]
    async fn generated_ids_match_the_documented_format() {
        for (kind, prefix) in [
            (IdKind::Declaration, "VD"),
            (IdKind::Tracking, "TRK"),
            (IdKind::Vendor, "VID"),
            (IdKind::Container, "CNT"),
        ] {
            let id = generate(kind, |_| async { Ok::<_, ServiceError>(false) })
                .await
                .unwrap();

            let (got_prefix, year, digits) = parts(&id);
            assert_eq!(got_prefix, prefix);
            assert_eq!(year.len(), 4);
            assert!(year.chars().all(|c| c.is_ascii_digit()));
            assert_eq!(digits.len(), DIGIT_WIDTH, "unexpected digits in {id}");
            assert!(digits.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[tokio::test]
    async fn collisions_are_retried_until_a_free_candidate_appears() {
        let calls = AtomicU32::new(0);

        let id = generate(IdKind::Tracking, |_| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<_, ServiceError>(n < 3) }
        })
        .await
        .unwrap();

        // First three draws collided, the fourth was accepted
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        let (prefix, _, digits) = parts(&id);
        assert_eq!(prefix, "TRK");
        assert_eq!(digits.len(), DIGIT_WIDTH);
    }

    #[tokio::test]
    async fn exhausted_retries_fall_back_to_a_timestamp_suffix() {
        let calls = AtomicU32::new(0);

        let id = generate(IdKind::Declaration, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, ServiceError>(true) }
        })
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), MAX_ATTEMPTS);

        // The suffix is epoch milliseconds, far wider than five digits
        let (prefix, _, suffix) = parts(&id);
        assert_eq!(prefix, "VD");
        let millis: i64 = suffix.parse().expect("timestamp suffix");
        assert!(millis > 1_000_000_000_000);
    }

    #[tokio::test]
    async fn store_errors_propagate_to_the_caller() {
        let result = generate(IdKind::Vendor, |_| async {
            Err::<bool, _>(ServiceError::db_error("store unreachable"))
        })
        .await;

        assert!(matches!(result, Err(ServiceError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn fallback_is_not_checked_against_the_store() {
        let calls = AtomicU32::new(0);

        let _ = generate(IdKind::Container, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, ServiceError>(true) }
        })
        .await
        .unwrap();

        // Exactly MAX_ATTEMPTS checks; the timestamp fallback skips the store
        assert_eq!(calls.load(Ordering::SeqCst), MAX_ATTEMPTS);
    }
}
