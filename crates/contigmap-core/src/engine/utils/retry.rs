use tracing::trace;

/// Outcome of a single attempt in [`bounded_retry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt<T, R> {
    Accept(T),
    /// Rejected, carrying the reason for diagnostics.
    Reject(R),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryExhausted<R> {
    pub attempts: usize,
    pub last_rejection: R,
}

/// Runs `attempt` until it accepts or `max_attempts` attempts have been made.
///
/// `max_attempts` must be at least 1; a cap of 0 is treated as 1.
pub fn bounded_retry<T, R>(
    max_attempts: usize,
    mut attempt: impl FnMut(usize) -> Attempt<T, R>,
) -> Result<T, RetryExhausted<R>> {
    let max_attempts = max_attempts.max(1);
    let mut index = 0;
    loop {
        match attempt(index) {
            Attempt::Accept(value) => {
                trace!(attempt = index, "Attempt accepted.");
                return Ok(value);
            }
            Attempt::Reject(reason) => {
                index += 1;
                if index >= max_attempts {
                    return Err(RetryExhausted {
                        attempts: index,
                        last_rejection: reason,
                    });
                }
            }
        }
    }
}
