//! Prime sizing shared by both engines.
//!
//! Every bucket store is sized to a prime so that `hash % capacity` spreads
//! keys evenly and quadratic probing cycles through distinct slots.

/// Returns `true` when `n` is prime.
///
/// Trial division by odd factors up to `sqrt(n)`.
#[must_use]
#[allow(clippy::arithmetic_side_effects)]
pub const fn is_prime(n: usize) -> bool {
    if n == 2 || n == 3 {
        return true;
    }
    if n < 2 || n % 2 == 0 {
        return false;
    }

    let mut factor: usize = 3;
    // `factor <= n / factor` is `factor * factor <= n` without overflow
    while factor <= n / factor {
        if n % factor == 0 {
            return false;
        }
        factor += 2;
    }
    true
}

/// Returns the smallest odd prime `>= n`.
///
/// Even inputs are bumped to the next odd number first, so the search never
/// produces 2; callers that want a capacity of exactly 2 must ask for it.
#[must_use]
pub const fn next_prime(n: usize) -> usize {
    let mut candidate = if n % 2 == 0 { n.saturating_add(1) } else { n };
    while !is_prime(candidate) {
        candidate = candidate.saturating_add(2);
    }
    candidate
}

/// Capacity used by `resize_table`: the request itself when it is already
/// prime (this is how 2 is reachable), otherwise the next prime above it.
#[must_use]
pub(crate) const fn resize_target(requested: usize) -> usize {
    if is_prime(requested) { requested } else { next_prime(requested) }
}
