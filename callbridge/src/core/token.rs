use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// How correlation tokens are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStrategy {
    /// Per-broker counter rendered in base 36.
    #[default]
    Sequential,
    /// UUID v4 in simple (hyphenless) form.
    Random,
}

pub(crate) struct TokenGenerator {
    strategy: TokenStrategy,
    next: AtomicU64,
}

impl TokenGenerator {
    pub fn new(strategy: TokenStrategy) -> Self {
        Self {
            strategy,
            next: AtomicU64::new(1),
        }
    }

    pub fn next(&self) -> String {
        match self.strategy {
            TokenStrategy::Sequential => base36(self.next.fetch_add(1, Ordering::Relaxed)),
            TokenStrategy::Random => Uuid::new_v4().simple().to_string(),
        }
    }
}

fn base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if n == 0 {
        return "0".to_owned();
    }

    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();

    String::from_utf8_lossy(&out).into_owned()
}
