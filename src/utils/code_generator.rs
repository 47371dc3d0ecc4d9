//! Short code generation.
//!
//! Codes are fixed-length strings over the base62 alphabet. Two strategies are
//! available:
//!
//! - [`RandomCodeGenerator`] draws every character from the thread-local RNG,
//!   so codes are neither sequential nor guessable.
//! - [`HashCodeGenerator`] derives the code from SHA-256 of the URL, so the
//!   same URL maps to the same code. The retry attempt is mixed into the hash
//!   to move away from a collision.
//!
//! Neither strategy guarantees uniqueness on its own. The durable store's
//! atomic insert is the final arbiter.

use rand::Rng;
use rand::distr::Alphanumeric;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

/// The base62 alphabet.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const MIN_CODE_LENGTH: usize = 6;
pub const MAX_CODE_LENGTH: usize = 8;
pub const DEFAULT_CODE_LENGTH: usize = 7;

/// Shape of anything that could be a stored code.
///
/// Looser than the generator output so links created under a different
/// `CODE_LENGTH` still resolve.
static CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{4,16}$").expect("valid code regex"));

/// Produces candidate short codes.
///
/// Implementations hold no shared mutable state and are safe to call from
/// many requests at once.
pub trait CodeGenerator: Send + Sync {
    /// Returns a candidate code for `original_url`.
    ///
    /// `attempt` starts at 0 and is incremented by the caller after every
    /// collision.
    fn generate(&self, original_url: &str, attempt: u32) -> String;
}

/// Selects the generator built at startup (`CODE_STRATEGY`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeStrategy {
    #[default]
    Random,
    Hash,
}

impl FromStr for CodeStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "hash" => Ok(Self::Hash),
            other => Err(format!("unknown code strategy '{other}'")),
        }
    }
}

impl fmt::Display for CodeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => write!(f, "random"),
            Self::Hash => write!(f, "hash"),
        }
    }
}

/// Random base62 codes from the thread-local RNG.
#[derive(Debug, Clone)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self, _original_url: &str, _attempt: u32) -> String {
        rand::rng()
            .sample_iter(Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect()
    }
}

/// Base62 codes derived from SHA-256 of the URL.
#[derive(Debug, Clone)]
pub struct HashCodeGenerator {
    length: usize,
}

impl HashCodeGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl CodeGenerator for HashCodeGenerator {
    fn generate(&self, original_url: &str, attempt: u32) -> String {
        let mut hasher = Sha256::new();
        hasher.update(original_url.as_bytes());
        if attempt > 0 {
            hasher.update(attempt.to_be_bytes());
        }
        let digest = hasher.finalize();

        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        let mut n = u64::from_be_bytes(prefix);

        // 62^8 < 2^64, so eight digits never run out of entropy.
        let mut code = String::with_capacity(self.length);
        for _ in 0..self.length {
            code.push(ALPHABET[(n % 62) as usize] as char);
            n /= 62;
        }
        code
    }
}

/// Builds the generator for the configured strategy.
pub fn build_generator(strategy: CodeStrategy, length: usize) -> Arc<dyn CodeGenerator> {
    match strategy {
        CodeStrategy::Random => Arc::new(RandomCodeGenerator::new(length)),
        CodeStrategy::Hash => Arc::new(HashCodeGenerator::new(length)),
    }
}

/// Returns true if `code` has the shape of a short code.
///
/// Used by the redirect path to reject paths such as `favicon.ico` without
/// touching the cache or the store.
pub fn is_valid_code(code: &str) -> bool {
    CODE_REGEX.is_match(code)
}
