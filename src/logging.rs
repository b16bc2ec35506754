//! Subscriber setup for binaries and integration harnesses

use tracing_subscriber::EnvFilter;

use crate::{FeatureError, Result};

/// Install a formatting subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `default_directive` (for example
/// `"paddock=info"`) selects what is logged. Fails if the directive does not parse
/// or a global subscriber is already installed.
pub fn init(default_directive: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive).map_err(|e| {
            FeatureError::configuration(format!(
                "invalid log directive '{}': {}",
                default_directive, e
            ))
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| FeatureError::configuration(format!("failed to install subscriber: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_install_is_rejected() {
        // Whichever call wins the global slot, the other must fail cleanly
        let first = init("paddock=debug");
        let second = init("paddock=debug");
        assert!(first.is_err() || second.is_err());
    }
}
