//! Forwarding address validation

use sp_core::ValidationError;

/// Check a `[host:]port` answer.
///
/// `host` is any token without `:` or whitespace; `port` is a decimal
/// integer in `0..=65535` of at most five digits. With `domain_required`
/// the host part is mandatory.
pub fn validate_address(input: &str, domain_required: bool) -> Result<(), ValidationError> {
    let rejected = if domain_required {
        ValidationError::InvalidHostAddress
    } else {
        ValidationError::InvalidAddress
    };

    let port = match input.rsplit_once(':') {
        Some((host, port)) => {
            if !is_host_token(host) {
                return Err(rejected);
            }
            port
        }
        None if domain_required => return Err(rejected),
        None => input,
    };

    if is_port(port) {
        Ok(())
    } else {
        Err(rejected)
    }
}

fn is_host_token(host: &str) -> bool {
    !host.is_empty() && !host.contains(':') && !host.chars().any(char::is_whitespace)
}

fn is_port(port: &str) -> bool {
    (1..=5).contains(&port.len())
        && port.bytes().all(|b| b.is_ascii_digit())
        && port.parse::<u32>().map(|p| p <= u32::from(u16::MAX)).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_port_only_without_domain() {
        assert!(validate_address("9000", false).is_ok());
        assert!(validate_address("0", false).is_ok());
        assert_eq!(
            validate_address("9000", true),
            Err(ValidationError::InvalidHostAddress)
        );
    }

    #[test]
    fn test_host_and_port() {
        for input in ["localhost:9000", "127.0.0.1:65535", "db.internal:0"] {
            assert!(validate_address(input, true).is_ok(), "{}", input);
            assert!(validate_address(input, false).is_ok(), "{}", input);
        }
    }

    #[test]
    fn test_port_range() {
        assert!(validate_address("65535", false).is_ok());
        assert_eq!(
            validate_address("65536", false),
            Err(ValidationError::InvalidAddress)
        );
        assert!(validate_address("localhost:100000", true).is_err());
        assert!(validate_address("localhost:-1", true).is_err());
    }

    #[test]
    fn test_rejects_malformed() {
        for input in ["", "localhost", "localhost:", ":9000", "a:b:9000", "my host:22", "local:host:x", "90 00"] {
            assert!(validate_address(input, false).is_err(), "{:?}", input);
        }
    }
}
