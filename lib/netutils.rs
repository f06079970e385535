use std::net::{IpAddr, Ipv6Addr, SocketAddr};
use std::str::FromStr;

use anyhow::{Context, Result};

/// Builds a listen address. No address means every interface.
pub fn parse_addr(address: &Option<String>, port: u16) -> Result<SocketAddr> {
    let addr = match address {
        | Some(addr) => {
            IpAddr::from_str(addr)
                .with_context(|| format!("Invalid listen address '{addr}'"))?
        }
        | None => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
    };

    Ok(SocketAddr::from((addr, port)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_addresses() {
        let addr = parse_addr(&Some("127.0.0.1".to_owned()), 8888).unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:8888");

        let addr = parse_addr(&None, 9000).unwrap();
        assert_eq!(addr.to_string(), "[::]:9000");

        assert!(parse_addr(&Some("localhost".to_owned()), 80).is_err());
    }
}
