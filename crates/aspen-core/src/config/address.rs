//! Network address the website binds to.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddrV4, SocketAddrV6};
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Port used when an address does not name one.
pub const DEFAULT_PORT: u16 = 8080;

/// A bindable address: IPv4, IPv6, or a Unix domain socket path.
///
/// Parsing follows the command-line rules:
///
/// - anything starting with `/` or `.` is a Unix socket path
/// - anything with more than one `:` is IPv6 (`[::1]:8080`, or a bare `::1`)
/// - otherwise `ip:port`, where an empty ip means every interface
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NetworkAddress {
    /// An IPv4 socket address.
    Inet(SocketAddrV4),
    /// An IPv6 socket address.
    Inet6(SocketAddrV6),
    /// A Unix domain socket path.
    Unix(PathBuf),
}

impl NetworkAddress {
    /// Returns whether this is a Unix domain socket.
    pub fn is_unix(&self) -> bool {
        matches!(self, Self::Unix(_))
    }

    /// Returns the port, if this is an IP address.
    pub fn port(&self) -> Option<u16> {
        match self {
            Self::Inet(addr) => Some(addr.port()),
            Self::Inet6(addr) => Some(addr.port()),
            Self::Unix(_) => None,
        }
    }
}

impl Default for NetworkAddress {
    fn default() -> Self {
        Self::Inet(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, DEFAULT_PORT))
    }
}

impl FromStr for NetworkAddress {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let bad = || AppError::configuration(format!("Bad address {raw}"));
        let address = raw.trim();

        if address.starts_with('/') || address.starts_with('.') {
            if cfg!(windows) {
                return Err(AppError::configuration(
                    "Can't use an AF_UNIX socket on Windows.",
                ));
            }
            let path = std::path::absolute(address).map_err(|_| bad())?;
            return Ok(Self::Unix(path));
        }

        if address.matches(':').count() > 1 {
            if let Ok(addr) = address.parse::<SocketAddrV6>() {
                return Ok(Self::Inet6(addr));
            }
            let ip = address
                .trim_start_matches('[')
                .trim_end_matches(']')
                .parse::<Ipv6Addr>()
                .map_err(|_| bad())?;
            return Ok(Self::Inet6(SocketAddrV6::new(ip, DEFAULT_PORT, 0, 0)));
        }

        let (ip, port) = address.split_once(':').ok_or_else(bad)?;
        let (ip, port) = (ip.trim(), port.trim());

        let ip = if ip.is_empty() {
            Ipv4Addr::UNSPECIFIED
        } else {
            ip.parse::<Ipv4Addr>().map_err(|_| bad())?
        };

        if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }
        let port = port.parse::<u16>().map_err(|_| bad())?;

        Ok(Self::Inet(SocketAddrV4::new(ip, port)))
    }
}

impl TryFrom<String> for NetworkAddress {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NetworkAddress> for String {
    fn from(address: NetworkAddress) -> Self {
        address.to_string()
    }
}

impl fmt::Display for NetworkAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inet(addr) => write!(f, "{addr}"),
            Self::Inet6(addr) => write!(f, "[{}]:{}", addr.ip(), addr.port()),
            Self::Unix(path) => write!(f, "{}", path.display()),
        }
    }
}
