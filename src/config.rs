use std::net::SocketAddr;

use crate::industry::Industry;

/// Settings of the upload service.
#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub bind_addr: SocketAddr,
    /// Industry used when an upload does not name one.
    pub default_industry: Industry,
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            default_industry: Industry::Commerce,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Builds the configuration from positional arguments
    /// `[bind_addr] [default_industry]`, program name excluded.
    ///
    /// Values that do not parse keep their defaults.
    ///
    /// # Examples
    /// ```
    /// use finsheet::config::ServerConfig;
    ///
    /// let config = ServerConfig::from_args(["0.0.0.0:8080", "ecommerce"]);
    /// assert_eq!(config.bind_addr.port(), 8080);
    /// assert_eq!(config.default_industry.tag(), "ecommerce");
    /// ```
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = ServerConfig::default();
        let mut args = args.into_iter();

        if let Some(addr) = args.next() {
            match addr.as_ref().parse::<SocketAddr>() {
                Ok(addr) => config.bind_addr = addr,
                Err(_) => log::warn!("Invalid bind address '{}', using default", addr.as_ref()),
            }
        }
        if let Some(industry) = args.next() {
            config.default_industry = Industry::from_tag(industry.as_ref());
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_gives_defaults() {
        let config = ServerConfig::from_args(Vec::<String>::new());
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn bad_address_keeps_default_but_reads_industry() {
        let config = ServerConfig::from_args(["not-an-address", "consulting"]);
        assert_eq!(config.bind_addr, ServerConfig::default().bind_addr);
        assert_eq!(config.default_industry, Industry::Consulting);
    }
}
