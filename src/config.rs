use std::{
    env,
    fmt::{self, Debug, Formatter},
    net::{IpAddr, Ipv4Addr, SocketAddr},
};

use crate::error::{Error, Result};

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 5000;

/// Portal login for a single student.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub roll_no: String,
    pub password: String,
    pub session: String,
    pub program: String,
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("roll_no", &self.roll_no)
            .field("password", &"<redacted>")
            .field("session", &self.session)
            .field("program", &self.program)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(Error::MissingEnv(name))
        };
        let credentials = Credentials {
            roll_no: required("ROLL_NO")?,
            password: required("PASSWORD")?,
            session: required("SESSION")?,
            program: required("PROGRAM")?,
        };

        let host = match lookup("HOST") {
            Some(value) => value
                .parse()
                .map_err(|_| Error::InvalidEnv { name: "HOST", value })?,
            None => DEFAULT_HOST,
        };
        let port = match lookup("PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| Error::InvalidEnv { name: "PORT", value })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            credentials,
            addr: SocketAddr::new(host, port),
        })
    }
}
