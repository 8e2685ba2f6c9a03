use std::fmt::{self, Display, Formatter};

#[derive(Debug)]
pub enum Error {
    Login(String),
    Fetch(String),
    ExtractionEmpty,
    MissingEnv(&'static str),
    InvalidEnv { name: &'static str, value: String },
    Io(std::io::Error),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl Error {
    pub fn login_failure(msg: impl Display) -> Self {
        Self::Login(msg.to_string())
    }

    pub fn fetch_failure(msg: impl Display) -> Self {
        Self::Fetch(msg.to_string())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login(msg) => write!(f, "Login failed: {msg}"),
            Self::Fetch(msg) => write!(f, "Assignments fetch failed: {msg}"),
            Self::ExtractionEmpty => write!(f, "Assignments table not found in portal page"),
            Self::MissingEnv(name) => write!(f, "Missing environment variable: {name}"),
            Self::InvalidEnv { name, value } => {
                write!(f, "Invalid value for environment variable {name}: {value:?}")
            }
            Self::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
