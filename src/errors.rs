use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::num;

pub type Result<T> = std::result::Result<T, CartError>;

#[derive(Debug)]
pub enum CartError {
    InvalidArgument(String),
    IndexOutOfRange(usize, usize),
    NoValidSplit,
    IO(io::Error),
    ParseFloat(num::ParseFloatError),
}

impl From<&str> for CartError {
    fn from(err: &str) -> CartError {
        CartError::InvalidArgument(err.to_string())
    }
}

impl From<num::ParseFloatError> for CartError {
    fn from(err: num::ParseFloatError) -> CartError {
        CartError::ParseFloat(err)
    }
}

impl From<io::Error> for CartError {
    fn from(err: io::Error) -> CartError {
        CartError::IO(err)
    }
}

impl Display for CartError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match *self {
            CartError::InvalidArgument(ref msg) => write!(f, "Invalid argument: {}", msg),
            CartError::IndexOutOfRange(index, len) => write!(
                f,
                "Feature index {} out of range for feature vector of size {}",
                index, len
            ),
            CartError::NoValidSplit => write!(f, "No split satisfies the minimum leaf size"),
            CartError::IO(ref e) => write!(f, "IO error: {}", e),
            CartError::ParseFloat(ref e) => write!(f, "ParseFloat error: {}", e),
        }
    }
}

impl Error for CartError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            CartError::InvalidArgument(_) => None,
            CartError::IndexOutOfRange(_, _) => None,
            CartError::NoValidSplit => None,
            CartError::IO(ref e) => Some(e),
            CartError::ParseFloat(ref e) => Some(e),
        }
    }
}
