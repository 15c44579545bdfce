//! Infrastructure error conversions

pub mod conversions;

pub use conversions::InfraError;
use wiss_domain::{Result, WissError};

/// Lift storage and rusqlite results into domain results.
pub(crate) trait IntoDomainResult<T> {
    fn into_domain(self) -> Result<T>;
}

impl<T, E> IntoDomainResult<T> for std::result::Result<T, E>
where
    InfraError: From<E>,
{
    fn into_domain(self) -> Result<T> {
        self.map_err(|err| WissError::from(InfraError::from(err)))
    }
}
