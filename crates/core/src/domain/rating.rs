use thiserror::Error;

/// Highest rating a user can give.
pub const MAX_RATING: u8 = 10;

/// Errors raised when a rating falls outside the closed range `0..=10`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RatingError {
    #[error("Rating {0} is out of range 0..=10")]
    OutOfRange(u8),
}

/// Checks that a rating lies in `0..=MAX_RATING`.
///
/// Producers call this before writing; the domain records themselves do not
/// enforce the range.
pub fn validate_rating(rating: u8) -> Result<u8, RatingError> {
    if rating <= MAX_RATING {
        Ok(rating)
    } else {
        Err(RatingError::OutOfRange(rating))
    }
}
