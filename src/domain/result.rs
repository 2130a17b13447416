//! Result type alias for Harbor

use super::errors::HarborError;

/// Result type alias for Harbor operations
///
/// # Examples
///
/// ```
/// use harbor::domain::result::Result;
/// use harbor::domain::errors::HarborError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(HarborError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, HarborError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(HarborError::MissingSourceKey);
        assert!(result.is_err());
    }
}
