//! Error handling tests for r-auth-client.
//!
//! Tests the error type and its behavior.

use r_auth_client::AuthError;
use std::error::Error;

#[cfg(test)]
mod error_handling {
    use super::*;

    #[test]
    fn error_display_is_the_message() {
        let error = AuthError::InvalidToken("Auth server reported token is invalid.".into());
        assert_eq!(format!("{}", error), "Auth server reported token is invalid.");

        let error = AuthError::Service("Error from auth server: boom".into());
        assert_eq!(error.to_string(), "Error from auth server: boom");
    }

    #[test]
    fn error_debug_names_the_kind() {
        let debug_str = format!("{:?}", AuthError::Validation("bad".into()));
        assert!(debug_str.contains("Validation"));

        let debug_str = format!("{:?}", AuthError::InvalidUser("bad".into()));
        assert!(debug_str.contains("InvalidUser"));
    }

    #[test]
    fn error_trait_implementation() {
        let error = AuthError::Configuration("cache capacity must be > 0".into());

        let _: &dyn Error = &error;
        assert!(error.source().is_none());
    }

    #[test]
    fn errors_are_comparable_and_cloneable() {
        let error = AuthError::InvalidUser("name".into());
        assert_eq!(error.clone(), error);
        assert_ne!(error, AuthError::InvalidToken("name".into()));
    }

    #[test]
    fn errors_box_into_dyn_error() {
        fn fails() -> Result<(), Box<dyn Error + Send + Sync>> {
            let result: Result<(), AuthError> = Err(AuthError::Service("down".into()));
            result?;
            Ok(())
        }

        let err = fails().unwrap_err();
        assert_eq!(err.to_string(), "down");
        assert!(err.downcast_ref::<AuthError>().is_some());
    }
}
