use crate::auth::RegisterRequest;
use crate::error::ApiError;

pub fn validate_registration(request: &RegisterRequest) -> Result<(), ApiError> {
    if request.full_name.trim().is_empty()
        || request.email.trim().is_empty()
        || request.password.is_empty()
    {
        return Err(ApiError::Validation(
            "full name, email and password are required".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(full_name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            full_name: full_name.to_string(),
            email: email.to_string(),
            phone: None,
            gender: None,
            birthday: None,
            password: password.to_string(),
        }
    }

    #[test]
    fn test_validate_registration() {
        assert!(validate_registration(&request("Ada", "ada@example.com", "pw")).is_ok());
        assert!(validate_registration(&request("", "ada@example.com", "pw")).is_err());
        assert!(validate_registration(&request("Ada", "", "pw")).is_err());
        assert!(validate_registration(&request("Ada", "ada@example.com", "")).is_err());
        assert!(validate_registration(&request("   ", "ada@example.com", "pw")).is_err());
    }
}
