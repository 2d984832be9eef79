//! Application error with a process exit code.
//!
//! Exit codes:
//! - `2` invalid configuration or I/O failure
//! - `3` a requested capability is not compiled in
//! - `4` numerical failure (fit did not converge, integrator blew up, ...)
//! - `5` figure rendering failure

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    pub fn numerical(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::new(5, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_carry_exit_codes() {
        assert_eq!(AppError::invalid("x").exit_code(), 2);
        assert_eq!(AppError::unavailable("x").exit_code(), 3);
        assert_eq!(AppError::numerical("x").exit_code(), 4);
        assert_eq!(AppError::render("x").exit_code(), 5);
        assert_eq!(AppError::numerical("fit failed").to_string(), "fit failed");
    }
}
