/// Four-character lock in front of the admin dashboard.
///
/// This only hides the dashboard from casual participants; the passcode ships
/// with the deployment and must not be treated as a credential.
#[derive(Debug, Clone)]
pub struct AdminGate {
    passcode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("incorrect passcode")]
    WrongPasscode,
}

impl AdminGate {
    pub fn new(passcode: impl Into<String>) -> Self {
        Self {
            passcode: passcode.into(),
        }
    }

    pub fn unlock(&self, attempt: &str) -> Result<(), AccessError> {
        if attempt.trim() == self.passcode {
            Ok(())
        } else {
            Err(AccessError::WrongPasscode)
        }
    }
}
