//! Authentication constants.

use std::time::Duration;

/// Storage key for the persisted auth slice (`{user, isEmailVerified}`).
pub const AUTH_STORAGE_KEY: &str = "todo-app-a1d925c0-95a2-4003-a3a5-0a52d7b5bfb6-auth-storage";

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Simulated backend latencies.
pub mod latency {
    use super::Duration;

    /// Sign-in, sign-up, password reset, email confirmation and resend.
    pub const DEFAULT: Duration = Duration::from_millis(1000);

    /// Sign-out.
    pub const SIGN_OUT: Duration = Duration::from_millis(500);
}

/// User-facing messages produced by error classification.
pub mod messages {
    /// Fallback when a failure carries no description.
    pub const UNEXPECTED: &str = "An unexpected error occurred";
    /// Wrong email/password combination.
    pub const INVALID_CREDENTIALS: &str = "Invalid email or password. Please check your credentials.";
    /// Sign-in against an address that is not verified yet.
    pub const VERIFY_EMAIL: &str = "Please verify your email address before signing in.";
    /// Sign-up with an address that already has an account.
    pub const ALREADY_REGISTERED: &str =
        "An account with this email already exists. Try signing in instead.";
    /// Password below the minimum length.
    pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters long.";
    /// Malformed email address.
    pub const INVALID_EMAIL: &str = "Please enter a valid email address.";
    /// Email sending throttled.
    pub const RATE_LIMITED: &str = "Too many emails sent. Please wait before requesting another.";
    /// Verification link past its expiry.
    pub const TOKEN_EXPIRED: &str = "Verification link has expired. Please request a new one.";
    /// Verification link that does not match.
    pub const TOKEN_INVALID: &str = "Invalid verification link. Please request a new one.";
    /// Transport failure.
    pub const NETWORK: &str = "Network error. Please check your connection and try again.";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_is_namespaced() {
        assert!(AUTH_STORAGE_KEY.starts_with("todo-app-"));
        assert!(AUTH_STORAGE_KEY.ends_with("-auth-storage"));
    }

    #[test]
    fn test_sign_out_is_faster_than_default() {
        assert!(latency::SIGN_OUT < latency::DEFAULT);
    }
}
