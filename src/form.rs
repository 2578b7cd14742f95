//! Contact form submission pipeline
//!
//! Checks run in a fixed order: secure context, honeypot, token, rate limit,
//! then field validation. Nothing is sent anywhere; an accepted submission is
//! "completed" by the caller after a fixed delay.

use fancy_regex::Regex;
use std::sync::OnceLock;

use crate::consts::{MESSAGE_LEN, NAME_LEN, SUBMIT_DELAY_MS};
use crate::notify::Notification;
use crate::security::{SessionState, TokenStore, contains_suspicious};

/// Field values read from the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
    /// Honeypot, hidden from humans
    pub website: String,
    /// Echoed hidden-field token
    pub csrf_token: Option<String>,
}

/// Facts about the browsing context the submit handler runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitEnv {
    pub secure_context: bool,
}

impl Default for SubmitEnv {
    fn default() -> Self {
        Self {
            secure_context: true,
        }
    }
}

/// Why a submission was refused. `Display` is the text shown to the visitor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejection {
    #[error("This form requires a secure connection (HTTPS).")]
    InsecureContext,
    #[error("Security validation failed. Please try again.")]
    Honeypot,
    #[error("Security token validation failed. Please refresh and try again.")]
    TokenMismatch,
    #[error("Too many submissions. Please wait before trying again.")]
    RateLimited,
    #[error("Name must be 2-100 characters long.")]
    NameLength,
    #[error("Message must be 10-1000 characters long.")]
    MessageLength,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Invalid characters detected. Please check your input.")]
    SuspiciousContent,
}

impl SubmitRejection {
    pub fn notification(&self) -> Notification {
        Notification::error(self.to_string())
    }
}

/// A refused attempt, with the replacement token to stamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    pub reason: SubmitRejection,
    pub token: String,
}

/// An attempt that passed every check and is "in flight"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedSubmission {
    pub submission: ContactSubmission,
    pub accepted_at_ms: u64,
}

/// What the page shows once the simulated send finishes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub token: String,
    pub notification: Notification,
}

impl AcceptedSubmission {
    /// When the simulated request should be considered done
    pub fn completes_at_ms(&self) -> u64 {
        self.accepted_at_ms + u64::from(SUBMIT_DELAY_MS)
    }

    /// Finish the simulated send: rotate the token and report success
    pub fn complete<S: TokenStore>(self, session: &mut SessionState<S>, now_ms: u64) -> Completion {
        let token = session.issue_token(now_ms);
        log::info!("Form submission completed");
        Completion {
            token,
            notification: Notification::success(
                "Message sent successfully! I'll get back to you soon.",
            ),
        }
    }
}

/// Submit button appearance while a send is pending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitButtonState {
    pub text_visible: bool,
    pub loader_visible: bool,
    pub disabled: bool,
}

impl SubmitButtonState {
    pub fn busy() -> Self {
        Self {
            text_visible: false,
            loader_visible: true,
            disabled: true,
        }
    }

    pub fn idle() -> Self {
        Self {
            text_visible: true,
            loader_visible: false,
            disabled: false,
        }
    }
}

fn email_pattern() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    CELL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email pattern"))
}

/// Loose `local@domain.tld` shape check
pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email).unwrap_or(false)
}

/// Length, email shape, and suspicious-content checks
pub fn validate(submission: &ContactSubmission) -> Result<(), SubmitRejection> {
    let name_len = submission.name.chars().count();
    if !NAME_LEN.contains(&name_len) {
        return Err(SubmitRejection::NameLength);
    }

    let message_len = submission.message.chars().count();
    if !MESSAGE_LEN.contains(&message_len) {
        return Err(SubmitRejection::MessageLength);
    }

    if !is_valid_email(&submission.email) {
        return Err(SubmitRejection::InvalidEmail);
    }

    let all_text = format!(
        "{} {} {}",
        submission.name, submission.email, submission.message
    );
    if contains_suspicious(&all_text) {
        log::warn!("Suspicious pattern detected in form data");
        return Err(SubmitRejection::SuspiciousContent);
    }

    Ok(())
}

fn checks<S: TokenStore>(
    session: &SessionState<S>,
    submission: &ContactSubmission,
    env: &SubmitEnv,
    now_ms: u64,
) -> Result<(), SubmitRejection> {
    if !env.secure_context {
        return Err(SubmitRejection::InsecureContext);
    }

    if !submission.website.trim().is_empty() {
        log::warn!("Bot detected via honeypot field");
        return Err(SubmitRejection::Honeypot);
    }

    if !session.verify_token(submission.csrf_token.as_deref()) {
        log::warn!("Form token validation failed");
        return Err(SubmitRejection::TokenMismatch);
    }

    if !session.rate_limiter.allows(now_ms) {
        return Err(SubmitRejection::RateLimited);
    }

    validate(submission)
}

/// Run every check against `submission`.
///
/// A rejection always rotates the token. Acceptance counts toward the rate
/// limit immediately; the token rotates on [`AcceptedSubmission::complete`].
pub fn evaluate<S: TokenStore>(
    session: &mut SessionState<S>,
    submission: &ContactSubmission,
    env: &SubmitEnv,
    now_ms: u64,
) -> Result<AcceptedSubmission, Rejected> {
    session.rate_limiter.maybe_reset(now_ms);

    match checks(session, submission, env, now_ms) {
        Ok(()) => {
            session.rate_limiter.record(now_ms);
            log::info!("Form submission initiated");
            Ok(AcceptedSubmission {
                submission: submission.clone(),
                accepted_at_ms: now_ms,
            })
        }
        Err(reason) => {
            let token = session.issue_token(now_ms);
            Err(Rejected { reason, token })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::MemoryTokenStore;
    use proptest::prelude::*;

    const T0: u64 = 1_700_000_000_000;

    fn session_with_token() -> (SessionState<MemoryTokenStore>, String) {
        let mut s = SessionState::new(MemoryTokenStore::default(), 7, T0);
        let token = s.issue_token(T0);
        (s, token)
    }

    fn good(token: &str) -> ContactSubmission {
        ContactSubmission {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            message: "I would like a portfolio site.".into(),
            website: String::new(),
            csrf_token: Some(token.to_string()),
        }
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("@b.co"));
    }

    #[test]
    fn test_name_boundaries() {
        let mut sub = good("t");
        for (len, ok) in [(1, false), (2, true), (100, true), (101, false)] {
            sub.name = "n".repeat(len);
            assert_eq!(validate(&sub).is_ok(), ok, "name length {}", len);
        }
    }

    #[test]
    fn test_name_length_counts_chars() {
        let mut sub = good("t");
        sub.name = "🦀".into();
        assert_eq!(validate(&sub), Err(SubmitRejection::NameLength));
        sub.name = "🦀🦀".into();
        assert!(validate(&sub).is_ok());
    }

    #[test]
    fn test_message_boundaries() {
        let mut sub = good("t");
        for (len, ok) in [(9, false), (10, true), (1000, true), (1001, false)] {
            sub.message = "m".repeat(len);
            assert_eq!(validate(&sub).is_ok(), ok, "message length {}", len);
        }
    }

    #[test]
    fn test_suspicious_content_rejected() {
        let mut sub = good("t");
        sub.message = "please eval(this) for me".into();
        assert_eq!(validate(&sub), Err(SubmitRejection::SuspiciousContent));
    }

    #[test]
    fn test_accept_then_complete_rotates_token() {
        let (mut s, token) = session_with_token();
        let accepted = evaluate(&mut s, &good(&token), &SubmitEnv::default(), T0).unwrap();
        assert_eq!(s.rate_limiter.count, 1);
        assert_eq!(accepted.completes_at_ms(), T0 + 2000);

        let done = accepted.complete(&mut s, T0 + 2000);
        assert_ne!(done.token, token);
        assert_eq!(s.stored_token(), Some(done.token));
        assert_eq!(
            done.notification.message,
            "Message sent successfully! I'll get back to you soon."
        );
    }

    #[test]
    fn test_honeypot_rejects_and_rotates() {
        let (mut s, token) = session_with_token();
        let mut sub = good(&token);
        sub.website = "http://spam.example".into();
        let rejected = evaluate(&mut s, &sub, &SubmitEnv::default(), T0).unwrap_err();
        assert_eq!(rejected.reason, SubmitRejection::Honeypot);
        assert_ne!(rejected.token, token);
        assert_eq!(s.rate_limiter.count, 0);
    }

    #[test]
    fn test_whitespace_honeypot_is_ignored() {
        let (mut s, token) = session_with_token();
        let mut sub = good(&token);
        sub.website = "   ".into();
        assert!(evaluate(&mut s, &sub, &SubmitEnv::default(), T0).is_ok());
    }

    #[test]
    fn test_token_mismatch() {
        let (mut s, token) = session_with_token();
        let sub = good("csrf_forged");
        let rejected = evaluate(&mut s, &sub, &SubmitEnv::default(), T0).unwrap_err();
        assert_eq!(rejected.reason, SubmitRejection::TokenMismatch);
        assert_ne!(rejected.token, token);
        assert_eq!(s.stored_token(), Some(rejected.token.clone()));
        assert_eq!(
            rejected.reason.to_string(),
            "Security token validation failed. Please refresh and try again."
        );
    }

    #[test]
    fn test_insecure_context_checked_first() {
        let (mut s, token) = session_with_token();
        let mut sub = good(&token);
        sub.website = "bot".into();
        let env = SubmitEnv {
            secure_context: false,
        };
        let rejected = evaluate(&mut s, &sub, &env, T0).unwrap_err();
        assert_eq!(rejected.reason, SubmitRejection::InsecureContext);
    }

    #[test]
    fn test_rate_limit_after_five() {
        let (mut s, mut token) = session_with_token();
        let mut now = T0;
        for _ in 0..5 {
            let accepted = evaluate(&mut s, &good(&token), &SubmitEnv::default(), now).unwrap();
            token = accepted.complete(&mut s, now).token;
            now += 31_000;
        }
        let rejected = evaluate(&mut s, &good(&token), &SubmitEnv::default(), now).unwrap_err();
        assert_eq!(rejected.reason, SubmitRejection::RateLimited);
        assert_ne!(rejected.token, token);
    }

    #[test]
    fn test_too_soon_after_previous() {
        let (mut s, token) = session_with_token();
        let accepted = evaluate(&mut s, &good(&token), &SubmitEnv::default(), T0).unwrap();
        let token = accepted.complete(&mut s, T0 + 2000).token;
        let rejected =
            evaluate(&mut s, &good(&token), &SubmitEnv::default(), T0 + 10_000).unwrap_err();
        assert_eq!(rejected.reason, SubmitRejection::RateLimited);
    }

    proptest! {
        #[test]
        fn prop_name_length_bounds(len in 0usize..200) {
            let mut sub = good("t");
            sub.name = "é".repeat(len);
            let ok = validate(&sub).is_ok();
            prop_assert_eq!(ok, (2..=100).contains(&len));
        }
    }
}
