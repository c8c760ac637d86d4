use lazy_static::lazy_static;
use regex::Regex;

use crate::auth::password::verify_password;
use crate::auth::repo::User;

pub const INVALID_CREDENTIALS: &str = "Incorrect email or password, try again.";
pub const ACCOUNT_EXISTS: &str = "An account with this email already exists.";

const PASSWORD_MISMATCH: &str = "Passwords do not match.";
const PWD_LEN_MSG: &str = "Password must be between 7 and 18 characters long.";
const EMAIL_LEN_MSG: &str = "Enter an E-mail between 5 and 30 characters long.";
const EMAIL_FORMAT_MSG: &str = "Enter a valid E-mail address.";
const NAME_LEN_MSG: &str = "Enter a name between 2 and 20 characters long.";
const NAME_CHARS_ONLY_MSG: &str = "Name must contain only letters.";
const PWD_LETTERS_NUMBERS_MSG: &str = "Password must include both letters and numbers.";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Signup validation chain. Checks run in a fixed order and stop at the
/// first failure; the returned message is shown to the user as-is.
///
/// Order: confirmation equality, password length, email length and shape,
/// first name length and letters-only, password letter+digit mix.
pub fn validate_signup(
    email: &str,
    first_name: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), &'static str> {
    if password != confirm_password {
        return Err(PASSWORD_MISMATCH);
    }
    if !(7..=18).contains(&password.len()) {
        return Err(PWD_LEN_MSG);
    }
    if !(5..=30).contains(&email.len()) {
        return Err(EMAIL_LEN_MSG);
    }
    if !is_valid_email(email) {
        return Err(EMAIL_FORMAT_MSG);
    }
    if !(2..=20).contains(&first_name.chars().count()) {
        return Err(NAME_LEN_MSG);
    }
    if !first_name.chars().all(|c| c.is_alphabetic()) {
        return Err(NAME_CHARS_ONLY_MSG);
    }
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(PWD_LETTERS_NUMBERS_MSG);
    }
    Ok(())
}

/// Credential check behind the throttle. An unknown email and a wrong
/// password are indistinguishable to the caller; only the stored-hash
/// parse failure is surfaced as an error.
pub fn credentials_match(user: Option<&User>, password: &str) -> anyhow::Result<bool> {
    match user {
        Some(u) => verify_password(password, &u.password_hash),
        None => Ok(false),
    }
}

/// Normalization applied to every email before lookup or storage.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn ok_signup() -> (&'static str, &'static str, &'static str, &'static str) {
        ("new@example.com", "New", "Newpassword1", "Newpassword1")
    }

    #[test]
    fn accepts_a_well_formed_signup() {
        let (email, name, pwd, confirm) = ok_signup();
        assert_eq!(validate_signup(email, name, pwd, confirm), Ok(()));
    }

    #[test]
    fn mismatched_confirmation_wins_over_everything_else() {
        // both passwords are also too short; the mismatch is reported first
        let err = validate_signup("x", "1", "a", "b").unwrap_err();
        assert_eq!(err, PASSWORD_MISMATCH);
    }

    #[test]
    fn password_length_is_checked_before_email() {
        let err = validate_signup("x", "New", "a1", "a1").unwrap_err();
        assert_eq!(err, PWD_LEN_MSG);
        let err = validate_signup("x", "New", "a".repeat(19).as_str(), "a".repeat(19).as_str())
            .unwrap_err();
        assert_eq!(err, PWD_LEN_MSG);
    }

    #[test]
    fn email_bounds_and_shape() {
        let err = validate_signup("a@b.", "New", "Newpassword1", "Newpassword1").unwrap_err();
        assert_eq!(err, EMAIL_LEN_MSG);
        let long = format!("{}@example.com", "a".repeat(30));
        let err = validate_signup(&long, "New", "Newpassword1", "Newpassword1").unwrap_err();
        assert_eq!(err, EMAIL_LEN_MSG);
        let err = validate_signup("not-an-email", "New", "Newpassword1", "Newpassword1")
            .unwrap_err();
        assert_eq!(err, EMAIL_FORMAT_MSG);
    }

    #[test]
    fn first_name_must_be_short_and_alphabetic() {
        let err = validate_signup("new@example.com", "N", "Newpassword1", "Newpassword1")
            .unwrap_err();
        assert_eq!(err, NAME_LEN_MSG);
        let err = validate_signup("new@example.com", "New1", "Newpassword1", "Newpassword1")
            .unwrap_err();
        assert_eq!(err, NAME_CHARS_ONLY_MSG);
    }

    #[test]
    fn password_needs_a_letter_and_a_digit() {
        let err = validate_signup("new@example.com", "New", "lettersonly", "lettersonly")
            .unwrap_err();
        assert_eq!(err, PWD_LETTERS_NUMBERS_MSG);
        let err = validate_signup("new@example.com", "New", "12345678", "12345678").unwrap_err();
        assert_eq!(err, PWD_LETTERS_NUMBERS_MSG);
    }

    #[test]
    fn email_regex_basics() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a b@c.co"));
        assert!(!is_valid_email("a@b"));
    }

    #[test]
    fn normalize_lowercases_and_trims() {
        assert_eq!(normalize_email("  New@Example.COM "), "new@example.com");
    }

    fn user_with_password(plain: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: "new@example.com".into(),
            first_name: "New".into(),
            password_hash: hash_password(plain).unwrap(),
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn unknown_user_and_wrong_password_look_the_same() {
        let user = user_with_password("Newpassword1");
        let wrong = credentials_match(Some(&user), "Wrongpassword1").unwrap();
        let missing = credentials_match(None, "Newpassword1").unwrap();
        assert_eq!(wrong, missing);
        assert!(!wrong);
    }

    #[test]
    fn matching_credentials_pass() {
        let user = user_with_password("Newpassword1");
        assert!(credentials_match(Some(&user), "Newpassword1").unwrap());
    }
}
