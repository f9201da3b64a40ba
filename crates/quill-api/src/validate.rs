//! Form-input validation with user-facing messages. Messages are surfaced
//! verbatim by the template layer, so their wording is part of the contract.

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 10;
/// The legacy UI claimed a minimum of 8 while enforcing 3; here the enforced
/// bound matches the message.
pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 70;

/// Trim and validate a username. Returns the trimmed value alongside any
/// messages; matching is case-sensitive beyond the trim.
pub fn validate_username(raw: &str) -> (String, Vec<String>) {
    let username = raw.trim().to_string();
    let mut errors = Vec::new();

    if username.is_empty() {
        errors.push("Must provide a username".to_string());
        return (username, errors);
    }

    if username.len() < USERNAME_MIN {
        errors.push("Username must be at least 3 characters".to_string());
    }
    if username.len() > USERNAME_MAX {
        errors.push("Username cannot exceed 10 characters".to_string());
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
        errors.push("Username can only contain letters and numbers".to_string());
    }

    (username, errors)
}

pub fn validate_password(password: &str) -> Vec<String> {
    let mut errors = Vec::new();

    if password.is_empty() {
        errors.push("Must provide a password".to_string());
        return errors;
    }

    if password.len() < PASSWORD_MIN {
        errors.push("Password must be at least 8 characters".to_string());
    }
    if password.len() > PASSWORD_MAX {
        errors.push("Password cannot exceed 70 characters".to_string());
    }

    errors
}

/// Scrub and validate post fields. Both must be non-empty once tags are
/// stripped; returns the scrubbed values that get persisted.
pub fn validate_post_fields(title: &str, body: &str) -> Result<(String, String), Vec<String>> {
    let title = strip_tags(title);
    let body = strip_tags(body);

    let mut errors = Vec::new();
    if title.is_empty() {
        errors.push("A title is required".to_string());
    }
    if body.is_empty() {
        errors.push("Body content is required".to_string());
    }

    if errors.is_empty() {
        Ok((title, body))
    } else {
        Err(errors)
    }
}

/// Drop anything shaped like an HTML tag, then trim. Backs the
/// non-empty-after-sanitization rule only; rendering stored content safely
/// is the template layer's concern.
pub fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;

    for c in input.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }

    out.trim().to_string()
}
