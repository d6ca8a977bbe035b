//! Form state and the checks that run before anything reaches the network.

use serde::Serialize;

use crate::models::User;

pub const MIN_AGE: u32 = 18;
pub const MAX_AGE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("Age must be between 18 and 100")]
    AgeOutOfRange,
    #[error("unsupported status: {0}")]
    InvalidStatus(String),
}

/// Body of `POST /login`. The backend spells the password field `passWord`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    #[serde(rename = "passWord")]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(rename = "passWord")]
    pub password: String,
    pub gender: String,
}

impl SignupRequest {
    pub fn credentials(&self) -> Credentials {
        Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

/// Sparse update body: absent fields are left alone server-side.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<Credentials, ValidationError> {
        Ok(Credentials {
            email: required(&self.email, "Email")?,
            password: required_raw(&self.password, "Password")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub gender: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<SignupRequest, ValidationError> {
        let gender = required(&self.gender, "Gender")?;
        Ok(SignupRequest {
            first_name: required(&self.first_name, "First name")?,
            last_name: required(&self.last_name, "Last name")?,
            email: required(&self.email, "Email")?,
            password: required_raw(&self.password, "Password")?,
            gender,
        })
    }
}

/// Editable text fields of the profile screen. `skills` holds the
/// comma-separated form the user types.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub photo_url: String,
    pub age: String,
    pub gender: String,
    pub about: String,
    pub skills: String,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            photo_url: user.photo_url.clone().unwrap_or_default(),
            age: user.age.map(|age| age.to_string()).unwrap_or_default(),
            gender: user.gender.clone().unwrap_or_default(),
            about: user.about.clone().unwrap_or_default(),
            skills: user.skills.join(", "),
        }
    }

    pub fn validate(&self) -> Result<ProfilePatch, ValidationError> {
        let first_name = required(&self.first_name, "First name")?;
        let last_name = required(&self.last_name, "Last name")?;
        let age = parse_age(&self.age)?;
        let skills = parse_skills(&self.skills);

        Ok(ProfilePatch {
            first_name: Some(first_name),
            last_name: Some(last_name),
            photo_url: non_empty(&self.photo_url),
            age,
            gender: non_empty(&self.gender),
            about: non_empty(&self.about),
            skills: (!skills.is_empty()).then_some(skills),
        })
    }
}

/// Blank input means "not provided". Anything else must be a number in
/// `MIN_AGE..=MAX_AGE`; fractional input is truncated after the range check.
pub fn parse_age(raw: &str) -> Result<Option<u32>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let value: f64 = raw.parse().map_err(|_| ValidationError::AgeOutOfRange)?;
    if !value.is_finite() || value < f64::from(MIN_AGE) || value > f64::from(MAX_AGE) {
        return Err(ValidationError::AgeOutOfRange);
    }
    Ok(Some(value.trunc() as u32))
}

pub fn parse_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    non_empty(value).ok_or(ValidationError::Required(field))
}

// Passwords are sent as typed.
fn required_raw(value: &str, field: &'static str) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn form() -> ProfileForm {
        ProfileForm {
            first_name: " Grace ".to_string(),
            last_name: "Hopper".to_string(),
            ..ProfileForm::default()
        }
    }

    #[test]
    fn age_bounds_are_inclusive() {
        for accepted in ["18", "65", "100"] {
            assert!(parse_age(accepted).is_ok(), "{accepted} should pass");
        }
        for rejected in ["17", "101", "abc"] {
            assert_eq!(parse_age(rejected), Err(ValidationError::AgeOutOfRange));
        }
        assert_eq!(parse_age("  "), Ok(None));
        assert_eq!(parse_age("42.9"), Ok(Some(42)));
    }

    #[test]
    fn fractional_age_is_range_checked_before_truncation() {
        assert_eq!(parse_age("18.9"), Ok(Some(18)));
        assert_eq!(parse_age(" 100.0 "), Ok(Some(100)));
        for rejected in ["17.9", "100.5", "NaN", "inf", "1e3"] {
            assert_eq!(parse_age(rejected), Err(ValidationError::AgeOutOfRange));
        }
    }

    #[test]
    fn skills_are_trimmed_and_blank_tags_dropped() {
        assert_eq!(
            parse_skills(" rust, ,go ,, zig "),
            vec!["rust".to_string(), "go".to_string(), "zig".to_string()]
        );
        assert!(parse_skills(" , ").is_empty());
    }

    #[test]
    fn patch_contains_only_provided_fields() {
        let patch = form().validate().unwrap();
        let body = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "firstName": "Grace", "lastName": "Hopper" })
        );
    }

    #[test]
    fn full_patch_uses_backend_field_names() {
        let patch = ProfileForm {
            photo_url: "https://img/g.png ".to_string(),
            age: "85".to_string(),
            gender: "Female".to_string(),
            about: " compilers ".to_string(),
            skills: "cobol, flow-matic".to_string(),
            ..form()
        }
        .validate()
        .unwrap();

        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            serde_json::json!({
                "firstName": "Grace",
                "lastName": "Hopper",
                "photoURL": "https://img/g.png",
                "age": 85,
                "gender": "Female",
                "about": "compilers",
                "skills": ["cobol", "flow-matic"]
            })
        );
    }

    #[test]
    fn names_are_checked_before_age() {
        let missing_last = ProfileForm {
            last_name: "  ".to_string(),
            age: "7".to_string(),
            ..form()
        };
        assert_eq!(
            missing_last.validate(),
            Err(ValidationError::Required("Last name"))
        );
        assert_eq!(
            ValidationError::Required("Last name").to_string(),
            "Last name is required"
        );
    }

    #[test]
    fn signup_requires_gender_first() {
        let form = SignupForm {
            email: "a@b.c".to_string(),
            password: "pw".to_string(),
            ..SignupForm::default()
        };
        assert_eq!(form.validate(), Err(ValidationError::Required("Gender")));
        assert_eq!(
            ValidationError::Required("Gender").to_string(),
            "Gender is required"
        );
    }

    #[test]
    fn login_body_uses_backend_password_key() {
        let credentials = LoginForm {
            email: " dev@example.com ".to_string(),
            password: " secret".to_string(),
        }
        .validate()
        .unwrap();
        assert_eq!(
            serde_json::to_value(&credentials).unwrap(),
            serde_json::json!({ "email": "dev@example.com", "passWord": " secret" })
        );
        assert!(LoginForm::default().validate().is_err());
    }

    #[test]
    fn form_round_trips_user_fields() {
        let user = User {
            id: "u1".to_string(),
            first_name: "Ada".to_string(),
            last_name: "L".to_string(),
            email: None,
            photo_url: None,
            age: Some(36),
            gender: Some("Female".to_string()),
            about: None,
            skills: vec!["math".to_string(), "poetry".to_string()],
        };
        let form = ProfileForm::from_user(&user);
        assert_eq!(form.age, "36");
        assert_eq!(form.skills, "math, poetry");
    }
}
