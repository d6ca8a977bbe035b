use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::validation::ValidationError;

/// A developer profile as the backend serializes it.
///
/// The same shape is used for the signed-in account, feed candidates and
/// accepted connections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(rename = "emailId", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "photoURL", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl Profile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .take(1)
            .chain(self.last_name.chars().take(1))
            .collect()
    }

    /// "29, Female" style subtitle; only shown when both parts are known.
    pub fn age_gender_line(&self) -> Option<String> {
        match (self.age, self.gender.as_deref()) {
            (Some(age), Some(gender)) if !gender.is_empty() => Some(format!("{age}, {gender}")),
            _ => None,
        }
    }
}

pub type User = Profile;
pub type FeedEntry = Profile;
pub type Connection = Profile;

/// A pending request addressed to the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRequest {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "fromUserid", default)]
    pub from_user: Option<Profile>,
    #[serde(rename = "toUserid", default, skip_serializing_if = "Option::is_none")]
    pub to_user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Outcome a user attaches to a feed candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SendStatus {
    Interested,
    Ignored,
}

impl SendStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Interested => "interested",
            Self::Ignored => "ignored",
        }
    }
}

impl FromStr for SendStatus {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "interested" => Ok(Self::Interested),
            "ignored" => Ok(Self::Ignored),
            other => Err(ValidationError::InvalidStatus(other.to_string())),
        }
    }
}

/// Decision on an incoming request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewStatus {
    Accepted,
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for ReviewStatus {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            other => Err(ValidationError::InvalidStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn profile_reads_backend_field_names() {
        let profile: Profile = serde_json::from_value(serde_json::json!({
            "_id": "u1",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "photoURL": "https://img/ada.png",
            "age": 36,
            "gender": "Female",
            "about": "engines",
            "skills": ["math", "poetry"],
            "emailId": "ada@example.com"
        }))
        .unwrap();

        assert_eq!(profile.id, "u1");
        assert_eq!(profile.photo_url.as_deref(), Some("https://img/ada.png"));
        assert_eq!(profile.email.as_deref(), Some("ada@example.com"));
        assert_eq!(profile.skills, vec!["math", "poetry"]);
        assert_eq!(profile.age_gender_line().as_deref(), Some("36, Female"));
        assert_eq!(profile.initials(), "AL");
    }

    #[test]
    fn sparse_profile_uses_defaults() {
        let profile: Profile = serde_json::from_value(serde_json::json!({ "_id": "u2" })).unwrap();
        assert_eq!(profile.full_name(), "");
        assert!(profile.skills.is_empty());
        assert_eq!(profile.age_gender_line(), None);
    }

    #[test]
    fn request_keeps_nested_sender() {
        let request: ConnectionRequest = serde_json::from_value(serde_json::json!({
            "_id": "r1",
            "fromUserid": { "_id": "u9", "firstName": "Linus", "lastName": "T" },
            "toUserid": "me",
            "status": "interested"
        }))
        .unwrap();

        assert_eq!(request.from_user.map(|p| p.first_name), Some("Linus".to_string()));
        assert_eq!(request.to_user_id.as_deref(), Some("me"));
    }

    #[test]
    fn statuses_outside_the_closed_set_are_rejected() {
        assert_eq!("ignored".parse::<SendStatus>().unwrap(), SendStatus::Ignored);
        assert_eq!("accepted".parse::<ReviewStatus>().unwrap(), ReviewStatus::Accepted);
        assert!("accepted".parse::<SendStatus>().is_err());
        assert!("interested".parse::<ReviewStatus>().is_err());
        assert!(matches!(
            "Ignored".parse::<SendStatus>(),
            Err(ValidationError::InvalidStatus(value)) if value == "Ignored"
        ));
    }
}
