use serde::{Deserialize, Serialize};

/// Author of a transcript entry. The string forms double as the role names the
/// Gemini API expects in `contents`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }

    pub fn is_user(self) -> bool {
        self == Role::User
    }

    pub fn is_model(self) -> bool {
        self == Role::Model
    }
}

impl AsRef<str> for Role {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<&str> for Role {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Role::User),
            "model" => Ok(Role::Model),
            _ => Err(format!("invalid message role: {value}")),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_string()
    }
}

impl Message {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, text)
    }

    pub fn is_user(&self) -> bool {
        self.role.is_user()
    }

    pub fn is_model(&self) -> bool {
        self.role.is_model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_roles() {
        assert!(Message::user("hi").is_user());
        assert!(Message::model("hello").is_model());
        assert!(!Message::model("hello").is_user());
    }

    #[test]
    fn roles_use_api_names() {
        assert_eq!(Role::User.as_str(), "user");
        assert_eq!(Role::Model.as_str(), "model");
        assert_eq!(String::from(Role::Model), "model");
    }

    #[test]
    fn invalid_role_strings_are_rejected() {
        assert!(Role::try_from("assistant").is_err());
        assert_eq!(Role::try_from("user"), Ok(Role::User));
    }

    #[test]
    fn messages_serialize_with_string_roles() {
        let json = serde_json::to_string(&Message::model("ok")).expect("serialize");
        assert_eq!(json, r#"{"role":"model","text":"ok"}"#);
        let back: Message = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, Message::model("ok"));
    }
}
