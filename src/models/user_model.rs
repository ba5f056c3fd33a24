use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[serde(alias = "salesperson")]
    Salesman,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Salesman => "salesman",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "salesman" | "salesperson" => Ok(Role::Salesman),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// A stored account. `password` holds the hash, never the plain text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub zone: String,
}

impl User {
    pub fn is_salesman(&self) -> bool {
        self.role == Role::Salesman
    }

    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            zone: self.zone.clone(),
        }
    }
}

/// User as returned by the API: everything but the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub zone: String,
}

#[derive(Debug, Deserialize)]
pub struct NewSeller {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub zone: String,
}

/// Admin edit of a salesperson. Missing or empty fields keep their value.
#[derive(Debug, Default, Deserialize)]
pub struct SellerPatch {
    pub name: Option<String>,
    pub zone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_accepts_both_spellings() {
        let r: Role = serde_json::from_str("\"salesperson\"").unwrap();
        assert_eq!(r, Role::Salesman);
        let r: Role = serde_json::from_str("\"salesman\"").unwrap();
        assert_eq!(r, Role::Salesman);
        assert_eq!(serde_json::to_string(&Role::Salesman).unwrap(), "\"salesman\"");
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_public_user_has_no_password() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Salesman A".into(),
            email: "salesA@crm.com".into(),
            password: "$argon2id$...".into(),
            role: Role::Salesman,
            zone: "Zone A".into(),
        };
        let json = serde_json::to_value(user.public()).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["zone"], "Zone A");
        assert_eq!(json["role"], "salesman");
    }
}
