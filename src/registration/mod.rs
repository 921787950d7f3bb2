mod tracker;

pub use tracker::PendingRegistrations;

use serenity::model::id::RoleId;

use crate::config::Config;

/// The closed set of roles a registrant can pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleChoice {
    Student,
    Professor,
}

impl RoleChoice {
    pub fn from_custom_id(custom_id: &str) -> Option<Self> {
        match custom_id {
            "wmi_role_student" => Some(Self::Student),
            "wmi_role_professor" => Some(Self::Professor),
            _ => None,
        }
    }

    pub fn custom_id(self) -> &'static str {
        match self {
            Self::Student => "wmi_role_student",
            Self::Professor => "wmi_role_professor",
        }
    }

    /// Label shown on the selection button and in audit messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Student => "🎓 MS1 - First Year Student",
            Self::Professor => "👩‍🏫 Faculty Professor",
        }
    }

    pub fn role_id(self, config: &Config) -> RoleId {
        match self {
            Self::Student => config.student_role_id,
            Self::Professor => config.professor_role_id,
        }
    }
}

/// Fields captured from the registration modal. Transient: lives only
/// between form submission and the role-button click.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub full_name: String,
    pub email: Option<String>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_ids_round_trip() {
        for choice in [RoleChoice::Student, RoleChoice::Professor] {
            assert_eq!(RoleChoice::from_custom_id(choice.custom_id()), Some(choice));
        }
    }

    #[test]
    fn unknown_custom_id_is_ignored() {
        assert_eq!(RoleChoice::from_custom_id("wmi_registration"), None);
        assert_eq!(RoleChoice::from_custom_id(""), None);
    }
}
