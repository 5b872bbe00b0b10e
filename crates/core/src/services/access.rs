//! Role and ownership checks shared by every service.

use campus_common::{AppError, AppResult};
use campus_db::entities::{complaint, department_timetable, user};

pub use campus_db::entities::user::UserRole as Role;

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub role: Role,
}

impl Actor {
    #[must_use]
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Whether this actor submitted or owns a record.
    #[must_use]
    pub fn owns(&self, owner_id: &str) -> bool {
        self.id == owner_id
    }
}

impl From<&user::Model> for Actor {
    fn from(user: &user::Model) -> Self {
        Self::new(user.id.clone(), user.role)
    }
}

/// Fail with `Forbidden` unless the actor is an admin.
pub fn require_admin(actor: &Actor, action: &str) -> AppResult<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!("Admin access required to {action}")))
    }
}

/// Fail with `Forbidden` unless the actor owns the record or is an admin.
pub fn require_owner_or_admin(actor: &Actor, owner_id: &str, action: &str) -> AppResult<()> {
    if actor.owns(owner_id) || actor.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!("Not authorized to {action}")))
    }
}

/// Students only see their own complaints; admins see all.
#[must_use]
pub fn can_view_complaint(actor: &Actor, complaint: &complaint::Model) -> bool {
    actor.is_admin() || actor.owns(&complaint.submitted_by)
}

/// Students only see the timetables of their own department and year; admins see all.
#[must_use]
pub fn can_view_department_timetable(
    viewer: &user::Model,
    timetable: &department_timetable::Model,
) -> bool {
    viewer.is_admin()
        || (viewer.department.as_deref() == Some(timetable.department.as_str())
            && viewer.year == Some(timetable.year))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&Actor::new("a", Role::Admin), "publish").is_ok());
        assert!(matches!(
            require_admin(&Actor::new("s", Role::Student), "publish"),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_owner_or_admin() {
        let owner = Actor::new("u1", Role::Student);
        let other = Actor::new("u2", Role::Student);
        let admin = Actor::new("root", Role::Admin);

        assert!(require_owner_or_admin(&owner, "u1", "edit this item").is_ok());
        assert!(require_owner_or_admin(&admin, "u1", "edit this item").is_ok());

        let err = require_owner_or_admin(&other, "u1", "edit this item");
        match err {
            Err(AppError::Forbidden(msg)) => assert_eq!(msg, "Not authorized to edit this item"),
            _ => panic!("Expected Forbidden"),
        }
    }

    #[test]
    fn test_department_timetable_visibility() {
        use chrono::{Duration, Utc};

        let now = Utc::now();
        let timetable = department_timetable::Model {
            id: "dt1".to_string(),
            department: "CSE".to_string(),
            year: 2,
            semester: 3,
            section: "A".to_string(),
            academic_year: "2025-2026".to_string(),
            schedule: serde_json::json!([]),
            effective_from: now,
            effective_to: now + Duration::days(90),
            created_by: "root".to_string(),
            is_active: true,
            created_at: now,
            updated_at: None,
        };
        let viewer = |role, department: Option<&str>, year| user::Model {
            id: "u1".to_string(),
            email: "u1@campus.edu".to_string(),
            password_hash: String::new(),
            name: "U1".to_string(),
            role,
            phone: None,
            student_id: None,
            department: department.map(ToString::to_string),
            year,
            token: None,
            created_at: now,
            updated_at: None,
        };

        assert!(can_view_department_timetable(&viewer(Role::Student, Some("CSE"), Some(2)), &timetable));
        assert!(!can_view_department_timetable(&viewer(Role::Student, Some("CSE"), Some(3)), &timetable));
        assert!(!can_view_department_timetable(&viewer(Role::Student, Some("ECE"), Some(2)), &timetable));
        assert!(!can_view_department_timetable(&viewer(Role::Student, None, None), &timetable));
        assert!(can_view_department_timetable(&viewer(Role::Admin, None, None), &timetable));
    }
}
