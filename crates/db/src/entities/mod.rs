//! Database entities.

#![allow(missing_docs)]

pub mod announcement;
pub mod complaint;
pub mod complaint_comment;
pub mod department_timetable;
pub mod lost_found_item;
pub mod personal_timetable;
pub mod user;

pub use announcement::Entity as Announcement;
pub use complaint::Entity as Complaint;
pub use complaint_comment::Entity as ComplaintComment;
pub use department_timetable::Entity as DepartmentTimetable;
pub use lost_found_item::Entity as LostFoundItem;
pub use personal_timetable::Entity as PersonalTimetable;
pub use user::Entity as User;
