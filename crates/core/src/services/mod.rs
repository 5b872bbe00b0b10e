//! Business logic services.

#![allow(missing_docs)]

pub mod access;
pub mod announcement;
pub mod complaint;
pub mod department_timetable;
pub mod lost_found;
pub mod timetable;
pub mod user;

pub use access::{Actor, Role};
pub use announcement::{
    AnnouncementService, CreateAnnouncementInput, LikeOutcome, ListAnnouncementsQuery,
    UpdateAnnouncementInput,
};
pub use complaint::{
    AddCommentInput, ComplaintService, ComplaintStats, CreateComplaintInput, ListComplaintsQuery,
    UpdateStatusInput, UpvoteOutcome,
};
pub use department_timetable::{
    CreateDepartmentTimetableInput, DaySchedule, DepartmentTimetableService,
    ListDepartmentTimetablesQuery, Period, UpdateDepartmentTimetableInput,
};
pub use lost_found::{
    ClaimOutcome, ContactInfo, CreateItemInput, ListItemsQuery, LostFoundService, UpdateItemInput,
};
pub use timetable::{
    ClassEntry, GridLayout, Schedule, ScheduleError, TimetableLayout, TimetableService, Weekday,
};
pub use user::{LoginInput, RegisterInput, UserService};
