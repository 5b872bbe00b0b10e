//! Repositories, one per record type.

mod announcement;
mod complaint;
mod department_timetable;
mod lost_found;
mod personal_timetable;
mod user;

pub use announcement::{AnnouncementFilter, AnnouncementRepository};
pub use complaint::{ComplaintFilter, ComplaintRepository, StatusCount};
pub use department_timetable::{DepartmentTimetableFilter, DepartmentTimetableRepository};
pub use lost_found::{LostFoundFilter, LostFoundRepository};
pub use personal_timetable::PersonalTimetableRepository;
pub use user::UserRepository;

use sea_orm::{
    ColumnTrait, Condition,
    sea_query::{Alias, BinOper, Expr, Func, SimpleExpr},
};

/// Escape `%` and `_` and lowercase, for a case-insensitive `LIKE` substring match.
pub(crate) fn like_pattern(query: &str) -> String {
    let escaped = query
        .trim()
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Toggle `member` in a JSONB string-array column within the `UPDATE` itself:
/// removed when present, appended otherwise.
pub(crate) fn toggle_member<C: ColumnTrait>(column: C, member: &str) -> SimpleExpr {
    let element = || SimpleExpr::from(Func::cust(Alias::new("jsonb_build_array")).arg(member));

    Expr::case(
        Condition::all()
            .add(Expr::col(column).binary(BinOper::Custom("@>"), element())),
        Expr::col(column).binary(BinOper::Sub, member),
    )
    .finally(Expr::col(column).binary(BinOper::Custom("||"), element()))
    .into()
}
