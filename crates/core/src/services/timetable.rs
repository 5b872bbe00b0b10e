//! Personal timetables: schedule validation, storage and grid layout.

use std::{fmt, sync::LazyLock};

use campus_common::{AppError, AppResult, IdGenerator, config::TimetableConfig};
use campus_db::repositories::PersonalTimetableRepository;
use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// `H:MM` or `HH:MM`, hour 0-23.
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^([0-1]?[0-9]|2[0-3]):([0-5][0-9])$").unwrap()
});

static COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap()
});

const SUBJECT_MAX: usize = 100;
const INSTRUCTOR_MAX: usize = 100;
const ROOM_MAX: usize = 50;

/// Days a timetable covers. Lowercase names are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(alias = "monday")]
    Monday,
    #[serde(alias = "tuesday")]
    Tuesday,
    #[serde(alias = "wednesday")]
    Wednesday,
    #[serde(alias = "thursday")]
    Thursday,
    #[serde(alias = "friday")]
    Friday,
    #[serde(alias = "saturday")]
    Saturday,
}

impl Weekday {
    pub const ALL: [Self; 6] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One class in a weekday slot.
///
/// Fields default to empty so a missing field is reported against its day
/// instead of failing deserialization of the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClassEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub instructor: String,
    #[serde(default)]
    pub room: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub color: String,
}

/// A full week. Missing days deserialize as empty; unknown day keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Schedule {
    #[serde(default)]
    pub monday: Vec<ClassEntry>,
    #[serde(default)]
    pub tuesday: Vec<ClassEntry>,
    #[serde(default)]
    pub wednesday: Vec<ClassEntry>,
    #[serde(default)]
    pub thursday: Vec<ClassEntry>,
    #[serde(default)]
    pub friday: Vec<ClassEntry>,
    #[serde(default)]
    pub saturday: Vec<ClassEntry>,
}

/// First problem found in a submitted schedule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("{day}: class {position} is missing {field}")]
    MissingField {
        day: Weekday,
        position: usize,
        field: &'static str,
    },

    #[error("{day}: class {position} {field} cannot exceed {max} characters")]
    TooLong {
        day: Weekday,
        position: usize,
        field: &'static str,
        max: usize,
    },

    #[error("{day}: class {position} has invalid {field} '{value}' (expected HH:MM)")]
    InvalidTime {
        day: Weekday,
        position: usize,
        field: &'static str,
        value: String,
    },

    #[error("{day}: class {position} has invalid color '{value}' (expected #RRGGBB)")]
    InvalidColor {
        day: Weekday,
        position: usize,
        value: String,
    },

    #[error("{day}: class {position} must end after it starts ({start}-{end})")]
    EndNotAfterStart {
        day: Weekday,
        position: usize,
        start: String,
        end: String,
    },
}

impl ScheduleError {
    #[must_use]
    pub const fn day(&self) -> Weekday {
        match self {
            Self::MissingField { day, .. }
            | Self::TooLong { day, .. }
            | Self::InvalidTime { day, .. }
            | Self::InvalidColor { day, .. }
            | Self::EndNotAfterStart { day, .. } => *day,
        }
    }
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Minutes since midnight for a `H:MM`/`HH:MM` string.
#[must_use]
pub fn parse_time(value: &str) -> Option<u32> {
    let caps = TIME_RE.captures(value)?;
    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps[2].parse().ok()?;
    Some(hour * 60 + minute)
}

impl Schedule {
    /// Entries of one day.
    #[must_use]
    pub fn day(&self, day: Weekday) -> &[ClassEntry] {
        match day {
            Weekday::Monday => &self.monday,
            Weekday::Tuesday => &self.tuesday,
            Weekday::Wednesday => &self.wednesday,
            Weekday::Thursday => &self.thursday,
            Weekday::Friday => &self.friday,
            Weekday::Saturday => &self.saturday,
        }
    }

    fn day_mut(&mut self, day: Weekday) -> &mut Vec<ClassEntry> {
        match day {
            Weekday::Monday => &mut self.monday,
            Weekday::Tuesday => &mut self.tuesday,
            Weekday::Wednesday => &mut self.wednesday,
            Weekday::Thursday => &mut self.thursday,
            Weekday::Friday => &mut self.friday,
            Weekday::Saturday => &mut self.saturday,
        }
    }

    /// Total number of classes in the week.
    #[must_use]
    pub fn len(&self) -> usize {
        Weekday::ALL.iter().map(|d| self.day(*d).len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Trim every field, fill in missing entry IDs and check the week in day
    /// order. Returns the first problem found.
    pub fn normalize(mut self, id_gen: &IdGenerator) -> Result<Self, ScheduleError> {
        for day in Weekday::ALL {
            for (index, entry) in self.day_mut(day).iter_mut().enumerate() {
                normalize_entry(entry, day, index + 1, id_gen)?;
            }
        }
        Ok(self)
    }
}

fn normalize_entry(
    entry: &mut ClassEntry,
    day: Weekday,
    position: usize,
    id_gen: &IdGenerator,
) -> Result<(), ScheduleError> {
    for value in [
        &mut entry.id,
        &mut entry.subject,
        &mut entry.instructor,
        &mut entry.room,
        &mut entry.start_time,
        &mut entry.end_time,
        &mut entry.color,
    ] {
        *value = value.trim().to_string();
    }

    if entry.id.is_empty() {
        entry.id = id_gen.generate();
    }

    for (field, value, max) in [
        ("subject", &entry.subject, SUBJECT_MAX),
        ("instructor", &entry.instructor, INSTRUCTOR_MAX),
        ("room", &entry.room, ROOM_MAX),
    ] {
        if value.is_empty() {
            return Err(ScheduleError::MissingField {
                day,
                position,
                field,
            });
        }
        if value.chars().count() > max {
            return Err(ScheduleError::TooLong {
                day,
                position,
                field,
                max,
            });
        }
    }

    let mut minutes = [0_u32; 2];
    for (slot, (field, value)) in [("startTime", &entry.start_time), ("endTime", &entry.end_time)]
        .into_iter()
        .enumerate()
    {
        if value.is_empty() {
            return Err(ScheduleError::MissingField {
                day,
                position,
                field,
            });
        }
        minutes[slot] = parse_time(value).ok_or_else(|| ScheduleError::InvalidTime {
            day,
            position,
            field,
            value: value.clone(),
        })?;
    }

    if entry.color.is_empty() {
        return Err(ScheduleError::MissingField {
            day,
            position,
            field: "color",
        });
    }
    if !COLOR_RE.is_match(&entry.color) {
        return Err(ScheduleError::InvalidColor {
            day,
            position,
            value: entry.color.clone(),
        });
    }

    if minutes[0] >= minutes[1] {
        return Err(ScheduleError::EndNotAfterStart {
            day,
            position,
            start: entry.start_time.clone(),
            end: entry.end_time.clone(),
        });
    }

    Ok(())
}

/// Grid geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableLayout {
    pub base_hour: u32,
    pub pixels_per_hour: u32,
    pub min_height: u32,
}

impl Default for TimetableLayout {
    fn default() -> Self {
        Self::from(TimetableConfig::default())
    }
}

impl From<TimetableConfig> for TimetableLayout {
    fn from(config: TimetableConfig) -> Self {
        Self {
            base_hour: config.base_hour,
            pixels_per_hour: config.pixels_per_hour,
            min_height: config.min_height,
        }
    }
}

/// Vertical placement of one block, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Block {
    pub top: u32,
    pub height: u32,
}

/// A class with its grid placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionedEntry {
    #[serde(flatten)]
    pub entry: ClassEntry,
    pub top: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayLayout {
    pub day: Weekday,
    pub entries: Vec<PositionedEntry>,
}

/// Positioned week, plus the geometry it was computed with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLayout {
    #[serde(flatten)]
    pub geometry: TimetableLayout,
    pub days: Vec<DayLayout>,
}

impl TimetableLayout {
    /// Pixel offset of a time of day from the grid start; earlier times clamp to 0.
    #[must_use]
    pub const fn offset(&self, minutes: u32) -> u32 {
        minutes.saturating_sub(self.base_hour * 60) * self.pixels_per_hour / 60
    }

    /// Place a class spanning `start..end` (minutes since midnight).
    ///
    /// Overlapping classes get overlapping blocks.
    #[must_use]
    pub fn place(&self, start: u32, end: u32) -> Block {
        let top = self.offset(start);
        let bottom = self.offset(end);
        Block {
            top,
            height: bottom.saturating_sub(top).max(self.min_height),
        }
    }

    /// Place a class given its `HH:MM` bounds.
    #[must_use]
    pub fn place_times(&self, start: &str, end: &str) -> Option<Block> {
        Some(self.place(parse_time(start)?, parse_time(end)?))
    }

    /// Position every entry of one day, keeping their order.
    #[must_use]
    pub fn layout_day(&self, day: Weekday, entries: &[ClassEntry]) -> DayLayout {
        let entries = entries
            .iter()
            .filter_map(|entry| {
                let Some(block) = self.place_times(&entry.start_time, &entry.end_time) else {
                    warn!(day = %day, entry_id = %entry.id, "Skipping class with unparsable times");
                    return None;
                };
                Some(PositionedEntry {
                    entry: entry.clone(),
                    top: block.top,
                    height: block.height,
                })
            })
            .collect();
        DayLayout { day, entries }
    }

    #[must_use]
    pub fn layout_week(&self, schedule: &Schedule) -> GridLayout {
        GridLayout {
            geometry: *self,
            days: Weekday::ALL
                .iter()
                .map(|day| self.layout_day(*day, schedule.day(*day)))
                .collect(),
        }
    }
}

/// Service for personal timetables. Every operation acts on the caller's own row.
#[derive(Clone)]
pub struct TimetableService {
    timetable_repo: PersonalTimetableRepository,
    id_gen: IdGenerator,
    layout: TimetableLayout,
}

impl TimetableService {
    #[must_use]
    pub const fn new(timetable_repo: PersonalTimetableRepository, layout: TimetableLayout) -> Self {
        Self {
            timetable_repo,
            id_gen: IdGenerator::new(),
            layout,
        }
    }

    /// Stored schedule, or an empty week. Nothing is persisted on read.
    pub async fn get(&self, user_id: &str) -> AppResult<Schedule> {
        let Some(stored) = self.timetable_repo.find_by_user(user_id).await? else {
            return Ok(Schedule::default());
        };

        serde_json::from_value(stored.schedule).map_err(|e| {
            AppError::Internal(format!("Stored timetable {} is malformed: {e}", stored.id))
        })
    }

    /// Validate and fully replace the caller's schedule.
    ///
    /// Nothing is written unless the whole week is valid.
    pub async fn replace(&self, user_id: &str, schedule: Schedule) -> AppResult<Schedule> {
        let schedule = schedule.normalize(&self.id_gen)?;

        let json = serde_json::to_value(&schedule)
            .map_err(|e| AppError::Internal(format!("Failed to encode timetable: {e}")))?;
        self.timetable_repo
            .upsert(self.id_gen.generate(), user_id, json, Utc::now())
            .await?;

        info!(user_id = %user_id, classes = schedule.len(), "Personal timetable replaced");
        Ok(schedule)
    }

    /// Remove the caller's schedule. Deleting a missing schedule is not an error.
    pub async fn delete(&self, user_id: &str) -> AppResult<()> {
        if self.timetable_repo.delete_by_user(user_id).await? {
            info!(user_id = %user_id, "Personal timetable deleted");
        }
        Ok(())
    }

    /// Positioned grid for the caller's week.
    pub async fn layout(&self, user_id: &str) -> AppResult<GridLayout> {
        let schedule = self.get(user_id).await?;
        Ok(self.layout.layout_week(&schedule))
    }

    #[must_use]
    pub const fn geometry(&self) -> TimetableLayout {
        self.layout
    }
}
