use chrono::{DateTime, Local, NaiveDate, Utc};
use uuid::Uuid;

use crate::models::attendance_model::{AttendanceRecord, STATUS_PRESENT};
use crate::store::Document;

/// Mark `user_id` present for the local calendar day of `now`.
///
/// Only the first login of a day is recorded; later calls that day return
/// `false` and leave the document untouched.
pub fn record_login_attendance(doc: &mut Document, user_id: Uuid, now: DateTime<Local>) -> bool {
    let day = now.date_naive();

    if find_record(doc, user_id, day).is_some() {
        return false;
    }

    doc.attendance.push(AttendanceRecord {
        id: Uuid::new_v4(),
        user_id,
        date: day,
        status: STATUS_PRESENT.to_string(),
        timestamp: now.with_timezone(&Utc),
    });
    log::info!("Attendance marked for {} on {}", user_id, day);
    true
}

pub fn find_record(doc: &Document, user_id: Uuid, day: NaiveDate) -> Option<&AttendanceRecord> {
    doc.attendance
        .iter()
        .find(|a| a.user_id == user_id && a.date == day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn morning() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_first_login_marks_present() {
        let mut doc = Document::default();
        let user = Uuid::new_v4();

        assert!(record_login_attendance(&mut doc, user, morning()));
        assert_eq!(doc.attendance.len(), 1);

        let record = &doc.attendance[0];
        assert_eq!(record.user_id, user);
        assert_eq!(record.status, "Present");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
    }

    #[test]
    fn test_second_login_same_day_is_noop() {
        let mut doc = Document::default();
        let user = Uuid::new_v4();
        let first = morning();

        record_login_attendance(&mut doc, user, first);
        assert!(!record_login_attendance(
            &mut doc,
            user,
            first + Duration::hours(3)
        ));

        assert_eq!(doc.attendance.len(), 1);
        assert_eq!(doc.attendance[0].timestamp, first.with_timezone(&Utc));
    }

    #[test]
    fn test_next_day_gets_new_record() {
        let mut doc = Document::default();
        let user = Uuid::new_v4();

        record_login_attendance(&mut doc, user, morning());
        assert!(record_login_attendance(
            &mut doc,
            user,
            morning() + Duration::days(1)
        ));
        assert_eq!(doc.attendance.len(), 2);
    }

    #[test]
    fn test_records_are_per_user() {
        let mut doc = Document::default();
        record_login_attendance(&mut doc, Uuid::new_v4(), morning());
        record_login_attendance(&mut doc, Uuid::new_v4(), morning());
        assert_eq!(doc.attendance.len(), 2);
    }
}
