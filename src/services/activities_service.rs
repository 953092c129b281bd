use thiserror::Error;
use tracing::{info, warn};

use crate::database::activity_directory::ActivityDirectory;
use crate::models::ActivityListing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActivityError {
    #[error("Activity not found")]
    NotFound,
    #[error("Student is already signed up for this activity")]
    AlreadyRegistered,
    #[error("Activity is full")]
    ActivityFull,
    #[error("Student is not registered for this activity")]
    NotRegistered,
}

pub fn list_activities(directory: &ActivityDirectory) -> ActivityListing {
    directory.snapshot()
}

/// Adds `email` to the end of the activity's roster. Membership and capacity
/// are checked under the activity lock, so concurrent signups cannot
/// overfill it.
pub fn signup(
    directory: &ActivityDirectory,
    activity_name: &str,
    email: &str,
) -> Result<String, ActivityError> {
    let slot = directory.find(activity_name).ok_or_else(|| {
        warn!(activity = %activity_name, "signup for unknown activity");
        ActivityError::NotFound
    })?;

    let mut activity = slot.lock();
    if activity.has_participant(email) {
        warn!(activity = %activity_name, email = %email, "already signed up");
        return Err(ActivityError::AlreadyRegistered);
    }
    if activity.is_full() {
        warn!(
            activity = %activity_name,
            max = activity.max_participants,
            "activity full"
        );
        return Err(ActivityError::ActivityFull);
    }
    activity.participants.push(email.to_string());
    info!(
        activity = %activity_name,
        email = %email,
        participants = activity.participants.len(),
        "signed up"
    );

    Ok(format!("Signed up {} for {}", email, activity_name))
}

pub fn unregister(
    directory: &ActivityDirectory,
    activity_name: &str,
    email: &str,
) -> Result<String, ActivityError> {
    let slot = directory.find(activity_name).ok_or_else(|| {
        warn!(activity = %activity_name, "unregister from unknown activity");
        ActivityError::NotFound
    })?;

    let mut activity = slot.lock();
    let Some(idx) = activity.participants.iter().position(|p| p == email) else {
        warn!(activity = %activity_name, email = %email, "not registered");
        return Err(ActivityError::NotRegistered);
    };
    activity.participants.remove(idx);
    info!(
        activity = %activity_name,
        email = %email,
        participants = activity.participants.len(),
        "unregistered"
    );

    Ok(format!("Unregistered {} from {}", email, activity_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::catalog::default_catalog;

    fn directory() -> ActivityDirectory {
        ActivityDirectory::new(default_catalog())
    }

    fn roster(dir: &ActivityDirectory, name: &str) -> Vec<String> {
        dir.find(name).unwrap().lock().participants.clone()
    }

    #[test]
    fn signup_appends_and_reports() {
        let dir = directory();
        let msg = signup(&dir, "Chess Club", "new@mergington.edu").unwrap();
        assert!(msg.contains("new@mergington.edu"));
        assert!(msg.contains("Chess Club"));
        assert_eq!(
            roster(&dir, "Chess Club").last().map(String::as_str),
            Some("new@mergington.edu")
        );
    }

    #[test]
    fn unknown_activity_is_not_found() {
        let dir = directory();
        assert_eq!(
            signup(&dir, "NonExistent Club", "a@mergington.edu"),
            Err(ActivityError::NotFound)
        );
        assert_eq!(
            unregister(&dir, "NonExistent Club", "a@mergington.edu"),
            Err(ActivityError::NotFound)
        );
    }

    #[test]
    fn duplicate_wins_over_full() {
        let dir = directory();
        for i in 2..12 {
            signup(&dir, "Chess Club", &format!("student{i}@mergington.edu")).unwrap();
        }
        assert_eq!(
            signup(&dir, "Chess Club", "michael@mergington.edu"),
            Err(ActivityError::AlreadyRegistered)
        );
        assert_eq!(
            signup(&dir, "Chess Club", "overflow@mergington.edu"),
            Err(ActivityError::ActivityFull)
        );
        assert_eq!(roster(&dir, "Chess Club").len(), 12);
    }

    #[test]
    fn unregister_twice() {
        let dir = directory();
        unregister(&dir, "Chess Club", "michael@mergington.edu").unwrap();
        assert_eq!(
            unregister(&dir, "Chess Club", "michael@mergington.edu"),
            Err(ActivityError::NotRegistered)
        );
    }

    #[test]
    fn signup_then_unregister_restores_roster() {
        let dir = directory();
        let before = roster(&dir, "Drama Club");
        signup(&dir, "Drama Club", "workflow@mergington.edu").unwrap();
        unregister(&dir, "Drama Club", "workflow@mergington.edu").unwrap();
        assert_eq!(roster(&dir, "Drama Club"), before);
    }

    #[test]
    fn unregister_keeps_order_of_the_rest() {
        let dir = directory();
        signup(&dir, "Art Club", "x@mergington.edu").unwrap();
        unregister(&dir, "Art Club", "mia@mergington.edu").unwrap();
        assert_eq!(
            roster(&dir, "Art Club"),
            vec!["charlotte@mergington.edu", "x@mergington.edu"]
        );
    }

    #[test]
    fn activities_are_independent() {
        let dir = directory();
        let gym = roster(&dir, "Gym Class");
        signup(&dir, "Chess Club", "john@mergington.edu").unwrap();
        assert_eq!(roster(&dir, "Gym Class"), gym);
        assert!(list_activities(&dir)
            .get("Chess Club")
            .unwrap()
            .has_participant("john@mergington.edu"));
    }

    #[test]
    fn email_match_is_exact() {
        let dir = directory();
        signup(&dir, "Chess Club", "Michael@mergington.edu").unwrap();
        assert_eq!(
            unregister(&dir, "Chess Club", " michael@mergington.edu"),
            Err(ActivityError::NotRegistered)
        );
    }
}
