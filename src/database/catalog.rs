use std::collections::HashSet;
use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{ActivityListing, Activity};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("activity '{0}' must allow at least one participant")]
    ZeroCapacity(String),
    #[error("activity '{activity}' lists {email} more than once")]
    DuplicateParticipant { activity: String, email: String },
    #[error("activity '{activity}' has {count} participants but room for {max}")]
    OverCapacity {
        activity: String,
        count: usize,
        max: usize,
    },
}

fn seed(
    name: &str,
    description: &str,
    schedule: &str,
    max_participants: usize,
    participants: [&str; 2],
) -> (String, Activity) {
    (
        name.to_string(),
        Activity {
            description: description.to_string(),
            schedule: schedule.to_string(),
            max_participants,
            participants: participants.iter().map(|p| p.to_string()).collect(),
        },
    )
}

/// Built-in catalog the directory starts from.
pub fn default_catalog() -> ActivityListing {
    ActivityListing {
        entries: vec![
            seed(
                "Chess Club",
                "Learn strategies and compete in chess tournaments",
                "Fridays, 3:30 PM - 5:00 PM",
                12,
                ["michael@mergington.edu", "daniel@mergington.edu"],
            ),
            seed(
                "Programming Class",
                "Learn programming fundamentals and build software projects",
                "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
                20,
                ["emma@mergington.edu", "sophia@mergington.edu"],
            ),
            seed(
                "Gym Class",
                "Physical education and sports activities",
                "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
                30,
                ["john@mergington.edu", "olivia@mergington.edu"],
            ),
            seed(
                "Soccer Team",
                "Join the school soccer team for practices and matches",
                "Tuesdays and Thursdays, 5:00 PM - 7:00 PM",
                25,
                ["liam@mergington.edu", "ava@mergington.edu"],
            ),
            seed(
                "Basketball Club",
                "Pickup games and skill development for basketball players",
                "Wednesdays and Fridays, 4:00 PM - 6:00 PM",
                20,
                ["noah@mergington.edu", "isabella@mergington.edu"],
            ),
            seed(
                "Art Club",
                "Explore drawing, painting, and mixed media projects",
                "Mondays, 3:30 PM - 5:00 PM",
                18,
                ["mia@mergington.edu", "charlotte@mergington.edu"],
            ),
            seed(
                "Drama Club",
                "Acting, stagecraft, and school theater productions",
                "Thursdays, 4:00 PM - 6:30 PM",
                30,
                ["amelia@mergington.edu", "harper@mergington.edu"],
            ),
            seed(
                "Science Olympiad",
                "Prepare for science competitions and hands-on challenges",
                "Wednesdays, 3:30 PM - 5:30 PM",
                24,
                ["lucas@mergington.edu", "grace@mergington.edu"],
            ),
            seed(
                "Debate Team",
                "Practice argumentation, public speaking, and competitive debates",
                "Fridays, 4:00 PM - 5:30 PM",
                16,
                ["henry@mergington.edu", "evelyn@mergington.edu"],
            ),
        ],
    }
}

/// Parses a catalog in the same shape `GET /activities` returns. Object key
/// order is kept as catalog order.
pub fn parse_catalog(raw: &str) -> Result<ActivityListing, CatalogError> {
    // serde_json's Map sorts its keys, so source order is read separately.
    let keys = object_keys_in_order(raw)?;
    let mut object: Map<String, Value> = serde_json::from_str(raw)?;

    let mut entries = Vec::with_capacity(keys.len());
    for name in keys {
        let Some(value) = object.remove(&name) else {
            continue;
        };
        let activity: Activity = serde_json::from_value(value)?;
        validate(&name, &activity)?;
        entries.push((name, activity));
    }
    Ok(ActivityListing { entries })
}

pub fn load_catalog(path: &Path) -> Result<ActivityListing, CatalogError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_catalog(&raw)
}

fn validate(name: &str, activity: &Activity) -> Result<(), CatalogError> {
    if activity.max_participants == 0 {
        return Err(CatalogError::ZeroCapacity(name.to_string()));
    }
    let mut seen = HashSet::new();
    for email in &activity.participants {
        if !seen.insert(email.as_str()) {
            return Err(CatalogError::DuplicateParticipant {
                activity: name.to_string(),
                email: email.clone(),
            });
        }
    }
    if activity.participants.len() > activity.max_participants {
        return Err(CatalogError::OverCapacity {
            activity: name.to_string(),
            count: activity.participants.len(),
            max: activity.max_participants,
        });
    }
    Ok(())
}

fn object_keys_in_order(raw: &str) -> Result<Vec<String>, CatalogError> {
    use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
    use std::fmt;

    struct KeyOrder;

    impl<'de> Visitor<'de> for KeyOrder {
        type Value = Vec<String>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a JSON object of activities")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut keys = Vec::new();
            while let Some(key) = access.next_key::<String>()? {
                access.next_value::<IgnoredAny>()?;
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
            Ok(keys)
        }
    }

    let mut de = serde_json::Deserializer::from_str(raw);
    Ok((&mut de).deserialize_map(KeyOrder)?)
}
