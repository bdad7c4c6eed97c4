use serde::{Deserialize, Serialize};

/// One animal as listed on the shelter page.
///
/// Identity across snapshots is `id` alone; every other field is informational and
/// may change between runs without the record counting as new.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub sex: Option<String>,
    pub breed: Option<String>,
    pub age: Option<String>,
    pub location: Option<String>,
    pub photo_url: Option<String>,
    pub profile_url: Option<String>,
}

impl ListingRecord {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
