use std::collections::HashSet;

use super::models::ListingRecord;

/// Records from `new_records` whose id does not appear in `old_records`, in scrape order.
pub fn find_new(old_records: &[ListingRecord], new_records: &[ListingRecord]) -> Vec<ListingRecord> {
    let seen: HashSet<Option<&str>> = old_records.iter().map(ListingRecord::id).collect();

    new_records
        .iter()
        .filter(|record| !seen.contains(&record.id()))
        .cloned()
        .collect()
}
