use uuid::Uuid;

use songsketch_shared::GalleryEntry;

/// In-memory gallery bookkeeping. Entries are kept oldest-first; listing
/// reverses so the newest drawing leads.
#[derive(Default)]
pub struct Gallery {
    entries: Vec<GalleryEntry>,
}

impl Gallery {
    pub fn from_entries(entries: Vec<GalleryEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[GalleryEntry] {
        &self.entries
    }

    pub fn newest_first(&self) -> Vec<GalleryEntry> {
        self.entries.iter().rev().cloned().collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// Append an entry, evicting the oldest past `limit`. The evicted
    /// entries are returned so the caller can drop their stored bitmaps.
    pub fn insert(&mut self, entry: GalleryEntry, limit: usize) -> Vec<GalleryEntry> {
        self.entries.push(entry);
        let overflow = self.entries.len().saturating_sub(limit);
        if overflow > 0 {
            self.entries.drain(0..overflow).collect()
        } else {
            Vec::new()
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<GalleryEntry> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Re-generation updated an entry's song; false when the entry is gone.
    pub fn set_track(&mut self, id: &str, track_id: &str, description: &str) -> bool {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) {
            entry.track_id = track_id.to_string();
            entry.description = description.to_string();
            true
        } else {
            false
        }
    }
}

pub fn new_entry_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn normalize_entry_id(value: &str) -> Option<String> {
    let parsed = Uuid::parse_str(value).ok()?;
    Some(parsed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str) -> GalleryEntry {
        GalleryEntry {
            id: id.to_string(),
            track_id: format!("track-{id}"),
            description: format!("drawing {id}"),
            created_at_ms: 0,
        }
    }

    #[test]
    fn listing_is_newest_first() {
        let mut gallery = Gallery::default();
        gallery.insert(entry("a"), 10);
        gallery.insert(entry("b"), 10);
        gallery.insert(entry("c"), 10);
        let ids: Vec<String> = gallery
            .newest_first()
            .into_iter()
            .map(|entry| entry.id)
            .collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn inserting_past_the_cap_evicts_the_oldest() {
        let mut gallery = Gallery::default();
        assert!(gallery.insert(entry("a"), 2).is_empty());
        assert!(gallery.insert(entry("b"), 2).is_empty());
        let evicted = gallery.insert(entry("c"), 2);
        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].id, "a");
        assert!(!gallery.contains("a"));
        assert!(gallery.contains("b") && gallery.contains("c"));
    }

    #[test]
    fn removal_returns_the_entry_once() {
        let mut gallery = Gallery::default();
        gallery.insert(entry("a"), 10);
        let removed = gallery.remove("a").expect("removed");
        assert_eq!(removed.id, "a");
        assert!(gallery.remove("a").is_none());
    }

    #[test]
    fn set_track_updates_song_and_description() {
        let mut gallery = Gallery::default();
        gallery.insert(entry("a"), 10);
        assert!(gallery.set_track("a", "new-track", "a fresh take"));
        let updated = &gallery.entries()[0];
        assert_eq!(updated.track_id, "new-track");
        assert_eq!(updated.description, "a fresh take");
        assert!(!gallery.set_track("missing", "x", "y"));
    }

    #[test]
    fn entry_ids_are_valid_uuids() {
        let id = new_entry_id();
        assert_eq!(normalize_entry_id(&id), Some(id));
        assert!(normalize_entry_id("not-a-uuid").is_none());
        assert!(normalize_entry_id("../etc/passwd").is_none());
    }
}
