//! The recently-used text colors preference.
//!
//! The color picker remembers the last three custom colors across compose
//! sessions, stored in the host's key/value preference store as a JSON array
//! of hex strings, most recent first, de-duplicated. Corrupt stored data is
//! logged and treated as an empty list; the picker never crashes on it.

use compose_core::PreferenceStore;

/// Preference key the color list is stored under.
pub const RECENT_COLORS_KEY: &str = "recentTextColors";

/// Maximum number of remembered colors.
pub const MAX_RECENT_COLORS: usize = 3;

/// Load the remembered colors, most recent first.
pub fn load_recent_colors(store: &dyn PreferenceStore) -> Vec<String> {
    let Some(raw) = store.get(RECENT_COLORS_KEY) else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<String>>(&raw) {
        Ok(mut colors) => {
            colors.truncate(MAX_RECENT_COLORS);
            colors
        }
        Err(err) => {
            log::warn!("discarding corrupt {} data: {}", RECENT_COLORS_KEY, err);
            Vec::new()
        }
    }
}

/// Remember a newly used color at the front of the list.
///
/// Read-modify-write with last-writer-wins; the single-tab host assumption
/// makes that acceptable.
pub fn remember_color(store: &mut dyn PreferenceStore, color: &str) {
    let mut colors = load_recent_colors(store);
    colors.retain(|existing| existing != color);
    colors.insert(0, color.to_string());
    colors.truncate(MAX_RECENT_COLORS);

    match serde_json::to_string(&colors) {
        Ok(json) => store.set(RECENT_COLORS_KEY, json),
        Err(err) => log::warn!("failed to encode {}: {}", RECENT_COLORS_KEY, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compose_core::MemoryPreferences;

    #[test]
    fn test_most_recent_first_capped_at_three() {
        // Most-recent-first, capped at three, de-duplicated.
        let mut prefs = MemoryPreferences::new();
        assert!(load_recent_colors(&prefs).is_empty());

        remember_color(&mut prefs, "#ff0000");
        remember_color(&mut prefs, "#00ff00");
        remember_color(&mut prefs, "#0000ff");
        remember_color(&mut prefs, "#123456");

        assert_eq!(
            load_recent_colors(&prefs),
            vec!["#123456", "#0000ff", "#00ff00"]
        );
    }

    #[test]
    fn test_reused_color_moves_to_front_without_duplicate() {
        let mut prefs = MemoryPreferences::new();
        remember_color(&mut prefs, "#ff0000");
        remember_color(&mut prefs, "#00ff00");
        remember_color(&mut prefs, "#ff0000");

        assert_eq!(load_recent_colors(&prefs), vec!["#ff0000", "#00ff00"]);
    }

    #[test]
    fn test_corrupt_json_degrades_to_empty() {
        let mut prefs = MemoryPreferences::new();
        prefs.set(RECENT_COLORS_KEY, String::from("{not json"));
        assert!(load_recent_colors(&prefs).is_empty());

        // And the store recovers on the next write.
        remember_color(&mut prefs, "#abcdef");
        assert_eq!(load_recent_colors(&prefs), vec!["#abcdef"]);
    }

    #[test]
    fn test_overlong_stored_list_is_truncated_on_load() {
        let mut prefs = MemoryPreferences::new();
        prefs.set(
            RECENT_COLORS_KEY,
            String::from(r##"["#1","#2","#3","#4","#5"]"##),
        );
        assert_eq!(load_recent_colors(&prefs).len(), MAX_RECENT_COLORS);
    }
}
