use std::collections::HashMap;

/// A story idea shown to visitors on the stories page.
#[derive(Debug)]
pub struct StoryEntry {
    pub slug: &'static str,
    pub title: &'static str,
    pub short: &'static str,
    pub paragraphs: &'static [&'static str],
    pub tags: &'static [&'static str],
}

const STORIES: &[StoryEntry] = &[
    StoryEntry {
        slug: "papa-beta-aur-ek-sapna",
        title: "Papa, Beta aur Ek Sapna",
        short: "A father silently sacrificing his dreams so his son can chase his own.",
        paragraphs: &[
            "A middle-class father works extra hours so his son can study in a better school.",
            "One day, the son discovers his father’s old sketchbook and realises how much he sacrificed.",
            "Their emotional conversation shows how fear and expectations shape our dreams.",
        ],
        tags: &["Family", "Emotional", "Drama"],
    },
    StoryEntry {
        slug: "deadline",
        title: "Deadline",
        short: "A young professional stuck between office targets and mental peace.",
        paragraphs: &[
            "A new office employee keeps chasing deadlines and forgetting himself.",
            "One missed call changes everything and forces him to rethink life.",
            "A story about burnout, pressure and rediscovering balance.",
        ],
        tags: &["Corporate", "Mental Health"],
    },
    StoryEntry {
        slug: "last-bench",
        title: "Last Bench",
        short: "School memories and friendships we lose touch with.",
        paragraphs: &[
            "A school reunion triggers memories of old friends and moments.",
            "Old photos make him question why people drift apart.",
            "He finally sends a message that he kept unsent for years.",
        ],
        tags: &["Friendship", "Nostalgia"],
    },
    StoryEntry {
        slug: "parallel-festival",
        title: "Parallel Festival",
        short: "What if festivals were celebrated differently in another world?",
        paragraphs: &[
            "Two parallel versions of a family celebrate the same festival.",
            "One rich, one struggling — but love decides happiness, not money.",
        ],
        tags: &["Fantasy", "Emotion"],
    },
    StoryEntry {
        slug: "unsent-messages",
        title: "Unsent Messages",
        short: "The things we type but never send.",
        paragraphs: &[
            "A character writes emotional messages but never sends them.",
            "One night all drafts get sent accidentally — chaos begins.",
        ],
        tags: &["Drama", "Relationships"],
    },
    StoryEntry {
        slug: "invisible-hero",
        title: "Invisible Hero",
        short: "The unnoticed person in every family who keeps it together.",
        paragraphs: &[
            "Every family has someone who sacrifices without saying a word.",
            "A story told through the eyes of each family member.",
        ],
        tags: &["Family", "Slice of Life"],
    },
];

/// Immutable, slug-indexed view over the compiled-in stories.
#[derive(Debug)]
pub struct StoryCatalog {
    entries: &'static [StoryEntry],
    by_slug: HashMap<&'static str, usize>,
}

impl StoryCatalog {
    pub fn builtin() -> Self {
        Self::from_entries(STORIES)
    }

    fn from_entries(entries: &'static [StoryEntry]) -> Self {
        let by_slug = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (entry.slug, idx))
            .collect();

        Self { entries, by_slug }
    }

    /// Stories in display order.
    pub fn entries(&self) -> &[StoryEntry] {
        self.entries
    }

    pub fn get(&self, slug: &str) -> Option<&StoryEntry> {
        self.by_slug.get(slug).map(|&idx| &self.entries[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_are_unique() {
        let catalog = StoryCatalog::builtin();
        assert_eq!(catalog.by_slug.len(), catalog.entries().len());
    }

    #[test]
    fn looks_up_by_slug() {
        let catalog = StoryCatalog::builtin();
        let story = catalog.get("deadline").expect("deadline story");

        assert_eq!(story.title, "Deadline");
        assert_eq!(story.paragraphs.len(), 3);
        assert!(story.tags.contains(&"Mental Health"));
    }

    #[test]
    fn unknown_slug_is_absent() {
        let catalog = StoryCatalog::builtin();
        assert!(catalog.get("does-not-exist").is_none());
        assert!(catalog.get("").is_none());
    }

    #[test]
    fn story_text_is_kept_verbatim() {
        let catalog = StoryCatalog::builtin();
        let text = |slug: &str| catalog.get(slug).expect(slug).paragraphs.join(" ");

        assert!(text("papa-beta-aur-ek-sapna").contains("his father’s old sketchbook"));
        assert!(text("parallel-festival").contains("One rich, one struggling — but love decides"));
        assert!(text("unsent-messages").contains("sent accidentally — chaos begins."));
    }

    #[test]
    fn keeps_display_order() {
        let catalog = StoryCatalog::builtin();
        let slugs: Vec<&str> = catalog.entries().iter().map(|entry| entry.slug).collect();
        assert_eq!(slugs.first(), Some(&"papa-beta-aur-ek-sapna"));
        assert_eq!(slugs.last(), Some(&"invisible-hero"));
    }
}
