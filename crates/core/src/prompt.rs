//! Illustration prompts for story pages.

use crate::model::{Level, Page};

/// Scene moods, picked cyclically by page.
pub const PAGE_MOODS: [&str; 10] = [
    "bright morning scene",
    "playful action scene",
    "focused searching scene",
    "surprised reaction scene",
    "happy sharing moment",
    "calm resting scene",
    "exciting adventure moment",
    "sunset soft light",
    "cozy close-up scene",
    "warm story ending scene",
];

#[must_use]
pub fn audience(level: Level) -> &'static str {
    match level {
        Level::Beginner => "very simple, clear shapes, for kids aged 4-6",
        Level::Intermediate => "slightly more detailed, for kids aged 7-9",
        Level::Advanced => "richer scenes with more details, for kids aged 9-11",
    }
}

#[must_use]
pub fn mood(page: Page) -> &'static str {
    PAGE_MOODS[page.index() % PAGE_MOODS.len()]
}

/// Builds the image-generation prompt for one page. Pure and deterministic.
#[must_use]
pub fn build_prompt(child_name: &str, level: Level, page: Page, sentence_text: &str) -> String {
    format!(
        "cute children's book illustration of a child named {child_name}, \
         in the story moment: {sentence_text}. \
         Show clearly the idea: '{sentence_text}' so kids can learn this English sentence. \
         Scene style: {mood}, {audience}, colorful, soft lines, no text, safe for children",
        mood = mood(page),
        audience = audience(level),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: u32) -> Page {
        Page::new(n).unwrap()
    }

    #[test]
    fn prompt_is_deterministic() {
        let a = build_prompt("Mira", Level::Beginner, page(1), "This is a cat.");
        let b = build_prompt("Mira", Level::Beginner, page(1), "This is a cat.");
        assert_eq!(a, b);
    }

    #[test]
    fn prompt_interpolates_all_parts() {
        let prompt = build_prompt("Mira", Level::Advanced, page(2), "The dog waited.");
        assert_eq!(
            prompt,
            "cute children's book illustration of a child named Mira, \
             in the story moment: The dog waited.. \
             Show clearly the idea: 'The dog waited.' so kids can learn this English sentence. \
             Scene style: playful action scene, richer scenes with more details, for kids aged 9-11, \
             colorful, soft lines, no text, safe for children"
        );
    }

    #[test]
    fn mood_cycles_with_the_list_length() {
        let n = u32::try_from(PAGE_MOODS.len()).unwrap();
        for k in 1..=n {
            assert_eq!(mood(page(k)), mood(page(k + n)));
            assert_eq!(
                build_prompt("Ada", Level::Beginner, page(k), "Hi."),
                build_prompt("Ada", Level::Beginner, page(k + n), "Hi."),
            );
        }
        assert_eq!(mood(page(1)), "bright morning scene");
        assert_eq!(mood(page(10)), "warm story ending scene");
    }

    #[test]
    fn audience_depends_on_level() {
        let beginner = build_prompt("Ada", Level::Beginner, page(1), "Hi.");
        let intermediate = build_prompt("Ada", Level::Intermediate, page(1), "Hi.");
        assert!(beginner.contains("aged 4-6"));
        assert!(intermediate.contains("aged 7-9"));
    }
}
