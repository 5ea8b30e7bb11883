use serde::Serialize;
use story_core::model::{Level, OptionLabel, Page, Question, Sentence, SentenceId};

/// Who is reading and where, shown above every page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageHeader {
    pub child_name: String,
    pub level: Level,
    pub page: Page,
    /// Highest authored page for the level, when known.
    pub last_page: Option<Page>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizOptionView {
    pub label: OptionLabel,
    pub text: String,
}

/// Quiz as shown to the child. The correct label is not exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizView {
    pub question: String,
    pub options: Vec<QuizOptionView>,
}

impl From<&Question> for QuizView {
    fn from(question: &Question) -> Self {
        Self {
            question: question.question_text().to_owned(),
            options: question
                .labelled_options()
                .map(|(label, text)| QuizOptionView {
                    label,
                    text: text.to_owned(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryPage {
    pub header: PageHeader,
    pub sentence_id: SentenceId,
    pub text_en: String,
    pub text_tr: String,
    pub image_prompt: String,
    pub quiz: Option<QuizView>,
}

impl StoryPage {
    pub(crate) fn new(
        header: PageHeader,
        sentence: &Sentence,
        image_prompt: String,
        quiz: Option<QuizView>,
    ) -> Self {
        Self {
            header,
            sentence_id: sentence.id(),
            text_en: sentence.text_en().to_owned(),
            text_tr: sentence.text_tr().to_owned(),
            image_prompt,
            quiz,
        }
    }
}

/// What the shell should render for the current session state.
///
/// Only `Story` carries text to read aloud, an illustration prompt, or a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageView {
    Welcome,
    Story(StoryPage),
    NotYetAuthored { header: PageHeader },
    StoryComplete { header: PageHeader },
    Unavailable { header: PageHeader },
}

impl PageView {
    #[must_use]
    pub fn header(&self) -> Option<&PageHeader> {
        match self {
            PageView::Welcome => None,
            PageView::Story(page) => Some(&page.header),
            PageView::NotYetAuthored { header }
            | PageView::StoryComplete { header }
            | PageView::Unavailable { header } => Some(header),
        }
    }

    #[must_use]
    pub fn story(&self) -> Option<&StoryPage> {
        match self {
            PageView::Story(page) => Some(page),
            _ => None,
        }
    }

    #[must_use]
    pub fn speech_text(&self) -> Option<&str> {
        self.story().map(|page| page.text_en.as_str())
    }

    #[must_use]
    pub fn image_prompt(&self) -> Option<&str> {
        self.story().map(|page| page.image_prompt.as_str())
    }

    #[must_use]
    pub fn quiz(&self) -> Option<&QuizView> {
        self.story().and_then(|page| page.quiz.as_ref())
    }

    /// Fallback message for pages without a story sentence.
    #[must_use]
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            PageView::Welcome => Some("Enter the child's name and level to begin."),
            PageView::Story(_) => None,
            PageView::NotYetAuthored { .. } => Some("This page has not been written yet."),
            PageView::StoryComplete { .. } => Some("The story is complete. Well done!"),
            PageView::Unavailable { .. } => Some("This page cannot be shown right now."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> PageHeader {
        PageHeader {
            child_name: "Mira".into(),
            level: Level::Beginner,
            page: Page::FIRST,
            last_page: None,
        }
    }

    #[test]
    fn fallback_pages_carry_no_media_or_quiz() {
        for view in [
            PageView::NotYetAuthored { header: header() },
            PageView::StoryComplete { header: header() },
            PageView::Unavailable { header: header() },
        ] {
            assert!(view.speech_text().is_none());
            assert!(view.image_prompt().is_none());
            assert!(view.quiz().is_none());
            assert!(view.notice().is_some());
        }
    }

    #[test]
    fn quiz_view_hides_the_answer() {
        let question = Question::new(
            SentenceId::new(1),
            "What animal is this?",
            ["Cat".into(), "Dog".into(), "Bird".into()],
            OptionLabel::A,
        )
        .unwrap();
        let view = QuizView::from(&question);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["options"][1]["label"], "B");
        assert_eq!(json["options"][1]["text"], "Dog");
        assert!(json.get("correct_option").is_none());
    }
}
