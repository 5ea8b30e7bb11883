//! Built-in story catalog: one ten-page story per level with its quizzes.

use story_core::model::{Level, OptionLabel, Page, Question, QuestionError};
use thiserror::Error;

use crate::repository::{ContentRepository, NewSentenceRecord, StorageError};

use OptionLabel::{A, B, C};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SeedError {
    #[error("catalog entry {level} page {page} is invalid: {source}")]
    InvalidQuestion {
        level: Level,
        page: u32,
        source: QuestionError,
    },
    #[error("catalog page {0} is not a valid page number")]
    InvalidPage(u32),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A quiz as authored: the correct option is the label of the answer.
pub struct QuizEntry {
    pub question: &'static str,
    pub options: [&'static str; 3],
    pub correct: OptionLabel,
}

pub struct PageEntry {
    pub text_en: &'static str,
    pub text_tr: &'static str,
    pub quiz: Option<QuizEntry>,
}

const fn quiz(
    question: &'static str,
    options: [&'static str; 3],
    correct: OptionLabel,
) -> Option<QuizEntry> {
    Some(QuizEntry {
        question,
        options,
        correct,
    })
}

const fn page(
    text_en: &'static str,
    text_tr: &'static str,
    quiz: Option<QuizEntry>,
) -> PageEntry {
    PageEntry {
        text_en,
        text_tr,
        quiz,
    }
}

pub static BEGINNER: [PageEntry; 10] = [
    page(
        "This is a cat.",
        "Bu bir kedi.",
        quiz("What animal is this?", ["Cat", "Dog", "Bird"], A),
    ),
    page(
        "The cat is happy.",
        "Kedi mutlu.",
        quiz("How is the cat?", ["Sad", "Happy", "Angry"], B),
    ),
    page(
        "The cat runs.",
        "Kedi koşuyor.",
        quiz("What does the cat do?", ["Runs", "Sleeps", "Flies"], A),
    ),
    page(
        "This is a dog.",
        "Bu bir köpek.",
        quiz("What animal is this?", ["Dog", "Fish", "Cat"], A),
    ),
    page(
        "The dog is friendly.",
        "Köpek arkadaş canlısı.",
        quiz("How is the dog?", ["Friendly", "Scary", "Invisible"], A),
    ),
    page(
        "Cat and dog play.",
        "Kedi ve köpek oynuyor.",
        quiz(
            "Where do the cat and dog play?",
            ["In the park", "In the car", "In the sky"],
            A,
        ),
    ),
    page(
        "They play in the park.",
        "Parkta oynuyorlar.",
        quiz("What is the weather like?", ["Rainy", "Sunny", "Snowy"], B),
    ),
    page(
        "The sun is bright.",
        "Güneş parlak.",
        quiz("What shines in the sky?", ["The moon", "The sun", "A plane"], B),
    ),
    page(
        "They eat and rest.",
        "Yemek yiyip dinleniyorlar.",
        quiz(
            "What do they do after playing?",
            ["Eat and rest", "Go to school", "Fly away"],
            A,
        ),
    ),
    page(
        "Good night, friends!",
        "İyi geceler, arkadaşlar!",
        quiz(
            "What time is it in the story?",
            ["Morning", "Afternoon", "Night"],
            C,
        ),
    ),
];

pub static INTERMEDIATE: [PageEntry; 10] = [
    page(
        "The happy cat runs in the park.",
        "Mutlu kedi parkta koşuyor.",
        quiz(
            "Where does the cat run?",
            ["In the park", "In the house", "In the car"],
            A,
        ),
    ),
    page(
        "A small dog joins the cat.",
        "Küçük bir köpek kediye katılıyor.",
        quiz("Who joins the cat?", ["A bird", "A small dog", "A child"], B),
    ),
    page(
        "They chase a red ball.",
        "Kırmızı bir topu kovalıyorlar.",
        quiz(
            "What do they chase?",
            ["A red ball", "A blue car", "A yellow bird"],
            A,
        ),
    ),
    page(
        "The ball rolls under a tree.",
        "Top bir ağacın altına yuvarlanıyor.",
        None,
    ),
    page(
        "The cat jumps to catch it.",
        "Kedi onu yakalamak için zıplıyor.",
        None,
    ),
    page("The dog barks and laughs.", "Köpek havlıyor ve gülüyor.", None),
    page(
        "Children watch and smile.",
        "Çocuklar izliyor ve gülümsüyor.",
        None,
    ),
    page("The sun starts to go down.", "Güneş batmaya başlıyor.", None),
    page(
        "They sit and eat snacks.",
        "Oturup atıştırmalık yiyorlar.",
        None,
    ),
    page("It was a fun day.", "Eğlenceli bir gündü.", None),
];

pub static ADVANCED: [PageEntry; 10] = [
    page(
        "The clever cat woke up early.",
        "Akıllı kedi erkenden uyandı.",
        quiz(
            "When does the clever cat wake up?",
            ["Late at night", "Early in the morning", "At midnight"],
            B,
        ),
    ),
    page(
        "In the big park, the playful dog waited.",
        "Büyük parkta oyuncu köpek bekledi.",
        quiz(
            "Where does the playful dog wait?",
            ["In the big park", "In the kitchen", "On the roof"],
            A,
        ),
    ),
    page(
        "They planned an exciting adventure together.",
        "Birlikte heyecanlı bir macera planladılar.",
        None,
    ),
    page(
        "A red ball became their treasure.",
        "Kırmızı bir top onların hazinesi oldu.",
        quiz(
            "What becomes their treasure?",
            ["A red ball", "A blue book", "A green hat"],
            A,
        ),
    ),
    page(
        "They searched behind trees and under benches.",
        "Ağaçların arkasında ve bankların altında aradılar.",
        None,
    ),
    page(
        "The cat climbed high to look around.",
        "Kedi etrafa bakmak için yükseğe tırmandı.",
        None,
    ),
    page(
        "The dog sniffed the ground carefully.",
        "Köpek yeri dikkatlice kokladı.",
        None,
    ),
    page(
        "Finally, they found the ball near a flower bed.",
        "Sonunda topu bir çiçek tarhının yanında buldular.",
        None,
    ),
    page(
        "They shared the toy and felt proud.",
        "Oyuncağı paylaştılar ve gurur duydular.",
        None,
    ),
    page(
        "It was the perfect ending to a brave day.",
        "Cesur bir gün için mükemmel bir sondu.",
        None,
    ),
];

#[must_use]
pub fn story(level: Level) -> &'static [PageEntry] {
    match level {
        Level::Beginner => &BEGINNER,
        Level::Intermediate => &INTERMEDIATE,
        Level::Advanced => &ADVANCED,
    }
}

/// Counts of what `seed_catalog` wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub sentences: u32,
    pub questions: u32,
}

/// Upsert the built-in catalog. Safe to run repeatedly.
///
/// # Errors
///
/// Returns `SeedError` if an entry is invalid or storage rejects it.
pub async fn seed_catalog(content: &dyn ContentRepository) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();

    for level in Level::ALL {
        for (number, entry) in (1_u32..).zip(story(level)) {
            let page = Page::new(number).map_err(|_| SeedError::InvalidPage(number))?;
            let sentence_id = content
                .upsert_sentence(&NewSentenceRecord {
                    level,
                    page,
                    text_en: entry.text_en.to_owned(),
                    text_tr: entry.text_tr.to_owned(),
                })
                .await?;
            report.sentences += 1;

            let Some(quiz) = &entry.quiz else {
                continue;
            };
            let question = Question::new(
                sentence_id,
                quiz.question,
                quiz.options.map(str::to_owned),
                quiz.correct,
            )
            .map_err(|source| SeedError::InvalidQuestion {
                level,
                page: number,
                source,
            })?;
            content.upsert_question(&question).await?;
            report.questions += 1;
        }
    }

    Ok(report)
}
