use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use services::media::{AudioClip, ImageGenerator, ImageResult, SpeechSynthesizer, UnavailableReason};
use services::{AppServices, Clock, Illustration, Narration, PageView, SpeechError};
use story_core::model::{AnswerChoice, Level, LevelRecommendation, OptionLabel, Page};
use story_core::time::fixed_now;
use story_core::SessionState;
use storage::repository::{InMemoryRepository, LearnerRepository, Storage};

#[derive(Default)]
struct RecordingSpeech {
    calls: AtomicUsize,
}

#[async_trait]
impl SpeechSynthesizer for RecordingSpeech {
    async fn synthesize(&self, text: &str, lang: &str) -> Result<AudioClip, SpeechError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(lang, "en");
        Ok(AudioClip {
            bytes: text.as_bytes().to_vec(),
            content_type: "audio/mpeg",
        })
    }
}

#[derive(Default)]
struct RecordingImages {
    calls: AtomicUsize,
}

#[async_trait]
impl ImageGenerator for RecordingImages {
    async fn generate(&self, _prompt: &str) -> ImageResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ImageResult::Unavailable(UnavailableReason::Timeout)
    }
}

struct Harness {
    app: AppServices,
    repo: InMemoryRepository,
    speech: Arc<RecordingSpeech>,
    images: Arc<RecordingImages>,
}

async fn harness() -> Harness {
    let repo = InMemoryRepository::new();
    let speech = Arc::new(RecordingSpeech::default());
    let images = Arc::new(RecordingImages::default());
    let app = AppServices::from_storage(
        Storage::from_repository(repo.clone()),
        Clock::fixed(fixed_now()),
        speech.clone(),
        images.clone(),
    )
    .await
    .unwrap();
    Harness {
        app,
        repo,
        speech,
        images,
    }
}

#[tokio::test]
async fn mira_answers_the_first_beginner_quiz() {
    let h = harness().await;
    let story = h.app.story();

    let state = story
        .submit_profile(SessionState::NoProfile, "Mira", Level::Beginner, None)
        .await
        .unwrap();
    let view = story.page_view(&state).await;
    let quiz = view.quiz().expect("page 1 has a quiz");
    let texts: Vec<&str> = quiz.options.iter().map(|o| o.text.as_str()).collect();
    assert_eq!(texts, ["Cat", "Dog", "Bird"]);

    let correct = story
        .submit_answer(&state, &AnswerChoice::parse("Cat"))
        .await
        .unwrap();
    assert!(correct.is_correct);
    assert_eq!(correct.answer, OptionLabel::A);
    assert_eq!(correct.message(), "Correct! Great job!");
    assert!(correct.recorded.is_some());

    let wrong = story
        .submit_answer(&state, &AnswerChoice::parse("Dog"))
        .await
        .unwrap();
    assert!(!wrong.is_correct);
    assert_eq!(wrong.message(), "Not correct. Try again.");
    assert_eq!(state.page(), Some(Page::FIRST));

    let child_id = state.active().unwrap().child_id;
    let records = h.repo.progress_for_child(child_id).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].quiz_answer, Some(OptionLabel::A));
    assert_eq!(records[0].is_correct, Some(true));
    assert_eq!(records[1].quiz_answer, Some(OptionLabel::B));
    assert_eq!(records[1].is_correct, Some(false));
    assert_eq!(records[0].answered_at, fixed_now());
}

#[tokio::test]
async fn resubmitting_the_same_profile_reuses_the_child() {
    let h = harness().await;
    let story = h.app.story();

    let first = story
        .submit_profile(SessionState::NoProfile, "Ada", Level::Beginner, None)
        .await
        .unwrap();
    let second = story
        .submit_profile(first.clone(), " Ada ", Level::Beginner, None)
        .await
        .unwrap();

    assert_eq!(
        first.active().unwrap().child_id,
        second.active().unwrap().child_id
    );
    assert_eq!(h.repo.child_count().unwrap(), 1);
}

#[tokio::test]
async fn navigation_stays_within_the_story() {
    let h = harness().await;
    let story = h.app.story();

    let state = story
        .submit_profile(SessionState::NoProfile, "Mira", Level::Advanced, None)
        .await
        .unwrap();
    let state = story.prev(state);
    assert_eq!(state.page(), Some(Page::FIRST));

    let mut state = state;
    for _ in 0..25 {
        state = story.next(state).await;
    }
    assert_eq!(state.page(), Some(Page::new(11).unwrap()));
    assert_eq!(state.active().unwrap().pages_read, 10);
    assert_eq!(state.active().unwrap().stories_completed, 1);

    let report = story.parent_report(&state).await.unwrap();
    assert_eq!(report.summary.correct_answers, 0);
    assert_eq!(report.summary.progress_percent, 10);

    let state = story.prev(state);
    let view = story.page_view(&state).await;
    assert_eq!(view.speech_text(), Some("It was the perfect ending to a brave day."));
}

#[tokio::test]
async fn media_is_only_requested_for_story_pages() {
    let h = harness().await;
    let story = h.app.story();
    let media = h.app.media();

    let mut state = story
        .submit_profile(SessionState::NoProfile, "Mira", Level::Beginner, None)
        .await
        .unwrap();
    for _ in 0..10 {
        state = story.next(state).await;
    }
    let complete = story.page_view(&state).await;
    assert!(matches!(complete, PageView::StoryComplete { .. }));
    assert_eq!(media.narrate(&complete).await, Narration::NotApplicable);
    assert_eq!(media.illustrate(&complete).await, Illustration::NotApplicable);
    assert_eq!(h.speech.calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.images.calls.load(Ordering::SeqCst), 0);

    let last = story.page_view(&story.prev(state)).await;
    match media.narrate(&last).await {
        Narration::Ready(clip) => assert_eq!(clip.bytes, b"Good night, friends!"),
        other => panic!("expected audio, got {other:?}"),
    }
    assert_eq!(
        media.illustrate(&last).await,
        Illustration::Unavailable(UnavailableReason::Timeout)
    );
    assert_eq!(h.speech.calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.images.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn parent_report_reflects_logged_answers() {
    let h = harness().await;
    let story = h.app.story();

    let mut state = story
        .submit_profile(SessionState::NoProfile, "Mira", Level::Beginner, None)
        .await
        .unwrap();
    for page in 0..8 {
        if page > 0 {
            state = story.next(state).await;
        }
        let view = story.page_view(&state).await;
        let quiz = view.quiz().expect("beginner pages have quizzes");
        // Try every option so exactly one attempt per page is correct.
        for option in &quiz.options {
            story
                .submit_answer(&state, &AnswerChoice::Label(option.label))
                .await
                .unwrap();
        }
    }

    let report = story.parent_report(&state).await.unwrap();
    assert_eq!(report.pages_read, 7);
    assert_eq!(report.summary.attempts, 24);
    assert_eq!(report.summary.correct_answers, 8);
    assert_eq!(report.summary.sentences_mastered, 8);
    assert_eq!(report.summary.progress_percent, 40);
    assert_eq!(
        report.summary.recommendation,
        LevelRecommendation::MoveUpTo(Level::Intermediate)
    );
}

#[tokio::test]
async fn report_requires_a_profile() {
    let h = harness().await;
    let err = h
        .app
        .story()
        .parent_report(&SessionState::NoProfile)
        .await
        .unwrap_err();
    assert!(matches!(err, services::StoryError::NoProfile));
}
