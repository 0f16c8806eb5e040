use lingo_application::pronunciation::{
    AttemptOutcome, Difficulty, PracticeDay, PracticeHistory, PronunciationPractice,
    SimulatedMicrophone,
};
use lingo_core::config::TimingConfig;
use std::sync::Arc;
use std::time::Duration;

fn practice(mic: &Arc<SimulatedMicrophone>) -> PronunciationPractice {
    PronunciationPractice::new(mic.clone(), TimingConfig::default(), Some(11))
}

#[tokio::test(start_paused = true)]
async fn test_full_run_releases_microphone_and_records_history() {
    let mic = Arc::new(SimulatedMicrophone::new());
    let mut practice = practice(&mic);

    practice.start(Some(Difficulty::Easy)).await.unwrap();
    assert!(practice.is_active());
    assert_eq!(mic.open_streams(), 1);
    assert_eq!(practice.current_word().unwrap().word, "restaurant");

    let started = tokio::time::Instant::now();
    let first = practice.record_attempt().await.unwrap();
    // record + score + advance
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(6000) && elapsed < Duration::from_millis(6010));

    let AttemptOutcome::Advanced { score, next_index } = first else {
        panic!("unexpected outcome: {first:?}");
    };
    assert!((75..=94).contains(&score));
    assert_eq!(next_index, 1);
    assert_eq!(practice.current_word().unwrap().word, "beautiful");
    assert_eq!(mic.open_streams(), 1);

    let last = practice.record_attempt().await.unwrap();
    let AttemptOutcome::Finished { stats, .. } = last else {
        panic!("unexpected outcome: {last:?}");
    };
    assert_eq!(stats.total_words, 2);
    assert!(stats.highest_score >= stats.average_score);

    assert!(!practice.is_active());
    assert_eq!(mic.open_streams(), 0);
    assert_eq!(practice.history().days().len(), 1);
    assert_eq!(practice.history().total_words(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_exit_releases_microphone_without_history() {
    let mic = Arc::new(SimulatedMicrophone::new());
    let mut practice = practice(&mic);

    practice.start(None).await.unwrap();
    practice.record_attempt().await.unwrap();
    practice.exit();

    assert!(!practice.is_active());
    assert_eq!(mic.open_streams(), 0);
    assert!(practice.history().days().is_empty());
    assert!(practice.record_attempt().await.unwrap_err().is_resource());
}

#[tokio::test(start_paused = true)]
async fn test_drop_releases_microphone() {
    let mic = Arc::new(SimulatedMicrophone::new());
    {
        let mut practice = practice(&mic);
        practice.start(Some(Difficulty::Hard)).await.unwrap();
        assert_eq!(mic.open_streams(), 1);
    }
    assert_eq!(mic.open_streams(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_attempt_keeps_state_consistent() {
    let mic = Arc::new(SimulatedMicrophone::new());
    let mut practice = practice(&mic);
    practice.start(None).await.unwrap();

    // Abandon the attempt mid-recording.
    let attempt = tokio::time::timeout(Duration::from_millis(500), practice.record_attempt()).await;
    assert!(attempt.is_err());
    assert_eq!(practice.stats().total_words, 0);
    assert_eq!(practice.current_index(), 0);

    drop(practice);
    assert_eq!(mic.open_streams(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_permission_denied_leaves_nothing_open() {
    let mic = Arc::new(SimulatedMicrophone::new());
    mic.set_permission_denied(true);
    let mut practice = practice(&mic);

    let err = practice.start(None).await.unwrap_err();
    assert!(err.is_resource());
    assert!(!practice.is_active());
    assert!(practice.current_word().is_none());
    assert_eq!(mic.open_streams(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_restart_does_not_leak_streams() {
    let mic = Arc::new(SimulatedMicrophone::new());
    let mut practice = practice(&mic);

    practice.start(None).await.unwrap();
    practice.start(Some(Difficulty::Medium)).await.unwrap();

    assert_eq!(mic.open_streams(), 1);
    assert_eq!(practice.words().len(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_same_day_runs_are_weighted() {
    let mic = Arc::new(SimulatedMicrophone::new());
    let today = chrono::Local::now().format("%-m-%-d").to_string();
    let mut practice = practice(&mic).with_history(PracticeHistory::new(vec![PracticeDay {
        date: today,
        score: 90,
        words: 8,
    }]));

    practice.start(Some(Difficulty::Easy)).await.unwrap();
    practice.record_attempt().await.unwrap();
    let AttemptOutcome::Finished { stats, .. } = practice.record_attempt().await.unwrap() else {
        panic!("practice should have finished");
    };

    let days = practice.history().days();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0].words, 10);
    let expected = (90 * 8 + stats.average_score * 2 + 5) / 10;
    assert_eq!(days[0].score, expected);
}
