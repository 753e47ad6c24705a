//! End-to-end lifecycle properties over a file-backed store.

use minuta::db::{Database, NewMeeting, TranscriptSource};
use minuta::meeting::MeetingStatus;
use minuta::summarize::minutes::{ActionPlanEntry, MeetingMinutes};

fn new_meeting(title: &str, audio_path: Option<String>) -> NewMeeting {
    NewMeeting {
        title: title.to_string(),
        started_at: "2024-01-01T10:00:00Z".parse().unwrap(),
        ended_at: "2024-01-01T10:30:00Z".parse().unwrap(),
        tags: vec!["finanzas".to_string(), "q1".to_string()],
        audio_path,
    }
}

fn minutes(tasks: &[(&str, &str)]) -> MeetingMinutes {
    MeetingMinutes {
        title: "Revisión de presupuesto".to_string(),
        date: "2024-01-01".to_string(),
        time_range: "10:00 - 10:30".to_string(),
        executive_summary: "Se revisó el presupuesto.".to_string(),
        objective: "Aprobar el presupuesto.".to_string(),
        participants: vec![],
        key_points: vec!["Presupuesto aprobado".to_string()],
        action_plan: tasks
            .iter()
            .map(|(task, priority)| ActionPlanEntry {
                task: task.to_string(),
                assignee: "Ana".to_string(),
                due_date: "2024-02-01".to_string(),
                priority: priority.to_string(),
                status: "Pendiente".to_string(),
            })
            .collect(),
        topics: vec!["presupuesto".to_string()],
    }
}

#[tokio::test]
async fn cascade_delete_removes_all_dependents() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open_at(&dir.path().join("m.db")).unwrap();

    // An audio artifact on disk must go with the meeting.
    let audio = dir.path().join("m1.wav");
    std::fs::write(&audio, b"RIFF").unwrap();

    let meeting = db
        .save_recording(
            &new_meeting("Con todo", Some(audio.to_string_lossy().into_owned())),
            "hola equipo",
            TranscriptSource::Live,
        )
        .await
        .unwrap();
    db.save_summary(meeting.id, &minutes(&[("t1", "Alta"), ("t2", "Baja")]))
        .await
        .unwrap();

    assert!(db.delete_meeting(meeting.id).await.unwrap());

    assert!(db.meeting(meeting.id).await.unwrap().is_none());
    assert!(db.transcript(meeting.id).await.unwrap().is_none());
    assert!(db.summary(meeting.id).await.unwrap().is_none());
    assert!(db.action_items_for(meeting.id).await.unwrap().is_empty());
    assert!(!audio.exists());

    // Unrelated meetings are untouched.
    let other = db
        .save_recording(&new_meeting("Otra", None), "", TranscriptSource::Live)
        .await
        .unwrap();
    assert!(db.meeting(other.id).await.unwrap().is_some());
}

#[tokio::test]
async fn transcript_transition_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open_at(&dir.path().join("m.db")).unwrap();

    let meeting = db
        .save_recording(&new_meeting("Muda", None), "", TranscriptSource::Live)
        .await
        .unwrap();
    assert_eq!(meeting.status, MeetingStatus::Recorded);

    let first = db.save_transcript(meeting.id, "texto nuevo").await.unwrap();
    assert_eq!(first.status, MeetingStatus::Transcribed);

    let second = db.save_transcript(meeting.id, "texto revisado").await.unwrap();
    assert_eq!(second.status, MeetingStatus::Transcribed);
}

#[tokio::test]
async fn summarization_replaces_action_items_and_sets_status() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open_at(&dir.path().join("m.db")).unwrap();

    let meeting = db
        .save_recording(&new_meeting("M", None), "hola", TranscriptSource::Live)
        .await
        .unwrap();

    db.save_summary(meeting.id, &minutes(&[("a", "Alta"), ("b", "Media"), ("c", "Baja")]))
        .await
        .unwrap();
    assert_eq!(db.action_items_for(meeting.id).await.unwrap().len(), 3);

    // A second run fully replaces the set; nothing is merged or duplicated.
    let updated = db
        .save_summary(meeting.id, &minutes(&[("única", "Media")]))
        .await
        .unwrap();
    assert_eq!(updated.status, MeetingStatus::Summarized);

    let items = db.action_items_for(meeting.id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "única");
}

#[tokio::test]
async fn export_round_trip_reproduces_everything_but_audio() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open_at(&dir.path().join("m.db")).unwrap();

    let meeting = db
        .save_recording(
            &new_meeting("Ronda", Some("/tmp/audio.wav".to_string())),
            "hola equipo",
            TranscriptSource::Live,
        )
        .await
        .unwrap();
    db.save_summary(meeting.id, &minutes(&[("t1", "Alta"), ("t2", "Media")]))
        .await
        .unwrap();

    let json = serde_json::to_string(&db.export().await.unwrap()).unwrap();

    // Treat the export as the sole source of truth in a fresh store.
    let restored_dir = tempfile::tempdir().unwrap();
    let restored = Database::open_at(&restored_dir.path().join("m.db")).unwrap();
    restored
        .import(&serde_json::from_str(&json).unwrap())
        .await
        .unwrap();

    let original = db.meeting(meeting.id).await.unwrap().unwrap();
    let copy = restored.meeting(meeting.id).await.unwrap().unwrap();
    assert_eq!(copy.title, original.title);
    assert_eq!(copy.tags, original.tags);
    assert_eq!(copy.status, original.status);
    // Audio is excluded by design.
    assert!(copy.audio_path.is_none());

    let original_items = db.action_items_for(meeting.id).await.unwrap();
    let copied_items = restored.action_items_for(meeting.id).await.unwrap();
    assert_eq!(copied_items.len(), original_items.len());
    for (copied, original) in copied_items.iter().zip(&original_items) {
        assert_eq!(copied.title, original.title);
        assert_eq!(copied.assignee, original.assignee);
        assert_eq!(copied.priority, original.priority);
        assert_eq!(copied.status, original.status);
    }

    let transcript = restored.transcript(meeting.id).await.unwrap().unwrap();
    assert_eq!(transcript.text, "hola equipo");
}

#[tokio::test]
async fn store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("m.db");

    let meeting = {
        let db = Database::open_at(&path).unwrap();
        db.save_recording(&new_meeting("Persistente", None), "hola", TranscriptSource::Live)
            .await
            .unwrap()
    };

    let reopened = Database::open_at(&path).unwrap();
    let loaded = reopened.meeting(meeting.id).await.unwrap().unwrap();
    assert_eq!(loaded.title, "Persistente");
    assert_eq!(loaded.status, MeetingStatus::Transcribed);
}
