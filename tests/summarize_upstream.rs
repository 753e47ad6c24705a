//! Summarization flow against a canned local upstream.
//!
//! A bare TCP stub stands in for the generation endpoint so the full
//! request/response path runs without the network.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use minuta::app::App;
use minuta::config::Config;
use minuta::db::{Database, NewMeeting, TranscriptSource};
use minuta::meeting::MeetingStatus;
use minuta::summarize::SummarizeError;

/// Serves one HTTP exchange per canned response, capturing each raw request.
async fn spawn_stub(responses: Vec<(&'static str, String)>) -> (String, mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (request_tx, request_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        for (status_line, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);

                if let Some(headers_end) = find(&buf, b"\r\n\r\n") {
                    let headers = String::from_utf8_lossy(&buf[..headers_end]).to_lowercase();
                    let content_length = headers
                        .lines()
                        .find_map(|line| line.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if buf.len() >= headers_end + 4 + content_length {
                        break;
                    }
                }
            }

            let _ = request_tx.send(String::from_utf8_lossy(&buf).into_owned());

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        }
    });

    (format!("http://{}/generate", addr), request_rx)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn app_with_endpoint(endpoint: String) -> App {
    let mut config = Config::default();
    config.summarizer.api_endpoint = Some(endpoint);
    App::new(config, Database::open_in_memory().unwrap())
}

fn budget_meeting() -> NewMeeting {
    NewMeeting {
        title: "Presupuesto".to_string(),
        started_at: "2024-01-01T10:00:00Z".parse().unwrap(),
        ended_at: "2024-01-01T10:30:00Z".parse().unwrap(),
        tags: vec![],
        audio_path: None,
    }
}

fn minutes_body(tasks: &[&str]) -> String {
    let plan: Vec<serde_json::Value> = tasks
        .iter()
        .map(|task| {
            serde_json::json!({
                "tarea": task,
                "responsable": "Ana",
                "fecha_limite": "Por definir",
                "prioridad": "Alta",
                "estado": "Pendiente"
            })
        })
        .collect();

    let minutes = serde_json::json!({
        "titulo": "Revisión de presupuesto",
        "fecha": "2024-01-01",
        "hora": "10:00 - 10:30",
        "resumen_general": "Se revisó el presupuesto anual.",
        "objetivo_general": "Aprobar el presupuesto.",
        "desarrollo_por_participante": [],
        "puntos_relevantes": ["Presupuesto aprobado"],
        "plan_de_accion": plan,
        "temas": ["presupuesto"]
    });

    serde_json::json!({
        "candidates": [
            { "content": { "parts": [{ "text": minutes.to_string() }] } }
        ]
    })
    .to_string()
}

#[tokio::test]
async fn request_derives_date_and_time_range_from_timestamps() {
    let (endpoint, mut requests) = spawn_stub(vec![("200 OK", minutes_body(&["Enviar acta"]))]).await;
    let app = app_with_endpoint(endpoint);

    let meeting = app
        .db
        .save_recording(
            &budget_meeting(),
            "Hola, hoy revisamos el presupuesto.",
            TranscriptSource::Live,
        )
        .await
        .unwrap();

    let (updated, minutes) = app.summarize(meeting.id).await.unwrap();
    assert_eq!(updated.status, MeetingStatus::Summarized);
    assert_eq!(minutes.title, "Revisión de presupuesto");

    let raw = requests.recv().await.unwrap();
    assert!(raw.contains("Hola, hoy revisamos el presupuesto."));
    assert!(raw.contains("La fecha de la reunión es: 2024-01-01"));
    assert!(raw.contains("La hora de inicio fue 10:00 y la de fin 10:30"));
    assert!(raw.contains("responseSchema"));

    let items = app.db.action_items_for(meeting.id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Enviar acta");
}

#[tokio::test]
async fn upstream_failure_leaves_meeting_untouched() {
    let (endpoint, _requests) =
        spawn_stub(vec![("500 Internal Server Error", "{\"error\":\"boom\"}".to_string())]).await;
    let app = app_with_endpoint(endpoint);

    let meeting = app
        .db
        .save_recording(&budget_meeting(), "hola", TranscriptSource::Live)
        .await
        .unwrap();

    let err = app.summarize(meeting.id).await.unwrap_err();
    match err.downcast_ref::<SummarizeError>() {
        Some(SummarizeError::Upstream { status, body }) => {
            assert_eq!(*status, 500);
            assert!(body.contains("boom"));
        }
        other => panic!("expected Upstream error, got {:?}", other),
    }

    // Nothing was written and the status did not advance.
    let unchanged = app.db.meeting(meeting.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, MeetingStatus::Transcribed);
    assert!(app.db.summary(meeting.id).await.unwrap().is_none());
    assert!(app.db.action_items_for(meeting.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_candidate_text_is_rejected() {
    let body = serde_json::json!({
        "candidates": [
            { "content": { "parts": [{ "text": "esto no es JSON" }] } }
        ]
    })
    .to_string();
    let (endpoint, _requests) = spawn_stub(vec![("200 OK", body)]).await;
    let app = app_with_endpoint(endpoint);

    let meeting = app
        .db
        .save_recording(&budget_meeting(), "hola", TranscriptSource::Live)
        .await
        .unwrap();

    let err = app.summarize(meeting.id).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SummarizeError>(),
        Some(SummarizeError::MalformedResponse { .. })
    ));
    assert!(app.db.summary(meeting.id).await.unwrap().is_none());
}

#[tokio::test]
async fn second_summarization_replaces_the_first() {
    let (endpoint, _requests) = spawn_stub(vec![
        ("200 OK", minutes_body(&["a", "b", "c"])),
        ("200 OK", minutes_body(&["final"])),
    ])
    .await;
    let app = app_with_endpoint(endpoint);

    let meeting = app
        .db
        .save_recording(&budget_meeting(), "hola", TranscriptSource::Live)
        .await
        .unwrap();

    app.summarize(meeting.id).await.unwrap();
    assert_eq!(app.db.action_items_for(meeting.id).await.unwrap().len(), 3);

    app.summarize(meeting.id).await.unwrap();
    let items = app.db.action_items_for(meeting.id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "final");
}
