//! Structured minutes types and the fixed-schema request payload.
//!
//! The wire format keeps the Spanish field names the generation endpoint is
//! instructed to produce; Rust-side names are the English equivalents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// One participant's contributions as summarized by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantContribution {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "aportes")]
    pub contribution: String,
}

/// One row of the action plan, as the service emits it. Values are free text
/// here; the store parses priority/status into their enumerations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionPlanEntry {
    #[serde(rename = "tarea")]
    pub task: String,
    #[serde(rename = "responsable")]
    pub assignee: String,
    #[serde(rename = "fecha_limite")]
    pub due_date: String,
    #[serde(rename = "prioridad")]
    pub priority: String,
    #[serde(rename = "estado")]
    pub status: String,
}

/// The full structured summary for one meeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingMinutes {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "hora")]
    pub time_range: String,
    #[serde(rename = "resumen_general")]
    pub executive_summary: String,
    #[serde(rename = "objetivo_general")]
    pub objective: String,
    #[serde(rename = "desarrollo_por_participante", default)]
    pub participants: Vec<ParticipantContribution>,
    #[serde(rename = "puntos_relevantes", default)]
    pub key_points: Vec<String>,
    #[serde(rename = "plan_de_accion", default)]
    pub action_plan: Vec<ActionPlanEntry>,
    #[serde(rename = "temas", default)]
    pub topics: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
pub struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    pub response_mime_type: String,
    #[serde(rename = "responseSchema")]
    pub response_schema: Value,
}

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Content,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// The schema the service is constrained to answer with.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "titulo": { "type": "STRING", "description": "Título conciso de la reunión basado en el contenido." },
            "fecha": { "type": "STRING", "description": "Fecha de la reunión en formato AAAA-MM-DD." },
            "hora": { "type": "STRING", "description": "Rango de hora (HH:MM - HH:MM)." },
            "resumen_general": { "type": "STRING", "description": "Resumen ejecutivo de 150-250 palabras." },
            "objetivo_general": { "type": "STRING", "description": "El propósito principal de la reunión." },
            "desarrollo_por_participante": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "nombre": { "type": "STRING", "description": "Nombre del participante (o 'Varios' si no está claro)." },
                        "aportes": { "type": "STRING", "description": "Resumen de sus aportes clave." }
                    },
                    "required": ["nombre", "aportes"]
                }
            },
            "puntos_relevantes": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Lista de 3-5 puntos clave discutidos."
            },
            "plan_de_accion": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "tarea": { "type": "STRING" },
                        "responsable": { "type": "STRING" },
                        "fecha_limite": { "type": "STRING", "description": "Formato AAAA-MM-DD o 'Por definir'." },
                        "prioridad": { "type": "STRING", "description": "Alta, Media, o Baja." },
                        "estado": { "type": "STRING", "description": "Pendiente, En curso, o Hecha." }
                    },
                    "required": ["tarea", "responsable", "fecha_limite", "prioridad", "estado"]
                }
            },
            "temas": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Lista de 5-10 temas o keywords para etiquetado."
            }
        },
        "required": ["titulo", "fecha", "hora", "resumen_general", "objetivo_general",
                     "desarrollo_por_participante", "puntos_relevantes", "plan_de_accion", "temas"]
    })
}

/// Meeting date in `AAAA-MM-DD`, derived from the start timestamp (UTC).
pub fn meeting_date(started_at: DateTime<Utc>) -> String {
    started_at.format("%Y-%m-%d").to_string()
}

/// Meeting time-of-day range `HH:MM - HH:MM` (UTC).
pub fn meeting_time_range(started_at: DateTime<Utc>, ended_at: DateTime<Utc>) -> String {
    format!(
        "{} - {}",
        started_at.format("%H:%M"),
        ended_at.format("%H:%M")
    )
}

/// Builds the instruction prompt plus schema-constrained generation config.
pub fn build_request(
    transcript: &str,
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
) -> GenerateContentRequest {
    let prompt = format!(
        "Eres un asistente experto que sintetiza reuniones en español a partir de una transcripción.\n\
         Tu objetivo es devolver SIEMPRE un único objeto JSON válido que se adhiera estrictamente al schema proporcionado.\n\
         La fecha de la reunión es: {fecha}.\n\
         La hora de inicio fue {inicio} y la de fin {fin}.\n\
         Usa esa información para los campos 'fecha' y 'hora'.\n\
         Considera el idioma detectado, corrige errores de transcripción y conserva cifras/fechas/textos literales críticos.\n\
         Si hay ambigüedades en la transcripción sobre un punto, marca ese punto con \"TODO: verificar\".\n\
         La transcripción es:\n{transcript}",
        fecha = meeting_date(started_at),
        inicio = started_at.format("%H:%M"),
        fin = ended_at.format("%H:%M"),
        transcript = transcript,
    );

    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![Part { text: prompt }],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: response_schema(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_date_and_time_range_derivation() {
        let started = ts("2024-01-01T10:00:00Z");
        let ended = ts("2024-01-01T10:30:00Z");
        assert_eq!(meeting_date(started), "2024-01-01");
        assert_eq!(meeting_time_range(started, ended), "10:00 - 10:30");
    }

    #[test]
    fn test_request_embeds_transcript_and_derived_fields() {
        let request = build_request(
            "Hola, hoy revisamos el presupuesto.",
            ts("2024-01-01T10:00:00Z"),
            ts("2024-01-01T10:30:00Z"),
        );

        assert_eq!(request.contents.len(), 1);
        let prompt = &request.contents[0].parts[0].text;
        assert!(prompt.contains("Hola, hoy revisamos el presupuesto."));
        assert!(prompt.contains("2024-01-01"));
        assert!(prompt.contains("La hora de inicio fue 10:00 y la de fin 10:30"));
        assert_eq!(
            request.generation_config.response_mime_type,
            "application/json"
        );
    }

    #[test]
    fn test_request_serializes_with_wire_names() {
        let request = build_request("x", ts("2024-01-01T10:00:00Z"), ts("2024-01-01T10:30:00Z"));
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("contents").is_some());
        let config = value.get("generationConfig").unwrap();
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(config["responseSchema"]["type"], "OBJECT");
        let required = config["responseSchema"]["required"].as_array().unwrap();
        assert!(required.iter().any(|v| v == "plan_de_accion"));
    }

    #[test]
    fn test_minutes_parse_from_wire_json() {
        let raw = r#"{
            "titulo": "Revisión de presupuesto",
            "fecha": "2024-01-01",
            "hora": "10:00 - 10:30",
            "resumen_general": "Se revisó el presupuesto anual.",
            "objetivo_general": "Aprobar el presupuesto.",
            "desarrollo_por_participante": [
                { "nombre": "Ana", "aportes": "Presentó las cifras." }
            ],
            "puntos_relevantes": ["Presupuesto aprobado"],
            "plan_de_accion": [
                {
                    "tarea": "Enviar acta",
                    "responsable": "Ana",
                    "fecha_limite": "Por definir",
                    "prioridad": "Alta",
                    "estado": "Pendiente"
                }
            ],
            "temas": ["presupuesto"]
        }"#;

        let minutes: MeetingMinutes = serde_json::from_str(raw).unwrap();
        assert_eq!(minutes.title, "Revisión de presupuesto");
        assert_eq!(minutes.time_range, "10:00 - 10:30");
        assert_eq!(minutes.participants[0].name, "Ana");
        assert_eq!(minutes.action_plan[0].priority, "Alta");

        // Round-trips back to the same wire names.
        let value = serde_json::to_value(&minutes).unwrap();
        assert!(value.get("resumen_general").is_some());
        assert!(value.get("plan_de_accion").is_some());
    }
}
