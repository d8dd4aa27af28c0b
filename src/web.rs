use actix_files::Files;
use actix_web::http::StatusCode;
use actix_web::{middleware, web, App, HttpResponse, HttpServer, ResponseError};
use std::path::PathBuf;

use crate::error::SchedulerError;
use crate::form::{
    export_file_name, schedule_csv_bytes, BulkImportRequest, GenerateRequest, ParticipantDraft,
};
use crate::parser::parse_bulk_participants;
use crate::schedule::{generate_schedule, ScheduleConfig};
use crate::store::Store;

pub struct AppState {
    pub store: Store,
}

type HandlerResult = Result<HttpResponse, SchedulerError>;

impl ResponseError for SchedulerError {
    fn status_code(&self) -> StatusCode {
        match self {
            SchedulerError::InvalidConfig(_)
            | SchedulerError::InvalidParticipant(_)
            | SchedulerError::NothingToSchedule(_) => StatusCode::BAD_REQUEST,
            SchedulerError::ParticipantNotFound(_) | SchedulerError::ScheduleNotFound => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("Request failed: {}", self);
        }
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({"success": false, "error": self.to_string()}))
    }
}

async fn health(state: web::Data<AppState>) -> HandlerResult {
    let participants = state.store.participant_count()?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "participants": participants,
    })))
}

async fn list_participants(state: web::Data<AppState>) -> HandlerResult {
    Ok(HttpResponse::Ok().json(state.store.list_participants()?))
}

async fn add_participant(
    req: web::Json<ParticipantDraft>,
    state: web::Data<AppState>,
) -> HandlerResult {
    let participant = state.store.add_participant(&req)?;
    Ok(HttpResponse::Created().json(participant))
}

async fn bulk_add_participants(
    req: web::Json<BulkImportRequest>,
    state: web::Data<AppState>,
) -> HandlerResult {
    let drafts = parse_bulk_participants(&req.text);
    if drafts.is_empty() {
        return Err(SchedulerError::InvalidParticipant(
            "No participants found in import text".to_string(),
        ));
    }
    let added = state.store.bulk_add_participants(&drafts)?;
    Ok(HttpResponse::Created().json(added))
}

async fn update_participant(
    id: web::Path<String>,
    req: web::Json<ParticipantDraft>,
    state: web::Data<AppState>,
) -> HandlerResult {
    let participant = state.store.update_participant(&id, &req)?;
    Ok(HttpResponse::Ok().json(participant))
}

async fn delete_participant(id: web::Path<String>, state: web::Data<AppState>) -> HandlerResult {
    state.store.delete_participant(&id)?;
    Ok(HttpResponse::NoContent().finish())
}

async fn get_config(state: web::Data<AppState>) -> HandlerResult {
    match state.store.get_config()? {
        Some(config) => Ok(HttpResponse::Ok().json(config)),
        None => Ok(HttpResponse::NotFound()
            .json(serde_json::json!({"success": false, "error": "No schedule config set"}))),
    }
}

async fn set_config(req: web::Json<ScheduleConfig>, state: web::Data<AppState>) -> HandlerResult {
    let config = state.store.set_config(req.into_inner())?;
    Ok(HttpResponse::Ok().json(config))
}

// Generates from the stored roster and config, then saves the result
async fn generate(
    req: Option<web::Json<GenerateRequest>>,
    state: web::Data<AppState>,
) -> HandlerResult {
    let Some(config) = state.store.get_config()? else {
        return Err(SchedulerError::NothingToSchedule(
            "set a schedule config first".to_string(),
        ));
    };
    let participants = state.store.list_participants()?;
    if participants.is_empty() {
        return Err(SchedulerError::NothingToSchedule(
            "add participants first".to_string(),
        ));
    }

    let sessions = generate_schedule(&participants, Some(&config))?;

    let name = req
        .and_then(|r| r.into_inner().name)
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| format!("LT Schedule {}", chrono::Local::now().format("%Y-%m-%d %H:%M")));

    let saved = state.store.save_schedule(&name, &config, sessions)?;
    Ok(HttpResponse::Created().json(saved))
}

async fn list_schedules(state: web::Data<AppState>) -> HandlerResult {
    Ok(HttpResponse::Ok().json(state.store.list_schedules()?))
}

async fn latest_schedule(state: web::Data<AppState>) -> HandlerResult {
    let saved = state
        .store
        .latest_schedule()?
        .ok_or(SchedulerError::ScheduleNotFound)?;
    Ok(HttpResponse::Ok().json(saved))
}

async fn get_schedule(id: web::Path<String>, state: web::Data<AppState>) -> HandlerResult {
    Ok(HttpResponse::Ok().json(state.store.get_schedule(&id)?))
}

async fn delete_schedule(id: web::Path<String>, state: web::Data<AppState>) -> HandlerResult {
    state.store.delete_schedule(&id)?;
    Ok(HttpResponse::NoContent().finish())
}

async fn export_latest_csv(state: web::Data<AppState>) -> HandlerResult {
    let saved = state
        .store
        .latest_schedule()?
        .ok_or(SchedulerError::ScheduleNotFound)?;
    let body = schedule_csv_bytes(&saved.sessions)?;
    let file_name = export_file_name(chrono::Local::now().date_naive());

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", file_name),
        ))
        .body(body))
}

async fn clear_all(state: web::Data<AppState>) -> HandlerResult {
    state.store.clear_all()?;
    Ok(HttpResponse::NoContent().finish())
}

/// Registers the JSON API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/health", web::get().to(health))
        .route("/api/participants", web::get().to(list_participants))
        .route("/api/participants", web::post().to(add_participant))
        .route("/api/participants/bulk", web::post().to(bulk_add_participants))
        .route("/api/participants/{id}", web::put().to(update_participant))
        .route("/api/participants/{id}", web::delete().to(delete_participant))
        .route("/api/config", web::get().to(get_config))
        .route("/api/config", web::put().to(set_config))
        .route("/api/schedules", web::get().to(list_schedules))
        .route("/api/schedules/generate", web::post().to(generate))
        .route("/api/schedules/latest", web::get().to(latest_schedule))
        .route("/api/schedules/latest/export.csv", web::get().to(export_latest_csv))
        // after the literal paths so "latest" is never taken for an id
        .route("/api/schedules/{id}", web::get().to(get_schedule))
        .route("/api/schedules/{id}", web::delete().to(delete_schedule))
        .route("/api/data", web::delete().to(clear_all));
}

pub async fn start_server(port: u16, store: Store, static_dir: Option<PathBuf>) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState { store });

    let static_dir = static_dir.filter(|dir| {
        let exists = dir.is_dir();
        if !exists {
            log::warn!("Static directory {} not found, serving API only", dir.display());
        }
        exists
    });

    HttpServer::new(move || {
        let mut app = App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure);
        if let Some(dir) = &static_dir {
            app = app.service(Files::new("/", dir).index_file("index.html"));
        }
        app
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{Participant, SavedSchedule};
    use actix_web::test;
    use serde_json::{json, Value};

    fn state() -> web::Data<AppState> {
        web::Data::new(AppState {
            store: Store::in_memory(),
        })
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(App::new().app_data($state.clone()).configure(configure)).await
        };
    }

    fn monday_config() -> Value {
        json!({
            "start_date": "2024-04-01",
            "day_of_week": 1,
            "frequency": 1,
            "presenters_per_session": 2,
        })
    }

    #[actix_web::test]
    async fn test_participant_crud() {
        let state = state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/participants")
            .set_json(json!({"name": "Alice", "slack_id": "@alice"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let alice: Participant = test::read_body_json(resp).await;
        assert_eq!(alice.name, "Alice");

        let req = test::TestRequest::put()
            .uri(&format!("/api/participants/{}", alice.id))
            .set_json(json!({"name": "Alicia"}))
            .to_request();
        let updated: Participant = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated.name, "Alicia");
        assert_eq!(updated.slack_id, None);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/participants/{}", alice.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::get().uri("/api/participants").to_request();
        let list: Vec<Participant> = test::call_and_read_body_json(&app, req).await;
        assert!(list.is_empty());
    }

    #[actix_web::test]
    async fn test_errors_map_to_status_codes() {
        let state = state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/participants")
            .set_json(json!({"name": "  "}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);

        let req = test::TestRequest::delete().uri("/api/participants/missing").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get().uri("/api/config").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get().uri("/api/schedules/latest").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_bulk_import() {
        let state = state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/participants/bulk")
            .set_json(json!({"text": "Taro,@taro\nHanako\t@hanako\n\nJiro"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let added: Vec<Participant> = test::read_body_json(resp).await;
        assert_eq!(added.len(), 3);
        assert_eq!(state.store.participant_count().unwrap(), 3);

        let req = test::TestRequest::post()
            .uri("/api/participants/bulk")
            .set_json(json!({"text": "\n \n"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_invalid_config_rejected() {
        let state = state();
        let app = app!(state);

        let mut config = monday_config();
        config["presenters_per_session"] = json!(0);
        let req = test::TestRequest::put().uri("/api/config").set_json(config).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(state.store.get_config().unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_generate_needs_config_and_participants() {
        let state = state();
        let app = app!(state);

        let req = test::TestRequest::post().uri("/api/schedules/generate").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::put().uri("/api/config").set_json(monday_config()).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::post().uri("/api/schedules/generate").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_generate_save_and_export() {
        let state = state();
        let app = app!(state);

        for name in ["A", "B", "C", "D", "E"] {
            state
                .store
                .add_participant(&ParticipantDraft::new(name, None))
                .unwrap();
        }
        let req = test::TestRequest::put().uri("/api/config").set_json(monday_config()).to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/api/schedules/generate")
            .set_json(json!({"name": "Spring talks"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let saved: SavedSchedule = test::read_body_json(resp).await;
        assert_eq!(saved.name, "Spring talks");
        let sizes: Vec<usize> = saved.sessions.iter().map(|s| s.presenters.len()).collect();
        assert_eq!(sizes, vec![2, 2, 1]);

        let req = test::TestRequest::get().uri("/api/schedules/latest").to_request();
        let latest: SavedSchedule = test::call_and_read_body_json(&app, req).await;
        assert_eq!(latest.id, saved.id);

        let req = test::TestRequest::get()
            .uri("/api/schedules/latest/export.csv")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let disposition = resp
            .headers()
            .get("Content-Disposition")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        assert!(disposition.contains("LT_Schedule_"));
        let body = test::read_body(resp).await;
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains("date,week_number,presenters,slack_ids"));
        assert!(text.contains("2024-04-01,1,"));
        assert!(text.contains("2024-04-15,3,"));
    }

    #[actix_web::test]
    async fn test_get_and_delete_schedule_by_id() {
        let state = state();
        let app = app!(state);
        let config: ScheduleConfig = serde_json::from_value(monday_config()).unwrap();
        let older = state.store.save_schedule("older", &config, Vec::new()).unwrap();
        let newer = state.store.save_schedule("newer", &config, Vec::new()).unwrap();

        let req = test::TestRequest::get()
            .uri(&format!("/api/schedules/{}", older.id))
            .to_request();
        let fetched: SavedSchedule = test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched.name, "older");

        let req = test::TestRequest::get().uri("/api/schedules/latest").to_request();
        let latest: SavedSchedule = test::call_and_read_body_json(&app, req).await;
        assert_eq!(latest.id, newer.id);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/schedules/{}", older.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::get()
            .uri(&format!("/api/schedules/{}", older.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete().uri("/api/schedules/missing").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get().uri("/api/schedules").to_request();
        let list: Vec<SavedSchedule> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, newer.id);
    }

    #[actix_web::test]
    async fn test_generate_with_out_of_range_frequency_is_bad_request() {
        let state = state();
        let app = app!(state);
        for name in ["A", "B"] {
            state.store.add_participant(&ParticipantDraft::new(name, None)).unwrap();
        }

        let mut config = monday_config();
        config["frequency"] = json!(u32::MAX);
        config["presenters_per_session"] = json!(1);
        let req = test::TestRequest::put().uri("/api/config").set_json(config).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::post().uri("/api/schedules/generate").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(state.store.latest_schedule().unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_health_and_clear() {
        let state = state();
        let app = app!(state);
        state.store.add_participant(&ParticipantDraft::new("A", None)).unwrap();

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["participants"], 1);

        let req = test::TestRequest::delete().uri("/api/data").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(state.store.participant_count().unwrap(), 0);
    }
}
