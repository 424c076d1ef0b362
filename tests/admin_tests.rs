// tests/admin_tests.rs

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use exam_portal::{
    attempt::session::InMemorySessionStore,
    config::Config,
    models::answer::NewAnswer,
    routes,
    state::AppState,
    store::{AnswerStore, QuestionStore, SqliteStore},
};
use std::sync::Arc;
use tower::ServiceExt;

const ADMIN_PASSWORD: &str = "letmein";

async fn build_app() -> (Router, SqliteStore) {
    let store = SqliteStore::in_memory().await.unwrap();

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "admin_test_secret".to_string(),
        jwt_expiration: 600,
        admin_password: ADMIN_PASSWORD.to_string(),
        port: 0,
        enforce_deadline: false,
        rust_log: "error".to_string(),
    };

    let state = AppState {
        store: store.clone(),
        sessions: Arc::new(InMemorySessionStore::new()),
        config,
    };

    (routes::create_router(state), store)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn bare_request(method: &str, uri: &str, token: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(body)
        .unwrap()
}

async fn login(app: &Router) -> String {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/admin/login",
            None,
            serde_json::json!({ "password": ADMIN_PASSWORD }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    body["token"].as_str().expect("Token not found").to_string()
}

async fn create_exam(app: &Router, token: &str) -> i64 {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/admin/exams",
            Some(token),
            serde_json::json!({
                "name": "Geography",
                "duration": 15,
                "total_questions": 2,
                "pass_rate": 50.0,
                "exam_date": "2025-06-01"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let (app, _) = build_app().await;

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/admin/login",
            None,
            serde_json::json!({ "password": "nope" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_require_token() {
    let (app, _) = build_app().await;

    let (status, _) = send(
        &app,
        Request::builder()
            .uri("/api/admin/results")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        bare_request("GET", "/api/admin/results", "not-a-token", Body::empty()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_exam_validates_input() {
    let (app, _) = build_app().await;
    let token = login(&app).await;

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/admin/exams",
            Some(&token),
            serde_json::json!({ "name": "", "duration": 10, "total_questions": 5 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/admin/exams",
            Some(&token),
            serde_json::json!({ "name": "X", "duration": 10, "total_questions": 5, "pass_rate": 150.0 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_then_export_round_trips() {
    let (app, store) = build_app().await;
    let token = login(&app).await;
    let exam_id = create_exam(&app, &token).await;

    let exam = store.exam(exam_id).await.unwrap().unwrap();
    assert!((exam.pass_rate - 0.5).abs() < 1e-9);

    let csv = "\u{feff}question,choice1,choice2,choice3,answer\r\n\
               Capital of Japan?,Tokyo,Osaka,Kyoto,Tokyo\r\n\
               ,,,,\r\n\
               Q1,A,B,C,B\r\n";
    let (status, body) = send(
        &app,
        bare_request(
            "POST",
            &format!("/api/admin/exams/{}/questions", exam_id),
            &token,
            Body::from(csv),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["imported"], 2);

    let stored = store.questions_for_exam(exam_id).await.unwrap();
    assert_eq!(stored[1].question_text, "Q1");
    assert_eq!(stored[1].choices, vec!["A", "B", "C"]);
    assert_eq!(stored[1].correct_answer, "B");

    // Export
    let response = app
        .clone()
        .oneshot(bare_request(
            "GET",
            &format!("/api/admin/exams/{}/export", exam_id),
            &token,
            Body::empty(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        format!("attachment; filename=exam_{}.csv", exam_id).as_str()
    );
    let exported = String::from_utf8(
        to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec(),
    )
    .unwrap();
    assert!(exported.starts_with('\u{feff}'));

    // Re-import the export into a second exam
    let second = create_exam(&app, &token).await;
    let (status, _) = send(
        &app,
        bare_request(
            "POST",
            &format!("/api/admin/exams/{}/questions", second),
            &token,
            Body::from(exported),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let copied = store.questions_for_exam(second).await.unwrap();
    assert_eq!(copied.len(), stored.len());
    for (a, b) in stored.iter().zip(&copied) {
        assert_eq!(a.question_text, b.question_text);
        assert_eq!(a.choices, b.choices);
        assert_eq!(a.correct_answer, b.correct_answer);
    }
}

#[tokio::test]
async fn upload_keeps_stray_quotes_and_rejects_unclosed_ones() {
    let (app, store) = build_app().await;
    let token = login(&app).await;
    let exam_id = create_exam(&app, &token).await;

    let (status, body) = send(
        &app,
        bare_request(
            "POST",
            &format!("/api/admin/exams/{}/questions", exam_id),
            &token,
            Body::from("q,a,b,answer\nScreen is 5\" wide?,Yes,No,Yes\nQ2,A,B,B\n"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["imported"], 2);

    let stored = store.questions_for_exam(exam_id).await.unwrap();
    assert_eq!(stored[0].question_text, "Screen is 5\" wide?");

    let (status, _) = send(
        &app,
        bare_request(
            "POST",
            &format!("/api/admin/exams/{}/questions", exam_id),
            &token,
            Body::from("q,a,b,answer\n\"Q3,A,B,A\nQ4,A,B,B\n"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(store.questions_for_exam(exam_id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn upload_to_unknown_exam_is_404() {
    let (app, _) = build_app().await;
    let token = login(&app).await;

    let (status, _) = send(
        &app,
        bare_request(
            "POST",
            "/api/admin/exams/77/questions",
            &token,
            Body::from("q,a,b,answer\nQ,A,B,A\n"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn results_aggregate_per_student() {
    let (app, store) = build_app().await;
    let token = login(&app).await;
    let exam_id = create_exam(&app, &token).await;

    let (status, _) = send(
        &app,
        bare_request(
            "POST",
            &format!("/api/admin/exams/{}/questions", exam_id),
            &token,
            Body::from("q,a,b,answer\nQ1,A,B,A\nQ2,A,B,B\n"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let questions = store.questions_for_exam(exam_id).await.unwrap();
    let record = |first: &str, second: &str| {
        vec![
            NewAnswer {
                question_id: questions[0].id,
                selected_answer: first.to_string(),
            },
            NewAnswer {
                question_id: questions[1].id,
                selected_answer: second.to_string(),
            },
        ]
    };
    store
        .replace_answers(exam_id, "佐藤", &record("A", "B"))
        .await
        .unwrap();
    store
        .replace_answers(exam_id, "taro", &record("B", "unanswered"))
        .await
        .unwrap();

    let (status, body) = send(
        &app,
        bare_request("GET", "/api/admin/results", &token, Body::empty()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let history: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["student_name"], "佐藤");
    assert_eq!(history[0]["score"], 2);
    assert_eq!(history[0]["passed"], true);
    assert_eq!(history[0]["exam_date"], "2025-06-01");
    assert_eq!(history[1]["student_name"], "taro");
    assert_eq!(history[1]["score"], 0);
    assert_eq!(history[1]["max_score"], 2);
    assert_eq!(history[1]["passed"], false);

    // Delete one student's answers (percent-encoded name)
    let (status, _) = send(
        &app,
        bare_request(
            "DELETE",
            &format!("/api/admin/exams/{}/answers/%E4%BD%90%E8%97%A4", exam_id),
            &token,
            Body::empty(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(store.answers_for(exam_id, "佐藤").await.unwrap().is_empty());
    assert_eq!(store.answers_for(exam_id, "taro").await.unwrap().len(), 2);

    // Nothing left to delete
    let (status, body) = send(
        &app,
        bare_request(
            "DELETE",
            &format!("/api/admin/exams/{}/answers/%E4%BD%90%E8%97%A4", exam_id),
            &token,
            Body::empty(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        body["error"],
        format!("No recorded answers for '佐藤' in exam {}", exam_id)
    );
}

#[tokio::test]
async fn delete_exam_cascades() {
    let (app, store) = build_app().await;
    let token = login(&app).await;
    let exam_id = create_exam(&app, &token).await;

    send(
        &app,
        bare_request(
            "POST",
            &format!("/api/admin/exams/{}/questions", exam_id),
            &token,
            Body::from("q,a,b,answer\nQ1,A,B,A\n"),
        ),
    )
    .await;

    let (status, _) = send(
        &app,
        bare_request(
            "DELETE",
            &format!("/api/admin/exams/{}", exam_id),
            &token,
            Body::empty(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(store.exam(exam_id).await.unwrap().is_none());
    assert!(store.questions_for_exam(exam_id).await.unwrap().is_empty());

    let (status, _) = send(
        &app,
        bare_request(
            "DELETE",
            &format!("/api/admin/exams/{}", exam_id),
            &token,
            Body::empty(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
