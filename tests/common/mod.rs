use axum::Router;
use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use schoolhub::utils::password::hash_password;
use sqlx::{Postgres, Transaction};
use tower::ServiceExt;
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Create a test user with the given role.
/// role should be one of: "admin", "teacher", "student"
pub async fn create_test_user(
    tx: &mut Transaction<'_, Postgres>,
    name: &str,
    email: &str,
    password: &str,
    role: &str,
) -> TestUser {
    let hashed = hash_password(password).unwrap();

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (name, email, password, role)
         VALUES ($1, $2, $3, $4)
         RETURNING id",
    )
    .bind(name)
    .bind(email)
    .bind(hashed)
    .bind(role)
    .fetch_one(&mut **tx)
    .await
    .unwrap();

    TestUser {
        id,
        email: email.to_string(),
        password: password.to_string(),
        role: role.to_string(),
    }
}

#[allow(dead_code)]
pub async fn create_test_subject(tx: &mut Transaction<'_, Postgres>, name: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>("INSERT INTO subjects (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(&mut **tx)
        .await
        .unwrap()
}

#[allow(dead_code)]
pub async fn create_test_class(
    tx: &mut Transaction<'_, Postgres>,
    name: &str,
    subject_id: Uuid,
    teacher_id: Uuid,
) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO classes (name, subject_id, teacher_id)
         VALUES ($1, $2, $3)
         RETURNING id",
    )
    .bind(name)
    .bind(subject_id)
    .bind(teacher_id)
    .fetch_one(&mut **tx)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn enroll_test_student(
    tx: &mut Transaction<'_, Postgres>,
    class_id: Uuid,
    student_id: Uuid,
) {
    sqlx::query("INSERT INTO class_students (class_id, student_id) VALUES ($1, $2)")
        .bind(class_id)
        .bind(student_id)
        .execute(&mut **tx)
        .await
        .unwrap();
}

#[allow(dead_code)]
pub async fn create_test_grade(
    tx: &mut Transaction<'_, Postgres>,
    student_id: Uuid,
    subject_id: Uuid,
    score: f64,
) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO grades (student_id, subject_id, score)
         VALUES ($1, $2, $3)
         RETURNING id",
    )
    .bind(student_id)
    .bind(subject_id)
    .bind(score)
    .fetch_one(&mut **tx)
    .await
    .unwrap()
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

#[allow(dead_code)]
pub fn generate_unique_name(prefix: &str) -> String {
    format!("{} {}", prefix, Uuid::new_v4())
}

/// Log in through the API and return the access token.
#[allow(dead_code)]
pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({
                "email": email,
                "password": password
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    body["access_token"].as_str().unwrap().to_string()
}
