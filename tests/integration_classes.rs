mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use schoolhub::config::cors::CorsConfig;
use schoolhub::config::jwt::JwtConfig;
use schoolhub::router::init_router;
use schoolhub::state::AppState;
use common::{
    create_test_class, create_test_subject, create_test_user, enroll_test_student,
    generate_unique_email, generate_unique_name, login,
};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

async fn setup_test_app(pool: PgPool) -> axum::Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
    };
    init_router(state)
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_can_create_class(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();

    let admin_email = generate_unique_email();
    create_test_user(&mut tx, "Admin", &admin_email, "adminpass1", "admin").await;
    let teacher =
        create_test_user(&mut tx, "Teacher", &generate_unique_email(), "teachpass1", "teacher")
            .await;
    let subject_id = create_test_subject(&mut tx, &generate_unique_name("Math")).await;

    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = login(&app, &admin_email, "adminpass1").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/classes")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({
                "name": "Math 101",
                "subject_id": subject_id,
                "teacher_id": teacher.id
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(body["name"], "Math 101");
    assert_eq!(body["teacher"]["id"], teacher.id.to_string());
    assert_eq!(body["subject"]["id"], subject_id.to_string());
    assert!(body["students"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_class_rejects_non_teacher(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();

    let admin_email = generate_unique_email();
    create_test_user(&mut tx, "Admin", &admin_email, "adminpass1", "admin").await;
    let student =
        create_test_user(&mut tx, "Student", &generate_unique_email(), "studpass1", "student")
            .await;
    let subject_id = create_test_subject(&mut tx, &generate_unique_name("Math")).await;

    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = login(&app, &admin_email, "adminpass1").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/classes")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({
                "name": "Bad Class",
                "subject_id": subject_id,
                "teacher_id": student.id
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_cannot_create_class(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();

    let teacher_email = generate_unique_email();
    let teacher = create_test_user(&mut tx, "Teacher", &teacher_email, "teachpass1", "teacher").await;
    let subject_id = create_test_subject(&mut tx, &generate_unique_name("Math")).await;

    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = login(&app, &teacher_email, "teachpass1").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/classes")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({
                "name": "My Class",
                "subject_id": subject_id,
                "teacher_id": teacher.id
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_enroll_and_unenroll_student(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();

    let admin_email = generate_unique_email();
    create_test_user(&mut tx, "Admin", &admin_email, "adminpass1", "admin").await;
    let teacher =
        create_test_user(&mut tx, "Teacher", &generate_unique_email(), "teachpass1", "teacher")
            .await;
    let student =
        create_test_user(&mut tx, "Student", &generate_unique_email(), "studpass1", "student")
            .await;
    let subject_id = create_test_subject(&mut tx, &generate_unique_name("Math")).await;
    let class_id = create_test_class(&mut tx, "Math 101", subject_id, teacher.id).await;

    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = login(&app, &admin_email, "adminpass1").await;

    // Enroll
    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/classes/{}/enroll", class_id))
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({ "student_id": student.id })).unwrap(),
        ))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["students"].as_array().unwrap().len(), 1);
    assert_eq!(body["students"][0]["id"], student.id.to_string());

    // Enrolling twice is rejected
    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/classes/{}/enroll", class_id))
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({ "student_id": student.id })).unwrap(),
        ))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unenroll
    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/classes/{}/unenroll", class_id))
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({ "student_id": student.id })).unwrap(),
        ))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Unenrolling again is rejected
    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/classes/{}/unenroll", class_id))
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({ "student_id": student.id })).unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_enroll_rejects_non_student(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();

    let admin_email = generate_unique_email();
    create_test_user(&mut tx, "Admin", &admin_email, "adminpass1", "admin").await;
    let teacher =
        create_test_user(&mut tx, "Teacher", &generate_unique_email(), "teachpass1", "teacher")
            .await;
    let other_teacher =
        create_test_user(&mut tx, "Other", &generate_unique_email(), "teachpass2", "teacher")
            .await;
    let subject_id = create_test_subject(&mut tx, &generate_unique_name("Math")).await;
    let class_id = create_test_class(&mut tx, "Math 101", subject_id, teacher.id).await;

    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = login(&app, &admin_email, "adminpass1").await;

    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/classes/{}/enroll", class_id))
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({ "student_id": other_teacher.id })).unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_class_listing_is_role_scoped(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();

    let admin_email = generate_unique_email();
    create_test_user(&mut tx, "Admin", &admin_email, "adminpass1", "admin").await;

    let teacher_email = generate_unique_email();
    let teacher = create_test_user(&mut tx, "Teacher", &teacher_email, "teachpass1", "teacher").await;
    let other_teacher =
        create_test_user(&mut tx, "Other", &generate_unique_email(), "teachpass2", "teacher")
            .await;

    let student_email = generate_unique_email();
    let student = create_test_user(&mut tx, "Student", &student_email, "studpass1", "student").await;

    let subject_id = create_test_subject(&mut tx, &generate_unique_name("Math")).await;
    let taught_class = create_test_class(&mut tx, "Taught", subject_id, teacher.id).await;
    let other_class = create_test_class(&mut tx, "Other", subject_id, other_teacher.id).await;
    enroll_test_student(&mut tx, other_class, student.id).await;

    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;

    // Admin sees both classes
    let token = login(&app, &admin_email, "adminpass1").await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/classes")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body.as_array().unwrap().len(), 2);

    // Teacher sees only the class they teach
    let token = login(&app, &teacher_email, "teachpass1").await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/classes")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], taught_class.to_string());

    // Student sees only the class they're enrolled in
    let token = login(&app, &student_email, "studpass1").await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/classes")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], other_class.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_can_update_and_delete_class(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();

    let admin_email = generate_unique_email();
    create_test_user(&mut tx, "Admin", &admin_email, "adminpass1", "admin").await;
    let teacher =
        create_test_user(&mut tx, "Teacher", &generate_unique_email(), "teachpass1", "teacher")
            .await;
    let subject_id = create_test_subject(&mut tx, &generate_unique_name("Math")).await;
    let class_id = create_test_class(&mut tx, "Old Name", subject_id, teacher.id).await;

    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = login(&app, &admin_email, "adminpass1").await;

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/classes/{}", class_id))
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({ "name": "New Name" })).unwrap(),
        ))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["name"], "New Name");
    assert_eq!(body["teacher"]["id"], teacher.id.to_string());

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/classes/{}", class_id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/classes/{}", class_id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
