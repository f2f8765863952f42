use chrono::{Duration, Utc};
use job_board::account_cli::{create_account, AddAccountArgs};
use job_board::auth::TokenService;
use job_board::build_rocket;
use job_board::database::{Database, NewPosting, PostingRepository};
use job_board::types::Role;
use rocket::http::{ContentType, Cookie, Header, Status};
use rocket::local::asynchronous::Client;
use serde_json::{json, Value};

const PASSWORD: &str = "correct-horse";

fn account_args(username: &str, role: Role, verified: bool) -> AddAccountArgs {
    AddAccountArgs {
        username: username.to_string(),
        email: format!("{}@example.com", username),
        password: PASSWORD.to_string(),
        role,
        first_name: "Test".to_string(),
        last_name: username.to_string(),
        company: (role == Role::Employee).then(|| "Acme".to_string()),
        position: None,
        category: (role == Role::JobSeeker).then(|| "Backend".to_string()),
        verified,
    }
}

fn posting(company_id: i64, title: &str, category_id: Option<i64>, age_days: i64) -> NewPosting {
    NewPosting {
        company_id,
        title: title.to_string(),
        description: None,
        requirements: None,
        benefits: None,
        location: None,
        salary_min: None,
        salary_max: None,
        job_type_id: None,
        category_id,
        posted_date: Utc::now() - Duration::days(age_days),
        closing_date: None,
    }
}

struct Fixture {
    client: Client,
    cook_id: i64,
}

async fn setup() -> Fixture {
    let db = Database::in_memory().await.unwrap();
    let pool = db.pool();

    create_account(pool, &account_args("seeker", Role::JobSeeker, true), 4)
        .await
        .unwrap();
    create_account(pool, &account_args("recruiter", Role::Employee, true), 4)
        .await
        .unwrap();
    create_account(pool, &account_args("pending", Role::JobSeeker, false), 4)
        .await
        .unwrap();

    let repo = PostingRepository::new(pool);
    let company = repo.find_or_create_company("Acme").await.unwrap();
    let field = repo.find_or_create_field("Technology").await.unwrap();
    let backend = repo.find_or_create_category("Backend", Some(field)).await.unwrap();
    let frontend = repo.find_or_create_category("Frontend", Some(field)).await.unwrap();

    repo.create(&posting(company, "Senior Developer", Some(backend), 0))
        .await
        .unwrap();
    repo.create(&posting(company, "Frontend Engineer", Some(frontend), 1))
        .await
        .unwrap();
    repo.create(&posting(company, "Junior Developer", None, 40))
        .await
        .unwrap();
    let cook_id = repo
        .create(&posting(company, "Line Cook", None, 2))
        .await
        .unwrap();
    for _ in 0..5 {
        repo.record_view(cook_id).await.unwrap();
    }

    let tokens = TokenService::new("integration-secret", 7);
    let rocket = build_rocket(rocket::Config::figment(), db, tokens);
    let client = Client::untracked(rocket).await.unwrap();

    Fixture { client, cook_id }
}

async fn login(client: &Client, username: &str, user_type: &str) -> (Status, Value) {
    let response = client
        .post("/api/auth/login")
        .header(ContentType::JSON)
        .body(
            json!({ "username": username, "password": PASSWORD, "user_type": user_type })
                .to_string(),
        )
        .dispatch()
        .await;
    let status = response.status();
    (status, response.into_json::<Value>().await.unwrap())
}

async fn token_for(client: &Client, username: &str, user_type: &str) -> String {
    let (status, body) = login(client, username, user_type).await;
    assert_eq!(status, Status::Ok, "{}", body);
    body["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_login_issues_token_and_legacy_cookie() {
    let fx = setup().await;

    let response = fx
        .client
        .post("/api/auth/login")
        .header(ContentType::JSON)
        .body(json!({ "email": "seeker@example.com", "password": PASSWORD, "user_type": "jobseeker" }).to_string())
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);
    assert!(response.cookies().get("token").is_some());

    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["data"]["status"], "authenticated");
    assert_eq!(body["data"]["redirect"], "/jobseeker/dashboard");
    assert_eq!(body["data"]["profile"]["kind"], "job_seeker");

    let token = body["data"]["token"].as_str().unwrap();
    let me = fx
        .client
        .get("/api/auth/me")
        .header(Header::new("Authorization", format!("Bearer {}", token)))
        .dispatch()
        .await;
    assert_eq!(me.status(), Status::Ok);

    let me: Value = me.into_json().await.unwrap();
    assert_eq!(me["data"]["username"], "seeker");
    assert_eq!(me["data"]["user_type"], "jobseeker");
    assert_eq!(me["data"]["role_code"], Role::JOB_SEEKER_CODE);
}

#[tokio::test]
async fn test_bad_credentials_look_the_same() {
    let fx = setup().await;

    let wrong_password = fx
        .client
        .post("/api/auth/login")
        .header(ContentType::JSON)
        .body(json!({ "username": "seeker", "password": "nope", "user_type": "jobseeker" }).to_string())
        .dispatch()
        .await;
    assert_eq!(wrong_password.status(), Status::Unauthorized);
    let wrong_password: Value = wrong_password.into_json().await.unwrap();

    let (status, unknown) = login(&fx.client, "ghost", "jobseeker").await;
    assert_eq!(status, Status::Unauthorized);

    assert_eq!(wrong_password, unknown);
    assert_eq!(unknown["error_code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_role_mismatch_names_the_real_role() {
    let fx = setup().await;

    let (status, body) = login(&fx.client, "seeker", "employee").await;
    assert_eq!(status, Status::Forbidden);
    assert_eq!(body["error_code"], "ROLE_MISMATCH");
    assert!(body["error"].as_str().unwrap().contains("Job Seeker"));
}

#[tokio::test]
async fn test_unverified_account_is_sent_to_verification() {
    let fx = setup().await;

    for user_type in ["jobseeker", "employee"] {
        let (status, body) = login(&fx.client, "pending", user_type).await;
        assert_eq!(status, Status::Ok);
        assert_eq!(body["data"]["status"], "verification_required");
        assert_eq!(body["data"]["email"], "pending@example.com");
        assert!(body["data"].get("token").is_none());
    }
}

#[tokio::test]
async fn test_unknown_user_type() {
    let fx = setup().await;

    let (status, body) = login(&fx.client, "seeker", "astronaut").await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["error_code"], "INVALID_USER_TYPE");
}

#[tokio::test]
async fn test_token_extraction() {
    let fx = setup().await;
    let token = token_for(&fx.client, "recruiter", "employee").await;

    let missing = fx.client.get("/api/auth/me").dispatch().await;
    assert_eq!(missing.status(), Status::Unauthorized);
    let missing: Value = missing.into_json().await.unwrap();
    assert_eq!(missing["error_code"], "UNAUTHORIZED");

    let malformed = fx
        .client
        .get("/api/auth/me")
        .header(Header::new("Authorization", format!("Token {}", token)))
        .dispatch()
        .await;
    assert_eq!(malformed.status(), Status::Unauthorized);

    let forged = fx
        .client
        .get("/api/auth/me")
        .header(Header::new("Authorization", "Bearer not.a.jwt"))
        .dispatch()
        .await;
    assert_eq!(forged.status(), Status::Unauthorized);

    let legacy = fx
        .client
        .get("/api/auth/me")
        .cookie(Cookie::new("token", token))
        .dispatch()
        .await;
    assert_eq!(legacy.status(), Status::Ok);
    let legacy: Value = legacy.into_json().await.unwrap();
    assert_eq!(legacy["data"]["user_type"], "employee");
    assert_eq!(legacy["data"]["profile"]["company"]["name"], "Acme");
}

#[tokio::test]
async fn test_search_ranks_by_relevance() {
    let fx = setup().await;

    let response = fx
        .client
        .get("/api/jobs/search?keywords=senior%20developer")
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["data"]["sort"], "relevance");
    assert_eq!(body["data"]["total"], 2);

    let results = body["data"]["results"].as_array().unwrap();
    assert_eq!(results[0]["title"], "Senior Developer");
    // 35 from the title plus the 3 point recency bonus
    assert_eq!(results[0]["relevance_score"], 38);
    assert_eq!(results[1]["title"], "Junior Developer");
    assert_eq!(results[1]["relevance_score"], 10);
}

#[tokio::test]
async fn test_search_without_keywords_lists_newest_first() {
    let fx = setup().await;

    let response = fx.client.get("/api/jobs/search?limit=2&page=1").dispatch().await;
    let body: Value = response.into_json().await.unwrap();

    assert_eq!(body["data"]["sort"], "newest");
    assert_eq!(body["data"]["total"], 4);
    let titles: Vec<&str> = body["data"]["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Senior Developer", "Frontend Engineer"]);
}

#[tokio::test]
async fn test_job_detail_records_views() {
    let fx = setup().await;

    let first = fx.client.get(format!("/api/jobs/{}", fx.cook_id)).dispatch().await;
    assert_eq!(first.status(), Status::Ok);
    let first: Value = first.into_json().await.unwrap();
    assert_eq!(first["data"]["views"], 5);

    let token = token_for(&fx.client, "seeker", "jobseeker").await;
    let second: Value = fx
        .client
        .get(format!("/api/jobs/{}", fx.cook_id))
        .header(Header::new("Authorization", format!("Bearer {}", token)))
        .dispatch()
        .await
        .into_json()
        .await
        .unwrap();
    assert_eq!(second["data"]["views"], 6);

    let forged = fx
        .client
        .get(format!("/api/jobs/{}", fx.cook_id))
        .header(Header::new("Authorization", "Bearer not.a.jwt"))
        .dispatch()
        .await;
    assert_eq!(forged.status(), Status::Ok);

    let missing = fx.client.get("/api/jobs/9999").dispatch().await;
    assert_eq!(missing.status(), Status::NotFound);
    let missing: Value = missing.into_json().await.unwrap();
    assert_eq!(missing["error_code"], "JOB_NOT_FOUND");
}

#[tokio::test]
async fn test_recommendations_blend_preferred_related_and_popular() {
    let fx = setup().await;
    let token = token_for(&fx.client, "seeker", "jobseeker").await;

    let response = fx
        .client
        .get("/api/jobs/recommendations?limit=3")
        .header(Header::new("Authorization", format!("Bearer {}", token)))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let body: Value = response.into_json().await.unwrap();
    let titles: Vec<&str> = body["data"]["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Senior Developer", "Frontend Engineer", "Line Cook"]);
}

#[tokio::test]
async fn test_recommendations_require_a_job_seeker() {
    let fx = setup().await;

    let anonymous = fx.client.get("/api/jobs/recommendations").dispatch().await;
    assert_eq!(anonymous.status(), Status::Unauthorized);

    let token = token_for(&fx.client, "recruiter", "employee").await;
    let employee = fx
        .client
        .get("/api/jobs/recommendations")
        .header(Header::new("Authorization", format!("Bearer {}", token)))
        .dispatch()
        .await;
    assert_eq!(employee.status(), Status::Forbidden);
}

#[tokio::test]
async fn test_logout_clears_cookie_and_health_is_ok() {
    let fx = setup().await;

    let logout = fx.client.post("/api/auth/logout").dispatch().await;
    assert_eq!(logout.status(), Status::Ok);

    let health = fx.client.get("/api/health").dispatch().await;
    assert_eq!(health.status(), Status::Ok);
    let health: Value = health.into_json().await.unwrap();
    assert_eq!(health["message"], "OK");
}
