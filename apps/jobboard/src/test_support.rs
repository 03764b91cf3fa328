//! In-process stand-in for the job-board backend, for end-to-end client tests.
//!
//! Fixture data:
//! - `seeker@example.com` / `secret1`, token `tok-seeker`, resume `r1`
//! - `hirer@example.com` / `secret1`, token `tok-hirer`, owns every Globex job
//! - jobs `job-1`..`job-8` titled `Job N`; even ids are Globex, odd ids Initech
//! - any other bearer token is rejected with 401

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{ApiClient, JobBoardApi, RecalculateResponse, RecommendationsResponse};
use crate::config::Config;
use crate::errors::ClientError;
use crate::models::{ApplicationStatus, FitScore, InterviewPrepGuide, Job, Role, User};
use crate::store::Store;

const JOB_COUNT: u32 = 8;

type Reply = (StatusCode, Json<Value>);
type Shared = Arc<Mutex<StubData>>;

pub fn seeker(resume_id: Option<&str>) -> User {
    User {
        id: "u-seeker".to_string(),
        name: "Asha Rao".to_string(),
        email: "seeker@example.com".to_string(),
        role: Role::JobSeeker,
        resume_id: resume_id.map(str::to_string),
    }
}

pub fn hirer() -> User {
    User {
        id: "u-hirer".to_string(),
        name: "Dana Globex".to_string(),
        email: "hirer@example.com".to_string(),
        role: Role::Hirer,
        resume_id: None,
    }
}

pub fn job(id: &str, score: Option<f64>) -> Job {
    Job {
        id: id.to_string(),
        title: format!("Title {id}"),
        company: "Acme".to_string(),
        location: "Remote".to_string(),
        salary: String::new(),
        skills: vec!["rust".to_string()],
        experience: String::new(),
        job_type: "Full-time".to_string(),
        work_mode: "Remote".to_string(),
        description: String::new(),
        fit_score: score.map(FitScore::Percentage),
    }
}

pub fn guide() -> InterviewPrepGuide {
    InterviewPrepGuide {
        company_info: Some("Acme builds rockets.".to_string()),
        role_level: Some("SDE-1".to_string()),
        ..InterviewPrepGuide::default()
    }
}

/// `JobBoardApi` with canned answers and call counters, for the timer-driven flows.
///
/// Unscripted recommendation reads return an empty, settled response.
#[derive(Default)]
pub struct ScriptedApi {
    recommendations: Mutex<VecDeque<Result<RecommendationsResponse, ClientError>>>,
    recalc_error: Mutex<Option<ClientError>>,
    prep: Mutex<Option<Result<InterviewPrepGuide, ClientError>>>,
    prep_delay: Duration,
    pub recommendation_calls: AtomicUsize,
    pub recalc_calls: AtomicUsize,
    pub prep_calls: AtomicUsize,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_recommendations(
        self,
        response: Result<RecommendationsResponse, ClientError>,
    ) -> Self {
        self.recommendations.lock().unwrap().push_back(response);
        self
    }

    pub fn with_recalc_error(self, err: ClientError) -> Self {
        *self.recalc_error.lock().unwrap() = Some(err);
        self
    }

    /// The prep call resolves with `result` after `delay` of (tokio) time.
    pub fn with_prep(mut self, result: Result<InterviewPrepGuide, ClientError>, delay: Duration) -> Self {
        *self.prep.lock().unwrap() = Some(result);
        self.prep_delay = delay;
        self
    }
}

#[async_trait]
impl JobBoardApi for ScriptedApi {
    async fn recommendations(&self) -> Result<RecommendationsResponse, ClientError> {
        self.recommendation_calls.fetch_add(1, Ordering::SeqCst);
        self.recommendations
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(RecommendationsResponse::default()))
    }

    async fn recalculate_scores(&self) -> Result<RecalculateResponse, ClientError> {
        self.recalc_calls.fetch_add(1, Ordering::SeqCst);
        match self.recalc_error.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(RecalculateResponse { success: true }),
        }
    }

    async fn interview_prep(&self, _application_id: &str) -> Result<InterviewPrepGuide, ClientError> {
        self.prep_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.prep_delay).await;
        self.prep.lock().unwrap().take().unwrap_or_else(|| Ok(guide()))
    }
}

struct StubUser {
    user: User,
    password: String,
    token: String,
}

struct StubApplication {
    id: String,
    job_id: String,
    applicant_id: String,
    status: ApplicationStatus,
    applied_at: DateTime<Utc>,
}

struct StubData {
    users: Vec<StubUser>,
    applications: Vec<StubApplication>,
    next_id: u32,
}

impl StubData {
    fn seeded() -> Self {
        Self {
            users: vec![
                StubUser {
                    user: seeker(Some("r1")),
                    password: "secret1".to_string(),
                    token: "tok-seeker".to_string(),
                },
                StubUser {
                    user: hirer(),
                    password: "secret1".to_string(),
                    token: "tok-hirer".to_string(),
                },
            ],
            applications: Vec::new(),
            next_id: 1,
        }
    }

    fn next_id(&mut self, prefix: &str) -> String {
        let id = format!("{prefix}-{}", self.next_id);
        self.next_id += 1;
        id
    }

    fn user_for(&self, headers: &HeaderMap) -> Result<User, Reply> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        self.users
            .iter()
            .find(|u| Some(u.token.as_str()) == token)
            .map(|u| u.user.clone())
            .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Invalid or expired token"))
    }

    fn user_with_role(&self, headers: &HeaderMap, role: Role) -> Result<User, Reply> {
        let user = self.user_for(headers)?;
        if user.role != role {
            return Err(error(
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                &format!("Only a {} can do this", role.label()),
            ));
        }
        Ok(user)
    }

    fn application_json(&self, application: &StubApplication) -> Value {
        let number = job_number(&application.job_id).unwrap_or(1);
        json!({
            "_id": application.id,
            "job": job_json(number, None),
            "applicant": application.applicant_id,
            "status": application.status.as_str(),
            "createdAt": application.applied_at.to_rfc3339(),
            "interviewPrepUrl": format!("/interview-prep/{}", application.id),
        })
    }
}

fn error(status: StatusCode, code: &str, message: &str) -> Reply {
    (
        status,
        Json(json!({"error": {"code": code, "message": message}})),
    )
}

fn ok(body: Value) -> Reply {
    (StatusCode::OK, Json(body))
}

fn job_number(job_id: &str) -> Option<u32> {
    job_id
        .strip_prefix("job-")
        .and_then(|n| n.parse().ok())
        .filter(|n| (1..=JOB_COUNT).contains(n))
}

fn company(number: u32) -> &'static str {
    if number % 2 == 0 {
        "Globex"
    } else {
        "Initech"
    }
}

/// Every third job has no score yet.
fn fit_score(number: u32) -> Option<u32> {
    (number % 3 != 0).then_some(40 + number * 5)
}

fn job_json(number: u32, fit_score: Option<u32>) -> Value {
    let work_mode = if number % 2 == 0 { "Remote" } else { "Onsite" };
    json!({
        "_id": format!("job-{number}"),
        "title": format!("Job {number}"),
        "company": company(number),
        "location": "Bengaluru",
        "salary": {"min": 10, "max": 20, "display": "10-20 LPA"},
        "skills": ["rust", "postgres"],
        "experience": "1-3 years",
        "jobType": "Full-time",
        "workMode": work_mode,
        "description": format!("Description of job {number}"),
        "fitScore": fit_score,
    })
}

#[derive(Deserialize)]
struct ListQuery {
    page: Option<u32>,
    limit: Option<u32>,
    search: Option<String>,
}

fn paginate(query: &ListQuery, scored: bool) -> Value {
    let needle = query.search.as_deref().unwrap_or("").to_lowercase();
    let matching: Vec<u32> = (1..=JOB_COUNT)
        .filter(|n| {
            needle.is_empty()
                || format!("Job {n}").to_lowercase().contains(&needle)
                || company(*n).to_lowercase().contains(&needle)
        })
        .collect();

    let limit = query.limit.unwrap_or(6).max(1);
    let page = query.page.unwrap_or(1).max(1);
    let total = matching.len() as u32;
    let jobs: Vec<Value> = matching
        .iter()
        .skip(((page - 1) * limit) as usize)
        .take(limit as usize)
        .map(|n| job_json(*n, if scored { fit_score(*n) } else { None }))
        .collect();

    json!({
        "jobs": jobs,
        "pagination": {"total": total, "pages": total.div_ceil(limit), "page": page},
    })
}

async fn login(State(data): State<Shared>, Json(body): Json<Value>) -> Reply {
    let data = data.lock().unwrap();
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    match data
        .users
        .iter()
        .find(|u| u.user.email == email && u.password == password)
    {
        Some(u) => ok(json!({"token": u.token, "user": u.user})),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid credentials"})),
        ),
    }
}

async fn register(State(data): State<Shared>, Json(body): Json<Value>) -> Reply {
    let mut data = data.lock().unwrap();
    let email = body["email"].as_str().unwrap_or_default().to_string();
    if data.users.iter().any(|u| u.user.email == email) {
        return error(StatusCode::BAD_REQUEST, "EMAIL_TAKEN", "Email already registered");
    }
    let role: Role = match serde_json::from_value(body["role"].clone()) {
        Ok(role) => role,
        Err(_) => return error(StatusCode::BAD_REQUEST, "VALIDATION", "Unknown role"),
    };
    let id = data.next_id("u");
    let user = User {
        id: id.clone(),
        name: body["name"].as_str().unwrap_or_default().to_string(),
        email,
        role,
        resume_id: None,
    };
    let token = format!("tok-{id}");
    data.users.push(StubUser {
        user: user.clone(),
        password: body["password"].as_str().unwrap_or_default().to_string(),
        token: token.clone(),
    });
    (StatusCode::CREATED, Json(json!({"token": token, "user": user})))
}

async fn me(State(data): State<Shared>, headers: HeaderMap) -> Reply {
    let data = data.lock().unwrap();
    match data.user_for(&headers) {
        Ok(user) => ok(json!({"user": user})),
        Err(reply) => reply,
    }
}

async fn list_jobs(Query(query): Query<ListQuery>) -> Reply {
    ok(paginate(&query, false))
}

async fn recommended_jobs(
    State(data): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Reply {
    let data = data.lock().unwrap();
    match data.user_for(&headers) {
        Ok(_) => ok(paginate(&query, true)),
        Err(reply) => reply,
    }
}

async fn get_job(Path(job_id): Path<String>) -> Reply {
    match job_number(&job_id) {
        Some(n) => ok(json!({"job": job_json(n, None)})),
        None => error(StatusCode::NOT_FOUND, "NOT_FOUND", "Job not found"),
    }
}

/// A partial cache: scoring is still running in the background.
async fn recommendations(State(data): State<Shared>, headers: HeaderMap) -> Reply {
    let data = data.lock().unwrap();
    if let Err(reply) = data.user_with_role(&headers, Role::JobSeeker) {
        return reply;
    }
    ok(json!({
        "recommendations": [
            {"job": job_json(1, None)},
            {"job": job_json(3, None), "fitScore": {"fitScore": 40, "recommendation": "Not recommended"}},
            job_json(7, Some(90)),
        ],
        "totalCached": 3,
        "totalJobs": JOB_COUNT,
        "isCalculating": true,
    }))
}

async fn apply(
    State(data): State<Shared>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Reply {
    let mut data = data.lock().unwrap();
    let user = match data.user_with_role(&headers, Role::JobSeeker) {
        Ok(user) => user,
        Err(reply) => return reply,
    };
    if job_number(&job_id).is_none() {
        return error(StatusCode::NOT_FOUND, "NOT_FOUND", "Job not found");
    }
    if data
        .applications
        .iter()
        .any(|a| a.job_id == job_id && a.applicant_id == user.id)
    {
        return error(
            StatusCode::BAD_REQUEST,
            "ALREADY_APPLIED",
            "You have already applied to this job",
        );
    }
    let id = data.next_id("app");
    data.applications.push(StubApplication {
        id: id.clone(),
        job_id,
        applicant_id: user.id,
        status: ApplicationStatus::Applied,
        applied_at: Utc::now(),
    });
    (
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "application": {"_id": id, "interviewPrepUrl": format!("/interview-prep/{id}")},
        })),
    )
}

async fn check_application(
    State(data): State<Shared>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Reply {
    let data = data.lock().unwrap();
    let user = match data.user_for(&headers) {
        Ok(user) => user,
        Err(reply) => return reply,
    };
    match data
        .applications
        .iter()
        .find(|a| a.job_id == job_id && a.applicant_id == user.id)
    {
        Some(a) => ok(json!({"applied": true, "application": {"_id": a.id}})),
        None => ok(json!({"applied": false})),
    }
}

async fn my_applications(State(data): State<Shared>, headers: HeaderMap) -> Reply {
    let data = data.lock().unwrap();
    let user = match data.user_for(&headers) {
        Ok(user) => user,
        Err(reply) => return reply,
    };
    let applications: Vec<Value> = data
        .applications
        .iter()
        .filter(|a| a.applicant_id == user.id)
        .map(|a| data.application_json(a))
        .collect();
    ok(json!({"applications": applications}))
}

async fn upload_resume(
    State(data): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Reply {
    let user = match data.lock().unwrap().user_with_role(&headers, Role::JobSeeker) {
        Ok(user) => user,
        Err(reply) => return reply,
    };

    let mut received = false;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("resume") {
            received = field.bytes().await.map(|b| !b.is_empty()).unwrap_or(false);
        }
    }
    if !received {
        return error(StatusCode::BAD_REQUEST, "VALIDATION", "No resume file uploaded");
    }

    let mut data = data.lock().unwrap();
    let resume_id = data.next_id("r");
    if let Some(stored) = data.users.iter_mut().find(|u| u.user.id == user.id) {
        stored.user.resume_id = Some(resume_id.clone());
    }
    ok(json!({"success": true, "resumeId": resume_id}))
}

async fn recalculate_scores(State(data): State<Shared>, headers: HeaderMap) -> Reply {
    let data = data.lock().unwrap();
    match data.user_with_role(&headers, Role::JobSeeker) {
        Ok(_) => ok(json!({"success": true, "message": "Recalculation started"})),
        Err(reply) => reply,
    }
}

async fn interview_prep(
    State(data): State<Shared>,
    headers: HeaderMap,
    Path(application_id): Path<String>,
) -> Reply {
    let data = data.lock().unwrap();
    let user = match data.user_for(&headers) {
        Ok(user) => user,
        Err(reply) => return reply,
    };
    let Some(application) = data
        .applications
        .iter()
        .find(|a| a.id == application_id && a.applicant_id == user.id)
    else {
        return error(StatusCode::NOT_FOUND, "NOT_FOUND", "Application not found");
    };
    let number = job_number(&application.job_id).unwrap_or(1);
    ok(json!({
        "success": true,
        "interviewPrep": {
            "company_info": format!("{} builds enterprise software.", company(number)),
            "role_level": "SDE-1",
            "interview_links": [{"title": "Interview experience", "url": "https://example.com/exp"}],
            "interview_rounds": {
                "total_rounds": 2,
                "typical_duration": "2-3 weeks",
                "rounds": [
                    {"round_number": 1, "name": "Online Assessment", "type": "DSA", "tips": ["Practice arrays"]},
                    {"round_number": 2, "name": "Hiring Manager", "type": "Behavioral"}
                ]
            },
            "common_questions": [
                {"question": "Tell me about yourself", "category": "Intro", "how_to_answer": "Keep it to two minutes"}
            ],
            "prepared_answers": [
                {"question": "How is success measured here?", "why_ask": "Shows focus on impact"}
            ]
        }
    }))
}

async fn hirer_jobs(State(data): State<Shared>, headers: HeaderMap) -> Reply {
    let data = data.lock().unwrap();
    if let Err(reply) = data.user_with_role(&headers, Role::Hirer) {
        return reply;
    }
    let jobs: Vec<Value> = (1..=JOB_COUNT)
        .filter(|n| company(*n) == "Globex")
        .map(|n| {
            let job_id = format!("job-{n}");
            let mut job = job_json(n, None);
            job["applicationsCount"] = json!(data
                .applications
                .iter()
                .filter(|a| a.job_id == job_id)
                .count());
            job
        })
        .collect();
    ok(json!({"jobs": jobs}))
}

async fn job_candidates(
    State(data): State<Shared>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Reply {
    let data = data.lock().unwrap();
    if let Err(reply) = data.user_with_role(&headers, Role::Hirer) {
        return reply;
    }
    let candidates: Vec<Value> = data
        .applications
        .iter()
        .filter(|a| a.job_id == job_id)
        .map(|a| {
            let applicant = data.users.iter().find(|u| u.user.id == a.applicant_id);
            json!({
                "_id": a.id,
                "name": applicant.map(|u| u.user.name.clone()).unwrap_or_default(),
                "email": applicant.map(|u| u.user.email.clone()).unwrap_or_default(),
                "status": a.status.as_str(),
                "fitScore": 72,
                "createdAt": a.applied_at.to_rfc3339(),
                "resumeId": applicant.and_then(|u| u.user.resume_id.clone()),
            })
        })
        .collect();
    ok(json!({"candidates": candidates}))
}

fn hirer_application<'a>(
    data: &'a StubData,
    headers: &HeaderMap,
    application_id: &str,
) -> Result<&'a StubApplication, Reply> {
    data.user_with_role(headers, Role::Hirer)?;
    data.applications
        .iter()
        .find(|a| a.id == application_id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "NOT_FOUND", "Application not found"))
}

async fn analyze_resume(
    State(data): State<Shared>,
    headers: HeaderMap,
    Path(application_id): Path<String>,
) -> Reply {
    let data = data.lock().unwrap();
    match hirer_application(&data, &headers, &application_id) {
        Ok(_) => ok(json!({
            "atsAnalysis": {"score": 72, "missingKeywords": ["docker"]},
            "projectAnalysis": {"score": 64, "highlights": ["payment service"]},
        })),
        Err(reply) => reply,
    }
}

async fn ai_recommendation(
    State(data): State<Shared>,
    headers: HeaderMap,
    Path(application_id): Path<String>,
) -> Reply {
    let data = data.lock().unwrap();
    match hirer_application(&data, &headers, &application_id) {
        Ok(_) => ok(json!({
            "success": true,
            "recommendation": {
                "recommendation": "Accept",
                "confidence_score": 78,
                "reasoning": "Solid backend projects, light on infrastructure.",
                "key_factors": ["projects", "ats score"],
                "strengths": ["Rust"],
                "concerns": ["No Docker"],
                "suggestion": "Probe deployment experience in the next round."
            }
        })),
        Err(reply) => reply,
    }
}

async fn set_status(
    State(data): State<Shared>,
    headers: HeaderMap,
    Path(application_id): Path<String>,
    Json(body): Json<Value>,
) -> Reply {
    let mut data = data.lock().unwrap();
    if let Err(reply) = hirer_application(&data, &headers, &application_id) {
        return reply;
    }
    let status: ApplicationStatus = match serde_json::from_value(body["status"].clone()) {
        Ok(status) => status,
        Err(_) => return error(StatusCode::BAD_REQUEST, "VALIDATION", "Unknown status"),
    };
    if let Some(a) = data.applications.iter_mut().find(|a| a.id == application_id) {
        a.status = status;
    }
    ok(json!({"success": true}))
}

fn router(data: Shared) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/me", get(me))
        .route("/api/jobs", get(list_jobs))
        .route("/api/jobs/recommended/list", get(recommended_jobs))
        .route("/api/jobs/:job_id", get(get_job))
        .route("/api/recommendations", get(recommendations))
        .route("/api/applications/apply/:job_id", post(apply))
        .route("/api/applications/check/:job_id", get(check_application))
        .route("/api/applications/my-applications", get(my_applications))
        .route("/api/resume/upload", post(upload_resume))
        .route("/api/resume/recalculate-scores", post(recalculate_scores))
        .route("/api/interview/prepare/:application_id", get(interview_prep))
        .route("/api/hirer/my-jobs", get(hirer_jobs))
        .route("/api/hirer/job/:job_id/candidates", get(job_candidates))
        .route("/api/hirer/analyze-resume/:application_id", post(analyze_resume))
        .route("/api/hirer/ai-recommendation/:application_id", post(ai_recommendation))
        .route("/api/hirer/application/:application_id/status", patch(set_status))
        .with_state(data)
}

pub struct StubBackend {
    base_url: String,
}

impl StubBackend {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(Arc::new(Mutex::new(StubData::seeded())));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base_url: format!("http://{addr}"),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn config(&self) -> Config {
        Config::for_tests(&self.base_url, PathBuf::from("unused-state.json"))
    }

    /// A client with an empty in-memory session.
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.config(), Arc::new(Store::in_memory())).unwrap()
    }

    pub fn client_with_session(&self, token: &str, user: User) -> ApiClient {
        let store = Store::in_memory();
        store.set_session(token.to_string(), user).unwrap();
        ApiClient::new(&self.config(), Arc::new(store)).unwrap()
    }
}
