use std::num::NonZeroUsize;
use std::process::{Child, Command};
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;
use std::time::Duration;

use actix_multipart::Multipart;
use actix_web::cookie::Cookie;
use actix_web::dev::ServerHandle;
use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App, HttpResponse, HttpServer};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use parking_lot::Mutex;
use serde_json::json;
use serial_test::serial;

use milp_api_sdk::{Report, Solution, SolverError, SubmissionPayload};
use milp_workbench::config::Settings;
use milp_workbench::controller::FormController;
use milp_workbench::domain::problem_type::{FieldGroupMap, ProblemType};
use milp_workbench::domain::store::{MemoryStore, ResultHandoff};
use milp_workbench::domain::transport::SolveTransport;
use milp_workbench::routes::{self, UploadLimit};
use milp_workbench::session::{SessionRegistry, SESSION_COOKIE};

const BOUNDARY: &str = "milp-test-boundary";

static PORT_COUNTER: AtomicU16 = AtomicU16::new(9110);

// ---------- helpers ----------

enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a [u8]),
}

fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(file_name, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n\
                         Content-Type: text/csv\r\n\r\n",
                        file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

struct FakeTransport {
    reply: Option<Solution>,
    sent: Mutex<Vec<SubmissionPayload>>,
}

#[async_trait]
impl SolveTransport for FakeTransport {
    async fn post(&self, payload: SubmissionPayload) -> Result<Solution, SolverError> {
        self.sent.lock().push(payload);
        self.reply.clone().ok_or(SolverError::Response {
            status: 422,
            body: "unknown variable x".to_string(),
        })
    }

    fn name(&self) -> &str {
        "fake"
    }
}

fn fake_controller(reply: Option<Solution>) -> (web::Data<FormController>, Arc<FakeTransport>) {
    let transport = Arc::new(FakeTransport {
        reply,
        sent: Mutex::new(Vec::new()),
    });
    let controller = FormController::new(
        SessionRegistry::new(NonZeroUsize::new(16).unwrap()),
        transport.clone(),
        ResultHandoff::new(Arc::new(MemoryStore::new(NonZeroUsize::new(16).unwrap()))),
        FieldGroupMap::default(),
    );
    (web::Data::new(controller), transport)
}

fn portfolio_solution() -> Solution {
    serde_json::from_value(json!({
        "result": "\nOptimal Portfolio:\nAAPL: 60.00%\nMSFT: 40.00%\n",
        "fig": "iVBORw0KGgo="
    }))
    .unwrap()
}

fn portfolio_post() -> Vec<u8> {
    multipart_body(&[
        Part::Text("action", "submit"),
        Part::Text("problem_type", "portfolio_optimization"),
        Part::File("stocks.csv", b"Ticker\nAAPL\nMSFT\n"),
    ])
}

macro_rules! app {
    ($controller:expr) => {
        test::init_service(
            App::new()
                .app_data($controller.clone())
                .app_data(web::Data::new(UploadLimit(1024 * 1024)))
                .configure(routes::configure),
        )
        .await
    };
}

fn location(resp: &actix_web::dev::ServiceResponse) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

fn session_cookie(resp: &actix_web::dev::ServiceResponse) -> Cookie<'static> {
    resp.response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.into_owned())
        .expect("session cookie")
}

// ---------- routes with a fake solver ----------

#[actix_web::test]
async fn test_health_endpoint() {
    let (controller, _) = fake_controller(None);
    let app = app!(controller);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "OK");
}

#[actix_web::test]
async fn test_dashboard_without_session_prompts_for_problem() {
    let (controller, _) = fake_controller(None);
    let app = app!(controller);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/dashboard").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("<a href=\"/problem\">Define a problem</a>"));
}

#[actix_web::test]
async fn test_problem_page_issues_session() {
    let (controller, _) = fake_controller(None);
    let app = app!(controller);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/problem").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = session_cookie(&resp);
    assert!(SessionRegistry::is_valid_id(cookie.value()));
    assert_eq!(cookie.http_only(), Some(true));
}

#[actix_web::test]
async fn test_submit_redirects_to_dashboard() {
    let (controller, transport) = fake_controller(Some(portfolio_solution()));
    let app = app!(controller);

    let req = test::TestRequest::post()
        .uri("/problem")
        .insert_header((header::CONTENT_TYPE, multipart_content_type()))
        .set_payload(portfolio_post())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/dashboard");
    let cookie = session_cookie(&resp);

    {
        let sent = transport.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].problem_type, ProblemType::PortfolioOptimization);
        assert_eq!(sent[0].objective, None);
        assert_eq!(sent[0].variables, None);
        assert_eq!(sent[0].constraints, None);
        assert_eq!(sent[0].parameters, None);
        assert_eq!(sent[0].files.len(), 1);
        assert_eq!(sent[0].files[0].file_name, "stocks.csv");
        assert_eq!(sent[0].files[0].content_type.as_deref(), Some("text/csv"));
    }

    let req = test::TestRequest::get().uri("/dashboard").cookie(cookie).to_request();
    let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
    assert!(body.contains("<h2>Optimal Portfolio:</h2>"));
    assert!(body.contains("<p>AAPL: 60.00%</p>"));
    assert!(body.contains("src=\"data:image/png;base64,iVBORw0KGgo=\""));
    assert!(!body.contains("Define a problem</a>"));
}

#[actix_web::test]
async fn test_solver_failure_is_shown_on_problem_page() {
    let (controller, _) = fake_controller(None);
    let app = app!(controller);

    let req = test::TestRequest::post()
        .uri("/problem")
        .insert_header((header::CONTENT_TYPE, multipart_content_type()))
        .set_payload(portfolio_post())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/problem");
    let cookie = session_cookie(&resp);

    let req = test::TestRequest::get().uri("/problem").cookie(cookie.clone()).to_request();
    let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
    assert!(body.contains("role=\"alert\""));
    assert!(body.contains("unknown variable x"));
    assert!(body.contains("<li>stocks.csv"));

    let req = test::TestRequest::get().uri("/dashboard").cookie(cookie).to_request();
    let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
    assert!(body.contains("Define a problem</a>"));
}

#[actix_web::test]
async fn test_rows_are_edited_across_posts() {
    let (controller, transport) = fake_controller(Some(Solution::default()));
    let app = app!(controller);

    let req = test::TestRequest::post()
        .uri("/problem")
        .insert_header((header::CONTENT_TYPE, multipart_content_type()))
        .set_payload(multipart_body(&[Part::Text("action", "preset:location_analysis")]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/problem");
    let cookie = session_cookie(&resp);

    let req = test::TestRequest::get().uri("/problem").cookie(cookie.clone()).to_request();
    let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
    assert!(body.contains("value=\"budget\""));
    assert!(body.contains("value=\"build_Tower\""));

    let req = test::TestRequest::post()
        .uri("/problem")
        .cookie(cookie.clone())
        .insert_header((header::CONTENT_TYPE, multipart_content_type()))
        .set_payload(multipart_body(&[
            Part::Text("action", "remove:variables:1"),
            Part::Text("parameter_key", "budget"),
            Part::Text("parameter_value", "35"),
            Part::Text("variable", "build_Tower"),
            Part::Text("variable", "iscovered_Region"),
        ]))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/problem")
        .cookie(cookie)
        .insert_header((header::CONTENT_TYPE, multipart_content_type()))
        .set_payload(multipart_body(&[Part::Text("action", "submit")]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/dashboard");

    let sent = transport.sent.lock();
    let payload = &sent[0];
    assert_eq!(payload.problem_type, ProblemType::LocationAnalysis);
    assert_eq!(payload.variables, Some(vec!["build_Tower".to_string()]));
    let parameters = payload.parameters.as_ref().unwrap();
    assert_eq!(parameters[0].key, "budget");
    assert_eq!(parameters[0].value, "35");
}

#[actix_web::test]
async fn test_oversized_upload_is_rejected() {
    let (controller, transport) = fake_controller(Some(Solution::default()));
    let app = test::init_service(
        App::new()
            .app_data(controller.clone())
            .app_data(web::Data::new(UploadLimit(8)))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/problem")
        .insert_header((header::CONTENT_TYPE, multipart_content_type()))
        .set_payload(portfolio_post())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(transport.sent.lock().is_empty());
}

// ---------- against a solver service over HTTP ----------

#[derive(Debug, Clone, PartialEq)]
struct ReceivedPart {
    name: String,
    file_name: Option<String>,
    body: String,
}

#[derive(Clone)]
struct FakeSolver {
    received: Arc<Mutex<Vec<ReceivedPart>>>,
    reply: Arc<dyn Fn() -> HttpResponse + Send + Sync>,
}

async fn fake_solve(mut payload: Multipart, solver: web::Data<FakeSolver>) -> HttpResponse {
    let mut parts = Vec::new();
    while let Ok(Some(mut field)) = payload.try_next().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let mut body = Vec::new();
        while let Ok(Some(chunk)) = field.try_next().await {
            body.extend_from_slice(&chunk);
        }
        parts.push(ReceivedPart {
            name,
            file_name,
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }
    *solver.received.lock() = parts;
    (solver.reply)()
}

/// Start a solver stand-in on a free port; returns its url and handle
fn start_fake_solver(solver: FakeSolver) -> (String, ServerHandle) {
    let data = web::Data::new(solver);
    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .route("/api/home", web::post().to(fake_solve))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("bind fake solver");
    let port = server.addrs()[0].port();
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);
    (format!("http://127.0.0.1:{}", port), handle)
}

fn solver_settings(url: &str) -> Settings {
    let url = url.to_string();
    Settings::from_lookup(move |key| match key {
        "SOLVER_API_URL" => Some(url.clone()),
        "SOLVER_TIMEOUT_SECS" => Some("10".to_string()),
        _ => None,
    })
}

#[actix_web::test]
#[serial]
async fn test_math_problem_is_sent_as_multipart() {
    let solver = FakeSolver {
        received: Arc::new(Mutex::new(Vec::new())),
        reply: Arc::new(|| {
            HttpResponse::Ok().json(json!({
                "result": [{"Plant": "A", "Hour": 1, "Output": 90}, {"Plant": "B", "Hour": 1}],
                "fig": ["QUJD", "REVG"]
            }))
        }),
    };
    let received = solver.received.clone();
    let (url, handle) = start_fake_solver(solver);

    let controller = web::Data::new(FormController::from_settings(&solver_settings(&url)).unwrap());
    let app = app!(controller);

    let req = test::TestRequest::post()
        .uri("/problem")
        .insert_header((header::CONTENT_TYPE, multipart_content_type()))
        .set_payload(multipart_body(&[
            Part::Text("action", "submit"),
            Part::Text("problem_type", "mathematical_optimization"),
            Part::File("demand.csv", b"HOUR,LOAD\n1,100\n"),
        ]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/problem");
    let cookie = session_cookie(&resp);

    let req = test::TestRequest::post()
        .uri("/problem")
        .cookie(cookie.clone())
        .insert_header((header::CONTENT_TYPE, multipart_content_type()))
        .set_payload(multipart_body(&[
            Part::Text("action", "submit"),
            Part::Text("objective_formula", "/sum_i x_i"),
            Part::Text("objective_sense", "minimize"),
            Part::Text("variable", "x^{Plant}"),
            Part::Text("constraint", ""),
        ]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/dashboard");

    let parts = received.lock().clone();
    let text = |name: &str| {
        parts
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.body.clone())
            .unwrap_or_default()
    };
    assert_eq!(text("problemType"), "\"mathematical_optimization\"");
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&text("objective")).unwrap(),
        json!({"formula": "/sum_i x_i", "sense": "minimize"})
    );
    assert_eq!(text("variables"), "[\"x^{Plant}\"]");
    assert_eq!(text("constraints"), "[]");
    assert!(parts.iter().all(|p| p.name != "parameters"));
    let file = parts.iter().find(|p| p.name == "file").unwrap();
    assert_eq!(file.file_name.as_deref(), Some("demand.csv"));
    assert_eq!(file.body, "HOUR,LOAD\n1,100\n");

    let req = test::TestRequest::get().uri("/dashboard").cookie(cookie).to_request();
    let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
    assert!(body.contains("<tr><th>Plant</th><th>Hour</th><th>Output</th></tr>"));
    assert!(body.contains("<tr><td>B</td><td>1</td><td></td></tr>"));
    assert!(body.contains("<h2>Visualization 2</h2>"));

    handle.stop(false).await;
}

#[actix_web::test]
#[serial]
async fn test_non_json_solver_reply_is_an_error() {
    let solver = FakeSolver {
        received: Arc::new(Mutex::new(Vec::new())),
        reply: Arc::new(|| {
            HttpResponse::Ok()
                .content_type("text/html")
                .body("<html>maintenance</html>")
        }),
    };
    let (url, handle) = start_fake_solver(solver);

    let controller = web::Data::new(FormController::from_settings(&solver_settings(&url)).unwrap());
    let app = app!(controller);

    let req = test::TestRequest::post()
        .uri("/problem")
        .insert_header((header::CONTENT_TYPE, multipart_content_type()))
        .set_payload(portfolio_post())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/problem");
    let cookie = session_cookie(&resp);

    let req = test::TestRequest::get().uri("/problem").cookie(cookie).to_request();
    let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
    assert!(body.contains("The solver failed"));
    assert!(body.contains("text/html"));

    handle.stop(false).await;
}

// ---------- the built server binary ----------

struct TestServer {
    child: Option<Child>,
    port: u16,
}

impl TestServer {
    async fn start(solver_url: &str) -> Self {
        let port = PORT_COUNTER.fetch_add(1, Ordering::SeqCst);

        let child = Command::new(env!("CARGO_BIN_EXE_milp-workbench"))
            .env("PORT", port.to_string())
            .env("SOLVER_API_URL", solver_url)
            .env_remove("RESULT_STORE_DIR")
            .env_remove("SENTRY_DSN")
            .spawn()
            .expect("Failed to start test server");

        let server = TestServer {
            child: Some(child),
            port,
        };

        let client = reqwest::Client::new();
        for attempt in 0..30 {
            if let Ok(response) = client.get(format!("{}/health", server.base_url())).send().await {
                if response.status().is_success() {
                    return server;
                }
            }
            println!("Attempt {}: Server not ready yet, waiting...", attempt + 1);
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
        panic!("Server failed to start on port {}", port);
    }

    fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

#[actix_web::test]
#[serial]
async fn test_server_round_trip() {
    let solver = FakeSolver {
        received: Arc::new(Mutex::new(Vec::new())),
        reply: Arc::new(|| {
            HttpResponse::Ok().json(json!({ "result": "\nOptimal Portfolio:\nAAPL: 100.00%\n" }))
        }),
    };
    let (url, handle) = start_fake_solver(solver);
    let server = TestServer::start(&url).await;

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    let page = client
        .get(format!("{}/", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(page.status(), 200);
    assert!(page.text().await.unwrap().contains("class=\"card\""));

    let form = reqwest::multipart::Form::new()
        .text("action", "submit")
        .text("problem_type", "portfolio_optimization")
        .part(
            "file",
            reqwest::multipart::Part::bytes(b"Ticker\nAAPL\n".to_vec()).file_name("stocks.csv"),
        );
    let response = client
        .post(format!("{}/problem", server.base_url()))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 303);
    assert_eq!(response.headers()[reqwest::header::LOCATION], "/dashboard");
    let cookie = response.headers()[reqwest::header::SET_COOKIE]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let dashboard = client
        .get(format!("{}/dashboard", server.base_url()))
        .header(reqwest::header::COOKIE, cookie)
        .send()
        .await
        .expect("Failed to send request")
        .text()
        .await
        .unwrap();
    assert!(dashboard.contains("<h2>Optimal Portfolio:</h2>"));
    assert!(dashboard.contains("<p>AAPL: 100.00%</p>"));

    drop(server);
    handle.stop(false).await;
}
