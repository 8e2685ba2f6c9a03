//! An in-process stand-in for the CMS, served by axum on an ephemeral port.
use std::{
    collections::HashMap,
    fs,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use axum::{
    extract::{Form, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;

use super::Endpoints;
use crate::config::Credentials;

const SESSION_COOKIE: &str = "ASP.NET_SessionId=mock-session";

#[derive(Debug, Clone)]
pub struct MockPortal {
    pub login_status: u16,
    pub login_delay: Duration,
    pub page_delay: Duration,
    pub assignments_page: String,
}

impl Default for MockPortal {
    fn default() -> Self {
        Self {
            login_status: 200,
            login_delay: Duration::ZERO,
            page_delay: Duration::ZERO,
            assignments_page: fs::read_to_string(
                "./src/parse/html_examples/course_portal/course_portal.html",
            )
            .unwrap(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Stats {
    logins: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    last_view_state: Mutex<String>,
}

impl Stats {
    pub fn logins(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn last_view_state(&self) -> String {
        self.last_view_state.lock().unwrap().clone()
    }
}

pub struct RunningPortal {
    pub endpoints: Endpoints,
    pub stats: Arc<Stats>,
}

#[derive(Clone)]
struct MockState {
    portal: Arc<MockPortal>,
    stats: Arc<Stats>,
}

impl MockPortal {
    pub fn credentials() -> Credentials {
        Credentials {
            roll_no: "BSCS-21-01".into(),
            password: "hunter2".into(),
            session: "2024".into(),
            program: "BSCS".into(),
        }
    }

    pub async fn spawn(self) -> RunningPortal {
        let stats = Arc::new(Stats::default());
        let state = MockState {
            portal: Arc::new(self),
            stats: Arc::clone(&stats),
        };
        let app = Router::new()
            .route("/login.aspx", get(login_page).post(sign_in))
            .route("/CoursePortal.aspx", get(course_portal))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        RunningPortal {
            endpoints: Endpoints {
                login: format!("http://{addr}/login.aspx").parse().unwrap(),
                assignments: format!("http://{addr}/CoursePortal.aspx").parse().unwrap(),
            },
            stats,
        }
    }
}

async fn login_page(State(state): State<MockState>) -> Response {
    let status = StatusCode::from_u16(state.portal.login_status).unwrap();
    if !status.is_success() {
        return (status, "Service Unavailable").into_response();
    }
    let page = fs::read_to_string("./src/parse/html_examples/login/login.html").unwrap();
    Html(page).into_response()
}

async fn sign_in(
    State(state): State<MockState>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let stats = &state.stats;
    let now = stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    stats.max_in_flight.fetch_max(now, Ordering::SeqCst);
    tokio::time::sleep(state.portal.login_delay).await;
    stats.logins.fetch_add(1, Ordering::SeqCst);
    stats.in_flight.fetch_sub(1, Ordering::SeqCst);

    let field = |name: &str| form.get(name).map_or("", String::as_str);
    *stats.last_view_state.lock().unwrap() = field("__VIEWSTATE").to_owned();

    let expected = MockPortal::credentials();
    let accepted = field("txt_RollNo") == expected.roll_no
        && field("txt_Password") == expected.password
        && field("ddl_Session") == expected.session
        && field("ddl_Program") == expected.program
        && field("btn_StudentSignIn") == "Sign In";
    if accepted {
        (
            [(header::SET_COOKIE, format!("{SESSION_COOKIE}; path=/"))],
            Html(r#"<html><body><a href="DashBoard.aspx">Dashboard</a></body></html>"#),
        )
            .into_response()
    } else {
        Html("<html><body><span>Invalid Roll No or Password</span></body></html>").into_response()
    }
}

async fn course_portal(State(state): State<MockState>, headers: HeaderMap) -> Response {
    let signed_in = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.contains(SESSION_COOKIE));
    tokio::time::sleep(state.portal.page_delay).await;
    if signed_in {
        Html(state.portal.assignments_page.clone()).into_response()
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}
