#[cfg(test)]
pub(crate) mod mock_portal;

use std::time::Duration;

use reqwest::{Client, Response};
use tracing::{instrument, Level};
use url::Url;

use crate::{
    config::Credentials,
    error::{Error, Result},
    parse::FormTokens,
};

pub const LOGIN_URL: &str = "https://cms.must.edu.pk:8082/login.aspx";
pub const ASSIGNMENTS_URL: &str = "https://cms.must.edu.pk:8082/CoursePortal.aspx";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Only a successful sign-in lands on a page linking the dashboard.
const LOGIN_SUCCESS_MARKER: &str = "DashBoard.aspx";
const SIGN_IN_BUTTON: &str = "Sign In";

#[derive(Debug, Clone)]
pub struct Endpoints {
    pub login: Url,
    pub assignments: Url,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            login: Url::parse(LOGIN_URL).expect("login url should be valid"),
            assignments: Url::parse(ASSIGNMENTS_URL).expect("assignments url should be valid"),
        }
    }
}

/// A logged in portal client. Its cookie jar carries the ASP.NET session.
#[derive(Debug)]
pub struct Session(Client);

#[derive(Debug)]
pub struct Portal {
    credentials: Credentials,
    endpoints: Endpoints,
    timeout: Duration,
}

/// `timeout` bounds each request from connect to the end of the body.
pub fn make_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .danger_accept_invalid_certs(true)
        .cookie_store(true)
        .gzip(true)
        .timeout(timeout)
        .build()
}

impl Portal {
    pub const fn new(credentials: Credentials, endpoints: Endpoints) -> Self {
        Self {
            credentials,
            endpoints,
            timeout: REQUEST_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Signs in with a fresh cookie jar.
    #[instrument(skip(self), fields(roll_no = %self.credentials.roll_no), level = Level::DEBUG)]
    pub async fn login(&self) -> Result<Session> {
        let client = make_client(self.timeout).map_err(Error::login_failure)?;

        let login_page = client
            .get(self.endpoints.login.clone())
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(Error::login_failure)?
            .text()
            .await
            .map_err(Error::login_failure)?;
        let tokens = FormTokens::from_html(&login_page);

        let Credentials {
            roll_no,
            password,
            session,
            program,
        } = &self.credentials;
        let form = [
            ("__VIEWSTATE", tokens.view_state.as_str()),
            ("__VIEWSTATEGENERATOR", tokens.view_state_generator.as_str()),
            ("__EVENTVALIDATION", tokens.event_validation.as_str()),
            ("ddl_Session", session.as_str()),
            ("ddl_Program", program.as_str()),
            ("txt_RollNo", roll_no.as_str()),
            ("txt_Password", password.as_str()),
            ("btn_StudentSignIn", SIGN_IN_BUTTON),
        ];
        let response = client
            .post(self.endpoints.login.clone())
            .form(&form)
            .send()
            .await
            .map_err(Error::login_failure)?;
        let status = response.status();
        let body = response.text().await.map_err(Error::login_failure)?;

        if !status.is_success() {
            return Err(Error::login_failure(format!("portal answered {status}")));
        }
        if !body.contains(LOGIN_SUCCESS_MARKER) {
            return Err(Error::login_failure("portal did not accept the credentials"));
        }
        log::info!("Login successful.");
        Ok(Session(client))
    }

    /// Consumes the session; every refresh logs in again.
    #[instrument(skip_all, level = Level::DEBUG)]
    pub async fn fetch_assignments_page(&self, session: Session) -> Result<String> {
        let Session(client) = session;
        let start = std::time::Instant::now();
        let page = client
            .get(self.endpoints.assignments.clone())
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(Error::fetch_failure)?
            .text()
            .await
            .map_err(Error::fetch_failure)?;
        log::trace!("Got text of assignments page in \t {:?}", start.elapsed());
        Ok(page)
    }
}
