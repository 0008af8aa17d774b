use std::sync::Arc;

use log::{error, info, warn};
use milp_api_sdk::{SolverClient, SolverError};

use crate::config::Settings;
use crate::domain::dashboard::Dashboard;
use crate::domain::form::{FormEdits, FormError, ProblemForm};
use crate::domain::problem_type::{FieldGroup, FieldGroupMap, ProblemType};
use crate::domain::store::{FileStore, KeyValueStore, MemoryStore, ResultHandoff, StoreError};
use crate::domain::transport::SolveTransport;
use crate::session::SessionRegistry;

/// What the user clicked on the problem form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormAction {
    /// Keep the edits, nothing else (also what the Enter key does)
    #[default]
    Save,
    SelectType,
    Add(FieldGroup),
    Remove(FieldGroup, usize),
    ClearFiles,
    Preset(ProblemType),
    Submit,
}

impl FormAction {
    /// Parse a button value: `submit`, `add:variables`, `remove:constraints:2`, ...
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.trim().split(':');
        let action = match (parts.next()?, parts.next(), parts.next()) {
            ("save", None, None) => FormAction::Save,
            ("select_type", None, None) => FormAction::SelectType,
            ("clear_files", None, None) => FormAction::ClearFiles,
            ("submit", None, None) => FormAction::Submit,
            ("add", Some(group), None) => FormAction::Add(FieldGroup::from_name(group)?),
            ("remove", Some(group), Some(index)) => {
                FormAction::Remove(FieldGroup::from_name(group)?, index.parse().ok()?)
            }
            ("preset", Some(tag), None) => FormAction::Preset(ProblemType::from_tag(tag)?),
            _ => return None,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(action)
    }

    pub fn value(&self) -> String {
        match self {
            FormAction::Save => "save".to_string(),
            FormAction::SelectType => "select_type".to_string(),
            FormAction::Add(group) => format!("add:{}", group.as_str()),
            FormAction::Remove(group, index) => format!("remove:{}:{}", group.as_str(), index),
            FormAction::ClearFiles => "clear_files".to_string(),
            FormAction::Preset(problem_type) => format!("preset:{}", problem_type.as_str()),
            FormAction::Submit => "submit".to_string(),
        }
    }
}

/// Where the browser goes after a form post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Problem,
    Dashboard,
}

/// Owns every session's form and runs submissions against the solver
pub struct FormController {
    sessions: Arc<SessionRegistry>,
    transport: Arc<dyn SolveTransport>,
    results: ResultHandoff,
    field_groups: FieldGroupMap,
}

impl FormController {
    pub fn new(
        sessions: SessionRegistry,
        transport: Arc<dyn SolveTransport>,
        results: ResultHandoff,
        field_groups: FieldGroupMap,
    ) -> Self {
        Self {
            sessions: Arc::new(sessions),
            transport,
            results,
            field_groups,
        }
    }

    /// Wire up the solver client and result store described by `settings`
    pub fn from_settings(settings: &Settings) -> Result<Self, SetupError> {
        let client = match settings.solver_timeout {
            Some(timeout) => SolverClient::with_timeout(&settings.solver_url, timeout)?,
            None => SolverClient::new(&settings.solver_url)?,
        };

        let store: Arc<dyn KeyValueStore> = match &settings.result_store_dir {
            Some(dir) => Arc::new(FileStore::new(dir)?),
            None => Arc::new(MemoryStore::new(settings.session_capacity)),
        };

        info!(
            "Solver endpoint {}, result store: {}",
            client.base_url(),
            store.name()
        );

        Ok(Self::new(
            SessionRegistry::new(settings.session_capacity),
            Arc::new(client),
            ResultHandoff::new(store),
            settings.field_groups.clone(),
        ))
    }

    pub fn field_groups(&self) -> &FieldGroupMap {
        &self.field_groups
    }

    /// Current form of a session
    pub fn form(&self, session: &str) -> ProblemForm {
        self.sessions.snapshot(session)
    }

    /// Apply a form post: merge edits, then perform the clicked action
    pub async fn handle(&self, session: &str, edits: FormEdits, action: FormAction) -> Navigation {
        let applied = self.sessions.with_form(session, |form| {
            form.clear_error();
            let result = form
                .apply_edits(edits, &self.field_groups)
                .and_then(|_| self.apply_action(form, action));
            if let Err(err) = &result {
                form.record_error(err);
            }
            result
        });

        if let Err(err) = applied {
            warn!("Rejected form post ({:?}): {}", action, err);
            return Navigation::Problem;
        }

        if action != FormAction::Submit {
            return Navigation::Problem;
        }

        match self.submit(session).await {
            Ok(()) => Navigation::Dashboard,
            Err(_) => Navigation::Problem,
        }
    }

    fn apply_action(&self, form: &mut ProblemForm, action: FormAction) -> Result<(), FormError> {
        match action {
            FormAction::Save | FormAction::SelectType | FormAction::Submit => Ok(()),
            FormAction::Add(group) => form.add_row(group),
            FormAction::Remove(group, index) => form.remove_row(group, index),
            FormAction::ClearFiles => {
                form.clear_files();
                Ok(())
            }
            FormAction::Preset(problem_type) => form.load_preset(problem_type, &self.field_groups),
        }
    }

    /// Send the session's problem to the solver and store the solution.
    ///
    /// The request runs as its own task, so it finishes and leaves the busy
    /// state even when the caller stops waiting. Failures are kept on the
    /// form for display and returned.
    pub async fn submit(&self, session: &str) -> Result<(), FormError> {
        let payload = self.sessions.with_form(session, |form| {
            let payload = form.begin_submission(&self.field_groups);
            if let Err(err) = &payload {
                form.record_error(err);
            }
            payload
        })?;

        info!(
            "Submitting {} problem ({} file(s)) to {}",
            payload.problem_type.as_str(),
            payload.files.len(),
            self.transport.name()
        );

        let transport = Arc::clone(&self.transport);
        let results = self.results.clone();
        let sessions = Arc::clone(&self.sessions);
        let scope = session.to_string();

        let task = actix_web::rt::spawn(async move {
            let outcome = match transport.post(payload).await {
                Ok(solution) => results.write(&scope, &solution).map_err(|err| {
                    error!("Failed to store solution: {}", err);
                    FormError::Store(err.to_string())
                }),
                Err(err) => {
                    error!("Solver request failed: {}", err);
                    sentry::capture_error(&err);
                    Err(FormError::Transport(err.to_string()))
                }
            };
            sessions.with_form(&scope, |form| form.finish_submission(outcome.clone()));
            outcome
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!("Submission task failed: {}", err);
                let outcome = Err(FormError::Transport(err.to_string()));
                self.sessions
                    .with_form(session, |form| form.finish_submission(outcome.clone()));
                outcome
            }
        }
    }

    /// Dashboard for a session; no session or no stored solution is Empty
    pub fn dashboard(&self, session: Option<&str>) -> Dashboard {
        let Some(session) = session else {
            return Dashboard::Empty;
        };

        match self.results.read(session) {
            Ok(solution) => Dashboard::from_solution(solution.as_ref()),
            Err(err) => {
                warn!("Ignoring unreadable stored solution: {}", err);
                Dashboard::Empty
            }
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SetupError {
    #[error("solver client: {0}")]
    Solver(#[from] SolverError),

    #[error("result store: {0}")]
    Store(#[from] StoreError),
}
