//! Runs flows off the UI thread.
//!
//! A dedicated thread owns a current-thread tokio runtime. Jobs arrive over an
//! unbounded channel and each one runs as its own local task, so two reads of
//! the same resource can overlap and be coalesced by the store.

use std::io;
use std::rc::Rc;
use std::sync::mpsc;
use std::thread;

use tokio::sync::mpsc::unbounded_channel;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::LocalSet;
use tracing::debug;
use tracing::warn;

use devtinder_api::client::Transport;
use devtinder_api::flows::ActionOutcome;
use devtinder_api::flows::FetchOutcome;
use devtinder_api::flows::Session;
use devtinder_core::models::ReviewStatus;
use devtinder_core::models::SendStatus;
use devtinder_core::state::Resource;
use devtinder_core::validation::LoginForm;
use devtinder_core::validation::ProfileForm;
use devtinder_core::validation::SignupForm;

#[derive(Debug, Clone)]
pub enum Job {
    Fetch(Resource),
    Login(LoginForm),
    Signup(SignupForm),
    Logout,
    SaveProfile(ProfileForm),
    Send(SendStatus, String),
    Review(ReviewStatus, String),
}

impl Job {
    fn label(&self) -> &'static str {
        match self {
            Self::Fetch(resource) => resource.label(),
            Self::Login(_) => "login",
            Self::Signup(_) => "signup",
            Self::Logout => "logout",
            Self::SaveProfile(_) => "save profile",
            Self::Send(..) => "send request",
            Self::Review(..) => "review request",
        }
    }
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    Fetched(Resource, FetchOutcome),
    Acted(ActionOutcome),
}

pub struct Worker {
    jobs: UnboundedSender<Job>,
}

impl Worker {
    pub fn spawn<T>(session: Session<T>, events: mpsc::Sender<UiEvent>) -> io::Result<Self>
    where
        T: Transport + 'static,
        Session<T>: Send,
    {
        let (jobs, mut rx) = unbounded_channel::<Job>();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("devtinder-flows".to_string())
            .spawn(move || {
                let session = Rc::new(session);
                let local = LocalSet::new();
                local.block_on(&runtime, async move {
                    while let Some(job) = rx.recv().await {
                        let session = Rc::clone(&session);
                        let events = events.clone();
                        tokio::task::spawn_local(async move {
                            debug!(job = job.label(), "running");
                            let event = run_job(&session, job).await;
                            if events.send(event).is_err() {
                                debug!("ui gone; dropping flow result");
                            }
                        });
                    }
                });
            })?;

        Ok(Self { jobs })
    }

    pub fn submit(&self, job: Job) {
        if self.jobs.send(job).is_err() {
            warn!("flow worker stopped; job dropped");
        }
    }
}

async fn run_job<T: Transport>(session: &Session<T>, job: Job) -> UiEvent {
    match job {
        Job::Fetch(resource) => UiEvent::Fetched(resource, session.fetch(resource).await),
        Job::Login(form) => UiEvent::Acted(session.login(&form).await),
        Job::Signup(form) => UiEvent::Acted(session.signup(&form).await),
        Job::Logout => UiEvent::Acted(session.logout().await),
        Job::SaveProfile(form) => UiEvent::Acted(session.update_profile(&form).await),
        Job::Send(status, user_id) => UiEvent::Acted(session.send_request(status, &user_id).await),
        Job::Review(status, request_id) => {
            UiEvent::Acted(session.review_request(status, &request_id).await)
        }
    }
}
