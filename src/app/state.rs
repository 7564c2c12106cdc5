use crate::api::{Credentials, ResumeBackend};
use crate::auth::{self, AuthError};
use crate::session::Session;
use crate::utils::background;
use derivative::Derivative;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Register,
    Upload,
}

impl Screen {
    /// Where the app opens: straight to uploads when a token is on file.
    pub fn initial(session: &Session) -> Self {
        if session.is_authenticated() {
            Screen::Upload
        } else {
            Screen::Login
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

impl AuthMode {
    /// Screen to show once a request submitted in this mode succeeds.
    pub fn next_screen(self) -> Screen {
        match self {
            AuthMode::Login => Screen::Upload,
            AuthMode::Register => Screen::Login,
        }
    }

    pub fn success_notice(self) -> Option<&'static str> {
        match self {
            AuthMode::Login => None,
            AuthMode::Register => Some("Registration successful. Please sign in."),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthProgress {
    Succeeded,
    Failed,
}

/// Email/password form shared by the login and register screens.
#[derive(Derivative)]
#[derivative(Debug, Default)]
pub struct AuthForm {
    pub credentials: Credentials,
    pub error: Option<String>,
    pub notice: Option<String>,
    #[derivative(Debug = "ignore")]
    pending: Option<Receiver<Result<(), AuthError>>>,
    /// Mode of the request in flight. Kept apart from the visible screen,
    /// which may change before the result arrives.
    submitted: Option<AuthMode>,
}

impl AuthForm {
    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn can_submit(&self) -> bool {
        !self.is_submitting()
            && !self.credentials.email.trim().is_empty()
            && !self.credentials.password.is_empty()
    }

    pub fn submit(&mut self, mode: AuthMode, backend: Arc<dyn ResumeBackend>, session: Session) {
        if self.is_submitting() {
            return;
        }
        self.error = None;
        self.notice = None;

        let credentials = self.credentials.clone();
        let (sender, receiver) = mpsc::channel();
        self.pending = Some(receiver);
        self.submitted = Some(mode);

        background::spawn("auth", async move {
            let result = match mode {
                AuthMode::Login => auth::login(backend.as_ref(), &session, &credentials).await,
                AuthMode::Register => auth::register(backend.as_ref(), &credentials).await,
            };
            sender.send(result).unwrap_or_default();
        });
    }

    /// Collects the result of a submitted form, if it has arrived, together
    /// with the mode it was submitted in.
    pub fn poll(&mut self) -> Option<(AuthMode, AuthProgress)> {
        let received = match self.pending.as_ref()?.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(AuthError::Interrupted),
        };
        self.pending = None;
        let mode = self.submitted.take()?;

        match received {
            Ok(()) => {
                self.credentials.password.clear();
                Some((mode, AuthProgress::Succeeded))
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Some((mode, AuthProgress::Failed))
            }
        }
    }

    pub fn reset(&mut self) {
        *self = AuthForm::default();
    }
}
