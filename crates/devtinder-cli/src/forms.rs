//! Text inputs owned by the terminal UI. Typed values stay here until a
//! submit hands a clone to the flows.

use devtinder_core::models::User;
use devtinder_core::state::AppState;
use devtinder_core::state::AuthMode;
use devtinder_core::state::Route;
use devtinder_core::validation::LoginForm;
use devtinder_core::validation::ProfileForm;
use devtinder_core::validation::SignupForm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Login,
    Signup,
    Profile,
}

impl FormKind {
    pub fn for_state(state: &AppState) -> Option<Self> {
        match (state.route, state.auth_mode) {
            (Route::Login, AuthMode::Login) => Some(Self::Login),
            (Route::Login, AuthMode::Signup) => Some(Self::Signup),
            (Route::Profile, _) => Some(Self::Profile),
            _ => None,
        }
    }

    pub fn labels(self) -> &'static [&'static str] {
        match self {
            Self::Login => &["Email", "Password"],
            Self::Signup => &["First name", "Last name", "Email", "Password", "Gender"],
            Self::Profile => &[
                "First name",
                "Last name",
                "Photo URL",
                "Age",
                "Gender",
                "About",
                "Skills",
            ],
        }
    }

    pub fn is_secret(self, index: usize) -> bool {
        matches!((self, index), (Self::Login, 1) | (Self::Signup, 3))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Forms {
    pub login: LoginForm,
    pub signup: SignupForm,
    pub profile: ProfileForm,
    focus: usize,
    profile_owner: Option<String>,
}

impl Forms {
    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focus_next(&mut self, kind: FormKind) {
        self.focus = (self.focus + 1) % kind.labels().len();
    }

    pub fn focus_prev(&mut self, kind: FormKind) {
        let len = kind.labels().len();
        self.focus = (self.focus + len - 1) % len;
    }

    pub fn reset_focus(&mut self) {
        self.focus = 0;
    }

    pub fn value(&self, kind: FormKind, index: usize) -> &str {
        match (kind, index) {
            (FormKind::Login, 0) => &self.login.email,
            (FormKind::Login, 1) => &self.login.password,
            (FormKind::Signup, 0) => &self.signup.first_name,
            (FormKind::Signup, 1) => &self.signup.last_name,
            (FormKind::Signup, 2) => &self.signup.email,
            (FormKind::Signup, 3) => &self.signup.password,
            (FormKind::Signup, 4) => &self.signup.gender,
            (FormKind::Profile, 0) => &self.profile.first_name,
            (FormKind::Profile, 1) => &self.profile.last_name,
            (FormKind::Profile, 2) => &self.profile.photo_url,
            (FormKind::Profile, 3) => &self.profile.age,
            (FormKind::Profile, 4) => &self.profile.gender,
            (FormKind::Profile, 5) => &self.profile.about,
            (FormKind::Profile, 6) => &self.profile.skills,
            _ => "",
        }
    }

    fn focused_mut(&mut self, kind: FormKind) -> Option<&mut String> {
        let field = match (kind, self.focus) {
            (FormKind::Login, 0) => &mut self.login.email,
            (FormKind::Login, 1) => &mut self.login.password,
            (FormKind::Signup, 0) => &mut self.signup.first_name,
            (FormKind::Signup, 1) => &mut self.signup.last_name,
            (FormKind::Signup, 2) => &mut self.signup.email,
            (FormKind::Signup, 3) => &mut self.signup.password,
            (FormKind::Signup, 4) => &mut self.signup.gender,
            (FormKind::Profile, 0) => &mut self.profile.first_name,
            (FormKind::Profile, 1) => &mut self.profile.last_name,
            (FormKind::Profile, 2) => &mut self.profile.photo_url,
            (FormKind::Profile, 3) => &mut self.profile.age,
            (FormKind::Profile, 4) => &mut self.profile.gender,
            (FormKind::Profile, 5) => &mut self.profile.about,
            (FormKind::Profile, 6) => &mut self.profile.skills,
            _ => return None,
        };
        Some(field)
    }

    pub fn input(&mut self, kind: FormKind, c: char) {
        if let Some(field) = self.focused_mut(kind) {
            field.push(c);
        }
    }

    pub fn backspace(&mut self, kind: FormKind) {
        if let Some(field) = self.focused_mut(kind) {
            field.pop();
        }
    }

    /// Refills the profile form whenever a different account is loaded.
    pub fn sync_profile(&mut self, user: Option<&User>) {
        let owner = user.map(|user| user.id.clone());
        if owner == self.profile_owner {
            return;
        }
        self.profile = user.map(ProfileForm::from_user).unwrap_or_default();
        self.profile_owner = owner;
    }

    /// Drops everything typed for the previous account.
    pub fn clear_session(&mut self) {
        self.login.password.clear();
        self.signup = SignupForm::default();
        self.profile = ProfileForm::default();
        self.profile_owner = None;
        self.focus = 0;
    }
}
