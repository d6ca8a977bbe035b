use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;

use devtinder_core::actions::UserAction;
use devtinder_core::models::ReviewStatus;
use devtinder_core::models::SendStatus;
use devtinder_core::state::Route;

use crate::forms::FormKind;

/// What a key press asks the event loop to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Dispatch(UserAction),
    Input(char),
    Backspace,
    FocusNext,
    FocusPrev,
    Submit,
    Logout,
    Send(SendStatus),
    Review(ReviewStatus),
    CursorUp,
    CursorDown,
    Refresh,
}

/// `toast_visible` lets Esc dismiss the toast before it reaches the view
/// or form underneath.
pub fn map_key(
    key: KeyEvent,
    route: Route,
    form: Option<FormKind>,
    toast_visible: bool,
) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Command::Quit),
            KeyCode::Char('t') if route == Route::Login => {
                Some(Command::Dispatch(UserAction::ToggleAuthMode))
            }
            _ => None,
        };
    }
    if toast_visible && key.code == KeyCode::Esc {
        return Some(Command::Dispatch(UserAction::DismissToast));
    }
    match form {
        Some(_) => map_form_key(key, route),
        None => map_view_key(key, route),
    }
}

fn map_form_key(key: KeyEvent, route: Route) -> Option<Command> {
    match key.code {
        KeyCode::Enter => Some(Command::Submit),
        KeyCode::Tab | KeyCode::Down => Some(Command::FocusNext),
        KeyCode::BackTab | KeyCode::Up => Some(Command::FocusPrev),
        KeyCode::Backspace => Some(Command::Backspace),
        KeyCode::Char(c) => Some(Command::Input(c)),
        KeyCode::Esc if route == Route::Login => Some(Command::Quit),
        KeyCode::Esc => Some(Command::Dispatch(UserAction::Navigate(Route::HOME))),
        KeyCode::Left if route != Route::Login => Some(Command::Dispatch(UserAction::PrevRoute)),
        KeyCode::Right if route != Route::Login => Some(Command::Dispatch(UserAction::NextRoute)),
        _ => None,
    }
}

fn map_view_key(key: KeyEvent, route: Route) -> Option<Command> {
    let command = match key.code {
        KeyCode::Char('q') => Command::Quit,
        KeyCode::Char('l') => Command::Logout,
        KeyCode::Char('g') => Command::Refresh,
        KeyCode::Tab | KeyCode::Right => Command::Dispatch(UserAction::NextRoute),
        KeyCode::BackTab | KeyCode::Left => Command::Dispatch(UserAction::PrevRoute),
        KeyCode::Char('1') => Command::Dispatch(UserAction::Navigate(Route::Feed)),
        KeyCode::Char('2') => Command::Dispatch(UserAction::Navigate(Route::Requests)),
        KeyCode::Char('3') => Command::Dispatch(UserAction::Navigate(Route::Connections)),
        KeyCode::Char('4') => Command::Dispatch(UserAction::Navigate(Route::Profile)),
        KeyCode::Esc => Command::Dispatch(UserAction::ClearError),
        KeyCode::Char('i') if route == Route::Feed => Command::Send(SendStatus::Interested),
        KeyCode::Char('x') if route == Route::Feed => Command::Send(SendStatus::Ignored),
        KeyCode::Char('a') if route == Route::Requests => Command::Review(ReviewStatus::Accepted),
        KeyCode::Char('r') if route == Route::Requests => Command::Review(ReviewStatus::Rejected),
        KeyCode::Char('n') | KeyCode::PageDown => Command::Dispatch(UserAction::PageNext),
        KeyCode::Char('p') | KeyCode::PageUp => Command::Dispatch(UserAction::PagePrev),
        KeyCode::Char('j') | KeyCode::Down => Command::CursorDown,
        KeyCode::Char('k') | KeyCode::Up => Command::CursorUp,
        _ => return None,
    };
    Some(command)
}
