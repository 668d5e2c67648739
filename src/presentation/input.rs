use crate::application::{App, Effect, Step};
use crossterm::event::{KeyCode, KeyModifiers};

/// Maps key presses onto [`App`] actions.
pub struct InputHandler;

impl InputHandler {
    /// Applies one key press. Returns the effect the caller must dispatch, if any.
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) -> Option<Effect> {
        if modifiers.contains(KeyModifiers::CONTROL) && key == KeyCode::Char('c') {
            app.should_quit = true;
            return None;
        }

        match app.step {
            Step::Home => Self::handle_home(app, key),
            Step::Sender(_) | Step::Receiver(_) | Step::Package(_) => Self::handle_form(app, key, modifiers),
            Step::QuoteResult(_) => Self::handle_quote(app, key),
            Step::Summary(_) => Self::handle_summary(app, key),
        }
    }

    fn handle_home(app: &mut App, key: KeyCode) -> Option<Effect> {
        match key {
            KeyCode::Enter => app.start(),
            KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
            _ => {}
        }
        None
    }

    fn handle_form(app: &mut App, key: KeyCode, modifiers: KeyModifiers) -> Option<Effect> {
        if modifiers.contains(KeyModifiers::CONTROL) {
            return match key {
                KeyCode::Char('e') => app.fill_example(),
                _ => None,
            };
        }

        match key {
            KeyCode::Enter => app.submit(),
            KeyCode::Esc => {
                app.back();
                None
            }
            KeyCode::Tab | KeyCode::Down => {
                app.focus_next();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                app.focus_previous();
                None
            }
            KeyCode::Backspace => app.delete_char(),
            KeyCode::Char(c) => app.type_char(c),
            _ => None,
        }
    }

    fn handle_quote(app: &mut App, key: KeyCode) -> Option<Effect> {
        match key {
            KeyCode::Enter => app.submit(),
            KeyCode::Esc => {
                app.back();
                None
            }
            _ => None,
        }
    }

    fn handle_summary(app: &mut App, key: KeyCode) -> Option<Effect> {
        match key {
            KeyCode::Enter | KeyCode::Char('n') => {
                app.restart();
                None
            }
            KeyCode::Char('c') => app.copy_tracking_code(),
            KeyCode::Char('q') => {
                app.should_quit = true;
                None
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{Completion, PersonField};

    fn press(app: &mut App, key: KeyCode) -> Option<Effect> {
        InputHandler::handle_key_event(app, key, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) -> Vec<Effect> {
        text.chars().filter_map(|c| press(app, KeyCode::Char(c))).collect()
    }

    #[test]
    fn test_ctrl_c_quits_from_any_step() {
        let mut app = App::default();
        app.start();
        InputHandler::handle_key_event(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }

    #[test]
    fn test_q_is_text_inside_forms() {
        let mut app = App::default();
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "quinn");

        assert!(!app.should_quit);
        let Step::Sender(form) = &app.step else {
            panic!("should be on the sender step");
        };
        assert_eq!(form.value(PersonField::FullName), "quinn");
    }

    #[test]
    fn test_q_quits_from_home() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_tab_and_backtab_move_focus() {
        let mut app = App::default();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::BackTab);

        let Step::Sender(form) = &app.step else {
            panic!("should be on the sender step");
        };
        assert_eq!(form.focused(), PersonField::TaxId);
    }

    #[test]
    fn test_ctrl_e_fills_example_and_requests_lookup() {
        let mut app = App::default();
        press(&mut app, KeyCode::Enter);
        let effect = InputHandler::handle_key_event(&mut app, KeyCode::Char('e'), KeyModifiers::CONTROL);

        assert!(matches!(effect, Some(Effect::LookupAddress { ref postal_code, .. }) if postal_code == "01001000"));
    }

    #[test]
    fn test_backspace_edits_masked_field() {
        let mut app = App::default();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "1234");
        press(&mut app, KeyCode::Backspace);

        let Step::Sender(form) = &app.step else {
            panic!("should be on the sender step");
        };
        assert_eq!(form.value(PersonField::TaxId), "123");
    }

    #[test]
    fn test_esc_walks_back_to_home() {
        let mut app = App::default();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);
        assert!(matches!(app.step, Step::Home));
        assert!(!app.should_quit);
    }

    #[test]
    fn test_summary_keys() {
        let mut app = App::default();
        press(&mut app, KeyCode::Enter);
        for _ in 0..3 {
            InputHandler::handle_key_event(&mut app, KeyCode::Char('e'), KeyModifiers::CONTROL);
            if let Some(Effect::Quote { ticket, .. }) = press(&mut app, KeyCode::Enter) {
                app.apply(Completion::Quoted {
                    ticket,
                    outcome: Ok(vec![crate::domain::ShipmentOffer {
                        id: "q1".to_string(),
                        carrier: "Jadlog Package".to_string(),
                        price: 31.0,
                        discount: 0.0,
                    }]),
                });
            }
        }
        let Some(Effect::Post { ticket, .. }) = press(&mut app, KeyCode::Enter) else {
            panic!("expected a posting effect");
        };
        app.apply(Completion::Posted { ticket, outcome: Ok("JD123".to_string()) });

        assert_eq!(
            press(&mut app, KeyCode::Char('c')),
            Some(Effect::CopyToClipboard { text: "JD123".to_string() })
        );
        press(&mut app, KeyCode::Char('n'));
        assert!(matches!(app.step, Step::Home));
    }
}
