use crate::sim::PetEvent;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scene {
    Menu,
    Pet,
    Help { back_to_pet: bool },
}

#[derive(Clone, Debug)]
pub struct InputEvent {
    pub key: KeyCode,
    pub mods: KeyModifiers,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiAction {
    MenuMove(i32),
    MenuPick,
    MenuPickIndex(usize),
    Pet(PetEvent),
    BackToMenu,
    HelpToggle,
    ToggleEmoji,
    Quit,
}

pub fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so we stay responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        if let Event::Key(k) = event::read()? {
            if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                out.push(InputEvent {
                    key: k.code,
                    mods: k.modifiers,
                });
                if out.len() >= 32 {
                    break;
                }
            }
        }
    }
    Ok(out)
}

pub fn map_event_to_action(scene: Scene, ev: &InputEvent) -> Option<UiAction> {
    if matches!(ev.key, KeyCode::Char('c') | KeyCode::Char('C'))
        && ev.mods.contains(KeyModifiers::CONTROL)
    {
        return Some(UiAction::Quit);
    }

    // Global
    match ev.key {
        KeyCode::Char('h') | KeyCode::Char('H') => return Some(UiAction::HelpToggle),
        KeyCode::Char('q') | KeyCode::Char('Q') => return Some(UiAction::Quit),
        KeyCode::Char('e') | KeyCode::Char('E') => return Some(UiAction::ToggleEmoji),
        _ => {}
    }

    match scene {
        Scene::Menu => match ev.key {
            KeyCode::Up | KeyCode::Char('k') => Some(UiAction::MenuMove(-1)),
            KeyCode::Down | KeyCode::Char('j') => Some(UiAction::MenuMove(1)),
            KeyCode::Enter => Some(UiAction::MenuPick),
            KeyCode::Char(ch @ '1'..='9') => {
                Some(UiAction::MenuPickIndex(ch as usize - '1' as usize))
            }
            _ => None,
        },
        Scene::Pet => match ev.key {
            KeyCode::Char('f') | KeyCode::Char('F') => Some(UiAction::Pet(PetEvent::Feed)),
            KeyCode::Char('p') | KeyCode::Char('P') => Some(UiAction::Pet(PetEvent::Play)),
            KeyCode::Char('c') | KeyCode::Char('C') => Some(UiAction::Pet(PetEvent::Clean)),
            KeyCode::Char('s') | KeyCode::Char('S') => Some(UiAction::Pet(PetEvent::ToggleSleep)),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(UiAction::Pet(PetEvent::Reset)),
            KeyCode::Esc => Some(UiAction::BackToMenu),
            _ => None,
        },
        Scene::Help { .. } => match ev.key {
            KeyCode::Esc => Some(UiAction::HelpToggle),
            _ => None,
        },
    }
}
