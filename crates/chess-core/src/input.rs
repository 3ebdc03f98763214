//! Tap-to-move selection and D-pad navigation over the board.

use serde::{Deserialize, Serialize};
use shakmaty::{Role, Square};

use crate::rules::MoveInput;
use crate::types::Orientation;

/// A from/to pair produced by tapping or by the remote control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveIntent {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Role>,
}

impl From<MoveIntent> for MoveInput {
    fn from(intent: MoveIntent) -> Self {
        MoveInput::Coordinates {
            from: intent.from,
            to: intent.to,
            promotion: intent.promotion,
        }
    }
}

/// First tap picks a piece, second tap picks the destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TapSelection {
    selected: Option<Square>,
}

impl TapSelection {
    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// `selectable` tells whether `square` holds a piece the player may move.
    /// Promotions always ask for a queen.
    pub fn tap(&mut self, square: Square, selectable: bool) -> Option<MoveIntent> {
        match self.selected {
            None => {
                if selectable {
                    self.selected = Some(square);
                }
                None
            }
            Some(from) if from == square => {
                self.selected = None;
                None
            }
            Some(_) if selectable => {
                self.selected = Some(square);
                None
            }
            Some(from) => {
                self.selected = None;
                Some(MoveIntent {
                    from,
                    to: square,
                    promotion: Some(Role::Queen),
                })
            }
        }
    }
}

/// Remote-control keys, named as the browser reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Key {
    #[serde(rename = "ArrowUp")]
    Up,
    #[serde(rename = "ArrowDown")]
    Down,
    #[serde(rename = "ArrowLeft")]
    Left,
    #[serde(rename = "ArrowRight")]
    Right,
    #[serde(rename = "Enter", alias = "Select")]
    Enter,
    #[serde(rename = "Backspace", alias = "Escape", alias = "GoBack")]
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusArea {
    Board,
    Buttons,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlButton {
    NewGame,
    FlipBoard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorAction {
    None,
    Move(MoveIntent),
    Activate(ControlButton),
}

/// Focus state for D-pad play: a square on the board or a button below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardCursor {
    area: FocusArea,
    focus: Square,
    button: ControlButton,
    selection: TapSelection,
}

impl Default for BoardCursor {
    fn default() -> Self {
        Self {
            area: FocusArea::Board,
            focus: Square::E2,
            button: ControlButton::NewGame,
            selection: TapSelection::default(),
        }
    }
}

impl BoardCursor {
    pub fn area(&self) -> FocusArea {
        self.area
    }

    pub fn focus(&self) -> Square {
        self.focus
    }

    pub fn button(&self) -> ControlButton {
        self.button
    }

    pub fn selected(&self) -> Option<Square> {
        self.selection.selected()
    }

    /// Handle one key press. Directions are relative to the screen, so they
    /// are mirrored when black is at the bottom.
    pub fn press<F>(&mut self, key: Key, orientation: Orientation, selectable: F) -> CursorAction
    where
        F: Fn(Square) -> bool,
    {
        match self.area {
            FocusArea::Board => self.press_on_board(key, orientation, selectable),
            FocusArea::Buttons => self.press_on_buttons(key),
        }
    }

    fn press_on_board<F>(&mut self, key: Key, orientation: Orientation, selectable: F) -> CursorAction
    where
        F: Fn(Square) -> bool,
    {
        let (dx, dy) = match key {
            Key::Up => (0, 1),
            Key::Down => (0, -1),
            Key::Left => (-1, 0),
            Key::Right => (1, 0),
            Key::Enter => {
                return match self.selection.tap(self.focus, selectable(self.focus)) {
                    Some(intent) => CursorAction::Move(intent),
                    None => CursorAction::None,
                };
            }
            Key::Back => {
                self.selection.clear();
                return CursorAction::None;
            }
        };

        let (dx, dy) = match orientation {
            Orientation::White => (dx, dy),
            Orientation::Black => (-dx, -dy),
        };

        let index = u32::from(self.focus) as i32;
        let file = index % 8 + dx;
        let rank = index / 8 + dy;

        if (0..8).contains(&file) && (0..8).contains(&rank) {
            self.focus = Square::new((rank * 8 + file) as u32);
        } else if key == Key::Down {
            // Off the bottom edge: hand focus to the buttons row.
            self.area = FocusArea::Buttons;
            self.button = ControlButton::NewGame;
        }
        CursorAction::None
    }

    fn press_on_buttons(&mut self, key: Key) -> CursorAction {
        match key {
            Key::Left => self.button = ControlButton::NewGame,
            Key::Right => self.button = ControlButton::FlipBoard,
            Key::Up => self.area = FocusArea::Board,
            Key::Enter => return CursorAction::Activate(self.button),
            Key::Down | Key::Back => {}
        }
        CursorAction::None
    }

    /// Drop any selection, e.g. after a reset.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }
}
