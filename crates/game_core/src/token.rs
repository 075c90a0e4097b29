use shared::{
    domain::{Color, Position, Size, TokenId},
    protocol::TokenView,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    id: TokenId,
    color: Color,
    position: Position,
    size: Size,
    label_visible: bool,
    clickable: bool,
}

impl Token {
    pub(crate) fn new(id: TokenId, color: Color, size: Size) -> Self {
        Self {
            id,
            color,
            position: Position::ORIGIN,
            size,
            label_visible: true,
            clickable: false,
        }
    }

    pub fn id(&self) -> TokenId {
        self.id
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn label_visible(&self) -> bool {
        self.label_visible
    }

    pub fn clickable(&self) -> bool {
        self.clickable
    }

    pub(crate) fn move_to(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) fn set_label_visible(&mut self, visible: bool) -> bool {
        std::mem::replace(&mut self.label_visible, visible) != visible
    }

    pub(crate) fn set_clickable(&mut self, clickable: bool) -> bool {
        std::mem::replace(&mut self.clickable, clickable) != clickable
    }

    pub fn view(&self) -> TokenView {
        TokenView {
            token_id: self.id,
            color: self.color,
            position: self.position,
            size: self.size,
            label_visible: self.label_visible,
            clickable: self.clickable,
        }
    }
}
