pub mod detail_popup;
pub mod rota_board;
pub mod status_bar;
pub mod week_view;

pub use rota_board::RotaBoard;
pub use status_bar::StatusBar;
pub use week_view::{GridPlacement, WeekView};
