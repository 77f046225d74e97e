mod error_overlay;
mod item_list;
mod item_row;
mod list_options_bar;
mod login_form;
mod toolbar;

pub use error_overlay::ErrorOverlay;
pub use item_list::ItemList;
pub use item_row::ItemRow;
pub use list_options_bar::ListOptionsBar;
pub use login_form::LoginForm;
pub use toolbar::Toolbar;
