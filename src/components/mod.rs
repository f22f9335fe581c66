pub mod query_form;
pub mod result_view;
pub mod title_header;
pub mod weather_app;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use query_form::{QueryForm, QueryFormProps};
pub use result_view::{ResultView, ResultViewProps};
pub use title_header::{TitleHeader, TitleHeaderProps};
pub use weather_app::{ERROR_ICON, WeatherApp, WeatherAppProps};
