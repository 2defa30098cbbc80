pub mod form_service;
pub mod render_service;
