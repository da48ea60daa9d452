pub mod circle_field;
pub mod frame;
pub mod transition;
