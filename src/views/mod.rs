pub mod calendar;
pub mod form;
pub mod render;

pub use calendar::CalendarView;
