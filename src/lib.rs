//! Household dashboard: a month calendar over a REST API, plus chores, todo
//! lists, categories and weather.
pub mod api;
pub mod calendar;
pub mod config;
pub mod logger;
pub mod runtime;
pub mod views;
