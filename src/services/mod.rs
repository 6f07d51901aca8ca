pub mod attempt_session;
pub mod autosave_scheduler;
pub mod clock;
pub mod countdown_timer;
pub mod quiz_service;
pub mod result_renderer;
pub mod session_runner;
