pub mod attempt_dto;
pub mod request;
pub mod response;
