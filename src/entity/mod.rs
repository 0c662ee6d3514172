pub mod comment;
pub mod facility;
pub mod feedback;
pub mod section;
pub mod ticket;
pub mod ticket_log;
pub mod ticket_sequence;
pub mod user;
