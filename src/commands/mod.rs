pub mod assign;
pub mod delete;
pub mod events;
pub mod new;
pub mod stages;
pub mod users;
