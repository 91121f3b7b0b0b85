pub mod achievement;
pub mod folder;
pub mod material;
pub mod message;
pub mod session;
pub mod student;
