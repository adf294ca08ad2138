pub mod app;
pub mod config;
pub mod input;
pub mod model;
pub mod notify;
pub mod render;
pub mod session;
pub mod sim;
pub mod species;
pub mod storage;
pub mod view;

pub use model::{CauseOfDeath, PetColor, PetState};
pub use sim::{reduce, Outcome, PetEvent, Rejection, Transition};
