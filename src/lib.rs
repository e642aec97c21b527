pub mod commands;
pub mod directory;
pub mod intake;
pub mod keyboard;
pub mod links;
pub mod publish;
pub mod registry;

pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>;
