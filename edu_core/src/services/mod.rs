pub mod resource_service;

pub use resource_service::{
    ContentService, GameSessionService, ResourceService, SharedRepository, UserService,
};
