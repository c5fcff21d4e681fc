pub mod content;
pub mod game_session;
pub mod pagination;
pub mod response;
pub mod user;

pub use content::{ContentItem, CreateContentInput, UpdateContentInput};
pub use game_session::{CreateGameSessionInput, GameSession, SessionStatus, UpdateGameSessionInput};
pub use pagination::{ListQuery, Page};
pub use response::{ApiResponse, ApiResponseParts};
pub use user::{CreateUserInput, UpdateUserInput, User, UserRole};
